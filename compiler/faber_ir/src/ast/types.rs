//! Type annotations as written in source.

/// A written type annotation.
///
/// Distinct from [`SemanticType`](crate::SemanticType): this is what the
/// programmer wrote, that is what analysis inferred.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeExpr {
    /// `numerus`, `lista<textus>`, `Persona?`
    Named {
        name: String,
        args: Vec<TypeExpr>,
        nullable: bool,
    },
    /// `(numerus, textus) -> bivalens`
    Function {
        params: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
    },
    /// `numerus | textus`
    Union(Vec<TypeExpr>),
}

impl TypeExpr {
    /// A bare named type with no arguments.
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            name: name.into(),
            args: Vec::new(),
            nullable: false,
        }
    }

    /// A named type applied to arguments.
    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Named {
            name: name.into(),
            args,
            nullable: false,
        }
    }

    /// The same type, made nullable.
    #[must_use]
    pub fn nullable(self) -> Self {
        match self {
            TypeExpr::Named { name, args, .. } => TypeExpr::Named {
                name,
                args,
                nullable: true,
            },
            other => other,
        }
    }

    /// Name of a named type.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Type arguments of a named type; empty otherwise.
    pub fn args(&self) -> &[TypeExpr] {
        match self {
            TypeExpr::Named { args, .. } => args,
            _ => &[],
        }
    }
}
