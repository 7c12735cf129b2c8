//! Resolved semantic types.
//!
//! Attached to expressions by semantic analysis. Code generation only reads
//! them; an expression without a resolved type is legal and generators fall
//! back to heuristics.

use std::fmt;

/// The resolved type of an expression.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SemanticType {
    /// A built-in scalar such as `numerus` or `textus`.
    Primitive { name: String, nullable: bool },
    /// A parameterised built-in such as `lista<numerus>`.
    Generic {
        name: String,
        params: Vec<SemanticType>,
        nullable: bool,
    },
    /// A function type.
    Function {
        params: Vec<SemanticType>,
        ret: Box<SemanticType>,
    },
    /// One of several types.
    Union(Vec<SemanticType>),
    /// A user-declared class, union, enum or alias.
    User { name: String, nullable: bool },
    /// Analysis could not determine the type.
    Unknown { reason: Option<String> },
}

impl SemanticType {
    /// A non-nullable primitive.
    pub fn primitive(name: impl Into<String>) -> Self {
        SemanticType::Primitive {
            name: name.into(),
            nullable: false,
        }
    }

    /// A non-nullable generic instance.
    pub fn generic(name: impl Into<String>, params: Vec<SemanticType>) -> Self {
        SemanticType::Generic {
            name: name.into(),
            params,
            nullable: false,
        }
    }

    /// A non-nullable user type.
    pub fn user(name: impl Into<String>) -> Self {
        SemanticType::User {
            name: name.into(),
            nullable: false,
        }
    }

    /// An unknown type with no recorded reason.
    pub fn unknown() -> Self {
        SemanticType::Unknown { reason: None }
    }

    /// `lista<elem>`.
    pub fn lista(elem: SemanticType) -> Self {
        Self::generic("lista", vec![elem])
    }

    /// `tabula<key, value>`.
    pub fn tabula(key: SemanticType, value: SemanticType) -> Self {
        Self::generic("tabula", vec![key, value])
    }

    /// `copia<elem>`.
    pub fn copia(elem: SemanticType) -> Self {
        Self::generic("copia", vec![elem])
    }

    /// Mark this type nullable. Function, union and unknown types are
    /// returned unchanged.
    #[must_use]
    pub fn into_nullable(self) -> Self {
        match self {
            SemanticType::Primitive { name, .. } => SemanticType::Primitive {
                name,
                nullable: true,
            },
            SemanticType::Generic { name, params, .. } => SemanticType::Generic {
                name,
                params,
                nullable: true,
            },
            SemanticType::User { name, .. } => SemanticType::User {
                name,
                nullable: true,
            },
            other => other,
        }
    }

    /// Name of a generic type, if this is one.
    pub fn generic_name(&self) -> Option<&str> {
        match self {
            SemanticType::Generic { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Type parameters of a generic type; empty otherwise.
    pub fn type_params(&self) -> &[SemanticType] {
        match self {
            SemanticType::Generic { params, .. } => params,
            _ => &[],
        }
    }

    /// Whether this is the primitive named `name`.
    pub fn is_primitive(&self, expected: &str) -> bool {
        matches!(self, SemanticType::Primitive { name, .. } if name == expected)
    }

    /// Whether the type admits `nihil`.
    pub fn is_nullable(&self) -> bool {
        match self {
            SemanticType::Primitive { nullable, .. }
            | SemanticType::Generic { nullable, .. }
            | SemanticType::User { nullable, .. } => *nullable,
            SemanticType::Union(members) => members.iter().any(|m| m.is_primitive("nihil")),
            SemanticType::Function { .. } | SemanticType::Unknown { .. } => false,
        }
    }

    /// Whether analysis failed to resolve this type.
    pub fn is_unknown(&self) -> bool {
        matches!(self, SemanticType::Unknown { .. })
    }
}

/// Renders the type in Faber surface syntax.
impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Primitive { name, nullable } | SemanticType::User { name, nullable } => {
                write!(f, "{name}")?;
                if *nullable {
                    write!(f, "?")?;
                }
                Ok(())
            }
            SemanticType::Generic {
                name,
                params,
                nullable,
            } => {
                write!(f, "{name}<")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ">")?;
                if *nullable {
                    write!(f, "?")?;
                }
                Ok(())
            }
            SemanticType::Function { params, ret } => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") -> {ret}")
            }
            SemanticType::Union(members) => {
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{m}")?;
                }
                Ok(())
            }
            SemanticType::Unknown { .. } => write!(f, "ignotum"),
        }
    }
}

#[cfg(test)]
mod tests;
