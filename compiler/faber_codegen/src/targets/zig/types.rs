//! Faber type annotations as Zig types.

use faber_ir::{Literal, SemanticType, TypeExpr};

use super::ZigGenerator;
use crate::features::Features;
use crate::targets::{builtin_of, semantic_to_type_expr, Builtin};
use crate::{CodegenError, CodegenResult, CodegenTarget};

const TARGET: CodegenTarget = CodegenTarget::Zig;

impl ZigGenerator<'_> {
    pub(super) fn ty(&mut self, ty: &TypeExpr) -> CodegenResult<String> {
        match ty {
            TypeExpr::Named {
                name,
                args,
                nullable,
            } => {
                let base = self.named_ty(name, args)?;
                Ok(if *nullable { format!("?{base}") } else { base })
            }
            TypeExpr::Function { params, ret } => {
                let params = params
                    .iter()
                    .map(|p| self.ty(p))
                    .collect::<CodegenResult<Vec<_>>>()?;
                Ok(format!("*const fn ({}) {}", params.join(", "), self.ty(ret)?))
            }
            TypeExpr::Union(_) => Err(CodegenError::unsupported("anonymous union type", TARGET)),
        }
    }

    fn named_ty(&mut self, name: &str, args: &[TypeExpr]) -> CodegenResult<String> {
        let arg = |g: &mut Self, i: usize| match args.get(i) {
            Some(a) => g.ty(a),
            None => Ok("anytype".to_string()),
        };
        let spelled = match Builtin::from_name(name) {
            Some(Builtin::Textus) => "[]const u8".to_string(),
            Some(Builtin::Numerus) => "i64".to_string(),
            Some(Builtin::Fractus) => "f64".to_string(),
            Some(Builtin::Bivalens) => "bool".to_string(),
            Some(Builtin::Vacuum | Builtin::Nihil) => "void".to_string(),
            Some(Builtin::Ignotum) => "anytype".to_string(),
            Some(Builtin::Lista) => {
                self.ctx.require(Features::LISTA | Features::STD);
                format!("std.ArrayList({})", arg(self, 0)?)
            }
            Some(Builtin::Tabula) => {
                self.ctx.require(Features::TABULA | Features::STD);
                let value = arg(self, 1)?;
                if args.first().and_then(builtin_of) == Some(Builtin::Textus) {
                    format!("std.StringHashMap({value})")
                } else {
                    format!("std.AutoHashMap({}, {value})", arg(self, 0)?)
                }
            }
            Some(Builtin::Copia) => {
                self.ctx.require(Features::COPIA | Features::STD);
                if args.first().and_then(builtin_of) == Some(Builtin::Textus) {
                    "std.StringHashMap(void)".to_string()
                } else {
                    format!("std.AutoHashMap({}, void)", arg(self, 0)?)
                }
            }
            // Async functions run to completion; a promise is its value.
            Some(Builtin::Promissum) => arg(self, 0)?,
            Some(Builtin::Decimus) => return Err(CodegenError::unsupported("decimus", TARGET)),
            Some(Builtin::Cursor) => return Err(CodegenError::unsupported("cursor type", TARGET)),
            Some(Builtin::Fluxus) => return Err(CodegenError::unsupported("fluxus type", TARGET)),
            None if args.is_empty() => name.to_string(),
            None => {
                let args = args
                    .iter()
                    .map(|a| self.ty(a))
                    .collect::<CodegenResult<Vec<_>>>()?;
                format!("{name}({})", args.join(", "))
            }
        };
        Ok(spelled)
    }

    /// The Zig spelling of a resolved type, when it has one.
    pub(super) fn semantic_ty(&mut self, ty: &SemanticType) -> Option<String> {
        let written = semantic_to_type_expr(ty)?;
        self.ty(&written).ok()
    }

    /// Element type of a resolved container, for registry rules that name it.
    pub(super) fn elem_ty(&mut self, ty: Option<&SemanticType>) -> Option<String> {
        let elem = ty?.type_params().first()?.clone();
        self.semantic_ty(&elem)
    }
}

/// Type implied by a literal initializer.
pub(super) fn literal_ty(lit: &Literal) -> Option<&'static str> {
    match lit {
        Literal::Integer(_) => Some("i64"),
        Literal::Float(_) => Some("f64"),
        Literal::String(_) => Some("[]const u8"),
        Literal::Bool(_) => Some("bool"),
        Literal::Nil | Literal::Decimal(_) => None,
    }
}
