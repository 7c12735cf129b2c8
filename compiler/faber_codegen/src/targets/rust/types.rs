//! Faber type annotations as Rust types.

use faber_ir::{SemanticType, TypeExpr};

use super::RustGenerator;
use crate::features::Features;
use crate::targets::{semantic_to_type_expr, Builtin};
use crate::{CodegenError, CodegenResult, CodegenTarget};

const TARGET: CodegenTarget = CodegenTarget::Rust;

impl RustGenerator<'_> {
    pub(super) fn ty(&mut self, ty: &TypeExpr) -> CodegenResult<String> {
        match ty {
            TypeExpr::Named {
                name,
                args,
                nullable,
            } => {
                let base = self.named_ty(name, args)?;
                if *nullable {
                    self.ctx.require(Features::OPTIONAL);
                    Ok(format!("Option<{base}>"))
                } else {
                    Ok(base)
                }
            }
            TypeExpr::Function { params, ret } => {
                self.ctx.require(Features::FUNCTIONAL);
                let params = params
                    .iter()
                    .map(|p| self.ty(p))
                    .collect::<CodegenResult<Vec<_>>>()?;
                Ok(format!("Box<dyn Fn({}) -> {}>", params.join(", "), self.ty(ret)?))
            }
            TypeExpr::Union(_) => Err(CodegenError::unsupported("anonymous union type", TARGET)),
        }
    }

    fn named_ty(&mut self, name: &str, args: &[TypeExpr]) -> CodegenResult<String> {
        let args = args
            .iter()
            .map(|a| self.ty(a))
            .collect::<CodegenResult<Vec<_>>>()?;
        let arg = |i: usize| args.get(i).map_or("_", String::as_str).to_string();

        let spelled = match Builtin::from_name(name) {
            Some(Builtin::Textus) => "String".to_string(),
            Some(Builtin::Numerus) => "i64".to_string(),
            Some(Builtin::Fractus) => "f64".to_string(),
            Some(Builtin::Bivalens) => "bool".to_string(),
            Some(Builtin::Vacuum | Builtin::Nihil) => "()".to_string(),
            Some(Builtin::Ignotum) => {
                self.ctx.require(Features::ANY);
                "Box<dyn std::any::Any>".to_string()
            }
            Some(Builtin::Lista) => {
                self.ctx.require(Features::LISTA);
                format!("Vec<{}>", arg(0))
            }
            Some(Builtin::Tabula) => {
                self.ctx.require(Features::TABULA);
                format!("HashMap<{}, {}>", arg(0), arg(1))
            }
            Some(Builtin::Copia) => {
                self.ctx.require(Features::COPIA);
                format!("HashSet<{}>", arg(0))
            }
            Some(Builtin::Promissum) => {
                self.ctx.require(Features::FUTURE);
                format!(
                    "std::pin::Pin<Box<dyn std::future::Future<Output = {}>>>",
                    arg(0)
                )
            }
            Some(Builtin::Cursor) => {
                self.ctx.require(Features::ITERATOR);
                format!("Box<dyn Iterator<Item = {}>>", arg(0))
            }
            Some(Builtin::Decimus) => return Err(CodegenError::unsupported("decimus", TARGET)),
            Some(Builtin::Fluxus) => return Err(CodegenError::unsupported("fluxus type", TARGET)),
            None if args.is_empty() => name.to_string(),
            None => format!("{name}<{}>", args.join(", ")),
        };
        Ok(spelled)
    }

    /// Return type of a signature: `()` when absent. A `promissum<T>` return
    /// of an async function is just `T`.
    pub(super) fn ret_ty(&mut self, ret: Option<&TypeExpr>, is_async: bool) -> CodegenResult<String> {
        match ret {
            None => Ok("()".to_string()),
            Some(TypeExpr::Named {
                name,
                args,
                nullable: false,
            }) if is_async && name == "promissum" => match args.first() {
                Some(inner) => self.ty(inner),
                None => Ok("()".to_string()),
            },
            Some(ret) => self.ty(ret),
        }
    }

    /// The Rust spelling of a resolved type, when it has one.
    pub(super) fn semantic_ty(&mut self, ty: &SemanticType) -> Option<String> {
        let written = semantic_to_type_expr(ty)?;
        self.ty(&written).ok()
    }
}
