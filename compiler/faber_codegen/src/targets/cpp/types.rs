//! Faber type annotations as C++ types.

use faber_ir::{SemanticType, TypeExpr};

use super::CppGenerator;
use crate::features::Features;
use crate::targets::{semantic_to_type_expr, Builtin};
use crate::{CodegenError, CodegenResult, CodegenTarget};

const TARGET: CodegenTarget = CodegenTarget::Cpp;

impl CppGenerator<'_> {
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
                    Ok(format!("std::optional<{base}>"))
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
                Ok(format!("std::function<{}({})>", self.ty(ret)?, params.join(", ")))
            }
            TypeExpr::Union(members) => {
                self.ctx.require(Features::VARIANT);
                let members = members
                    .iter()
                    .map(|m| self.ty(m))
                    .collect::<CodegenResult<Vec<_>>>()?;
                Ok(format!("std::variant<{}>", members.join(", ")))
            }
        }
    }

    fn named_ty(&mut self, name: &str, args: &[TypeExpr]) -> CodegenResult<String> {
        let args = args
            .iter()
            .map(|a| self.ty(a))
            .collect::<CodegenResult<Vec<_>>>()?;
        let arg = |i: usize| args.get(i).map_or("std::any", String::as_str).to_string();

        let spelled = match Builtin::from_name(name) {
            Some(Builtin::Textus) => {
                self.ctx.require(Features::STRING);
                "std::string".to_string()
            }
            Some(Builtin::Numerus) => {
                self.ctx.require(Features::CSTDINT);
                "std::int64_t".to_string()
            }
            Some(Builtin::Fractus) => "double".to_string(),
            Some(Builtin::Bivalens) => "bool".to_string(),
            Some(Builtin::Vacuum | Builtin::Nihil) => "void".to_string(),
            Some(Builtin::Ignotum) => {
                self.ctx.require(Features::ANY);
                "std::any".to_string()
            }
            Some(Builtin::Lista) => {
                self.ctx.require(Features::LISTA);
                format!("std::vector<{}>", arg(0))
            }
            Some(Builtin::Tabula) => {
                self.ctx.require(Features::TABULA);
                format!("std::unordered_map<{}, {}>", arg(0), arg(1))
            }
            Some(Builtin::Copia) => {
                self.ctx.require(Features::COPIA);
                format!("std::unordered_set<{}>", arg(0))
            }
            Some(Builtin::Promissum) => {
                self.ctx.require(Features::FUTURE);
                format!("std::future<{}>", arg(0))
            }
            Some(Builtin::Cursor) => {
                self.ctx.require(Features::GENERATOR);
                format!("std::generator<{}>", arg(0))
            }
            Some(Builtin::Decimus) => return Err(CodegenError::unsupported("decimus", TARGET)),
            Some(Builtin::Fluxus) => return Err(CodegenError::unsupported("fluxus type", TARGET)),
            None if args.is_empty() => name.to_string(),
            None => format!("{name}<{}>", args.join(", ")),
        };
        Ok(spelled)
    }

    /// The C++ spelling of a resolved type, when it has one.
    pub(super) fn semantic_ty(&mut self, ty: &SemanticType) -> Option<String> {
        let written = semantic_to_type_expr(ty)?;
        self.ty(&written).ok()
    }
}
