//! Faber type annotations as Python type hints.

use faber_ir::TypeExpr;

use super::PythonGenerator;
use crate::features::Features;
use crate::targets::Builtin;
use crate::CodegenResult;

impl PythonGenerator {
    pub(super) fn ty(&mut self, ty: &TypeExpr) -> CodegenResult<String> {
        match ty {
            TypeExpr::Named {
                name,
                args,
                nullable,
            } => {
                let base = self.named_ty(name, args)?;
                Ok(if *nullable && base != "None" {
                    format!("{base} | None")
                } else {
                    base
                })
            }
            TypeExpr::Function { params, ret } => {
                self.ctx.require(Features::CALLABLE);
                let params = params
                    .iter()
                    .map(|p| self.ty(p))
                    .collect::<CodegenResult<Vec<_>>>()?;
                Ok(format!("Callable[[{}], {}]", params.join(", "), self.ty(ret)?))
            }
            TypeExpr::Union(members) => {
                let members = members
                    .iter()
                    .map(|m| self.ty(m))
                    .collect::<CodegenResult<Vec<_>>>()?;
                Ok(members.join(" | "))
            }
        }
    }

    fn named_ty(&mut self, name: &str, args: &[TypeExpr]) -> CodegenResult<String> {
        let args = args
            .iter()
            .map(|a| self.ty(a))
            .collect::<CodegenResult<Vec<_>>>()?;
        let arg = |i: usize| args.get(i).cloned();

        let spelled = match Builtin::from_name(name) {
            Some(Builtin::Textus) => "str".to_string(),
            Some(Builtin::Numerus) => "int".to_string(),
            Some(Builtin::Fractus) => "float".to_string(),
            Some(Builtin::Decimus) => {
                self.ctx.require(Features::DECIMAL);
                "Decimal".to_string()
            }
            Some(Builtin::Bivalens) => "bool".to_string(),
            Some(Builtin::Nihil | Builtin::Vacuum) => "None".to_string(),
            Some(Builtin::Ignotum) => self.any(),
            Some(Builtin::Lista) => {
                self.ctx.require(Features::LISTA);
                let elem = arg(0).unwrap_or_else(|| self.any());
                format!("list[{elem}]")
            }
            Some(Builtin::Tabula) => {
                self.ctx.require(Features::TABULA);
                let key = arg(0).unwrap_or_else(|| self.any());
                let value = arg(1).unwrap_or_else(|| self.any());
                format!("dict[{key}, {value}]")
            }
            Some(Builtin::Copia) => {
                self.ctx.require(Features::COPIA);
                let elem = arg(0).unwrap_or_else(|| self.any());
                format!("set[{elem}]")
            }
            Some(Builtin::Promissum) => {
                self.ctx.require(Features::FUTURE);
                let inner = arg(0).unwrap_or_else(|| self.any());
                format!("Awaitable[{inner}]")
            }
            Some(Builtin::Cursor) => {
                self.ctx.require(Features::ITERATOR);
                let inner = arg(0).unwrap_or_else(|| self.any());
                format!("Iterator[{inner}]")
            }
            Some(Builtin::Fluxus) => {
                self.ctx.require(Features::ITERATOR);
                let inner = arg(0).unwrap_or_else(|| self.any());
                format!("AsyncIterator[{inner}]")
            }
            None if args.is_empty() => name.to_string(),
            None => format!("{name}[{}]", args.join(", ")),
        };
        Ok(spelled)
    }

    fn any(&mut self) -> String {
        self.ctx.require(Features::ANY);
        "Any".to_string()
    }
}
