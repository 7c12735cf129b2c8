//! Faber type annotations as TypeScript types.

use faber_ir::TypeExpr;

use super::TypeScriptGenerator;
use crate::features::Features;
use crate::targets::Builtin;
use crate::CodegenResult;

impl TypeScriptGenerator {
    pub(super) fn ty(&mut self, ty: &TypeExpr) -> CodegenResult<String> {
        match ty {
            TypeExpr::Named {
                name,
                args,
                nullable,
            } => {
                let base = self.named_ty(name, args)?;
                Ok(if *nullable {
                    format!("{base} | null")
                } else {
                    base
                })
            }
            TypeExpr::Function { params, ret } => {
                let params = params
                    .iter()
                    .enumerate()
                    .map(|(i, p)| Ok(format!("arg{i}: {}", self.ty(p)?)))
                    .collect::<CodegenResult<Vec<_>>>()?;
                Ok(format!("({}) => {}", params.join(", "), self.ty(ret)?))
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
        let arg = |i: usize| args.get(i).map_or("unknown", String::as_str).to_string();

        let spelled = match Builtin::from_name(name) {
            Some(Builtin::Textus) => "string".to_string(),
            Some(Builtin::Numerus | Builtin::Fractus) => "number".to_string(),
            Some(Builtin::Decimus) => {
                self.ctx.require(Features::DECIMAL);
                "Decimal".to_string()
            }
            Some(Builtin::Bivalens) => "boolean".to_string(),
            Some(Builtin::Nihil) => "null".to_string(),
            Some(Builtin::Vacuum) => "void".to_string(),
            Some(Builtin::Ignotum) => "unknown".to_string(),
            Some(Builtin::Lista) => {
                self.ctx.require(Features::LISTA);
                let elem = arg(0);
                if elem.contains(' ') {
                    format!("({elem})[]")
                } else {
                    format!("{elem}[]")
                }
            }
            Some(Builtin::Tabula) => {
                self.ctx.require(Features::TABULA);
                format!("Map<{}, {}>", arg(0), arg(1))
            }
            Some(Builtin::Copia) => {
                self.ctx.require(Features::COPIA);
                format!("Set<{}>", arg(0))
            }
            Some(Builtin::Promissum) => format!("Promise<{}>", arg(0)),
            Some(Builtin::Cursor) => format!("Generator<{}>", arg(0)),
            Some(Builtin::Fluxus) => format!("AsyncIterable<{}>", arg(0)),
            None if args.is_empty() => name.to_string(),
            None => format!("{name}<{}>", args.join(", ")),
        };
        Ok(spelled)
    }
}
