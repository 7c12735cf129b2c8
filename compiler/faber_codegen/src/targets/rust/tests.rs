use faber_ir::{
    BinaryOp, Block, CatchClause, ClassDecl, ComptimeBody, ElseBranch, Expr, ExprKind, FieldDecl,
    ForKind, ForStmt, FunctionDecl, FunctionMode, IfStmt, MatchArm, MatchStmt, Param, Program,
    RaiseKind, SemanticType, Span, Stmt, StmtKind, TemplatePart, TryStmt, TypeExpr, UnionDecl,
    Variant, VariantBinding, VariantField,
};
use pretty_assertions::assert_eq;

use crate::features::Features;
use crate::generator::GeneratedCode;
use crate::{CodegenError, CodegenTarget, GenerateOptions};

fn lower(body: Vec<Stmt>) -> GeneratedCode {
    match super::generate(&Program::new(body), &GenerateOptions::new(CodegenTarget::Rust)) {
        Ok(code) => code,
        Err(e) => panic!("generation failed: {e}"),
    }
}

fn fails(body: Vec<Stmt>) -> CodegenError {
    match super::generate(&Program::new(body), &GenerateOptions::new(CodegenTarget::Rust)) {
        Ok(code) => panic!("expected an error, got:\n{}", code.source()),
        Err(e) => e,
    }
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::DUMMY)
}

fn range(start: i64, end: i64, step: Option<i64>, inclusive: bool) -> Expr {
    Expr::new(
        ExprKind::Range {
            start: Box::new(Expr::int(start)),
            end: Box::new(Expr::int(end)),
            step: step.map(|s| Box::new(Expr::int(s))),
            inclusive,
        },
        Span::DUMMY,
    )
}

fn for_each(binding: &str, iterable: Expr) -> Stmt {
    stmt(StmtKind::For(ForStmt {
        kind: ForKind::Values,
        binding: binding.into(),
        iterable,
        is_async: false,
        body: Block::new(vec![Stmt::print(vec![Expr::ident(binding)])]),
    }))
}

#[test]
fn test_bindings_are_immutable_unless_declared_or_mutated() {
    let code = lower(vec![
        Stmt::varia("x", Expr::int(5)),
        Stmt::fixum("y", Expr::int(5)),
        Stmt::fixum("n", Expr::int(1)),
        Stmt::expr(Expr::assign(Expr::ident("n"), Expr::int(2))),
    ]);
    assert_eq!(code.body, "let mut x = 5;\nlet y = 5;\nlet mut n = 1;\nn = 2;");
    assert_eq!(code.preamble, "");
}

#[test]
fn test_mutating_method_makes_binding_mutable() {
    let lista = SemanticType::lista(SemanticType::primitive("numerus"));
    let code = lower(vec![
        Stmt::fixum("xs", Expr::array(vec![])),
        Stmt::expr(Expr::method_call(
            Expr::ident("xs").with_type(lista),
            "adde",
            vec![Expr::int(1)],
        )),
    ]);
    assert_eq!(code.body, "let mut xs = vec![];\nxs.push(1);");
}

#[test]
fn test_string_literals_are_owned() {
    assert_eq!(
        lower(vec![Stmt::fixum("s", Expr::string("salve"))]).body,
        "let s = \"salve\".to_string();"
    );
}

#[test]
fn test_raise_returns_result_and_callers_propagate() {
    let n = || Expr::ident("n");
    let check = stmt(StmtKind::If(IfStmt {
        cond: Expr::binary(BinaryOp::Lt, n(), Expr::int(0)),
        then: Block::new(vec![Stmt::raise(RaiseKind::Error, Expr::string("not found"))]),
        otherwise: None,
    }));
    let quaere = FunctionDecl::new(
        "quaere",
        vec![Param::new("n", Some(TypeExpr::named("numerus")))],
        Block::new(vec![check, Stmt::ret(Some(n()))]),
    )
    .returning(TypeExpr::named("numerus"));
    let usa = FunctionDecl::new(
        "usa",
        vec![],
        Block::new(vec![Stmt::ret(Some(Expr::call(
            Expr::ident("quaere"),
            vec![Expr::int(1)],
        )))]),
    )
    .returning(TypeExpr::named("numerus"));
    let code = lower(vec![Stmt::function(usa), Stmt::function(quaere)]);
    let expected = "\
fn usa() -> Result<i64, Box<dyn std::error::Error>> {
    return Ok(quaere(1)?);
}
fn quaere(n: i64) -> Result<i64, Box<dyn std::error::Error>> {
    if n < 0 {
        return Err(\"not found\".into());
    }
    return Ok(n);
}";
    assert_eq!(code.body, expected);
    assert!(code.features.contains(Features::RAISE));
}

#[test]
fn test_fallible_unit_function_ends_in_ok() {
    let check = stmt(StmtKind::If(IfStmt {
        cond: Expr::ident("malum"),
        then: Block::new(vec![Stmt::raise(RaiseKind::Error, Expr::string("malum"))]),
        otherwise: None,
    }));
    let decl = FunctionDecl::new("proba", vec![], Block::new(vec![check]));
    let expected = "\
fn proba() -> Result<(), Box<dyn std::error::Error>> {
    if malum {
        return Err(\"malum\".into());
    }
    Ok(())
}";
    assert_eq!(lower(vec![Stmt::function(decl)]).body, expected);
}

#[test]
fn test_trailing_raise_needs_no_ok() {
    let decl = FunctionDecl::new(
        "proba",
        vec![],
        Block::new(vec![Stmt::raise(RaiseKind::Error, Expr::string("malum"))]),
    );
    assert_eq!(
        lower(vec![Stmt::function(decl)]).body,
        "fn proba() -> Result<(), Box<dyn std::error::Error>> {\n    return Err(\"malum\".into());\n}"
    );
}

#[test]
fn test_fatal_raise_panics() {
    let decl = FunctionDecl::new(
        "mori",
        vec![],
        Block::new(vec![Stmt::raise(RaiseKind::Fatal, Expr::string("mors"))]),
    );
    let code = lower(vec![Stmt::function(decl)]);
    assert_eq!(code.body, "fn mori() {\n    panic!(\"mors\");\n}");
    assert!(code.features.contains(Features::PANIC));
}

#[test]
fn test_recoverable_raise_at_module_level_is_unsupported() {
    let err = fails(vec![Stmt::raise(RaiseKind::Error, Expr::string("malum"))]);
    assert!(matches!(err, CodegenError::UnsupportedConstruct { .. }));
}

#[test]
fn test_generator_function_is_unsupported() {
    let decl = FunctionDecl::new("numeri", vec![], Block::new(vec![]))
        .with_mode(FunctionMode::Generator);
    assert_eq!(
        fails(vec![Stmt::function(decl)]),
        CodegenError::UnsupportedConstruct {
            construct: "cursor function `numeri`".to_string(),
            target: CodegenTarget::Rust,
        }
    );
}

#[test]
fn test_try_with_catch_is_immediately_invoked_closure() {
    let try_stmt = stmt(StmtKind::Try(TryStmt {
        body: Block::new(vec![Stmt::expr(Expr::call(Expr::ident("f"), vec![]))]),
        catch: Some(CatchClause {
            param: "e".into(),
            body: Block::new(vec![Stmt::print(vec![Expr::ident("e")])]),
        }),
        finally: None,
    }));
    let decl = FunctionDecl::new("tenta", vec![], Block::new(vec![try_stmt]));
    let expected = "\
fn tenta() {
    match (|| -> Result<(), Box<dyn std::error::Error>> {
        f();
        Ok(())
    })() {
        Ok(()) => {}
        Err(e) => {
            println!(\"{}\", e);
        }
    }
}";
    assert_eq!(lower(vec![Stmt::function(decl)]).body, expected);
}

fn try_catch(body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Try(TryStmt {
        body: Block::new(body),
        catch: Some(CatchClause {
            param: "e".into(),
            body: Block::new(vec![]),
        }),
        finally: None,
    }))
}

#[test]
fn test_return_inside_try_with_catch_is_unsupported() {
    let decl = FunctionDecl::new(
        "tenta",
        vec![],
        Block::new(vec![try_catch(vec![Stmt::ret(Some(Expr::int(1)))])]),
    )
    .returning(TypeExpr::named("numerus"));
    let err = fails(vec![Stmt::function(decl)]);
    assert!(matches!(err, CodegenError::UnsupportedConstruct { .. }), "{err:?}");
}

#[test]
fn test_break_inside_try_with_catch_is_unsupported() {
    let looped = stmt(StmtKind::While {
        cond: Expr::bool(true),
        body: Block::new(vec![try_catch(vec![stmt(StmtKind::Break)])]),
    });
    let decl = FunctionDecl::new("tenta", vec![], Block::new(vec![looped]));
    let err = fails(vec![Stmt::function(decl)]);
    assert!(matches!(err, CodegenError::UnsupportedConstruct { .. }), "{err:?}");
}

#[test]
fn test_loop_inside_try_keeps_its_break() {
    let inner = stmt(StmtKind::While {
        cond: Expr::bool(true),
        body: Block::new(vec![stmt(StmtKind::Break)]),
    });
    let decl = FunctionDecl::new("tenta", vec![], Block::new(vec![try_catch(vec![inner])]));
    let expected = "\
fn tenta() {
    match (|| -> Result<(), Box<dyn std::error::Error>> {
        while true {
            break;
        }
        Ok(())
    })() {
        Ok(()) => {}
        Err(e) => {}
    }
}";
    assert_eq!(lower(vec![Stmt::function(decl)]).body, expected);
}

#[test]
fn test_class_becomes_struct_and_impl() {
    let this = || Expr::new(ExprKind::SelfRef, Span::DUMMY);
    let class = stmt(StmtKind::Class(ClassDecl {
        name: "Persona".into(),
        type_params: vec![],
        implements: vec![],
        fields: vec![
            FieldDecl {
                name: "nomen".into(),
                ty: TypeExpr::named("textus"),
                init: None,
            },
            FieldDecl {
                name: "amici".into(),
                ty: TypeExpr::generic("lista", vec![TypeExpr::named("textus")]),
                init: Some(Expr::array(vec![])),
            },
        ],
        constructor: Some(Block::new(vec![])),
        methods: vec![
            FunctionDecl::new(
                "saluta",
                vec![],
                Block::new(vec![Stmt::print(vec![Expr::member(this(), "nomen")])]),
            ),
            FunctionDecl::new(
                "renomina",
                vec![Param::new("nomen", Some(TypeExpr::named("textus")))],
                Block::new(vec![Stmt::expr(Expr::assign(
                    Expr::member(this(), "nomen"),
                    Expr::ident("nomen"),
                ))]),
            ),
        ],
    }));
    let expected = "\
#[derive(Debug, Clone)]
pub struct Persona {
    pub nomen: String,
    pub amici: Vec<String>,
}
impl Persona {
    pub fn new(nomen: String) -> Self {
        let mut this = Self { nomen, amici: vec![] };
        this.creo();
        this
    }
    fn creo(&mut self) {}
    pub fn saluta(&self) {
        println!(\"{}\", self.nomen);
    }
    pub fn renomina(&mut self, nomen: String) {
        self.nomen = nomen;
    }
}";
    assert_eq!(lower(vec![class]).body, expected);
}

#[test]
fn test_union_and_exhaustive_match() {
    let union = stmt(StmtKind::Union(UnionDecl {
        name: "Figura".into(),
        type_params: vec![],
        variants: vec![
            Variant {
                name: "Circulus".into(),
                fields: vec![VariantField {
                    name: "radius".into(),
                    ty: TypeExpr::named("fractus"),
                }],
            },
            Variant {
                name: "Punctum".into(),
                fields: vec![],
            },
        ],
    }));
    let matched = stmt(StmtKind::Match(MatchStmt {
        subject: Expr::ident("f"),
        arms: vec![
            MatchArm {
                variant: "Circulus".into(),
                binding: VariantBinding::Fields(vec!["r".into()]),
                body: Block::new(vec![Stmt::print(vec![Expr::ident("r")])]),
            },
            MatchArm {
                variant: "Punctum".into(),
                binding: VariantBinding::None,
                body: Block::new(vec![]),
            },
        ],
        default: None,
    }));
    let expected = "\
#[derive(Debug, Clone)]
pub enum Figura {
    Circulus { radius: f64 },
    Punctum,
}
match &f {
    Figura::Circulus { radius: r } => {
        println!(\"{}\", r);
    }
    Figura::Punctum => {}
}";
    assert_eq!(lower(vec![union, matched]).body, expected);
}

#[test]
fn test_alias_arm_binds_payload_fields() {
    let union = stmt(StmtKind::Union(UnionDecl {
        name: "Forma".into(),
        type_params: vec![],
        variants: vec![
            Variant {
                name: "Circulus".into(),
                fields: vec![VariantField {
                    name: "r".into(),
                    ty: TypeExpr::named("fractus"),
                }],
            },
            Variant {
                name: "Nihil".into(),
                fields: vec![],
            },
        ],
    }));
    let matched = stmt(StmtKind::Match(MatchStmt {
        subject: Expr::ident("f"),
        arms: vec![
            MatchArm {
                variant: "Circulus".into(),
                binding: VariantBinding::Alias("c".into()),
                body: Block::new(vec![Stmt::print(vec![Expr::member(Expr::ident("c"), "r")])]),
            },
            MatchArm {
                variant: "Nihil".into(),
                binding: VariantBinding::Alias("n".into()),
                body: Block::new(vec![]),
            },
        ],
        default: None,
    }));
    let after = Stmt::print(vec![Expr::member(Expr::ident("c"), "r")]);
    let expected = "\
#[derive(Debug, Clone)]
pub enum Forma {
    Circulus { r: f64 },
    Nihil,
}
match &f {
    c @ Forma::Circulus { r: c_r } => {
        println!(\"{}\", c_r);
    }
    n @ Forma::Nihil => {}
}
println!(\"{}\", c.r);";
    assert_eq!(lower(vec![union, matched, after]).body, expected);
}

#[test]
fn test_ranges() {
    let code = lower(vec![
        for_each("i", range(0, 3, None, false)),
        for_each("j", range(10, 1, Some(-2), true)),
    ]);
    let expected = "\
for i in 0..3 {
    println!(\"{}\", i);
}
for j in (1..=10).rev().step_by(2) {
    println!(\"{}\", j);
}";
    assert_eq!(code.body, expected);
}

#[test]
fn test_async_entry_runs_on_tokio() {
    let entry = stmt(StmtKind::Entry {
        is_async: true,
        body: Block::new(vec![Stmt::expr(Expr::cede(Expr::call(Expr::ident("run"), vec![])))]),
    });
    let code = lower(vec![entry]);
    assert_eq!(code.body, "#[tokio::main]\nasync fn main() {\n    run().await;\n}");
    assert!(code.features.contains(Features::ASYNC));
}

#[test]
fn test_cede_outside_async_is_unsupported() {
    let decl = FunctionDecl::new(
        "exspecta",
        vec![],
        Block::new(vec![Stmt::expr(Expr::cede(Expr::ident("p")))]),
    );
    assert!(matches!(
        fails(vec![Stmt::function(decl)]),
        CodegenError::UnsupportedConstruct { .. }
    ));
}

#[test]
fn test_native_containers_and_collection_imports() {
    let tabula = Expr::new(
        ExprKind::Native {
            expr: Box::new(Expr::new(ExprKind::Object(vec![]), Span::DUMMY)),
            ty: TypeExpr::generic(
                "tabula",
                vec![TypeExpr::named("textus"), TypeExpr::named("numerus")],
            ),
        },
        Span::DUMMY,
    );
    let lista = Expr::new(
        ExprKind::Native {
            expr: Box::new(Expr::array(vec![])),
            ty: TypeExpr::generic("lista", vec![TypeExpr::named("numerus")]),
        },
        Span::DUMMY,
    );
    let code = lower(vec![Stmt::fixum("m", tabula), Stmt::fixum("xs", lista)]);
    assert_eq!(
        code.source(),
        "use std::collections::HashMap;\n\nlet m = HashMap::new();\nlet xs = Vec::<i64>::new();"
    );
}

#[test]
fn test_template_is_format_macro() {
    let template = Expr::new(
        ExprKind::Template(vec![
            TemplatePart::Text("{salve} ".into()),
            TemplatePart::Expr(Expr::ident("nomen")),
        ]),
        Span::DUMMY,
    );
    assert_eq!(
        lower(vec![Stmt::fixum("s", template)]).body,
        "let s = format!(\"{{salve}} {}\", nomen);"
    );
}

#[test]
fn test_string_comparison_borrows_literal() {
    let a = Expr::ident("a").with_type(SemanticType::primitive("textus"));
    let if_stmt = stmt(StmtKind::If(IfStmt {
        cond: Expr::binary(BinaryOp::Eq, a, Expr::string("x")),
        then: Block::new(vec![]),
        otherwise: Some(ElseBranch::Block(Block::new(vec![]))),
    }));
    assert_eq!(lower(vec![if_stmt]).body, "if a == \"x\" {\n} else {\n}");
}

#[test]
fn test_comptime_block_breaks_to_label() {
    let block = Expr::new(
        ExprKind::Comptime(ComptimeBody::Block(Block::new(vec![Stmt::ret(Some(Expr::binary(
            BinaryOp::Mul,
            Expr::int(2),
            Expr::int(3),
        )))]))),
        Span::DUMMY,
    );
    let code = lower(vec![Stmt::fixum("n", block)]);
    assert_eq!(
        code.body,
        "let n = const {\n    'blk: {\n        break 'blk 2 * 3;\n    }\n};"
    );
    assert!(code.features.contains(Features::COMPTIME));
}

#[test]
fn test_coalesce_unwraps_option() {
    let coalesce = Expr::binary(BinaryOp::Coalesce, Expr::ident("x"), Expr::int(0));
    assert_eq!(
        lower(vec![Stmt::fixum("y", coalesce)]).body,
        "let y = x.unwrap_or(0);"
    );
}
