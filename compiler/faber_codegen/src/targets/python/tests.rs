use faber_ir::{
    BinaryOp, Block, ClassDecl, EnumDecl, EnumMember, Expr, ExprKind, FieldDecl, ForKind,
    ForStmt, FunctionDecl, FunctionMode, MatchArm, MatchStmt, Param, PrintLevel, Program,
    RaiseKind, SemanticType, Span, Stmt, StmtKind, TemplatePart, TryStmt, TypeExpr, UnionDecl,
    Variant, VariantBinding, VariantField,
};
use pretty_assertions::assert_eq;

use crate::features::Features;
use crate::generator::GeneratedCode;
use crate::{CodegenError, CodegenTarget, GenerateOptions};

fn lower(body: Vec<Stmt>) -> GeneratedCode {
    match super::generate(&Program::new(body), &GenerateOptions::new(CodegenTarget::Python)) {
        Ok(code) => code,
        Err(e) => panic!("generation failed: {e}"),
    }
}

fn source(body: Vec<Stmt>) -> String {
    lower(body).source()
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::DUMMY)
}

#[test]
fn test_literals_and_no_terminator() {
    assert_eq!(
        source(vec![
            Stmt::varia("x", Expr::int(5)),
            Stmt::fixum("ok", Expr::bool(true)),
            Stmt::fixum("nil", Expr::nil()),
        ]),
        "x = 5\nok = True\nnil = None"
    );
}

#[test]
fn test_empty_function_body_is_pass() {
    let decl = FunctionDecl::new("nihil_agit", vec![], Block::new(vec![]))
        .returning(TypeExpr::named("vacuum"));
    assert_eq!(
        source(vec![Stmt::function(decl)]),
        "def nihil_agit() -> None:\n    pass"
    );
}

#[test]
fn test_async_function_and_cede() {
    let decl = FunctionDecl::new(
        "lege",
        vec![Param::new("via", Some(TypeExpr::named("textus")))],
        Block::new(vec![Stmt::ret(Some(Expr::cede(Expr::call(
            Expr::ident("fetch"),
            vec![Expr::ident("via")],
        ))))]),
    )
    .returning(TypeExpr::named("textus"))
    .with_mode(FunctionMode::Async);
    let code = lower(vec![Stmt::function(decl)]);
    assert_eq!(
        code.body,
        "async def lege(via: str) -> str:\n    return await fetch(via)"
    );
    assert_eq!(code.preamble, "");
    assert!(code.features.contains(Features::ASYNC));
}

#[test]
fn test_cede_at_module_level_is_unsupported() {
    let result = super::generate(
        &Program::new(vec![Stmt::expr(Expr::cede(Expr::ident("x")))]),
        &GenerateOptions::new(CodegenTarget::Python),
    );
    assert!(matches!(result, Err(CodegenError::UnsupportedConstruct { .. })));
}

#[test]
fn test_class_is_dataclass() {
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
        methods: vec![FunctionDecl::new(
            "saluta",
            vec![],
            Block::new(vec![Stmt::print(vec![Expr::member(
                Expr::new(ExprKind::SelfRef, Span::DUMMY),
                "nomen",
            )])]),
        )],
    }));
    let code = lower(vec![class]);
    let expected_body = "\
@dataclass
class Persona:
    nomen: str
    amici: list[str] = field(default_factory=lambda: [])
    def __post_init__(self) -> None:
        pass
    def saluta(self):
        print(self.nomen)";
    assert_eq!(code.body, expected_body);
    assert_eq!(code.preamble, "from dataclasses import dataclass, field\n\n");
}

#[test]
fn test_enum_uses_auto() {
    let decl = stmt(StmtKind::Enum(EnumDecl {
        name: "Color".into(),
        members: vec![
            EnumMember {
                name: "RUBER".into(),
                value: None,
            },
            EnumMember {
                name: "VIRIDIS".into(),
                value: Some(faber_ir::Literal::Integer(5)),
            },
        ],
    }));
    assert_eq!(
        source(vec![decl]),
        "from enum import Enum, auto\n\nclass Color(Enum):\n    RUBER = auto()\n    VIRIDIS = 5"
    );
}

#[test]
fn test_union_and_match() {
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
                binding: VariantBinding::Alias("p".into()),
                body: Block::new(vec![]),
            },
        ],
        default: Some(Block::new(vec![])),
    }));
    let expected = "\
@dataclass
class Circulus:
    radius: float
@dataclass
class Punctum:
    pass
type Figura = Circulus | Punctum
match f:
    case Circulus(radius=r):
        print(r)
    case Punctum() as p:
        pass
    case _:
        pass";
    assert_eq!(lower(vec![union, matched]).body, expected);
}

#[test]
fn test_inclusive_range_loop() {
    let range = Expr::new(
        ExprKind::Range {
            start: Box::new(Expr::int(1)),
            end: Box::new(Expr::ident("n")),
            step: None,
            inclusive: true,
        },
        Span::DUMMY,
    );
    let for_stmt = stmt(StmtKind::For(ForStmt {
        kind: ForKind::Values,
        binding: "i".into(),
        iterable: range,
        is_async: false,
        body: Block::new(vec![Stmt::print(vec![Expr::ident("i")])]),
    }));
    assert_eq!(source(vec![for_stmt]), "for i in range(1, n + 1):\n    print(i)");
}

#[test]
fn test_print_levels() {
    let warn = stmt(StmtKind::Print {
        level: PrintLevel::Warn,
        args: vec![Expr::string("cave")],
    });
    let debug = stmt(StmtKind::Print {
        level: PrintLevel::Debug,
        args: vec![Expr::ident("x")],
    });
    let code = lower(vec![warn, debug]);
    assert_eq!(code.body, "print(\"cave\", file=sys.stderr)\nprint(repr(x))");
    assert_eq!(code.preamble, "import sys\n\n");
}

#[test]
fn test_template_escapes_braces() {
    let template = Expr::new(
        ExprKind::Template(vec![
            TemplatePart::Text("{salve} ".into()),
            TemplatePart::Expr(Expr::ident("nomen")),
        ]),
        Span::DUMMY,
    );
    assert_eq!(source(vec![Stmt::expr(template)]), "f\"{{salve}} {nomen}\"");
}

#[test]
fn test_integer_division_and_coalesce() {
    let n = || Expr::ident("a").with_type(SemanticType::primitive("numerus"));
    let div = Expr::binary(BinaryOp::Div, n(), n());
    let coalesce = Expr::binary(BinaryOp::Coalesce, Expr::ident("x"), Expr::int(0));
    assert_eq!(
        source(vec![Stmt::expr(div), Stmt::expr(coalesce)]),
        "a // a\n(x if x is not None else 0)"
    );
}

#[test]
fn test_fatal_and_error_raises() {
    let code = lower(vec![
        Stmt::raise(RaiseKind::Error, Expr::string("malum")),
        Stmt::raise(RaiseKind::Fatal, Expr::string("mors")),
    ]);
    assert_eq!(code.body, "raise Exception(\"malum\")\nraise Panic(\"mors\")");
    assert_eq!(code.preamble, "class Panic(Exception):\n    pass\n\n");
    assert!(code.features.contains(Features::RAISE | Features::PANIC));
}

#[test]
fn test_try_without_handlers_gets_finally() {
    let try_stmt = stmt(StmtKind::Try(TryStmt {
        body: Block::new(vec![Stmt::expr(Expr::call(Expr::ident("f"), vec![]))]),
        catch: None,
        finally: None,
    }));
    assert_eq!(source(vec![try_stmt]), "try:\n    f()\nfinally:\n    pass");
}

#[test]
fn test_async_entry() {
    let entry = stmt(StmtKind::Entry {
        is_async: true,
        body: Block::new(vec![Stmt::expr(Expr::cede(Expr::call(Expr::ident("run"), vec![])))]),
    });
    let code = lower(vec![entry]);
    assert_eq!(
        code.body,
        "async def main() -> None:\n    await run()\n\nif __name__ == \"__main__\":\n    asyncio.run(main())"
    );
    assert_eq!(code.preamble, "import asyncio\n\n");
}

#[test]
fn test_copia_adde_uses_set_add() {
    let s = Expr::ident("s").with_type(SemanticType::copia(SemanticType::primitive("numerus")));
    assert_eq!(
        source(vec![Stmt::expr(Expr::method_call(s, "adde", vec![Expr::int(1)]))]),
        "s.add(1)"
    );
}
