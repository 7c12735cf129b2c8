use faber_ir::{
    Block, ElseBranch, Expr, ExprKind, ForKind, ForStmt, FunctionDecl, FunctionMode, IfStmt,
    Lambda, LambdaBody, Literal, MatchArm, MatchStmt, Param, Program, RaiseKind, SemanticType,
    Span, Stmt, StmtKind, TypeExpr, UnionDecl, Variant, VariantBinding, VariantField,
};
use pretty_assertions::assert_eq;

use crate::features::Features;
use crate::generator::GeneratedCode;
use crate::{CodegenError, CodegenTarget, GenerateOptions};

fn lower(body: Vec<Stmt>) -> GeneratedCode {
    match super::generate(
        &Program::new(body),
        &GenerateOptions::new(CodegenTarget::TypeScript),
    ) {
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
fn test_var_declarations() {
    let typed = stmt(StmtKind::Var(faber_ir::VarDecl {
        mutable: false,
        target: faber_ir::BindingTarget::Ident("nomen".into()),
        ty: Some(TypeExpr::named("textus")),
        init: Some(Expr::string("Marcus")),
    }));
    assert_eq!(
        source(vec![Stmt::varia("x", Expr::int(5)), typed]),
        "let x = 5;\nconst nomen: string = \"Marcus\";"
    );
}

#[test]
fn test_semicolons_optional() {
    let options = GenerateOptions::new(CodegenTarget::TypeScript).with_semicolons(false);
    let code = super::generate(&Program::new(vec![Stmt::varia("x", Expr::int(5))]), &options);
    assert_eq!(code.map(|c| c.source()).ok(), Some("let x = 5".to_string()));
}

#[test]
fn test_async_function_awaits() {
    let decl = FunctionDecl::new(
        "fetch",
        vec![],
        Block::new(vec![Stmt::ret(Some(Expr::cede(Expr::call(
            Expr::ident("load"),
            vec![],
        ))))]),
    )
    .returning(TypeExpr::named("numerus"))
    .with_mode(FunctionMode::Async);
    let code = lower(vec![Stmt::function(decl)]);
    assert_eq!(
        code.body,
        "async function fetch(): Promise<number> {\n  return await load();\n}"
    );
    assert!(code.features.contains(Features::ASYNC));
    assert_eq!(code.preamble, "");
}

#[test]
fn test_generator_yields_and_closure_resets_frame() {
    let inner = Expr::new(
        ExprKind::Lambda(Lambda {
            params: vec![],
            ret: None,
            body: LambdaBody::Expr(Box::new(Expr::cede(Expr::ident("p")))),
            is_async: true,
        }),
        Span::DUMMY,
    );
    let decl = FunctionDecl::new(
        "numeri",
        vec![],
        Block::new(vec![
            Stmt::expr(Expr::cede(Expr::int(1))),
            Stmt::fixum("f", inner),
        ]),
    )
    .with_mode(FunctionMode::Generator);
    assert_eq!(
        source(vec![Stmt::function(decl)]),
        "function* numeri() {\n  yield 1;\n  const f = async () => await p;\n}"
    );
}

#[test]
fn test_fatal_raise_pulls_panic_class() {
    let code = lower(vec![Stmt::raise(RaiseKind::Fatal, Expr::string("boom"))]);
    assert_eq!(code.body, "throw new Panic(\"boom\");");
    assert!(code.preamble.starts_with("class Panic extends Error {"));
    assert!(code.preamble.ends_with("}\n\n"));
}

#[test]
fn test_error_raise_needs_no_preamble() {
    let code = lower(vec![Stmt::raise(RaiseKind::Error, Expr::string("malum"))]);
    assert_eq!(code.source(), "throw new Error(\"malum\");");
    assert!(code.features.contains(Features::RAISE));
}

#[test]
fn test_if_chain() {
    let if_stmt = IfStmt {
        cond: Expr::ident("a"),
        then: Block::new(vec![Stmt::print(vec![Expr::int(1)])]),
        otherwise: Some(ElseBranch::If(Box::new(IfStmt {
            cond: Expr::ident("b"),
            then: Block::new(vec![]),
            otherwise: Some(ElseBranch::Block(Block::new(vec![Stmt::print(vec![
                Expr::int(3),
            ])]))),
        }))),
    };
    assert_eq!(
        source(vec![stmt(StmtKind::If(if_stmt))]),
        "if (a) {\n  console.log(1);\n} else if (b) {\n} else {\n  console.log(3);\n}"
    );
}

#[test]
fn test_trailing_comment_follows_block_header() {
    let looped = stmt(StmtKind::While {
        cond: Expr::ident("a"),
        body: Block::new(vec![stmt(StmtKind::Break)]),
    })
    .with_trailing(faber_ir::Comment::line("dum"));
    assert_eq!(
        source(vec![looped]),
        "while (a) {  // dum\n  break;\n}"
    );
}

#[test]
fn test_range_loop_header() {
    let range = Expr::new(
        ExprKind::Range {
            start: Box::new(Expr::int(0)),
            end: Box::new(Expr::int(10)),
            step: None,
            inclusive: false,
        },
        Span::DUMMY,
    );
    let for_stmt = ForStmt {
        kind: ForKind::Values,
        binding: "i".into(),
        iterable: range,
        is_async: false,
        body: Block::new(vec![Stmt::print(vec![Expr::ident("i")])]),
    };
    assert_eq!(
        source(vec![stmt(StmtKind::For(for_stmt))]),
        "for (let i = 0; i < 10; i++) {\n  console.log(i);\n}"
    );
}

#[test]
fn test_range_expression_is_unsupported() {
    let range = Expr::new(
        ExprKind::Range {
            start: Box::new(Expr::int(0)),
            end: Box::new(Expr::int(3)),
            step: None,
            inclusive: true,
        },
        Span::DUMMY,
    );
    let result = super::generate(
        &Program::new(vec![Stmt::fixum("r", range)]),
        &GenerateOptions::default(),
    );
    assert!(matches!(result, Err(CodegenError::UnsupportedConstruct { .. })));
}

#[test]
fn test_stray_spread_is_unknown_node() {
    let spread = Expr::new(ExprKind::Spread(Box::new(Expr::ident("xs"))), Span::DUMMY);
    let result = super::generate(
        &Program::new(vec![Stmt::expr(spread)]),
        &GenerateOptions::default(),
    );
    assert!(matches!(result, Err(CodegenError::UnknownNodeKind { .. })));
}

#[test]
fn test_spread_in_call_args() {
    let spread = Expr::new(ExprKind::Spread(Box::new(Expr::ident("xs"))), Span::DUMMY);
    assert_eq!(
        source(vec![Stmt::expr(Expr::call(Expr::ident("f"), vec![spread]))]),
        "f(...xs);"
    );
}

#[test]
fn test_match_binds_fields_by_position() {
    let union = stmt(StmtKind::Union(UnionDecl {
        name: "Figura".into(),
        type_params: vec![],
        variants: vec![
            Variant {
                name: "Circulus".into(),
                fields: vec![VariantField {
                    name: "radius".into(),
                    ty: TypeExpr::named("numerus"),
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
                body: Block::new(vec![Stmt::ret(None)]),
            },
        ],
        default: None,
    }));
    let expected = "\
type Figura =
  | { tag: \"Circulus\"; radius: number }
  | { tag: \"Punctum\" };
switch (f.tag) {
  case \"Circulus\": {
    const { radius: r } = f;
    console.log(r);
    break;
  }
  case \"Punctum\": {
    return;
  }
}";
    assert_eq!(source(vec![union, matched]), expected);
}

#[test]
fn test_decimal_literal_imports_library() {
    let decimal = Expr::new(ExprKind::Literal(Literal::Decimal("0.10".into())), Span::DUMMY);
    let code = lower(vec![Stmt::fixum("pretium", decimal)]);
    assert_eq!(
        code.source(),
        "import Decimal from \"decimal.js\";\n\nconst pretium = new Decimal(\"0.10\");"
    );
}

#[test]
fn test_registry_call_uses_receiver_type() {
    let xs = Expr::ident("xs").with_type(SemanticType::lista(SemanticType::primitive("numerus")));
    let m = Expr::ident("m").with_type(SemanticType::tabula(
        SemanticType::primitive("textus"),
        SemanticType::primitive("numerus"),
    ));
    let code = lower(vec![
        Stmt::expr(Expr::method_call(xs, "vacua", vec![])),
        Stmt::expr(Expr::method_call(m, "vacua", vec![])),
    ]);
    assert_eq!(code.body, "(xs.length === 0);\n(m.size === 0);");
    assert!(code.features.contains(Features::LISTA | Features::TABULA));
}

#[test]
fn test_class_with_constructor_and_abstract_method() {
    let mut area = FunctionDecl::new("area", vec![], Block::new(vec![]))
        .returning(TypeExpr::named("numerus"));
    area.body = None;
    let class = stmt(StmtKind::Class(faber_ir::ClassDecl {
        name: "Figura".into(),
        type_params: vec![],
        implements: vec![],
        fields: vec![faber_ir::FieldDecl {
            name: "nomen".into(),
            ty: TypeExpr::named("textus"),
            init: Some(Expr::string("")),
        }],
        constructor: Some(Block::new(vec![Stmt::print(vec![Expr::string("creo")])])),
        methods: vec![
            area,
            FunctionDecl::new(
                "describe",
                vec![Param::new("x", Some(TypeExpr::named("numerus")))],
                Block::new(vec![Stmt::ret(Some(Expr::ident("x")))]),
            ),
        ],
    }));
    let expected = "\
abstract class Figura {
  nomen: string = \"\";
  constructor() {
    console.log(\"creo\");
  }
  abstract area(): number;
  describe(x: number) {
    return x;
  }
}";
    assert_eq!(source(vec![class]), expected);
}
