use faber_ir::{
    BinaryOp, Block, ClassDecl, Comment, ElseBranch, EnumDecl, EnumMember, Expr, ExprKind,
    FieldDecl, ForKind, ForStmt, FunctionDecl, FunctionMode, IfStmt, Literal, MatchArm, MatchStmt,
    Param, Program, RaiseKind, Span, Stmt, StmtKind, TemplatePart, TryStmt, TypeExpr, UnaryOp,
    UnionDecl, Variant, VariantBinding, VariantField,
};
use pretty_assertions::assert_eq;

use crate::generator::GeneratedCode;
use crate::{CodegenError, CodegenTarget, GenerateOptions};

fn lower(body: Vec<Stmt>) -> GeneratedCode {
    match super::generate(&Program::new(body), &GenerateOptions::new(CodegenTarget::Faber)) {
        Ok(code) => code,
        Err(e) => panic!("generation failed: {e}"),
    }
}

fn source(body: Vec<Stmt>) -> String {
    lower(body).source()
}

fn fails(body: Vec<Stmt>) -> CodegenError {
    match super::generate(&Program::new(body), &GenerateOptions::new(CodegenTarget::Faber)) {
        Ok(code) => panic!("expected an error, got:\n{}", code.source()),
        Err(e) => e,
    }
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::DUMMY)
}

fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::DUMMY)
}

#[test]
fn test_declarations_are_type_first_without_terminators() {
    let typed = stmt(StmtKind::Var(faber_ir::VarDecl {
        mutable: false,
        target: faber_ir::BindingTarget::Ident("nomen".into()),
        ty: Some(TypeExpr::named("textus")),
        init: Some(Expr::string("Marcus")),
    }));
    let code = lower(vec![
        Stmt::varia("x", Expr::int(5)),
        typed,
        Stmt::fixum("ok", Expr::bool(false)),
        Stmt::fixum("nil", Expr::nil()),
    ]);
    assert_eq!(
        code.body,
        "varia x = 5\nfixum textus nomen = \"Marcus\"\nfixum ok = falsum\nfixum nil = nihil"
    );
    assert_eq!(code.preamble, "");
    assert!(code.features.is_empty());
}

#[test]
fn test_collection_methods_are_not_translated() {
    let code = source(vec![Stmt::expr(Expr::method_call(
        Expr::ident("xs"),
        "adde",
        vec![Expr::int(1)],
    ))]);
    assert_eq!(code, "xs.adde(1)");
}

#[test]
fn test_function_modes_and_signature() {
    let decl = FunctionDecl::new(
        "numeri",
        vec![
            Param::new("n", Some(TypeExpr::named("numerus"))),
            Param {
                name: "reliqua".into(),
                ty: Some(TypeExpr::generic("lista", vec![TypeExpr::named("textus")])),
                default: None,
                rest: true,
            },
        ],
        Block::new(vec![Stmt::expr(Expr::cede(Expr::ident("n")))]),
    )
    .returning(TypeExpr::named("numerus"))
    .with_mode(FunctionMode::Generator);
    assert_eq!(
        source(vec![Stmt::function(decl)]),
        "cursor functio numeri(numerus n, ceteri lista<textus> reliqua) -> numerus {\n    cede n\n}"
    );
}

#[test]
fn test_empty_body_stays_braced() {
    let decl = FunctionDecl::new("vacua", vec![], Block::new(vec![])).with_mode(FunctionMode::Async);
    assert_eq!(source(vec![Stmt::function(decl)]), "futura functio vacua() {}");
}

#[test]
fn test_class_with_fields_constructor_and_methods() {
    let saluta = FunctionDecl::new(
        "saluta",
        vec![],
        Block::new(vec![Stmt::print(vec![Expr::member(
            expr(ExprKind::SelfRef),
            "nomen",
        )])]),
    );
    let class = ClassDecl {
        name: "Persona".into(),
        type_params: vec![],
        implements: vec!["Salutans".into()],
        fields: vec![
            FieldDecl {
                name: "nomen".into(),
                ty: TypeExpr::named("textus"),
                init: None,
            },
            FieldDecl {
                name: "aetas".into(),
                ty: TypeExpr::named("numerus"),
                init: Some(Expr::int(0)),
            },
        ],
        constructor: Some(Block::new(vec![Stmt::expr(Expr::assign(
            Expr::member(expr(ExprKind::SelfRef), "aetas"),
            Expr::int(1),
        ))])),
        methods: vec![saluta],
    };
    let expected = "\
genus Persona implet Salutans {
    textus nomen
    numerus aetas = 0
    creo {
        ego.aetas = 1
    }
    functio saluta() {
        scribe ego.nomen
    }
}";
    assert_eq!(source(vec![stmt(StmtKind::Class(class))]), expected);
}

#[test]
fn test_enum_and_union() {
    let ordo = EnumDecl {
        name: "Color".into(),
        members: vec![
            EnumMember {
                name: "rubrum".into(),
                value: None,
            },
            EnumMember {
                name: "viride".into(),
                value: Some(Literal::Integer(2)),
            },
        ],
    };
    let union = UnionDecl {
        name: "Forma".into(),
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
    };
    let expected = "\
ordo Color {
    rubrum,
    viride = 2,
}
discretio Forma {
    Circulus { fractus radius }
    Punctum
}";
    assert_eq!(
        source(vec![stmt(StmtKind::Enum(ordo)), stmt(StmtKind::Union(union))]),
        expected
    );
}

#[test]
fn test_if_chain_and_loops() {
    let chain = IfStmt {
        cond: Expr::binary(BinaryOp::Gt, Expr::ident("x"), Expr::int(0)),
        then: Block::new(vec![Stmt::print(vec![Expr::string("positivum")])]),
        otherwise: Some(ElseBranch::If(Box::new(IfStmt {
            cond: Expr::binary(BinaryOp::Lt, Expr::ident("x"), Expr::int(0)),
            then: Block::new(vec![Stmt::print(vec![Expr::string("negativum")])]),
            otherwise: Some(ElseBranch::Block(Block::new(vec![stmt(StmtKind::Break)]))),
        }))),
    };
    let keys = stmt(StmtKind::For(ForStmt {
        kind: ForKind::Keys,
        binding: "k".into(),
        iterable: Expr::ident("tab"),
        is_async: false,
        body: Block::new(vec![stmt(StmtKind::Continue)]),
    }));
    let expected = "\
si x > 0 {
    scribe \"positivum\"
} sin x < 0 {
    scribe \"negativum\"
} secus {
    rumpe
}
de tab pro k {
    perge
}";
    assert_eq!(source(vec![stmt(StmtKind::If(chain)), keys]), expected);
}

#[test]
fn test_match_and_try() {
    let discerne = MatchStmt {
        subject: Expr::ident("forma"),
        arms: vec![
            MatchArm {
                variant: "Circulus".into(),
                binding: VariantBinding::Fields(vec!["radius".into()]),
                body: Block::new(vec![Stmt::ret(Some(Expr::ident("radius")))]),
            },
            MatchArm {
                variant: "Punctum".into(),
                binding: VariantBinding::None,
                body: Block::new(vec![Stmt::ret(Some(Expr::int(0)))]),
            },
        ],
        default: None,
    };
    let tempta = TryStmt {
        body: Block::new(vec![Stmt::raise(RaiseKind::Error, Expr::string("malum"))]),
        catch: Some(faber_ir::CatchClause {
            param: "e".into(),
            body: Block::new(vec![Stmt::raise(RaiseKind::Fatal, Expr::ident("e"))]),
        }),
        finally: Some(Block::new(vec![])),
    };
    let expected = "\
discerne forma {
    casu Circulus pro radius {
        redde radius
    }
    casu Punctum {
        redde 0
    }
}
tempta {
    iace \"malum\"
} cape e {
    mori e
} demum {
}";
    assert_eq!(
        source(vec![stmt(StmtKind::Match(discerne)), stmt(StmtKind::Try(tempta))]),
        expected
    );
}

#[test]
fn test_operators_keep_faber_spelling() {
    let cond = Expr::binary(
        BinaryOp::And,
        expr(ExprKind::Unary {
            op: UnaryOp::Not,
            operand: Box::new(Expr::ident("a")),
        }),
        Expr::binary(BinaryOp::Coalesce, Expr::ident("b"), Expr::ident("c")),
    );
    assert_eq!(source(vec![Stmt::expr(cond)]), "non a et (b vel c)");

    let nulla = expr(ExprKind::Unary {
        op: UnaryOp::IsNull,
        operand: Box::new(Expr::ident("xs")),
    });
    assert_eq!(source(vec![Stmt::expr(nulla)]), "nulla xs");
}

#[test]
fn test_precedence_drives_parentheses() {
    let sum = Expr::binary(BinaryOp::Add, Expr::ident("a"), Expr::ident("b"));
    let chained = Expr::binary(BinaryOp::Add, sum.clone(), Expr::ident("c"));
    let grouped = Expr::binary(BinaryOp::Mul, sum.clone(), Expr::ident("c"));
    let right = Expr::binary(BinaryOp::Sub, Expr::ident("c"), sum);
    assert_eq!(
        source(vec![Stmt::expr(chained), Stmt::expr(grouped), Stmt::expr(right)]),
        "a + b + c\n(a + b) * c\nc - (a + b)"
    );
}

#[test]
fn test_template_and_range() {
    let template = expr(ExprKind::Template(vec![
        TemplatePart::Text("Salve, `".into()),
        TemplatePart::Expr(Expr::ident("nomen")),
    ]));
    let range = expr(ExprKind::Range {
        start: Box::new(Expr::int(10)),
        end: Box::new(Expr::int(0)),
        step: Some(Box::new(Expr::int(-2))),
        inclusive: true,
    });
    assert_eq!(
        source(vec![Stmt::fixum("t", template), Stmt::fixum("r", range)]),
        "fixum t = `Salve, \\`${nomen}`\nfixum r = 10 usque 0 per -2"
    );
}

#[test]
fn test_lambda_spread_and_new() {
    let lambda = Expr::lambda(
        vec![Param::new("x", Some(TypeExpr::named("numerus")))],
        Expr::binary(BinaryOp::Mul, Expr::ident("x"), Expr::int(2)),
    );
    let args = Expr::call(
        Expr::ident("f"),
        vec![expr(ExprKind::Spread(Box::new(Expr::ident("xs"))))],
    );
    let novum = expr(ExprKind::New {
        class: "Persona".into(),
        init: faber_ir::NewInit::Fields(vec![("nomen".into(), Expr::string("Iulia"))]),
    });
    assert_eq!(
        source(vec![
            Stmt::fixum("duplex", lambda),
            Stmt::expr(args),
            Stmt::fixum("p", novum),
        ]),
        "fixum duplex = pro numerus x: x * 2\nf(sparge xs)\nfixum p = novum Persona { nomen: \"Iulia\" }"
    );
}

#[test]
fn test_type_check_and_cast() {
    let check = expr(ExprKind::TypeCheck {
        expr: Box::new(Expr::ident("x")),
        ty: TypeExpr::named("textus"),
        negated: true,
    });
    let cast = expr(ExprKind::Cast {
        expr: Box::new(Expr::ident("y")),
        ty: TypeExpr::named("numerus").nullable(),
    });
    assert_eq!(
        source(vec![Stmt::expr(check), Stmt::expr(cast)]),
        "x non est textus\ny qua numerus?"
    );
}

#[test]
fn test_comments_use_hash() {
    let code = source(vec![Stmt::varia("x", Expr::int(1))
        .with_leading(Comment::line("initium"))
        .with_trailing(Comment::line("unus"))]);
    assert_eq!(code, "# initium\nvaria x = 1  # unus");
}

#[test]
fn test_stray_spread_is_rejected() {
    let err = fails(vec![Stmt::expr(expr(ExprKind::Spread(Box::new(Expr::ident(
        "xs",
    )))))]);
    assert!(matches!(err, CodegenError::UnknownNodeKind { .. }), "{err:?}");
}

#[test]
fn test_non_finite_float_is_rejected() {
    let err = fails(vec![Stmt::fixum("x", Expr::float(f64::NAN))]);
    assert!(matches!(err, CodegenError::UnsupportedConstruct { .. }), "{err:?}");
}
