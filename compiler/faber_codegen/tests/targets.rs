//! End-to-end tests through the public API.
//!
//! The per-target unit tests cover lowering rules in detail; these check
//! the dispatcher contract: one program, many targets, structured results
//! and error propagation.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use faber_ir::{
    Block, Expr, ExprKind, MatchArm, MatchStmt, Program, SemanticType, Span, Stmt, StmtKind,
    TypeExpr, UnionDecl, Variant, VariantBinding,
};
use faber_codegen::{
    generate, generate_code, generate_for, generate_many, CodegenError, CodegenTarget, Features,
    GenerateOptions,
};
use pretty_assertions::assert_eq;

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::DUMMY)
}

fn for_target(program: &Program, target: CodegenTarget) -> String {
    generate(program, &GenerateOptions::new(target)).unwrap()
}

#[test]
fn one_program_every_target() {
    let program = Program::new(vec![Stmt::varia("x", Expr::int(5))]);
    assert_eq!(for_target(&program, CodegenTarget::TypeScript), "let x = 5;");
    assert_eq!(for_target(&program, CodegenTarget::Python), "x = 5");
    assert_eq!(for_target(&program, CodegenTarget::Zig), "var x: i64 = 5;");
    assert_eq!(for_target(&program, CodegenTarget::Rust), "let mut x = 5;");
    assert_eq!(for_target(&program, CodegenTarget::Cpp), "auto x = 5;");
    assert_eq!(for_target(&program, CodegenTarget::Faber), "varia x = 5");
}

#[test]
fn default_target_is_typescript() {
    let program = Program::new(vec![Stmt::fixum("y", Expr::int(1))]);
    assert_eq!(
        generate(&program, &GenerateOptions::default()).unwrap(),
        "const y = 1;"
    );
}

#[test]
fn empty_program_is_empty_on_every_target() {
    for target in CodegenTarget::ALL {
        let code = generate_code(&Program::new(vec![]), &GenerateOptions::new(target)).unwrap();
        assert_eq!(code.source(), "", "{target}");
        assert!(code.features.is_empty(), "{target}");
    }
}

#[test]
fn zig_native_empty_list_pulls_std() {
    let native = Expr::new(
        ExprKind::Native {
            expr: Box::new(Expr::array(vec![])),
            ty: TypeExpr::generic("lista", vec![TypeExpr::named("numerus")]),
        },
        Span::DUMMY,
    );
    let code = generate_code(
        &Program::new(vec![Stmt::fixum("xs", native)]),
        &GenerateOptions::new(CodegenTarget::Zig),
    )
    .unwrap();
    assert_eq!(
        code.source(),
        "const std = @import(\"std\");\n\nconst xs = std.ArrayList(i64).init(alloc);"
    );
    assert!(code.features.contains(Features::LISTA | Features::STD));
}

#[test]
fn registry_dispatch_follows_receiver_type() {
    let xs = Expr::ident("xs").with_type(SemanticType::lista(SemanticType::primitive("numerus")));
    let m = Expr::ident("m").with_type(SemanticType::tabula(
        SemanticType::primitive("textus"),
        SemanticType::primitive("numerus"),
    ));
    let program = Program::new(vec![
        Stmt::expr(Expr::method_call(xs, "vacua", vec![])),
        Stmt::expr(Expr::method_call(m, "vacua", vec![])),
    ]);
    assert_eq!(
        for_target(&program, CodegenTarget::TypeScript),
        "(xs.length === 0);\n(m.size === 0);"
    );
}

#[test]
fn unresolved_receiver_falls_back_to_lista_unless_strict() {
    let program = Program::new(vec![Stmt::expr(Expr::method_call(
        Expr::ident("xs"),
        "adde",
        vec![Expr::int(1)],
    ))]);
    assert_eq!(for_target(&program, CodegenTarget::TypeScript), "xs.push(1);");

    let strict = GenerateOptions::new(CodegenTarget::TypeScript).with_strict_receiver_types(true);
    let err = generate(&program, &strict).unwrap_err();
    assert!(matches!(err, CodegenError::UnsupportedConstruct { .. }), "{err:?}");
}

#[test]
fn stray_spread_is_unknown_node_on_every_target() {
    let spread = Expr::new(ExprKind::Spread(Box::new(Expr::ident("xs"))), Span::DUMMY);
    let program = Program::new(vec![Stmt::expr(spread)]);
    for target in CodegenTarget::ALL {
        let err = generate(&program, &GenerateOptions::new(target)).unwrap_err();
        assert!(
            matches!(err, CodegenError::UnknownNodeKind { kind: "Spread", .. }),
            "{target}: {err:?}"
        );
    }
}

#[test]
fn cpp_match_is_reported_as_unimplemented() {
    let union = stmt(StmtKind::Union(UnionDecl {
        name: "Signum".into(),
        type_params: vec![],
        variants: vec![
            Variant {
                name: "Verum".into(),
                fields: vec![],
            },
            Variant {
                name: "Falsum".into(),
                fields: vec![],
            },
        ],
    }));
    let matched = stmt(StmtKind::Match(MatchStmt {
        subject: Expr::ident("s"),
        arms: vec![MatchArm {
            variant: "Verum".into(),
            binding: VariantBinding::None,
            body: Block::new(vec![]),
        }],
        default: None,
    }));
    let program = Program::new(vec![union, matched]);

    let code = generate_code(&program, &GenerateOptions::new(CodegenTarget::Cpp)).unwrap();
    assert!(code.body.contains("// UNIMPLEMENTED(discerne): s"), "{}", code.body);
    assert_eq!(code.unimplemented.len(), 1);
    assert_eq!(code.unimplemented[0].construct, "discerne");
    assert_eq!(code.unimplemented[0].target, CodegenTarget::Cpp);

    let ts = generate_code(&program, &GenerateOptions::new(CodegenTarget::TypeScript)).unwrap();
    assert!(ts.unimplemented.is_empty());
}

#[test]
fn target_names_resolve() {
    let program = Program::new(vec![Stmt::fixum("y", Expr::int(1))]);
    assert_eq!(generate_for(&program, "rs").unwrap(), "let y = 1;");
    assert_eq!(generate_for(&program, "py").unwrap(), "y = 1");
    assert_eq!(generate_for(&program, "C++").unwrap(), "const auto y = 1;");
    assert_eq!(
        generate_for(&program, "cobol"),
        Err(CodegenError::UnsupportedTarget {
            name: "cobol".into()
        })
    );
}

#[test]
fn custom_indent_is_honoured() {
    let program = Program::new(vec![stmt(StmtKind::While {
        cond: Expr::bool(true),
        body: Block::new(vec![stmt(StmtKind::Break)]),
    })]);
    let options = GenerateOptions::new(CodegenTarget::TypeScript).with_indent("\t");
    assert_eq!(
        generate(&program, &options).unwrap(),
        "while (true) {\n\tbreak;\n}"
    );
}

#[test]
fn generate_many_keeps_input_order_and_isolates_features() {
    let programs: Vec<Program> = (0..32)
        .map(|i| {
            if i % 2 == 0 {
                Program::new(vec![Stmt::varia("x", Expr::int(i))])
            } else {
                Program::new(vec![Stmt::raise(
                    faber_ir::RaiseKind::Fatal,
                    Expr::string("mors"),
                )])
            }
        })
        .collect();
    let results = generate_many(&programs, &GenerateOptions::new(CodegenTarget::TypeScript));
    assert_eq!(results.len(), programs.len());
    for (i, result) in results.into_iter().enumerate() {
        let source = result.unwrap();
        if i % 2 == 0 {
            assert_eq!(source, format!("let x = {i};"));
        } else {
            assert!(source.starts_with("class Panic extends Error {"), "{source}");
        }
    }
}
