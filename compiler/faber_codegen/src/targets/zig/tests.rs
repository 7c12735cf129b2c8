use faber_ir::{
    BinaryOp, Block, ComptimeBody, ElseBranch, Expr, ExprKind, ForKind, ForStmt, FunctionDecl,
    FunctionMode, IfStmt, MatchArm, MatchStmt, Param, Program, RaiseKind, ResourceKind,
    ResourceStmt, SemanticType, Span, Stmt, StmtKind, TemplatePart, TypeExpr, UnionDecl, Variant,
    VariantBinding, VariantField,
};
use pretty_assertions::assert_eq;

use crate::features::Features;
use crate::generator::GeneratedCode;
use crate::{CodegenError, CodegenTarget, GenerateOptions};

fn lower(body: Vec<Stmt>) -> GeneratedCode {
    match super::generate(&Program::new(body), &GenerateOptions::new(CodegenTarget::Zig)) {
        Ok(code) => code,
        Err(e) => panic!("generation failed: {e}"),
    }
}

fn fails(body: Vec<Stmt>) -> CodegenError {
    match super::generate(&Program::new(body), &GenerateOptions::new(CodegenTarget::Zig)) {
        Ok(code) => panic!("expected an error, got:\n{}", code.source()),
        Err(e) => e,
    }
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::DUMMY)
}

fn empty_lista() -> Expr {
    Expr::new(
        ExprKind::Native {
            expr: Box::new(Expr::array(vec![])),
            ty: TypeExpr::generic("lista", vec![TypeExpr::named("numerus")]),
        },
        Span::DUMMY,
    )
}

fn entry(body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Entry {
        is_async: false,
        body: Block::new(body),
    })
}

#[test]
fn test_mutable_binding_has_explicit_type() {
    let code = lower(vec![
        Stmt::varia("x", Expr::int(5)),
        Stmt::fixum("y", Expr::int(5)),
    ]);
    assert_eq!(code.body, "var x: i64 = 5;\nconst y = 5;");
    assert_eq!(code.preamble, "");
}

#[test]
fn test_mutated_fixum_becomes_var() {
    let code = lower(vec![
        Stmt::fixum("n", Expr::int(1)),
        Stmt::expr(Expr::assign(Expr::ident("n"), Expr::int(2))),
    ]);
    assert_eq!(code.body, "var n: i64 = 1;\nn = 2;");
}

#[test]
fn test_empty_native_list_uses_default_allocator_at_module_level() {
    let code = lower(vec![Stmt::fixum("xs", empty_lista())]);
    assert_eq!(
        code.source(),
        "const std = @import(\"std\");\n\nconst xs = std.ArrayList(i64).init(alloc);"
    );
    assert!(code.features.contains(Features::LISTA | Features::STD));
}

#[test]
fn test_arena_block_provides_handle() {
    let cura = stmt(StmtKind::Resource(ResourceStmt {
        kind: ResourceKind::Arena,
        binding: "mem".into(),
        body: Block::new(vec![Stmt::fixum("xs", empty_lista())]),
    }));
    let expected = "\
{
    var mem_arena = std.heap.ArenaAllocator.init(std.heap.page_allocator);
    defer mem_arena.deinit();
    const mem = mem_arena.allocator();
    const xs = std.ArrayList(i64).init(mem);
}";
    assert_eq!(lower(vec![cura]).body, expected);
}

#[test]
fn test_allocating_function_takes_allocator_parameter() {
    let fac = FunctionDecl::new("fac", vec![], Block::new(vec![Stmt::fixum("xs", empty_lista())]));
    let call = Stmt::expr(Expr::call(Expr::ident("fac"), vec![]));
    let expected = "\
fn fac(alloc: std.mem.Allocator) void {
    const xs = std.ArrayList(i64).init(alloc);
}
pub fn main() void {
    var gpa = std.heap.GeneralPurposeAllocator(.{}){};
    defer _ = gpa.deinit();
    const alloc = gpa.allocator();
    fac(alloc);
}";
    assert_eq!(lower(vec![Stmt::function(fac), entry(vec![call])]).body, expected);
}

#[test]
fn test_call_before_declaration_still_threads_allocator() {
    let fac = FunctionDecl::new("fac", vec![], Block::new(vec![Stmt::fixum("xs", empty_lista())]));
    let call = Stmt::expr(Expr::call(Expr::ident("fac"), vec![]));
    let body = lower(vec![entry(vec![call]), Stmt::function(fac)]).body;
    assert!(body.contains("    fac(alloc);"), "{body}");
    assert!(body.contains("fn fac(alloc: std.mem.Allocator) void {"), "{body}");
}

#[test]
fn test_raise_makes_function_fallible_and_callers_try() {
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
    let code = lower(vec![Stmt::function(quaere), Stmt::function(usa)]);
    let expected = "\
fn quaere(n: i64) !i64 {
    if (n < 0) {
        return error.NotFound;
    }
    return n;
}
fn usa() !i64 {
    return try quaere(1);
}";
    assert_eq!(code.body, expected);
    assert!(code.features.contains(Features::RAISE));
}

#[test]
fn test_fatal_raise_panics() {
    let decl = FunctionDecl::new(
        "mori",
        vec![],
        Block::new(vec![Stmt::raise(RaiseKind::Fatal, Expr::string("mors"))]),
    );
    assert_eq!(
        lower(vec![Stmt::function(decl)]).body,
        "fn mori() void {\n    @panic(\"mors\");\n}"
    );
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
    let err = fails(vec![Stmt::function(decl)]);
    assert_eq!(
        err,
        CodegenError::UnsupportedConstruct {
            construct: "cursor function `numeri`".to_string(),
            target: CodegenTarget::Zig,
        }
    );
}

#[test]
fn test_match_binds_payload_fields() {
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
const Figura = union(enum) {
    Circulus: struct { radius: f64 },
    Punctum: void,
};
switch (f) {
    .Circulus => |payload| {
        const r = payload.radius;
        std.debug.print(\"{any}\\n\", .{ r });
    },
    .Punctum => {},
}";
    assert_eq!(lower(vec![union, matched]).body, expected);
}

#[test]
fn test_range_loop_is_scoped_while() {
    let range = Expr::new(
        ExprKind::Range {
            start: Box::new(Expr::int(0)),
            end: Box::new(Expr::int(3)),
            step: None,
            inclusive: false,
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
    let expected = "\
{
    var i: i64 = 0;
    while (i < 3) : (i += 1) {
        std.debug.print(\"{any}\\n\", .{ i });
    }
}";
    assert_eq!(lower(vec![for_stmt]).body, expected);
}

#[test]
fn test_template_allocates_with_resource_handle() {
    let nomen = Expr::ident("nomen").with_type(SemanticType::primitive("textus"));
    let template = Expr::new(
        ExprKind::Template(vec![TemplatePart::Text("Salve ".into()), TemplatePart::Expr(nomen)]),
        Span::DUMMY,
    );
    let cura = stmt(StmtKind::Resource(ResourceStmt {
        kind: ResourceKind::Page,
        binding: "pa".into(),
        body: Block::new(vec![Stmt::fixum("s", template)]),
    }));
    let expected = "\
{
    const pa = std.heap.page_allocator;
    const s = std.fmt.allocPrint(pa, \"Salve {s}\", .{ nomen }) catch @panic(\"OOM\");
}";
    assert_eq!(lower(vec![cura]).body, expected);
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
    assert_eq!(code.body, "const n = comptime blk: {\n    break :blk 2 * 3;\n};");
    assert!(code.features.contains(Features::COMPTIME));
}

#[test]
fn test_string_equality_uses_mem_eql() {
    let a = Expr::ident("a").with_type(SemanticType::primitive("textus"));
    let cond = Expr::binary(BinaryOp::Eq, a, Expr::string("x"));
    let if_stmt = stmt(StmtKind::If(IfStmt {
        cond,
        then: Block::new(vec![]),
        otherwise: Some(ElseBranch::Block(Block::new(vec![]))),
    }));
    assert_eq!(
        lower(vec![if_stmt]).source(),
        "const std = @import(\"std\");\n\nif (std.mem.eql(u8, a, \"x\")) {\n} else {\n}"
    );
}

#[test]
fn test_integer_division_builtin() {
    let n = || Expr::ident("a").with_type(SemanticType::primitive("numerus"));
    let div = Expr::binary(BinaryOp::Div, n(), n());
    assert_eq!(lower(vec![Stmt::fixum("q", div)]).body, "const q = @divTrunc(a, a);");
}
