use super::*;
use faber_ir::{Stmt, TypeExpr, UnionDecl, Variant, VariantField};

fn ctx(target: CodegenTarget) -> GenContext {
    GenContext::new(&GenerateOptions::new(target))
}

#[test]
fn test_indent_dedent() {
    let mut ctx = ctx(CodegenTarget::Python);
    assert_eq!(ctx.line("x"), "x");
    ctx.indent();
    ctx.indent();
    assert_eq!(ctx.line("x"), "        x");
    ctx.dedent();
    assert_eq!(ctx.depth(), 1);
    ctx.dedent();
    assert_eq!(ctx.depth(), 0);
}

#[test]
fn test_stmt_line_terminator() {
    let mut ts = ctx(CodegenTarget::TypeScript);
    ts.indent();
    assert_eq!(ts.stmt_line("f()"), "  f();");

    let py = ctx(CodegenTarget::Python);
    assert_eq!(py.stmt_line("f()"), "f()");
}

#[test]
fn test_alloc_handle_prefers_innermost_resource() {
    let mut ctx = ctx(CodegenTarget::Zig);
    ctx.push_resource("arena");
    ctx.push_resource("scratch");
    assert_eq!(ctx.alloc_handle(), "scratch");
    ctx.pop_resource();
    assert_eq!(ctx.alloc_handle(), "arena");
    ctx.pop_resource();
    assert_eq!(ctx.current_resource(), None);
}

#[test]
fn test_alloc_handle_marks_function_frame() {
    let mut ctx = ctx(CodegenTarget::Zig);
    assert_eq!(ctx.alloc_handle(), DEFAULT_ALLOCATOR);
    assert!(!ctx.frame.wants_allocator);

    let saved = ctx.swap_frame(Frame::function(FunctionMode::Sync, false));
    assert_eq!(ctx.alloc_handle(), DEFAULT_ALLOCATOR);
    let inner = ctx.swap_frame(saved);
    assert!(inner.wants_allocator);
    assert!(!ctx.frame.in_function);
}

#[test]
fn test_fresh_label() {
    let mut ctx = ctx(CodegenTarget::Zig);
    assert_eq!(ctx.fresh_label("blk"), "blk");
    assert_eq!(ctx.fresh_label("blk"), "blk1");
    assert_eq!(ctx.fresh_label("blk"), "blk2");
}

#[test]
fn test_generator_flag_follows_frame() {
    let mut ctx = ctx(CodegenTarget::TypeScript);
    assert!(!ctx.in_generator());
    let saved = ctx.swap_frame(Frame::function(FunctionMode::AsyncGenerator, false));
    assert!(ctx.in_generator());
    assert!(ctx.in_async());
    ctx.swap_frame(saved);
    assert!(!ctx.in_generator());
}

#[test]
fn test_collect_declarations() {
    let union = UnionDecl {
        name: "Figura".into(),
        type_params: Vec::new(),
        variants: vec![Variant {
            name: "Circulus".into(),
            fields: vec![VariantField {
                name: "radius".into(),
                ty: TypeExpr::named("fractus"),
            }],
        }],
    };
    let program = Program::new(vec![Stmt::new(StmtKind::Union(union), Span::DUMMY)]);
    let mut ctx = ctx(CodegenTarget::Rust);
    ctx.collect_declarations(&program);
    let Some(info) = ctx.variant("Circulus") else {
        panic!("variant should be collected");
    };
    assert_eq!(info.union, "Figura");
    assert_eq!(info.fields, vec!["radius"]);
    assert!(ctx.variant("Quadratum").is_none());
}

#[test]
fn test_unimplemented_markers() {
    let mut ctx = ctx(CodegenTarget::Cpp);
    ctx.mark_unimplemented("discerne", Span::new(3, 9));
    let markers = ctx.take_unimplemented();
    assert_eq!(
        markers,
        vec![Unimplemented {
            construct: "discerne",
            target: CodegenTarget::Cpp,
            span: Span::new(3, 9),
        }]
    );
    assert!(ctx.take_unimplemented().is_empty());
}
