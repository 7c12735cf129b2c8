use pretty_assertions::assert_eq;

use super::*;
use crate::GenerateOptions;

fn ctx(target: CodegenTarget) -> GenContext {
    GenContext::new(&GenerateOptions::new(target))
}

fn lower(
    ctx: &mut GenContext,
    ty: Option<&SemanticType>,
    method: &str,
    args: &[&str],
) -> CodegenResult<Option<String>> {
    let args: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
    lower_call(ctx, ty, method, "xs", &args, None)
}

const KINDS: [CollectionKind; 3] = [
    CollectionKind::Lista,
    CollectionKind::Tabula,
    CollectionKind::Copia,
];

#[test]
fn test_find_method() {
    assert!(find_method(CollectionKind::Lista, "adde").is_some());
    assert!(find_method(CollectionKind::Tabula, "pone").is_some());
    assert!(find_method(CollectionKind::Copia, "unio").is_some());
    assert!(find_method(CollectionKind::Copia, "pone").is_none());
    assert!(find_method(CollectionKind::Lista, "toString").is_none());
}

#[test]
fn test_method_names_unique_per_registry() {
    for kind in KINDS {
        let methods = methods_for(kind);
        for (i, a) in methods.iter().enumerate() {
            assert!(
                methods[i + 1..].iter().all(|b| b.name != a.name),
                "{kind}.{} registered twice",
                a.name
            );
        }
    }
}

#[test]
fn test_kind_from_type_name() {
    assert_eq!(CollectionKind::from_type_name("lista"), Some(CollectionKind::Lista));
    assert_eq!(CollectionKind::from_type_name("Map"), Some(CollectionKind::Tabula));
    assert_eq!(CollectionKind::from_type_name("HashSet"), Some(CollectionKind::Copia));
    assert_eq!(CollectionKind::from_type_name("textus"), None);
}

#[test]
fn test_vacua_disambiguated_by_receiver_type() {
    let mut ts = ctx(CodegenTarget::TypeScript);
    let lista = SemanticType::lista(SemanticType::primitive("numerus"));
    let tabula = SemanticType::tabula(
        SemanticType::primitive("textus"),
        SemanticType::primitive("numerus"),
    );
    let copia = SemanticType::copia(SemanticType::primitive("textus"));

    assert_eq!(
        lower(&mut ts, Some(&lista), "vacua", &[]).unwrap().as_deref(),
        Some("(xs.length === 0)")
    );
    assert_eq!(
        lower(&mut ts, Some(&tabula), "vacua", &[]).unwrap().as_deref(),
        Some("(xs.size === 0)")
    );
    assert_eq!(
        lower(&mut ts, Some(&copia), "vacua", &[]).unwrap().as_deref(),
        Some("(xs.size === 0)")
    );
}

#[test]
fn test_adde_differs_between_lista_and_copia() {
    let mut py = ctx(CodegenTarget::Python);
    let lista = SemanticType::lista(SemanticType::primitive("numerus"));
    let copia = SemanticType::copia(SemanticType::primitive("numerus"));
    assert_eq!(
        lower(&mut py, Some(&lista), "adde", &["1"]).unwrap().as_deref(),
        Some("xs.append(1)")
    );
    assert_eq!(
        lower(&mut py, Some(&copia), "adde", &["1"]).unwrap().as_deref(),
        Some("xs.add(1)")
    );
}

#[test]
fn test_unregistered_method_is_not_a_hit() {
    let mut ts = ctx(CodegenTarget::TypeScript);
    let lista = SemanticType::lista(SemanticType::primitive("numerus"));
    assert_eq!(lower(&mut ts, Some(&lista), "toString", &[]).unwrap(), None);
    assert!(ts.features().is_empty());
}

#[test]
fn test_non_container_receiver_is_not_a_hit() {
    let mut ts = ctx(CodegenTarget::TypeScript);
    let user = SemanticType::user("Acervus");
    assert_eq!(lower(&mut ts, Some(&user), "adde", &["1"]).unwrap(), None);
}

#[test]
fn test_unresolved_receiver_falls_back_to_lista() {
    let mut ts = ctx(CodegenTarget::TypeScript);
    assert_eq!(
        lower(&mut ts, None, "adde", &["1"]).unwrap().as_deref(),
        Some("xs.push(1)")
    );
    let unknown = SemanticType::unknown();
    assert_eq!(
        lower(&mut ts, Some(&unknown), "longitudo", &[]).unwrap().as_deref(),
        Some("xs.length")
    );
}

#[test]
fn test_strict_mode_rejects_unresolved_receiver() {
    let options = GenerateOptions::new(CodegenTarget::TypeScript).with_strict_receiver_types(true);
    let mut strict = GenContext::new(&options);
    let err = lower(&mut strict, None, "adde", &["1"]).unwrap_err();
    assert!(matches!(err, CodegenError::UnsupportedConstruct { .. }), "{err}");

    // Non-vocabulary calls still pass through.
    assert_eq!(lower(&mut strict, None, "toString", &[]).unwrap(), None);
}

#[test]
fn test_faber_emits_vocabulary_verbatim() {
    let mut fab = ctx(CodegenTarget::Faber);
    let lista = SemanticType::lista(SemanticType::primitive("numerus"));
    assert_eq!(lower(&mut fab, Some(&lista), "adde", &["1"]).unwrap(), None);
}

#[test]
fn test_unsupported_rule_names_registry_and_method() {
    let mut zig = ctx(CodegenTarget::Zig);
    let lista = SemanticType::lista(SemanticType::primitive("numerus"));
    let err = lower(&mut zig, Some(&lista), "filtrata", &["f"]).unwrap_err();
    assert_eq!(
        err,
        CodegenError::UnsupportedConstruct {
            construct: "lista.filtrata".to_string(),
            target: CodegenTarget::Zig,
        }
    );
}

#[test]
fn test_feature_and_helper_recorded() {
    let mut rs = ctx(CodegenTarget::Rust);
    let tabula = SemanticType::tabula(
        SemanticType::primitive("textus"),
        SemanticType::primitive("numerus"),
    );
    let code = lower(&mut rs, Some(&tabula), "conflata", &["other"]).unwrap();
    assert_eq!(code.as_deref(), Some("tabula_conflata(&xs, &other)"));
    assert!(rs.features().contains(Features::TABULA));
    assert_eq!(rs.features().helpers().collect::<Vec<_>>(), vec![Helper::TabulaConflata]);
}

#[test]
fn test_emit_with_helper_records_helper() {
    let mut rs = ctx(CodegenTarget::Rust);
    let lista = SemanticType::lista(SemanticType::primitive("numerus"));
    let code = lower(&mut rs, Some(&lista), "ultima", &["3"]).unwrap();
    assert_eq!(code.as_deref(), Some("lista_ultima(&xs, 3 as usize)"));
    assert_eq!(rs.features().helpers().collect::<Vec<_>>(), vec![Helper::ListaUltima]);
}

#[test]
fn test_requires_async_flips_async() {
    let mut ts = ctx(CodegenTarget::TypeScript);
    let lista = SemanticType::lista(SemanticType::generic(
        "promissum",
        vec![SemanticType::primitive("numerus")],
    ));
    let code = lower(&mut ts, Some(&lista), "omnia", &[]).unwrap();
    assert_eq!(code.as_deref(), Some("Promise.all(xs)"));
    assert!(ts.features().contains(Features::ASYNC | Features::LISTA));
}

#[test]
fn test_python_gather_needs_asyncio() {
    let mut py = ctx(CodegenTarget::Python);
    let lista = SemanticType::lista(SemanticType::generic(
        "promissum",
        vec![SemanticType::primitive("numerus")],
    ));
    let code = lower(&mut py, Some(&lista), "omnia", &[]).unwrap();
    assert_eq!(code.as_deref(), Some("asyncio.gather(*xs)"));
    assert!(py.features().contains(Features::ASYNC | Features::ASYNCIO));
}

#[test]
fn test_zig_allocating_rule_uses_resource_handle() {
    let mut zig = ctx(CodegenTarget::Zig);
    let lista = SemanticType::lista(SemanticType::primitive("numerus"));
    zig.push_resource("arena");
    let code = lower(&mut zig, Some(&lista), "coniunge", &["\", \""]).unwrap();
    assert_eq!(
        code.as_deref(),
        Some("std.mem.join(arena, \", \", xs.items) catch @panic(\"OOM\")")
    );
    zig.pop_resource();
}

#[test]
fn test_zig_allocating_rule_in_function_requests_allocator() {
    let mut zig = ctx(CodegenTarget::Zig);
    let lista = SemanticType::lista(SemanticType::primitive("numerus"));
    zig.swap_frame(crate::context::Frame::function(faber_ir::FunctionMode::Sync, false));
    let code = lower(&mut zig, Some(&lista), "coniunge", &["sep"]).unwrap();
    assert_eq!(
        code.as_deref(),
        Some("std.mem.join(alloc, sep, xs.items) catch @panic(\"OOM\")")
    );
    assert!(zig.frame.wants_allocator);
}

#[test]
fn test_zig_append_uses_managed_list() {
    let mut zig = ctx(CodegenTarget::Zig);
    let lista = SemanticType::lista(SemanticType::primitive("numerus"));
    let code = lower(&mut zig, Some(&lista), "adde", &["1"]).unwrap();
    assert_eq!(code.as_deref(), Some("xs.append(1) catch @panic(\"OOM\")"));
    assert!(!zig.frame.wants_allocator);
}

#[test]
fn test_zig_elem_type_in_contains() {
    let mut zig = ctx(CodegenTarget::Zig);
    let lista = SemanticType::lista(SemanticType::primitive("numerus"));
    let args = vec!["3".to_string()];
    let code = lower_call(&mut zig, Some(&lista), "continet", "xs", &args, Some("i64")).unwrap();
    assert_eq!(
        code.as_deref(),
        Some("(std.mem.indexOfScalar(i64, xs.items, 3) != null)")
    );
    let untyped = lower_call(&mut zig, Some(&lista), "continet", "xs", &args, None).unwrap();
    assert_eq!(
        untyped.as_deref(),
        Some("(std.mem.indexOfScalar(@TypeOf(xs.items[0]), xs.items, 3) != null)")
    );
}

#[test]
fn test_every_referenced_helper_is_defined() {
    let targets = [
        CodegenTarget::TypeScript,
        CodegenTarget::Python,
        CodegenTarget::Zig,
        CodegenTarget::Rust,
        CodegenTarget::Cpp,
    ];
    for kind in KINDS {
        for entry in methods_for(kind) {
            for target in targets {
                let Some(rule) = entry.rule(target) else {
                    continue;
                };
                if let Some(helper) = rule.required_helper() {
                    assert!(
                        helper.definition(target).is_some(),
                        "{kind}.{} on {target} uses {helper:?} with no definition",
                        entry.name
                    );
                }
            }
        }
    }
}

#[test]
fn test_mutating_entries() {
    assert!(find_method(CollectionKind::Lista, "adde").is_some_and(|m| m.mutates));
    assert!(find_method(CollectionKind::Lista, "addita").is_some_and(|m| !m.mutates));
    assert!(find_method(CollectionKind::Tabula, "pone").is_some_and(|m| m.mutates));
    assert!(find_method(CollectionKind::Copia, "unio").is_some_and(|m| !m.mutates));
}
