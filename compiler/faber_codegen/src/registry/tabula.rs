//! `tabula` (associative map) vocabulary.

use super::{CallParts, MethodEntry, Rule};
use crate::features::Features;
use crate::runtime::Helper;

const fn entry(
    name: &'static str,
    mutates: bool,
    ts: Rule,
    py: Rule,
    zig: Rule,
    rs: Rule,
    cpp: Rule,
) -> MethodEntry {
    MethodEntry {
        name,
        mutates,
        requires_async: false,
        ts,
        py,
        zig,
        rs,
        cpp,
    }
}

// TypeScript

fn ts_get_or(c: &CallParts<'_>) -> String {
    format!("({}.get({}) ?? {})", c.receiver, c.arg(0), c.arg(1))
}
fn ts_size(c: &CallParts<'_>) -> String {
    format!("{}.size", c.receiver)
}
fn ts_empty(c: &CallParts<'_>) -> String {
    format!("({}.size === 0)", c.receiver)
}
fn ts_keys(c: &CallParts<'_>) -> String {
    format!("[...{}.keys()]", c.receiver)
}
fn ts_values(c: &CallParts<'_>) -> String {
    format!("[...{}.values()]", c.receiver)
}
fn ts_entries(c: &CallParts<'_>) -> String {
    format!("[...{}.entries()]", c.receiver)
}
fn ts_merged(c: &CallParts<'_>) -> String {
    format!("new Map([...{}, ...{}])", c.receiver, c.arg(0))
}
fn ts_inverted(c: &CallParts<'_>) -> String {
    format!("new Map([...{}].map(([k, v]) => [v, k]))", c.receiver)
}
fn ts_picked(c: &CallParts<'_>) -> String {
    format!(
        "new Map([...{}].filter(([k]) => {}.includes(k)))",
        c.receiver,
        c.arg(0)
    )
}
fn ts_omitted(c: &CallParts<'_>) -> String {
    format!(
        "new Map([...{}].filter(([k]) => !{}.includes(k)))",
        c.receiver,
        c.arg(0)
    )
}

// Python

fn py_put(c: &CallParts<'_>) -> String {
    format!("{}[{}] = {}", c.receiver, c.arg(0), c.arg(1))
}
fn py_get_or(c: &CallParts<'_>) -> String {
    format!("{}.get({}, {})", c.receiver, c.arg(0), c.arg(1))
}
fn py_has(c: &CallParts<'_>) -> String {
    format!("({} in {})", c.arg(0), c.receiver)
}
fn py_delete(c: &CallParts<'_>) -> String {
    format!("{}.pop({}, None)", c.receiver, c.arg(0))
}
fn py_len(c: &CallParts<'_>) -> String {
    format!("len({})", c.receiver)
}
fn py_empty(c: &CallParts<'_>) -> String {
    format!("(len({}) == 0)", c.receiver)
}
fn py_keys(c: &CallParts<'_>) -> String {
    format!("list({}.keys())", c.receiver)
}
fn py_values(c: &CallParts<'_>) -> String {
    format!("list({}.values())", c.receiver)
}
fn py_items(c: &CallParts<'_>) -> String {
    format!("list({}.items())", c.receiver)
}
fn py_merged(c: &CallParts<'_>) -> String {
    format!("{{**{}, **{}}}", c.receiver, c.arg(0))
}
fn py_inverted(c: &CallParts<'_>) -> String {
    format!("{{v: k for k, v in {}.items()}}", c.receiver)
}
fn py_picked(c: &CallParts<'_>) -> String {
    format!(
        "{{k: v for k, v in {}.items() if k in {}}}",
        c.receiver,
        c.arg(0)
    )
}
fn py_omitted(c: &CallParts<'_>) -> String {
    format!(
        "{{k: v for k, v in {}.items() if k not in {}}}",
        c.receiver,
        c.arg(0)
    )
}

// Zig

fn zig_put(c: &CallParts<'_>) -> String {
    format!("{}.put({}, {}) catch @panic(\"OOM\")", c.receiver, c.arg(0), c.arg(1))
}
fn zig_get_or(c: &CallParts<'_>) -> String {
    format!("({}.get({}) orelse {})", c.receiver, c.arg(0), c.arg(1))
}
fn zig_delete(c: &CallParts<'_>) -> String {
    format!("_ = {}.remove({})", c.receiver, c.arg(0))
}
fn zig_len(c: &CallParts<'_>) -> String {
    format!("{}.count()", c.receiver)
}
fn zig_empty(c: &CallParts<'_>) -> String {
    format!("({}.count() == 0)", c.receiver)
}
fn zig_clear(c: &CallParts<'_>) -> String {
    format!("{}.clearRetainingCapacity()", c.receiver)
}
fn zig_keys(c: &CallParts<'_>) -> String {
    format!("{}.keyIterator()", c.receiver)
}
fn zig_values(c: &CallParts<'_>) -> String {
    format!("{}.valueIterator()", c.receiver)
}
fn zig_entries(c: &CallParts<'_>) -> String {
    format!("{}.iterator()", c.receiver)
}

// Rust

fn rs_put(c: &CallParts<'_>) -> String {
    format!("{}.insert({}, {})", c.receiver, c.arg(0), c.arg(1))
}
fn rs_get(c: &CallParts<'_>) -> String {
    format!("{}.get(&{}).cloned()", c.receiver, c.arg(0))
}
fn rs_get_or(c: &CallParts<'_>) -> String {
    format!("{}.get(&{}).cloned().unwrap_or({})", c.receiver, c.arg(0), c.arg(1))
}
fn rs_has(c: &CallParts<'_>) -> String {
    format!("{}.contains_key(&{})", c.receiver, c.arg(0))
}
fn rs_delete(c: &CallParts<'_>) -> String {
    format!("{}.remove(&{})", c.receiver, c.arg(0))
}
fn rs_keys(c: &CallParts<'_>) -> String {
    format!("{}.keys().cloned().collect::<Vec<_>>()", c.receiver)
}
fn rs_values(c: &CallParts<'_>) -> String {
    format!("{}.values().cloned().collect::<Vec<_>>()", c.receiver)
}
fn rs_picked(c: &CallParts<'_>) -> String {
    format!("tabula_selecta(&{}, &{})", c.receiver, c.arg(0))
}
fn rs_omitted(c: &CallParts<'_>) -> String {
    format!("tabula_omissa(&{}, &{})", c.receiver, c.arg(0))
}

// C++

fn cpp_put(c: &CallParts<'_>) -> String {
    format!("{}[{}] = {}", c.receiver, c.arg(0), c.arg(1))
}
fn cpp_get_or(c: &CallParts<'_>) -> String {
    format!(
        "({r}.contains({k}) ? {r}.at({k}) : {})",
        c.arg(1),
        r = c.receiver,
        k = c.arg(0)
    )
}
fn cpp_keys(c: &CallParts<'_>) -> String {
    format!("({} | std::views::keys | std::ranges::to<std::vector>())", c.receiver)
}
fn cpp_values(c: &CallParts<'_>) -> String {
    format!("({} | std::views::values | std::ranges::to<std::vector>())", c.receiver)
}

pub(super) const METHODS: &[MethodEntry] = &[
    entry(
        "pone",
        true,
        Rule::rename("set"),
        Rule::emit(py_put),
        Rule::emit(zig_put),
        Rule::emit(rs_put),
        Rule::emit(cpp_put),
    ),
    entry(
        "accipe",
        false,
        Rule::rename("get"),
        Rule::rename("get"),
        Rule::rename("get"),
        Rule::emit(rs_get),
        Rule::rename("at"),
    ),
    entry(
        "accipeAut",
        false,
        Rule::emit(ts_get_or),
        Rule::emit(py_get_or),
        Rule::emit(zig_get_or),
        Rule::emit(rs_get_or),
        Rule::emit(cpp_get_or),
    ),
    entry(
        "habet",
        false,
        Rule::rename("has"),
        Rule::emit(py_has),
        Rule::rename("contains"),
        Rule::emit(rs_has),
        Rule::rename("contains"),
    ),
    entry(
        "dele",
        true,
        Rule::rename("delete"),
        Rule::emit(py_delete),
        Rule::emit(zig_delete),
        Rule::emit(rs_delete),
        Rule::rename("erase"),
    ),
    entry(
        "longitudo",
        false,
        Rule::emit(ts_size),
        Rule::emit(py_len),
        Rule::emit(zig_len),
        Rule::rename("len"),
        Rule::rename("size"),
    ),
    entry(
        "vacua",
        false,
        Rule::emit(ts_empty),
        Rule::emit(py_empty),
        Rule::emit(zig_empty),
        Rule::rename("is_empty"),
        Rule::rename("empty"),
    ),
    entry(
        "purga",
        true,
        Rule::rename("clear"),
        Rule::rename("clear"),
        Rule::emit(zig_clear),
        Rule::rename("clear"),
        Rule::rename("clear"),
    ),
    entry(
        "claves",
        false,
        Rule::emit(ts_keys),
        Rule::emit(py_keys),
        Rule::emit(zig_keys),
        Rule::emit(rs_keys),
        Rule::emit(cpp_keys).with(Features::RANGES.union(Features::LISTA)),
    ),
    entry(
        "valores",
        false,
        Rule::emit(ts_values),
        Rule::emit(py_values),
        Rule::emit(zig_values),
        Rule::emit(rs_values),
        Rule::emit(cpp_values).with(Features::RANGES.union(Features::LISTA)),
    ),
    entry(
        "paria",
        false,
        Rule::emit(ts_entries),
        Rule::emit(py_items),
        Rule::emit(zig_entries),
        Rule::call_ref(Helper::TabulaInLista),
        Rule::call(Helper::TabulaInLista).with(Features::LISTA),
    ),
    entry(
        "conflata",
        false,
        Rule::emit(ts_merged),
        Rule::emit(py_merged),
        Rule::UNSUPPORTED,
        Rule::call_ref(Helper::TabulaConflata),
        Rule::call(Helper::TabulaConflata),
    ),
    entry(
        "inversa",
        false,
        Rule::emit(ts_inverted),
        Rule::emit(py_inverted),
        Rule::UNSUPPORTED,
        Rule::call_ref(Helper::TabulaInversa),
        Rule::call(Helper::TabulaInversa),
    ),
    entry(
        "selecta",
        false,
        Rule::emit(ts_picked),
        Rule::emit(py_picked),
        Rule::UNSUPPORTED,
        Rule::emit(rs_picked).needs(Helper::TabulaSelecta),
        Rule::call(Helper::TabulaSelecta).with(Features::COPIA.union(Features::LISTA)),
    ),
    entry(
        "omissa",
        false,
        Rule::emit(ts_omitted),
        Rule::emit(py_omitted),
        Rule::UNSUPPORTED,
        Rule::emit(rs_omitted).needs(Helper::TabulaOmissa),
        Rule::call(Helper::TabulaOmissa).with(Features::COPIA.union(Features::LISTA)),
    ),
    entry(
        "inLista",
        false,
        Rule::emit(ts_entries),
        Rule::emit(py_items),
        Rule::UNSUPPORTED,
        Rule::call_ref(Helper::TabulaInLista),
        Rule::call(Helper::TabulaInLista).with(Features::LISTA),
    ),
];
