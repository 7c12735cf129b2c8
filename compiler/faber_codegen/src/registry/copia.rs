//! `copia` (unique set) vocabulary.

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

fn ts_size(c: &CallParts<'_>) -> String {
    format!("{}.size", c.receiver)
}
fn ts_empty(c: &CallParts<'_>) -> String {
    format!("({}.size === 0)", c.receiver)
}
fn ts_to_list(c: &CallParts<'_>) -> String {
    format!("[...{}]", c.receiver)
}

fn py_has(c: &CallParts<'_>) -> String {
    format!("({} in {})", c.arg(0), c.receiver)
}
fn py_len(c: &CallParts<'_>) -> String {
    format!("len({})", c.receiver)
}
fn py_empty(c: &CallParts<'_>) -> String {
    format!("(len({}) == 0)", c.receiver)
}
fn py_union(c: &CallParts<'_>) -> String {
    format!("({} | {})", c.receiver, c.arg(0))
}
fn py_intersection(c: &CallParts<'_>) -> String {
    format!("({} & {})", c.receiver, c.arg(0))
}
fn py_difference(c: &CallParts<'_>) -> String {
    format!("({} - {})", c.receiver, c.arg(0))
}
fn py_symmetric(c: &CallParts<'_>) -> String {
    format!("({} ^ {})", c.receiver, c.arg(0))
}
fn py_subset(c: &CallParts<'_>) -> String {
    format!("({} <= {})", c.receiver, c.arg(0))
}
fn py_superset(c: &CallParts<'_>) -> String {
    format!("({} >= {})", c.receiver, c.arg(0))
}
fn py_to_list(c: &CallParts<'_>) -> String {
    format!("list({})", c.receiver)
}

fn zig_add(c: &CallParts<'_>) -> String {
    format!("{}.put({}, {{}}) catch @panic(\"OOM\")", c.receiver, c.arg(0))
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

fn rs_has(c: &CallParts<'_>) -> String {
    format!("{}.contains(&{})", c.receiver, c.arg(0))
}
fn rs_delete(c: &CallParts<'_>) -> String {
    format!("{}.remove(&{})", c.receiver, c.arg(0))
}
fn rs_subset(c: &CallParts<'_>) -> String {
    format!("{}.is_subset(&{})", c.receiver, c.arg(0))
}
fn rs_superset(c: &CallParts<'_>) -> String {
    format!("{}.is_superset(&{})", c.receiver, c.arg(0))
}

fn cpp_add(c: &CallParts<'_>) -> String {
    format!("{}.insert({})", c.receiver, c.arg(0))
}

pub(super) const METHODS: &[MethodEntry] = &[
    entry(
        "adde",
        true,
        Rule::rename("add"),
        Rule::rename("add"),
        Rule::emit(zig_add),
        Rule::rename("insert"),
        Rule::emit(cpp_add),
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
        Rule::rename("discard"),
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
        "unio",
        false,
        Rule::rename("union"),
        Rule::emit(py_union),
        Rule::UNSUPPORTED,
        Rule::call_ref(Helper::CopiaUnio),
        Rule::call(Helper::CopiaUnio),
    ),
    entry(
        "intersectio",
        false,
        Rule::rename("intersection"),
        Rule::emit(py_intersection),
        Rule::UNSUPPORTED,
        Rule::call_ref(Helper::CopiaIntersectio),
        Rule::call(Helper::CopiaIntersectio),
    ),
    entry(
        "differentia",
        false,
        Rule::rename("difference"),
        Rule::emit(py_difference),
        Rule::UNSUPPORTED,
        Rule::call_ref(Helper::CopiaDifferentia),
        Rule::call(Helper::CopiaDifferentia),
    ),
    entry(
        "symmetrica",
        false,
        Rule::rename("symmetricDifference"),
        Rule::emit(py_symmetric),
        Rule::UNSUPPORTED,
        Rule::call_ref(Helper::CopiaSymmetrica),
        Rule::call(Helper::CopiaSymmetrica),
    ),
    entry(
        "subcopia",
        false,
        Rule::rename("isSubsetOf"),
        Rule::emit(py_subset),
        Rule::UNSUPPORTED,
        Rule::emit(rs_subset),
        Rule::call(Helper::CopiaSubcopia),
    ),
    entry(
        "supercopia",
        false,
        Rule::rename("isSupersetOf"),
        Rule::emit(py_superset),
        Rule::UNSUPPORTED,
        Rule::emit(rs_superset),
        Rule::call(Helper::CopiaSupercopia),
    ),
    entry(
        "inLista",
        false,
        Rule::emit(ts_to_list),
        Rule::emit(py_to_list),
        Rule::UNSUPPORTED,
        Rule::call_ref(Helper::CopiaInLista),
        Rule::call(Helper::CopiaInLista).with(Features::LISTA),
    ),
];
