//! `lista` (ordered sequence) vocabulary.

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

fn zig_elem(c: &CallParts<'_>) -> String {
    c.elem
        .map_or_else(|| format!("@TypeOf({}.items[0])", c.receiver), str::to_string)
}

// TypeScript

fn ts_add_copy(c: &CallParts<'_>) -> String {
    format!("[...{}, {}]", c.receiver, c.arg(0))
}
fn ts_prepend_copy(c: &CallParts<'_>) -> String {
    format!("[{}, ...{}]", c.arg(0), c.receiver)
}
fn ts_clear(c: &CallParts<'_>) -> String {
    format!("{}.length = 0", c.receiver)
}
fn ts_first(c: &CallParts<'_>) -> String {
    format!("{}[0]", c.receiver)
}
fn ts_last(c: &CallParts<'_>) -> String {
    format!("{}.at(-1)", c.receiver)
}
fn ts_index(c: &CallParts<'_>) -> String {
    format!("{}[{}]", c.receiver, c.arg(0))
}
fn ts_length(c: &CallParts<'_>) -> String {
    format!("{}.length", c.receiver)
}
fn ts_empty(c: &CallParts<'_>) -> String {
    format!("({}.length === 0)", c.receiver)
}
fn ts_sorted(c: &CallParts<'_>) -> String {
    format!("[...{}].sort({})", c.receiver, c.joined())
}
fn ts_reversed(c: &CallParts<'_>) -> String {
    format!("[...{}].reverse()", c.receiver)
}
fn ts_unique(c: &CallParts<'_>) -> String {
    format!("[...new Set({})]", c.receiver)
}
fn ts_take(c: &CallParts<'_>) -> String {
    format!("{}.slice(0, {})", c.receiver, c.arg(0))
}
fn ts_take_last(c: &CallParts<'_>) -> String {
    format!("{}.slice(-{})", c.receiver, c.arg(0))
}
fn ts_sum(c: &CallParts<'_>) -> String {
    format!("{}.reduce((a, b) => a + b, 0)", c.receiver)
}
fn ts_group(c: &CallParts<'_>) -> String {
    format!("Map.groupBy({}, {})", c.receiver, c.arg(0))
}
fn ts_all(c: &CallParts<'_>) -> String {
    format!("Promise.all({})", c.receiver)
}

// Python

fn py_add_copy(c: &CallParts<'_>) -> String {
    format!("[*{}, {}]", c.receiver, c.arg(0))
}
fn py_prepend(c: &CallParts<'_>) -> String {
    format!("{}.insert(0, {})", c.receiver, c.arg(0))
}
fn py_prepend_copy(c: &CallParts<'_>) -> String {
    format!("[{}, *{}]", c.arg(0), c.receiver)
}
fn py_pop_front(c: &CallParts<'_>) -> String {
    format!("{}.pop(0)", c.receiver)
}
fn py_first(c: &CallParts<'_>) -> String {
    format!("{}[0]", c.receiver)
}
fn py_last(c: &CallParts<'_>) -> String {
    format!("{}[-1]", c.receiver)
}
fn py_index(c: &CallParts<'_>) -> String {
    format!("{}[{}]", c.receiver, c.arg(0))
}
fn py_len(c: &CallParts<'_>) -> String {
    format!("len({})", c.receiver)
}
fn py_empty(c: &CallParts<'_>) -> String {
    format!("(len({}) == 0)", c.receiver)
}
fn py_contains(c: &CallParts<'_>) -> String {
    format!("({} in {})", c.arg(0), c.receiver)
}
fn py_find(c: &CallParts<'_>) -> String {
    format!("next(filter({}, {}), None)", c.arg(0), c.receiver)
}
fn py_find_index(c: &CallParts<'_>) -> String {
    format!(
        "next((i for i, x in enumerate({}) if ({})(x)), -1)",
        c.receiver,
        c.arg(0)
    )
}
fn py_filter(c: &CallParts<'_>) -> String {
    format!("list(filter({}, {}))", c.arg(0), c.receiver)
}
fn py_map(c: &CallParts<'_>) -> String {
    format!("list(map({}, {}))", c.arg(0), c.receiver)
}
fn py_reduce(c: &CallParts<'_>) -> String {
    if c.args.len() > 1 {
        format!("functools.reduce({}, {}, {})", c.arg(0), c.receiver, c.arg(1))
    } else {
        format!("functools.reduce({}, {})", c.arg(0), c.receiver)
    }
}
fn py_every(c: &CallParts<'_>) -> String {
    format!("all(map({}, {}))", c.arg(0), c.receiver)
}
fn py_some(c: &CallParts<'_>) -> String {
    format!("any(map({}, {}))", c.arg(0), c.receiver)
}
fn py_sort(c: &CallParts<'_>) -> String {
    if c.args.is_empty() {
        format!("{}.sort()", c.receiver)
    } else {
        format!("{}.sort(key=functools.cmp_to_key({}))", c.receiver, c.arg(0))
    }
}
fn py_sorted(c: &CallParts<'_>) -> String {
    format!("sorted({})", c.receiver)
}
fn py_reversed(c: &CallParts<'_>) -> String {
    format!("list(reversed({}))", c.receiver)
}
fn py_unique(c: &CallParts<'_>) -> String {
    format!("list(dict.fromkeys({}))", c.receiver)
}
fn py_join(c: &CallParts<'_>) -> String {
    format!("{}.join(map(str, {}))", c.arg(0), c.receiver)
}
fn py_slice(c: &CallParts<'_>) -> String {
    format!("{}[{}:{}]", c.receiver, c.arg(0), c.arg(1))
}
fn py_take(c: &CallParts<'_>) -> String {
    format!("{}[:{}]", c.receiver, c.arg(0))
}
fn py_take_last(c: &CallParts<'_>) -> String {
    format!("{}[-{}:]", c.receiver, c.arg(0))
}
fn py_sum(c: &CallParts<'_>) -> String {
    format!("sum({})", c.receiver)
}
fn py_all(c: &CallParts<'_>) -> String {
    format!("asyncio.gather(*{})", c.receiver)
}

// Zig

fn zig_append(c: &CallParts<'_>) -> String {
    format!("{}.append({}) catch @panic(\"OOM\")", c.receiver, c.arg(0))
}
fn zig_prepend(c: &CallParts<'_>) -> String {
    format!("{}.insert(0, {}) catch @panic(\"OOM\")", c.receiver, c.arg(0))
}
fn zig_pop_front(c: &CallParts<'_>) -> String {
    format!("{}.orderedRemove(0)", c.receiver)
}
fn zig_clear(c: &CallParts<'_>) -> String {
    format!("{}.clearRetainingCapacity()", c.receiver)
}
fn zig_first(c: &CallParts<'_>) -> String {
    format!("{}.items[0]", c.receiver)
}
fn zig_last(c: &CallParts<'_>) -> String {
    format!("{r}.items[{r}.items.len - 1]", r = c.receiver)
}
fn zig_index(c: &CallParts<'_>) -> String {
    format!("{}.items[@intCast({})]", c.receiver, c.arg(0))
}
fn zig_len(c: &CallParts<'_>) -> String {
    format!("{}.items.len", c.receiver)
}
fn zig_empty(c: &CallParts<'_>) -> String {
    format!("({}.items.len == 0)", c.receiver)
}
fn zig_contains(c: &CallParts<'_>) -> String {
    format!(
        "(std.mem.indexOfScalar({}, {}.items, {}) != null)",
        zig_elem(c),
        c.receiver,
        c.arg(0)
    )
}
fn zig_index_of(c: &CallParts<'_>) -> String {
    format!(
        "std.mem.indexOfScalar({}, {}.items, {})",
        zig_elem(c),
        c.receiver,
        c.arg(0)
    )
}
fn zig_sort(c: &CallParts<'_>) -> String {
    let elem = zig_elem(c);
    format!("std.mem.sort({elem}, {}.items, {{}}, std.sort.asc({elem}))", c.receiver)
}
fn zig_join(c: &CallParts<'_>) -> String {
    format!(
        "std.mem.join({}, {}, {}.items) catch @panic(\"OOM\")",
        c.handle,
        c.arg(0),
        c.receiver
    )
}
fn zig_slice(c: &CallParts<'_>) -> String {
    format!("{}.items[@intCast({})..@intCast({})]", c.receiver, c.arg(0), c.arg(1))
}
fn zig_take(c: &CallParts<'_>) -> String {
    format!("{}.items[0..@intCast({})]", c.receiver, c.arg(0))
}
fn zig_take_last(c: &CallParts<'_>) -> String {
    format!("{r}.items[{r}.items.len - @as(usize, @intCast({n}))..]", r = c.receiver, n = c.arg(0))
}

// Rust

fn rs_prepend(c: &CallParts<'_>) -> String {
    format!("{}.insert(0, {})", c.receiver, c.arg(0))
}
fn rs_pop_front(c: &CallParts<'_>) -> String {
    format!("{}.remove(0)", c.receiver)
}
fn rs_first(c: &CallParts<'_>) -> String {
    format!("{}.first().cloned()", c.receiver)
}
fn rs_last(c: &CallParts<'_>) -> String {
    format!("{}.last().cloned()", c.receiver)
}
fn rs_index(c: &CallParts<'_>) -> String {
    format!("{}[{} as usize]", c.receiver, c.arg(0))
}
fn rs_contains(c: &CallParts<'_>) -> String {
    format!("{}.contains(&{})", c.receiver, c.arg(0))
}
fn rs_index_of(c: &CallParts<'_>) -> String {
    format!("{}.iter().position(|e| *e == {})", c.receiver, c.arg(0))
}
fn rs_find(c: &CallParts<'_>) -> String {
    format!("{}.iter().find({}).cloned()", c.receiver, c.arg(0))
}
fn rs_find_index(c: &CallParts<'_>) -> String {
    format!("{}.iter().position({})", c.receiver, c.arg(0))
}
fn rs_filter(c: &CallParts<'_>) -> String {
    format!("{}.iter().filter({}).cloned().collect::<Vec<_>>()", c.receiver, c.arg(0))
}
fn rs_map(c: &CallParts<'_>) -> String {
    format!("{}.iter().map({}).collect::<Vec<_>>()", c.receiver, c.arg(0))
}
fn rs_reduce(c: &CallParts<'_>) -> String {
    format!("{}.iter().fold({}, {})", c.receiver, c.arg(1), c.arg(0))
}
fn rs_every(c: &CallParts<'_>) -> String {
    format!("{}.iter().all({})", c.receiver, c.arg(0))
}
fn rs_some(c: &CallParts<'_>) -> String {
    format!("{}.iter().any({})", c.receiver, c.arg(0))
}
fn rs_sort(c: &CallParts<'_>) -> String {
    if c.args.is_empty() {
        format!("{}.sort()", c.receiver)
    } else {
        format!("{}.sort_by({})", c.receiver, c.arg(0))
    }
}
fn rs_reversed(c: &CallParts<'_>) -> String {
    format!("{}.iter().rev().cloned().collect::<Vec<_>>()", c.receiver)
}
fn rs_join(c: &CallParts<'_>) -> String {
    format!(
        "{}.iter().map(|x| x.to_string()).collect::<Vec<_>>().join({})",
        c.receiver,
        c.arg(0)
    )
}
fn rs_slice(c: &CallParts<'_>) -> String {
    format!("{}[{} as usize..{} as usize].to_vec()", c.receiver, c.arg(0), c.arg(1))
}
fn rs_take(c: &CallParts<'_>) -> String {
    format!("{}.iter().take({} as usize).cloned().collect::<Vec<_>>()", c.receiver, c.arg(0))
}
fn rs_take_last(c: &CallParts<'_>) -> String {
    format!("lista_ultima(&{}, {} as usize)", c.receiver, c.arg(0))
}
fn rs_sum(c: &CallParts<'_>) -> String {
    format!("{}.iter().sum::<{}>()", c.receiver, c.elem.unwrap_or("i64"))
}
fn rs_chunks(c: &CallParts<'_>) -> String {
    format!(
        "{}.chunks({} as usize).map(|c| c.to_vec()).collect::<Vec<_>>()",
        c.receiver,
        c.arg(0)
    )
}
fn rs_group(c: &CallParts<'_>) -> String {
    format!("lista_congrega(&{}, {})", c.receiver, c.arg(0))
}
fn rs_partition(c: &CallParts<'_>) -> String {
    format!("lista_partire(&{}, {})", c.receiver, c.arg(0))
}
fn rs_add_copy(c: &CallParts<'_>) -> String {
    format!("lista_addita(&{}, {})", c.receiver, c.arg(0))
}
fn rs_prepend_copy(c: &CallParts<'_>) -> String {
    format!("lista_praeposita(&{}, {})", c.receiver, c.arg(0))
}
fn rs_all(c: &CallParts<'_>) -> String {
    format!("futures::future::join_all({})", c.receiver)
}

// C++

fn cpp_prepend(c: &CallParts<'_>) -> String {
    format!("{r}.insert({r}.begin(), {})", c.arg(0), r = c.receiver)
}
fn cpp_index(c: &CallParts<'_>) -> String {
    format!("{}.at({})", c.receiver, c.arg(0))
}
fn cpp_contains(c: &CallParts<'_>) -> String {
    format!("(std::ranges::find({r}, {}) != {r}.end())", c.arg(0), r = c.receiver)
}
fn cpp_find(c: &CallParts<'_>) -> String {
    format!("*std::ranges::find_if({}, {})", c.receiver, c.arg(0))
}
fn cpp_filter(c: &CallParts<'_>) -> String {
    format!(
        "({} | std::views::filter({}) | std::ranges::to<std::vector>())",
        c.receiver,
        c.arg(0)
    )
}
fn cpp_map(c: &CallParts<'_>) -> String {
    format!(
        "({} | std::views::transform({}) | std::ranges::to<std::vector>())",
        c.receiver,
        c.arg(0)
    )
}
fn cpp_reduce(c: &CallParts<'_>) -> String {
    format!(
        "std::accumulate({r}.begin(), {r}.end(), {}, {})",
        c.arg(1),
        c.arg(0),
        r = c.receiver
    )
}
fn cpp_every(c: &CallParts<'_>) -> String {
    format!("std::ranges::all_of({}, {})", c.receiver, c.arg(0))
}
fn cpp_some(c: &CallParts<'_>) -> String {
    format!("std::ranges::any_of({}, {})", c.receiver, c.arg(0))
}
fn cpp_sort(c: &CallParts<'_>) -> String {
    if c.args.is_empty() {
        format!("std::ranges::sort({})", c.receiver)
    } else {
        format!("std::ranges::sort({}, {})", c.receiver, c.arg(0))
    }
}
fn cpp_slice(c: &CallParts<'_>) -> String {
    format!(
        "std::vector({r}.begin() + {}, {r}.begin() + {})",
        c.arg(0),
        c.arg(1),
        r = c.receiver
    )
}
fn cpp_take(c: &CallParts<'_>) -> String {
    format!(
        "std::vector({r}.begin(), {r}.begin() + std::min<size_t>({}, {r}.size()))",
        c.arg(0),
        r = c.receiver
    )
}
fn cpp_sum(c: &CallParts<'_>) -> String {
    let zero = c.elem.map_or_else(|| "0".to_string(), |e| format!("{e}{{}}"));
    format!("std::accumulate({r}.begin(), {r}.end(), {zero})", r = c.receiver)
}

pub(super) const METHODS: &[MethodEntry] = &[
    entry(
        "adde",
        true,
        Rule::rename("push"),
        Rule::rename("append"),
        Rule::emit(zig_append),
        Rule::rename("push"),
        Rule::rename("push_back"),
    ),
    entry(
        "addita",
        false,
        Rule::emit(ts_add_copy),
        Rule::emit(py_add_copy),
        Rule::UNSUPPORTED,
        Rule::emit(rs_add_copy).needs(Helper::ListaAddita),
        Rule::call(Helper::ListaAddita),
    ),
    entry(
        "praepone",
        true,
        Rule::rename("unshift"),
        Rule::emit(py_prepend),
        Rule::emit(zig_prepend),
        Rule::emit(rs_prepend),
        Rule::emit(cpp_prepend),
    ),
    entry(
        "praeposita",
        false,
        Rule::emit(ts_prepend_copy),
        Rule::emit(py_prepend_copy),
        Rule::UNSUPPORTED,
        Rule::emit(rs_prepend_copy).needs(Helper::ListaPraeposita),
        Rule::call(Helper::ListaPraeposita),
    ),
    entry(
        "remove",
        true,
        Rule::rename("pop"),
        Rule::rename("pop"),
        Rule::rename("pop"),
        Rule::rename("pop"),
        Rule::call(Helper::ListaRemove),
    ),
    entry(
        "decapita",
        true,
        Rule::rename("shift"),
        Rule::emit(py_pop_front),
        Rule::emit(zig_pop_front),
        Rule::emit(rs_pop_front),
        Rule::call(Helper::ListaDecapita),
    ),
    entry(
        "purga",
        true,
        Rule::emit(ts_clear),
        Rule::rename("clear"),
        Rule::emit(zig_clear),
        Rule::rename("clear"),
        Rule::rename("clear"),
    ),
    entry(
        "primus",
        false,
        Rule::emit(ts_first),
        Rule::emit(py_first),
        Rule::emit(zig_first),
        Rule::emit(rs_first),
        Rule::rename("front"),
    ),
    entry(
        "ultimus",
        false,
        Rule::emit(ts_last),
        Rule::emit(py_last),
        Rule::emit(zig_last),
        Rule::emit(rs_last),
        Rule::rename("back"),
    ),
    entry(
        "accipe",
        false,
        Rule::emit(ts_index),
        Rule::emit(py_index),
        Rule::emit(zig_index),
        Rule::emit(rs_index),
        Rule::emit(cpp_index),
    ),
    entry(
        "longitudo",
        false,
        Rule::emit(ts_length),
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
        "continet",
        false,
        Rule::rename("includes"),
        Rule::emit(py_contains),
        Rule::emit(zig_contains).with(Features::STD),
        Rule::emit(rs_contains),
        Rule::emit(cpp_contains).with(Features::ALGORITHM),
    ),
    entry(
        "indiceDe",
        false,
        Rule::rename("indexOf"),
        Rule::rename("index"),
        Rule::emit(zig_index_of).with(Features::STD),
        Rule::emit(rs_index_of),
        Rule::call(Helper::ListaIndiceDe).with(Features::ALGORITHM.union(Features::CSTDINT)),
    ),
    entry(
        "inveni",
        false,
        Rule::rename("find"),
        Rule::emit(py_find),
        Rule::UNSUPPORTED,
        Rule::emit(rs_find),
        Rule::emit(cpp_find).with(Features::ALGORITHM),
    ),
    entry(
        "inveniIndicem",
        false,
        Rule::rename("findIndex"),
        Rule::emit(py_find_index),
        Rule::UNSUPPORTED,
        Rule::emit(rs_find_index),
        Rule::call(Helper::ListaInveniIndicem).with(Features::ALGORITHM.union(Features::CSTDINT)),
    ),
    entry(
        "filtrata",
        false,
        Rule::rename("filter"),
        Rule::emit(py_filter),
        Rule::UNSUPPORTED,
        Rule::emit(rs_filter),
        Rule::emit(cpp_filter).with(Features::RANGES),
    ),
    entry(
        "mappata",
        false,
        Rule::rename("map"),
        Rule::emit(py_map),
        Rule::UNSUPPORTED,
        Rule::emit(rs_map),
        Rule::emit(cpp_map).with(Features::RANGES),
    ),
    entry(
        "reducta",
        false,
        Rule::rename("reduce"),
        Rule::emit(py_reduce).with(Features::FUNCTOOLS),
        Rule::UNSUPPORTED,
        Rule::emit(rs_reduce),
        Rule::emit(cpp_reduce).with(Features::NUMERIC),
    ),
    entry(
        "omnes",
        false,
        Rule::rename("every"),
        Rule::emit(py_every),
        Rule::UNSUPPORTED,
        Rule::emit(rs_every),
        Rule::emit(cpp_every).with(Features::ALGORITHM),
    ),
    entry(
        "aliquis",
        false,
        Rule::rename("some"),
        Rule::emit(py_some),
        Rule::UNSUPPORTED,
        Rule::emit(rs_some),
        Rule::emit(cpp_some).with(Features::ALGORITHM),
    ),
    entry(
        "ordina",
        true,
        Rule::rename("sort"),
        Rule::emit(py_sort).with(Features::FUNCTOOLS),
        Rule::emit(zig_sort).with(Features::STD),
        Rule::emit(rs_sort),
        Rule::emit(cpp_sort).with(Features::ALGORITHM),
    ),
    entry(
        "ordinata",
        false,
        Rule::emit(ts_sorted),
        Rule::emit(py_sorted),
        Rule::UNSUPPORTED,
        Rule::call_ref(Helper::ListaOrdinata),
        Rule::call(Helper::ListaOrdinata).with(Features::ALGORITHM),
    ),
    entry(
        "inversa",
        false,
        Rule::emit(ts_reversed),
        Rule::emit(py_reversed),
        Rule::UNSUPPORTED,
        Rule::emit(rs_reversed),
        Rule::call(Helper::ListaInversa),
    ),
    entry(
        "unica",
        false,
        Rule::emit(ts_unique),
        Rule::emit(py_unique),
        Rule::UNSUPPORTED,
        Rule::call_ref(Helper::ListaUnica).with(Features::COPIA),
        Rule::call(Helper::ListaUnica).with(Features::COPIA),
    ),
    entry(
        "coniunge",
        false,
        Rule::rename("join"),
        Rule::emit(py_join),
        Rule::emit(zig_join).with(Features::STD).allocating(),
        Rule::emit(rs_join),
        Rule::call(Helper::ListaConiunge).with(Features::STRING),
    ),
    entry(
        "sectio",
        false,
        Rule::rename("slice"),
        Rule::emit(py_slice),
        Rule::emit(zig_slice),
        Rule::emit(rs_slice),
        Rule::emit(cpp_slice),
    ),
    entry(
        "prima",
        false,
        Rule::emit(ts_take),
        Rule::emit(py_take),
        Rule::emit(zig_take),
        Rule::emit(rs_take),
        Rule::emit(cpp_take).with(Features::ALGORITHM),
    ),
    entry(
        "ultima",
        false,
        Rule::emit(ts_take_last),
        Rule::emit(py_take_last),
        Rule::emit(zig_take_last),
        Rule::emit(rs_take_last).needs(Helper::ListaUltima),
        Rule::call(Helper::ListaUltima),
    ),
    entry(
        "summa",
        false,
        Rule::emit(ts_sum),
        Rule::emit(py_sum),
        Rule::UNSUPPORTED,
        Rule::emit(rs_sum),
        Rule::emit(cpp_sum).with(Features::NUMERIC),
    ),
    entry(
        "congrega",
        false,
        Rule::emit(ts_group),
        Rule::call(Helper::ListaCongrega),
        Rule::UNSUPPORTED,
        Rule::emit(rs_group).needs(Helper::ListaCongrega).with(Features::TABULA),
        Rule::call(Helper::ListaCongrega).with(Features::TABULA),
    ),
    entry(
        "partire",
        false,
        Rule::call(Helper::ListaPartire),
        Rule::call(Helper::ListaPartire),
        Rule::UNSUPPORTED,
        Rule::emit(rs_partition).needs(Helper::ListaPartire),
        Rule::call(Helper::ListaPartire),
    ),
    entry(
        "miscita",
        false,
        Rule::call(Helper::ListaMiscita),
        Rule::call(Helper::ListaMiscita).with(Features::RANDOM),
        Rule::UNSUPPORTED,
        Rule::UNSUPPORTED,
        Rule::call(Helper::ListaMiscita).with(Features::RANDOM.union(Features::ALGORITHM)),
    ),
    entry(
        "fragmenta",
        false,
        Rule::call(Helper::ListaFragmenta),
        Rule::call(Helper::ListaFragmenta),
        Rule::UNSUPPORTED,
        Rule::emit(rs_chunks),
        Rule::call(Helper::ListaFragmenta).with(Features::ALGORITHM),
    ),
    MethodEntry {
        name: "omnia",
        mutates: false,
        requires_async: true,
        ts: Rule::emit(ts_all),
        py: Rule::emit(py_all).with(Features::ASYNCIO),
        zig: Rule::UNSUPPORTED,
        rs: Rule::emit(rs_all),
        cpp: Rule::UNSUPPORTED,
    },
];
