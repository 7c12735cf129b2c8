use crate::features::{Features, RequiredFeatures};
use crate::CodegenTarget;

/// Standard headers, in include order.
const HEADERS: &[(Features, &str)] = &[
    (Features::ALGORITHM, "algorithm"),
    (Features::ANY, "any"),
    (Features::CASSERT, "cassert"),
    (Features::CSTDINT, "cstdint"),
    (Features::CSTDLIB, "cstdlib"),
    (Features::FORMAT, "format"),
    (Features::FUNCTIONAL, "functional"),
    (Features::FUTURE, "future"),
    (Features::GENERATOR, "generator"),
    (Features::NUMERIC, "numeric"),
    (Features::OPTIONAL, "optional"),
    (Features::PRINT, "print"),
    (Features::RANDOM, "random"),
    (Features::RANGES, "ranges"),
    (Features::STDEXCEPT, "stdexcept"),
    (Features::STRING, "string"),
    (Features::TABULA, "unordered_map"),
    (Features::COPIA, "unordered_set"),
    (Features::VARIANT, "variant"),
    (Features::LISTA, "vector"),
];

const PANIC_FN: &str = "[[noreturn]] inline void panic(const std::string& message) {
    std::println(stderr, \"panic: {}\", message);
    std::abort();
}";

/// Includes, then helpers, then support functions.
pub(super) fn preamble(features: &RequiredFeatures) -> Vec<String> {
    let mut lines: Vec<String> = HEADERS
        .iter()
        .filter(|(flag, _)| features.contains(*flag))
        .map(|(_, header)| format!("#include <{header}>"))
        .collect();
    lines.extend(
        features
            .helpers()
            .filter_map(|h| h.definition(CodegenTarget::Cpp))
            .map(str::to_string),
    );
    if features.contains(Features::PANIC) {
        lines.push(PANIC_FN.to_string());
    }
    lines
}
