use crate::features::{Features, RequiredFeatures};
use crate::CodegenTarget;

const PANIC_CLASS: &str = "class Panic(Exception):
    pass";

/// Plain imports, then `from` imports, then helpers, then `Panic`.
pub(super) fn preamble(features: &RequiredFeatures) -> Vec<String> {
    let has = |f: Features| features.contains(f);
    let mut lines = Vec::new();

    for (flag, module) in [
        (Features::ASYNCIO, "asyncio"),
        (Features::CONTEXT, "contextlib"),
        (Features::FUNCTOOLS, "functools"),
        (Features::RANDOM, "random"),
        (Features::SYS, "sys"),
    ] {
        if has(flag) {
            lines.push(format!("import {module}"));
        }
    }

    let mut abc = Vec::new();
    if has(Features::FUTURE) {
        abc.push("Awaitable");
    }
    if has(Features::CALLABLE) {
        abc.push("Callable");
    }
    if has(Features::ITERATOR) {
        abc.extend(["AsyncIterator", "Iterator"]);
    }
    if !abc.is_empty() {
        abc.sort_unstable();
        lines.push(format!("from collections.abc import {}", abc.join(", ")));
    }
    if has(Features::DATACLASS) {
        lines.push("from dataclasses import dataclass, field".to_string());
    }
    if has(Features::DECIMAL) {
        lines.push("from decimal import Decimal".to_string());
    }
    if has(Features::ENUM) {
        lines.push("from enum import Enum, auto".to_string());
    }
    let mut typing = Vec::new();
    if has(Features::ANY) {
        typing.push("Any");
    }
    if has(Features::PROTOCOL) {
        typing.push("Protocol");
    }
    if !typing.is_empty() {
        lines.push(format!("from typing import {}", typing.join(", ")));
    }

    lines.extend(
        features
            .helpers()
            .filter_map(|h| h.definition(CodegenTarget::Python))
            .map(str::to_string),
    );
    if has(Features::PANIC) {
        lines.push(PANIC_CLASS.to_string());
    }
    lines
}
