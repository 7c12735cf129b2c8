use crate::features::{Features, RequiredFeatures};
use crate::CodegenTarget;

/// `use` lines, then helper functions.
pub(super) fn preamble(features: &RequiredFeatures) -> Vec<String> {
    let mut lines = Vec::new();
    let collections = match (
        features.contains(Features::TABULA),
        features.contains(Features::COPIA),
    ) {
        (true, true) => Some("use std::collections::{HashMap, HashSet};"),
        (true, false) => Some("use std::collections::HashMap;"),
        (false, true) => Some("use std::collections::HashSet;"),
        (false, false) => None,
    };
    lines.extend(collections.map(str::to_string));
    if features.contains(Features::STREAM) {
        lines.push("use futures::StreamExt;".to_string());
    }
    lines.extend(
        features
            .helpers()
            .filter_map(|h| h.definition(CodegenTarget::Rust))
            .map(str::to_string),
    );
    lines
}
