use crate::features::{Features, RequiredFeatures};

/// Everything else Zig needs is a builtin or lives under `std`.
pub(super) fn preamble(features: &RequiredFeatures) -> Vec<String> {
    if features.contains(Features::STD) {
        vec!["const std = @import(\"std\");".to_string()]
    } else {
        Vec::new()
    }
}
