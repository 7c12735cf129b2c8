use crate::features::{Features, RequiredFeatures};
use crate::CodegenTarget;

const PANIC_CLASS: &str = "class Panic extends Error {
  constructor(message: string) {
    super(message);
    this.name = \"Panic\";
  }
}";

/// Imports, then helpers, then support classes.
pub(super) fn preamble(features: &RequiredFeatures) -> Vec<String> {
    let mut lines = Vec::new();
    if features.contains(Features::DECIMAL) {
        lines.push("import Decimal from \"decimal.js\";".to_string());
    }
    lines.extend(
        features
            .helpers()
            .filter_map(|h| h.definition(CodegenTarget::TypeScript))
            .map(str::to_string),
    );
    if features.contains(Features::PANIC) {
        lines.push(PANIC_CLASS.to_string());
    }
    lines
}
