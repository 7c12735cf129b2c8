//! Generator state for one generation run.
//!
//! A `GenContext` is created per `generate()` call and dropped at its end.
//! It is never shared, so concurrent runs cannot observe each other's
//! indentation, function frames, resource handles or feature flags.

use faber_ir::visitor::{walk_stmt, Visitor};
use faber_ir::{FunctionMode, Program, Span, Stmt, StmtKind};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::features::{Features, RequiredFeatures};
use crate::runtime::Helper;
use crate::{CodegenTarget, GenerateOptions};

/// Name a manual-memory target uses for the allocator when no `cura` block
/// is in scope.
pub(crate) const DEFAULT_ALLOCATOR: &str = "alloc";

/// Lexical facts about the function currently being lowered.
///
/// Saved and replaced on entry to every function and lambda, restored on
/// exit, so closures never inherit their parent's context.
#[derive(Clone, Debug, Default)]
pub(crate) struct Frame {
    pub mode: FunctionMode,
    /// Inside a function body rather than at module level.
    pub in_function: bool,
    /// The function returns an error union or `Result`.
    pub fallible: bool,
    /// Set inside a `praefixum` block: the label its value breaks to.
    pub comptime_label: Option<String>,
    /// The body used the allocator without a `cura` block in scope.
    pub wants_allocator: bool,
}

impl Frame {
    pub fn function(mode: FunctionMode, fallible: bool) -> Self {
        Frame {
            mode,
            in_function: true,
            fallible,
            comptime_label: None,
            wants_allocator: false,
        }
    }
}

/// A tagged-union variant known to the generator.
#[derive(Clone, Debug)]
pub(crate) struct VariantInfo {
    pub union: String,
    pub fields: Vec<String>,
}

/// A construct emitted as a placeholder instead of real code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unimplemented {
    pub construct: &'static str,
    pub target: CodegenTarget,
    pub span: Span,
}

/// Mutable state threaded through every lowering rule.
pub struct GenContext {
    target: CodegenTarget,
    indent_unit: String,
    depth: usize,
    semicolons: bool,
    strict_receiver_types: bool,
    pub(crate) frame: Frame,
    resources: Vec<String>,
    features: RequiredFeatures,
    enums: FxHashSet<String>,
    variants: FxHashMap<String, VariantInfo>,
    pub(crate) alloc_fns: FxHashSet<String>,
    label_counter: u32,
    unimplemented: Vec<Unimplemented>,
}

impl GenContext {
    pub fn new(options: &GenerateOptions) -> Self {
        GenContext {
            target: options.target,
            indent_unit: options.indent_unit().to_string(),
            depth: 0,
            semicolons: options.emits_semicolons(),
            strict_receiver_types: options.strict_receiver_types,
            frame: Frame::default(),
            resources: Vec::new(),
            features: RequiredFeatures::new(),
            enums: FxHashSet::default(),
            variants: FxHashMap::default(),
            alloc_fns: FxHashSet::default(),
            label_counter: 0,
            unimplemented: Vec::new(),
        }
    }

    #[inline]
    pub fn target(&self) -> CodegenTarget {
        self.target
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn strict_receiver_types(&self) -> bool {
        self.strict_receiver_types
    }

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.depth += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) {
        debug_assert!(self.depth > 0, "dedent called with zero indent");
        self.depth = self.depth.saturating_sub(1);
    }

    /// Indentation for the current depth.
    pub fn pad(&self) -> String {
        self.indent_unit.repeat(self.depth)
    }

    /// `text` at the current indentation.
    pub fn line(&self, text: &str) -> String {
        format!("{}{text}", self.pad())
    }

    /// A simple statement at the current indentation, terminated.
    pub fn stmt_line(&self, text: &str) -> String {
        format!("{}{text}{}", self.pad(), self.terminator())
    }

    /// The statement terminator in effect.
    #[inline]
    pub fn terminator(&self) -> &'static str {
        if self.semicolons {
            ";"
        } else {
            ""
        }
    }

    #[inline]
    pub fn in_generator(&self) -> bool {
        self.frame.mode.is_generator()
    }

    #[inline]
    pub fn in_async(&self) -> bool {
        self.frame.mode.is_async()
    }

    /// Replace the current frame, returning the one it displaced.
    pub(crate) fn swap_frame(&mut self, frame: Frame) -> Frame {
        std::mem::replace(&mut self.frame, frame)
    }

    pub fn push_resource(&mut self, name: impl Into<String>) {
        self.resources.push(name.into());
    }

    pub fn pop_resource(&mut self) -> Option<String> {
        self.resources.pop()
    }

    /// The innermost resource handle, if any `cura` block is open.
    pub fn current_resource(&self) -> Option<&str> {
        self.resources.last().map(String::as_str)
    }

    /// The allocator name an allocating operation should use.
    ///
    /// The innermost `cura` handle wins. Inside a function with no handle in
    /// scope, the function is marked as needing an allocator parameter.
    /// Module-level code falls back to the default name.
    pub fn alloc_handle(&mut self) -> String {
        if let Some(top) = self.current_resource() {
            return top.to_string();
        }
        if self.frame.in_function {
            self.frame.wants_allocator = true;
        } else {
            tracing::debug!(
                codegen_target = %self.target,
                "no allocator in scope at module level; using `{DEFAULT_ALLOCATOR}`"
            );
        }
        DEFAULT_ALLOCATOR.to_string()
    }

    /// Record that `features` are used.
    #[inline]
    pub fn require(&mut self, features: Features) {
        self.features.require(features);
    }

    /// Record that a runtime helper is used.
    #[inline]
    pub fn require_helper(&mut self, helper: Helper) {
        self.features.require_helper(helper);
    }

    #[inline]
    pub fn features(&self) -> &RequiredFeatures {
        &self.features
    }

    /// A label unique within this run: `blk`, `blk1`, `blk2`, ...
    pub fn fresh_label(&mut self, prefix: &str) -> String {
        let n = self.label_counter;
        self.label_counter += 1;
        if n == 0 {
            prefix.to_string()
        } else {
            format!("{prefix}{n}")
        }
    }

    /// Record a placeholder emitted in place of real code.
    pub fn mark_unimplemented(&mut self, construct: &'static str, span: Span) {
        tracing::debug!(construct, codegen_target = %self.target, %span, "emitting unimplemented marker");
        self.unimplemented.push(Unimplemented {
            construct,
            target: self.target,
            span,
        });
    }

    pub(crate) fn take_unimplemented(&mut self) -> Vec<Unimplemented> {
        std::mem::take(&mut self.unimplemented)
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains(name)
    }

    pub(crate) fn variant(&self, name: &str) -> Option<&VariantInfo> {
        self.variants.get(name)
    }

    /// Number of variants declared for the tagged union `union`.
    pub(crate) fn variant_count(&self, union: &str) -> usize {
        self.variants.values().filter(|v| v.union == union).count()
    }

    /// Whether `name` is a function that takes an allocator parameter.
    pub fn takes_allocator(&self, name: &str) -> bool {
        self.alloc_fns.contains(name)
    }

    /// Record the enum and tagged-union declarations anywhere in `program`.
    pub(crate) fn collect_declarations(&mut self, program: &Program) {
        let mut collector = DeclCollector { ctx: self };
        collector.visit_program(program);
    }
}

struct DeclCollector<'a> {
    ctx: &'a mut GenContext,
}

impl<'ast> Visitor<'ast> for DeclCollector<'_> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match &stmt.kind {
            StmtKind::Enum(decl) => {
                self.ctx.enums.insert(decl.name.clone());
            }
            StmtKind::Union(decl) => {
                for variant in &decl.variants {
                    self.ctx.variants.insert(
                        variant.name.clone(),
                        VariantInfo {
                            union: decl.name.clone(),
                            fields: variant.fields.iter().map(|f| f.name.clone()).collect(),
                        },
                    );
                }
            }
            _ => {}
        }
        walk_stmt(self, stmt);
    }
}

#[cfg(test)]
mod tests;
