//! Collection method registries.
//!
//! One static table per container kind maps Faber collection vocabulary to a
//! translation rule per target. Latin verbs are reused across containers
//! (`vacua`, `habet`, `inversa`, ...), so lookup is keyed by the receiver's
//! resolved type, never by the method name alone.
//!
//! # Lookup
//!
//! 1. The receiver's resolved generic type name picks the registry.
//! 2. An unresolved receiver falls back to `lista`. This is a heuristic: it
//!    can pick the wrong registry. `strict_receiver_types` turns it into an
//!    error instead.
//! 3. A method absent from the chosen registry is not a registry hit and is
//!    emitted as a plain method call.
//!
//! Required imports and helpers are recorded on the feature tracker; the
//! call site never emits them.

use std::fmt;

use faber_ir::SemanticType;

use crate::context::GenContext;
use crate::features::Features;
use crate::runtime::Helper;
use crate::{CodegenError, CodegenResult, CodegenTarget};

mod copia;
mod lista;
mod tabula;

/// The three container kinds with registered vocabulary.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CollectionKind {
    /// Ordered sequence.
    Lista,
    /// Associative map.
    Tabula,
    /// Unique set.
    Copia,
}

impl CollectionKind {
    /// Kind for a generic type name, accepting target-native spellings.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "lista" | "Array" | "list" | "Vec" | "vector" | "ArrayList" => {
                Some(CollectionKind::Lista)
            }
            "tabula" | "Map" | "dict" | "HashMap" | "unordered_map" | "AutoHashMap"
            | "StringHashMap" => Some(CollectionKind::Tabula),
            "copia" | "Set" | "set" | "HashSet" | "unordered_set" => Some(CollectionKind::Copia),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CollectionKind::Lista => "lista",
            CollectionKind::Tabula => "tabula",
            CollectionKind::Copia => "copia",
        }
    }

    /// The feature flag every use of this container records.
    pub const fn feature(self) -> Features {
        match self {
            CollectionKind::Lista => Features::LISTA,
            CollectionKind::Tabula => Features::TABULA,
            CollectionKind::Copia => Features::COPIA,
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowered pieces of a collection method call.
pub(crate) struct CallParts<'a> {
    pub receiver: &'a str,
    pub args: &'a [String],
    /// Allocator handle; empty unless the rule allocates.
    pub handle: &'a str,
    /// Target spelling of the element (or key) type, if resolved.
    pub elem: Option<&'a str>,
}

impl CallParts<'_> {
    /// Arguments joined with `, `.
    pub fn joined(&self) -> String {
        self.args.join(", ")
    }

    /// The `i`th argument, or empty text if absent.
    pub fn arg(&self, i: usize) -> &str {
        self.args.get(i).map_or("", String::as_str)
    }
}

/// How helper arguments are passed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Pass {
    Value,
    /// Every argument, receiver included, is borrowed with `&`.
    Ref,
}

/// How a method lowers on one target.
#[derive(Copy, Clone)]
pub(crate) enum Translation {
    /// Swap the method name; receiver and arguments pass through.
    Rename(&'static str),
    /// Build an arbitrary expression from the lowered parts.
    Emit(fn(&CallParts<'_>) -> String),
    /// Call a runtime helper with the receiver as first argument.
    Call(Helper, Pass),
    /// The target has no lowering for this method.
    Unsupported,
}

/// A translation plus what it requires.
#[derive(Copy, Clone)]
pub(crate) struct Rule {
    pub translation: Translation,
    pub features: Features,
    /// Helper an `Emit` translation calls.
    pub helper: Option<Helper>,
    pub allocates: bool,
}

impl Rule {
    const fn new(translation: Translation) -> Self {
        Rule {
            translation,
            features: Features::empty(),
            helper: None,
            allocates: false,
        }
    }

    pub const fn rename(name: &'static str) -> Self {
        Rule::new(Translation::Rename(name))
    }

    pub const fn emit(f: fn(&CallParts<'_>) -> String) -> Self {
        Rule::new(Translation::Emit(f))
    }

    pub const fn call(helper: Helper) -> Self {
        Rule::new(Translation::Call(helper, Pass::Value))
    }

    pub const fn call_ref(helper: Helper) -> Self {
        Rule::new(Translation::Call(helper, Pass::Ref))
    }

    pub const UNSUPPORTED: Rule = Rule::new(Translation::Unsupported);

    #[must_use]
    pub const fn with(self, features: Features) -> Self {
        Rule {
            features: self.features.union(features),
            ..self
        }
    }

    /// An `Emit` translation that calls `helper`.
    #[must_use]
    pub const fn needs(self, helper: Helper) -> Self {
        Rule {
            helper: Some(helper),
            ..self
        }
    }

    #[must_use]
    pub const fn allocating(self) -> Self {
        Rule {
            allocates: true,
            ..self
        }
    }

    /// The helper this rule requires, whichever way it calls it.
    pub fn required_helper(&self) -> Option<Helper> {
        match self.translation {
            Translation::Call(helper, _) => Some(helper),
            _ => self.helper,
        }
    }
}

fn helper_call(helper: Helper, pass: Pass, parts: &CallParts<'_>) -> String {
    let borrow = if pass == Pass::Ref { "&" } else { "" };
    let args: Vec<String> = std::iter::once(parts.receiver)
        .chain(parts.args.iter().map(String::as_str))
        .map(|a| format!("{borrow}{a}"))
        .collect();
    format!("{}({})", helper.fn_name(), args.join(", "))
}

/// One registered method.
pub(crate) struct MethodEntry {
    pub name: &'static str,
    pub mutates: bool,
    pub requires_async: bool,
    pub ts: Rule,
    pub py: Rule,
    pub zig: Rule,
    pub rs: Rule,
    pub cpp: Rule,
}

impl MethodEntry {
    /// The rule for `target`. Faber re-emits its own vocabulary and has none.
    pub fn rule(&self, target: CodegenTarget) -> Option<&Rule> {
        match target {
            CodegenTarget::TypeScript => Some(&self.ts),
            CodegenTarget::Python => Some(&self.py),
            CodegenTarget::Zig => Some(&self.zig),
            CodegenTarget::Rust => Some(&self.rs),
            CodegenTarget::Cpp => Some(&self.cpp),
            CodegenTarget::Faber => None,
        }
    }
}

/// Every method registered for `kind`.
pub(crate) fn methods_for(kind: CollectionKind) -> &'static [MethodEntry] {
    match kind {
        CollectionKind::Lista => lista::METHODS,
        CollectionKind::Tabula => tabula::METHODS,
        CollectionKind::Copia => copia::METHODS,
    }
}

/// Look up `name` in the registry for `kind`.
pub(crate) fn find_method(kind: CollectionKind, name: &str) -> Option<&'static MethodEntry> {
    methods_for(kind).iter().find(|m| m.name == name)
}

/// Whether any registry defines `name`.
pub(crate) fn is_registered(name: &str) -> bool {
    [CollectionKind::Lista, CollectionKind::Tabula, CollectionKind::Copia]
        .into_iter()
        .any(|kind| find_method(kind, name).is_some())
}

/// Pick the registry for a receiver.
///
/// Returns `Ok(None)` when the receiver is resolved to something that is not
/// a registered container, in which case the call is a plain method call.
pub(crate) fn receiver_kind(
    ctx: &GenContext,
    receiver_ty: Option<&SemanticType>,
    method: &str,
) -> CodegenResult<Option<CollectionKind>> {
    match receiver_ty {
        Some(ty) if !ty.is_unknown() => {
            Ok(ty.generic_name().and_then(CollectionKind::from_type_name))
        }
        _ if !is_registered(method) => Ok(None),
        _ if ctx.strict_receiver_types() => Err(CodegenError::unsupported(
            format!("collection method `{method}` on a receiver with no resolved type"),
            ctx.target(),
        )),
        _ => {
            tracing::debug!(method, "receiver type unresolved; assuming lista");
            Ok(Some(CollectionKind::Lista))
        }
    }
}

/// Lower a collection method call through the registries.
///
/// Returns `Ok(None)` when the call is not a registry hit and should be
/// emitted verbatim.
pub(crate) fn lower_call(
    ctx: &mut GenContext,
    receiver_ty: Option<&SemanticType>,
    method: &str,
    receiver: &str,
    args: &[String],
    elem: Option<&str>,
) -> CodegenResult<Option<String>> {
    let Some(kind) = receiver_kind(ctx, receiver_ty, method)? else {
        return Ok(None);
    };
    let Some(entry) = find_method(kind, method) else {
        return Ok(None);
    };
    let target = ctx.target();
    let Some(rule) = entry.rule(target) else {
        return Ok(None);
    };

    let handle = if rule.allocates {
        ctx.alloc_handle()
    } else {
        String::new()
    };
    let parts = CallParts {
        receiver,
        args,
        handle: &handle,
        elem,
    };

    let code = match rule.translation {
        Translation::Unsupported => {
            return Err(CodegenError::unsupported(format!("{kind}.{method}"), target));
        }
        Translation::Rename(name) => format!("{receiver}.{name}({})", parts.joined()),
        Translation::Emit(f) => f(&parts),
        Translation::Call(helper, pass) => helper_call(helper, pass, &parts),
    };

    ctx.require(kind.feature() | rule.features);
    if entry.requires_async {
        ctx.require(Features::ASYNC);
    }
    if let Some(helper) = rule.required_helper() {
        ctx.require_helper(helper);
    }
    Ok(Some(code))
}

#[cfg(test)]
mod tests;
