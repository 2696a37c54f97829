//! Report construction.
//!
//! Bad-free messages classify what was actually passed to the deallocator
//! — a local's address, a parameter, a global, a function, a literal
//! integer — and compose a targeted sentence; values that fit no class get
//! the generic message. Double free and use-after-free reuse their
//! category descriptions.

use std::fmt::Write as _;

use ebb_diagnostic::BugReport;
use ebb_exec::{CheckerContext, ProgramState};
use ebb_sym::{Loc, MemSpace, Name, NodeId, Region, RegionId, RegionTable, SVal, StringInterner};

use crate::checker::AllocChecker;

impl AllocChecker {
    /// Emit a bad-free finding and prune the path: past this point the
    /// allocator model is corrupted and nothing downstream is sound.
    pub(crate) fn report_bad_free(
        &self,
        arg_val: &SVal,
        state: &ProgramState,
        ctx: &mut CheckerContext<'_>,
    ) {
        let span = ctx.point().span;
        if let Some(node) = ctx.generate_sink(state.clone()) {
            let message = describe_freed_value(arg_val, ctx.regions(), ctx.interner());
            tracing::debug!(%message, "bad free");
            ctx.report(
                BugReport::with_message(&self.categories.bad_free, message, node).with_span(span),
            );
        }
    }

    /// Emit a double-free finding and prune the path.
    pub(crate) fn report_double_free(&self, state: &ProgramState, ctx: &mut CheckerContext<'_>) {
        if let Some(node) = ctx.generate_sink(state.clone()) {
            tracing::debug!("double free");
            ctx.report(BugReport::new(&self.categories.double_free, node));
        }
    }

    /// Emit a use-after-free finding anchored at an already-committed node.
    pub(crate) fn report_use_after_free(&self, node: NodeId, ctx: &mut CheckerContext<'_>) {
        tracing::debug!("use after free");
        ctx.report(BugReport::new(&self.categories.use_after_free, node));
    }
}

/// Build the human-readable description of a freed value.
fn describe_freed_value(val: &SVal, regions: &RegionTable, interner: &StringInterner) -> String {
    let mut msg = String::new();

    if let Some(region) = val.as_region() {
        // Describe the pointed-at object, not an element of it.
        let mut target = region;
        while let Region::Element { base } = regions.region(target) {
            target = *base;
        }

        if matches!(regions.region(target), Region::Alloca) {
            return "Argument to free() was allocated by alloca(), not malloc()".to_owned();
        }

        msg.push_str("Argument to free() is ");
        if summarize_region(&mut msg, target, regions, interner) {
            msg.push_str(", which is not memory allocated by malloc()");
        } else {
            msg.push_str("not memory allocated by malloc()");
        }
    } else {
        msg.push_str("Argument to free() is ");
        if summarize_value(&mut msg, val, interner) {
            msg.push_str(", which is not memory allocated by malloc()");
        } else {
            msg.push_str("not memory allocated by malloc()");
        }
    }

    msg
}

/// Describe a non-region value. Returns `false` when it fits no class.
fn summarize_value(msg: &mut String, val: &SVal, interner: &StringInterner) -> bool {
    match val {
        SVal::Int(n) => {
            let _ = write!(msg, "an integer ({n})");
            true
        }
        SVal::Loc(Loc::ConcreteAddr(addr)) => {
            let _ = write!(msg, "a constant address ({addr:#x})");
            true
        }
        SVal::Loc(Loc::Label(label)) => {
            let _ = write!(msg, "the address of the label '{}'", name_str(interner, *label));
            true
        }
        _ => false,
    }
}

/// Describe a region by its kind and storage. Returns `false` when it fits
/// no class.
fn summarize_region(
    msg: &mut String,
    region: RegionId,
    regions: &RegionTable,
    interner: &StringInterner,
) -> bool {
    match regions.region(region) {
        Region::FunctionText { name: Some(name) } => {
            let _ = write!(msg, "the address of the function '{}'", name_str(interner, *name));
            true
        }
        Region::FunctionText { name: None } => {
            msg.push_str("the address of a function");
            true
        }
        Region::BlockText => {
            msg.push_str("block text");
            true
        }
        Region::BlockData => {
            msg.push_str("a block");
            true
        }
        _ => {
            let var_name = match regions.region(region) {
                Region::Var { name, .. } => Some(*name),
                _ => None,
            };
            match regions.memory_space(region) {
                MemSpace::StackLocals => {
                    match var_name {
                        Some(name) => {
                            let _ = write!(
                                msg,
                                "the address of the local variable '{}'",
                                name_str(interner, name)
                            );
                        }
                        None => msg.push_str("the address of a local stack variable"),
                    }
                    true
                }
                MemSpace::StackArguments => {
                    match var_name {
                        Some(name) => {
                            let _ = write!(
                                msg,
                                "the address of the parameter '{}'",
                                name_str(interner, name)
                            );
                        }
                        None => msg.push_str("the address of a parameter"),
                    }
                    true
                }
                MemSpace::GlobalStatic => {
                    match var_name {
                        Some(name) => {
                            let _ = write!(
                                msg,
                                "the address of the static variable '{}'",
                                name_str(interner, name)
                            );
                        }
                        None => msg.push_str("the address of a global variable"),
                    }
                    true
                }
                MemSpace::GlobalNonStatic => {
                    match var_name {
                        Some(name) => {
                            let _ = write!(
                                msg,
                                "the address of the global variable '{}'",
                                name_str(interner, name)
                            );
                        }
                        None => msg.push_str("the address of a global variable"),
                    }
                    true
                }
                _ => false,
            }
        }
    }
}

fn name_str(interner: &StringInterner, name: Name) -> &'static str {
    interner.resolve(name).unwrap_or("<unknown>")
}
