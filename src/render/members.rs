use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};
use tracing::{debug, warn};

use crate::render::context::ReprContext;
use crate::value::types::{
    AccessError, Accessor, MemberAccess, MemberKind, MemberVisibility, ObjectValue, Value,
};

/// A member with its accessor already resolved to an outcome.
#[derive(Debug, Clone)]
pub struct ResolvedMember {
    pub name: String,
    pub type_name: String,
    pub visibility: MemberVisibility,
    pub kind: MemberKind,
    pub outcome: MemberOutcome,
}

#[derive(Debug, Clone)]
pub enum MemberOutcome {
    Value(Value),
    Error(AccessError),
    TimedOut,
}

impl ResolvedMember {
    /// Rendered member name; private members are prefixed so they cannot
    /// collide with a public member of the same name.
    pub fn display_name(&self) -> String {
        match self.visibility {
            MemberVisibility::Public => self.name.clone(),
            MemberVisibility::Private => format!("private_{}", self.name),
        }
    }
}

/// Enumerate an object's members under the configured visibility mode and
/// resolve each accessor, honoring the per-member time budget.
///
/// Partition order is fixed: public fields, public computed, private
/// fields, private computed; declared order within each partition. Computed
/// accessors are only evaluated when a time budget is configured, or when
/// the caller opts into unbounded evaluation (tree mode does; text mode
/// does not). The item cap applies across the concatenated partitions and
/// is enforced before accessors run, so members past the cap are never
/// evaluated. Returns the resolved members plus a truncation flag.
pub fn resolve_members(
    object: &ObjectValue,
    ctx: &ReprContext,
    evaluate_unbounded: bool,
) -> (Vec<ResolvedMember>, bool) {
    let members = object.snapshot();
    let view = ctx.config.view_mode;
    let budget_ms = ctx.config.max_member_time_ms;
    let computed_allowed = budget_ms > 0 || evaluate_unbounded;

    let mut selected = Vec::new();
    for (visibility, kind) in [
        (MemberVisibility::Public, MemberKind::Field),
        (MemberVisibility::Public, MemberKind::Computed),
        (MemberVisibility::Private, MemberKind::Field),
        (MemberVisibility::Private, MemberKind::Computed),
    ] {
        let included = match (visibility, kind) {
            (MemberVisibility::Public, MemberKind::Field) => true,
            (MemberVisibility::Public, MemberKind::Computed) => {
                view.includes_public_computed() && computed_allowed
            }
            (MemberVisibility::Private, MemberKind::Field) => view.includes_private(),
            (MemberVisibility::Private, MemberKind::Computed) => {
                view.includes_private_computed() && computed_allowed
            }
        };
        if !included {
            continue;
        }
        selected.extend(
            members
                .iter()
                .filter(|m| m.visibility == visibility && m.kind == kind)
                .cloned(),
        );
    }

    let total = selected.len();
    let cap = ctx.config.max_items;
    let truncated = cap >= 0 && total > cap as usize;
    if truncated {
        selected.truncate(cap as usize);
    }

    let resolved = selected
        .into_iter()
        .map(|member| {
            let outcome = match &member.access {
                MemberAccess::Stored(value) => MemberOutcome::Value(value.clone()),
                MemberAccess::Computed(accessor) => {
                    invoke_accessor(&member.name, accessor, budget_ms)
                }
            };
            ResolvedMember {
                name: member.name,
                type_name: member.type_name,
                visibility: member.visibility,
                kind: member.kind,
                outcome,
            }
        })
        .collect();

    (resolved, truncated)
}

/// Run one accessor, bounded by the wall-clock budget when one is set.
///
/// With a budget the accessor runs on its own thread and is raced against
/// the deadline through a bounded channel. A timeout abandons the thread
/// rather than terminating it: the traversal proceeds and the accessor's
/// eventual result, if any, is dropped with the channel. A runaway accessor
/// keeps its thread alive indefinitely; that leak is the accepted price for
/// the traversal never hanging.
pub fn invoke_accessor(name: &str, accessor: &Accessor, budget_ms: u64) -> MemberOutcome {
    if budget_ms == 0 {
        let accessor = Accessor::clone(accessor);
        return outcome_of(panic::catch_unwind(AssertUnwindSafe(move || accessor())));
    }

    let (tx, rx) = bounded(1);
    let worker = Accessor::clone(accessor);
    let spawned = thread::Builder::new()
        .name("valrepr-member".to_string())
        .spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(move || worker()));
            let _ = tx.try_send(result);
        });
    if let Err(e) = spawned {
        return MemberOutcome::Error(AccessError::new("SpawnError", e.to_string()));
    }

    match rx.recv_timeout(Duration::from_millis(budget_ms)) {
        Ok(result) => outcome_of(result),
        Err(RecvTimeoutError::Timeout) => {
            warn!(member = name, budget_ms, "member accessor timed out; abandoning");
            MemberOutcome::TimedOut
        }
        Err(RecvTimeoutError::Disconnected) => {
            // Worker died without sending; treat like a panic with no payload.
            MemberOutcome::Error(AccessError::new("Panic", "accessor aborted"))
        }
    }
}

fn outcome_of(
    result: Result<Result<Value, AccessError>, Box<dyn std::any::Any + Send>>,
) -> MemberOutcome {
    match result {
        Ok(Ok(value)) => MemberOutcome::Value(value),
        Ok(Err(error)) => {
            debug!(kind = %error.kind, "member accessor failed");
            MemberOutcome::Error(error)
        }
        Err(payload) => {
            MemberOutcome::Error(AccessError::new("Panic", panic_message(payload.as_ref())))
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
