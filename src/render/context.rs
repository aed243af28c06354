use std::sync::Arc;

use crate::render::config::ReprConfig;
use crate::render::registry::FormatterRegistry;

/// Marker returned when a composite's identity is already on the active
/// ancestor chain; the caller substitutes a circular-reference sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircularRef;

/// Per-path traversal state threaded through every recursive call.
///
/// Contexts are cloned on descent rather than mutated in place, so sibling
/// subtrees never observe each other's depth or ancestor changes. The
/// ancestor list therefore always equals the identity chain of the current
/// path: pushing happens in `enter_composite`, popping happens when the
/// descended context is dropped.
#[derive(Debug, Clone)]
pub struct ReprContext {
    pub config: Arc<ReprConfig>,
    pub registry: Arc<FormatterRegistry>,
    pub depth: i32,
    ancestors: Vec<usize>,
}

impl ReprContext {
    pub fn new(config: Arc<ReprConfig>, registry: Arc<FormatterRegistry>) -> ReprContext {
        ReprContext {
            config,
            registry,
            depth: 0,
            ancestors: Vec::new(),
        }
    }

    pub fn with_incremented_depth(&self) -> ReprContext {
        let mut next = self.clone();
        next.depth += 1;
        next
    }

    /// Push a composite identity onto the ancestor chain, or fail if the
    /// identity is already an ancestor (a true cycle, not a shared
    /// sibling reference).
    pub fn enter_composite(&self, identity: usize) -> Result<ReprContext, CircularRef> {
        if self.ancestors.contains(&identity) {
            return Err(CircularRef);
        }
        let mut next = self.clone();
        next.ancestors.push(identity);
        Ok(next)
    }

    pub fn depth_exceeded(&self) -> bool {
        self.config.max_depth >= 0 && self.depth >= self.config.max_depth
    }
}
