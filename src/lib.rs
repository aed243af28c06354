//! Bit-exact value rendering for debugging.
//!
//! Turns an explicit value graph into unambiguous text (`render`) or a
//! JSON tree (`render_tree`). Numbers carry type suffixes, floats can be
//! shown without binary-to-decimal rounding, and traversal is bounded by
//! depth, item, string, and per-member wall-clock limits with cycle
//! detection along the active path.
//!
//! ```
//! use valrepr::{render, ReprConfig, Value};
//!
//! let value = Value::list(vec![1i32.into(), 2i32.into(), 3i32.into()]);
//! assert_eq!(render(&value, &ReprConfig::default()), "[1_i32, 2_i32, 3_i32]");
//! ```

pub mod numeric;
pub mod render;
pub mod value;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use crate::numeric::{FloatStyle, IntStyle, NumberLocale};
pub use crate::render::config::{ConfigFile, MemberView, ReprConfig, ReprConfigBuilder};
pub use crate::render::context::ReprContext;
pub use crate::render::registry::{FormatterRegistry, ReprFormatter, TypeMatcher};
pub use crate::value::from_json::value_from_json;
pub use crate::value::types::{
    AccessError, Accessor, EnumValue, FloatValue, IntValue, ListValue, MapValue, Member,
    MemberAccess, MemberKind, MemberVisibility, NullableValue, ObjectValue, TypeKind, Value,
    ValueKind,
};

use crate::render::formatters::{max_depth_tree, repr_value, tree_value, MAX_DEPTH_TEXT};

/// Render a value as its unambiguous single-line text form.
pub fn render(value: &Value, config: &ReprConfig) -> String {
    render_with(value, config, Arc::new(FormatterRegistry::with_defaults()))
}

/// Render with a caller-supplied formatter registry, letting custom
/// formatters claim types by name or by kind.
pub fn render_with(value: &Value, config: &ReprConfig, registry: Arc<FormatterRegistry>) -> String {
    let ctx = ReprContext::new(Arc::new(config.clone()), registry);
    // A zero depth budget forbids even the root.
    if config.max_depth == 0 {
        return MAX_DEPTH_TEXT.to_string();
    }
    repr_value(value, &ctx)
}

/// Render a value as a hierarchical JSON tree carrying type metadata.
pub fn render_tree(value: &Value, config: &ReprConfig) -> serde_json::Value {
    render_tree_with(value, config, Arc::new(FormatterRegistry::with_defaults()))
}

/// Tree rendering with a caller-supplied formatter registry.
pub fn render_tree_with(
    value: &Value,
    config: &ReprConfig,
    registry: Arc<FormatterRegistry>,
) -> serde_json::Value {
    let ctx = ReprContext::new(Arc::new(config.clone()), registry);
    if config.max_depth == 0 {
        return max_depth_tree(value, 0);
    }
    tree_value(value, &ctx)
}
