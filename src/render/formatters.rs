use serde_json::json;

use crate::numeric::{
    exact_decimal, format_big_integer, format_integer, hex_power, pattern_decimal, special_form,
    FloatStyle,
};
use crate::render::context::ReprContext;
use crate::render::members::{resolve_members, MemberOutcome};
use crate::render::registry::ReprFormatter;
use crate::value::types::{FloatValue, IntValue, Value};

pub const MAX_DEPTH_TEXT: &str = "<Max Depth Reached>";
pub const TIMED_OUT_TEXT: &str = "[Timed Out]";

/// Dispatch one value through the registry, text form.
pub fn repr_value(value: &Value, ctx: &ReprContext) -> String {
    ctx.registry.resolve(value).to_repr(value, ctx)
}

/// Dispatch one value through the registry, tree form.
pub fn tree_value(value: &Value, ctx: &ReprContext) -> serde_json::Value {
    ctx.registry.resolve(value).to_repr_tree(value, ctx)
}

fn circular_text(value: &Value) -> String {
    format!(
        "<Circular Reference to {} @{}>",
        value.type_name(),
        value.hash_code().unwrap_or_default()
    )
}

fn circular_tree(value: &Value) -> serde_json::Value {
    json!({
        "type": "CircularReference",
        "target": {
            "type": value.type_name(),
            "kind": value.kind_label(),
            "hashCode": value.hash_code(),
        },
    })
}

pub(crate) fn max_depth_tree(value: &Value, depth: i32) -> serde_json::Value {
    json!({
        "type": value.type_name(),
        "kind": value.kind_label(),
        "maxDepthReached": true,
        "depth": depth,
    })
}

/// Scalar leaves collapse to their text form once nested; only the root
/// keeps the full type/kind/value node.
fn leaf_tree(value: &Value, ctx: &ReprContext, text: String) -> serde_json::Value {
    if ctx.depth > 0 {
        json!(text)
    } else {
        json!({
            "type": value.type_name(),
            "kind": value.kind_label(),
            "value": text,
        })
    }
}

/// Character-count based truncation; returns the kept prefix, the number
/// of omitted characters, and the total character count.
fn truncate_chars(s: &str, max: i32) -> (String, usize, usize) {
    let total = s.chars().count();
    if max < 0 || total <= max as usize {
        return (s.to_string(), 0, total);
    }
    let keep: String = s.chars().take(max as usize).collect();
    (keep, total - max as usize, total)
}

fn items_marker(omitted: usize) -> String {
    format!("... ({} more items)", omitted)
}

pub struct NullFormatter;

impl ReprFormatter for NullFormatter {
    fn to_repr(&self, _value: &Value, _ctx: &ReprContext) -> String {
        "null".to_string()
    }

    fn to_repr_tree(&self, value: &Value, ctx: &ReprContext) -> serde_json::Value {
        if ctx.depth > 0 {
            json!(null)
        } else {
            json!({
                "type": value.type_name(),
                "kind": value.kind_label(),
                "value": null,
            })
        }
    }
}

pub struct BoolFormatter;

impl ReprFormatter for BoolFormatter {
    fn to_repr(&self, value: &Value, _ctx: &ReprContext) -> String {
        match value {
            Value::Bool(true) => "true".to_string(),
            _ => "false".to_string(),
        }
    }

    fn to_repr_tree(&self, value: &Value, ctx: &ReprContext) -> serde_json::Value {
        leaf_tree(value, ctx, self.to_repr(value, ctx))
    }
}

pub struct CharFormatter;

impl CharFormatter {
    /// Escape body without the surrounding quotes.
    fn escape(c: char) -> String {
        match c {
            '\'' => "'".to_string(),
            '"' => "\"".to_string(),
            '\\' => "\\".to_string(),
            '\0' => "\\0".to_string(),
            '\u{7}' => "\\a".to_string(),
            '\u{8}' => "\\b".to_string(),
            '\u{c}' => "\\f".to_string(),
            '\n' => "\\n".to_string(),
            '\r' => "\\r".to_string(),
            '\t' => "\\t".to_string(),
            '\u{b}' => "\\v".to_string(),
            '\u{a0}' => "nbsp".to_string(),
            '\u{ad}' => "shy".to_string(),
            c if c.is_control() => format!("\\u{:04X}", c as u32),
            c => c.to_string(),
        }
    }
}

impl ReprFormatter for CharFormatter {
    fn to_repr(&self, value: &Value, _ctx: &ReprContext) -> String {
        match value {
            Value::Char(c) => format!("'{}'", CharFormatter::escape(*c)),
            _ => String::new(),
        }
    }

    fn to_repr_tree(&self, value: &Value, _ctx: &ReprContext) -> serde_json::Value {
        let Value::Char(c) = value else {
            return json!(null);
        };
        json!({
            "type": "char",
            "kind": "struct",
            "value": CharFormatter::escape(*c),
            "unicodeValue": format!("0x{:04X}", *c as u32),
        })
    }
}

pub struct StringFormatter;

impl ReprFormatter for StringFormatter {
    fn to_repr(&self, value: &Value, ctx: &ReprContext) -> String {
        let Value::Str(s) = value else {
            return String::new();
        };
        let (keep, omitted, _) = truncate_chars(s, ctx.config.max_string_length);
        if omitted > 0 {
            format!("\"{}... ({} more letters)\"", keep, omitted)
        } else {
            format!("\"{}\"", keep)
        }
    }

    fn to_repr_tree(&self, value: &Value, ctx: &ReprContext) -> serde_json::Value {
        let Value::Str(s) = value else {
            return json!(null);
        };
        let (keep, omitted, total) = truncate_chars(s, ctx.config.max_string_length);
        let rendered = if omitted > 0 {
            format!("{}... ({} more letters)", keep, omitted)
        } else {
            keep
        };
        json!({
            "type": "string",
            "kind": "struct",
            "length": total,
            "value": rendered,
        })
    }
}

pub struct IntFormatter;

impl ReprFormatter for IntFormatter {
    fn to_repr(&self, value: &Value, ctx: &ReprContext) -> String {
        let Value::Int(v) = value else {
            return String::new();
        };
        let style = &ctx.config.int_style;
        let digits = match (v.parts(), v) {
            (Some((negative, magnitude)), _) => format_integer(negative, magnitude, style),
            (None, IntValue::Big(big)) => format_big_integer(big, style),
            (None, _) => String::new(),
        };
        format!("{}_{}", digits, v.suffix())
    }

    fn to_repr_tree(&self, value: &Value, ctx: &ReprContext) -> serde_json::Value {
        leaf_tree(value, ctx, self.to_repr(value, ctx))
    }
}

pub struct FloatFormatter;

impl FloatFormatter {
    fn shortest(value: &FloatValue) -> String {
        match value {
            FloatValue::F32(v) => format!("{}", v),
            FloatValue::F64(v) => format!("{}", v),
            FloatValue::F16(_) => format!("{}", value.approx()),
        }
    }
}

impl ReprFormatter for FloatFormatter {
    fn to_repr(&self, value: &Value, ctx: &ReprContext) -> String {
        let Value::Float(v) = value else {
            return String::new();
        };
        let info = v.info();
        let body = if let Some(special) = special_form(&info) {
            special
        } else {
            match ctx.config.float_style {
                FloatStyle::Exact => exact_decimal(&info),
                FloatStyle::HexPower => hex_power(&info),
                FloatStyle::Shortest => FloatFormatter::shortest(v),
                ref style => pattern_decimal(v.approx(), style, &ctx.config.locale),
            }
        };
        format!("{}_{}", body, v.suffix())
    }

    fn to_repr_tree(&self, value: &Value, ctx: &ReprContext) -> serde_json::Value {
        leaf_tree(value, ctx, self.to_repr(value, ctx))
    }
}

pub struct NullableFormatter;

impl ReprFormatter for NullableFormatter {
    fn to_repr(&self, value: &Value, ctx: &ReprContext) -> String {
        let Value::Nullable(v) = value else {
            return String::new();
        };
        match (&v.value, &v.suffix) {
            (Some(inner), Some(_)) => format!("{}?", repr_value(inner, ctx)),
            (Some(inner), None) => repr_value(inner, ctx),
            (None, Some(suffix)) => format!("null_{}?", suffix),
            (None, None) => "null".to_string(),
        }
    }

    fn to_repr_tree(&self, value: &Value, ctx: &ReprContext) -> serde_json::Value {
        let Value::Nullable(v) = value else {
            return json!(null);
        };
        match (&v.value, &v.suffix) {
            (Some(_), Some(_)) => leaf_tree(value, ctx, self.to_repr(value, ctx)),
            (Some(inner), None) => tree_value(inner, ctx),
            (None, Some(suffix)) => json!(format!("null_{}?", suffix)),
            (None, None) => json!(null),
        }
    }
}

pub struct EnumFormatter;

impl ReprFormatter for EnumFormatter {
    fn to_repr(&self, value: &Value, ctx: &ReprContext) -> String {
        let Value::Enum(v) = value else {
            return String::new();
        };
        format!(
            "{}.{} ({})",
            v.type_name,
            v.variant,
            repr_value(&v.discriminant, ctx)
        )
    }

    fn to_repr_tree(&self, value: &Value, ctx: &ReprContext) -> serde_json::Value {
        let Value::Enum(v) = value else {
            return json!(null);
        };
        json!({
            "type": v.type_name,
            "kind": "enum",
            "name": v.variant,
            "value": tree_value(&v.discriminant, &ctx.with_incremented_depth()),
        })
    }
}

pub struct TupleFormatter;

impl ReprFormatter for TupleFormatter {
    fn to_repr(&self, value: &Value, ctx: &ReprContext) -> String {
        let Value::Tuple(items) = value else {
            return String::new();
        };
        if ctx.depth_exceeded() {
            return MAX_DEPTH_TEXT.to_string();
        }
        let cap = ctx.config.max_items;
        let mut parts = Vec::new();
        for (i, item) in items.iter().enumerate() {
            if cap >= 0 && i >= cap as usize {
                break;
            }
            parts.push(repr_value(item, &ctx.with_incremented_depth()));
        }
        if cap >= 0 && items.len() > cap as usize {
            parts.push(items_marker(items.len() - cap as usize));
        }
        format!("({})", parts.join(", "))
    }

    fn to_repr_tree(&self, value: &Value, ctx: &ReprContext) -> serde_json::Value {
        let Value::Tuple(items) = value else {
            return json!(null);
        };
        if ctx.depth_exceeded() {
            return max_depth_tree(value, ctx.depth);
        }
        let cap = ctx.config.max_items;
        let mut entries = Vec::new();
        for (i, item) in items.iter().enumerate() {
            if cap >= 0 && i >= cap as usize {
                break;
            }
            entries.push(tree_value(item, &ctx.with_incremented_depth()));
        }
        if cap >= 0 && items.len() > cap as usize {
            entries.push(json!(items_marker(items.len() - cap as usize)));
        }
        json!({
            "type": "Tuple",
            "kind": "struct",
            "length": items.len(),
            "value": entries,
        })
    }
}

pub struct ListFormatter;

impl ReprFormatter for ListFormatter {
    fn to_repr(&self, value: &Value, ctx: &ReprContext) -> String {
        let Value::List(list) = value else {
            return String::new();
        };
        if ctx.depth_exceeded() {
            return MAX_DEPTH_TEXT.to_string();
        }
        let identity = composite_identity(value);
        let inner_ctx = match ctx.enter_composite(identity) {
            Ok(c) => c,
            Err(_) => return circular_text(value),
        };

        let items = list.snapshot();
        let cap = ctx.config.max_items;
        let mut parts = Vec::new();
        for (i, item) in items.iter().enumerate() {
            if cap >= 0 && i >= cap as usize {
                break;
            }
            parts.push(repr_value(item, &inner_ctx.with_incremented_depth()));
        }
        if cap >= 0 && items.len() > cap as usize {
            parts.push(items_marker(items.len() - cap as usize));
        }

        let body = format!("[{}]", parts.join(", "));
        match &list.name {
            Some(name) => format!("{}({})", name, body),
            None => body,
        }
    }

    fn to_repr_tree(&self, value: &Value, ctx: &ReprContext) -> serde_json::Value {
        let Value::List(list) = value else {
            return json!(null);
        };
        if ctx.depth_exceeded() {
            return max_depth_tree(value, ctx.depth);
        }
        let identity = composite_identity(value);
        let inner_ctx = match ctx.enter_composite(identity) {
            Ok(c) => c,
            Err(_) => return circular_tree(value),
        };

        let items = list.snapshot();
        let cap = ctx.config.max_items;
        let mut entries = Vec::new();
        for (i, item) in items.iter().enumerate() {
            if cap >= 0 && i >= cap as usize {
                break;
            }
            entries.push(tree_value(item, &inner_ctx.with_incremented_depth()));
        }
        if cap >= 0 && items.len() > cap as usize {
            entries.push(json!(items_marker(items.len() - cap as usize)));
        }

        let mut node = serde_json::Map::new();
        node.insert("type".to_string(), json!(list.type_name()));
        node.insert("kind".to_string(), json!("class"));
        node.insert("hashCode".to_string(), json!(value.hash_code()));
        node.insert("count".to_string(), json!(items.len()));
        if let Some(dims) = &list.dims {
            node.insert("dimensions".to_string(), json!(dims));
        }
        node.insert("value".to_string(), json!(entries));
        serde_json::Value::Object(node)
    }
}

pub struct MapFormatter;

impl ReprFormatter for MapFormatter {
    fn to_repr(&self, value: &Value, ctx: &ReprContext) -> String {
        let Value::Map(map) = value else {
            return String::new();
        };
        if ctx.depth_exceeded() {
            return MAX_DEPTH_TEXT.to_string();
        }
        let identity = composite_identity(value);
        let inner_ctx = match ctx.enter_composite(identity) {
            Ok(c) => c,
            Err(_) => return circular_text(value),
        };

        let entries = map.snapshot();
        let cap = ctx.config.max_items;
        let mut parts = Vec::new();
        for (i, (key, val)) in entries.iter().enumerate() {
            if cap >= 0 && i >= cap as usize {
                break;
            }
            let child_ctx = inner_ctx.with_incremented_depth();
            parts.push(format!(
                "{}: {}",
                repr_value(key, &child_ctx),
                repr_value(val, &child_ctx)
            ));
        }
        if cap >= 0 && entries.len() > cap as usize {
            parts.push(items_marker(entries.len() - cap as usize));
        }

        let body = format!("{{{}}}", parts.join(", "));
        match &map.name {
            Some(name) => format!("{}({})", name, body),
            None => body,
        }
    }

    fn to_repr_tree(&self, value: &Value, ctx: &ReprContext) -> serde_json::Value {
        let Value::Map(map) = value else {
            return json!(null);
        };
        if ctx.depth_exceeded() {
            return max_depth_tree(value, ctx.depth);
        }
        let identity = composite_identity(value);
        let inner_ctx = match ctx.enter_composite(identity) {
            Ok(c) => c,
            Err(_) => return circular_tree(value),
        };

        let entries = map.snapshot();
        let cap = ctx.config.max_items;
        let mut rendered = Vec::new();
        for (i, (key, val)) in entries.iter().enumerate() {
            if cap >= 0 && i >= cap as usize {
                break;
            }
            let child_ctx = inner_ctx.with_incremented_depth();
            rendered.push(json!({
                "key": tree_value(key, &child_ctx),
                "value": tree_value(val, &child_ctx),
            }));
        }
        if cap >= 0 && entries.len() > cap as usize {
            rendered.push(json!(items_marker(entries.len() - cap as usize)));
        }

        let mut node = serde_json::Map::new();
        node.insert("type".to_string(), json!(map.type_name()));
        node.insert("kind".to_string(), json!("class"));
        node.insert("hashCode".to_string(), json!(value.hash_code()));
        node.insert("count".to_string(), json!(entries.len()));
        if let Some(key_type) = &map.key_type {
            node.insert("keyType".to_string(), json!(key_type));
        }
        if let Some(value_type) = &map.value_type {
            node.insert("valueType".to_string(), json!(value_type));
        }
        node.insert("value".to_string(), json!(rendered));
        serde_json::Value::Object(node)
    }
}

/// The fallback formatter for named composites: renders the member table
/// obtained from introspection, public before private, stored before
/// computed.
pub struct ObjectFormatter;

impl ReprFormatter for ObjectFormatter {
    fn to_repr(&self, value: &Value, ctx: &ReprContext) -> String {
        let Value::Object(object) = value else {
            return String::new();
        };
        if ctx.depth_exceeded() {
            return MAX_DEPTH_TEXT.to_string();
        }
        let identity = composite_identity(value);
        let inner_ctx = match ctx.enter_composite(identity) {
            Ok(c) => c,
            Err(_) => return circular_text(value),
        };

        let (members, truncated) = resolve_members(object, &inner_ctx, false);
        let mut parts = Vec::new();
        for member in members {
            let rendered = match member.outcome {
                MemberOutcome::Value(ref v) => {
                    repr_value(v, &inner_ctx.with_incremented_depth())
                }
                MemberOutcome::Error(ref e) => e.to_string(),
                MemberOutcome::TimedOut => TIMED_OUT_TEXT.to_string(),
            };
            parts.push(format!("{}: {}", member.display_name(), rendered));
        }
        if truncated {
            parts.push("...".to_string());
        }

        use crate::value::types::TypeKind;
        match object.kind {
            TypeKind::Record => format!("{}({{ {} }})", object.type_name, parts.join(", ")),
            _ => format!("{}({})", object.type_name, parts.join(", ")),
        }
    }

    fn to_repr_tree(&self, value: &Value, ctx: &ReprContext) -> serde_json::Value {
        let Value::Object(object) = value else {
            return json!(null);
        };
        if ctx.depth_exceeded() {
            return max_depth_tree(value, ctx.depth);
        }
        let identity = composite_identity(value);
        let inner_ctx = match ctx.enter_composite(identity) {
            Ok(c) => c,
            Err(_) => return circular_tree(value),
        };

        let mut node = serde_json::Map::new();
        node.insert("type".to_string(), json!(object.type_name));
        node.insert("kind".to_string(), json!(object.kind.label()));
        if object.kind.is_reference() {
            node.insert("hashCode".to_string(), json!(value.hash_code()));
        }

        let (members, _) = resolve_members(object, &inner_ctx, true);
        for member in members {
            let child = match member.outcome {
                MemberOutcome::Value(ref v) => {
                    tree_value(v, &inner_ctx.with_incremented_depth())
                }
                MemberOutcome::Error(ref e) => json!(e.to_string()),
                MemberOutcome::TimedOut => json!(TIMED_OUT_TEXT),
            };
            node.insert(member.display_name(), child);
        }
        serde_json::Value::Object(node)
    }
}

// Identity is defined for every value that reaches a composite formatter.
fn composite_identity(value: &Value) -> usize {
    value.identity().unwrap_or(0)
}
