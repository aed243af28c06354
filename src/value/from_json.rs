use crate::value::types::{IntValue, Member, TypeKind, Value};

/// Convert a parsed JSON document into a renderable value graph.
///
/// This is the CLI's input bridge: JSON objects become class-kind objects
/// with public stored fields in document order, arrays become lists, and
/// scalars map onto the closest typed leaf (`i64`/`u64`/`f64` for numbers).
pub fn value_from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(IntValue::I64(i))
            } else if let Some(u) = n.as_u64() {
                Value::Int(IntValue::U64(u))
            } else {
                Value::from(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::Str(s.clone()),
        serde_json::Value::Array(items) => {
            Value::list(items.iter().map(value_from_json).collect())
        }
        serde_json::Value::Object(fields) => {
            let members = fields
                .iter()
                .map(|(name, child)| {
                    let value = value_from_json(child);
                    let type_name = value.type_name();
                    Member::field(name, &type_name, value)
                })
                .collect();
            Value::object("Object", TypeKind::Class, members)
        }
    }
}
