use std::fmt;
use std::sync::Arc;

use crate::render::context::ReprContext;
use crate::render::formatters::*;
use crate::value::types::{Value, ValueKind};

/// A formatter for one shape of value, producing both output forms.
pub trait ReprFormatter: Send + Sync {
    fn to_repr(&self, value: &Value, ctx: &ReprContext) -> String;
    fn to_repr_tree(&self, value: &Value, ctx: &ReprContext) -> serde_json::Value;
}

/// Predicate deciding whether a registry entry applies to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMatcher {
    /// Matches the declared type name exactly (`"Point"`, `"Queue"`).
    Exact(String),
    /// Matches every value of one structural kind.
    Kind(ValueKind),
}

/// Ordered type-to-formatter dispatch table.
///
/// Resolution precedence is explicit rather than inherited: an exact type
/// name match wins over any kind match, kind matches are tried in
/// registration order, and the generic object formatter is the fallback
/// for anything unclaimed.
pub struct FormatterRegistry {
    entries: Vec<(TypeMatcher, Arc<dyn ReprFormatter>)>,
    fallback: Arc<dyn ReprFormatter>,
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("entries", &self.entries.iter().map(|(m, _)| m).collect::<Vec<_>>())
            .finish()
    }
}

impl FormatterRegistry {
    pub fn empty() -> FormatterRegistry {
        FormatterRegistry {
            entries: Vec::new(),
            fallback: Arc::new(ObjectFormatter),
        }
    }

    /// The stock dispatch table covering every built-in value shape.
    pub fn with_defaults() -> FormatterRegistry {
        let mut registry = FormatterRegistry::empty();
        registry.register_kind(ValueKind::Null, Arc::new(NullFormatter));
        registry.register_kind(ValueKind::Bool, Arc::new(BoolFormatter));
        registry.register_kind(ValueKind::Int, Arc::new(IntFormatter));
        registry.register_kind(ValueKind::Float, Arc::new(FloatFormatter));
        registry.register_kind(ValueKind::Char, Arc::new(CharFormatter));
        registry.register_kind(ValueKind::Str, Arc::new(StringFormatter));
        registry.register_kind(ValueKind::Nullable, Arc::new(NullableFormatter));
        registry.register_kind(ValueKind::Tuple, Arc::new(TupleFormatter));
        registry.register_kind(ValueKind::Enum, Arc::new(EnumFormatter));
        registry.register_kind(ValueKind::List, Arc::new(ListFormatter));
        registry.register_kind(ValueKind::Map, Arc::new(MapFormatter));
        registry.register_kind(ValueKind::Object, Arc::new(ObjectFormatter));
        registry
    }

    pub fn register_exact(&mut self, type_name: &str, formatter: Arc<dyn ReprFormatter>) {
        self.entries
            .push((TypeMatcher::Exact(type_name.to_string()), formatter));
    }

    pub fn register_kind(&mut self, kind: ValueKind, formatter: Arc<dyn ReprFormatter>) {
        self.entries.push((TypeMatcher::Kind(kind), formatter));
    }

    pub fn resolve(&self, value: &Value) -> &dyn ReprFormatter {
        let type_name = value.type_name();
        for (matcher, formatter) in &self.entries {
            if matches!(matcher, TypeMatcher::Exact(name) if *name == type_name) {
                return formatter.as_ref();
            }
        }
        let kind = value.value_kind();
        for (matcher, formatter) in &self.entries {
            if matches!(matcher, TypeMatcher::Kind(k) if *k == kind) {
                return formatter.as_ref();
            }
        }
        self.fallback.as_ref()
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        FormatterRegistry::with_defaults()
    }
}
