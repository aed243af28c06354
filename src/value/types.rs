use num_bigint::BigInt;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::numeric::{analyze_f16_bits, analyze_f32, analyze_f64, FloatInfo};

/// Runtime value graph traversed by the renderer.
///
/// Rust has no runtime reflection, so composites are explicit: an
/// `ObjectValue` carries the member table a reflective runtime would
/// discover, including computed accessors as closures. Containers and
/// objects sit behind `Arc` so graphs are cheap to share, safe to hand to
/// accessor worker threads, and can be made circular after construction;
/// the `Arc` pointer doubles as the per-call identity used for cycle
/// detection.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(IntValue),
    Float(FloatValue),
    Char(char),
    Str(String),
    Nullable(NullableValue),
    Tuple(Vec<Value>),
    Enum(Box<EnumValue>),
    List(Arc<ListValue>),
    Map(Arc<MapValue>),
    Object(Arc<ObjectValue>),
}

/// Category tag used for dispatch and for the `kind` field in tree mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Char,
    Str,
    Nullable,
    Tuple,
    Enum,
    List,
    Map,
    Object,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Big(BigInt),
}

impl IntValue {
    /// Width/signedness suffix appended to every rendered integer.
    pub fn suffix(&self) -> &'static str {
        match self {
            IntValue::I8(_) => "i8",
            IntValue::I16(_) => "i16",
            IntValue::I32(_) => "i32",
            IntValue::I64(_) => "i64",
            IntValue::I128(_) => "i128",
            IntValue::U8(_) => "u8",
            IntValue::U16(_) => "u16",
            IntValue::U32(_) => "u32",
            IntValue::U64(_) => "u64",
            IntValue::U128(_) => "u128",
            IntValue::Big(_) => "n",
        }
    }

    /// Sign-and-magnitude decomposition for the native widths. `Big`
    /// values take the arbitrary-precision path instead.
    pub fn parts(&self) -> Option<(bool, u128)> {
        match self {
            IntValue::I8(v) => Some((*v < 0, v.unsigned_abs() as u128)),
            IntValue::I16(v) => Some((*v < 0, v.unsigned_abs() as u128)),
            IntValue::I32(v) => Some((*v < 0, v.unsigned_abs() as u128)),
            IntValue::I64(v) => Some((*v < 0, v.unsigned_abs() as u128)),
            IntValue::I128(v) => Some((*v < 0, v.unsigned_abs())),
            IntValue::U8(v) => Some((false, *v as u128)),
            IntValue::U16(v) => Some((false, *v as u128)),
            IntValue::U32(v) => Some((false, *v as u128)),
            IntValue::U64(v) => Some((false, *v as u128)),
            IntValue::U128(v) => Some((false, *v)),
            IntValue::Big(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            IntValue::Big(_) => "BigInt",
            _ => self.suffix(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloatValue {
    /// Raw binary16 bits; there is no stable `f16` primitive.
    F16(u16),
    F32(f32),
    F64(f64),
}

impl FloatValue {
    pub fn suffix(&self) -> &'static str {
        match self {
            FloatValue::F16(_) => "f16",
            FloatValue::F32(_) => "f32",
            FloatValue::F64(_) => "f64",
        }
    }

    pub fn info(&self) -> FloatInfo {
        match self {
            FloatValue::F16(bits) => analyze_f16_bits(*bits),
            FloatValue::F32(v) => analyze_f32(*v),
            FloatValue::F64(v) => analyze_f64(*v),
        }
    }

    /// The value widened to f64 for pattern-based formatting. Exact for
    /// every f16 and f32 input.
    pub fn approx(&self) -> f64 {
        match self {
            FloatValue::F16(_) => self.info().approx(),
            FloatValue::F32(v) => *v as f64,
            FloatValue::F64(v) => *v,
        }
    }
}

/// A value of a nullable (optional) declared type. The suffix hint keeps
/// the numeric width visible even when the value is absent, so a missing
/// `i32?` renders as `null_i32?` rather than a bare `null`.
#[derive(Debug, Clone)]
pub struct NullableValue {
    pub suffix: Option<String>,
    pub value: Option<Box<Value>>,
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub type_name: String,
    pub variant: String,
    pub discriminant: Value,
}

#[derive(Debug)]
pub struct ListValue {
    /// Display name wrapped around the bracket form (`Queue([...])`);
    /// `None` renders as a plain `List`.
    pub name: Option<String>,
    /// Grid shape hint for nested lists; surfaces as `dimensions` in tree
    /// mode.
    pub dims: Option<Vec<usize>>,
    items: Mutex<Vec<Value>>,
}

impl ListValue {
    pub fn new(name: Option<&str>, items: Vec<Value>) -> ListValue {
        ListValue {
            name: name.map(str::to_string),
            dims: None,
            items: Mutex::new(items),
        }
    }

    pub fn with_dims(name: Option<&str>, dims: Vec<usize>, items: Vec<Value>) -> ListValue {
        ListValue {
            name: name.map(str::to_string),
            dims: Some(dims),
            items: Mutex::new(items),
        }
    }

    pub fn push(&self, value: Value) {
        lock(&self.items).push(value);
    }

    /// Snapshot of the items. The lock is held only for the clone so the
    /// renderer never re-enters a held mutex on self-referential graphs.
    pub fn snapshot(&self) -> Vec<Value> {
        lock(&self.items).clone()
    }

    pub fn type_name(&self) -> &str {
        self.name.as_deref().unwrap_or("List")
    }
}

#[derive(Debug)]
pub struct MapValue {
    pub name: Option<String>,
    pub key_type: Option<String>,
    pub value_type: Option<String>,
    entries: Mutex<Vec<(Value, Value)>>,
}

impl MapValue {
    pub fn new(entries: Vec<(Value, Value)>) -> MapValue {
        MapValue {
            name: None,
            key_type: None,
            value_type: None,
            entries: Mutex::new(entries),
        }
    }

    pub fn with_types(key_type: &str, value_type: &str, entries: Vec<(Value, Value)>) -> MapValue {
        MapValue {
            name: None,
            key_type: Some(key_type.to_string()),
            value_type: Some(value_type.to_string()),
            entries: Mutex::new(entries),
        }
    }

    pub fn insert(&self, key: Value, value: Value) {
        lock(&self.entries).push((key, value));
    }

    pub fn snapshot(&self) -> Vec<(Value, Value)> {
        lock(&self.entries).clone()
    }

    pub fn type_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Dictionary")
    }
}

/// Declared category of an object type, mirrored into the tree `kind` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Struct,
    Record,
}

impl TypeKind {
    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Record => "record",
        }
    }

    /// Reference-kind values carry an identity hash in tree mode;
    /// value-kind ones do not.
    pub fn is_reference(&self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::Record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberVisibility {
    Public,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Computed,
}

/// Failure raised by a member accessor, rendered as `[<Kind>: <message>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessError {
    pub kind: String,
    pub message: String,
}

impl AccessError {
    pub fn new(kind: &str, message: impl Into<String>) -> AccessError {
        AccessError {
            kind: kind.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}: {}]", self.kind, self.message)
    }
}

pub type Accessor = Arc<dyn Fn() -> Result<Value, AccessError> + Send + Sync>;

#[derive(Clone)]
pub enum MemberAccess {
    Stored(Value),
    Computed(Accessor),
}

impl fmt::Debug for MemberAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberAccess::Stored(v) => f.debug_tuple("Stored").field(v).finish(),
            MemberAccess::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// One entry of an object's member table, in declared order.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub type_name: String,
    pub visibility: MemberVisibility,
    pub kind: MemberKind,
    pub access: MemberAccess,
}

impl Member {
    pub fn field(name: &str, type_name: &str, value: Value) -> Member {
        Member {
            name: name.to_string(),
            type_name: type_name.to_string(),
            visibility: MemberVisibility::Public,
            kind: MemberKind::Field,
            access: MemberAccess::Stored(value),
        }
    }

    pub fn private_field(name: &str, type_name: &str, value: Value) -> Member {
        Member {
            visibility: MemberVisibility::Private,
            ..Member::field(name, type_name, value)
        }
    }

    pub fn computed<F>(name: &str, type_name: &str, accessor: F) -> Member
    where
        F: Fn() -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        Member {
            name: name.to_string(),
            type_name: type_name.to_string(),
            visibility: MemberVisibility::Public,
            kind: MemberKind::Computed,
            access: MemberAccess::Computed(Arc::new(accessor)),
        }
    }

    pub fn private_computed<F>(name: &str, type_name: &str, accessor: F) -> Member
    where
        F: Fn() -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        Member {
            visibility: MemberVisibility::Private,
            ..Member::computed(name, type_name, accessor)
        }
    }
}

#[derive(Debug)]
pub struct ObjectValue {
    pub type_name: String,
    pub kind: TypeKind,
    members: Mutex<Vec<Member>>,
}

impl ObjectValue {
    pub fn new(type_name: &str, kind: TypeKind, members: Vec<Member>) -> ObjectValue {
        ObjectValue {
            type_name: type_name.to_string(),
            kind,
            members: Mutex::new(members),
        }
    }

    pub fn push_member(&self, member: Member) {
        lock(&self.members).push(member);
    }

    pub fn snapshot(&self) -> Vec<Member> {
        lock(&self.members).clone()
    }
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Arc::new(ListValue::new(None, items)))
    }

    pub fn named_list(name: &str, items: Vec<Value>) -> Value {
        Value::List(Arc::new(ListValue::new(Some(name), items)))
    }

    pub fn map(entries: Vec<(Value, Value)>) -> Value {
        Value::Map(Arc::new(MapValue::new(entries)))
    }

    pub fn object(type_name: &str, kind: TypeKind, members: Vec<Member>) -> Value {
        Value::Object(Arc::new(ObjectValue::new(type_name, kind, members)))
    }

    pub fn enum_value(type_name: &str, variant: &str, discriminant: Value) -> Value {
        Value::Enum(Box::new(EnumValue {
            type_name: type_name.to_string(),
            variant: variant.to_string(),
            discriminant,
        }))
    }

    pub fn nullable(suffix: Option<&str>, value: Option<Value>) -> Value {
        Value::Nullable(NullableValue {
            suffix: suffix.map(str::to_string),
            value: value.map(Box::new),
        })
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Char(_) => ValueKind::Char,
            Value::Str(_) => ValueKind::Str,
            Value::Nullable(_) => ValueKind::Nullable,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::Enum(_) => ValueKind::Enum,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Declared type name surfaced in sentinels and tree nodes.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(v) => v.type_name().to_string(),
            Value::Float(v) => v.suffix().to_string(),
            Value::Char(_) => "char".to_string(),
            Value::Str(_) => "string".to_string(),
            Value::Nullable(v) => match (&v.suffix, &v.value) {
                (Some(s), _) => format!("{}?", s),
                (None, Some(inner)) => format!("{}?", inner.type_name()),
                (None, None) => "null".to_string(),
            },
            Value::Tuple(_) => "Tuple".to_string(),
            Value::Enum(v) => v.type_name.clone(),
            Value::List(v) => v.type_name().to_string(),
            Value::Map(v) => v.type_name().to_string(),
            Value::Object(v) => v.type_name.clone(),
        }
    }

    /// The `kind` tag in tree mode.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Value::Enum(_) => "enum",
            Value::List(_) | Value::Map(_) => "class",
            Value::Object(v) => v.kind.label(),
            _ => "struct",
        }
    }

    /// Per-call-stable identity for reference-kind values. Distinct `Arc`
    /// handles to the same allocation share one identity, which is what
    /// cycle detection needs.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::List(v) => Some(Arc::as_ptr(v) as usize),
            Value::Map(v) => Some(Arc::as_ptr(v) as usize),
            Value::Object(v) => Some(Arc::as_ptr(v) as usize),
            _ => None,
        }
    }

    /// Identity rendered the way tree nodes and cycle sentinels print it:
    /// `0x` plus eight hex digits derived from the runtime identity.
    pub fn hash_code(&self) -> Option<String> {
        self.identity().map(|id| format!("0x{:08X}", id as u32))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value::Int(IntValue::I32(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Int(IntValue::I64(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Value {
        Value::Float(FloatValue::F32(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Float(FloatValue::F64(v))
    }
}

impl From<char> for Value {
    fn from(v: char) -> Value {
        Value::Char(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::Str(v)
    }
}

// A poisoned lock only means an accessor thread panicked while the graph
// was shared with it; the data is still renderable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
