//! Typed values stored in token fields

mod display;
mod impls;

use std::sync::Arc;

use crate::token::Token;

/// A typed field value.
///
/// Values are organized into two tiers:
/// - Tier 1: Inline scalars (no allocation)
/// - Tier 2: Heap-allocated payloads (Arc-wrapped, cheap to clone)
///
/// Cloning a value never deep-copies its payload, so duplicating a
/// [`Structure`](crate::Structure) stays proportional to its field count.
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Inline Scalars
    // ═══════════════════════════════════════════════════════════════════
    /// Boolean, typically a permission flag
    Bool(bool),

    /// 32-bit signed integer
    I32(i32),
    /// 64-bit signed integer (default integer type)
    I64(i64),
    /// 32-bit unsigned integer
    U32(u32),
    /// 64-bit unsigned integer
    U64(u64),

    /// 64-bit floating point
    F64(f64),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Heap-Allocated Payloads
    // ═══════════════════════════════════════════════════════════════════
    /// Immutable string, e.g. a role or user name
    String(Arc<str>),

    /// Opaque byte payload, e.g. a credential digest
    Bytes(Arc<[u8]>),

    /// Ordered list of values
    List(Arc<Vec<Value>>),

    /// Nested token, e.g. per-transport client settings.
    ///
    /// Holding a token here shares it; the nested store stays read-only
    /// until every other handle is released.
    Token(Token),
}

impl Value {
    /// Name of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F64(_) => "f64",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::List(_) => "List",
            Value::Token(_) => "Token",
        }
    }
}
