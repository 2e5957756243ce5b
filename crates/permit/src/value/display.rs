//! Display and Debug implementations for Value

use std::fmt;

use super::*;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),

            Value::I32(n) => write!(f, "{}i32", n),
            Value::I64(n) => write!(f, "{}", n), // Default integer type
            Value::U32(n) => write!(f, "{}u32", n),
            Value::U64(n) => write!(f, "{}u64", n),

            Value::F64(n) => write!(f, "{:?}", n),

            Value::String(s) => write!(f, "{:?}", s.as_ref()),
            Value::Bytes(b) => write!(f, "b{:?}", b.as_ref()),

            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, "]")
            }

            Value::Token(t) => write!(f, "({})", t.structure()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s.as_ref()), // No quotes for Display
            _ => fmt::Debug::fmt(self, f),
        }
    }
}
