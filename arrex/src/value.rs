//! A dynamically-typed element value.
//!
//! Python's original lets any object be packed as long as its type is
//! registered; a Rust crate has no duck-typed "any value" to hand back
//! from `unpack`, so codecs speak a small closed value type instead. This
//! mirrors how the corpus represents dynamically-typed scalars in
//! interpreter/VM-shaped code (a tagged enum of primitives plus a
//! structured fallback), rather than exposing `Box<dyn Any>`.

use half::f16;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    F16(f16),
    Bytes(Vec<u8>),
    Tuple(Vec<Value>),
}

macro_rules! from_impl {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

from_impl!(I8, i8);
from_impl!(U8, u8);
from_impl!(I16, i16);
from_impl!(U16, u16);
from_impl!(I32, i32);
from_impl!(U32, u32);
from_impl!(I64, i64);
from_impl!(U64, u64);
from_impl!(F32, f32);
from_impl!(F64, f64);
from_impl!(F16, f16);
from_impl!(Bytes, Vec<u8>);

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I8(v) => Some(v as i64),
            Value::U8(v) => Some(v as i64),
            Value::I16(v) => Some(v as i64),
            Value::U16(v) => Some(v as i64),
            Value::I32(v) => Some(v as i64),
            Value::U32(v) => Some(v as i64),
            Value::I64(v) => Some(v),
            Value::U64(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(v) => Some(v as f64),
            Value::F64(v) => Some(v),
            Value::F16(v) => Some(v.to_f64()),
            _ => None,
        }
    }
}
