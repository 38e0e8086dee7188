//! Built-in numeric dtypes and their auto-inference hooks, per spec.md §4.2
//! and §4.3 ("a handful of built-in numeric dtypes ship pre-declared").
//!
//! These are plain function codecs (C4) over [`Value`]'s numeric variants
//! rather than extension codecs: there is no host struct type backing
//! `i32` or `f64` the way an extension codec expects one, just a layout
//! code and a `Value` variant to move bytes in and out of.

use std::sync::Once;

use crate::codec::Codec;
use crate::error::Result;
use crate::registry::{self, DtypeKey};
use crate::value::Value;

fn layout_key(layout: &str) -> DtypeKey {
    DtypeKey::Layout(layout.to_owned())
}

macro_rules! int_codec {
    ($layout:expr, $ty:ty, $variant:ident) => {
        Codec::function(
            std::mem::size_of::<$ty>(),
            |v: &Value| {
                let n = v
                    .as_i64()
                    .ok_or_else(|| crate::error::ArrexError::Type(format!("{v:?} is not an integer")))?;
                let n = <$ty>::try_from(n).map_err(|_| {
                    crate::error::ArrexError::Size(format!(
                        "{n} does not fit in a {}-byte {}",
                        std::mem::size_of::<$ty>(),
                        stringify!($ty)
                    ))
                })?;
                Ok(n.to_le_bytes().to_vec())
            },
            |b: &[u8]| {
                let arr: [u8; std::mem::size_of::<$ty>()] =
                    b.try_into().expect("codec already checked the byte length");
                Ok(Value::$variant(<$ty>::from_le_bytes(arr)))
            },
            Some($layout.to_owned()),
            Some(layout_key($layout)),
        )
    };
}

fn float_codec(layout: &str) -> Result<Codec> {
    match layout {
        "f" => Codec::function(
            4,
            |v: &Value| {
                let n = v
                    .as_f64()
                    .or_else(|| v.as_i64().map(|i| i as f64))
                    .ok_or_else(|| crate::error::ArrexError::Type(format!("{v:?} is not a number")))?;
                Ok((n as f32).to_le_bytes().to_vec())
            },
            |b: &[u8]| {
                let arr: [u8; 4] = b.try_into().expect("codec already checked the byte length");
                Ok(Value::F32(f32::from_le_bytes(arr)))
            },
            Some("f".into()),
            Some(layout_key("f")),
        ),
        "d" => Codec::function(
            8,
            |v: &Value| {
                let n = v
                    .as_f64()
                    .or_else(|| v.as_i64().map(|i| i as f64))
                    .ok_or_else(|| crate::error::ArrexError::Type(format!("{v:?} is not a number")))?;
                Ok(n.to_le_bytes().to_vec())
            },
            |b: &[u8]| {
                let arr: [u8; 8] = b.try_into().expect("codec already checked the byte length");
                Ok(Value::F64(f64::from_le_bytes(arr)))
            },
            Some("d".into()),
            Some(layout_key("d")),
        ),
        "e" => Codec::function(
            2,
            |v: &Value| {
                let n = v
                    .as_f64()
                    .or_else(|| v.as_i64().map(|i| i as f64))
                    .ok_or_else(|| crate::error::ArrexError::Type(format!("{v:?} is not a number")))?;
                Ok(half::f16::from_f64(n).to_le_bytes().to_vec())
            },
            |b: &[u8]| {
                let arr: [u8; 2] = b.try_into().expect("codec already checked the byte length");
                Ok(Value::F16(half::f16::from_le_bytes(arr)))
            },
            Some("e".into()),
            Some(layout_key("e")),
        ),
        _ => unreachable!("float_codec called with a non-float layout"),
    }
}

static INSTALL: Once = Once::new();

/// Declares the built-in numeric dtypes and registers the auto-inference
/// hook that maps a bare [`Value::I64`]/[`Value::F64`] onto them (spec.md
/// §4.3). Idempotent; safe to call from every test and from application
/// startup alike.
pub fn install() {
    INSTALL.call_once(|| {
        let declare = |layout: &'static str, codec: Result<Codec>| {
            registry::declare(layout_key(layout), codec.expect("built-in dtype codec is well-formed"));
        };

        declare("b", int_codec!("b", i8, I8));
        declare("B", int_codec!("B", u8, U8));
        declare("h", int_codec!("h", i16, I16));
        declare("H", int_codec!("H", u16, U16));
        declare("i", int_codec!("i", i32, I32));
        declare("I", int_codec!("I", u32, U32));
        declare("l", int_codec!("l", i64, I64));
        declare("L", int_codec!("L", u64, U64));
        declare("q", int_codec!("q", i64, I64));
        declare("Q", int_codec!("Q", u64, U64));
        declare("f", float_codec("f"));
        declare("d", float_codec("d"));
        declare("e", float_codec("e"));

        // `l` (the native-size signed int) is the default integer dtype,
        // `d` (double) is the default float dtype, mirroring the
        // host-language defaults this registry is modeled on.
        registry::register_auto_hook(Box::new(|v: &Value| match v {
            Value::I64(_) | Value::I32(_) | Value::I16(_) | Value::I8(_) => {
                Some(layout_key("l"))
            }
            Value::F64(_) | Value::F32(_) => Some(layout_key("d")),
            _ => None,
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_builtins_declared() {
        install();
        for layout in ["b", "B", "h", "H", "i", "I", "l", "L", "q", "Q", "f", "d", "e"] {
            let codec = registry::declared(&layout_key(layout)).unwrap();
            assert_eq!(codec.size(), crate::layout::size_of(layout).unwrap());
        }
    }

    #[test]
    fn auto_inference_picks_native_int_and_double() {
        install();
        let codec = registry::infer_from_sample(&Value::I64(5)).unwrap();
        assert_eq!(codec.layout(), Some("l"));
        let codec = registry::infer_from_sample(&Value::F64(5.0)).unwrap();
        assert_eq!(codec.layout(), Some("d"));
    }

    #[test]
    fn round_trip_through_codec() {
        install();
        let codec = registry::declared(&layout_key("h")).unwrap();
        let packed = codec.pack(&Value::I64(-7)).unwrap();
        assert_eq!(codec.unpack(&packed).unwrap(), Value::I16(-7));
    }

    #[test]
    fn pack_rejects_out_of_range_integers() {
        install();
        let codec = registry::declared(&layout_key("b")).unwrap();
        assert!(codec.pack(&Value::I64(200)).is_err());
        assert!(codec.pack(&Value::I64(-200)).is_err());
        assert!(codec.pack(&Value::I64(127)).is_ok());

        let codec = registry::declared(&layout_key("B")).unwrap();
        assert!(codec.pack(&Value::I64(-1)).is_err());
        assert!(codec.pack(&Value::I64(256)).is_err());
        assert!(codec.pack(&Value::I64(255)).is_ok());
    }
}
