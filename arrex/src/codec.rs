//! Codec interface (C2) and its two variants (C3 extension, C4 function).
//!
//! Both variants end up as the same runtime shape — a pair of boxed
//! `pack`/`unpack` closures over [`Value`] — because the difference
//! between them is how those closures get built, not how they run:
//! the extension variant derives them from a `bytemuck::Pod` host type
//! (raw byte copies, no call into user code unless a constructor is
//! supplied), the function variant wraps user-supplied closures directly.

use std::any::TypeId;
use std::sync::Arc;

use crate::error::{ArrexError, Result};
use crate::registry::DtypeKey;
use crate::value::Value;

/// Which concrete strategy produced a [`Codec`]. Exposed for introspection
/// only; both variants are driven through the same `pack`/`unpack` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Extension,
    Function,
}

/// A host-language type whose in-memory payload *is* the packed record
/// described by `LAYOUT`. Implementors vouch that their type has no
/// padding ambiguity and no pointers (spec.md §9's documented
/// precondition) — `bytemuck::Pod` enforces the padding/pointer part at
/// the type-system level, but the chosen `LAYOUT` must still describe
/// the same byte size, which [`Codec::extension`] checks at registration
/// time.
pub trait Element: bytemuck::Pod + Send + Sync + 'static {
    const LAYOUT: &'static str;

    fn dtype_key() -> DtypeKey {
        DtypeKey::Type(TypeId::of::<Self>(), std::any::type_name::<Self>())
    }

    fn to_value(&self) -> Value;
    fn from_value(v: &Value) -> Result<Self>
    where
        Self: Sized;
}

type PackFn = Box<dyn Fn(&Value) -> Result<Vec<u8>> + Send + Sync>;
type UnpackFn = Box<dyn Fn(&[u8]) -> Result<Value> + Send + Sync>;

struct CodecInner {
    size: usize,
    layout: Option<String>,
    key: Option<DtypeKey>,
    variant: Variant,
    pack: PackFn,
    unpack: UnpackFn,
}

/// An immutable, identity-compared dtype descriptor (spec.md §3).
#[derive(Clone)]
pub struct Codec(Arc<CodecInner>);

impl PartialEq for Codec {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for Codec {}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("size", &self.0.size)
            .field("layout", &self.0.layout)
            .field("variant", &self.0.variant)
            .finish()
    }
}

impl Codec {
    /// Builds an extension codec (C3) over a POD host type.
    ///
    /// `ctor`, if given, is invoked on the freshly unpacked value to
    /// validate or transform it — this is the only point at which an
    /// extension codec calls into user code.
    pub fn extension<T: Element>(
        ctor: Option<Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>>,
    ) -> Result<Self> {
        let layout = T::LAYOUT.to_owned();
        let declared_size = crate::layout::size_of(&layout)?;
        let native_size = std::mem::size_of::<T>();
        if declared_size != native_size {
            return Err(ArrexError::Size(format!(
                "layout {layout:?} describes {declared_size} bytes but {} is {native_size} bytes",
                std::any::type_name::<T>()
            )));
        }
        let pack: PackFn = Box::new(|v: &Value| {
            let t = T::from_value(v)?;
            Ok(bytemuck::bytes_of(&t).to_vec())
        });
        let unpack: UnpackFn = Box::new(move |bytes: &[u8]| {
            let t: &T = bytemuck::try_from_bytes(bytes)
                .map_err(|e| ArrexError::Size(e.to_string()))?;
            let value = t.to_value();
            match &ctor {
                Some(ctor) => ctor(value),
                None => Ok(value),
            }
        });
        Ok(Codec(Arc::new(CodecInner {
            size: native_size,
            layout: Some(layout),
            key: Some(T::dtype_key()),
            variant: Variant::Extension,
            pack,
            unpack,
        })))
    }

    /// Builds a function codec (C4) from user-supplied pack/unpack
    /// closures plus a declared byte size.
    pub fn function(
        size: usize,
        pack_fn: impl Fn(&Value) -> Result<Vec<u8>> + Send + Sync + 'static,
        unpack_fn: impl Fn(&[u8]) -> Result<Value> + Send + Sync + 'static,
        layout: Option<String>,
        key: Option<DtypeKey>,
    ) -> Result<Self> {
        if let Some(layout) = &layout {
            let declared = crate::layout::size_of(layout)?;
            if declared != size {
                return Err(ArrexError::Size(format!(
                    "layout {layout:?} describes {declared} bytes but size={size} was given"
                )));
            }
        }
        let pack: PackFn = Box::new(move |v| {
            let bytes = pack_fn(v)?;
            if bytes.len() != size {
                return Err(ArrexError::Size(format!(
                    "pack produced {} bytes, expected {size}",
                    bytes.len()
                )));
            }
            Ok(bytes)
        });
        let unpack: UnpackFn = Box::new(move |b| unpack_fn(b));
        Ok(Codec(Arc::new(CodecInner {
            size,
            layout,
            key,
            variant: Variant::Function,
            pack,
            unpack,
        })))
    }

    pub fn size(&self) -> usize {
        self.0.size
    }

    pub fn layout(&self) -> Option<&str> {
        self.0.layout.as_deref()
    }

    pub fn key(&self) -> Option<&DtypeKey> {
        self.0.key.as_ref()
    }

    pub fn variant(&self) -> Variant {
        self.0.variant
    }

    pub fn pack(&self, value: &Value) -> Result<Vec<u8>> {
        (self.0.pack)(value)
    }

    pub fn unpack(&self, bytes: &[u8]) -> Result<Value> {
        if bytes.len() != self.0.size {
            return Err(ArrexError::Size(format!(
                "expected {} bytes, got {}",
                self.0.size,
                bytes.len()
            )));
        }
        (self.0.unpack)(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
    #[repr(C)]
    struct Pair(i32, i32);

    impl Element for Pair {
        const LAYOUT: &'static str = "ii";

        fn to_value(&self) -> Value {
            Value::Tuple(vec![Value::I32(self.0), Value::I32(self.1)])
        }

        fn from_value(v: &Value) -> Result<Self> {
            match v {
                Value::Tuple(items) if items.len() == 2 => {
                    let a = items[0].as_i64().ok_or_else(|| ArrexError::Type("not an int".into()))? as i32;
                    let b = items[1].as_i64().ok_or_else(|| ArrexError::Type("not an int".into()))? as i32;
                    Ok(Pair(a, b))
                }
                _ => Err(ArrexError::Type("expected a 2-tuple".into())),
            }
        }
    }

    #[test]
    fn extension_round_trip() {
        let codec = Codec::extension::<Pair>(None).unwrap();
        let v = Value::Tuple(vec![Value::I32(1), Value::I32(2)]);
        let packed = codec.pack(&v).unwrap();
        assert_eq!(packed.len(), 8);
        let unpacked = codec.unpack(&packed).unwrap();
        assert_eq!(unpacked, v);
    }

    #[test]
    fn extension_size_mismatch_rejected() {
        #[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
        #[repr(C)]
        struct Wrong(i32, i32);
        impl Element for Wrong {
            const LAYOUT: &'static str = "i"; // 4 bytes, but Wrong is 8
            fn to_value(&self) -> Value {
                Value::I32(self.0)
            }
            fn from_value(v: &Value) -> Result<Self> {
                Ok(Wrong(v.as_i64().unwrap_or_default() as i32, 0))
            }
        }
        assert!(Codec::extension::<Wrong>(None).is_err());
    }

    #[test]
    fn function_codec_checks_packed_size() {
        let codec = Codec::function(
            4,
            |v| Ok((v.as_i64().unwrap_or_default() as i32).to_le_bytes().to_vec()),
            |b| Ok(Value::I32(i32::from_le_bytes(b.try_into().unwrap()))),
            Some("i".into()),
            None,
        )
        .unwrap();
        assert_eq!(codec.pack(&Value::I32(7)).unwrap(), 7i32.to_le_bytes());
    }

    #[test]
    fn identity_equality() {
        let a = Codec::extension::<Pair>(None).unwrap();
        let b = Codec::extension::<Pair>(None).unwrap();
        assert_ne!(a, b); // distinct instances, same layout
        assert_eq!(a.clone(), a);
    }
}
