//! Typed list (C7) and slice view (C8): a resizable packed array bound to
//! one [`Codec`], and the non-owning window over a shared buffer that
//! shares its entire API surface (spec.md §3, §4.5, §4.6).
//!
//! Both are the same type here: an owning list and a view differ only in
//! `owns_buffer`, exactly as spec.md §3 models them as the same tuple
//! shape with that one flag flipped.

use serde::de::Error as DeError;
use serde::ser::{Error as SerError, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::buffer::RawBuffer;
use crate::codec::Codec;
use crate::error::{ArrexError, Result};
use crate::registry;
use crate::value::Value;

pub struct TypedList {
    codec: Codec,
    buffer: RawBuffer,
    /// Byte offset of element 0 within `buffer`.
    offset: usize,
    /// Element count.
    len: usize,
    owns_buffer: bool,
}

impl TypedList {
    pub fn new(codec: Codec) -> Self {
        TypedList {
            codec,
            buffer: RawBuffer::new(0),
            offset: 0,
            len: 0,
            owns_buffer: true,
        }
    }

    /// Builds a list from an iterable of values. If `codec` is `None`, it
    /// is inferred from the first element via [`registry::infer_from_sample`].
    /// Partially-packed elements are *not* kept on failure here (unlike
    /// [`TypedList::extend`]) because there is no pre-existing list whose
    /// prior state would need preserving.
    pub fn from_iterable<I>(values: I, codec: Option<Codec>) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut values = values.into_iter().peekable();
        let codec = match codec {
            Some(codec) => codec,
            None => {
                let first = values.peek().ok_or_else(|| {
                    ArrexError::UnknownDtype(crate::error::KeyDisplay(
                        "cannot infer a dtype from an empty iterable".into(),
                    ))
                })?;
                registry::infer_from_sample(first)?
            }
        };
        let mut list = TypedList::new(codec);
        list.extend(values)?;
        Ok(list)
    }

    /// Wraps an existing [`RawBuffer`] as a non-owning view, per spec.md
    /// §4.5's `from_buffer`. Fails if the buffer's length is not a
    /// multiple of the codec's size.
    pub fn from_buffer(buffer: RawBuffer, codec: Codec) -> Result<Self> {
        let size = codec.size();
        if size == 0 || buffer.len() % size != 0 {
            return Err(ArrexError::Size(format!(
                "buffer of {} bytes is not a multiple of element size {size}",
                buffer.len()
            )));
        }
        let len = buffer.len() / size;
        Ok(TypedList {
            codec,
            buffer,
            offset: 0,
            len,
            owns_buffer: false,
        })
    }

    fn owned_from_bytes(bytes: Vec<u8>, codec: Codec) -> Result<Self> {
        let mut list = TypedList::from_buffer(RawBuffer::from_vec(bytes), codec)?;
        list.owns_buffer = true;
        Ok(list)
    }

    /// Pre-allocates `count` elements, all packed from `value`.
    pub fn full(value: &Value, count: usize, codec: Codec) -> Result<Self> {
        let bytes = codec.pack(value)?;
        let mut raw = Vec::with_capacity(bytes.len() * count);
        for _ in 0..count {
            raw.extend_from_slice(&bytes);
        }
        Ok(TypedList {
            codec,
            buffer: RawBuffer::from_vec(raw),
            offset: 0,
            len: count,
            owns_buffer: true,
        })
    }

    // -- queries -----------------------------------------------------

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte length of the element region (spec.md's `size`).
    pub fn size_bytes(&self) -> usize {
        self.len * self.codec.size()
    }

    pub fn element_size(&self) -> usize {
        self.codec.size()
    }

    /// Capacity, in elements, available in the backing buffer beyond this
    /// list's current offset.
    pub fn capacity(&self) -> usize {
        let size = self.codec.size();
        if size == 0 {
            return 0;
        }
        self.buffer.capacity().saturating_sub(self.offset) / size
    }

    pub fn dtype(&self) -> &Codec {
        &self.codec
    }

    pub fn owner(&self) -> &RawBuffer {
        &self.buffer
    }

    pub fn owns_buffer(&self) -> bool {
        self.owns_buffer
    }

    /// The raw bytes of this list's element region, read-locked for the
    /// guard's lifetime. Derefs to `&[u8]`.
    pub fn element_bytes(&self) -> crate::buffer::BytesGuard<'_> {
        let start = self.offset;
        let end = start + self.size_bytes();
        self.buffer.bytes_in(start..end)
    }

    fn byte_range(&self, index: usize) -> std::ops::Range<usize> {
        let size = self.codec.size();
        let start = self.offset + index * size;
        start..start + size
    }

    fn normalize(&self, index: isize) -> Result<usize> {
        let len = self.len as isize;
        let idx = if index < 0 { index + len } else { index };
        if idx < 0 || idx >= len {
            return Err(ArrexError::Index {
                index,
                len: self.len,
            });
        }
        Ok(idx as usize)
    }

    /// Clips `[start, stop)` to `[0, len]` after resolving negative
    /// indices, per spec.md boundary behavior #12 ("slicing past end
    /// clips silently").
    fn clip_range(&self, start: isize, stop: isize) -> (usize, usize) {
        let len = self.len as isize;
        let clamp = |v: isize| (if v < 0 { v + len } else { v }).clamp(0, len);
        let s = clamp(start);
        let e = clamp(stop).max(s);
        (s as usize, e as usize)
    }

    fn require_owned(&self) -> Result<()> {
        if !self.owns_buffer {
            return Err(ArrexError::Invariant(
                "this operation would change the length of a non-owning view".into(),
            ));
        }
        Ok(())
    }

    // -- positional access --------------------------------------------

    pub fn get(&self, index: isize) -> Result<Value> {
        let idx = self.normalize(index)?;
        self.codec.unpack(&self.buffer.bytes_in(self.byte_range(idx)))
    }

    /// Packs `value` into slot `index`. If this list is a non-owning view
    /// over a shared buffer, the parent is mutated directly — no
    /// copy-on-write is triggered (spec.md §4.5, documented behavior).
    pub fn set(&mut self, index: isize, value: &Value) -> Result<()> {
        let idx = self.normalize(index)?;
        let bytes = self.codec.pack(value)?;
        let range = self.byte_range(idx);
        self.buffer.write_in_place(range, &bytes);
        Ok(())
    }

    /// A zero-copy window `[start, stop)` sharing this list's buffer.
    pub fn slice(&self, start: isize, stop: isize) -> Result<TypedList> {
        let (s, e) = self.clip_range(start, stop);
        Ok(TypedList {
            codec: self.codec.clone(),
            buffer: self.buffer.clone(),
            offset: self.offset + s * self.codec.size(),
            len: e - s,
            owns_buffer: false,
        })
    }

    /// As [`slice`], but rejects a non-unit `step` (spec.md: "step ≠ 1
    /// fails with NotSupportedError").
    pub fn slice_stepped(&self, start: isize, stop: isize, step: isize) -> Result<TypedList> {
        if step != 1 {
            return Err(ArrexError::NotSupported(
                "only a slice step of 1 is supported".into(),
            ));
        }
        self.slice(start, stop)
    }

    /// Replaces `[start, stop)` with the packed bytes of `values`. The
    /// element count may change. Atomic: if any value fails to pack, the
    /// list is left untouched.
    pub fn set_slice<I>(&mut self, start: isize, stop: isize, values: I) -> Result<()>
    where
        I: IntoIterator<Item = Value>,
    {
        self.require_owned()?;
        let (s, e) = self.clip_range(start, stop);
        let mut packed = Vec::new();
        for v in values {
            packed.extend(self.codec.pack(&v)?);
        }
        let byte_s = self.offset + s * self.codec.size();
        let byte_e = self.offset + e * self.codec.size();
        self.buffer.splice_remove(byte_s..byte_e);
        self.buffer.splice_insert(byte_s, &packed);
        let inserted = packed.len() / self.codec.size();
        self.len = self.len - (e - s) + inserted;
        Ok(())
    }

    // -- mutation ------------------------------------------------------

    /// Strictly atomic: failure leaves the list's length unchanged
    /// (spec.md §7).
    pub fn append(&mut self, value: &Value) -> Result<()> {
        self.require_owned()?;
        let bytes = self.codec.pack(value)?;
        self.buffer.extend_from_slice(&bytes);
        self.len += 1;
        Ok(())
    }

    /// All-or-nothing per element: if packing fails partway through,
    /// elements packed so far are kept (spec.md §7).
    pub fn extend<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = Value>,
    {
        self.require_owned()?;
        for value in values {
            let bytes = self.codec.pack(&value)?;
            self.buffer.extend_from_slice(&bytes);
            self.len += 1;
        }
        Ok(())
    }

    pub fn insert(&mut self, index: isize, value: &Value) -> Result<()> {
        self.require_owned()?;
        let bytes = self.codec.pack(value)?;
        let len = self.len as isize;
        let idx = (if index < 0 { index + len } else { index }).clamp(0, len) as usize;
        let at = self.offset + idx * self.codec.size();
        self.buffer.splice_insert(at, &bytes);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the element at `index` (default: the last).
    pub fn pop(&mut self, index: Option<isize>) -> Result<Value> {
        self.require_owned()?;
        let idx = self.normalize(index.unwrap_or(-1))?;
        let range = self.byte_range(idx);
        let value = self.codec.unpack(&self.buffer.bytes_in(range.clone()))?;
        self.buffer.splice_remove(range);
        self.len -= 1;
        Ok(value)
    }

    pub fn remove_range(&mut self, start: isize, stop: isize) -> Result<()> {
        self.require_owned()?;
        let (s, e) = self.clip_range(start, stop);
        let byte_s = self.offset + s * self.codec.size();
        let byte_e = self.offset + e * self.codec.size();
        self.buffer.splice_remove(byte_s..byte_e);
        self.len -= e - s;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.require_owned()?;
        self.buffer.truncate(self.offset);
        self.len = 0;
        Ok(())
    }

    /// Reverses element order in place. Unlike length-changing mutations,
    /// this is allowed on a non-owning view: it mutates the parent's
    /// shared storage directly (same documented-sharing rationale as
    /// [`TypedList::set`]).
    pub fn reverse(&mut self) {
        let size = self.codec.size();
        let range = self.offset..self.offset + self.size_bytes();
        self.buffer.reverse_in_place(range, size);
    }

    pub fn reserve(&mut self, n_elements: usize) -> Result<()> {
        self.require_owned()?;
        self.buffer.reserve(self.offset + n_elements * self.codec.size());
        Ok(())
    }

    pub fn compact(&mut self) -> Result<()> {
        self.require_owned()?;
        self.buffer.compact();
        Ok(())
    }

    // -- combinators -----------------------------------------------------

    /// `a + b`: a new, separately-owned list. Both operands must share
    /// the same codec *instance* (spec.md §9 Open Questions: identity,
    /// not layout equality — use [`reinterpret`] to cross that gap
    /// explicitly).
    pub fn concat(&self, other: &TypedList) -> Result<TypedList> {
        if self.codec != other.codec {
            return Err(ArrexError::Type(
                "cannot concatenate typed lists with different dtypes".into(),
            ));
        }
        let mut bytes = Vec::with_capacity(self.size_bytes() + other.size_bytes());
        bytes.extend_from_slice(&self.element_bytes());
        bytes.extend_from_slice(&other.element_bytes());
        Ok(TypedList {
            codec: self.codec.clone(),
            buffer: RawBuffer::from_vec(bytes),
            offset: 0,
            len: self.len + other.len,
            owns_buffer: true,
        })
    }

    /// `a += b` in place. Requires `self` to own its buffer.
    pub fn extend_with(&mut self, other: &TypedList) -> Result<()> {
        self.require_owned()?;
        if self.codec != other.codec {
            return Err(ArrexError::Type(
                "cannot concatenate typed lists with different dtypes".into(),
            ));
        }
        self.buffer.extend_from_slice(&other.element_bytes());
        self.len += other.len;
        Ok(())
    }

    /// `a * n`: a new list whose buffer is `a`'s bytes repeated `n` times.
    pub fn repeated(&self, n: usize) -> TypedList {
        let mut bytes = Vec::with_capacity(self.size_bytes() * n);
        for _ in 0..n {
            bytes.extend_from_slice(&self.element_bytes());
        }
        TypedList {
            codec: self.codec.clone(),
            buffer: RawBuffer::from_vec(bytes),
            offset: 0,
            len: self.len * n,
            owns_buffer: true,
        }
    }

    /// A view over the same bytes under a layout-compatible codec
    /// (spec.md §9 Open Questions' suggested resolution for `+` across
    /// distinct-but-equal-layout codecs).
    pub fn reinterpret(&self, codec: Codec) -> Result<TypedList> {
        if codec.size() != self.codec.size() {
            return Err(ArrexError::Type(format!(
                "cannot reinterpret {}-byte elements as {}-byte elements",
                self.codec.size(),
                codec.size()
            )));
        }
        Ok(TypedList {
            codec,
            buffer: self.buffer.clone(),
            offset: self.offset,
            len: self.len,
            owns_buffer: false,
        })
    }

    // -- iteration -------------------------------------------------------

    pub fn iter(&self) -> Iter<'_> {
        Iter { list: self, index: 0 }
    }

    /// The buffer-sharing view of spec.md §6.
    pub fn buffer_view(&self) -> BufferView<'_> {
        BufferView {
            bytes: self.element_bytes(),
            length_bytes: self.size_bytes(),
            element_size: self.codec.size(),
            layout: self.codec.layout(),
            readonly: false,
            shape: [self.len],
            strides: [self.codec.size()],
        }
    }

    /// Elements are plain bytes, so a deep copy is the same operation as
    /// [`Clone`] (spec.md §4.5: "no nested objects to recurse into").
    pub fn deep_copy(&self) -> TypedList {
        self.clone()
    }
}

impl Clone for TypedList {
    /// A shallow copy per spec.md §4.5: a *new*, separately-owned buffer
    /// with the element bytes copied — not a shared view. This mirrors
    /// `Vec::clone`, which likewise always allocates fresh storage.
    fn clone(&self) -> Self {
        TypedList {
            codec: self.codec.clone(),
            buffer: RawBuffer::from_vec(self.element_bytes().to_vec()),
            offset: 0,
            len: self.len,
            owns_buffer: true,
        }
    }
}

impl std::fmt::Debug for TypedList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedList")
            .field("len", &self.len)
            .field("codec", &self.codec)
            .field("owns_buffer", &self.owns_buffer)
            .finish()
    }
}

/// Equality per spec.md §4.5: same length and byte-identical content over
/// the element region; codecs need not match but their sizes must.
impl PartialEq for TypedList {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self.codec.size() == other.codec.size()
            && *self.element_bytes() == *other.element_bytes()
    }
}

impl std::ops::Add<&TypedList> for &TypedList {
    type Output = TypedList;
    fn add(self, rhs: &TypedList) -> TypedList {
        self.concat(rhs)
            .expect("typed lists with mismatched dtypes cannot be concatenated with `+`; use `concat` for a Result")
    }
}

impl std::ops::AddAssign<&TypedList> for TypedList {
    fn add_assign(&mut self, rhs: &TypedList) {
        self.extend_with(rhs)
            .expect("typed lists with mismatched dtypes, or a non-owning `self`, cannot use `+=`; use `extend_with` for a Result")
    }
}

impl std::ops::Mul<usize> for &TypedList {
    type Output = TypedList;
    fn mul(self, n: usize) -> TypedList {
        self.repeated(n)
    }
}

/// Lazily unpacks elements over `[0, len)`.
pub struct Iter<'a> {
    list: &'a TypedList,
    index: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Result<Value>;
    fn next(&mut self) -> Option<Result<Value>> {
        if self.index >= self.list.len {
            return None;
        }
        let value = self.list.get(self.index as isize);
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<'a> IntoIterator for &'a TypedList {
    type Item = Result<Value>;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Mirrors the host buffer-interop tuple of spec.md §6:
/// `(data_ptr, length_bytes, element_size, layout_string_or_null,
/// readonly_flag, shape, strides)`. Holds a read lock on the parent's
/// buffer for its lifetime, so it can't be `Clone`/`Copy` the way a bare
/// `&'a [u8]` view could.
pub struct BufferView<'a> {
    bytes: crate::buffer::BytesGuard<'a>,
    pub length_bytes: usize,
    pub element_size: usize,
    pub layout: Option<&'a str>,
    pub readonly: bool,
    pub shape: [usize; 1],
    pub strides: [usize; 1],
}

impl<'a> BufferView<'a> {
    pub fn data(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for BufferView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferView")
            .field("data", &self.data())
            .field("length_bytes", &self.length_bytes)
            .field("element_size", &self.element_size)
            .field("layout", &self.layout)
            .field("readonly", &self.readonly)
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .finish()
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Wire {
    dtype_key: String,
    element_bytes: Vec<u8>,
}

impl Serialize for TypedList {
    /// Serializes to `(dtype_key, element_bytes)` per spec.md §6.
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let dtype_key = self
            .codec
            .key()
            .map(|k| k.wire_name())
            .or_else(|| self.codec.layout().map(str::to_owned))
            .ok_or_else(|| {
                S::Error::custom("codec has neither a registry key nor a layout; cannot serialize")
            })?;
        let bytes = self.element_bytes();
        let mut state = serializer.serialize_struct("TypedList", 2)?;
        state.serialize_field("dtype_key", &dtype_key)?;
        state.serialize_field("element_bytes", &*bytes)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for TypedList {
    /// Deserializes `(dtype_key, element_bytes)`, resolving `dtype_key`
    /// against the registry of the deserializing process (spec.md §6);
    /// fails with `UnknownDtype` if the key is unregistered there.
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = Wire::deserialize(deserializer)?;
        let codec = registry::declared_by_name(&wire.dtype_key).map_err(D::Error::custom)?;
        TypedList::owned_from_bytes(wire.element_bytes, codec).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numbers;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|&v| Value::I64(v)).collect()
    }

    #[test]
    fn append_and_index() {
        numbers::install();
        let codec = registry::declared(&registry::DtypeKey::Layout("h".into())).unwrap();
        let mut list = TypedList::new(codec);
        list.append(&Value::I64(1)).unwrap();
        list.append(&Value::I64(4)).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).unwrap().as_i64(), Some(1));
        assert_eq!(list.get(1).unwrap().as_i64(), Some(4));
        assert_eq!(list.get(-1).unwrap().as_i64(), Some(4));
    }

    #[test]
    fn negative_index_out_of_range() {
        numbers::install();
        let codec = registry::declared(&registry::DtypeKey::Layout("h".into())).unwrap();
        let list = TypedList::from_iterable(ints(&[1, 2]), Some(codec)).unwrap();
        assert!(matches!(list.get(-3), Err(ArrexError::Index { .. })));
    }

    #[test]
    fn slice_of_slice_shares_owner() {
        numbers::install();
        let codec = registry::declared(&registry::DtypeKey::Layout("l".into())).unwrap();
        let list = TypedList::from_iterable((0..23).map(Value::I64), Some(codec)).unwrap();
        let outer = list.slice(2, 20).unwrap();
        let inner = outer.slice(1, 3).unwrap();
        assert_eq!(inner.len(), 2);
        assert!(inner.owner().shares_storage_with(list.owner()));
    }

    #[test]
    fn concatenation_requires_identical_codec() {
        numbers::install();
        let codec_a = registry::declared(&registry::DtypeKey::Layout("l".into())).unwrap();
        let codec_b = registry::declared(&registry::DtypeKey::Layout("l".into())).unwrap();
        let a = TypedList::from_iterable(ints(&[1, 2]), Some(codec_a)).unwrap();
        let b = TypedList::from_iterable(ints(&[3, 4]), Some(codec_b)).unwrap();
        assert!(a.concat(&b).is_err());
    }

    #[test]
    fn empty_list_identities() {
        numbers::install();
        let codec = registry::declared(&registry::DtypeKey::Layout("l".into())).unwrap();
        let list = TypedList::from_iterable(ints(&[1, 2, 3]), Some(codec.clone())).unwrap();
        let empty = TypedList::new(codec);
        assert_eq!(&list + &empty, list);
        assert_eq!(&empty + &list, list);
    }

    #[test]
    fn set_on_view_mutates_parent() {
        numbers::install();
        let codec = registry::declared(&registry::DtypeKey::Layout("l".into())).unwrap();
        let mut list = TypedList::from_iterable(ints(&[1, 2, 3]), Some(codec)).unwrap();
        let mut view = list.slice(0, 3).unwrap();
        view.set(0, &Value::I64(42)).unwrap();
        assert_eq!(list.get(0).unwrap().as_i64(), Some(42));
    }

    #[test]
    fn append_on_view_fails() {
        numbers::install();
        let codec = registry::declared(&registry::DtypeKey::Layout("l".into())).unwrap();
        let list = TypedList::from_iterable(ints(&[1, 2, 3]), Some(codec)).unwrap();
        let mut view = list.slice(0, 2).unwrap();
        assert!(matches!(view.append(&Value::I64(9)), Err(ArrexError::Invariant(_))));
    }

    #[test]
    fn clone_is_a_new_buffer() {
        numbers::install();
        let codec = registry::declared(&registry::DtypeKey::Layout("l".into())).unwrap();
        let list = TypedList::from_iterable(ints(&[1, 2, 3]), Some(codec)).unwrap();
        let copy = list.clone();
        assert_eq!(copy, list);
        assert!(!copy.owner().shares_storage_with(list.owner()));
    }

    #[test]
    fn serialize_round_trip() {
        numbers::install();
        let codec = registry::declared(&registry::DtypeKey::Layout("l".into())).unwrap();
        let list = TypedList::from_iterable(ints(&[1, 2, 3]), Some(codec)).unwrap();
        let json = serde_json::to_string(&list).unwrap();
        let reloaded: TypedList = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, list);
        assert!(!reloaded.owner().shares_storage_with(list.owner()));
    }

    #[test]
    fn reverse_works_through_a_view() {
        numbers::install();
        let codec = registry::declared(&registry::DtypeKey::Layout("l".into())).unwrap();
        let mut list = TypedList::from_iterable(ints(&[1, 2, 3, 4]), Some(codec)).unwrap();
        list.reverse();
        let values: Vec<i64> = list.iter().map(|v| v.unwrap().as_i64().unwrap()).collect();
        assert_eq!(values, vec![4, 3, 2, 1]);
    }

    #[test]
    fn slicing_past_end_clips_silently() {
        numbers::install();
        let codec = registry::declared(&registry::DtypeKey::Layout("l".into())).unwrap();
        let list = TypedList::from_iterable(ints(&[1, 2, 3]), Some(codec)).unwrap();
        let tail = list.slice(1, 100).unwrap();
        assert_eq!(tail.len(), 2);
    }

    #[test]
    fn stepped_slice_rejects_non_unit_step() {
        numbers::install();
        let codec = registry::declared(&registry::DtypeKey::Layout("l".into())).unwrap();
        let list = TypedList::from_iterable(ints(&[1, 2, 3]), Some(codec)).unwrap();
        assert!(matches!(
            list.slice_stepped(0, 3, 2),
            Err(ArrexError::NotSupported(_))
        ));
    }
}
