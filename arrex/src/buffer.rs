//! Raw buffer (C6): a reference-counted, contiguous byte region with
//! amortized growth and copy-on-write sharing, per spec.md §4.4.
//!
//! The backing storage is an `Arc<RwLock<Vec<u8>>>` rather than a bare
//! `Arc<Vec<u8>>`: length-changing operations (`reserve`, `resize`,
//! `splice_*`, ...) only ever run on a list that owns its buffer, so they
//! clone onto fresh, private storage the moment they see a second handle
//! (the same copy-on-write shape `Arc::make_mut` gives, just driven by
//! hand since `RwLock<Vec<u8>>` has no `Clone` impl for `Arc::make_mut` to
//! call). `write_in_place`/`reverse_in_place` are different: spec.md
//! §4.5/§8 documents that assigning into a slot through a shared,
//! non-owning view mutates the parent directly rather than forking
//! storage, so those two *must* write through a live second handle. The
//! `RwLock` is what makes that legal — it is Rust's interior-mutability
//! primitive, so writing through a shared `&RawBuffer` is exactly as sound
//! as any other shared mutable cell, with no aliasing trickery.

use std::ops::Range;
use std::sync::Arc;

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{ArrexError, Result};

/// Minimum capacity a freshly grown buffer is given, per spec.md §4.4.
pub const MIN_CAPACITY: usize = 16;

/// A read-locked view of a byte range, returned by [`RawBuffer::as_bytes`]
/// and [`RawBuffer::bytes_in`]. Derefs to `&[u8]`; callers that need to
/// hand it to something expecting `&[u8]` use `&*guard` or simply call a
/// slice method on it (auto-deref handles the rest).
pub type BytesGuard<'a> = MappedRwLockReadGuard<'a, [u8]>;

#[derive(Clone)]
pub struct RawBuffer {
    data: Arc<RwLock<Vec<u8>>>,
}

impl RawBuffer {
    pub fn new(capacity_bytes: usize) -> Self {
        RawBuffer {
            data: Arc::new(RwLock::new(Vec::with_capacity(capacity_bytes))),
        }
    }

    pub fn from_vec(data: Vec<u8>) -> Self {
        RawBuffer {
            data: Arc::new(RwLock::new(data)),
        }
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.read().capacity()
    }

    /// A read-locked view of the whole buffer.
    pub fn as_bytes(&self) -> BytesGuard<'_> {
        RwLockReadGuard::map(self.data.read(), Vec::as_slice)
    }

    /// A read-locked view of just `range`.
    pub fn bytes_in(&self, range: Range<usize>) -> BytesGuard<'_> {
        RwLockReadGuard::map(self.data.read(), move |v| &v[range])
    }

    /// Whether this handle is the sole owner of the underlying storage.
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.data) == 1
    }

    /// Returns a mutable view of the bytes, failing if the buffer is
    /// shared (spec.md §4.4: `as_mut_bytes` fails if shared). Goes through
    /// `Arc::get_mut`, which bypasses the lock entirely: a unique `Arc` has
    /// no other reader or writer to contend with.
    pub fn as_mut_bytes(&mut self) -> Result<&mut [u8]> {
        if !self.is_unique() {
            return Err(ArrexError::Invariant(
                "cannot mutate a shared buffer in place".into(),
            ));
        }
        let lock = Arc::get_mut(&mut self.data).expect("checked unique above");
        Ok(lock.get_mut().as_mut_slice())
    }

    /// Whether `other` shares the same backing storage as `self`
    /// (spec.md §8 property 6: `a.owner is b.owner`).
    pub fn shares_storage_with(&self, other: &RawBuffer) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Clones onto fresh, private storage if another handle shares this
    /// buffer, then returns a write lock onto the (now certainly unique)
    /// data. The manual equivalent of `Arc::make_mut`, needed because
    /// `RwLock<Vec<u8>>` doesn't implement `Clone` for `Arc::make_mut` to
    /// use directly.
    fn cow_mut(&mut self) -> RwLockWriteGuard<'_, Vec<u8>> {
        if !self.is_unique() {
            let cloned = self.data.read().clone();
            self.data = Arc::new(RwLock::new(cloned));
        }
        self.data.write()
    }

    /// Grows capacity to at least `new_capacity`, applying the amortized
    /// growth policy of spec.md §4.4 when the caller asks for more than
    /// is currently available.
    pub fn reserve(&mut self, new_capacity: usize) {
        if new_capacity <= self.capacity() {
            return;
        }
        let target = new_capacity.max(self.capacity() * 2).max(MIN_CAPACITY);
        if !self.is_unique() {
            tracing::trace!(old_cap = self.capacity(), target, "copy-on-write grow");
        }
        let mut vec = self.cow_mut();
        vec.reserve(target.saturating_sub(vec.len()));
    }

    /// Resizes the logical length to `new_length`, zero-filling on
    /// growth. Does not shrink capacity (spec.md §4.4); use [`compact`]
    /// for that.
    pub fn resize(&mut self, new_length: usize) {
        if new_length > self.capacity() {
            self.reserve(new_length);
        }
        self.cow_mut().resize(new_length, 0);
    }

    /// Trims capacity down to length.
    pub fn compact(&mut self) {
        self.cow_mut().shrink_to_fit();
    }

    /// Appends `bytes`, growing as needed.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        let needed = self.len() + bytes.len();
        self.reserve(needed);
        self.cow_mut().extend_from_slice(bytes);
    }

    /// Inserts `bytes` at byte offset `at`, shifting the tail right.
    pub fn splice_insert(&mut self, at: usize, bytes: &[u8]) {
        self.reserve(self.len() + bytes.len());
        self.cow_mut().splice(at..at, bytes.iter().copied());
    }

    /// Removes the byte range `range`, shifting the tail left.
    pub fn splice_remove(&mut self, range: Range<usize>) {
        self.cow_mut().drain(range);
    }

    /// Truncates the logical length to `new_len`. Unlike [`resize`], never
    /// grows and never zero-fills.
    pub fn truncate(&mut self, new_len: usize) {
        self.cow_mut().truncate(new_len);
    }

    /// Overwrites `range` with `bytes`. Takes the `Arc::get_mut` fast path
    /// through [`as_mut_bytes`](Self::as_mut_bytes) when this handle
    /// exclusively owns the buffer; otherwise writes through the shared
    /// `RwLock` in place, without cloning — spec.md §4.5/§8 documents that
    /// assigning into a slot through a shared, non-owning view mutates the
    /// parent rather than forking storage.
    pub fn write_in_place(&mut self, range: Range<usize>, bytes: &[u8]) {
        debug_assert_eq!(range.end - range.start, bytes.len());
        if self.is_unique() {
            self.as_mut_bytes().expect("checked unique above")[range].copy_from_slice(bytes);
        } else {
            self.data.write()[range].copy_from_slice(bytes);
        }
    }

    /// Reverses the `stride`-sized chunks within `range` in place. Same
    /// fast-path/shared-lock split as [`write_in_place`](Self::write_in_place).
    pub fn reverse_in_place(&mut self, range: Range<usize>, stride: usize) {
        if stride == 0 {
            return;
        }
        if self.is_unique() {
            let buf = self.as_mut_bytes().expect("checked unique above");
            Self::reverse_chunks(&mut buf[range], stride);
        } else {
            Self::reverse_chunks(&mut self.data.write()[range], stride);
        }
    }

    fn reverse_chunks(slice: &mut [u8], stride: usize) {
        let n = slice.len() / stride;
        for i in 0..n / 2 {
            let (a, b) = (i * stride, (n - 1 - i) * stride);
            for k in 0..stride {
                slice.swap(a + k, b + k);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_policy_doubles_and_floors_at_min() {
        let mut b = RawBuffer::new(0);
        b.reserve(1);
        assert_eq!(b.capacity(), MIN_CAPACITY);
        let cap = b.capacity();
        b.reserve(cap + 1);
        assert!(b.capacity() >= cap * 2);
    }

    #[test]
    fn copy_on_write_on_shared_mutation() {
        let mut a = RawBuffer::from_vec(vec![1, 2, 3]);
        let b = a.clone();
        assert!(a.shares_storage_with(&b));
        a.extend_from_slice(&[4]);
        assert!(!a.shares_storage_with(&b));
        assert_eq!(&*b.as_bytes(), &[1, 2, 3]);
        assert_eq!(&*a.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn as_mut_bytes_fails_when_shared() {
        let mut a = RawBuffer::from_vec(vec![1, 2, 3]);
        let _b = a.clone();
        assert!(a.as_mut_bytes().is_err());
    }

    #[test]
    fn as_mut_bytes_ok_when_unique() {
        let mut a = RawBuffer::from_vec(vec![1, 2, 3]);
        assert!(a.as_mut_bytes().is_ok());
    }

    #[test]
    fn compact_shrinks_capacity_to_length() {
        let mut b = RawBuffer::new(64);
        b.resize(4);
        assert!(b.capacity() >= 64);
        b.compact();
        assert_eq!(b.capacity(), 4);
    }

    #[test]
    fn write_in_place_through_a_shared_handle_is_visible_to_both() {
        let mut a = RawBuffer::from_vec(vec![1, 2, 3, 4]);
        let b = a.clone();
        assert!(!a.is_unique());
        a.write_in_place(1..3, &[9, 9]);
        assert_eq!(&*b.as_bytes(), &[1, 9, 9, 4]);
    }

    #[test]
    fn reverse_in_place_through_a_shared_handle_is_visible_to_both() {
        let mut a = RawBuffer::from_vec(vec![1, 2, 3, 4]);
        let b = a.clone();
        a.reverse_in_place(0..4, 1);
        assert_eq!(&*b.as_bytes(), &[4, 3, 2, 1]);
    }
}
