//! The single-word reference-counted pointer.
//!
//! Every allocation owned by a [`CompactRc`] has exactly one shared
//! [`Handle`] word recording its address and owner count. Instances are a
//! single pointer to that word; copying bumps the count in place, and the
//! last instance to let go frees both the payload and the word.
//!
//! [`CompactRc::new`] places the word directly in front of the payload, in
//! the same allocation. [`CompactRc::from_raw`] adopts an allocation the
//! caller already made, so its word is boxed on its own. The low bit of the
//! instance pointer records which of the two layouts is in use; the word is
//! 8-aligned, so that bit is otherwise always clear.

use std::any::type_name;
use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem;
use std::ops::Deref;
use std::ptr::{self, NonNull};

use crate::error::CompactRcError;
use crate::handle::{address_of, Handle};

/// Set on the instance pointer when word and payload share one allocation.
const INLINE_TAG: usize = 1;

/// Word and payload in a single allocation. `repr(C)` keeps the word at
/// offset 0, so a pointer to the block is also a pointer to the word.
#[repr(C)]
struct Inline<T> {
    word: Cell<Handle>,
    value: T,
}

/// Shared-ownership pointer whose address and owner count live in one
/// packed word.
///
/// `CompactRc<T>` is one machine word wide and may be null. Counting is
/// non-atomic, so the type is neither `Send` nor `Sync`.
///
/// Equality, ordering and hashing look at the payload address only.
pub struct CompactRc<T> {
    shared: Option<NonNull<Cell<Handle>>>,
    _owns: PhantomData<T>,
}

/// Split a tagged instance pointer into the word pointer and the layout flag.
fn untag(tagged: NonNull<Cell<Handle>>) -> (NonNull<Cell<Handle>>, bool) {
    let inline = tagged.addr().get() & INLINE_TAG != 0;
    let word = tagged.as_ptr().map_addr(|addr| addr & !INLINE_TAG);
    // SAFETY: clearing the low bit of a non-null, 8-aligned address cannot
    // produce zero.
    (unsafe { NonNull::new_unchecked(word) }, inline)
}

impl<T> CompactRc<T> {
    /// An instance that owns nothing.
    pub const fn null() -> Self {
        Self {
            shared: None,
            _owns: PhantomData,
        }
    }

    /// Move `value` to the heap and become its first owner.
    ///
    /// # Panics
    ///
    /// Panics if the allocator returns an address wider than the packing
    /// layout allows. See [`try_new`](Self::try_new).
    pub fn new(value: T) -> Self {
        match Self::try_new(value) {
            Ok(rc) => rc,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`new`](Self::new), but reports an out-of-range address as an
    /// error. The value is dropped in that case.
    ///
    /// The packed word and the payload share one allocation.
    pub fn try_new(value: T) -> Result<Self, CompactRcError> {
        let block = Box::into_raw(Box::new(Inline {
            word: Cell::new(Handle::NULL),
            value,
        }));
        // SAFETY: `block` is a live allocation we own; no reference is made.
        let payload = unsafe { ptr::addr_of_mut!((*block).value) };
        let handle = match Handle::pack(address_of(payload), 1) {
            Ok(handle) => handle,
            Err(err) => {
                // SAFETY: nothing else has seen `block`.
                drop(unsafe { Box::from_raw(block) });
                return Err(err);
            }
        };
        tracing::trace!(%handle, ty = type_name::<T>(), "allocated inline");
        // SAFETY: `block` is live and the word is at offset 0.
        let word = unsafe { NonNull::new_unchecked(block.cast::<Cell<Handle>>()) };
        // SAFETY: as above.
        unsafe { word.as_ref() }.set(handle);
        Ok(Self {
            shared: Some(word.map_addr(|addr| addr | INLINE_TAG)),
            _owns: PhantomData,
        })
    }

    /// Adopt a heap allocation, becoming its sole deallocation path.
    ///
    /// A null `raw` produces a null instance. On error, ownership of `raw`
    /// stays with the caller. The payload stays where it is, so the packed
    /// word gets an allocation of its own.
    ///
    /// # Safety
    ///
    /// A non-null `raw` must come from [`Box::into_raw`] and must not be
    /// adopted by, or freed through, anything else afterwards.
    pub unsafe fn from_raw(raw: *mut T) -> Result<Self, CompactRcError> {
        if raw.is_null() {
            return Ok(Self::null());
        }
        let handle = Handle::pack(address_of(raw), 1)?;
        tracing::trace!(%handle, ty = type_name::<T>(), "adopted allocation");
        let shared = NonNull::from(Box::leak(Box::new(Cell::new(handle))));
        Ok(Self {
            shared: Some(shared),
            _owns: PhantomData,
        })
    }

    fn shared(&self) -> Option<&Cell<Handle>> {
        // SAFETY: the shared word lives until its count drops to zero, and
        // this instance holds one of the counted references.
        self.shared.map(|tagged| unsafe { untag(tagged).0.as_ref() })
    }

    /// Snapshot of the packed word; [`Handle::NULL`] for a null instance.
    pub fn handle(&self) -> Handle {
        self.shared().map_or(Handle::NULL, Cell::get)
    }

    /// Whether this instance owns nothing.
    pub fn is_null(&self) -> bool {
        self.shared.is_none()
    }

    /// The payload address, or null.
    pub fn as_ptr(&self) -> *const T {
        self.handle().as_ptr::<T>().cast_const()
    }

    /// Number of instances sharing the payload; 0 when null.
    pub fn use_count(&self) -> u32 {
        self.handle().count()
    }

    /// Checked access to the payload.
    pub fn get(&self) -> Option<&T> {
        // SAFETY: a non-null address is a live payload jointly owned by this
        // instance, and only shared references are handed out while it is
        // shared.
        unsafe { self.as_ptr().as_ref() }
    }

    /// Mutable access when this instance is the only owner.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        if self.use_count() != 1 {
            return None;
        }
        // SAFETY: sole owner, and `&mut self` rules out other borrows made
        // through this instance.
        unsafe { self.handle().as_ptr::<T>().as_mut() }
    }

    /// Whether both instances share the same allocation.
    ///
    /// Two null instances are considered to share.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.shared == other.shared
    }

    /// Copy with an explicit overflow error instead of a panic.
    pub fn try_clone(&self) -> Result<Self, CompactRcError> {
        let Some(cell) = self.shared() else {
            return Ok(Self::null());
        };
        cell.set(cell.get().increment()?);
        Ok(Self {
            shared: self.shared,
            _owns: PhantomData,
        })
    }

    /// Move the ownership out, leaving this instance null.
    ///
    /// The count is unchanged: responsibility moves, it is not duplicated.
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::null())
    }

    /// Release ownership now and become null.
    pub fn reset(&mut self) {
        self.release();
    }

    /// Return the payload if `this` is its only owner, otherwise `this`.
    pub fn try_unwrap(mut this: Self) -> Result<T, Self> {
        if this.use_count() != 1 {
            return Err(this);
        }
        let Some(tagged) = this.shared.take() else {
            return Err(this);
        };
        let (word, inline) = untag(tagged);
        if inline {
            // SAFETY: sole owner of a block made by `try_new`.
            let block = unsafe { Box::from_raw(word.cast::<Inline<T>>().as_ptr()) };
            let Inline { value, .. } = *block;
            return Ok(value);
        }
        // SAFETY: sole owner; the word and payload were both boxed and no
        // other instance can reach them.
        let cell = unsafe { Box::from_raw(word.as_ptr()) };
        let raw = cell.get().as_ptr::<T>();
        drop(cell);
        // SAFETY: as above.
        Ok(*unsafe { Box::from_raw(raw) })
    }

    fn release(&mut self) {
        let Some(tagged) = self.shared.take() else {
            return;
        };
        let (cell, inline) = untag(tagged);
        // SAFETY: this instance held one of the counted references until now.
        let word = unsafe { cell.as_ref() };
        let handle = match word.get().decrement() {
            Ok(handle) => handle,
            Err(err) => panic!("{err}"),
        };
        if handle.count() > 0 {
            word.set(handle);
            return;
        }
        word.set(Handle::NULL);
        tracing::trace!(%handle, ty = type_name::<T>(), "last owner released, freeing allocation");
        // SAFETY: the count reached zero, so nothing else references the word
        // or the payload. Both were allocated through `Box`, together when
        // `inline` is set.
        unsafe {
            if inline {
                drop(Box::from_raw(cell.cast::<Inline<T>>().as_ptr()));
            } else {
                drop(Box::from_raw(cell.as_ptr()));
                drop(Box::from_raw(handle.as_ptr::<T>()));
            }
        }
    }
}

impl<T> Drop for CompactRc<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T> Default for CompactRc<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> Clone for CompactRc<T> {
    /// # Panics
    ///
    /// Panics if the payload already has the maximum number of owners.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(rc) => rc,
            Err(err) => panic!("{err}"),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if self.ptr_eq(source) {
            return;
        }
        *self = source.clone();
    }
}

impl<T> Deref for CompactRc<T> {
    type Target = T;

    /// # Panics
    ///
    /// Panics on a null instance; use [`CompactRc::get`] to check first.
    fn deref(&self) -> &T {
        match self.get() {
            Some(value) => value,
            None => panic!("dereferenced a null CompactRc<{}>", type_name::<T>()),
        }
    }
}

impl<T> PartialEq for CompactRc<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_ptr() == other.as_ptr()
    }
}

impl<T> Eq for CompactRc<T> {}

impl<T> PartialOrd for CompactRc<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for CompactRc<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_ptr().cmp(&other.as_ptr())
    }
}

impl<T> Hash for CompactRc<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_ptr().hash(state);
    }
}

impl<T> fmt::Debug for CompactRc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompactRc")
            .field("address", &self.as_ptr())
            .field("use_count", &self.use_count())
            .finish()
    }
}

impl<T> fmt::Pointer for CompactRc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.as_ptr(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::MAX_COUNT;
    use compact_rc_test_utils::{LifecycleEvent, LifecycleLog, Probe};
    use std::collections::{BTreeSet, HashSet};
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn default_is_null() {
        let rc: CompactRc<u32> = CompactRc::default();
        assert!(rc.is_null());
        assert_eq!(rc.use_count(), 0);
        assert!(rc.as_ptr().is_null());
        assert_eq!(rc.handle(), Handle::NULL);
        assert!(rc.get().is_none());
    }

    #[test]
    fn one_word_wide() {
        assert_eq!(mem::size_of::<CompactRc<u64>>(), mem::size_of::<usize>());
        assert_eq!(
            mem::size_of::<CompactRc<[u8; 256]>>(),
            mem::size_of::<usize>()
        );
    }

    #[test]
    fn new_starts_with_one_owner() {
        let rc = CompactRc::new(5u32);
        assert_eq!(rc.use_count(), 1);
        assert_eq!(*rc, 5);
        assert!(!rc.is_null());
        assert_eq!(rc.handle().address(), rc.as_ptr() as u64);
    }

    #[test]
    fn from_raw_adopts_box() {
        let raw = Box::into_raw(Box::new(String::from("adopted")));
        // SAFETY: fresh Box pointer, adopted once.
        let rc = unsafe { CompactRc::from_raw(raw) }.unwrap();
        assert_eq!(rc.as_ptr(), raw.cast_const());
        assert_eq!(rc.use_count(), 1);
        assert_eq!(rc.as_str(), "adopted");
    }

    #[test]
    fn new_keeps_word_and_payload_in_one_allocation() {
        let rc = CompactRc::new(0xfeed_u64);
        let (word, inline) = untag(rc.shared.unwrap());
        assert!(inline);
        let offset = rc.as_ptr() as usize - word.as_ptr() as usize;
        assert_eq!(offset, mem::offset_of!(Inline<u64>, value));

        let copy = rc.clone();
        assert!(copy.ptr_eq(&rc));
        assert_eq!(*copy, 0xfeed);
    }

    #[test]
    fn from_raw_boxes_word_separately() {
        let raw = Box::into_raw(Box::new(1u64));
        // SAFETY: fresh Box pointer, adopted once.
        let rc = unsafe { CompactRc::from_raw(raw) }.unwrap();
        let (word, inline) = untag(rc.shared.unwrap());
        assert!(!inline);
        assert_eq!(word, rc.shared.unwrap());
    }

    #[test]
    fn adopted_payload_freed_once_at_last_release() {
        let log = LifecycleLog::new();
        let raw = Box::into_raw(Box::new(log.probe(9)));
        // SAFETY: fresh Box pointer, adopted once.
        let a = unsafe { CompactRc::from_raw(raw) }.unwrap();
        let b = a.clone();
        drop(a);
        assert_eq!(log.destructed(), 0);
        assert_eq!(b.hello(), "probe 9 says hello");
        drop(b);
        assert_eq!(log.destructed_id(9), 1);
    }

    #[test]
    fn try_unwrap_works_for_adopted_payload() {
        let raw = Box::into_raw(Box::new(String::from("boxed")));
        // SAFETY: fresh Box pointer, adopted once.
        let rc = unsafe { CompactRc::from_raw(raw) }.unwrap();
        assert_eq!(CompactRc::try_unwrap(rc).unwrap(), "boxed");
    }

    #[test]
    fn zero_sized_payloads_get_distinct_addresses() {
        let a = CompactRc::new(());
        let b = CompactRc::new(());
        assert_ne!(a, b);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn from_raw_null_is_null_instance() {
        // SAFETY: null is always accepted.
        let rc = unsafe { CompactRc::<u8>::from_raw(std::ptr::null_mut()) }.unwrap();
        assert!(rc.is_null());
    }

    #[test]
    fn from_raw_rejects_wide_address() {
        let wide = std::ptr::without_provenance_mut::<u8>(1 << 50);
        // SAFETY: the address is rejected before anything is adopted, so it
        // is never dereferenced or freed.
        let err = unsafe { CompactRc::from_raw(wide) }.unwrap_err();
        assert!(matches!(err, CompactRcError::AddressOutOfRange { .. }));
    }

    #[test]
    fn copies_share_one_count() {
        let a = CompactRc::new(1u8);
        let b = a.clone();
        assert_eq!(a.use_count(), 2);
        assert_eq!(b.use_count(), 2);
        assert_eq!(a.as_ptr(), b.as_ptr());
        drop(b);
        assert_eq!(a.use_count(), 1);
    }

    #[test]
    fn survivor_of_many_copies_keeps_address() {
        let a = CompactRc::new(9u64);
        let addr = a.as_ptr();
        let copies: Vec<_> = (0..100).map(|_| a.clone()).collect();
        assert_eq!(a.use_count(), 101);
        drop(a);
        let survivor = copies.last().unwrap().clone();
        drop(copies);
        assert_eq!(survivor.use_count(), 1);
        assert_eq!(survivor.as_ptr(), addr);
        assert_eq!(*survivor, 9);
    }

    #[test]
    fn take_moves_without_count_change() {
        let mut a = CompactRc::new('x');
        let keep = a.clone();
        let b = a.take();
        assert!(a.is_null());
        assert_eq!(a.use_count(), 0);
        assert!(a.as_ptr().is_null());
        assert_eq!(b.use_count(), 2);
        assert!(b.ptr_eq(&keep));
    }

    #[test]
    fn take_then_restore_is_noop() {
        let mut a = CompactRc::new(3i32);
        let before = a.handle();
        let moved = a.take();
        a = moved;
        assert_eq!(a.handle(), before);
    }

    #[test]
    fn move_assignment_releases_previous_payload() {
        let log = LifecycleLog::new();
        let a = CompactRc::new(log.probe(1));
        let mut b = CompactRc::new(log.probe(2));
        assert_eq!(b.id(), 2);
        b = a;
        assert_eq!(log.destructed_id(2), 1);
        assert_eq!(log.destructed_id(1), 0);
        assert_eq!(b.use_count(), 1);
        assert_eq!(b.id(), 1);
    }

    #[test]
    fn clone_from_releases_previous_and_shares_source() {
        let log = LifecycleLog::new();
        let source = CompactRc::new(log.probe(1));
        let mut target = CompactRc::new(log.probe(2));
        target.clone_from(&source);
        assert_eq!(log.destructed_id(2), 1);
        assert_eq!(source.use_count(), 2);
        assert!(target.ptr_eq(&source));
    }

    #[test]
    fn clone_from_same_allocation_is_noop() {
        let mut a = CompactRc::new(0u16);
        let b = a.clone();
        a.clone_from(&b);
        assert_eq!(a.use_count(), 2);
        assert_eq!(a.handle(), b.handle());
    }

    #[test]
    fn clone_of_null_stays_null() {
        let a: CompactRc<u8> = CompactRc::null();
        let b = a.clone();
        assert!(b.is_null());
        assert_eq!(a.use_count(), 0);
    }

    #[test]
    fn equality_tracks_address() {
        let a = CompactRc::new(1u32);
        let b = a.clone();
        let c = CompactRc::new(1u32);
        let n1: CompactRc<u32> = CompactRc::null();
        let n2: CompactRc<u32> = CompactRc::null();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, n1);
        assert_eq!(n1, n2);
    }

    #[test]
    fn ordering_follows_address_and_null_sorts_first() {
        let a = CompactRc::new(1u32);
        let b = CompactRc::new(2u32);
        let null: CompactRc<u32> = CompactRc::null();
        assert_eq!(a.cmp(&b), a.as_ptr().cmp(&b.as_ptr()));
        assert!(null < a && null < b);

        let set: BTreeSet<_> = [b.clone(), a.clone(), null, a.clone()].into_iter().collect();
        assert_eq!(set.len(), 3);
        assert!(set.iter().next().unwrap().is_null());
    }

    #[test]
    fn hash_dedups_copies() {
        let a = CompactRc::new("k");
        let set: HashSet<_> = [a.clone(), a.clone(), CompactRc::new("k")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        // The duplicate copy is dropped on insert.
        assert_eq!(a.use_count(), 2);
    }

    #[test]
    fn payload_freed_once_at_last_release() {
        let log = LifecycleLog::new();
        let a = CompactRc::new(log.probe(7));
        let b = a.clone();
        let c = b.clone();
        assert_eq!(a.use_count(), 3);
        drop(c);
        assert_eq!(b.use_count(), 2);
        drop(b);
        assert_eq!(a.use_count(), 1);
        assert_eq!(log.destructed(), 0);
        drop(a);
        assert_eq!(
            log.events(),
            vec![LifecycleEvent::Constructed(7), LifecycleEvent::Destructed(7)]
        );
    }

    #[test]
    fn reset_releases_early() {
        let log = LifecycleLog::new();
        let mut a = CompactRc::new(log.probe(1));
        a.reset();
        assert!(a.is_null());
        assert_eq!(log.destructed(), 1);
        a.reset();
        assert_eq!(log.destructed(), 1);
    }

    #[test]
    fn deref_forwards_method_calls() {
        let log = LifecycleLog::new();
        let rc = CompactRc::new(log.probe(4));
        let direct = log.probe(5);
        assert_eq!(rc.hello(), "probe 4 says hello");
        assert_eq!(direct.hello(), "probe 5 says hello");
        assert_eq!(log.count(|e| matches!(e, LifecycleEvent::Greeted(4))), 1);
    }

    #[test]
    #[should_panic(expected = "dereferenced a null CompactRc")]
    fn deref_null_panics() {
        let rc: CompactRc<u32> = CompactRc::null();
        let _value: u32 = *rc;
    }

    #[test]
    fn get_mut_only_when_unique() {
        let mut a = CompactRc::new(10u32);
        *a.get_mut().unwrap() += 1;
        let b = a.clone();
        assert!(a.get_mut().is_none());
        drop(b);
        assert_eq!(a.get_mut().copied(), Some(11));
    }

    #[test]
    fn try_unwrap_returns_payload_to_sole_owner() {
        let log = LifecycleLog::new();
        let a = CompactRc::new(log.probe(3));
        let b = a.clone();
        let a = CompactRc::try_unwrap(a).unwrap_err();
        drop(b);
        let probe = CompactRc::try_unwrap(a).unwrap();
        assert_eq!(probe.id(), 3);
        assert_eq!(log.destructed(), 0);
        drop(probe);
        assert_eq!(log.destructed(), 1);
    }

    #[test]
    fn clone_at_max_count_fails_fast() {
        let a = CompactRc::new(0u8);
        let word = a.shared().unwrap();
        word.set(word.get().with_count(MAX_COUNT).unwrap());

        assert_eq!(
            a.try_clone().unwrap_err(),
            CompactRcError::CountOverflow {
                address: a.as_ptr() as u64,
                max: MAX_COUNT,
            }
        );
        let panicked = catch_unwind(AssertUnwindSafe(|| a.clone()));
        assert!(panicked.is_err());
        assert_eq!(a.use_count(), MAX_COUNT);

        word.set(word.get().with_count(1).unwrap());
        drop(a);
    }

    #[test]
    #[should_panic(expected = "underflow")]
    fn release_below_zero_fails_fast() {
        let mut a = CompactRc::new(0u8);
        let word = a.shared().unwrap();
        word.set(word.get().with_count(0).unwrap());
        a.reset();
    }

    #[test]
    fn debug_shows_count() {
        let a = CompactRc::new(1u8);
        let _b = a.clone();
        assert!(format!("{a:?}").contains("use_count: 2"));
        assert_eq!(format!("{a:p}"), format!("{:p}", a.as_ptr()));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use proptest::sample::Index;

        #[derive(Clone, Debug)]
        enum Op {
            Clone(Index),
            Drop(Index),
            Take(Index),
            Assign(Index, Index),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                any::<Index>().prop_map(Op::Clone),
                any::<Index>().prop_map(Op::Drop),
                any::<Index>().prop_map(Op::Take),
                (any::<Index>(), any::<Index>()).prop_map(|(a, b)| Op::Assign(a, b)),
            ]
        }

        fn live_owners(slots: &[CompactRc<Probe>], id: u32) -> usize {
            slots
                .iter()
                .filter(|rc| rc.get().is_some_and(|p| p.id() == id))
                .count()
        }

        proptest! {
            #[test]
            fn count_matches_live_owners(ops in proptest::collection::vec(op(), 1..64)) {
                let log = LifecycleLog::new();
                let adopted = Box::into_raw(Box::new(log.probe(1)));
                // SAFETY: fresh Box pointer, adopted once.
                let adopted = unsafe { CompactRc::from_raw(adopted) }.unwrap();
                let mut slots = vec![CompactRc::new(log.probe(0)), adopted];

                for op in ops {
                    if slots.is_empty() {
                        break;
                    }
                    match op {
                        Op::Clone(i) => {
                            let copy = slots[i.index(slots.len())].clone();
                            slots.push(copy);
                        }
                        Op::Drop(i) => {
                            slots.swap_remove(i.index(slots.len()));
                        }
                        Op::Take(i) => {
                            let k = i.index(slots.len());
                            let moved = slots[k].take();
                            slots.push(moved);
                        }
                        Op::Assign(dst, src) => {
                            let src = slots[src.index(slots.len())].clone();
                            let dst = dst.index(slots.len());
                            slots[dst] = src;
                        }
                    }

                    for id in 0..2 {
                        let owners = live_owners(&slots, id);
                        for rc in slots.iter().filter(|rc| rc.get().is_some_and(|p| p.id() == id)) {
                            prop_assert_eq!(rc.use_count() as usize, owners);
                        }
                        prop_assert_eq!(log.destructed_id(id), usize::from(owners == 0));
                    }
                }

                drop(slots);
                prop_assert_eq!(log.destructed_id(0), 1);
                prop_assert_eq!(log.destructed_id(1), 1);
            }
        }
    }
}
