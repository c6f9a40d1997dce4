use crate::*;
use crate::boxed::ZBox;
use crate::error::ExcessiveSliceRequestedError;
use crate::fat::*;

use core::mem::MaybeUninit;



/// [`alloc::vec::Vec`] alternative that wipes element slots as they are retired.
///
/// Retirement is the moment an element stops being part of the vec: [`pop`](Self::pop) leaves a
/// bit-copy behind in the vacated slot, [`truncate`](Self::truncate) and drops run destructors
/// that leave whatever the destructor left.  When the allocator reports
/// [`DESTROY_ZEROES`](meta::Meta::DESTROY_ZEROES), every such slot is wiped with a verified zero
/// immediately, not at some later free.
///
/// Growth goes through [`fat::Realloc`], so under a
/// [`Zeroizing`](crate::allocator::adapt::Zeroizing) allocator with a wiping policy the vacated
/// buffer is wiped before it is freed.
pub struct ZVec<T, A: Free> {
    data:   ZBox<[MaybeUninit<T>], A>,
    len:    usize,
}

impl<T, A: Free> Drop for ZVec<T, A> { fn drop(&mut self) { self.clear() } }

impl<T, A: Free> ZVec<T, A> {
    #[inline(always)] pub fn allocator(&self) -> &A { ZBox::allocator(&self.data) }
    #[inline(always)] pub fn as_ptr(&self) -> *const T { self.data.as_ptr().cast() }
    #[inline(always)] pub fn as_mut_ptr(&mut self) -> *mut T { self.data.as_mut_ptr().cast() }
    // SAFETY: ✔️ elements `..len` are always initialized
    #[inline(always)] pub fn as_slice(&self) -> &[T] { unsafe { core::slice::from_raw_parts(self.as_ptr(), self.len) } }
    // SAFETY: ✔️ elements `..len` are always initialized
    #[inline(always)] pub fn as_slice_mut(&mut self) -> &mut [T] { unsafe { core::slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) } }
    #[inline(always)] pub fn capacity(&self) -> usize { self.data.len() }
    #[inline(always)] pub fn is_empty(&self) -> bool { self.len() == 0 }
    #[inline(always)] pub fn len(&self) -> usize { self.len }

    /// ### Safety
    /// *   `new_len` elements must be initialized
    /// *   `new_len` must not exceed [`capacity`](Self::capacity)
    /// *   shrinking this way skips both destructors and wipes - prefer [`truncate`](Self::truncate)
    #[inline(always)] pub unsafe fn set_len(&mut self, new_len: usize) { self.len = new_len; }

    pub fn try_with_capacity_in(capacity: usize, allocator: A) -> Result<Self, A::Error> where A : Alloc {
        Ok(Self { data: ZBox::try_new_uninit_slice_in(capacity, allocator)?, len: 0 })
    }

    #[cfg(feature = "panicy-memory")]
    #[track_caller] pub fn with_capacity_in(capacity: usize, allocator: A) -> Self where A : Alloc {
        Self::try_with_capacity_in(capacity, allocator).expect("out of memory")
    }

    #[cfg(feature = "panicy-memory")]
    #[track_caller] pub fn new_in(allocator: A) -> Self where A : Alloc { Self::with_capacity_in(0, allocator) }

    pub fn clear(&mut self) { self.truncate(0) }

    /// Shorten the vec to `len` elements, dropping and - when `A::DESTROY_ZEROES` - wiping the
    /// tail.  No-op if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        if let Some(to_drop) = self.len.checked_sub(len) {
            // SAFETY: ✔️ `len <= self.len <= capacity`, so the offset stays within the allocation
            let tail = core::ptr::slice_from_raw_parts_mut(unsafe { self.as_mut_ptr().add(len) }, to_drop);
            self.len = len;
            // SAFETY: ✔️ the `to_drop` elements at `len..` were initialized and are no longer reachable through `self`
            unsafe { tail.drop_in_place() };
            if A::DESTROY_ZEROES {
                // SAFETY: ✔️ the tail slots stay allocated; their elements were just dropped
                unsafe { wipe::slice(self.as_mut_ptr().add(len), to_drop) };
            }
        }
    }

    /// Remove and return the last element, wiping the vacated slot when `A::DESTROY_ZEROES`.
    pub fn pop(&mut self) -> Option<T> {
        let idx = self.len.checked_sub(1)?;
        self.len = idx;
        // SAFETY: ✔️ the element at `idx` was initialized and is no longer reachable through `self`
        let value = unsafe { self.as_mut_ptr().add(idx).read() };
        if A::DESTROY_ZEROES {
            // the read left a bit-copy behind in the vacated slot
            // SAFETY: ✔️ the slot stays allocated; its element was just moved out
            unsafe { wipe::slice(self.as_mut_ptr().add(idx), 1) };
        }
        Some(value)
    }

    pub fn try_push(&mut self, value: T) -> Result<(), (T, A::Error)> where A : Realloc {
        if let Err(e) = self.try_reserve(1) { return Err((value, e)) }
        debug_assert!(self.len < self.capacity());
        // SAFETY: ✔️ we just reserved capacity for one more element
        Ok(unsafe { self.push_within_capacity_unchecked(value) })
    }

    #[cfg(feature = "panicy-memory")]
    #[track_caller] pub fn push(&mut self, value: T) where A : Realloc { self.try_push(value).map_err(|(_, e)| e).expect("out of memory") }

    unsafe fn push_within_capacity_unchecked(&mut self, value: T) {
        // SAFETY: ✔️ `len < capacity` per this fn's safety precondition
        unsafe { self.as_mut_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    pub fn push_within_capacity(&mut self, value: T) -> Result<(), T> {
        if self.len < self.capacity() {
            // SAFETY: ✔️ we just checked `len < capacity`
            Ok(unsafe { self.push_within_capacity_unchecked(value) })
        } else {
            Err(value)
        }
    }

    pub fn try_extend_from_slice(&mut self, slice: &[T]) -> Result<(), A::Error> where T : Clone, A : Realloc {
        self.try_reserve(slice.len())?;
        // SAFETY: ✔️ capacity for `slice.len()` more elements was just reserved
        for value in slice.iter().cloned() { unsafe { self.push_within_capacity_unchecked(value) } }
        Ok(())
    }

    #[cfg(feature = "panicy-memory")]
    #[track_caller] pub fn extend_from_slice(&mut self, slice: &[T]) where T : Clone, A : Realloc { self.try_extend_from_slice(slice).expect("out of memory") }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), A::Error> where A : Realloc {
        let new_capacity = self.len().checked_add(additional).ok_or_else(|| ExcessiveSliceRequestedError { requested: !0 })?;
        if new_capacity <= self.capacity() { return Ok(()) }
        let new_capacity = new_capacity.max(self.capacity().saturating_mul(2));
        ZBox::try_realloc_uninit_slice(&mut self.data, new_capacity)
    }

    pub fn try_reserve_exact(&mut self, additional: usize) -> Result<(), A::Error> where A : Realloc {
        let new_capacity = self.len().checked_add(additional).ok_or_else(|| ExcessiveSliceRequestedError { requested: !0 })?;
        if new_capacity <= self.capacity() { return Ok(()) }
        ZBox::try_realloc_uninit_slice(&mut self.data, new_capacity)
    }

    pub fn try_shrink_to_fit(&mut self) -> Result<(), A::Error> where A : Realloc {
        let len = self.len();
        if self.capacity() == len { return Ok(()) }
        ZBox::try_realloc_uninit_slice(&mut self.data, len)
    }

    #[cfg(feature = "panicy-memory")]
    #[track_caller] pub fn shrink_to_fit(&mut self) where A : Realloc { self.try_shrink_to_fit().expect("unable to reallocate") }
}



#[cfg(test)] mod tests {
    use super::*;
    use crate::allocator::adapt::Zeroizing;
    use crate::allocator::alloc::Global;
    use crate::allocator::debug::{Null, Tracking};
    use crate::policy::*;

    fn xorshift(x: &mut u64) -> u64 {
        *x ^= *x << 13;
        *x ^= *x >> 7;
        *x ^= *x << 17;
        *x
    }

    #[test] fn push_pop_round_trip() {
        let mut v = ZVec::new_in(Zeroizing::<_>::new(Global));
        v.push(1_u32);
        v.push(2);
        v.push(3);
        assert_eq!([1, 2, 3], *v);
        assert_eq!(Some(3), v.pop());
        assert_eq!(2, v.len());
        assert_eq!([1, 2], *v);
    }

    #[test] fn pop_wipes_the_vacated_slot() {
        let mut v = ZVec::new_in(Zeroizing::<_>::new(Global));
        v.push(0xFEED_F00D_DEAD_BEEF_u64);
        assert_eq!(Some(0xFEED_F00D_DEAD_BEEF), v.pop());
        // SAFETY: ✔️ capacity ≥ 1 and slot 0 was wiped (hence initialized) by pop
        let slot = unsafe { v.as_ptr().read_volatile() };
        assert_eq!(0, slot, "the vacated slot must hold no trace of the popped value");
    }

    #[test] fn truncate_wipes_the_dropped_tail() {
        let mut v = ZVec::new_in(Zeroizing::<_>::new(Global));
        for i in 1..=8 { v.push(i as u64 * 0x0101_0101_0101_0101) }
        v.truncate(2);
        assert_eq!(2, v.len());
        for i in 2..8 {
            // SAFETY: ✔️ slots `2..8` remain allocated and were wiped (hence initialized) by truncate
            assert_eq!(0, unsafe { v.as_ptr().add(i).read_volatile() }, "slot {i} must be wiped");
        }
    }

    #[test] fn freed_buffers_scan_clean_for_any_population() {
        for n in [0_usize, 1, 1000] {
            let registry = Tracking::new(Global);
            {
                let mut v = ZVec::new_in(Zeroizing::<_, ZeroFresh>::new(&registry));
                let mut seed = 0x9E37_79B9_7F4A_7C15_u64 ^ n as u64;
                for _ in 0..n { v.push(xorshift(&mut seed)) }
                assert_eq!(n, v.len());
            }
            assert!(registry.is_fully_clean(), "no trace of {n} secrets may survive the vec");
            assert_eq!(0, registry.dirty_frees());
        }
    }

    #[test] fn growth_never_strands_a_stale_copy() {
        let registry = Tracking::new(Global);
        {
            let mut v = ZVec::try_with_capacity_in(1, Zeroizing::<_, ZeroFresh>::new(&registry)).unwrap();
            // force several reallocations
            for i in 0..100_u64 { v.push(0x5EC2_E700_0000_0000 | i) }
        }
        assert!(registry.is_fully_clean(), "every buffer vacated during growth must be wiped before its free");
        assert!(registry.clean_frees() >= 2);
    }

    #[test] fn wiping_is_policy_gated() {
        let registry = Tracking::new(Global);
        {
            let mut v = ZVec::try_with_capacity_in(4, Zeroizing::<_, ZeroNothing>::new(&registry)).unwrap();
            for _ in 0..4 { assert!(v.push_within_capacity(0x0BAD_CAFE_u32).is_ok()) }
        }
        assert_eq!(1, registry.dirty_frees(), "ZeroNothing must leave the elements' bytes in place");
    }

    #[test] fn allocation_failures_surface_as_errors() {
        assert!(ZVec::<u32, Null>::try_with_capacity_in(0, Null).is_err());
        assert!(ZVec::<u32, Null>::try_with_capacity_in(4, Null).is_err());
        assert!(ZVec::<u32, Zeroizing<Null>>::try_with_capacity_in(4, Zeroizing::new(Null)).is_err());

        let mut v = ZVec::new_in(Zeroizing::<_>::new(Global));
        v.push(1_u32);
        assert!(v.try_reserve(usize::MAX).is_err(), "capacity overflow must surface as Err, not UB");
        assert_eq!([1], *v, "a failed reserve must leave the vec untouched");
    }

    #[test] fn truncate_runs_destructors_exactly_once() {
        use crate::util::drop::Tester;
        let mut v = ZVec::new_in(Zeroizing::<_>::new(Global));
        for i in 100..105 { v.push(Tester::new(i)) }
        v.truncate(2);
        let counts = Tester::counts();
        assert_eq!([1, 1, 0, 0, 0], counts[100..105]);
        drop(v);
        assert_eq!([0, 0, 0, 0, 0], Tester::counts()[100..105]);
    }

    #[test] fn shrink_keeps_contents() {
        let mut v = ZVec::try_with_capacity_in(64, Zeroizing::<_>::new(Global)).unwrap();
        for i in 0..10_u32 { assert!(v.push_within_capacity(i).is_ok()) }
        v.try_shrink_to_fit().unwrap();
        assert_eq!(10, v.capacity());
        assert_eq!((0..10).collect::<alloc::vec::Vec<_>>(), *v);
    }

    #[test] fn extend_from_slice_appends() {
        let mut v = ZVec::new_in(Zeroizing::<_>::new(Global));
        v.extend_from_slice(&[1_u8, 2, 3]);
        v.extend_from_slice(b"abc");
        assert_eq!([1, 2, 3, b'a', b'b', b'c'], *v);
    }
}
