use crate::boxed::ZBox;
use crate::error::ExcessiveSliceRequestedError;
use crate::fat::*;
use crate::util;

use core::alloc::Layout;
use core::mem::MaybeUninit;
use core::mem::{align_of, size_of};



impl<T, A: Alloc + Free> ZBox<T, A> {
    // Sized, Alloc

    /// If you hit this assertion, it's unlikely that `A` can ever successfully allocate an instance of `T` except by happenstance and accident.
    pub(super) const ASSERT_A_CAN_ALLOC_T : () = {
        assert!(align_of::<T>() <= A::MAX_ALIGN, "align_of::<T>() > A::MAX_ALIGN - the allocator cannot allocate memory sufficiently aligned for instances of T on its own");
        assert!(size_of::<T>() > 0 || A::ZST_SUPPORTED, "T is a ZST but A does not support allocating ZSTs");
    };

    /// If you hit this assertion, `A` cannot generically allocate a slice of possibly 0 instances of `T`.
    pub(super) const ASSERT_A_CAN_ALLOC_T_SLICE : () = {
        assert!(align_of::<T>() <= A::MAX_ALIGN, "align_of::<T>() > A::MAX_ALIGN - the allocator cannot allocate memory sufficiently aligned for instances of T on its own");
        assert!(A::ZST_SUPPORTED, "[T] could be empty but A does not support allocating ZSTs");
    };

    /// Allocate a new box initialized to `value` using `allocator`.
    ///
    /// ## Failure Modes
    /// *   Fails to compile on impossible alignments or for ZSTs the allocator doesn't support
    /// *   Returns <code>[Err]\(...\)</code> when out of memory
    pub fn try_new_in(value: T, allocator: A) -> Result<Self, A::Error> {
        let _ = Self::ASSERT_A_CAN_ALLOC_T;
        Ok(ZBox::write(Self::try_new_uninit_in(allocator)?, value))
    }

    /// Allocate a new uninitialized box using `allocator`.
    pub fn try_new_uninit_in(allocator: A) -> Result<ZBox<MaybeUninit<T>, A>, A::Error> {
        let _ = Self::ASSERT_A_CAN_ALLOC_T;
        let layout = Layout::new::<T>();
        let data = allocator.alloc_uninit(layout)?.cast();
        // SAFETY: ✔️ we just allocated `data` with `allocator`
        Ok(unsafe { ZBox::from_raw_in(data, allocator) })
    }

    /// Allocate a new all-zero box using `allocator`.
    ///
    /// Goes through [`Alloc::alloc_zeroed`], so under a
    /// [`Zeroizing`](crate::allocator::adapt::Zeroizing) allocator the zeros are verified.
    pub fn try_new_zeroed_in(allocator: A) -> Result<ZBox<T, A>, A::Error> where T : bytemuck::Zeroable {
        let _ = Self::ASSERT_A_CAN_ALLOC_T;
        let layout = Layout::new::<T>();
        let data = allocator.alloc_zeroed(layout)?.cast();
        // SAFETY: ✔️ we just allocated `data` zeroed with `allocator`, and all-zero is a valid `T` per `bytemuck::Zeroable`
        Ok(unsafe { ZBox::from_raw_in(data, allocator) })
    }

    /// Allocate a new uninitialized box of `len` values using `allocator`.
    pub fn try_new_uninit_slice_in(len: usize, allocator: A) -> Result<ZBox<[MaybeUninit<T>], A>, A::Error> {
        let _ = Self::ASSERT_A_CAN_ALLOC_T_SLICE;
        let layout = Layout::array::<T>(len).map_err(|_| ExcessiveSliceRequestedError { requested: len })?;
        let data = util::nn::slice_from_raw_parts(allocator.alloc_uninit(layout)?.cast(), len);
        // SAFETY: ✔️ we just allocated `data` with `allocator`
        Ok(unsafe { ZBox::from_raw_in(data, allocator) })
    }

    /// Allocate a new boxed slice copied from `data` using `allocator`.
    pub fn try_from_slice_in(data: &[T], allocator: A) -> Result<ZBox<[T], A>, A::Error> where T : Copy {
        let mut boxed = Self::try_new_uninit_slice_in(data.len(), allocator)?;
        for (dst, src) in boxed.iter_mut().zip(data.iter().copied()) { dst.write(src); }
        // SAFETY: ✔️ we just initialized all `data.len()` elements
        Ok(unsafe { boxed.assume_init() })
    }
}

#[cfg(feature = "panicy-memory")] impl<T, A: Alloc + Free> ZBox<T, A> {
    // Sized, Alloc, panicy

    /// Allocate a new box initialized to `value` using `allocator`.
    ///
    /// [`panic!`]s when out of memory.
    #[track_caller] #[inline(always)] pub fn new_in(value: T, allocator: A) -> Self {
        let _ = Self::ASSERT_A_CAN_ALLOC_T;
        Self::try_new_in(value, allocator).expect("unable to allocate")
    }

    /// Allocate a new uninitialized box using `allocator`.
    ///
    /// [`panic!`]s when out of memory.
    #[track_caller] #[inline(always)] pub fn new_uninit_in(allocator: A) -> ZBox<MaybeUninit<T>, A> {
        let _ = Self::ASSERT_A_CAN_ALLOC_T;
        Self::try_new_uninit_in(allocator).expect("unable to allocate")
    }

    /// Allocate a new all-zero box using `allocator`.
    ///
    /// [`panic!`]s when out of memory.
    #[track_caller] #[inline(always)] pub fn new_zeroed_in(allocator: A) -> ZBox<T, A> where T : bytemuck::Zeroable {
        let _ = Self::ASSERT_A_CAN_ALLOC_T;
        Self::try_new_zeroed_in(allocator).expect("unable to allocate")
    }

    /// Allocate a new boxed slice copied from `data` using `allocator`.
    ///
    /// [`panic!`]s when out of memory.
    #[track_caller] #[inline(always)] pub fn from_slice_in(data: &[T], allocator: A) -> ZBox<[T], A> where T : Copy {
        let _ = Self::ASSERT_A_CAN_ALLOC_T_SLICE;
        Self::try_from_slice_in(data, allocator).expect("unable to allocate")
    }
}



#[cfg(test)] mod tests {
    use crate::allocator::adapt::Zeroizing;
    use crate::allocator::alloc::Global;
    use crate::allocator::debug::{Null, Tracking};
    use crate::boxed::ZBox;
    use crate::policy::*;

    #[test] fn null_cannot_box_anything() {
        assert!(ZBox::try_new_in(42_u32, Null).is_err());
        assert!(ZBox::<u64, _>::try_new_uninit_in(Null).is_err());
    }

    #[test] fn round_trips_through_raw_parts() {
        let boxed = ZBox::try_new_in(0x5EC7_u32, Zeroizing::<_>::new(Global)).unwrap();
        let (data, allocator) = ZBox::into_raw_with_allocator(boxed);
        // SAFETY: ✔️ (data, allocator) were just decomposed from a live box
        let boxed = unsafe { ZBox::from_raw_in(data, allocator) };
        assert_eq!(0x5EC7, *boxed);
    }

    #[test] fn stateless_allocators_reconstitute_from_raw() {
        let boxed = ZBox::try_new_in(9_u32, Zeroizing::<_>::new(Global)).unwrap();
        let data = ZBox::into_raw(boxed);
        // SAFETY: ✔️ `data` was just decomposed from a box whose allocator instances are interchangeable
        let boxed = unsafe { ZBox::<u32, Zeroizing<Global>>::from_raw(data) };
        assert_eq!(9, *boxed);
    }

    #[test] fn dropped_secret_never_reaches_the_free_list() {
        let registry = Tracking::new(Global);
        {
            let secret = ZBox::try_new_in(0x5EC2E7_5EC2E7_u64, Zeroizing::<_>::new(&registry)).unwrap();
            assert_eq!(0x5EC2E7_5EC2E7, *secret);
        }
        assert!(registry.is_fully_clean(), "the box's footprint must be wiped before its allocation is freed");
        assert_eq!(1, registry.clean_frees());
    }

    #[test] fn whole_array_footprint_is_wiped() {
        let registry = Tracking::new(Global);
        {
            let mut keys = ZBox::try_new_in([0_u64; 16], Zeroizing::<_>::new(&registry)).unwrap();
            for (i, k) in keys.iter_mut().enumerate() { *k = 0x1111_1111_1111_1111_u64.wrapping_mul(i as u64 + 1) }
        }
        assert!(registry.is_fully_clean());
    }

    #[test] fn moving_the_value_out_wipes_the_heap_copy() {
        let registry = Tracking::new(Global);
        let boxed = ZBox::try_new_in([0xAB_u8; 32], Zeroizing::<_>::new(&registry)).unwrap();
        let value = ZBox::into_inner(boxed);
        assert_eq!([0xAB_u8; 32], value);
        assert!(registry.is_fully_clean(), "the vacated heap copy must be wiped");
    }

    #[test] fn destroy_wipe_is_policy_gated() {
        let registry = Tracking::new(Global);
        {
            let _scratch = ZBox::try_new_in(0xD15C_A2D5_u32, Zeroizing::<_, ZeroNothing>::new(&registry)).unwrap();
        }
        assert_eq!(1, registry.dirty_frees(), "ZeroNothing must leave the dropped value's bytes in place");
    }

    #[test] fn zeroed_boxes_are_zero() {
        let boxed = ZBox::<[u32; 8], _>::try_new_zeroed_in(Zeroizing::<_>::new(Global)).unwrap();
        assert_eq!([0_u32; 8], *boxed);
    }

    #[test] fn boxed_slices_copy_and_wipe() {
        let registry = Tracking::new(Global);
        {
            let boxed = ZBox::try_from_slice_in(b"attack at dawn", Zeroizing::<_>::new(&registry)).unwrap();
            assert_eq!(b"attack at dawn", &*boxed);
        }
        assert!(registry.is_fully_clean());
    }

    #[test] fn leaked_boxes_stay_put() {
        let leaked : &'static mut u32 = ZBox::leak(ZBox::try_new_in(7_u32, Zeroizing::<_>::new(Global)).unwrap());
        assert_eq!(7, *leaked);
        // deliberately leaked; nothing to assert beyond liveness
    }
}
