use crate::boxed::ZBox;
use crate::error::ExcessiveSliceRequestedError;
use crate::fat::*;
use crate::util;

use core::alloc::Layout;
use core::mem::MaybeUninit;



impl<T, A: Realloc> ZBox<[MaybeUninit<T>], A> {
    /// Reallocate the boxed slice to hold `new_len` elements.
    ///
    /// Under a [`Zeroizing`](crate::allocator::adapt::Zeroizing) allocator with a wiping policy the
    /// vacated block is wiped before it is freed, so growing never strands a stale copy.
    pub fn try_realloc_uninit_slice(this: &mut Self, new_len: usize) -> Result<(), A::Error> {
        let new_layout  = Layout::array::<MaybeUninit<T>>(new_len).map_err(|_| ExcessiveSliceRequestedError { requested: new_len })?;
        let old_layout  = Self::layout(this);
        let allocator   = Self::allocator(this);
        let data        = Self::data(this).cast::<MaybeUninit<u8>>();
        // SAFETY: ✔️ `data` was allocated by `allocator` with `old_layout`
        let data        = unsafe { allocator.realloc_uninit(data, old_layout, new_layout)? };
        // SAFETY: ✔️ `data` was just (re)allocated with room for `new_len` elements
        unsafe { Self::set_data(this, util::nn::slice_from_raw_parts(data.cast(), new_len)) };
        Ok(())
    }
}
