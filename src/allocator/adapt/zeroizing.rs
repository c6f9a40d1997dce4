use crate::*;
use crate::meta::*;
use crate::policy::*;

use core::alloc::Layout;
use core::marker::PhantomData;



/// Adapt any allocator to wipe memory at policy-selected lifecycle points.
///
/// The wipes use [`wipe`], so every zero this adapter promises is verified: the bytes are re-read
/// after the fill and the fill repeats until the scan comes back clean.
///
/// | Event                                 | Wiped when...                                         |
/// | --------------------------------------| ------------------------------------------------------|
/// | [`alloc_uninit`](fat::Alloc::alloc_uninit)    | `P::ZERO_ON_ALLOC`
/// | [`alloc_zeroed`](fat::Alloc::alloc_zeroed)    | always (an explicit request for zeroed memory)
/// | [`free`](fat::Free::free)                     | `P::ZERO_ON_FREE`
/// | element destruction (in [`ZBox`](crate::boxed::ZBox) / [`ZVec`](crate::vec::ZVec)) | `P::ZERO_ON_DESTROY`
///
/// Reallocation never delegates to the underlying `realloc` while the policy wipes retired bytes:
/// an in-place-moving `realloc` may leave a stale copy of the block behind, outside this adapter's
/// reach.  Instead the block is copied to a fresh allocation and the old block is wiped before it
/// is freed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] #[repr(transparent)] pub struct Zeroizing<A, P: ZeroPolicy = ZeroOnDestroy> {
    underlying: A,
    policy:     PhantomData<P>,
}

impl<A, P: ZeroPolicy> Zeroizing<A, P> {
    pub const fn new(underlying: A) -> Self { Self { underlying, policy: PhantomData } }
    pub fn into_inner(self) -> A { self.underlying }
}

impl<A, P: ZeroPolicy> core::ops::Deref for Zeroizing<A, P> {
    type Target = A;
    #[inline(always)] fn deref(&self) -> &Self::Target { &self.underlying }
}



// meta::*

impl<A: Meta, P: ZeroPolicy> Meta for Zeroizing<A, P> {
    type Error                      = A::Error;
    const MAX_ALIGN      : usize    = A::MAX_ALIGN;
    const MAX_SIZE       : usize    = A::MAX_SIZE;
    const ZST_SUPPORTED  : bool     = A::ZST_SUPPORTED;
    const DESTROY_ZEROES : bool     = P::ZERO_ON_DESTROY;
}

// SAFETY: ✔️ per underlying allocator - the adapter itself holds no state
unsafe impl<A: Stateless, P: ZeroPolicy + Copy + Default> Stateless for Zeroizing<A, P> {}



// fat::*

// SAFETY: ✔️ allocations are made by (and compatible with) the underlying allocator; wiping a just-allocated or about-to-be-freed block never violates layout guarantees
unsafe impl<A: fat::Alloc, P: ZeroPolicy> fat::Alloc for Zeroizing<A, P> {
    fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, Self::Error> {
        let alloc = self.underlying.alloc_uninit(layout)?;
        if P::ZERO_ON_ALLOC {
            // SAFETY: ✔️ `alloc` was just allocated with `layout`
            unsafe { wipe::erased(alloc.as_ptr(), layout) };
        }
        Ok(alloc)
    }

    fn alloc_zeroed(&self, layout: Layout) -> Result<AllocNN0, Self::Error> {
        // the underlying allocator's own zeroing is not trusted - an explicit request for zeroed
        // memory always goes through the verified wipe
        let alloc = self.underlying.alloc_uninit(layout)?;
        // SAFETY: ✔️ `alloc` was just allocated with `layout`
        unsafe { wipe::erased(alloc.as_ptr(), layout) };
        Ok(alloc.cast())
    }
}

// SAFETY: ✔️ frees delegate to the underlying allocator with the same (ptr, layout)
unsafe impl<A: fat::Free, P: ZeroPolicy> fat::Free for Zeroizing<A, P> {
    unsafe fn free(&self, ptr: AllocNN, layout: Layout) {
        if P::ZERO_ON_FREE {
            // SAFETY: ✔️ (ptr, layout) is a live allocation per fat::Free::free's documented safety preconditions
            unsafe { wipe::erased(ptr.as_ptr(), layout) };
        }
        // SAFETY: ✔️ same preconditions as this fn
        unsafe { self.underlying.free(ptr, layout) }
    }
}

// SAFETY: ✔️ reallocations either delegate wholesale, or are composed of this adapter's own alloc/free
unsafe impl<A: fat::Realloc, P: ZeroPolicy> fat::Realloc for Zeroizing<A, P> {
    unsafe fn realloc_uninit(&self, ptr: AllocNN, old_layout: Layout, new_layout: Layout) -> Result<AllocNN, Self::Error> {
        if !P::ZERO_ON_FREE && !P::ZERO_ON_DESTROY {
            // SAFETY: ✔️ same preconditions as this fn
            return unsafe { self.underlying.realloc_uninit(ptr, old_layout, new_layout) };
        }
        if old_layout == new_layout { return Ok(ptr) }

        let alloc = self.underlying.alloc_uninit(new_layout)?;
        if P::ZERO_ON_ALLOC {
            // SAFETY: ✔️ `alloc` was just allocated with `new_layout`
            unsafe { wipe::erased(alloc.as_ptr(), new_layout) };
        }
        {
            // SAFETY: ✔️ `ptr` is valid for `old_layout.size()` bytes per fat::Realloc::realloc_uninit's documented safety preconditions
            let old : &    [core::mem::MaybeUninit<u8>] = unsafe { util::slice::from_raw_bytes_layout    (ptr,   old_layout) };
            // SAFETY: ✔️ `alloc` was just allocated with `new_layout`
            let new : &mut [core::mem::MaybeUninit<u8>] = unsafe { util::slice::from_raw_bytes_layout_mut(alloc, new_layout) };
            let n = old.len().min(new.len());
            new[..n].copy_from_slice(&old[..n]);
        }
        // the old block is retired: wipe it before the underlying allocator can hand it out again
        // SAFETY: ✔️ `ptr` is valid for `old_layout.size()` bytes until the free below
        unsafe { wipe::erased(ptr.as_ptr(), old_layout) };
        // SAFETY: ✔️ (ptr, old_layout) was a previous valid alloc per this fn's safety preconditions
        unsafe { self.underlying.free(ptr, old_layout) };
        Ok(alloc)
    }
}



#[cfg(test)] mod tests {
    use super::*;
    use crate::allocator::alloc::Global;
    use crate::allocator::debug::Tracking;

    #[test] fn fat_alignment()      { fat::test::alignment(Zeroizing::<_>::new(Global)) }
    #[test] fn fat_zeroed()         { fat::test::zeroed_alloc(Zeroizing::<_>::new(Global)) }
    #[test] fn fat_edge_cases()     { fat::test::edge_case_sizes(Zeroizing::<_>::new(Global)) }
    #[test] fn fat_zst_support()    { fat::test::zst_supported_accurate(Zeroizing::<_>::new(Global)) }

    #[test] fn alloc_policy_wipes_fresh_blocks() {
        let layout = Layout::from_size_align(64, 8).unwrap();
        let allocator = Zeroizing::<_, ZeroFresh>::new(Global);
        let alloc = fat::Alloc::alloc_uninit(&allocator, layout).unwrap();
        // SAFETY: ✔️ ZERO_ON_ALLOC wiped (hence initialized) all 64 bytes
        let bytes = unsafe { core::slice::from_raw_parts(alloc.as_ptr().cast::<u8>(), layout.size()) };
        assert!(bytes.iter().all(|&b| b == 0), "ZERO_ON_ALLOC must hand out all-zero blocks");
        // SAFETY: ✔️ just allocated with (allocator, layout)
        unsafe { fat::Free::free(&allocator, alloc, layout) };
    }

    #[test] fn free_policy_observed_clean_by_registry() {
        let registry = Tracking::new(Global);
        let layout = Layout::from_size_align(48, 8).unwrap();
        {
            let allocator = Zeroizing::<_, ZeroOnFree>::new(&registry);
            let alloc = fat::Alloc::alloc_uninit(&allocator, layout).unwrap();
            // SAFETY: ✔️ scribbling over just-allocated bytes
            unsafe { core::slice::from_raw_parts_mut(alloc.as_ptr().cast::<u8>(), layout.size()) }.fill(0xEE);
            // SAFETY: ✔️ just allocated with (allocator, layout)
            unsafe { fat::Free::free(&allocator, alloc, layout) };
        }
        assert!(registry.is_fully_clean());
        assert_eq!(1, registry.clean_frees());
    }

    #[test] fn no_policy_observed_dirty_by_registry() {
        let registry = Tracking::new(Global);
        let layout = Layout::from_size_align(48, 8).unwrap();
        {
            let allocator = Zeroizing::<_, ZeroNothing>::new(&registry);
            let alloc = fat::Alloc::alloc_uninit(&allocator, layout).unwrap();
            // SAFETY: ✔️ scribbling over just-allocated bytes
            unsafe { core::slice::from_raw_parts_mut(alloc.as_ptr().cast::<u8>(), layout.size()) }.fill(0xEE);
            // SAFETY: ✔️ just allocated with (allocator, layout)
            unsafe { fat::Free::free(&allocator, alloc, layout) };
        }
        assert!(!registry.is_fully_clean(), "scribbled bytes were freed unwiped - the registry must notice");
        assert_eq!(1, registry.dirty_frees());
    }

    #[test] fn realloc_wipes_the_retired_block() {
        // the registry sits *under* the adapter, so it sees the old block at free time
        let registry = Tracking::new(Global);
        let old_layout = Layout::from_size_align(32, 8).unwrap();
        let new_layout = Layout::from_size_align(96, 8).unwrap();
        {
            let allocator = Zeroizing::<_, ZeroOnDestroy>::new(&registry);
            let alloc = fat::Alloc::alloc_uninit(&allocator, old_layout).unwrap();
            // SAFETY: ✔️ scribbling over just-allocated bytes
            unsafe { core::slice::from_raw_parts_mut(alloc.as_ptr().cast::<u8>(), old_layout.size()) }.fill(0x42);
            // SAFETY: ✔️ (alloc, old_layout) is a live allocation
            let grown = unsafe { fat::Realloc::realloc_uninit(&allocator, alloc, old_layout, new_layout) }.unwrap();
            // SAFETY: ✔️ first 32 bytes were copied from the old block
            let prefix = unsafe { core::slice::from_raw_parts(grown.as_ptr().cast::<u8>(), old_layout.size()) };
            assert!(prefix.iter().all(|&b| b == 0x42), "realloc must preserve the old contents");
            // elements are still live in `grown` - wipe manually before free so the registry stays clean
            // SAFETY: ✔️ (grown, new_layout) is a live allocation
            unsafe { wipe::erased(grown.as_ptr(), new_layout) };
            // SAFETY: ✔️ (grown, new_layout) is a live allocation
            unsafe { fat::Free::free(&allocator, grown, new_layout) };
        }
        assert!(registry.is_fully_clean(), "the retired realloc source block must have been wiped");
        assert_eq!(2, registry.clean_frees());
    }
}
