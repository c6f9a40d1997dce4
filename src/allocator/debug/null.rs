#![allow(unused_variables)]

use crate::*;
use core::alloc::Layout;



/// Never allocates anything, not even ZSTs.
///
/// Useful for exercising the error paths of allocation-aware containers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] pub struct Null;

impl meta::Meta for Null {
    type Error                  = ();
    const MAX_ALIGN : usize     = 1 << (usize::BITS - 1);
    const MAX_SIZE  : usize     = usize::MAX;
    const ZST_SUPPORTED : bool  = true; // claims support for anything, then allocates nothing
}

// SAFETY: ✔️ global state only (there is none)
unsafe impl meta::Stateless for Null {}



// fat::*

// SAFETY: ✔️ always failing to allocate is a trivially safe implementation of this trait
unsafe impl fat::Alloc for Null {
    fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, Self::Error> { Err(()) }
    fn alloc_zeroed(&self, layout: Layout) -> Result<AllocNN0, Self::Error> { Err(()) }
}

// SAFETY: ✔️ this trait cannot be safely called, and simply panicing in response is a reasonable response to the caller's UB
unsafe impl fat::Free for Null {
    #[track_caller] #[inline(never)] unsafe fn free(&self, ptr: AllocNN, layout: Layout) {
        // SAFETY: ✔️ violation of fat::Free::free's documented safety precondition that `ptr` belong to `self`
        unsafe { ub!("bug: undefined behavior: {ptr:?} does not belong to `self` as the Null allocator can't allocate anything to free in the first place") }
    }
}

// SAFETY: ✔️ always failing to (re)allocate is a trivially safe implementation of this trait
unsafe impl fat::Realloc for Null {
    unsafe fn realloc_uninit(&self, ptr: AllocNN, old_layout: Layout, new_layout: Layout) -> Result<AllocNN, Self::Error> { Err(()) }
}



#[cfg(test)] mod tests {
    use super::*;

    #[test] fn never_allocates() {
        let layout = Layout::new::<u64>();
        assert!(fat::Alloc::alloc_uninit(&Null, layout).is_err());
        assert!(fat::Alloc::alloc_zeroed(&Null, layout).is_err());
    }
}
