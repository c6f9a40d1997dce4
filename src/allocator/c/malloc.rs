use crate::*;
use crate::meta::*;

use core::alloc::Layout;
use core::ptr::NonNull;



/// [`malloc`](https://en.cppreference.com/w/c/memory/malloc) / [`calloc`](libc::calloc) / [`realloc`](libc::realloc) / [`free`](libc::free)
///
/// The C heap only promises [`max_align_t`](libc::max_align_t) alignment, so requests for more
/// alignment than that fail rather than hand back an underaligned block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] #[repr(transparent)] pub struct Malloc;



// meta::*

impl Meta for Malloc {
    type Error = ();
    const MAX_ALIGN : usize = core::mem::align_of::<libc::max_align_t>();
    const MAX_SIZE  : usize = usize::MAX; // *slightly* less in practice

    /// "If the size of the space requested is zero, the behavior is implementation defined: either
    /// a null pointer is returned, or the behavior is as if the size were some nonzero value,
    /// except that the returned pointer shall not be used to access an object."
    /// C89 § 7.20.3 ¶ 1
    ///
    /// Implementation defined behavior is not worth keying soundness off of, so zero-sized requests
    /// simply return <code>[Err]\(...\)</code>.
    const ZST_SUPPORTED : bool = false;
}

// SAFETY: ✔️ global state only
unsafe impl Stateless for Malloc {}



// fat::*

// SAFETY: ✔️ allocations are suitably aligned for any fundamental alignment (C89 § 7.20.3 ¶ 1); larger alignments are rejected up front
unsafe impl fat::Alloc for Malloc {
    #[track_caller] fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, Self::Error> {
        if layout.align() > Self::MAX_ALIGN || layout.size() == 0 { return Err(()) }
        // SAFETY: ✔️ this "should" be safe for all nonzero `size`
        let alloc = unsafe { libc::malloc(layout.size()) };
        NonNull::new(alloc.cast()).ok_or(())
    }

    #[track_caller] fn alloc_zeroed(&self, layout: Layout) -> Result<AllocNN0, Self::Error> {
        if layout.align() > Self::MAX_ALIGN || layout.size() == 0 { return Err(()) }
        // SAFETY: ✔️ `calloc` zeros memory ("The space is initialized to all bits zero" C89 § 7.20.3.1 ¶ 2)
        let alloc = unsafe { libc::calloc(1, layout.size()) };
        NonNull::new(alloc.cast()).ok_or(())
    }
}

// SAFETY: ✔️ `free` is compatible with `malloc` / `calloc` / `realloc` (C89 § 7.20.3.2 ¶ 2)
unsafe impl fat::Free for Malloc {
    #[track_caller] unsafe fn free(&self, ptr: AllocNN, _layout: Layout) {
        // SAFETY: ✔️ `ptr` belongs to `self` per fat::Free::free's documented safety preconditions, and was thus allocated with one of `malloc`, `calloc`, or `realloc`
        unsafe { libc::free(ptr.as_ptr().cast()) }
    }
}

// SAFETY: ✔️ `realloc` is compatible with `malloc` / `calloc` (C89 § 7.20.3.4), and preserves fundamental alignment
unsafe impl fat::Realloc for Malloc {
    #[track_caller] unsafe fn realloc_uninit(&self, ptr: AllocNN, old_layout: Layout, new_layout: Layout) -> Result<AllocNN, Self::Error> {
        if new_layout.align() > Self::MAX_ALIGN || new_layout.size() == 0 { return Err(()) }
        if old_layout == new_layout { return Ok(ptr) }
        // SAFETY: ✔️ `ptr` belongs to `self` per fat::Realloc::realloc_uninit's documented safety preconditions, and was thus allocated with one of `malloc`, `calloc`, or `realloc` - all of which should be safe to `realloc`
        let alloc = unsafe { libc::realloc(ptr.as_ptr().cast(), new_layout.size()) };
        NonNull::new(alloc.cast()).ok_or(())
    }
}



#[test] fn fat_alignment()          { fat::test::alignment(Malloc) }
#[test] fn fat_edge_case_sizes()    { fat::test::edge_case_sizes(Malloc) }
#[test] fn fat_zeroed()             { fat::test::zeroed_alloc(Malloc) }
#[test] fn fat_zst_support()        { fat::test::zst_supported_accurate(Malloc) }
