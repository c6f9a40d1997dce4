use crate::*;
use crate::meta::*;

use core::alloc::Layout;
use core::ptr::NonNull;



/// Use <code>[alloc::alloc]::{[alloc](alloc::alloc::alloc), [alloc_zeroed](alloc::alloc::alloc_zeroed), [realloc](alloc::alloc::realloc), [dealloc](alloc::alloc::dealloc)}</code>
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] #[repr(transparent)] pub struct Global;



// meta::*

impl Meta for Global {
    type Error                  = ();
    const MAX_ALIGN : usize     = 1 << (usize::BITS - 1);
    const MAX_SIZE  : usize     = usize::MAX/2;
    const ZST_SUPPORTED : bool  = true;
}

// SAFETY: ✔️ global state only
unsafe impl Stateless for Global {}



// fat::*

// SAFETY: ✔️ all `impl fat::* for Global` are compatible with each other and return allocations compatible with their alignments
unsafe impl fat::Alloc for Global {
    fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, Self::Error> {
        match layout.size() {
            0                       => Ok(util::nn::dangling(layout)),
            n if n > Self::MAX_SIZE => Err(()),
            _ => {
                // SAFETY: ✔️ `layout` has a nonzero size ≤ isize::MAX
                let alloc = unsafe { alloc::alloc::alloc(layout) };
                NonNull::new(alloc.cast()).ok_or(())
            }
        }
    }

    fn alloc_zeroed(&self, layout: Layout) -> Result<AllocNN0, Self::Error> {
        match layout.size() {
            0                       => Ok(util::nn::dangling(layout)),
            n if n > Self::MAX_SIZE => Err(()),
            _ => {
                // SAFETY: ✔️ `layout` has a nonzero size ≤ isize::MAX
                let alloc = unsafe { alloc::alloc::alloc_zeroed(layout) };
                NonNull::new(alloc.cast()).ok_or(())
            }
        }
    }
}

// SAFETY: ✔️ all `impl fat::* for Global` are compatible with each other and return allocations compatible with their alignments
unsafe impl fat::Free for Global {
    unsafe fn free(&self, ptr: AllocNN, layout: Layout) {
        if layout.size() == 0 { return }
        // SAFETY: ✔️ `ptr` belongs to `self` and `layout` describes the allocation per fat::Free::free's documented safety preconditions
        unsafe { alloc::alloc::dealloc(ptr.as_ptr().cast(), layout) }
    }
}

// SAFETY: ✔️ all `impl fat::* for Global` are compatible with each other and return allocations compatible with their alignments
unsafe impl fat::Realloc for Global {
    unsafe fn realloc_uninit(&self, ptr: AllocNN, old_layout: Layout, new_layout: Layout) -> Result<AllocNN, Self::Error> {
        if new_layout.size() > Self::MAX_SIZE {
            Err(())
        } else if old_layout == new_layout {
            Ok(ptr)
        } else if old_layout.align() != new_layout.align() || old_layout.size() == 0 || new_layout.size() == 0 {
            let alloc = fat::Alloc::alloc_uninit(self, new_layout)?;
            {
                // SAFETY: ✔️ `ptr` is valid for `old_layout` per fat::Realloc::realloc_uninit's documented safety preconditions
                let old : &    [core::mem::MaybeUninit<u8>] = unsafe { util::slice::from_raw_bytes_layout    (ptr,   old_layout) };
                // SAFETY: ✔️ `alloc` was just allocated using `new_layout`
                let new : &mut [core::mem::MaybeUninit<u8>] = unsafe { util::slice::from_raw_bytes_layout_mut(alloc, new_layout) };
                let n = old.len().min(new.len());
                new[..n].copy_from_slice(&old[..n]);
            }
            // SAFETY: ✔️ `ptr` belongs to `self`, and `old_layout` describes the allocation, per fat::Realloc::realloc_uninit's documented safety preconditions
            unsafe { fat::Free::free(self, ptr, old_layout) };
            Ok(alloc)
        } else {
            // SAFETY: ✔️ layouts have identical alignments and nonzero sizes, `ptr` belongs to `self` and is valid for `old_layout`, and `new_layout.size()` was bounds checked above
            let alloc = unsafe { alloc::alloc::realloc(ptr.as_ptr().cast(), old_layout, new_layout.size()) };
            NonNull::new(alloc.cast()).ok_or(())
        }
    }
}



#[test] fn fat_alignment()          { fat::test::alignment(Global) }
#[test] fn fat_edge_case_sizes()    { fat::test::edge_case_sizes(Global) }
#[test] fn fat_zeroed()             { fat::test::zeroed_alloc(Global) }
#[test] fn fat_zst_support()        { fat::test::zst_supported_accurate(Global) }
