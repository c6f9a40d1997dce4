//! [`Layout`]-parameterized allocator traits
//!
//! Every allocation and deallocation carries its full [`Layout`], which keeps a single trait family
//! sufficient for the adapter, the owner box, and the vec: alignment is always known at free time,
//! and the element type never needs to be rebound - one allocator instance serves every element
//! type with the same policy.

use crate::*;

use core::alloc::Layout;
use core::mem::MaybeUninit;
#[cfg(doc)] use core::ptr::NonNull;



/// Allocation functions:<br>
/// <code>[alloc_uninit](Self::alloc_uninit)(layout: [Layout]) -> [Result]&lt;[NonNull]&lt;\_&gt;, \_&gt;</code><br>
/// <code>[alloc_zeroed](Self::alloc_zeroed)(layout: [Layout]) -> [Result]&lt;[NonNull]&lt;\_&gt;, \_&gt;</code><br>
/// <br>
///
/// ## Safety
/// *   Allocations created by this trait must be compatible with any other [`fat`] traits implemented on this allocator type.
/// *   Returned allocations must obey `layout` alignment and size.
pub unsafe trait Alloc : meta::Meta {
    /// Allocate at least `layout.size()` bytes of uninitialized memory aligned to `layout.align()`.
    ///
    /// The resulting allocation can typically be freed with <code>[Free]::[free](Free::free)</code>
    fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, Self::Error>;

    /// Allocate at least `layout.size()` bytes of zeroed memory aligned to `layout.align()`.
    ///
    /// The resulting allocation can typically be freed with <code>[Free]::[free](Free::free)</code>
    fn alloc_zeroed(&self, layout: Layout) -> Result<AllocNN0, Self::Error> {
        let alloc = self.alloc_uninit(layout)?;
        // SAFETY: ✔️ `alloc` is non-null by type, `layout.size()` bytes were just allocated aligned to `layout.align()`
        unsafe { wipe::erased(alloc.as_ptr(), layout) };
        Ok(alloc.cast())
    }
}



/// Deallocation function:<br>
/// <code>[free](Self::free)(ptr: [NonNull]&lt;\_&gt;, layout: [Layout])</code><br>
/// <br>
///
/// ## Safety
/// *   This trait must be able to free allocations made by any other [`fat`] traits implemented on this allocator type.
pub unsafe trait Free : meta::Meta {
    /// Deallocate an allocation, `ptr`, belonging to `self`.
    ///
    /// ### Safety
    /// *   `ptr` must belong to `self`
    /// *   `ptr` will no longer be accessible after free
    /// *   `layout` must exactly match the [`Layout`] last used to successfully (re)allocate `ptr`
    unsafe fn free(&self, ptr: AllocNN, layout: Layout);
}



/// Reallocation function:<br>
/// <code>[realloc_uninit](Self::realloc_uninit)(ptr: [NonNull]&lt;\_&gt;, old: [Layout], new: [Layout]) -> [Result]&lt;[NonNull]&lt;\_&gt;, \_&gt;</code><br>
/// <br>
///
/// ## Safety
/// *   This trait must be able to reallocate allocations made by any other [`fat`] traits implemented on this allocator type.
/// *   Returned allocations must obey `new_layout` alignment and size.
pub unsafe trait Realloc : Alloc + Free {
    /// Reallocate an existing allocation, `ptr`, belonging to `self`.
    ///
    /// ### Safety
    /// *   `ptr` must belong to `self`
    /// *   `ptr` will no longer be accessible after a succesful realloc (`realloc_uninit` returns <code>[Ok]\(...\)</code>)
    /// *   `old_layout` must exactly match the [`Layout`] last used to successfully (re)allocate `ptr`
    unsafe fn realloc_uninit(&self, ptr: AllocNN, old_layout: Layout, new_layout: Layout) -> Result<AllocNN, Self::Error> {
        if old_layout == new_layout { return Ok(ptr) }
        let alloc = self.alloc_uninit(new_layout)?;
        {
            // SAFETY: ✔️ `ptr` is valid for `old_layout.size()` bytes by fn precondition
            let old : &    [MaybeUninit<u8>] = unsafe { util::slice::from_raw_bytes_layout    (ptr,   old_layout) };
            // SAFETY: ✔️ `alloc` was just allocated with `new_layout`
            let new : &mut [MaybeUninit<u8>] = unsafe { util::slice::from_raw_bytes_layout_mut(alloc, new_layout) };
            let n = old.len().min(new.len());
            new[..n].copy_from_slice(&old[..n]);
        }
        // SAFETY: ✔️ (ptr, old_layout) was a previous valid alloc by fn safety precondition
        unsafe { self.free(ptr, old_layout) };
        Ok(alloc)
    }
}



#[allow(clippy::undocumented_unsafe_blocks)] // SAFETY: ✔️ same trait, same prereqs
unsafe impl<'a, A: Alloc> Alloc for &'a A {
    fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN,  Self::Error> { A::alloc_uninit(self, layout) }
    fn alloc_zeroed(&self, layout: Layout) -> Result<AllocNN0, Self::Error> { A::alloc_zeroed(self, layout) }
}

#[allow(clippy::undocumented_unsafe_blocks)] // SAFETY: ✔️ same trait, same prereqs
unsafe impl<'a, A: Free> Free for &'a A {
    unsafe fn free(&self, ptr: AllocNN, layout: Layout) { unsafe { A::free(self, ptr, layout) } }
}

#[allow(clippy::undocumented_unsafe_blocks)] // SAFETY: ✔️ same trait, same prereqs
unsafe impl<'a, A: Realloc> Realloc for &'a A {
    unsafe fn realloc_uninit(&self, ptr: AllocNN, old_layout: Layout, new_layout: Layout) -> Result<AllocNN, Self::Error> { unsafe { A::realloc_uninit(self, ptr, old_layout, new_layout) } }
}



/// Testing functions to verify implementations of [`fat`] traits.
pub mod test {
    use super::*;

    fn layouts() -> impl Iterator<Item = Layout> {
        [
            (1, 1), (2, 1), (3, 1), (8, 1),
            (2, 2), (6, 2),
            (4, 4), (32, 4),
            (8, 8), (64, 8), (4096, 8),
        ].into_iter().map(|(size, align)| Layout::from_size_align(size, align).unwrap())
    }

    /// Assert that allocations respect the alignment of their requested [`Layout`]s.
    #[track_caller] pub fn alignment<A: Alloc + Free>(allocator: A) {
        for layout in layouts().filter(|l| l.align() <= A::MAX_ALIGN) {
            let Ok(alloc) = allocator.alloc_uninit(layout) else { continue };
            assert_eq!(0, alloc.as_ptr() as usize % layout.align(), "allocation for {layout:?} was underaligned");
            // SAFETY: ✔️ just allocated with (allocator, layout)
            unsafe { allocator.free(alloc, layout) };
        }
    }

    /// Assert that [`Alloc::alloc_zeroed`] returns all-zero blocks.
    #[track_caller] pub fn zeroed_alloc<A: Alloc + Free>(allocator: A) {
        for layout in layouts().filter(|l| l.align() <= A::MAX_ALIGN) {
            let Ok(alloc) = allocator.alloc_zeroed(layout) else { continue };
            // SAFETY: ✔️ just allocated `layout.size()` zeroed (hence initialized) bytes
            let bytes = unsafe { core::slice::from_raw_parts(alloc.as_ptr(), layout.size()) };
            assert!(bytes.iter().all(|&b| b == 0), "alloc_zeroed returned nonzero bytes for {layout:?}");
            // SAFETY: ✔️ just allocated with (allocator, layout)
            unsafe { allocator.free(alloc.cast(), layout) };
        }
    }

    /// Round-trip alloc/realloc/free through edge case sizes, checking data survives growth.
    #[track_caller] pub fn edge_case_sizes<A: Realloc>(allocator: A) {
        for layout in layouts().filter(|l| l.align() <= A::MAX_ALIGN) {
            let Ok(alloc) = allocator.alloc_zeroed(layout) else { continue };
            // SAFETY: ✔️ just allocated `layout.size()` zeroed bytes
            unsafe { alloc.as_ptr().write_volatile(42) };
            let doubled = Layout::from_size_align(layout.size() * 2, layout.align()).unwrap();
            // SAFETY: ✔️ (alloc, layout) is a live allocation of `allocator`
            let Ok(grown) = (unsafe { allocator.realloc_uninit(alloc.cast(), layout, doubled) }) else {
                // SAFETY: ✔️ realloc failed, (alloc, layout) is still live
                unsafe { allocator.free(alloc.cast(), layout) };
                continue
            };
            // SAFETY: ✔️ the old block's first byte was copied into the grown block
            assert_eq!(42, unsafe { grown.as_ptr().cast::<u8>().read_volatile() });
            // SAFETY: ✔️ (grown, doubled) is a live allocation of `allocator`
            unsafe { allocator.free(grown, doubled) };
        }
    }

    /// Assert that [`Meta::ZST_SUPPORTED`] accurately reports if `A` supports zero-sized allocations.
    #[track_caller] pub fn zst_supported_accurate<A: Alloc + Free>(allocator: A) {
        let layout = Layout::new::<()>();
        let alloc = allocator.alloc_uninit(layout);
        assert_eq!(alloc.is_ok(), A::ZST_SUPPORTED, "alloc = {alloc:?}, ZST_SUPPORTED = {}", A::ZST_SUPPORTED);
        // SAFETY: ✔️ just allocated with (allocator, layout)
        alloc.ok().map(|alloc| unsafe { allocator.free(alloc, layout) });
    }
}
