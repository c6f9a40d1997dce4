use crate::*;
use crate::meta::*;

use alloc::collections::{BTreeMap, BTreeSet};

use core::alloc::Layout;
use core::cell::RefCell;



/// Wrap another allocator and record every block it hands out.
///
/// At free time the block's bytes are inspected *before* they reach the underlying allocator, and
/// the free is tallied as clean (all zero) or dirty (anything else).  Double frees, frees of
/// pointers this allocator never allocated, and frees whose [`Layout`] doesn't match the
/// allocating one all panic.
///
/// Allocator traits are implemented on <code>&amp;[Tracking]&lt;A&gt;</code>, not [`Tracking`]
/// itself, as the registry requires interior mutability.
pub struct Tracking<A> {
    underlying: A,
    state:      RefCell<State>,
}

#[derive(Default)] struct State {
    live:           BTreeMap<usize, Layout>,
    retired:        BTreeSet<usize>,
    clean_frees:    usize,
    dirty_frees:    usize,
}

impl<A> Tracking<A> {
    pub fn new(underlying: A) -> Self { Self { underlying, state: RefCell::new(State::default()) } }

    /// Blocks allocated but not yet freed.
    pub fn live(&self) -> usize { self.state.borrow().live.len() }

    /// Blocks that were all-zero when freed.
    pub fn clean_frees(&self) -> usize { self.state.borrow().clean_frees }

    /// Blocks that still held nonzero bytes when freed.
    pub fn dirty_frees(&self) -> usize { self.state.borrow().dirty_frees }

    /// Nothing outstanding, and nothing was ever freed dirty.
    pub fn is_fully_clean(&self) -> bool {
        let state = self.state.borrow();
        state.live.is_empty() && state.dirty_frees == 0
    }
}

impl<A: core::fmt::Debug> core::fmt::Debug for Tracking<A> {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::fmt::Result {
        let state = self.state.borrow();
        fmt.debug_struct("Tracking")
            .field("underlying",    &self.underlying)
            .field("live",          &state.live.len())
            .field("clean_frees",   &state.clean_frees)
            .field("dirty_frees",   &state.dirty_frees)
            .finish()
    }
}



// meta::*

impl<A: Meta> Meta for Tracking<A> {
    type Error                      = A::Error;
    const MAX_ALIGN      : usize    = A::MAX_ALIGN;
    const MAX_SIZE       : usize    = A::MAX_SIZE;
    const ZST_SUPPORTED  : bool     = A::ZST_SUPPORTED;
    const DESTROY_ZEROES : bool     = A::DESTROY_ZEROES;
}



// fat::*

// SAFETY: ✔️ allocations are made by (and compatible with) the underlying allocator; the registry is bookkeeping only
unsafe impl<'a, A: fat::Alloc> fat::Alloc for &'a Tracking<A> {
    fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, Self::Error> {
        let alloc = self.underlying.alloc_uninit(layout)?;
        if layout.size() != 0 {
            let mut state = self.state.borrow_mut();
            let addr = alloc.as_ptr() as usize;
            state.retired.remove(&addr); // the underlying allocator may reuse addresses
            state.live.insert(addr, layout);
        }
        Ok(alloc)
    }

    fn alloc_zeroed(&self, layout: Layout) -> Result<AllocNN0, Self::Error> {
        let alloc = self.underlying.alloc_zeroed(layout)?;
        if layout.size() != 0 {
            let mut state = self.state.borrow_mut();
            let addr = alloc.as_ptr() as usize;
            state.retired.remove(&addr);
            state.live.insert(addr, layout);
        }
        Ok(alloc)
    }
}

// SAFETY: ✔️ frees delegate to the underlying allocator with the same (ptr, layout); the pre-free inspection reads only bytes the caller promises are part of a live allocation
unsafe impl<'a, A: fat::Free> fat::Free for &'a Tracking<A> {
    #[track_caller] unsafe fn free(&self, ptr: AllocNN, layout: Layout) {
        if layout.size() != 0 {
            let addr = ptr.as_ptr() as usize;
            let mut state = self.state.borrow_mut();
            match state.live.remove(&addr) {
                None if state.retired.contains(&addr)   => bug::ub::freed_ptr_for_allocator(ptr),
                None                                    => bug::ub::invalid_ptr_for_allocator(ptr),
                Some(allocated) if allocated != layout  => bug::ub::invalid_free_layout_for_allocator(ptr, allocated.size(), layout.size()),
                Some(_)                                 => {},
            }
            state.retired.insert(addr);
            // SAFETY: ⚠️ (ptr, layout) is a live allocation per fat::Free::free's documented safety preconditions - but the bytes may never have been written, in which case this reads uninitialized memory and the tally is garbage (a debug allocator accepts that bargain)
            let all_zero = (0..layout.size()).all(|i| unsafe { ptr.as_ptr().cast::<u8>().add(i).read_volatile() } == 0);
            if all_zero { state.clean_frees += 1 } else { state.dirty_frees += 1 }
        }
        // SAFETY: ✔️ same preconditions as this fn
        unsafe { self.underlying.free(ptr, layout) }
    }
}

// SAFETY: ✔️ composed entirely of this allocator's own alloc/free, so every block passes through the registry
unsafe impl<'a, A: fat::Realloc> fat::Realloc for &'a Tracking<A> {}



#[cfg(test)] mod tests {
    use super::*;
    use crate::allocator::alloc::Global;

    #[test] fn fat_alignment()      { fat::test::alignment(&Tracking::new(Global)) }
    #[test] fn fat_zeroed()         { fat::test::zeroed_alloc(&Tracking::new(Global)) }
    #[test] fn fat_edge_cases()     { fat::test::edge_case_sizes(&Tracking::new(Global)) }

    #[test] fn tallies_clean_and_dirty_frees() {
        let registry = Tracking::new(Global);
        let layout = Layout::from_size_align(32, 8).unwrap();

        let clean = fat::Alloc::alloc_zeroed(&&registry, layout).unwrap();
        assert_eq!(1, registry.live());
        // SAFETY: ✔️ just allocated with (&registry, layout)
        unsafe { fat::Free::free(&&registry, clean.cast(), layout) };

        let dirty = fat::Alloc::alloc_zeroed(&&registry, layout).unwrap();
        // SAFETY: ✔️ scribbling over just-allocated bytes
        unsafe { dirty.as_ptr().write_volatile(7) };
        // SAFETY: ✔️ just allocated with (&registry, layout)
        unsafe { fat::Free::free(&&registry, dirty.cast(), layout) };

        assert_eq!(0, registry.live());
        assert_eq!(1, registry.clean_frees());
        assert_eq!(1, registry.dirty_frees());
        assert!(!registry.is_fully_clean());
    }

    #[test] fn leaks_are_not_fully_clean() {
        let registry = Tracking::new(Global);
        let layout = Layout::from_size_align(16, 8).unwrap();
        let alloc = fat::Alloc::alloc_zeroed(&&registry, layout).unwrap();
        assert!(!registry.is_fully_clean());
        // SAFETY: ✔️ just allocated with (&registry, layout)
        unsafe { fat::Free::free(&&registry, alloc.cast(), layout) };
        assert!(registry.is_fully_clean());
    }

    #[test] #[should_panic = "must exactly match"] fn layout_mismatch_panics() {
        let registry = Tracking::new(Global);
        let allocated = Layout::from_size_align(32, 8).unwrap();
        let freed     = Layout::from_size_align(16, 8).unwrap();
        let alloc = fat::Alloc::alloc_zeroed(&&registry, allocated).unwrap();
        // SAFETY: ❌ deliberately freeing with the wrong layout - the registry panics before the underlying allocator sees it
        unsafe { fat::Free::free(&&registry, alloc.cast(), freed) };
    }

    #[test] #[should_panic = "doesn't belong"] fn foreign_pointer_panics() {
        let registry = Tracking::new(Global);
        let layout = Layout::from_size_align(16, 8).unwrap();
        let foreign = fat::Alloc::alloc_zeroed(&Global, layout).unwrap();
        // SAFETY: ❌ deliberately freeing a pointer the registry never saw - it panics before the underlying allocator does anything
        unsafe { fat::Free::free(&&registry, foreign.cast(), layout) };
    }
}
