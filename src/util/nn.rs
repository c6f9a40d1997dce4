//! [`NonNull`]-related utilities

use core::alloc::Layout;
use core::ptr::NonNull;



/// combine `(data: NonNull<T>, len: usize)` into a `NonNull<[T]>`
pub fn slice_from_raw_parts<T>(data: NonNull<T>, len: usize) -> NonNull<[T]> {
    // SAFETY: ✔️ a slice pointer built from a `NonNull` data pointer is itself non-null
    unsafe { NonNull::new_unchecked(core::ptr::slice_from_raw_parts_mut(data.as_ptr(), len)) }
}

/// create a dangling-but-well-aligned `NonNull<T>` for zero-sized allocations of `layout`
pub fn dangling<T>(layout: Layout) -> NonNull<T> {
    // SAFETY: ✔️ alignments are nonzero
    unsafe { NonNull::new_unchecked(layout.align() as *mut T) }
}
