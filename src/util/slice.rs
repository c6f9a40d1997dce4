use core::alloc::Layout;
use core::mem::MaybeUninit;
use core::ptr::NonNull;



/// Forms a byte slice over an allocation described by `layout`.
///
/// ## Safety
/// *   The bytes `data[..layout.size()]` must be valid for reads, within a single allocation.
/// *   The memory referenced by the returned slice must not be mutated for the duration of
///     lifetime `'a`, except inside an `UnsafeCell`.
pub unsafe fn from_raw_bytes_layout<'a>(data: NonNull<MaybeUninit<u8>>, layout: Layout) -> &'a [MaybeUninit<u8>] {
    // SAFETY: ✔️ non-null and aligned by type, "initialized" by `MaybeUninit`, ≤ isize::MAX bytes
    // by `Layout`'s invariants; validity, containment, and aliasing are the caller's documented
    // preconditions
    unsafe { core::slice::from_raw_parts(data.as_ptr().cast_const(), layout.size()) }
}

/// Forms a mutable byte slice over an allocation described by `layout`.
///
/// ## Safety
/// *   The bytes `data[..layout.size()]` must be valid for reads and writes, within a single allocation.
/// *   The memory referenced by the returned slice must not be accessed through any other pointer
///     (not derived from the return value) for the duration of lifetime `'a`.
pub unsafe fn from_raw_bytes_layout_mut<'a>(data: NonNull<MaybeUninit<u8>>, layout: Layout) -> &'a mut [MaybeUninit<u8>] {
    // SAFETY: ✔️ non-null and aligned by type, "initialized" by `MaybeUninit`, ≤ isize::MAX bytes
    // by `Layout`'s invariants; validity, containment, and exclusivity are the caller's documented
    // preconditions
    unsafe { core::slice::from_raw_parts_mut(data.as_ptr(), layout.size()) }
}
