//! Verified zero overwrite: volatile stride-wide fill, fence, volatile scan, repeat until clean
//!
//! A plain `memset`-style fill of memory nobody reads afterwards is a dead
//! store, and a sufficiently clever optimizer may remove it - the classic
//! defeat of naive secret wiping.  Two independent measures close that hole:
//!
//! 1.  The fill and the scan both use volatile accesses, which the compiler
//!     must not elide or reorder against each other.
//! 2.  The scan's result decides whether to fill again.  A write whose effect
//!     feeds a branch is observable, so it cannot be proven dead even by a
//!     transformation that sees through the volatile qualifier.
//!
//! The loop terminates because a completed zero fill always scans clean; a
//! second iteration would require another writer racing the span, which every
//! entry point's safety preconditions exclude.

use crate::stride;

use bytemuck::Zeroable;

use core::alloc::Layout;
use core::mem::{MaybeUninit, size_of};
use core::sync::atomic::{compiler_fence, Ordering};



/// Zero a span of bytes, verified. Byte stride.
pub fn bytes(span: &mut [MaybeUninit<u8>]) {
    let len = span.len();
    // SAFETY: ✔️ `span` is an exclusive borrow of `len` contiguous writable bytes
    let _passes = unsafe { zero_counted(span.as_mut_ptr().cast(), len, 1) };
}

/// Zero the storage of `count` consecutive `T`s, verified.  Stride <code>[stride]::[of](stride::of)::&lt;T&gt;()</code>.
///
/// ### Safety
/// *   `data[..count]` must be valid for reads and writes
/// *   no other thread may access `data[..count]` for the duration of the call
/// *   any previous contents are destroyed; callers must have dropped (or never constructed) the `T`s
pub unsafe fn slice<T>(data: *mut T, count: usize) {
    // SAFETY: ✔️ violation of this fn's precondition that `data[..count]` be a real span - no such span can exist
    let Some(len) = size_of::<T>().checked_mul(count) else { unsafe { ub!("bug: undefined behavior: {count} elements of {} byte(s) overflows usize", size_of::<T>()) } };
    // SAFETY: ✔️ `len` bytes valid for reads and writes per this fn's safety preconditions; `stride::of::<T>()` divides `size_of::<T>()` and `T`'s alignment by construction
    let _passes = unsafe { zero_counted(data.cast(), len, stride::of::<T>()) };
}

/// Zero a type-erased span described by `layout`, verified.  Stride <code>[stride]::[for_layout](stride::for_layout)</code>.
///
/// ### Safety
/// *   `data[..layout.size()]` must be valid for reads and writes, aligned to `layout.align()`
/// *   no other thread may access the span for the duration of the call
pub unsafe fn erased(data: *mut MaybeUninit<u8>, layout: Layout) {
    // SAFETY: ✔️ span valid per this fn's safety preconditions; stride divides `layout.align()` and `layout.size()` by construction
    let _passes = unsafe { zero_counted(data.cast(), layout.size(), stride::for_layout(layout)) };
}



/// Fill+scan until the scan reports all-zero.  Returns the number of passes taken (tests assert re-wiping an already-zero span takes exactly one.)
///
/// ### Safety
/// *   `data[..len]` must be valid for reads and writes
/// *   `data` must be aligned for the `stride`-byte unsigned integral
pub(crate) unsafe fn zero_counted(data: *mut u8, len: usize, stride: usize) -> usize {
    debug_assert!(stride != 0 && len % stride == 0, "span of {len} byte(s) is not a multiple of the {stride} byte fill stride");
    let mut passes = 0;
    loop {
        // SAFETY: ✔️ per this fn's safety preconditions; the stride cases below never read/write past `data[..len]` as `len` is a stride multiple
        #![allow(clippy::undocumented_unsafe_blocks)]
        passes += 1;
        match stride {
            8 => unsafe { fill::<u64>(data, len) },
            4 => unsafe { fill::<u32>(data, len) },
            2 => unsafe { fill::<u16>(data, len) },
            _ => unsafe { fill::<u8 >(data, len) },
        }
        compiler_fence(Ordering::SeqCst);
        // SAFETY: ✔️ `data[..len]` valid for reads per this fn's safety preconditions
        if unsafe { scan(data, len) } { return passes }
    }
}

/// ### Safety
/// *   `data[..len]` must be valid for writes, aligned for `S`, `len` a multiple of `size_of::<S>()`
unsafe fn fill<S: Zeroable + Copy>(data: *mut u8, len: usize) {
    let data = data.cast::<S>();
    for i in 0 .. len / size_of::<S>() {
        // SAFETY: ✔️ `i < len / size_of::<S>()` stays within the span
        unsafe { data.add(i).write_volatile(S::zeroed()) };
    }
}

/// ### Safety
/// *   `data[..len]` must be valid for reads
unsafe fn scan(data: *const u8, len: usize) -> bool {
    // SAFETY: ✔️ `i < len` stays within the span
    (0 .. len).all(|i| unsafe { data.add(i).read_volatile() } == 0)
}



#[cfg(test)] mod tests {
    use super::*;

    #[test] fn wipes_every_byte() {
        let mut buffer = [0xA5_u8; 96];
        // SAFETY: ✔️ exclusive local buffer
        unsafe { slice(buffer.as_mut_ptr(), buffer.len()) };
        assert!(buffer.iter().all(|&b| b == 0));
    }

    #[test] fn wipes_wide_elements() {
        let mut buffer = [u64::MAX; 13];
        // SAFETY: ✔️ exclusive local buffer
        unsafe { slice(buffer.as_mut_ptr(), buffer.len()) };
        assert!(buffer.iter().all(|&v| v == 0));
    }

    #[test] fn wipes_erased_spans() {
        #[repr(align(8))] struct Aligned([u8; 64]);
        let mut buffer = Aligned([0xFF_u8; 64]);
        let layout = Layout::from_size_align(64, 8).unwrap();
        // SAFETY: ✔️ exclusive local buffer, 64 bytes, aligned to 8
        unsafe { erased(buffer.0.as_mut_ptr().cast(), layout) };
        assert!(buffer.0.iter().all(|&b| b == 0));
    }

    #[test] fn bytes_of_uninit() {
        let mut buffer = [MaybeUninit::new(0x5A_u8); 32];
        bytes(&mut buffer);
        // SAFETY: ✔️ just zeroed, so initialized
        assert!(buffer.iter().all(|b| unsafe { b.assume_init() } == 0));
    }

    #[test] fn empty_span_is_a_noop() {
        bytes(&mut []);
        // SAFETY: ✔️ zero-length span: no bytes are accessed
        unsafe { slice(core::ptr::NonNull::<u32>::dangling().as_ptr(), 0) };
    }

    #[test] fn already_zero_takes_one_pass() {
        let mut buffer = [0xC3_u64; 8];
        // SAFETY: ✔️ exclusive local buffer
        let first = unsafe { zero_counted(buffer.as_mut_ptr().cast(), 64, 8) };
        // SAFETY: ✔️ exclusive local buffer
        let second = unsafe { zero_counted(buffer.as_mut_ptr().cast(), 64, 8) };
        assert!(first >= 1);
        assert_eq!(1, second, "re-wiping an already-zero span must converge on the first fill+scan pass");
        assert!(buffer.iter().all(|&v| v == 0));
    }

    #[test] #[should_panic] #[cfg(debug_assertions)] fn stride_must_divide_length() {
        let mut buffer = [0u8; 7];
        // SAFETY: ✔️ never reached: the length precondition fails first
        unsafe { zero_counted(buffer.as_mut_ptr(), 7, 4) };
    }
}
