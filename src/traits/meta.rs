//! Metadata traits common to all (de)allocators

use crate::error::*;

use core::fmt::Debug;



/// Allocator metadata (max allocation size/alignment, error type, zeroization posture, etc.)
pub trait Meta {
    /// The error type returned from failed (re)allocation.
    type Error : Debug + From<ExcessiveAlignmentRequestedError> + From<ExcessiveSliceRequestedError>;

    /// Indicates the maximum alignment this allocator should be expected to succeed in allocating.
    /// Requesting an allocation with more alignment than this is almost certainly a bug.
    ///
    /// It is "safe" to attempt an allocation with larger alignment - such calls simply return <code>[Err]\(...\)</code>.
    const MAX_ALIGN : usize;

    /// Indicates the maximum size this allocator should be expected to succeed in allocating.
    /// Requesting an allocation larger than this is almost certainly a bug.
    const MAX_SIZE : usize;

    /// Indicates if this allocator supports zero-sized allocations.
    /// Nice and Rusty, but not supported by raw C heaps.
    const ZST_SUPPORTED : bool;

    /// Indicates that containers retiring individual objects out of this allocator's blocks
    /// should wipe the objects' storage as their destructors run.
    ///
    /// This is the destroy leg of the [`ZeroPolicy`](crate::policy::ZeroPolicy) triple: destruction
    /// happens inside containers rather than inside allocators, so containers learn about it here.
    /// Plain allocators leave it `false`; [`Zeroizing`](crate::allocator::adapt::Zeroizing) forwards
    /// its policy's flag.
    const DESTROY_ZEROES : bool = false;
}

impl<'a, A: Meta> Meta for &'a A {
    type Error                      = A::Error;
    const MAX_ALIGN      : usize    = A::MAX_ALIGN;
    const MAX_SIZE       : usize    = A::MAX_SIZE;
    const ZST_SUPPORTED  : bool     = A::ZST_SUPPORTED;
    const DESTROY_ZEROES : bool     = A::DESTROY_ZEROES;
}



/// Allocator holds no meaningful state: any two instances are interchangeable, and any instance can
/// free any other instance's allocations.
///
/// This is the substitutability containers rely on when they swap, clone, or default-construct
/// allocators.
///
/// ### Safety
/// By implementing this trait, you promise `Self::default()` can free/realloc allocations made by
/// any other instance of `Self`.
pub unsafe trait Stateless : Meta + Copy + Default {}
