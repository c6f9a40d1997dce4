//! Type-level zeroization policy: which lifecycle events wipe memory
//!
//! Three independent switches, fixed when an allocator type is declared and
//! never changed at runtime:
//!
//! | Switch            | Wipes...                                              | Default   |
//! | ------------------| ------------------------------------------------------| ----------|
//! | `ZERO_ON_ALLOC`   | fresh blocks before the caller sees them              | off
//! | `ZERO_ON_FREE`    | whole blocks before the underlying allocator reclaims | off
//! | `ZERO_ON_DESTROY` | each object's storage as its destructor retires it    | **on**
//!
//! The default posture wipes per-object on destroy only: by the time a block
//! is deallocated every object it held has already been destroyed and wiped,
//! so wiping the block again is redundant.  Enable `ZERO_ON_FREE` as well when
//! the element type's destructor semantics aren't trusted to cover the bytes.

/// Zeroization policy carried by [`Zeroizing`](crate::allocator::adapt::Zeroizing) (and consulted, for the destroy leg, by the containers).
pub trait ZeroPolicy {
    /// Wipe fresh blocks on allocation, so callers never observe allocator-reused stale bytes.
    const ZERO_ON_ALLOC : bool;
    /// Wipe whole blocks on deallocation, before the underlying allocator can reuse them.
    const ZERO_ON_FREE : bool;
    /// Wipe each object's storage when it is destroyed.
    const ZERO_ON_DESTROY : bool;
}

/// The policy record: three orthogonal flags as const generics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] pub struct Flags<const ALLOC: bool, const FREE: bool, const DESTROY: bool>;

impl<const ALLOC: bool, const FREE: bool, const DESTROY: bool> ZeroPolicy for Flags<ALLOC, FREE, DESTROY> {
    const ZERO_ON_ALLOC   : bool = ALLOC;
    const ZERO_ON_FREE    : bool = FREE;
    const ZERO_ON_DESTROY : bool = DESTROY;
}

/// Wipe on destroy only (the default posture.)
pub type ZeroOnDestroy     = Flags<false, false, true >;
/// Wipe fresh allocations *and* on destroy.
pub type ZeroFresh         = Flags<true,  false, true >;
/// Wipe whole blocks on free only.
pub type ZeroOnFree        = Flags<false, true,  false>;
/// Wipe at every opportunity.
pub type ZeroEverything    = Flags<true,  true,  true >;
/// Wipe nothing (a transparent adapter, useful as a control in tests.)
pub type ZeroNothing       = Flags<false, false, false>;
