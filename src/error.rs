//! [`ExcessiveAlignmentRequestedError`], [`ExcessiveSliceRequestedError`]

use core::fmt::{self, Debug, Display, Formatter};



/// More alignment was requested than the allocator could support.
#[derive(Clone, Copy, Debug)] pub struct ExcessiveAlignmentRequestedError {
    pub requested: usize,
    pub supported: usize,
}

impl Display for ExcessiveAlignmentRequestedError { fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { write!(f, "requested {} byte alignment, but a maximum of {} is supported", self.requested, self.supported) } }
impl From<ExcessiveAlignmentRequestedError> for () { fn from(_: ExcessiveAlignmentRequestedError) -> Self { () } }
#[cfg(feature = "std")] impl std::error::Error for ExcessiveAlignmentRequestedError { fn description(&self) -> &str { "requested more alignment than was supported" } }



/// More elements were requested for a slice than the allocator (or [`core::alloc::Layout`]) could support.
#[derive(Clone, Copy, Debug)] pub struct ExcessiveSliceRequestedError {
    pub requested: usize,
}

impl Display for ExcessiveSliceRequestedError { fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { write!(f, "requested a slice of {} element(s), which exceeds what can be allocated", self.requested) } }
impl From<ExcessiveSliceRequestedError> for () { fn from(_: ExcessiveSliceRequestedError) -> Self { () } }
#[cfg(feature = "std")] impl std::error::Error for ExcessiveSliceRequestedError { fn description(&self) -> &str { "requested a slice of more elements than could be allocated" } }
