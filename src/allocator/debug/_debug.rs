//! Allocators for debugging and testing purpouses

mod null;                   pub use null::*;
#[cfg(feature = "alloc")]
mod tracking;               #[cfg(feature = "alloc")] pub use tracking::*;
