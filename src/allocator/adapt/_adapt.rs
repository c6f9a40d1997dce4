//! Adapters wrapping other allocators to add or alter behavior

mod zeroizing;              pub use zeroizing::*;
