//! Allocator traits: [`meta`] (metadata) and [`fat`] ([`Layout`](core::alloc::Layout)-parameterized allocation)

pub mod fat;
pub mod meta;
