//! [`alloc::alloc`](mod@alloc::alloc) based allocators

mod global;                 pub use global::*;
