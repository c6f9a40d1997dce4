//! [`libc`] based allocators

mod malloc;                 pub use malloc::*;
