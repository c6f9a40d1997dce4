#![doc = include_str!("../Readme.md")]
#![no_std]

#![forbid(unreachable_patterns)]
#![forbid(unsafe_op_in_unsafe_fn)]
#![deny(non_snake_case)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![allow(clippy::let_unit_value)] // very common for const assertions
#![cfg_attr(not(feature = "default"), allow(dead_code, unused_imports))] // suppress noisy "dead code" warnings in non-default build configs

#[cfg(any(feature = "alloc", doc, test))] extern crate alloc;
#[cfg(any(feature = "std",   doc, test))] extern crate std;

type AllocNN    = core::ptr::NonNull<core::mem::MaybeUninit<u8>>;
type AllocNN0   = core::ptr::NonNull<u8>;


#[macro_use] mod _macros;

#[path = "allocator/_allocator.rs"      ] pub mod allocator;
#[path = "boxed/_boxed.rs"              ] pub mod boxed;
#[path = "traits/_traits.rs"            ] pub mod traits; #[doc(hidden)] pub use traits::*;
#[path = "util/_util.rs"                ] mod util;
#[path = "vec/_vec.rs"                  ] pub mod vec;

#[doc(hidden)] pub mod bug;
pub mod error;
pub mod policy;
pub mod stride;
pub mod wipe;
