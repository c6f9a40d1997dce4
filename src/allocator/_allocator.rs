//! Allocator implementations

#[path = "adapt/_adapt.rs"  ] pub mod adapt;
#[cfg(feature = "alloc")]
#[path = "alloc/_alloc.rs"  ] pub mod alloc;
#[cfg(feature = "malloc")]
#[path = "c/_c.rs"          ] pub mod c;
#[path = "debug/_debug.rs"  ] pub mod debug;
