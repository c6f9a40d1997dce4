//! [`alloc::boxed::Box`] alternatives that wipe their storage on destruction

mod zbox;                   pub use zbox::*;
mod zbox_alloc;
mod zbox_realloc;
mod zbox_traits;
