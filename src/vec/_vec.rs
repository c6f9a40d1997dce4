//! [`alloc::vec::Vec`] alternatives that wipe retired element slots

mod zvec;                   pub use zvec::*;
mod zvec_traits;
