//! Misc. internal utilities

pub mod drop;
pub mod nn;
pub mod slice;
