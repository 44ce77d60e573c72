//! Core domain types for archaeological artifact identification.
//!
//! Everything in this crate is either an immutable reference table or a
//! pure function; there is no I/O and no shared mutable state.

mod artifact_class;
mod detail;
mod geo;
mod knowledge;
mod prediction;
mod radiocarbon;
mod site;
mod timeline;

pub use artifact_class::*;
pub use detail::*;
pub use geo::*;
pub use knowledge::*;
pub use prediction::*;
pub use radiocarbon::*;
pub use site::*;
pub use timeline::*;
