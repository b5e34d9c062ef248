//! Core type definitions.
//!
//! These types make invalid states unrepresentable: an `AddressRange`
//! always holds a normalized, bounded network by the time a sweep sees it.

mod range;

pub use range::{AddressRange, HostIter};
