//! Core types for the repairdesk request tracker.
//!
//! Owns the two entity collections (repair requests and responsible persons)
//! through an explicitly constructed [`Store`], and the pure filter/aggregate
//! engine every view reads through. No HTTP, no I/O.

pub mod clock;
pub mod error;
pub mod filter;
pub mod person;
pub mod request;
pub mod store;

pub use error::{Error, Result, ValidationError};
pub use store::Store;

#[cfg(test)]
mod tests;
