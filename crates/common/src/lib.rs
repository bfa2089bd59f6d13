//! Shared types used across the order integration crates.

mod types;

pub use types::OrderId;
