//! larder-core
//!
//! Pure domain types, amount parsing, aggregation and upload reference
//! conventions. No I/O: this is the shared vocabulary of the Larder system.

pub mod aggregate;
pub mod amount;
pub mod error;
pub mod models;
pub mod upload_keys;
