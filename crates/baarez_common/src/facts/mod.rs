//! Fact Store
//!
//! Remembered key/value statements ("my favorite color is blue").
//! One row per distinct key; saving an existing key overwrites its value.

pub mod schema;
pub mod store;

pub use schema::*;
pub use store::*;
