//! Baarez common library - tools shared by the agent daemon.
//!
//! - `facts`: SQLite-backed key/value memory
//! - `calculator`: two-operand integer arithmetic

pub mod calculator;
pub mod error;
pub mod facts;

pub use calculator::{CalcOutcome, Calculation, Notation, Number, Operator, INVALID_CALCULATION};
pub use error::{BaarezError, Result};
pub use facts::{Fact, FactLookup, FactStore, SaveReceipt};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
