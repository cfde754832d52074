//! Input audit records
//!
//! Handles:
//! - The flat record of each input set
//! - In-memory and JSON-lines sinks for those records

pub mod record;
pub mod recorder;

pub use record::*;
pub use recorder::*;
