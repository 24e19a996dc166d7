//! Repository layer — entity-scoped database operations.
//!
//! Free functions over a borrowed `Connection`; callers that need
//! atomicity across several of these wrap them in a transaction.

mod course;
mod question;
mod review;

pub use course::*;
pub use question::*;
pub use review::*;
