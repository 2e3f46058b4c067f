//! Transform Module - Staged document edits
//!
//! - Step: one atomic edit with its position map
//! - Selection: anchor/head pair mapped through steps
//! - Transaction: a batch of steps dispatched as a unit

pub mod selection;
pub mod step;
pub mod transaction;

pub use selection::Selection;
pub use step::{Step, StepMap};
pub use transaction::Transaction;
