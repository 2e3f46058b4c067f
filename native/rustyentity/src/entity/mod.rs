//! Entity Module - Incremental entity marker index
//!
//! - Scanner: walks the document collecting marker occurrences
//! - Fingerprint: canonical content hashes for cheap equality
//! - Reducer: unique entities keyed by id
//! - State: the index state machine with reference reuse
//! - Commands: create / update markers transactionally
//! - Extension: options, node spec and plugin hooks

pub mod commands;
pub mod extension;
pub mod fingerprint;
pub mod reducer;
pub mod scanner;
pub mod state;
pub mod types;

pub use commands::Dispatch;
pub use extension::{EntityExtension, EntityOptions, DATA_ATTRIBUTE_ID, DATA_ATTRIBUTE_NAME};
pub use fingerprint::{fingerprint, Canonical, Fingerprint};
pub use reducer::unique_entities;
pub use scanner::scan_occurrences;
pub use state::{transition, EntityIndex, EntityIndexState};
pub use types::{Entity, Occurrence};
