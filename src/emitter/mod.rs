//! Output sinks for assembled entries.
//!
//! The file sink writes the plain entries as one JSON array. The storage
//! sink derives severity and affected system and upserts rows in batches.
//! The derived fields exist only in storage, matching the table schema.

pub mod json;
pub mod storage;

pub use json::write_json;
pub use storage::{StorageSink, batch_count};
