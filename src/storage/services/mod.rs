//! Helpers that keep blob writes consistent with entity writes.

mod staging;

pub use staging::{StagedBlobs, release_blobs};
