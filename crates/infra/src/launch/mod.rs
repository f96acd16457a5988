//! Launch-manager write path: tag transitions and launch date metafields.

pub mod coordinator;
pub mod metadata_writer;

pub use coordinator::{LaunchCoordinator, LaunchError, LaunchOutcome, WritePhase};
pub use metadata_writer::{DateWriteError, MetadataWriter};
