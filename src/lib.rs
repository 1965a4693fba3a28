//! SwipeClean - triage a photo library one photo at a time
//!
//! Photos are browsed newest first, optionally narrowed to a single year.
//! Each decision either keeps a photo or queues it for deletion; queued
//! photos are only removed when the queue is committed.

pub mod app;
pub mod async_thumbnail;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod file_opener;
pub mod library;
pub mod logging;
pub mod thumbnail;
pub mod tui;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use domain::{
    discover_photos, DiscoveryOptions, Direction, PhotoCatalog, PhotoRef, QueuePolicy,
    SessionState, TriageSession, TriageStatistics,
};
pub use error::{Result, SwipeCleanError};
pub use file_opener::open_photo;
pub use library::{load_catalog, AssetDeleter, DryRunDeleter, FsPhotoLibrary, PhotoLibrary, TrashDeleter};
