//! Collaborators the triage core talks to: the photo library and the deleter

use crate::domain::{discover_photos, DiscoveryOptions, PhotoCatalog, PhotoRef};
use crate::error::{Result, SwipeCleanError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Source of photos
pub trait PhotoLibrary {
    /// Checks that the library may be read.
    ///
    /// Returns [`SwipeCleanError::AccessDenied`] when it may not.
    fn request_access(&self) -> Result<()>;

    /// Fetches every photo, newest first
    fn fetch_assets(&self) -> Result<Vec<PhotoRef>>;
}

/// Batch deletion of photos.
///
/// The whole slice is one request. Errors are returned as the platform's
/// message so callers can show it unmodified.
pub trait AssetDeleter {
    fn delete_assets(&mut self, assets: &[Arc<PhotoRef>]) -> std::result::Result<(), String>;
}

/// A photo library rooted at a directory
#[derive(Debug, Clone)]
pub struct FsPhotoLibrary {
    root: PathBuf,
    options: DiscoveryOptions,
}

impl FsPhotoLibrary {
    pub fn new(root: impl Into<PathBuf>, options: DiscoveryOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PhotoLibrary for FsPhotoLibrary {
    fn request_access(&self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(SwipeCleanError::AccessDenied(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        fs::read_dir(&self.root).map_err(|e| {
            SwipeCleanError::AccessDenied(format!("{}: {}", self.root.display(), e))
        })?;

        tracing::info!(root = %self.root.display(), "photo library access granted");
        Ok(())
    }

    fn fetch_assets(&self) -> Result<Vec<PhotoRef>> {
        let photos = discover_photos(&self.root, &self.options)?;
        tracing::info!(root = %self.root.display(), count = photos.len(), "fetched photos");
        Ok(photos)
    }
}

/// Moves photos to the system trash.
///
/// A photo whose file is already gone counts as deleted, so retrying a batch
/// that failed halfway only trashes what is left.
#[derive(Debug, Default)]
pub struct TrashDeleter;

impl AssetDeleter for TrashDeleter {
    fn delete_assets(&mut self, assets: &[Arc<PhotoRef>]) -> std::result::Result<(), String> {
        let (present, gone): (Vec<_>, Vec<_>) = assets.iter().partition(|p| p.path.exists());

        for photo in &gone {
            tracing::info!(photo = %photo.path.display(), "already gone, nothing to trash");
        }

        if present.is_empty() {
            return Ok(());
        }

        trash::delete_all(present.iter().map(|p| p.path.as_path())).map_err(|e| e.to_string())
    }
}

/// Deletes nothing; remembers what it would have deleted
#[derive(Debug, Default)]
pub struct DryRunDeleter {
    would_delete: Vec<PathBuf>,
}

impl DryRunDeleter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn would_delete(&self) -> &[PathBuf] {
        &self.would_delete
    }
}

impl AssetDeleter for DryRunDeleter {
    fn delete_assets(&mut self, assets: &[Arc<PhotoRef>]) -> std::result::Result<(), String> {
        for photo in assets {
            tracing::info!(photo = %photo.path.display(), "[dry run] would delete");
            self.would_delete.push(photo.path.clone());
        }
        Ok(())
    }
}

/// Loads a catalog from `library`, checking access first
pub fn load_catalog<L: PhotoLibrary + ?Sized>(library: &L) -> Result<PhotoCatalog> {
    library.request_access()?;
    let assets = library.fetch_assets()?;
    Ok(PhotoCatalog::load(assets))
}
