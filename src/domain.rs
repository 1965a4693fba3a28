pub mod catalog;
pub mod session;

pub use catalog::PhotoCatalog;
pub use session::{Direction, QueuePolicy, SessionState, TriageSession, TriageStatistics};

use chrono::{DateTime, Datelike, Local, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// File extensions treated as photos (compared case-insensitively)
const PHOTO_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff", "heic", "heif",
];

/// Returns true if the extension belongs to a photo format we triage
pub fn is_photo_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    PHOTO_EXTENSIONS.contains(&ext.as_str())
}

/// Identifier and metadata for a single photo in the library.
///
/// The path is the photo's identity. A `PhotoRef` never changes once it has
/// been fetched; catalogs and sessions share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRef {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    /// Creation time, if the platform reports one
    pub created: Option<DateTime<Utc>>,
}

impl PhotoRef {
    /// Builds a `PhotoRef` from file metadata.
    ///
    /// Uses the birth time where the filesystem records it and falls back to
    /// the modification time.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(PhotoRef {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
            created,
        })
    }

    pub fn id(&self) -> &Path {
        &self.path
    }

    /// Calendar year of the creation time in the local time zone
    pub fn year(&self) -> Option<i32> {
        self.created.map(|c| c.with_timezone(&Local).year())
    }
}

/// Options for photo discovery
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Include hidden files and directories
    pub show_hidden: bool,
    /// Minimum file size in bytes
    pub min_size: Option<u64>,
    /// Maximum file size in bytes
    pub max_size: Option<u64>,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Discovers the photos under `dir_path`, newest first.
///
/// # Behavior
/// - Only files with a photo extension are returned
/// - Hidden entries are skipped unless `show_hidden` is set
/// - Subdirectories are only visited when `recursive` is set
/// - Entries that cannot be read are skipped
/// - Photos without a creation time sort last
///
/// # Errors
/// Returns an error if `dir_path` itself cannot be listed.
pub fn discover_photos(dir_path: &Path, options: &DiscoveryOptions) -> io::Result<Vec<PhotoRef>> {
    // Surface an unreadable root instead of silently returning nothing
    fs::read_dir(dir_path)?;

    let max_depth = if options.recursive { usize::MAX } else { 1 };
    let mut photos = Vec::new();

    let walker = WalkDir::new(dir_path)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || options.show_hidden || !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_photo = path
            .extension()
            .and_then(|e| e.to_str())
            .map(is_photo_extension)
            .unwrap_or(false);
        if !is_photo {
            continue;
        }

        let photo = match PhotoRef::from_path(path) {
            Ok(p) => p,
            Err(_) => continue,
        };

        if let Some(min_size) = options.min_size {
            if photo.size < min_size {
                continue;
            }
        }

        if let Some(max_size) = options.max_size {
            if photo.size > max_size {
                continue;
            }
        }

        photos.push(photo);
    }

    // Option orders None first, so the reversed comparison puts undated photos last
    photos.sort_by(|a, b| {
        b.created
            .cmp(&a.created)
            .then_with(|| a.path.cmp(&b.path))
    });

    tracing::debug!(dir = %dir_path.display(), count = photos.len(), "discovered photos");

    Ok(photos)
}
