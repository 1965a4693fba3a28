//! Opens a photo in the system's default viewer

use crate::error::Result;
use std::path::Path;

/// Opens `path` with the default application and waits for the launcher to return
pub fn open_photo(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Photo not found: {}", path.display()),
        )
        .into());
    }

    tracing::debug!(photo = %path.display(), "opening in system viewer");
    open::that(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SwipeCleanError;

    #[test]
    fn test_open_missing_photo() {
        let result = open_photo(Path::new("/nonexistent/photo.jpg"));
        assert!(matches!(result, Err(SwipeCleanError::Io(_))));
    }
}
