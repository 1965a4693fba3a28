//! Thumbnail rendering for photos as true-color half-block terminal lines

use crate::domain::PhotoRef;
use image::{DynamicImage, GenericImageView, Pixel};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use std::io;
use std::path::Path;

/// Default thumbnail box in terminal cells
pub const DEFAULT_TARGET: TargetSize = TargetSize {
    columns: 160,
    rows: 50,
};

/// Space available for a thumbnail, in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetSize {
    pub columns: u16,
    pub rows: u16,
}

impl TargetSize {
    /// Pixel box the image is fitted into; each cell shows two pixels vertically
    pub fn pixel_bounds(&self) -> (u32, u32) {
        (self.columns as u32, self.rows as u32 * 2)
    }
}

/// A decoded photo ready to draw
#[derive(Debug, Clone)]
pub struct Thumbnail {
    /// Dimensions of the source image
    pub original_width: u32,
    pub original_height: u32,
    pub lines: Vec<Line<'static>>,
}

/// Loads an image from a file path
pub fn load_image(path: &Path) -> io::Result<DynamicImage> {
    image::open(path).map_err(|e| io::Error::other(format!("Image loading error: {}", e)))
}

/// Calculates new dimensions to fit image within max width and height while preserving aspect ratio
pub fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if original_width == 0 || original_height == 0 {
        return (0, 0);
    }

    let width_ratio = max_width as f64 / original_width as f64;
    let height_ratio = max_height as f64 / original_height as f64;

    let ratio = width_ratio.min(height_ratio);

    if ratio >= 1.0 {
        // Never upscale
        (original_width, original_height)
    } else {
        let new_width = ((original_width as f64 * ratio) as u32).max(1);
        let new_height = ((original_height as f64 * ratio) as u32).max(1);
        (new_width, new_height)
    }
}

/// Converts an image to styled lines using half-block characters.
///
/// Each cell is an upper half block (▀): the foreground carries the upper
/// pixel and the background the lower one.
pub fn image_to_halfblock_lines(img: &DynamicImage, width: u32, height: u32) -> Vec<Line<'static>> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    // Round down to whole cells so the photo is never stretched; one cell minimum
    let height = (height & !1).max(2);

    // Triangle keeps large photos fast enough to resize on every cursor move
    let img = img.resize_exact(width, height, image::imageops::FilterType::Triangle);
    let img = img.to_rgb8();

    let term_height = height / 2;
    let mut lines = Vec::with_capacity(term_height as usize);

    for y in 0..term_height {
        let upper_y = y * 2;
        let lower_y = upper_y + 1;

        let mut spans = Vec::with_capacity(width as usize);

        for x in 0..width {
            let upper = img.get_pixel(x, upper_y).to_rgb();
            let lower = img.get_pixel(x, lower_y).to_rgb();

            let style = Style::default()
                .fg(Color::Rgb(upper[0], upper[1], upper[2]))
                .bg(Color::Rgb(lower[0], lower[1], lower[2]));

            spans.push(Span::styled("▀", style));
        }

        lines.push(Line::from(spans));
    }

    lines
}

/// Renders a thumbnail of `photo` that fits `target`.
///
/// Returns `Ok(None)` when the file exists but cannot be decoded: there is
/// simply nothing to show. A file that cannot be read at all is an error.
pub fn request_thumbnail(photo: &PhotoRef, target: TargetSize) -> io::Result<Option<Thumbnail>> {
    if !photo.path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Photo not found: {}", photo.path.display()),
        ));
    }

    let img = match load_image(&photo.path) {
        Ok(img) => img,
        Err(e) => {
            tracing::debug!(photo = %photo.path.display(), error = %e, "photo could not be decoded");
            return Ok(None);
        }
    };

    let (original_width, original_height) = img.dimensions();
    let (max_width, max_height) = target.pixel_bounds();
    let (width, height) =
        calculate_resize_dimensions(original_width, original_height, max_width, max_height);

    Ok(Some(Thumbnail {
        original_width,
        original_height,
        lines: image_to_halfblock_lines(&img, width, height),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::fs;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(width, height, |x, _| Rgb([(x * 10) as u8, 100, 200]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_calculate_resize_dimensions_scale_down() {
        let (w, h) = calculate_resize_dimensions(1280, 640, 160, 100);
        assert_eq!((w, h), (160, 80));
    }

    #[test]
    fn test_calculate_resize_dimensions_no_upscale() {
        assert_eq!(calculate_resize_dimensions(40, 20, 160, 100), (40, 20));
    }

    #[test]
    fn test_calculate_resize_dimensions_zero() {
        assert_eq!(calculate_resize_dimensions(0, 100, 160, 100), (0, 0));
        assert_eq!(calculate_resize_dimensions(100, 0, 160, 100), (0, 0));
    }

    #[test]
    fn test_calculate_resize_dimensions_panorama() {
        let (w, h) = calculate_resize_dimensions(16384, 128, 160, 100);
        assert_eq!(w, 160);
        assert_eq!(h, 1);
    }

    #[test]
    fn test_target_pixel_bounds() {
        let target = TargetSize {
            columns: 80,
            rows: 20,
        };
        assert_eq!(target.pixel_bounds(), (80, 40));
    }

    #[test]
    fn test_halfblock_rows_are_half_the_pixel_height() {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(8, 8, Rgb([1, 2, 3])));
        let lines = image_to_halfblock_lines(&img, 8, 8);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].spans.len(), 8);
    }

    #[test]
    fn test_halfblock_odd_height_rounds_down() {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(8, 7, Rgb([1, 2, 3])));
        assert_eq!(image_to_halfblock_lines(&img, 8, 7).len(), 3);
        assert_eq!(image_to_halfblock_lines(&img, 8, 1).len(), 1);
    }

    #[test]
    fn test_request_thumbnail_odd_height_is_not_upscaled() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("odd.png");
        write_png(&path, 20, 11);
        let photo = PhotoRef::from_path(&path).unwrap();

        let thumbnail = request_thumbnail(&photo, DEFAULT_TARGET).unwrap().unwrap();

        assert_eq!(thumbnail.lines.len(), 5);
    }

    #[test]
    fn test_request_thumbnail_png() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sunset.png");
        write_png(&path, 20, 10);
        let photo = PhotoRef::from_path(&path).unwrap();

        let thumbnail = request_thumbnail(&photo, DEFAULT_TARGET).unwrap().unwrap();

        assert_eq!(thumbnail.original_width, 20);
        assert_eq!(thumbnail.original_height, 10);
        assert_eq!(thumbnail.lines.len(), 5);
    }

    #[test]
    fn test_request_thumbnail_undecodable_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.jpg");
        fs::write(&path, b"definitely not a jpeg").unwrap();
        let photo = PhotoRef::from_path(&path).unwrap();

        let thumbnail = request_thumbnail(&photo, DEFAULT_TARGET).unwrap();
        assert!(thumbnail.is_none());
    }

    #[test]
    fn test_request_thumbnail_missing_file_is_error() {
        let photo = PhotoRef {
            path: "/nonexistent/photo.png".into(),
            name: "photo.png".to_string(),
            size: 0,
            created: None,
        };
        assert!(request_thumbnail(&photo, DEFAULT_TARGET).is_err());
    }
}
