use chrono::{DateTime, Local, Utc};

/// Formats a byte count for display (e.g. "1.5 MB")
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.1} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.1} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.1} KB", size as f64 / KB as f64)
    } else {
        format!("{} B", size)
    }
}

/// Fraction of `total` already processed, clamped to 0.0..=1.0
pub fn calculate_progress(processed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (processed as f64 / total as f64).min(1.0)
}

/// Creation date in local time, or a placeholder for undated photos
pub fn format_taken_date(created: Option<DateTime<Utc>>) -> String {
    match created {
        Some(date) => date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "undated".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_file_size(2 * 1024 * 1024 * 1024), "2.0 GB");
    }

    #[test]
    fn test_calculate_progress() {
        assert_eq!(calculate_progress(0, 0), 0.0);
        assert_eq!(calculate_progress(0, 4), 0.0);
        assert_eq!(calculate_progress(1, 4), 0.25);
        assert_eq!(calculate_progress(4, 4), 1.0);
        assert_eq!(calculate_progress(9, 4), 1.0);
    }

    #[test]
    fn test_format_undated() {
        assert_eq!(format_taken_date(None), "undated");
    }

    #[test]
    fn test_format_dated_has_year() {
        let date = "2021-06-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert!(format_taken_date(Some(date)).starts_with("2021-06-1"));
    }
}
