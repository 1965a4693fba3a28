//! CLI module for argument parsing and configuration

use crate::domain::{DiscoveryOptions, QueuePolicy};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// SwipeClean - triage your photo library from the terminal
///
/// Swipe left to queue a photo for deletion, right to keep it, then commit
/// the deletions in one go.
#[derive(Parser, Debug, Clone)]
#[command(name = "swipeclean")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Photo library directory
    ///
    /// If not specified, defaults to the current directory.
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Only review photos taken in this year
    #[arg(long = "year")]
    pub year: Option<i32>,

    /// Dry run mode - nothing is moved to the trash on commit
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Include photos in subdirectories
    #[arg(short = 'R', long = "recursive", action = ArgAction::SetTrue)]
    pub recursive: bool,

    /// Include hidden files and directories (names starting with .)
    #[arg(long = "hidden", action = ArgAction::SetTrue)]
    pub show_hidden: bool,

    /// Minimum file size filter (e.g., "1KB", "5MB", "1GB")
    #[arg(long = "min-size")]
    pub min_size: Option<String>,

    /// Maximum file size filter (e.g., "100MB", "1GB")
    #[arg(long = "max-size")]
    pub max_size: Option<String>,

    /// Commit without asking for confirmation
    #[arg(short = 'y', long = "yes", action = ArgAction::SetTrue)]
    pub skip_confirm: bool,

    /// Show the welcome screen even if it has been seen before
    #[arg(long = "welcome", action = ArgAction::SetTrue)]
    pub show_welcome: bool,

    /// What happens to queued deletions when the year filter changes
    ///
    /// Defaults to the saved preference, or "carry".
    #[arg(long = "on-filter-change", value_enum)]
    pub on_filter_change: Option<QueuePolicyArg>,

    /// Write the log here instead of the default data directory
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

/// Queue policy options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueuePolicyArg {
    /// Keep queued deletions across filter changes
    Carry,
    /// Drop queued deletions when the filter changes
    Discard,
}

impl From<QueuePolicyArg> for QueuePolicy {
    fn from(arg: QueuePolicyArg) -> Self {
        match arg {
            QueuePolicyArg::Carry => QueuePolicy::Carry,
            QueuePolicyArg::Discard => QueuePolicy::Discard,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Parse a size string (e.g., "5MB", "100KB") into bytes
    pub fn parse_size(size_str: &str) -> Option<u64> {
        let size_str = size_str.trim().to_uppercase();

        let (num_str, multiplier) = if let Some(n) = size_str.strip_suffix("GB") {
            (n, 1024 * 1024 * 1024)
        } else if let Some(n) = size_str.strip_suffix("MB") {
            (n, 1024 * 1024)
        } else if let Some(n) = size_str.strip_suffix("KB") {
            (n, 1024)
        } else if let Some(n) = size_str.strip_suffix('B') {
            (n, 1)
        } else {
            (size_str.as_str(), 1u64)
        };

        let num: f64 = num_str.trim().parse().ok()?;
        if num < 0.0 {
            return None;
        }

        Some((num * multiplier as f64) as u64)
    }

    pub fn get_min_size(&self) -> Option<u64> {
        self.min_size.as_deref().and_then(Self::parse_size)
    }

    pub fn get_max_size(&self) -> Option<u64> {
        self.max_size.as_deref().and_then(Self::parse_size)
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if !self.directory.exists() {
            return Err(format!(
                "Directory does not exist: {}",
                self.directory.display()
            ));
        }

        if !self.directory.is_dir() {
            return Err(format!(
                "Path is not a directory: {}",
                self.directory.display()
            ));
        }

        if let Some(year) = self.year {
            if !(1800..=9999).contains(&year) {
                return Err(format!("Invalid year: {}", year));
            }
        }

        if let Some(ref min) = self.min_size {
            if Self::parse_size(min).is_none() {
                return Err(format!(
                    "Invalid min-size format: '{}'. Use format like '5MB', '100KB', '1GB'",
                    min
                ));
            }
        }

        if let Some(ref max) = self.max_size {
            if Self::parse_size(max).is_none() {
                return Err(format!(
                    "Invalid max-size format: '{}'. Use format like '5MB', '100KB', '1GB'",
                    max
                ));
            }
        }

        if let (Some(min), Some(max)) = (self.get_min_size(), self.get_max_size()) {
            if min > max {
                return Err(format!(
                    "min-size ({}) cannot be greater than max-size ({})",
                    self.min_size.as_deref().unwrap_or_default(),
                    self.max_size.as_deref().unwrap_or_default()
                ));
            }
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory: PathBuf,
    pub year: Option<i32>,
    pub dry_run: bool,
    pub recursive: bool,
    pub show_hidden: bool,
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    pub skip_confirm: bool,
    pub show_welcome: bool,
    /// `None` means "use the saved preference"
    pub queue_policy: Option<QueuePolicy>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            recursive: self.recursive,
            show_hidden: self.show_hidden,
            min_size: self.min_size,
            max_size: self.max_size,
        }
    }
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            year: args.year,
            dry_run: args.dry_run,
            recursive: args.recursive,
            show_hidden: args.show_hidden,
            min_size: args.get_min_size(),
            max_size: args.get_max_size(),
            skip_confirm: args.skip_confirm,
            show_welcome: args.show_welcome,
            queue_policy: args.on_filter_change.map(Into::into),
            log_file: args.log_file,
            directory: args.directory,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            directory: PathBuf::from("."),
            year: None,
            dry_run: false,
            recursive: false,
            show_hidden: false,
            min_size: None,
            max_size: None,
            skip_confirm: false,
            show_welcome: false,
            queue_policy: None,
            log_file: None,
        }
    }
}
