//! Presentation controller: turns key presses into catalog and session calls
//! and keeps the view-only state the renderer needs.

use crate::domain::{Direction, PhotoCatalog, PhotoRef, QueuePolicy, TriageSession};
use crate::error::SwipeCleanError;
use crate::library::AssetDeleter;
use crate::tui::{handle_confirm_input, handle_key_event, handle_picker_input, KeyAction, ViewState};
use crossterm::event::KeyEvent;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Which part of the catalog is being reviewed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearFilter {
    All,
    Year(i32),
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => write!(f, "All years"),
            YearFilter::Year(year) => write!(f, "{}", year),
        }
    }
}

/// One line of feedback under the photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// What the terminal loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppFlow {
    Continue,
    /// Suspend the terminal and show this photo in the system viewer
    OpenPhoto(PathBuf),
    /// The welcome screen was dismissed and should not be shown again
    WelcomeDismissed,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppOptions {
    pub queue_policy: QueuePolicy,
    pub skip_confirm: bool,
    pub dry_run: bool,
    pub show_welcome: bool,
}

pub struct App {
    catalog: PhotoCatalog,
    session: TriageSession,
    filter: YearFilter,
    deleter: Box<dyn AssetDeleter>,
    options: AppOptions,
    view: ViewState,
    picker_index: usize,
    status: Option<StatusMessage>,
    decisions: usize,
    deleted_total: usize,
    quit_warned: bool,
}

impl App {
    pub fn new(catalog: PhotoCatalog, deleter: Box<dyn AssetDeleter>, options: AppOptions) -> Self {
        let session = TriageSession::new(catalog.photos().to_vec());
        let view = if options.show_welcome {
            ViewState::Welcome
        } else {
            ViewState::Browsing
        };

        Self {
            catalog,
            session,
            filter: YearFilter::All,
            deleter,
            options,
            view,
            picker_index: 0,
            status: None,
            decisions: 0,
            deleted_total: 0,
            quit_warned: false,
        }
    }

    pub fn catalog(&self) -> &PhotoCatalog {
        &self.catalog
    }

    pub fn session(&self) -> &TriageSession {
        &self.session
    }

    pub fn filter(&self) -> YearFilter {
        self.filter
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn current_photo(&self) -> Option<&Arc<PhotoRef>> {
        self.session.current_photo()
    }

    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Photos deleted (or, in a dry run, that would have been) so far
    pub fn deleted_total(&self) -> usize {
        self.deleted_total
    }

    /// Keep/delete decisions made across every working set this run
    pub fn decisions_made(&self) -> usize {
        self.decisions
    }

    pub fn picker_index(&self) -> usize {
        self.picker_index
    }

    /// Entries of the year picker: "All" followed by each year, most recent first
    pub fn year_options(&self) -> Vec<(YearFilter, usize)> {
        let mut options = vec![(YearFilter::All, self.catalog.len())];
        options.extend(
            self.catalog
                .available_years()
                .iter()
                .map(|&year| (YearFilter::Year(year), self.catalog.count_for_year(year))),
        );
        options
    }

    /// Switches the working set. Queued deletions follow the queue policy.
    pub fn set_filter(&mut self, filter: YearFilter) {
        let working_set = match filter {
            YearFilter::All => self.catalog.photos().to_vec(),
            YearFilter::Year(year) => self.catalog.filter_by_year(year),
        };

        let session = std::mem::take(&mut self.session);
        self.session = session.rebase(working_set, self.options.queue_policy);
        self.filter = filter;
        self.quit_warned = false;

        tracing::info!(%filter, photos = self.session.len(), "year filter changed");

        self.status = Some(StatusMessage::info(format!(
            "Showing {} ({} photos)",
            filter,
            self.session.len()
        )));
        self.view = if self.session.is_exhausted() && self.session.can_commit() {
            ViewState::Summary
        } else {
            ViewState::Browsing
        };
    }

    /// Routes a key press according to the current view
    pub fn handle_key(&mut self, key: KeyEvent) -> AppFlow {
        match self.view {
            ViewState::Welcome => {
                self.view = ViewState::Browsing;
                AppFlow::WelcomeDismissed
            }
            ViewState::Help => {
                if matches!(
                    handle_key_event(key),
                    KeyAction::Help | KeyAction::Quit | KeyAction::None
                ) {
                    self.view = ViewState::Browsing;
                }
                AppFlow::Continue
            }
            ViewState::ConfirmCommit => {
                match handle_confirm_input(key) {
                    KeyAction::ConfirmCommit => self.commit(),
                    KeyAction::CancelCommit => self.view = self.resting_view(),
                    _ => {}
                }
                AppFlow::Continue
            }
            ViewState::YearPicker => {
                self.handle_picker_action(handle_picker_input(key));
                AppFlow::Continue
            }
            ViewState::Browsing | ViewState::Summary => self.handle_action(handle_key_event(key)),
        }
    }

    /// Applies a browsing-level action
    pub fn handle_action(&mut self, action: KeyAction) -> AppFlow {
        match action {
            KeyAction::Quit => return self.request_quit(),
            KeyAction::Delete => self.swipe(Direction::Delete),
            KeyAction::Keep => self.swipe(Direction::Keep),
            KeyAction::YearPicker => self.open_year_picker(),
            KeyAction::Commit => self.request_commit(),
            KeyAction::Help => self.view = ViewState::Help,
            KeyAction::Open => {
                if let Some(photo) = self.session.current_photo() {
                    return AppFlow::OpenPhoto(photo.path.clone());
                }
            }
            _ => {}
        }
        AppFlow::Continue
    }

    /// Reports a failed attempt to open the current photo
    pub fn report_open_error(&mut self, error: &SwipeCleanError) {
        tracing::warn!(%error, "failed to open photo");
        self.status = Some(StatusMessage::error(format!("Could not open photo: {}", error)));
    }

    fn swipe(&mut self, direction: Direction) {
        match self.session.decide(direction) {
            Ok(photo) => {
                self.decisions += 1;
                self.status = match direction {
                    Direction::Delete => Some(StatusMessage::info(format!(
                        "Queued {} for deletion",
                        photo.name
                    ))),
                    Direction::Keep => None,
                };
                self.view = self.resting_view();
            }
            Err(e) => self.status = Some(StatusMessage::error(e.to_string())),
        }
    }

    fn open_year_picker(&mut self) {
        self.picker_index = self
            .year_options()
            .iter()
            .position(|(filter, _)| *filter == self.filter)
            .unwrap_or(0);
        self.view = ViewState::YearPicker;
    }

    fn handle_picker_action(&mut self, action: KeyAction) {
        let count = self.year_options().len();
        match action {
            KeyAction::Up => self.picker_index = self.picker_index.saturating_sub(1),
            KeyAction::Down => {
                if self.picker_index + 1 < count {
                    self.picker_index += 1;
                }
            }
            KeyAction::Select => {
                if let Some((filter, _)) = self.year_options().get(self.picker_index).copied() {
                    self.set_filter(filter);
                }
            }
            KeyAction::Cancel => self.view = self.resting_view(),
            _ => {}
        }
    }

    fn request_commit(&mut self) {
        if !self.session.can_commit() {
            self.status = Some(StatusMessage::info("Nothing queued for deletion"));
            return;
        }

        if self.options.skip_confirm || self.options.dry_run {
            self.commit();
        } else {
            self.view = ViewState::ConfirmCommit;
        }
    }

    fn commit(&mut self) {
        let batch: Vec<Arc<PhotoRef>> = self.session.pending_deletions().to_vec();

        match self.session.commit(self.deleter.as_mut()) {
            Ok(count) => {
                self.deleted_total += count;
                self.catalog = self.catalog.without(&batch);
                self.quit_warned = false;
                let verb = if self.options.dry_run {
                    "Would delete"
                } else {
                    "Deleted"
                };
                self.status = Some(StatusMessage::info(format!("{} {} photos", verb, count)));
            }
            Err(e) => {
                self.status = Some(StatusMessage::error(e.to_string()));
            }
        }
        self.view = self.resting_view();
    }

    fn request_quit(&mut self) -> AppFlow {
        let pending = self.session.pending_deletion_count();
        if pending > 0 && !self.quit_warned {
            self.quit_warned = true;
            self.status = Some(StatusMessage::error(format!(
                "{} photos queued but not deleted. Press c to commit or q again to quit",
                pending
            )));
            return AppFlow::Continue;
        }

        if self.view == ViewState::Summary || self.decisions == 0 {
            AppFlow::Quit
        } else {
            self.view = ViewState::Summary;
            AppFlow::Continue
        }
    }

    /// The view to fall back to once an overlay closes
    fn resting_view(&self) -> ViewState {
        if self.session.is_exhausted() && !self.session.is_empty() {
            ViewState::Summary
        } else {
            ViewState::Browsing
        }
    }
}
