use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Swipe left: queue the current photo for deletion
    Delete,
    /// Swipe right: keep the current photo
    Keep,
    /// Open the year picker
    YearPicker,
    /// Commit queued deletions
    Commit,
    /// Confirm the pending commit
    ConfirmCommit,
    /// Cancel the pending commit
    CancelCommit,
    /// Open the current photo in the system viewer
    Open,
    /// Toggle help overlay
    Help,
    /// Picker navigation
    Up,
    Down,
    Select,
    Cancel,
    /// No action
    None,
}

/// Maps keyboard events to actions while browsing
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q, Esc or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        // Delete: Left arrow, h or d
        (KeyCode::Left, KeyModifiers::NONE) => KeyAction::Delete,
        (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::Delete,
        (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::Delete,

        // Keep: Right arrow, l or k
        (KeyCode::Right, KeyModifiers::NONE) => KeyAction::Keep,
        (KeyCode::Char('l'), KeyModifiers::NONE) => KeyAction::Keep,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Keep,

        (KeyCode::Char('y'), KeyModifiers::NONE) => KeyAction::YearPicker,
        (KeyCode::Char('c'), KeyModifiers::NONE) => KeyAction::Commit,
        (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::Open,

        // Help: ? (some terminals report the shift)
        (KeyCode::Char('?'), KeyModifiers::NONE) => KeyAction::Help,
        (KeyCode::Char('?'), KeyModifiers::SHIFT) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events to confirmation actions
/// Used when ViewState is ConfirmCommit
pub fn handle_confirm_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Confirm: y or Enter
        (KeyCode::Char('y'), KeyModifiers::NONE) => KeyAction::ConfirmCommit,
        (KeyCode::Char('Y'), _) => KeyAction::ConfirmCommit,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::ConfirmCommit,

        // Cancel: n or Esc
        (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::CancelCommit,
        (KeyCode::Char('N'), _) => KeyAction::CancelCommit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::CancelCommit,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events while the year picker is open
pub fn handle_picker_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Up,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Up,
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Down,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::Down,

        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Select,

        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Char('y'), KeyModifiers::NONE) => KeyAction::Cancel,

        _ => KeyAction::None,
    }
}
