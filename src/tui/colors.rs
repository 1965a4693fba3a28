//! Color palette shared by every view
use ratatui::style::Color;

/// Delete / destructive actions
pub const ACCENT_PRIMARY: Color = Color::Rgb(235, 87, 87);
/// Keep / safe actions
pub const ACCENT_SECONDARY: Color = Color::Rgb(111, 207, 151);
/// Titles, selection, emphasis
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(242, 201, 76);

pub const TEXT_PRIMARY: Color = Color::Rgb(230, 230, 230);
pub const TEXT_SECONDARY: Color = Color::Rgb(140, 140, 150);
pub const TEXT_DISABLED: Color = Color::Rgb(80, 80, 90);

pub const BG_DARK: Color = Color::Rgb(24, 24, 30);
pub const BORDER_COLOR: Color = Color::Rgb(70, 70, 85);
