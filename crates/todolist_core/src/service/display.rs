//! Display projections derived from domain data.
//!
//! # Responsibility
//! - Map priority labels to the color a list row renders with.
//!
//! # Invariants
//! - `color_for` is total: every input maps to a color, unknown input maps
//!   to `Gray` rather than failing.

use crate::model::todo::Priority;

/// Abstract row color; presentation layers decide the concrete rendering
/// (ANSI escape, RGB, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayColor {
    Red,
    Green,
    Blue,
    Gray,
}

/// Maps a priority label to its row color.
///
/// Matches the exact user-facing labels (`High`, `Normal`, `Low`); anything
/// else (empty, unrecognized, differently cased) renders `Gray`.
pub fn color_for(label: &str) -> DisplayColor {
    match label {
        "High" => DisplayColor::Red,
        "Normal" => DisplayColor::Green,
        "Low" => DisplayColor::Blue,
        _ => DisplayColor::Gray,
    }
}

/// Convenience for typed callers: the color of a known priority.
pub fn priority_color(priority: Priority) -> DisplayColor {
    color_for(priority.label())
}
