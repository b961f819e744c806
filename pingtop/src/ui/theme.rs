//! Shared UI theme constants.

use ratatui::style::Color;

use crate::results::StatusKind;
use crate::types::ProbeState;

pub const DIM: Color = Color::DarkGray;
pub const FOCUS: Color = Color::Cyan;
pub const DETAIL: Color = Color::Rgb(200, 120, 120);

pub fn state_color(state: ProbeState) -> Color {
    match state {
        ProbeState::Online => Color::Green,
        ProbeState::Slow => Color::Yellow,
        ProbeState::Offline => Color::Red,
    }
}

pub fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Info => Color::Blue,
        StatusKind::Ok => Color::Green,
        StatusKind::Err => Color::Red,
    }
}
