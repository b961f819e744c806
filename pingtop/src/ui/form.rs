//! URL and frequency fields.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
};

use crate::input::{Field, InputState};
use crate::ui::theme::{DIM, FOCUS};

pub fn draw_form(f: &mut ratatui::Frame<'_>, area: Rect, input: &InputState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(18)])
        .split(area);

    field(f, cols[0], "URL (Enter: test)", &input.url, input.focus == Field::Url);
    field(
        f,
        cols[1],
        "Every (s)",
        &input.frequency,
        input.focus == Field::Frequency,
    );
}

fn field(f: &mut ratatui::Frame<'_>, area: Rect, title: &str, value: &str, focused: bool) {
    let border = if focused { FOCUS } else { DIM };
    // Keep the tail visible while typing long URLs.
    let width = area.width.saturating_sub(3) as usize;
    let shown: String = {
        let n = value.chars().count();
        value.chars().skip(n.saturating_sub(width)).collect()
    };
    let cursor = if focused { "▏" } else { "" };
    let p = Paragraph::new(format!("{shown}{cursor}")).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title.to_string()),
    );
    f.render_widget(p, area);
}
