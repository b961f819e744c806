//! One-line status banner.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::results::Banner;
use crate::ui::theme::status_color;

pub fn draw_banner(f: &mut ratatui::Frame<'_>, area: Rect, banner: Option<&Banner>) {
    let Some(b) = banner else {
        f.render_widget(Paragraph::new(""), area);
        return;
    };
    let line = Line::from(Span::styled(
        b.text.clone(),
        Style::default()
            .fg(status_color(b.kind))
            .add_modifier(Modifier::BOLD),
    ));
    f.render_widget(Paragraph::new(line), area);
}
