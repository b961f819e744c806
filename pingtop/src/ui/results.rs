//! Results pane: one row per probe, newest on top, with an optional error
//! sub-line under offline entries.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::results::{EntryView, LogLine, PLACEHOLDER_TEXT};
use crate::ui::theme::{state_color, DETAIL, DIM};
use crate::ui::util::truncate_middle;

/// Rows taken on screen by `lines`, sub-lines included.
pub fn row_count(lines: &[LogLine]) -> usize {
    lines
        .iter()
        .map(|l| match l {
            LogLine::Entry(EntryView {
                detail: Some(_), ..
            }) => 2,
            _ => 1,
        })
        .sum()
}

pub fn draw_results(f: &mut ratatui::Frame<'_>, area: Rect, lines: &[LogLine], scroll: usize) {
    let entries = lines
        .iter()
        .filter(|l| matches!(l, LogLine::Entry(_)))
        .count();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Results ({entries})"));

    let url_width = area.width.saturating_sub(2 + 36) as usize;
    let mut rows: Vec<Line> = Vec::with_capacity(row_count(lines));
    for line in lines {
        match line {
            LogLine::Placeholder => rows.push(Line::from(Span::styled(
                PLACEHOLDER_TEXT,
                Style::default().fg(DIM),
            ))),
            LogLine::Entry(e) => {
                let color = state_color(e.state);
                rows.push(Line::from(vec![
                    Span::styled(format!("{:<8}  ", e.time), Style::default().fg(DIM)),
                    Span::styled(
                        format!("{:<7}  ", e.state.label()),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("{:>9}  ", e.latency)),
                    Span::styled(format!("{:>4}  ", e.code), Style::default().fg(DIM)),
                    Span::raw(truncate_middle(&e.url, url_width.max(8))),
                ]));
                if let Some(d) = &e.detail {
                    rows.push(Line::from(Span::styled(
                        format!("          ↳ {d}"),
                        Style::default().fg(DETAIL),
                    )));
                }
            }
        }
    }

    let scroll = scroll.min(u16::MAX as usize) as u16;
    f.render_widget(Paragraph::new(rows).block(block).scroll((scroll, 0)), area);
}
