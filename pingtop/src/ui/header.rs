//! Top header with backend, its health and the auto-ping state.

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

use crate::console::Console;

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, backend: &str, console: &Console) {
    f.render_widget(
        Block::default()
            .title(header_title(backend, console))
            .borders(Borders::BOTTOM),
        area,
    );
}

pub fn header_title(backend: &str, console: &Console) -> String {
    let health = match console.backend_up() {
        Some(true) => "🟢",
        Some(false) => "🔴",
        None => "…",
    };
    let sched = console.scheduler();
    let auto = match (sched.target(), sched.interval()) {
        (Some(url), Some(every)) => {
            let busy = if sched.in_flight() { " (probing)" } else { "" };
            format!("auto-ping every {}s → {url}{busy}", every.as_secs())
        }
        _ => "auto-ping off".into(),
    };
    format!("pingtop — backend: {backend} {health} | {auto}  (press Esc to quit)")
}
