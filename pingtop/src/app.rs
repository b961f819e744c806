//! App state and main loop: input handling, applying completions, ticking the
//! auto-ping timer, and drawing.

use std::{
    io,
    time::{Duration, Instant},
};

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Terminal,
};
use tokio::time::sleep;
use tracing::info;

use crate::console::Console;
use crate::input::{apply_scroll, Action, InputState};
use crate::ui::{
    banner::draw_banner,
    form::draw_form,
    header::draw_header,
    results::{draw_results, row_count},
    theme::DIM,
};

const TICK_RATE: Duration = Duration::from_millis(100);
const HELP: &str =
    "Enter test · Tab switch field · ^A auto-ping · ^X stop · ^L clear · ^R reload · ↑↓ scroll";

pub struct App {
    console: Console,
    backend: String,
    pub input: InputState,
    pub scroll: usize,
    last_results_area: Option<Rect>,
    should_quit: bool,
}

impl App {
    pub fn new(console: Console, backend: impl Into<String>) -> Self {
        Self {
            console,
            backend: backend.into(),
            input: InputState::default(),
            scroll: 0,
            last_results_area: None,
            should_quit: false,
        }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Initial load
        self.console.check_health();
        self.console.load_recent();

        // Terminal setup
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    if let Some(action) = self.input.handle_key(k) {
                        self.on_action(action);
                    }
                }
            }
            if self.should_quit {
                info!("quit requested");
                break;
            }

            self.step(Instant::now());

            terminal.draw(|f| self.draw(f))?;
            sleep(TICK_RATE).await;
        }
        Ok(())
    }

    /// Applies finished calls and lets the auto-ping timer fire.
    pub fn step(&mut self, now: Instant) {
        let applied = self.console.drain();
        if applied.manual_ok {
            self.input.url.clear();
        }
        self.console.tick(now);
    }

    pub fn on_action(&mut self, action: Action) {
        match action {
            Action::Submit(url) => self.console.submit(&url),
            Action::StartAuto { url, interval } => {
                self.console.start_auto(&url, &interval, Instant::now())
            }
            Action::StopAuto => self.console.stop_auto(),
            Action::Clear => {
                self.scroll = 0;
                self.console.clear();
            }
            Action::Reload => {
                self.scroll = 0;
                self.console.check_health();
                self.console.load_recent();
            }
            Action::Scroll(s) => {
                let page = self
                    .last_results_area
                    .map(|a| a.height.saturating_sub(2) as usize)
                    .unwrap_or(1);
                let total = row_count(&self.console.log().lines());
                apply_scroll(&mut self.scroll, s, page, total);
            }
            Action::Quit => self.should_quit = true,
        }
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();

        // Root rows: header, form, banner, results, help
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(3), // url + frequency fields
                Constraint::Length(1), // banner
                Constraint::Min(3),    // results
                Constraint::Length(1), // help
            ])
            .split(area);

        draw_header(f, rows[0], &self.backend, &self.console);
        draw_form(f, rows[1], &self.input);
        draw_banner(f, rows[2], self.console.log().banner());

        // Cache for scroll paging
        self.last_results_area = Some(rows[3]);
        let lines = self.console.log().lines();
        let page = rows[3].height.saturating_sub(2) as usize;
        self.scroll = self.scroll.min(row_count(&lines).saturating_sub(page));
        draw_results(f, rows[3], &lines, self.scroll);

        f.render_widget(
            Paragraph::new(HELP).style(ratatui::style::Style::default().fg(DIM)),
            rows[4],
        );
    }
}
