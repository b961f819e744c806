//! Form state (URL + frequency fields) and key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub const DEFAULT_FREQUENCY: &str = "5";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Url,
    Frequency,
}

/// A command produced by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Submit(String),
    StartAuto { url: String, interval: String },
    StopAuto,
    Clear,
    Reload,
    Scroll(Scroll),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

#[derive(Debug, Clone)]
pub struct InputState {
    pub url: String,
    pub frequency: String,
    pub focus: Field,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            url: String::new(),
            frequency: DEFAULT_FREQUENCY.to_string(),
            focus: Field::Url,
        }
    }
}

impl InputState {
    /// Edits the focused field or maps the key to an [`Action`].
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('a') => Some(Action::StartAuto {
                    url: self.url.trim().to_string(),
                    interval: self.frequency.trim().to_string(),
                }),
                KeyCode::Char('x') => Some(Action::StopAuto),
                KeyCode::Char('l') => Some(Action::Clear),
                KeyCode::Char('r') => Some(Action::Reload),
                KeyCode::Char('u') => {
                    self.focused_mut().clear();
                    None
                }
                _ => None,
            };
        }
        match key.code {
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Enter => {
                let url = self.url.trim().to_string();
                if url.is_empty() {
                    None
                } else {
                    Some(Action::Submit(url))
                }
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Field::Url => Field::Frequency,
                    Field::Frequency => Field::Url,
                };
                None
            }
            KeyCode::Backspace => {
                self.focused_mut().pop();
                None
            }
            KeyCode::Char(ch) => {
                if self.focus == Field::Frequency && !ch.is_ascii_digit() {
                    return None;
                }
                self.focused_mut().push(ch);
                None
            }
            KeyCode::Up => Some(Action::Scroll(Scroll::Up)),
            KeyCode::Down => Some(Action::Scroll(Scroll::Down)),
            KeyCode::PageUp => Some(Action::Scroll(Scroll::PageUp)),
            KeyCode::PageDown => Some(Action::Scroll(Scroll::PageDown)),
            KeyCode::Home => Some(Action::Scroll(Scroll::Top)),
            KeyCode::End => Some(Action::Scroll(Scroll::Bottom)),
            _ => None,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Url => &mut self.url,
            Field::Frequency => &mut self.frequency,
        }
    }
}

/// Applies a scroll command to `offset`, keeping it within `total - page`.
pub fn apply_scroll(offset: &mut usize, scroll: Scroll, page: usize, total: usize) {
    let page = page.max(1);
    let max_off = total.saturating_sub(page);
    *offset = match scroll {
        Scroll::Up => offset.saturating_sub(1),
        Scroll::Down => offset.saturating_add(1),
        Scroll::PageUp => offset.saturating_sub(page),
        Scroll::PageDown => offset.saturating_add(page),
        Scroll::Top => 0,
        Scroll::Bottom => max_off,
    }
    .min(max_off);
}
