use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::theme::{Colors, Fonts};

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Submit-style button. While `loading` it shows a spinner instead of its
/// title and refuses presses.
#[derive(Debug, Clone)]
pub struct ActionButton<'a> {
    title: &'a str,
    loading: bool,
    focused: bool,
    frame: usize,
}

impl<'a> ActionButton<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            loading: false,
            focused: false,
            frame: 0,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Spinner animation step, advanced on every tick
    pub fn frame(mut self, frame: usize) -> Self {
        self.frame = frame;
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.loading
    }

    pub fn content(&self) -> &'a str {
        if self.loading {
            SPINNER[self.frame % SPINNER.len()]
        } else {
            self.title
        }
    }
}

impl Widget for ActionButton<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused && !self.loading {
            Colors::THANOS
        } else {
            Colors::LIGHT
        };
        let text_style = if self.loading {
            Style::default().fg(Colors::THANOS)
        } else {
            Style::default()
                .fg(Colors::LIGHT)
                .add_modifier(Fonts::MAIN_SEMI)
        };

        Paragraph::new(self.content())
            .style(text_style)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shows_title_when_idle() {
        let button = ActionButton::new("Update Trip");
        assert_eq!(button.content(), "Update Trip");
        assert!(!button.is_disabled());
    }

    #[test]
    fn test_shows_spinner_when_loading() {
        let button = ActionButton::new("Update Trip").loading(true).frame(9);
        assert_eq!(button.content(), SPINNER[1]);
        assert!(button.is_disabled());
    }

    #[test]
    fn test_render_writes_title() {
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        ActionButton::new("Save").render(area, &mut buf);

        let row: String = (0..area.width)
            .map(|x| buf[(x, 1)].symbol().to_string())
            .collect();
        assert!(row.contains("Save"));
    }
}
