//! Toast notifications
//!
//! Short-lived messages drawn over the bottom of the screen.

use std::time::{Duration, Instant};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::theme::Colors;

const DEFAULT_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn color(&self) -> Color {
        match self {
            Self::Success => Colors::SUCCESS,
            Self::Error => Colors::ERROR,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Error => "Error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at: Instant::now(),
            duration: DEFAULT_DURATION,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Success)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

/// Live toasts, oldest first; the newest one is on screen
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    /// Push `toast`, dropping any live toast of the same kind
    pub fn replace(&mut self, toast: Toast) {
        self.toasts.retain(|t| t.kind != toast.kind);
        self.toasts.push(toast);
    }

    pub fn remove_expired(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    pub fn current(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

pub struct ToastWidget<'a> {
    toast: &'a Toast,
}

impl<'a> ToastWidget<'a> {
    pub fn new(toast: &'a Toast) -> Self {
        Self { toast }
    }
}

impl Widget for ToastWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = self.toast.kind.color();
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(format!(" {} ", self.toast.kind.title()))
            .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

        Paragraph::new(self.toast.message.as_str())
            .style(Style::default().fg(Colors::LIGHT))
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_shows_newest() {
        let mut queue = ToastQueue::default();
        queue.push(Toast::error("Please enter Trip Name"));
        queue.push(Toast::success("Trip updated"));

        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.current().map(|t| t.message.as_str()),
            Some("Trip updated")
        );
    }

    #[test]
    fn test_replace_drops_same_kind_only() {
        let mut queue = ToastQueue::default();
        queue.push(Toast::success("Trip updated"));
        queue.push(Toast::error("Please enter Trip Name"));
        queue.replace(Toast::error("Please enter Trip Destination"));

        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.current().map(|t| t.message.as_str()),
            Some("Please enter Trip Destination")
        );
    }

    #[test]
    fn test_expired_toasts_are_dropped() {
        let mut queue = ToastQueue::default();
        queue.push(Toast::error("gone").with_duration(Duration::ZERO));
        queue.push(Toast::error("stays"));
        queue.remove_expired();

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.current().map(|t| t.kind), Some(ToastKind::Error));
    }
}
