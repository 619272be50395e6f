use crate::widgets::ToastQueue;

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Insert,
}

/// Shared application state
#[derive(Debug, Default)]
pub struct State {
    /// Current input mode, follows the screen on top
    pub input_mode: InputMode,
    /// Status message to display
    pub status_message: Option<String>,
    /// Whether to show help overlay
    pub show_help: bool,
    /// Pending toasts
    pub toasts: ToastQueue,
    /// Spinner animation step
    pub spinner_frame: usize,
    /// Toast network failures too, not just validation errors
    pub toast_network_errors: bool,
}

impl State {
    pub fn new(toast_network_errors: bool) -> Self {
        Self {
            toast_network_errors,
            ..Default::default()
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        self.toasts.remove_expired();
    }
}
