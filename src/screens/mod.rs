//! Screens and the plumbing they share.
//!
//! A screen owns its local state and a `MountScope`. Network work is spawned
//! into that scope and reports back as a `TaskEvent` tagged with the screen's
//! id; the app routes the event to the screen if it is still mounted.

pub mod edit_trip;
pub mod trip_budget;

use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::Rect;
use strum::{Display, IntoStaticStr};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::api::TripApi;
use crate::error::Result;
use crate::models::{PaymentRecord, TripDetails};
use crate::scope::ScreenId;
use crate::session::Session;
use crate::state::InputMode;
use crate::validation::ValidationError;

pub use edit_trip::EditTripScreen;
pub use trip_budget::TripBudgetScreen;

/// Collaborators handed to every screen
#[derive(Clone)]
pub struct ScreenContext {
    pub api: Arc<dyn TripApi>,
    pub session: Arc<dyn Session>,
    pub events: mpsc::UnboundedSender<TaskEvent>,
}

/// Completion of async work started by a screen
#[derive(Debug, IntoStaticStr)]
pub enum TaskEvent {
    TripLoaded {
        screen: ScreenId,
        generation: u64,
        result: Result<TripDetails>,
    },
    PaymentsLoaded {
        screen: ScreenId,
        generation: u64,
        result: Result<Vec<PaymentRecord>>,
    },
    TripUpdated {
        screen: ScreenId,
        result: Result<()>,
    },
}

impl TaskEvent {
    pub fn screen(&self) -> ScreenId {
        match self {
            Self::TripLoaded { screen, .. }
            | Self::PaymentsLoaded { screen, .. }
            | Self::TripUpdated { screen, .. } => *screen,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Back,
    EditTrip(TripDetails),
}

/// Something the user may need to hear about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Validation(ValidationError),
    Network { context: &'static str, error: String },
    Success(String),
}

/// What a screen asks of the app after handling an action or event
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub navigation: Option<Navigation>,
    pub report: Option<Report>,
}

impl Outcome {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn navigate(navigation: Navigation) -> Self {
        Self {
            navigation: Some(navigation),
            report: None,
        }
    }

    pub fn report(report: Report) -> Self {
        Self {
            navigation: None,
            report: Some(report),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ScreenKind {
    #[strum(to_string = "Trip Budget")]
    TripBudget,
    #[strum(to_string = "Edit Trip")]
    EditTrip,
}

pub enum Screen {
    TripBudget(TripBudgetScreen),
    EditTrip(EditTripScreen),
}

impl Screen {
    pub fn id(&self) -> ScreenId {
        match self {
            Self::TripBudget(s) => s.id(),
            Self::EditTrip(s) => s.id(),
        }
    }

    pub fn kind(&self) -> ScreenKind {
        match self {
            Self::TripBudget(_) => ScreenKind::TripBudget,
            Self::EditTrip(_) => ScreenKind::EditTrip,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        match self {
            Self::TripBudget(_) => InputMode::Normal,
            Self::EditTrip(_) => InputMode::Insert,
        }
    }

    pub fn update(&mut self, action: Action, ctx: &ScreenContext) -> Outcome {
        match self {
            Self::TripBudget(s) => s.update(action, ctx),
            Self::EditTrip(s) => s.update(action, ctx),
        }
    }

    pub fn handle_event(&mut self, event: TaskEvent) -> Outcome {
        match self {
            Self::TripBudget(s) => s.handle_event(event),
            Self::EditTrip(s) => s.handle_event(event),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, spinner_frame: usize) {
        match self {
            Self::TripBudget(s) => s.render(frame, area),
            Self::EditTrip(s) => s.render(frame, area, spinner_frame),
        }
    }
}
