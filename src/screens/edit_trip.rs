//! Edit trip screen
//!
//! Seeds a `FormState` from the trip it was handed, lets the user edit it,
//! runs the validation gate on submit and sends one update at a time.

use chrono::{Days, Local, NaiveDate};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};
use tracing::{info, warn};

use super::{Navigation, Outcome, Report, ScreenContext, TaskEvent};
use crate::action::Action;
use crate::app::centered_rect;
use crate::form::{FormState, parse_date};
use crate::models::TripDetails;
use crate::scope::{MountScope, ScreenId};
use crate::theme::{self, Colors};
use crate::validation::{self, ValidationError};
use crate::widgets::ActionButton;

/// Focusable parts of the form, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Destination(usize),
    AddDestination,
    Period,
    FundGoal,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started,
    AlreadyInFlight,
}

pub struct EditTripScreen {
    trip: TripDetails,
    form: FormState,
    focus: Field,
    loading: bool,
    /// Day highlighted in the open date picker
    picker_cursor: NaiveDate,
    scope: MountScope,
}

impl EditTripScreen {
    pub fn mount(trip: TripDetails) -> Self {
        let form = FormState::from_trip(&trip.trip);
        Self {
            trip,
            form,
            focus: Field::Name,
            loading: false,
            picker_cursor: Local::now().date_naive(),
            scope: MountScope::new(),
        }
    }

    pub fn id(&self) -> ScreenId {
        self.scope.id()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn focus_order(&self) -> Vec<Field> {
        let mut order = vec![Field::Name];
        order.extend((0..self.form.destinations.len()).map(Field::Destination));
        order.extend([
            Field::AddDestination,
            Field::Period,
            Field::FundGoal,
            Field::Submit,
        ]);
        order
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn picker_open(&self) -> bool {
        self.form.show_start_calendar || self.form.show_end_calendar
    }

    fn open_pickers(&mut self) {
        self.form.open_start_picker();
        self.picker_cursor =
            parse_date(&self.form.start_date).unwrap_or_else(|| Local::now().date_naive());
    }

    fn move_picker(&mut self, days: i64) {
        let moved = if days >= 0 {
            self.picker_cursor
                .checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.picker_cursor
                .checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(day) = moved {
            self.picker_cursor = match self.form.min_end_date() {
                Some(min) if self.form.show_end_calendar && day < min => min,
                _ => day,
            };
        }
    }

    fn pick_day(&mut self) {
        if self.form.show_start_calendar {
            self.form.pick_start_date(self.picker_cursor);
            self.picker_cursor = parse_date(&self.form.end_date)
                .filter(|end| *end >= self.picker_cursor)
                .unwrap_or(self.picker_cursor);
        } else if self.form.show_end_calendar {
            self.form.pick_end_date(self.picker_cursor);
        }
    }

    fn add_destination(&mut self) {
        let destinations = self.form.destinations.add();
        self.focus = Field::Destination(destinations.len() - 1);
        self.form.set_destinations(destinations);
    }

    fn remove_destination(&mut self) {
        let Field::Destination(index) = self.focus else {
            return;
        };
        let destinations = self.form.destinations.remove(index);
        let last = destinations.len() - 1;
        self.form.set_destinations(destinations);
        self.focus = Field::Destination(index.min(last));
    }

    fn input_char(&mut self, c: char) {
        match self.focus {
            Field::Name => {
                let mut text = self.form.name.clone();
                text.push(c);
                self.form.set_name(&text);
            }
            Field::Destination(index) => {
                let mut text = self.form.destinations.get(index).unwrap_or_default().to_string();
                text.push(c);
                let destinations = self.form.destinations.edit(index, &text);
                self.form.set_destinations(destinations);
            }
            Field::FundGoal => {
                let mut raw = self.form.fund_goal.clone();
                raw.push(c);
                self.form.set_fund_goal(&raw);
            }
            _ => {}
        }
    }

    fn backspace(&mut self) {
        match self.focus {
            Field::Name => {
                let mut text = self.form.name.clone();
                text.pop();
                self.form.set_name(&text);
            }
            Field::Destination(index) => {
                let mut text = self.form.destinations.get(index).unwrap_or_default().to_string();
                text.pop();
                let destinations = self.form.destinations.edit(index, &text);
                self.form.set_destinations(destinations);
            }
            Field::FundGoal => {
                let mut raw = self.form.fund_goal.clone();
                raw.pop();
                self.form.set_fund_goal(&raw);
            }
            _ => {}
        }
    }

    /// Validate and, if the form passes, send the update.
    ///
    /// Only one update may be in flight; a second press while loading sends nothing.
    pub fn submit(&mut self, ctx: &ScreenContext) -> Result<SubmitOutcome, ValidationError> {
        if self.loading {
            return Ok(SubmitOutcome::AlreadyInFlight);
        }
        validation::validate(&self.form)?;

        self.loading = true;
        let update = self.form.to_update(&ctx.session.owner_id());
        let trip_id = self.trip.trip.id.clone();
        let token = ctx.session.auth_token();
        let api = ctx.api.clone();
        let events = ctx.events.clone();
        let screen = self.id();

        info!(trip_id = %trip_id, "submitting trip update");
        self.scope.spawn(async move {
            let result = api.update_trip(&token, &trip_id, &update).await;
            let _ = events.send(TaskEvent::TripUpdated { screen, result });
        });
        Ok(SubmitOutcome::Started)
    }

    pub fn handle_event(&mut self, event: TaskEvent) -> Outcome {
        match event {
            TaskEvent::TripUpdated { result, .. } => {
                self.loading = false;
                match result {
                    Ok(()) => {
                        info!(trip_id = %self.trip.trip.id, "trip updated");
                        Outcome {
                            navigation: Some(Navigation::Back),
                            report: Some(Report::Success("Trip updated".into())),
                        }
                    }
                    Err(err) => Outcome::report(Report::Network {
                        context: "Failed to update Trip",
                        error: err.to_string(),
                    }),
                }
            }
            other => {
                warn!(event = <&str>::from(&other), "edit screen ignoring event");
                Outcome::none()
            }
        }
    }

    pub fn update(&mut self, action: Action, ctx: &ScreenContext) -> Outcome {
        if self.picker_open() {
            match action {
                Action::Left => self.move_picker(-1),
                Action::Right => self.move_picker(1),
                Action::Up => self.move_picker(-7),
                Action::Down => self.move_picker(7),
                Action::Confirm => self.pick_day(),
                Action::Cancel => self.form.close_pickers(),
                _ => {}
            }
            return Outcome::none();
        }

        match action {
            Action::NextField | Action::Down => self.move_focus(true),
            Action::PrevField | Action::Up => self.move_focus(false),
            Action::InputChar(c) => self.input_char(c),
            Action::InputBackspace => self.backspace(),
            Action::AddDestination => self.add_destination(),
            Action::RemoveDestination => self.remove_destination(),
            Action::Cancel => return Outcome::navigate(Navigation::Back),
            Action::Confirm => match self.focus {
                Field::AddDestination => self.add_destination(),
                Field::Period => self.open_pickers(),
                Field::Submit => {
                    if let Err(err) = self.submit(ctx) {
                        return Outcome::report(Report::Validation(err));
                    }
                }
                _ => self.move_focus(true),
            },
            _ => {}
        }
        Outcome::none()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, spinner_frame: usize) {
        let destination_rows = self.form.destinations.len() as u16 + 3;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(destination_rows),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        let field_block = |title: &'static str, field: Field| {
            let style = if self.focus == field {
                theme::focused()
            } else {
                Style::default().fg(Colors::GREY_LIGHT)
            };
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(Span::styled(format!(" {} ", title), theme::label()))
        };

        let name = if self.form.name.is_empty() {
            Paragraph::new("Trip Name").style(theme::placeholder())
        } else {
            Paragraph::new(self.form.name.as_str())
        };
        frame.render_widget(name.block(field_block("Trip Name", Field::Name)), layout[0]);

        let chars_left = Paragraph::new(format!("{} characters left", self.form.chars_left()))
            .style(theme::placeholder())
            .alignment(ratatui::layout::Alignment::Right);
        frame.render_widget(chars_left, layout[1]);

        let mut items: Vec<ListItem> = self
            .form
            .destinations
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let focused = self.focus == Field::Destination(i);
                let prefix = if focused { "> " } else { "  " };
                let text = if d.is_empty() {
                    Span::styled("Trip Destination", theme::placeholder())
                } else {
                    Span::raw(d.to_string())
                };
                let mut spans = vec![Span::raw(prefix), text];
                if self.form.destinations.can_remove() {
                    spans.push(Span::styled("  [x]", Style::default().fg(Colors::VISION)));
                }
                let style = if focused { theme::focused() } else { Style::default() };
                ListItem::new(Line::from(spans)).style(style)
            })
            .collect();
        let add_style = if self.focus == Field::AddDestination {
            theme::focused()
        } else {
            Style::default().fg(Colors::LIGHT)
        };
        items.push(ListItem::new("  + Add Destination").style(add_style));
        let destinations = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Colors::GREY_LIGHT))
                .title(Span::styled(" Trip Destination ", theme::label())),
        );
        frame.render_widget(destinations, layout[2]);

        let period_style = if self.form.start_date.is_empty() && self.form.end_date.is_empty() {
            theme::placeholder()
        } else {
            Style::default().fg(Colors::LIGHT)
        };
        let period = Paragraph::new(self.form.period_label())
            .style(period_style)
            .block(field_block("Trip Period", Field::Period));
        frame.render_widget(period, layout[3]);

        let fund = if self.form.fund_goal.is_empty() {
            Paragraph::new("$ Fund Goals").style(theme::placeholder())
        } else {
            Paragraph::new(self.form.fund_goal.as_str())
        };
        frame.render_widget(fund.block(field_block("Fund Goals", Field::FundGoal)), layout[4]);

        let button = ActionButton::new("Update Trip")
            .loading(self.loading)
            .focused(self.focus == Field::Submit)
            .frame(spinner_frame);
        frame.render_widget(button, layout[6]);

        if self.picker_open() {
            self.render_picker(frame, area);
        }
    }

    fn render_picker(&self, frame: &mut Frame, area: Rect) {
        let title = if self.form.show_start_calendar {
            " Start Date "
        } else {
            " End Date "
        };
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.picker_cursor.format("%a %b %d %Y").to_string(),
                theme::focused(),
            )),
            Line::from(""),
        ];
        if self.form.show_end_calendar {
            if let Some(min) = self.form.min_end_date() {
                lines.push(Line::from(Span::styled(
                    format!("Earliest: {}", min.format("%Y-%m-%d")),
                    theme::placeholder(),
                )));
            }
        }
        lines.push(Line::from(Span::styled(
            "←/→ day  ↑/↓ week  Enter pick  Esc close",
            theme::placeholder(),
        )));

        let popup = centered_rect(50, 40, area);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(ratatui::layout::Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Colors::THANOS))
                        .title(title),
                ),
            popup,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::screens::testing::{FakeApi, context, sample_trip};

    fn typed(screen: &mut EditTripScreen, ctx: &ScreenContext, text: &str) {
        for c in text.chars() {
            screen.update(Action::InputChar(c), ctx);
        }
    }

    #[test]
    fn test_mount_seeds_form_from_trip() {
        let screen = EditTripScreen::mount(sample_trip());
        assert_eq!(screen.form().name, "Paris Trip");
        assert_eq!(screen.form().fund_goal, "$ 500");
        assert_eq!(screen.focus(), Field::Name);
        assert!(!screen.is_loading());
    }

    #[tokio::test]
    async fn test_valid_submit_sends_exactly_one_update() {
        let api = Arc::new(FakeApi::default());
        let (ctx, mut rx) = context(api.clone());
        let mut screen = EditTripScreen::mount(sample_trip());

        assert_eq!(screen.submit(&ctx), Ok(SubmitOutcome::Started));
        assert!(screen.is_loading());
        assert_eq!(screen.submit(&ctx), Ok(SubmitOutcome::AlreadyInFlight));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.screen(), screen.id());
        let outcome = screen.handle_event(event);

        assert_eq!(outcome.navigation, Some(Navigation::Back));
        assert!(!screen.is_loading());

        let updates = api.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        let (token, trip_id, update) = &updates[0];
        assert_eq!(token, "tok");
        assert_eq!(trip_id, "t1");
        assert_eq!(update.fund_goals, 500);
        assert_eq!(update.owner, "u1");
    }

    #[tokio::test]
    async fn test_invalid_submit_reports_and_sends_nothing() {
        let api = Arc::new(FakeApi::default());
        let (ctx, _rx) = context(api.clone());
        let mut screen = EditTripScreen::mount(sample_trip());
        screen.update(Action::AddDestination, &ctx);

        assert_eq!(
            screen.submit(&ctx),
            Err(ValidationError::MissingDestination)
        );
        assert!(!screen.is_loading());
        assert!(api.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_on_submit_button_reports_validation() {
        let api = Arc::new(FakeApi::default());
        let (ctx, _rx) = context(api);
        let mut trip = sample_trip();
        trip.trip.name.clear();
        let mut screen = EditTripScreen::mount(trip);
        screen.focus = Field::Submit;

        let outcome = screen.update(Action::Confirm, &ctx);
        assert_eq!(
            outcome.report,
            Some(Report::Validation(ValidationError::MissingName))
        );
    }

    #[tokio::test]
    async fn test_failed_update_stays_on_screen() {
        let api = Arc::new(FakeApi {
            fail_updates: true,
            ..Default::default()
        });
        let (ctx, mut rx) = context(api);
        let mut screen = EditTripScreen::mount(sample_trip());

        screen.submit(&ctx).unwrap();
        let outcome = screen.handle_event(rx.recv().await.unwrap());

        assert_eq!(outcome.navigation, None);
        assert!(matches!(outcome.report, Some(Report::Network { .. })));
        assert!(!screen.is_loading());
    }

    #[tokio::test]
    async fn test_typing_edits_focused_fields() {
        let (ctx, _rx) = context(Arc::new(FakeApi::default()));
        let mut screen = EditTripScreen::mount(sample_trip());

        screen.update(Action::InputBackspace, &ctx);
        assert_eq!(screen.form().name, "Paris Tri");

        screen.update(Action::NextField, &ctx);
        assert_eq!(screen.focus(), Field::Destination(0));
        screen.update(Action::AddDestination, &ctx);
        assert_eq!(screen.focus(), Field::Destination(1));
        typed(&mut screen, &ctx, "lyon");
        assert_eq!(screen.form().destinations.get(1), Some("Lyon"));

        screen.update(Action::RemoveDestination, &ctx);
        assert_eq!(screen.form().destinations.len(), 1);
        assert_eq!(screen.focus(), Field::Destination(0));

        screen.focus = Field::FundGoal;
        typed(&mut screen, &ctx, "0x0");
        assert_eq!(screen.form().fund_goal, "$ 50,000");
    }

    #[tokio::test]
    async fn test_name_input_stops_at_cap() {
        let (ctx, _rx) = context(Arc::new(FakeApi::default()));
        let mut screen = EditTripScreen::mount(sample_trip());
        typed(&mut screen, &ctx, &"z".repeat(40));

        assert_eq!(screen.form().name.chars().count(), 25);
        assert_eq!(screen.form().chars_left(), 0);
    }

    #[tokio::test]
    async fn test_date_pickers_flow() {
        let (ctx, _rx) = context(Arc::new(FakeApi::default()));
        let mut screen = EditTripScreen::mount(sample_trip());
        screen.focus = Field::Period;

        screen.update(Action::Confirm, &ctx);
        assert!(screen.form().show_start_calendar);

        screen.update(Action::Right, &ctx);
        screen.update(Action::Confirm, &ctx);
        assert_eq!(screen.form().start_date, "2024-01-02");
        assert!(screen.form().show_end_calendar);

        screen.update(Action::Down, &ctx);
        screen.update(Action::Confirm, &ctx);
        assert_eq!(screen.form().end_date, "2024-01-17");
        assert!(!screen.form().show_end_calendar);
    }

    #[tokio::test]
    async fn test_end_picker_cannot_go_before_start() {
        let (ctx, _rx) = context(Arc::new(FakeApi::default()));
        let mut screen = EditTripScreen::mount(sample_trip());
        screen.focus = Field::Period;

        screen.update(Action::Confirm, &ctx);
        screen.update(Action::Confirm, &ctx);
        screen.update(Action::Up, &ctx);
        screen.update(Action::Up, &ctx);
        screen.update(Action::Confirm, &ctx);

        assert_eq!(screen.form().end_date, "2024-01-01");
    }

    #[tokio::test]
    async fn test_escape_navigates_back() {
        let (ctx, _rx) = context(Arc::new(FakeApi::default()));
        let mut screen = EditTripScreen::mount(sample_trip());
        assert_eq!(
            screen.update(Action::Cancel, &ctx).navigation,
            Some(Navigation::Back)
        );
    }
}
