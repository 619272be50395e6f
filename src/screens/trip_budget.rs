use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::{Navigation, Outcome, Report, ScreenContext, TaskEvent};
use crate::action::Action;
use crate::currency;
use crate::models::{PaymentQuery, PaymentRecord, TripDetails};
use crate::scope::{MountScope, ScreenId};
use crate::theme::{self, Colors, Fonts};
use crate::widgets::BudgetBar;

/// Payments shown before "View All" is toggled
const RECENT_LIMIT: usize = 5;

pub struct TripBudgetScreen {
    trip: TripDetails,
    /// Newest first
    payments: Vec<PaymentRecord>,
    show_all: bool,
    /// False until the trip details have arrived at least once
    trip_loaded: bool,
    /// Bumped on every fetch; completions from older fetches are ignored
    generation: u64,
    scope: MountScope,
}

impl TripBudgetScreen {
    /// Mount the screen and start the payment history fetch
    pub fn mount(trip: TripDetails, ctx: &ScreenContext) -> Self {
        let mut screen = Self::unmounted(trip, true);
        screen.generation += 1;
        screen.fetch_payments(ctx);
        screen
    }

    /// Mount before the trip is known; loads the trip and its payments
    pub fn mount_pending(trip_id: &str, ctx: &ScreenContext) -> Self {
        let mut screen = Self::unmounted(TripDetails::pending(trip_id), false);
        screen.refresh(ctx);
        screen
    }

    fn unmounted(trip: TripDetails, trip_loaded: bool) -> Self {
        Self {
            trip,
            payments: Vec::new(),
            show_all: false,
            trip_loaded,
            generation: 0,
            scope: MountScope::new(),
        }
    }

    pub fn id(&self) -> ScreenId {
        self.scope.id()
    }

    pub fn trip(&self) -> &TripDetails {
        &self.trip
    }

    pub fn is_trip_loaded(&self) -> bool {
        self.trip_loaded
    }

    pub fn payments(&self) -> &[PaymentRecord] {
        &self.payments
    }

    pub fn visible_payments(&self) -> &[PaymentRecord] {
        if self.show_all {
            &self.payments
        } else {
            &self.payments[..self.payments.len().min(RECENT_LIMIT)]
        }
    }

    pub fn collected(&self) -> Decimal {
        self.payments.iter().filter_map(|p| p.amount).sum()
    }

    fn fetch_payments(&mut self, ctx: &ScreenContext) {
        let api = ctx.api.clone();
        let events = ctx.events.clone();
        let token = ctx.session.auth_token();
        let trip_id = self.trip.trip.id.clone();
        let screen = self.id();
        let generation = self.generation;

        self.scope.spawn(async move {
            let result = api
                .payments(&token, &trip_id, PaymentQuery::default())
                .await;
            let _ = events.send(TaskEvent::PaymentsLoaded {
                screen,
                generation,
                result,
            });
        });
    }

    /// Reload the trip itself, then its payments
    pub fn refresh(&mut self, ctx: &ScreenContext) {
        self.generation += 1;
        let api = ctx.api.clone();
        let events = ctx.events.clone();
        let token = ctx.session.auth_token();
        let trip_id = self.trip.trip.id.clone();
        let screen = self.id();
        let generation = self.generation;

        self.scope.spawn(async move {
            let result = api.trip(&token, &trip_id).await;
            let _ = events.send(TaskEvent::TripLoaded {
                screen,
                generation,
                result,
            });
        });
        self.fetch_payments(ctx);
    }

    pub fn handle_event(&mut self, event: TaskEvent) -> Outcome {
        match event {
            TaskEvent::PaymentsLoaded { generation, .. }
            | TaskEvent::TripLoaded { generation, .. }
                if generation != self.generation =>
            {
                debug!(generation, current = self.generation, "ignoring superseded fetch");
                Outcome::none()
            }
            TaskEvent::PaymentsLoaded { result, .. } => match result {
                Ok(mut docs) => {
                    docs.reverse();
                    info!(count = docs.len(), "payments loaded");
                    self.payments = docs;
                    Outcome::none()
                }
                Err(err) => Outcome::report(Report::Network {
                    context: "Failed to load payments",
                    error: err.to_string(),
                }),
            },
            TaskEvent::TripLoaded { result, .. } => match result {
                Ok(details) => {
                    self.trip = details;
                    self.trip_loaded = true;
                    Outcome::none()
                }
                Err(err) => Outcome::report(Report::Network {
                    context: "Failed to reload Trip",
                    error: err.to_string(),
                }),
            },
            TaskEvent::TripUpdated { .. } => Outcome::none(),
        }
    }

    pub fn update(&mut self, action: Action, ctx: &ScreenContext) -> Outcome {
        match action {
            Action::EditTrip if self.trip_loaded => {
                return Outcome::navigate(Navigation::EditTrip(self.trip.clone()));
            }
            Action::Refresh => self.refresh(ctx),
            Action::ToggleViewAll => self.show_all = !self.show_all,
            _ => {}
        }
        Outcome::none()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let trip = &self.trip.trip;
        let destinations = trip
            .destinations
            .iter()
            .filter(|d| !d.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        let summary_line = if self.trip_loaded {
            Line::from(vec![
                Span::styled(format!("{}  ", trip.name), theme::label()),
                Span::styled(destinations, Style::default().fg(Colors::VISION)),
            ])
        } else {
            Line::from(Span::styled("Loading trip... (r to retry)", theme::placeholder()))
        };
        let summary = Paragraph::new(summary_line)
        .block(Block::default().borders(Borders::ALL).title(" Trip "));
        frame.render_widget(summary, layout[0]);

        frame.render_widget(BudgetBar::new(self.collected(), trip.fund_goal), layout[1]);

        let header = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(16)])
            .split(layout[2]);
        frame.render_widget(
            Paragraph::new("Recent Activity").style(theme::label()),
            header[0],
        );
        let toggle = if self.show_all { "[v] Recent" } else { "[v] View All" };
        frame.render_widget(
            Paragraph::new(toggle)
                .style(Style::default().fg(Colors::THANOS).add_modifier(Fonts::MAIN_BOLD))
                .alignment(Alignment::Right),
            header[1],
        );

        let items: Vec<ListItem> = self
            .visible_payments()
            .iter()
            .map(|p| {
                let amount = p
                    .amount
                    .map(currency::format_amount)
                    .unwrap_or_else(|| "-".to_string());
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<12}", p.date().unwrap_or("")),
                        Style::default().fg(Colors::VISION),
                    ),
                    Span::raw(" | "),
                    Span::styled(format!("{:<24}", p.label()), Style::default().fg(Colors::LIGHT)),
                    Span::raw(" | "),
                    Span::styled(format!("{:>12}", amount), Style::default().fg(Colors::SUCCESS)),
                ]))
            })
            .collect();
        let list = if items.is_empty() {
            List::new(vec![ListItem::new("No payments yet").style(theme::placeholder())])
        } else {
            List::new(items)
        };
        frame.render_widget(list.block(Block::default().borders(Borders::ALL)), layout[3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rust_decimal_macros::dec;

    use crate::screens::testing::{FakeApi, context, sample_trip};

    fn record(id: &str, amount: Decimal) -> PaymentRecord {
        PaymentRecord {
            id: Some(id.into()),
            amount: Some(amount),
            ..Default::default()
        }
    }

    fn ids(payments: &[PaymentRecord]) -> Vec<String> {
        payments.iter().filter_map(|p| p.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_mount_fetches_first_page_and_reverses() {
        let api = Arc::new(FakeApi::default());
        *api.payments.lock().unwrap() = Some(vec![
            record("a", dec!(10)),
            record("b", dec!(20)),
            record("c", dec!(30)),
        ]);
        let (ctx, mut rx) = context(api.clone());

        let mut screen = TripBudgetScreen::mount(sample_trip(), &ctx);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.screen(), screen.id());
        screen.handle_event(event);

        assert_eq!(ids(screen.payments()), vec!["c", "b", "a"]);
        assert_eq!(screen.collected(), dec!(60));

        let calls = api.payment_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "tok");
        assert_eq!(calls[0].1, "t1");
        assert_eq!(calls[0].2, PaymentQuery { page: 1, limit: 100 });
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_list_empty() {
        let api = Arc::new(FakeApi::default());
        let (ctx, mut rx) = context(api);

        let mut screen = TripBudgetScreen::mount(sample_trip(), &ctx);
        let outcome = screen.handle_event(rx.recv().await.unwrap());

        assert!(screen.payments().is_empty());
        assert!(matches!(outcome.report, Some(Report::Network { .. })));
        assert_eq!(outcome.navigation, None);
    }

    #[tokio::test]
    async fn test_view_all_toggle() {
        let api = Arc::new(FakeApi::default());
        *api.payments.lock().unwrap() =
            Some((0..8).map(|i| record(&i.to_string(), dec!(1))).collect());
        let (ctx, mut rx) = context(api);

        let mut screen = TripBudgetScreen::mount(sample_trip(), &ctx);
        screen.handle_event(rx.recv().await.unwrap());
        assert_eq!(screen.visible_payments().len(), RECENT_LIMIT);

        screen.update(Action::ToggleViewAll, &ctx);
        assert_eq!(screen.visible_payments().len(), 8);
        assert_eq!(screen.visible_payments()[0].id.as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn test_edit_hands_trip_over() {
        let (ctx, _rx) = context(Arc::new(FakeApi::default()));
        let mut screen = TripBudgetScreen::mount(sample_trip(), &ctx);

        let outcome = screen.update(Action::EditTrip, &ctx);
        assert_eq!(
            outcome.navigation,
            Some(Navigation::EditTrip(sample_trip()))
        );
    }

    #[tokio::test]
    async fn test_refresh_reloads_trip() {
        let api = Arc::new(FakeApi::default());
        let mut renamed = sample_trip();
        renamed.trip.name = "Lyon Trip".into();
        *api.trip.lock().unwrap() = Some(renamed.clone());
        *api.payments.lock().unwrap() = Some(Vec::new());
        let (ctx, mut rx) = context(api);

        let mut screen = TripBudgetScreen::mount(sample_trip(), &ctx);
        screen.update(Action::Refresh, &ctx);
        for _ in 0..3 {
            let event = rx.recv().await.unwrap();
            screen.handle_event(event);
        }

        assert_eq!(screen.trip(), &renamed);
    }

    #[tokio::test]
    async fn test_superseded_fetch_is_ignored() {
        let (ctx, _rx) = context(Arc::new(FakeApi::default()));
        let mut screen = TripBudgetScreen::mount(sample_trip(), &ctx);
        screen.update(Action::Refresh, &ctx);

        screen.handle_event(TaskEvent::PaymentsLoaded {
            screen: screen.id(),
            generation: 2,
            result: Ok(vec![record("new", dec!(5))]),
        });
        let outcome = screen.handle_event(TaskEvent::PaymentsLoaded {
            screen: screen.id(),
            generation: 1,
            result: Ok(vec![record("old", dec!(1))]),
        });
        assert_eq!(outcome, Outcome::none());
        assert_eq!(ids(screen.payments()), vec!["new"]);

        let outcome = screen.handle_event(TaskEvent::TripLoaded {
            screen: screen.id(),
            generation: 1,
            result: Err(crate::error::AppError::Config("stale".into())),
        });
        assert_eq!(outcome.report, None);
        assert_eq!(screen.trip(), &sample_trip());
    }

    #[tokio::test]
    async fn test_pending_mount_loads_trip_before_editing() {
        let api = Arc::new(FakeApi::default());
        *api.trip.lock().unwrap() = Some(sample_trip());
        *api.payments.lock().unwrap() = Some(Vec::new());
        let (ctx, mut rx) = context(api);

        let mut screen = TripBudgetScreen::mount_pending("t1", &ctx);
        assert!(!screen.is_trip_loaded());
        assert_eq!(screen.update(Action::EditTrip, &ctx), Outcome::none());

        for _ in 0..2 {
            let event = rx.recv().await.unwrap();
            screen.handle_event(event);
        }

        assert!(screen.is_trip_loaded());
        assert_eq!(
            screen.update(Action::EditTrip, &ctx).navigation,
            Some(Navigation::EditTrip(sample_trip()))
        );
    }
}
