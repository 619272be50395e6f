use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::action::Action;
use crate::api::{HttpTripApi, TripApi};
use crate::config::Config;
use crate::error::Result;
use crate::screens::{
    EditTripScreen, Navigation, Outcome, Report, Screen, ScreenContext, TaskEvent,
    TripBudgetScreen,
};
use crate::session::{Session, StaticSession};
use crate::state::{InputMode, State};
use crate::theme::Colors;
use crate::tui::{self, Tui};
use crate::widgets::{Toast, ToastWidget};

/// How often the spinner advances and expired toasts are swept
const TICK_RATE: Duration = Duration::from_millis(100);

/// Main application struct
pub struct App {
    ctx: ScreenContext,
    events_rx: mpsc::UnboundedReceiver<TaskEvent>,
    /// Navigation stack, top screen last
    screens: Vec<Screen>,
    state: State,
    last_tick: Instant,
    should_quit: bool,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let api: Arc<dyn TripApi> =
            Arc::new(HttpTripApi::new(config.base_url()?, config.timeout())?);
        let session: Arc<dyn Session> =
            Arc::new(StaticSession::new(&config.token, &config.owner_id));
        Self::with_collaborators(api, session, &config.trip_id, config.toast_network_errors).await
    }

    /// Load the trip and mount the budget screen on top of the given collaborators
    pub async fn with_collaborators(
        api: Arc<dyn TripApi>,
        session: Arc<dyn Session>,
        trip_id: &str,
        toast_network_errors: bool,
    ) -> Result<Self> {
        let (events, events_rx) = mpsc::unbounded_channel();
        let ctx = ScreenContext {
            api,
            session,
            events,
        };

        let (budget, startup_error) = match ctx.api.trip(&ctx.session.auth_token(), trip_id).await
        {
            Ok(trip) => {
                info!(trip_id, name = %trip.trip.name, "trip loaded");
                (TripBudgetScreen::mount(trip, &ctx), None)
            }
            Err(err) => (
                TripBudgetScreen::mount_pending(trip_id, &ctx),
                Some(err.to_string()),
            ),
        };

        let mut app = Self {
            ctx,
            events_rx,
            screens: vec![Screen::TripBudget(budget)],
            state: State::new(toast_network_errors),
            last_tick: Instant::now(),
            should_quit: false,
        };
        if let Some(error) = startup_error {
            app.report(Report::Network {
                context: "Failed to load Trip",
                error,
            });
        }
        Ok(app)
    }

    pub async fn run(&mut self) -> Result<()> {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = tui::restore();
            original_hook(panic_info);
        }));

        let mut terminal = tui::init()?;
        let result = self.run_loop(&mut terminal).await;
        tui::restore()?;
        result
    }

    async fn run_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            self.drain_events();
            self.draw(terminal)?;
            if let Some(action) = self.handle_events()? {
                self.update(action);
            }
            self.tick_if_due();
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Tick on wall-clock time so steady typing cannot starve it
    fn tick_if_due(&mut self) {
        if self.last_tick.elapsed() >= TICK_RATE {
            self.update(Action::Tick);
            self.last_tick = Instant::now();
        }
    }

    fn top(&self) -> Option<&Screen> {
        self.screens.last()
    }

    fn draw(&mut self, terminal: &mut Tui) -> Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(3),
                ])
                .split(area);

            self.draw_header(frame, layout[0]);
            if let Some(screen) = self.top() {
                screen.render(frame, layout[1], self.state.spinner_frame);
            }
            self.draw_footer(frame, layout[2]);

            if let Some(toast) = self.state.toasts.current() {
                let toast_area = bottom_right_rect(40, 3, layout[1]);
                frame.render_widget(ToastWidget::new(toast), toast_area);
            }

            if self.state.show_help {
                self.draw_help_overlay(frame, area);
            }
        })?;
        Ok(())
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = self
            .screens
            .iter()
            .map(|s| Line::from(format!(" {} ", s.kind())))
            .collect();

        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Tripfund "),
            )
            .divider(" > ")
            .select(self.screens.len().saturating_sub(1))
            .highlight_style(
                Style::default()
                    .fg(Colors::THANOS)
                    .add_modifier(Modifier::BOLD),
            );

        frame.render_widget(tabs, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let mode_str = match self.state.input_mode {
            InputMode::Normal => "NORMAL",
            InputMode::Insert => "EDIT",
        };

        let status = self
            .state
            .status_message
            .clone()
            .unwrap_or_else(|| "Ready".to_string());

        let hints = match self.state.input_mode {
            InputMode::Normal => "e edit | r refresh | v view all | ? help",
            InputMode::Insert => "Tab next | Enter select | Esc back",
        };

        let footer_text = Line::from(vec![
            Span::styled(
                format!(" {} ", mode_str),
                Style::default()
                    .bg(Colors::THANOS)
                    .fg(Colors::LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(status, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(hints, Style::default().fg(Color::DarkGray)),
        ]);

        let footer = Paragraph::new(footer_text).block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, area);
    }

    fn draw_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from("Trip Budget:"),
            Line::from("  e              Edit trip"),
            Line::from("  r              Reload trip and payments"),
            Line::from("  v              Toggle all payments"),
            Line::from(""),
            Line::from("Edit Trip:"),
            Line::from("  Tab/Shift+Tab  Move between fields"),
            Line::from("  Enter          Select / submit"),
            Line::from("  Ctrl+a         Add destination"),
            Line::from("  Ctrl+d         Remove destination"),
            Line::from("  Esc            Back"),
            Line::from(""),
            Line::from("General:"),
            Line::from("  ?              Toggle help"),
            Line::from("  q / Ctrl+c     Quit application"),
        ];

        let help_block = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help ")
                    .style(Style::default().bg(Color::DarkGray)),
            )
            .alignment(Alignment::Left);

        let popup_area = centered_rect(50, 70, area);
        frame.render_widget(Clear, popup_area);
        frame.render_widget(help_block, popup_area);
    }

    fn handle_events(&mut self) -> Result<Option<Action>> {
        if event::poll(TICK_RATE.saturating_sub(self.last_tick.elapsed()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(None);
                }

                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(Some(Action::Quit));
                }

                if self.state.show_help {
                    return Ok(match key.code {
                        KeyCode::Char('?') | KeyCode::Esc => Some(Action::ToggleHelp),
                        _ => None,
                    });
                }

                match self.state.input_mode {
                    InputMode::Normal => return Ok(Self::handle_normal_mode(key)),
                    InputMode::Insert => return Ok(Self::handle_insert_mode(key)),
                }
            }
        }
        Ok(None)
    }

    fn handle_normal_mode(key: event::KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Char('e') | KeyCode::Enter => Some(Action::EditTrip),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('v') => Some(Action::ToggleViewAll),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
            _ => None,
        }
    }

    fn handle_insert_mode(key: event::KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Confirm),
            KeyCode::BackTab => Some(Action::PrevField),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Action::PrevField)
            }
            KeyCode::Tab => Some(Action::NextField),
            KeyCode::Char('a') if ctrl => Some(Action::AddDestination),
            KeyCode::Char('d') if ctrl => Some(Action::RemoveDestination),
            KeyCode::Char(c) if !ctrl => Some(Action::InputChar(c)),
            KeyCode::Backspace => Some(Action::InputBackspace),
            KeyCode::Up => Some(Action::Up),
            KeyCode::Down => Some(Action::Down),
            KeyCode::Left => Some(Action::Left),
            KeyCode::Right => Some(Action::Right),
            _ => None,
        }
    }

    fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Tick => {
                self.state.tick();
            }
            Action::ToggleHelp => {
                self.state.show_help = !self.state.show_help;
            }
            action => {
                let Some(screen) = self.screens.last_mut() else {
                    return;
                };
                let outcome = screen.update(action, &self.ctx);
                self.apply(outcome);
            }
        }
    }

    /// Pull in every completed background task without blocking
    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: TaskEvent) {
        let id = event.screen();
        let outcome = match self.screens.iter_mut().find(|s| s.id() == id) {
            Some(screen) => screen.handle_event(event),
            None => {
                debug!(
                    event = <&str>::from(&event),
                    "dropping completion for unmounted screen"
                );
                return;
            }
        };
        self.apply(outcome);
    }

    fn apply(&mut self, outcome: Outcome) {
        if let Some(navigation) = outcome.navigation {
            self.navigate(navigation);
        }
        if let Some(report) = outcome.report {
            self.report(report);
        }
    }

    fn navigate(&mut self, navigation: Navigation) {
        match navigation {
            Navigation::Back => {
                if self.screens.len() <= 1 {
                    return;
                }
                // Dropping the screen cancels whatever it still had in flight
                self.screens.pop();
                if let Some(Screen::TripBudget(budget)) = self.screens.last_mut() {
                    budget.refresh(&self.ctx);
                }
            }
            Navigation::EditTrip(trip) => {
                self.screens
                    .push(Screen::EditTrip(EditTripScreen::mount(trip)));
            }
        }
        if let Some(screen) = self.top() {
            self.state.input_mode = screen.input_mode();
        }
        self.state.clear_status();
    }

    /// Single sink for everything the user may need to know about
    fn report(&mut self, report: Report) {
        match report {
            Report::Validation(err) => {
                self.state.toasts.replace(Toast::error(err.to_string()));
            }
            Report::Network { context, error } => {
                error!(%error, "{}", context);
                if self.state.toast_network_errors {
                    self.state.toasts.replace(Toast::error(context));
                }
            }
            Report::Success(message) => {
                info!("{}", message);
                self.state.toasts.replace(Toast::success(message.clone()));
                self.state.set_status(message);
            }
        }
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn bottom_right_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + r.width - width,
        r.y + r.height - height,
        width,
        height,
    )
}
