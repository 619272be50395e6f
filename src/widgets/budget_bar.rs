use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Gauge, Widget};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::currency;
use crate::theme::{self, Colors};

/// Collected funds against the trip's fund goal
#[derive(Debug, Clone, Copy)]
pub struct BudgetBar {
    collected: Decimal,
    goal: u64,
}

impl BudgetBar {
    pub fn new(collected: Decimal, goal: u64) -> Self {
        Self { collected, goal }
    }

    /// Progress in [0, 1]. A zero goal counts as complete once anything is collected.
    pub fn ratio(&self) -> f64 {
        if self.goal == 0 {
            return if self.collected > Decimal::ZERO { 1.0 } else { 0.0 };
        }
        let ratio = self.collected / Decimal::from(self.goal);
        ratio.to_f64().unwrap_or(0.0).clamp(0.0, 1.0)
    }

    pub fn label(&self) -> String {
        format!(
            "{} / {}",
            currency::format_amount(self.collected),
            currency::format_amount(Decimal::from(self.goal))
        )
    }
}

impl Widget for BudgetBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Budget ")
                    .title_style(theme::label()),
            )
            .gauge_style(Style::default().fg(Colors::THANOS).bg(Colors::GREY_LIGHT))
            .ratio(self.ratio())
            .label(self.label())
            .render(area, buf);
    }
}
