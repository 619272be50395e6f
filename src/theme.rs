//! Shared color and text-weight tokens

use ratatui::style::{Color, Modifier, Style};

pub struct Colors;

impl Colors {
    pub const LIGHT: Color = Color::Rgb(0xf2, 0xf2, 0xf2);
    pub const THANOS: Color = Color::Rgb(0x7b, 0x61, 0xff);
    pub const VISION: Color = Color::Rgb(0x9e, 0x9e, 0xb8);
    pub const GREY_LIGHT: Color = Color::Rgb(0x3a, 0x3a, 0x48);
    pub const ERROR: Color = Color::Red;
    pub const SUCCESS: Color = Color::Green;
}

pub struct Fonts;

impl Fonts {
    pub const MAIN_REG: Modifier = Modifier::empty();
    pub const MAIN_SEMI: Modifier = Modifier::BOLD;
    pub const MAIN_BOLD: Modifier = Modifier::BOLD.union(Modifier::UNDERLINED);
}

pub fn label() -> Style {
    Style::default().fg(Colors::LIGHT).add_modifier(Fonts::MAIN_SEMI)
}

pub fn placeholder() -> Style {
    Style::default().fg(Colors::VISION).add_modifier(Fonts::MAIN_REG)
}

pub fn focused() -> Style {
    Style::default().fg(Colors::THANOS).add_modifier(Fonts::MAIN_SEMI)
}
