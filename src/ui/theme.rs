//! Colors and glyphs for the counting screen.

use ratatui::style::{Color, Modifier, Style};

use crate::kernel::theme::ColorTag;

mod colors {
    use super::Color;

    pub const BG: Color = Color::Rgb(46, 26, 71);
    pub const PANEL: Color = Color::Rgb(255, 250, 240);
    pub const TITLE: Color = Color::Rgb(147, 51, 234); // purple-600
    pub const NUMERAL: Color = Color::Rgb(249, 115, 22); // orange-500
    pub const NUMERAL_BG: Color = Color::Rgb(254, 240, 138); // yellow-200
    pub const PROMPT: Color = Color::Rgb(31, 41, 55); // gray-800
    pub const BANNER: Color = Color::Rgb(34, 197, 94); // green-500
    pub const TILE: Color = Color::Rgb(243, 244, 246); // gray-100
    pub const TILE_TAPPED: Color = Color::Rgb(187, 247, 208); // green-200
    pub const DOT_DONE: Color = Color::Rgb(34, 197, 94);
    pub const DOT_CURRENT: Color = Color::Rgb(147, 51, 234);
    pub const DOT_PENDING: Color = Color::Rgb(209, 213, 219); // gray-300
    pub const BUTTON: Color = Color::Rgb(219, 39, 119); // pink-600
    pub const MUTED: Color = Color::Rgb(156, 163, 175);
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub panel: Color,
    pub title: Color,
    pub numeral: Color,
    pub numeral_bg: Color,
    pub prompt: Color,
    pub banner: Color,
    pub tile: Color,
    pub tile_tapped: Color,
    pub dot_done: Color,
    pub dot_current: Color,
    pub dot_pending: Color,
    pub button: Color,
    pub muted: Color,
    pub high_contrast: bool,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg: colors::BG,
            panel: colors::PANEL,
            title: colors::TITLE,
            numeral: colors::NUMERAL,
            numeral_bg: colors::NUMERAL_BG,
            prompt: colors::PROMPT,
            banner: colors::BANNER,
            tile: colors::TILE,
            tile_tapped: colors::TILE_TAPPED,
            dot_done: colors::DOT_DONE,
            dot_current: colors::DOT_CURRENT,
            dot_pending: colors::DOT_PENDING,
            button: colors::BUTTON,
            muted: colors::MUTED,
            high_contrast: false,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            panel: Color::Black,
            title: Color::White,
            numeral: Color::Yellow,
            numeral_bg: Color::Black,
            prompt: Color::White,
            banner: Color::Green,
            tile: Color::Black,
            tile_tapped: Color::Green,
            dot_done: Color::Green,
            dot_current: Color::White,
            dot_pending: Color::DarkGray,
            button: Color::Magenta,
            muted: Color::Gray,
            high_contrast: true,
        }
    }

    pub fn icon_color(&self, tag: ColorTag) -> Color {
        if self.high_contrast {
            return Color::White;
        }
        match tag {
            ColorTag::Yellow => Color::Rgb(250, 204, 21),
            ColorTag::Red => Color::Rgb(248, 113, 113),
            ColorTag::Blue => Color::Rgb(96, 165, 250),
            ColorTag::Green => Color::Rgb(74, 222, 128),
            ColorTag::Purple => Color::Rgb(192, 132, 252),
            ColorTag::Orange => Color::Rgb(251, 146, 60),
            ColorTag::Pink => Color::Rgb(244, 114, 182),
            ColorTag::White => Color::Rgb(229, 231, 235),
            ColorTag::Sky => Color::Rgb(147, 197, 253),
        }
    }

    pub fn confetti_color(&self, slot: u8) -> Color {
        match slot % 6 {
            0 => Color::Rgb(250, 204, 21),
            1 => Color::Rgb(248, 113, 113),
            2 => Color::Rgb(96, 165, 250),
            3 => Color::Rgb(74, 222, 128),
            4 => Color::Rgb(192, 132, 252),
            _ => Color::Rgb(244, 114, 182),
        }
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }
}

#[must_use]
pub fn palette(high_contrast: bool) -> Palette {
    if high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// Terminal glyph for a theme icon. All are double-width emoji.
pub fn glyph_for(icon: &str) -> &'static str {
    match icon {
        "star" => "⭐",
        "heart" => "💖",
        "circle" => "🔵",
        "apple" => "🍎",
        "fish" => "🐟",
        "square" => "🟧",
        "banana" => "🍌",
        "cat" => "🐱",
        "dog" => "🐶",
        "bird" => "🐦",
        _ => "❓",
    }
}

/// Key that taps tile `index`: 1-9 then 0.
pub fn key_label(index: usize) -> Option<char> {
    match index {
        0..=8 => char::from_digit(index as u32 + 1, 10),
        9 => Some('0'),
        _ => None,
    }
}
