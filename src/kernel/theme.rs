use serde::{Deserialize, Serialize};

/// One level's look and spoken name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeEntry {
    pub icon: &'static str,
    pub color: ColorTag,
    pub name: &'static str,
    pub plural: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Yellow,
    Red,
    Blue,
    Green,
    Purple,
    Orange,
    Pink,
    White,
    Sky,
}

/// Level N uses entry N-1.
pub const CATALOG: [ThemeEntry; 10] = [
    ThemeEntry { icon: "star", color: ColorTag::Yellow, name: "star", plural: "stars" },
    ThemeEntry { icon: "heart", color: ColorTag::Red, name: "heart", plural: "hearts" },
    ThemeEntry { icon: "circle", color: ColorTag::Blue, name: "circle", plural: "circles" },
    ThemeEntry { icon: "apple", color: ColorTag::Green, name: "apple", plural: "apples" },
    ThemeEntry { icon: "fish", color: ColorTag::Purple, name: "fish", plural: "fish" },
    ThemeEntry { icon: "square", color: ColorTag::Orange, name: "square", plural: "squares" },
    ThemeEntry { icon: "banana", color: ColorTag::Yellow, name: "banana", plural: "bananas" },
    ThemeEntry { icon: "cat", color: ColorTag::Pink, name: "cat", plural: "cats" },
    ThemeEntry { icon: "dog", color: ColorTag::White, name: "dog", plural: "dogs" },
    ThemeEntry { icon: "bird", color: ColorTag::Sky, name: "bird", plural: "birds" },
];

/// Theme for a 1-based level. Levels past the catalog clamp to the last entry.
pub fn entry_for(level: usize) -> &'static ThemeEntry {
    let idx = level.saturating_sub(1).min(CATALOG.len() - 1);
    &CATALOG[idx]
}

impl ThemeEntry {
    /// "3 stars", "1 star". Matches how the prompts and announcements read.
    pub fn counted(&self, n: usize) -> String {
        format!("{} {}", n, self.name_for(n))
    }

    pub fn name_for(&self, n: usize) -> &'static str {
        if n == 1 { self.name } else { self.plural }
    }
}
