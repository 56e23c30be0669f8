use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinct symbols that can land on a reel.
pub const SYMBOL_COUNT: usize = 13;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Triangle,
    Diamond,
    Star,
    Circle,
    Clover,
    Lemon,
    Cherry,
    Gem,
    Grapes,
    Bell,
    MoneyBag,
    Apple,
    Pineapple,
}

impl Symbol {
    pub const ALL: [Symbol; SYMBOL_COUNT] = [
        Symbol::Triangle,
        Symbol::Diamond,
        Symbol::Star,
        Symbol::Circle,
        Symbol::Clover,
        Symbol::Lemon,
        Symbol::Cherry,
        Symbol::Gem,
        Symbol::Grapes,
        Symbol::Bell,
        Symbol::MoneyBag,
        Symbol::Apple,
        Symbol::Pineapple,
    ];

    pub fn from_index(i: u8) -> Self {
        Self::ALL[i as usize % SYMBOL_COUNT]
    }

    pub fn to_index(self) -> u8 {
        self as u8
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Triangle => "🔺",
            Symbol::Diamond => "🔶",
            Symbol::Star => "⭐",
            Symbol::Circle => "⚪",
            Symbol::Clover => "🍀",
            Symbol::Lemon => "🍋",
            Symbol::Cherry => "🍒",
            Symbol::Gem => "💎",
            Symbol::Grapes => "🍇",
            Symbol::Bell => "🔔",
            Symbol::MoneyBag => "💰",
            Symbol::Apple => "🍎",
            Symbol::Pineapple => "🍍",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}
