//! Inline keyboards shown by the bot.

use autokarma_core::rating::RatingLevel;
use autokarma_telegram::keyboard::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::callback::Callback;

fn button(text: &str, callback: Callback) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, callback.data())
}

pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new()
        .row([
            button("🔍 Check karma", Callback::CheckKarma),
            button("📝 Rate a driver", Callback::RateDriver),
        ])
        .row([
            button("🏆 Best drivers", Callback::TopCars),
            button("💩 Worst drivers", Callback::WorstCars),
        ])
        .row([
            button("📈 My activity", Callback::MyActivity),
            button("ℹ️ Help", Callback::Help),
        ])
}

pub fn back_to_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new().row([button("🔙 Main menu", Callback::MainMenu)])
}

/// Label of the button for `level`.
pub fn rating_label(level: RatingLevel) -> &'static str {
    match level {
        RatingLevel::Excellent => "😇 Excellent (+3)",
        RatingLevel::Positive => "👍 Good (+1)",
        RatingLevel::Negative => "👎 Bad (-1)",
        RatingLevel::Terrible => "😡 Terrible (-3)",
    }
}

/// The four rating buttons for `plate`, two per row, plus a back button.
pub fn rating_options(plate: &str) -> InlineKeyboardMarkup {
    let rate = |level| {
        button(
            rating_label(level),
            Callback::Rate {
                level,
                plate: plate.to_string(),
            },
        )
    };
    InlineKeyboardMarkup::new()
        .row([rate(RatingLevel::Excellent), rate(RatingLevel::Positive)])
        .row([rate(RatingLevel::Negative), rate(RatingLevel::Terrible)])
        .row([button("🔙 Back", Callback::MainMenu)])
}
