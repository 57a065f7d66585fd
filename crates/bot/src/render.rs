//! Screens shown to the user.
//!
//! Every function is pure: it turns ledger data into an [`OutgoingMessage`]
//! (Markdown text plus keyboard). Plate numbers reach these functions only
//! after validation, so they never contain Markdown control characters.

use std::fmt::Write;

use autokarma_core::rating::{ActionType, RatingLevel};
use autokarma_core::records::{HistoryEntry, PlateRecord, RankDirection};
use autokarma_telegram::OutgoingMessage;
use chrono::FixedOffset;

use crate::keyboards;
use crate::session::WaitingFor;

/// Entries shown on the activity screen.
pub const ACTIVITY_SHOWN: usize = 10;

/// 😊 for positive karma, 😞 for negative, 😐 for zero.
pub fn karma_emoji(karma: i32) -> &'static str {
    match karma.signum() {
        1 => "😊",
        -1 => "😞",
        _ => "😐",
    }
}

/// `+3`, `-1`, `0`.
pub fn signed(change: i32) -> String {
    if change > 0 {
        format!("+{change}")
    } else {
        change.to_string()
    }
}

/// 🥇🥈🥉 for the first three places, `n.` afterwards.
pub fn medal(index: usize) -> String {
    match index {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        n => format!("{}.", n + 1),
    }
}

pub fn main_menu() -> OutgoingMessage {
    OutgoingMessage::markdown(
        "🚗 *Welcome to AutoKarma!*\n\n\
         Rate drivers and check the karma of cars by their plate numbers.\n\n\
         *How it works:*\n\
         • Send a plate number to check its karma\n\
         • Rate the driver from very good (+3) to very bad (-3)\n\
         • Browse the best and worst drivers\n\n\
         Choose an action:",
    )
    .with_keyboard(keyboards::main_menu())
}

pub fn help() -> OutgoingMessage {
    OutgoingMessage::markdown(
        "ℹ️ *Help*\n\n\
         *What is AutoKarma?*\n\
         A reputation board for drivers, keyed by plate number. You can:\n\n\
         🔍 *Check karma*: see a driver's reputation\n\
         📝 *Rate a driver*: add a good or bad rating\n\
         🏆 *Browse rankings*: the best and worst drivers\n\n\
         *Rating scale:*\n\
         😇 Excellent: +3 karma\n\
         👍 Good: +1 karma\n\
         👎 Bad: -1 karma\n\
         😡 Terrible: -3 karma\n\n\
         You can rate each plate once per day.\n\n\
         *Plate formats:*\n\
         • А123ВС77 (Russian regional)\n\
         • M456KX199 (Latin letters)\n\
         • Case and spaces are ignored",
    )
    .with_keyboard(keyboards::back_to_menu())
}

/// Ask for a plate number.
pub fn plate_prompt(purpose: WaitingFor) -> OutgoingMessage {
    let title = match purpose {
        WaitingFor::PlateCheck => "🔍 *Check a car's karma*\n\nSend the plate number to look up.",
        WaitingFor::PlateRate => "📝 *Rate a driver*\n\nSend the plate number of the car you want to rate.",
    };
    OutgoingMessage::markdown(format!(
        "{title}\n\n\
         *Examples:*\n\
         • А123ВС77\n\
         • M456KX199\n\
         • a123bc77 (case does not matter)"
    ))
    .with_keyboard(keyboards::back_to_menu())
}

pub fn invalid_plate() -> OutgoingMessage {
    OutgoingMessage::plain(
        "❌ Invalid plate number format. Try again or return to the main menu.",
    )
    .with_keyboard(keyboards::back_to_menu())
}

/// A plate's karma with rating buttons. `record` is `None` for a plate
/// nobody has rated yet.
pub fn karma_card(plate: &str, record: Option<&PlateRecord>) -> OutgoingMessage {
    let text = match record {
        Some(record) => format!(
            "🚗 *Plate:* `{}`\n\n\
             {} *Karma:* {}\n\n\
             📊 *Ratings:*\n\
             👍 Positive: {}\n\
             👎 Negative: {}\n\n\
             *Want to rate this driver?*",
            record.plate_number,
            karma_emoji(record.karma),
            record.karma,
            record.total_positive,
            record.total_negative,
        ),
        None => format!(
            "🚗 *Plate:* `{plate}`\n\n\
             😐 *Karma:* 0 (new car)\n\n\
             Nobody has rated this driver yet.\n\n\
             *Want to be the first?*"
        ),
    };
    let plate = record.map_or(plate, |r| r.plate_number.as_str());
    OutgoingMessage::markdown(text).with_keyboard(keyboards::rating_options(plate))
}

pub fn rating_options(plate: &str) -> OutgoingMessage {
    OutgoingMessage::markdown(format!(
        "📝 *Rate a driver*\n\n\
         🚗 *Plate:* `{plate}`\n\n\
         How would you rate this driver's behavior?"
    ))
    .with_keyboard(keyboards::rating_options(plate))
}

pub fn rating_applied(record: &PlateRecord, level: RatingLevel) -> OutgoingMessage {
    let kind = match level {
        RatingLevel::Excellent => "an excellent",
        RatingLevel::Positive => "a positive",
        RatingLevel::Negative => "a negative",
        RatingLevel::Terrible => "a terrible",
    };
    OutgoingMessage::markdown(format!(
        "✅ *Rating added!*\n\n\
         🚗 *Plate:* `{}`\n\
         📊 *Karma:* {} {}\n\n\
         You gave {kind} rating ({}).\n\n\
         Thanks for taking part! 🙏",
        record.plate_number,
        record.karma,
        karma_emoji(record.karma),
        signed(level.karma_change()),
    ))
    .with_keyboard(keyboards::back_to_menu())
}

pub fn already_rated(plate: &str) -> OutgoingMessage {
    OutgoingMessage::markdown(format!(
        "⏰ *Already rated today*\n\n\
         🚗 *Plate:* `{plate}`\n\n\
         You have already rated this car today. Try again tomorrow or rate another plate.\n\n\
         *Limit:* one rating per plate per day."
    ))
    .with_keyboard(keyboards::back_to_menu())
}

pub fn ranking(direction: RankDirection, plates: &[PlateRecord]) -> OutgoingMessage {
    if plates.is_empty() {
        return OutgoingMessage::plain("No cars have been rated yet.")
            .with_keyboard(keyboards::back_to_menu());
    }

    let mut text = match direction {
        RankDirection::Best => String::from("🏆 *Best drivers:*\n\n"),
        RankDirection::Worst => String::from("💩 *Worst drivers:*\n\n"),
    };
    for (i, plate) in plates.iter().enumerate() {
        let place = match direction {
            RankDirection::Best => medal(i),
            RankDirection::Worst => format!("{}.", i + 1),
        };
        let _ = writeln!(
            text,
            "{place} `{}`: {} {}",
            plate.plate_number,
            plate.karma,
            karma_emoji(plate.karma)
        );
    }
    OutgoingMessage::markdown(text).with_keyboard(keyboards::back_to_menu())
}

/// The first [`ACTIVITY_SHOWN`] entries of `history` with local dates, plus
/// a count of the rest.
pub fn activity(history: &[HistoryEntry], offset: FixedOffset) -> OutgoingMessage {
    if history.is_empty() {
        return OutgoingMessage::plain("You have no activity yet. Start rating drivers!")
            .with_keyboard(keyboards::back_to_menu());
    }

    let mut text = String::from("📈 *Your activity:*\n\n");
    for entry in history.iter().take(ACTIVITY_SHOWN) {
        let emoji = match entry.action.action_type {
            ActionType::Positive => "👍",
            ActionType::Negative => "👎",
        };
        let date = entry.action.created_at.with_timezone(&offset).format("%d.%m.%Y");
        let _ = writeln!(
            text,
            "{emoji} `{}` ({}) {date}",
            entry.plate_number,
            signed(entry.action.karma_change)
        );
    }
    if history.len() > ACTIVITY_SHOWN {
        let _ = write!(text, "\n... and {} more", history.len() - ACTIVITY_SHOWN);
    }
    OutgoingMessage::markdown(text).with_keyboard(keyboards::back_to_menu())
}

/// Shown when an update could not be processed.
pub fn failure() -> OutgoingMessage {
    OutgoingMessage::plain("❌ Something went wrong. Please try again later.")
        .with_keyboard(keyboards::back_to_menu())
}

pub fn unknown_command() -> OutgoingMessage {
    OutgoingMessage::plain("❌ Unknown command. Try /start")
}
