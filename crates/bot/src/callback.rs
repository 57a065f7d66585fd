//! Callback data carried by inline buttons.
//!
//! Buttons are built from [`Callback::data`] and incoming queries are
//! decoded with [`Callback::parse`], so both directions share one table.

use autokarma_core::rating::RatingLevel;

const RATE_PREFIX: &str = "karma_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    CheckKarma,
    RateDriver,
    TopCars,
    WorstCars,
    MyActivity,
    Help,
    MainMenu,
    /// Rate `plate` (already normalized) at `level`.
    Rate { level: RatingLevel, plate: String },
    /// Anything else, kept verbatim for logging.
    Unknown(String),
}

impl Callback {
    pub fn parse(data: &str) -> Self {
        match data {
            "check_karma" => Self::CheckKarma,
            "rate_driver" => Self::RateDriver,
            "top_cars" => Self::TopCars,
            "worst_cars" => Self::WorstCars,
            "my_activity" => Self::MyActivity,
            "help" => Self::Help,
            "main_menu" => Self::MainMenu,
            _ => Self::parse_rate(data).unwrap_or_else(|| Self::Unknown(data.to_string())),
        }
    }

    /// `karma_{level}_{plate}`.
    fn parse_rate(data: &str) -> Option<Self> {
        let (level, plate) = data.strip_prefix(RATE_PREFIX)?.split_once('_')?;
        let level = level.parse::<RatingLevel>().ok()?;
        if plate.is_empty() {
            return None;
        }
        Some(Self::Rate {
            level,
            plate: plate.to_string(),
        })
    }

    pub fn data(&self) -> String {
        match self {
            Self::CheckKarma => "check_karma".into(),
            Self::RateDriver => "rate_driver".into(),
            Self::TopCars => "top_cars".into(),
            Self::WorstCars => "worst_cars".into(),
            Self::MyActivity => "my_activity".into(),
            Self::Help => "help".into(),
            Self::MainMenu => "main_menu".into(),
            Self::Rate { level, plate } => format!("{RATE_PREFIX}{level}_{plate}"),
            Self::Unknown(data) => data.clone(),
        }
    }
}
