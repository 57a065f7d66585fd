//! The karma ledger: daily rating limit plus aggregate/action bookkeeping.
//!
//! [`KarmaLedger`] owns the business rules and delegates persistence to a
//! [`KarmaStore`]. A rating goes through:
//!
//! 1. plate validation and level mapping ([`RatingLevel`]),
//! 2. the daily-limit check for `(plate, user, local day)`,
//! 3. [`KarmaStore::apply_rating`], which creates or increments the plate
//!    aggregate and appends the action.
//!
//! Step 3 is a single call so that stores backed by a transactional database
//! can make it atomic and re-check the daily limit under the row lock.

use async_trait::async_trait;
use chrono::{FixedOffset, Utc};

use crate::day_window::DayWindow;
use crate::error::{CoreError, StoreError};
use crate::plate::{self, PlateNumber};
use crate::rating::{ActionType, RatingLevel};
use crate::records::{HistoryEntry, PlateRecord, RankDirection};
use crate::types::{DbId, Timestamp};

/// Default size of the best/worst rankings.
pub const DEFAULT_TOP_LIMIT: i64 = 10;

/// Default number of actions fetched for a user's history.
pub const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// Maximum length of an optional rating description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// A validated rating ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRating {
    /// Normalized plate number.
    pub plate_number: String,
    pub user_id: DbId,
    pub action_type: ActionType,
    pub karma_change: i32,
    pub description: Option<String>,
    pub created_at: Timestamp,
    /// Local day of `created_at`, for stores that re-check the limit.
    pub window: DayWindow,
}

/// Result of [`KarmaStore::apply_rating`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingOutcome {
    /// Aggregate updated and action appended.
    Applied(PlateRecord),
    /// The store found an action for the same user, plate and day; nothing
    /// was written.
    AlreadyRatedToday,
}

/// Persistence collaborator for the ledger.
///
/// Plate arguments are always already normalized.
#[async_trait]
pub trait KarmaStore: Send + Sync {
    async fn find_plate(&self, plate_number: &str) -> Result<Option<PlateRecord>, StoreError>;

    /// Whether `user_id` has an action on `plate_number` created inside `window`.
    async fn has_action_in_window(
        &self,
        plate_number: &str,
        user_id: DbId,
        window: DayWindow,
    ) -> Result<bool, StoreError>;

    /// Create or increment the aggregate and append the action.
    async fn apply_rating(&self, rating: &NewRating) -> Result<RatingOutcome, StoreError>;

    async fn top_plates(
        &self,
        direction: RankDirection,
        limit: i64,
    ) -> Result<Vec<PlateRecord>, StoreError>;

    /// The user's actions, newest first.
    async fn user_history(&self, user_id: DbId, limit: i64)
        -> Result<Vec<HistoryEntry>, StoreError>;
}

/// Business rules for plate karma on top of a [`KarmaStore`].
pub struct KarmaLedger<S> {
    store: S,
    utc_offset: FixedOffset,
}

impl<S: KarmaStore> KarmaLedger<S> {
    /// `utc_offset` defines where local calendar days begin.
    pub fn new(store: S, utc_offset: FixedOffset) -> Self {
        Self { store, utc_offset }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Look up a plate's aggregate. Absence is a normal outcome.
    pub async fn lookup(&self, plate: &str) -> Result<Option<PlateRecord>, CoreError> {
        let normalized = plate::normalize(plate);
        self.store
            .find_plate(&normalized)
            .await
            .map_err(CoreError::Store)
    }

    /// Whether `user_id` already rated `plate` during the current local day.
    pub async fn has_rated_today(&self, plate: &str, user_id: DbId) -> Result<bool, CoreError> {
        self.has_rated_on(plate, user_id, Utc::now()).await
    }

    /// Whether `user_id` rated `plate` during the local day containing `now`.
    pub async fn has_rated_on(
        &self,
        plate: &str,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<bool, CoreError> {
        let normalized = plate::normalize(plate);
        let window = DayWindow::containing(now, self.utc_offset);
        self.store
            .has_action_in_window(&normalized, user_id, window)
            .await
            .map_err(CoreError::Store)
    }

    /// Apply a rating by `user_id` to `plate` and return the updated aggregate.
    ///
    /// Fails with [`CoreError::AlreadyRatedToday`] (and writes nothing) if
    /// the user already rated this plate today.
    pub async fn rate(
        &self,
        plate: &str,
        level: RatingLevel,
        user_id: DbId,
        description: Option<&str>,
    ) -> Result<PlateRecord, CoreError> {
        self.rate_at(plate, level, user_id, description, Utc::now())
            .await
    }

    /// [`rate`](Self::rate) with an explicit clock reading.
    pub async fn rate_at(
        &self,
        plate: &str,
        level: RatingLevel,
        user_id: DbId,
        description: Option<&str>,
        now: Timestamp,
    ) -> Result<PlateRecord, CoreError> {
        let plate = PlateNumber::parse(plate)?;
        let description = clean_description(description)?;

        if self.has_rated_on(plate.as_str(), user_id, now).await? {
            return Err(CoreError::AlreadyRatedToday {
                plate: plate.into_string(),
            });
        }

        let rating = NewRating {
            plate_number: plate.into_string(),
            user_id,
            action_type: level.action_type(),
            karma_change: level.karma_change(),
            description,
            created_at: now,
            window: DayWindow::containing(now, self.utc_offset),
        };

        match self
            .store
            .apply_rating(&rating)
            .await
            .map_err(CoreError::Store)?
        {
            RatingOutcome::Applied(record) => Ok(record),
            RatingOutcome::AlreadyRatedToday => Err(CoreError::AlreadyRatedToday {
                plate: rating.plate_number,
            }),
        }
    }

    /// Best (highest karma) or worst (lowest karma) plates, at most `n`.
    pub async fn top_plates(
        &self,
        n: i64,
        direction: RankDirection,
    ) -> Result<Vec<PlateRecord>, CoreError> {
        if n <= 0 {
            return Ok(Vec::new());
        }
        self.store
            .top_plates(direction, n)
            .await
            .map_err(CoreError::Store)
    }

    /// The user's most recent actions, newest first, at most `limit`.
    pub async fn user_history(
        &self,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<HistoryEntry>, CoreError> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        self.store
            .user_history(user_id, limit)
            .await
            .map_err(CoreError::Store)
    }
}

/// Trim the description; blank becomes `None`.
fn clean_description(description: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(text) = description.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let len = text.chars().count();
    if len > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters (got {len})"
        )));
    }
    Ok(Some(text.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
