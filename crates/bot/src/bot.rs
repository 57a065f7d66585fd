use autokarma_core::ledger::KarmaLedger;
use autokarma_db::models::user::User;
use autokarma_db::{DbPool, PgKarmaStore};
use chrono::FixedOffset;

use crate::chat::ChatApi;
use crate::session::SessionStore;

/// Shared bot state. One instance serves every chat; wrap it in an `Arc`
/// to share it between the delivery loop and spawned webhook tasks.
pub struct Bot<C> {
    chat: C,
    pool: DbPool,
    ledger: KarmaLedger<PgKarmaStore>,
    sessions: SessionStore,
}

/// Who and where an update came from.
#[derive(Debug, Clone)]
pub struct UpdateContext {
    pub chat_id: i64,
    /// Platform id of the sender; keys the session.
    pub telegram_id: i64,
    /// The registered user, if registration succeeded.
    pub user: Option<User>,
    /// The message whose button was pressed, for callback queries.
    pub callback_message_id: Option<i64>,
}

impl<C: ChatApi> Bot<C> {
    /// * `utc_offset` - where calendar days begin for the daily rating limit.
    /// * `session_capacity` - maximum number of in-memory sessions.
    pub fn new(chat: C, pool: DbPool, utc_offset: FixedOffset, session_capacity: usize) -> Self {
        let ledger = KarmaLedger::new(PgKarmaStore::new(pool.clone()), utc_offset);
        Self {
            chat,
            pool,
            ledger,
            sessions: SessionStore::new(session_capacity),
        }
    }

    pub fn chat(&self) -> &C {
        &self.chat
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn ledger(&self) -> &KarmaLedger<PgKarmaStore> {
        &self.ledger
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
