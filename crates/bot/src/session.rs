//! Per-user conversation state.
//!
//! Sessions live in memory only and are lost on restart. The store is
//! bounded: when full, the least recently touched session is evicted.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Number of bot message ids remembered per user.
pub const TRACKED_MESSAGES: usize = 5;

/// Default maximum number of live sessions.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// What the next free-text message from the user is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitingFor {
    /// A plate to show the karma of.
    PlateCheck,
    /// A plate to offer rating buttons for.
    PlateRate,
}

/// Ids of the bot's most recent messages to one user, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageHistory {
    ids: VecDeque<i64>,
}

impl MessageHistory {
    /// Remember `message_id`, ignoring duplicates and dropping the oldest
    /// id beyond [`TRACKED_MESSAGES`].
    pub fn track(&mut self, message_id: i64) {
        if self.ids.contains(&message_id) {
            return;
        }
        self.ids.push_back(message_id);
        if self.ids.len() > TRACKED_MESSAGES {
            self.ids.pop_front();
        }
    }

    pub fn last(&self) -> Option<i64> {
        self.ids.back().copied()
    }

    /// Forget and return every tracked id.
    pub fn take_all(&mut self) -> Vec<i64> {
        self.ids.drain(..).collect()
    }

    /// Forget every id except `keep` and return the forgotten ones.
    pub fn take_all_except(&mut self, keep: i64) -> Vec<i64> {
        let others = self.ids.iter().copied().filter(|id| *id != keep).collect();
        self.ids.clear();
        self.ids.push_back(keep);
        others
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub waiting_for: Option<WaitingFor>,
    pub messages: MessageHistory,
}

struct Entry {
    session: Session,
    touched: u64,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<i64, Entry>,
    clock: u64,
}

/// Bounded map from platform user id to [`Session`].
pub struct SessionStore {
    inner: Mutex<Sessions>,
    capacity: usize,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Sessions::default()),
            capacity: capacity.max(1),
        }
    }

    /// Run `f` on the user's session, creating it if needed.
    ///
    /// `f` runs under the store lock and must not block.
    pub fn update<R>(&self, user_id: i64, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let sessions = &mut *guard;
        sessions.clock += 1;
        let now = sessions.clock;

        if !sessions.entries.contains_key(&user_id) && sessions.entries.len() >= self.capacity {
            let oldest = sessions
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.touched)
                .map(|(id, _)| *id);
            if let Some(id) = oldest {
                sessions.entries.remove(&id);
                tracing::debug!(user_id = id, "Evicted least recently used session");
            }
        }

        let entry = sessions.entries.entry(user_id).or_insert_with(|| Entry {
            session: Session::default(),
            touched: now,
        });
        entry.touched = now;
        f(&mut entry.session)
    }

    /// Copy of the user's session, without touching it.
    pub fn get(&self, user_id: i64) -> Option<Session> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.entries.get(&user_id).map(|entry| entry.session.clone())
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
