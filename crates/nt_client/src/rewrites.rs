use std::collections::HashMap;
use nt_core::{ArticleId, RewriteState};

static IDLE: RewriteState = RewriteState::Idle;

/// How a completion that is not the latest one issued for its article is
/// treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Every completion is applied; the one applied last wins.
    #[default]
    LastWriteWins,
    /// Only the completion of the most recently issued request is applied.
    DropStale,
}

/// Per-article rewrite states. Absent entries read as [`RewriteState::Idle`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewriteStates {
    states: HashMap<ArticleId, RewriteState>,
}

impl RewriteStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ArticleId) -> &RewriteState {
        self.states.get(&id).unwrap_or(&IDLE)
    }

    /// Stores `state` for `id` and returns the previous one.
    pub fn set(&mut self, id: ArticleId, state: RewriteState) -> RewriteState {
        match state {
            RewriteState::Idle => self.remove(id),
            state => self.states.insert(id, state).unwrap_or_default(),
        }
    }

    pub fn remove(&mut self, id: ArticleId) -> RewriteState {
        self.states.remove(&id).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Number of articles that are not idle.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.states.values().filter(|s| s.is_pending()).count()
    }
}

/// Handle for one issued rewrite request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteTicket {
    pub id: ArticleId,
    pub text: String,
    pub(crate) seq: u64,
    pub(crate) generation: u64,
}

impl RewriteTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}
