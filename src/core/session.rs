use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::core::error::{Ineligibility, MatchError};
use crate::core::matcher::Matcher;
use crate::models::{Match, Person, Side};

/// Lifecycle of a session's most recent batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No person with id {id} in pool {side:?}")]
    UnknownPerson { side: Side, id: String },

    #[error("Person {id} in pool {side:?} is already matched")]
    AlreadyMatched { side: Side, id: String },

    #[error("Pair is not eligible: {0}")]
    Ineligible(#[from] Ineligibility),

    #[error("Batch run failed: {0}")]
    Batch(#[from] MatchError),
}

/// Caller-owned matching workspace
///
/// Holds both pools, the current matches and who is still unmatched. Every
/// operation keeps the invariant that each person is either in exactly one
/// match or in their pool's unmatched list. There is no internal locking;
/// callers sharing a session must serialize access themselves.
#[derive(Debug, Clone)]
pub struct MatchingSession {
    matcher: Matcher,
    pool_a: Vec<Person>,
    pool_b: Vec<Person>,
    matches: Vec<Match>,
    unmatched_a: Vec<Person>,
    unmatched_b: Vec<Person>,
    state: SessionState,
}

impl MatchingSession {
    pub fn new(matcher: Matcher, pool_a: Vec<Person>, pool_b: Vec<Person>) -> Self {
        Self {
            matcher,
            unmatched_a: pool_a.clone(),
            unmatched_b: pool_b.clone(),
            pool_a,
            pool_b,
            matches: Vec::new(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn unmatched_a(&self) -> &[Person] {
        &self.unmatched_a
    }

    pub fn unmatched_b(&self) -> &[Person] {
        &self.unmatched_b
    }

    /// Swap in fresh pools, dropping all matches
    pub fn replace_pools(&mut self, pool_a: Vec<Person>, pool_b: Vec<Person>) {
        self.unmatched_a = pool_a.clone();
        self.unmatched_b = pool_b.clone();
        self.pool_a = pool_a;
        self.pool_b = pool_b;
        self.matches.clear();
        self.state = SessionState::Idle;
    }

    /// Run the solver over the full pools, replacing any existing matches
    ///
    /// On failure the previous matches and unmatched lists are left as they
    /// were and the session moves to [`SessionState::Failed`].
    pub fn run_batch(&mut self) -> Result<&[Match], SessionError> {
        self.state = SessionState::Running;

        match self.matcher.run_batch(&self.pool_a, &self.pool_b) {
            Ok(outcome) => {
                self.matches = outcome.matches;
                self.unmatched_a = outcome.unmatched_a;
                self.unmatched_b = outcome.unmatched_b;
                self.state = SessionState::Completed;
                Ok(&self.matches)
            }
            Err(e) => {
                tracing::error!("Batch run failed: {}", e);
                self.state = SessionState::Failed;
                Err(e.into())
            }
        }
    }

    /// Pair two currently unmatched people by id
    pub fn add_manual_match(&mut self, id_a: &str, id_b: &str) -> Result<&Match, SessionError> {
        let index_a = Self::find_unmatched(&self.unmatched_a, &self.pool_a, Side::A, id_a)?;
        let index_b = Self::find_unmatched(&self.unmatched_b, &self.pool_b, Side::B, id_b)?;

        let new_match = self
            .matcher
            .add_manual_match(&self.unmatched_a[index_a], &self.unmatched_b[index_b])?;

        self.unmatched_a.remove(index_a);
        self.unmatched_b.remove(index_b);
        self.matches.push(new_match);

        Ok(&self.matches[self.matches.len() - 1])
    }

    /// Undo a match, returning both people to their unmatched lists
    ///
    /// Overlap is not recomputed. Returns `None` for an unknown match id.
    pub fn remove_match(&mut self, match_id: Uuid) -> Option<Match> {
        let index = self.matches.iter().position(|m| m.id == match_id)?;
        let removed = self.matches.remove(index);

        tracing::info!(
            "Match removed: {} - {}",
            removed.person_a.display_name(),
            removed.person_b.display_name()
        );

        self.unmatched_a.push(removed.person_a.clone());
        self.unmatched_b.push(removed.person_b.clone());
        Some(removed)
    }

    fn find_unmatched(unmatched: &[Person], pool: &[Person], side: Side, id: &str) -> Result<usize, SessionError> {
        if let Some(index) = unmatched.iter().position(|p| p.id == id) {
            return Ok(index);
        }

        let id = id.to_string();
        if pool.iter().any(|p| p.id == id) {
            Err(SessionError::AlreadyMatched { side, id })
        } else {
            Err(SessionError::UnknownPerson { side, id })
        }
    }
}
