//! The match service: the four commands a transport can issue.
//!
//! Each command validates its raw input first, then runs at most one
//! repository transaction. Input errors (`InvalidPlayerName`,
//! `InvalidMove`) are therefore reported before the session is even
//! looked up, and everything that depends on session state is decided
//! inside the transaction by the session itself.

use rps_core::{
    MatchError, Move, MoveReceipt, PlayerName, SessionId, SessionSnapshot,
};

use crate::{InMemorySessionRepository, SessionRepository};

/// Runs match commands against a [`SessionRepository`].
///
/// The service holds no mutable state of its own; share it across tasks
/// behind an `Arc`.
pub struct MatchService<R: SessionRepository = InMemorySessionRepository> {
    repository: R,
}

impl MatchService<InMemorySessionRepository> {
    /// Creates a service backed by a fresh in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(InMemorySessionRepository::new())
    }
}

impl<R: SessionRepository> MatchService<R> {
    /// Creates a service over the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Starts a new match with `player_name` as player one.
    ///
    /// # Errors
    /// [`MatchError::InvalidPlayerName`] if the name is blank.
    pub async fn create_match(
        &self,
        player_name: &str,
    ) -> Result<SessionId, MatchError> {
        let player = PlayerName::parse(player_name)?;
        let session = self.repository.create(player).await;

        tracing::info!(
            session_id = %session.id(),
            player = %session.player_one(),
            "match created"
        );
        Ok(session.id().clone())
    }

    /// Seats `player_name` as player two and returns the name as stored.
    ///
    /// # Errors
    /// - [`MatchError::InvalidPlayerName`]: blank, or the creator's name
    /// - [`MatchError::NotFound`]: unknown session
    /// - [`MatchError::InvalidState`]: the match already has two players
    pub async fn join_match(
        &self,
        session_id: &SessionId,
        player_name: &str,
    ) -> Result<PlayerName, MatchError> {
        let player = PlayerName::parse(player_name)?;

        let joined = player.clone();
        self.repository
            .mutate(session_id, move |session| session.join(joined))
            .await??;

        tracing::info!(%session_id, %player, "player joined");
        Ok(player)
    }

    /// Records `player_name`'s move and resolves the match if the
    /// opponent has already moved.
    ///
    /// Recording the move and (when it completes the pair) resolving the
    /// result happen in one transaction, so no reader can see both moves
    /// present on a match that isn't finished.
    ///
    /// # Errors
    /// - [`MatchError::InvalidPlayerName`] / [`MatchError::InvalidMove`]:
    ///   malformed input, checked before lookup
    /// - [`MatchError::NotFound`]: unknown session
    /// - [`MatchError::InvalidState`]: the match isn't in progress
    /// - [`MatchError::InvalidPlayer`]: the name matches neither player
    pub async fn submit_move(
        &self,
        session_id: &SessionId,
        player_name: &str,
        move_token: &str,
    ) -> Result<MoveReceipt, MatchError> {
        let player = PlayerName::parse(player_name)?;
        let mv: Move = move_token.parse()?;

        let receipt = self
            .repository
            .mutate(session_id, |session| session.submit_move(&player, mv))
            .await??;

        match receipt {
            MoveReceipt::AwaitingOpponent => {
                tracing::debug!(%session_id, %player, "move recorded");
            }
            MoveReceipt::Resolved(result) => {
                tracing::info!(%session_id, %player, %result, "match finished");
            }
        }
        Ok(receipt)
    }

    /// Returns a snapshot of the match. Never changes it.
    ///
    /// # Errors
    /// [`MatchError::NotFound`] if no match has this id.
    pub async fn get_match(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionSnapshot, MatchError> {
        let session = self.repository.get(session_id).await?;
        Ok(session.snapshot())
    }
}
