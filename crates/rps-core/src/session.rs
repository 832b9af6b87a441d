//! The session entity: one match and its lifecycle state machine.
//!
//! A session moves strictly forward through three states:
//!
//! ```text
//! WaitingForPlayer ──(join)──→ InProgress ──(second move)──→ Finished
//! ```
//!
//! The data that's legal in each state lives inside that state's
//! [`Stage`] variant. There is no way to build a waiting session with a
//! second player, an in-progress session with a result, or a finished
//! session missing a move, so the invariants hold by construction
//! instead of by checks scattered across callers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{MatchError, Move, Operation, Outcome, PlayerName, SessionId, resolve};

/// The literal reported as the winner name when a match ties.
pub const TIE_MARKER: &str = "TIE";

// ---------------------------------------------------------------------------
// MatchState
// ---------------------------------------------------------------------------

/// The public lifecycle state of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchState {
    WaitingForPlayer,
    InProgress,
    Finished,
}

impl MatchState {
    /// Returns `true` if a second player may join.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::WaitingForPlayer)
    }

    /// Returns `true` if moves are being accepted.
    pub fn accepts_moves(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Position in the lifecycle. Later states have larger ranks.
    pub fn rank(self) -> u8 {
        match self {
            Self::WaitingForPlayer => 0,
            Self::InProgress => 1,
            Self::Finished => 2,
        }
    }
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingForPlayer => write!(f, "WAITING_FOR_PLAYER"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

// ---------------------------------------------------------------------------
// MatchResult
// ---------------------------------------------------------------------------

/// How a finished match ended, in terms of the two player slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchResult {
    PlayerOneWins,
    PlayerTwoWins,
    Tie,
}

/// Player one's move is always the first argument to [`resolve`].
impl From<Outcome> for MatchResult {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::FirstWins => Self::PlayerOneWins,
            Outcome::SecondWins => Self::PlayerTwoWins,
            Outcome::Tie => Self::Tie,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerOneWins => write!(f, "PLAYER_ONE_WINS"),
            Self::PlayerTwoWins => write!(f, "PLAYER_TWO_WINS"),
            Self::Tie => write!(f, "TIE"),
        }
    }
}

/// What a successful move submission did to the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveReceipt {
    /// The move was recorded; the opponent hasn't moved yet.
    AwaitingOpponent,
    /// The move completed the pair and the match is now finished.
    Resolved(MatchResult),
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Stage {
    WaitingForPlayer,
    InProgress {
        player_two: PlayerName,
        move_one: Option<Move>,
        move_two: Option<Move>,
    },
    Finished {
        player_two: PlayerName,
        move_one: Move,
        move_two: Move,
        result: MatchResult,
    },
}

#[derive(Clone, Copy)]
enum Slot {
    One,
    Two,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One match, from creation through resolution.
///
/// Fields are private: the only mutations are [`join`](Self::join) and
/// [`submit_move`](Self::submit_move), and both either apply completely
/// or leave the session untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    player_one: PlayerName,
    stage: Stage,
}

impl Session {
    /// Creates a session waiting for its second player.
    pub fn new(id: SessionId, player_one: PlayerName) -> Self {
        Self {
            id,
            player_one,
            stage: Stage::WaitingForPlayer,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn player_one(&self) -> &PlayerName {
        &self.player_one
    }

    pub fn player_two(&self) -> Option<&PlayerName> {
        match &self.stage {
            Stage::WaitingForPlayer => None,
            Stage::InProgress { player_two, .. }
            | Stage::Finished { player_two, .. } => Some(player_two),
        }
    }

    /// Player one's recorded move, if any.
    pub fn move_one(&self) -> Option<Move> {
        match &self.stage {
            Stage::WaitingForPlayer => None,
            Stage::InProgress { move_one, .. } => *move_one,
            Stage::Finished { move_one, .. } => Some(*move_one),
        }
    }

    /// Player two's recorded move, if any.
    pub fn move_two(&self) -> Option<Move> {
        match &self.stage {
            Stage::WaitingForPlayer => None,
            Stage::InProgress { move_two, .. } => *move_two,
            Stage::Finished { move_two, .. } => Some(*move_two),
        }
    }

    pub fn state(&self) -> MatchState {
        match self.stage {
            Stage::WaitingForPlayer => MatchState::WaitingForPlayer,
            Stage::InProgress { .. } => MatchState::InProgress,
            Stage::Finished { .. } => MatchState::Finished,
        }
    }

    pub fn result(&self) -> Option<MatchResult> {
        match self.stage {
            Stage::Finished { result, .. } => Some(result),
            _ => None,
        }
    }

    /// The winner's display name, or [`TIE_MARKER`] for a tie. `None`
    /// until the match is finished.
    ///
    /// [`result`](Self::result) is the authoritative outcome; this is the
    /// display form. [`PlayerName::parse`] refuses the marker as a name,
    /// so the two never disagree.
    pub fn winner_name(&self) -> Option<&str> {
        match &self.stage {
            Stage::Finished {
                player_two, result, ..
            } => Some(match result {
                MatchResult::PlayerOneWins => self.player_one.as_str(),
                MatchResult::PlayerTwoWins => player_two.as_str(),
                MatchResult::Tie => TIE_MARKER,
            }),
            _ => None,
        }
    }

    /// Seats the second player and starts the match.
    ///
    /// # Errors
    /// - [`MatchError::InvalidState`] unless the match is waiting for a player
    /// - [`MatchError::InvalidPlayerName`] if `player` matches player one's
    ///   name (case-insensitively). Moves are routed by name, so two
    ///   indistinguishable names would leave the second slot unreachable.
    pub fn join(&mut self, player: PlayerName) -> Result<(), MatchError> {
        if !self.state().is_joinable() {
            return Err(self.invalid_state(Operation::Join));
        }
        if player.matches(&self.player_one) {
            return Err(MatchError::InvalidPlayerName(format!(
                "{player} is already playing in match {}",
                self.id
            )));
        }

        self.stage = Stage::InProgress {
            player_two: player,
            move_one: None,
            move_two: None,
        };
        Ok(())
    }

    /// Records `player`'s move, finishing the match if both moves are in.
    ///
    /// A player who already moved may change their move until the
    /// opponent moves; the later submission replaces the earlier one.
    ///
    /// # Errors
    /// - [`MatchError::InvalidState`] unless the match is in progress
    /// - [`MatchError::InvalidPlayer`] if `player` is neither participant
    pub fn submit_move(
        &mut self,
        player: &PlayerName,
        mv: Move,
    ) -> Result<MoveReceipt, MatchError> {
        if !self.state().accepts_moves() {
            return Err(self.invalid_state(Operation::SubmitMove));
        }
        let Stage::InProgress {
            player_two,
            move_one,
            move_two,
        } = &mut self.stage
        else {
            return Err(self.invalid_state(Operation::SubmitMove));
        };

        let slot = if player.matches(&self.player_one) {
            Slot::One
        } else if player.matches(player_two) {
            Slot::Two
        } else {
            return Err(MatchError::InvalidPlayer {
                session_id: self.id.clone(),
                player: player.to_string(),
            });
        };

        match slot {
            Slot::One => *move_one = Some(mv),
            Slot::Two => *move_two = Some(mv),
        }

        let (Some(first), Some(second)) = (*move_one, *move_two) else {
            return Ok(MoveReceipt::AwaitingOpponent);
        };

        let result = MatchResult::from(resolve(first, second));
        let player_two = player_two.clone();
        self.stage = Stage::Finished {
            player_two,
            move_one: first,
            move_two: second,
            result,
        };
        Ok(MoveReceipt::Resolved(result))
    }

    /// A serialisable copy of the session's current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            player_one: self.player_one.to_string(),
            player_two: self.player_two().map(ToString::to_string),
            move_one: self.move_one(),
            move_two: self.move_two(),
            state: self.state(),
            result: self.result(),
            winner_name: self.winner_name().map(str::to_string),
        }
    }

    fn invalid_state(&self, operation: Operation) -> MatchError {
        MatchError::InvalidState {
            session_id: self.id.clone(),
            state: self.state(),
            operation,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// A point-in-time copy of a session, as returned by `GetMatch`.
///
/// Unset optional fields are omitted from the serialised form rather
/// than sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub player_one: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_two: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_one: Option<Move>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_two: Option<Move>,
    pub state: MatchState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MatchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> PlayerName {
        PlayerName::parse(raw).unwrap()
    }

    fn waiting() -> Session {
        Session::new(SessionId::new("game-test"), name("Alice"))
    }

    fn in_progress() -> Session {
        let mut s = waiting();
        s.join(name("Bob")).unwrap();
        s
    }

    // =====================================================================
    // MatchState
    // =====================================================================

    #[test]
    fn test_match_state_predicates_per_state() {
        assert!(MatchState::WaitingForPlayer.is_joinable());
        assert!(!MatchState::WaitingForPlayer.accepts_moves());
        assert!(!MatchState::InProgress.is_joinable());
        assert!(MatchState::InProgress.accepts_moves());
        assert!(!MatchState::Finished.is_joinable());
        assert!(!MatchState::Finished.accepts_moves());
    }

    #[test]
    fn test_match_state_rank_increases_along_lifecycle() {
        assert!(MatchState::WaitingForPlayer.rank() < MatchState::InProgress.rank());
        assert!(MatchState::InProgress.rank() < MatchState::Finished.rank());
    }

    #[test]
    fn test_match_state_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&MatchState::WaitingForPlayer).unwrap();
        assert_eq!(json, "\"WAITING_FOR_PLAYER\"");
        assert_eq!(MatchState::InProgress.to_string(), "IN_PROGRESS");
    }

    // =====================================================================
    // new() / join()
    // =====================================================================

    #[test]
    fn test_new_session_is_waiting_with_no_second_player() {
        let s = waiting();
        assert_eq!(s.state(), MatchState::WaitingForPlayer);
        assert_eq!(s.player_one().as_str(), "Alice");
        assert!(s.player_two().is_none());
        assert!(s.move_one().is_none() && s.move_two().is_none());
        assert!(s.result().is_none());
    }

    #[test]
    fn test_join_waiting_session_starts_match() {
        let s = in_progress();
        assert_eq!(s.state(), MatchState::InProgress);
        assert_eq!(s.player_two().map(PlayerName::as_str), Some("Bob"));
    }

    #[test]
    fn test_join_in_progress_returns_invalid_state() {
        let mut s = in_progress();
        let err = s.join(name("Carol")).unwrap_err();
        assert!(matches!(
            err,
            MatchError::InvalidState {
                state: MatchState::InProgress,
                operation: Operation::Join,
                ..
            }
        ));
        // The original second player is still seated.
        assert_eq!(s.player_two().map(PlayerName::as_str), Some("Bob"));
    }

    #[test]
    fn test_join_under_creator_name_is_rejected() {
        let mut s = waiting();
        let err = s.join(name("alice")).unwrap_err();
        assert!(matches!(err, MatchError::InvalidPlayerName(_)));
        assert_eq!(s.state(), MatchState::WaitingForPlayer);
    }

    // =====================================================================
    // submit_move()
    // =====================================================================

    #[test]
    fn test_submit_move_while_waiting_returns_invalid_state() {
        let mut s = waiting();
        let err = s.submit_move(&name("Alice"), Move::Rock).unwrap_err();
        assert!(matches!(
            err,
            MatchError::InvalidState { state: MatchState::WaitingForPlayer, .. }
        ));
        assert!(s.move_one().is_none());
    }

    #[test]
    fn test_submit_move_first_move_awaits_opponent() {
        let mut s = in_progress();
        let receipt = s.submit_move(&name("Alice"), Move::Rock).unwrap();
        assert_eq!(receipt, MoveReceipt::AwaitingOpponent);
        assert_eq!(s.move_one(), Some(Move::Rock));
        assert_eq!(s.move_two(), None);
        assert_eq!(s.state(), MatchState::InProgress);
    }

    #[test]
    fn test_submit_move_matches_player_case_insensitively() {
        let mut s = in_progress();
        s.submit_move(&name("BOB"), Move::Paper).unwrap();
        assert_eq!(s.move_two(), Some(Move::Paper));
    }

    #[test]
    fn test_submit_move_second_move_resolves_player_one_win() {
        let mut s = in_progress();
        s.submit_move(&name("Alice"), Move::Rock).unwrap();
        let receipt = s.submit_move(&name("Bob"), Move::Scissors).unwrap();

        assert_eq!(receipt, MoveReceipt::Resolved(MatchResult::PlayerOneWins));
        assert_eq!(s.state(), MatchState::Finished);
        assert_eq!(s.result(), Some(MatchResult::PlayerOneWins));
        assert_eq!(s.winner_name(), Some("Alice"));
    }

    #[test]
    fn test_submit_move_player_two_moving_first_resolves_player_two_win() {
        let mut s = in_progress();
        s.submit_move(&name("Bob"), Move::Paper).unwrap();
        s.submit_move(&name("Alice"), Move::Rock).unwrap();
        assert_eq!(s.result(), Some(MatchResult::PlayerTwoWins));
        assert_eq!(s.winner_name(), Some("Bob"));
    }

    #[test]
    fn test_submit_move_same_moves_resolve_tie() {
        let mut s = in_progress();
        s.submit_move(&name("Alice"), Move::Rock).unwrap();
        s.submit_move(&name("Bob"), Move::Rock).unwrap();
        assert_eq!(s.result(), Some(MatchResult::Tie));
        assert_eq!(s.winner_name(), Some(TIE_MARKER));
    }

    #[test]
    fn test_submit_move_resubmission_overwrites_own_move() {
        let mut s = in_progress();
        s.submit_move(&name("Alice"), Move::Rock).unwrap();
        let receipt = s.submit_move(&name("Alice"), Move::Paper).unwrap();

        assert_eq!(receipt, MoveReceipt::AwaitingOpponent);
        assert_eq!(s.move_one(), Some(Move::Paper));
        assert_eq!(s.state(), MatchState::InProgress);

        s.submit_move(&name("Bob"), Move::Rock).unwrap();
        assert_eq!(s.result(), Some(MatchResult::PlayerOneWins));
    }

    #[test]
    fn test_submit_move_after_finish_returns_invalid_state() {
        let mut s = in_progress();
        s.submit_move(&name("Alice"), Move::Rock).unwrap();
        s.submit_move(&name("Bob"), Move::Scissors).unwrap();

        let before = s.clone();
        let err = s.submit_move(&name("Bob"), Move::Paper).unwrap_err();
        assert!(matches!(
            err,
            MatchError::InvalidState { state: MatchState::Finished, .. }
        ));
        assert_eq!(s, before);
    }

    #[test]
    fn test_submit_move_unknown_player_returns_invalid_player() {
        let mut s = in_progress();
        let err = s.submit_move(&name("Mallory"), Move::Rock).unwrap_err();
        assert!(matches!(
            &err,
            MatchError::InvalidPlayer { player, .. } if player == "Mallory"
        ));
        assert!(s.move_one().is_none() && s.move_two().is_none());
    }

    // =====================================================================
    // snapshot()
    // =====================================================================

    #[test]
    fn test_snapshot_waiting_omits_unset_fields() {
        let json = serde_json::to_value(waiting().snapshot()).unwrap();
        assert_eq!(json["id"], "game-test");
        assert_eq!(json["player_one"], "Alice");
        assert_eq!(json["state"], "WAITING_FOR_PLAYER");
        for absent in ["player_two", "move_one", "move_two", "result", "winner_name"] {
            assert!(json.get(absent).is_none(), "{absent} should be omitted");
        }
    }

    #[test]
    fn test_snapshot_finished_includes_every_field() {
        let mut s = in_progress();
        s.submit_move(&name("Alice"), Move::Scissors).unwrap();
        s.submit_move(&name("Bob"), Move::Paper).unwrap();

        let snap = s.snapshot();
        assert_eq!(snap.player_two.as_deref(), Some("Bob"));
        assert_eq!(snap.move_one, Some(Move::Scissors));
        assert_eq!(snap.move_two, Some(Move::Paper));
        assert_eq!(snap.state, MatchState::Finished);
        assert_eq!(snap.result, Some(MatchResult::PlayerOneWins));
        assert_eq!(snap.winner_name.as_deref(), Some("Alice"));

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["result"], "PLAYER_ONE_WINS");
        assert_eq!(json["move_two"], "PAPER");
    }
}
