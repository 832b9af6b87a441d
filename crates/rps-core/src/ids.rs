//! Identity newtypes: session ids and player names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{MatchError, TIE_MARKER};

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// Opaque identifier of one match.
///
/// Ids are minted by the repository; the core never inspects their
/// contents. Anything a client sends back is accepted as a lookup key
/// (an unknown id is simply `NotFound`).
///
/// `#[serde(transparent)]` keeps the wire form a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a raw id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// PlayerName
// ---------------------------------------------------------------------------

/// A validated, non-blank player display name.
///
/// The only way to get one is [`PlayerName::parse`], so holding a
/// `PlayerName` proves the name was checked. Surrounding whitespace is
/// trimmed; the remaining text is kept exactly as typed for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    /// Validates a raw name.
    ///
    /// # Errors
    /// [`MatchError::InvalidPlayerName`] if the name is empty or only
    /// whitespace, or if it is the [`TIE_MARKER`] (in any case), which
    /// finished matches report in place of a winner.
    pub fn parse(raw: &str) -> Result<Self, MatchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MatchError::InvalidPlayerName(
                "player name is required".into(),
            ));
        }
        if trimmed.eq_ignore_ascii_case(TIE_MARKER) {
            return Err(MatchError::InvalidPlayerName(format!(
                "{TIE_MARKER:?} is reserved"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as typed (minus surrounding whitespace).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison used to match a request's name against
    /// a participant.
    pub fn matches(&self, other: &PlayerName) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_name_parse_trims_whitespace() {
        let name = PlayerName::parse("  Alice \t").unwrap();
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_player_name_parse_blank_returns_error() {
        for raw in ["", " ", "\t\n"] {
            assert!(
                matches!(
                    PlayerName::parse(raw),
                    Err(MatchError::InvalidPlayerName(_))
                ),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_player_name_parse_tie_marker_returns_error() {
        for raw in ["TIE", "tie", " Tie "] {
            assert!(
                matches!(
                    PlayerName::parse(raw),
                    Err(MatchError::InvalidPlayerName(_))
                ),
                "{raw:?} should be rejected"
            );
        }
        assert!(PlayerName::parse("Tiger").is_ok());
    }

    #[test]
    fn test_player_name_matches_ignores_case() {
        let alice = PlayerName::parse("Alice").unwrap();
        assert!(alice.matches(&PlayerName::parse("ALICE").unwrap()));
        assert!(alice.matches(&PlayerName::parse("alice").unwrap()));
        assert!(!alice.matches(&PlayerName::parse("Alicia").unwrap()));
    }

    #[test]
    fn test_session_id_serializes_as_plain_string() {
        let id = SessionId::new("game-abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"game-abc\"");
        let back: SessionId = serde_json::from_str("\"game-abc\"").unwrap();
        assert_eq!(back, id);
        assert_eq!(id.to_string(), "game-abc");
    }
}
