//! Session storage: the single synchronisation point for match state.
//!
//! # Concurrency note
//!
//! Every read and write of a session goes through its own
//! `tokio::sync::Mutex`. The outer `RwLock` guards only the id → slot
//! map and is held just long enough to find or insert a slot, never
//! while a session is being mutated. Requests for different sessions
//! therefore never wait on each other, and requests for the same session
//! run one at a time.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use rand::Rng;
use rps_core::{MatchError, PlayerName, Session, SessionId};
use tokio::sync::{Mutex, RwLock};

/// Keyed storage for sessions.
///
/// Implementations own the canonical records. Callers only ever see a
/// clone (from [`get`](Self::get)) or a `&mut Session` scoped to one
/// [`mutate`](Self::mutate) call.
///
/// The methods return `impl Future + Send` rather than using `async fn`
/// so that services generic over a repository can still be driven from
/// `tokio::spawn`.
pub trait SessionRepository: Send + Sync + 'static {
    /// Stores a new session for `player_one` under a freshly minted id
    /// and returns a copy of it.
    fn create(
        &self,
        player_one: PlayerName,
    ) -> impl Future<Output = Session> + Send;

    /// Returns a copy of the session.
    ///
    /// # Errors
    /// [`MatchError::NotFound`] if no session has this id.
    fn get(
        &self,
        id: &SessionId,
    ) -> impl Future<Output = Result<Session, MatchError>> + Send;

    /// Runs `f` with exclusive access to the session and returns its
    /// result.
    ///
    /// No other `get` or `mutate` on the same id can observe the session
    /// until `f` returns, so whatever `f` does is seen all at once.
    ///
    /// # Errors
    /// [`MatchError::NotFound`] if no session has this id. `f` is not
    /// called in that case.
    fn mutate<T, F>(
        &self,
        id: &SessionId,
        f: F,
    ) -> impl Future<Output = Result<T, MatchError>> + Send
    where
        F: FnOnce(&mut Session) -> T + Send,
        T: Send;
}

type Slot = Arc<Mutex<Session>>;

/// A [`SessionRepository`] that keeps everything in process memory.
///
/// Sessions live until the process exits; nothing is ever evicted.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, Slot>>,
}

impl InMemorySessionRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no session has been created.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Clones the slot out of the map so the map lock is released before
    /// the session lock is taken.
    async fn slot(&self, id: &SessionId) -> Result<Slot, MatchError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| MatchError::NotFound(id.clone()))
    }
}

impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, player_one: PlayerName) -> Session {
        let mut sessions = self.sessions.write().await;

        let id = loop {
            let candidate = generate_id();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
            tracing::warn!(session_id = %candidate, "session id collision, regenerating");
        };

        let session = Session::new(id.clone(), player_one);
        sessions.insert(id, Arc::new(Mutex::new(session.clone())));
        session
    }

    async fn get(&self, id: &SessionId) -> Result<Session, MatchError> {
        let slot = self.slot(id).await?;
        let session = slot.lock().await;
        Ok(session.clone())
    }

    async fn mutate<T, F>(&self, id: &SessionId, f: F) -> Result<T, MatchError>
    where
        F: FnOnce(&mut Session) -> T + Send,
        T: Send,
    {
        let slot = self.slot(id).await?;
        let mut session = slot.lock().await;
        Ok(f(&mut *session))
    }
}

/// Generates a session id: `game-` followed by 32 hex characters
/// (128 bits of randomness). `create` retries on a collision.
fn generate_id() -> SessionId {
    let bytes: [u8; 16] = rand::rng().random();
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    SessionId::new(format!("game-{hex}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rps_core::MatchState;

    use super::*;

    fn name(raw: &str) -> PlayerName {
        PlayerName::parse(raw).unwrap()
    }

    // =====================================================================
    // create()
    // =====================================================================

    #[tokio::test]
    async fn test_create_returns_waiting_session_and_stores_it() {
        let repo = InMemorySessionRepository::new();
        assert!(repo.is_empty().await);

        let session = repo.create(name("Alice")).await;

        assert_eq!(session.state(), MatchState::WaitingForPlayer);
        assert_eq!(session.player_one().as_str(), "Alice");
        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.get(session.id()).await.unwrap(), session);
    }

    #[tokio::test]
    async fn test_create_many_sessions_each_gets_unique_id() {
        let repo = InMemorySessionRepository::new();
        let mut ids = HashSet::new();
        for _ in 0..500 {
            let session = repo.create(name("Alice")).await;
            assert!(ids.insert(session.id().clone()), "duplicate id");
        }
        assert_eq!(repo.len().await, 500);
    }

    #[test]
    fn test_generate_id_has_prefix_and_128_bits_of_hex() {
        let id = generate_id();
        let hex = id.as_str().strip_prefix("game-").expect("game- prefix");
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    // =====================================================================
    // get()
    // =====================================================================

    #[tokio::test]
    async fn test_get_unknown_id_returns_not_found() {
        let repo = InMemorySessionRepository::new();
        let id = SessionId::new("game-missing");
        let err = repo.get(&id).await.unwrap_err();
        assert_eq!(err, MatchError::NotFound(id));
    }

    #[tokio::test]
    async fn test_get_returns_copy_not_live_record() {
        let repo = InMemorySessionRepository::new();
        let id = repo.create(name("Alice")).await.id().clone();

        let before = repo.get(&id).await.unwrap();
        repo.mutate(&id, |s| s.join(name("Bob"))).await.unwrap().unwrap();

        assert_eq!(before.state(), MatchState::WaitingForPlayer);
        assert_eq!(repo.get(&id).await.unwrap().state(), MatchState::InProgress);
    }

    // =====================================================================
    // mutate()
    // =====================================================================

    #[tokio::test]
    async fn test_mutate_unknown_id_does_not_call_closure() {
        let repo = InMemorySessionRepository::new();
        let mut called = false;
        let result = repo
            .mutate(&SessionId::new("game-missing"), |_| called = true)
            .await;
        assert!(matches!(result, Err(MatchError::NotFound(_))));
        assert!(!called);
    }

    #[tokio::test]
    async fn test_mutate_returns_closure_result() {
        let repo = InMemorySessionRepository::new();
        let id = repo.create(name("Alice")).await.id().clone();

        let seen = repo
            .mutate(&id, |s| s.player_one().to_string())
            .await
            .unwrap();
        assert_eq!(seen, "Alice");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_mutate_concurrent_joins_exactly_one_succeeds() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let id = repo.create(name("Alice")).await.id().clone();

        let mut tasks = Vec::new();
        for i in 0..32 {
            let repo = Arc::clone(&repo);
            let id = id.clone();
            tasks.push(tokio::spawn(async move {
                repo.mutate(&id, |s| s.join(name(&format!("Player{i}"))))
                    .await
                    .unwrap()
            }));
        }

        let mut joined = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                joined += 1;
            }
        }
        assert_eq!(joined, 1);
        assert_eq!(repo.get(&id).await.unwrap().state(), MatchState::InProgress);
    }
}
