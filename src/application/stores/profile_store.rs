//! Observable profile store keyed by the session identity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::domain::foundation::UserId;
use crate::domain::navigation::LoadingTimer;
use crate::domain::profile::ProfileState;
use crate::domain::session::SessionSnapshot;
use crate::ports::ProfileRepository;

use super::now;

/// Holds the signed-in user's `ProfileState`.
///
/// Every fetch takes a generation number; a fetch that finishes after a
/// newer fetch (or a clear) started is discarded, so a slow response for a
/// previous identity can never overwrite current state. The generation is
/// compared inside the `watch` write, which serializes it against `clear`.
///
/// The loading timer is only touched inside those writes too. It runs from
/// construction until the first resolution, restarts with every fetch, and
/// is stopped while cleared (no identity means nothing is being waited on).
pub struct ProfileStore {
    repository: Arc<dyn ProfileRepository>,
    state: watch::Sender<ProfileState>,
    generation: AtomicU64,
    timer: Mutex<LoadingTimer>,
}

impl ProfileStore {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        let (state, _) = watch::channel(ProfileState::Loading);
        Self {
            repository,
            state,
            generation: AtomicU64::new(0),
            timer: Mutex::new(LoadingTimer::started(now())),
        }
    }

    pub fn state(&self) -> ProfileState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    /// How long the current fetch has been waiting. Zero when idle.
    pub fn loading_elapsed(&self, now: Instant) -> Duration {
        self.lock_timer().elapsed(now)
    }

    /// When the current fetch reaches `timeout`, if one is running.
    pub fn loading_deadline(&self, timeout: Duration) -> Option<Instant> {
        self.lock_timer().deadline(timeout)
    }

    /// Fetches the profile for `user_id`.
    ///
    /// A ready profile for the same user stays visible while the refetch is
    /// in flight. A missing row resolves to `NotFound`, a failed read to
    /// `FetchError`. Safe to call repeatedly and concurrently.
    pub async fn refresh(&self, user_id: &UserId) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.state.send_if_modified(|state| match state {
            ProfileState::Ready(profile) if profile.user_id == *user_id => false,
            _ => {
                // Notify even when already loading: the new start arms a
                // fresh deadline for subscribers.
                self.lock_timer().restart(now());
                *state = ProfileState::Loading;
                true
            }
        });

        let result = self.repository.find_by_user(user_id).await;

        let next = match result {
            Ok(Some(profile)) => ProfileState::Ready(profile),
            Ok(None) => {
                tracing::debug!(user_id = %user_id, "Profile not provisioned yet");
                ProfileState::NotFound
            }
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "Profile fetch failed");
                ProfileState::FetchError(err.message)
            }
        };

        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(user_id = %user_id, "Discarding superseded profile fetch");
                return false;
            }
            self.lock_timer().stop();
            if *state == next {
                return false;
            }
            *state = next;
            true
        });
    }

    /// Forgets the current profile and invalidates in-flight fetches.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_if_modified(|state| {
            self.lock_timer().stop();
            if state.is_loading() {
                return false;
            }
            *state = ProfileState::Loading;
            true
        });
    }

    /// Follows the session: refetch when the identity changes, clear on sign-out.
    ///
    /// The first snapshot is always acted on, so a visitor who starts signed
    /// out never leaves the initial load timer running. Fetches run as
    /// separate tasks so a newer identity supersedes a slow fetch instead of
    /// queueing behind it. Returns when the session store is dropped.
    pub async fn track(self: Arc<Self>, mut sessions: watch::Receiver<SessionSnapshot>) {
        let mut current: Option<Option<UserId>> = None;
        loop {
            let snapshot = sessions.borrow_and_update().clone();
            let user_id = snapshot.user_id().cloned();
            if snapshot.initialized && current.as_ref() != Some(&user_id) {
                match &user_id {
                    Some(id) => {
                        let store = Arc::clone(&self);
                        let id = id.clone();
                        tokio::spawn(async move { store.refresh(&id).await });
                    }
                    None => self.clear(),
                }
                current = Some(user_id);
            }
            if sessions.changed().await.is_err() {
                break;
            }
        }
    }

    fn lock_timer(&self) -> MutexGuard<'_, LoadingTimer> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryLedgerStore;
    use crate::domain::foundation::{DomainError, ErrorCode};
    use crate::domain::profile::{OnboardingDetails, Profile};
    use crate::domain::session::Session;
    use async_trait::async_trait;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    /// Repository whose reads for `slow_user` take longer than the rest.
    struct SlowRepository {
        slow_user: UserId,
    }

    #[async_trait]
    impl ProfileRepository for SlowRepository {
        async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Profile>, DomainError> {
            if *user_id == self.slow_user {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            Ok(Some(Profile::provision(user_id.clone(), 1)))
        }

        async fn create(&self, _profile: &Profile) -> Result<(), DomainError> {
            Ok(())
        }

        async fn complete_onboarding(
            &self,
            _user_id: &UserId,
            _details: &OnboardingDetails,
        ) -> Result<Profile, DomainError> {
            Err(DomainError::new(ErrorCode::InternalError, "unused"))
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_row_resolves_to_not_found() {
        let store = ProfileStore::new(Arc::new(InMemoryLedgerStore::new()));
        store.refresh(&user("u1")).await;
        assert_eq!(store.state(), ProfileState::NotFound);
    }

    #[tokio::test]
    async fn failed_read_resolves_to_fetch_error() {
        let repo = Arc::new(InMemoryLedgerStore::new());
        repo.set_unavailable(true);
        let store = ProfileStore::new(repo);

        store.refresh(&user("u1")).await;

        assert!(store.state().error().is_some());
    }

    #[tokio::test]
    async fn refresh_is_idempotent() {
        let repo = Arc::new(InMemoryLedgerStore::new());
        repo.seed(Profile::provision(user("u1"), 3)).await;
        let store = ProfileStore::new(repo);

        store.refresh(&user("u1")).await;
        let first = store.state();
        store.refresh(&user("u1")).await;

        assert_eq!(store.state(), first);
        assert_eq!(first.profile().map(|p| p.credits_remaining()), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_fetch_is_discarded() {
        let store = Arc::new(ProfileStore::new(Arc::new(SlowRepository {
            slow_user: user("old"),
        })));

        let slow = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.refresh(&user("old")).await })
        };
        // Let the slow fetch start and park on its sleep.
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.refresh(&user("new")).await;
        slow.await.unwrap();

        let state = store.state();
        assert_eq!(state.profile().map(|p| p.user_id.as_str()), Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_finishing_after_clear_is_discarded() {
        let store = Arc::new(ProfileStore::new(Arc::new(SlowRepository {
            slow_user: user("old"),
        })));

        let slow = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.refresh(&user("old")).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.clear();
        slow.await.unwrap();

        assert!(store.state().is_loading());
        assert_eq!(store.loading_elapsed(now()), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn each_fetch_restarts_the_loading_timer() {
        let repo = Arc::new(InMemoryLedgerStore::new());
        repo.seed(Profile::provision(user("a"), 1)).await;
        let store = ProfileStore::new(repo);

        tokio::time::sleep(Duration::from_secs(1)).await;
        store.refresh(&user("a")).await;
        assert_eq!(store.loading_elapsed(now()), Duration::ZERO);

        // Long after the first load, a new identity starts from zero.
        tokio::time::sleep(Duration::from_secs(11)).await;
        store.clear();
        assert_eq!(store.loading_elapsed(now()), Duration::ZERO);
        assert_eq!(store.loading_deadline(Duration::from_secs(10)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn initial_load_counts_from_construction() {
        let store = ProfileStore::new(Arc::new(InMemoryLedgerStore::new()));

        tokio::time::sleep(Duration::from_secs(4)).await;

        assert_eq!(store.loading_elapsed(now()), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn track_follows_session_identity() {
        let repo = Arc::new(InMemoryLedgerStore::new());
        repo.seed(Profile::provision(user("u1"), 2)).await;
        let store = Arc::new(ProfileStore::new(repo));
        let (session_tx, session_rx) = watch::channel(SessionSnapshot::signed_out());
        let mut profile_rx = store.subscribe();

        tokio::spawn(Arc::clone(&store).track(session_rx));

        session_tx.send_replace(SessionSnapshot::signed_in(Session::new(user("u1"))));
        profile_rx.wait_for(|s| s.profile().is_some()).await.unwrap();

        session_tx.send_replace(SessionSnapshot::signed_out());
        profile_rx.wait_for(|s| s.is_loading()).await.unwrap();
    }
}
