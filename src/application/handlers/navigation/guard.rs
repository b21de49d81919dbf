//! NavigationGuard - runs the resolver against live session and profile state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::application::stores::{ProfileStore, SessionStore};
use crate::domain::navigation::{NavigationDecision, NavigationResolver, Resolution};
use crate::domain::profile::ProfileState;
use crate::domain::session::SessionSnapshot;
use crate::ports::DestinationMemory;

/// Route guard bound to the application's stores.
///
/// Every evaluation samples the latest session and profile snapshots, so a
/// decision is never computed from superseded state. Loading time comes
/// from the stores' own timers, which restart with every load, so an
/// evaluation never inherits the start of an earlier load.
pub struct NavigationGuard {
    sessions: Arc<SessionStore>,
    profiles: Arc<ProfileStore>,
    resolver: NavigationResolver,
    memory: Arc<dyn DestinationMemory>,
    path: watch::Sender<String>,
    decisions: watch::Sender<Option<NavigationDecision>>,
}

/// Time spent waiting on the stores that currently matter.
struct LoadingWait {
    elapsed: Duration,
    deadline: Option<Instant>,
}

impl NavigationGuard {
    pub fn new(
        sessions: Arc<SessionStore>,
        profiles: Arc<ProfileStore>,
        resolver: NavigationResolver,
        memory: Arc<dyn DestinationMemory>,
    ) -> Self {
        let (path, _) = watch::channel(String::from("/"));
        let (decisions, _) = watch::channel(None);
        Self {
            sessions,
            profiles,
            resolver,
            memory,
            path,
            decisions,
        }
    }

    /// Evaluates `path` against current state and applies the memory write.
    pub fn evaluate(&self, path: &str) -> Resolution {
        self.evaluate_with_deadline(path).0
    }

    pub fn resolve_navigation(&self, path: &str) -> NavigationDecision {
        self.evaluate(path).decision
    }

    /// Sets the path `drive` evaluates.
    pub fn navigate(&self, path: impl Into<String>) {
        self.path.send_replace(path.into());
    }

    /// Latest decision published by `drive`. `None` before the first one.
    pub fn decisions(&self) -> watch::Receiver<Option<NavigationDecision>> {
        self.decisions.subscribe()
    }

    /// The remembered destination, cleared on read. Used after sign-in.
    pub fn take_destination(&self) -> Option<String> {
        self.memory.take()
    }

    /// Re-evaluates on every session, profile or path change and when the
    /// loading deadline passes, until `shutdown` flips to true.
    ///
    /// The deadline is only armed while a relevant store is loading, so a
    /// fast resolution never leaves a stale timeout behind.
    pub async fn drive(&self, mut shutdown: watch::Receiver<bool>) {
        let mut sessions = self.sessions.subscribe();
        let mut profiles = self.profiles.subscribe();
        let mut path_rx = self.path.subscribe();

        loop {
            sessions.borrow_and_update();
            profiles.borrow_and_update();
            let path = path_rx.borrow_and_update().clone();

            let (resolution, deadline) = self.evaluate_with_deadline(&path);
            let decision = resolution.decision;
            self.decisions.send_if_modified(|current| {
                if current.as_ref() == Some(&decision) {
                    return false;
                }
                *current = Some(decision);
                true
            });

            tokio::select! {
                changed = sessions.changed() => if changed.is_err() { break },
                changed = profiles.changed() => if changed.is_err() { break },
                _ = path_rx.changed() => {},
                _ = wait_until(deadline) => {},
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::debug!("Navigation guard stopping");
                        break;
                    }
                }
            }
        }
    }

    fn evaluate_with_deadline(&self, path: &str) -> (Resolution, Option<Instant>) {
        let session = self.sessions.snapshot();
        let profile = self.profiles.state();
        let now = Instant::now();
        let wait = self.loading_wait(&session, &profile, now.into_std());

        let resolution = self.resolver.resolve(&session, &profile, wait.elapsed, path);
        if let Some(destination) = &resolution.remember {
            self.memory.remember(destination);
        }
        tracing::debug!(
            path,
            state = %resolution.state,
            decision = ?resolution.decision,
            elapsed_ms = wait.elapsed.as_millis() as u64,
            "Navigation resolved"
        );

        let deadline = wait.deadline.filter(|deadline| *deadline > now);
        (resolution, deadline)
    }

    /// The longest wait among stores the resolver is waiting on.
    ///
    /// The profile store only counts while a session exists.
    fn loading_wait(
        &self,
        session: &SessionSnapshot,
        profile: &ProfileState,
        now: std::time::Instant,
    ) -> LoadingWait {
        let timeout = self.resolver.loading_timeout();
        let mut wait = LoadingWait {
            elapsed: Duration::ZERO,
            deadline: None,
        };
        let mut include = |elapsed: Duration, deadline: Option<std::time::Instant>| {
            wait.elapsed = wait.elapsed.max(elapsed);
            if let Some(deadline) = deadline.map(Instant::from_std) {
                wait.deadline = Some(wait.deadline.map_or(deadline, |d| d.min(deadline)));
            }
        };

        if !session.initialized || session.loading {
            include(
                self.sessions.loading_elapsed(now),
                self.sessions.loading_deadline(timeout),
            );
        }
        if session.is_authenticated() && profile.is_loading() {
            include(
                self.profiles.loading_elapsed(now),
                self.profiles.loading_deadline(timeout),
            );
        }
        wait
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockIdentityProvider;
    use crate::adapters::memory::{InMemoryDestinationMemory, InMemoryLedgerStore};
    use crate::domain::foundation::UserId;
    use crate::domain::profile::Profile;
    use crate::domain::session::{AuthEvent, Session};
    use std::time::Duration;

    struct Fixture {
        guard: Arc<NavigationGuard>,
        sessions: Arc<SessionStore>,
        profiles: Arc<ProfileStore>,
        repo: Arc<InMemoryLedgerStore>,
        memory: Arc<InMemoryDestinationMemory>,
    }

    fn fixture() -> Fixture {
        let sessions = Arc::new(SessionStore::new(Arc::new(MockIdentityProvider::new())));
        let repo = Arc::new(InMemoryLedgerStore::new());
        let profiles = Arc::new(ProfileStore::new(repo.clone()));
        let memory = Arc::new(InMemoryDestinationMemory::new());
        let guard = Arc::new(NavigationGuard::new(
            sessions.clone(),
            profiles.clone(),
            NavigationResolver::default(),
            memory.clone(),
        ));
        Fixture {
            guard,
            sessions,
            profiles,
            repo,
            memory,
        }
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn redirect(target: &str) -> Option<NavigationDecision> {
        Some(NavigationDecision::RedirectTo(target.to_string()))
    }

    #[tokio::test]
    async fn signed_out_visit_records_destination() {
        let f = fixture();
        f.sessions.apply(&AuthEvent::SignedOut);

        let decision = f.guard.resolve_navigation("/leads/9");

        assert_eq!(decision, NavigationDecision::RedirectTo("/login".into()));
        assert_eq!(f.memory.peek().as_deref(), Some("/leads/9"));
        assert_eq!(f.guard.take_destination().as_deref(), Some("/leads/9"));
        assert_eq!(f.memory.peek(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_profile_load_times_out_to_recovery() {
        let f = fixture();
        f.sessions.apply(&AuthEvent::SignedIn(Session::new(user())));
        f.guard.navigate("/dashboard");
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut decisions = f.guard.decisions();

        let guard = f.guard.clone();
        tokio::spawn(async move { guard.drive(shutdown_rx).await });

        decisions
            .wait_for(|d| *d == Some(NavigationDecision::ShowLoading))
            .await
            .unwrap();
        let started = Instant::now();

        decisions
            .wait_for(|d| *d == redirect("/auth/recovery"))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn new_load_after_identity_switch_starts_from_zero() {
        let f = fixture();
        let mut profile = Profile::provision(user(), 1);
        profile.onboarding_complete = true;
        f.repo.seed(profile).await;

        f.sessions.apply(&AuthEvent::SignedIn(Session::new(user())));
        assert_eq!(
            f.guard.resolve_navigation("/dashboard"),
            NavigationDecision::ShowLoading
        );

        tokio::time::sleep(Duration::from_secs(1)).await;
        f.profiles.refresh(&user()).await;

        // No evaluation runs between the first load ending and the next one.
        tokio::time::sleep(Duration::from_secs(11)).await;
        let other = UserId::new("user-2").unwrap();
        f.sessions.apply(&AuthEvent::SignedIn(Session::new(other)));
        f.profiles.clear();

        assert_eq!(
            f.guard.resolve_navigation("/dashboard"),
            NavigationDecision::ShowLoading
        );
    }

    #[tokio::test(start_paused = true)]
    async fn resolved_load_cancels_timeout() {
        let f = fixture();
        f.repo.seed(Profile::provision(user(), 1)).await;
        f.sessions.apply(&AuthEvent::SignedIn(Session::new(user())));
        f.guard.navigate("/dashboard");
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut decisions = f.guard.decisions();

        let guard = f.guard.clone();
        tokio::spawn(async move { guard.drive(shutdown_rx).await });
        decisions
            .wait_for(|d| *d == Some(NavigationDecision::ShowLoading))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(3)).await;
        f.profiles.refresh(&user()).await;
        decisions
            .wait_for(|d| *d == redirect("/onboarding"))
            .await
            .unwrap();

        // Well past the original deadline: nothing else fires.
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(*decisions.borrow(), redirect("/onboarding"));
    }

    #[tokio::test(start_paused = true)]
    async fn drive_follows_path_changes_and_stops_on_shutdown() {
        let f = fixture();
        let mut profile = Profile::provision(user(), 1);
        profile.onboarding_complete = true;
        f.repo.seed(profile).await;
        f.sessions.apply(&AuthEvent::SignedIn(Session::new(user())));
        f.profiles.refresh(&user()).await;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut decisions = f.guard.decisions();
        let guard = f.guard.clone();
        let task = tokio::spawn(async move { guard.drive(shutdown_rx).await });

        f.guard.navigate("/welcome");
        decisions
            .wait_for(|d| *d == redirect("/dashboard"))
            .await
            .unwrap();

        f.guard.navigate("/dashboard");
        decisions
            .wait_for(|d| *d == Some(NavigationDecision::Render))
            .await
            .unwrap();

        shutdown_tx.send(true).unwrap();
        task.await.unwrap();
    }
}
