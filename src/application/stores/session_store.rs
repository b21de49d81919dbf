//! Observable session store fed by the identity provider.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::domain::foundation::AuthError;
use crate::domain::navigation::LoadingTimer;
use crate::domain::session::{AuthEvent, SessionSnapshot};
use crate::ports::IdentityProvider;

use super::now;

/// Holds the current `SessionSnapshot` and publishes every change.
///
/// `initialized` flips to true on the first resolved read or event and
/// never goes back. A provider failure during the first read resolves to
/// signed-out so the guard is never stuck on an indeterminate session. Later
/// failures are transient and keep the established session.
///
/// The loading timer changes only inside `watch` writes, together with the
/// `loading` flag it measures.
pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    state: watch::Sender<SessionSnapshot>,
    epoch: AtomicU64,
    timer: Mutex<LoadingTimer>,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::uninitialized());
        Self {
            provider,
            state,
            epoch: AtomicU64::new(0),
            timer: Mutex::new(LoadingTimer::started(now())),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// How long the current read has been running. Zero when settled.
    pub fn loading_elapsed(&self, now: Instant) -> Duration {
        self.lock_timer().elapsed(now)
    }

    pub fn loading_deadline(&self, timeout: Duration) -> Option<Instant> {
        self.lock_timer().deadline(timeout)
    }

    /// Subscribes to provider events, then reads the current session.
    ///
    /// Subscribing first means a sign-in racing the initial read is never
    /// lost. The returned task runs until the provider closes its channel.
    pub async fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let events = self.provider.subscribe();
        let store = Arc::clone(self);
        let handle = tokio::spawn(async move { store.listen(events).await });
        self.refresh().await;
        handle
    }

    /// Re-reads the session from the provider.
    ///
    /// If a provider event lands while the read is in flight, the event
    /// wins and the read result is dropped.
    pub async fn refresh(&self) {
        let epoch = self.epoch.load(Ordering::SeqCst);
        self.state.send_if_modified(|snapshot| {
            if snapshot.loading {
                return false;
            }
            self.lock_timer().restart(now());
            snapshot.loading = true;
            true
        });

        let result = self.provider.get_session().await;
        let initialized = self.state.borrow().initialized;

        let next = match result {
            Ok(Some(session)) => SessionSnapshot::signed_in(session),
            Ok(None) => SessionSnapshot::signed_out(),
            Err(err) if initialized => {
                tracing::warn!(error = %err, "Identity provider unavailable, keeping current session");
                self.settle();
                return;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Identity provider unavailable, treating session as absent");
                SessionSnapshot::signed_out()
            }
        };

        // Compared inside the write so an event cannot land between the
        // check and the publish.
        self.state.send_if_modified(|snapshot| {
            self.lock_timer().stop();
            if self.epoch.load(Ordering::SeqCst) != epoch {
                tracing::debug!("Session read superseded by provider event");
                let changed = snapshot.loading;
                snapshot.loading = false;
                return changed;
            }
            if *snapshot == next {
                return false;
            }
            *snapshot = next;
            true
        });
    }

    /// Applies one provider event.
    pub fn apply(&self, event: &AuthEvent) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(event_type = event.event_type(), "Applying auth event");
        let next = match event.session() {
            Some(session) => SessionSnapshot::signed_in(session.clone()),
            None => SessionSnapshot::signed_out(),
        };
        self.publish(next);
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await?;
        self.apply(&AuthEvent::SignedOut);
        Ok(())
    }

    /// Applies events until the sender is dropped.
    pub async fn listen(&self, mut events: broadcast::Receiver<AuthEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.apply(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Auth events lagged, re-reading session");
                    self.refresh().await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Ends a read without changing identity.
    fn settle(&self) {
        self.state.send_if_modified(|snapshot| {
            self.lock_timer().stop();
            let changed = snapshot.loading;
            snapshot.loading = false;
            changed
        });
    }

    fn publish(&self, next: SessionSnapshot) {
        self.state.send_if_modified(|snapshot| {
            self.lock_timer().stop();
            if *snapshot == next {
                return false;
            }
            *snapshot = next;
            true
        });
    }

    fn lock_timer(&self) -> MutexGuard<'_, LoadingTimer> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
