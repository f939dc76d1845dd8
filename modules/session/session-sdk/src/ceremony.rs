//! Adapter from callback-driven login flows to a single awaitable result.
//!
//! Browser-style identity providers report the end of a login ceremony by
//! invoking one of two callbacks. [`LoginCeremony::new`] splits that into a
//! cloneable [`LoginCallbacks`] handle for the provider side and a
//! [`LoginCeremony`] to await on the session side.
//!
//! ```ignore
//! let (callbacks, ceremony) = LoginCeremony::new();
//! let on_error = callbacks.clone();
//! popup.on_done(move || callbacks.on_success());
//! popup.on_fail(move |reason| on_error.on_error(reason));
//! ceremony.wait().await?;
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::IdentityError;

type Outcome = Result<(), IdentityError>;

/// Provider-side handle. The first callback wins; later calls are ignored.
///
/// Dropping every clone without firing resolves the ceremony to
/// [`IdentityError::Abandoned`].
#[derive(Clone)]
pub struct LoginCallbacks {
    tx: Arc<Mutex<Option<oneshot::Sender<Outcome>>>>,
}

impl std::fmt::Debug for LoginCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCallbacks")
            .field("settled", &self.is_settled())
            .finish_non_exhaustive()
    }
}

impl LoginCallbacks {
    /// Report a successful ceremony. Returns `false` if already settled.
    #[allow(clippy::must_use_candidate)]
    pub fn on_success(&self) -> bool {
        self.settle(Ok(()))
    }

    /// Report a failed ceremony. Returns `false` if already settled.
    #[allow(clippy::must_use_candidate)]
    pub fn on_error(&self, reason: impl Into<String>) -> bool {
        self.settle(Err(IdentityError::Rejected(reason.into())))
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.tx.lock().is_none()
    }

    fn settle(&self, outcome: Outcome) -> bool {
        let Some(tx) = self.tx.lock().take() else {
            tracing::debug!("login ceremony already settled; ignoring callback");
            return false;
        };
        if tx.send(outcome).is_err() {
            tracing::debug!("login caller stopped waiting before the ceremony settled");
        }
        true
    }
}

/// Session-side handle awaiting the ceremony outcome.
#[derive(Debug)]
pub struct LoginCeremony {
    rx: oneshot::Receiver<Outcome>,
}

impl LoginCeremony {
    #[must_use]
    pub fn new() -> (LoginCallbacks, Self) {
        let (tx, rx) = oneshot::channel();
        (
            LoginCallbacks {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            Self { rx },
        )
    }

    /// Wait for the first callback.
    ///
    /// No timeout is applied: a ceremony that never settles keeps this
    /// future pending.
    ///
    /// # Errors
    ///
    /// Returns the error passed to [`LoginCallbacks::on_error`], or
    /// [`IdentityError::Abandoned`] if all callbacks were dropped unfired.
    pub async fn wait(self) -> Outcome {
        self.rx.await.unwrap_or(Err(IdentityError::Abandoned))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_resolves_ok() {
        let (cb, ceremony) = LoginCeremony::new();
        assert!(cb.on_success());
        assert_eq!(ceremony.wait().await, Ok(()));
    }

    #[tokio::test]
    async fn error_carries_reason() {
        let (cb, ceremony) = LoginCeremony::new();
        cb.on_error("user cancelled");
        assert_eq!(
            ceremony.wait().await,
            Err(IdentityError::Rejected("user cancelled".into()))
        );
    }

    #[tokio::test]
    async fn first_callback_wins() {
        let (cb, ceremony) = LoginCeremony::new();
        let other = cb.clone();
        assert!(cb.on_error("denied"));
        assert!(!other.on_success());
        assert!(other.is_settled());
        assert_eq!(
            ceremony.wait().await,
            Err(IdentityError::Rejected("denied".into()))
        );
    }

    #[tokio::test]
    async fn dropped_callbacks_abandon() {
        let (cb, ceremony) = LoginCeremony::new();
        let clone = cb.clone();
        drop(cb);
        drop(clone);
        assert_eq!(ceremony.wait().await, Err(IdentityError::Abandoned));
    }

    #[tokio::test]
    async fn settles_from_another_task() {
        let (cb, ceremony) = LoginCeremony::new();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            cb.on_success();
        });
        assert_eq!(ceremony.wait().await, Ok(()));
    }
}
