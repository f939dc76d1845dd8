//! In-memory session state and its transitions.
//!
//! Every mutation of the session goes through one of the methods below, so
//! the phase machine and the "principal iff authenticated" invariant are
//! enforced in one place.

use session_sdk::{Principal, SessionPhase, SessionSnapshot, SessionView, UserSettings};

#[derive(Debug, Default)]
pub struct SessionState {
    phase: SessionPhase,
    settings: UserSettings,
}

impl SessionState {
    /// Enter `Initializing`. Returns `false` if initialization already started.
    pub fn begin_initialize(&mut self) -> bool {
        if self.phase != SessionPhase::Uninitialized {
            return false;
        }
        self.phase = SessionPhase::Initializing;
        true
    }

    /// Leave `Initializing`, restoring a session if the startup check found one.
    ///
    /// No-op outside `Initializing`.
    pub fn finish_initialize(&mut self, restored: Option<(Principal, UserSettings)>) {
        if self.phase != SessionPhase::Initializing {
            return;
        }
        match restored {
            Some((principal, settings)) => {
                self.phase = SessionPhase::Authenticated { principal };
                self.settings = settings;
            }
            None => {
                self.phase = SessionPhase::Unauthenticated;
                self.settings = UserSettings::default();
            }
        }
    }

    /// Whether the startup session check has finished.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Authenticated { .. } | SessionPhase::Unauthenticated
        )
    }

    pub fn authenticate(&mut self, principal: Principal, settings: UserSettings) {
        self.phase = SessionPhase::Authenticated { principal };
        self.settings = settings;
    }

    /// Clear the principal and reset the in-memory settings to defaults.
    pub fn sign_out(&mut self) {
        self.phase = SessionPhase::Unauthenticated;
        self.settings = UserSettings::default();
    }

    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        match &self.phase {
            SessionPhase::Authenticated { principal } => Some(principal),
            _ => None,
        }
    }

    /// Replace the settings if the principal is still `expected`.
    ///
    /// Returns `false` when the session changed hands in the meantime.
    pub fn replace_settings(&mut self, expected: Option<&Principal>, settings: UserSettings) -> bool {
        if self.principal() != expected {
            return false;
        }
        self.settings = settings;
        true
    }

    #[must_use]
    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(self.phase.clone())
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            snapshot: self.snapshot(),
            settings: self.settings.clone(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn principal(s: &str) -> Principal {
        Principal::parse(s).unwrap()
    }

    fn named(name: &str) -> UserSettings {
        UserSettings {
            display_name: name.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn initialize_only_once() {
        let mut state = SessionState::default();
        assert!(state.begin_initialize());
        assert!(state.snapshot().initializing());
        assert!(!state.begin_initialize());

        state.finish_initialize(None);
        assert!(!state.snapshot().initializing());
        assert!(!state.begin_initialize());
    }

    #[test]
    fn finish_initialize_restores_session() {
        let mut state = SessionState::default();
        state.begin_initialize();
        state.finish_initialize(Some((principal("abc"), named("Alice"))));

        let snap = state.snapshot();
        assert!(snap.authenticated());
        assert_eq!(snap.principal().map(Principal::as_str), Some("abc"));
        assert_eq!(state.settings().display_name, "Alice");
    }

    #[test]
    fn finish_initialize_outside_initializing_is_ignored() {
        let mut state = SessionState::default();
        state.finish_initialize(Some((principal("abc"), named("Alice"))));
        assert_eq!(state.snapshot(), SessionSnapshot::default());
    }

    #[test]
    fn sign_out_resets_settings() {
        let mut state = SessionState::default();
        state.authenticate(principal("abc"), named("Bob"));
        state.sign_out();
        assert!(!state.snapshot().authenticated());
        assert_eq!(state.settings(), &UserSettings::default());
    }

    #[test]
    fn replace_settings_checks_principal() {
        let mut state = SessionState::default();
        let abc = principal("abc");
        state.authenticate(abc.clone(), UserSettings::default());

        assert!(state.replace_settings(Some(&abc), named("Bob")));
        assert!(!state.replace_settings(None, named("Eve")));
        assert_eq!(state.settings().display_name, "Bob");
    }
}
