#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end session flows against the static identity provider and the
//! file-backed settings store.

use std::path::Path;
use std::sync::Arc;

use session::{
    Access, FileSettingsStore, Gate, SessionClient, SessionConfig, SessionError, SessionModule,
    StaticIdentityConfig, StaticIdentityProvider, UserSettings,
};
use tempfile::TempDir;

fn build(root: &Path, identity: StaticIdentityConfig) -> SessionModule {
    let identity = StaticIdentityConfig {
        session_file: Some(root.join("session")),
        ..identity
    };
    SessionModule::new(
        &SessionConfig::default(),
        Arc::new(StaticIdentityProvider::new(identity)),
        Arc::new(FileSettingsStore::open(root.join("settings")).unwrap()),
    )
    .unwrap()
}

fn edited(name: &str) -> UserSettings {
    let mut s = UserSettings::default();
    s.display_name = name.to_owned();
    s.preferences.theme = "light".to_owned();
    s
}

#[tokio::test]
async fn fresh_start_is_unauthenticated_with_defaults() {
    let dir = TempDir::new().unwrap();
    let client = build(dir.path(), StaticIdentityConfig::default()).client();

    assert_eq!(client.snapshot().gate(Access::Authenticated), Gate::Pending);
    let snap = client.initialize().await;

    assert!(!snap.authenticated());
    assert_eq!(snap.principal(), None);
    assert_eq!(snap.gate(Access::Authenticated), Gate::RequireSignIn);
    assert_eq!(snap.gate(Access::Public), Gate::Allow);
    assert_eq!(client.user_settings(), UserSettings::default());
}

#[tokio::test]
async fn settings_survive_restart_for_same_principal() {
    let dir = TempDir::new().unwrap();

    let first = build(dir.path(), StaticIdentityConfig::default()).client();
    first.initialize().await;
    let snap = first.login().await.unwrap();
    assert_eq!(snap.principal().unwrap().as_str(), "2vxsx-fae");
    assert_eq!(client_name(&*first), UserSettings::DEFAULT_DISPLAY_NAME);

    first.update_user_settings(edited("Alice")).await.unwrap();
    drop(first);

    let second = build(dir.path(), StaticIdentityConfig::default()).client();
    let snap = second.initialize().await;
    assert!(snap.authenticated());
    assert_eq!(second.user_settings(), edited("Alice"));
}

#[tokio::test]
async fn logout_resets_memory_but_keeps_record() {
    let dir = TempDir::new().unwrap();
    let client = build(dir.path(), StaticIdentityConfig::default()).client();
    client.initialize().await;
    client.login().await.unwrap();
    client.update_user_settings(edited("Bob")).await.unwrap();

    let snap = client.logout().await.unwrap();
    assert!(!snap.authenticated());
    assert_eq!(client.user_settings(), UserSettings::default());

    client.login().await.unwrap();
    assert_eq!(client.user_settings(), edited("Bob"));
}

#[tokio::test]
async fn rejected_login_keeps_previous_state() {
    let dir = TempDir::new().unwrap();
    let client = build(
        dir.path(),
        StaticIdentityConfig {
            reject_login_with: Some("user closed the window".into()),
            ..Default::default()
        },
    )
    .client();
    client.initialize().await;

    let err = client.login().await.unwrap_err();
    assert_eq!(err, SessionError::login_failed("user closed the window"));
    assert!(!client.snapshot().authenticated());
    assert_eq!(client.user_settings(), UserSettings::default());
}

#[tokio::test]
async fn failed_logout_keeps_session() {
    let dir = TempDir::new().unwrap();
    let client = build(
        dir.path(),
        StaticIdentityConfig {
            fail_logout_with: Some("network down".into()),
            ..Default::default()
        },
    )
    .client();
    client.initialize().await;
    client.login().await.unwrap();

    let err = client.logout().await.unwrap_err();
    assert!(matches!(err, SessionError::LogoutFailed { .. }));
    assert!(client.snapshot().authenticated());
}

#[tokio::test]
async fn subscribers_see_login() {
    let dir = TempDir::new().unwrap();
    let client = build(dir.path(), StaticIdentityConfig::default()).client();
    let mut rx = client.subscribe();

    client.initialize().await;
    client.login().await.unwrap();

    rx.changed().await.unwrap();
    let view = rx.borrow_and_update().clone();
    assert!(view.snapshot.authenticated());
    assert_eq!(view.settings, UserSettings::default());
}

#[tokio::test]
async fn invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = SessionConfig {
        settings_key_prefix: String::new(),
        ..Default::default()
    };
    let result = SessionModule::new(
        &config,
        Arc::new(StaticIdentityProvider::new(StaticIdentityConfig::default())),
        Arc::new(FileSettingsStore::open(dir.path()).unwrap()),
    );
    assert!(result.is_err());
}

fn client_name(client: &dyn SessionClient) -> String {
    client.user_settings().display_name
}
