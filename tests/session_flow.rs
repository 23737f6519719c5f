use crux_core::testing::AppTester;

use moviedeck_core::capabilities::EngagementOperation;
use moviedeck_core::{App, CatalogConfig, Effect, Event, Model, Screen};

fn test_app() -> AppTester<App, Effect> {
    AppTester::default()
}

fn start(app: &AppTester<App, Effect>, model: &mut Model) {
    app.update(
        Event::AppStarted {
            config: CatalogConfig::new("test-key"),
        },
        model,
    );
}

fn login(app: &AppTester<App, Effect>, model: &mut Model, email: &str) -> Vec<Effect> {
    let update = app.update(
        Event::LoginSubmitted {
            email: email.to_string(),
        },
        model,
    );
    update.effects
}

fn tracked_events(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Engagement(request) => match &request.operation {
                EngagementOperation::Track { name, .. } => Some(name.clone()),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn has_identify(effects: &[Effect]) -> bool {
    effects.iter().any(|effect| {
        matches!(
            effect,
            Effect::Engagement(request)
                if matches!(request.operation, EngagementOperation::Identify { .. })
        )
    })
}

fn storage_writes(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::KeyValue(_)))
        .count()
}

fn http_urls(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Http(request) => Some(request.operation.url.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn login_normalizes_the_email_and_lands_on_home() {
    let app = test_app();
    let mut model = Model::default();
    start(&app, &mut model);

    let effects = login(&app, &mut model, "  Ada@Example.COM ");

    assert_eq!(model.screen, Screen::Home);
    assert_eq!(
        model.session.identity().unwrap().as_str(),
        "ada@example.com"
    );

    // Identity and profile are persisted before the update returns.
    assert_eq!(storage_writes(&effects), 2);
    assert!(has_identify(&effects));

    // Home entry records the page view and refreshes the active query.
    assert!(tracked_events(&effects).contains(&"Page Viewed".to_string()));
    let urls = http_urls(&effects);
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("movie/popular"));
    assert!(urls[0].contains("api_key=test-key"));
    assert!(model.home.is_loading());
}

#[test]
fn empty_email_is_rejected_inline() {
    let app = test_app();
    let mut model = Model::default();
    start(&app, &mut model);

    let effects = login(&app, &mut model, "   ");

    assert_eq!(model.screen, Screen::Login);
    assert!(model.login_error.is_some());
    assert!(!model.is_authenticated());
    assert!(http_urls(&effects).is_empty());
    assert_eq!(storage_writes(&effects), 0);
    assert!(!has_identify(&effects));
}

#[test]
fn relogin_with_the_same_email_is_idempotent() {
    let app = test_app();
    let mut model = Model::default();
    start(&app, &mut model);
    login(&app, &mut model, "ada@example.com");

    app.update(Event::ProfileOpened, &mut model);
    app.update(
        Event::NameChanged {
            value: "Ada Lovelace".into(),
        },
        &mut model,
    );
    app.update(Event::ProfileSaveRequested, &mut model);

    login(&app, &mut model, " ADA@EXAMPLE.com ");

    assert_eq!(
        model.session.identity().unwrap().as_str(),
        "ada@example.com"
    );
    assert_eq!(model.session.profile().unwrap().name, "Ada Lovelace");
}

#[test]
fn unauthenticated_navigation_is_forced_back_to_login() {
    let app = test_app();
    let mut model = Model::default();
    start(&app, &mut model);

    let update = app.update(Event::HomeOpened, &mut model);
    assert_eq!(model.screen, Screen::Login);
    assert!(http_urls(&update.effects).is_empty());

    app.update(Event::MovieSelected { movie_id: 603 }, &mut model);
    assert_eq!(model.screen, Screen::Login);

    app.update(Event::ProfileOpened, &mut model);
    assert_eq!(model.screen, Screen::Login);
}

#[test]
fn logout_clears_the_session_immediately() {
    let app = test_app();
    let mut model = Model::default();
    start(&app, &mut model);
    login(&app, &mut model, "ada@example.com");

    let update = app.update(Event::LogoutRequested, &mut model);

    assert_eq!(model.screen, Screen::Login);
    assert!(!model.is_authenticated());
    assert!(model.session.profile().is_none());
    assert!(model.home.movies.is_empty());
    // Both persisted keys are cleared.
    assert_eq!(storage_writes(&update.effects), 2);
}

#[test]
fn profile_saves_merge_field_by_field() {
    let app = test_app();
    let mut model = Model::default();
    start(&app, &mut model);
    login(&app, &mut model, "ada@example.com");

    app.update(Event::ProfileOpened, &mut model);
    app.update(Event::NameChanged { value: "X".into() }, &mut model);
    app.update(Event::ProfileSaveRequested, &mut model);

    app.update(Event::ProfileOpened, &mut model);
    app.update(
        Event::PhoneChanged {
            value: "+911234567890".into(),
        },
        &mut model,
    );
    let update = app.update(Event::ProfileSaveRequested, &mut model);

    let profile = model.session.profile().unwrap();
    assert_eq!(profile.name, "X");
    assert_eq!(profile.phone.as_deref(), Some("+911234567890"));
    assert_eq!(storage_writes(&update.effects), 1);
    assert!(update.effects.iter().any(|effect| {
        matches!(
            effect,
            Effect::Engagement(request)
                if matches!(request.operation, EngagementOperation::UpdateProfile { .. })
        )
    }));
}

#[test]
fn invalid_phone_blocks_the_save_until_corrected() {
    let app = test_app();
    let mut model = Model::default();
    start(&app, &mut model);
    login(&app, &mut model, "ada@example.com");
    app.update(Event::ProfileOpened, &mut model);

    app.update(Event::PhoneChanged { value: "abc".into() }, &mut model);
    assert!(model.profile_form.phone_error.is_some());

    let update = app.update(Event::ProfileSaveRequested, &mut model);
    assert_eq!(storage_writes(&update.effects), 0);
    assert_eq!(model.session.profile().unwrap().phone, None);

    app.update(
        Event::PhoneChanged {
            value: "+911234567890".into(),
        },
        &mut model,
    );
    assert_eq!(model.profile_form.phone_error, None);

    let update = app.update(Event::ProfileSaveRequested, &mut model);
    assert_eq!(storage_writes(&update.effects), 1);
    assert_eq!(
        model.session.profile().unwrap().phone.as_deref(),
        Some("+911234567890")
    );
}

#[test]
fn adding_the_same_movie_twice_keeps_one_watchlist_entry() {
    let app = test_app();
    let mut model = Model::default();
    start(&app, &mut model);
    login(&app, &mut model, "ada@example.com");

    let update = app.update(Event::WatchlistAddRequested { movie_id: 42 }, &mut model);
    assert_eq!(model.session.profile().unwrap().watchlist.ids(), &[42]);
    assert_eq!(storage_writes(&update.effects), 1);

    let update = app.update(Event::WatchlistAddRequested { movie_id: 42 }, &mut model);
    assert_eq!(model.session.profile().unwrap().watchlist.ids(), &[42]);
    // A duplicate add is a complete no-op: nothing persisted, nothing
    // emitted.
    assert!(update.effects.is_empty());
}

#[test]
fn restored_identity_resumes_on_home() {
    let app = test_app();
    let mut model = Model::default();
    start(&app, &mut model);

    let bytes = serde_json::to_vec("ada@example.com").unwrap();
    let update = app.update(
        Event::IdentityRestored { bytes: Some(bytes) },
        &mut model,
    );

    assert_eq!(model.screen, Screen::Home);
    assert!(model.is_authenticated());
    assert!(tracked_events(&update.effects).contains(&"Page Viewed".to_string()));
    assert_eq!(http_urls(&update.effects).len(), 1);
}

#[test]
fn unreadable_persisted_identity_stays_signed_out() {
    let app = test_app();
    let mut model = Model::default();
    start(&app, &mut model);

    let update = app.update(
        Event::IdentityRestored {
            bytes: Some(b"not json".to_vec()),
        },
        &mut model,
    );

    assert_eq!(model.screen, Screen::Login);
    assert!(!model.is_authenticated());
    assert!(update.effects.is_empty());
}

#[test]
fn notification_prompt_is_forwarded_with_the_default_config() {
    let app = test_app();
    let mut model = Model::default();
    start(&app, &mut model);
    login(&app, &mut model, "ada@example.com");

    let update = app.update(Event::NotificationPromptRequested, &mut model);
    let prompted = update.effects.iter().any(|effect| {
        matches!(
            effect,
            Effect::Engagement(request)
                if matches!(
                    &request.operation,
                    EngagementOperation::NotificationPrompt { config }
                        if config.title_text == "Turn On Notifications?"
                )
        )
    });
    assert!(prompted);
}
