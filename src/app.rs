//! The view-state controller: screen transitions, catalog
//! synchronization and session wiring.
//!
//! The home listing keeps at most one authoritative catalog request in
//! flight. Every dispatch stamps a fresh [`FetchTag`]; a completion is
//! committed only if its tag still matches, so a response for a
//! superseded query can neither overwrite the listing nor flick the
//! loading flag.

use crate::capabilities::{Capabilities, SoftPromptConfig};
use crate::catalog::{self, CatalogQuery};
use crate::engagement;
use crate::event::Event;
use crate::model::{
    guard, DetailState, FetchTag, HomeState, InFlightFetch, Model, ProfileForm, Screen,
};
use crate::session;
use crate::view::ViewModel;
use crate::ErrorKind;

#[derive(Default)]
pub struct App;

impl App {
    fn dispatch_catalog_fetch(model: &mut Model, caps: &Capabilities) {
        let tag = FetchTag::generate();
        let query = model.home.query.clone();
        let url = catalog::listing_url(&model.config, &query);
        tracing::debug!(%tag, query = %query.describe(), "catalog fetch dispatched");
        model.home.in_flight = Some(InFlightFetch { tag, query });

        caps.http
            .get(url)
            .expect_json()
            .send(move |result| Event::CatalogFetched { tag, result });
    }

    fn dispatch_detail_fetches(model: &Model, caps: &Capabilities, movie_id: u64) {
        caps.http
            .get(catalog::detail_url(&model.config, movie_id))
            .expect_json()
            .send(move |result| Event::DetailFetched { movie_id, result });

        caps.http
            .get(catalog::credits_url(&model.config, movie_id))
            .expect_json()
            .send(move |result| Event::CreditsFetched { movie_id, result });

        caps.http
            .get(catalog::videos_url(&model.config, movie_id))
            .expect_json()
            .send(move |result| Event::VideosFetched { movie_id, result });
    }

    fn persist_session(model: &Model, caps: &Capabilities) {
        if let Some(bytes) = model.session.identity_bytes() {
            caps.key_value
                .set(session::IDENTITY_KEY.to_string(), bytes, |result| {
                    Event::StorageWritten {
                        ok: result.is_ok(),
                    }
                });
        }
        Self::persist_profile(model, caps);
    }

    fn persist_profile(model: &Model, caps: &Capabilities) {
        if let Some(bytes) = model.session.profile_bytes() {
            caps.key_value
                .set(session::PROFILE_KEY.to_string(), bytes, |result| {
                    Event::StorageWritten {
                        ok: result.is_ok(),
                    }
                });
        }
    }

    fn clear_session_storage(caps: &Capabilities) {
        for key in [session::IDENTITY_KEY, session::PROFILE_KEY] {
            caps.key_value.delete(key.to_string(), |result| {
                Event::StorageWritten {
                    ok: result.is_ok(),
                }
            });
        }
    }

    /// Emits Movie Viewed once, when both the detail and credits
    /// responses have landed successfully.
    fn record_movie_viewed(model: &mut Model, caps: &Capabilities) {
        if model.detail.viewed_recorded || !model.detail.is_loaded() {
            return;
        }
        if let Some(movie) = &model.detail.movie {
            caps.engagement.track(
                engagement::MOVIE_VIEWED,
                engagement::movie_viewed(movie, &model.config),
            );
        }
        model.detail.viewed_recorded = true;
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        match event {
            Event::AppStarted { config } => {
                model.config = config;
                caps.key_value
                    .get(session::IDENTITY_KEY.to_string(), |result| {
                        Event::IdentityRestored {
                            bytes: result.ok().flatten(),
                        }
                    });
                caps.key_value
                    .get(session::PROFILE_KEY.to_string(), |result| {
                        Event::ProfileRestored {
                            bytes: result.ok().flatten(),
                        }
                    });
                caps.render.render();
            }

            Event::IdentityRestored { bytes: Some(bytes) } => {
                if model.session.restore_identity(&bytes) {
                    tracing::info!("session restored");
                    if model.screen == Screen::Login {
                        self.update(Event::HomeOpened, model, caps);
                    }
                } else {
                    tracing::warn!("persisted identity is unreadable, staying signed out");
                }
            }
            Event::IdentityRestored { bytes: None } => {}

            Event::ProfileRestored { bytes: Some(bytes) } => {
                if !model.session.restore_profile(&bytes) {
                    tracing::warn!("persisted profile is unreadable, keeping defaults");
                }
                caps.render.render();
            }
            Event::ProfileRestored { bytes: None } => {}

            Event::LoginSubmitted { email } => match model.session.login(&email) {
                Ok(identity) => {
                    model.login_error = None;
                    tracing::info!(identity = %identity, "signed in");
                    Self::persist_session(model, caps);
                    if let Some(profile) = model.session.profile() {
                        caps.engagement
                            .identify(engagement::login_attributes(&identity, profile));
                    }
                    self.update(Event::HomeOpened, model, caps);
                }
                Err(err) => {
                    model.login_error = Some(err.user_facing_message());
                    caps.render.render();
                }
            },

            Event::HomeOpened => {
                model.screen = guard(Screen::Home, model.session.identity());
                if model.screen == Screen::Home {
                    model.detail = DetailState::default();
                    caps.engagement.track(
                        engagement::PAGE_VIEWED,
                        engagement::page_viewed(Screen::Home.name()),
                    );
                    Self::dispatch_catalog_fetch(model, caps);
                }
                caps.render.render();
            }

            Event::ProfileOpened => {
                model.screen = guard(Screen::Profile, model.session.identity());
                if model.screen == Screen::Profile {
                    if let Some(profile) = model.session.profile() {
                        model.profile_form = ProfileForm::from_profile(profile);
                    }
                }
                caps.render.render();
            }

            Event::MovieSelected { movie_id } => {
                model.screen = guard(Screen::Detail { movie_id }, model.session.identity());
                if !matches!(model.screen, Screen::Detail { .. }) {
                    caps.render.render();
                    return;
                }
                // A click on a listed tile records the event; a direct
                // route to an unlisted id has no summary to report.
                if let Some(movie) = model.home.movie(movie_id) {
                    caps.engagement.track(
                        engagement::MOVIE_CLICKED,
                        engagement::movie_clicked(movie, &model.config),
                    );
                }
                model.detail = DetailState::begin(movie_id);
                Self::dispatch_detail_fetches(model, caps, movie_id);
                caps.render.render();
            }

            Event::LogoutRequested => {
                model.session.logout();
                Self::clear_session_storage(caps);
                model.screen = Screen::Login;
                model.home = HomeState::default();
                model.detail = DetailState::default();
                model.profile_form = ProfileForm::default();
                model.toast = None;
                tracing::info!("signed out");
                caps.render.render();
            }

            Event::SearchChanged { text } => {
                // Editing the field, including clearing it, does not
                // refetch on its own.
                model.home.search_input = text;
                caps.render.render();
            }

            Event::SearchSubmitted => {
                if model.screen != Screen::Home {
                    return;
                }
                let text = model.home.search_input.trim().to_string();
                model.home.query = if text.is_empty() {
                    CatalogQuery::Filter(model.home.active_filter)
                } else {
                    CatalogQuery::Search(text)
                };
                Self::dispatch_catalog_fetch(model, caps);
                caps.render.render();
            }

            Event::FilterSelected { filter } => {
                if model.screen != Screen::Home {
                    return;
                }
                model.home.active_filter = filter;
                model.home.search_input.clear();
                model.home.query = CatalogQuery::Filter(filter);
                Self::dispatch_catalog_fetch(model, caps);
                caps.render.render();
            }

            Event::CatalogFetched { tag, result } => {
                if !model.home.accepts(tag) {
                    tracing::debug!(%tag, "stale catalog response discarded");
                    return;
                }
                model.home.in_flight = None;
                model.home.movies = match result {
                    Ok(mut response) if response.status().is_success() => {
                        response.take_body().unwrap_or_default().results
                    }
                    Ok(response) => {
                        tracing::warn!(
                            status = u16::from(response.status()),
                            "catalog listing failed"
                        );
                        Vec::new()
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "catalog listing failed");
                        Vec::new()
                    }
                };
                caps.render.render();
            }

            Event::DetailFetched { movie_id, result } => {
                if !model.detail.belongs_to(movie_id) {
                    tracing::debug!(movie_id, "stale detail response discarded");
                    return;
                }
                model.detail.detail_pending = false;
                match result {
                    Ok(mut response) if response.status().is_success() => {
                        model.detail.movie = response.take_body();
                        if model.detail.movie.is_none() {
                            model.detail.error = Some(ErrorKind::Upstream);
                        }
                    }
                    Ok(response) => {
                        let status = u16::from(response.status());
                        model.detail.error = Some(if status == 404 {
                            ErrorKind::NotFound
                        } else {
                            ErrorKind::Upstream
                        });
                        tracing::warn!(movie_id, status, "movie detail fetch failed");
                    }
                    Err(err) => {
                        model.detail.error = Some(ErrorKind::Upstream);
                        tracing::warn!(movie_id, error = %err, "movie detail fetch failed");
                    }
                }
                Self::record_movie_viewed(model, caps);
                caps.render.render();
            }

            Event::CreditsFetched { movie_id, result } => {
                if !model.detail.belongs_to(movie_id) {
                    tracing::debug!(movie_id, "stale credits response discarded");
                    return;
                }
                model.detail.credits_pending = false;
                match result {
                    Ok(mut response) if response.status().is_success() => {
                        model.detail.cast = response.take_body().unwrap_or_default().top_billed();
                    }
                    Ok(response) => {
                        let status = u16::from(response.status());
                        model.detail.error = Some(if status == 404 {
                            ErrorKind::NotFound
                        } else {
                            ErrorKind::Upstream
                        });
                        tracing::warn!(movie_id, status, "credits fetch failed");
                    }
                    Err(err) => {
                        model.detail.error = Some(ErrorKind::Upstream);
                        tracing::warn!(movie_id, error = %err, "credits fetch failed");
                    }
                }
                Self::record_movie_viewed(model, caps);
                caps.render.render();
            }

            Event::VideosFetched { movie_id, result } => {
                if !model.detail.belongs_to(movie_id) {
                    tracing::debug!(movie_id, "stale videos response discarded");
                    return;
                }
                // Having no trailer is not a failure state.
                let videos = match result {
                    Ok(mut response) if response.status().is_success() => {
                        response.take_body().unwrap_or_default().results
                    }
                    Ok(_) | Err(_) => Vec::new(),
                };
                model.detail.trailer_key =
                    catalog::first_trailer_key(&videos).map(str::to_string);
                caps.render.render();
            }

            Event::WatchlistAddRequested { movie_id } => {
                if !model.session.add_to_watchlist(movie_id) {
                    return;
                }
                Self::persist_profile(model, caps);
                if let Some(profile) = model.session.profile() {
                    caps.engagement
                        .update_profile(engagement::profile_attributes(profile));
                }
                let title = model
                    .detail
                    .movie
                    .as_ref()
                    .filter(|m| m.id == movie_id)
                    .map(|m| m.title.clone())
                    .or_else(|| model.home.movie(movie_id).map(|m| m.title.clone()));
                if let Some(title) = title {
                    caps.engagement.track(
                        engagement::ADDED_TO_WATCHLIST,
                        engagement::added_to_watchlist(&title),
                    );
                    model.show_toast(format!("'{title}' added to your watchlist"));
                } else {
                    model.show_toast("Added to your watchlist");
                }
                caps.render.render();
            }

            Event::NameChanged { value } => {
                model.profile_form.name = value;
                caps.render.render();
            }

            Event::FavGenreChanged { value } => {
                model.profile_form.fav_genre = value;
                caps.render.render();
            }

            Event::PhoneChanged { value } => {
                // The error is judged against the raw input: an entry
                // that sanitizes away entirely is still a bad entry.
                let sanitized = session::sanitize_phone(&value);
                model.profile_form.phone_error = if value.trim().is_empty() {
                    None
                } else {
                    session::validate_phone(&sanitized)
                        .err()
                        .map(|e| e.user_facing_message())
                };
                model.profile_form.phone = sanitized;
                caps.render.render();
            }

            Event::ProfileSaveRequested => {
                if model.screen != Screen::Profile {
                    return;
                }
                if model.profile_form.phone_error.is_some() {
                    // Blocked until the field error is corrected.
                    caps.render.render();
                    return;
                }
                let update = model.profile_form.to_update();
                if model.session.update_profile(update).is_none() {
                    return;
                }
                Self::persist_profile(model, caps);
                if let Some(profile) = model.session.profile() {
                    caps.engagement
                        .update_profile(engagement::profile_attributes(profile));
                }
                model.show_toast("Profile saved");
                caps.render.render();
            }

            Event::NotificationPromptRequested => {
                caps.engagement
                    .request_notification_prompt(SoftPromptConfig::default());
            }

            Event::ToastDismissed => {
                model.toast = None;
                caps.render.render();
            }

            Event::StorageWritten { ok } => {
                if !ok {
                    tracing::warn!("session persistence write failed");
                }
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from(model)
    }
}
