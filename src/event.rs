use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogConfig, CatalogPage, CreditsPage, Filter, MovieDetail, VideoPage};
use crate::model::FetchTag;

/// Everything that can happen to the core. Shell-facing variants are
/// serializable; capability completions are core-local and skipped.
#[derive(Serialize, Deserialize)]
pub enum Event {
    // Lifecycle
    AppStarted {
        config: CatalogConfig,
    },

    // Login screen
    LoginSubmitted {
        email: String,
    },

    // Navigation
    HomeOpened,
    ProfileOpened,
    MovieSelected {
        movie_id: u64,
    },
    LogoutRequested,

    // Home feed
    SearchChanged {
        text: String,
    },
    SearchSubmitted,
    FilterSelected {
        filter: Filter,
    },

    // Detail screen
    WatchlistAddRequested {
        movie_id: u64,
    },

    // Profile form
    NameChanged {
        value: String,
    },
    PhoneChanged {
        value: String,
    },
    FavGenreChanged {
        value: String,
    },
    ProfileSaveRequested,
    NotificationPromptRequested,
    ToastDismissed,

    // Capability completions
    #[serde(skip)]
    CatalogFetched {
        tag: FetchTag,
        result: crux_http::Result<crux_http::Response<CatalogPage>>,
    },
    #[serde(skip)]
    DetailFetched {
        movie_id: u64,
        result: crux_http::Result<crux_http::Response<MovieDetail>>,
    },
    #[serde(skip)]
    CreditsFetched {
        movie_id: u64,
        result: crux_http::Result<crux_http::Response<CreditsPage>>,
    },
    #[serde(skip)]
    VideosFetched {
        movie_id: u64,
        result: crux_http::Result<crux_http::Response<VideoPage>>,
    },
    #[serde(skip)]
    IdentityRestored {
        bytes: Option<Vec<u8>>,
    },
    #[serde(skip)]
    ProfileRestored {
        bytes: Option<Vec<u8>>,
    },
    #[serde(skip)]
    StorageWritten {
        ok: bool,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted { .. } => "app_started",
            Self::LoginSubmitted { .. } => "login_submitted",
            Self::HomeOpened => "home_opened",
            Self::ProfileOpened => "profile_opened",
            Self::MovieSelected { .. } => "movie_selected",
            Self::LogoutRequested => "logout_requested",
            Self::SearchChanged { .. } => "search_changed",
            Self::SearchSubmitted => "search_submitted",
            Self::FilterSelected { .. } => "filter_selected",
            Self::WatchlistAddRequested { .. } => "watchlist_add_requested",
            Self::NameChanged { .. } => "name_changed",
            Self::PhoneChanged { .. } => "phone_changed",
            Self::FavGenreChanged { .. } => "fav_genre_changed",
            Self::ProfileSaveRequested => "profile_save_requested",
            Self::NotificationPromptRequested => "notification_prompt_requested",
            Self::ToastDismissed => "toast_dismissed",
            Self::CatalogFetched { .. } => "catalog_fetched",
            Self::DetailFetched { .. } => "detail_fetched",
            Self::CreditsFetched { .. } => "credits_fetched",
            Self::VideosFetched { .. } => "videos_fetched",
            Self::IdentityRestored { .. } => "identity_restored",
            Self::ProfileRestored { .. } => "profile_restored",
            Self::StorageWritten { .. } => "storage_written",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::LoginSubmitted { .. }
                | Self::HomeOpened
                | Self::ProfileOpened
                | Self::MovieSelected { .. }
                | Self::LogoutRequested
                | Self::SearchChanged { .. }
                | Self::SearchSubmitted
                | Self::FilterSelected { .. }
                | Self::WatchlistAddRequested { .. }
                | Self::NameChanged { .. }
                | Self::PhoneChanged { .. }
                | Self::FavGenreChanged { .. }
                | Self::ProfileSaveRequested
                | Self::NotificationPromptRequested
                | Self::ToastDismissed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_are_not_user_initiated() {
        assert!(Event::SearchSubmitted.is_user_initiated());
        assert!(Event::LogoutRequested.is_user_initiated());
        assert!(!Event::StorageWritten { ok: true }.is_user_initiated());
        assert!(!Event::IdentityRestored { bytes: None }.is_user_initiated());
    }

    #[test]
    fn shell_events_deserialize_by_name() {
        let event: Event =
            serde_json::from_str(r#"{"LoginSubmitted": {"email": "a@b.com"}}"#).unwrap();
        assert_eq!(event.name(), "login_submitted");

        let event: Event = serde_json::from_str(r#"{"FilterSelected": {"filter": "top_rated"}}"#)
            .unwrap();
        assert_eq!(event.name(), "filter_selected");
    }
}
