use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{CastMember, CatalogConfig, CatalogQuery, Filter, MovieDetail, MovieSummary};
use crate::session::{Identity, Profile, ProfileUpdate, Session};
use crate::ErrorKind;

/// Identifies one outstanding catalog request. A completion whose tag
/// no longer matches the in-flight tag is stale and must be discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchTag(Uuid);

impl FetchTag {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for FetchTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Login,
    Home,
    Detail {
        movie_id: u64,
    },
    Profile,
}

impl Screen {
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Home => "Home",
            Self::Detail { .. } => "Detail",
            Self::Profile => "Profile",
        }
    }
}

/// Navigation guard: a pure function of the target and the identity.
/// Any authenticated screen without an identity redirects to Login.
#[must_use]
pub fn guard(target: Screen, identity: Option<&Identity>) -> Screen {
    if target.requires_auth() && identity.is_none() {
        Screen::Login
    } else {
        target
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InFlightFetch {
    pub tag: FetchTag,
    pub query: CatalogQuery,
}

/// Home screen state: the active query, the listing it produced, and at
/// most one authoritative outstanding request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HomeState {
    pub active_filter: Filter,
    pub search_input: String,
    pub query: CatalogQuery,
    pub movies: Vec<MovieSummary>,
    pub in_flight: Option<InFlightFetch>,
}

impl HomeState {
    /// Loading is true exactly while the authoritative request for the
    /// current query is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a completion with this tag is still authoritative.
    #[must_use]
    pub fn accepts(&self, tag: FetchTag) -> bool {
        self.in_flight.as_ref().is_some_and(|f| f.tag == tag)
    }

    #[must_use]
    pub fn movie(&self, movie_id: u64) -> Option<&MovieSummary> {
        self.movies.iter().find(|m| m.id == movie_id)
    }
}

/// Detail screen state. The primary detail fetch and the credits fetch
/// run concurrently; the view counts as loaded only once both are in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetailState {
    pub movie_id: Option<u64>,
    pub movie: Option<MovieDetail>,
    pub cast: Vec<CastMember>,
    pub trailer_key: Option<String>,
    pub detail_pending: bool,
    pub credits_pending: bool,
    pub viewed_recorded: bool,
    pub error: Option<ErrorKind>,
}

impl DetailState {
    #[must_use]
    pub fn begin(movie_id: u64) -> Self {
        Self {
            movie_id: Some(movie_id),
            detail_pending: true,
            credits_pending: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn belongs_to(&self, movie_id: u64) -> bool {
        self.movie_id == Some(movie_id)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.detail_pending || self.credits_pending
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        !self.is_loading() && self.error.is_none() && self.movie.is_some()
    }
}

/// Profile form draft, validated field-by-field as the user types.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub phone: String,
    pub fav_genre: String,
    pub phone_error: Option<String>,
}

impl ProfileForm {
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            phone: profile.phone.clone().unwrap_or_default(),
            fav_genre: profile.fav_genre.clone().unwrap_or_default(),
            phone_error: None,
        }
    }

    /// The partial update a save submits. Empty phone/genre inputs are
    /// treated as unspecified, not as clears.
    #[must_use]
    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            name: Some(self.name.clone()),
            phone: (!self.phone.is_empty()).then(|| self.phone.clone()),
            fav_genre: (!self.fav_genre.is_empty()).then(|| self.fav_genre.clone()),
        }
    }
}

#[derive(Default)]
pub struct Model {
    pub screen: Screen,
    pub config: CatalogConfig,
    pub session: Session,
    pub home: HomeState,
    pub detail: DetailState,
    pub profile_form: ProfileForm,
    pub login_error: Option<String>,
    pub toast: Option<String>,
}

impl Model {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(message.into());
    }
}
