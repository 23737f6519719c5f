//! Engagement bridge semantics: the named events this application emits
//! and the fixed attribute map each one carries.
//!
//! The capability in `capabilities::engagement` is the transport; this
//! module is the vocabulary. Attribute keys match what the downstream
//! campaigns are keyed on, so treat them as a wire format.

use crate::capabilities::Attribute;
use crate::catalog::{self, CatalogConfig, MovieDetail, MovieSummary};
use crate::session::{Identity, Profile};

pub const PAGE_VIEWED: &str = "Page Viewed";
pub const MOVIE_CLICKED: &str = "Movie Clicked";
pub const MOVIE_VIEWED: &str = "Movie Viewed";
pub const ADDED_TO_WATCHLIST: &str = "Added to Watchlist";

#[must_use]
pub fn page_viewed(page: &str) -> Vec<Attribute> {
    vec![Attribute::new("Page Name", page)]
}

#[must_use]
pub fn movie_clicked(movie: &MovieSummary, config: &CatalogConfig) -> Vec<Attribute> {
    vec![
        Attribute::new("id", movie.id.to_string()),
        Attribute::new("title", movie.title.clone()),
        Attribute::new("release_date", movie.release_date.clone()),
        Attribute::new("rating", movie.vote_average),
        Attribute::new("language", movie.original_language.clone()),
        Attribute::new(
            "poster_url",
            catalog::poster_url(config, movie.poster_path.as_deref()).unwrap_or_default(),
        ),
        Attribute::new(
            "backdrop_url",
            catalog::backdrop_url(config, movie.backdrop_path.as_deref()).unwrap_or_default(),
        ),
    ]
}

#[must_use]
pub fn movie_viewed(movie: &MovieDetail, config: &CatalogConfig) -> Vec<Attribute> {
    vec![
        Attribute::new("Movie ID", movie.id),
        Attribute::new("Movie Title", movie.title.clone()),
        Attribute::new("Genre", movie.genre_names().join(", ")),
        Attribute::new("Release_date", movie.release_date.clone()),
        Attribute::new("Rating", movie.vote_average),
        Attribute::new(
            "poster_url",
            catalog::poster_url(config, movie.poster_path.as_deref()).unwrap_or_default(),
        ),
        Attribute::new(
            "backdrop_url",
            catalog::backdrop_url(config, movie.backdrop_path.as_deref()).unwrap_or_default(),
        ),
    ]
}

#[must_use]
pub fn added_to_watchlist(title: &str) -> Vec<Attribute> {
    vec![Attribute::new("Movie Title", title)]
}

/// Identify payload pushed when the user signs in. Push/email opt-in
/// flags are deliberately not sent; this builder is the one place to
/// add them.
#[must_use]
pub fn login_attributes(identity: &Identity, profile: &Profile) -> Vec<Attribute> {
    vec![
        Attribute::new("Name", profile.name.clone()),
        Attribute::new("Identity", identity.as_str()),
        Attribute::new("Email", identity.as_str()),
    ]
}

/// Profile attribute sync, sent after every profile or watchlist
/// mutation. Unset fields are omitted rather than sent empty.
#[must_use]
pub fn profile_attributes(profile: &Profile) -> Vec<Attribute> {
    let mut attributes = vec![Attribute::new("Name", profile.name.clone())];
    if let Some(phone) = &profile.phone {
        attributes.push(Attribute::new("Phone", phone.clone()));
    }
    if let Some(genre) = &profile.fav_genre {
        attributes.push(Attribute::new("FavGenre", genre.clone()));
    }
    if !profile.watchlist.is_empty() {
        attributes.push(Attribute::new("Watchlist", profile.watchlist.to_delimited()));
    }
    attributes
}
