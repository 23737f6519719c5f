//! Remote catalog client: typed filters, request URLs and response
//! payloads for the upstream movie metadata service.
//!
//! Requests themselves go out through the HTTP capability; this module
//! only knows how to build them and how to read what comes back. Every
//! upstream-owned field carries `#[serde(default)]` so a malformed or
//! partial payload degrades to an empty value instead of a parse error.

use serde::{Deserialize, Serialize};

pub const API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const YOUTUBE_EMBED_URL: &str = "https://www.youtube.com/embed";

pub const POSTER_SIZE: &str = "w300";
pub const BACKDROP_SIZE: &str = "w780";
pub const CAST_PROFILE_SIZE: &str = "w185";

/// Cast lists are cut to the top billed entries, in upstream order.
pub const MAX_CAST_MEMBERS: usize = 10;

pub const TRAILER_SITE: &str = "YouTube";
pub const TRAILER_KIND: &str = "Trailer";

const SEARCH_PATH: &str = "search/movie";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub api_base: String,
    pub image_base: String,
    /// Supplied by the shell from its environment.
    pub api_key: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE_URL.into(),
            image_base: IMAGE_BASE_URL.into(),
            api_key: String::new(),
        }
    }
}

impl CatalogConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

/// The fixed listing filters offered as chips on the home screen. Each
/// maps to an upstream endpoint with baked-in parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    Popular,
    TopRated,
    Anime,
    Horror,
}

impl Filter {
    pub const ALL: [Self; 4] = [Self::Popular, Self::TopRated, Self::Anime, Self::Horror];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Popular => "Popular",
            Self::TopRated => "Top Rated",
            Self::Anime => "Anime",
            Self::Horror => "Horror",
        }
    }

    const fn path(self) -> &'static str {
        match self {
            Self::Popular => "movie/popular",
            Self::TopRated => "movie/top_rated",
            Self::Anime | Self::Horror => "discover/movie",
        }
    }

    const fn params(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Popular => &[("language", "en-US"), ("page", "1")],
            Self::TopRated => &[],
            Self::Anime => &[("with_genres", "16"), ("sort_by", "popularity.desc")],
            Self::Horror => &[("with_genres", "27"), ("sort_by", "popularity.desc")],
        }
    }
}

/// The active catalog query: exactly one of these drives the home
/// listing at any time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogQuery {
    Filter(Filter),
    Search(String),
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self::Filter(Filter::default())
    }
}

impl CatalogQuery {
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Filter(filter) => format!("filter:{}", filter.label()),
            Self::Search(text) => format!("search:{text}"),
        }
    }
}

fn endpoint_url(config: &CatalogConfig, path: &str, params: &[(&str, &str)]) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("api_key", &config.api_key);
    for (key, value) in params {
        query.append_pair(key, value);
    }
    format!(
        "{}/{}?{}",
        config.api_base.trim_end_matches('/'),
        path,
        query.finish()
    )
}

#[must_use]
pub fn listing_url(config: &CatalogConfig, query: &CatalogQuery) -> String {
    match query {
        CatalogQuery::Filter(filter) => endpoint_url(config, filter.path(), filter.params()),
        CatalogQuery::Search(text) => endpoint_url(config, SEARCH_PATH, &[("query", text)]),
    }
}

#[must_use]
pub fn detail_url(config: &CatalogConfig, movie_id: u64) -> String {
    endpoint_url(config, &format!("movie/{movie_id}"), &[])
}

#[must_use]
pub fn credits_url(config: &CatalogConfig, movie_id: u64) -> String {
    endpoint_url(config, &format!("movie/{movie_id}/credits"), &[])
}

#[must_use]
pub fn videos_url(config: &CatalogConfig, movie_id: u64) -> String {
    endpoint_url(config, &format!("movie/{movie_id}/videos"), &[])
}

fn image_url(config: &CatalogConfig, size: &str, path: Option<&str>) -> Option<String> {
    path.map(|p| format!("{}/{size}{p}", config.image_base.trim_end_matches('/')))
}

#[must_use]
pub fn poster_url(config: &CatalogConfig, path: Option<&str>) -> Option<String> {
    image_url(config, POSTER_SIZE, path)
}

#[must_use]
pub fn backdrop_url(config: &CatalogConfig, path: Option<&str>) -> Option<String> {
    image_url(config, BACKDROP_SIZE, path)
}

#[must_use]
pub fn cast_profile_url(config: &CatalogConfig, path: Option<&str>) -> Option<String> {
    image_url(config, CAST_PROFILE_SIZE, path)
}

#[must_use]
pub fn trailer_embed_url(key: &str) -> String {
    format!("{YOUTUBE_EMBED_URL}/{key}")
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub original_language: String,
}

impl MovieSummary {
    /// The year component shown on listing tiles.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.split('-').next().filter(|y| !y.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub original_language: String,
}

impl MovieDetail {
    #[must_use]
    pub fn genre_names(&self) -> Vec<String> {
        self.genres.iter().map(|g| g.name.clone()).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditsPage {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

impl CreditsPage {
    /// Top billed cast in upstream order.
    #[must_use]
    pub fn top_billed(mut self) -> Vec<CastMember> {
        self.cast.truncate(MAX_CAST_MEMBERS);
        self.cast
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoPage {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub key: String,
}

/// First entry hosted on the recognized video site and marked as a
/// trailer, by list order. Order matters for reproducibility; no
/// recency or popularity ranking is applied.
#[must_use]
pub fn first_trailer_key(videos: &[Video]) -> Option<&str> {
    videos
        .iter()
        .find(|v| v.site == TRAILER_SITE && v.kind == TRAILER_KIND)
        .map(|v| v.key.as_str())
}
