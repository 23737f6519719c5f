//! Serializable projection of the model for a stateless renderer.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, CatalogQuery, Filter};
use crate::model::{Model, Screen};
use crate::ErrorKind;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub screen: ScreenView,
    pub identity: Option<String>,
    pub is_authenticated: bool,
    pub toast: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ScreenView {
    Login {
        error: Option<String>,
    },
    Home {
        chips: Vec<ChipView>,
        search_input: String,
        is_searching: bool,
        movies: Vec<MovieTile>,
        is_loading: bool,
    },
    Detail {
        is_loading: bool,
        not_found: bool,
        movie: Option<MovieDetailView>,
    },
    Profile {
        email: String,
        name: String,
        phone: String,
        phone_error: Option<String>,
        fav_genre: String,
        watchlist: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChipView {
    pub filter: Filter,
    pub label: String,
    pub is_active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieTile {
    pub id: u64,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_year: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CastView {
    pub name: String,
    pub character: String,
    pub profile_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieDetailView {
    pub id: u64,
    pub title: String,
    pub tagline: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub release_date: String,
    pub rating: f64,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub cast: Vec<CastView>,
    pub trailer_url: Option<String>,
    pub in_watchlist: bool,
}

impl From<&Model> for ViewModel {
    fn from(model: &Model) -> Self {
        let screen = match model.screen {
            Screen::Login => ScreenView::Login {
                error: model.login_error.clone(),
            },
            Screen::Home => home_view(model),
            Screen::Detail { movie_id } => detail_view(model, movie_id),
            Screen::Profile => profile_view(model),
        };

        Self {
            screen,
            identity: model.session.identity().map(|i| i.as_str().to_string()),
            is_authenticated: model.is_authenticated(),
            toast: model.toast.clone(),
        }
    }
}

fn home_view(model: &Model) -> ScreenView {
    let is_searching = matches!(model.home.query, CatalogQuery::Search(_));
    let chips = Filter::ALL
        .iter()
        .map(|&filter| ChipView {
            filter,
            label: filter.label().to_string(),
            is_active: !is_searching && model.home.active_filter == filter,
        })
        .collect();

    let movies = model
        .home
        .movies
        .iter()
        .map(|movie| MovieTile {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: catalog::poster_url(&model.config, movie.poster_path.as_deref()),
            release_year: movie.release_year().map(str::to_string),
        })
        .collect();

    ScreenView::Home {
        chips,
        search_input: model.home.search_input.clone(),
        is_searching,
        movies,
        is_loading: model.home.is_loading(),
    }
}

fn detail_view(model: &Model, movie_id: u64) -> ScreenView {
    let movie = model
        .detail
        .movie
        .as_ref()
        .filter(|_| model.detail.is_loaded())
        .map(|detail| {
            let cast = model
                .detail
                .cast
                .iter()
                .map(|member| CastView {
                    name: member.name.clone(),
                    character: member.character.clone(),
                    profile_url: catalog::cast_profile_url(
                        &model.config,
                        member.profile_path.as_deref(),
                    ),
                })
                .collect();

            let in_watchlist = model
                .session
                .profile()
                .is_some_and(|p| p.watchlist.contains(movie_id));

            MovieDetailView {
                id: detail.id,
                title: detail.title.clone(),
                tagline: detail.tagline.clone(),
                overview: detail.overview.clone(),
                genres: detail.genre_names(),
                release_date: detail.release_date.clone(),
                rating: detail.vote_average,
                poster_url: catalog::poster_url(&model.config, detail.poster_path.as_deref()),
                backdrop_url: catalog::backdrop_url(&model.config, detail.backdrop_path.as_deref()),
                cast,
                trailer_url: model
                    .detail
                    .trailer_key
                    .as_deref()
                    .map(catalog::trailer_embed_url),
                in_watchlist,
            }
        });

    ScreenView::Detail {
        is_loading: model.detail.is_loading(),
        not_found: model.detail.error == Some(ErrorKind::NotFound),
        movie,
    }
}

fn profile_view(model: &Model) -> ScreenView {
    ScreenView::Profile {
        email: model
            .session
            .identity()
            .map(|i| i.as_str().to_string())
            .unwrap_or_default(),
        name: model.profile_form.name.clone(),
        phone: model.profile_form.phone.clone(),
        phone_error: model.profile_form.phone_error.clone(),
        fav_genre: model.profile_form.fav_genre.clone(),
        watchlist: model
            .session
            .profile()
            .map(|p| p.watchlist.to_delimited())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogQuery, MovieSummary};

    #[test]
    fn fresh_model_renders_the_login_screen() {
        let model = Model::default();
        let view = ViewModel::from(&model);
        assert_eq!(view.screen, ScreenView::Login { error: None });
        assert!(!view.is_authenticated);
        assert_eq!(view.identity, None);
    }

    #[test]
    fn searching_deselects_every_chip() {
        let mut model = Model::default();
        model.session.login("ada@example.com").unwrap();
        model.screen = Screen::Home;
        model.home.query = CatalogQuery::Search("heat".into());
        model.home.movies = vec![MovieSummary {
            id: 949,
            title: "Heat".into(),
            release_date: "1995-12-15".into(),
            ..MovieSummary::default()
        }];

        let ScreenView::Home {
            chips,
            is_searching,
            movies,
            is_loading,
            ..
        } = ViewModel::from(&model).screen
        else {
            panic!("expected the home screen");
        };

        assert!(is_searching);
        assert!(chips.iter().all(|c| !c.is_active));
        assert!(!is_loading);
        assert_eq!(movies[0].release_year.as_deref(), Some("1995"));
    }
}
