#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod engagement;
pub mod event;
pub mod model;
pub mod session;
pub mod view;

use serde::{Deserialize, Serialize};

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use catalog::{CatalogConfig, CatalogQuery, Filter};
pub use event::Event;
pub use model::{Model, Screen};
pub use session::{Identity, Profile};
pub use view::ViewModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    Upstream,
    NotFound,
    Transport,
    Storage,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Upstream => "UPSTREAM_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Transport => "TRANSPORT_UNAVAILABLE",
            Self::Storage => "STORAGE_ERROR",
        }
    }

    /// Whether the error blocks the action that raised it. Upstream and
    /// transport failures degrade to an empty state instead.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Validation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Validation => self.message.clone(),
            ErrorKind::Upstream => {
                "Unable to load movies right now. Please try again.".into()
            }
            ErrorKind::NotFound => "Movie not found.".into(),
            ErrorKind::Transport | ErrorKind::Storage => {
                "Something went wrong. Please try again.".into()
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;
