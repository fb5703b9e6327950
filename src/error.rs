use std::fmt;

use crate::Day;

/// Boxed cause carried by scrape failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The scraping stage a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Link,
    Calendar,
    Showtime,
    MovieTitle,
    Login,
    BookingPage,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Link => "link",
            Stage::Calendar => "calendar",
            Stage::Showtime => "showtime",
            Stage::MovieTitle => "movie-title",
            Stage::Login => "login",
            Stage::BookingPage => "booking-page",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Couldn't scrape {url} ({stage}): {cause}")]
    Scrape {
        stage: Stage,
        url: String,
        #[source]
        cause: BoxError,
    },

    #[error("Login at {url} did not return a session cookie")]
    Auth { url: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No weekend day is free in every calendar")]
    NoCommonAvailability,

    #[error("No backend day code configured for {0}")]
    InvalidDay(Day),
}

impl Error {
    pub fn scrape(stage: Stage, url: &str, cause: impl Into<BoxError>) -> Self {
        Error::Scrape {
            stage,
            url: url.to_string(),
            cause: cause.into(),
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Scrape { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
