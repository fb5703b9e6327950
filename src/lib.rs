use std::fmt;

pub mod calendar;
pub mod config;
pub mod error;
pub mod fetch;
pub mod links;
pub mod planner;
pub mod report;
pub mod reservations;
pub mod showtimes;
pub mod suggestions;

pub use config::Settings;
pub use error::{BoxError, Error, Stage};
pub use fetch::{Fetcher, HttpFetcher, Request, Response};
pub use planner::{Planner, RunState};

/// Weekend day the planner considers, in calendar column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Day {
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 3] = [Day::Friday, Day::Saturday, Day::Sunday];

    /// Lowercase name, as the scraped sites spell it.
    pub fn as_str(self) -> &'static str {
        match self {
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }

    /// Three-letter prefix used by the booking page's choice values ("fri", "sat", "sun").
    pub fn prefix(self) -> &'static str {
        &self.as_str()[..3]
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        };
        f.write_str(name)
    }
}

/// A screening with free seats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Showtime {
    pub day: Day,
    /// "HH:MM" as reported by the cinema backend
    pub time: String,
    pub title: String,
}

/// A free table at the restaurant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DinnerSlot {
    pub day: Day,
    /// Raw hour range from the booking page, e.g. "18-20"
    pub time: String,
}

/// A movie followed by dinner on the same day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub day: Day,
    pub movie_title: String,
    pub show_time: String,
    /// Display form, e.g. "18:00-20:00"
    pub dinner_time_range: String,
}
