use chrono::NaiveDate;

use crate::{RunState, Suggestion};

/// Console line for a finished stage, in the order the stages run.
pub fn progress_line(state: &RunState) -> Option<&'static str> {
    match state {
        RunState::LinksFetched => Some("Scraping links...OK"),
        RunState::DaysResolved => Some("Scraping available days...OK"),
        RunState::ShowtimesResolved => Some("Scraping showtimes...OK"),
        RunState::ReservationsResolved => Some("Scraping possible reservations...OK"),
        _ => None,
    }
}

pub fn suggestion_line(suggestion: &Suggestion) -> String {
    format!(
        "On {}, \"{}\" begins at {}, and there is a free table to book between {}.",
        suggestion.day, suggestion.movie_title, suggestion.show_time, suggestion.dinner_time_range
    )
}

/// Full report: header line, then one line per suggestion.
pub fn render(suggestions: &[Suggestion], generated_on: NaiveDate) -> String {
    let mut out = format!("Suggestions (generated {})\n", generated_on.format("%Y-%m-%d"));
    if suggestions.is_empty() {
        out.push_str("No movie is followed by a free table on a free day.\n");
    }
    for suggestion in suggestions {
        out.push_str(&suggestion_line(suggestion));
        out.push('\n');
    }
    out
}
