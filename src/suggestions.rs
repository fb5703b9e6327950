use log::warn;

use crate::{DinnerSlot, Showtime, Suggestion};

/// Hours between the start of a movie and the start of dinner.
pub const LEAD_HOURS: u32 = 2;

/// Pairs every showtime with every dinner slot on the same day that starts
/// exactly `LEAD_HOURS` after the movie. Showtimes drive the outer loop.
pub fn suggest(showtimes: &[Showtime], dinner_slots: &[DinnerSlot]) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for showtime in showtimes {
        let Some(dinner_hour) =
            leading_hour(&showtime.time, ':').and_then(|hour| hour.checked_add(LEAD_HOURS))
        else {
            warn!("Skipping showtime with unreadable time {:?}", showtime.time);
            continue;
        };

        for slot in dinner_slots.iter().filter(|slot| slot.day == showtime.day) {
            if leading_hour(&slot.time, '-') == Some(dinner_hour) {
                suggestions.push(Suggestion {
                    day: showtime.day,
                    movie_title: showtime.title.clone(),
                    show_time: showtime.time.clone(),
                    dinner_time_range: format_dinner_range(&slot.time),
                });
            }
        }
    }

    suggestions
}

/// Integer hour before the first `separator`.
fn leading_hour(time: &str, separator: char) -> Option<u32> {
    time.split(separator).next()?.trim().parse().ok()
}

/// "18-20" -> "18:00-20:00". Hours are not zero padded.
pub fn format_dinner_range(range: &str) -> String {
    match range.split_once('-') {
        Some((start, end)) => format!("{}:00-{}:00", start.trim(), end.trim()),
        None => format!("{}:00", range.trim()),
    }
}
