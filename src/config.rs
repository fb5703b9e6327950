use std::time::Duration;

use crate::Day;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Transport timeout for every request sent by `HttpFetcher`.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend constants for the cinema and restaurant sites.
///
/// These were observed on the live sites and carry no documented meaning;
/// they are grouped here so a different backend only needs a different `Settings`.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub cinema: CinemaSettings,
    pub restaurant: RestaurantSettings,
}

#[derive(Debug, Clone)]
pub struct CinemaSettings {
    /// Backend day code per weekend day
    pub day_codes: Vec<(Day, String)>,
    /// Movie slot codes queried for every day
    pub slot_codes: Vec<String>,
    /// Seat status meaning "seats left"
    pub available_status: i64,
    /// Options of the movie selector; the option value is the slot code
    pub movie_option_selector: String,
}

impl CinemaSettings {
    pub fn day_code(&self, day: Day) -> Option<&str> {
        self.day_codes
            .iter()
            .find(|(d, _)| *d == day)
            .map(|(_, code)| code.as_str())
    }
}

impl Default for CinemaSettings {
    fn default() -> Self {
        Self {
            day_codes: vec![
                (Day::Friday, "05".to_string()),
                (Day::Saturday, "06".to_string()),
                (Day::Sunday, "07".to_string()),
            ],
            slot_codes: ["01", "02", "03"].map(String::from).to_vec(),
            available_status: 1,
            movie_option_selector: "#movie option".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestaurantSettings {
    pub username: String,
    pub password: String,
    /// `name` of the booking page's choice inputs
    pub choice_group: String,
}

impl RestaurantSettings {
    /// Form-encoded login payload.
    pub fn login_form(&self) -> String {
        format!(
            "username={}&password={}&submit=login",
            self.username, self.password
        )
    }
}

impl Default for RestaurantSettings {
    fn default() -> Self {
        Self {
            username: "zeke".to_string(),
            password: "coys".to_string(),
            choice_group: "group1".to_string(),
        }
    }
}
