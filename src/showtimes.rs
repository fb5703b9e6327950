use futures::future::try_join_all;
use log::{debug, info};
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::config::CinemaSettings;
use crate::error::{BoxError, Error, Stage};
use crate::fetch::{Fetcher, fetch_page};
use crate::{Day, Showtime};

/// One record of the cinema's `/check` endpoint.
#[derive(Debug, Deserialize)]
struct SlotRecord {
    status: i64,
    time: String,
}

/// Finds screenings with free seats on a given day.
pub struct ShowtimeScanner<'a> {
    fetcher: &'a dyn Fetcher,
    settings: &'a CinemaSettings,
}

impl<'a> ShowtimeScanner<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, settings: &'a CinemaSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Queries every movie slot for `day` concurrently. Any failing slot fails the day.
    pub async fn scan(&self, cinema_url: &str, day: Day) -> Result<Vec<Showtime>, Error> {
        let day_code = self.settings.day_code(day).ok_or(Error::InvalidDay(day))?;

        let per_slot = try_join_all(
            self.settings
                .slot_codes
                .iter()
                .map(|slot| self.scan_slot(cinema_url, day, day_code, slot)),
        )
        .await?;

        let showtimes: Vec<Showtime> = per_slot.into_iter().flatten().collect();
        info!("{} showtimes with free seats on {}", showtimes.len(), day);
        Ok(showtimes)
    }

    async fn scan_slot(
        &self,
        cinema_url: &str,
        day: Day,
        day_code: &str,
        slot: &str,
    ) -> Result<Vec<Showtime>, Error> {
        let url = format!(
            "{}/check?day={}&movie={}",
            cinema_url.trim_end_matches('/'),
            day_code,
            slot
        );
        let body = fetch_page(self.fetcher, &url)
            .await
            .map_err(|cause| Error::scrape(Stage::Showtime, &url, cause))?;
        let records: Vec<SlotRecord> = serde_json::from_str(&body)
            .map_err(|cause| Error::scrape(Stage::Showtime, &url, cause))?;

        let times: Vec<String> = records
            .into_iter()
            .filter(|r| r.status == self.settings.available_status)
            .map(|r| r.time)
            .collect();
        debug!("Slot {} on {}: {} free", slot, day, times.len());
        if times.is_empty() {
            return Ok(Vec::new());
        }

        let title = self.movie_title(cinema_url, slot).await?;
        Ok(times
            .into_iter()
            .map(|time| Showtime {
                day,
                time,
                title: title.clone(),
            })
            .collect())
    }

    async fn movie_title(&self, cinema_url: &str, slot: &str) -> Result<String, Error> {
        let body = fetch_page(self.fetcher, cinema_url)
            .await
            .map_err(|cause| Error::scrape(Stage::MovieTitle, cinema_url, cause))?;
        parse_movie_title(&body, &self.settings.movie_option_selector, slot)
            .map_err(|cause| Error::scrape(Stage::MovieTitle, cinema_url, cause))
    }
}

/// Text of the movie selector option whose value is `slot`.
pub fn parse_movie_title(html: &str, option_selector: &str, slot: &str) -> Result<String, BoxError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(option_selector).map_err(|e| e.to_string())?;
    document
        .select(&selector)
        .find(|option| option.value().attr("value") == Some(slot))
        .map(|option| option.text().collect::<String>().trim().to_string())
        .ok_or_else(|| format!("no movie option with value {slot}").into())
}
