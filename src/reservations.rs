use cookie_store::RawCookie;
use log::{debug, info};
use reqwest::header;
use scraper::{ElementRef, Html, Selector};

use crate::config::RestaurantSettings;
use crate::error::{BoxError, Error, Stage};
use crate::fetch::{Fetcher, Request, Response};
use crate::{Day, DinnerSlot};

/// Logs in to the restaurant and reads the free tables for a day.
///
/// Every scan logs in on its own; no session is shared between scans.
pub struct ReservationScanner<'a> {
    fetcher: &'a dyn Fetcher,
    settings: &'a RestaurantSettings,
}

impl<'a> ReservationScanner<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, settings: &'a RestaurantSettings) -> Self {
        Self { fetcher, settings }
    }

    pub async fn scan(&self, restaurant_url: &str, day: Day) -> Result<Vec<DinnerSlot>, Error> {
        let base = with_trailing_slash(restaurant_url);
        let session = self.login(&base).await?;

        let booking_url = format!("{base}login/booking");
        let resp = self
            .fetcher
            .send(Request::get(&booking_url).header(header::COOKIE.as_str(), session))
            .await
            .and_then(Response::error_for_status)
            .map_err(|cause| Error::scrape(Stage::BookingPage, &booking_url, cause))?;

        let slots = parse_dinner_slots(&resp.body, &self.settings.choice_group, day)
            .map_err(|cause| Error::scrape(Stage::BookingPage, &booking_url, cause))?;
        info!("{} free tables on {}", slots.len(), day);
        Ok(slots)
    }

    /// Posts the credentials without following the redirect and returns the session cookie.
    async fn login(&self, base: &str) -> Result<String, Error> {
        let login_url = format!("{base}login");
        let resp = self
            .fetcher
            .send(Request::post_form(&login_url, self.settings.login_form()).without_redirects())
            .await
            .map_err(|cause| Error::scrape(Stage::Login, &login_url, cause))?;
        debug!("Login answered with status {}", resp.status);

        session_cookie(&resp).ok_or(Error::Auth { url: login_url })
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// The `name=value` part of the first `Set-Cookie` header.
pub fn session_cookie(resp: &Response) -> Option<String> {
    let raw = resp.header_values(header::SET_COOKIE.as_str()).next()?;
    let pair = raw.split(';').next()?.trim();
    // Rejects segments without a cookie name.
    RawCookie::parse(pair).ok()?;
    Some(pair.to_string())
}

/// Time ranges of the choice inputs in `group` whose value starts with the day prefix.
pub fn parse_dinner_slots(html: &str, group: &str, day: Day) -> Result<Vec<DinnerSlot>, BoxError> {
    let document = Html::parse_document(html);
    let input_selector = Selector::parse("input").map_err(|e| e.to_string())?;

    let mut slots = Vec::new();
    for input in document.select(&input_selector) {
        let element = input.value();
        if element.attr("name") != Some(group) {
            continue;
        }
        let Some(value) = element.attr("value") else {
            continue;
        };
        if !value.starts_with(day.prefix()) {
            continue;
        }

        let label = label_after(input).ok_or_else(|| format!("choice {value} has no label"))?;
        let time = label
            .split_whitespace()
            .next()
            .ok_or_else(|| format!("choice {value} has an empty label"))?;
        slots.push(DinnerSlot {
            day,
            time: time.to_string(),
        });
    }
    Ok(slots)
}

/// Text of the first non-blank sibling after `input`.
fn label_after(input: ElementRef<'_>) -> Option<String> {
    input.next_siblings().find_map(|node| {
        if let Some(text) = node.value().as_text() {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        } else {
            ElementRef::wrap(node).map(|el| el.text().collect::<String>())
        }
    })
}
