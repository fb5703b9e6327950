use futures::future::try_join_all;
use log::{info, warn};
use scraper::{Html, Selector};

use crate::Day;
use crate::error::{BoxError, Error, Stage};
use crate::fetch::{Fetcher, fetch_page};

/// Marker a calendar uses for a free day.
pub const AVAILABLE: &str = "ok";

/// One calendar's cell text per weekend day, lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayMarkers {
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
}

impl DayMarkers {
    /// Cells in column order: Friday, Saturday, Sunday. A missing cell counts as busy.
    pub fn from_cells(cells: impl IntoIterator<Item = String>) -> Self {
        let mut cells = cells.into_iter();
        let mut next = || cells.next().unwrap_or_default();
        Self {
            friday: next(),
            saturday: next(),
            sunday: next(),
        }
    }

    pub fn get(&self, day: Day) -> &str {
        match day {
            Day::Friday => &self.friday,
            Day::Saturday => &self.saturday,
            Day::Sunday => &self.sunday,
        }
    }

    fn get_mut(&mut self, day: Day) -> &mut String {
        match day {
            Day::Friday => &mut self.friday,
            Day::Saturday => &mut self.saturday,
            Day::Sunday => &mut self.sunday,
        }
    }

    /// Overwrites every day `other` does not mark as available.
    pub fn merge(&mut self, other: &DayMarkers) {
        for day in Day::ALL {
            let marker = other.get(day);
            if marker != AVAILABLE {
                *self.get_mut(day) = marker.to_string();
            }
        }
    }

    pub fn available_days(&self) -> Vec<Day> {
        Day::ALL
            .into_iter()
            .filter(|&day| self.get(day) == AVAILABLE)
            .collect()
    }
}

/// Scrapes one calendar page.
pub async fn scrape_calendar(fetcher: &dyn Fetcher, url: &str) -> Result<DayMarkers, Error> {
    let body = fetch_page(fetcher, url)
        .await
        .map_err(|cause| Error::scrape(Stage::Calendar, url, cause))?;
    let cells =
        calendar_cells(&body).map_err(|cause| Error::scrape(Stage::Calendar, url, cause))?;
    if cells.len() < Day::ALL.len() {
        warn!("Calendar {} has only {} day cells", url, cells.len());
    }
    Ok(DayMarkers::from_cells(cells))
}

pub fn parse_calendar(html: &str) -> Result<DayMarkers, BoxError> {
    Ok(DayMarkers::from_cells(calendar_cells(html)?))
}

/// Text of every table cell, trimmed and lowercased, in document order.
pub fn calendar_cells(html: &str) -> Result<Vec<String>, BoxError> {
    let document = Html::parse_document(html);
    let cell_selector = Selector::parse("td").map_err(|e| e.to_string())?;
    Ok(document
        .select(&cell_selector)
        .map(|td| td.text().collect::<String>().trim().to_lowercase())
        .collect())
}

/// Folds calendars into one: a day stays available only if every calendar says so.
/// `None` when there are no calendars.
pub fn reduce(calendars: impl IntoIterator<Item = DayMarkers>) -> Option<DayMarkers> {
    let mut calendars = calendars.into_iter();
    let mut combined = calendars.next()?;
    for calendar in calendars {
        combined.merge(&calendar);
    }
    Some(combined)
}

/// Days on which every calendar at `calendar_urls` is free.
///
/// Calendars are fetched concurrently and reduced in the given order.
pub async fn aggregate(fetcher: &dyn Fetcher, calendar_urls: &[String]) -> Result<Vec<Day>, Error> {
    if calendar_urls.is_empty() {
        return Err(Error::Configuration(
            "calendar hub links to no calendars".to_string(),
        ));
    }

    let calendars = try_join_all(calendar_urls.iter().map(|url| scrape_calendar(fetcher, url))).await?;
    let days = reduce(calendars)
        .map(|combined| combined.available_days())
        .unwrap_or_default();

    info!(
        "{} calendars checked, free days: {:?}",
        calendar_urls.len(),
        days
    );
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fake::FakeFetcher;

    fn markers(cells: [&str; 3]) -> DayMarkers {
        DayMarkers::from_cells(cells.map(String::from))
    }

    fn calendar_page(cells: [&str; 3]) -> String {
        format!(
            "<table><thead><tr><th>Friday</th><th>Saturday</th><th>Sunday</th></tr></thead>\
             <tbody><tr><td>{}</td><td>{}</td><td>{}</td></tr></tbody></table>",
            cells[0], cells[1], cells[2]
        )
    }

    #[test]
    fn parses_cells_lowercased() {
        let markers = parse_calendar(&calendar_page(["OK", " -- ", "ok"])).unwrap();
        assert_eq!(markers, self::markers(["ok", "--", "ok"]));
    }

    #[test]
    fn blank_cell_still_counts_as_a_cell() {
        let cells = calendar_cells(&calendar_page(["ok", "ok", " "])).unwrap();
        assert_eq!(cells, ["ok", "ok", ""]);
        let short = calendar_cells("<table><tr><td>ok</td><td>ok</td></tr></table>").unwrap();
        assert_eq!(short.len(), 2);
        assert_eq!(
            DayMarkers::from_cells(cells).available_days(),
            [Day::Friday, Day::Saturday]
        );
    }

    #[test]
    fn missing_cells_are_busy() {
        let markers = parse_calendar("<table><tr><td>ok</td></tr></table>").unwrap();
        assert_eq!(markers.available_days(), [Day::Friday]);
    }

    #[test]
    fn reduce_keeps_only_days_free_everywhere() {
        let combined = reduce([
            markers(["ok", "x", "ok"]),
            markers(["ok", "ok", "ok"]),
            markers(["y", "ok", "ok"]),
        ])
        .unwrap();
        assert_eq!(combined.available_days(), [Day::Sunday]);
    }

    #[test]
    fn merge_overwrites_with_last_busy_marker() {
        let combined = reduce([
            markers(["ok", "ok", "ok"]),
            markers(["a", "ok", "ok"]),
            markers(["b", "ok", "ok"]),
        ])
        .unwrap();
        assert_eq!(combined.friday, "b");
    }

    #[test]
    fn result_does_not_depend_on_calendar_order() {
        let calendars = [
            markers(["ok", "--", "ok"]),
            markers(["ok", "ok", "--"]),
            markers(["ok", "ok", "ok"]),
        ];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders {
            let permuted = order.map(|i| calendars[i].clone());
            let days = reduce(permuted).unwrap().available_days();
            assert_eq!(days, [Day::Friday], "order {order:?}");
        }
    }

    #[test]
    fn reduce_of_nothing_is_none() {
        assert_eq!(reduce(Vec::new()), None);
    }

    #[tokio::test]
    async fn aggregate_scrapes_every_calendar() {
        let fetcher = FakeFetcher::new()
            .page("http://site.test/calendar/paul/", &calendar_page(["ok", "x", "ok"]))
            .page("http://site.test/calendar/peter/", &calendar_page(["ok", "ok", "ok"]))
            .page("http://site.test/calendar/mary/", &calendar_page(["y", "ok", "ok"]));
        let urls = ["paul", "peter", "mary"].map(|p| format!("http://site.test/calendar/{p}/"));

        let days = aggregate(&fetcher, &urls).await.unwrap();
        assert_eq!(days, [Day::Sunday]);
        assert_eq!(fetcher.sent().len(), 3);
    }

    #[tokio::test]
    async fn aggregate_with_no_calendars_is_a_configuration_error() {
        let fetcher = FakeFetcher::new();
        let err = aggregate(&fetcher, &[]).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(fetcher.sent().is_empty());
    }

    #[tokio::test]
    async fn unreachable_calendar_fails_with_calendar_stage() {
        let fetcher = FakeFetcher::new()
            .page("http://site.test/calendar/paul/", &calendar_page(["ok", "ok", "ok"]));
        let urls = ["paul", "peter"].map(|p| format!("http://site.test/calendar/{p}/"));
        let err = aggregate(&fetcher, &urls).await.unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Calendar));
        assert!(err.to_string().contains("peter"));
    }

    #[tokio::test]
    async fn aggregate_may_find_no_free_day() {
        let fetcher = FakeFetcher::new()
            .page("http://site.test/calendar/a/", &calendar_page(["--", "ok", "ok"]))
            .page("http://site.test/calendar/b/", &calendar_page(["ok", "--", "--"]));
        let urls = ["a", "b"].map(|p| format!("http://site.test/calendar/{p}/"));
        assert!(aggregate(&fetcher, &urls).await.unwrap().is_empty());
    }
}
