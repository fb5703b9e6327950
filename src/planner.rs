use futures::future::try_join_all;
use log::info;

use crate::calendar;
use crate::config::Settings;
use crate::error::Error;
use crate::fetch::Fetcher;
use crate::links::{LinkSet, scrape_links};
use crate::reservations::ReservationScanner;
use crate::showtimes::ShowtimeScanner;
use crate::suggestions::suggest;
use crate::{Day, DinnerSlot, Showtime, Suggestion};

/// Where a run currently is. Each stage moves strictly forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Start,
    LinksFetched,
    DaysResolved,
    ShowtimesResolved,
    ReservationsResolved,
    Reported,
    Failed(String),
}

/// Runs the scraping stages from the seed page to the final suggestions.
///
/// Stages run one after another; within the showtime and reservation stages
/// the days are scanned concurrently, and one failing day fails the run.
pub struct Planner<'a> {
    fetcher: &'a dyn Fetcher,
    settings: &'a Settings,
    state: RunState,
    on_progress: Box<dyn Fn(&RunState) + 'a>,
}

impl<'a> Planner<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, settings: &'a Settings) -> Self {
        Self {
            fetcher,
            settings,
            state: RunState::Start,
            on_progress: Box::new(|_| {}),
        }
    }

    /// Called with every state the run enters, including `Failed`.
    pub fn on_progress(mut self, callback: impl Fn(&RunState) + 'a) -> Self {
        self.on_progress = Box::new(callback);
        self
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub async fn run(&mut self, seed_url: &str) -> Result<Vec<Suggestion>, Error> {
        match self.plan(seed_url).await {
            Ok(suggestions) => {
                self.advance(RunState::Reported);
                Ok(suggestions)
            }
            Err(err) => {
                self.advance(RunState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    async fn plan(&mut self, seed_url: &str) -> Result<Vec<Suggestion>, Error> {
        let links = LinkSet::from_links(scrape_links(self.fetcher, seed_url).await?)?;
        self.advance(RunState::LinksFetched);

        let calendars = scrape_links(self.fetcher, &links.calendar_hub).await?;
        let days = calendar::aggregate(self.fetcher, &calendars).await?;
        if days.is_empty() {
            return Err(Error::NoCommonAvailability);
        }
        self.advance(RunState::DaysResolved);

        let showtimes = self.showtimes(&links.cinema, &days).await?;
        self.advance(RunState::ShowtimesResolved);

        let dinner_slots = self.dinner_slots(&links.restaurant, &days).await?;
        self.advance(RunState::ReservationsResolved);

        let suggestions = suggest(&showtimes, &dinner_slots);
        info!("{} suggestions", suggestions.len());
        Ok(suggestions)
    }

    async fn showtimes(&self, cinema_url: &str, days: &[Day]) -> Result<Vec<Showtime>, Error> {
        let scanner = ShowtimeScanner::new(self.fetcher, &self.settings.cinema);
        let per_day = try_join_all(days.iter().map(|&day| scanner.scan(cinema_url, day))).await?;
        Ok(per_day.into_iter().flatten().collect())
    }

    async fn dinner_slots(
        &self,
        restaurant_url: &str,
        days: &[Day],
    ) -> Result<Vec<DinnerSlot>, Error> {
        let scanner = ReservationScanner::new(self.fetcher, &self.settings.restaurant);
        let per_day =
            try_join_all(days.iter().map(|&day| scanner.scan(restaurant_url, day))).await?;
        Ok(per_day.into_iter().flatten().collect())
    }

    fn advance(&mut self, next: RunState) {
        info!("{:?} -> {:?}", self.state, next);
        self.state = next;
        (self.on_progress)(&self.state);
    }
}
