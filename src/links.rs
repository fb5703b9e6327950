use log::{info, warn};
use reqwest::Url;
use scraper::{Html, Selector};

use crate::error::{BoxError, Error, Stage};
use crate::fetch::{Fetcher, fetch_page};

/// The three sites linked from the seed page, in their fixed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSet {
    pub calendar_hub: String,
    pub cinema: String,
    pub restaurant: String,
}

impl LinkSet {
    /// Positional: calendar hub, cinema, restaurant.
    pub fn from_links(links: Vec<String>) -> Result<Self, Error> {
        if links.len() > 3 {
            warn!(
                "Seed page has {} links, using the first three",
                links.len()
            );
        }
        let mut links = links.into_iter();
        match (links.next(), links.next(), links.next()) {
            (Some(calendar_hub), Some(cinema), Some(restaurant)) => Ok(Self {
                calendar_hub,
                cinema,
                restaurant,
            }),
            _ => Err(Error::Configuration(
                "seed page must link to a calendar hub, a cinema and a restaurant".to_string(),
            )),
        }
    }
}

/// Every link target on the page at `url`, resolved against it, in document order.
pub async fn scrape_links(fetcher: &dyn Fetcher, url: &str) -> Result<Vec<String>, Error> {
    let body = fetch_page(fetcher, url)
        .await
        .map_err(|cause| Error::scrape(Stage::Link, url, cause))?;
    let links = parse_links(&body, url).map_err(|cause| Error::scrape(Stage::Link, url, cause))?;
    info!("Found {} links on {}", links.len(), url);
    Ok(links)
}

/// One entry per anchor, like a browser's `href` property: an anchor without
/// `href` gives "", and an href that cannot be resolved is kept as written.
pub fn parse_links(html: &str, page_url: &str) -> Result<Vec<String>, BoxError> {
    let base = Url::parse(page_url)?;
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a").map_err(|e| e.to_string())?;

    let links = document
        .select(&link_selector)
        .map(|a| match a.value().attr("href").map(str::trim) {
            None => String::new(),
            Some(href) => match base.join(href) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    warn!("Keeping unresolvable link {:?} on {}: {}", href, page_url, e);
                    href.to_string()
                }
            },
        })
        .collect();
    Ok(links)
}
