use log::debug;
use reqwest::header::HeaderMap;
use reqwest::{Client, header, redirect};

use crate::config::{REQUEST_TIMEOUT, USER_AGENT};
use crate::error::BoxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// A single HTTP request, independent of the client that sends it.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub follow_redirects: bool,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            follow_redirects: true,
        }
    }

    pub fn post_form(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: vec![(
                header::CONTENT_TYPE.as_str().to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )],
            body: Some(body.into()),
            follow_redirects: true,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn without_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }
}

/// Response with raw, possibly repeated headers (needed to read `Set-Cookie`).
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    /// Every value of header `name`, in received order. Names compare case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx status into an error.
    pub fn error_for_status(self) -> Result<Self, BoxError> {
        if !self.is_success() {
            return Err(format!("HTTP status {}", self.status).into());
        }
        Ok(self)
    }
}

/// Sends HTTP requests for the scraping stages.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, BoxError>;
}

/// `Fetcher` backed by reqwest.
pub struct HttpFetcher {
    client: Client,
    // Login answers with a redirect whose Set-Cookie would be lost when followed.
    no_redirect: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let no_redirect = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            no_redirect,
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn send(&self, request: Request) -> Result<Response, BoxError> {
        let client = if request.follow_redirects {
            &self.client
        } else {
            &self.no_redirect
        };

        debug!("{:?} {}", request.method, request.url);

        let mut builder = match request.method {
            Method::Get => client.get(&request.url),
            Method::Post => client.post(&request.url),
        }
        .header(header::USER_AGENT, USER_AGENT);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let headers = header_pairs(resp.headers());
        let body = resp.text().await?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

/// Every header as a name/value pair; bytes that are not UTF-8 are replaced, not dropped.
fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// GET `url` and return the body; a non-2xx status is an error.
pub async fn fetch_page(fetcher: &dyn Fetcher, url: &str) -> Result<String, BoxError> {
    let resp = fetcher.send(Request::get(url)).await?.error_for_status()?;
    Ok(resp.body)
}
