use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use reqwest::Url;
use weekend_planner::{HttpFetcher, Planner, Settings, report};

/// Finds a weekend day where everyone is free, a movie with seats left
/// and a table for dinner two hours later.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Page linking to the calendars, the cinema and the restaurant
    #[arg(value_parser = parse_seed_url)]
    url: Url,
}

fn parse_seed_url(arg: &str) -> Result<Url, String> {
    let url = Url::parse(arg).map_err(|e| format!("not a valid url: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme {other}, expected http or https")),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let fetcher = match HttpFetcher::new() {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };
    let settings = Settings::default();

    let mut planner = Planner::new(&fetcher, &settings).on_progress(|state| {
        if let Some(line) = report::progress_line(state) {
            println!("{line}");
        }
    });

    match planner.run(cli.url.as_str()).await {
        Ok(suggestions) => {
            println!();
            print!(
                "{}",
                report::render(&suggestions, chrono::Local::now().date_naive())
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_urls_only() {
        assert!(parse_seed_url("https://courselab.test/scraper-site-1").is_ok());
        assert!(parse_seed_url("ftp://courselab.test/").is_err());
        assert!(parse_seed_url("not a url").is_err());
    }

    #[test]
    fn takes_exactly_one_url() {
        assert!(Cli::try_parse_from(["weekend-planner", "http://site.test/"]).is_ok());
        assert!(Cli::try_parse_from(["weekend-planner"]).is_err());
        assert!(Cli::try_parse_from(["weekend-planner", "http://a.test/", "http://b.test/"]).is_err());
    }
}
