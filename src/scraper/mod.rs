pub mod cleaner;
pub mod http_client;
pub mod parsers;

use crate::config::{LeaderboardConfig, ScraperConfig};
use crate::models::SegmentLeaderboard;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use tracing::{debug, info, warn};
use url::Url;

use self::http_client::HttpClient;
use self::parsers::{LeaderboardLayout, extract_leaderboard};

// ── Source trait ──────────────────────────────────────────────────────────────

/// Anything that can produce a segment's leaderboard.
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    async fn fetch_leaderboard(&self, segment_id: &str) -> Result<SegmentLeaderboard>;
}

// ── Strava scraper ────────────────────────────────────────────────────────────

pub struct StravaScraper {
    client: HttpClient,
    base_url: Url,
    layout: LeaderboardLayout,
}

impl StravaScraper {
    pub fn new(scraper: &ScraperConfig, leaderboard: &LeaderboardConfig) -> Result<Self> {
        let base_url = Url::parse(&scraper.base_url)
            .with_context(|| format!("Invalid base URL {:?}", scraper.base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("Base URL {} cannot carry a path", base_url);
        }

        Ok(Self {
            client: HttpClient::new(scraper)?,
            base_url,
            layout: LeaderboardLayout::from_config(leaderboard)?,
        })
    }

    /// URL for a segment page. e.g. 229781 → https://www.strava.com/segments/229781
    fn segment_url(&self, segment_id: &str) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("segments").push(segment_id);
        }
        url.into()
    }
}

#[async_trait]
impl LeaderboardSource for StravaScraper {
    async fn fetch_leaderboard(&self, segment_id: &str) -> Result<SegmentLeaderboard> {
        let segment_id = segment_id.trim();
        if segment_id.is_empty() {
            bail!("Segment id must not be empty");
        }

        let url = self.segment_url(segment_id);
        info!("Fetching segment {} ({})", segment_id, url);

        let html = match self.client.get_text(&url).await {
            Ok(html) => html,
            Err(e) => {
                if e.status() == Some(StatusCode::NOT_FOUND) {
                    warn!("{}: segment does not exist or is private", segment_id);
                }
                return Err(e)
                    .with_context(|| format!("Failed to fetch segment page for {}", segment_id));
            }
        };

        let leaderboard = extract_leaderboard(&html, &self.layout);

        if leaderboard.efforts.is_empty() {
            warn!("{}: no efforts on leaderboard", segment_id);
        } else {
            debug!(
                "{}: {} efforts, KOM {:?} in {:?}s",
                segment_id,
                leaderboard.efforts.len(),
                leaderboard.kom().map(|e| &e.name),
                leaderboard.kom().and_then(|e| e.elapsed.seconds())
            );
        }

        Ok(SegmentLeaderboard {
            segment_id: segment_id.to_string(),
            url,
            scraped_at: Utc::now().naive_utc(),
            leaderboard,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;
    use httpmock::prelude::*;

    const PAGE: &str = "<html><body>\
        <h2 class='text-title1'>Overall Leaderboard</h2>\n\
        <table class='table table-striped table-leaderboard'>\
        <thead><tr><th>Rank</th><th>Name</th><th>Time</th></tr></thead>\
        <tbody>\
        <tr><td>1</td><td>Fast Fiona</td><td><a href=\"/activities/1001\">0:45</a></td></tr>\
        <tr><td>2</td><td>Steady Sam</td><td><a href=\"/activities/1002\">1:12</a></td></tr>\
        </tbody></table></body></html>";

    fn scraper_for(server: &MockServer) -> StravaScraper {
        let cfg = ScraperConfig {
            base_url: server.base_url(),
            ..Default::default()
        };
        StravaScraper::new(&cfg, &LeaderboardConfig::default()).unwrap()
    }

    #[test]
    fn test_segment_url() {
        let scraper =
            StravaScraper::new(&ScraperConfig::default(), &LeaderboardConfig::default()).unwrap();
        assert_eq!(
            scraper.segment_url("229781"),
            "https://www.strava.com/segments/229781"
        );
        assert_eq!(
            scraper.segment_url("a/b"),
            "https://www.strava.com/segments/a%2Fb"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let cfg = ScraperConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(StravaScraper::new(&cfg, &LeaderboardConfig::default()).is_err());
    }

    #[tokio::test]
    async fn test_fetch_leaderboard_end_to_end() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/segments/229781")
                .header("user-agent", "kom-getter/0.1.0");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body(PAGE);
        });

        let result = scraper_for(&server)
            .fetch_leaderboard("229781")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(result.segment_id, "229781");
        assert!(result.url.ends_with("/segments/229781"));
        let secs: Vec<Option<u32>> = result
            .leaderboard
            .efforts
            .iter()
            .map(|e| e.elapsed.seconds())
            .collect();
        assert_eq!(secs, [Some(45), Some(72)]);
        assert_eq!(
            result.leaderboard.kom().and_then(|e| e.activity_id.as_deref()),
            Some("1001")
        );
    }

    #[tokio::test]
    async fn test_fetch_leaderboard_404_fails() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/segments/0");
            then.status(404).body("not found");
        });

        let err = scraper_for(&server)
            .fetch_leaderboard("0")
            .await
            .unwrap_err();

        let request_err = err.downcast_ref::<RequestError>().unwrap();
        assert_eq!(request_err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_fetch_leaderboard_unreachable_host_fails() {
        let cfg = ScraperConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        };
        let scraper = StravaScraper::new(&cfg, &LeaderboardConfig::default()).unwrap();

        let err = scraper.fetch_leaderboard("229781").await.unwrap_err();

        let request_err = err.downcast_ref::<RequestError>().unwrap();
        assert!(matches!(request_err, RequestError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_fetch_leaderboard_layout_changed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/segments/5");
            then.status(200).body("<html><body><h1>Redesigned!</h1></body></html>");
        });

        let result = scraper_for(&server).fetch_leaderboard("5").await.unwrap();

        assert!(result.leaderboard.efforts.is_empty());
        assert!(result.leaderboard.is_clean());
    }

    #[tokio::test]
    async fn test_fetch_leaderboard_blank_id() {
        let scraper =
            StravaScraper::new(&ScraperConfig::default(), &LeaderboardConfig::default()).unwrap();
        assert!(scraper.fetch_leaderboard("  ").await.is_err());
    }
}
