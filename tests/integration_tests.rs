//! Integration tests for the InNews portal
//!
//! These tests drive the full request cycle: configuration, router, feed
//! fetching against a mock aggregator, parsing and page rendering.

use std::sync::Arc;

use axum_test::TestServer;
use innews::config::Config;
use innews::fetcher::Fetcher;
use innews::routes::{router, AppState};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common {
    use super::*;

    pub fn test_server(config: Config) -> TestServer {
        let fetcher = Fetcher::new(&config).expect("Failed to create fetcher");
        TestServer::new(router(Arc::new(AppState { config, fetcher })))
            .expect("Failed to start test server")
    }

    pub fn config_for(base_url: &str) -> Config {
        Config {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..Config::default()
        }
    }

    /// A feed shaped like the aggregator's, with `count` items.
    pub fn google_style_feed(prefix: &str, count: usize) -> String {
        let items: String = (1..=count)
            .map(|i| {
                format!(
                    r#"<item>
                        <title>{prefix} headline {i}</title>
                        <link>https://news.google.com/rss/articles/{prefix}{i}?oc=5</link>
                        <guid isPermaLink="false">{prefix}{i}</guid>
                        <pubDate>Wed, 11 Dec 2024 0{}:00:00 GMT</pubDate>
                        <description>&lt;a href="https://example.com"&gt;{prefix}&lt;/a&gt;</description>
                        <source url="https://www.example.com">{prefix} Desk</source>
                    </item>"#,
                    i % 10
                )
            })
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
            <rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
                <channel>
                    <generator>NFE/5.0</generator>
                    <title>{prefix} - Google News</title>
                    <link>https://news.google.com/</link>
                    <language>en-US</language>
                    {items}
                </channel>
            </rss>"#
        )
    }
}

#[cfg(test)]
mod config_integration_tests {
    use innews::config::Config;

    #[test]
    fn test_load_shipped_config() {
        let config = Config::load("innews.toml");
        assert!(config.is_ok(), "Failed to load innews.toml: {:?}", config.err());

        let config = config.unwrap();
        assert_eq!(config.max_items, 9);
        assert_eq!(config.columns, 3);
        assert!(!config.user_agent.is_empty());
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use super::common::*;
    use super::*;

    #[tokio::test]
    async fn test_trending_page() {
        let aggregator = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .and(header("user-agent", "Mozilla/5.0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(google_style_feed("Top", 15)),
            )
            .expect(1)
            .mount(&aggregator)
            .await;

        let server = test_server(config_for(&aggregator.uri()));
        let response = server.get("/").await;

        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("Top headline 1<"));
        assert!(body.contains("Top headline 9<"));
        assert!(!body.contains("Top headline 10<"));
        assert!(body.contains("Top Desk"));
        assert!(body.contains("Wed, 11 Dec 2024"));
    }

    #[tokio::test]
    async fn test_navigation_round_trip() {
        let aggregator = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(google_style_feed("Home", 3)),
            )
            .mount(&aggregator)
            .await;
        Mock::given(method("GET"))
            .and(path("/news/rss/headlines/section/topic/BUSINESS"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(google_style_feed("Business", 3)),
            )
            .expect(1)
            .mount(&aggregator)
            .await;

        let server = test_server(config_for(&aggregator.uri()));

        let home = server.get("/").await.text();
        assert!(home.contains("Home headline 1"));

        let business = server
            .get("/categories")
            .add_query_param("category", "BUSINESS")
            .await
            .text();
        assert!(business.contains("Showing news for BUSINESS"));
        assert!(business.contains("Business headline 1"));

        // Back home: no category carried over
        let home = server.get("/").await.text();
        assert!(home.contains("Trending"));
        assert!(!home.contains("Showing news for"));
        assert!(!home.contains("Business headline"));
    }

    #[tokio::test]
    async fn test_search_page() {
        let aggregator = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/search"))
            .and(query_param("q", "climate change"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(google_style_feed("Climate", 5)),
            )
            .expect(1)
            .mount(&aggregator)
            .await;

        let server = test_server(config_for(&aggregator.uri()));
        let response = server
            .get("/search")
            .add_query_param("q", "climate change")
            .await;

        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("Results for"));
        assert!(body.contains("Climate headline 5"));
        assert_eq!(body.matches("Read Article").count(), 5);
    }

    #[tokio::test]
    async fn test_aggregator_down_every_view_still_renders() {
        let server = test_server(config_for("http://127.0.0.1:1"));

        let home = server.get("/").await;
        home.assert_status_ok();
        assert!(home.text().contains("Failed to fetch RSS feed"));

        let categories = server.get("/categories").await;
        categories.assert_status_ok();
        assert!(categories.text().contains("No news found for category"));

        let search = server.get("/search").add_query_param("q", "rust").await;
        search.assert_status_ok();
        assert!(search.text().contains("No news found for"));
    }

    #[tokio::test]
    async fn test_aggregator_rejects_request() {
        let aggregator = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&aggregator)
            .await;

        let server = test_server(config_for(&aggregator.uri()));
        let body = server.get("/").await.text();

        assert!(body.contains("Failed to fetch RSS feed"));
        assert!(body.contains("403"));
    }

    #[tokio::test]
    async fn test_custom_layout_settings() {
        let aggregator = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(google_style_feed("Wide", 10)),
            )
            .mount(&aggregator)
            .await;

        let config = Config {
            max_items: 8,
            columns: 4,
            ..config_for(&aggregator.uri())
        };
        let body = test_server(config).get("/").await.text();

        assert_eq!(body.matches("class=\"grid-column\"").count(), 4);
        assert_eq!(body.matches("class=\"card\"").count(), 8);
        assert_eq!(body.matches("data-row=\"1\"").count(), 4);
    }

    #[tokio::test]
    async fn test_health() {
        let server = test_server(Config::default());
        let response = server.get("/health").await;

        response.assert_status_ok();
        assert_eq!(response.text(), "OK");
    }
}
