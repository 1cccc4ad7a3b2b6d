//! Feed retrieval: a local file or an HTTP GET.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

const USER_AGENT: &str = concat!("chargemap-cli/", env!("CARGO_PKG_VERSION"));

/// Where the raw feed blob comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FeedSource {
    File(PathBuf),
    Url(String),
}

impl FeedSource {
    /// `--url` wins over `--file`; with neither, the configured path is used.
    pub(crate) fn resolve(file: Option<PathBuf>, url: Option<String>, default_path: &Path) -> Self {
        match (url, file) {
            (Some(url), _) => FeedSource::Url(url),
            (None, Some(path)) => FeedSource::File(path),
            (None, None) => FeedSource::File(default_path.to_path_buf()),
        }
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSource::File(path) => write!(f, "{}", path.display()),
            FeedSource::Url(url) => f.write_str(url),
        }
    }
}

/// Read the whole feed into memory.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the HTTP client cannot be
/// built, the request fails, or the server answers with a non-success status.
pub(crate) async fn load_feed(source: &FeedSource, timeout_secs: u64) -> anyhow::Result<Vec<u8>> {
    match source {
        FeedSource::File(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read feed file {}", path.display())),
        FeedSource::Url(url) => fetch_feed(url, timeout_secs).await,
    }
}

async fn fetch_feed(url: &str, timeout_secs: u64) -> anyhow::Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("failed to fetch feed from {url}"))?
        .error_for_status()
        .with_context(|| format!("feed server rejected request for {url}"))?;

    let body = response
        .bytes()
        .await
        .with_context(|| format!("failed to read feed body from {url}"))?;
    tracing::info!(url, bytes = body.len(), "feed downloaded");
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn url_takes_precedence_over_file() {
        let source = FeedSource::resolve(
            Some(PathBuf::from("local.json")),
            Some("https://example.test/feed.json".to_string()),
            Path::new("default.json"),
        );
        assert_eq!(
            source,
            FeedSource::Url("https://example.test/feed.json".to_string())
        );
    }

    #[test]
    fn falls_back_to_configured_path() {
        let source = FeedSource::resolve(None, None, Path::new("./data/feed.json"));
        assert_eq!(source, FeedSource::File(PathBuf::from("./data/feed.json")));
    }

    #[tokio::test]
    async fn downloads_feed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"EVSEData":[]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let source = FeedSource::Url(format!("{}/feed.json", server.uri()));
        let body = load_feed(&source, 5).await.expect("download failed");

        assert_eq!(body, br#"{"EVSEData":[]}"#);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = FeedSource::Url(format!("{}/feed.json", server.uri()));
        let err = load_feed(&source, 5).await.unwrap_err();

        assert!(format!("{err:#}").contains("rejected"), "got: {err:#}");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let source = FeedSource::File(PathBuf::from("/definitely/not/here.json"));
        let err = load_feed(&source, 5).await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to read feed file"));
    }
}
