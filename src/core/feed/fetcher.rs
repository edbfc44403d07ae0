use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
}

pub fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, FetchError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Performs a single GET against `url` and returns the whole body.
pub async fn fetch_feed_body(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }
    Ok(response.text().await?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    pub(crate) const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Makan Blog</title>
    <link>https://makan.example.com</link>
    <description>Where to eat</description>
    <item>
      <title>Best chicken rice</title>
      <link>https://makan.example.com/chicken-rice</link>
    </item>
    <item>
      <title>Laksa &amp; more</title>
      <link>https://makan.example.com/laksa</link>
    </item>
  </channel>
</rss>
"#;

    pub(crate) async fn spawn_test_server() -> (String, tokio::task::JoinHandle<()>) {
        let app = Router::new()
            .route("/feed.xml", get(|| async { SAMPLE_RSS }))
            .route(
                "/broken.xml",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "temporary failure") }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        let join_handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        (format!("http://{address}"), join_handle)
    }

    #[tokio::test]
    async fn fetch_returns_full_body() {
        let (base, server_task) = spawn_test_server().await;
        let client = build_client(None).expect("client should build");

        let body = fetch_feed_body(&client, &format!("{base}/feed.xml"))
            .await
            .expect("fetch should succeed");
        assert_eq!(body, SAMPLE_RSS);

        server_task.abort();
    }

    #[tokio::test]
    async fn fetch_rejects_error_status() {
        let (base, server_task) = spawn_test_server().await;
        let client = build_client(Some(Duration::from_secs(5))).expect("client should build");

        let error = fetch_feed_body(&client, &format!("{base}/broken.xml"))
            .await
            .expect_err("500 should be an error");
        assert!(matches!(error, FetchError::HttpStatus(500)));

        server_task.abort();
    }

    #[tokio::test]
    async fn fetch_reports_malformed_address() {
        let client = build_client(None).expect("client should build");
        let error = fetch_feed_body(&client, "not a url")
            .await
            .expect_err("malformed url should fail");
        assert!(matches!(error, FetchError::Request(_)));
    }
}
