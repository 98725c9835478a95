//! Periodic self-ping that keeps free-tier hosts from idling the service.

use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use tokio::task::JoinHandle;

/// GET `{app_url}/health` once and return the status.
pub async fn ping_once(client: &reqwest::Client, app_url: &str) -> Result<StatusCode> {
    let url = format!("{}/health", app_url.trim_end_matches('/'));
    let resp = client.get(&url).send().await?;
    tracing::trace!(url, status = %resp.status(), "keep-alive ping");
    Ok(resp.status())
}

/// Ping forever, sleeping `interval` before each request. Failures are logged.
pub fn spawn(app_url: String, interval: Duration) -> JoinHandle<()> {
    tracing::info!(app_url, interval_secs = interval.as_secs(), "Starting keep-alive task");
    tokio::spawn(async move {
        let client = reqwest::Client::new();
        loop {
            tokio::time::sleep(interval).await;
            match ping_once(&client, &app_url).await {
                Ok(status) if status.is_success() => {}
                Ok(status) => tracing::warn!(%status, "Keep-alive ping returned an error status"),
                Err(err) => tracing::warn!(error = %err, "Keep-alive ping failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn ping_once_hits_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let status = ping_once(&reqwest::Client::new(), &format!("{}/", server.uri()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        server.verify().await;
    }

    #[tokio::test]
    async fn spawn_keeps_pinging_after_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2..)
            .mount(&server)
            .await;

        let handle = spawn(server.uri(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(300)).await;
        handle.abort();
        server.verify().await;
    }
}
