//! Best-effort post-bind notification

use crate::error::{Error, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Serialize)]
struct NodeRequest {
    node: String,
}

/// Dispatch a fire-and-forget notification that `node_name` received a pod.
///
/// Runs on its own task. Failures are logged and otherwise ignored; the
/// binding has already happened and is never affected or delayed.
pub fn notify_bound(notify_url: Option<String>, node_name: String) {
    let Some(url) = notify_url else {
        return;
    };

    tokio::spawn(async move {
        if let Err(e) = post_notification(&url, &node_name).await {
            warn!("Post-bind notification to {} failed: {}", url, e);
        }
    });
}

async fn post_notification(url: &str, node_name: &str) -> Result<()> {
    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(Error::HttpError)?;

    let response = client
        .post(url)
        .json(&NodeRequest {
            node: node_name.to_string(),
        })
        .send()
        .await?;

    debug!(
        "Post-bind notification for node {} delivered: HTTP {}",
        node_name,
        response.status()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_post_notification_sends_node_name() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/log"))
            .and(body_json(serde_json::json!({ "node": "node-7" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/log", mock_server.uri());
        post_notification(&url, "node-7").await.unwrap();
    }

    #[tokio::test]
    async fn test_post_notification_unreachable_endpoint_errors() {
        // Port 1 is never listening, so the connection fails fast
        let result = post_notification("http://localhost:1/log", "node-7").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_notify_bound_without_url_is_noop() {
        // Must not spawn or panic when notification is disabled
        notify_bound(None, "node-7".to_string());
    }
}
