//! GET/POST helpers returning structured outcomes instead of errors.
//!
//! Every failure (client construction, network, non-200 status) becomes an
//! outcome whose `response` is ready to show to the user.

use std::time::Duration;

use serde::Serialize;

/// Result of [`AdminClient::send_get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOutcome {
    /// Status was exactly 200.
    pub success: bool,
    /// The body on success, otherwise `"<code> (<status text>): <body>"`.
    pub response: String,
    /// 0 when no response was received.
    pub status_code: u16,
    pub status_text: String,
    pub response_body: String,
}

impl GetOutcome {
    fn failed(response: String) -> Self {
        Self {
            success: false,
            response,
            status_code: 0,
            status_text: "Error".to_string(),
            response_body: String::new(),
        }
    }
}

/// Result of [`AdminClient::send_post`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostOutcome {
    pub success: bool,
    /// Empty on success; otherwise the body, or `"<code> (<status text>)"`
    /// when the body is empty.
    pub response: String,
}

/// Reason phrase for a status code, or `Unknown Status`.
pub fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown Status")
        .to_string()
}

/// HTTP client bound to the backend base URL.
#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: String,
    /// Construction errors are kept and reported per request.
    client: Result<reqwest::Client, String>,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.to_string());
        if let Err(err) = &client {
            tracing::error!(%err, "cannot build HTTP client");
        }
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `path` joined to the base URL, with `url_query` appended after `?`
    /// when non-empty. The query must already be encoded.
    pub fn url(&self, path: &str, url_query: &str) -> String {
        if url_query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, url_query)
        }
    }

    pub async fn send_get(&self, path: &str, url_query: &str) -> GetOutcome {
        let client = match &self.client {
            Ok(c) => c,
            Err(err) => return GetOutcome::failed(format!("Unable to create HTTP client: {err}")),
        };
        let url = self.url(path, url_query);
        tracing::debug!(%url, "GET");

        let response = match client.get(&url).send().await {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(%url, %err, "GET failed");
                return GetOutcome::failed(format!("Network Error: {err}"));
            }
        };
        let status = response.status();
        let body = match response.text().await {
            Ok(b) => b,
            Err(err) => return GetOutcome::failed(format!("Network Error: {err}")),
        };

        let status_text = status_text(status);
        let success = status == reqwest::StatusCode::OK;
        let rendered = if success {
            body.clone()
        } else {
            format!("{} ({}): {}", status.as_u16(), status_text, body)
        };
        tracing::info!(%url, status = status.as_u16(), "GET done");
        GetOutcome {
            success,
            response: rendered,
            status_code: status.as_u16(),
            status_text,
            response_body: body,
        }
    }

    pub async fn send_post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> PostOutcome {
        let client = match &self.client {
            Ok(c) => c,
            Err(err) => {
                return PostOutcome {
                    success: false,
                    response: format!("Unable to create HTTP client: {err}"),
                }
            }
        };
        let url = self.url(path, "");
        tracing::debug!(%url, "POST");

        let response = match client.post(&url).json(body).send().await {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(%url, %err, "POST failed");
                return PostOutcome {
                    success: false,
                    response: err.to_string(),
                };
            }
        };
        let status = response.status();
        tracing::info!(%url, status = status.as_u16(), "POST done");
        if status == reqwest::StatusCode::OK {
            return PostOutcome {
                success: true,
                response: String::new(),
            };
        }

        let body = response.text().await.unwrap_or_default();
        let rendered = if body.is_empty() {
            format!("{} ({})", status.as_u16(), status_text(status))
        } else {
            body
        };
        PostOutcome {
            success: false,
            response: rendered,
        }
    }

    /// `GET /internal/admin?token=<token>&command=<command>`.
    pub async fn admin_command(&self, token: &str, command: &str) -> GetOutcome {
        let query = format!(
            "token={}&command={}",
            urlencoding::encode(token),
            urlencoding::encode(command)
        );
        self.send_get("/internal/admin", &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_query_only_when_present() {
        let client = AdminClient::new("http://host:8080/", Duration::from_secs(1));
        assert_eq!(client.url("/getData", ""), "http://host:8080/getData");
        assert_eq!(client.url("/x", "a=1"), "http://host:8080/x?a=1");
    }

    #[test]
    fn reason_phrases() {
        assert_eq!(status_text(reqwest::StatusCode::NOT_FOUND), "Not Found");
        let odd = reqwest::StatusCode::from_u16(599).unwrap();
        assert_eq!(status_text(odd), "Unknown Status");
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // Port 9 on localhost is closed in test environments.
        let client = AdminClient::new("http://127.0.0.1:9", Duration::from_secs(2));
        let outcome = client.send_get("/getData", "").await;
        assert!(!outcome.success);
        assert!(outcome.response.starts_with("Network Error: "));
        assert_eq!(outcome.status_code, 0);
        assert_eq!(outcome.status_text, "Error");
        assert_eq!(outcome.response_body, "");
    }
}
