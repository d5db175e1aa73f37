use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when submitting to the bureau gateway
#[derive(Debug, Error)]
pub enum BureauError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Bureau gateway client
///
/// A single synchronous XML POST per pull. A non-200 status is not treated
/// as fatal here: the gateway returns structured error XML on non-200 as
/// well as on 200, so classification of the body is the authority on
/// failure, not the status line.
pub struct BureauGateway {
    endpoint: String,
    client: Client,
}

impl BureauGateway {
    /// Create a new gateway client
    pub fn new(endpoint: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { endpoint, client }
    }

    /// Submit the request XML and return the raw response body
    pub async fn submit(&self, request_xml: &str) -> Result<String, BureauError> {
        tracing::debug!("Submitting bureau request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .body(request_xml.to_string())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("Bureau gateway responded with status {}", status);

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bureau_gateway_creation() {
        let gateway = BureauGateway::new("https://bureau.test/post.php".to_string());
        assert_eq!(gateway.endpoint, "https://bureau.test/post.php");
    }
}
