use crate::models::{ApplicantProfile, ReportArtifact};
use base64::Engine;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Salesforce
#[derive(Debug, Error)]
pub enum SalesforceError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Error getting access token: {status} {body}")]
    Auth { status: u16, body: String },

    #[error("Error fetching record data: {status} {body}")]
    Fetch { status: u16, body: String },

    #[error("Error uploading report attachment: {status} {body}")]
    Upload { status: u16, body: String },

    #[error("Error patching credit fields: {status} {body}")]
    Patch { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Salesforce REST client
///
/// Handles all communication with the Salesforce org including:
/// - Password-grant token exchange
/// - Resolving the Opportunity/Contact pair into an applicant profile
/// - Uploading the rendered report as a ContentVersion
/// - Patching extracted credit fields onto the originating record
pub struct SalesforceClient {
    base_url: String,
    api_version: String,
    record_object: String,
    credentials: SalesforceCredentials,
    client: Client,
}

/// Password-grant credentials for the connected app.
#[derive(Debug, Clone)]
pub struct SalesforceCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl SalesforceClient {
    /// Create a new Salesforce client
    pub fn new(
        base_url: String,
        api_version: String,
        record_object: String,
        credentials: SalesforceCredentials,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_version,
            record_object,
            credentials,
            client,
        }
    }

    fn sobject_url(&self, object: &str, id: &str) -> String {
        format!(
            "{}/services/data/{}/sobjects/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            object,
            id
        )
    }

    /// Obtain a bearer token via the password grant
    ///
    /// A non-success status ends the run; no retry is attempted.
    pub async fn obtain_token(&self) -> Result<String, SalesforceError> {
        let url = format!(
            "{}/services/oauth2/token",
            self.base_url.trim_end_matches('/')
        );

        let params = [
            ("grant_type", "password"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
        ];

        tracing::debug!("Requesting access token from {}", url);

        let response = self.client.post(&url).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SalesforceError::Auth { status, body });
        }

        let json: Value = response.json().await?;

        json.get("access_token")
            .and_then(|t| t.as_str())
            .map(|t| t.to_string())
            .ok_or_else(|| SalesforceError::InvalidResponse("Missing access_token field".into()))
    }

    /// Resolve the originating record and its linked contact into an applicant profile
    ///
    /// Two sequential reads: the record itself (for `ContactId`), then the
    /// contact. Blank contact fields map to empty strings.
    pub async fn fetch_applicant(
        &self,
        record_id: &str,
        token: &str,
    ) -> Result<ApplicantProfile, SalesforceError> {
        let record = self
            .get_sobject(&self.record_object, record_id, token)
            .await?;

        let contact_id = record
            .get("ContactId")
            .and_then(|c| c.as_str())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                SalesforceError::InvalidResponse(format!(
                    "Record {} has no linked ContactId",
                    record_id
                ))
            })?;

        tracing::debug!("Record {} links to contact {}", record_id, contact_id);

        let contact = self.get_sobject("Contact", contact_id, token).await?;

        let field = |name: &str| -> String {
            contact
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        Ok(ApplicantProfile {
            first_name: field("FirstName"),
            last_name: field("LastName"),
            ssn: field("SSN__c"),
            street: field("MailingStreet"),
            city: field("MailingCity"),
            state: field("MailingStateCode"),
            postal_code: field("MailingPostalCode"),
        })
    }

    async fn get_sobject(
        &self,
        object: &str,
        id: &str,
        token: &str,
    ) -> Result<Value, SalesforceError> {
        let url = self.sobject_url(object, id);

        tracing::debug!("Fetching {} {}", object, id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SalesforceError::Fetch { status, body });
        }

        Ok(response.json().await?)
    }

    /// Upload the rendered report as a ContentVersion linked to the record
    pub async fn upload_report(
        &self,
        record_id: &str,
        artifact: &ReportArtifact,
        title: &str,
        token: &str,
    ) -> Result<(), SalesforceError> {
        let url = format!(
            "{}/services/data/{}/sobjects/ContentVersion/",
            self.base_url.trim_end_matches('/'),
            self.api_version
        );

        let encoded = base64::engine::general_purpose::STANDARD.encode(&artifact.bytes);

        let payload = serde_json::json!({
            "Title": title,
            "PathOnClient": artifact.file_name,
            "VersionData": encoded,
            "FirstPublishLocationId": record_id,
        });

        tracing::debug!("Uploading report attachment for record {}", record_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SalesforceError::Upload { status, body });
        }

        Ok(())
    }

    /// Patch the extracted credit fields onto the originating record
    pub async fn patch_credit_fields(
        &self,
        record_id: &str,
        fields: &Value,
        token: &str,
    ) -> Result<(), SalesforceError> {
        let url = self.sobject_url(&self.record_object, record_id);

        tracing::debug!("Patching credit fields onto record {}", record_id);

        let response = self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(fields)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SalesforceError::Patch { status, body });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salesforce_client_creation() {
        let client = SalesforceClient::new(
            "https://example.my.salesforce.com".to_string(),
            "v62.0".to_string(),
            "Opportunity".to_string(),
            SalesforceCredentials {
                client_id: "key".to_string(),
                client_secret: "secret".to_string(),
                username: "user".to_string(),
                password: "pass".to_string(),
            },
        );

        assert_eq!(
            client.sobject_url("Opportunity", "006xx0000012345"),
            "https://example.my.salesforce.com/services/data/v62.0/sobjects/Opportunity/006xx0000012345"
        );
    }

    #[test]
    fn test_sobject_url_trims_trailing_slash() {
        let client = SalesforceClient::new(
            "https://example.my.salesforce.com/".to_string(),
            "v62.0".to_string(),
            "Lead".to_string(),
            SalesforceCredentials {
                client_id: String::new(),
                client_secret: String::new(),
                username: String::new(),
                password: String::new(),
            },
        );

        assert_eq!(
            client.sobject_url("Contact", "003xx"),
            "https://example.my.salesforce.com/services/data/v62.0/sobjects/Contact/003xx"
        );
    }
}
