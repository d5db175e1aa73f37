use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to run a credit pull for a CRM record
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreditPullRequest {
    /// Id of the originating Opportunity/Lead record.
    #[validate(length(min = 1))]
    #[serde(alias = "record_id", rename = "recordId")]
    pub record_id: String,
}
