use serde::{Deserialize, Serialize};

/// Applicant identity and address data resolved from the CRM.
///
/// Built once per pipeline run from the Opportunity/Contact pair and
/// immutable afterwards. Fields the CRM left blank are carried as empty
/// strings; the bureau schema tolerates blanks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub first_name: String,
    pub last_name: String,
    /// Digits only by the time it reaches the bureau request.
    pub ssn: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// Static header credentials placed into every bureau request.
#[derive(Debug, Clone)]
pub struct BureauHeader {
    pub user_id: String,
    pub user_password: String,
    pub customer_id: String,
}

/// Classified bureau response. Exactly one variant applies per run.
///
/// The gateway returns HTTP 200 for every semantic outcome, so bureau
/// "failure" is data here, never a Rust error.
#[derive(Debug, Clone, PartialEq)]
pub enum BureauOutcome {
    /// Top-level gateway error (bad credentials, malformed request, ...).
    Error { description: String },
    /// No matching credit file was found for the applicant.
    NoHit,
    /// No score could be computed; the bureau returned a reason instead.
    Declined { description: String },
    /// Full credit report with score and summary attributes.
    Scored(ScoredReport),
}

/// Score, summary attributes and report body of a scored response.
///
/// Values are carried as the bureau's own strings and patched onto the CRM
/// record verbatim; the CRM owns numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredReport {
    pub score: String,
    pub cc_balance: String,
    pub rev_avail_pct: String,
    pub open_trades: String,
    pub install_balance: String,
    pub real_estate_balance: String,
    pub six_mo_inquiries: String,
    pub past_due_flag: String,
    pub amount_past_due: String,
    /// Embedded HTML report body.
    pub report_markup: String,
}

/// Rendered report document, handed to the CRM upload and then discarded.
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Per-write results of the dual CRM write-back.
///
/// The attachment upload and the field patch are independent best-effort
/// operations; a failure of one does not roll back the other.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteBackReport {
    #[serde(rename = "attachmentError")]
    pub attachment_error: Option<String>,
    #[serde(rename = "patchError")]
    pub patch_error: Option<String>,
}

impl WriteBackReport {
    pub fn fully_succeeded(&self) -> bool {
        self.attachment_error.is_none() && self.patch_error.is_none()
    }
}

/// User-visible result of a pipeline run.
#[derive(Debug, Clone)]
pub enum PullOutcome {
    /// Report pulled, rendered and written back (write-back best-effort).
    Scored {
        score: String,
        report_markup: String,
        write_back: WriteBackReport,
    },
    NoHit,
    Declined { description: String },
    /// The gateway returned a structured error payload.
    BureauError { description: String },
}

/// Fixed diagnostic shown for the no-hit outcome.
pub const NO_HIT_MESSAGE: &str = "No Hit. Credit Profile Frozen, Consumer Info is Incorrect or Consumer Doesn't have a Credit Score";
