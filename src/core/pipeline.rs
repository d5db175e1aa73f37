use crate::core::classifier::{classify, ClassifyError};
use crate::core::report::{render_report, RenderError};
use crate::core::request_builder::build_request;
use crate::models::{
    ApplicantProfile, BureauHeader, BureauOutcome, PullOutcome, ScoredReport, WriteBackReport,
};
use crate::services::{BureauError, BureauGateway, SalesforceClient, SalesforceError};
use std::sync::Arc;
use thiserror::Error;

/// Stage-level failures that abort a pipeline run
///
/// In-band bureau outcomes (error payloads, no-hits, declines) are not
/// errors; they travel through [`PullOutcome`] instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Salesforce(#[from] SalesforceError),

    #[error(transparent)]
    Bureau(#[from] BureauError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

const REPORT_FILE_NAME: &str = "credit_report.pdf";

/// The credit pull orchestration pipeline.
///
/// One applicant per call, strictly linear: authenticate, resolve the
/// applicant, build and submit the bureau request, classify the response,
/// and on a scored outcome render the report and write it back to the CRM.
/// Any stage failure short-circuits the run. The struct itself is
/// stateless across runs, so concurrent invocations are independent.
pub struct CreditPullPipeline {
    salesforce: Arc<SalesforceClient>,
    bureau: Arc<BureauGateway>,
    header: BureauHeader,
}

impl CreditPullPipeline {
    pub fn new(
        salesforce: Arc<SalesforceClient>,
        bureau: Arc<BureauGateway>,
        header: BureauHeader,
    ) -> Self {
        Self {
            salesforce,
            bureau,
            header,
        }
    }

    /// Run the full pipeline for one CRM record.
    pub async fn run(&self, record_id: &str) -> Result<PullOutcome, PipelineError> {
        tracing::info!("Starting credit pull for record {}", record_id);

        let token = self.salesforce.obtain_token().await?;

        let profile = self.salesforce.fetch_applicant(record_id, &token).await?;

        tracing::debug!(
            "Resolved applicant {} {} for record {}",
            profile.first_name,
            profile.last_name,
            record_id
        );

        let request_xml = build_request(&profile, &self.header);

        let response_xml = self.bureau.submit(&request_xml).await?;

        match classify(&response_xml)? {
            BureauOutcome::Error { description } => {
                tracing::warn!("Bureau error for record {}: {}", record_id, description);
                Ok(PullOutcome::BureauError { description })
            }
            BureauOutcome::NoHit => {
                tracing::info!("No hit for record {}", record_id);
                Ok(PullOutcome::NoHit)
            }
            BureauOutcome::Declined { description } => {
                tracing::info!("Decline for record {}: {}", record_id, description);
                Ok(PullOutcome::Declined { description })
            }
            BureauOutcome::Scored(report) => {
                tracing::info!("Scored {} for record {}", report.score, record_id);
                let write_back = self
                    .write_back(record_id, &profile, &report, &token)
                    .await?;
                Ok(PullOutcome::Scored {
                    score: report.score,
                    report_markup: report.report_markup,
                    write_back,
                })
            }
        }
    }

    /// Render the report and perform the dual CRM write-back.
    ///
    /// The upload and the patch are independent: a patch failure after a
    /// successful upload leaves the attachment in place, and both results
    /// are reported to the caller. Only a render failure aborts.
    async fn write_back(
        &self,
        record_id: &str,
        profile: &ApplicantProfile,
        report: &ScoredReport,
        token: &str,
    ) -> Result<WriteBackReport, PipelineError> {
        let artifact = render_report(&report.report_markup, REPORT_FILE_NAME)?;

        let title = format!(
            "{} {} - {} - Experian Credit Report",
            profile.first_name, profile.last_name, report.score
        );

        let mut result = WriteBackReport::default();

        if let Err(e) = self
            .salesforce
            .upload_report(record_id, &artifact, &title, token)
            .await
        {
            tracing::error!("Attachment upload failed for record {}: {}", record_id, e);
            result.attachment_error = Some(e.to_string());
        }

        let fields = credit_field_map(report);

        if let Err(e) = self
            .salesforce
            .patch_credit_fields(record_id, &fields, token)
            .await
        {
            tracing::error!("Field patch failed for record {}: {}", record_id, e);
            result.patch_error = Some(e.to_string());
        }

        Ok(result)
    }
}

/// Map a scored report onto the CRM record's custom field names.
pub fn credit_field_map(report: &ScoredReport) -> serde_json::Value {
    serde_json::json!({
        "FICO__c": report.score,
        "Total_Revolving_Balance__c": report.cc_balance,
        "Revolving_Available__c": report.rev_avail_pct,
        "Open_Tradelines__c": report.open_trades,
        "Total_Installment_Balance__c": report.install_balance,
        "Real_Estate_Balance__c": report.real_estate_balance,
        "Inquires_in_Last_6_Mos__c": report.six_mo_inquiries,
        "Past_Due_Accounts__c": report.past_due_flag,
        "Amount_Past_Due__c": report.amount_past_due,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ScoredReport {
        ScoredReport {
            score: "720".to_string(),
            cc_balance: "1500".to_string(),
            rev_avail_pct: "85".to_string(),
            open_trades: "7".to_string(),
            install_balance: "12000".to_string(),
            real_estate_balance: "250000".to_string(),
            six_mo_inquiries: "2".to_string(),
            past_due_flag: "N".to_string(),
            amount_past_due: "0".to_string(),
            report_markup: "<p>report</p>".to_string(),
        }
    }

    #[test]
    fn test_credit_field_map_covers_all_nine_fields() {
        let fields = credit_field_map(&sample_report());
        let obj = fields.as_object().unwrap();

        assert_eq!(obj.len(), 9);
        assert_eq!(obj["FICO__c"], "720");
        assert_eq!(obj["Total_Revolving_Balance__c"], "1500");
        assert_eq!(obj["Revolving_Available__c"], "85");
        assert_eq!(obj["Open_Tradelines__c"], "7");
        assert_eq!(obj["Total_Installment_Balance__c"], "12000");
        assert_eq!(obj["Real_Estate_Balance__c"], "250000");
        assert_eq!(obj["Inquires_in_Last_6_Mos__c"], "2");
        assert_eq!(obj["Past_Due_Accounts__c"], "N");
        assert_eq!(obj["Amount_Past_Due__c"], "0");
    }
}
