//! Credit Pull - orchestration service between a Salesforce org and the
//! CBC credit bureau gateway
//!
//! This library implements the credit pull pipeline: authenticate against
//! Salesforce, resolve an applicant from an Opportunity/Contact pair, build
//! and submit the bureau XML request, classify the response, render the
//! report to PDF and write the result back onto the originating record.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{classify, build_request, normalize_ssn, render_report, credit_field_map, CreditPullPipeline};
pub use models::{ApplicantProfile, BureauHeader, BureauOutcome, ScoredReport, PullOutcome, CreditPullRequest, CreditPullResponse};
