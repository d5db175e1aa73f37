// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ApplicantProfile, BureauHeader, BureauOutcome, ScoredReport, ReportArtifact, WriteBackReport, PullOutcome, NO_HIT_MESSAGE};
pub use requests::CreditPullRequest;
pub use responses::{CreditPullResponse, HealthResponse, ErrorResponse};
