// Core pipeline exports
pub mod classifier;
pub mod pipeline;
pub mod report;
pub mod request_builder;

pub use classifier::{classify, ClassifyError};
pub use pipeline::{credit_field_map, CreditPullPipeline, PipelineError};
pub use report::{render_report, RenderError};
pub use request_builder::{build_request, normalize_ssn};
