pub mod assignment;
pub mod calculations;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod export;
pub mod factors;
pub mod format;
pub mod gate;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod metadata;
pub mod milestone;
pub mod report;
pub mod validation;

pub use assignment::{RoleAssignment, TeamStructure};
pub use calculations::{
    MilestoneAllocation, QuotationTotals, RowPricer, RowPricing, aggregate, allocate, price,
};
pub use catalog::RoleDefinition;
pub use config::{ConfigError, QuoteConfig};
pub use engine::{QuoteEngine, QuoteError, QuoteOutcome, QuoteRequest};
pub use export::{
    ExportError, export_rows_to_csv, load_request_from_json, save_reports_to_json,
    write_documents,
};
pub use factors::{ClientType, PricingFactors};
pub use format::format_currency;
pub use gate::ExportGate;
pub use metadata::{DocumentRefs, ProjectDetails};
pub use milestone::{Milestone, MilestonePlan, MilestoneStatus};
pub use report::{
    ClientReport, DocumentPair, DocumentRenderer, HtmlRenderer, InternalReport, RenderError,
    ReportBundle, render_documents,
};
pub use validation::ValidationError;
