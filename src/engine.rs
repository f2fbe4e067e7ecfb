use crate::assignment::TeamStructure;
use crate::calculations::{
    MilestoneAllocation, QuotationTotals, RowPricer, RowPricing, aggregate, allocate,
};
use crate::config::QuoteConfig;
use crate::factors::PricingFactors;
use crate::gate::ExportGate;
use crate::metadata::{DocumentRefs, ProjectDetails};
use crate::milestone::{MilestonePlan, MilestoneStatus};
use crate::report::{self, ReportBundle};
use crate::validation::{self, ValidationError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("report generation is not available: {}", reasons.join("; "))]
    ExportBlocked { reasons: Vec<&'static str> },
}

/// Everything the host collects from the user for one quotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteRequest {
    pub project: ProjectDetails,
    pub factors: PricingFactors,
    pub team: TeamStructure,
    pub milestones: MilestonePlan,
    pub documents: DocumentRefs,
}

impl QuoteRequest {
    pub fn new(project: ProjectDetails, factors: PricingFactors) -> Self {
        Self {
            project,
            factors,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_factors(&self.factors)?;
        validation::validate_team(&self.team)?;
        validation::validate_milestones(&self.milestones)?;
        Ok(())
    }
}

/// Result of pricing a [`QuoteRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteOutcome {
    pub currency_symbol: String,
    pub rows: Vec<RowPricing>,
    pub totals: QuotationTotals,
    pub milestones: Vec<MilestoneAllocation>,
    pub milestone_status: MilestoneStatus,
    pub gate: ExportGate,
}

impl QuoteOutcome {
    pub fn can_export(&self) -> bool {
        self.gate.is_open()
    }
}

/// Stateless facade over the calculations. Holds only the process-wide config.
#[derive(Debug, Clone, Default)]
pub struct QuoteEngine {
    config: QuoteConfig,
}

impl QuoteEngine {
    pub fn new(config: QuoteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// Default inputs for a fresh session: one empty row, configured default factors.
    pub fn new_request(&self) -> QuoteRequest {
        QuoteRequest {
            factors: PricingFactors::from_config(&self.config),
            ..QuoteRequest::default()
        }
    }

    /// Validates and prices a request: rows, totals, milestone schedule and export gate.
    pub fn quote(&self, request: &QuoteRequest) -> Result<QuoteOutcome, QuoteError> {
        request.validate()?;

        let pricer = RowPricer::new(&self.config);
        let rows = pricer.price_all(request.team.rows(), &request.factors);
        let totals = aggregate(&rows, request.factors.discount_percent);
        let milestones = allocate(
            request.milestones.milestones(),
            totals.final_amount_after_discount,
        );
        let milestone_status = request.milestones.status();
        let gate = ExportGate::evaluate(&request.project, &totals, milestone_status);

        if let MilestoneStatus::Incomplete { total_percent }
        | MilestoneStatus::Overallocated { total_percent } = milestone_status
        {
            warn!(total_percent, "milestone percentages do not add up to 100%");
        }
        debug!(
            rows = rows.len(),
            selected = totals.selected_row_count,
            total_hours = totals.total_project_hours,
            final_amount = totals.final_amount_after_discount,
            export = gate.is_open(),
            "quotation computed"
        );

        Ok(QuoteOutcome {
            currency_symbol: request.factors.currency_symbol().to_string(),
            rows,
            totals,
            milestones,
            milestone_status,
            gate,
        })
    }

    /// Prices the request and assembles both report payloads, refusing when the export
    /// gate is closed.
    pub fn reports(
        &self,
        request: &QuoteRequest,
        generated_on: NaiveDateTime,
    ) -> Result<ReportBundle, QuoteError> {
        let outcome = self.quote(request)?;
        if !outcome.gate.is_open() {
            return Err(QuoteError::ExportBlocked {
                reasons: outcome.gate.blockers(),
            });
        }
        Ok(report::assemble(request, &outcome, generated_on))
    }
}
