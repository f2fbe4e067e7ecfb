use crate::assignment::TeamStructure;
use crate::catalog;
use crate::factors::{MARGIN_PERCENT_OPTIONS, MAX_OVERHEAD_FACTOR, MIN_OVERHEAD_FACTOR, PricingFactors};
use crate::milestone::MilestonePlan;
use std::collections::HashSet;
use thiserror::Error;

pub(crate) const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("overhead factor {0} must be between 1.0 and 2.0")]
    OverheadOutOfRange(f64),
    #[error("margin percent {0} must be one of 10, 20, 30, 40 or 50")]
    MarginPercentNotAllowed(u8),
    #[error("discount percent {0} must be between 0 and 100")]
    DiscountOutOfRange(u8),
    #[error("milestone {id} has invalid percent {percent} (must be between 0 and 100)")]
    MilestonePercentOutOfRange { id: u32, percent: f64 },
    #[error("unknown role '{0}'")]
    UnknownRole(String),
    #[error("role '{0}' is already assigned to another row")]
    DuplicateRole(String),
    #[error("duplicate row id {0}")]
    DuplicateRowId(u32),
    #[error("duplicate milestone id {0}")]
    DuplicateMilestoneId(u32),
    #[error("row {0} not found")]
    RowNotFound(u32),
    #[error("milestone {0} not found")]
    MilestoneNotFound(u32),
    #[error("every role is already assigned")]
    NoRolesAvailable,
    #[error("id {0} leaves no room for new entries")]
    IdOutOfRange(u32),
    #[error("milestones already add up to 100%")]
    MilestonesFullyAllocated,
}

pub fn validate_factors(factors: &PricingFactors) -> Result<(), ValidationError> {
    let overhead = factors.overhead_factor;
    if !overhead.is_finite()
        || overhead < MIN_OVERHEAD_FACTOR - EPSILON
        || overhead > MAX_OVERHEAD_FACTOR + EPSILON
    {
        return Err(ValidationError::OverheadOutOfRange(overhead));
    }
    if !MARGIN_PERCENT_OPTIONS.contains(&factors.margin_percent) {
        return Err(ValidationError::MarginPercentNotAllowed(
            factors.margin_percent,
        ));
    }
    if factors.discount_percent > 100 {
        return Err(ValidationError::DiscountOutOfRange(factors.discount_percent));
    }
    Ok(())
}

pub fn validate_milestone_percent(id: u32, percent: f64) -> Result<(), ValidationError> {
    if !percent.is_finite() || percent < -EPSILON || percent > 100.0 + EPSILON {
        return Err(ValidationError::MilestonePercentOutOfRange { id, percent });
    }
    Ok(())
}

/// Every selected role must exist in the catalog and appear on at most one row.
pub fn validate_team(team: &TeamStructure) -> Result<(), ValidationError> {
    let mut ids = HashSet::with_capacity(team.rows().len());
    for row in team.rows() {
        if !ids.insert(row.id) {
            return Err(ValidationError::DuplicateRowId(row.id));
        }
    }
    let mut seen = HashSet::with_capacity(team.rows().len());
    for role in team.rows().iter().filter_map(|row| row.role.as_deref()) {
        if catalog::lookup(role).is_none() {
            return Err(ValidationError::UnknownRole(role.to_string()));
        }
        if !seen.insert(role) {
            return Err(ValidationError::DuplicateRole(role.to_string()));
        }
    }
    Ok(())
}

pub fn validate_milestones(plan: &MilestonePlan) -> Result<(), ValidationError> {
    let mut ids = HashSet::with_capacity(plan.milestones().len());
    for milestone in plan.milestones() {
        if !ids.insert(milestone.id) {
            return Err(ValidationError::DuplicateMilestoneId(milestone.id));
        }
        validate_milestone_percent(milestone.id, milestone.percent)?;
    }
    Ok(())
}

pub(crate) fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}
