use crate::calculations::QuotationTotals;
use crate::metadata::ProjectDetails;
use crate::milestone::MilestoneStatus;
use serde::{Deserialize, Serialize};

/// Whether report generation may be offered, with the individual conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportGate {
    pub has_project_name: bool,
    pub has_selected_role: bool,
    pub has_project_hours: bool,
    pub milestones_valid: bool,
}

impl ExportGate {
    pub fn evaluate(
        project: &ProjectDetails,
        totals: &QuotationTotals,
        milestones: MilestoneStatus,
    ) -> Self {
        Self {
            has_project_name: project.has_name(),
            has_selected_role: totals.has_selected_role(),
            has_project_hours: totals.total_project_hours > 0,
            milestones_valid: milestones.allows_export(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.has_project_name
            && self.has_selected_role
            && self.has_project_hours
            && self.milestones_valid
    }

    pub fn blockers(&self) -> Vec<&'static str> {
        let mut reasons = Vec::new();
        if !self.has_project_name {
            reasons.push("project name is required");
        }
        if !self.has_selected_role {
            reasons.push("at least one row needs a role");
        }
        if !self.has_project_hours {
            reasons.push("total project hours must be greater than zero");
        }
        if !self.milestones_valid {
            reasons.push("milestone percentages must add up to 100%");
        }
        reasons
    }
}
