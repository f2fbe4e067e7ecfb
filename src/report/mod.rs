use crate::calculations::{MilestoneAllocation, QuotationTotals, RowPricing};
use crate::engine::{QuoteOutcome, QuoteRequest};
use crate::metadata::DocumentRefs;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub mod render;

pub use render::{
    DocumentPair, DocumentRenderer, HtmlRenderer, RenderError, RenderedDocument, ReportKind,
    render_documents,
};

pub const GENERATED_ON_FORMAT: &str = "%d %b %Y, %I:%M %p";

/// Header block shared by both reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportHeader {
    pub project_name: String,
    pub project_description: String,
    pub generated_on: String,
    pub currency_symbol: String,
    pub documents: DocumentRefs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalRoleLine {
    pub role: String,
    pub count: u32,
    pub hours: u32,
    pub total_hours: u64,
    pub compensation: f64,
    pub employee_cost_per_hour: f64,
    pub overhead_per_hour: f64,
    pub margin_per_hour: f64,
    pub internal_cost: f64,
    pub internal_cost_plus_overhead: f64,
    pub margin_amount: f64,
}

/// Client view of a row: effort and quoted price, no cost structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRoleLine {
    pub role: String,
    pub count: u32,
    pub hours: u32,
    pub total_hours: u64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneLine {
    pub name: String,
    pub description: String,
    pub percent: f64,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalReport {
    pub header: ReportHeader,
    pub roles: Vec<InternalRoleLine>,
    pub total_project_hours: u64,
    pub total_project_days: u64,
    pub total_manpower: u64,
    pub total_internal_cost: f64,
    pub total_internal_cost_plus_overhead: f64,
    pub total_margin_amount: f64,
    pub discount_percent: u8,
    pub discount_amount: f64,
    pub final_amount_after_discount: f64,
    pub milestones: Vec<MilestoneLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientReport {
    pub header: ReportHeader,
    pub roles: Vec<ClientRoleLine>,
    pub total_project_hours: u64,
    pub total_project_days: u64,
    pub total_manpower: u64,
    pub total_amount: f64,
    pub discount_percent: u8,
    pub final_amount_after_discount: f64,
    pub milestones: Vec<MilestoneLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBundle {
    pub internal: InternalReport,
    pub client: ClientReport,
}

/// Shapes a computed quotation into the internal and client payloads.
pub fn assemble(
    request: &QuoteRequest,
    outcome: &QuoteOutcome,
    generated_on: NaiveDateTime,
) -> ReportBundle {
    let header = ReportHeader {
        project_name: request.project.name.trim().to_string(),
        project_description: request.project.description.clone(),
        generated_on: generated_on.format(GENERATED_ON_FORMAT).to_string(),
        currency_symbol: outcome.currency_symbol.clone(),
        documents: request.documents.clone(),
    };
    let milestones = milestone_lines(&outcome.milestones);
    let selected: Vec<(&str, &RowPricing)> = outcome
        .rows
        .iter()
        .filter_map(|row| row.role.as_deref().map(|role| (role, row)))
        .collect();

    let internal = internal_report(header.clone(), &selected, &outcome.totals, milestones.clone());
    let client = client_report(header, &selected, &outcome.totals, milestones);
    ReportBundle { internal, client }
}

fn internal_report(
    header: ReportHeader,
    rows: &[(&str, &RowPricing)],
    totals: &QuotationTotals,
    milestones: Vec<MilestoneLine>,
) -> InternalReport {
    let roles = rows
        .iter()
        .map(|(role, row)| InternalRoleLine {
            role: role.to_string(),
            count: row.count,
            hours: row.hours,
            total_hours: row.total_hours,
            compensation: row.compensation,
            employee_cost_per_hour: row.employee_cost_per_hour,
            overhead_per_hour: row.overhead_per_hour,
            margin_per_hour: row.margin_per_hour,
            internal_cost: row.internal_cost,
            internal_cost_plus_overhead: row.internal_cost_plus_overhead,
            margin_amount: row.margin_amount,
        })
        .collect();

    InternalReport {
        header,
        roles,
        total_project_hours: totals.total_project_hours,
        total_project_days: totals.total_project_days,
        total_manpower: totals.total_resource_count,
        total_internal_cost: totals.total_internal_cost,
        total_internal_cost_plus_overhead: totals.total_internal_cost_plus_overhead,
        total_margin_amount: totals.total_margin_amount,
        discount_percent: totals.discount_percent,
        discount_amount: totals.discount_amount,
        final_amount_after_discount: totals.final_amount_after_discount,
        milestones,
    }
}

fn client_report(
    header: ReportHeader,
    rows: &[(&str, &RowPricing)],
    totals: &QuotationTotals,
    milestones: Vec<MilestoneLine>,
) -> ClientReport {
    let roles = rows
        .iter()
        .map(|(role, row)| ClientRoleLine {
            role: role.to_string(),
            count: row.count,
            hours: row.hours,
            total_hours: row.total_hours,
            amount: row.margin_amount,
        })
        .collect();

    ClientReport {
        header,
        roles,
        total_project_hours: totals.total_project_hours,
        total_project_days: totals.total_project_days,
        total_manpower: totals.total_resource_count,
        total_amount: totals.total_margin_amount,
        discount_percent: totals.discount_percent,
        final_amount_after_discount: totals.final_amount_after_discount,
        milestones,
    }
}

fn milestone_lines(allocations: &[MilestoneAllocation]) -> Vec<MilestoneLine> {
    allocations
        .iter()
        .map(|allocation| MilestoneLine {
            name: allocation.name.clone(),
            description: allocation.description.clone(),
            percent: allocation.percent,
            amount: allocation.amount,
        })
        .collect()
}
