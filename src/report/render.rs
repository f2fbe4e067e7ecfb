use super::{ClientReport, InternalReport, MilestoneLine, ReportBundle, ReportHeader};
use crate::format::{format_count, format_currency, format_percent};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write document: {0}")]
    Format(#[from] fmt::Error),
    #[error("renderer failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Internal,
    Client,
}

impl ReportKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Internal => "Internal",
            ReportKind::Client => "Client",
        }
    }

    pub fn file_name(&self, project_name: &str, extension: &str) -> String {
        format!("{project_name} {} Quotation.{extension}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub kind: ReportKind,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPair {
    pub internal: RenderedDocument,
    pub client: RenderedDocument,
}

/// Turns report payloads into document bytes (PDF, HTML, ...).
pub trait DocumentRenderer {
    fn file_extension(&self) -> &str;
    fn content_type(&self) -> &str;
    fn render_internal(&self, report: &InternalReport) -> Result<Vec<u8>, RenderError>;
    fn render_client(&self, report: &ClientReport) -> Result<Vec<u8>, RenderError>;
}

/// Renders both reports. Returns `None` unless both documents were produced.
pub fn render_documents(
    renderer: &dyn DocumentRenderer,
    bundle: &ReportBundle,
) -> Option<DocumentPair> {
    let project_name = bundle.internal.header.project_name.as_str();
    let internal = match renderer.render_internal(&bundle.internal) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(project = project_name, error = %err, "internal report rendering failed");
            return None;
        }
    };
    let client = match renderer.render_client(&bundle.client) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(project = project_name, error = %err, "client report rendering failed");
            return None;
        }
    };

    let document = |kind: ReportKind, bytes: Vec<u8>| RenderedDocument {
        kind,
        file_name: kind.file_name(project_name, renderer.file_extension()),
        content_type: renderer.content_type().to_string(),
        bytes,
    };
    Some(DocumentPair {
        internal: document(ReportKind::Internal, internal),
        client: document(ReportKind::Client, client),
    })
}

/// Plain HTML rendition of the reports, suitable for printing or handing to an
/// HTML-to-PDF converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl DocumentRenderer for HtmlRenderer {
    fn file_extension(&self) -> &str {
        "html"
    }

    fn content_type(&self) -> &str {
        "text/html; charset=utf-8"
    }

    fn render_internal(&self, report: &InternalReport) -> Result<Vec<u8>, RenderError> {
        let symbol = report.header.currency_symbol.as_str();
        let mut out = String::new();
        open_document(&mut out, &report.header, ReportKind::Internal)?;

        out.push_str("<table class=\"roles\">\n<tr><th>Role</th><th>Count</th><th>Hours</th>");
        out.push_str("<th>Compensation</th><th>Emp Cost / Hr</th><th>Overhead / Hr</th>");
        out.push_str("<th>Margin / Hr</th><th>Total Hours</th><th>Internal Cost</th>");
        out.push_str("<th>Internal Cost + Overhead</th><th>Margin</th></tr>\n");
        for line in &report.roles {
            writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&line.role),
                line.count,
                line.hours,
                format_currency(line.compensation, symbol),
                format_currency(line.employee_cost_per_hour, symbol),
                format_currency(line.overhead_per_hour, symbol),
                format_currency(line.margin_per_hour, symbol),
                format_count(line.total_hours),
                format_currency(line.internal_cost, symbol),
                format_currency(line.internal_cost_plus_overhead, symbol),
                format_currency(line.margin_amount, symbol),
            )?;
        }
        out.push_str("</table>\n<table class=\"totals\">\n");
        summary_row(&mut out, "Total Manpower", &format_count(report.total_manpower))?;
        summary_row(
            &mut out,
            "Total Project Duration",
            &format!(
                "{} Hrs ({} days)",
                format_count(report.total_project_hours),
                format_count(report.total_project_days)
            ),
        )?;
        summary_row(
            &mut out,
            "Total Internal Cost",
            &format_currency(report.total_internal_cost, symbol),
        )?;
        summary_row(
            &mut out,
            "Total Internal Cost + Total Overhead",
            &format_currency(report.total_internal_cost_plus_overhead, symbol),
        )?;
        summary_row(
            &mut out,
            "Total Margin Cost",
            &format_currency(report.total_margin_amount, symbol),
        )?;
        summary_row(
            &mut out,
            "Offered Discount",
            &format_percent(f64::from(report.discount_percent)),
        )?;
        summary_row(
            &mut out,
            "Discounted Amount",
            &format_currency(report.discount_amount, symbol),
        )?;
        summary_row(
            &mut out,
            "Total Project Amount",
            &format_currency(report.final_amount_after_discount, symbol),
        )?;
        out.push_str("</table>\n");

        milestone_table(&mut out, &report.milestones, symbol)?;
        close_document(&mut out);
        Ok(out.into_bytes())
    }

    fn render_client(&self, report: &ClientReport) -> Result<Vec<u8>, RenderError> {
        let symbol = report.header.currency_symbol.as_str();
        let mut out = String::new();
        open_document(&mut out, &report.header, ReportKind::Client)?;

        out.push_str("<table class=\"roles\">\n<tr><th>Role</th><th>Count</th><th>Hours</th>");
        out.push_str("<th>Total Hours</th><th>Amount</th></tr>\n");
        for line in &report.roles {
            writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&line.role),
                line.count,
                line.hours,
                format_count(line.total_hours),
                format_currency(line.amount, symbol),
            )?;
        }
        out.push_str("</table>\n<table class=\"totals\">\n");
        summary_row(&mut out, "Total Manpower", &format_count(report.total_manpower))?;
        summary_row(
            &mut out,
            "Estimated Duration",
            &format!(
                "{} Hrs ({} days)",
                format_count(report.total_project_hours),
                format_count(report.total_project_days)
            ),
        )?;
        summary_row(
            &mut out,
            "Total Amount",
            &format_currency(report.total_amount, symbol),
        )?;
        if report.discount_percent > 0 {
            summary_row(
                &mut out,
                "Discount",
                &format_percent(f64::from(report.discount_percent)),
            )?;
        }
        summary_row(
            &mut out,
            "Total Project Amount",
            &format_currency(report.final_amount_after_discount, symbol),
        )?;
        out.push_str("</table>\n");

        milestone_table(&mut out, &report.milestones, symbol)?;
        close_document(&mut out);
        Ok(out.into_bytes())
    }
}

fn open_document(out: &mut String, header: &ReportHeader, kind: ReportKind) -> fmt::Result {
    let title = format!("{} {} Quotation", header.project_name, kind.label());
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(
        out,
        "<html><head><meta charset=\"utf-8\"><title>{}</title></head><body>",
        escape(&title)
    )?;
    writeln!(out, "<h1>{}</h1>", escape(&header.project_name))?;
    if !header.project_description.trim().is_empty() {
        writeln!(out, "<p class=\"description\">{}</p>", escape(&header.project_description))?;
    }
    writeln!(out, "<p class=\"generated\">Generated on {}</p>", escape(&header.generated_on))?;
    let attachments: Vec<(&str, &str)> = [
        ("User Requirement Document", header.documents.user_requirement.as_deref()),
        (
            "Functional Requirement Document",
            header.documents.functional_requirement.as_deref(),
        ),
    ]
    .into_iter()
    .filter_map(|(label, doc)| doc.map(|doc| (label, doc)))
    .collect();
    if !attachments.is_empty() {
        out.push_str("<ul class=\"attachments\">\n");
        for (label, doc) in attachments {
            writeln!(out, "<li>{}: {}</li>", label, escape(doc))?;
        }
        out.push_str("</ul>\n");
    }
    Ok(())
}

fn close_document(out: &mut String) {
    out.push_str("</body></html>\n");
}

fn summary_row(out: &mut String, label: &str, value: &str) -> fmt::Result {
    writeln!(out, "<tr><th>{}</th><td>{}</td></tr>", label, escape(value))
}

fn milestone_table(out: &mut String, milestones: &[MilestoneLine], symbol: &str) -> fmt::Result {
    if milestones.is_empty() {
        return Ok(());
    }
    out.push_str("<h2>Milestones</h2>\n<table class=\"milestones\">\n");
    out.push_str("<tr><th>Milestone</th><th>Description</th><th>Percentage</th><th>Amount</th></tr>\n");
    for line in milestones {
        writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&line.name),
            escape(&line.description),
            format_percent(line.percent),
            escape(&format_currency(line.amount as f64, symbol)),
        )?;
    }
    out.push_str("</table>\n");
    Ok(())
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
