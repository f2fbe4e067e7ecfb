use super::row_pricing::RowPricing;
use serde::{Deserialize, Serialize};

pub const HOURS_PER_DAY: u64 = 8;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuotationTotals {
    pub total_internal_cost: f64,
    pub total_internal_cost_plus_overhead: f64,
    pub total_margin_amount: f64,
    pub total_project_hours: u64,
    pub total_project_days: u64,
    pub total_resource_count: u64,
    pub selected_row_count: usize,
    pub discount_percent: u8,
    pub discount_amount: f64,
    pub final_amount_after_discount: f64,
}

impl QuotationTotals {
    pub fn has_selected_role(&self) -> bool {
        self.selected_row_count > 0
    }
}

/// Sums priced rows into project totals and applies the discount to the margin total.
pub fn aggregate(rows: &[RowPricing], discount_percent: u8) -> QuotationTotals {
    let mut totals = QuotationTotals {
        discount_percent,
        ..QuotationTotals::default()
    };

    for row in rows {
        totals.total_internal_cost += row.internal_cost;
        totals.total_internal_cost_plus_overhead += row.internal_cost_plus_overhead;
        totals.total_margin_amount += row.margin_amount;
        totals.total_project_hours += row.total_hours;
        totals.total_resource_count += u64::from(row.count);
        if row.is_selected() {
            totals.selected_row_count += 1;
        }
    }

    totals.discount_amount = totals.total_margin_amount * f64::from(discount_percent) / 100.0;
    totals.final_amount_after_discount = totals.total_margin_amount - totals.discount_amount;
    totals.total_project_days = totals.total_project_hours.div_ceil(HOURS_PER_DAY);
    totals
}
