pub mod aggregation;
pub mod milestone_allocation;
pub mod row_pricing;

pub use aggregation::{HOURS_PER_DAY, QuotationTotals, aggregate};
pub use milestone_allocation::{MilestoneAllocation, allocate, round_currency};
pub use row_pricing::{ANNUAL_WORKING_HOURS, RowPricer, RowPricing, price};
