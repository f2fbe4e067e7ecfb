use crate::assignment::RoleAssignment;
use crate::catalog::RoleDefinition;
use crate::config::{QuoteConfig, USD_INR_RATE};
use crate::factors::PricingFactors;
use serde::{Deserialize, Serialize};

/// Standard working hours in a year: 52 weeks of 40 hours.
pub const ANNUAL_WORKING_HOURS: f64 = 2080.0;

/// Cost breakdown of a single team row. Derived on every computation, never stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowPricing {
    pub assignment_id: u32,
    pub role: Option<String>,
    pub count: u32,
    pub hours: u32,
    pub compensation: f64,
    pub employee_cost_per_hour: f64,
    pub overhead_per_hour: f64,
    pub margin_per_hour: f64,
    pub total_hours: u64,
    pub internal_cost: f64,
    pub internal_cost_plus_overhead: f64,
    pub margin_amount: f64,
}

impl RowPricing {
    pub fn is_selected(&self) -> bool {
        self.role.is_some()
    }
}

pub struct RowPricer {
    usd_inr_rate: f64,
}

impl Default for RowPricer {
    fn default() -> Self {
        Self {
            usd_inr_rate: USD_INR_RATE,
        }
    }
}

impl RowPricer {
    pub fn new(config: &QuoteConfig) -> Self {
        Self {
            usd_inr_rate: config.usd_inr_rate,
        }
    }

    /// Prices one row. A row without a role prices to all zeros.
    pub fn price(
        &self,
        assignment: &RoleAssignment,
        factors: &PricingFactors,
        role: Option<&RoleDefinition>,
    ) -> RowPricing {
        let Some(role) = role else {
            return RowPricing {
                assignment_id: assignment.id,
                ..RowPricing::default()
            };
        };

        let client = factors.client_type;
        let compensation = role.base_compensation * client.conversion_rate(self.usd_inr_rate);
        let employee_cost_per_hour = compensation / ANNUAL_WORKING_HOURS;
        let overhead_per_hour = employee_cost_per_hour * factors.overhead_factor;
        let margin_per_hour = overhead_per_hour / client.margin_divisor();

        let total_hours = u64::from(assignment.count) * u64::from(assignment.hours);
        let hours = total_hours as f64;
        let internal_cost = hours * employee_cost_per_hour;
        let internal_cost_plus_overhead = hours * overhead_per_hour;
        let margin_amount = internal_cost_plus_overhead / factors.margin_factor();

        RowPricing {
            assignment_id: assignment.id,
            role: Some(role.name.to_string()),
            count: assignment.count,
            hours: assignment.hours,
            compensation,
            employee_cost_per_hour,
            overhead_per_hour,
            margin_per_hour,
            total_hours,
            internal_cost,
            internal_cost_plus_overhead,
            margin_amount,
        }
    }

    /// Prices every row in order, resolving roles against the catalog.
    pub fn price_all(
        &self,
        assignments: &[RoleAssignment],
        factors: &PricingFactors,
    ) -> Vec<RowPricing> {
        assignments
            .iter()
            .map(|assignment| self.price(assignment, factors, assignment.role_definition()))
            .collect()
    }
}

/// Prices a row with the default exchange rate.
pub fn price(
    assignment: &RoleAssignment,
    factors: &PricingFactors,
    role: Option<&RoleDefinition>,
) -> RowPricing {
    RowPricer::default().price(assignment, factors, role)
}
