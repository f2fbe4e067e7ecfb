use crate::milestone::Milestone;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneAllocation {
    pub milestone_id: u32,
    pub name: String,
    pub description: String,
    pub percent: f64,
    pub amount: i64,
}

/// Rounds to the nearest whole currency unit, ties to even.
pub fn round_currency(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Splits the rounded `final_amount` across `milestones` in declared order.
///
/// Every entry but the last gets its own rounded share; the last entry takes whatever
/// remains so the amounts always add up to the rounded total, whatever the per-entry
/// rounding did.
pub fn allocate(milestones: &[Milestone], final_amount: f64) -> Vec<MilestoneAllocation> {
    let rounded_total = round_currency(final_amount);
    let last_index = milestones.len().saturating_sub(1);
    let mut running_total: i64 = 0;

    milestones
        .iter()
        .enumerate()
        .map(|(idx, milestone)| {
            let amount = if idx < last_index {
                let share = round_currency(rounded_total as f64 * milestone.percent / 100.0);
                running_total += share;
                share
            } else {
                rounded_total - running_total
            };
            MilestoneAllocation {
                milestone_id: milestone.id,
                name: milestone.name.clone(),
                description: milestone.description.clone(),
                percent: milestone.percent,
                amount,
            }
        })
        .collect()
}
