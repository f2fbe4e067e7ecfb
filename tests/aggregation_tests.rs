use quote_tool::{
    ClientType, PricingFactors, RoleAssignment, RowPricer, RowPricing, aggregate,
};

fn priced_rows(rows: &[RoleAssignment]) -> Vec<RowPricing> {
    let factors = PricingFactors {
        overhead_factor: 1.4,
        margin_percent: 30,
        client_type: ClientType::Domestic,
        discount_percent: 0,
    };
    RowPricer::default().price_all(rows, &factors)
}

#[test]
fn discount_is_taken_from_margin_total() {
    let rows = priced_rows(&[RoleAssignment::with_role(1, "Data Engineer", 2, 100)]);
    let totals = aggregate(&rows, 10);

    assert!((totals.total_margin_amount - 230_769.23).abs() < 0.01);
    assert_eq!(totals.discount_amount.round(), 23_077.0);
    assert_eq!(totals.final_amount_after_discount.round(), 207_692.0);
    assert_eq!(totals.discount_percent, 10);
}

#[test]
fn totals_sum_every_row() {
    let rows = priced_rows(&[
        RoleAssignment::with_role(1, "Data Engineer", 2, 100),
        RoleAssignment::with_role(2, "Project Manager", 1, 50),
        RoleAssignment::new(3),
    ]);
    let totals = aggregate(&rows, 0);

    let internal: f64 = rows.iter().map(|r| r.internal_cost).sum();
    let margin: f64 = rows.iter().map(|r| r.margin_amount).sum();
    assert_eq!(totals.total_internal_cost, internal);
    assert_eq!(totals.total_margin_amount, margin);
    assert_eq!(totals.total_project_hours, 250);
    assert_eq!(totals.total_resource_count, 3);
    assert_eq!(totals.selected_row_count, 2);
    assert_eq!(totals.final_amount_after_discount, totals.total_margin_amount);
}

#[test]
fn project_days_round_up_to_whole_days() {
    let rows = priced_rows(&[RoleAssignment::with_role(1, "Data Engineer", 1, 17)]);
    let totals = aggregate(&rows, 0);
    assert_eq!(totals.total_project_hours, 17);
    assert_eq!(totals.total_project_days, 3);

    let rows = priced_rows(&[RoleAssignment::with_role(1, "Data Engineer", 2, 8)]);
    assert_eq!(aggregate(&rows, 0).total_project_days, 2);
}

#[test]
fn no_selected_rows_yield_zero_totals() {
    let mut unselected = RoleAssignment::new(1);
    unselected.count = 4;
    unselected.hours = 10;
    let rows = priced_rows(&[unselected]);
    let totals = aggregate(&rows, 25);

    assert!(!totals.has_selected_role());
    assert_eq!(totals.total_project_hours, 0);
    assert_eq!(totals.total_resource_count, 0);
    assert_eq!(totals.total_project_days, 0);
    assert_eq!(totals.total_margin_amount, 0.0);
    assert_eq!(totals.discount_amount, 0.0);
    assert_eq!(totals.final_amount_after_discount, 0.0);
}

#[test]
fn full_discount_leaves_nothing_to_pay() {
    let rows = priced_rows(&[RoleAssignment::with_role(1, "Frontend Developer", 1, 40)]);
    let totals = aggregate(&rows, 100);
    assert!((totals.discount_amount - totals.total_margin_amount).abs() < 1e-6);
    assert!(totals.final_amount_after_discount.abs() < 1e-6);
}
