//! Aggregation engine
//!
//! Pure functions turning grouped rows into reports. Nothing here touches a
//! store, so the same inputs always give the same output.
//!
//! # Ordering
//!
//! Category rows are ranked by total descending. Equal totals fall back to
//! the declaration order of [`ExpenseCategory`], so `Food` precedes
//! `Transport` when both spent the same.
//!
//! # Precision
//!
//! Sums, means and percentages are computed on unrounded decimals and rounded
//! to two places (banker's rounding) only when a report value is produced.

use rust_decimal::{Decimal, RoundingStrategy};

use spendlog_types::{
    fold_by_category, fold_totals, CategoryTotal, DateWindow, Expense, PeriodTotal, PeriodType,
    SpendTotals,
};

use crate::reports::{
    CategoryChart, CategoryChartData, CategorySpending, ChartDataPoint, ChartVisualization,
    MonthlyStatistics, SpendingSummary,
};

/// Round to cents with a fixed scale of two, so zero renders as `0.00`
pub fn money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    rounded
}

/// Sort category rows by total descending, ties in category order
pub fn rank_categories(mut rows: Vec<CategoryTotal>) -> Vec<CategoryTotal> {
    rows.retain(|r| r.count > 0);
    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    rows
}

/// Ranked, rounded category spending
pub fn category_spending(rows: Vec<CategoryTotal>) -> Vec<CategorySpending> {
    rank_categories(rows)
        .into_iter()
        .map(|r| CategorySpending {
            category: r.category,
            total_amount: money(r.total),
            expense_count: r.count,
        })
        .collect()
}

pub fn summarize(
    totals: SpendTotals,
    rows: Vec<CategoryTotal>,
    window: &DateWindow,
) -> SpendingSummary {
    SpendingSummary {
        total_spending: money(totals.total),
        expense_count: totals.count,
        category_breakdown: category_spending(rows),
        start_date: window.start,
        end_date: window.end,
    }
}

/// Statistics for `year-month` from that month's totals and category rows.
///
/// Callers validate the year and month before fetching the rows.
pub fn monthly_statistics(
    year: i32,
    month: u32,
    totals: SpendTotals,
    rows: Vec<CategoryTotal>,
) -> MonthlyStatistics {
    let average = if totals.count > 0 {
        totals.total / Decimal::from(totals.count)
    } else {
        Decimal::ZERO
    };
    let top = rank_categories(rows).into_iter().next();

    MonthlyStatistics {
        period: format!("{}-{:02}", year, month),
        total_spending: money(totals.total),
        average_expense: money(average),
        expense_count: totals.count,
        top_category: top.map(|t| t.category),
        top_category_amount: top.map(|t| money(t.total)),
    }
}

/// The `limit` most recent non-empty buckets, returned oldest first
pub fn time_series(
    period: PeriodType,
    mut buckets: Vec<PeriodTotal>,
    limit: usize,
) -> Vec<ChartDataPoint> {
    buckets.retain(|b| b.count > 0);
    buckets.sort_by(|a, b| b.bucket.cmp(&a.bucket));
    buckets.truncate(limit);
    buckets.reverse();

    buckets
        .into_iter()
        .map(|b| ChartDataPoint {
            period: period.label(b.bucket),
            total_amount: money(b.total),
            expense_count: b.count,
        })
        .collect()
}

/// Time series plus its overall total and per-period mean
pub fn chart_visualization(
    period: PeriodType,
    buckets: Vec<PeriodTotal>,
    limit: usize,
) -> ChartVisualization {
    let mut selected = buckets;
    selected.retain(|b| b.count > 0);
    selected.sort_by(|a, b| b.bucket.cmp(&a.bucket));
    selected.truncate(limit);

    let total: Decimal = selected.iter().map(|b| b.total).sum();
    let average = if selected.is_empty() {
        Decimal::ZERO
    } else {
        total / Decimal::from(selected.len())
    };

    let data_points = time_series(period, selected, limit);
    ChartVisualization {
        period_type: period,
        total_periods: data_points.len(),
        data_points,
        total_spending: money(total),
        average_spending: money(average),
    }
}

/// Category shares of the grand total.
///
/// Percentages are rounded by largest remainder so that, whenever anything
/// was spent, the rounded shares add up to exactly 100.00. Each share is
/// within 0.01 of `total / grand_total * 100`. With nothing spent every share
/// is zero.
pub fn category_chart(rows: Vec<CategoryTotal>) -> CategoryChart {
    let ranked = rank_categories(rows);
    let grand_total: Decimal = ranked.iter().map(|r| r.total).sum();
    let total_expenses: i64 = ranked.iter().map(|r| r.count).sum();
    let shares = allocate_percentages(&ranked, grand_total);

    let categories = ranked
        .into_iter()
        .zip(shares)
        .map(|(r, percentage)| CategoryChartData {
            category: r.category,
            total_amount: money(r.total),
            expense_count: r.count,
            percentage,
        })
        .collect();

    CategoryChart {
        categories,
        total_spending: money(grand_total),
        total_expenses,
    }
}

fn allocate_percentages(rows: &[CategoryTotal], grand_total: Decimal) -> Vec<Decimal> {
    if grand_total <= Decimal::ZERO {
        return vec![money(Decimal::ZERO); rows.len()];
    }

    let step = Decimal::new(1, 2);
    let raw: Vec<Decimal> = rows
        .iter()
        .map(|r| r.total * Decimal::ONE_HUNDRED / grand_total)
        .collect();
    let mut shares: Vec<Decimal> = raw
        .iter()
        .map(|p| p.round_dp_with_strategy(2, RoundingStrategy::ToZero))
        .collect();

    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| (raw[b] - shares[b]).cmp(&(raw[a] - shares[a])).then(a.cmp(&b)));

    let mut remaining = Decimal::ONE_HUNDRED - shares.iter().copied().sum::<Decimal>();
    for i in order {
        if remaining < step {
            break;
        }
        shares[i] += step;
        remaining -= step;
    }

    shares.into_iter().map(money).collect()
}

// ============================================================================
// Record-level entry points
// ============================================================================

/// Ranked category spending computed directly from records
pub fn group_expenses_by_category(
    expenses: &[Expense],
    window: &DateWindow,
) -> Vec<CategorySpending> {
    category_spending(fold_by_category(expenses, window))
}

/// Summary computed directly from records
pub fn summarize_expenses(expenses: &[Expense], window: &DateWindow) -> SpendingSummary {
    summarize(fold_totals(expenses, window), fold_by_category(expenses, window), window)
}

/// Category chart computed directly from records
pub fn chart_expenses_by_category(expenses: &[Expense], window: &DateWindow) -> CategoryChart {
    category_chart(fold_by_category(expenses, window))
}
