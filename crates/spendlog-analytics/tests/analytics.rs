//! End-to-end analytics over the in-memory store

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use spendlog_analytics::{ChartQuery, ExpenseService, ListQuery};
use spendlog_db::InMemoryExpenseStore;
use spendlog_types::{
    parse_date_bound, DateWindow, Expense, ExpenseCategory, NewExpense, OwnerId, PeriodType,
};

fn spend(owner: OwnerId, category: ExpenseCategory, amount: Decimal, date: &str) -> Expense {
    let at = parse_date_bound(date).unwrap();
    Expense::from_new(
        owner,
        NewExpense {
            title: format!("{} on {}", category, date),
            amount,
            category,
            description: None,
            expense_date: Some(at),
        },
        at,
    )
}

fn window(start: &str, end: &str) -> DateWindow {
    DateWindow::new(
        Some(parse_date_bound(start).unwrap()),
        Some(parse_date_bound(end).unwrap()),
    )
    .unwrap()
}

/// Two owners; `alice` has a spread of expenses across three months.
fn seeded() -> (ExpenseService<InMemoryExpenseStore>, OwnerId, OwnerId) {
    let alice = OwnerId::new();
    let bob = OwnerId::new();
    let expenses = vec![
        spend(alice, ExpenseCategory::Food, dec!(10.00), "2025-01-05"),
        spend(alice, ExpenseCategory::Food, dec!(5.00), "2025-01-18"),
        spend(alice, ExpenseCategory::Transport, dec!(15.00), "2025-01-20"),
        spend(alice, ExpenseCategory::Rent, dec!(900.00), "2025-02-01"),
        spend(alice, ExpenseCategory::Groceries, dec!(42.37), "2025-02-14"),
        spend(alice, ExpenseCategory::Entertainment, dec!(19.99), "2025-03-09"),
        spend(bob, ExpenseCategory::Travel, dec!(1200.00), "2025-01-10"),
    ];
    (ExpenseService::new(InMemoryExpenseStore::with_expenses(expenses)), alice, bob)
}

#[tokio::test]
async fn category_totals_add_up_to_summary_total() {
    let (svc, alice, _) = seeded();
    let windows = [
        DateWindow::unbounded(),
        window("2025-01-01", "2025-01-31"),
        window("2025-02-01", "2025-03-31"),
    ];
    for w in windows {
        let summary = svc.summary(alice, w).await.unwrap();
        let by_category = svc.category_spending(alice, w).await.unwrap();
        let sum: Decimal = by_category.iter().map(|c| c.total_amount).sum();
        assert_eq!(sum, summary.total_spending);
        assert_eq!(by_category, summary.category_breakdown);
    }
}

#[tokio::test]
async fn january_breakdown_ties_follow_category_order() {
    let (svc, alice, _) = seeded();
    let summary = svc.summary(alice, window("2025-01-01", "2025-01-31")).await.unwrap();

    assert_eq!(summary.total_spending, dec!(30.00));
    assert_eq!(summary.expense_count, 3);
    assert_eq!(summary.category_breakdown.len(), 2);
    assert_eq!(summary.category_breakdown[0].category, ExpenseCategory::Food);
    assert_eq!(summary.category_breakdown[0].total_amount, dec!(15.00));
    assert_eq!(summary.category_breakdown[0].expense_count, 2);
    assert_eq!(summary.category_breakdown[1].category, ExpenseCategory::Transport);
    assert!(summary.start_date.is_some());
}

#[tokio::test]
async fn other_owners_expenses_never_leak() {
    let (svc, alice, bob) = seeded();

    let alice_summary = svc.summary(alice, DateWindow::unbounded()).await.unwrap();
    assert!(alice_summary
        .category_breakdown
        .iter()
        .all(|c| c.category != ExpenseCategory::Travel));

    let bob_list = svc.list(bob, &ListQuery::default()).await.unwrap();
    assert_eq!(bob_list.total, 1);
    assert!(bob_list.expenses.iter().all(|e| e.owner == bob));

    let stranger = svc.summary(OwnerId::new(), DateWindow::unbounded()).await.unwrap();
    assert_eq!(stranger.expense_count, 0);
    assert_eq!(stranger.total_spending, Decimal::ZERO);
    assert!(stranger.category_breakdown.is_empty());
}

#[tokio::test]
async fn monthly_statistics_for_busy_and_empty_months() {
    let (svc, alice, _) = seeded();

    let feb = svc.monthly_statistics(alice, 2025, 2).await.unwrap();
    assert_eq!(feb.period, "2025-02");
    assert_eq!(feb.total_spending, dec!(942.37));
    assert_eq!(feb.expense_count, 2);
    assert_eq!(feb.average_expense, dec!(471.18));
    assert_eq!(feb.top_category, Some(ExpenseCategory::Rent));
    assert_eq!(feb.top_category_amount, Some(dec!(900.00)));

    let june = svc.monthly_statistics(alice, 2025, 6).await.unwrap();
    assert_eq!(june.total_spending, Decimal::ZERO);
    assert_eq!(june.average_expense, Decimal::ZERO);
    assert_eq!(june.expense_count, 0);
    assert_eq!(june.top_category, None);
    assert_eq!(june.top_category_amount, None);

    assert!(svc.monthly_statistics(alice, 2025, 13).await.unwrap_err().is_validation());
    assert!(svc.monthly_statistics(alice, 1999, 1).await.unwrap_err().is_validation());
}

#[tokio::test]
async fn time_series_is_ascending_and_capped() {
    let (svc, alice, _) = seeded();

    let months = svc
        .time_series(alice, ChartQuery { period_type: PeriodType::Month, limit: 2 })
        .await
        .unwrap();
    let labels: Vec<&str> = months.data_points.iter().map(|p| p.period.as_str()).collect();
    assert_eq!(labels, vec!["2025-02", "2025-03"]);
    assert_eq!(months.total_periods, 2);
    assert_eq!(months.total_spending, dec!(962.36));
    assert_eq!(months.average_spending, dec!(481.18));

    let days = svc
        .time_series(alice, ChartQuery { period_type: PeriodType::Day, limit: 100 })
        .await
        .unwrap();
    assert_eq!(days.data_points.len(), 6);
    assert!(days.data_points.windows(2).all(|w| w[0].period < w[1].period));
    assert!(days.data_points.iter().all(|p| p.expense_count > 0));

    let years = svc
        .time_series(alice, ChartQuery { period_type: PeriodType::Year, limit: 12 })
        .await
        .unwrap();
    assert_eq!(years.data_points.len(), 1);
    assert_eq!(years.data_points[0].period, "2025");
    assert_eq!(years.data_points[0].expense_count, 6);
}

#[tokio::test]
async fn weekly_buckets_use_iso_weeks() {
    let (svc, alice, _) = seeded();
    let weeks = svc
        .time_series(alice, ChartQuery { period_type: PeriodType::Week, limit: 3 })
        .await
        .unwrap();
    let labels: Vec<&str> = weeks.data_points.iter().map(|p| p.period.as_str()).collect();
    // 2025-02-01 is a Saturday in W05, 2025-02-14 a Friday in W07, 2025-03-09 a Sunday in W10
    assert_eq!(labels, vec!["2025-W05", "2025-W07", "2025-W10"]);
}

#[tokio::test]
async fn category_chart_shares() {
    let (svc, alice, _) = seeded();

    let chart = svc.category_chart(alice, DateWindow::unbounded()).await.unwrap();
    let share_sum: Decimal = chart.categories.iter().map(|c| c.percentage).sum();
    assert_eq!(share_sum, dec!(100.00));
    assert_eq!(chart.total_expenses, 6);
    assert_eq!(chart.total_spending, dec!(992.36));
    assert_eq!(chart.categories[0].category, ExpenseCategory::Rent);

    let empty = svc.category_chart(alice, window("2024-01-01", "2024-12-31")).await.unwrap();
    assert!(empty.categories.is_empty());
    assert_eq!(empty.total_spending, Decimal::ZERO);
}

#[tokio::test]
async fn listing_filters_and_pagination() {
    let (svc, alice, _) = seeded();

    let page = svc
        .list(alice, &ListQuery { page: 1, page_size: 4, ..Default::default() })
        .await
        .unwrap();
    assert_eq!(page.total, 6);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.expenses.len(), 4);
    assert!(page.expenses.windows(2).all(|w| w[0].expense_date >= w[1].expense_date));

    let food = svc
        .list(alice, &ListQuery { category: Some(ExpenseCategory::Food), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(food.total, 2);

    let searched = svc
        .list(alice, &ListQuery { search: Some("rent".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(searched.total, 1);

    let nothing = svc
        .list(alice, &ListQuery { search: Some("yacht".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(nothing.total, 0);
    assert_eq!(nothing.total_pages, 0);

    assert!(svc
        .list(alice, &ListQuery { page_size: 101, ..Default::default() })
        .await
        .unwrap_err()
        .is_validation());
}

#[tokio::test]
async fn crud_lifecycle() {
    let svc = ExpenseService::new(InMemoryExpenseStore::new());
    let owner = OwnerId::new();

    let created = svc
        .create(
            owner,
            NewExpense {
                title: "Gym membership".to_string(),
                amount: dec!(35.00),
                category: ExpenseCategory::Healthcare,
                description: Some("Monthly".to_string()),
                expense_date: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.expense_date, created.created_at);

    let fetched = svc.get(owner, created.id).await.unwrap();
    assert_eq!(fetched, created);

    svc.delete(owner, created.id).await.unwrap();
    assert!(svc.get(owner, created.id).await.unwrap_err().is_not_found());
    assert!(svc.delete(owner, created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn repeated_calls_are_deterministic() {
    let (svc, alice, _) = seeded();
    let first = svc.category_spending(alice, DateWindow::unbounded()).await.unwrap();
    for _ in 0..5 {
        assert_eq!(svc.category_spending(alice, DateWindow::unbounded()).await.unwrap(), first);
    }
}
