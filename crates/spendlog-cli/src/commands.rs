//! Subcommands and their dispatch

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

use spendlog_analytics::{ChartQuery, ExpenseService, ListQuery};
use spendlog_db::ExpenseStore;
use spendlog_types::{
    parse_date_bound, DateWindow, ExpenseCategory, ExpenseId, ExpensePatch, NewExpense, OwnerId,
};

use crate::config::QueryDefaults;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every expense category
    Categories,

    /// Record a new expense
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: Option<String>,
        /// When the money was spent (RFC 3339 or YYYY-MM-DD); defaults to now
        #[arg(long)]
        date: Option<String>,
    },

    /// Show one expense
    Show { id: String },

    /// Change some fields of an expense
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete { id: String },

    /// List expenses, newest first
    List {
        #[arg(long)]
        page: Option<i64>,
        #[arg(long)]
        page_size: Option<i64>,
        #[arg(long)]
        category: Option<String>,
        #[command(flatten)]
        window: WindowArgs,
        /// Case-insensitive match on title or description
        #[arg(long)]
        search: Option<String>,
    },

    /// Spending per category, largest first
    ByCategory(WindowArgs),

    /// Total spending with a per-category breakdown
    Summary(WindowArgs),

    /// Statistics for one calendar month
    Monthly { year: i32, month: u32 },

    /// Spending over time (day, week, month or year buckets)
    Timeseries {
        #[arg(long)]
        period: Option<String>,
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Share of spending per category
    CategoryChart(WindowArgs),
}

/// Optional inclusive date bounds
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Inclusive lower bound (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// Inclusive upper bound (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
}

impl WindowArgs {
    pub fn to_window(&self) -> anyhow::Result<DateWindow> {
        let start = self.start.as_deref().map(parse_date_bound).transpose()?;
        let end = self.end.as_deref().map(parse_date_bound).transpose()?;
        Ok(DateWindow::new(start, end)?)
    }
}

fn parse_category(raw: Option<&str>) -> anyhow::Result<Option<ExpenseCategory>> {
    Ok(raw.map(str::parse::<ExpenseCategory>).transpose()?)
}

fn parse_id(raw: &str) -> anyhow::Result<ExpenseId> {
    ExpenseId::parse(raw).map_err(|e| anyhow::anyhow!("Invalid expense id {}: {}", raw, e))
}

/// Run a command that does not need a store; `None` for every other command
pub fn run_offline(command: &Command) -> anyhow::Result<Option<String>> {
    match command {
        Command::Categories => Ok(Some(to_json(&spendlog_analytics::CategoryList::all())?)),
        _ => Ok(None),
    }
}

/// Run a store-backed command for `owner` and render its result as JSON
pub async fn run<S: ExpenseStore>(
    service: &ExpenseService<S>,
    owner: OwnerId,
    command: Command,
    defaults: &QueryDefaults,
) -> anyhow::Result<String> {
    match command {
        Command::Categories => to_json(&service.categories()),

        Command::Add { title, amount, category, description, date } => {
            let new = NewExpense {
                title,
                amount,
                category: category.parse()?,
                description,
                expense_date: date.as_deref().map(parse_date_bound).transpose()?,
            };
            to_json(&service.create(owner, new).await?)
        }

        Command::Show { id } => to_json(&service.get(owner, parse_id(&id)?).await?),

        Command::Update { id, title, amount, category, description, clear_description, date } => {
            let description = if clear_description { Some(None) } else { description.map(Some) };
            let patch = ExpensePatch {
                title,
                amount,
                category: parse_category(category.as_deref())?,
                description,
                expense_date: date.as_deref().map(parse_date_bound).transpose()?,
            };
            to_json(&service.update(owner, parse_id(&id)?, patch).await?)
        }

        Command::Delete { id } => {
            let id = parse_id(&id)?;
            service.delete(owner, id).await?;
            to_json(&serde_json::json!({ "deleted": id }))
        }

        Command::List { page, page_size, category, window, search } => {
            let window = window.to_window()?;
            let query = ListQuery {
                page: page.unwrap_or(1),
                page_size: page_size.unwrap_or(defaults.page_size),
                category: parse_category(category.as_deref())?,
                start: window.start,
                end: window.end,
                search,
            };
            to_json(&service.list(owner, &query).await?)
        }

        Command::ByCategory(window) => {
            to_json(&service.category_spending(owner, window.to_window()?).await?)
        }

        Command::Summary(window) => to_json(&service.summary(owner, window.to_window()?).await?),

        Command::Monthly { year, month } => {
            to_json(&service.monthly_statistics(owner, year, month).await?)
        }

        Command::Timeseries { period, limit } => {
            let limit = limit.unwrap_or(defaults.chart_limit);
            let query = ChartQuery::parse(period.as_deref(), Some(limit))?;
            to_json(&service.time_series(owner, query).await?)
        }

        Command::CategoryChart(window) => {
            to_json(&service.category_chart(owner, window.to_window()?).await?)
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
