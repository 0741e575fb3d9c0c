//! Expense records and categories

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ExpenseId, OwnerId, ValidationError, ValidationResult};

/// Maximum title length in characters
pub const TITLE_MAX_LEN: usize = 100;

/// Maximum description length in characters
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// Largest amount representable as NUMERIC(10,2)
pub const AMOUNT_MAX: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

// ============================================================================
// Category
// ============================================================================

/// Closed set of spending categories.
///
/// Declaration order is significant: it is the tie-break order whenever two
/// categories have equal totals. Deserialization accepts any letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Rent,
    Groceries,
    Utilities,
    Entertainment,
    Healthcare,
    Education,
    Shopping,
    Savings,
    Foodstuff,
    Travel,
    Others,
}

impl ExpenseCategory {
    /// All categories in declaration order
    pub const ALL: [ExpenseCategory; 13] = [
        Self::Food,
        Self::Transport,
        Self::Rent,
        Self::Groceries,
        Self::Utilities,
        Self::Entertainment,
        Self::Healthcare,
        Self::Education,
        Self::Shopping,
        Self::Savings,
        Self::Foodstuff,
        Self::Travel,
        Self::Others,
    ];

    /// Canonical name, as stored and serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Rent => "Rent",
            Self::Groceries => "Groceries",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Shopping => "Shopping",
            Self::Savings => "Savings",
            Self::Foodstuff => "Foodstuff",
            Self::Travel => "Travel",
            Self::Others => "Others",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for ExpenseCategory {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ============================================================================
// Expense
// ============================================================================

/// A single recorded spend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub owner: OwnerId,
    pub title: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    pub expense_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Materialize a validated payload into a record owned by `owner`.
    ///
    /// `expense_date` falls back to `now` when the payload leaves it unset.
    pub fn from_new(owner: OwnerId, new: NewExpense, now: DateTime<Utc>) -> Self {
        Self {
            id: ExpenseId::new(),
            owner,
            title: new.title,
            amount: new.amount,
            category: new.category,
            description: new.description,
            expense_date: new.expense_date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place. Owner and id are never touched.
    pub fn apply(&mut self, patch: ExpensePatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(expense_date) = patch.expense_date {
            self.expense_date = expense_date;
        }
        self.updated_at = now;
    }
}

/// Payload for recording a new expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub title: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expense_date: Option<DateTime<Utc>>,
}

impl NewExpense {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_title(&self.title)?;
        validate_amount(self.amount)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

/// Partial update; only the fields that are `Some` change.
///
/// `description` distinguishes an absent field (`None`, keep) from an explicit
/// `null` (`Some(None)`, clear).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpensePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub expense_date: Option<DateTime<Utc>>,
}

/// Maps a present field, `null` included, to `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ExpensePatch {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if let Some(Some(description)) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> ValidationResult<()> {
    let len = title.chars().count();
    if len == 0 || len > TITLE_MAX_LEN {
        return Err(ValidationError::TitleLength { max: TITLE_MAX_LEN, actual: len });
    }
    Ok(())
}

fn validate_description(description: &str) -> ValidationResult<()> {
    let len = description.chars().count();
    if len > DESCRIPTION_MAX_LEN {
        return Err(ValidationError::DescriptionLength {
            max: DESCRIPTION_MAX_LEN,
            actual: len,
        });
    }
    Ok(())
}

fn validate_amount(amount: Decimal) -> ValidationResult<()> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount.to_string()));
    }
    if amount.normalize().scale() > 2 {
        return Err(ValidationError::AmountPrecision(amount.to_string()));
    }
    if amount > AMOUNT_MAX {
        return Err(ValidationError::AmountTooLarge(amount.to_string()));
    }
    Ok(())
}
