use chrono::NaiveDate;
use thiserror::Error;

use crate::models::NewTransaction;

/// Date format the finance backend stores
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionFormError {
    #[error("Amount must be a number, got {0:?}")]
    InvalidAmount(String),

    #[error("Amount must not be negative; use the income flag instead")]
    NegativeAmount,

    #[error("Description is required")]
    MissingDescription,

    #[error("Date must be YYYY-MM-DD, got {0:?}")]
    InvalidDate(String),
}

/// Form fields, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    Amount,
    Description,
    IsIncome,
    Date,
}

impl TransactionField {
    pub fn next(&self) -> Self {
        match self {
            TransactionField::Amount => TransactionField::Description,
            TransactionField::Description => TransactionField::IsIncome,
            TransactionField::IsIncome => TransactionField::Date,
            TransactionField::Date => TransactionField::Amount,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            TransactionField::Amount => TransactionField::Date,
            TransactionField::Description => TransactionField::Amount,
            TransactionField::IsIncome => TransactionField::Description,
            TransactionField::Date => TransactionField::IsIncome,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionField::Amount => "Amount",
            TransactionField::Description => "Description",
            TransactionField::IsIncome => "Income?",
            TransactionField::Date => "Date",
        }
    }
}

/// Raw text of the new-transaction form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionForm {
    pub amount: String,
    pub description: String,
    pub is_income: bool,
    pub date: String,
}

impl TransactionForm {
    /// Replace a text field. The checkbox field ignores text; use
    /// [`toggle_income`](Self::toggle_income).
    pub fn set_text(&mut self, field: TransactionField, value: impl Into<String>) {
        let value = value.into();
        match field {
            TransactionField::Amount => self.amount = value,
            TransactionField::Description => self.description = value,
            TransactionField::Date => self.date = value,
            TransactionField::IsIncome => {}
        }
    }

    /// Mutable access to a text field for character-wise editing
    pub fn text_mut(&mut self, field: TransactionField) -> Option<&mut String> {
        match field {
            TransactionField::Amount => Some(&mut self.amount),
            TransactionField::Description => Some(&mut self.description),
            TransactionField::Date => Some(&mut self.date),
            TransactionField::IsIncome => None,
        }
    }

    pub fn toggle_income(&mut self) {
        self.is_income = !self.is_income;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate and convert into a request body
    pub fn to_new_transaction(&self) -> Result<NewTransaction, TransactionFormError> {
        let amount_raw = self.amount.trim();
        let amount: f64 = amount_raw
            .parse()
            .ok()
            .filter(|a: &f64| a.is_finite())
            .ok_or_else(|| TransactionFormError::InvalidAmount(amount_raw.to_string()))?;
        if amount < 0.0 {
            return Err(TransactionFormError::NegativeAmount);
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(TransactionFormError::MissingDescription);
        }

        let date = self.date.trim();
        NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| TransactionFormError::InvalidDate(date.to_string()))?;

        Ok(NewTransaction {
            amount,
            description: description.to_string(),
            is_income: self.is_income,
            date: date.to_string(),
        })
    }
}
