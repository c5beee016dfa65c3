//! Client-side checks run before a form is submitted.
//!
//! Forms carry the raw text a user typed. A form that passes validation turns
//! into the typed request body for the API.

use crate::core::error::ValidationError;
use crate::core::models::{NewBudget, NewCategory, NewTransaction};
use chrono::NaiveDate;

pub const MAX_DESCRIPTION_LEN: usize = 200;
pub const MAX_CATEGORY_LEN: usize = 100;
pub const MAX_AMOUNT: f64 = 999_999.99;
pub const MIN_BUDGET: f64 = 0.01;

#[derive(Debug, Clone, Default)]
pub struct TransactionForm {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
}

#[derive(Debug, Clone, Default)]
pub struct BudgetForm {
    pub category: String,
    pub budget: String,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryForm {
    pub name: String,
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed)
}

fn bounded<'a>(value: &'a str, field: &'static str, max: usize) -> Result<&'a str, ValidationError> {
    let value = required(value, field)?;
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value)
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl TransactionForm {
    pub fn validate(&self) -> Result<NewTransaction, ValidationError> {
        let date = required(&self.date, "date")?;
        let description = bounded(&self.description, "description", MAX_DESCRIPTION_LEN)?;
        let amount = required(&self.amount, "amount")?;
        let category = bounded(&self.category, "category", MAX_CATEGORY_LEN)?;

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date.to_string()))?;
        let amount =
            parse_number(amount).ok_or_else(|| ValidationError::InvalidAmount(amount.to_string()))?;
        if amount == 0.0 {
            return Err(ValidationError::ZeroAmount);
        }
        if amount.abs() > MAX_AMOUNT {
            return Err(ValidationError::OutOfRange {
                field: "amount",
                min: -MAX_AMOUNT,
                max: MAX_AMOUNT,
            });
        }

        Ok(NewTransaction {
            date,
            description: description.to_string(),
            amount,
            category: category.to_string(),
        })
    }
}

impl BudgetForm {
    pub fn validate(&self) -> Result<NewBudget, ValidationError> {
        let category = bounded(&self.category, "category", MAX_CATEGORY_LEN)?;
        let raw = required(&self.budget, "budget")?;
        let budget = parse_number(raw)
            .filter(|b| *b > 0.0)
            .ok_or_else(|| ValidationError::InvalidBudget(raw.to_string()))?;
        if !(MIN_BUDGET..=MAX_AMOUNT).contains(&budget) {
            return Err(ValidationError::OutOfRange {
                field: "budget",
                min: MIN_BUDGET,
                max: MAX_AMOUNT,
            });
        }

        Ok(NewBudget {
            category: category.to_string(),
            budget,
        })
    }
}

impl CategoryForm {
    pub fn validate(&self) -> Result<NewCategory, ValidationError> {
        let name = bounded(&self.name, "name", MAX_CATEGORY_LEN)?;
        Ok(NewCategory {
            name: name.to_string(),
        })
    }
}
