//! Client-side checks for the forms that create or edit records.
//!
//! A form that fails validation is never sent: the error is shown next to the
//! offending input instead. Each form converts into its request body only
//! after [`Validate::validate`] passes.

use std::borrow::Cow;

use chrono::NaiveDate;
use common::{
    AlertPeriod, BudgetPeriod, CreateBudgetRequest, CreateCategoryRequest, CreateMoneyNoteRequest,
    RecordStatus, TransactionType, UpdateAlertRequest, UpdateBudgetRequest, UpdateCategoryRequest,
    UpdateMoneyNoteRequest,
};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::Result;

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("This field is required"));
        return Err(error);
    }
    Ok(())
}

/// Flattens validation errors into one sorted, `; `-separated line.
pub fn summarize(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .map(|error| {
            error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| error.code.to_string())
        })
        .collect();
    messages.sort();
    messages.dedup();
    messages.join("; ")
}

#[derive(Debug, Clone, Validate)]
pub struct NewAlertForm {
    #[validate(required(message = "Please choose a category"))]
    pub category_id: Option<i64>,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(range(min = 1, message = "The limit must be greater than zero"))]
    pub amount: i64,
    pub period: AlertPeriod,
}

#[derive(Debug, Clone, Validate)]
pub struct AlertEditForm {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(range(min = 1, message = "The limit must be greater than zero"))]
    pub amount: i64,
}

impl AlertEditForm {
    pub fn into_request(self) -> Result<UpdateAlertRequest> {
        self.validate()?;
        Ok(UpdateAlertRequest {
            title: self.title.trim().to_string(),
            amount: self.amount,
            status: RecordStatus::Active,
        })
    }
}

#[derive(Debug, Clone, Validate)]
pub struct CategoryForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = 20, message = "Category name must be at most 20 characters")
    )]
    pub name: String,
    pub kind: TransactionType,
}

impl CategoryForm {
    /// Expense category, the only kind the category screen creates.
    pub fn expense(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TransactionType::Expense,
        }
    }

    fn checked_name(&self) -> Result<String> {
        let trimmed = Self {
            name: self.name.trim().to_string(),
            kind: self.kind,
        };
        trimmed.validate()?;
        Ok(trimmed.name)
    }

    pub fn into_create_request(self) -> Result<CreateCategoryRequest> {
        Ok(CreateCategoryRequest {
            name: self.checked_name()?,
            kind: self.kind,
        })
    }

    pub fn into_update_request(self) -> Result<UpdateCategoryRequest> {
        Ok(UpdateCategoryRequest {
            name: self.checked_name()?,
            kind: self.kind,
            status: None,
        })
    }
}

#[derive(Debug, Clone, Validate)]
pub struct MoneyNoteForm {
    pub kind: TransactionType,
    #[validate(custom(function = "not_blank"))]
    pub note: String,
    #[validate(range(min = 1, message = "Amount must be greater than zero"))]
    pub amount: i64,
    #[validate(required(message = "Please choose a category"))]
    pub category_id: Option<i64>,
}

impl MoneyNoteForm {
    pub fn into_create_request(self) -> Result<CreateMoneyNoteRequest> {
        self.validate()?;
        Ok(CreateMoneyNoteRequest {
            kind: self.kind,
            note: self.note.trim().to_string(),
            amount: self.amount,
            category_id: self.category_id.unwrap_or_default(),
        })
    }

    pub fn into_update_request(self) -> Result<UpdateMoneyNoteRequest> {
        self.validate()?;
        Ok(UpdateMoneyNoteRequest {
            note: self.note.trim().to_string(),
            amount: self.amount,
            category_id: self.category_id.unwrap_or_default(),
            status: None,
        })
    }
}

fn end_not_before_start(form: &BudgetForm) -> std::result::Result<(), ValidationError> {
    if form.end_date < form.start_date {
        let mut error = ValidationError::new("date_order");
        error.message = Some(Cow::Borrowed("End date must not be before start date"));
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "end_not_before_start"))]
pub struct BudgetForm {
    #[validate(required(message = "Please choose a category"))]
    pub category_id: Option<i64>,
    #[validate(range(min = 1, message = "The budget must be greater than zero"))]
    pub amount: i64,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl BudgetForm {
    fn iso(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    pub fn into_create_request(self) -> Result<CreateBudgetRequest> {
        self.validate()?;
        Ok(CreateBudgetRequest {
            category_id: self.category_id.unwrap_or_default(),
            amount: self.amount,
            period_type: self.period,
            start_date: Self::iso(self.start_date),
            end_date: Self::iso(self.end_date),
        })
    }

    pub fn into_update_request(self, status: RecordStatus) -> Result<UpdateBudgetRequest> {
        self.validate()?;
        Ok(UpdateBudgetRequest {
            category_id: self.category_id.unwrap_or_default(),
            amount: self.amount,
            period_type: self.period,
            start_date: Self::iso(self.start_date),
            end_date: Self::iso(self.end_date),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComputeError;

    #[test]
    fn test_category_name_limit_counts_characters() {
        // 20 multi-byte characters are fine, 21 are not.
        let twenty = "ă".repeat(20);
        assert!(CategoryForm::expense(twenty).into_create_request().is_ok());

        let err = CategoryForm::expense("ă".repeat(21)).into_create_request().unwrap_err();
        assert!(err.to_string().contains("at most 20 characters"));
    }

    #[test]
    fn test_category_name_is_trimmed_and_required() {
        let request = CategoryForm::expense("  Food  ").into_create_request().unwrap();
        assert_eq!(request.name, "Food");
        assert_eq!(request.kind, TransactionType::Expense);

        assert!(matches!(
            CategoryForm::expense("   ").into_update_request(),
            Err(ComputeError::Validation(_))
        ));
    }

    #[test]
    fn test_money_note_form() {
        let form = MoneyNoteForm {
            kind: TransactionType::Expense,
            note: " Lunch ".to_string(),
            amount: 65_000,
            category_id: Some(2),
        };
        let request = form.clone().into_create_request().unwrap();
        assert_eq!(request.note, "Lunch");
        assert_eq!(request.category_id, 2);

        let bad = MoneyNoteForm {
            amount: 0,
            category_id: None,
            ..form
        };
        let err = bad.into_update_request().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Amount must be greater than zero; Please choose a category"
        );
    }

    #[test]
    fn test_alert_edit_form() {
        let request = AlertEditForm {
            title: "Food".to_string(),
            amount: 2_000_000,
        }
        .into_request()
        .unwrap();
        assert_eq!(request.status, RecordStatus::Active);

        let blank = AlertEditForm {
            title: String::new(),
            amount: 10,
        };
        assert!(blank.into_request().is_err());
    }

    #[test]
    fn test_budget_form_dates() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let form = BudgetForm {
            category_id: Some(1),
            amount: 5_000_000,
            period: BudgetPeriod::Monthly,
            start_date: start,
            end_date: end,
        };

        let request = form.clone().into_create_request().unwrap();
        assert_eq!(request.start_date, "2025-03-01");
        assert_eq!(request.end_date, "2025-03-31");

        let reversed = BudgetForm {
            start_date: end,
            end_date: start,
            ..form
        };
        let err = reversed.into_update_request(RecordStatus::Active).unwrap_err();
        assert!(err.to_string().contains("End date must not be before start date"));
    }
}
