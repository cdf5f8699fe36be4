//! Transport-layer types shared by the HTTP client, the compute layer and the CLI.
//! These structs mirror the backend's request/response payloads field for field,
//! including its integer codes for types, statuses and periods.

pub mod time;

pub use time::{EpochSeconds, TimeError, UtcRange};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    /// Success flag
    pub success: bool,
    /// Response data
    pub data: T,
    /// Optional server message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Raised when the backend sends an integer code this client does not know.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} code: {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: u8,
}

/// Declares an enum carried on the wire as a small integer.
macro_rules! wire_code {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident = $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $($variant = $code),+
        }

        impl $name {
            pub fn code(self) -> u8 {
                self as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = UnknownCode;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(UnknownCode { kind: $kind, code }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.code()
            }
        }
    };
}

wire_code! {
    /// Whether a money note or category is spending or earning.
    TransactionType, "transaction type" {
        Expense = 1,
        Income = 2,
    }
}

wire_code! {
    /// Soft-delete flag shared by every resource. Nothing is physically removed
    /// except through the explicit money-note `DELETE` endpoint.
    RecordStatus, "status" {
        Inactive = 1,
        Active = 2,
    }
}

wire_code! {
    /// Window type of a budget alert.
    AlertPeriod, "alert period" {
        Daily = 1,
        Monthly = 2,
        Yearly = 3,
    }
}

wire_code! {
    /// Period type of a budget.
    BudgetPeriod, "budget period" {
        Daily = 1,
        Weekly = 2,
        Monthly = 3,
        Yearly = 4,
    }
}

impl TransactionType {
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Expense => "Expense",
            TransactionType::Income => "Income",
        }
    }
}

impl AlertPeriod {
    pub fn label(self) -> &'static str {
        match self {
            AlertPeriod::Daily => "daily",
            AlertPeriod::Monthly => "monthly",
            AlertPeriod::Yearly => "yearly",
        }
    }
}

impl BudgetPeriod {
    pub fn label(self) -> &'static str {
        match self {
            BudgetPeriod::Daily => "daily",
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        }
    }
}

// ===================== Money notes =====================

/// Query for `GET /api/v1/money-note`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoneyNoteQuery {
    pub range: UtcRange,
    /// Restrict to one status; `None` returns every note in the window.
    pub status: Option<RecordStatus>,
}

impl MoneyNoteQuery {
    pub fn new(range: UtcRange) -> Self {
        Self { range, status: None }
    }

    pub fn active(range: UtcRange) -> Self {
        Self {
            range,
            status: Some(RecordStatus::Active),
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("start_date", self.range.start.to_string()),
            ("end_date", self.range.end.to_string()),
        ];
        if let Some(status) = self.status {
            params.push(("status", status.code().to_string()));
        }
        params
    }
}

/// A recorded expense or income ("money note").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoneyNoteDto {
    pub id: i64,
    pub note: String,
    /// When the transaction happened.
    #[serde(deserialize_with = "time::flexible_seconds::deserialize")]
    pub date: EpochSeconds,
    /// Positive amount in the smallest currency unit; `kind` gives the sign.
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: i64,
    pub status: RecordStatus,
    #[serde(deserialize_with = "time::flexible_seconds::deserialize")]
    pub created_at: EpochSeconds,
    #[serde(deserialize_with = "time::flexible_seconds::deserialize")]
    pub updated_at: EpochSeconds,
}

impl MoneyNoteDto {
    pub fn is_active_expense(&self) -> bool {
        self.kind == TransactionType::Expense && self.status != RecordStatus::Inactive
    }
}

/// One element of the `POST /api/v1/money-note` body (the body is an array).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateMoneyNoteRequest {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub note: String,
    pub amount: i64,
    pub category_id: i64,
}

/// Body of `PUT /api/v1/money-note/{id}`. Setting `status` to inactive is a soft delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateMoneyNoteRequest {
    pub note: String,
    pub amount: i64,
    pub category_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
}

// ===================== Categories =====================

/// Category response model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub status: RecordStatus,
    #[serde(deserialize_with = "time::flexible_seconds::deserialize")]
    pub created_at: EpochSeconds,
    #[serde(deserialize_with = "time::flexible_seconds::deserialize")]
    pub updated_at: EpochSeconds,
}

/// Request for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateCategoryRequest {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub name: String,
}

/// Request for updating a category. Deactivation is `status = Inactive`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateCategoryRequest {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
}

// ===================== Alerts =====================

/// Budget alert: a spending limit for one category over a window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertDto {
    pub id: i64,
    pub title: String,
    #[serde(deserialize_with = "time::flexible_seconds::deserialize")]
    pub start_date: EpochSeconds,
    #[serde(deserialize_with = "time::flexible_seconds::deserialize")]
    pub end_date: EpochSeconds,
    /// Budget limit in the smallest currency unit.
    pub threshold: i64,
    #[serde(rename = "type")]
    pub period: AlertPeriod,
    pub category_id: i64,
    pub status: RecordStatus,
    #[serde(deserialize_with = "time::flexible_seconds::deserialize")]
    pub created_at: EpochSeconds,
    #[serde(deserialize_with = "time::flexible_seconds::deserialize")]
    pub updated_at: EpochSeconds,
}

impl AlertDto {
    pub fn window(&self) -> UtcRange {
        UtcRange::new(self.start_date, self.end_date)
    }
}

/// Body of `POST /api/v1/alert`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateAlertRequest {
    pub category_id: i64,
    pub title: String,
    /// Threshold amount
    pub amount: i64,
    pub start_date: EpochSeconds,
    pub end_date: EpochSeconds,
    #[serde(rename = "type")]
    pub period: AlertPeriod,
}

/// Body of `POST /api/v1/alert/{id}`; the backend uses POST, not PUT, for this update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateAlertRequest {
    pub title: String,
    /// Threshold amount
    pub amount: i64,
    pub status: RecordStatus,
}

// ===================== Budgets =====================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetDto {
    pub id: i64,
    pub category_id: i64,
    /// Budget limit amount
    pub amount: i64,
    pub period_type: BudgetPeriod,
    #[serde(deserialize_with = "time::flexible_seconds::deserialize")]
    pub start_date: EpochSeconds,
    #[serde(deserialize_with = "time::flexible_seconds::deserialize")]
    pub end_date: EpochSeconds,
    pub status: RecordStatus,
    #[serde(deserialize_with = "time::flexible_seconds::deserialize")]
    pub created_at: EpochSeconds,
    #[serde(deserialize_with = "time::flexible_seconds::deserialize")]
    pub updated_at: EpochSeconds,
}

/// Budget as listed by `GET /api/v1/budget`, with server-computed usage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetWithCategoryDto {
    #[serde(flatten)]
    pub budget: BudgetDto,
    pub category_name: String,
    pub spent_amount: i64,
    pub remaining_amount: i64,
    pub percentage_used: f64,
}

/// Body of `POST /api/v1/budget`. Dates are ISO `YYYY-MM-DD` strings here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateBudgetRequest {
    pub category_id: i64,
    pub amount: i64,
    pub period_type: BudgetPeriod,
    pub start_date: String,
    pub end_date: String,
}

/// Body of `PUT /api/v1/budget/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateBudgetRequest {
    pub category_id: i64,
    pub amount: i64,
    pub period_type: BudgetPeriod,
    pub start_date: String,
    pub end_date: String,
    pub status: RecordStatus,
}

// ===================== Finance AI =====================

/// File attached to an AI chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Multipart form for `POST /api/v3/finance-ai/chat`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinanceChatRequest {
    pub chat: String,
    pub file: Option<ChatAttachment>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
}
