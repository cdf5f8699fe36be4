pub mod budget;
pub mod currency;
pub mod dashboard;
pub mod error;
pub mod pagination;
pub mod validation;

pub use budget::{
    AlertNotification, BudgetUsage, Severity, ShownAlerts, SpendMetrics, alerts_span,
    build_create_alert_request, evaluate_alerts,
};
pub use error::{ComputeError, Result};
pub use pagination::{PageItem, PaginationState, Paginator};
