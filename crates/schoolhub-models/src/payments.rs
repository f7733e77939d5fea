//! Payments against registrations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub registration_id: String,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub receipt_number: Option<String>,
    pub note: Option<String>,
    pub received_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Payment joined with the student it was made for.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct PaymentDetails {
    pub id: Uuid,
    pub registration_id: String,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub receipt_number: Option<String>,
    pub note: Option<String>,
    pub received_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub student_id: Option<String>,
    pub student_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreatePaymentDto {
    #[validate(length(min = 1, message = "registration_id is required"))]
    pub registration_id: String,
    #[validate(range(exclusive_min = 0.0, message = "amount must be greater than 0"))]
    pub amount: f64,
    pub payment_date: NaiveDate,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub receipt_number: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentSearchParams {
    /// Receipt number, registration id, student id or student name
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentListResponse {
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentSearchResponse {
    pub payments: Vec<PaymentDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_defaults_to_cash() {
        let dto: CreatePaymentDto = serde_json::from_str(
            r#"{"registration_id":"INV-001","amount":150000,"payment_date":"2024-06-01"}"#,
        )
        .unwrap();
        assert_eq!(dto.payment_method, PaymentMethod::Cash);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let dto: CreatePaymentDto = serde_json::from_str(
            r#"{"registration_id":"INV-001","amount":0,"payment_date":"2024-06-01","payment_method":"bank_transfer"}"#,
        )
        .unwrap();
        assert_eq!(dto.payment_method, PaymentMethod::BankTransfer);
        assert!(dto.validate().is_err());
    }
}
