use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::AppError;

use super::model::{CreatePaymentDto, Payment, PaymentDetails};

const SEARCH_LIMIT: i64 = 50;

pub struct PaymentService;

impl PaymentService {
    /// Records a payment and marks its registration as paid in one
    /// transaction.
    #[instrument(skip(db, dto), fields(registration_id = %dto.registration_id))]
    pub async fn create_payment(
        db: &PgPool,
        dto: CreatePaymentDto,
        received_by: Uuid,
    ) -> Result<Payment, AppError> {
        let registration_id = dto.registration_id.trim();
        let mut tx = db
            .begin()
            .await
            .context("Failed to start payment transaction")
            .map_err(AppError::database)?;

        let updated = sqlx::query(
            "UPDATE registrations SET paid = true, updated_at = NOW() WHERE id = $1",
        )
        .bind(registration_id)
        .execute(&mut *tx)
        .await
        .context("Failed to mark registration as paid")
        .map_err(AppError::database)?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Registration not found")));
        }

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (registration_id, amount, payment_date, payment_method, receipt_number, note, received_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(registration_id)
        .bind(dto.amount)
        .bind(dto.payment_date)
        .bind(dto.payment_method.as_str())
        .bind(&dto.receipt_number)
        .bind(&dto.note)
        .bind(received_by)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to record payment")
        .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit payment")
            .map_err(AppError::database)?;

        crate::metrics::track_payment_recorded(dto.payment_method.as_str(), dto.amount);
        Ok(payment)
    }

    #[instrument(skip(db))]
    pub async fn get_by_registration(
        db: &PgPool,
        registration_id: &str,
    ) -> Result<Vec<Payment>, AppError> {
        sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE registration_id = $1 ORDER BY payment_date DESC, created_at DESC",
        )
        .bind(registration_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch payments")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn search_payments(
        db: &PgPool,
        query: Option<String>,
    ) -> Result<Vec<PaymentDetails>, AppError> {
        let term = query.as_deref().map(str::trim).unwrap_or_default();
        if term.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!("Search query is required")));
        }

        sqlx::query_as::<_, PaymentDetails>(
            r#"
            SELECT p.*, r.student_id, s.student_name_lao AS student_name
            FROM payments p
            JOIN registrations r ON r.id = p.registration_id
            LEFT JOIN students s ON s.student_id = r.student_id
            WHERE p.receipt_number ILIKE $1
               OR p.registration_id ILIKE $1
               OR r.student_id ILIKE $1
               OR s.student_name_lao ILIKE $1
            ORDER BY p.payment_date DESC
            LIMIT $2
            "#,
        )
        .bind(format!("%{term}%"))
        .bind(SEARCH_LIMIT)
        .fetch_all(db)
        .await
        .context("Failed to search payments")
        .map_err(AppError::database)
    }
}
