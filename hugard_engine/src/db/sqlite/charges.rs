use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db::traits::LedgerError,
    db_types::{ChargeRecord, ChargeStatus, NewChargeRecord, PayerTotal, SettledPayment},
};

/// Inserts a new charge record with status `NEW`. This is not atomic on its own. Embed the call inside a transaction
/// if you need atomicity, and pass `&mut *tx` as the connection argument.
///
/// A unique-constraint violation on `invoice_ref` is reported as [`LedgerError::DuplicateInvoice`].
pub async fn insert_charge(
    charge: NewChargeRecord,
    conn: &mut SqliteConnection,
) -> Result<ChargeRecord, LedgerError> {
    let created_at = chrono::Utc::now();
    let result = sqlx::query_as::<_, ChargeRecord>(
        r#"
            INSERT INTO payments (payer_id, amount, invoice_ref, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, payer_id, amount, invoice_ref, status, created_at;
        "#,
    )
    .bind(charge.payer_id.as_str())
    .bind(charge.amount)
    .bind(charge.invoice_ref.as_str())
    .bind(ChargeStatus::New)
    .bind(created_at)
    .fetch_one(conn)
    .await;
    match result {
        Ok(record) => Ok(record),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(LedgerError::DuplicateInvoice(charge.invoice_ref))
        },
        Err(e) => Err(LedgerError::from(e)),
    }
}

pub async fn fetch_charge(invoice_ref: &str, conn: &mut SqliteConnection) -> Result<Option<ChargeRecord>, LedgerError> {
    let record = sqlx::query_as(
        r#"SELECT id, payer_id, amount, invoice_ref, status, created_at FROM payments WHERE invoice_ref = ?"#,
    )
    .bind(invoice_ref)
    .fetch_optional(conn)
    .await?;
    Ok(record)
}

pub async fn fetch_charges_with_status(
    status: ChargeStatus,
    conn: &mut SqliteConnection,
) -> Result<Vec<ChargeRecord>, LedgerError> {
    let records = sqlx::query_as(
        r#"SELECT id, payer_id, amount, invoice_ref, status, created_at FROM payments WHERE status = ? ORDER BY id"#,
    )
    .bind(status)
    .fetch_all(conn)
    .await?;
    Ok(records)
}

/// Compare-and-set of the charge status. The update only matches a row that is still `NEW`, so exactly one caller
/// can ever observe `true` for a given invoice.
pub async fn settle_charge(invoice_ref: &str, conn: &mut SqliteConnection) -> Result<bool, LedgerError> {
    let result = sqlx::query("UPDATE payments SET status = ? WHERE invoice_ref = ? AND status = ?")
        .bind(ChargeStatus::Settled)
        .bind(invoice_ref)
        .bind(ChargeStatus::New)
        .execute(conn)
        .await?;
    trace!("🗃️ Settle {invoice_ref}: {} rows affected", result.rows_affected());
    Ok(result.rows_affected() == 1)
}

pub async fn settled_history(payer_id: &str, conn: &mut SqliteConnection) -> Result<Vec<SettledPayment>, LedgerError> {
    let payments = sqlx::query_as(
        r#"
            SELECT amount, created_at FROM payments
            WHERE status = ? AND payer_id = ?
            ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(ChargeStatus::Settled)
    .bind(payer_id)
    .fetch_all(conn)
    .await?;
    Ok(payments)
}

pub async fn settled_totals(conn: &mut SqliteConnection) -> Result<Vec<PayerTotal>, LedgerError> {
    let totals = sqlx::query_as(
        r#"
            SELECT payer_id, SUM(amount) AS total FROM payments
            WHERE status = ?
            GROUP BY payer_id
            ORDER BY total DESC, payer_id ASC
        "#,
    )
    .bind(ChargeStatus::Settled)
    .fetch_all(conn)
    .await?;
    Ok(totals)
}
