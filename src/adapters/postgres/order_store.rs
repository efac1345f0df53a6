//! PostgreSQL implementation of OrderStore.
//!
//! The claim transition is one conditional `UPDATE`: the predicate check and
//! the mutation execute as a single atomic statement under row-level locking,
//! so among concurrent claimers exactly one sees `rows_affected == 1`. No
//! in-process state is kept; the front end and the webhook receiver may run
//! as separate processes against the same database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{AccessToken, DomainError, ErrorCode, OrderId};
use crate::domain::order::{Order, OrderStatus};
use crate::ports::OrderStore;

/// PostgreSQL implementation of the OrderStore port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgresOrderStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_id: String,
    amount: i64,
    status: String,
    claimed: bool,
    access_token: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = parse_status(&row.status)?;
        let order_id = OrderId::new(row.order_id)
            .map_err(|e| DomainError::database(format!("Invalid order_id: {}", e)))?;
        let access_token = row
            .access_token
            .map(AccessToken::new)
            .transpose()
            .map_err(|e| DomainError::database(format!("Invalid access_token: {}", e)))?;

        Ok(Order {
            order_id,
            amount: row.amount,
            status,
            claimed: row.claimed,
            access_token,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn parse_status(s: &str) -> Result<OrderStatus, DomainError> {
    match s {
        "pending" => Ok(OrderStatus::Pending),
        "paid" => Ok(OrderStatus::Paid),
        _ => Err(DomainError::database(format!("Invalid status value: {}", s))),
    }
}

fn status_to_string(status: &OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Paid => "paid",
    }
}

const SELECT_ORDER: &str = r#"
    SELECT order_id, amount, status, claimed, access_token, created_at, updated_at
    FROM orders
"#;

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn create(&self, order: &Order) -> Result<(), DomainError> {
        // Idempotent upsert for retried invoice creation. The WHERE guard
        // keeps a late retry from downgrading an already-paid order.
        sqlx::query(
            r#"
            INSERT INTO orders (order_id, amount, status, claimed, created_at, updated_at)
            VALUES ($1, $2, $3, FALSE, $4, $4)
            ON CONFLICT (order_id) DO UPDATE SET
                amount = EXCLUDED.amount,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            WHERE orders.status <> 'paid'
            "#,
        )
        .bind(order.order_id.as_str())
        .bind(order.amount)
        .bind(status_to_string(&order.status))
        .bind(order.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to create order: {}", e)))?;

        Ok(())
    }

    async fn mark_paid(&self, order_id: &OrderId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'paid', updated_at = NOW()
            WHERE order_id = $1
            "#,
        )
        .bind(order_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to mark order paid: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn try_claim(&self, order_id: &OrderId) -> Result<bool, DomainError> {
        // The compare-and-set. Row-level locking serializes concurrent
        // callers; exactly one observes rows_affected == 1.
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET claimed = TRUE, updated_at = NOW()
            WHERE order_id = $1
              AND status = 'paid'
              AND claimed = FALSE
            "#,
        )
        .bind(order_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to claim order: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn get(&self, order_id: &OrderId) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("{} WHERE order_id = $1", SELECT_ORDER))
                .bind(order_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to fetch order: {}", e)))?;

        row.map(Order::try_from).transpose()
    }

    async fn set_token(
        &self,
        order_id: &OrderId,
        token: &AccessToken,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET access_token = $2, updated_at = NOW()
            WHERE order_id = $1
              AND access_token IS NULL
            "#,
        )
        .bind(order_id.as_str())
        .bind(token.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to set access token: {}", e)))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        // Distinguish "no such order" from "token already attached".
        match self.get(order_id).await? {
            None => Err(DomainError::new(ErrorCode::OrderNotFound, "Order not found")
                .with_detail("order_id", order_id.to_string())),
            Some(_) => Err(
                DomainError::new(ErrorCode::TokenAlreadySet, "Access token already set")
                    .with_detail("order_id", order_id.to_string()),
            ),
        }
    }

    async fn get_by_token(&self, token: &AccessToken) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("{} WHERE access_token = $1", SELECT_ORDER))
                .bind(token.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::database(format!("Failed to fetch order by token: {}", e))
                })?;

        row.map(Order::try_from).transpose()
    }

    async fn try_claim_by_token(&self, token: &AccessToken) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET claimed = TRUE, updated_at = NOW()
            WHERE access_token = $1
              AND status = 'paid'
              AND claimed = FALSE
            "#,
        )
        .bind(token.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to claim order by token: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_works_for_all_values() {
        assert_eq!(parse_status("pending").unwrap(), OrderStatus::Pending);
        assert_eq!(parse_status("paid").unwrap(), OrderStatus::Paid);
    }

    #[test]
    fn parse_status_rejects_invalid_values() {
        assert!(parse_status("invalid").is_err());
        assert!(parse_status("").is_err());
        assert!(parse_status("PAID").is_err());
    }

    #[test]
    fn roundtrip_status_conversion() {
        for status in [OrderStatus::Pending, OrderStatus::Paid] {
            let s = status_to_string(&status);
            assert_eq!(parse_status(s).unwrap(), status);
        }
    }

    #[test]
    fn row_converts_to_order() {
        let now = Utc::now();
        let row = OrderRow {
            order_id: "order_abc".to_string(),
            amount: 950,
            status: "paid".to_string(),
            claimed: false,
            access_token: Some("tok123".to_string()),
            created_at: now,
            updated_at: now,
        };

        let order = Order::try_from(row).unwrap();
        assert_eq!(order.order_id.as_str(), "order_abc");
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.access_token.unwrap().as_str(), "tok123");
    }

    #[test]
    fn row_with_invalid_status_fails_conversion() {
        let now = Utc::now();
        let row = OrderRow {
            order_id: "order_abc".to_string(),
            amount: 950,
            status: "refunded".to_string(),
            claimed: false,
            access_token: None,
            created_at: now,
            updated_at: now,
        };

        assert!(Order::try_from(row).is_err());
    }
}
