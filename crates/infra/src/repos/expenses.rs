use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::db::Db;
use crate::models::{ExpenseExportRow, GeneralExpenseRow};

#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub year: Option<i32>,
    pub settlement_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGeneralExpense {
    pub year: i32,
    pub tournament_format_id: Option<Uuid>,
    pub category: String,
    pub description: Option<String>,
    pub amount_cents: i64,
    pub paid_by_member_id: Uuid,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGeneralExpense {
    pub category: String,
    pub description: Option<String>,
    pub amount_cents: i64,
    pub settlement_status: String,
    pub settlement_date: Option<NaiveDate>,
    pub comments: Option<String>,
}

const EXPENSE_COLUMNS: &str = "id, year, tournament_format_id, category, description, \
     amount_cents, paid_by_member_id, settlement_status, settlement_date, comments, \
     created_at, updated_at";

#[derive(Clone)]
pub struct ExpenseRepo {
    pool: Db,
}

impl ExpenseRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: ExpenseFilter) -> SqlxResult<Vec<GeneralExpenseRow>> {
        sqlx::query_as::<_, GeneralExpenseRow>(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM general_expenses
            WHERE ($1::int IS NULL OR year = $1)
              AND ($2::text IS NULL OR settlement_status = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(filter.year)
        .bind(filter.settlement_status)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<GeneralExpenseRow>> {
        sqlx::query_as::<_, GeneralExpenseRow>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM general_expenses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create(&self, expense: NewGeneralExpense) -> SqlxResult<GeneralExpenseRow> {
        sqlx::query_as::<_, GeneralExpenseRow>(&format!(
            r#"
            INSERT INTO general_expenses (year, tournament_format_id, category, description,
                                          amount_cents, paid_by_member_id, settlement_status,
                                          comments)
            VALUES ($1, $2, $3, $4, $5, $6, 'Not Settled', $7)
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(expense.year)
        .bind(expense.tournament_format_id)
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(expense.paid_by_member_id)
        .bind(&expense.comments)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        expense: UpdateGeneralExpense,
    ) -> SqlxResult<Option<GeneralExpenseRow>> {
        sqlx::query_as::<_, GeneralExpenseRow>(&format!(
            r#"
            UPDATE general_expenses
            SET category = $2, description = $3, amount_cents = $4,
                settlement_status = $5, settlement_date = $6, comments = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(&expense.settlement_status)
        .bind(expense.settlement_date)
        .bind(&expense.comments)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn export_rows(&self) -> SqlxResult<Vec<ExpenseExportRow>> {
        sqlx::query_as::<_, ExpenseExportRow>(
            r#"
            SELECT e.year,
                   f.name AS format_name,
                   e.category, e.description, e.amount_cents,
                   m.first_name || ' ' || m.last_name AS paid_by_name,
                   e.settlement_status, e.settlement_date, e.comments
            FROM general_expenses e
            LEFT JOIN tournament_formats f ON f.id = e.tournament_format_id
            JOIN members m ON m.id = e.paid_by_member_id
            ORDER BY e.year DESC, e.created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
