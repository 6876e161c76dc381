//! Postgres-backed `LeadStore`.
//!
//! DESIGN
//! ======
//! Rows map one-to-one onto `kanban::lead::Lead` and `Interaction`.
//! Partial updates run as read-modify-write inside a transaction holding a
//! row lock, so the patch semantics are exactly `Lead::apply_patch` and never
//! drift from the in-memory store.
//!
//! ERROR HANDLING
//! ==============
//! Missing rows become `StoreError::NotFound`. Every other SQLx failure is
//! flattened into `StoreError::Backend` with its message; callers above this
//! layer do not depend on SQLx types.

#[cfg(test)]
#[path = "lead_store_test.rs"]
mod lead_store_test;

use async_trait::async_trait;
use kanban::lead::{Interaction, InteractionKind, Lead, LeadId, LeadPatch, NewLead, now_ms};
use kanban::store::{LeadFilter, LeadStore, StoreError};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

type LeadRow = (
    Uuid,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    Option<i32>,
    Option<Uuid>,
    Option<String>,
    i64,
    i64,
);

type InteractionRow = (Uuid, Uuid, String, String, i64);

fn lead_from_row(row: LeadRow) -> Lead {
    let (id, name, email, phone, company, status, score, consultant_id, notes, created_at, updated_at) = row;
    Lead { id, name, email, phone, company, status, score, consultant_id, notes, created_at, updated_at }
}

fn interaction_from_row(row: InteractionRow) -> Interaction {
    let (id, lead_id, kind, body, created_at) = row;
    let kind = InteractionKind::parse(&kind).unwrap_or_else(|| {
        warn!(%id, kind = %kind, "unknown interaction kind; reading as note");
        InteractionKind::Note
    });
    Interaction { id, lead_id, kind, body, created_at }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

pub struct PgLeadStore {
    pool: PgPool,
}

impl PgLeadStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn list_leads(&self, filter: LeadFilter) -> Result<Vec<Lead>, StoreError> {
        let rows = sqlx::query_as::<_, LeadRow>(
            "SELECT id, name, email, phone, company, status, score, consultant_id, notes, created_at, updated_at \
             FROM leads WHERE ($1::uuid IS NULL OR consultant_id = $1) ORDER BY created_at, id",
        )
        .bind(filter.consultant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(lead_from_row).collect())
    }

    async fn get_lead(&self, id: LeadId) -> Result<Lead, StoreError> {
        let row = sqlx::query_as::<_, LeadRow>(
            "SELECT id, name, email, phone, company, status, score, consultant_id, notes, created_at, updated_at \
             FROM leads WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        row.map(lead_from_row).ok_or(StoreError::NotFound(id))
    }

    async fn create_lead(&self, new: NewLead) -> Result<Lead, StoreError> {
        let lead = new.into_lead(now_ms());
        upsert_lead(&self.pool, &lead).await.map_err(backend)?;
        Ok(lead)
    }

    async fn update_lead(&self, id: LeadId, patch: &LeadPatch) -> Result<Lead, StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        let row = sqlx::query_as::<_, LeadRow>(
            "SELECT id, name, email, phone, company, status, score, consultant_id, notes, created_at, updated_at \
             FROM leads WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(backend)?;
        let mut lead = row.map(lead_from_row).ok_or(StoreError::NotFound(id))?;

        lead.apply_patch(patch, now_ms());
        sqlx::query(
            "UPDATE leads SET name = $2, email = $3, phone = $4, company = $5, status = $6, score = $7, \
             consultant_id = $8, notes = $9, updated_at = $10 WHERE id = $1",
        )
        .bind(lead.id)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.company)
        .bind(&lead.status)
        .bind(lead.score)
        .bind(lead.consultant_id)
        .bind(&lead.notes)
        .bind(lead.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        Ok(lead)
    }

    async fn delete_lead(&self, id: LeadId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn insert_leads(&self, leads: Vec<Lead>) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        for lead in &leads {
            upsert_lead(&mut *tx, lead).await.map_err(backend)?;
        }
        tx.commit().await.map_err(backend)?;
        Ok(leads.len())
    }

    async fn list_interactions(&self, lead_id: LeadId) -> Result<Vec<Interaction>, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM leads WHERE id = $1)")
            .bind(lead_id)
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        if !exists {
            return Err(StoreError::NotFound(lead_id));
        }

        let rows = sqlx::query_as::<_, InteractionRow>(
            "SELECT id, lead_id, kind, body, created_at FROM lead_interactions \
             WHERE lead_id = $1 ORDER BY created_at DESC, id",
        )
        .bind(lead_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(interaction_from_row).collect())
    }

    async fn add_interaction(&self, interaction: Interaction) -> Result<Interaction, StoreError> {
        let result = sqlx::query(
            "INSERT INTO lead_interactions (id, lead_id, kind, body, created_at) VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(interaction.id)
        .bind(interaction.lead_id)
        .bind(interaction.kind.as_str())
        .bind(&interaction.body)
        .bind(interaction.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(interaction),
            Ok(_) => {
                let row = sqlx::query_as::<_, InteractionRow>(
                    "SELECT id, lead_id, kind, body, created_at FROM lead_interactions WHERE id = $1",
                )
                .bind(interaction.id)
                .fetch_one(&self.pool)
                .await
                .map_err(backend)?;
                Ok(interaction_from_row(row))
            }
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Err(StoreError::NotFound(interaction.lead_id))
            }
            Err(err) => Err(backend(err)),
        }
    }
}

async fn upsert_lead<'e, E>(executor: E, lead: &Lead) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO leads (id, name, email, phone, company, status, score, consultant_id, notes, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         ON CONFLICT (id) DO UPDATE SET \
             name = EXCLUDED.name, email = EXCLUDED.email, phone = EXCLUDED.phone, company = EXCLUDED.company, \
             status = EXCLUDED.status, score = EXCLUDED.score, consultant_id = EXCLUDED.consultant_id, \
             notes = EXCLUDED.notes, created_at = EXCLUDED.created_at, updated_at = EXCLUDED.updated_at",
    )
    .bind(lead.id)
    .bind(&lead.name)
    .bind(&lead.email)
    .bind(&lead.phone)
    .bind(&lead.company)
    .bind(&lead.status)
    .bind(lead.score)
    .bind(lead.consultant_id)
    .bind(&lead.notes)
    .bind(lead.created_at)
    .bind(lead.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}
