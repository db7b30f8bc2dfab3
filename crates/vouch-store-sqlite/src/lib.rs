//! SQLite Store backend via sqlx.
//!
//! The pending→completed transition is a single conditional UPDATE checked
//! through `rows_affected()`, so concurrent submissions of the same token
//! resolve to exactly one winner at the database.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use vouch_storage::{
    CreateInvitationParams, CreateReferenceParams, Invitation, InvitationId, InvitationStatus,
    Reference, ReferenceId, RequesterId, Store, StoreError,
};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }

    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { pool })
    }
}

type InvitationRow = (
    String,         // id
    String,         // token
    String,         // requester_id
    String,         // referee_email
    String,         // referee_name
    Option<String>, // notify_email
    String,         // metadata (JSON)
    String,         // status
    i64,            // created_at
    i64,            // expires_at
    Option<i64>,    // completed_at
);

const INVITATION_COLUMNS: &str = "id, token, requester_id, referee_email, referee_name, \
     notify_email, metadata, status, created_at, expires_at, completed_at";

fn parse_timestamp(secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StoreError::Backend(format!("timestamp out of range: {}", secs)))
}

fn invitation_from_row(row: InvitationRow) -> Result<Invitation, StoreError> {
    let (id, token, requester_id, referee_email, referee_name, notify_email, metadata, status, created_at, expires_at, completed_at) =
        row;
    let id = Uuid::try_parse(&id).map_err(|e| StoreError::Backend(e.to_string()))?;
    let status = match status.as_str() {
        "pending" => InvitationStatus::Pending,
        "completed" => InvitationStatus::Completed,
        other => return Err(StoreError::Backend(format!("unknown status: {}", other))),
    };
    Ok(Invitation {
        id: InvitationId(id),
        token,
        requester_id: RequesterId(requester_id),
        referee_email,
        referee_name,
        notify_email,
        metadata: serde_json::from_str(&metadata)
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        status,
        created_at: parse_timestamp(created_at)?,
        expires_at: parse_timestamp(expires_at)?,
        completed_at: completed_at.map(parse_timestamp).transpose()?,
    })
}

type ReferenceRow = (
    String,      // id
    String,      // owner_id
    String,      // referee_name
    String,      // referee_email
    String,      // relationship
    f64,         // overall_rating
    String,      // ratings (JSON)
    String,      // feedback (JSON)
    String,      // invitation_id
    i64,         // created_at
);

const REFERENCE_COLUMNS: &str = "id, owner_id, referee_name, referee_email, relationship, \
     overall_rating, ratings, feedback, invitation_id, created_at";

fn reference_from_row(row: ReferenceRow) -> Result<Reference, StoreError> {
    let (id, owner_id, referee_name, referee_email, relationship, overall_rating, ratings, feedback, invitation_id, created_at) =
        row;
    let id = Uuid::try_parse(&id).map_err(|e| StoreError::Backend(e.to_string()))?;
    let invitation_id =
        Uuid::try_parse(&invitation_id).map_err(|e| StoreError::Backend(e.to_string()))?;
    let ratings: BTreeMap<String, f64> =
        serde_json::from_str(&ratings).map_err(|e| StoreError::Backend(e.to_string()))?;
    let feedback: BTreeMap<String, String> =
        serde_json::from_str(&feedback).map_err(|e| StoreError::Backend(e.to_string()))?;
    Ok(Reference {
        id: ReferenceId(id),
        owner_id: RequesterId(owner_id),
        referee_name,
        referee_email,
        relationship,
        overall_rating,
        ratings,
        feedback,
        invitation_id: InvitationId(invitation_id),
        created_at: parse_timestamp(created_at)?,
    })
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    async fn create_invitation(
        &self,
        params: &CreateInvitationParams,
    ) -> Result<Invitation, StoreError> {
        let id = Uuid::now_v7().to_string();
        let metadata = serde_json::to_string(&params.metadata)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        sqlx::query(
            "INSERT INTO invitations(id, token, requester_id, referee_email, referee_name, \
             notify_email, metadata, status, created_at, expires_at) \
             VALUES(?,?,?,?,?,?,?,?,?,?)",
        )
        .bind(&id)
        .bind(&params.token)
        .bind(&params.requester_id.0)
        .bind(&params.referee_email)
        .bind(&params.referee_name)
        .bind(&params.notify_email)
        .bind(&metadata)
        .bind(InvitationStatus::Pending.as_str())
        .bind(Utc::now().timestamp())
        .bind(params.expires_at.timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let s = e.to_string();
            if s.contains("UNIQUE") {
                StoreError::AlreadyExists
            } else {
                StoreError::Backend(s)
            }
        })?;

        self.get_invitation_by_token(&params.token).await
    }

    async fn get_invitation_by_token(&self, token: &str) -> Result<Invitation, StoreError> {
        let row: Option<InvitationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM invitations WHERE token = ?",
            INVITATION_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => invitation_from_row(row),
        }
    }

    async fn list_invitations(
        &self,
        requester_id: &RequesterId,
    ) -> Result<Vec<Invitation>, StoreError> {
        let rows: Vec<InvitationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM invitations WHERE requester_id = ? ORDER BY created_at DESC",
            INVITATION_COLUMNS
        ))
        .bind(&requester_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(invitation_from_row).collect()
    }

    async fn complete_invitation(
        &self,
        invitation_id: &InvitationId,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE invitations SET status = 'completed', completed_at = ? \
             WHERE id = ? AND status = 'pending'",
        )
        .bind(completed_at.timestamp())
        .bind(invitation_id.0.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Nothing updated: the row either doesn't exist or lost the
        // compare-and-set. Probe to tell the two apart.
        let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM invitations WHERE id = ?")
            .bind(invitation_id.0.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match exists {
            Some(_) => Err(StoreError::Conflict),
            None => Err(StoreError::NotFound),
        }
    }

    async fn create_reference(
        &self,
        params: &CreateReferenceParams,
    ) -> Result<Reference, StoreError> {
        let id = Uuid::now_v7().to_string();
        let ratings = serde_json::to_string(&params.ratings)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let feedback = serde_json::to_string(&params.feedback)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        sqlx::query(
            "INSERT INTO reference_records(id, owner_id, referee_name, referee_email, \
             relationship, overall_rating, ratings, feedback, invitation_id, created_at) \
             VALUES(?,?,?,?,?,?,?,?,?,?)",
        )
        .bind(&id)
        .bind(&params.owner_id.0)
        .bind(&params.referee_name)
        .bind(&params.referee_email)
        .bind(&params.relationship)
        .bind(params.overall_rating)
        .bind(&ratings)
        .bind(&feedback)
        .bind(params.invitation_id.0.to_string())
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let s = e.to_string();
            if s.contains("UNIQUE") {
                StoreError::AlreadyExists
            } else {
                StoreError::Backend(s)
            }
        })?;

        let reference_id = ReferenceId(
            Uuid::try_parse(&id).map_err(|e| StoreError::Backend(e.to_string()))?,
        );
        self.get_reference(&reference_id).await
    }

    async fn get_reference(&self, reference_id: &ReferenceId) -> Result<Reference, StoreError> {
        let row: Option<ReferenceRow> = sqlx::query_as(&format!(
            "SELECT {} FROM reference_records WHERE id = ?",
            REFERENCE_COLUMNS
        ))
        .bind(reference_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => reference_from_row(row),
        }
    }

    async fn list_references(&self, owner_id: &RequesterId) -> Result<Vec<Reference>, StoreError> {
        let rows: Vec<ReferenceRow> = sqlx::query_as(&format!(
            "SELECT {} FROM reference_records WHERE owner_id = ? ORDER BY created_at DESC",
            REFERENCE_COLUMNS
        ))
        .bind(&owner_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(reference_from_row).collect()
    }
}
