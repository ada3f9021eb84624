use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use fanpage_approval_schema::{approval_codes, profiles};

use crate::domain::repository::{ApprovalCodeRepository, ProfileRepository};
use crate::domain::types::{ApprovalCode, Profile, RedeemOutcome};
use crate::error::ApprovalServiceError;

// ── Profile repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: DatabaseConnection,
}

impl ProfileRepository for DbProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, ApprovalServiceError> {
        let model = profiles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find profile by id")?;
        Ok(model.map(profile_from_model))
    }

    async fn set_ban(
        &self,
        id: Uuid,
        banned: bool,
        reason: Option<&str>,
    ) -> Result<bool, ApprovalServiceError> {
        let result = profiles::Entity::update_many()
            .col_expr(profiles::Column::Banned, Expr::value(banned))
            .col_expr(
                profiles::Column::BanReason,
                Expr::value(reason.map(str::to_owned)),
            )
            .filter(profiles::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update profile ban")?;
        Ok(result.rows_affected > 0)
    }
}

fn profile_from_model(model: profiles::Model) -> Profile {
    Profile {
        id: model.id,
        email: model.email,
        display_name: model.display_name,
        approved: model.approved,
        approved_at: model.approved_at,
        banned: model.banned,
        ban_reason: model.ban_reason,
        admin: model.admin,
    }
}

// ── ApprovalCode repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbApprovalCodeRepository {
    pub db: DatabaseConnection,
}

impl ApprovalCodeRepository for DbApprovalCodeRepository {
    async fn create(&self, code: &ApprovalCode) -> Result<(), ApprovalServiceError> {
        approval_codes::ActiveModel {
            id: Set(code.id),
            subject_id: Set(code.subject_id),
            code: Set(code.code.clone()),
            issued_by: Set(code.issued_by),
            created_at: Set(code.created_at),
            expires_at: Set(code.expires_at),
            used_at: Set(None),
            sent_to_email: Set(None),
            sent_at: Set(None),
        }
        .insert(&self.db)
        .await
        .context("create approval code")?;
        Ok(())
    }

    async fn list_by_subject(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<ApprovalCode>, ApprovalServiceError> {
        let models = approval_codes::Entity::find()
            .filter(approval_codes::Column::SubjectId.eq(subject_id))
            .order_by_desc(approval_codes::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list approval codes by subject")?;
        Ok(models.into_iter().map(approval_code_from_model).collect())
    }

    async fn mark_sent(
        &self,
        subject_id: Uuid,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, ApprovalServiceError> {
        let latest = approval_codes::Entity::find()
            .filter(approval_codes::Column::SubjectId.eq(subject_id))
            .filter(approval_codes::Column::UsedAt.is_null())
            .order_by_desc(approval_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find latest unredeemed approval code")?;
        let Some(latest) = latest else {
            return Ok(false);
        };

        approval_codes::ActiveModel {
            id: Set(latest.id),
            sent_to_email: Set(Some(email.to_owned())),
            sent_at: Set(Some(at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark approval code sent")?;
        Ok(true)
    }

    async fn redeem(
        &self,
        code: &str,
        caller_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<RedeemOutcome, ApprovalServiceError> {
        let code = code.to_owned();
        let outcome = self
            .db
            .transaction::<_, RedeemOutcome, sea_orm::DbErr>(|txn| {
                Box::pin(async move { redeem_in_txn(txn, &code, caller_id, now).await })
            })
            .await
            .context("redeem approval code")?;
        Ok(outcome)
    }
}

/// Check-and-consume inside one transaction.
///
/// Row locks serialize concurrent redeemers of the same caller; the
/// `used_at IS NULL` guard on the update makes a second consumer see zero
/// affected rows even without them. Non-`Redeemed` outcomes write nothing.
async fn redeem_in_txn(
    txn: &DatabaseTransaction,
    code: &str,
    caller_id: Uuid,
    now: DateTime<Utc>,
) -> Result<RedeemOutcome, sea_orm::DbErr> {
    let profile = profiles::Entity::find_by_id(caller_id)
        .lock_exclusive()
        .one(txn)
        .await?;
    let Some(profile) = profile else {
        return Ok(RedeemOutcome::Invalid);
    };
    if profile.banned {
        return Ok(RedeemOutcome::Banned);
    }

    let row = approval_codes::Entity::find()
        .filter(approval_codes::Column::Code.eq(code))
        .filter(approval_codes::Column::SubjectId.eq(caller_id))
        .filter(approval_codes::Column::UsedAt.is_null())
        .filter(approval_codes::Column::ExpiresAt.gt(now))
        .order_by_desc(approval_codes::Column::CreatedAt)
        .lock_exclusive()
        .one(txn)
        .await?;
    let Some(row) = row else {
        return Ok(RedeemOutcome::Invalid);
    };

    let consumed = approval_codes::Entity::update_many()
        .col_expr(approval_codes::Column::UsedAt, Expr::value(now))
        .filter(approval_codes::Column::Id.eq(row.id))
        .filter(approval_codes::Column::UsedAt.is_null())
        .exec(txn)
        .await?;
    if consumed.rows_affected != 1 {
        return Ok(RedeemOutcome::Invalid);
    }

    // A profile approved by an earlier code keeps its first approval time.
    let approved_at = profile.approved_at.unwrap_or(now);
    profiles::Entity::update_many()
        .col_expr(profiles::Column::Approved, Expr::value(true))
        .col_expr(profiles::Column::ApprovedAt, Expr::value(approved_at))
        .filter(profiles::Column::Id.eq(profile.id))
        .exec(txn)
        .await?;

    Ok(RedeemOutcome::Redeemed {
        subject_id: row.subject_id,
    })
}

fn approval_code_from_model(model: approval_codes::Model) -> ApprovalCode {
    ApprovalCode {
        id: model.id,
        subject_id: model.subject_id,
        code: model.code,
        issued_by: model.issued_by,
        created_at: model.created_at,
        expires_at: model.expires_at,
        used_at: model.used_at,
        sent_to_email: model.sent_to_email,
        sent_at: model.sent_at,
    }
}
