use sea_orm::entity::prelude::*;

/// Account profile whose flags gate feature access across the app.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Contact address mirrored from the auth provider; absent for some OAuth logins.
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub approved: bool,
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub banned: bool,
    pub ban_reason: Option<String>,
    pub admin: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::approval_codes::Entity")]
    ApprovalCodes,
}

impl Related<super::approval_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApprovalCodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
