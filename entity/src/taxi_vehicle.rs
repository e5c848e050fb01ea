use super::traits::FindByIdentifier;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize)]
#[sea_orm(table_name = "taxi_vehicle")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTime<Utc>,
    /// public 8 character identifier, unique across the table
    pub identifier: String,
    pub plate: String,
    pub renavam: String,
    pub chassis_number: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub fabrication_year: i16,
    pub fabrication_year_limit: i16,
    pub user_id: i32,
}

impl FindByIdentifier for Entity {
    type Model = Model;

    async fn find_by_identifier(
        identifier: &str,
        db: &DatabaseConnection,
    ) -> Result<Option<Model>, DbErr> {
        Self::find()
            .filter(Column::Identifier.eq(identifier))
            .one(db)
            .await
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
