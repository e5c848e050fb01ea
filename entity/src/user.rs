use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize)]
#[sea_orm(table_name = "user")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub email: String,
    pub cpf: Option<String>,
    /// sequential role coded registration code, `None` until assigned
    pub registration_code: Option<String>,
    pub is_superuser: bool,
    /// names of the permission groups the user belongs to, as a JSON
    /// array of strings
    pub groups: Json,
}

impl Model {
    /// the user group names, empty when the stored JSON is not a
    /// string array
    pub fn group_names(&self) -> Vec<String> {
        serde_json::from_value(self.groups.clone()).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::taxi_vehicle::Entity")]
    TaxiVehicle,
    #[sea_orm(has_many = "super::mototaxi_vehicle::Entity")]
    MototaxiVehicle,
    #[sea_orm(has_many = "super::municipal_transport_vehicle::Entity")]
    MunicipalTransportVehicle,
}

impl Related<super::taxi_vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxiVehicle.def()
    }
}

impl Related<super::mototaxi_vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MototaxiVehicle.def()
    }
}

impl Related<super::municipal_transport_vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MunicipalTransportVehicle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
