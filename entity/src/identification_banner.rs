use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A identification banner generated for a vehicle of the registry
///
/// rows reference their vehicle twice: by the legacy `(vehicle_kind,
/// vehicle_id)` pair, whose numeric half is recycled whenever a vehicle
/// is re registered, and by the stable `vehicle_identifier`, which the
/// registry never reuses. either half may be missing on rows created
/// by older system versions, resolution prefers the stable half.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize)]
#[sea_orm(table_name = "identification_banner")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// stored kind tag of the referenced vehicle, see
    /// [`crate::vehicle_kind::VehicleKind`]
    pub vehicle_kind: String,
    pub vehicle_id: Option<i32>,
    pub vehicle_identifier: Option<String>,
    /// path of the rendered banner file, relative to the media root
    pub file_path: Option<String>,
    /// URL encoded in the banner QR code
    pub qr_url: Option<String>,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
