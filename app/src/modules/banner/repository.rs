use crate::modules::vehicle::registry::{self, VehicleRef};
use chrono::Utc;
use entity::identification_banner;
use entity::vehicle_kind::VehicleKind;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use std::str::FromStr;
use tracing::info;

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<identification_banner::Model>, DbErr> {
    identification_banner::Entity::find_by_id(id).one(db).await
}

pub async fn find_all(
    db: &DatabaseConnection,
) -> Result<Vec<identification_banner::Model>, DbErr> {
    identification_banner::Entity::find()
        .order_by_asc(identification_banner::Column::Id)
        .all(db)
        .await
}

/// Finds the banner holding a vehicle reference by its stable half.
pub async fn find_by_vehicle(
    db: &DatabaseConnection,
    kind: VehicleKind,
    identifier: &str,
) -> Result<Option<identification_banner::Model>, DbErr> {
    identification_banner::Entity::find()
        .filter(identification_banner::Column::VehicleKind.eq(kind.to_string()))
        .filter(identification_banner::Column::VehicleIdentifier.eq(identifier))
        .one(db)
        .await
}

/// Finds the banner holding a vehicle reference by its numeric half.
///
/// Row ids get recycled by the database, so a hit here may belong to a long
/// deleted vehicle that happened to share the id.
pub async fn find_by_vehicle_pair(
    db: &DatabaseConnection,
    kind: VehicleKind,
    vehicle_id: i32,
) -> Result<Option<identification_banner::Model>, DbErr> {
    identification_banner::Entity::find()
        .filter(identification_banner::Column::VehicleKind.eq(kind.to_string()))
        .filter(identification_banner::Column::VehicleId.eq(vehicle_id))
        .one(db)
        .await
}

/// Resolves the vehicle a banner points at.
///
/// The stable identifier half is probed first, the legacy (kind, id) pair
/// second. When both halves are present and disagree the identifier decides,
/// reference rewrites in [`reconcile_references`] follow the same rule.
pub async fn resolve_vehicle(
    db: &DatabaseConnection,
    banner: &identification_banner::Model,
) -> Result<Option<VehicleRef>, DbErr> {
    if let Some(identifier) = banner.vehicle_identifier.as_deref() {
        if let Some(vehicle) = registry::find_vehicle_by_identifier(db, identifier).await? {
            return Ok(Some(vehicle));
        }
    }

    if let (Ok(kind), Some(vehicle_id)) = (
        VehicleKind::from_str(&banner.vehicle_kind),
        banner.vehicle_id,
    ) {
        return registry::find_vehicle_by_kind_and_id(db, kind, vehicle_id).await;
    }

    Ok(None)
}

/// Resolves a banner's vehicle and rewrites any stale reference halves so
/// both point at the resolved row.
///
/// Unresolvable banners are returned untouched, healing them is a human
/// decision and the fix up commands only report or deactivate them.
pub async fn reconcile_references(
    db: &DatabaseConnection,
    banner: identification_banner::Model,
) -> Result<(identification_banner::Model, Option<VehicleRef>), DbErr> {
    let Some(vehicle) = resolve_vehicle(db, &banner).await? else {
        return Ok((banner, None));
    };

    let up_to_date = banner.vehicle_kind == vehicle.kind().to_string()
        && banner.vehicle_id == Some(vehicle.id())
        && banner.vehicle_identifier.as_deref() == Some(vehicle.identifier());

    if up_to_date {
        return Ok((banner, Some(vehicle)));
    }

    info!("[BANNER] backfilling vehicle references for banner {}", banner.id);

    let mut active = banner.into_active_model();
    active.vehicle_kind = Set(vehicle.kind().to_string());
    active.vehicle_id = Set(Some(vehicle.id()));
    active.vehicle_identifier = Set(Some(vehicle.identifier().to_string()));
    active.updated_at = Set(Utc::now());

    let updated = active.update(db).await?;

    Ok((updated, Some(vehicle)))
}

pub async fn create_for_vehicle(
    db: &DatabaseConnection,
    vehicle: &VehicleRef,
) -> Result<identification_banner::Model, DbErr> {
    let now = Utc::now();

    identification_banner::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        vehicle_kind: Set(vehicle.kind().to_string()),
        vehicle_id: Set(Some(vehicle.id())),
        vehicle_identifier: Set(Some(vehicle.identifier().to_string())),
        active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Reactivates an inactive banner, refreshing its references to the vehicle
/// that claimed it.
pub async fn reactivate(
    db: &DatabaseConnection,
    banner: identification_banner::Model,
    vehicle: &VehicleRef,
) -> Result<identification_banner::Model, DbErr> {
    let mut active = banner.into_active_model();
    active.active = Set(true);
    active.vehicle_kind = Set(vehicle.kind().to_string());
    active.vehicle_id = Set(Some(vehicle.id()));
    active.vehicle_identifier = Set(Some(vehicle.identifier().to_string()));
    active.updated_at = Set(Utc::now());

    active.update(db).await
}

/// Deactivates a banner and clears its numeric vehicle reference so the
/// (kind, id) pair becomes available to a newer banner. The identifier half
/// is kept for auditing which vehicle the banner belonged to.
pub async fn deactivate_releasing_pair(
    db: &DatabaseConnection,
    banner: identification_banner::Model,
) -> Result<identification_banner::Model, DbErr> {
    let mut active = banner.into_active_model();
    active.active = Set(false);
    active.vehicle_id = Set(None);
    active.updated_at = Set(Utc::now());

    active.update(db).await
}

pub async fn update_qr_url(
    db: &DatabaseConnection,
    banner: identification_banner::Model,
    qr_url: &str,
) -> Result<identification_banner::Model, DbErr> {
    let mut active = banner.into_active_model();
    active.qr_url = Set(Some(qr_url.to_string()));
    active.updated_at = Set(Utc::now());

    active.update(db).await
}

pub async fn update_artifact(
    db: &DatabaseConnection,
    banner: identification_banner::Model,
    file_path: &str,
    qr_url: &str,
) -> Result<identification_banner::Model, DbErr> {
    let mut active = banner.into_active_model();
    active.file_path = Set(Some(file_path.to_string()));
    active.qr_url = Set(Some(qr_url.to_string()));
    active.updated_at = Set(Utc::now());

    active.update(db).await
}

pub async fn delete_by_id(db: &DatabaseConnection, id: i32) -> Result<u64, DbErr> {
    let res = identification_banner::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}
