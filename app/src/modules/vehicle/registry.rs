use entity::traits::FindByIdentifier;
use entity::vehicle_kind::VehicleKind;
use entity::{mototaxi_vehicle, municipal_transport_vehicle, taxi_vehicle};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QuerySelect};

/// A vehicle row from any of the registry tables
///
/// lookups that accept a bare identifier cannot know which table the
/// vehicle lives in, so they return this instead of a concrete model
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleRef {
    Taxi(taxi_vehicle::Model),
    Mototaxi(mototaxi_vehicle::Model),
    MunicipalTransport(municipal_transport_vehicle::Model),
}

impl VehicleRef {
    pub fn kind(&self) -> VehicleKind {
        match self {
            VehicleRef::Taxi(_) => VehicleKind::Taxi,
            VehicleRef::Mototaxi(_) => VehicleKind::Mototaxi,
            VehicleRef::MunicipalTransport(_) => VehicleKind::MunicipalTransport,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            VehicleRef::Taxi(v) => v.id,
            VehicleRef::Mototaxi(v) => v.id,
            VehicleRef::MunicipalTransport(v) => v.id,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            VehicleRef::Taxi(v) => &v.identifier,
            VehicleRef::Mototaxi(v) => &v.identifier,
            VehicleRef::MunicipalTransport(v) => &v.identifier,
        }
    }

    pub fn plate(&self) -> &str {
        match self {
            VehicleRef::Taxi(v) => &v.plate,
            VehicleRef::Mototaxi(v) => &v.plate,
            VehicleRef::MunicipalTransport(v) => &v.plate,
        }
    }

    pub fn user_id(&self) -> i32 {
        match self {
            VehicleRef::Taxi(v) => v.user_id,
            VehicleRef::Mototaxi(v) => v.user_id,
            VehicleRef::MunicipalTransport(v) => v.user_id,
        }
    }
}

/// finds a vehicle by its public identifier, probing the registry tables
/// in a fixed order: taxis, then mototaxis, then municipal transport
pub async fn find_vehicle_by_identifier(
    db: &DatabaseConnection,
    identifier: &str,
) -> Result<Option<VehicleRef>, DbErr> {
    if let Some(v) = taxi_vehicle::Entity::find_by_identifier(identifier, db).await? {
        return Ok(Some(VehicleRef::Taxi(v)));
    }

    if let Some(v) = mototaxi_vehicle::Entity::find_by_identifier(identifier, db).await? {
        return Ok(Some(VehicleRef::Mototaxi(v)));
    }

    if let Some(v) = municipal_transport_vehicle::Entity::find_by_identifier(identifier, db).await? {
        return Ok(Some(VehicleRef::MunicipalTransport(v)));
    }

    Ok(None)
}

/// finds a vehicle by its kind and numeric id
pub async fn find_vehicle_by_kind_and_id(
    db: &DatabaseConnection,
    kind: VehicleKind,
    id: i32,
) -> Result<Option<VehicleRef>, DbErr> {
    let found = match kind {
        VehicleKind::Taxi => taxi_vehicle::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(VehicleRef::Taxi),

        VehicleKind::Mototaxi => mototaxi_vehicle::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(VehicleRef::Mototaxi),

        VehicleKind::MunicipalTransport => municipal_transport_vehicle::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(VehicleRef::MunicipalTransport),
    };

    Ok(found)
}

/// lists up to `limit` vehicles of every kind, for inspection tooling
pub async fn sample_vehicles(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<VehicleRef>, DbErr> {
    let mut vehicles = Vec::new();

    for v in taxi_vehicle::Entity::find().limit(limit).all(db).await? {
        vehicles.push(VehicleRef::Taxi(v));
    }

    for v in mototaxi_vehicle::Entity::find().limit(limit).all(db).await? {
        vehicles.push(VehicleRef::Mototaxi(v));
    }

    for v in municipal_transport_vehicle::Entity::find()
        .limit(limit)
        .all(db)
        .await?
    {
        vehicles.push(VehicleRef::MunicipalTransport(v));
    }

    Ok(vehicles)
}
