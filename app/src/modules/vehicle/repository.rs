use super::dto::{CreateMunicipalTransportDto, CreateVehicleDto};
use super::error::VehicleError;
use super::identifier::{IdentifierGenerator, MAX_GENERATION_ATTEMPTS};
use crate::database::error::is_unique_violation_on;
use chrono::Utc;
use entity::{mototaxi_vehicle, municipal_transport_vehicle, taxi_vehicle};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::warn;
use validator::Validate;

pub async fn create_taxi(
    db: &DatabaseConnection,
    generator: &IdentifierGenerator,
    dto: &CreateVehicleDto,
) -> Result<taxi_vehicle::Model, VehicleError> {
    dto.validate()?;

    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let vehicle = taxi_vehicle::ActiveModel {
            created_at: Set(Utc::now()),
            identifier: Set(generator.next_identifier()),
            plate: Set(dto.plate.clone()),
            renavam: Set(dto.renavam.clone()),
            chassis_number: Set(dto.chassis_number.clone()),
            brand: Set(dto.brand.clone()),
            model: Set(dto.model.clone()),
            color: Set(dto.color.clone()),
            fabrication_year: Set(dto.fabrication_year),
            fabrication_year_limit: Set(dto.fabrication_year_limit),
            user_id: Set(dto.user_id),
            ..Default::default()
        };

        match vehicle.insert(db).await {
            Ok(created) => return Ok(created),
            Err(err) if is_unique_violation_on(&err, "identifier") => {
                warn!("[VEHICLE] taxi identifier collision on attempt {}", attempt);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(VehicleError::IdentifierExhausted {
        attempts: MAX_GENERATION_ATTEMPTS,
    })
}

pub async fn create_mototaxi(
    db: &DatabaseConnection,
    generator: &IdentifierGenerator,
    dto: &CreateVehicleDto,
) -> Result<mototaxi_vehicle::Model, VehicleError> {
    dto.validate()?;

    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let vehicle = mototaxi_vehicle::ActiveModel {
            created_at: Set(Utc::now()),
            identifier: Set(generator.next_identifier()),
            plate: Set(dto.plate.clone()),
            renavam: Set(dto.renavam.clone()),
            chassis_number: Set(dto.chassis_number.clone()),
            brand: Set(dto.brand.clone()),
            model: Set(dto.model.clone()),
            color: Set(dto.color.clone()),
            fabrication_year: Set(dto.fabrication_year),
            fabrication_year_limit: Set(dto.fabrication_year_limit),
            user_id: Set(dto.user_id),
            ..Default::default()
        };

        match vehicle.insert(db).await {
            Ok(created) => return Ok(created),
            Err(err) if is_unique_violation_on(&err, "identifier") => {
                warn!("[VEHICLE] mototaxi identifier collision on attempt {}", attempt);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(VehicleError::IdentifierExhausted {
        attempts: MAX_GENERATION_ATTEMPTS,
    })
}

pub async fn create_municipal_transport(
    db: &DatabaseConnection,
    generator: &IdentifierGenerator,
    dto: &CreateMunicipalTransportDto,
) -> Result<municipal_transport_vehicle::Model, VehicleError> {
    dto.validate()?;

    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let vehicle = municipal_transport_vehicle::ActiveModel {
            created_at: Set(Utc::now()),
            identifier: Set(generator.next_identifier()),
            plate: Set(dto.vehicle.plate.clone()),
            renavam: Set(dto.vehicle.renavam.clone()),
            chassis_number: Set(dto.vehicle.chassis_number.clone()),
            brand: Set(dto.vehicle.brand.clone()),
            model: Set(dto.vehicle.model.clone()),
            color: Set(dto.vehicle.color.clone()),
            fabrication_year: Set(dto.vehicle.fabrication_year),
            fabrication_year_limit: Set(dto.vehicle.fabrication_year_limit),
            line: Set(dto.line.clone()),
            capacity: Set(dto.capacity),
            user_id: Set(dto.vehicle.user_id),
            ..Default::default()
        };

        match vehicle.insert(db).await {
            Ok(created) => return Ok(created),
            Err(err) if is_unique_violation_on(&err, "identifier") => {
                warn!(
                    "[VEHICLE] municipal transport identifier collision on attempt {}",
                    attempt
                );
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(VehicleError::IdentifierExhausted {
        attempts: MAX_GENERATION_ATTEMPTS,
    })
}
