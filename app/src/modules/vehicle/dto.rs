use serde::Deserialize;
use validator::Validate;

/// data shared by every vehicle category of the registry
///
/// only structural limits are checked here, plate and renavam format
/// rules are handled by the documents team upstream
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicleDto {
    #[validate(length(min = 1, max = 10))]
    pub plate: String,

    #[validate(length(min = 1, max = 20))]
    pub renavam: String,

    #[validate(length(min = 1, max = 17))]
    pub chassis_number: String,

    #[validate(length(min = 1, max = 50))]
    pub brand: String,

    #[validate(length(min = 1, max = 50))]
    pub model: String,

    #[validate(length(min = 1, max = 30))]
    pub color: String,

    #[validate(range(min = 1900, max = 2100))]
    pub fabrication_year: i16,

    #[validate(range(min = 1900, max = 2100))]
    pub fabrication_year_limit: i16,

    pub user_id: i32,
}

/// data for registering a municipal transport vehicle, which also
/// carries its line and passenger capacity
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMunicipalTransportDto {
    #[serde(flatten)]
    #[validate]
    pub vehicle: CreateVehicleDto,

    #[validate(length(min = 1, max = 50))]
    pub line: String,

    #[validate(range(min = 1))]
    pub capacity: i16,
}
