use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VehicleError {
    /// every candidate identifier collided with an existing row
    #[error("could not generate a unique vehicle identifier after {attempts} attempts")]
    IdentifierExhausted { attempts: usize },

    #[error("invalid vehicle data: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Db(#[from] DbErr),
}
