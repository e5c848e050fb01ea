use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("could not assign a unique registration code after {attempts} attempts")]
    RegistrationCodeExhausted { attempts: usize },

    #[error("invalid user data: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Db(#[from] DbErr),
}
