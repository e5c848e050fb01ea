use super::error::UserError;
use super::registration::{next_registration_code, RegistrationProfile};
use crate::database::error::is_unique_violation_on;
use chrono::Utc;
use entity::user;
use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel, Set};
use serde::Deserialize;
use tracing::warn;
use validator::Validate;

const MAX_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(email, length(max = 255))]
    pub email: String,

    #[validate(length(max = 14))]
    pub cpf: Option<String>,

    pub is_superuser: bool,
    pub groups: Vec<String>,
}

/// Inserts a new user and assigns its registration code in a follow up
/// update, retrying the code on unique collisions.
pub async fn create_user(
    db: &DatabaseConnection,
    dto: &CreateUserDto,
) -> Result<user::Model, UserError> {
    dto.validate()?;

    let user = user::ActiveModel {
        created_at: Set(Utc::now()),
        username: Set(dto.username.clone()),
        email: Set(dto.email.clone()),
        cpf: Set(dto.cpf.clone()),
        is_superuser: Set(dto.is_superuser),
        groups: Set(serde_json::json!(dto.groups)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    assign_registration_code(db, user).await
}

/// Computes and stores a registration code for a user that does not have one
/// yet, retrying with a fresh count when a concurrent assignment wins the
/// same code.
pub async fn assign_registration_code(
    db: &DatabaseConnection,
    user: user::Model,
) -> Result<user::Model, UserError> {
    let profile = RegistrationProfile::from(&user);

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = next_registration_code(db, &profile).await?;

        let mut active = user.clone().into_active_model();
        active.registration_code = Set(Some(code.clone()));

        match active.update(db).await {
            Ok(updated) => return Ok(updated),
            Err(err) if is_unique_violation_on(&err, "registration_code") => {
                warn!(
                    "[USER] registration code {} already taken on attempt {}",
                    code, attempt
                );
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(UserError::RegistrationCodeExhausted {
        attempts: MAX_CODE_ATTEMPTS,
    })
}
