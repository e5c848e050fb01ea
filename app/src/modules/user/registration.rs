use chrono::NaiveDate;
use entity::user;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

/// Known municipal staff groups and the initials used in registration codes.
/// Groups outside this list fall back to the first three letters of their name.
const GROUP_INITIALS: [(&str, &str); 6] = [
    ("FISCAL", "FIS"),
    ("ATENDENTE ADMINISTRATIVO", "ATD"),
    ("ADMINISTRADOR", "ADM"),
    ("TAXISTA", "TAX"),
    ("MOTOTAXISTA", "MTX"),
    ("MOTORISTA CONDUTOR", "MTC"),
];

/// The slice of a user account that drives registration code assignment.
#[derive(Debug, Clone)]
pub struct RegistrationProfile {
    pub is_superuser: bool,
    pub groups: Vec<String>,
}

impl From<&user::Model> for RegistrationProfile {
    fn from(user: &user::Model) -> Self {
        RegistrationProfile {
            is_superuser: user.is_superuser,
            groups: user.group_names(),
        }
    }
}

fn group_initials(group: &str) -> String {
    let upper = group.to_uppercase();

    GROUP_INITIALS
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, initials)| initials.to_string())
        .unwrap_or_else(|| upper.chars().take(3).collect())
}

/// Builds the code prefix for a profile on a given date.
///
/// Superusers get a year-scoped admin prefix with no trailing separator, eg
/// `2026ADM`. Everyone else gets a day prefix followed by the concatenated
/// initials of every group they belong to, such as `20260825-TAX-`, with `X`
/// standing in for users that belong to no group.
pub fn registration_code_prefix(profile: &RegistrationProfile, date: NaiveDate) -> String {
    if profile.is_superuser {
        return format!("{}ADM", date.format("%Y"));
    }

    let initials: String = if profile.groups.is_empty() {
        String::from("X")
    } else {
        profile
            .groups
            .iter()
            .map(|group| group_initials(group))
            .collect()
    };

    format!("{}-{}-", date.format("%Y%m%d"), initials)
}

/// Appends the zero padded sequential suffix to a prefix, given how many
/// codes already share it.
pub fn registration_code(prefix: &str, existing: u64) -> String {
    format!("{}{:03}", prefix, existing + 1)
}

/// Computes the next registration code for a profile by counting how many
/// users already carry the prefix.
///
/// The count and the later insert are separate statements, so two concurrent
/// assignments can compute the same code. The unique constraint on the column
/// rejects the loser and the caller retries with a fresh count.
pub async fn next_registration_code(
    db: &DatabaseConnection,
    profile: &RegistrationProfile,
) -> Result<String, DbErr> {
    let prefix = registration_code_prefix(profile, chrono::Utc::now().date_naive());

    let existing = user::Entity::find()
        .filter(user::Column::RegistrationCode.starts_with(&prefix))
        .count(db)
        .await?;

    Ok(registration_code(&prefix, existing))
}
