use sea_orm::{DatabaseConnection, DbErr};

/// Trait for vehicle entities that can be looked up by their public
/// 8 character identifier
///
/// this is what lets callers resolve a identifier to a concrete
/// vehicle row without knowing which registry table it lives in,
/// every vehicle table implements this with the same semantics.
pub trait FindByIdentifier {
    /// The model of the entity that is returned by the query
    type Model;

    fn find_by_identifier(
        identifier: &str,
        db: &DatabaseConnection,
    ) -> impl std::future::Future<Output = Result<Option<Self::Model>, DbErr>> + Send;
}
