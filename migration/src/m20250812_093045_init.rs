use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    CreatedAt,
    Username,
    Email,
    Cpf,
    RegistrationCode,
    IsSuperuser,
    Groups,
}

#[derive(DeriveIden)]
enum TaxiVehicle {
    Table,
    Id,
    CreatedAt,
    Identifier,
    Plate,
    Renavam,
    ChassisNumber,
    Brand,
    Model,
    Color,
    FabricationYear,
    FabricationYearLimit,
    UserId,
}

#[derive(DeriveIden)]
enum MototaxiVehicle {
    Table,
    Id,
    CreatedAt,
    Identifier,
    Plate,
    Renavam,
    ChassisNumber,
    Brand,
    Model,
    Color,
    FabricationYear,
    FabricationYearLimit,
    UserId,
}

#[derive(DeriveIden)]
enum MunicipalTransportVehicle {
    Table,
    Id,
    CreatedAt,
    Identifier,
    Plate,
    Renavam,
    ChassisNumber,
    Brand,
    Model,
    Color,
    FabricationYear,
    FabricationYearLimit,
    Line,
    Capacity,
    UserId,
}

#[derive(DeriveIden)]
enum IdentificationBanner {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    VehicleKind,
    VehicleId,
    VehicleIdentifier,
    FilePath,
    QrUrl,
    Active,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(User::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(User::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(User::Cpf).string_len(14).unique_key())
                    .col(
                        ColumnDef::new(User::RegistrationCode)
                            .string_len(30)
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(User::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(User::Groups).json().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TaxiVehicle::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaxiVehicle::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TaxiVehicle::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TaxiVehicle::Identifier)
                            .string_len(8)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TaxiVehicle::Plate)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TaxiVehicle::Renavam)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TaxiVehicle::ChassisNumber)
                            .string_len(17)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TaxiVehicle::Brand).string_len(50).not_null())
                    .col(ColumnDef::new(TaxiVehicle::Model).string_len(50).not_null())
                    .col(ColumnDef::new(TaxiVehicle::Color).string_len(30).not_null())
                    .col(
                        ColumnDef::new(TaxiVehicle::FabricationYear)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TaxiVehicle::FabricationYearLimit)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TaxiVehicle::UserId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_taxi_vehicle_user")
                            .from(TaxiVehicle::Table, TaxiVehicle::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MototaxiVehicle::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MototaxiVehicle::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MototaxiVehicle::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MototaxiVehicle::Identifier)
                            .string_len(8)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MototaxiVehicle::Plate)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MototaxiVehicle::Renavam)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MototaxiVehicle::ChassisNumber)
                            .string_len(17)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MototaxiVehicle::Brand)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MototaxiVehicle::Model)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MototaxiVehicle::Color)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MototaxiVehicle::FabricationYear)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MototaxiVehicle::FabricationYearLimit)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MototaxiVehicle::UserId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mototaxi_vehicle_user")
                            .from(MototaxiVehicle::Table, MototaxiVehicle::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MunicipalTransportVehicle::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::Identifier)
                            .string_len(8)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::Plate)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::Renavam)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::ChassisNumber)
                            .string_len(17)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::Brand)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::Model)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::Color)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::FabricationYear)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::FabricationYearLimit)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::Line)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::Capacity)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MunicipalTransportVehicle::UserId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_municipal_transport_vehicle_user")
                            .from(
                                MunicipalTransportVehicle::Table,
                                MunicipalTransportVehicle::UserId,
                            )
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IdentificationBanner::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IdentificationBanner::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IdentificationBanner::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IdentificationBanner::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IdentificationBanner::VehicleKind)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(IdentificationBanner::VehicleId).integer())
                    .col(
                        ColumnDef::new(IdentificationBanner::VehicleIdentifier)
                            .string_len(8),
                    )
                    .col(
                        ColumnDef::new(IdentificationBanner::FilePath)
                            .string_len(500),
                    )
                    .col(ColumnDef::new(IdentificationBanner::QrUrl).string_len(500))
                    .col(
                        ColumnDef::new(IdentificationBanner::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("identification_banner_vehicle_kind_vehicle_id_unique")
                    .table(IdentificationBanner::Table)
                    .col(IdentificationBanner::VehicleKind)
                    .col(IdentificationBanner::VehicleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("identification_banner_vehicle_kind_vehicle_identifier_unique")
                    .table(IdentificationBanner::Table)
                    .col(IdentificationBanner::VehicleKind)
                    .col(IdentificationBanner::VehicleIdentifier)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IdentificationBanner::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(MunicipalTransportVehicle::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(MototaxiVehicle::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaxiVehicle::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}
