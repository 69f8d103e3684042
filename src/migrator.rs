use anyhow::Result;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::prelude::*;
use std::time::Duration;
use tracing::{error, info};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_locations_table::Migration),
            Box::new(m20240101_000002_create_tools_table::Migration),
            Box::new(m20240101_000003_create_users_table::Migration),
            Box::new(m20240101_000004_create_parts_tables::Migration),
            Box::new(m20240101_000005_create_rma_tables::Migration),
            Box::new(m20240101_000006_create_passdown_tables::Migration),
            Box::new(m20240101_000007_create_track_trend_tables::Migration),
            Box::new(m20240101_000008_create_moving_parts_table::Migration),
            Box::new(m20240101_000009_create_comments_and_attachments::Migration),
            Box::new(m20240101_000010_create_settings_tables::Migration),
        ]
    }
}

mod m20240101_000001_create_locations_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Locations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Locations::Name).string().null())
                        .col(ColumnDef::new(Locations::Description).string().null())
                        .col(ColumnDef::new(Locations::Address).string().null())
                        .col(ColumnDef::new(Locations::Notes).text().null())
                        .col(ColumnDef::new(Locations::State).string().not_null())
                        .col(ColumnDef::new(Locations::Fab).string().null())
                        .col(ColumnDef::new(Locations::DisplayName).string().null())
                        .col(
                            ColumnDef::new(Locations::DefaultLocation)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Locations::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Locations::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_locations_state_fab")
                        .table(Locations::Table)
                        .col(Locations::State)
                        .col(Locations::Fab)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CustomLocations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CustomLocations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(CustomLocations::Name).string().not_null())
                        .col(ColumnDef::new(CustomLocations::Description).string().null())
                        .col(
                            ColumnDef::new(CustomLocations::LocationId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CustomLocations::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CustomLocations::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_custom_locations_location_id")
                                .from(CustomLocations::Table, CustomLocations::LocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_custom_locations_location_id")
                        .table(CustomLocations::Table)
                        .col(CustomLocations::LocationId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CustomLocations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Locations {
        Table,
        Id,
        Name,
        Description,
        Address,
        Notes,
        State,
        Fab,
        DisplayName,
        DefaultLocation,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum CustomLocations {
        Table,
        Id,
        Name,
        Description,
        LocationId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_tools_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_tools_table"
        }
    }

    /// Checklist steps; each gets a `<step>_date` and a `<step>_completed` column.
    const CHECKLIST_STEPS: [&str; 15] = [
        "commission",
        "pre_sl1",
        "sl1",
        "sl2",
        "electrical_operation_pre_sl1",
        "hazardous_energy_checklist",
        "mechanical_pre_sl1",
        "mechanical_post_sl1",
        "specific_input_functionality",
        "modes_of_operation",
        "specific_soos",
        "field_service_report",
        "certificate_of_approval",
        "turned_over_to_customer",
        "start_up_sl03",
    ];

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut tools = Table::create();
            tools
                .table(Tools::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Tools::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Tools::Name).string().not_null())
                .col(ColumnDef::new(Tools::SecondaryName).string().null())
                .col(ColumnDef::new(Tools::ToolType).string_len(32).null())
                .col(ColumnDef::new(Tools::SerialNumber1).string().null())
                .col(ColumnDef::new(Tools::SerialNumber2).string().null())
                .col(ColumnDef::new(Tools::Model1).string().null())
                .col(ColumnDef::new(Tools::Model2).string().null())
                .col(ColumnDef::new(Tools::ChemicalGasService).string().null())
                .col(ColumnDef::new(Tools::SystemName).string().null())
                .col(ColumnDef::new(Tools::EquipmentLocation).string().null())
                .col(ColumnDef::new(Tools::ConfigNumber).string().null())
                .col(ColumnDef::new(Tools::EquipmentSet).integer().null())
                .col(ColumnDef::new(Tools::ChecklistLabelsJson).text().null())
                .col(ColumnDef::new(Tools::LocationName).string().null())
                .col(ColumnDef::new(Tools::LocationId).integer().null())
                .col(
                    ColumnDef::new(Tools::Status)
                        .string_len(32)
                        .not_null()
                        .default("NOT_STARTED"),
                )
                .col(ColumnDef::new(Tools::SetDate).date().null())
                .col(ColumnDef::new(Tools::Notes).text().null())
                .col(ColumnDef::new(Tools::UploadDate).timestamp().null());

            for step in CHECKLIST_STEPS {
                tools
                    .col(ColumnDef::new(Alias::new(format!("{step}_date"))).date().null())
                    .col(
                        ColumnDef::new(Alias::new(format!("{step}_completed")))
                            .boolean()
                            .not_null()
                            .default(false),
                    );
            }

            tools
                .col(ColumnDef::new(Tools::CreatedAt).timestamp().not_null())
                .col(ColumnDef::new(Tools::UpdatedAt).timestamp().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_tools_location_id")
                        .from(Tools::Table, Tools::LocationId)
                        .to(Locations::Table, Locations::Id)
                        .on_delete(ForeignKeyAction::SetNull)
                        .on_update(ForeignKeyAction::Cascade),
                );

            manager.create_table(tools.to_owned()).await?;

            for (name, column) in [
                ("idx_tools_name", Tools::Name),
                ("idx_tools_status", Tools::Status),
                ("idx_tools_location_id", Tools::LocationId),
            ] {
                manager
                    .create_index(
                        Index::create()
                            .if_not_exists()
                            .name(name)
                            .table(Tools::Table)
                            .col(column)
                            .to_owned(),
                    )
                    .await?;
            }

            manager
                .create_table(
                    Table::create()
                        .table(ToolTags::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(ToolTags::ToolId).integer().not_null())
                        .col(ColumnDef::new(ToolTags::Tag).string().not_null())
                        .primary_key(Index::create().col(ToolTags::ToolId).col(ToolTags::Tag))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tool_tags_tool_id")
                                .from(ToolTags::Table, ToolTags::ToolId)
                                .to(Tools::Table, Tools::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ToolTags::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Tools::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Locations {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Tools {
        Table,
        Id,
        Name,
        SecondaryName,
        ToolType,
        SerialNumber1,
        SerialNumber2,
        Model1,
        Model2,
        ChemicalGasService,
        SystemName,
        EquipmentLocation,
        ConfigNumber,
        EquipmentSet,
        ChecklistLabelsJson,
        LocationName,
        LocationId,
        Status,
        SetDate,
        Notes,
        UploadDate,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ToolTags {
        Table,
        ToolId,
        Tag,
    }
}

mod m20240101_000003_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::Password).string().not_null())
                        .col(ColumnDef::new(Users::Name).string().null())
                        .col(ColumnDef::new(Users::FirstName).string().null())
                        .col(ColumnDef::new(Users::LastName).string().null())
                        .col(ColumnDef::new(Users::Role).string().null())
                        .col(ColumnDef::new(Users::Roles).string().null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Users::PhoneNumber).string().null())
                        .col(ColumnDef::new(Users::ActiveSiteId).integer().null())
                        .col(ColumnDef::new(Users::DefaultLocationId).integer().null())
                        .col(ColumnDef::new(Users::ActiveToolId).integer().null())
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_users_active_site_id")
                                .from(Users::Table, Users::ActiveSiteId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_users_default_location_id")
                                .from(Users::Table, Users::DefaultLocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_users_active_tool_id")
                                .from(Users::Table, Users::ActiveToolId)
                                .to(Tools::Table, Tools::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(UserToolAssignments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(UserToolAssignments::UserId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(UserToolAssignments::ToolId)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(UserToolAssignments::UserId)
                                .col(UserToolAssignments::ToolId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_user_tool_assignments_user_id")
                                .from(UserToolAssignments::Table, UserToolAssignments::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_user_tool_assignments_tool_id")
                                .from(UserToolAssignments::Table, UserToolAssignments::ToolId)
                                .to(Tools::Table, Tools::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ToolTechnicians::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(ToolTechnicians::ToolId).integer().not_null())
                        .col(ColumnDef::new(ToolTechnicians::UserId).integer().not_null())
                        .primary_key(
                            Index::create()
                                .col(ToolTechnicians::ToolId)
                                .col(ToolTechnicians::UserId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tool_technicians_tool_id")
                                .from(ToolTechnicians::Table, ToolTechnicians::ToolId)
                                .to(Tools::Table, Tools::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tool_technicians_user_id")
                                .from(ToolTechnicians::Table, ToolTechnicians::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ToolTechnicians::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(UserToolAssignments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Locations {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Tools {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Email,
        Password,
        Name,
        FirstName,
        LastName,
        Role,
        Roles,
        Active,
        PhoneNumber,
        ActiveSiteId,
        DefaultLocationId,
        ActiveToolId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum UserToolAssignments {
        Table,
        UserId,
        ToolId,
    }

    #[derive(DeriveIden)]
    enum ToolTechnicians {
        Table,
        ToolId,
        UserId,
    }
}

mod m20240101_000004_create_parts_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_parts_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Parts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Parts::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Parts::Name).string().not_null())
                        .col(
                            ColumnDef::new(Parts::PartNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Parts::Description).string().null())
                        .col(ColumnDef::new(Parts::Manufacturer).string().null())
                        .col(ColumnDef::new(Parts::LocationId).integer().null())
                        .col(
                            ColumnDef::new(Parts::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Parts::Category).string_len(32).null())
                        .col(
                            ColumnDef::new(Parts::MinimumQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Parts::UnitCost).double().null())
                        .col(ColumnDef::new(Parts::Supplier).string().null())
                        .col(ColumnDef::new(Parts::LastOrderDate).date().null())
                        .col(
                            ColumnDef::new(Parts::ReplacementRequired)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Parts::Notes).string_len(1000).null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_parts_location_id")
                                .from(Parts::Table, Parts::LocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PartMovements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PartMovements::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PartMovements::ToolId).integer().not_null())
                        .col(ColumnDef::new(PartMovements::PartId).integer().not_null())
                        .col(
                            ColumnDef::new(PartMovements::MovementType)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PartMovements::Quantity)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(PartMovements::Timestamp)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PartMovements::SourceDestination)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(PartMovements::Comments).text().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_part_movements_tool_id")
                                .from(PartMovements::Table, PartMovements::ToolId)
                                .to(Tools::Table, Tools::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_part_movements_part_id")
                                .from(PartMovements::Table, PartMovements::PartId)
                                .to(Parts::Table, Parts::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_part_movements_tool_id")
                        .table(PartMovements::Table)
                        .col(PartMovements::ToolId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PartMovements::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Parts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Locations {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Tools {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Parts {
        Table,
        Id,
        Name,
        PartNumber,
        Description,
        Manufacturer,
        LocationId,
        Quantity,
        Category,
        MinimumQuantity,
        UnitCost,
        Supplier,
        LastOrderDate,
        ReplacementRequired,
        Notes,
    }

    #[derive(DeriveIden)]
    enum PartMovements {
        Table,
        Id,
        ToolId,
        PartId,
        MovementType,
        Quantity,
        Timestamp,
        SourceDestination,
        Comments,
    }
}

mod m20240101_000005_create_rma_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_rma_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut rmas = Table::create();
            rmas.table(Rmas::Table).if_not_exists().col(
                ColumnDef::new(Rmas::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            );

            for column in [
                Rmas::RmaNumber,
                Rmas::CustomerName,
                Rmas::CustomerContact,
                Rmas::CustomerEmail,
                Rmas::CustomerPhone,
                Rmas::CompanyShipToName,
                Rmas::CompanyShipToAddress,
                Rmas::City,
                Rmas::State,
                Rmas::ZipCode,
                Rmas::Attn,
                Rmas::SerialNumber,
                Rmas::Technician,
                Rmas::FieldTechName,
                Rmas::FieldTechPhone,
                Rmas::FieldTechEmail,
                Rmas::DiscoveredBy,
                Rmas::SalesOrder,
                Rmas::SapNotificationNumber,
                Rmas::ServiceOrder,
                Rmas::LaborChargeNumber,
                Rmas::PartsSourceLocation,
            ] {
                rmas.col(ColumnDef::new(column).string().null());
            }

            for column in [
                Rmas::Description,
                Rmas::RootCause,
                Rmas::Resolution,
                Rmas::Notes,
                Rmas::WhyHow,
                Rmas::HowContained,
                Rmas::InstructionsForExposedComponent,
            ] {
                rmas.col(ColumnDef::new(column).text().null());
            }

            for column in [
                Rmas::ExcelFileAttached,
                Rmas::ShippingMemoEmailed,
                Rmas::InterruptionToFlow,
                Rmas::InterruptionToProduction,
                Rmas::ExposedToProcessGasOrChemicals,
                Rmas::Purged,
            ] {
                rmas.col(ColumnDef::new(column).boolean().not_null().default(false));
            }

            for column in [
                Rmas::ReceivedDate,
                Rmas::WrittenDate,
                Rmas::RmaNumberProvidedDate,
                Rmas::ShippingMemoEmailedDate,
                Rmas::PartsReceivedDate,
                Rmas::FailedPartsShippedDate,
                Rmas::InstalledPartsDate,
                Rmas::FailedPartsPackedDate,
            ] {
                rmas.col(ColumnDef::new(column).date().null());
            }

            rmas.col(
                ColumnDef::new(Rmas::Status)
                    .string_len(32)
                    .not_null()
                    .default("RMA_WRITTEN_EMAILED"),
            )
            .col(
                ColumnDef::new(Rmas::Priority)
                    .string_len(16)
                    .not_null()
                    .default("MEDIUM"),
            )
            .col(ColumnDef::new(Rmas::ReasonForRequest).string_len(48).null())
            .col(ColumnDef::new(Rmas::DssProductLine).string_len(48).null())
            .col(ColumnDef::new(Rmas::SystemDescription).string_len(32).null())
            .col(
                ColumnDef::new(Rmas::DowntimeHours)
                    .double()
                    .not_null()
                    .default(0.0),
            )
            .col(ColumnDef::new(Rmas::LocationId).integer().null())
            .col(ColumnDef::new(Rmas::ToolId).integer().null())
            .col(ColumnDef::new(Rmas::CreatedById).integer().null())
            .col(ColumnDef::new(Rmas::CreatedDate).timestamp().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_rmas_location_id")
                    .from(Rmas::Table, Rmas::LocationId)
                    .to(Locations::Table, Locations::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_rmas_tool_id")
                    .from(Rmas::Table, Rmas::ToolId)
                    .to(Tools::Table, Tools::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_rmas_created_by_id")
                    .from(Rmas::Table, Rmas::CreatedById)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            );

            manager.create_table(rmas.to_owned()).await?;

            for (name, column) in [
                ("idx_rmas_status", Rmas::Status),
                ("idx_rmas_tool_id", Rmas::ToolId),
                ("idx_rmas_rma_number", Rmas::RmaNumber),
            ] {
                manager
                    .create_index(
                        Index::create()
                            .if_not_exists()
                            .name(name)
                            .table(Rmas::Table)
                            .col(column)
                            .to_owned(),
                    )
                    .await?;
            }

            manager
                .create_table(
                    Table::create()
                        .table(RmaParts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(RmaParts::RmaId).integer().not_null())
                        .col(ColumnDef::new(RmaParts::PartId).integer().not_null())
                        .primary_key(Index::create().col(RmaParts::RmaId).col(RmaParts::PartId))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_rma_parts_rma_id")
                                .from(RmaParts::Table, RmaParts::RmaId)
                                .to(Rmas::Table, Rmas::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_rma_parts_part_id")
                                .from(RmaParts::Table, RmaParts::PartId)
                                .to(Parts::Table, Parts::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RmaPartLineItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RmaPartLineItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(RmaPartLineItems::RmaId).integer().not_null())
                        .col(ColumnDef::new(RmaPartLineItems::PartName).string().null())
                        .col(ColumnDef::new(RmaPartLineItems::PartNumber).string().null())
                        .col(
                            ColumnDef::new(RmaPartLineItems::ProductDescription)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RmaPartLineItems::Quantity)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(RmaPartLineItems::ReplacementRequired)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_rma_part_line_items_rma_id")
                                .from(RmaPartLineItems::Table, RmaPartLineItems::RmaId)
                                .to(Rmas::Table, Rmas::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RmaLaborEntries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RmaLaborEntries::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(RmaLaborEntries::RmaId).integer().not_null())
                        .col(ColumnDef::new(RmaLaborEntries::Description).text().null())
                        .col(ColumnDef::new(RmaLaborEntries::Technician).string().null())
                        .col(
                            ColumnDef::new(RmaLaborEntries::Hours)
                                .decimal_len(8, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(RmaLaborEntries::LaborDate).date().null())
                        .col(
                            ColumnDef::new(RmaLaborEntries::PricePerHour)
                                .decimal_len(8, 2)
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_rma_labor_entries_rma_id")
                                .from(RmaLaborEntries::Table, RmaLaborEntries::RmaId)
                                .to(Rmas::Table, Rmas::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RmaLaborEntries::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RmaPartLineItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RmaParts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Rmas::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Locations {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Tools {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Parts {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Rmas {
        Table,
        Id,
        RmaNumber,
        CustomerName,
        CustomerContact,
        CustomerEmail,
        CustomerPhone,
        CompanyShipToName,
        CompanyShipToAddress,
        City,
        State,
        ZipCode,
        Attn,
        SerialNumber,
        Status,
        Priority,
        ReasonForRequest,
        DssProductLine,
        SystemDescription,
        Description,
        RootCause,
        Resolution,
        Notes,
        LocationId,
        Technician,
        ToolId,
        CreatedById,
        FieldTechName,
        FieldTechPhone,
        FieldTechEmail,
        DiscoveredBy,
        WhyHow,
        HowContained,
        SalesOrder,
        SapNotificationNumber,
        ServiceOrder,
        LaborChargeNumber,
        PartsSourceLocation,
        ExcelFileAttached,
        ShippingMemoEmailed,
        InterruptionToFlow,
        InterruptionToProduction,
        DowntimeHours,
        ExposedToProcessGasOrChemicals,
        Purged,
        InstructionsForExposedComponent,
        ReceivedDate,
        WrittenDate,
        RmaNumberProvidedDate,
        ShippingMemoEmailedDate,
        PartsReceivedDate,
        FailedPartsShippedDate,
        InstalledPartsDate,
        FailedPartsPackedDate,
        CreatedDate,
    }

    #[derive(DeriveIden)]
    enum RmaParts {
        Table,
        RmaId,
        PartId,
    }

    #[derive(DeriveIden)]
    enum RmaPartLineItems {
        Table,
        Id,
        RmaId,
        PartName,
        PartNumber,
        ProductDescription,
        Quantity,
        ReplacementRequired,
    }

    #[derive(DeriveIden)]
    enum RmaLaborEntries {
        Table,
        Id,
        RmaId,
        Description,
        Technician,
        Hours,
        LaborDate,
        PricePerHour,
    }
}

mod m20240101_000006_create_passdown_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_passdown_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Passdowns::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Passdowns::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Passdowns::Comment).string_len(10000).null())
                        .col(ColumnDef::new(Passdowns::Date).date().null())
                        .col(ColumnDef::new(Passdowns::UserId).integer().null())
                        .col(ColumnDef::new(Passdowns::CreatedDate).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_passdowns_user_id")
                                .from(Passdowns::Table, Passdowns::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_passdowns_date")
                        .table(Passdowns::Table)
                        .col(Passdowns::Date)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PassdownTools::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(PassdownTools::PassdownId).integer().not_null())
                        .col(ColumnDef::new(PassdownTools::ToolId).integer().not_null())
                        .primary_key(
                            Index::create()
                                .col(PassdownTools::PassdownId)
                                .col(PassdownTools::ToolId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_passdown_tools_passdown_id")
                                .from(PassdownTools::Table, PassdownTools::PassdownId)
                                .to(Passdowns::Table, Passdowns::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_passdown_tools_tool_id")
                                .from(PassdownTools::Table, PassdownTools::ToolId)
                                .to(Tools::Table, Tools::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PassdownTechs::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(PassdownTechs::PassdownId).integer().not_null())
                        .col(ColumnDef::new(PassdownTechs::UserId).integer().not_null())
                        .primary_key(
                            Index::create()
                                .col(PassdownTechs::PassdownId)
                                .col(PassdownTechs::UserId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_passdown_techs_passdown_id")
                                .from(PassdownTechs::Table, PassdownTechs::PassdownId)
                                .to(Passdowns::Table, Passdowns::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_passdown_techs_user_id")
                                .from(PassdownTechs::Table, PassdownTechs::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PassdownTechs::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PassdownTools::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Passdowns::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Tools {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Passdowns {
        Table,
        Id,
        Comment,
        Date,
        UserId,
        CreatedDate,
    }

    #[derive(DeriveIden)]
    enum PassdownTools {
        Table,
        PassdownId,
        ToolId,
    }

    #[derive(DeriveIden)]
    enum PassdownTechs {
        Table,
        PassdownId,
        UserId,
    }
}

mod m20240101_000007_create_track_trend_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_track_trend_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TrackTrends::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TrackTrends::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(TrackTrends::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(TrackTrends::Description).string_len(1000).null())
                        .col(ColumnDef::new(TrackTrends::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(TrackTrends::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TrackTrendTools::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TrackTrendTools::TrackTrendId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TrackTrendTools::ToolId).integer().not_null())
                        .primary_key(
                            Index::create()
                                .col(TrackTrendTools::TrackTrendId)
                                .col(TrackTrendTools::ToolId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_track_trend_tools_track_trend_id")
                                .from(TrackTrendTools::Table, TrackTrendTools::TrackTrendId)
                                .to(TrackTrends::Table, TrackTrends::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_track_trend_tools_tool_id")
                                .from(TrackTrendTools::Table, TrackTrendTools::ToolId)
                                .to(Tools::Table, Tools::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TrackTrendRelations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TrackTrendRelations::TrackTrendId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TrackTrendRelations::RelatedTrackTrendId)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(TrackTrendRelations::TrackTrendId)
                                .col(TrackTrendRelations::RelatedTrackTrendId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_track_trend_relations_track_trend_id")
                                .from(TrackTrendRelations::Table, TrackTrendRelations::TrackTrendId)
                                .to(TrackTrends::Table, TrackTrends::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_track_trend_relations_related_id")
                                .from(
                                    TrackTrendRelations::Table,
                                    TrackTrendRelations::RelatedTrackTrendId,
                                )
                                .to(TrackTrends::Table, TrackTrends::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TrackTrendRelations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TrackTrendTools::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TrackTrends::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Tools {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum TrackTrends {
        Table,
        Id,
        Name,
        Description,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum TrackTrendTools {
        Table,
        TrackTrendId,
        ToolId,
    }

    #[derive(DeriveIden)]
    enum TrackTrendRelations {
        Table,
        TrackTrendId,
        RelatedTrackTrendId,
    }
}

mod m20240101_000008_create_moving_parts_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_moving_parts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MovingParts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MovingParts::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(MovingParts::PartName).string().not_null())
                        .col(ColumnDef::new(MovingParts::FromToolId).integer().null())
                        .col(ColumnDef::new(MovingParts::FromCustomLocation).string().null())
                        .col(
                            ColumnDef::new(MovingParts::FromCustomLocationId)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(MovingParts::ToToolId).integer().null())
                        .col(ColumnDef::new(MovingParts::ToCustomLocationId).integer().null())
                        .col(ColumnDef::new(MovingParts::DestinationChain).text().null())
                        .col(ColumnDef::new(MovingParts::ToCustomLocations).text().null())
                        .col(ColumnDef::new(MovingParts::MoveDate).timestamp().not_null())
                        .col(ColumnDef::new(MovingParts::Notes).string_len(1000).null())
                        .col(ColumnDef::new(MovingParts::AdditionalNotes).text().null())
                        .col(ColumnDef::new(MovingParts::RmaId).integer().null())
                        .col(ColumnDef::new(MovingParts::LinkedTrackTrendId).integer().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_moving_parts_from_tool_id")
                                .from(MovingParts::Table, MovingParts::FromToolId)
                                .to(Tools::Table, Tools::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_moving_parts_to_tool_id")
                                .from(MovingParts::Table, MovingParts::ToToolId)
                                .to(Tools::Table, Tools::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_moving_parts_from_custom_location_id")
                                .from(MovingParts::Table, MovingParts::FromCustomLocationId)
                                .to(CustomLocations::Table, CustomLocations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_moving_parts_to_custom_location_id")
                                .from(MovingParts::Table, MovingParts::ToCustomLocationId)
                                .to(CustomLocations::Table, CustomLocations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_moving_parts_rma_id")
                                .from(MovingParts::Table, MovingParts::RmaId)
                                .to(Rmas::Table, Rmas::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_moving_parts_track_trend_id")
                                .from(MovingParts::Table, MovingParts::LinkedTrackTrendId)
                                .to(TrackTrends::Table, TrackTrends::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            for (name, column) in [
                ("idx_moving_parts_from_tool_id", MovingParts::FromToolId),
                ("idx_moving_parts_rma_id", MovingParts::RmaId),
            ] {
                manager
                    .create_index(
                        Index::create()
                            .if_not_exists()
                            .name(name)
                            .table(MovingParts::Table)
                            .col(column)
                            .to_owned(),
                    )
                    .await?;
            }
            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MovingParts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Tools {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum CustomLocations {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Rmas {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum TrackTrends {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum MovingParts {
        Table,
        Id,
        PartName,
        FromToolId,
        FromCustomLocation,
        FromCustomLocationId,
        ToToolId,
        ToCustomLocationId,
        DestinationChain,
        ToCustomLocations,
        MoveDate,
        Notes,
        AdditionalNotes,
        RmaId,
        LinkedTrackTrendId,
    }
}

mod m20240101_000009_create_comments_and_attachments {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000009_create_comments_and_attachments"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Comments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Comments::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Comments::OwnerKind).string_len(16).not_null())
                        .col(ColumnDef::new(Comments::OwnerId).integer().not_null())
                        .col(ColumnDef::new(Comments::Content).string_len(2000).not_null())
                        .col(ColumnDef::new(Comments::UserId).integer().null())
                        .col(
                            ColumnDef::new(Comments::SystemGenerated)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Comments::CreatedDate).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_comments_user_id")
                                .from(Comments::Table, Comments::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_comments_owner")
                        .table(Comments::Table)
                        .col(Comments::OwnerKind)
                        .col(Comments::OwnerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Attachments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Attachments::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Attachments::OwnerKind).string_len(16).not_null())
                        .col(ColumnDef::new(Attachments::OwnerId).integer().not_null())
                        .col(ColumnDef::new(Attachments::Kind).string_len(16).not_null())
                        .col(ColumnDef::new(Attachments::FileName).string().not_null())
                        .col(ColumnDef::new(Attachments::FilePath).string().not_null())
                        .col(ColumnDef::new(Attachments::FileType).string().null())
                        .col(ColumnDef::new(Attachments::FileSize).big_integer().null())
                        .col(ColumnDef::new(Attachments::Tag).string().null())
                        .col(ColumnDef::new(Attachments::UploadedBy).string().null())
                        .col(ColumnDef::new(Attachments::UploadedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_attachments_owner_path")
                        .table(Attachments::Table)
                        .col(Attachments::OwnerKind)
                        .col(Attachments::OwnerId)
                        .col(Attachments::FilePath)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Attachments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Comments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Comments {
        Table,
        Id,
        OwnerKind,
        OwnerId,
        Content,
        UserId,
        SystemGenerated,
        CreatedDate,
    }

    #[derive(DeriveIden)]
    enum Attachments {
        Table,
        Id,
        OwnerKind,
        OwnerId,
        Kind,
        FileName,
        FilePath,
        FileType,
        FileSize,
        Tag,
        UploadedBy,
        UploadedAt,
    }
}

mod m20240101_000010_create_settings_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000010_create_settings_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ToolChecklistTemplates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ToolChecklistTemplates::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ToolChecklistTemplates::ToolType)
                                .string_len(32)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(ToolChecklistTemplates::ItemsJson)
                                .text()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ToolChecklistTemplates::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ReturnAddresses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ReturnAddresses::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ReturnAddresses::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(ReturnAddresses::Address).text().not_null())
                        .col(ColumnDef::new(ReturnAddresses::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(ReturnAddresses::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ReturnAddresses::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ToolChecklistTemplates::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ToolChecklistTemplates {
        Table,
        Id,
        ToolType,
        ItemsJson,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ReturnAddresses {
        Table,
        Id,
        Name,
        Address,
        CreatedAt,
        UpdatedAt,
    }
}

// Database migration CLI runner
pub async fn run_migration(db_url: &str) -> Result<()> {
    info!("Setting up database connection for migrations");

    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(5)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;

    info!("Running database migrations");

    match Migrator::up(&db, None).await {
        Ok(_) => {
            info!("Migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Migration failed: {}", e);
            Err(e.into())
        }
    }
}
