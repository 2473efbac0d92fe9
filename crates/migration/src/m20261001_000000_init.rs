//! Initial schema of the studio backend.
//!
//! - `accounts`: clients, trainers and admins, with the session credit balance
//! - `client_trainer_assignments`: which trainer may act for which client
//! - `storefront_items`, `purchase_orders`, `order_line_items`: the shop
//! - `commission_records`: one split per completed order with a trainer
//! - `exercises`: the exercise library, unique by normalized name
//! - `workout_sessions`, `workout_log_rows`: logged workouts and their sets
//! - `workout_plans`, `workout_plan_days`, `workout_plan_exercises`
//! - `training_sessions`: booked sessions consumed by the deduction pass

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    DisplayName,
    Email,
    Role,
    ApiTokenHash,
    SessionsRemaining,
    TotalSessionsAllocated,
    CreatedAt,
}

#[derive(Iden)]
enum ClientTrainerAssignments {
    Table,
    Id,
    ClientId,
    TrainerId,
    Status,
    AssignedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StorefrontItems {
    Table,
    Id,
    Name,
    Sessions,
    PriceMinor,
    Active,
    CreatedAt,
}

#[derive(Iden)]
enum PurchaseOrders {
    Table,
    Id,
    ClientId,
    TrainerId,
    Status,
    LeadSource,
    Jurisdiction,
    AbsorbTax,
    SubtotalMinor,
    TaxMinor,
    TaxRateBps,
    TotalMinor,
    TaxChargedToClient,
    BusinessCutMinor,
    TrainerCutMinor,
    BusinessRateBps,
    TrainerRateBps,
    LoyaltyBump,
    SessionsGranted,
    CreatedBy,
    CreatedAt,
    CompletedAt,
    CancelledAt,
    PaymentReference,
}

#[derive(Iden)]
enum OrderLineItems {
    Table,
    Id,
    OrderId,
    StorefrontItemId,
    Name,
    Quantity,
    UnitPriceMinor,
    SessionsPerUnit,
    SubtotalMinor,
}

#[derive(Iden)]
enum CommissionRecords {
    Table,
    Id,
    OrderId,
    TrainerId,
    LeadSource,
    GrossMinor,
    TaxMinor,
    NetAfterTaxMinor,
    BusinessCutMinor,
    TrainerCutMinor,
    BusinessRateBps,
    TrainerRateBps,
    IsLoyaltyBump,
    SessionsGranted,
    CreatedAt,
}

#[derive(Iden)]
enum Exercises {
    Table,
    Id,
    Name,
    NormalizedName,
    BodyRegion,
    CreatedAt,
}

#[derive(Iden)]
enum WorkoutSessions {
    Table,
    Id,
    ClientId,
    LoggedBy,
    Title,
    Date,
    DurationMinutes,
    Intensity,
    Notes,
    TotalSets,
    TotalReps,
    TotalWeightCenti,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum WorkoutLogRows {
    Table,
    Id,
    SessionId,
    Position,
    ExerciseId,
    ExerciseName,
    SetNumber,
    Reps,
    WeightCenti,
    PainLevel,
    BodyRegion,
    CreatedAt,
}

#[derive(Iden)]
enum WorkoutPlans {
    Table,
    Id,
    ClientId,
    CreatedBy,
    Title,
    Summary,
    DurationWeeks,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum WorkoutPlanDays {
    Table,
    Id,
    PlanId,
    DayNumber,
    Name,
    Focus,
    DayType,
    OptPhase,
    EstimatedDuration,
}

#[derive(Iden)]
enum WorkoutPlanExercises {
    Table,
    Id,
    DayId,
    ExerciseId,
    OrderInWorkout,
    SetScheme,
    RepGoal,
    RestPeriod,
    Tempo,
    IntensityGuideline,
    Notes,
    IsOptional,
}

#[derive(Iden)]
enum TrainingSessions {
    Table,
    Id,
    ClientId,
    TrainerId,
    ScheduledAt,
    Status,
    Deducted,
    DeductedAt,
    Notes,
    CreatedAt,
}

fn id_col<T: Iden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col).string().not_null().primary_key().to_owned()
}

fn to_account<T: Iden + 'static>(name: &str, table: impl Iden + 'static, col: T) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, col)
        .to(Accounts::Table, Accounts::Id)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Accounts
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(id_col(Accounts::Id))
                    .col(ColumnDef::new(Accounts::DisplayName).string().not_null())
                    .col(ColumnDef::new(Accounts::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Accounts::Role).string().not_null())
                    .col(ColumnDef::new(Accounts::ApiTokenHash).string())
                    .col(
                        ColumnDef::new(Accounts::SessionsRemaining)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Accounts::TotalSessionsAllocated)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Accounts::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-api_token_hash")
                    .table(Accounts::Table)
                    .col(Accounts::ApiTokenHash)
                    .to_owned(),
            )
            .await?;

        // Assignments
        manager
            .create_table(
                Table::create()
                    .table(ClientTrainerAssignments::Table)
                    .if_not_exists()
                    .col(id_col(ClientTrainerAssignments::Id))
                    .col(ColumnDef::new(ClientTrainerAssignments::ClientId).string().not_null())
                    .col(ColumnDef::new(ClientTrainerAssignments::TrainerId).string().not_null())
                    .col(ColumnDef::new(ClientTrainerAssignments::Status).string().not_null())
                    .col(ColumnDef::new(ClientTrainerAssignments::AssignedBy).string().not_null())
                    .col(
                        ColumnDef::new(ClientTrainerAssignments::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClientTrainerAssignments::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(&mut to_account(
                        "fk-assignments-client_id",
                        ClientTrainerAssignments::Table,
                        ClientTrainerAssignments::ClientId,
                    ))
                    .foreign_key(&mut to_account(
                        "fk-assignments-trainer_id",
                        ClientTrainerAssignments::Table,
                        ClientTrainerAssignments::TrainerId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-assignments-trainer_id-client_id-status")
                    .table(ClientTrainerAssignments::Table)
                    .col(ClientTrainerAssignments::TrainerId)
                    .col(ClientTrainerAssignments::ClientId)
                    .col(ClientTrainerAssignments::Status)
                    .to_owned(),
            )
            .await?;

        // Storefront
        manager
            .create_table(
                Table::create()
                    .table(StorefrontItems::Table)
                    .if_not_exists()
                    .col(id_col(StorefrontItems::Id))
                    .col(ColumnDef::new(StorefrontItems::Name).string().not_null())
                    .col(ColumnDef::new(StorefrontItems::Sessions).big_integer().not_null())
                    .col(ColumnDef::new(StorefrontItems::PriceMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(StorefrontItems::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(StorefrontItems::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Orders
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(id_col(PurchaseOrders::Id))
                    .col(ColumnDef::new(PurchaseOrders::ClientId).string().not_null())
                    .col(ColumnDef::new(PurchaseOrders::TrainerId).string())
                    .col(ColumnDef::new(PurchaseOrders::Status).string().not_null())
                    .col(ColumnDef::new(PurchaseOrders::LeadSource).string().not_null())
                    .col(ColumnDef::new(PurchaseOrders::Jurisdiction).string())
                    .col(ColumnDef::new(PurchaseOrders::AbsorbTax).boolean().not_null())
                    .col(ColumnDef::new(PurchaseOrders::SubtotalMinor).big_integer().not_null())
                    .col(ColumnDef::new(PurchaseOrders::TaxMinor).big_integer().not_null())
                    .col(ColumnDef::new(PurchaseOrders::TaxRateBps).big_integer().not_null())
                    .col(ColumnDef::new(PurchaseOrders::TotalMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrders::TaxChargedToClient)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::BusinessCutMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::TrainerCutMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::BusinessRateBps)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::TrainerRateBps)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::LoyaltyBump).boolean().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrders::SessionsGranted)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::CreatedBy).string().not_null())
                    .col(ColumnDef::new(PurchaseOrders::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(PurchaseOrders::CompletedAt).timestamp())
                    .col(ColumnDef::new(PurchaseOrders::CancelledAt).timestamp())
                    .col(ColumnDef::new(PurchaseOrders::PaymentReference).string())
                    .foreign_key(&mut to_account(
                        "fk-purchase_orders-client_id",
                        PurchaseOrders::Table,
                        PurchaseOrders::ClientId,
                    ))
                    .foreign_key(&mut to_account(
                        "fk-purchase_orders-trainer_id",
                        PurchaseOrders::Table,
                        PurchaseOrders::TrainerId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-purchase_orders-client_id")
                    .table(PurchaseOrders::Table)
                    .col(PurchaseOrders::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderLineItems::Table)
                    .if_not_exists()
                    .col(id_col(OrderLineItems::Id))
                    .col(ColumnDef::new(OrderLineItems::OrderId).string().not_null())
                    .col(ColumnDef::new(OrderLineItems::StorefrontItemId).string().not_null())
                    .col(ColumnDef::new(OrderLineItems::Name).string().not_null())
                    .col(ColumnDef::new(OrderLineItems::Quantity).big_integer().not_null())
                    .col(ColumnDef::new(OrderLineItems::UnitPriceMinor).big_integer().not_null())
                    .col(ColumnDef::new(OrderLineItems::SessionsPerUnit).big_integer().not_null())
                    .col(ColumnDef::new(OrderLineItems::SubtotalMinor).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_line_items-order_id")
                            .from(OrderLineItems::Table, OrderLineItems::OrderId)
                            .to(PurchaseOrders::Table, PurchaseOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_line_items-storefront_item_id")
                            .from(OrderLineItems::Table, OrderLineItems::StorefrontItemId)
                            .to(StorefrontItems::Table, StorefrontItems::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Commissions
        manager
            .create_table(
                Table::create()
                    .table(CommissionRecords::Table)
                    .if_not_exists()
                    .col(id_col(CommissionRecords::Id))
                    .col(
                        ColumnDef::new(CommissionRecords::OrderId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CommissionRecords::TrainerId).string().not_null())
                    .col(ColumnDef::new(CommissionRecords::LeadSource).string().not_null())
                    .col(ColumnDef::new(CommissionRecords::GrossMinor).big_integer().not_null())
                    .col(ColumnDef::new(CommissionRecords::TaxMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(CommissionRecords::NetAfterTaxMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::BusinessCutMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::TrainerCutMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::BusinessRateBps)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::TrainerRateBps)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CommissionRecords::IsLoyaltyBump).boolean().not_null())
                    .col(
                        ColumnDef::new(CommissionRecords::SessionsGranted)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CommissionRecords::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-commission_records-order_id")
                            .from(CommissionRecords::Table, CommissionRecords::OrderId)
                            .to(PurchaseOrders::Table, PurchaseOrders::Id),
                    )
                    .foreign_key(&mut to_account(
                        "fk-commission_records-trainer_id",
                        CommissionRecords::Table,
                        CommissionRecords::TrainerId,
                    ))
                    .to_owned(),
            )
            .await?;

        // Exercise library
        manager
            .create_table(
                Table::create()
                    .table(Exercises::Table)
                    .if_not_exists()
                    .col(id_col(Exercises::Id))
                    .col(ColumnDef::new(Exercises::Name).string().not_null())
                    .col(
                        ColumnDef::new(Exercises::NormalizedName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Exercises::BodyRegion).string())
                    .col(ColumnDef::new(Exercises::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Workouts
        manager
            .create_table(
                Table::create()
                    .table(WorkoutSessions::Table)
                    .if_not_exists()
                    .col(id_col(WorkoutSessions::Id))
                    .col(ColumnDef::new(WorkoutSessions::ClientId).string().not_null())
                    .col(ColumnDef::new(WorkoutSessions::LoggedBy).string().not_null())
                    .col(ColumnDef::new(WorkoutSessions::Title).string().not_null())
                    .col(ColumnDef::new(WorkoutSessions::Date).timestamp().not_null())
                    .col(
                        ColumnDef::new(WorkoutSessions::DurationMinutes)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkoutSessions::Intensity).big_integer().not_null())
                    .col(ColumnDef::new(WorkoutSessions::Notes).string())
                    .col(
                        ColumnDef::new(WorkoutSessions::TotalSets)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WorkoutSessions::TotalReps)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WorkoutSessions::TotalWeightCenti)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(WorkoutSessions::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(WorkoutSessions::DeletedAt).timestamp())
                    .foreign_key(&mut to_account(
                        "fk-workout_sessions-client_id",
                        WorkoutSessions::Table,
                        WorkoutSessions::ClientId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-workout_sessions-client_id-created_at")
                    .table(WorkoutSessions::Table)
                    .col(WorkoutSessions::ClientId)
                    .col(WorkoutSessions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkoutLogRows::Table)
                    .if_not_exists()
                    .col(id_col(WorkoutLogRows::Id))
                    .col(ColumnDef::new(WorkoutLogRows::SessionId).string().not_null())
                    .col(ColumnDef::new(WorkoutLogRows::Position).big_integer().not_null())
                    .col(ColumnDef::new(WorkoutLogRows::ExerciseId).string())
                    .col(ColumnDef::new(WorkoutLogRows::ExerciseName).string().not_null())
                    .col(ColumnDef::new(WorkoutLogRows::SetNumber).big_integer().not_null())
                    .col(ColumnDef::new(WorkoutLogRows::Reps).big_integer().not_null())
                    .col(ColumnDef::new(WorkoutLogRows::WeightCenti).big_integer().not_null())
                    .col(ColumnDef::new(WorkoutLogRows::PainLevel).big_integer())
                    .col(ColumnDef::new(WorkoutLogRows::BodyRegion).string())
                    .col(ColumnDef::new(WorkoutLogRows::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-workout_log_rows-session_id")
                            .from(WorkoutLogRows::Table, WorkoutLogRows::SessionId)
                            .to(WorkoutSessions::Table, WorkoutSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-workout_log_rows-exercise_id")
                            .from(WorkoutLogRows::Table, WorkoutLogRows::ExerciseId)
                            .to(Exercises::Table, Exercises::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-workout_log_rows-session-exercise-set-unique")
                    .table(WorkoutLogRows::Table)
                    .col(WorkoutLogRows::SessionId)
                    .col(WorkoutLogRows::ExerciseName)
                    .col(WorkoutLogRows::SetNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Plans
        manager
            .create_table(
                Table::create()
                    .table(WorkoutPlans::Table)
                    .if_not_exists()
                    .col(id_col(WorkoutPlans::Id))
                    .col(ColumnDef::new(WorkoutPlans::ClientId).string().not_null())
                    .col(ColumnDef::new(WorkoutPlans::CreatedBy).string().not_null())
                    .col(ColumnDef::new(WorkoutPlans::Title).string().not_null())
                    .col(ColumnDef::new(WorkoutPlans::Summary).string().not_null())
                    .col(ColumnDef::new(WorkoutPlans::DurationWeeks).big_integer().not_null())
                    .col(ColumnDef::new(WorkoutPlans::Status).string().not_null())
                    .col(ColumnDef::new(WorkoutPlans::CreatedAt).timestamp().not_null())
                    .foreign_key(&mut to_account(
                        "fk-workout_plans-client_id",
                        WorkoutPlans::Table,
                        WorkoutPlans::ClientId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkoutPlanDays::Table)
                    .if_not_exists()
                    .col(id_col(WorkoutPlanDays::Id))
                    .col(ColumnDef::new(WorkoutPlanDays::PlanId).string().not_null())
                    .col(ColumnDef::new(WorkoutPlanDays::DayNumber).big_integer().not_null())
                    .col(ColumnDef::new(WorkoutPlanDays::Name).string().not_null())
                    .col(ColumnDef::new(WorkoutPlanDays::Focus).string())
                    .col(ColumnDef::new(WorkoutPlanDays::DayType).string().not_null())
                    .col(ColumnDef::new(WorkoutPlanDays::OptPhase).string())
                    .col(ColumnDef::new(WorkoutPlanDays::EstimatedDuration).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-workout_plan_days-plan_id")
                            .from(WorkoutPlanDays::Table, WorkoutPlanDays::PlanId)
                            .to(WorkoutPlans::Table, WorkoutPlans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkoutPlanExercises::Table)
                    .if_not_exists()
                    .col(id_col(WorkoutPlanExercises::Id))
                    .col(ColumnDef::new(WorkoutPlanExercises::DayId).string().not_null())
                    .col(ColumnDef::new(WorkoutPlanExercises::ExerciseId).string().not_null())
                    .col(
                        ColumnDef::new(WorkoutPlanExercises::OrderInWorkout)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkoutPlanExercises::SetScheme).string())
                    .col(ColumnDef::new(WorkoutPlanExercises::RepGoal).string())
                    .col(ColumnDef::new(WorkoutPlanExercises::RestPeriod).big_integer())
                    .col(ColumnDef::new(WorkoutPlanExercises::Tempo).string())
                    .col(ColumnDef::new(WorkoutPlanExercises::IntensityGuideline).string())
                    .col(ColumnDef::new(WorkoutPlanExercises::Notes).string())
                    .col(
                        ColumnDef::new(WorkoutPlanExercises::IsOptional)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-workout_plan_exercises-day_id")
                            .from(WorkoutPlanExercises::Table, WorkoutPlanExercises::DayId)
                            .to(WorkoutPlanDays::Table, WorkoutPlanDays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-workout_plan_exercises-exercise_id")
                            .from(WorkoutPlanExercises::Table, WorkoutPlanExercises::ExerciseId)
                            .to(Exercises::Table, Exercises::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Training sessions
        manager
            .create_table(
                Table::create()
                    .table(TrainingSessions::Table)
                    .if_not_exists()
                    .col(id_col(TrainingSessions::Id))
                    .col(ColumnDef::new(TrainingSessions::ClientId).string().not_null())
                    .col(ColumnDef::new(TrainingSessions::TrainerId).string())
                    .col(ColumnDef::new(TrainingSessions::ScheduledAt).timestamp().not_null())
                    .col(ColumnDef::new(TrainingSessions::Status).string().not_null())
                    .col(
                        ColumnDef::new(TrainingSessions::Deducted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(TrainingSessions::DeductedAt).timestamp())
                    .col(ColumnDef::new(TrainingSessions::Notes).string())
                    .col(ColumnDef::new(TrainingSessions::CreatedAt).timestamp().not_null())
                    .foreign_key(&mut to_account(
                        "fk-training_sessions-client_id",
                        TrainingSessions::Table,
                        TrainingSessions::ClientId,
                    ))
                    .foreign_key(&mut to_account(
                        "fk-training_sessions-trainer_id",
                        TrainingSessions::Table,
                        TrainingSessions::TrainerId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-training_sessions-status-scheduled_at")
                    .table(TrainingSessions::Table)
                    .col(TrainingSessions::Status)
                    .col(TrainingSessions::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse creation order, children first.
        let tables: [DynIden; 13] = [
            TrainingSessions::Table.into_iden(),
            WorkoutPlanExercises::Table.into_iden(),
            WorkoutPlanDays::Table.into_iden(),
            WorkoutPlans::Table.into_iden(),
            WorkoutLogRows::Table.into_iden(),
            WorkoutSessions::Table.into_iden(),
            Exercises::Table.into_iden(),
            CommissionRecords::Table.into_iden(),
            OrderLineItems::Table.into_iden(),
            PurchaseOrders::Table.into_iden(),
            StorefrontItems::Table.into_iden(),
            ClientTrainerAssignments::Table.into_iden(),
            Accounts::Table.into_iden(),
        ];
        for table in tables {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}
