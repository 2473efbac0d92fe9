use std::error::Error;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use engine::{
    BodyRegion, Engine, MoneyCents, NewAccount, NewExercise, NewStorefrontItem, Requester, Role,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "studio_admin")]
#[command(about = "Admin utilities for the studio backend (bootstrap accounts and catalog)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./studio.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Account(Account),
    Assign(AssignArgs),
    Exercise(ExerciseArgs),
    Package(PackageArgs),
    /// Run one session deduction pass now.
    Deduct,
}

#[derive(Args, Debug)]
struct Account {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// Create an account and print its API token.
    Create(AccountCreateArgs),
    /// Replace the API token of an account and print the new one.
    RotateToken(AccountEmailArgs),
}

#[derive(Args, Debug)]
struct AccountCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long, value_parser = parse_role)]
    role: Role,
}

#[derive(Args, Debug)]
struct AccountEmailArgs {
    #[arg(long)]
    email: String,
}

/// Assign a trainer to a client, both given by email.
#[derive(Args, Debug)]
struct AssignArgs {
    #[arg(long)]
    client: String,
    #[arg(long)]
    trainer: String,
}

/// Add an exercise to the library.
#[derive(Args, Debug)]
struct ExerciseArgs {
    #[arg(long)]
    name: String,
    #[arg(long, value_parser = parse_region)]
    region: Option<BodyRegion>,
}

/// Add a session package to the storefront.
#[derive(Args, Debug)]
struct PackageArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    sessions: i64,
    /// Price of one package in dollars (`500` or `$499.99`).
    #[arg(long, value_parser = parse_price)]
    price: MoneyCents,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::try_from(raw).map_err(|err| err.to_string())
}

fn parse_price(raw: &str) -> Result<MoneyCents, String> {
    raw.parse::<MoneyCents>().map_err(|err| err.to_string())
}

fn parse_region(raw: &str) -> Result<BodyRegion, String> {
    BodyRegion::try_from(raw).map_err(|err| err.to_string())
}

async fn connect_db(database_url: &str) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;
    // The operator at the terminal acts with admin rights.
    let operator = Requester::new(Uuid::nil(), Role::Admin);

    match cli.command {
        Command::Account(Account {
            command: AccountCommand::Create(args),
        }) => {
            let (account, token) = engine
                .create_account(NewAccount::new(args.name, args.email, args.role))
                .await?;
            println!("created {} account: {} ({})", args.role.as_str(), account.email, account.id);
            println!("api token: {token}");
        }
        Command::Account(Account {
            command: AccountCommand::RotateToken(args),
        }) => {
            let account = engine.account_by_email(&args.email).await?;
            let token = engine.rotate_api_token(account.id).await?;
            println!("api token: {token}");
        }
        Command::Assign(args) => {
            let client = engine.account_by_email(&args.client).await?;
            let trainer = engine.account_by_email(&args.trainer).await?;
            engine.assign_trainer(&operator, client.id, trainer.id).await?;
            println!("assigned {} to {}", trainer.email, client.email);
        }
        Command::Exercise(args) => {
            let exercise = engine
                .add_exercise(NewExercise {
                    name: args.name,
                    body_region: args.region,
                })
                .await?;
            println!("added exercise: {} ({})", exercise.name, exercise.id);
        }
        Command::Package(args) => {
            let item = engine
                .add_storefront_item(NewStorefrontItem {
                    name: args.name,
                    sessions: args.sessions,
                    price: args.price,
                })
                .await?;
            println!("added package: {} at {} ({})", item.name, item.price, item.id);
        }
        Command::Deduct => {
            let report = engine.run_session_deductions(&operator, Utc::now()).await?;
            println!(
                "processed {} clients, {} sessions deducted, {} without credit",
                report.clients_processed, report.sessions_deducted, report.sessions_without_credit
            );
            for client_id in report.no_credits {
                println!("out of credits: {client_id}");
            }
        }
    }

    Ok(())
}
