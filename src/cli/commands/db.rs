use clap::Subcommand;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::database::manager::DatabaseManager;

/// Schema DDL shipped with the binary, applied statement by statement.
const SCHEMA_SQL: &str = include_str!("../../database/schema.sql");

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply the schema to the configured database")]
    Init,

    #[command(about = "Check database connectivity")]
    Ping,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Init => {
            let pool = DatabaseManager::main_pool().await?;

            let mut applied = 0usize;
            for statement in SCHEMA_SQL.split(';') {
                let statement = statement.trim();
                if statement.is_empty() {
                    continue;
                }
                sqlx::query(statement).execute(&pool).await?;
                applied += 1;
            }

            output_success(
                &output_format,
                &format!("Schema applied ({} statements)", applied),
                None,
            )
        }
        DbCommands::Ping => {
            DatabaseManager::health_check().await?;
            output_success(&output_format, "Database reachable", None)
        }
    }
}
