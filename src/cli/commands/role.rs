use clap::Subcommand;
use serde_json::json;
use std::str::FromStr;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::database::models::Role;
use crate::services::directory_service::DirectoryService;
use crate::services::membership_service::MembershipService;

#[derive(Subcommand)]
pub enum RoleCommands {
    #[command(about = "Grant a role to a user by email")]
    Grant {
        #[arg(help = "Church slug")]
        church: String,
        #[arg(help = "Service slug")]
        service: String,
        #[arg(help = "User email")]
        email: String,
        #[arg(help = "Role (viewer or admin)")]
        role: String,
    },

    #[command(about = "Revoke a user's role")]
    Revoke {
        #[arg(help = "Church slug")]
        church: String,
        #[arg(help = "Service slug")]
        service: String,
        #[arg(help = "User email")]
        email: String,
    },

    #[command(about = "List the roster for a (church, service) pair")]
    List {
        #[arg(help = "Church slug")]
        church: String,
        #[arg(help = "Service slug")]
        service: String,
    },
}

pub async fn handle(cmd: RoleCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let directory = DirectoryService::new().await?;
    let memberships = MembershipService::new().await?;

    match cmd {
        RoleCommands::Grant { church, service, email, role } => {
            let role = Role::from_str(&role)
                .map_err(|_| anyhow::anyhow!("Unknown role '{}' (viewer or admin)", role))?;

            let church = directory.require_church(&church).await?;
            let service = directory.require_service(church.id, &service).await?;
            let user_id = memberships.user_id_by_email(&email).await?;

            let membership = memberships.grant(church.id, service.id, user_id, role).await?;
            output_success(
                &output_format,
                &format!("Granted {} to {} on {}/{}", role, email, church.slug, service.slug),
                Some(json!({ "membership": membership })),
            )
        }
        RoleCommands::Revoke { church, service, email } => {
            let church = directory.require_church(&church).await?;
            let service = directory.require_service(church.id, &service).await?;
            let user_id = memberships.user_id_by_email(&email).await?;

            let removed = memberships.revoke(church.id, service.id, user_id).await?;
            let message = if removed {
                format!("Revoked {} from {}/{}", email, church.slug, service.slug)
            } else {
                format!("{} held no role on {}/{}", email, church.slug, service.slug)
            };
            output_success(&output_format, &message, Some(json!({ "revoked": removed })))
        }
        RoleCommands::List { church, service } => {
            let church = directory.require_church(&church).await?;
            let service = directory.require_service(church.id, &service).await?;

            let roster = memberships.roster(church.id, service.id).await?;
            output_list(&output_format, "roster", &roster, "Empty roster", |entry| {
                format!("{:<30} {:<25} {}", entry.email, entry.name, entry.role)
            })
        }
    }
}
