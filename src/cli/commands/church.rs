use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::services::directory_service::DirectoryService;

#[derive(Subcommand)]
pub enum ChurchCommands {
    #[command(about = "List all churches")]
    List,

    #[command(about = "Create a church")]
    Create {
        #[arg(help = "Church slug (lowercase, URL-safe)")]
        slug: String,
        #[arg(help = "Display name")]
        name: String,
    },

    #[command(about = "Show a church and its services")]
    Info {
        #[arg(help = "Church slug")]
        slug: String,
    },
}

pub async fn handle(cmd: ChurchCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let directory = DirectoryService::new().await?;

    match cmd {
        ChurchCommands::List => {
            let churches = directory.list_churches().await?;
            output_list(&output_format, "churches", &churches, "No churches yet", |church| {
                format!("{:<20} {}", church.slug, church.name)
            })
        }
        ChurchCommands::Create { slug, name } => {
            let church = directory.create_church(&slug, &name).await?;
            output_success(
                &output_format,
                &format!("Church '{}' created", church.slug),
                Some(json!({ "church": church })),
            )
        }
        ChurchCommands::Info { slug } => {
            let church = directory.require_church(&slug).await?;
            let services = directory.list_services(church.id).await?;
            output_value(&json!({ "church": church, "services": services }))
        }
    }
}
