use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::services::directory_service::DirectoryService;

#[derive(Subcommand)]
pub enum ServiceCommands {
    #[command(about = "List a church's service modules")]
    List {
        #[arg(help = "Church slug")]
        church: String,
    },

    #[command(about = "Create a service module within a church")]
    Create {
        #[arg(help = "Church slug")]
        church: String,
        #[arg(help = "Service slug (e.g. worship, discipleship, nextstep)")]
        slug: String,
        #[arg(help = "Display name")]
        name: String,
    },
}

pub async fn handle(cmd: ServiceCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let directory = DirectoryService::new().await?;

    match cmd {
        ServiceCommands::List { church } => {
            let church = directory.require_church(&church).await?;
            let services = directory.list_services(church.id).await?;
            output_list(&output_format, "services", &services, "No services yet", |service| {
                format!("{:<20} {}", service.slug, service.name)
            })
        }
        ServiceCommands::Create { church, slug, name } => {
            let church = directory.require_church(&church).await?;
            let service = directory.create_service(church.id, &slug, &name).await?;
            output_success(
                &output_format,
                &format!("Service '{}' created under '{}'", service.slug, church.slug),
                Some(json!({ "service": service })),
            )
        }
    }
}
