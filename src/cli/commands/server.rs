use clap::Subcommand;
use serde_json::json;

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Register a server")]
    Add {
        #[arg(help = "Server name")]
        name: String,
        #[arg(help = "Base URL, e.g. http://localhost:3000")]
        url: String,
        #[arg(long, default_value = "", help = "Description")]
        description: String,
    },

    #[command(about = "List registered servers")]
    List,

    #[command(about = "Switch to a server")]
    Use {
        #[arg(help = "Server name")]
        name: String,
    },

    #[command(about = "Ping the current (or a named) server")]
    Health {
        #[arg(help = "Server name (defaults to current)")]
        name: Option<String>,
    },
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Add { name, url, description } => {
            let mut config = load_server_config()?;
            if config.servers.contains_key(&name) {
                return Err(anyhow::anyhow!("Server '{}' already exists", name));
            }

            config
                .servers
                .insert(name.clone(), ServerInfo::new(url, description));
            save_server_config(&config)?;

            // First server becomes current automatically
            let mut session = load_session_config()?;
            if session.current_server.is_none() {
                session.current_server = Some(name.clone());
                save_session_config(&session)?;
            }

            output_success(
                &output_format,
                &format!("Server '{}' registered", name),
                Some(json!({ "server": name })),
            )
        }
        ServerCommands::List => {
            let config = load_server_config()?;
            let session = load_session_config()?;

            let rows: Vec<_> = config
                .servers
                .iter()
                .map(|(name, info)| {
                    json!({
                        "name": name,
                        "url": info.url,
                        "status": info.status,
                        "current": session.current_server.as_ref() == Some(name),
                    })
                })
                .collect();

            output_list(&output_format, "servers", &rows, "No servers registered", |row| {
                let marker = if row["current"].as_bool().unwrap_or(false) { "*" } else { " " };
                format!(
                    "{}{:<15} {:<30} {}",
                    marker,
                    row["name"].as_str().unwrap_or(""),
                    row["url"].as_str().unwrap_or(""),
                    row["status"].as_str().unwrap_or("unknown")
                )
            })
        }
        ServerCommands::Use { name } => {
            let config = load_server_config()?;
            if !config.servers.contains_key(&name) {
                return Err(anyhow::anyhow!("Server '{}' not found", name));
            }

            let mut session = load_session_config()?;
            session.current_server = Some(name.clone());
            save_session_config(&session)?;

            output_success(
                &output_format,
                &format!("Switched to server '{}'", name),
                Some(json!({ "current_server": name })),
            )
        }
        ServerCommands::Health { name } => {
            let mut config = load_server_config()?;
            let session = load_session_config()?;

            let target = match name.or(session.current_server) {
                Some(target) => target,
                None => return Err(anyhow::anyhow!("No current server set")),
            };

            let info = config
                .servers
                .get_mut(&target)
                .ok_or_else(|| anyhow::anyhow!("Server '{}' not found", target))?;

            let status = ping_server(info).await;
            info.update_ping(status);
            let url = info.url.clone();
            save_server_config(&config)?;

            output_success(
                &output_format,
                &format!("Server '{}' is {:?}", target, status),
                Some(json!({ "server": target, "url": url, "status": status })),
            )
        }
    }
}
