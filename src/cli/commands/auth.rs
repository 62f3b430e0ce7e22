use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the current server")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Register a new account on the current server")]
    Register {
        #[arg(help = "Email")]
        email: String,
        #[arg(help = "Display name")]
        name: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Drop the stored session token")]
    Logout,

    #[command(about = "Show the signed-in identity, optionally with a resolved role")]
    Whoami {
        #[arg(long, help = "Church slug for role resolution")]
        church: Option<String>,
        #[arg(long, help = "Service slug for role resolution")]
        service: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password")?,
            };

            let base = current_server_url()?;
            let client = reqwest::Client::new();
            let payload: Value = client
                .post(format!("{}/auth/login", base))
                .json(&json!({ "email": &email, "password": password }))
                .send()
                .await?
                .json()
                .await?;
            expect_success(&payload)?;

            let token = payload["data"]["token"]
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("Login response carried no token"))?
                .to_string();

            let mut session = load_session_config()?;
            session.token = Some(token);
            session.email = Some(email.clone());
            save_session_config(&session)?;

            output_success(
                &output_format,
                &format!("Logged in as {}", email),
                Some(json!({ "email": email })),
            )
        }
        AuthCommands::Register { email, name, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password")?,
            };

            let base = current_server_url()?;
            let client = reqwest::Client::new();
            let payload: Value = client
                .post(format!("{}/auth/register", base))
                .json(&json!({ "email": &email, "name": &name, "password": password }))
                .send()
                .await?
                .json()
                .await?;
            expect_success(&payload)?;

            output_success(
                &output_format,
                &format!("Registered {}", email),
                Some(json!({ "user": payload["data"] })),
            )
        }
        AuthCommands::Logout => {
            let mut session = load_session_config()?;
            session.token = None;
            session.email = None;
            save_session_config(&session)?;

            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami { church, service } => {
            let base = current_server_url()?;
            let token = current_token()?;

            let mut request = reqwest::Client::new()
                .get(format!("{}/api/auth/whoami", base))
                .bearer_auth(token);
            if let (Some(church), Some(service)) = (church, service) {
                request = request.query(&[("church", church), ("service", service)]);
            }

            let payload: Value = request.send().await?.json().await?;
            expect_success(&payload)?;
            output_value(&payload["data"])
        }
    }
}
