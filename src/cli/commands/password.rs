use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::auth::hash_password;
use crate::cli::{utils, OutputFormat};

#[derive(Args)]
pub struct HashPasswordArgs {
    #[arg(help = "Plain-text password to hash")]
    pub password: String,
}

pub async fn handle(args: HashPasswordArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&args.password))
        .await?
        .context("failed to hash password")?;

    match output_format {
        OutputFormat::Json => utils::output_success(
            output_format,
            "password hashed",
            Some(json!({ "hash": hash })),
        ),
        OutputFormat::Text => {
            println!("{}", hash);
            Ok(())
        }
    }
}
