use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Args;
use serde_json::json;

use crate::cli::{utils, OutputFormat};
use crate::config::AppConfig;
use crate::database::postgres::PgAdminRepository;
use crate::database::Database;
use crate::services::{AdminInput, AdminService, ServiceError};
use crate::types::{Principal, Role};

#[derive(Args)]
pub struct CreateAdminArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long, default_value = "superadmin", help = "admin | superadmin")]
    pub role: String,
}

/// Bootstraps an account without going through the HTTP API, which needs an
/// existing superadmin. Runs with the same validation as `POST /admin/admins`.
pub async fn handle(args: CreateAdminArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let db = Database::connect(&config.database)
        .await
        .context("failed to connect to the database")?;

    let service = AdminService::new(Arc::new(PgAdminRepository::new(db.pool().clone())));
    let operator = Principal::new(0, Role::Superadmin);
    let input = AdminInput {
        username: args.username,
        email: args.email,
        password: args.password,
        role: args.role,
        is_active: Some(true),
    };

    let result = service.create(&operator, input).await;
    db.close().await;

    let admin = result.map_err(|e| match e {
        ServiceError::Validation(fields) => {
            let mut fields: Vec<_> = fields.into_iter().collect();
            fields.sort();
            let detail: Vec<String> = fields.into_iter().map(|(k, v)| format!("{k}: {v}")).collect();
            anyhow!("validation failed ({})", detail.join(", "))
        }
        other => anyhow!(other),
    })?;

    utils::output_success(
        output_format,
        &format!("created {} {} <{}>", admin.role, admin.username, admin.email),
        Some(json!({ "admin": admin })),
    )
}
