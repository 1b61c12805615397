use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use stateset_sku::{
    config::{self, AppConfig},
    db,
    entities::VariantModel,
    services::sku::{SkuService, UpcSettings},
};
use tracing::debug;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let app_config = config::load_config().context("failed to load configuration")?;
    config::init_tracing(app_config.log_level(), app_config.log_json);

    let pool = connect(&app_config).await?;

    match cli.command {
        Commands::Migrate => {
            db::run_migrations(&pool)
                .await
                .context("failed to run migrations")?;
            println!("Migrations applied");
        }
        Commands::Preview(args) => {
            let service = sku_service(pool, &app_config);
            let previews = service
                .preview_base_codes(args.design)
                .await
                .context("failed to compose base codes")?;

            if cli.json {
                print_json(&previews)?;
            } else {
                for preview in previews {
                    println!(
                        "{}  {:<24} {}",
                        preview.variant_id,
                        preview.code.as_deref().unwrap_or("-"),
                        preview.base_code
                    );
                }
            }
        }
        Commands::BackfillCodes(args) => {
            let service = sku_service(pool, &app_config);
            let variants = service
                .backfill_codes(args.design)
                .await
                .context("code backfill failed")?;
            render_variants(&variants, cli.json, |v| v.code.as_deref())?;
        }
        Commands::BackfillUpcs(args) => {
            let service = sku_service(pool, &app_config);
            let variants = service
                .backfill_upcs(args.design)
                .await
                .context("UPC backfill failed")?;
            render_variants(&variants, cli.json, |v| v.universal_product_code.as_deref())?;
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(name = "sku", about = "Variant SKU and UPC maintenance", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the embedded schema migrations
    Migrate,
    /// Show the base code each variant of a design composes to
    Preview(DesignArgs),
    /// Assign codes to variants of a design that have none
    BackfillCodes(DesignArgs),
    /// Assign UPCs to variants of a design that have none
    BackfillUpcs(DesignArgs),
}

#[derive(Args)]
struct DesignArgs {
    #[arg(long, help = "Identifier of the design whose variants are processed")]
    design: Uuid,
}

async fn connect(app_config: &AppConfig) -> Result<db::DbPool> {
    let pool = db::establish_connection_from_app_config(app_config)
        .await
        .context("failed to connect to database")?;

    if app_config.auto_migrate {
        debug!("auto_migrate enabled");
        db::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
    }

    Ok(pool)
}

fn sku_service(pool: db::DbPool, app_config: &AppConfig) -> SkuService {
    SkuService::new(Arc::new(pool), UpcSettings::from(app_config))
}

fn render_variants<F>(variants: &[VariantModel], json: bool, value: F) -> Result<()>
where
    F: Fn(&VariantModel) -> Option<&str>,
{
    if json {
        return print_json(&variants);
    }

    for variant in variants {
        println!("{}  {}", variant.id, value(variant).unwrap_or("-"));
    }
    println!("{} variant(s)", variants.len());
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", rendered);
    Ok(())
}
