//! Variant SKU naming engine.
//!
//! Codes are built from the abbreviated team, collection, design, color and
//! size names (see [`abbreviator`] and [`composer`]), then made unique against
//! the codes in use by [`resolver`]. [`backfill`] assigns codes and UPCs to
//! existing variants of a design.
//!
//! The free functions take any sea-orm connection or transaction and never
//! commit; [`SkuService`] wraps them in a transaction of its own.

pub mod abbreviator;
pub mod backfill;
pub mod composer;
pub mod resolver;
pub mod upc;

pub use abbreviator::{abbreviate, AbbreviationMode};
pub use backfill::{
    assign_codes_for_batch, backfill_codes_for_design, backfill_upcs_for_design,
    find_variants_by_design,
};
pub use composer::{compute_base_code, CodeParts};
pub use resolver::{choose_code, compute_unique_code, resolve_unique, CodeSource, VariantCodeSource};
pub use upc::{RandomUpcGenerator, UpcGenerator, UpcSettings};

use crate::{entities::variant, errors::ServiceError};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Current and freshly composed code of one variant.
#[derive(Debug, Clone, Serialize)]
pub struct CodePreview {
    pub variant_id: Uuid,
    pub code: Option<String>,
    pub base_code: String,
}

/// SKU operations that manage their own transaction.
#[derive(Clone)]
pub struct SkuService {
    db: Arc<DatabaseConnection>,
    upc: UpcSettings,
}

impl SkuService {
    pub fn new(db: Arc<DatabaseConnection>, upc: UpcSettings) -> Self {
        Self { db, upc }
    }

    /// Base codes the naming rules give each variant today. Read-only.
    #[instrument(skip(self))]
    pub async fn preview_base_codes(&self, design_id: Uuid) -> Result<Vec<CodePreview>, ServiceError> {
        let variants = find_variants_by_design(&*self.db, design_id).await?;
        let mut previews = Vec::with_capacity(variants.len());

        for variant in variants {
            let base_code = compute_base_code(&*self.db, &variant).await?;
            previews.push(CodePreview {
                variant_id: variant.id,
                code: variant.code,
                base_code,
            });
        }

        Ok(previews)
    }

    /// Backfills missing codes for a design in a single transaction.
    #[instrument(skip(self))]
    pub async fn backfill_codes(&self, design_id: Uuid) -> Result<Vec<variant::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        let variants = backfill_codes_for_design(&txn, design_id).await?;
        txn.commit().await?;

        info!("Committed code backfill for design {}", design_id);
        Ok(variants)
    }

    /// Backfills missing UPCs for a design in a single transaction.
    #[instrument(skip(self))]
    pub async fn backfill_upcs(&self, design_id: Uuid) -> Result<Vec<variant::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        let generator = RandomUpcGenerator::new(&txn, self.upc);
        let variants = backfill_upcs_for_design(&txn, design_id, &generator).await?;
        txn.commit().await?;

        info!("Committed UPC backfill for design {}", design_id);
        Ok(variants)
    }
}
