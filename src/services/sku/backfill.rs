//! Retroactive code and UPC assignment for the variants of one design.
//!
//! Variants are processed one at a time and each write lands before the next
//! variant is resolved, so no two variants of the same run can both observe a
//! code as free. Do not parallelize these loops.

use super::{resolver::compute_unique_code, upc::UpcGenerator};
use crate::{
    entities::{variant, Variant},
    errors::ServiceError,
};
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// All variants of a design in display order.
pub async fn find_variants_by_design<C>(
    db: &C,
    design_id: Uuid,
) -> Result<Vec<variant::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    Variant::find()
        .filter(variant::Column::DesignId.eq(design_id))
        .order_by_asc(variant::Column::Position)
        .order_by_asc(variant::Column::CreatedAt)
        .order_by_asc(variant::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn update_variant<C>(
    db: &C,
    variant: variant::Model,
    apply: impl FnOnce(&mut variant::ActiveModel),
) -> Result<variant::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let mut active: variant::ActiveModel = variant.into();
    apply(&mut active);
    active.update(db).await.map_err(Into::into)
}

/// Assigns a code to every variant of the design that lacks one.
///
/// Variants that already carry a code are returned untouched, even when the
/// code would collide under the current naming rules.
#[instrument(skip(db))]
pub async fn backfill_codes_for_design<C>(
    db: &C,
    design_id: Uuid,
) -> Result<Vec<variant::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    let variants = find_variants_by_design(db, design_id).await?;
    let mut result = Vec::with_capacity(variants.len());
    let mut assigned = 0usize;

    for variant in variants {
        if variant.code.is_some() {
            result.push(variant);
            continue;
        }

        let code = compute_unique_code(db, &variant, &[]).await?;
        debug!(variant_id = %variant.id, code = %code, "Assigning variant code");
        let updated = update_variant(db, variant, |active| active.code = Set(Some(code))).await?;

        counter!("stateset_sku.codes.assigned", 1);
        assigned += 1;
        result.push(updated);
    }

    info!(
        "Backfilled {} of {} variant codes for design {}",
        assigned,
        result.len(),
        design_id
    );
    Ok(result)
}

/// Assigns a UPC to every variant of the design that lacks one.
#[instrument(skip(db, generator))]
pub async fn backfill_upcs_for_design<C, G>(
    db: &C,
    design_id: Uuid,
    generator: &G,
) -> Result<Vec<variant::Model>, ServiceError>
where
    C: ConnectionTrait,
    G: UpcGenerator + ?Sized,
{
    let variants = find_variants_by_design(db, design_id).await?;
    let mut result = Vec::with_capacity(variants.len());
    let mut assigned = 0usize;

    for variant in variants {
        if variant.universal_product_code.is_some() {
            result.push(variant);
            continue;
        }

        let upc = generator.compute_unique_upc().await?;
        debug!(variant_id = %variant.id, upc = %upc, "Assigning variant UPC");
        let updated = update_variant(db, variant, |active| {
            active.universal_product_code = Set(Some(upc))
        })
        .await?;

        counter!("stateset_sku.upcs.assigned", 1);
        assigned += 1;
        result.push(updated);
    }

    info!(
        "Backfilled {} of {} variant UPCs for design {}",
        assigned,
        result.len(),
        design_id
    );
    Ok(result)
}

/// Assigns codes to a batch of variants that are not persisted yet.
///
/// Each variant is resolved against the persisted codes plus every batch member
/// that already has a code, including the ones assigned earlier in this call.
/// Variants arriving with a code keep it. Nothing is written.
#[instrument(skip(db, variants), fields(batch = variants.len()))]
pub async fn assign_codes_for_batch<C>(
    db: &C,
    variants: Vec<variant::Model>,
) -> Result<Vec<variant::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    let mut batch = variants;

    for i in 0..batch.len() {
        if batch[i].code.is_some() {
            continue;
        }

        let code = compute_unique_code(db, &batch[i], &batch).await?;
        batch[i].code = Some(code);
    }

    Ok(batch)
}
