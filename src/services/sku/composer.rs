use super::abbreviator::{abbreviate, AbbreviationMode};
use crate::{
    entities::{collection, variant, Collection, Design, DesignModel, Team},
    errors::ServiceError,
};
use sea_orm::{ConnectionTrait, EntityTrait, ModelTrait, QueryOrder};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Joins the abbreviated parts of a code.
pub const PART_SEPARATOR: &str = "-";

/// Raw names a base code is derived from, in code order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeParts {
    pub team: Option<String>,
    pub collection: Option<String>,
    pub design: String,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl CodeParts {
    /// Abbreviates every present part and joins the non-empty ones.
    pub fn compose(&self) -> String {
        let words = |name: &Option<String>| {
            name.as_deref()
                .map(|n| abbreviate(n, AbbreviationMode::Words))
        };

        [
            words(&self.team),
            words(&self.collection),
            Some(abbreviate(&self.design, AbbreviationMode::Words)),
            words(&self.color),
            self.size
                .as_deref()
                .map(|n| abbreviate(n, AbbreviationMode::Initials)),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(PART_SEPARATOR)
    }
}

/// Loads a design, failing with `NotFound` when it does not exist.
pub async fn find_design_by_id<C>(db: &C, design_id: Uuid) -> Result<DesignModel, ServiceError>
where
    C: ConnectionTrait,
{
    Design::find_by_id(design_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Design {} not found", design_id)))
}

/// Title of the team owning the design, if any.
pub async fn find_team_title<C>(db: &C, design: &DesignModel) -> Result<Option<String>, ServiceError>
where
    C: ConnectionTrait,
{
    let Some(team_id) = design.team_id else {
        return Ok(None);
    };

    Ok(Team::find_by_id(team_id).one(db).await?.map(|team| team.title))
}

/// Title of the collection the design belongs to.
///
/// Designs are expected to sit in at most one collection. When there are more,
/// the first by title wins so the result stays deterministic.
pub async fn find_collection_title<C>(
    db: &C,
    design: &DesignModel,
) -> Result<Option<String>, ServiceError>
where
    C: ConnectionTrait,
{
    let collections = design
        .find_related(Collection)
        .order_by_asc(collection::Column::Title)
        .order_by_asc(collection::Column::Id)
        .all(db)
        .await?;

    if collections.len() > 1 {
        warn!(
            design_id = %design.id,
            count = collections.len(),
            "Design belongs to several collections; using the first by title"
        );
    }

    Ok(collections.into_iter().next().map(|c| c.title))
}

/// Gathers the naming inputs for a variant at call time.
///
/// A design whose title is blank cannot name its variants and is rejected
/// with `ValidationError`.
pub async fn load_code_parts<C>(db: &C, variant: &variant::Model) -> Result<CodeParts, ServiceError>
where
    C: ConnectionTrait,
{
    let design = find_design_by_id(db, variant.design_id).await?;
    if design.title.trim().is_empty() {
        return Err(ServiceError::ValidationError(format!(
            "Design {} has no title",
            design.id
        )));
    }

    let team = find_team_title(db, &design).await?;
    let collection = find_collection_title(db, &design).await?;

    Ok(CodeParts {
        team,
        collection,
        design: design.title,
        color: variant.color_name.clone(),
        size: variant.size_name.clone(),
    })
}

/// Computes the base code for a variant before any uniqueness suffix.
#[instrument(skip(db, variant), fields(variant_id = %variant.id, design_id = %variant.design_id))]
pub async fn compute_base_code<C>(db: &C, variant: &variant::Model) -> Result<String, ServiceError>
where
    C: ConnectionTrait,
{
    let parts = load_code_parts(db, variant).await?;
    let base = parts.compose();
    debug!(base = %base, "Composed base code");
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(design: &str) -> CodeParts {
        CodeParts {
            design: design.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn composes_all_parts_in_order() {
        let parts = CodeParts {
            team: Some("Acme Apparel".into()),
            collection: Some("Summer".into()),
            design: "Sunset Tee".into(),
            color: Some("Navy Blue".into()),
            size: Some("Extra Large".into()),
        };

        assert_eq!(parts.compose(), "ACMAPP-SUM-SUNTEE-NAVBLU-EL");
    }

    #[test]
    fn skips_missing_and_empty_parts() {
        let mut p = parts("Sunset Tee");
        p.color = Some("!!".into());
        p.size = Some("  ".into());
        assert_eq!(p.compose(), "SUNTEE");

        p.team = Some("Acme".into());
        p.size = Some("M".into());
        assert_eq!(p.compose(), "ACM-SUNTEE-M");
    }

    #[test]
    fn short_parts_are_used_verbatim() {
        let mut p = parts("Tee");
        p.color = Some("red".into());
        p.size = Some("xl".into());
        assert_eq!(p.compose(), "TEE-RED-XL");
    }

    #[test]
    fn composition_is_deterministic() {
        let p = CodeParts {
            team: Some("Northwind".into()),
            collection: None,
            design: "Trail Runner".into(),
            color: Some("Crimson".into()),
            size: Some("Small".into()),
        };

        assert_eq!(p.compose(), p.clone().compose());
        assert_eq!(p.compose(), "NOR-TRARUN-CRI-S");
    }

    #[test]
    fn empty_design_title_yields_remaining_parts() {
        let mut p = parts("");
        p.color = Some("Crimson".into());
        assert_eq!(p.compose(), "CRI");
    }
}
