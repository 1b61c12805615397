//! Disambiguation of base codes against the codes already in use.
//!
//! A code is either the bare base or `BASE-n` with `n >= 2`. When the bare base
//! is taken, the next suffix is one past the highest observed suffix; gaps left
//! by deleted variants are not reused.

use super::composer::compute_base_code;
use crate::{
    entities::{variant, Variant},
    errors::ServiceError,
};
use async_trait::async_trait;
use regex::Regex;
use sea_orm::{
    sea_query::LikeExpr, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
};
use std::collections::BTreeSet;
use tracing::{debug, instrument};
use uuid::Uuid;

/// First suffix handed out once the bare base is in use.
pub const FIRST_SUFFIX: u64 = 2;

/// Codes currently visible to the resolver.
#[async_trait]
pub trait CodeSource: Send + Sync {
    /// Non-null codes equal to `base` or starting with `base-`, on variants whose
    /// id is not in `excluded`. May return extra codes; callers match exactly.
    async fn codes_near(&self, base: &str, excluded: &[Uuid]) -> Result<Vec<String>, ServiceError>;
}

/// Reads persisted variant codes through any sea-orm connection or transaction.
pub struct VariantCodeSource<'a, C> {
    db: &'a C,
}

impl<'a, C> VariantCodeSource<'a, C>
where
    C: ConnectionTrait,
{
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<'a, C> CodeSource for VariantCodeSource<'a, C>
where
    C: ConnectionTrait,
{
    async fn codes_near(&self, base: &str, excluded: &[Uuid]) -> Result<Vec<String>, ServiceError> {
        let suffixed = LikeExpr::new(format!("{}-%", escape_like(base))).escape('\\');

        let rows = Variant::find()
            .filter(variant::Column::Code.is_not_null())
            .filter(variant::Column::Id.is_not_in(excluded.iter().copied()))
            .filter(
                Condition::any()
                    .add(variant::Column::Code.eq(base))
                    .add(variant::Column::Code.like(suffixed)),
            )
            .all(self.db)
            .await?;

        Ok(rows.into_iter().filter_map(|v| v.code).collect())
    }
}

/// Escapes LIKE wildcards so the base matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Exact matcher for `^BASE(-[0-9]+)?$`.
struct CodePattern {
    matcher: Regex,
}

impl CodePattern {
    fn new(base: &str) -> Result<Self, ServiceError> {
        let matcher = Regex::new(&format!(r"^{}(?:-([0-9]+))?$", regex::escape(base)))
            .map_err(|e| ServiceError::InternalError(format!("invalid code pattern: {}", e)))?;
        Ok(Self { matcher })
    }

    fn matches(&self, code: &str) -> bool {
        self.matcher.is_match(code)
    }

    /// Numeric suffix of a `BASE-n` code; values that overflow are ignored.
    fn suffix(&self, code: &str) -> Option<u64> {
        self.matcher
            .captures(code)?
            .get(1)
            .and_then(|m| m.as_str().parse().ok())
    }
}

/// Picks the final code for `base` given the codes already in use.
///
/// Codes that do not match `^BASE(-[0-9]+)?$` are ignored, as are suffixes
/// below [`FIRST_SUFFIX`].
pub fn choose_code<'c, I>(base: &str, in_use: I) -> Result<String, ServiceError>
where
    I: IntoIterator<Item = &'c str>,
{
    let pattern = CodePattern::new(base)?;
    let similar: BTreeSet<&str> = in_use.into_iter().filter(|c| pattern.matches(c)).collect();

    if !similar.contains(base) {
        return Ok(base.to_string());
    }

    let next = match similar
        .iter()
        .filter_map(|code| pattern.suffix(code))
        .filter(|n| *n >= FIRST_SUFFIX)
        .max()
    {
        Some(max) => max.checked_add(1).ok_or_else(|| {
            ServiceError::Conflict(format!("No numeric suffix left for code {}", base))
        })?,
        None => FIRST_SUFFIX,
    };

    Ok(format!("{}-{}", base, next))
}

/// Makes `base` unique against the source and the not-yet-persisted siblings.
///
/// The variant itself and every unsaved sibling are excluded from the source
/// query; sibling codes are considered directly instead.
#[instrument(skip(source, variant, unsaved_siblings), fields(variant_id = %variant.id, siblings = unsaved_siblings.len()))]
pub async fn resolve_unique<S>(
    source: &S,
    base: &str,
    variant: &variant::Model,
    unsaved_siblings: &[variant::Model],
) -> Result<String, ServiceError>
where
    S: CodeSource + ?Sized,
{
    let mut excluded: Vec<Uuid> = Vec::with_capacity(unsaved_siblings.len() + 1);
    excluded.push(variant.id);
    excluded.extend(unsaved_siblings.iter().map(|s| s.id));

    let persisted = source.codes_near(base, &excluded).await?;
    let pending = unsaved_siblings
        .iter()
        .filter(|s| s.id != variant.id)
        .filter_map(|s| s.code.as_deref());

    let code = choose_code(base, persisted.iter().map(String::as_str).chain(pending))?;
    debug!(base = %base, code = %code, "Resolved unique code");
    Ok(code)
}

/// Composes the base code for a variant and makes it unique.
pub async fn compute_unique_code<C>(
    db: &C,
    variant: &variant::Model,
    unsaved_siblings: &[variant::Model],
) -> Result<String, ServiceError>
where
    C: ConnectionTrait,
{
    let base = compute_base_code(db, variant).await?;
    resolve_unique(&VariantCodeSource::new(db), &base, variant, unsaved_siblings).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// In-memory source of persisted `(variant id, code)` pairs.
    struct Persisted(Vec<(Uuid, String)>);

    impl Persisted {
        fn of(codes: &[&str]) -> Self {
            Self(
                codes
                    .iter()
                    .map(|c| (Uuid::new_v4(), c.to_string()))
                    .collect(),
            )
        }
    }

    #[async_trait]
    impl CodeSource for Persisted {
        async fn codes_near(
            &self,
            base: &str,
            excluded: &[Uuid],
        ) -> Result<Vec<String>, ServiceError> {
            let prefix = format!("{}-", base);
            Ok(self
                .0
                .iter()
                .filter(|(id, _)| !excluded.contains(id))
                .filter(|(_, code)| code == base || code.starts_with(&prefix))
                .map(|(_, code)| code.clone())
                .collect())
        }
    }

    struct Failing;

    #[async_trait]
    impl CodeSource for Failing {
        async fn codes_near(&self, _: &str, _: &[Uuid]) -> Result<Vec<String>, ServiceError> {
            Err(ServiceError::DatabaseError(sea_orm::DbErr::Custom(
                "connection reset".into(),
            )))
        }
    }

    fn variant() -> variant::Model {
        variant::Model::draft(Uuid::new_v4(), None, None, 0)
    }

    fn coded(design_id: Uuid, code: &str) -> variant::Model {
        let mut v = variant::Model::draft(design_id, None, None, 0);
        v.code = Some(code.to_string());
        v
    }

    #[tokio::test]
    async fn passes_base_through_without_collisions() {
        let source = Persisted::of(&["OTHER", "SUNTEE2", "XSUNTEE"]);
        let code = resolve_unique(&source, "SUNTEE", &variant(), &[]).await.unwrap();
        assert_eq!(code, "SUNTEE");
    }

    #[tokio::test]
    async fn keeps_base_when_only_suffixed_codes_exist() {
        let source = Persisted::of(&["SUNTEE-2", "SUNTEE-3"]);
        let code = resolve_unique(&source, "SUNTEE", &variant(), &[]).await.unwrap();
        assert_eq!(code, "SUNTEE");
    }

    #[tokio::test]
    async fn appends_first_suffix_when_base_taken() {
        let source = Persisted::of(&["SUNTEE"]);
        let code = resolve_unique(&source, "SUNTEE", &variant(), &[]).await.unwrap();
        assert_eq!(code, "SUNTEE-2");
    }

    #[tokio::test]
    async fn continues_after_highest_suffix() {
        let source = Persisted::of(&["SUNTEE", "SUNTEE-2", "SUNTEE-3"]);
        let code = resolve_unique(&source, "SUNTEE", &variant(), &[]).await.unwrap();
        assert_eq!(code, "SUNTEE-4");
    }

    #[tokio::test]
    async fn does_not_fill_gaps() {
        let source = Persisted::of(&["SUNTEE", "SUNTEE-5"]);
        let code = resolve_unique(&source, "SUNTEE", &variant(), &[]).await.unwrap();
        assert_eq!(code, "SUNTEE-6");
    }

    #[tokio::test]
    async fn ignores_noise_suffixes() {
        let source = Persisted::of(&["SUNTEE", "SUNTEE-0", "SUNTEE-1", "SUNTEE-XL", "SUNTEE-RED-2"]);
        let code = resolve_unique(&source, "SUNTEE", &variant(), &[]).await.unwrap();
        assert_eq!(code, "SUNTEE-2");
    }

    #[tokio::test]
    async fn excludes_the_variant_itself() {
        let me = coded(Uuid::new_v4(), "SUNTEE");
        let source = Persisted(vec![(me.id, "SUNTEE".to_string())]);
        let code = resolve_unique(&source, "SUNTEE", &me, &[]).await.unwrap();
        assert_eq!(code, "SUNTEE");
    }

    #[tokio::test]
    async fn counts_unsaved_siblings() {
        let design_id = Uuid::new_v4();
        let siblings = vec![coded(design_id, "SUNTEE"), coded(design_id, "SUNTEE-2")];
        let source = Persisted::of(&[]);

        let code = resolve_unique(&source, "SUNTEE", &variant(), &siblings)
            .await
            .unwrap();
        assert_eq!(code, "SUNTEE-3");
    }

    #[tokio::test]
    async fn unsaved_siblings_shadow_their_persisted_rows() {
        let design_id = Uuid::new_v4();
        let mut sibling = coded(design_id, "SUNTEE-9");
        let source = Persisted(vec![(sibling.id, "SUNTEE".to_string())]);

        // the pending code replaces what is stored for that sibling
        let code = resolve_unique(&source, "SUNTEE", &variant(), &[sibling.clone()])
            .await
            .unwrap();
        assert_eq!(code, "SUNTEE");

        sibling.code = Some("SUNTEE".into());
        let code = resolve_unique(&source, "SUNTEE", &variant(), &[sibling])
            .await
            .unwrap();
        assert_eq!(code, "SUNTEE-2");
    }

    #[tokio::test]
    async fn batch_of_identical_bases_gets_distinct_codes() {
        let design_id = Uuid::new_v4();
        let source = Persisted::of(&[]);
        let mut batch: Vec<variant::Model> = Vec::new();

        for _ in 0..3 {
            let mut v = variant::Model::draft(design_id, None, None, 0);
            let code = resolve_unique(&source, "X", &v, &batch).await.unwrap();
            v.code = Some(code);
            batch.push(v);
        }

        let codes: Vec<_> = batch.iter().filter_map(|v| v.code.clone()).collect();
        assert_eq!(codes, vec!["X", "X-2", "X-3"]);
    }

    #[tokio::test]
    async fn propagates_source_errors() {
        let result = resolve_unique(&Failing, "SUNTEE", &variant(), &[]).await;
        assert_matches!(result, Err(ServiceError::DatabaseError(_)));
    }

    #[test]
    fn base_with_regex_metacharacters_matches_literally() {
        let code = choose_code("A.B", ["AXB", "A.B-7"]).unwrap();
        assert_eq!(code, "A.B");

        let code = choose_code("A.B", ["A.B", "AXB-9"]).unwrap();
        assert_eq!(code, "A.B-2");
    }

    #[test]
    fn empty_base_is_handled_like_any_other() {
        assert_eq!(choose_code("", Vec::<&str>::new()).unwrap(), "");
        assert_eq!(choose_code("", ["", "-4"]).unwrap(), "-5");
    }

    #[test]
    fn exhausted_suffix_space_is_a_conflict() {
        let max = format!("X-{}", u64::MAX);
        let result = choose_code("X", ["X", max.as_str()]);
        assert_matches!(result, Err(ServiceError::Conflict(_)));
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("A_B%C\\D"), "A\\_B\\%C\\\\D");
        assert_eq!(escape_like("SUNTEE-RED"), "SUNTEE-RED");
    }
}
