use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Design entity, the parent of a set of sibling variants
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "designs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(nullable)]
    pub team_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id",
        on_delete = "SetNull"
    )]
    Team,
    #[sea_orm(has_many = "super::variant::Entity")]
    Variants,
    #[sea_orm(has_many = "super::collection_design::Entity")]
    CollectionDesigns,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variants.def()
    }
}

impl Related<super::collection_design::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionDesigns.def()
    }
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        super::collection_design::Relation::Collection.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::collection_design::Relation::Design.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
