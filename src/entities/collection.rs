use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::collection_design::Entity")]
    CollectionDesigns,
}

impl Related<super::collection_design::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionDesigns.def()
    }
}

impl Related<super::design::Entity> for Entity {
    fn to() -> RelationDef {
        super::collection_design::Relation::Design.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::collection_design::Relation::Collection.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
