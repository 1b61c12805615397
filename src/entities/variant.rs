use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set};
use serde::{Deserialize, Serialize};

/// Product variant of a design.
///
/// `code` is the SKU assigned by the naming engine and `universal_product_code`
/// the 12-digit UPC. Both stay `None` until assigned and are never regenerated
/// once present.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_variants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub design_id: Uuid,
    #[sea_orm(nullable)]
    pub color_name: Option<String>,
    #[sea_orm(nullable)]
    pub size_name: Option<String>,
    #[sea_orm(nullable)]
    pub code: Option<String>,
    #[sea_orm(nullable)]
    pub universal_product_code: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::design::Entity",
        from = "Column::DesignId",
        to = "super::design::Column::Id",
        on_delete = "Cascade"
    )]
    Design,
}

impl Related<super::design::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Design.def()
    }
}

impl Model {
    /// Builds an unsaved variant with fresh identity and timestamps.
    pub fn draft(
        design_id: Uuid,
        color_name: Option<String>,
        size_name: Option<String>,
        position: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            design_id,
            color_name,
            size_name,
            code: None,
            universal_product_code: None,
            position,
            created_at: now,
            updated_at: now,
        }
    }

    /// Active model with every column set, for inserting a drafted variant.
    pub fn into_insertable(self) -> ActiveModel {
        ActiveModel {
            id: Set(self.id),
            design_id: Set(self.design_id),
            color_name: Set(self.color_name),
            size_name: Set(self.size_name),
            code: Set(self.code),
            universal_product_code: Set(self.universal_product_code),
            position: Set(self.position),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            if let ActiveValue::NotSet = active_model.created_at {
                active_model.created_at = Set(now);
            }
            if let ActiveValue::NotSet = active_model.position {
                active_model.position = Set(0);
            }
        }

        active_model.updated_at = Set(now);
        Ok(active_model)
    }
}
