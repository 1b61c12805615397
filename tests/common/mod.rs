#![allow(dead_code)]

use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use stateset_sku::{
    db::{self, DbConfig},
    entities::{collection, collection_design, design, team, variant, VariantModel},
};
use uuid::Uuid;

/// Fresh in-memory SQLite database with the embedded migrations applied.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };

    let pool = db::establish_connection_with_config(&config)
        .await
        .expect("failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations in tests");
    pool
}

pub async fn insert_team(db: &DatabaseConnection, title: &str) -> Uuid {
    let id = Uuid::new_v4();
    team::ActiveModel {
        id: Set(id),
        title: Set(title.to_string()),
    }
    .insert(db)
    .await
    .expect("insert team");
    id
}

pub async fn insert_design(db: &DatabaseConnection, title: &str, team_id: Option<Uuid>) -> Uuid {
    let id = Uuid::new_v4();
    design::ActiveModel {
        id: Set(id),
        title: Set(title.to_string()),
        team_id: Set(team_id),
    }
    .insert(db)
    .await
    .expect("insert design");
    id
}

pub async fn insert_collection(db: &DatabaseConnection, title: &str, design_ids: &[Uuid]) -> Uuid {
    let id = Uuid::new_v4();
    collection::ActiveModel {
        id: Set(id),
        title: Set(title.to_string()),
    }
    .insert(db)
    .await
    .expect("insert collection");

    for design_id in design_ids {
        collection_design::ActiveModel {
            collection_id: Set(id),
            design_id: Set(*design_id),
        }
        .insert(db)
        .await
        .expect("insert collection membership");
    }
    id
}

/// Builder for variant rows.
pub struct VariantSeed {
    model: VariantModel,
}

impl VariantSeed {
    pub fn new(design_id: Uuid, position: i32) -> Self {
        Self {
            model: variant::Model::draft(design_id, None, None, position),
        }
    }

    pub fn color(mut self, color: &str) -> Self {
        self.model.color_name = Some(color.to_string());
        self
    }

    pub fn size(mut self, size: &str) -> Self {
        self.model.size_name = Some(size.to_string());
        self
    }

    pub fn code(mut self, code: &str) -> Self {
        self.model.code = Some(code.to_string());
        self
    }

    pub fn upc(mut self, upc: &str) -> Self {
        self.model.universal_product_code = Some(upc.to_string());
        self
    }

    pub fn build(self) -> VariantModel {
        self.model
    }

    pub async fn insert(self, db: &DatabaseConnection) -> VariantModel {
        self.model
            .into_insertable()
            .insert(db)
            .await
            .expect("insert variant")
    }
}
