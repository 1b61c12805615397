//! Catalog entities the SKU engine reads and writes.
//!
//! Only the columns the naming rules depend on are mapped; the wider catalog
//! schema lives elsewhere.

pub mod collection;
pub mod collection_design;
pub mod design;
pub mod team;
pub mod variant;

pub use collection::{Entity as Collection, Model as CollectionModel};
pub use collection_design::{Entity as CollectionDesign, Model as CollectionDesignModel};
pub use design::{Entity as Design, Model as DesignModel};
pub use team::{Entity as Team, Model as TeamModel};
pub use variant::{Entity as Variant, Model as VariantModel};
