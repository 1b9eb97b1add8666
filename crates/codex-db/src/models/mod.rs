//! Database models - SQLx-compatible structs for PostgreSQL tables

mod attire;
mod character;
mod gallery;
mod lookup;
mod lore;

pub use attire::{AccessoryModel, AttireModel};
pub use character::CharacterModel;
pub use gallery::GalleryImageModel;
pub use lookup::LookupModel;
pub use lore::{CharacterLoreLinkModel, LoreEntryModel};
