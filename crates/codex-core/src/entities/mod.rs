//! Domain entities - catalog records
//!
//! Records reference each other by id only; compositions and links live in flat
//! tables owned by the store.

mod attire;
mod character;
mod gallery;
mod lookup;
mod lore;

pub use attire::{Accessory, Attire};
pub use character::Character;
pub use gallery::GalleryImage;
pub use lookup::LookupEntry;
pub use lore::{CharacterLoreLink, LoreEntry};
