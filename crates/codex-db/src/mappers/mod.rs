//! Model to entity mappers
//!
//! `From<Model> for Entity` conversions from database rows to domain objects.
//! Writes bind entity fields directly, so there is no reverse direction.

mod attire;
mod character;
mod gallery;
mod lore;
