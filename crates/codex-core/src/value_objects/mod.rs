//! Value objects - immutable types that represent domain concepts

mod kinds;
mod snowflake;

pub use kinds::{EntityKind, LookupKind};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
