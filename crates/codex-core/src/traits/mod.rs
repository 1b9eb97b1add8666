//! Store traits (ports) - the persistence collaborator the domain consumes

mod store;

pub use store::{CatalogStore, CatalogTransaction, LinkFilter, RepoResult, TxMode};
