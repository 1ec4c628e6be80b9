pub mod config;
pub mod error;
pub mod db;
pub mod graph;
pub mod i18n;
pub mod ingest;
pub mod mcp;
pub mod person;
pub mod resolve;
pub mod roster;

pub use config::Config;
pub use error::{KinmcpError, Result};
pub use graph::{FamilyGraph, RelationKind, EdgeKind, EdgeLabel};
pub use i18n::Locale;
pub use person::{Gender, Person, PersonRecord};
pub use resolve::{resolve, Resolution, ResolutionReport, ResolveError, Resolver};
