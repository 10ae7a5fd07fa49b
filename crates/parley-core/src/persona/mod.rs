//! Persona catalog and domain model.

mod catalog;
mod model;

pub use catalog::PersonaCatalog;
pub use model::PersonaDefinition;
