//! Route handlers, one module per resource.

pub mod import;
pub mod persons;
pub mod sources;
pub mod traverse;
