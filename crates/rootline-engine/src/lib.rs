//! Import orchestration and bounded graph traversal for rootline.
//!
//! Both halves are generic over [`rootline_core::store::GraphStore`]:
//!
//! - [`import`] runs the whole ingestion pipeline — decode, fingerprint,
//!   tokenize, build, normalize, commit — as one all-or-nothing operation;
//! - [`neighborhood`], [`ancestors`] and [`descendants`] are the read path,
//!   independent of ingestion.

pub mod error;

mod import;
mod traverse;

pub use error::{Error, Result};
pub use import::{fingerprint, import};
pub use traverse::{Neighborhood, ancestors, descendants, neighborhood};
