pub mod catalog;
pub mod patcher;
pub mod probe;
pub mod schema;

pub use crate::domain::model::{PatchRunReport, PatchSet, ProbeOutcome, Replacement};
pub use crate::domain::ports::{TableProbe, TextStore};
pub use crate::utils::error::Result;
