pub mod error;
pub mod extract;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod transform;

pub use error::EtlError;
pub use pipeline::{run, RunSummary};
