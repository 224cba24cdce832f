//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod diagram;
pub mod error;
pub mod error_ext;
pub mod input;
pub mod render;
pub mod services;

pub use diagram::{BandSummary, TreeDiagram};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use input::InputCollector;
pub use render::{format_probability, OutputFormat, Renderer};
