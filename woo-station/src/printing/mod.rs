//! Receipt printing
//!
//! - `types`: template variants and section presets
//! - `renderer`: order → receipt markup
//! - `executor`: markup → printer, one attempt per job

pub mod executor;
pub mod renderer;
pub mod types;

pub use executor::{PrintExecutor, PrintJobError, PrintJobResult};
pub use renderer::ReceiptRenderer;
pub use types::{TemplateConfig, TemplateType};
