pub mod errors;
pub mod format;
pub mod ratelimit;
pub mod table;

pub use errors::{ConfigError, ExtractError, PipelineError, RenderError};
pub use format::{format_large_number, format_percent};
pub use ratelimit::{configure_provider_rate_limit, rate_limit_provider};
pub use table::Table;
