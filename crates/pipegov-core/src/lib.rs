pub mod error;
pub mod evaluator;
pub mod matcher;
pub mod order;
pub mod pipeline;
pub mod rule;
pub mod source;
pub mod template;

pub use error::{GovError, Result};
