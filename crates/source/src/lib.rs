pub mod backend;
pub mod error;
mod path;

pub use crate::backend::SourceBackend;
pub use crate::path::{mirror_path, segments as resource_segments};
use std::sync::Arc;

pub type BackendHandle = Arc<dyn SourceBackend + Send + Sync>;
