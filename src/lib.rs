//! Snapmorph transforms an uploaded photo with a hosted image-generation
//! model: one prompt, one image, one blocking call, one result URL.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod logger;
pub mod models;
pub mod presets;
pub mod replicate;
pub mod server;

pub use config::{Config, ReplicateConfig, ServerConfig};
pub use error::{Result, SnapmorphError};
pub use models::{ImageKind, SourceImage, TransformRequest, TransformResponse};
pub use replicate::ReplicateClient;
