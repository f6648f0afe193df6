pub mod error;
pub mod json_bridge;
pub mod profile;
pub mod schema;
pub mod settings;
pub mod store;

pub use error::{Result, StoreError};
pub use profile::{ProfileStore, default_base_dir, sanitize_name};
pub use settings::Settings;
pub use store::{Store, StoreStats};
