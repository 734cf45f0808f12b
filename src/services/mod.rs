/// Business logic layer
pub mod assets;
pub mod content;

pub use assets::{AssetStore, LocalAssetStore};
pub use content::{ContentService, POSTS_PER_PAGE};
