pub mod format;
pub mod frame_extractor;
pub mod path_map;
pub mod scene;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
