pub mod bbcode;
pub mod config;
pub mod contact_sheet;
pub mod image_host;
pub mod library_client;
pub mod pipeline;
pub mod poster;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
