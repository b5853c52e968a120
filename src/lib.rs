pub use common;
pub use publisher;
pub use telemetry;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
