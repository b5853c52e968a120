pub mod logging;

pub use logging::{init, init_with_service, LogConfig, LogFormat};
