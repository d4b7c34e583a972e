mod error;
mod health;
mod playlist;
mod predict;
mod root;

pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use playlist::playlist_handler;
pub use predict::predict_handler;
pub use root::root_handler;
