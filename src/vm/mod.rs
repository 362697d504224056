pub mod bridge;
pub mod export;
pub mod model_sync;
pub mod view;
