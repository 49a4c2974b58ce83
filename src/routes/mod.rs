pub mod export_handlers;
pub mod health;
pub mod helpers;
mod router;
pub mod scrape_handlers;
pub mod types;

pub use router::create_router;

// Re-export AppState for convenience
pub use crate::state::AppState;
