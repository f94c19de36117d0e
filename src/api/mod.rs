//! API clients for external services (Scryfall)

pub mod scryfall;

// Re-exports for public API convenience
pub use scryfall::{ScryfallClient, UniqueMode, SCRYFALL_API};
