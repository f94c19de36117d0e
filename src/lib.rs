//! Lackey Fetch - Scryfall to LackeyCCG exporter
//!
//! Fetches Magic: The Gathering sets from the Scryfall API and writes them as
//! LackeyCCG card data files, together with an on-disk card image cache and a
//! generated formats file.

pub mod api;
pub mod config;
pub mod error;
pub mod formats;
pub mod images;
pub mod logging;
pub mod manifest;
pub mod models;
pub mod pipeline;
pub mod set_writer;
pub mod transform;

// Re-export commonly used items
pub use api::{ScryfallClient, UniqueMode};
pub use config::Config;
pub use error::{Error, LackeyError, Result};
pub use images::{DownloadOutcome, DownloadSummary, ImageDownloader, ImageOptions, ImageQuality};
pub use manifest::{update_manifest, ManifestUpdate};
pub use models::{CardFace, ImageUris, ScryfallCard};
pub use pipeline::{process_set, run_batch, BatchSummary, SetReport, Workspace};
pub use set_writer::{deduplicate_file, SetWriter};
pub use transform::{format_card, FormatOptions, OutputRecord};
