//! Per-set and multi-set drivers tying fetch, write, dedup, manifest and
//! image download together.

use crate::api::{ScryfallClient, UniqueMode};
use crate::config::Config;
use crate::error::{LackeyError, Result};
use crate::images::{DownloadSummary, ImageDownloader, ImageOptions};
use crate::manifest::{update_manifest, ManifestUpdate, MANIFEST_FILE};
use crate::set_writer::{deduplicate_file, DedupStats, SetWriter};
use std::path::{Path, PathBuf};

/// Directory layout of a LackeyCCG plugin
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/sets`
    pub fn sets_dir(&self) -> PathBuf {
        self.root.join("sets")
    }

    /// `<root>/sets/<file_name>`
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.sets_dir().join(file_name)
    }

    /// `<root>/sets/setimages`
    pub fn image_dir(&self) -> PathBuf {
        self.sets_dir().join("setimages")
    }

    /// `<root>/ListOfCardDataFiles.txt`
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// `<root>/formats.txt`
    pub fn formats_path(&self) -> PathBuf {
        self.root.join("formats.txt")
    }
}

/// What happened to one set
#[derive(Debug, Clone)]
pub struct SetReport {
    pub set_code: String,
    pub cards: usize,
    pub records: usize,
    pub newly_created: bool,
    pub dedup: DedupStats,
    pub manifest: Option<ManifestUpdate>,
    pub images: Option<DownloadSummary>,
}

/// Outcome of a multi-set run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub successful: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.successful + self.failed
    }
}

/// Fetch one set, append it to the output file, deduplicate, register a new
/// file in the manifest and optionally download images
pub fn process_set(
    client: &ScryfallClient,
    workspace: &Workspace,
    config: &Config,
    set_code: &str,
) -> Result<SetReport> {
    let cards = client.search_set(set_code, UniqueMode::Prints)?;
    if cards.is_empty() {
        return Err(LackeyError::NoCardsFound(set_code.to_string()));
    }

    let writer = SetWriter::new(workspace.output_path(&config.output_file))
        .with_format(config.format)
        .with_bom(config.write_bom);
    let outcome = writer.write_set(set_code, &cards)?;

    let dedup = deduplicate_file(&outcome.path)?;

    let manifest = if outcome.newly_created {
        Some(update_manifest(
            &workspace.manifest_path(),
            &config.output_file,
        ))
    } else {
        None
    };

    let images = if config.download_images {
        let downloader =
            ImageDownloader::new(client, workspace.image_dir(), config.image_options());
        Some(downloader.download_set(set_code, &cards))
    } else {
        None
    };

    Ok(SetReport {
        set_code: set_code.to_string(),
        cards: cards.len(),
        records: outcome.records,
        newly_created: outcome.newly_created,
        dedup,
        manifest,
        images,
    })
}

/// Process every configured set. A failing set is logged and counted; the
/// remaining sets still run.
pub fn run_batch(
    client: &ScryfallClient,
    workspace: &Workspace,
    config: &Config,
) -> Result<BatchSummary> {
    if config.set_codes.is_empty() {
        log::error!("No set codes defined in config.txt");
        log::error!("Please add set_codes to config.txt (e.g., set_codes=tla,lci)");
        return Err(LackeyError::NoSetCodes);
    }

    let total = config.set_codes.len();
    log::info!(
        "Fetching {} set(s): {}",
        total,
        config.set_codes.join(", ")
    );
    log::info!(
        "Output file: {}",
        workspace.output_path(&config.output_file).display()
    );
    log::info!("Download images: {}", config.download_images);

    let mut summary = BatchSummary::default();

    for (i, set_code) in config.set_codes.iter().enumerate() {
        log::info!("[{}/{}] Processing {}...", i + 1, total, set_code);
        log::info!("{}", "=".repeat(50));

        match process_set(client, workspace, config, set_code) {
            Ok(report) => {
                log::info!(
                    "✓ Completed {}! ({} cards, {} records)",
                    report.set_code,
                    report.cards,
                    report.records
                );
                summary.successful += 1;
            }
            Err(LackeyError::NoCardsFound(code)) => {
                log::warn!("No cards found for set: {}", code);
                summary.failed += 1;
            }
            Err(e @ (LackeyError::Network(_)
            | LackeyError::ApiResponse { .. }
            | LackeyError::HttpStatus(_))) => {
                log::error!("Error fetching from Scryfall for {}: {}", set_code, e);
                summary.failed += 1;
            }
            Err(e) => {
                log::error!("Error processing {}: {}", set_code, e);
                summary.failed += 1;
            }
        }
    }

    log::info!("{}", "=".repeat(60));
    log::info!("All sets processed!");
    log::info!("Successful: {}/{}", summary.successful, summary.total());
    log::info!("Failed: {}/{}", summary.failed, summary.total());

    Ok(summary)
}

/// Standalone image run for one set (one entry per card name)
pub fn download_set_images(
    client: &ScryfallClient,
    workspace: &Workspace,
    set_code: &str,
    options: ImageOptions,
) -> Result<DownloadSummary> {
    let cards = client.search_set(set_code, UniqueMode::Cards)?;
    if cards.is_empty() {
        return Err(LackeyError::NoCardsFound(set_code.to_string()));
    }

    let downloader = ImageDownloader::new(client, workspace.image_dir(), options);
    Ok(downloader.download_set(set_code, &cards))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_layout() {
        let ws = Workspace::new("/plugins/magic");
        assert_eq!(ws.sets_dir(), PathBuf::from("/plugins/magic/sets"));
        assert_eq!(
            ws.output_path("custom.txt"),
            PathBuf::from("/plugins/magic/sets/custom.txt")
        );
        assert_eq!(
            ws.image_dir(),
            PathBuf::from("/plugins/magic/sets/setimages")
        );
        assert_eq!(
            ws.manifest_path(),
            PathBuf::from("/plugins/magic/ListOfCardDataFiles.txt")
        );
        assert_eq!(ws.formats_path(), PathBuf::from("/plugins/magic/formats.txt"));
    }

    #[test]
    fn test_batch_summary_total() {
        let summary = BatchSummary {
            successful: 2,
            failed: 1,
        };
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_run_batch_without_set_codes() {
        // No request is made, so the client never needs a live server
        let client = ScryfallClient::with_base_url("http://127.0.0.1:9").unwrap();
        let ws = Workspace::new(".");
        let result = run_batch(&client, &ws, &Config::default());
        assert!(matches!(result, Err(LackeyError::NoSetCodes)));
    }
}
