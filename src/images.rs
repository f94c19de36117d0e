//! Card image downloader.
//!
//! Layout: `<base>/<set>/<set>/<cn>.jpg` for cards and `<base>/<set>/t<set>/<cn>.jpg`
//! for tokens. Double-faced cards get one file per face (`<cn>a.jpg`, `<cn>b.jpg`).
//! Files that already exist are never fetched again.

use crate::api::ScryfallClient;
use crate::error::Result;
use crate::models::ScryfallCard;
use image::imageops::FilterType;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pixel size LackeyCCG displays card images at
pub const LACKEY_IMAGE_SIZE: (u32, u32) = (312, 445);

/// Which Scryfall image size to download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageQuality {
    /// `normal` only
    Normal,
    /// border_crop > large > normal > small
    #[default]
    Best,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOptions {
    pub quality: ImageQuality,
    /// Resize to this exact size before saving as JPEG
    pub resize: Option<(u32, u32)>,
    /// Sleep after each card that needed an HTTP request
    pub delay: Duration,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            quality: ImageQuality::Best,
            resize: Some(LACKEY_IMAGE_SIZE),
            delay: Duration::from_millis(100),
        }
    }
}

/// Result for one card (all of its faces)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded,
    AlreadyPresent,
    /// No image URL for at least one face
    Skipped,
    /// A fetch, decode or save failed
    Failed,
}

/// Counters for a set's image run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadSummary {
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl DownloadSummary {
    pub fn record(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded | DownloadOutcome::AlreadyPresent => self.successful += 1,
            DownloadOutcome::Skipped => self.skipped += 1,
            DownloadOutcome::Failed => self.failed += 1,
        }
    }
}

/// Directory a card's images go into
pub fn card_image_dir(base_dir: &Path, set_code: &str, is_token: bool) -> PathBuf {
    let set_code = set_code.to_lowercase();
    let set_base = base_dir.join(&set_code);
    if is_token {
        set_base.join(format!("t{}", set_code))
    } else {
        set_base.join(set_code)
    }
}

/// File names and URLs for each image of a card
pub fn image_targets(card: &ScryfallCard, quality: ImageQuality) -> Vec<(String, Option<&str>)> {
    let cn = &card.collector_number;

    if card.is_double_faced() {
        (0..card.faces().len())
            .zip('a'..='z')
            .map(|(i, suffix)| {
                (
                    format!("{}{}.jpg", cn, suffix),
                    card.face_image_url(i, quality),
                )
            })
            .collect()
    } else {
        vec![(format!("{}.jpg", cn), card.image_url(quality))]
    }
}

/// Downloads card images into the on-disk cache
pub struct ImageDownloader<'a> {
    client: &'a ScryfallClient,
    base_dir: PathBuf,
    options: ImageOptions,
}

impl<'a> ImageDownloader<'a> {
    pub fn new(client: &'a ScryfallClient, base_dir: impl Into<PathBuf>, options: ImageOptions) -> Self {
        Self {
            client,
            base_dir: base_dir.into(),
            options,
        }
    }

    /// Download every card of a set, one at a time
    pub fn download_set(&self, set_code: &str, cards: &[ScryfallCard]) -> DownloadSummary {
        log::info!("Downloading images for {} cards...", cards.len());

        let mut summary = DownloadSummary::default();

        for (i, card) in cards.iter().enumerate() {
            log::info!("[{}/{}] {}", i + 1, cards.len(), card.name);

            let (outcome, requests) = self.download_card_counted(card, set_code);
            summary.record(outcome);

            if requests > 0 && i + 1 < cards.len() && !self.options.delay.is_zero() {
                std::thread::sleep(self.options.delay);
            }
        }

        log::info!("=== Image Download Summary ===");
        log::info!("Successful: {}", summary.successful);
        log::info!("Failed: {}", summary.failed);
        log::info!("Skipped (no image): {}", summary.skipped);
        log::info!(
            "Images saved to: {}",
            self.base_dir.join(set_code.to_lowercase()).display()
        );

        summary
    }

    /// Download all images of one card
    pub fn download_card(&self, card: &ScryfallCard, set_code: &str) -> DownloadOutcome {
        self.download_card_counted(card, set_code).0
    }

    fn download_card_counted(&self, card: &ScryfallCard, set_code: &str) -> (DownloadOutcome, usize) {
        let dir = card_image_dir(&self.base_dir, set_code, card.is_token());
        if let Err(e) = std::fs::create_dir_all(&dir) {
            log::warn!("  ✗ Failed to create {}: {}", dir.display(), e);
            return (DownloadOutcome::Failed, 0);
        }

        let mut requests = 0;
        let mut downloaded = false;
        let mut missing = false;
        let mut failed = false;

        for (file_name, url) in image_targets(card, self.options.quality) {
            let path = dir.join(&file_name);

            if path.exists() {
                log::debug!("  ✓ {} - Already exists", file_name);
                continue;
            }

            let Some(url) = url else {
                log::warn!("  ⚠ {} - No image URL available", file_name);
                missing = true;
                continue;
            };

            requests += 1;
            match self.save_image(url, &path) {
                Ok(()) => {
                    log::info!("  ✓ {} - Downloaded", file_name);
                    downloaded = true;
                }
                Err(e) => {
                    log::warn!("  ✗ {} - Failed to download: {}", file_name, e);
                    if path.exists() {
                        if let Err(e) = std::fs::remove_file(&path) {
                            log::warn!("  ✗ {} - Could not remove partial file: {}", file_name, e);
                        }
                    }
                    failed = true;
                }
            }
        }

        let outcome = if failed {
            DownloadOutcome::Failed
        } else if missing {
            DownloadOutcome::Skipped
        } else if downloaded {
            DownloadOutcome::Downloaded
        } else {
            DownloadOutcome::AlreadyPresent
        };
        (outcome, requests)
    }

    fn save_image(&self, url: &str, path: &Path) -> Result<()> {
        let bytes = self.client.fetch_image(url)?;

        match self.options.resize {
            Some((width, height)) => {
                let decoded = image::load_from_memory(&bytes)?;
                decoded
                    .resize_exact(width, height, FilterType::Lanczos3)
                    .to_rgb8()
                    .save_with_format(path, ImageFormat::Jpeg)?;
            }
            None => std::fs::write(path, &bytes)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardFace, ImageUris};

    fn uris(normal: &str) -> Option<ImageUris> {
        Some(ImageUris {
            normal: Some(normal.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_card_image_dir() {
        let base = Path::new("sets/setimages");
        assert_eq!(
            card_image_dir(base, "TLA", false),
            PathBuf::from("sets/setimages/tla/tla")
        );
        assert_eq!(
            card_image_dir(base, "TLA", true),
            PathBuf::from("sets/setimages/tla/ttla")
        );
    }

    #[test]
    fn test_image_targets_single() {
        let card = ScryfallCard {
            name: "Bolt".to_string(),
            collector_number: "161".to_string(),
            image_uris: uris("https://example.com/161.jpg"),
            ..Default::default()
        };
        assert_eq!(
            image_targets(&card, ImageQuality::Normal),
            vec![("161.jpg".to_string(), Some("https://example.com/161.jpg"))]
        );
    }

    #[test]
    fn test_image_targets_double_faced() {
        let card = ScryfallCard {
            name: "Front // Back".to_string(),
            collector_number: "7".to_string(),
            card_faces: Some(vec![
                CardFace {
                    name: "Front".to_string(),
                    image_uris: uris("https://example.com/7a.jpg"),
                    ..Default::default()
                },
                CardFace {
                    name: "Back".to_string(),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };
        assert_eq!(
            image_targets(&card, ImageQuality::Best),
            vec![
                ("7a.jpg".to_string(), Some("https://example.com/7a.jpg")),
                ("7b.jpg".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = DownloadSummary::default();
        summary.record(DownloadOutcome::Downloaded);
        summary.record(DownloadOutcome::AlreadyPresent);
        summary.record(DownloadOutcome::Skipped);
        summary.record(DownloadOutcome::Failed);
        assert_eq!(
            summary,
            DownloadSummary {
                successful: 2,
                failed: 1,
                skipped: 1
            }
        );
    }
}
