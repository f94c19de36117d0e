//! Registers card data files in LackeyCCG's `ListOfCardDataFiles.txt`.

use std::path::Path;

/// Manifest file name in the plugin root
pub const MANIFEST_FILE: &str = "ListOfCardDataFiles.txt";

const CLOSING_TAG: &str = "</listofcarddatafiles>";

/// What [`update_manifest`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestUpdate {
    Inserted,
    AlreadyPresent,
    /// Manifest missing, unreadable or without a closing tag
    Skipped,
}

/// Include tag for a data file name
pub fn include_tag(file_name: &str) -> String {
    format!("<filetoinclude>{}</filetoinclude>", file_name)
}

/// Insert an include tag before the closing tag. Returns `None` when the tag
/// is already present or the closing tag is missing.
pub fn insert_include(content: &str, file_name: &str) -> Option<String> {
    let tag = include_tag(file_name);
    if content.contains(&tag) {
        return None;
    }

    let position = content.find(CLOSING_TAG)?;
    let mut updated = String::with_capacity(content.len() + tag.len() + 1);
    updated.push_str(&content[..position]);
    updated.push_str(&tag);
    updated.push('\n');
    updated.push_str(&content[position..]);
    Some(updated)
}

/// Add `file_name` to the manifest at `manifest_path` if it is not listed yet.
/// Any problem with the manifest is logged and the registration skipped.
pub fn update_manifest(manifest_path: &Path, file_name: &str) -> ManifestUpdate {
    if !manifest_path.exists() {
        log::warn!(
            "{} not found, skipping registration of {}",
            manifest_path.display(),
            file_name
        );
        return ManifestUpdate::Skipped;
    }

    let content = match std::fs::read_to_string(manifest_path) {
        Ok(content) => content,
        Err(e) => {
            log::warn!(
                "Could not read {}: {}, skipping registration of {}",
                manifest_path.display(),
                e,
                file_name
            );
            return ManifestUpdate::Skipped;
        }
    };

    if content.contains(&include_tag(file_name)) {
        log::info!("{} already in {}", file_name, manifest_path.display());
        return ManifestUpdate::AlreadyPresent;
    }

    match insert_include(&content, file_name) {
        Some(updated) => match std::fs::write(manifest_path, updated) {
            Ok(()) => {
                log::info!("Updated {} to include {}", manifest_path.display(), file_name);
                ManifestUpdate::Inserted
            }
            Err(e) => {
                log::warn!(
                    "Could not write {}: {}, {} not registered",
                    manifest_path.display(),
                    e,
                    file_name
                );
                ManifestUpdate::Skipped
            }
        },
        None => {
            log::warn!(
                "{} has no {} tag, not updating",
                manifest_path.display(),
                CLOSING_TAG
            );
            ManifestUpdate::Skipped
        }
    }
}
