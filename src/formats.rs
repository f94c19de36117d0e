//! Generates LackeyCCG's `formats.txt` from Scryfall set legalities.

use crate::api::ScryfallClient;
use crate::error::Result;
use crate::models::ScryfallSet;
use std::path::Path;

/// Formats written, in file order, with their Scryfall legality keys
pub const FORMATS: [(&str, &str); 4] = [
    ("Standard", "standard"),
    ("Pioneer", "pioneer"),
    ("Modern", "modern"),
    ("Legacy", "legacy"),
];

/// Set codes legal in one format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSets {
    pub label: String,
    pub set_codes: Vec<String>,
}

/// Lower-cased codes of sets legal in `format`, in listing order
pub fn legal_set_codes(sets: &[ScryfallSet], format: &str) -> Vec<String> {
    sets.iter()
        .filter(|set| set.is_legal_in(format))
        .map(|set| set.code.to_lowercase())
        .collect()
}

/// Group sets by format, dropping formats without any legal set
pub fn collect_formats(sets: &[ScryfallSet]) -> Vec<FormatSets> {
    let mut formats = Vec::new();

    for (label, key) in FORMATS {
        let set_codes = legal_set_codes(sets, key);
        if set_codes.is_empty() {
            log::warn!("No sets found for {}", label);
            continue;
        }
        log::info!("Found {} sets legal in {}", set_codes.len(), label);
        formats.push(FormatSets {
            label: label.to_string(),
            set_codes,
        });
    }

    formats
}

/// Render the formats file body
pub fn render_formats(formats: &[FormatSets]) -> String {
    let mut content = String::from("<formatdefinitions>\n\n");

    for format in formats {
        content.push_str(&format!("<format><label>{}</label>\n", format.label));
        for code in &format.set_codes {
            content.push_str(&format!("\t<set>{}</set>\n", code));
        }
        content.push_str("</format>\n\n");
    }

    content.push_str("</formatdefinitions>\n");
    content
}

/// Query Scryfall and write the formats file. A failed set listing is logged
/// and produces a file without format blocks.
pub fn generate_formats_file(client: &ScryfallClient, output: &Path) -> Result<Vec<FormatSets>> {
    let sets = match client.fetch_sets() {
        Ok(sets) => sets,
        Err(e) => {
            log::error!("Error fetching sets from Scryfall: {}", e);
            Vec::new()
        }
    };

    let formats = collect_formats(&sets);
    std::fs::write(output, render_formats(&formats))?;

    log::info!("Successfully generated {}", output.display());
    for format in &formats {
        log::info!("  {}: {} sets", format.label, format.set_codes.len());
    }

    Ok(formats)
}
