//! Field transformer: turns one Scryfall card into LackeyCCG output records.
//!
//! A single-faced card yields one record. A double-faced card yields a front
//! record (`<cn>a`, sourced from face 0, carrying a spawn script) and a back
//! record (`<cn>b`, sourced from face 1, name prefixed with `[set]`).

use crate::models::{CardFace, ScryfallCard};
use lazy_static::lazy_static;
use regex::Regex;

/// Column names of a LackeyCCG card data file, in order
pub const HEADER: [&str; 17] = [
    "Name",
    "Set",
    "ImageFile",
    "ActualSet",
    "Color",
    "ColorID",
    "Cost",
    "ManaValue",
    "Type",
    "Power",
    "Toughness",
    "Loyalty",
    "Rarity",
    "DraftQualities",
    "Sound",
    "Script",
    "Text",
];

/// Type keywords with a sound, other than creature
const SOUND_TYPES: [&str; 5] = ["artifact", "instant", "enchantment", "sorcery", "land"];

const COLOR_ORDER: [&str; 5] = ["W", "U", "B", "R", "G"];

lazy_static! {
    static ref REMINDER_TEXT: Regex = Regex::new(r"\s*\([^)]*\)\s*").unwrap();
}

/// Case applied to the inside of `{...}` mana symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManaCase {
    #[default]
    Upper,
    Lower,
}

/// How the Color column joins color letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSeparator {
    /// `WU`
    #[default]
    None,
    /// `W U`
    Space,
}

/// Output variant switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub mana_case: ManaCase,
    pub color_separator: ColorSeparator,
}

/// One row of the card data file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputRecord {
    pub name: String,
    pub set: String,
    pub image_file: String,
    pub actual_set: String,
    pub color: String,
    pub color_id: String,
    pub cost: String,
    pub mana_value: String,
    pub type_line: String,
    pub power: String,
    pub toughness: String,
    pub loyalty: String,
    pub rarity: String,
    pub draft_qualities: String,
    pub sound: String,
    pub script: String,
    pub text: String,
}

impl OutputRecord {
    /// Fields in column order
    pub fn fields(&self) -> [&str; 17] {
        [
            &self.name,
            &self.set,
            &self.image_file,
            &self.actual_set,
            &self.color,
            &self.color_id,
            &self.cost,
            &self.mana_value,
            &self.type_line,
            &self.power,
            &self.toughness,
            &self.loyalty,
            &self.rarity,
            &self.draft_qualities,
            &self.sound,
            &self.script,
            &self.text,
        ]
    }
}

/// Case-fold the interior of every `{...}` token, leaving everything else alone.
///
/// `{2}{w}{u}` becomes `{2}{W}{U}` with [`ManaCase::Upper`]. An unterminated
/// `{` passes the remainder through unchanged.
pub fn normalize_mana_cost(cost: &str, case: ManaCase) -> String {
    let mut result = String::with_capacity(cost.len());
    let mut rest = cost;

    while let Some(start) = rest.find('{') {
        result.push_str(&rest[..start]);
        let token = &rest[start..];

        let Some(end) = token.find('}') else {
            result.push_str(token);
            return result;
        };

        let inner = &token[1..end];
        result.push('{');
        match case {
            ManaCase::Upper => result.push_str(&inner.to_uppercase()),
            ManaCase::Lower => result.push_str(&inner.to_lowercase()),
        }
        result.push('}');
        rest = &token[end + 1..];
    }

    result.push_str(rest);
    result
}

fn color_rank(color: &str) -> usize {
    COLOR_ORDER
        .iter()
        .position(|c| *c == color)
        .unwrap_or(COLOR_ORDER.len())
}

fn sorted_colors(colors: &[String]) -> Vec<&str> {
    let mut sorted: Vec<&str> = colors.iter().map(String::as_str).collect();
    sorted.sort_by_key(|c| color_rank(c));
    sorted
}

/// Colors in WUBRG order, concatenated: `["U", "W"]` → `WU`
pub fn color_id(colors: &[String]) -> String {
    sorted_colors(colors).concat()
}

/// Colors in WUBRG order for the Color column
pub fn color_string(colors: &[String], separator: ColorSeparator) -> String {
    let sorted = sorted_colors(colors);
    match separator {
        ColorSeparator::None => sorted.concat(),
        ColorSeparator::Space => sorted.join(" "),
    }
}

/// Sound for a type line. Creature always wins; otherwise exactly one of the
/// other sound types must match.
pub fn sound_for(type_line: &str) -> &'static str {
    let lower = type_line.to_lowercase();

    if lower.contains("creature") {
        return "creature";
    }

    let mut matched = SOUND_TYPES.iter().filter(|t| lower.contains(*t));
    match (matched.next(), matched.next()) {
        (Some(sound), None) => *sound,
        _ => "",
    }
}

/// Script that lets the client spawn the back face of a double-faced card
pub fn flip_script(card: &ScryfallCard, set_code: &str) -> String {
    match card.faces().get(1) {
        Some(back) => format!(
            "<s><l>Create other side</l><f>/spawn [{}] {}</f></s>",
            set_code, back.name
        ),
        None => String::new(),
    }
}

/// Drop reminder text and flatten line breaks into ` | `
pub fn clean_oracle_text(text: &str) -> String {
    REMINDER_TEXT
        .replace_all(text, " ")
        .trim()
        .replace('\n', " | ")
}

/// First letter of the rarity, upper-cased
pub fn rarity_letter(rarity: Option<&str>) -> String {
    rarity
        .and_then(|r| r.chars().next())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Per-face values that differ between the front, the back and a plain card
struct FaceFields<'a> {
    colors: &'a [String],
    mana_cost: &'a str,
    type_line: &'a str,
    power: &'a str,
    toughness: &'a str,
    loyalty: &'a str,
    oracle_text: &'a str,
}

impl<'a> FaceFields<'a> {
    fn from_card(card: &'a ScryfallCard) -> Self {
        Self {
            colors: card.colors.as_deref().unwrap_or_default(),
            mana_cost: card.mana_cost.as_deref().unwrap_or_default(),
            type_line: card.type_line.as_deref().unwrap_or_default(),
            power: card.power.as_deref().unwrap_or_default(),
            toughness: card.toughness.as_deref().unwrap_or_default(),
            loyalty: card.loyalty.as_deref().unwrap_or_default(),
            oracle_text: card.oracle_text.as_deref().unwrap_or_default(),
        }
    }

    fn from_face(card: &'a ScryfallCard, face: &'a CardFace) -> Self {
        Self {
            colors: face
                .colors
                .as_deref()
                .or(card.colors.as_deref())
                .unwrap_or_default(),
            mana_cost: face.mana_cost.as_deref().unwrap_or_default(),
            type_line: face.type_line.as_deref().unwrap_or_default(),
            power: face.power.as_deref().unwrap_or_default(),
            toughness: face.toughness.as_deref().unwrap_or_default(),
            loyalty: face.loyalty.as_deref().unwrap_or_default(),
            oracle_text: face.oracle_text.as_deref().unwrap_or_default(),
        }
    }
}

fn build_record(
    card: &ScryfallCard,
    name: String,
    set_code: &str,
    image_file: String,
    fields: FaceFields<'_>,
    script: String,
    options: FormatOptions,
) -> OutputRecord {
    OutputRecord {
        name,
        set: set_code.to_string(),
        image_file,
        actual_set: set_code.to_string(),
        color: color_string(fields.colors, options.color_separator),
        color_id: color_id(fields.colors),
        cost: normalize_mana_cost(fields.mana_cost, options.mana_case),
        mana_value: (card.cmc.max(0.0).trunc() as u64).to_string(),
        type_line: fields.type_line.to_string(),
        power: fields.power.to_string(),
        toughness: fields.toughness.to_string(),
        loyalty: fields.loyalty.to_string(),
        rarity: rarity_letter(card.rarity.as_deref()),
        draft_qualities: String::new(),
        sound: sound_for(fields.type_line).to_string(),
        script,
        text: clean_oracle_text(fields.oracle_text),
    }
}

/// Format a card into one record, or two for a double-faced card
pub fn format_card(card: &ScryfallCard, set_code: &str, options: FormatOptions) -> Vec<OutputRecord> {
    let set_code = set_code.to_lowercase();
    let cn = &card.collector_number;

    match card.faces() {
        [front, back, ..] => {
            let front_record = build_record(
                card,
                card.name.clone(),
                &set_code,
                format!("{}/{}a", set_code, cn),
                FaceFields::from_face(card, front),
                flip_script(card, &set_code),
                options,
            );
            let back_record = build_record(
                card,
                format!("[{}] {}", set_code, back.name),
                &set_code,
                format!("{}/{}b", set_code, cn),
                FaceFields::from_face(card, back),
                String::new(),
                options,
            );
            vec![front_record, back_record]
        }
        _ => vec![build_record(
            card,
            card.name.clone(),
            &set_code,
            format!("{}/{}", set_code, cn),
            FaceFields::from_card(card),
            String::new(),
            options,
        )],
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
