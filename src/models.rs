//! Serde models for the Scryfall card-search and set-listing endpoints.

use crate::images::ImageQuality;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scryfall card response
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ScryfallCard {
    pub name: String,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub collector_number: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    /// Mana value; shared by both faces of a double-faced card
    #[serde(default)]
    pub cmc: f64,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub loyalty: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    /// For double-faced cards, per-face data and images are in card_faces
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub large: Option<String>,
    pub png: Option<String>,
    pub art_crop: Option<String>,
    pub border_crop: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CardFace {
    pub name: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub loyalty: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

impl ImageUris {
    /// Pick a URL according to the quality preference
    pub fn preferred(&self, quality: ImageQuality) -> Option<&str> {
        match quality {
            ImageQuality::Normal => self.normal.as_deref(),
            ImageQuality::Best => self
                .border_crop
                .as_deref()
                .or(self.large.as_deref())
                .or(self.normal.as_deref())
                .or(self.small.as_deref()),
        }
    }
}

impl ScryfallCard {
    /// Faces of a double-faced card, empty for single-faced cards
    pub fn faces(&self) -> &[CardFace] {
        match self.card_faces.as_deref() {
            Some(faces) if faces.len() >= 2 => faces,
            _ => &[],
        }
    }

    pub fn is_double_faced(&self) -> bool {
        !self.faces().is_empty()
    }

    /// Tokens go into a separate `t<set>` image directory
    pub fn is_token(&self) -> bool {
        self.type_line
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains("token"))
    }

    /// Get the primary image URL: the front face first, then the card itself
    pub fn image_url(&self, quality: ImageQuality) -> Option<&str> {
        if let Some(ref faces) = self.card_faces {
            if let Some(uris) = faces.first().and_then(|f| f.image_uris.as_ref()) {
                return uris.preferred(quality);
            }
        }
        self.image_uris.as_ref().and_then(|u| u.preferred(quality))
    }

    /// Image URL for one face, falling back to the card's own images when the
    /// face has none (split and adventure layouts)
    pub fn face_image_url(&self, index: usize, quality: ImageQuality) -> Option<&str> {
        let face_uris = self
            .faces()
            .get(index)
            .and_then(|face| face.image_uris.as_ref());
        match face_uris {
            Some(uris) => uris.preferred(quality),
            None => self.image_uris.as_ref().and_then(|u| u.preferred(quality)),
        }
    }
}

/// One page of `/cards/search`
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub data: Vec<ScryfallCard>,
    #[serde(default)]
    pub has_more: bool,
}

/// A set entry from `/sets`
#[derive(Debug, Deserialize, Clone)]
pub struct ScryfallSet {
    pub code: String,
    /// Format name to legality ("legal", "not_legal", ...)
    #[serde(default)]
    pub legalities: HashMap<String, String>,
}

impl ScryfallSet {
    pub fn is_legal_in(&self, format: &str) -> bool {
        self.legalities.get(format).is_some_and(|l| l == "legal")
    }
}

/// Response of `/sets`
#[derive(Debug, Deserialize)]
pub struct SetList {
    #[serde(default)]
    pub data: Vec<ScryfallSet>,
    #[serde(default)]
    pub has_more: bool,
}

/// Scryfall API error response
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct ScryfallError {
    pub status: u16,
    pub code: String,
    pub details: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scryfall_card_deserialize_minimal() {
        let card: ScryfallCard = serde_json::from_str(r#"{"name": "Test Card"}"#).unwrap();
        assert_eq!(card.name, "Test Card");
        assert!(card.image_uris.is_none());
        assert!(card.card_faces.is_none());
        assert_eq!(card.cmc, 0.0);
        assert!(!card.is_double_faced());
    }

    #[test]
    fn test_image_url_prefers_border_crop() {
        let card: ScryfallCard = serde_json::from_str(
            r#"{
                "name": "Black Lotus",
                "image_uris": {
                    "normal": "https://example.com/normal.jpg",
                    "large": "https://example.com/large.jpg",
                    "border_crop": "https://example.com/border.jpg"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            card.image_url(ImageQuality::Best),
            Some("https://example.com/border.jpg")
        );
        assert_eq!(
            card.image_url(ImageQuality::Normal),
            Some("https://example.com/normal.jpg")
        );
    }

    #[test]
    fn test_image_url_best_falls_back_to_small() {
        let uris = ImageUris {
            small: Some("s".to_string()),
            ..Default::default()
        };
        assert_eq!(uris.preferred(ImageQuality::Best), Some("s"));
        assert_eq!(uris.preferred(ImageQuality::Normal), None);
    }

    #[test]
    fn test_image_url_double_faced_uses_front() {
        let card: ScryfallCard = serde_json::from_str(
            r#"{
                "name": "Delver of Secrets // Insectile Aberration",
                "card_faces": [
                    {"name": "Delver of Secrets", "image_uris": {"normal": "https://example.com/front.jpg"}},
                    {"name": "Insectile Aberration", "image_uris": {"normal": "https://example.com/back.jpg"}}
                ]
            }"#,
        )
        .unwrap();
        assert!(card.is_double_faced());
        assert_eq!(
            card.image_url(ImageQuality::Normal),
            Some("https://example.com/front.jpg")
        );
        assert_eq!(
            card.face_image_url(1, ImageQuality::Best),
            Some("https://example.com/back.jpg")
        );
    }

    #[test]
    fn test_face_image_url_falls_back_to_card() {
        let card: ScryfallCard = serde_json::from_str(
            r#"{
                "name": "Bonecrusher Giant // Stomp",
                "image_uris": {"normal": "https://example.com/whole.jpg"},
                "card_faces": [{"name": "Bonecrusher Giant"}, {"name": "Stomp"}]
            }"#,
        )
        .unwrap();
        assert_eq!(
            card.face_image_url(0, ImageQuality::Normal),
            Some("https://example.com/whole.jpg")
        );
        assert_eq!(
            card.face_image_url(1, ImageQuality::Normal),
            Some("https://example.com/whole.jpg")
        );
    }

    #[test]
    fn test_single_face_list_is_not_double_faced() {
        let card = ScryfallCard {
            name: "Odd".to_string(),
            card_faces: Some(vec![CardFace::default()]),
            ..Default::default()
        };
        assert!(!card.is_double_faced());
    }

    #[test]
    fn test_is_token() {
        let card = ScryfallCard {
            name: "Spirit".to_string(),
            type_line: Some("Token Creature — Spirit".to_string()),
            ..Default::default()
        };
        assert!(card.is_token());
        assert!(!ScryfallCard::default().is_token());
    }

    #[test]
    fn test_set_legality() {
        let set: ScryfallSet = serde_json::from_str(
            r#"{"code": "DSK", "legalities": {"standard": "legal", "legacy": "not_legal"}}"#,
        )
        .unwrap();
        assert!(set.is_legal_in("standard"));
        assert!(!set.is_legal_in("legacy"));
        assert!(!set.is_legal_in("modern"));
    }
}
