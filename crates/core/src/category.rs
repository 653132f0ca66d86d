//! Product categories and the small enumerations hanging off them.
//!
//! Every enum here round-trips through the lowercase string form used by the
//! preset store and the generation backend.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Top-level product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Men,
    Women,
    Kids,
    Jewellery,
}

/// All categories in display order.
pub const ALL_CATEGORIES: [Category; 4] = [
    Category::Men,
    Category::Women,
    Category::Kids,
    Category::Jewellery,
];

impl Category {
    /// Parse the wire form (`men`, `women`, `kids`, `jewellery`).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "men" => Ok(Self::Men),
            "women" => Ok(Self::Women),
            "kids" => Ok(Self::Kids),
            "jewellery" => Ok(Self::Jewellery),
            _ => Err(CoreError::Validation(format!(
                "Invalid category '{s}'. Must be one of: men, women, kids, jewellery"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Kids => "kids",
            Self::Jewellery => "jewellery",
        }
    }

    /// Categories whose product step takes exactly one image and has no
    /// garment slots.
    pub fn is_single_image(self) -> bool {
        matches!(self, Self::Jewellery)
    }

    /// Categories that carry hair style, fit type and body type in presets.
    pub fn has_styling_options(self) -> bool {
        matches!(self, Self::Men | Self::Women)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Upload type
// ---------------------------------------------------------------------------

/// How the product is photographed: garment by garment, or as one full image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadType {
    #[default]
    Parts,
    Full,
}

impl UploadType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parts => "parts",
            Self::Full => "full",
        }
    }
}

// ---------------------------------------------------------------------------
// Kids metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KidsGender {
    #[default]
    Boy,
    Girl,
}

impl KidsGender {
    /// Lenient parse used when reading stored presets; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "boy" => Some(Self::Boy),
            "girl" => Some(Self::Girl),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boy => "boy",
            Self::Girl => "girl",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Toddler,
    #[default]
    Child,
    Preteen,
}

impl AgeGroup {
    /// Lenient parse used when reading stored presets; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "toddler" => Some(Self::Toddler),
            "child" => Some(Self::Child),
            "preteen" => Some(Self::Preteen),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Toddler => "toddler",
            Self::Child => "child",
            Self::Preteen => "preteen",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_round_trips() {
        for category in ALL_CATEGORIES {
            assert_eq!(Category::parse(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn category_parse_rejects_unknown() {
        let err = Category::parse("shoes").unwrap_err();
        assert!(err.to_string().contains("shoes"));
    }

    #[test]
    fn only_jewellery_is_single_image() {
        assert!(Category::Jewellery.is_single_image());
        assert!(!Category::Men.is_single_image());
        assert!(!Category::Kids.is_single_image());
    }

    #[test]
    fn kids_enums_parse_leniently() {
        assert_eq!(KidsGender::parse("girl"), Some(KidsGender::Girl));
        assert_eq!(KidsGender::parse("other"), None);
        assert_eq!(AgeGroup::parse("preteen"), Some(AgeGroup::Preteen));
        assert_eq!(AgeGroup::parse(""), None);
    }

    #[test]
    fn upload_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UploadType::Full).unwrap(), "\"full\"");
        assert_eq!(UploadType::default(), UploadType::Parts);
    }
}
