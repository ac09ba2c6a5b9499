//! Goal categories and their display colours.

use serde::{Deserialize, Serialize};

use super::{Entity, EntityId};

/// An sRGB colour parsed from a category's `#RRGGBB` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

/// A category as served by `users/categories/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// API identifier.
    pub id: EntityId,
    /// Category title.
    #[serde(default)]
    pub title: String,
    /// Header colour as `#RRGGBB`.
    #[serde(default)]
    pub color: String,
    /// Round icon shown in goal headers.
    #[serde(default)]
    pub icon_url: String,
    /// Hero image shown on goal detail.
    #[serde(default)]
    pub image_url: String,
}

impl Category {
    /// Parse [`Self::color`]; `None` when it is not a `#RRGGBB` string.
    ///
    /// # Examples
    /// ```
    /// use compass::domain::{Category, Rgb};
    ///
    /// let category: Category =
    ///     serde_json::from_str(r##"{"id": 1, "color": "#2E7D32"}"##).expect("category");
    /// assert_eq!(category.parsed_color(), Some(Rgb { red: 0x2E, green: 0x7D, blue: 0x32 }));
    /// ```
    #[must_use]
    pub fn parsed_color(&self) -> Option<Rgb> {
        let hex = self.color.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
        };
        Some(Rgb {
            red: channel(0..2)?,
            green: channel(2..4)?,
            blue: channel(4..6)?,
        })
    }

    /// Hero image URL, if the category has one.
    #[must_use]
    pub fn hero_image(&self) -> Option<&str> {
        let url = self.image_url.trim();
        (!url.is_empty()).then_some(url)
    }
}

impl Entity for Category {
    const KIND: &'static str = "category";

    fn id(&self) -> EntityId {
        self.id
    }
}
