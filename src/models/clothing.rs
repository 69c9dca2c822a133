use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClothingType {
    TShirt,
    Shirt,
    Hoodie,
    Jacket,
    Sweater,
    Dress,
    Pants,
    Shorts,
    Skirt,
}

impl ClothingType {
    pub const ALL: [ClothingType; 9] = [
        ClothingType::TShirt,
        ClothingType::Shirt,
        ClothingType::Hoodie,
        ClothingType::Jacket,
        ClothingType::Sweater,
        ClothingType::Dress,
        ClothingType::Pants,
        ClothingType::Shorts,
        ClothingType::Skirt,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ClothingType::TShirt => "T-Shirt",
            ClothingType::Shirt => "Shirt",
            ClothingType::Hoodie => "Hoodie",
            ClothingType::Jacket => "Jacket",
            ClothingType::Sweater => "Sweater",
            ClothingType::Dress => "Dress",
            ClothingType::Pants => "Pants",
            ClothingType::Shorts => "Shorts",
            ClothingType::Skirt => "Skirt",
        }
    }

    /// Garments that can be worn fastened or open.
    pub fn supports_open_closed(&self) -> bool {
        matches!(
            self,
            ClothingType::Jacket | ClothingType::Hoodie | ClothingType::Shirt | ClothingType::Dress
        )
    }

    fn fastening(&self) -> Option<Fastening> {
        match self {
            ClothingType::Jacket | ClothingType::Hoodie => Some(Fastening::Zip),
            ClothingType::Shirt | ClothingType::Dress => Some(Fastening::Buttons),
            _ => None,
        }
    }
}

enum Fastening {
    Zip,
    Buttons,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitStyle {
    Tight,
    Regular,
    Relaxed,
    Oversize,
}

impl FitStyle {
    pub const ALL: [FitStyle; 4] = [
        FitStyle::Tight,
        FitStyle::Regular,
        FitStyle::Relaxed,
        FitStyle::Oversize,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            FitStyle::Tight => "Tight",
            FitStyle::Regular => "Regular",
            FitStyle::Relaxed => "Relaxed",
            FitStyle::Oversize => "Oversize",
        }
    }

    /// Fixed wording for how the garment sits on the body.
    pub fn description(&self) -> &'static str {
        match self {
            FitStyle::Tight => {
                "the clothing should hug the body closely, showing the body's contours and silhouette. Minimal fabric bunching or looseness."
            }
            FitStyle::Regular => {
                "the clothing should fit comfortably with a standard amount of room. Not too tight, not too loose - just right for everyday wear."
            }
            FitStyle::Relaxed => {
                "the clothing should be loose and comfortable with extra room throughout. The fabric should drape naturally with some slack."
            }
            FitStyle::Oversize => {
                "the clothing should be significantly oversized with plenty of extra fabric. Think street style - loose, baggy, and intentionally large. The garment should hang well past normal fitting points."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClothingState {
    Open,
    Closed,
}

impl ClothingState {
    pub fn display_name(&self) -> &'static str {
        match self {
            ClothingState::Open => "Open",
            ClothingState::Closed => "Closed",
        }
    }
}

/// The three style knobs chosen for one try-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOptions {
    pub clothing_type: ClothingType,
    pub fit_style: FitStyle,
    pub clothing_state: ClothingState,
}

impl Default for StyleOptions {
    fn default() -> Self {
        StyleOptions {
            clothing_type: ClothingType::TShirt,
            fit_style: FitStyle::Regular,
            clothing_state: ClothingState::Closed,
        }
    }
}

impl StyleOptions {
    pub fn new(clothing_type: ClothingType, fit_style: FitStyle, clothing_state: ClothingState) -> Self {
        Self {
            clothing_type,
            fit_style,
            clothing_state,
        }
    }

    /// Open/closed directive, or `None` when the garment has no such state.
    pub fn state_directive(&self) -> Option<&'static str> {
        let fastening = self.clothing_type.fastening()?;
        let directive = match (self.clothing_state, fastening) {
            (ClothingState::Closed, Fastening::Zip) => {
                "The garment should be fully zipped up and closed."
            }
            (ClothingState::Closed, Fastening::Buttons) => {
                "The garment should be fully buttoned up and closed."
            }
            (ClothingState::Open, Fastening::Zip) => {
                "The garment should be unzipped and open, showing what's underneath."
            }
            (ClothingState::Open, Fastening::Buttons) => {
                "The garment should be unbuttoned and open, showing what's underneath."
            }
        };
        Some(directive)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown style value: {0}")]
pub struct ParseStyleError(pub String);

fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['_', ' '], "-")
}

impl FromStr for ClothingType {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "t-shirt" | "tshirt" | "tee" => Ok(ClothingType::TShirt),
            "shirt" => Ok(ClothingType::Shirt),
            "hoodie" => Ok(ClothingType::Hoodie),
            "jacket" => Ok(ClothingType::Jacket),
            "sweater" => Ok(ClothingType::Sweater),
            "dress" => Ok(ClothingType::Dress),
            "pants" => Ok(ClothingType::Pants),
            "shorts" => Ok(ClothingType::Shorts),
            "skirt" => Ok(ClothingType::Skirt),
            _ => Err(ParseStyleError(s.to_string())),
        }
    }
}

impl FromStr for FitStyle {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "tight" => Ok(FitStyle::Tight),
            "regular" => Ok(FitStyle::Regular),
            "relaxed" => Ok(FitStyle::Relaxed),
            "oversize" | "oversized" => Ok(FitStyle::Oversize),
            _ => Err(ParseStyleError(s.to_string())),
        }
    }
}

impl FromStr for ClothingState {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "open" => Ok(ClothingState::Open),
            "closed" => Ok(ClothingState::Closed),
            _ => Err(ParseStyleError(s.to_string())),
        }
    }
}
