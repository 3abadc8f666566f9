use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of every intensity slider.
pub const MAX_INTENSITY: u8 = 10;

/// Midpoint used as the default for palate and character sliders.
pub const MIDPOINT_INTENSITY: u8 = 5;

/// Clamps a raw slider reading into `0..=MAX_INTENSITY`.
pub fn clamp_intensity(value: i64) -> u8 {
    value.clamp(0, i64::from(MAX_INTENSITY)) as u8
}

/// The seven smell categories shared by the aroma and retronasal groups.
///
/// The declaration order is the axis order of the radar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AromaCategory {
    Spice,
    Peat,
    Grain,
    Floral,
    Fruit,
    Wood,
    Other,
}

impl AromaCategory {
    /// All categories in chart order.
    pub const ALL: [AromaCategory; 7] = [
        Self::Spice,
        Self::Peat,
        Self::Grain,
        Self::Floral,
        Self::Fruit,
        Self::Wood,
        Self::Other,
    ];

    /// Display name, also the value stored in `AromaTag::category`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Spice => "Spice",
            Self::Peat => "Peat",
            Self::Grain => "Grain",
            Self::Floral => "Floral",
            Self::Fruit => "Fruit",
            Self::Wood => "Wood",
            Self::Other => "Other",
        }
    }

    /// Looks a category up by its display name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for AromaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The six basic tastes rated on the palate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PalateTaste {
    Sweetness,
    Sourness,
    Bitterness,
    Fatty,
    Salty,
    Umami,
}

impl PalateTaste {
    /// All tastes in chart order.
    pub const ALL: [PalateTaste; 6] = [
        Self::Sweetness,
        Self::Sourness,
        Self::Bitterness,
        Self::Fatty,
        Self::Salty,
        Self::Umami,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sweetness => "Sweetness",
            Self::Sourness => "Sourness",
            Self::Bitterness => "Bitterness",
            Self::Fatty => "Fatty",
            Self::Salty => "Salty",
            Self::Umami => "Umami",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|taste| taste.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for PalateTaste {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Seven aroma sliders, used for both the nose and the retronasal group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AromaIntensity {
    pub spice: u8,
    pub peat: u8,
    pub grain: u8,
    pub floral: u8,
    pub fruit: u8,
    pub wood: u8,
    pub other: u8,
}

impl AromaIntensity {
    pub fn get(&self, category: AromaCategory) -> u8 {
        match category {
            AromaCategory::Spice => self.spice,
            AromaCategory::Peat => self.peat,
            AromaCategory::Grain => self.grain,
            AromaCategory::Floral => self.floral,
            AromaCategory::Fruit => self.fruit,
            AromaCategory::Wood => self.wood,
            AromaCategory::Other => self.other,
        }
    }

    /// Sets one slider, clamping into `0..=MAX_INTENSITY`.
    pub fn set(&mut self, category: AromaCategory, value: u8) {
        let value = value.min(MAX_INTENSITY);
        let slot = match category {
            AromaCategory::Spice => &mut self.spice,
            AromaCategory::Peat => &mut self.peat,
            AromaCategory::Grain => &mut self.grain,
            AromaCategory::Floral => &mut self.floral,
            AromaCategory::Fruit => &mut self.fruit,
            AromaCategory::Wood => &mut self.wood,
            AromaCategory::Other => &mut self.other,
        };
        *slot = value;
    }

    /// Ordered `(category name, value)` pairs for the radar chart.
    pub fn chart_values(&self) -> Vec<(String, u8)> {
        AromaCategory::ALL
            .into_iter()
            .map(|category| (category.name().to_string(), self.get(category)))
            .collect()
    }
}

/// Six palate sliders; every slider defaults to the midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalateIntensity {
    pub sweetness: u8,
    pub sourness: u8,
    pub bitterness: u8,
    pub fatty: u8,
    pub salty: u8,
    pub umami: u8,
}

impl Default for PalateIntensity {
    fn default() -> Self {
        Self {
            sweetness: MIDPOINT_INTENSITY,
            sourness: MIDPOINT_INTENSITY,
            bitterness: MIDPOINT_INTENSITY,
            fatty: MIDPOINT_INTENSITY,
            salty: MIDPOINT_INTENSITY,
            umami: MIDPOINT_INTENSITY,
        }
    }
}

impl PalateIntensity {
    pub fn get(&self, taste: PalateTaste) -> u8 {
        match taste {
            PalateTaste::Sweetness => self.sweetness,
            PalateTaste::Sourness => self.sourness,
            PalateTaste::Bitterness => self.bitterness,
            PalateTaste::Fatty => self.fatty,
            PalateTaste::Salty => self.salty,
            PalateTaste::Umami => self.umami,
        }
    }

    /// Sets one slider, clamping into `0..=MAX_INTENSITY`.
    pub fn set(&mut self, taste: PalateTaste, value: u8) {
        let value = value.min(MAX_INTENSITY);
        let slot = match taste {
            PalateTaste::Sweetness => &mut self.sweetness,
            PalateTaste::Sourness => &mut self.sourness,
            PalateTaste::Bitterness => &mut self.bitterness,
            PalateTaste::Fatty => &mut self.fatty,
            PalateTaste::Salty => &mut self.salty,
            PalateTaste::Umami => &mut self.umami,
        };
        *slot = value;
    }

    pub fn chart_values(&self) -> Vec<(String, u8)> {
        PalateTaste::ALL
            .into_iter()
            .map(|taste| (taste.name().to_string(), self.get(taste)))
            .collect()
    }
}
