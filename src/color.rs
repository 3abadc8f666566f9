//! Color classification for the whiskey color value.
//!
//! Two forms are used on different surfaces: the nearest of eight reference
//! stops (detail and editor swatch) and a coarser five-band badge (list rows).

use std::fmt;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Builds a color from `0xRRGGBB`.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A reference point on the color scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub value: f32,
    pub rgb: Rgb,
    pub label: &'static str,
}

/// Reference stops in ascending order.
#[rustfmt::skip]
pub const COLOR_STOPS: [ColorStop; 8] = [
    ColorStop { value: 0.1, rgb: Rgb::from_hex(0xFEF9C3), label: "Very Light" },
    ColorStop { value: 0.3, rgb: Rgb::from_hex(0xFDE68A), label: "Light Gold" },
    ColorStop { value: 0.6, rgb: Rgb::from_hex(0xFBBF24), label: "Gold" },
    ColorStop { value: 0.9, rgb: Rgb::from_hex(0xF59E0B), label: "Deep Gold" },
    ColorStop { value: 1.2, rgb: Rgb::from_hex(0xD97706), label: "Light Amber" },
    ColorStop { value: 1.5, rgb: Rgb::from_hex(0xB45309), label: "Amber" },
    ColorStop { value: 1.8, rgb: Rgb::from_hex(0x92400E), label: "Deep Amber" },
    ColorStop { value: 2.0, rgb: Rgb::from_hex(0x7C2D12), label: "Mahogany" },
];

// Distances are compared in millionths so that f32 representation noise
// cannot break exact-halfway ties.
fn micro_units(value: f32) -> i64 {
    (f64::from(value) * 1_000_000.0).round() as i64
}

/// Returns the stop nearest to `value`.
///
/// On an exact tie the earlier stop wins.
pub fn closest_stop(value: f32) -> &'static ColorStop {
    let target = micro_units(value);
    COLOR_STOPS
        .iter()
        .min_by_key(|stop| micro_units(stop.value).abs_diff(target))
        .unwrap_or(&COLOR_STOPS[0])
}

/// Compact five-band classification used for list badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    Light,
    PaleGold,
    Gold,
    Amber,
    DeepAmber,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::PaleGold => "Pale Gold",
            Self::Gold => "Gold",
            Self::Amber => "Amber",
            Self::DeepAmber => "Deep Amber",
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            Self::Light => Rgb::from_hex(0xFEF9C3),
            Self::PaleGold => Rgb::from_hex(0xFDE68A),
            Self::Gold => Rgb::from_hex(0xFBBF24),
            Self::Amber => Rgb::from_hex(0xF59E0B),
            Self::DeepAmber => Rgb::from_hex(0xB45309),
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies `value` into a badge band. NaN counts as light.
pub fn badge(value: f32) -> Badge {
    match value {
        v if v.is_nan() || v < 0.4 => Badge::Light,
        v if v < 0.8 => Badge::PaleGold,
        v if v < 1.2 => Badge::Gold,
        v if v < 1.6 => Badge::Amber,
        _ => Badge::DeepAmber,
    }
}
