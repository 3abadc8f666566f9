use serde::{Deserialize, Serialize};

use super::intensity::{MAX_INTENSITY, MIDPOINT_INTENSITY};

/// Number of bipolar character sliders every note carries.
pub const CHARACTER_AXIS_COUNT: usize = 4;

/// Fixed label pairs, in display order.
pub const CHARACTER_LABELS: [(&str, &str); CHARACTER_AXIS_COUNT] = [
    ("Dry", "Oily"),
    ("Light", "Heavy"),
    ("Mild", "Spicy"),
    ("Smooth", "Intense"),
];

/// A bipolar descriptive slider between two opposite qualities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterAxis {
    #[serde(rename = "left")]
    pub left_label: String,
    #[serde(rename = "right")]
    pub right_label: String,
    pub value: u8,
}

impl CharacterAxis {
    pub fn new(left_label: impl Into<String>, right_label: impl Into<String>, value: u8) -> Self {
        Self {
            left_label: left_label.into(),
            right_label: right_label.into(),
            value: value.min(MAX_INTENSITY),
        }
    }
}

/// The four axes a fresh note is seeded with, all at the midpoint.
pub fn default_characters() -> Vec<CharacterAxis> {
    CHARACTER_LABELS
        .iter()
        .map(|(left, right)| CharacterAxis::new(*left, *right, MIDPOINT_INTENSITY))
        .collect()
}
