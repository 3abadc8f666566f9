mod aroma;
pub mod catalog;
mod character;
mod ids;
mod intensity;
mod note;

pub use aroma::{AromaTag, toggle_tag};
pub use character::{CHARACTER_AXIS_COUNT, CHARACTER_LABELS, CharacterAxis, default_characters};
pub use ids::NoteId;
pub use intensity::{
    AromaCategory, AromaIntensity, MAX_INTENSITY, MIDPOINT_INTENSITY, PalateIntensity,
    PalateTaste, clamp_intensity,
};
pub use note::{Comments, DEFAULT_COLOR, TastingNote};
