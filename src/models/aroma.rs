use serde::{Deserialize, Serialize};

/// A specific named aroma picked within a (category, sub-category) pair.
///
/// Tags sit on top of the coarse intensity sliders. `category` is expected to
/// be one of the [`AromaCategory`](super::AromaCategory) names so the radar
/// chart can annotate the matching axis, but nothing rejects other values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AromaTag {
    pub category: String,
    pub sub_category: String,
    pub name: String,
}

impl AromaTag {
    pub fn new(
        category: impl Into<String>,
        sub_category: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            sub_category: sub_category.into(),
            name: name.into(),
        }
    }

    fn matches(&self, category: &str, sub_category: &str, name: &str) -> bool {
        self.category == category && self.sub_category == sub_category && self.name == name
    }
}

/// Removes the exact (category, sub-category, name) triple if present,
/// otherwise appends it.
///
/// Returns `true` when the tag ended up selected.
pub fn toggle_tag(
    tags: &mut Vec<AromaTag>,
    category: &str,
    sub_category: &str,
    name: &str,
) -> bool {
    if tags.iter().any(|t| t.matches(category, sub_category, name)) {
        tags.retain(|t| !t.matches(category, sub_category, name));
        false
    } else {
        tags.push(AromaTag::new(category, sub_category, name));
        true
    }
}
