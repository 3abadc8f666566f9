//! Fixed aroma vocabulary the editor offers for tag selection.
//!
//! Three levels: category (one of [`AromaCategory`]) → sub-category → aroma.

use super::AromaCategory;

type SubCategories = &'static [&'static str];
type Aromas = &'static [&'static str];

const CATEGORIES: &[(AromaCategory, SubCategories)] = &[
    (
        AromaCategory::Spice,
        &["Herbal", "Dried Fruit", "Baking Spice", "Hot Spice"],
    ),
    (
        AromaCategory::Peat,
        &["Peat Smoke", "Industrial", "Maritime", "Plastic"],
    ),
    (AromaCategory::Grain, &["Malt", "Nutty", "Sugars", "Leather"]),
    (AromaCategory::Floral, &["Vegetal", "Blossom", "Nature"]),
    (
        AromaCategory::Fruit,
        &["Citrus", "Fresh Fruit", "Dried Fruits", "Baked Fruit", "Dessert"],
    ),
    (
        AromaCategory::Wood,
        &["Fresh Wood", "Old Wood", "Vanilla", "Smoky Wood", "Tanned Leather"],
    ),
    (
        AromaCategory::Other,
        &[
            "Nut Oil",
            "Cereal Products",
            "Dairy",
            "Mineral",
            "Medicinal",
            "Metallic",
            "Chemical",
        ],
    ),
];

const AROMAS: &[(&str, Aromas)] = &[
    ("Herbal", &["Rosemary", "Thyme", "Basil", "Mint", "Sage", "Lavender"]),
    ("Dried Fruit", &["Banana", "Raisin", "Apricot", "Fig", "Jujube", "Plum"]),
    (
        "Baking Spice",
        &[
            "Cinnamon",
            "Star Anise",
            "Nutmeg",
            "Cumin",
            "Pepper",
            "Clove",
            "Coriander Seed",
            "Ginger",
        ],
    ),
    ("Hot Spice", &["Chili", "Wasabi", "Mustard", "Mustard Seed"]),
    ("Peat Smoke", &["Smoked", "Burnt Wood", "Charcoal", "Volcanic Ash"]),
    ("Industrial", &["Coal Fire", "Soot", "Asphalt", "Tar", "Disinfectant"]),
    ("Maritime", &["Iodine", "Seaweed", "Salt", "Sea Breeze", "Wet Rock"]),
    ("Plastic", &["Rubber", "Vinyl", "New Tyre", "Glue"]),
    ("Malt", &["Cereal", "Oatmeal", "Bread", "Toast", "Muesli"]),
    ("Nutty", &["Hazelnut", "Almond", "Walnut", "Pistachio", "Macadamia"]),
    ("Sugars", &["Honey", "Sugar", "Chocolate", "Caramel", "Marshmallow"]),
    ("Leather", &["Tobacco Leaf", "New Leather", "Old Books", "Hunting Bag"]),
    ("Vegetal", &["Fern", "Moss", "Mushroom", "Fallen Leaves"]),
    (
        "Blossom",
        &["Rose", "Hydrangea", "Violet", "Acacia", "Orange Blossom", "Lilac"],
    ),
    ("Nature", &["Cut Grass", "Damp Earth", "Wet Wood", "Dew"]),
    ("Citrus", &["Lemon", "Grapefruit", "Tangerine", "Orange Peel", "Yuzu"]),
    (
        "Fresh Fruit",
        &["Green Apple", "Pear", "Peach", "Cherry", "Mango", "Pineapple"],
    ),
    ("Dried Fruits", &["Fig", "Date", "Prune", "Dried Apricot", "Raisin"]),
    ("Baked Fruit", &["Baked Apple", "Baked Banana", "Caramelised Pear"]),
    (
        "Dessert",
        &["Vanilla Ice Cream", "Creme Brulee", "Marzipan", "Red Bean Paste"],
    ),
    ("Fresh Wood", &["Oak", "Pine", "Cedar", "Beech", "Cypress"]),
    ("Old Wood", &["Antique Furniture", "Paper", "Library", "Wine Barrel"]),
    ("Vanilla", &["Coconut", "Vanilla", "Caramel", "Butterscotch", "Condensed Milk"]),
    ("Smoky Wood", &["Toasted Oak", "Tar", "Embers"]),
    ("Tanned Leather", &["Saddle", "Suede", "Leather Armchair"]),
    ("Nut Oil", &["Peanut Butter", "Almond Oil", "Sesame Oil"]),
    ("Cereal Products", &["Popcorn", "Cornmeal", "Cracker", "Croissant"]),
    ("Dairy", &["Butter", "Cream", "Cheese", "Yoghurt"]),
    ("Mineral", &["Chalk", "Wet Stone", "Beach Sand", "Pumice"]),
    ("Medicinal", &["Antiseptic", "Phenol", "Plaster", "Tar", "Wood Fire"]),
    ("Metallic", &["Coins", "Rusty Iron", "Bare Wire"]),
    ("Chemical", &["Acetone", "Glue", "Petrol", "Nail Polish Remover"]),
];

/// All main categories in chart order.
pub fn main_categories() -> Vec<AromaCategory> {
    CATEGORIES.iter().map(|(category, _)| *category).collect()
}

/// Sub-categories of a main category.
pub fn sub_categories(category: AromaCategory) -> &'static [&'static str] {
    CATEGORIES
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, subs)| *subs)
        .unwrap_or(&[])
}

/// Aroma names of a sub-category; unknown sub-categories yield an empty slice.
pub fn aromas(sub_category: &str) -> &'static [&'static str] {
    AROMAS
        .iter()
        .find(|(sub, _)| *sub == sub_category)
        .map(|(_, names)| *names)
        .unwrap_or(&[])
}

/// Finds which category a sub-category belongs to.
pub fn category_of(sub_category: &str) -> Option<AromaCategory> {
    CATEGORIES
        .iter()
        .find(|(_, subs)| subs.contains(&sub_category))
        .map(|(category, _)| *category)
}
