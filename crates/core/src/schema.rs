//! Category upload schemas.
//!
//! Maps each category and sub-category to the ordered list of upload slots
//! the product step presents. Pure lookup tables, no state.

use serde::Serialize;

use crate::category::Category;

/// One upload position in a category schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub label: &'static str,
    pub optional: bool,
}

/// A sub-category and its slot layout.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct SubCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub slots: &'static [Slot],
}

const fn required(label: &'static str) -> Slot {
    Slot {
        label,
        optional: false,
    }
}

const fn optional(label: &'static str) -> Slot {
    Slot {
        label,
        optional: true,
    }
}

/// Sub-category id whose women's schema carries the accessory toggles.
pub const SAREE: &str = "saree";

static MEN: &[SubCategory] = &[
    SubCategory {
        id: "casual",
        name: "Casual",
        slots: &[required("Top"), required("Bottom")],
    },
    SubCategory {
        id: "formal",
        name: "Formal",
        slots: &[required("Shirt"), required("Trousers"), optional("Blazer")],
    },
    SubCategory {
        id: "ethnic",
        name: "Ethnic",
        slots: &[required("Kurta"), required("Pajama"), optional("Stole")],
    },
];

static WOMEN: &[SubCategory] = &[
    SubCategory {
        id: "casual",
        name: "Casual",
        slots: &[required("Top"), required("Bottom Wear")],
    },
    SubCategory {
        id: "kurti",
        name: "Kurti Set",
        slots: &[required("Top"), required("Bottom Wear"), optional("Dupatta")],
    },
    SubCategory {
        id: SAREE,
        name: "Saree",
        slots: &[required("Saree"), optional("Blouse")],
    },
    SubCategory {
        id: "western",
        name: "Western Dress",
        slots: &[required("Dress"), optional("Jacket")],
    },
];

static KIDS: &[SubCategory] = &[
    SubCategory {
        id: "casual",
        name: "Casual",
        slots: &[required("Top"), required("Shorts")],
    },
    SubCategory {
        id: "ethnic",
        name: "Ethnic",
        slots: &[required("Kurta"), required("Pajama")],
    },
];

static JEWELLERY_SLOTS: &[Slot] = &[required("Jewellery Piece")];

/// Sub-categories offered for a category. Jewellery has none.
pub fn sub_categories(category: Category) -> &'static [SubCategory] {
    match category {
        Category::Men => MEN,
        Category::Women => WOMEN,
        Category::Kids => KIDS,
        Category::Jewellery => &[],
    }
}

/// The sub-category preselected when a category is chosen.
pub fn default_sub_category(category: Category) -> Option<&'static str> {
    sub_categories(category).first().map(|s| s.id)
}

/// Whether `sub_category` is defined for `category`.
pub fn is_known_sub_category(category: Category, sub_category: &str) -> bool {
    sub_categories(category).iter().any(|s| s.id == sub_category)
}

/// Ordered slots for a category/sub-category pair.
///
/// Jewellery ignores the sub-category and always has its single slot.
/// Unknown sub-categories resolve to an empty list.
pub fn resolve_slots(category: Category, sub_category: Option<&str>) -> &'static [Slot] {
    if category.is_single_image() {
        return JEWELLERY_SLOTS;
    }
    let Some(sub) = sub_category else {
        return &[];
    };
    sub_categories(category)
        .iter()
        .find(|s| s.id == sub)
        .map(|s| s.slots)
        .unwrap_or(&[])
}
