//! Derived product-step state.
//!
//! Pure functions computing, from category, sub-category and slot occupancy,
//! whether the bottom-garment selector is needed, whether the product step
//! is complete, and which images go to the generation backend. Identical
//! inputs always give identical outputs, so callers recompute freely on
//! every change.

use crate::category::{Category, UploadType};
use crate::schema::{self, Slot};
use crate::selection::WizardSelection;
use crate::types::ImageRef;

/// Label keywords identifying a bottom-garment slot.
pub const BOTTOM_KEYWORDS: &[&str] = &[
    "bottom", "trouser", "pant", "jeans", "dhoti", "pajama", "skirt", "legging", "palazzo",
    "shorts",
];

/// Slots for a category/sub-category pair.
pub fn resolve_slots(category: Category, sub_category: Option<&str>) -> &'static [Slot] {
    schema::resolve_slots(category, sub_category)
}

/// Index of the first slot whose label contains a bottom keyword
/// (case-insensitive).
///
/// When two labels match, the first one wins. No shipped schema has two
/// matching labels.
pub fn find_bottom_slot_index(slots: &[Slot]) -> Option<usize> {
    slots.iter().position(|slot| {
        let label = slot.label.to_lowercase();
        BOTTOM_KEYWORDS.iter().any(|kw| label.contains(kw))
    })
}

/// Whether the bottom-type selector stands in for a missing bottom image.
///
/// True only for `parts` uploads outside jewellery, when the schema has a
/// bottom slot and that slot is empty.
pub fn should_show_bottom_selector(
    category: Category,
    upload_type: UploadType,
    slots: &[Slot],
    occupancy: &[bool],
) -> bool {
    if upload_type != UploadType::Parts || category.is_single_image() {
        return false;
    }
    match find_bottom_slot_index(slots) {
        Some(index) => !occupancy.get(index).copied().unwrap_or(false),
        None => false,
    }
}

/// [`should_show_bottom_selector`] for a live selection.
pub fn selection_shows_bottom_selector(selection: &WizardSelection) -> bool {
    let slots = resolve_slots(selection.category(), selection.sub_category());
    should_show_bottom_selector(
        selection.category(),
        selection.upload_type(),
        slots,
        &selection.occupancy(),
    )
}

/// Whether the product step has everything generation needs.
///
/// - A custom model requires its model image.
/// - Single-image categories and `full` uploads require the single image.
/// - Otherwise every required slot must be filled; while the bottom selector
///   is shown the bottom slot is excused and a bottom type is required instead.
pub fn is_product_step_complete(selection: &WizardSelection) -> bool {
    if selection.use_custom_model() && selection.custom_model_image().is_none() {
        return false;
    }

    let occupancy = selection.occupancy();

    if selection.category().is_single_image() || selection.upload_type() == UploadType::Full {
        return occupancy.first().copied().unwrap_or(false);
    }

    let slots = resolve_slots(selection.category(), selection.sub_category());
    if slots.is_empty() {
        return false;
    }

    let show_selector = should_show_bottom_selector(
        selection.category(),
        selection.upload_type(),
        slots,
        &occupancy,
    );
    let bottom_index = find_bottom_slot_index(slots);

    let required_filled = slots.iter().enumerate().all(|(i, slot)| {
        slot.optional
            || (show_selector && bottom_index == Some(i))
            || occupancy.get(i).copied().unwrap_or(false)
    });

    required_filled && (!show_selector || selection.bottom_type().is_some())
}

/// Ordered image inputs for generation: the custom model image (when used),
/// then the full-product image or the slot images in schema order.
pub fn collect_input_images(selection: &WizardSelection) -> Vec<ImageRef> {
    let mut images = Vec::new();
    if selection.use_custom_model() {
        if let Some(model) = selection.custom_model_image() {
            images.push(model.clone());
        }
    }
    images.extend(product_images(selection));
    images
}

/// Product images only, in schema order, skipping empty slots.
pub fn product_images(selection: &WizardSelection) -> Vec<ImageRef> {
    selection
        .product_images()
        .iter()
        .flatten()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(labels: &[&'static str]) -> Vec<Slot> {
        labels
            .iter()
            .map(|&label| Slot {
                label,
                optional: false,
            })
            .collect()
    }

    fn image(name: &str) -> Option<ImageRef> {
        Some(ImageRef::new(format!("data:image/png;base64,{name}")))
    }

    #[test]
    fn bottom_slot_found_case_insensitively() {
        let s = slots(&["Top", "Bottom Wear", "Dupatta"]);
        assert_eq!(find_bottom_slot_index(&s), Some(1));
        assert_eq!(find_bottom_slot_index(&slots(&["SHIRT", "TROUSERS"])), Some(1));
    }

    #[test]
    fn first_matching_slot_wins() {
        let s = slots(&["Jeans", "Leggings"]);
        assert_eq!(find_bottom_slot_index(&s), Some(0));
    }

    #[test]
    fn no_bottom_keyword_means_no_selector() {
        let s = slots(&["Saree", "Blouse"]);
        assert_eq!(find_bottom_slot_index(&s), None);
        for upload in [UploadType::Parts, UploadType::Full] {
            assert!(!should_show_bottom_selector(
                Category::Women,
                upload,
                &s,
                &[false, false]
            ));
        }
    }

    #[test]
    fn selector_hidden_for_full_upload_and_jewellery() {
        let s = slots(&["Top", "Bottom"]);
        assert!(should_show_bottom_selector(Category::Men, UploadType::Parts, &s, &[true, false]));
        assert!(!should_show_bottom_selector(Category::Men, UploadType::Full, &s, &[true, false]));
        assert!(!should_show_bottom_selector(
            Category::Jewellery,
            UploadType::Parts,
            &s,
            &[true, false]
        ));
    }

    #[test]
    fn selector_hidden_once_bottom_uploaded() {
        let s = slots(&["Top", "Bottom"]);
        assert!(!should_show_bottom_selector(Category::Kids, UploadType::Parts, &s, &[false, true]));
    }

    #[test]
    fn men_casual_needs_bottom_image_or_bottom_type() {
        let mut selection = WizardSelection::new(Category::Men);
        selection.set_product_image(0, image("top")).unwrap();
        assert!(selection_shows_bottom_selector(&selection));
        assert!(!is_product_step_complete(&selection));

        selection.set_bottom_type(Some("men-beige-chinos")).unwrap();
        assert!(is_product_step_complete(&selection));
    }

    #[test]
    fn uploaded_bottom_satisfies_step_without_bottom_type() {
        let mut selection = WizardSelection::new(Category::Men);
        selection.set_product_image(0, image("top")).unwrap();
        selection.set_product_image(1, image("bottom")).unwrap();
        assert!(!selection_shows_bottom_selector(&selection));
        assert!(is_product_step_complete(&selection));
    }

    #[test]
    fn missing_top_is_never_excused() {
        let mut selection = WizardSelection::new(Category::Men);
        selection.set_bottom_type(Some("men-blue-jeans")).unwrap();
        assert!(!is_product_step_complete(&selection));
    }

    #[test]
    fn optional_slots_are_not_required() {
        let mut selection = WizardSelection::new(Category::Men);
        selection.set_sub_category("formal").unwrap();
        selection.set_product_image(0, image("shirt")).unwrap();
        selection.set_product_image(1, image("trousers")).unwrap();
        assert!(is_product_step_complete(&selection));
    }

    #[test]
    fn custom_model_requires_model_image() {
        let mut selection = WizardSelection::new(Category::Jewellery);
        selection.set_product_image(0, image("ring")).unwrap();
        assert!(is_product_step_complete(&selection));

        selection.set_use_custom_model(true);
        assert!(!is_product_step_complete(&selection));
        selection.set_custom_model_image(image("model"));
        assert!(is_product_step_complete(&selection));
    }

    #[test]
    fn full_upload_needs_only_the_single_image() {
        let mut selection = WizardSelection::new(Category::Women);
        selection.set_upload_type(UploadType::Full);
        assert!(!is_product_step_complete(&selection));
        selection.set_product_image(0, image("outfit")).unwrap();
        assert!(is_product_step_complete(&selection));
    }

    #[test]
    fn input_images_put_model_first_then_schema_order() {
        let mut selection = WizardSelection::new(Category::Women);
        selection.set_sub_category("kurti").unwrap();
        selection.set_product_image(2, image("dupatta")).unwrap();
        selection.set_product_image(0, image("top")).unwrap();
        selection.set_use_custom_model(true);
        selection.set_custom_model_image(image("model"));

        let images = collect_input_images(&selection);
        assert_eq!(images, vec![
            image("model").unwrap(),
            image("top").unwrap(),
            image("dupatta").unwrap(),
        ]);
    }

    #[test]
    fn derivation_is_repeatable() {
        let mut selection = WizardSelection::new(Category::Kids);
        selection.set_product_image(0, image("top")).unwrap();
        let first = (is_product_step_complete(&selection), collect_input_images(&selection));
        let second = (is_product_step_complete(&selection), collect_input_images(&selection));
        assert_eq!(first, second);
    }
}
