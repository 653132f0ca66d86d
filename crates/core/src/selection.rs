//! Category-specific wizard state.
//!
//! [`WizardSelection`] holds everything the wizard tracks outside the
//! configuration store: the product images, the custom model image and the
//! fields that only exist for one category. The latter live in
//! [`CategoryState`], a tagged union, so a kids-only field cannot be set
//! on a men's selection.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, OptionEntry};
use crate::category::{AgeGroup, Category, KidsGender, UploadType};
use crate::error::CoreError;
use crate::schema::{self, SAREE};
use crate::types::ImageRef;

/// Saree accessory toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessories {
    pub jasmine: bool,
    pub bangles: bool,
    pub necklace: bool,
}

/// Per-category fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryState {
    Men {
        sub_category: String,
        bottom_type: Option<&'static OptionEntry>,
    },
    Women {
        sub_category: String,
        bottom_type: Option<&'static OptionEntry>,
        accessories: Accessories,
    },
    Kids {
        sub_category: String,
        bottom_type: Option<&'static OptionEntry>,
        gender: KidsGender,
        age_group: AgeGroup,
    },
    Jewellery {
        skin_tone: &'static OptionEntry,
        attire: &'static OptionEntry,
    },
}

impl CategoryState {
    /// Fresh state for `category` with its default sub-category.
    pub fn for_category(category: Category) -> Self {
        let sub_category = schema::default_sub_category(category)
            .unwrap_or_default()
            .to_string();
        match category {
            Category::Men => Self::Men {
                sub_category,
                bottom_type: None,
            },
            Category::Women => Self::Women {
                sub_category,
                bottom_type: None,
                accessories: Accessories::default(),
            },
            Category::Kids => Self::Kids {
                sub_category,
                bottom_type: None,
                gender: KidsGender::default(),
                age_group: AgeGroup::default(),
            },
            Category::Jewellery => Self::Jewellery {
                skin_tone: &catalog::SKIN_TONES[0],
                attire: &catalog::ATTIRES[0],
            },
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Men { .. } => Category::Men,
            Self::Women { .. } => Category::Women,
            Self::Kids { .. } => Category::Kids,
            Self::Jewellery { .. } => Category::Jewellery,
        }
    }
}

/// Wizard state owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSelection {
    state: CategoryState,
    use_custom_model: bool,
    upload_type: UploadType,
    product_images: Vec<Option<ImageRef>>,
    custom_model_image: Option<ImageRef>,
}

impl WizardSelection {
    pub fn new(category: Category) -> Self {
        let mut selection = Self {
            state: CategoryState::for_category(category),
            use_custom_model: false,
            upload_type: UploadType::default(),
            product_images: Vec::new(),
            custom_model_image: None,
        };
        selection.reset_images();
        selection
    }

    // -- Accessors ----------------------------------------------------------

    pub fn category(&self) -> Category {
        self.state.category()
    }

    pub fn state(&self) -> &CategoryState {
        &self.state
    }

    pub fn sub_category(&self) -> Option<&str> {
        match &self.state {
            CategoryState::Men { sub_category, .. }
            | CategoryState::Women { sub_category, .. }
            | CategoryState::Kids { sub_category, .. } => Some(sub_category.as_str()),
            CategoryState::Jewellery { .. } => None,
        }
    }

    pub fn bottom_type(&self) -> Option<&'static OptionEntry> {
        match &self.state {
            CategoryState::Men { bottom_type, .. }
            | CategoryState::Women { bottom_type, .. }
            | CategoryState::Kids { bottom_type, .. } => *bottom_type,
            CategoryState::Jewellery { .. } => None,
        }
    }

    /// Kids gender; `None` outside the kids category.
    pub fn kids_gender(&self) -> Option<KidsGender> {
        match &self.state {
            CategoryState::Kids { gender, .. } => Some(*gender),
            _ => None,
        }
    }

    /// Gender used to pick gendered catalogs; defaults outside kids.
    pub fn catalog_gender(&self) -> KidsGender {
        self.kids_gender().unwrap_or_default()
    }

    pub fn age_group(&self) -> Option<AgeGroup> {
        match &self.state {
            CategoryState::Kids { age_group, .. } => Some(*age_group),
            _ => None,
        }
    }

    /// Accessories; only meaningful for women's sarees.
    pub fn accessories(&self) -> Option<Accessories> {
        match &self.state {
            CategoryState::Women {
                sub_category,
                accessories,
                ..
            } if sub_category == SAREE => Some(*accessories),
            _ => None,
        }
    }

    pub fn skin_tone(&self) -> Option<&'static OptionEntry> {
        match &self.state {
            CategoryState::Jewellery { skin_tone, .. } => Some(*skin_tone),
            _ => None,
        }
    }

    pub fn attire(&self) -> Option<&'static OptionEntry> {
        match &self.state {
            CategoryState::Jewellery { attire, .. } => Some(*attire),
            _ => None,
        }
    }

    pub fn use_custom_model(&self) -> bool {
        self.use_custom_model
    }

    pub fn upload_type(&self) -> UploadType {
        self.upload_type
    }

    pub fn product_images(&self) -> &[Option<ImageRef>] {
        &self.product_images
    }

    pub fn custom_model_image(&self) -> Option<&ImageRef> {
        self.custom_model_image.as_ref()
    }

    /// Occupancy of each product image position.
    pub fn occupancy(&self) -> Vec<bool> {
        self.product_images.iter().map(Option::is_some).collect()
    }

    /// Number of product image positions for the current layout.
    pub fn image_slot_count(&self) -> usize {
        if self.category().is_single_image() || self.upload_type == UploadType::Full {
            1
        } else {
            schema::resolve_slots(self.category(), self.sub_category()).len()
        }
    }

    // -- Setters ------------------------------------------------------------

    /// Switch category. Every category-dependent field starts over.
    pub fn set_category(&mut self, category: Category) {
        if category == self.category() {
            return;
        }
        self.state = CategoryState::for_category(category);
        self.reset_images();
    }

    /// Switch sub-category. Clears the bottom type and the slot images.
    pub fn set_sub_category(&mut self, id: &str) -> Result<(), CoreError> {
        let category = self.category();
        if !schema::is_known_sub_category(category, id) {
            return Err(CoreError::Validation(format!(
                "Unknown sub-category '{id}' for category '{category}'"
            )));
        }
        let changed = match &mut self.state {
            CategoryState::Men {
                sub_category,
                bottom_type,
            }
            | CategoryState::Women {
                sub_category,
                bottom_type,
                ..
            }
            | CategoryState::Kids {
                sub_category,
                bottom_type,
                ..
            } if sub_category.as_str() != id => {
                *sub_category = id.to_string();
                *bottom_type = None;
                true
            }
            _ => false,
        };
        if changed {
            self.reset_images();
        }
        Ok(())
    }

    pub fn set_upload_type(&mut self, upload_type: UploadType) {
        if upload_type != self.upload_type {
            self.upload_type = upload_type;
            self.reset_images();
        }
    }

    pub fn set_use_custom_model(&mut self, enabled: bool) {
        self.use_custom_model = enabled;
        if !enabled {
            self.custom_model_image = None;
        }
    }

    pub fn set_custom_model_image(&mut self, image: Option<ImageRef>) {
        self.custom_model_image = image;
    }

    /// Place or clear the image at `index`.
    pub fn set_product_image(
        &mut self,
        index: usize,
        image: Option<ImageRef>,
    ) -> Result<(), CoreError> {
        let count = self.product_images.len();
        let slot = self.product_images.get_mut(index).ok_or_else(|| {
            CoreError::Validation(format!(
                "Image slot {index} is out of range (0..{count})"
            ))
        })?;
        *slot = image;
        Ok(())
    }

    /// Choose (or clear) the default bottom garment by id.
    pub fn set_bottom_type(&mut self, id: Option<&str>) -> Result<(), CoreError> {
        let category = self.category();
        let resolved = match id {
            Some(id) => Some(
                catalog::find_option(catalog::bottom_types_for(category), id).ok_or_else(
                    || CoreError::NotFound {
                        entity: "bottom_type",
                        id: id.to_string(),
                    },
                )?,
            ),
            None => None,
        };
        match &mut self.state {
            CategoryState::Men { bottom_type, .. }
            | CategoryState::Women { bottom_type, .. }
            | CategoryState::Kids { bottom_type, .. } => {
                *bottom_type = resolved;
                Ok(())
            }
            CategoryState::Jewellery { .. } => Err(CoreError::Validation(
                "Jewellery has no bottom garment".to_string(),
            )),
        }
    }

    pub fn set_accessories(&mut self, value: Accessories) -> Result<(), CoreError> {
        match &mut self.state {
            CategoryState::Women { accessories, .. } => {
                *accessories = value;
                Ok(())
            }
            _ => Err(wrong_category("Accessories", "women")),
        }
    }

    pub fn set_kids_gender(&mut self, value: KidsGender) -> Result<(), CoreError> {
        match &mut self.state {
            CategoryState::Kids { gender, .. } => {
                *gender = value;
                Ok(())
            }
            _ => Err(wrong_category("Gender", "kids")),
        }
    }

    pub fn set_age_group(&mut self, value: AgeGroup) -> Result<(), CoreError> {
        match &mut self.state {
            CategoryState::Kids { age_group, .. } => {
                *age_group = value;
                Ok(())
            }
            _ => Err(wrong_category("Age group", "kids")),
        }
    }

    pub fn set_skin_tone(&mut self, value: &'static OptionEntry) -> Result<(), CoreError> {
        match &mut self.state {
            CategoryState::Jewellery { skin_tone, .. } => {
                *skin_tone = value;
                Ok(())
            }
            _ => Err(wrong_category("Skin tone", "jewellery")),
        }
    }

    pub fn set_attire(&mut self, value: &'static OptionEntry) -> Result<(), CoreError> {
        match &mut self.state {
            CategoryState::Jewellery { attire, .. } => {
                *attire = value;
                Ok(())
            }
            _ => Err(wrong_category("Attire", "jewellery")),
        }
    }

    /// Clear images and category fields, keeping only the category.
    pub fn reset(&mut self) {
        *self = Self::new(self.category());
    }

    fn reset_images(&mut self) {
        self.product_images = vec![None; self.image_slot_count()];
    }
}

fn wrong_category(field: &str, category: &str) -> CoreError {
    CoreError::Validation(format!("{field} only applies to the {category} category"))
}
