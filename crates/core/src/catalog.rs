//! Static option catalogs.
//!
//! Every selectable option (background, pose, camera, ...) is an
//! [`OptionEntry`] in one of the fixed tables below. Entries are identified
//! by a stable string id; the configuration store holds references to the
//! entries themselves so rendering always has the display name, prompt text
//! and preview image at hand.

use serde::Serialize;

use crate::category::{Category, KidsGender};

/// One selectable option.
#[derive(Debug, PartialEq, Eq, Hash, Serialize)]
pub struct OptionEntry {
    /// Stable identifier stored in presets.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Prompt fragment sent to the generation backend.
    pub prompt: &'static str,
    /// Preview image path.
    pub image: &'static str,
}

const fn entry(
    id: &'static str,
    name: &'static str,
    prompt: &'static str,
    image: &'static str,
) -> OptionEntry {
    OptionEntry {
        id,
        name,
        prompt,
        image,
    }
}

/// Look up an entry by id. Unknown ids yield `None`, never an error.
pub fn find_option(catalog: &'static [OptionEntry], id: &str) -> Option<&'static OptionEntry> {
    catalog.iter().find(|e| e.id == id)
}

/* --------------------------------------------------------------------------
   Scene options
   -------------------------------------------------------------------------- */

pub static BACKGROUNDS: &[OptionEntry] = &[
    entry("studio-white", "Studio White", "clean seamless white studio backdrop", "/options/bg/studio-white.webp"),
    entry("studio-grey", "Studio Grey", "soft grey studio backdrop with gentle vignette", "/options/bg/studio-grey.webp"),
    entry("urban-street", "Urban Street", "busy city street with blurred storefronts", "/options/bg/urban-street.webp"),
    entry("beach", "Beach", "sunlit sandy beach with calm sea behind", "/options/bg/beach.webp"),
    entry("garden", "Garden", "lush garden with flowering hedges", "/options/bg/garden.webp"),
    entry("heritage-haveli", "Heritage Haveli", "ornate heritage courtyard with carved arches", "/options/bg/haveli.webp"),
];

pub static POSES: &[OptionEntry] = &[
    entry("standing-front", "Standing Front", "standing upright facing the camera, arms relaxed", "/options/pose/standing-front.webp"),
    entry("hand-on-hip", "Hand on Hip", "standing with one hand on the hip", "/options/pose/hand-on-hip.webp"),
    entry("walking", "Walking", "mid-stride walking towards the camera", "/options/pose/walking.webp"),
    entry("seated", "Seated", "seated casually on a stool", "/options/pose/seated.webp"),
    entry("over-shoulder", "Over the Shoulder", "looking back over the shoulder", "/options/pose/over-shoulder.webp"),
];

pub static EXPRESSIONS: &[OptionEntry] = &[
    entry("neutral", "Neutral", "calm neutral expression", "/options/expression/neutral.webp"),
    entry("soft-smile", "Soft Smile", "gentle closed-mouth smile", "/options/expression/soft-smile.webp"),
    entry("confident", "Confident", "confident editorial gaze", "/options/expression/confident.webp"),
    entry("candid-laugh", "Candid Laugh", "natural candid laugh", "/options/expression/candid-laugh.webp"),
];

pub static VIEWS: &[OptionEntry] = &[
    entry("front", "Front", "full front view", "/options/view/front.webp"),
    entry("three-quarter", "Three Quarter", "three-quarter angle view", "/options/view/three-quarter.webp"),
    entry("side", "Side", "side profile view", "/options/view/side.webp"),
    entry("back", "Back", "back view showing the rear of the outfit", "/options/view/back.webp"),
];

pub static TIMES: &[OptionEntry] = &[
    entry("midday", "Midday", "bright even midday light", "/options/time/midday.webp"),
    entry("golden-hour", "Golden Hour", "warm low golden-hour sunlight", "/options/time/golden-hour.webp"),
    entry("blue-hour", "Blue Hour", "cool soft blue-hour twilight", "/options/time/blue-hour.webp"),
    entry("night", "Night", "night scene lit by practical lights", "/options/time/night.webp"),
];

pub static CAMERAS: &[OptionEntry] = &[
    entry("portrait-85mm", "Portrait 85mm", "shot on an 85mm portrait lens, shallow depth of field", "/options/camera/85mm.webp"),
    entry("editorial-50mm", "Editorial 50mm", "shot on a 50mm lens, natural perspective", "/options/camera/50mm.webp"),
    entry("wide-35mm", "Wide 35mm", "shot on a 35mm lens showing the surroundings", "/options/camera/35mm.webp"),
    entry("medium-format", "Medium Format", "medium format camera, rich tonal detail", "/options/camera/medium-format.webp"),
];

pub static QUALITIES: &[OptionEntry] = &[
    entry("standard", "Standard", "high quality photograph", "/options/quality/standard.webp"),
    entry("hd", "HD", "high definition, crisp fabric detail", "/options/quality/hd.webp"),
    entry("ultra", "Ultra", "ultra detailed, magazine print quality", "/options/quality/ultra.webp"),
];

pub static ASPECT_RATIOS: &[OptionEntry] = &[
    entry("3:4", "Portrait 3:4", "3:4 portrait frame", "/options/ratio/3-4.webp"),
    entry("1:1", "Square 1:1", "square frame", "/options/ratio/1-1.webp"),
    entry("4:5", "Feed 4:5", "4:5 social feed frame", "/options/ratio/4-5.webp"),
    entry("9:16", "Story 9:16", "tall 9:16 story frame", "/options/ratio/9-16.webp"),
    entry("16:9", "Landscape 16:9", "wide 16:9 landscape frame", "/options/ratio/16-9.webp"),
];

/* --------------------------------------------------------------------------
   Model styling
   -------------------------------------------------------------------------- */

pub static HAIR_STYLES_MEN: &[OptionEntry] = &[
    entry("men-short-crop", "Short Crop", "short cropped hair", "/options/hair/men-short-crop.webp"),
    entry("men-side-part", "Side Part", "neatly combed side part", "/options/hair/men-side-part.webp"),
    entry("men-textured-quiff", "Textured Quiff", "textured quiff", "/options/hair/men-quiff.webp"),
    entry("men-long-tied", "Long Tied", "long hair tied back", "/options/hair/men-long-tied.webp"),
];

pub static HAIR_STYLES_WOMEN: &[OptionEntry] = &[
    entry("women-open-waves", "Open Waves", "long open hair with soft waves", "/options/hair/women-open-waves.webp"),
    entry("women-sleek-bun", "Sleek Bun", "sleek low bun", "/options/hair/women-sleek-bun.webp"),
    entry("women-braid", "Side Braid", "loose side braid", "/options/hair/women-braid.webp"),
    entry("women-bob", "Bob", "chin-length bob", "/options/hair/women-bob.webp"),
];

pub static HAIR_STYLES_KIDS_BOY: &[OptionEntry] = &[
    entry("boy-short", "Short", "short tidy hair", "/options/hair/boy-short.webp"),
    entry("boy-messy", "Messy", "playful messy hair", "/options/hair/boy-messy.webp"),
];

pub static HAIR_STYLES_KIDS_GIRL: &[OptionEntry] = &[
    entry("girl-pigtails", "Pigtails", "two pigtails", "/options/hair/girl-pigtails.webp"),
    entry("girl-ponytail", "Ponytail", "high ponytail", "/options/hair/girl-ponytail.webp"),
    entry("girl-open", "Open", "open shoulder-length hair", "/options/hair/girl-open.webp"),
];

pub static FIT_TYPES: &[OptionEntry] = &[
    entry("regular", "Regular Fit", "regular fit garments", "/options/fit/regular.webp"),
    entry("slim", "Slim Fit", "slim tailored fit", "/options/fit/slim.webp"),
    entry("relaxed", "Relaxed Fit", "relaxed loose fit", "/options/fit/relaxed.webp"),
    entry("oversized", "Oversized", "oversized streetwear fit", "/options/fit/oversized.webp"),
];

pub static BODY_TYPES_MEN: &[OptionEntry] = &[
    entry("men-athletic", "Athletic", "athletic build", "/options/body/men-athletic.webp"),
    entry("men-slim", "Slim", "slim build", "/options/body/men-slim.webp"),
    entry("men-average", "Average", "average build", "/options/body/men-average.webp"),
    entry("men-plus", "Plus", "plus-size build", "/options/body/men-plus.webp"),
];

pub static BODY_TYPES_WOMEN: &[OptionEntry] = &[
    entry("women-slim", "Slim", "slim build", "/options/body/women-slim.webp"),
    entry("women-petite", "Petite", "petite build", "/options/body/women-petite.webp"),
    entry("women-curvy", "Curvy", "curvy build", "/options/body/women-curvy.webp"),
    entry("women-plus", "Plus", "plus-size build", "/options/body/women-plus.webp"),
];

pub static BODY_TYPES_KIDS: &[OptionEntry] = &[
    entry("kids-average", "Average", "average build for the age", "/options/body/kids-average.webp"),
    entry("kids-slim", "Slim", "slim build for the age", "/options/body/kids-slim.webp"),
    entry("kids-sturdy", "Sturdy", "sturdy build for the age", "/options/body/kids-sturdy.webp"),
];

/* --------------------------------------------------------------------------
   Jewellery
   -------------------------------------------------------------------------- */

pub static SKIN_TONES: &[OptionEntry] = &[
    entry("wheatish", "Wheatish", "warm wheatish skin tone", "/options/skin/wheatish.webp"),
    entry("fair", "Fair", "fair skin tone", "/options/skin/fair.webp"),
    entry("medium", "Medium", "medium skin tone", "/options/skin/medium.webp"),
    entry("dusky", "Dusky", "dusky skin tone", "/options/skin/dusky.webp"),
    entry("deep", "Deep", "deep skin tone", "/options/skin/deep.webp"),
];

pub static ATTIRES: &[OptionEntry] = &[
    entry("silk-saree", "Silk Saree", "wearing a rich silk saree", "/options/attire/silk-saree.webp"),
    entry("lehenga", "Lehenga", "wearing an embroidered lehenga", "/options/attire/lehenga.webp"),
    entry("evening-gown", "Evening Gown", "wearing a plain evening gown", "/options/attire/evening-gown.webp"),
    entry("minimal-black", "Minimal Black", "wearing a minimal black top", "/options/attire/minimal-black.webp"),
];

/* --------------------------------------------------------------------------
   Bottom garments (used when no bottom image is uploaded)
   -------------------------------------------------------------------------- */

pub static BOTTOM_TYPES_MEN: &[OptionEntry] = &[
    entry("men-blue-jeans", "Blue Jeans", "classic blue denim jeans", "/options/bottom/men-jeans.webp"),
    entry("men-beige-chinos", "Beige Chinos", "beige cotton chinos", "/options/bottom/men-chinos.webp"),
    entry("men-black-trousers", "Black Trousers", "black formal trousers", "/options/bottom/men-trousers.webp"),
    entry("men-white-pajama", "White Pajama", "white cotton kurta pajama bottoms", "/options/bottom/men-pajama.webp"),
];

pub static BOTTOM_TYPES_WOMEN: &[OptionEntry] = &[
    entry("women-blue-jeans", "Blue Jeans", "high-waisted blue jeans", "/options/bottom/women-jeans.webp"),
    entry("women-black-leggings", "Black Leggings", "black ankle-length leggings", "/options/bottom/women-leggings.webp"),
    entry("women-white-palazzo", "White Palazzo", "flowing white palazzo pants", "/options/bottom/women-palazzo.webp"),
    entry("women-pleated-skirt", "Pleated Skirt", "midi pleated skirt", "/options/bottom/women-skirt.webp"),
];

pub static BOTTOM_TYPES_KIDS: &[OptionEntry] = &[
    entry("kids-denim-shorts", "Denim Shorts", "denim shorts", "/options/bottom/kids-shorts.webp"),
    entry("kids-grey-joggers", "Grey Joggers", "grey cotton joggers", "/options/bottom/kids-joggers.webp"),
    entry("kids-blue-jeans", "Blue Jeans", "blue kids jeans", "/options/bottom/kids-jeans.webp"),
];

/* --------------------------------------------------------------------------
   Category-conditional catalog selection
   -------------------------------------------------------------------------- */

/// Hair-style catalog for a category; kids are split by gender. Jewellery
/// shoots use the women's catalog.
pub fn hair_styles_for(category: Category, gender: KidsGender) -> &'static [OptionEntry] {
    match category {
        Category::Men => HAIR_STYLES_MEN,
        Category::Women | Category::Jewellery => HAIR_STYLES_WOMEN,
        Category::Kids => match gender {
            KidsGender::Boy => HAIR_STYLES_KIDS_BOY,
            KidsGender::Girl => HAIR_STYLES_KIDS_GIRL,
        },
    }
}

/// Body-type catalog for a category.
pub fn body_types_for(category: Category) -> &'static [OptionEntry] {
    match category {
        Category::Men => BODY_TYPES_MEN,
        Category::Women | Category::Jewellery => BODY_TYPES_WOMEN,
        Category::Kids => BODY_TYPES_KIDS,
    }
}

/// Bottom-garment catalog for a category. Jewellery has none.
pub fn bottom_types_for(category: Category) -> &'static [OptionEntry] {
    match category {
        Category::Men => BOTTOM_TYPES_MEN,
        Category::Women => BOTTOM_TYPES_WOMEN,
        Category::Kids => BOTTOM_TYPES_KIDS,
        Category::Jewellery => &[],
    }
}
