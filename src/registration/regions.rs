//! Region directory: Uzbekistan regions and the districts offered for each.
//!
//! Regions and districts are keyed by stable ids that travel in callback
//! data and into the database. Display names live next to the ids and can
//! change without breaking buttons that were already sent.

use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// A district inside a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct District {
    pub id: &'static str,
    pub name: &'static str,
}

const fn d(id: &'static str, name: &'static str) -> District {
    District { id, name }
}

const TASHKENT_CITY: &[District] = &[
    d("yunusobod", "Yunusobod"),
    d("bektemir", "Bektemir"),
    d("mirzo_ulugbek", "Mirzo Ulugbek"),
    d("yakkasaroy", "Yakkasaroy"),
    d("chilonzor", "Chilonzor"),
    d("shaykhontahur", "Shaykhontahur"),
    d("sergeli", "Sergeli"),
];
const ANDIJAN: &[District] = &[
    d("andijan", "Andijan"),
    d("asaka", "Asaka"),
    d("baliqchi", "Baliqchi"),
    d("jalaquduq", "Jalaquduq"),
];
const BUKHARA: &[District] = &[
    d("bukhara", "Bukhara"),
    d("gijduvon", "Gijduvon"),
    d("karakul", "Karakul"),
    d("romitan", "Romitan"),
];
const FERGANA: &[District] = &[
    d("fergana", "Fergana"),
    d("margilan", "Margilan"),
    d("quvasoy", "Quvasoy"),
    d("rishtan", "Rishtan"),
];
const JIZZAKH: &[District] = &[
    d("jizzakh", "Jizzakh"),
    d("dostlik", "Dostlik"),
    d("zarbdor", "Zarbdor"),
    d("zafarabad", "Zafarabad"),
];
const KASHKADARYA: &[District] = &[
    d("karshi", "Karshi"),
    d("shakhrisabz", "Shakhrisabz"),
    d("koson", "Koson"),
    d("mubarek", "Mubarek"),
];
const NAVOI: &[District] = &[
    d("navoi", "Navoi"),
    d("zarafshan", "Zarafshan"),
    d("kungrad", "Kungrad"),
    d("tamdy", "Tamdy"),
];
const NAMANGAN: &[District] = &[
    d("namangan", "Namangan"),
    d("chust", "Chust"),
    d("yangikurgan", "Yangikurgan"),
    d("uychi", "Uychi"),
];
const SAMARKAND: &[District] = &[
    d("samarkand", "Samarkand"),
    d("kattakurgan", "Kattakurgan"),
    d("narpay", "Narpay"),
    d("urgut", "Urgut"),
];
const SIRDARYA: &[District] = &[
    d("guliston", "Guliston"),
    d("yangier", "Yangier"),
    d("syrdarya", "Syrdarya"),
    d("oqqorgon", "Oqqoʻrgon"),
];
const SURKHANDARYA: &[District] = &[
    d("termiz", "Termiz"),
    d("denov", "Denov"),
    d("qumqorgon", "Qumqoʻrgon"),
    d("boysun", "Boysun"),
];
const TASHKENT_REGION: &[District] = &[
    d("tashkent", "Tashkent"),
    d("chinoz", "Chinoz"),
    d("ortachirchiq", "Oʻrtachirchiq"),
    d("kibray", "Kibray"),
];
const KHOREZM: &[District] = &[
    d("urganch", "Urganch"),
    d("khiva", "Khiva"),
    d("shavat", "Shavat"),
    d("bagat", "Bagat"),
];

/// A region of Uzbekistan. The snake_case variant name is its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Region {
    TashkentCity,
    Andijan,
    Bukhara,
    Fergana,
    Jizzakh,
    Kashkadarya,
    Navoi,
    Namangan,
    Samarkand,
    Sirdarya,
    Surkhandarya,
    TashkentRegion,
    Khorezm,
}

impl Region {
    /// All regions in menu order.
    pub fn all() -> impl Iterator<Item = Region> {
        Region::iter()
    }

    /// Stable id used in callback data and storage.
    pub fn id(self) -> &'static str {
        self.into()
    }

    pub fn from_id(id: &str) -> Option<Region> {
        id.parse().ok()
    }

    /// Display name shown on buttons and summaries.
    pub fn name(self) -> &'static str {
        match self {
            Region::TashkentCity => "Tashkent City",
            Region::Andijan => "Andijan",
            Region::Bukhara => "Bukhara",
            Region::Fergana => "Fergana",
            Region::Jizzakh => "Jizzakh",
            Region::Kashkadarya => "Kashkadarya",
            Region::Navoi => "Navoi",
            Region::Namangan => "Namangan",
            Region::Samarkand => "Samarkand",
            Region::Sirdarya => "Sirdarya",
            Region::Surkhandarya => "Surkhandarya",
            Region::TashkentRegion => "Tashkent Region",
            Region::Khorezm => "Khorezm",
        }
    }

    /// Districts offered for this region, in menu order.
    pub fn districts(self) -> &'static [District] {
        match self {
            Region::TashkentCity => TASHKENT_CITY,
            Region::Andijan => ANDIJAN,
            Region::Bukhara => BUKHARA,
            Region::Fergana => FERGANA,
            Region::Jizzakh => JIZZAKH,
            Region::Kashkadarya => KASHKADARYA,
            Region::Navoi => NAVOI,
            Region::Namangan => NAMANGAN,
            Region::Samarkand => SAMARKAND,
            Region::Sirdarya => SIRDARYA,
            Region::Surkhandarya => SURKHANDARYA,
            Region::TashkentRegion => TASHKENT_REGION,
            Region::Khorezm => KHOREZM,
        }
    }

    /// Looks up a district of this region by id.
    pub fn district(self, id: &str) -> Option<District> {
        self.districts().iter().copied().find(|district| district.id == id)
    }
}
