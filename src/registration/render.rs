//! Prompt and menu rendering for every conversation screen.
//!
//! Pure functions of session data; the Telegram layer turns a [`Menu`]
//! into an inline keyboard.

use indoc::formatdoc;

use super::action::CallbackAction;
use super::regions::Region;
use super::session::Session;
use crate::core::validation::{MAX_NAME_CHARS, MIN_NAME_CHARS};

/// Registration needs at least this many channels.
pub const MIN_CHANNELS: usize = 2;

/// Channel list is capped so the summary stays well inside one Telegram message.
pub const MAX_CHANNELS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub action: CallbackAction,
}

/// Inline buttons, one `Vec` per row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Menu {
    pub rows: Vec<Vec<MenuButton>>,
}

impl Menu {
    /// One button per row.
    pub fn column(buttons: impl IntoIterator<Item = (String, CallbackAction)>) -> Self {
        Self {
            rows: buttons
                .into_iter()
                .map(|(label, action)| vec![MenuButton { label, action }])
                .collect(),
        }
    }

    pub fn actions(&self) -> impl Iterator<Item = &CallbackAction> {
        self.rows.iter().flatten().map(|button| &button.action)
    }
}

/// Message text plus optional inline menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub menu: Option<Menu>,
}

impl Prompt {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            menu: None,
        }
    }

    pub fn with_menu(text: impl Into<String>, menu: Menu) -> Self {
        Self {
            text: text.into(),
            menu: Some(menu),
        }
    }
}

fn start_menu() -> Menu {
    Menu::column([("📝 Roʻyxatdan oʻtish".to_string(), CallbackAction::StartRegistration)])
}

/// Lines describing the answers collected so far, in conversation order.
fn profile(session: &Session) -> String {
    let mut lines = Vec::new();
    if let Some(name) = &session.name {
        lines.push(format!("👤 Ismingiz: {}", name));
    }
    if let Some(age) = session.age {
        lines.push(format!("📅 Yoshingiz: {}", age));
    }
    if let Some(phone) = &session.phone {
        lines.push(format!("📱 Telefon: {}", phone));
    }
    if let Some(region) = session.region {
        lines.push(format!("🗺️ Viloyat: {}", region.name()));
    }
    if let Some(district) = session.district {
        lines.push(format!("📍 Tuman: {}", district.name));
    }
    lines.join("\n")
}

pub fn welcome(first_name: &str) -> Prompt {
    Prompt::with_menu(
        format!(
            "👋 Assalomu alaykum, {}!\n\nBu CRM sistemamizga xush kelibsiz.\n\nRoʻyxatdan oʻtish uchun tugmani bosing:",
            first_name
        ),
        start_menu(),
    )
}

pub fn ask_name() -> Prompt {
    Prompt::text("📝 Iltimos, toʻliq ismingizni kiriting:")
}

pub fn invalid_name() -> Prompt {
    Prompt::text(format!(
        "❌ Ismingiz {} dan {} tagacha belgidan iborat boʻlishi kerak. Qayta kiriting:",
        MIN_NAME_CHARS, MAX_NAME_CHARS
    ))
}

pub fn ask_age(session: &Session) -> Prompt {
    Prompt::text(format!("{}\n\n📅 Endi yoshingizni kiriting (raqam):", profile(session)))
}

pub fn invalid_age() -> Prompt {
    Prompt::text("❌ Yoshingiz 10 dan 120 gacha boʻlishi kerak. Qayta kiriting:")
}

pub fn ask_phone(session: &Session) -> Prompt {
    Prompt::text(format!(
        "{}\n\n📱 Telefon raqamingizni kiriting (masalan: +998901234567):",
        profile(session)
    ))
}

pub fn invalid_phone() -> Prompt {
    Prompt::text("❌ Telefon raqami notoʻgʻri format. Qayta kiriting (+998XXXXXXXXX):")
}

pub fn region_menu(session: &Session) -> Prompt {
    let menu = Menu::column(Region::all().map(|region| (region.name().to_string(), CallbackAction::Region(region))));
    Prompt::with_menu(format!("{}\n\n🗺️ Viloyatingizni tanlang:", profile(session)), menu)
}

/// Districts of the region stored in the session; empty menu if none.
pub fn district_menu(session: &Session) -> Prompt {
    let districts = session.region.map(Region::districts).unwrap_or_default();
    let menu = Menu::column(
        districts
            .iter()
            .map(|district| (district.name.to_string(), CallbackAction::District(district.id.to_string()))),
    );
    Prompt::with_menu(format!("{}\n\n📍 Tumanningizni tanlang:", profile(session)), menu)
}

fn channel_list(session: &Session) -> String {
    if session.channels.is_empty() {
        "❌ Hozircha yoʻq".to_string()
    } else {
        session.channels.join("\n")
    }
}

/// Shown right after the district is chosen.
pub fn channel_menu(session: &Session) -> Prompt {
    let menu = Menu::column([
        ("➕ Kanal qoʻshish".to_string(), CallbackAction::AddChannel),
        (
            format!("⏭️ Oʻtkazib yuborish ({}+ kanal kerak)", MIN_CHANNELS),
            CallbackAction::SkipChannels,
        ),
    ]);
    Prompt::with_menu(
        format!(
            "{}\n\n📺 Obuna boʻlgan kanallar (kamida {} ta):\n{}\n\nKanal qoʻshing:",
            profile(session),
            MIN_CHANNELS,
            channel_list(session)
        ),
        menu,
    )
}

/// Shown after each accepted channel.
pub fn channel_added(session: &Session) -> Prompt {
    let status = if session.channels.len() >= MIN_CHANNELS {
        "📝 Roʻyxatdan oʻtish tayyor, tasdiqlang!".to_string()
    } else {
        format!("⚠️ Kamida {} ta kanal kerak!", MIN_CHANNELS)
    };
    let mut buttons = Vec::with_capacity(2);
    if session.channels.len() < MAX_CHANNELS {
        buttons.push(("➕ Yana kanal qoʻshish".to_string(), CallbackAction::AddChannel));
    }
    buttons.push(("✅ Tayyor".to_string(), CallbackAction::SkipChannels));
    let menu = Menu::column(buttons);
    Prompt::with_menu(
        format!(
            "✅ Kanal qoʻshildi!\n\n📺 Obuna boʻlgan kanallar:\n{}\n\n{}",
            channel_list(session),
            status
        ),
        menu,
    )
}

pub fn ask_channel() -> Prompt {
    Prompt::text("📺 Kanal linkini yoki @ nomini kiriting (masalan: @uzbek_kanal yoki https://t.me/uzbek_kanal):")
}

pub fn invalid_channel() -> Prompt {
    Prompt::text("❌ Kanal formatini toʻgʻri kiriting. Masalan: @kanal yoki https://t.me/kanal")
}

/// Alert text for an add past [`MAX_CHANNELS`].
pub fn too_many_channels() -> String {
    format!("❌ Koʻpi bilan {} ta kanal qoʻshish mumkin!", MAX_CHANNELS)
}

/// Alert text for a skip with too few channels.
pub fn not_enough_channels() -> String {
    format!("❌ Kamida {} ta kanal qoʻshish kerak!", MIN_CHANNELS)
}

pub fn summary(session: &Session) -> Prompt {
    let text = formatdoc! {"
        📋 ROʻYXATDAN OʻTISH JADVALI

        👤 Ism: {name}
        📅 Yosh: {age}
        📱 Telefon: {phone}
        🗺️ Viloyat: {region}
        📍 Tuman: {district}
        📺 Kanallar: {channels}

        ☝️ Hamma maʼlumotlar toʻgʻri ekanligini tasdiqlang:",
        name = session.name.as_deref().unwrap_or("-"),
        age = session.age.map(|age| age.to_string()).unwrap_or_else(|| "-".to_string()),
        phone = session.phone.as_deref().unwrap_or("-"),
        region = session.region.map(Region::name).unwrap_or("-"),
        district = session.district.map(|d| d.name).unwrap_or("-"),
        channels = session.channels.join(", "),
    };
    let menu = Menu::column([
        ("✅ Tasdiqlash".to_string(), CallbackAction::ConfirmRegistration),
        ("❌ Bekor qilish".to_string(), CallbackAction::CancelRegistration),
    ]);
    Prompt::with_menu(text, menu)
}

pub fn completed(name: &str, record_id: i64) -> Prompt {
    Prompt::text(format!(
        "✅ ROʻYXATDAN OʻTDI!\n\n{}, sizni sistemamizga xush kelibsiz!\n\nID: {}",
        name, record_id
    ))
}

pub fn commit_failed() -> Prompt {
    Prompt::text("❌ Roʻyxatdan oʻtishda xatolik yuz berdi. Qayta urinib koʻring.")
}

pub fn already_registered() -> Prompt {
    Prompt::text("ℹ️ Siz allaqachon roʻyxatdan oʻtgansiz.")
}

pub fn cancelled() -> Prompt {
    Prompt::with_menu(
        "❌ Roʻyxatdan oʻtish bekor qilindi.\n\nQayta boshlash uchun tugmani bosing:",
        start_menu(),
    )
}
