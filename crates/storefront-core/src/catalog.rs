//! Bundled sample catalog.
//!
//! Enough data to populate a complete storefront screen without an external
//! feed. App ids are unique across all lists; an app that appears in more than
//! one list keeps its id.

use crate::model::{AppRecord, CategoryRecord, Item, SectionDescriptor, SectionKind};

pub const POPULAR_TITLE: &str = "Popular Apps";
pub const ESSENTIAL_TITLE: &str = "Essential Picks";
pub const PAID_TITLE: &str = "Paid Apps";

fn app(id: u64, name: &str, icon: &str, rating: f32) -> Item {
    AppRecord::new(id, name, icon, rating).into()
}

fn category(id: u64, name: &str, icon: &str) -> Item {
    CategoryRecord::new(id, name, icon).into()
}

#[must_use]
pub fn promoted_apps() -> Vec<Item> {
    vec![
        app(1, "Daily Planner", "calendar", 4.8),
        app(2, "Trail Maps", "map", 4.6),
        app(3, "Pocket Piano", "pianokeys", 4.7),
        app(4, "Night Sky", "moon.stars", 4.9),
    ]
}

#[must_use]
pub fn popular_apps() -> Vec<Item> {
    vec![
        app(10, "Photo Lab", "camera.filters", 4.5),
        app(11, "Budget Buddy", "dollarsign.circle", 4.4),
        app(12, "Recipe Box", "fork.knife", 4.3),
        app(13, "Sleep Sounds", "bed.double", 4.6),
        app(14, "Language Cards", "character.book.closed", 4.2),
        app(15, "Run Tracker", "figure.run", 4.7),
        app(2, "Trail Maps", "map", 4.6),
    ]
}

#[must_use]
pub fn essential_apps() -> Vec<Item> {
    vec![
        app(20, "Scanner", "doc.viewfinder", 4.5),
        app(21, "Password Vault", "lock.shield", 4.8),
        app(22, "Weather Now", "cloud.sun", 4.4),
        app(23, "Unit Converter", "arrow.left.arrow.right", 4.1),
        app(24, "Flashlight", "flashlight.on.fill", 3.9),
        app(25, "Clipboard", "doc.on.clipboard", 4.0),
    ]
}

#[must_use]
pub fn paid_apps() -> Vec<Item> {
    vec![
        app(30, "Pixel Studio", "paintbrush", 4.9),
        app(31, "Tabletop Tactics", "dice", 4.7),
        app(32, "Field Recorder", "waveform", 4.6),
    ]
}

#[must_use]
pub fn categories() -> Vec<Item> {
    vec![
        category(1, "Games", "gamecontroller"),
        category(2, "Productivity", "checkmark.circle"),
        category(3, "Photo & Video", "camera"),
        category(4, "Health & Fitness", "heart"),
        category(5, "Education", "graduationcap"),
        category(6, "Music", "music.note"),
        category(7, "Travel", "airplane"),
        category(8, "Utilities", "wrench.and.screwdriver"),
    ]
}

/// Catalog items for a section kind. Standard sections with an unfamiliar
/// title get no items.
#[must_use]
pub fn items_for(kind: &SectionKind) -> Vec<Item> {
    match kind {
        SectionKind::Promoted => promoted_apps(),
        SectionKind::Standard(title) => match title.as_str() {
            POPULAR_TITLE => popular_apps(),
            ESSENTIAL_TITLE => essential_apps(),
            PAID_TITLE => paid_apps(),
            _ => Vec::new(),
        },
        SectionKind::Categories => categories(),
    }
}

/// Build a descriptor for `kind` filled from the catalog.
#[must_use]
pub fn section(kind: SectionKind) -> SectionDescriptor {
    let items = items_for(&kind);
    SectionDescriptor::new(kind, items)
}

/// The full storefront screen in its default order.
#[must_use]
pub fn storefront() -> Vec<SectionDescriptor> {
    vec![
        section(SectionKind::Promoted),
        section(SectionKind::Standard(POPULAR_TITLE.into())),
        section(SectionKind::Standard(ESSENTIAL_TITLE.into())),
        section(SectionKind::Standard(PAID_TITLE.into())),
        section(SectionKind::Categories),
    ]
}
