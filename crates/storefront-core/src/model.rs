#![forbid(unsafe_code)]

//! Sections, items and their identities.
//!
//! Identity is structural everywhere: two [`SectionKind::Standard`] values are
//! the same section iff their titles match, and two items are the same item
//! iff their [`ItemId`] (variant tag plus record id) match. Names, icons and
//! ratings never take part in identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Title shown above the categories grid.
pub const CATEGORIES_TITLE: &str = "Top Categories";

/// The closed set of section kinds a storefront screen is built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    content = "title",
    rename_all = "snake_case",
    try_from = "SectionKindRepr"
)]
pub enum SectionKind {
    /// Full-bleed paging carousel of featured apps.
    Promoted,
    /// Titled, horizontally paging list of apps, three rows per page.
    Standard(String),
    /// Single-column list of categories.
    Categories,
}

/// Wire form of [`SectionKind`] before the title check.
#[derive(Deserialize)]
#[serde(tag = "kind", content = "title", rename_all = "snake_case")]
enum SectionKindRepr {
    Promoted,
    Standard(String),
    Categories,
}

impl TryFrom<SectionKindRepr> for SectionKind {
    type Error = ModelError;

    fn try_from(repr: SectionKindRepr) -> Result<Self> {
        match repr {
            SectionKindRepr::Promoted => Ok(Self::Promoted),
            SectionKindRepr::Standard(title) => Self::standard(title),
            SectionKindRepr::Categories => Ok(Self::Categories),
        }
    }
}

impl SectionKind {
    /// Build a standard section, rejecting blank titles.
    pub fn standard(title: impl Into<String>) -> Result<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ModelError::EmptyTitle);
        }
        Ok(Self::Standard(title))
    }

    /// Text drawn by the section's header decoration, if it has one.
    #[must_use]
    pub fn header_title(&self) -> Option<&str> {
        match self {
            Self::Promoted => None,
            Self::Standard(title) => Some(title.as_str()),
            Self::Categories => Some(CATEGORIES_TITLE),
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Promoted => "promoted",
            Self::Standard(_) => "standard",
            Self::Categories => "categories",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Promoted => f.write_str("promoted"),
            Self::Standard(title) => write!(f, "standard:{title}"),
            Self::Categories => f.write_str("categories"),
        }
    }
}

impl FromStr for SectionKind {
    type Err = ModelError;

    /// Parse the configuration form: `promoted`, `standard:<title>`, `categories`.
    fn from_str(raw: &str) -> Result<Self> {
        let token = raw.trim();
        if let Some((head, title)) = token.split_once(':') {
            if head.trim().eq_ignore_ascii_case("standard") {
                return Self::standard(title.trim());
            }
            return Err(ModelError::unknown(token));
        }

        match token.to_ascii_lowercase().as_str() {
            "promoted" => Ok(Self::Promoted),
            "categories" => Ok(Self::Categories),
            _ => Err(ModelError::unknown(token)),
        }
    }
}

/// Variant tag that keeps app ids and category ids in separate namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemTag {
    App,
    Category,
}

/// Diff identity of an [`Item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId {
    pub tag: ItemTag,
    pub id: u64,
}

impl ItemId {
    #[inline]
    pub const fn app(id: u64) -> Self {
        Self {
            tag: ItemTag::App,
            id,
        }
    }

    #[inline]
    pub const fn category(id: u64) -> Self {
        Self {
            tag: ItemTag::Category,
            id,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag {
            ItemTag::App => write!(f, "app#{}", self.id),
            ItemTag::Category => write!(f, "category#{}", self.id),
        }
    }
}

/// An app listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppRecord {
    pub id: u64,
    pub name: String,
    /// Symbolic icon reference resolved by the host.
    pub icon: String,
    /// Average rating, 0.0 to 5.0.
    pub rating: f32,
}

impl AppRecord {
    pub fn new(id: u64, name: impl Into<String>, icon: impl Into<String>, rating: f32) -> Self {
        Self {
            id,
            name: name.into(),
            icon: icon.into(),
            rating: rating.clamp(0.0, 5.0),
        }
    }
}

/// A browsable category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: u64,
    pub name: String,
    pub icon: String,
}

impl CategoryRecord {
    pub fn new(id: u64, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            icon: icon.into(),
        }
    }
}

/// A single renderable unit inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    App(AppRecord),
    Category(CategoryRecord),
}

impl Item {
    #[must_use]
    pub fn id(&self) -> ItemId {
        match self {
            Self::App(app) => ItemId::app(app.id),
            Self::Category(category) => ItemId::category(category.id),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::App(app) => &app.name,
            Self::Category(category) => &category.name,
        }
    }

    #[must_use]
    pub fn as_app(&self) -> Option<&AppRecord> {
        match self {
            Self::App(app) => Some(app),
            Self::Category(_) => None,
        }
    }

    #[must_use]
    pub fn as_category(&self) -> Option<&CategoryRecord> {
        match self {
            Self::Category(category) => Some(category),
            Self::App(_) => None,
        }
    }
}

impl From<AppRecord> for Item {
    fn from(app: AppRecord) -> Self {
        Self::App(app)
    }
}

impl From<CategoryRecord> for Item {
    fn from(category: CategoryRecord) -> Self {
        Self::Category(category)
    }
}

/// A section together with its ordered items. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    kind: SectionKind,
    items: Vec<Item>,
}

impl SectionDescriptor {
    pub fn new(kind: SectionKind, items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            kind,
            items: items.into_iter().collect(),
        }
    }

    /// A section with no items yet.
    pub fn empty(kind: SectionKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> &SectionKind {
        &self.kind
    }

    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Item identities in display order.
    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().map(Item::id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_sections_compare_by_title() {
        let a = SectionKind::Standard("Popular".into());
        let b = SectionKind::Standard("Popular".into());
        let c = SectionKind::Standard("Essentials".into());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(SectionKind::Promoted, SectionKind::Categories);
    }

    #[test]
    fn parse_round_trips_display_form() {
        for kind in [
            SectionKind::Promoted,
            SectionKind::Standard("Popular Apps".into()),
            SectionKind::Categories,
        ] {
            let parsed: SectionKind = kind.to_string().parse().expect("parse");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn parse_is_lenient_about_case_and_whitespace() {
        assert_eq!(" Promoted ".parse::<SectionKind>(), Ok(SectionKind::Promoted));
        assert_eq!(
            "STANDARD: Paid ".parse::<SectionKind>(),
            Ok(SectionKind::Standard("Paid".into()))
        );
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        assert_eq!(
            "carousel".parse::<SectionKind>(),
            Err(ModelError::unknown("carousel"))
        );
        assert_eq!(
            "banner:Hello".parse::<SectionKind>(),
            Err(ModelError::unknown("banner:Hello"))
        );
        assert_eq!("standard:  ".parse::<SectionKind>(), Err(ModelError::EmptyTitle));
    }

    #[test]
    fn header_titles_follow_kind() {
        assert_eq!(SectionKind::Promoted.header_title(), None);
        assert_eq!(
            SectionKind::Standard("Popular".into()).header_title(),
            Some("Popular")
        );
        assert_eq!(SectionKind::Categories.header_title(), Some(CATEGORIES_TITLE));
    }

    #[test]
    fn item_identity_separates_variants() {
        let app: Item = AppRecord::new(1, "Notes", "note.text", 4.5).into();
        let category: Item = CategoryRecord::new(1, "Games", "gamecontroller").into();
        assert_ne!(app.id(), category.id());
        assert_eq!(app.id().to_string(), "app#1");
        assert_eq!(category.id().to_string(), "category#1");
    }

    #[test]
    fn identity_ignores_display_fields() {
        let before: Item = AppRecord::new(9, "Maps", "map", 3.0).into();
        let after: Item = AppRecord::new(9, "Maps Pro", "map.fill", 4.9).into();
        assert_eq!(before.id(), after.id());
        assert_ne!(before, after);
    }

    #[test]
    fn rating_is_clamped() {
        assert_eq!(AppRecord::new(1, "x", "y", 9.0).rating, 5.0);
        assert_eq!(AppRecord::new(1, "x", "y", -1.0).rating, 0.0);
    }

    #[test]
    fn section_kind_serializes_with_tag() {
        let json = serde_json::to_value(SectionKind::Standard("Popular".into())).expect("json");
        assert_eq!(json, serde_json::json!({"kind": "standard", "title": "Popular"}));
        let json = serde_json::to_value(SectionKind::Promoted).expect("json");
        assert_eq!(json, serde_json::json!({"kind": "promoted"}));
    }

    #[test]
    fn blank_standard_title_is_rejected_on_deserialize() {
        for json in [
            r#"{"kind":"standard","title":""}"#,
            r#"{"kind":"standard","title":"   "}"#,
        ] {
            let err = serde_json::from_str::<SectionKind>(json).unwrap_err();
            assert!(err.to_string().contains("non-empty title"), "{json}: {err}");
        }
        let kind: SectionKind =
            serde_json::from_str(r#"{"kind":"standard","title":"Paid Apps"}"#).expect("valid");
        assert_eq!(kind, SectionKind::Standard("Paid Apps".into()));
        let kind: SectionKind = serde_json::from_str(r#"{"kind":"categories"}"#).expect("valid");
        assert_eq!(kind, SectionKind::Categories);
    }
}
