//! Typed dispatch from plans and items to host renderers.
//!
//! A host implements [`SectionRenderer`] once, with one method per cell kind
//! and per decoration kind. [`render_item`] picks the method by matching the
//! section kind against the item variant, so a mismatched pairing (a category
//! placed in the promoted carousel, say) surfaces as a [`CellMismatch`] value
//! rather than a failed cast.

use storefront_core::{AppRecord, CategoryRecord, Item, ItemTag, SectionKind};
use thiserror::Error;

use crate::{Decoration, DecorationKind};

/// Renderer capabilities a host provides for one screen.
pub trait SectionRenderer {
    type Cell;
    type Decoration;

    fn promoted_cell(&mut self, app: &AppRecord) -> Self::Cell;
    fn standard_cell(&mut self, section_title: &str, app: &AppRecord) -> Self::Cell;
    fn category_cell(&mut self, category: &CategoryRecord) -> Self::Cell;

    fn header(&mut self, title: &str) -> Self::Decoration;
    fn divider(&mut self) -> Self::Decoration;
}

/// An item variant that the section kind cannot display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{section} section cannot display {found:?} item {id}")]
pub struct CellMismatch {
    pub section: SectionKind,
    pub found: ItemTag,
    pub id: u64,
}

/// Build the cell for `item` inside a section of kind `section`.
pub fn render_item<R: SectionRenderer>(
    section: &SectionKind,
    item: &Item,
    renderer: &mut R,
) -> Result<R::Cell, CellMismatch> {
    match (section, item) {
        (SectionKind::Promoted, Item::App(app)) => Ok(renderer.promoted_cell(app)),
        (SectionKind::Standard(title), Item::App(app)) => Ok(renderer.standard_cell(title, app)),
        (SectionKind::Categories, Item::Category(category)) => {
            Ok(renderer.category_cell(category))
        }
        (section, item) => {
            let id = item.id();
            Err(CellMismatch {
                section: section.clone(),
                found: id.tag,
                id: id.id,
            })
        }
    }
}

/// Build the view for a boundary decoration.
pub fn render_decoration<R: SectionRenderer>(
    decoration: &Decoration,
    renderer: &mut R,
) -> R::Decoration {
    match &decoration.kind {
        DecorationKind::Header { title } => renderer.header(title),
        DecorationKind::Divider => renderer.divider(),
    }
}
