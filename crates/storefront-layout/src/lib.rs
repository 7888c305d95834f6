#![forbid(unsafe_code)]

//! Section layout plans and the planner that produces them.
//!
//! The planner is closed-form geometry: each [`SectionKind`] maps to a fixed
//! recipe of item size, grouping, insets, scrolling and boundary decorations,
//! scaled by the container width. It is pure and stateless, so identical
//! inputs always produce identical plans and results can be memoized with
//! [`PlanCache`].

pub mod cache;
pub mod registry;

pub use cache::{PlanCache, PlanCacheKey, PlanCacheStats};
pub use registry::{CellMismatch, SectionRenderer, render_decoration, render_item};
pub use storefront_core::{EdgeInsets, SectionDescriptor, SectionKind};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Share of the container width taken by a paging group.
pub const GROUP_WIDTH_FRACTION: f64 = 0.92;
/// Leading/trailing inset between promoted items.
pub const PROMOTED_ITEM_INSET: f64 = 5.0;
/// Estimated height of a promoted group.
pub const PROMOTED_ESTIMATED_HEIGHT: f64 = 300.0;
/// Estimated height of a standard group (three rows).
pub const STANDARD_ESTIMATED_HEIGHT: f64 = 250.0;
/// Leading/trailing inset on standard groups.
pub const STANDARD_GROUP_INSET: f64 = 4.0;
/// Rows stacked in one standard group.
pub const STANDARD_ROWS_PER_GROUP: usize = 3;
/// Estimated height of a section header.
pub const HEADER_ESTIMATED_HEIGHT: f64 = 44.0;
/// Estimated height of one categories row.
pub const CATEGORY_ROW_ESTIMATED_HEIGHT: f64 = 44.0;

/// How one axis of an element is sized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum Dimension {
    /// Fraction of the containing element's width.
    FractionalWidth(f64),
    /// Fraction of the containing element's height.
    FractionalHeight(f64),
    /// Exact size in points.
    Absolute(f64),
    /// Initial guess in points; the host may grow it to fit content.
    Estimated(f64),
}

impl Dimension {
    /// Resolve against the containing element's width.
    ///
    /// Returns `None` when the size depends on the container height, which is
    /// not known until the host measures content.
    #[must_use]
    pub fn resolve(self, container_width: f64) -> Option<f64> {
        match self {
            Self::FractionalWidth(f) => Some(container_width * f),
            Self::FractionalHeight(_) => None,
            Self::Absolute(v) | Self::Estimated(v) => Some(v),
        }
    }
}

/// Width and height rules for one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutSize {
    pub width: Dimension,
    pub height: Dimension,
}

impl LayoutSize {
    pub const fn new(width: Dimension, height: Dimension) -> Self {
        Self { width, height }
    }

    /// Fills the containing element on both axes.
    pub const fn fill() -> Self {
        Self::new(Dimension::FractionalWidth(1.0), Dimension::FractionalHeight(1.0))
    }
}

/// How items are arranged inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "axis", content = "count", rename_all = "snake_case")]
pub enum GroupArrangement {
    /// `count` items side by side.
    Horizontal(usize),
    /// `count` items stacked top to bottom.
    Vertical(usize),
    /// One item filling the group.
    Single,
}

impl GroupArrangement {
    /// Number of items a single group holds.
    #[must_use]
    pub fn items_per_group(self) -> usize {
        match self {
            Self::Horizontal(n) | Self::Vertical(n) => n,
            Self::Single => 1,
        }
    }
}

/// Scrolling of a section's groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    /// Groups flow with the main vertical scroll.
    #[default]
    None,
    /// Groups page horizontally and snap to the centre of the viewport.
    GroupPagingCentered,
}

/// Edge a decoration is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationPosition {
    Top,
    Bottom,
}

/// Non-item element drawn at a section boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecorationKind {
    Header { title: String },
    Divider,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub position: DecorationPosition,
    pub size: LayoutSize,
}

impl Decoration {
    fn header(title: &str) -> Self {
        Self {
            kind: DecorationKind::Header {
                title: title.to_owned(),
            },
            position: DecorationPosition::Top,
            size: LayoutSize::new(
                Dimension::FractionalWidth(1.0),
                Dimension::Estimated(HEADER_ESTIMATED_HEIGHT),
            ),
        }
    }

    fn divider(position: DecorationPosition, thickness: f64) -> Self {
        Self {
            kind: DecorationKind::Divider,
            position,
            size: LayoutSize::new(Dimension::FractionalWidth(1.0), Dimension::Absolute(thickness)),
        }
    }
}

/// Sizing of a single item within its group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemPlan {
    pub size: LayoutSize,
    pub insets: EdgeInsets,
}

/// Sizing and arrangement of a group of items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupPlan {
    pub size: LayoutSize,
    pub arrangement: GroupArrangement,
    pub insets: EdgeInsets,
    /// Group width resolved against the container width.
    pub resolved_width: f64,
}

/// Geometric plan for one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub section: SectionKind,
    pub container_width: f64,
    pub item: ItemPlan,
    pub group: GroupPlan,
    pub scroll: ScrollBehavior,
    pub decorations: Vec<Decoration>,
}

impl LayoutPlan {
    /// Resolved group width.
    #[inline]
    pub fn group_width(&self) -> f64 {
        self.group.resolved_width
    }

    /// Width available to one item after group and item insets.
    pub fn item_width(&self) -> f64 {
        let content = self.group.insets.inset_width(self.group.resolved_width);
        let slot = match self.group.arrangement {
            GroupArrangement::Horizontal(n) if n > 0 => content / n as f64,
            _ => content,
        };
        let width = self.item.size.width.resolve(slot).unwrap_or(slot);
        self.item.insets.inset_width(width)
    }

    /// Item height, when it can be derived from widths alone.
    pub fn item_height(&self) -> Option<f64> {
        match self.item.size.height {
            Dimension::FractionalWidth(f) => {
                let content = self.group.insets.inset_width(self.group.resolved_width);
                Some(content * f)
            }
            Dimension::Absolute(v) | Dimension::Estimated(v) => Some(v),
            Dimension::FractionalHeight(f) => match self.group.size.height {
                Dimension::Absolute(h) | Dimension::Estimated(h) => {
                    let per_item = h / self.group.arrangement.items_per_group() as f64;
                    Some(per_item * f)
                }
                _ => None,
            },
        }
    }

    pub fn decorations_at(
        &self,
        position: DecorationPosition,
    ) -> impl Iterator<Item = &Decoration> + '_ {
        self.decorations
            .iter()
            .filter(move |d| d.position == position)
    }
}

/// Host-environment knobs for the planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Physical pixels per layout point.
    pub display_scale: f64,
    /// Draw a hairline above the promoted carousel.
    pub promoted_top_divider: bool,
}

impl PlannerConfig {
    /// Thinnest line the display can render, in points.
    #[must_use]
    pub fn hairline(&self) -> f64 {
        if self.display_scale.is_finite() && self.display_scale >= 1.0 {
            1.0 / self.display_scale
        } else {
            1.0
        }
    }

    #[must_use]
    pub fn with_display_scale(mut self, scale: f64) -> Self {
        self.display_scale = scale;
        self
    }

    #[must_use]
    pub fn with_promoted_top_divider(mut self, enabled: bool) -> Self {
        self.promoted_top_divider = enabled;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            display_scale: 2.0,
            promoted_top_divider: false,
        }
    }
}

/// Leading/trailing inset that lines a full-width row up with the 92% groups
/// of neighbouring sections: `(w - 0.92w) / 2 + 4`.
#[inline]
#[must_use]
pub fn aligned_row_inset(container_width: f64) -> f64 {
    (container_width - container_width * GROUP_WIDTH_FRACTION) / 2.0 + STANDARD_GROUP_INSET
}

/// Computes per-section layout plans.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SectionLayoutPlanner {
    config: PlannerConfig,
}

impl SectionLayoutPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// One plan per section, in input order.
    ///
    /// Zero width yields degenerate zero-size plans. Negative or non-finite
    /// widths are treated as zero.
    pub fn plan(&self, sections: &[SectionDescriptor], container_width: f64) -> Vec<LayoutPlan> {
        let _span = tracing::debug_span!(
            "plan_sections",
            sections = sections.len(),
            width = container_width
        )
        .entered();

        let width = sanitize_width(container_width);
        let plans: Vec<LayoutPlan> = sections
            .iter()
            .map(|section| self.plan_section(section.kind(), width))
            .collect();

        debug!(plans = plans.len(), width, "Planned sections");
        plans
    }

    /// Plan a single section kind.
    pub fn plan_section(&self, kind: &SectionKind, container_width: f64) -> LayoutPlan {
        let width = sanitize_width(container_width);
        match kind {
            SectionKind::Promoted => self.promoted(width),
            SectionKind::Standard(title) => self.standard(title, width),
            SectionKind::Categories => self.categories(width),
        }
    }

    fn promoted(&self, width: f64) -> LayoutPlan {
        let mut decorations = Vec::new();
        if self.config.promoted_top_divider {
            decorations.push(Decoration::divider(
                DecorationPosition::Top,
                self.config.hairline(),
            ));
        }

        LayoutPlan {
            section: SectionKind::Promoted,
            container_width: width,
            item: ItemPlan {
                size: LayoutSize::fill(),
                insets: EdgeInsets::horizontal(PROMOTED_ITEM_INSET),
            },
            group: GroupPlan {
                size: LayoutSize::new(
                    Dimension::FractionalWidth(GROUP_WIDTH_FRACTION),
                    Dimension::Estimated(PROMOTED_ESTIMATED_HEIGHT),
                ),
                arrangement: GroupArrangement::Single,
                insets: EdgeInsets::ZERO,
                resolved_width: width * GROUP_WIDTH_FRACTION,
            },
            scroll: ScrollBehavior::GroupPagingCentered,
            decorations,
        }
    }

    fn standard(&self, title: &str, width: f64) -> LayoutPlan {
        LayoutPlan {
            section: SectionKind::Standard(title.to_owned()),
            container_width: width,
            item: ItemPlan {
                size: LayoutSize::new(
                    Dimension::FractionalWidth(1.0),
                    Dimension::FractionalWidth(1.0 / STANDARD_ROWS_PER_GROUP as f64),
                ),
                insets: EdgeInsets::ZERO,
            },
            group: GroupPlan {
                size: LayoutSize::new(
                    Dimension::FractionalWidth(GROUP_WIDTH_FRACTION),
                    Dimension::Estimated(STANDARD_ESTIMATED_HEIGHT),
                ),
                arrangement: GroupArrangement::Vertical(STANDARD_ROWS_PER_GROUP),
                insets: EdgeInsets::horizontal(STANDARD_GROUP_INSET),
                resolved_width: width * GROUP_WIDTH_FRACTION,
            },
            scroll: ScrollBehavior::GroupPagingCentered,
            decorations: vec![
                Decoration::header(title),
                Decoration::divider(DecorationPosition::Bottom, self.config.hairline()),
            ],
        }
    }

    fn categories(&self, width: f64) -> LayoutPlan {
        let kind = SectionKind::Categories;
        let title = kind.header_title().unwrap_or_default().to_owned();
        LayoutPlan {
            section: kind,
            container_width: width,
            item: ItemPlan {
                size: LayoutSize::fill(),
                insets: EdgeInsets::horizontal(aligned_row_inset(width)),
            },
            group: GroupPlan {
                size: LayoutSize::new(
                    Dimension::FractionalWidth(1.0),
                    Dimension::Estimated(CATEGORY_ROW_ESTIMATED_HEIGHT),
                ),
                arrangement: GroupArrangement::Vertical(1),
                insets: EdgeInsets::ZERO,
                resolved_width: width,
            },
            scroll: ScrollBehavior::None,
            decorations: vec![Decoration::header(&title)],
        }
    }
}

fn sanitize_width(width: f64) -> f64 {
    if width.is_finite() && width >= 0.0 {
        width
    } else {
        warn!(width, "Container width is not a non-negative number, planning at zero");
        0.0
    }
}
