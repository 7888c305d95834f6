//! Text rendering of a planned screen.
//!
//! Stands in for a real presentation host: each cell and decoration becomes
//! one line of text, items are split into pages by their group size, and the
//! plan's resolved widths are printed next to each section.

use std::fmt::Write as _;

use clap::Args;
use storefront_core::{AppRecord, CategoryRecord, SectionDescriptor};
use storefront_layout::{
    DecorationPosition, LayoutPlan, PlanCache, ScrollBehavior, SectionLayoutPlanner,
    SectionRenderer, render_decoration, render_item,
};
use tracing::warn;

use crate::error::Result;
use crate::profile::{ScreenArgs, ScreenConfig};

#[derive(Debug, Clone, Args)]
pub struct OutlineArgs {
    #[command(flatten)]
    pub screen: ScreenArgs,

    /// Also outline at these widths, reusing cached plans where possible.
    #[arg(long = "also-width", value_delimiter = ',')]
    pub also_widths: Vec<f64>,
}

/// [`SectionRenderer`] that produces one line of text per cell.
#[derive(Debug, Default)]
pub struct TextRenderer {
    cells: usize,
}

impl TextRenderer {
    /// Cells built so far.
    #[must_use]
    pub fn cells(&self) -> usize {
        self.cells
    }
}

fn stars(rating: f32) -> String {
    let full = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "*".repeat(full), ".".repeat(5 - full))
}

impl SectionRenderer for TextRenderer {
    type Cell = String;
    type Decoration = String;

    fn promoted_cell(&mut self, app: &AppRecord) -> String {
        self.cells += 1;
        format!("[{}] {} {}", app.icon, app.name, stars(app.rating))
    }

    fn standard_cell(&mut self, _section_title: &str, app: &AppRecord) -> String {
        self.cells += 1;
        format!("{} ({:.1})", app.name, app.rating)
    }

    fn category_cell(&mut self, category: &CategoryRecord) -> String {
        self.cells += 1;
        format!("{} > ", category.name)
    }

    fn header(&mut self, title: &str) -> String {
        format!("## {title}")
    }

    fn divider(&mut self) -> String {
        "----".to_string()
    }
}

pub fn run_outline(args: OutlineArgs) -> Result<()> {
    let config = args.screen.resolve()?;
    let sections = config.descriptors();
    let planner = SectionLayoutPlanner::new(config.planner);
    let mut cache = PlanCache::default();

    let mut widths = vec![config.width];
    widths.extend(args.also_widths.iter().copied());
    for width in widths {
        let plans = cache.plan(&planner, &sections, width);
        print!("{}", render_outline(&config, &sections, &plans, width));
    }
    Ok(())
}

/// Outline `sections` laid out by `plans` (one plan per section).
pub fn render_outline(
    config: &ScreenConfig,
    sections: &[SectionDescriptor],
    plans: &[LayoutPlan],
    width: f64,
) -> String {
    let mut renderer = TextRenderer::default();
    let mut out = String::new();
    let _ = writeln!(out, "# {} @ {width:.0} pt", config.profile);

    for (section, plan) in sections.iter().zip(plans) {
        for decoration in plan.decorations_at(DecorationPosition::Top) {
            let _ = writeln!(out, "{}", render_decoration(decoration, &mut renderer));
        }
        let _ = writeln!(
            out,
            "<{} | group {:.1} | item {:.1}>",
            section.kind(),
            plan.group_width(),
            plan.item_width()
        );

        let per_group = plan.group.arrangement.items_per_group().max(1);
        let mut cells = Vec::with_capacity(section.len());
        for item in section.items() {
            match render_item(section.kind(), item, &mut renderer) {
                Ok(cell) => cells.push(cell),
                Err(mismatch) => warn!(%mismatch, "Skipping item"),
            }
        }

        match plan.scroll {
            ScrollBehavior::GroupPagingCentered => {
                for (page, group) in cells.chunks(per_group).enumerate() {
                    let _ = writeln!(out, "  page {}: {}", page + 1, group.join(" | "));
                }
            }
            ScrollBehavior::None => {
                for cell in &cells {
                    let _ = writeln!(out, "  {cell}");
                }
            }
        }

        for decoration in plan.decorations_at(DecorationPosition::Bottom) {
            let _ = writeln!(out, "{}", render_decoration(decoration, &mut renderer));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use storefront_core::{CategoryRecord, Item, SectionKind};

    use crate::profile::ScreenOverrides;

    use super::*;

    fn outline(config: &ScreenConfig, sections: &[SectionDescriptor]) -> String {
        let planner = SectionLayoutPlanner::new(config.planner);
        let plans = planner.plan(sections, config.width);
        render_outline(config, sections, &plans, config.width)
    }

    #[test]
    fn storefront_outline_pages_standard_lists_by_three() {
        let config =
            ScreenConfig::load("storefront", ScreenOverrides::default(), None).expect("profile");
        let out = outline(&config, &config.descriptors());

        assert!(out.starts_with("# storefront @ 390 pt\n"));
        assert!(out.contains("## Popular Apps"));
        assert!(out.contains("## Top Categories"));
        // Seven popular apps at three per page.
        let popular: Vec<&str> = out
            .lines()
            .skip_while(|l| !l.starts_with("<standard:Popular Apps"))
            .skip(1)
            .take_while(|l| l.starts_with("  page"))
            .collect();
        assert_eq!(popular.len(), 3);
    }

    #[test]
    fn promoted_divider_comes_first_when_enabled() {
        let config =
            ScreenConfig::load("storefront", ScreenOverrides::default(), None).expect("profile");
        let out = outline(&config, &config.descriptors());
        assert_eq!(out.lines().nth(1), Some("----"));
    }

    #[test]
    fn mismatched_items_are_skipped() {
        let config = ScreenConfig::load("launch", ScreenOverrides::default(), None).expect("profile");
        let sections = vec![SectionDescriptor::new(
            SectionKind::Promoted,
            vec![Item::from(CategoryRecord::new(1, "Games", "gamecontroller"))],
        )];
        let out = outline(&config, &sections);
        assert!(!out.contains("Games"));
        assert!(!out.contains("page"));
    }

    #[test]
    fn renderer_counts_cells() {
        let mut renderer = TextRenderer::default();
        renderer.promoted_cell(&AppRecord::new(1, "A", "a", 4.4));
        renderer.category_cell(&CategoryRecord::new(1, "C", "c"));
        assert_eq!(renderer.header("T"), "## T");
        assert_eq!(renderer.cells(), 2);
    }

    #[test]
    fn stars_round_to_whole_ratings() {
        assert_eq!(stars(4.6), "*****");
        assert_eq!(stars(4.4), "****.");
        assert_eq!(stars(0.0), ".....");
    }
}
