use std::fmt::Write as _;

use clap::Args;
use serde::Serialize;
use storefront_layout::{
    Decoration, DecorationKind, DecorationPosition, Dimension, GroupArrangement, LayoutPlan,
    ScrollBehavior, SectionLayoutPlanner,
};

use crate::error::Result;
use crate::profile::{ScreenArgs, ScreenConfig};

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub screen: ScreenArgs,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    profile: &'a str,
    width: f64,
    display_scale: f64,
    hairline: f64,
    skipped: &'a [String],
    plans: &'a [LayoutPlan],
}

pub fn run_plan(args: PlanArgs) -> Result<()> {
    let config = args.screen.resolve()?;
    print!("{}", render_plan(&config, args.json)?);
    Ok(())
}

/// Plan every section of `config` and format the result.
pub fn render_plan(config: &ScreenConfig, json: bool) -> Result<String> {
    let planner = SectionLayoutPlanner::new(config.planner);
    let plans = planner.plan(&config.descriptors(), config.width);

    if json {
        let report = PlanReport {
            profile: &config.profile,
            width: config.width,
            display_scale: config.planner.display_scale,
            hairline: config.planner.hairline(),
            skipped: &config.skipped,
            plans: &plans,
        };
        let mut out = serde_json::to_string_pretty(&report)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "profile {} at {} pt, scale {}",
        config.profile,
        fmt_points(config.width),
        config.planner.display_scale
    );
    for (index, plan) in plans.iter().enumerate() {
        let _ = writeln!(out, "[{index}] {}", plan.section);
        let _ = writeln!(
            out,
            "    group  {} x {}, {} ({})",
            fmt_points(plan.group_width()),
            describe_dimension(plan.group.size.height),
            describe_arrangement(plan.group.arrangement),
            describe_scroll(plan.scroll)
        );
        let height = plan
            .item_height()
            .map_or_else(|| describe_dimension(plan.item.size.height), fmt_points);
        let _ = writeln!(
            out,
            "    item   {} x {}",
            fmt_points(plan.item_width()),
            height
        );
        for decoration in &plan.decorations {
            let _ = writeln!(out, "    {}", describe_decoration(decoration));
        }
    }
    for token in &config.skipped {
        let _ = writeln!(out, "skipped {token:?}");
    }
    Ok(out)
}

fn fmt_points(value: f64) -> String {
    format!("{value:.2}")
}

pub(crate) fn describe_dimension(dimension: Dimension) -> String {
    match dimension {
        Dimension::FractionalWidth(f) => format!("{f:.3}w"),
        Dimension::FractionalHeight(f) => format!("{f:.3}h"),
        Dimension::Absolute(v) => fmt_points(v),
        Dimension::Estimated(v) => format!("~{}", fmt_points(v)),
    }
}

fn describe_arrangement(arrangement: GroupArrangement) -> String {
    match arrangement {
        GroupArrangement::Horizontal(n) => format!("{n} across"),
        GroupArrangement::Vertical(n) => format!("{n} stacked"),
        GroupArrangement::Single => "single".to_string(),
    }
}

fn describe_scroll(scroll: ScrollBehavior) -> &'static str {
    match scroll {
        ScrollBehavior::None => "vertical flow",
        ScrollBehavior::GroupPagingCentered => "paging",
    }
}

fn describe_decoration(decoration: &Decoration) -> String {
    let position = match decoration.position {
        DecorationPosition::Top => "top",
        DecorationPosition::Bottom => "bottom",
    };
    match &decoration.kind {
        DecorationKind::Header { title } => format!("{position:<6} header {title:?}"),
        DecorationKind::Divider => format!(
            "{position:<6} divider {}",
            describe_dimension(decoration.size.height)
        ),
    }
}
