use std::collections::BTreeMap;

use clap::Args;
use storefront_core::{SectionDescriptor, SectionKind, catalog};
use storefront_layout::PlannerConfig;
use tracing::warn;

use crate::error::{DemoError, Result};

/// Environment variable that overrides the profile width.
pub const WIDTH_ENV: &str = "STOREFRONT_WIDTH";

/// Keys a screen profile may set.
pub const PROFILE_KEYS: [&str; 5] = [
    "DESCRIPTION",
    "WIDTH",
    "DISPLAY_SCALE",
    "PROMOTED_DIVIDER",
    "SECTIONS",
];

/// One parsed `.env` screen profile.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub name: String,
    values: BTreeMap<String, String>,
}

impl Profile {
    /// Parse `content` as the profile called `name`.
    pub fn parse(name: &str, content: &str) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            values: parse_profile_content(content)
                .map_err(|message| DemoError::invalid(format!("profile {name}: {message}")))?,
        })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn number(&self, key: &str) -> Result<Option<f64>> {
        self.get(key)
            .map(|raw| {
                raw.parse::<f64>().map_err(|_| {
                    DemoError::invalid(format!("profile {}: {key} is not a number: {raw:?}", self.name))
                })
            })
            .transpose()
    }

    pub fn width(&self) -> Result<Option<f64>> {
        self.number("WIDTH")
    }

    pub fn display_scale(&self) -> Result<Option<f64>> {
        self.number("DISPLAY_SCALE")
    }

    #[must_use]
    pub fn promoted_divider(&self) -> Option<bool> {
        self.get("PROMOTED_DIVIDER")
            .map(|raw| matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
    }

    /// Section kinds in profile order, plus the tokens that were left out.
    #[must_use]
    pub fn sections(&self) -> (Vec<SectionKind>, Vec<String>) {
        parse_sections(self.get("SECTIONS").unwrap_or_default())
    }
}

const BUILTIN_PROFILES: [(&str, &str); 4] = [
    ("launch", include_str!("../profiles/launch.env")),
    ("storefront", include_str!("../profiles/storefront.env")),
    ("reshuffled", include_str!("../profiles/reshuffled.env")),
    ("tablet", include_str!("../profiles/tablet.env")),
];

#[must_use]
pub fn list_profile_names() -> Vec<&'static str> {
    BUILTIN_PROFILES.iter().map(|(name, _)| *name).collect()
}

pub fn load_profile(name: &str) -> Result<Profile> {
    let content = BUILTIN_PROFILES
        .iter()
        .find_map(|(candidate, content)| (*candidate == name).then_some(*content))
        .ok_or_else(|| DemoError::ProfileNotFound {
            name: name.to_string(),
        })?;
    Profile::parse(name, content)
}

/// Parse `KEY=value` lines. Keys are case-insensitive and must be one of
/// [`PROFILE_KEYS`]; values may be wrapped in single or double quotes.
pub fn parse_profile_content(
    content: &str,
) -> std::result::Result<BTreeMap<String, String>, String> {
    let mut values = BTreeMap::new();

    for (number, line) in content.lines().enumerate().map(|(i, l)| (i + 1, l.trim())) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| format!("line {number}: expected KEY=value"))?;
        let key = key.trim().to_ascii_uppercase();
        if !PROFILE_KEYS.contains(&key.as_str()) {
            return Err(format!("line {number}: unknown key {key}"));
        }

        let value = value.trim();
        let value = ['"', '\'']
            .iter()
            .find_map(|q| value.strip_prefix(*q).and_then(|v| v.strip_suffix(*q)))
            .unwrap_or(value);
        values.insert(key, value.trim().to_string());
    }

    Ok(values)
}

/// Screen selection shared by the commands that plan a single screen.
#[derive(Debug, Clone, Args)]
pub struct ScreenArgs {
    #[arg(long, default_value = "storefront")]
    pub profile: String,

    #[arg(long)]
    pub width: Option<f64>,

    #[arg(long = "display-scale")]
    pub display_scale: Option<f64>,

    #[arg(long = "promoted-divider")]
    pub promoted_divider: Option<bool>,
}

impl ScreenArgs {
    #[must_use]
    pub fn overrides(&self) -> ScreenOverrides {
        ScreenOverrides {
            width: self.width,
            display_scale: self.display_scale,
            promoted_divider: self.promoted_divider,
        }
    }

    /// Resolve against the process environment.
    pub fn resolve(&self) -> Result<ScreenConfig> {
        let env_width = std::env::var(WIDTH_ENV).ok();
        ScreenConfig::load(&self.profile, self.overrides(), env_width.as_deref())
    }
}

/// Command-line values that take precedence over the profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenOverrides {
    pub width: Option<f64>,
    pub display_scale: Option<f64>,
    pub promoted_divider: Option<bool>,
}

/// A profile resolved into planner inputs.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    pub profile: String,
    pub description: String,
    pub width: f64,
    pub planner: PlannerConfig,
    pub sections: Vec<SectionKind>,
    /// Section tokens that did not parse and were left out.
    pub skipped: Vec<String>,
}

impl ScreenConfig {
    /// Resolve `profile`, applying `overrides` and then `env_width` (the raw
    /// value of [`WIDTH_ENV`]) when no width override was given.
    pub fn resolve(
        profile: &Profile,
        overrides: ScreenOverrides,
        env_width: Option<&str>,
    ) -> Result<Self> {
        let env_width = match env_width.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
                DemoError::invalid(format!("{WIDTH_ENV} is not a number: {raw:?}"))
            })?),
            None => None,
        };

        let width = match overrides.width.or(env_width) {
            Some(width) => width,
            None => profile.width()?.ok_or_else(|| {
                DemoError::invalid(format!("profile {} does not set WIDTH", profile.name))
            })?,
        };
        if !width.is_finite() || width < 0.0 {
            return Err(DemoError::invalid(format!(
                "width must be a non-negative number, got {width}"
            )));
        }

        let defaults = PlannerConfig::default();
        let display_scale = match overrides.display_scale {
            Some(scale) => scale,
            None => profile.display_scale()?.unwrap_or(defaults.display_scale),
        };
        let planner = PlannerConfig {
            display_scale,
            promoted_top_divider: overrides
                .promoted_divider
                .or_else(|| profile.promoted_divider())
                .unwrap_or(defaults.promoted_top_divider),
        };

        let (sections, skipped) = profile.sections();

        Ok(Self {
            profile: profile.name.clone(),
            description: profile.get("DESCRIPTION").unwrap_or_default().to_string(),
            width,
            planner,
            sections,
            skipped,
        })
    }

    /// Load a built-in profile by name and resolve it.
    pub fn load(name: &str, overrides: ScreenOverrides, env_width: Option<&str>) -> Result<Self> {
        let profile = load_profile(name)?;
        Self::resolve(&profile, overrides, env_width)
    }

    /// Section descriptors filled from the bundled catalog.
    #[must_use]
    pub fn descriptors(&self) -> Vec<SectionDescriptor> {
        self.sections.iter().cloned().map(catalog::section).collect()
    }
}

/// Split a comma-separated section list, skipping tokens that do not parse.
#[must_use]
pub fn parse_sections(raw: &str) -> (Vec<SectionKind>, Vec<String>) {
    let mut sections = Vec::new();
    let mut skipped = Vec::new();

    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse::<SectionKind>() {
            Ok(kind) if sections.contains(&kind) => {
                warn!(section = %kind, "Section listed twice, keeping the first");
                skipped.push(token.to_string());
            }
            Ok(kind) => sections.push(kind),
            Err(error) => {
                warn!(%error, "Skipping section with no layout");
                skipped.push(token.to_string());
            }
        }
    }

    (sections, skipped)
}
