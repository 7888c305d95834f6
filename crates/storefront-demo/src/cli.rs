use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::outline::{OutlineArgs, run_outline};
use crate::plan::{PlanArgs, run_plan};
use crate::profile::list_profile_names;
use crate::reconcile::{ReconcileArgs, run_reconcile};

#[derive(Debug, Parser)]
#[command(
    name = "storefront-demo",
    about = "Plan, reconcile and outline storefront screens from bundled profiles",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the layout plan of every section.
    Plan(PlanArgs),

    /// Diff one profile's screen against another's.
    Reconcile(ReconcileArgs),

    /// Render a text outline of the screen.
    Outline(OutlineArgs),

    /// Print built-in profile names.
    #[command(name = "list-profiles")]
    ListProfiles,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Plan(args) => run_plan(args),
        Commands::Reconcile(args) => run_reconcile(args),
        Commands::Outline(args) => run_outline(args),
        Commands::ListProfiles => {
            for name in list_profile_names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::error::DemoError;
    use crate::profile::ScreenArgs;
    use crate::reconcile::ReconcileArgs;

    use super::{Cli, Commands, PlanArgs, run};

    #[test]
    fn list_profiles_command_dispatches_successfully() {
        let result = run(Cli {
            command: Commands::ListProfiles,
        });
        assert!(result.is_ok());
    }

    #[test]
    fn plan_command_dispatches_profile_not_found_error() {
        let result = run(Cli {
            command: Commands::Plan(PlanArgs {
                screen: ScreenArgs {
                    profile: "not-a-real-profile".to_string(),
                    width: None,
                    display_scale: None,
                    promoted_divider: None,
                },
                json: false,
            }),
        });

        match result.expect_err("missing profile should fail") {
            DemoError::ProfileNotFound { name } => assert_eq!(name, "not-a-real-profile"),
            other => panic!("expected ProfileNotFound, got {other}"),
        }
    }

    #[test]
    fn reconcile_command_dispatches_successfully() {
        let result = run(Cli {
            command: Commands::Reconcile(ReconcileArgs {
                from: "launch".to_string(),
                to: "reshuffled".to_string(),
                json: true,
            }),
        });
        assert!(result.is_ok());
    }

    #[test]
    fn flags_parse_into_overrides() {
        let cli = Cli::try_parse_from([
            "storefront-demo",
            "plan",
            "--profile",
            "launch",
            "--width",
            "320",
            "--promoted-divider",
            "true",
            "--json",
        ])
        .expect("parse");

        let Commands::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(args.screen.profile, "launch");
        assert_eq!(args.screen.width, Some(320.0));
        assert_eq!(args.screen.promoted_divider, Some(true));
        assert!(args.json);
    }

    #[test]
    fn outline_accepts_extra_widths() {
        let cli = Cli::try_parse_from(["storefront-demo", "outline", "--also-width", "320,820"])
            .expect("parse");
        let Commands::Outline(args) = cli.command else {
            panic!("expected outline");
        };
        assert_eq!(args.also_widths, vec![320.0, 820.0]);
        assert_eq!(args.screen.profile, "storefront");
    }
}
