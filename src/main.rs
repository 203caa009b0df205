use anyhow::Result;
use clap::Parser;

use shipit::registry::CargoRegistry;
use shipit::release::{run_release, ReleaseArgs};
use shipit::ui::{self, StdinGate};
use shipit::vcs::SystemGit;
use shipit::version::BumpKind;

#[derive(clap::Parser)]
#[command(
    name = "shipit",
    about = "Bump the version, update the changelog, then commit, tag, push and publish"
)]
struct Args {
    #[arg(value_enum, help = "Version component to bump")]
    bump: BumpKind,

    #[arg(short, long, help = "Skip confirmation prompts")]
    force: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,
}

fn main() -> Result<()> {
    // Usage problems exit with 1, like every other failure path; help and
    // version requests are not failures.
    let args = Args::try_parse().unwrap_or_else(|err| {
        let code = match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
            _ => 1,
        };
        let _ = err.print();
        std::process::exit(code);
    });

    let git = match SystemGit::discover(".") {
        Ok(git) => git,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };
    let work_tree = git.work_tree().to_path_buf();
    let registry = CargoRegistry::new(&work_tree);

    if let Ok(branch) = git.current_branch() {
        ui::display_status(&format!("Releasing from branch '{}'", branch));
    }

    let release_args = ReleaseArgs {
        bump: args.bump,
        force: args.force,
        dry_run: args.dry_run,
    };

    let mut gate = StdinGate;
    match run_release(&work_tree, release_args, &mut gate, &git, &registry) {
        Ok(outcome) if outcome.published => {
            println!(
                "\n\x1b[32m✓\x1b[0m Released version {} ({})\n",
                outcome.version, outcome.tag
            );
        }
        Ok(_) => {}
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }

    Ok(())
}
