use std::process;

use clap::Parser;

use hubtasks::cli::commands::{Cli, Commands};
use hubtasks::cli::{self, Context};
use hubtasks::config::Settings;
use hubtasks::logging;

fn main() {
    let cli_args = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };
    if let Err(e) = logging::init_logging(&settings) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }

    let ctx = match Context::new(&cli_args, settings) {
        Ok(ctx) => ctx,
        Err(e) => process::exit(cli::report_error(&e, cli_args.json)),
    };

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(&ctx),
        Commands::Location(cmd) => cli::location::run(cmd, &ctx),
        Commands::Settings(cmd) => cli::settings::run(cmd, &ctx),
        Commands::Pattern(cmd) => cli::settings::run_patterns(cmd, &ctx),
        Commands::State(cmd) => cli::settings::run_states(cmd, &ctx),
        Commands::Template(cmd) => cli::template::run(cmd, &ctx),
        Commands::Task(cmd) => cli::task::run(cmd, &ctx),
        Commands::Instance(cmd) => cli::instance::run(cmd, &ctx),
        Commands::Note(cmd) => cli::note::run(cmd, &ctx),
        Commands::Sweep => cli::sweep::run(&ctx),
        Commands::Status => cli::status::run(&ctx),
    };

    process::exit(exit_code);
}
