use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{config, rename, update};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "unirename")]
#[command(version = VERSION)]
#[command(about = "Batch rename objects and collections with text or regex find/replace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find and replace in the names of selected objects and collections
    Rename(rename::RenameArgs),
    /// Manage default settings
    Config(config::ConfigArgs),
    /// Check whether a newer release is available
    Update(update::UpdateArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    if !matches!(cli.command, Commands::Update(_)) {
        unirename::update_check::run_startup_check();
    }

    tty::status("unirename is working...");
    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
