use clap::Args;

use unirename::update_check::{self, UpdateStatus};

use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct UpdateArgs {
    /// Ignore the check frequency and query the releases API now
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: UpdateArgs, _global: &GlobalArgs) -> CmdResult<UpdateStatus> {
    let status = update_check::check(args.force)?;
    Ok((status, 0))
}
