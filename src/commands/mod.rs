pub type CmdResult<T> = unirename::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod config;
pub mod rename;
pub mod update;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (unirename::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Rename(args) => dispatch!(args, global, rename),
        crate::Commands::Config(args) => dispatch!(args, global, config),
        crate::Commands::Update(args) => dispatch!(args, global, update),
    }
}
