/// Macro for prefixed status logging to stderr (only when stderr is a terminal).
///
/// Usage:
/// ```ignore
/// log_status!("rename", "'{}' --> '{}'", original, proposed);
/// log_status!("update", "unirename {} is available", latest);
/// ```
#[macro_export]
macro_rules! log_status {
    ($prefix:expr, $($arg:tt)*) => {
        if ::std::io::IsTerminal::is_terminal(&::std::io::stderr()) {
            eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*));
        }
    };
}

pub mod core;

// Re-export everything from core for ergonomic library use
// Users can write `unirename::rename` instead of `unirename::core::rename`
pub use core::*;
