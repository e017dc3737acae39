//! CLI command handlers.
//!
//! One subcommand per former `make` target, plus `doctor` and `config`.

pub mod common;
pub mod config;
pub mod doctor;
pub mod draw;
pub mod parse;
pub mod pdf;
pub mod split;
pub mod watch;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode, GlobalOptions};
pub use config::ConfigArgs;
pub use doctor::DoctorArgs;
pub use draw::DrawArgs;
pub use parse::ParseArgs;
pub use pdf::PdfArgs;
pub use split::SplitArgs;
pub use watch::WatchArgs;
