//! Command line argument parsing

use clap::Parser;

/// ttget - download short videos through the tikwm API.
///
/// Every argument is a link. `-h` and `--help` print usage and are skipped
/// like any other argument, so clap's own help and version flags are off.
#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Args {
    /// Video links; none starts interactive mode
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub links: Vec<String>,
}

/// How the session is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Process the command line arguments
    Batch,
    /// Read links from standard input
    Interactive,
}

impl Args {
    /// Pick the driving mode from the presence of arguments
    pub fn mode(&self) -> Mode {
        if self.links.is_empty() {
            Mode::Interactive
        } else {
            Mode::Batch
        }
    }
}

/// Check whether an argument asks for usage text
pub fn is_help_arg(arg: &str) -> bool {
    arg == "-h" || arg == "--help"
}
