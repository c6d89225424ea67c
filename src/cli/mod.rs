//! Command line interface for ttget

pub mod args;
pub mod guard;
pub mod output;
pub mod session;

pub use args::{Args, Mode};
pub use guard::{guard, Outcome};
pub use output::OutputFormatter;
pub use session::{split_links, Exit, Session};
