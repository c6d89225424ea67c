//! Top-level fault boundary

use crate::cli::output::OutputFormatter;
use crate::error::TtError;
use std::any::Any;
use std::future::Future;
use std::io::Write;
use std::process::ExitCode;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error};

/// How a guarded run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The run returned normally
    Success,
    /// The run returned an error, which was reported
    Failed,
    /// The run panicked and the user acknowledged it
    Faulted,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failed | Outcome::Faulted => ExitCode::FAILURE,
        }
    }
}

/// Run `task` on its own tokio task and report how it ended.
///
/// Errors are printed once through `output`. A panic is logged, the user is
/// asked to press Enter and one line of `input` is consumed before returning.
pub async fn guard<F, R, O, E>(
    task: F,
    input: &mut R,
    output: &mut OutputFormatter<O, E>,
) -> Outcome
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
    R: AsyncBufRead + Unpin,
    O: Write,
    E: Write,
{
    // A panic inside the task surfaces here as a JoinError
    match tokio::spawn(task).await {
        Ok(Ok(())) => Outcome::Success,
        Ok(Err(e)) => {
            let kind = e.downcast_ref::<TtError>().map_or("startup", TtError::kind);
            debug!(kind, "ttget failed: {:#}", e);
            output.error(&format!("{:#}", e));
            Outcome::Failed
        }
        Err(join_error) => {
            let reason = if join_error.is_panic() {
                panic_message(join_error.into_panic())
            } else {
                join_error.to_string()
            };
            error!("Unexpected fault: {}", reason);
            output.print_exit_prompt();

            let mut line = String::new();
            if let Err(e) = input.read_line(&mut line).await {
                debug!("Could not read acknowledgment: {}", e);
            }
            Outcome::Faulted
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
