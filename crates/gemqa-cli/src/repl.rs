//! Interactive question/answer session
//!
//! One turn at a time: read a line, normalize it, ask, print. Only an
//! interrupt while waiting for input, end of input, or a quit sentinel ends
//! the session. Turn failures are reported and the loop keeps going.
//!
//! Lines are read on a plain OS thread and handed over a channel. A read
//! parked on tokio's blocking pool would keep the runtime alive after the
//! session ends.

use gemqa_agent::Answerer;
use gemqa_core::{build_prompt, normalize, Input};
use std::future::Future;
use std::io::{BufRead, Write};
use tokio::sync::mpsc;
use tracing::{debug, error};

const RULE_WIDTH: usize = 60;
const GOODBYE: &str = "\nExiting Q&A system. Goodbye!";

/// Consecutive input read failures tolerated before giving up
const MAX_READ_FAILURES: u32 = 3;

/// Lines read from the console, in order; closed at end of input
pub type LineReceiver = mpsc::Receiver<std::io::Result<String>>;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    Interrupted,
    EndOfInput,
    ReadFailures,
}

/// Read `reader` line by line on a detached thread
///
/// The thread stops at end of input or once the receiver is dropped. It is
/// never joined, so a read still blocked at exit does not hold the process.
pub fn spawn_line_reader<R>(reader: R) -> LineReceiver
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);

    let spawned = std::thread::Builder::new()
        .name("gemqa-stdin".to_string())
        .spawn(move || {
            for line in reader.lines() {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

    // The sender is dropped with the closure, so the session sees end of input.
    if let Err(e) = spawned {
        error!("Failed to spawn input reader: {}", e);
    }

    rx
}

/// Print the startup banner
pub fn print_banner<W: Write>(out: &mut W, model: &str) -> std::io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, " LLM Q&A CLI Application ({})", model)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Enter 'quit' or 'exit' to stop the application.")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    out.flush()
}

/// Run the read loop until quit, interrupt, or end of input
///
/// `interrupt` resolves when the user asks to stop. It is only raced against
/// the input read; a request in flight always runs to completion, and an
/// interrupt that arrived meanwhile ends the session before the next prompt.
pub async fn run_session<W, A, F>(
    mut lines: LineReceiver,
    out: &mut W,
    answerer: &A,
    interrupt: F,
) -> SessionEnd
where
    W: Write,
    A: Answerer + ?Sized,
    F: Future<Output = ()>,
{
    let mut read_failures = 0;
    tokio::pin!(interrupt);

    let end = loop {
        // Polling here also installs the signal handler before the prompt shows.
        let pending_interrupt = tokio::select! {
            biased;
            _ = &mut interrupt => true,
            _ = std::future::ready(()) => false,
        };
        if pending_interrupt {
            break SessionEnd::Interrupted;
        }

        if let Err(e) = write!(out, "\nAsk a question: ").and_then(|_| out.flush()) {
            error!("Failed to write prompt: {}", e);
        }

        let read = tokio::select! {
            _ = &mut interrupt => None,
            line = lines.recv() => Some(line),
        };
        let Some(read) = read else {
            break SessionEnd::Interrupted;
        };

        let line = match read {
            Some(Ok(line)) => {
                read_failures = 0;
                line
            }
            None => break SessionEnd::EndOfInput,
            Some(Err(e)) => {
                read_failures += 1;
                error!("Failed to read input: {}", e);
                let _ = writeln!(out, "An unexpected error occurred in the main loop: {}", e);
                if read_failures >= MAX_READ_FAILURES {
                    break SessionEnd::ReadFailures;
                }
                continue;
            }
        };

        match Input::parse(&line) {
            Input::Quit => break SessionEnd::Quit,
            Input::Blank => continue,
            Input::Question(question) => {
                if let Err(e) = run_turn(&question, out, answerer).await {
                    error!("Turn failed: {}", e);
                    let _ = writeln!(out, "An unexpected error occurred in the main loop: {}", e);
                }
            }
        }
    };

    debug!("Session ended: {:?}", end);
    let _ = writeln!(out, "{}", GOODBYE);
    let _ = out.flush();
    end
}

/// Normalize, ask, and print a single question
pub async fn run_turn<W, A>(question: &str, out: &mut W, answerer: &A) -> std::io::Result<()>
where
    W: Write,
    A: Answerer + ?Sized,
{
    let processed = normalize(question);
    writeln!(out, "\n[Processed Query]: {}", processed)?;

    let prompt = build_prompt(&processed);
    writeln!(out, "\n... Thinking ...")?;
    out.flush()?;

    let answer = answerer.answer(&prompt).await;

    writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, " FINAL ANSWER")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{}", answer)?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    out.flush()
}
