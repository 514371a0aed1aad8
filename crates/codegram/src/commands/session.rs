//! `session` command implementation.
//!
//! An interactive line session: plain lines build up the code buffer and
//! `:`-prefixed commands drive the selectors, the trigger and the display
//! region. Stdin is read on its own thread and `:generate` / `:render` run as
//! local tasks, so input keeps being handled while a request is in flight.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use clap::Args;
use codegram_client::GenerationService;
use codegram_core::{DiagramKind, SourceLanguage};
use codegram_render::RenderBackend;
use codegram_session::{Notice, SessionController};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, LocalSet};

use super::common::{CommonArgs, build_session, parse_kind, parse_language};
use super::display::{DocumentFormat, document};
use crate::error::CliError;
use crate::output::Output;

/// Lines read ahead of the session loop.
const LINE_BUFFER: usize = 64;

const HELP: &str = "\
Type code lines to append them to the buffer. Commands:
  :lang <python|java|c>     set the source language
  :kind <kind>              set the diagram kind
  :code <path>              replace the buffer with a file's contents
  :clear                    empty the buffer
  :generate                 generate and render the diagram
  :render                   render the active kind from the last response
  :wait                     wait for pending generate/render actions
  :show                     print the display region
  :save <path>              write the display region (.svg or .html)
  :status                   show session state
  :quit                     exit";

/// Arguments for the session command.
#[derive(Args)]
pub(crate) struct SessionArgs {
    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

/// One line of session input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Language(SourceLanguage),
    Kind(DiagramKind),
    Load(PathBuf),
    Clear,
    Generate,
    Render,
    Wait,
    Show,
    Save(PathBuf),
    Status,
    Help,
    Quit,
    Append(String),
}

/// Session actions that run as background tasks.
#[derive(Debug, Clone, Copy)]
enum Action {
    Generate,
    Render,
}

impl SessionArgs {
    /// Execute the session command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or stdin cannot be read.
    /// Errors from individual commands are reported and the session goes on.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let config = self.common.load_config()?;
        let session = Rc::new(build_session(&config));
        let output = Rc::new(Output::new());

        output.highlight("codegram session (:help for commands)");

        LocalSet::new()
            .run_until(run_session(session, spawn_line_reader(), output))
            .await
    }
}

/// Read stdin lines on a dedicated thread.
///
/// The thread is never joined. It stops when stdin closes or the session
/// stops receiving, and otherwise ends with the process.
fn spawn_line_reader() -> mpsc::Receiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Handle input lines until `:quit` or end of input.
///
/// Must run inside a [`LocalSet`]. Actions still in flight at end of input
/// are awaited; `:quit` abandons them.
async fn run_session<S, B>(
    session: Rc<SessionController<S, B>>,
    mut lines: mpsc::Receiver<std::io::Result<String>>,
    output: Rc<Output>,
) -> Result<(), CliError>
where
    S: GenerationService + 'static,
    B: RenderBackend + 'static,
{
    let mut in_flight: Vec<JoinHandle<()>> = Vec::new();

    while let Some(line) = lines.recv().await {
        let line = line?;
        in_flight.retain(|task| !task.is_finished());

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(message) => {
                output.error(&message);
                continue;
            }
        };

        match command {
            Command::Quit => return Ok(()),
            Command::Generate => {
                in_flight.push(spawn_action(&session, &output, Action::Generate).await);
            }
            Command::Render => {
                in_flight.push(spawn_action(&session, &output, Action::Render).await);
            }
            Command::Wait => wait_for(&mut in_flight).await,
            command => {
                if let Err(err) = run_command(&session, command, &output) {
                    output.error(&format!("Error: {err}"));
                }
            }
        }
    }

    wait_for(&mut in_flight).await;
    Ok(())
}

/// Start `action` as a local task.
///
/// Returns once the action has captured the submission and taken its token,
/// so lines handled afterwards cannot change what it sends.
async fn spawn_action<S, B>(
    session: &Rc<SessionController<S, B>>,
    output: &Rc<Output>,
    action: Action,
) -> JoinHandle<()>
where
    S: GenerationService + 'static,
    B: RenderBackend + 'static,
{
    let session = Rc::clone(session);
    let output = Rc::clone(output);
    let (started_tx, started_rx) = oneshot::channel();

    let task = tokio::task::spawn_local(async move {
        let result = match action {
            Action::Generate => {
                let pending = session.generate();
                let _ = started_tx.send(());
                pending.await
            }
            Action::Render => {
                let pending = session.rerender();
                let _ = started_tx.send(());
                pending.await
            }
        };

        match result {
            Ok(outcome) => output.outcome(&outcome),
            Err(err) => output.notice(&Notice::from_error(&err)),
        }
    });

    let _ = started_rx.await;
    task
}

async fn wait_for(in_flight: &mut Vec<JoinHandle<()>>) {
    for task in in_flight.drain(..) {
        if let Err(err) = task.await {
            tracing::warn!(%err, "Session action did not finish");
        }
    }
}

/// Run a command that completes without waiting on a round trip.
fn run_command<S, B>(
    session: &SessionController<S, B>,
    command: Command,
    output: &Output,
) -> Result<(), CliError>
where
    S: GenerationService,
    B: RenderBackend,
{
    match command {
        Command::Language(language) => session.update_source_language(language),
        Command::Kind(kind) => session.update_diagram_kind(kind),
        Command::Load(path) => {
            let code = std::fs::read_to_string(&path).map_err(|e| {
                CliError::Validation(format!("Cannot read {}: {e}", path.display()))
            })?;
            session.update_code(code);
        }
        Command::Clear => session.update_code(String::new()),
        Command::Append(line) => {
            let mut code = session.submission().code;
            code.push_str(&line);
            code.push('\n');
            session.update_code(code);
        }
        Command::Show => {
            let target = session.renderer().target().content().to_owned();
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(target.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
        Command::Save(path) => {
            let format = DocumentFormat::from_path(&path);
            let doc = document(&session.renderer().target(), format).ok_or_else(|| {
                CliError::Validation("Nothing to save in this format".to_owned())
            })?;
            std::fs::write(&path, doc)?;
            output.success(&format!("Wrote {}", path.display()));
        }
        Command::Status => print_status(session, output),
        Command::Help => output.info(HELP),
        // Handled by the session loop
        Command::Generate | Command::Render | Command::Wait | Command::Quit => {}
    }
    Ok(())
}

fn print_status<S, B>(session: &SessionController<S, B>, output: &Output) {
    let submission = session.submission();
    output.field("language", submission.language);
    output.field("kind", session.diagram_kind());
    let lines = submission.code.lines().count();
    output.field("code", format!("{lines} line(s)"));
    output.field("render", session.renderer().state().as_str());
    if let Some(response) = session.last_response() {
        let kinds: Vec<_> = response
            .available_kinds()
            .map(DiagramKind::as_str)
            .collect();
        output.field("last response", kinds.join(", "));
    }
    if let Some(notice) = session.notice() {
        output.notice(&notice);
    }
}

/// Parse one input line.
fn parse_line(line: &str) -> Result<Command, String> {
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Append(line.to_owned()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest.trim(), ""),
    };

    let command = match name {
        "lang" | "language" => Command::Language(parse_language(required(name, arg)?)?),
        "kind" => Command::Kind(parse_kind(required(name, arg)?)?),
        "code" => Command::Load(PathBuf::from(required(name, arg)?)),
        "save" => Command::Save(PathBuf::from(required(name, arg)?)),
        "clear" => Command::Clear,
        "generate" | "g" => Command::Generate,
        "render" => Command::Render,
        "wait" => Command::Wait,
        "show" => Command::Show,
        "status" => Command::Status,
        "help" | "h" => Command::Help,
        "quit" | "q" => Command::Quit,
        other => return Err(format!("Unknown command `:{other}` (:help for commands)")),
    };
    Ok(command)
}

fn required<'a>(name: &str, arg: &'a str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("`:{name}` needs an argument"))
    } else {
        Ok(arg)
    }
}
