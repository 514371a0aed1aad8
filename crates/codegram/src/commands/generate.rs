//! `generate` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use codegram_session::GenerateOutcome;

use super::common::{AppSession, CommonArgs, build_session};
use super::display::{DocumentFormat, document};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Source file to diagram, or `-` for stdin.
    #[arg(value_name = "INPUT", default_value = "-")]
    input: PathBuf,

    /// Write the document to this file (.svg or .html) instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the input cannot be read,
    /// generation fails, or the diagram does not render.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config()?;
        let session = build_session(&config);
        session.update_code(read_input(&self.input)?);

        let outcome = run_generate(&session, &output).await?;

        let format = self
            .output
            .as_deref()
            .map_or(DocumentFormat::Svg, DocumentFormat::from_path);
        if let Some(doc) = document(&session.renderer().target(), format) {
            match &self.output {
                Some(path) => {
                    std::fs::write(path, doc)?;
                    output.success(&format!("Wrote {}", path.display()));
                }
                None => std::io::stdout().lock().write_all(doc.as_bytes())?,
            }
        }

        match outcome {
            GenerateOutcome::Rendered => Ok(()),
            GenerateOutcome::RenderFailed(err) => Err(CliError::Render(err.to_string())),
            GenerateOutcome::Superseded => Err(CliError::Render(
                "generation was superseded by a newer request".to_owned(),
            )),
        }
    }
}

/// Trigger generation, reporting any notice the session records.
async fn run_generate(session: &AppSession, output: &Output) -> Result<GenerateOutcome, CliError> {
    match session.generate().await {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            if let Some(notice) = session.notice() {
                output.notice(&notice);
            }
            Err(err.into())
        }
    }
}

/// Read source code from a file, or stdin when `path` is `-`.
fn read_input(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        let mut code = String::new();
        std::io::stdin().lock().read_to_string(&mut code)?;
        Ok(code)
    } else {
        std::fs::read_to_string(path).map_err(|e| {
            CliError::Validation(format!("Cannot read {}: {e}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.py");
        std::fs::write(&path, "print('hi')\n").unwrap();

        assert_eq!(read_input(&path).unwrap(), "print('hi')\n");
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input(Path::new("/nonexistent/main.py")).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Cannot read /nonexistent/main.py"));
    }
}
