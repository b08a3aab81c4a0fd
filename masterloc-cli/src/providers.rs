//! Machine-translation providers backed by external commands.

use std::io::Write;
use std::process::{Command, Stdio};

use masterloc::translate::{ProviderError, TranslationProvider};

/// Adapter that shells out to a translator program.
///
/// The program is invoked with the target language as its final argument,
/// receives the source text on stdin and must print the translation to
/// stdout. Exit code 0 with empty input is the health-check convention.
pub struct ExecProvider {
    name: String,
    program: String,
    args: Vec<String>,
}

impl ExecProvider {
    /// Split a command line of the form `program [arg ...]` into an adapter.
    pub fn from_command_line(name: impl Into<String>, command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            name: name.into(),
            program,
            args: parts.collect(),
        })
    }

    fn spawn(&self, extra_arg: Option<&str>) -> Result<std::process::Child, ProviderError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(arg) = extra_arg {
            command.arg(arg);
        }
        command.spawn().map_err(|e| {
            ProviderError::Terminal(format!("could not start '{}': {e}", self.program))
        })
    }

    fn run(&self, input: &str, extra_arg: Option<&str>) -> Result<String, ProviderError> {
        let mut child = self.spawn(extra_arg)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .map_err(|e| ProviderError::Transient(format!("write to translator: {e}")))?;
        }
        let output = child
            .wait_with_output()
            .map_err(|e| ProviderError::Transient(format!("wait for translator: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Transient(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        String::from_utf8(output.stdout)
            .map(|text| text.trim_end_matches('\n').to_string())
            .map_err(|e| ProviderError::Terminal(format!("translator output not UTF-8: {e}")))
    }
}

impl TranslationProvider for ExecProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn translate(&self, text: &str, target_lang: &str) -> Result<String, ProviderError> {
        let translated = self.run(text, Some(target_lang))?;
        if translated.is_empty() {
            return Err(ProviderError::Transient(format!(
                "'{}' returned no translation",
                self.program
            )));
        }
        Ok(translated)
    }

    fn validate(&self) -> Result<(), ProviderError> {
        self.run("", None).map(|_| ())
    }
}
