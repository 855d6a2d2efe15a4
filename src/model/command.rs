//! Subprocess model provider.
//!
//! Runs a configured command per request, writes the request as JSON to the
//! command's stdin, and treats stdout as the completion. Useful for local
//! model runners and for wiring in provider CLIs without an HTTP client.

use super::{ModelClient, ModelError, ModelRequest, ModelResponse};
use crate::prompt::{inputs, substitute};
use std::collections::HashMap;
use std::io::{ErrorKind, Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Model provider backed by an external command.
///
/// The command template may reference `{model}` and `{temperature}`.
#[derive(Debug, Clone)]
pub struct CommandModelClient {
    command: String,
    model: String,
    environment: HashMap<String, String>,
    timeout: Duration,
}

impl CommandModelClient {
    pub fn new(command: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            model: model.into(),
            environment: HashMap::new(),
            timeout,
        }
    }

    /// Extra environment variables for the provider process.
    pub fn with_environment(mut self, environment: HashMap<String, String>) -> Self {
        self.environment = environment;
        self
    }

    fn argv(&self, request: &ModelRequest) -> Result<Vec<String>, ModelError> {
        let vars = inputs([
            ("model", self.model.clone()),
            ("temperature", request.temperature.to_string()),
        ]);
        let rendered = substitute(&self.command, &vars);

        let args = shell_words::split(&rendered).map_err(|e| {
            ModelError::Config(format!(
                "failed to parse provider command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                rendered, e
            ))
        })?;

        if args.is_empty() {
            return Err(ModelError::Config(format!(
                "provider command is empty after parsing: '{}'",
                rendered
            )));
        }

        Ok(args)
    }
}

impl ModelClient for CommandModelClient {
    fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        let args = self.argv(request)?;
        let payload = serde_json::to_vec(request)
            .map_err(|e| ModelError::Config(format!("failed to encode request: {}", e)))?;

        let mut command = Command::new(&args[0]);
        command
            .args(&args[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &self.environment {
            command.env(key, value);
        }

        let mut child = command.spawn().map_err(|e| {
            ModelError::Process(format!(
                "failed to execute '{}': {}\nFix: ensure the command is installed and in PATH.",
                args[0], e
            ))
        })?;

        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        // The child may exit without reading its input; a closed pipe is fine.
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || match stdin.write_all(&payload) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            })
        });

        let exit = wait_with_timeout(&mut child, self.timeout)?;
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if let Some(writer) = writer
            && let Ok(Err(e)) = writer.join()
            && exit.is_some()
        {
            return Err(ModelError::Process(format!("failed to write request: {}", e)));
        }

        match exit {
            None => Err(ModelError::Timeout(self.timeout.as_secs())),
            Some(0) => {
                let content = stdout.trim();
                Ok(if content.is_empty() {
                    ModelResponse::empty()
                } else {
                    ModelResponse::text(content)
                })
            }
            Some(code) => Err(ModelError::Process(format!(
                "'{}' exited with code {}: {}",
                args[0],
                code,
                stderr.trim()
            ))),
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    })
}

/// Wait for a child process with timeout.
///
/// Returns the exit code, `Some(-1)` for a signal exit, or `None` on timeout.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Option<i32>, ModelError> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(20);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status.code().unwrap_or(-1))),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    kill_process(child);
                    return Ok(None);
                }
                thread::sleep(poll_interval);
            }
            Err(e) => {
                return Err(ModelError::Process(format!(
                    "failed to check process status: {}",
                    e
                )));
            }
        }
    }
}

/// Kill a process and reap it.
fn kill_process(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
