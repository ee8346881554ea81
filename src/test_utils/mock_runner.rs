//! Scripted [`ProcessRunner`] for tests.
//!
//! Responses are matched by the program's file name (so `/usr/bin/claude` and
//! `claude` are the same program) and an argument prefix. The most recently
//! registered matching response wins. Unmatched calls succeed with empty output.
//!
//! ```rust,ignore
//! use bwc_cli::process::ProcessOutput;
//! use bwc_cli::test_utils::MockRunner;
//!
//! let runner = MockRunner::new();
//! runner.respond("docker", &["mcp", "server", "list"], ProcessOutput::ok("fetch, postgres"));
//! runner.missing_program("npm");
//! ```

use anyhow::Result;
use std::path::Path;
use std::sync::Mutex;

use crate::process::{BoxFuture, ProcessOutput, ProcessRunner};

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Program as passed to the runner
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
}

impl RecordedCall {
    /// Whether this call ran `program` (by file name) with args starting with `prefix`.
    #[must_use]
    pub fn matches(&self, program: &str, prefix: &[&str]) -> bool {
        program_name(&self.program) == program_name(program)
            && self.args.len() >= prefix.len()
            && self.args.iter().zip(prefix).all(|(a, p)| a.as_str() == *p)
    }
}

struct Scripted {
    program: String,
    prefix: Vec<String>,
    output: ProcessOutput,
}

#[derive(Default)]
struct State {
    calls: Vec<RecordedCall>,
    scripted: Vec<Scripted>,
    missing: Vec<String>,
}

/// In-memory process runner.
#[derive(Default)]
pub struct MockRunner {
    state: Mutex<State>,
}

fn program_name(program: &str) -> String {
    Path::new(program)
        .file_name()
        .map_or_else(|| program.to_string(), |n| n.to_string_lossy().into_owned())
}

impl MockRunner {
    /// Runner where every program succeeds with empty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `output` for calls to `program` whose args start with `prefix`.
    pub fn respond(&self, program: &str, prefix: &[&str], output: ProcessOutput) {
        self.lock().scripted.push(Scripted {
            program: program_name(program),
            prefix: prefix.iter().map(|s| (*s).to_string()).collect(),
            output,
        });
    }

    /// Makes every call to `program` fail to spawn.
    pub fn missing_program(&self, program: &str) {
        self.lock().missing.push(program_name(program));
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Calls matching `program` and an argument prefix.
    #[must_use]
    pub fn calls_matching(&self, program: &str, prefix: &[&str]) -> Vec<RecordedCall> {
        self.lock().calls.iter().filter(|c| c.matches(program, prefix)).cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn handle(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
        let mut state = self.lock();
        state.calls.push(RecordedCall {
            program: program.to_string(),
            args: args.to_vec(),
        });

        let name = program_name(program);
        if state.missing.contains(&name) {
            return Err(anyhow::anyhow!("Failed to execute {program}: No such file or directory"));
        }

        let output = state
            .scripted
            .iter()
            .rev()
            .find(|s| {
                s.program == name
                    && args.len() >= s.prefix.len()
                    && args.iter().zip(&s.prefix).all(|(a, p)| a == p)
            })
            .map_or_else(|| ProcessOutput::ok(""), |s| s.output.clone());
        Ok(output)
    }
}

impl ProcessRunner for MockRunner {
    fn run<'a>(&'a self, program: &'a str, args: &'a [String]) -> BoxFuture<'a, Result<ProcessOutput>> {
        let result = self.handle(program, args);
        Box::pin(async move { result })
    }
}
