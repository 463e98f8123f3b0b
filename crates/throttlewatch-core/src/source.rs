//! Signal sources: where a single throttling reading comes from.
//!
//! Every source implements the [`SignalSource`] trait. The production source
//! is [`CommandSource`], which runs `pmset -g therm` and pulls the
//! `CPU_Speed_Limit` value out of its output.

use std::time::Duration;

use crate::command::run_command;

/// Program invoked by [`CommandSource::pmset`].
pub const PMSET_PROGRAM: &str = "pmset";
/// Arguments passed to [`PMSET_PROGRAM`].
pub const PMSET_ARGS: &[&str] = &["-g", "therm"];
/// Field whose value is the throttling indicator (lower = more throttled).
pub const SPEED_LIMIT_FIELD: &str = "CPU_Speed_Limit";

/// Something that can produce zero or one reading per call.
pub trait SignalSource: Send + Sync {
    /// Take a fresh reading. `None` means "no data this time" for any reason.
    fn read(&self) -> Option<i32>;
}

impl<F> SignalSource for F
where
    F: Fn() -> Option<i32> + Send + Sync,
{
    fn read(&self) -> Option<i32> {
        self()
    }
}

/// Reads an integer field from the output of an external command.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
    field: String,
    timeout: Option<Duration>,
}

impl CommandSource {
    /// Build a source for an arbitrary command and field name.
    pub fn new<I, S>(program: impl Into<String>, args: I, field: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            field: field.into(),
            timeout: None,
        }
    }

    /// `pmset -g therm`, reading `CPU_Speed_Limit`.
    pub fn pmset() -> Self {
        Self::new(
            PMSET_PROGRAM,
            PMSET_ARGS.iter().copied(),
            SPEED_LIMIT_FIELD,
        )
    }

    /// Kill the command and skip the reading if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl SignalSource for CommandSource {
    fn read(&self) -> Option<i32> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let output = run_command(&self.program, &args, self.timeout)?;
        let value = parse_field(&output, &self.field);
        if value.is_none() {
            log::debug!(
                "{} output has no usable {} line",
                self.program,
                self.field
            );
        }
        value
    }
}

/// Extract the `CPU_Speed_Limit` value from `pmset -g therm` output.
pub fn parse_speed_limit(output: &str) -> Option<i32> {
    parse_field(output, SPEED_LIMIT_FIELD)
}

/// Find the first line starting with `field` and parse the integer after `=`.
///
/// Only the first matching line is considered; if its value does not parse,
/// later matching lines are not tried.
pub fn parse_field(output: &str, field: &str) -> Option<i32> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(field))?;
    line.split('=').nth(1)?.trim().parse().ok()
}
