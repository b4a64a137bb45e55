use std::{ffi::OsString, path::PathBuf};

use clap::Parser;

use crate::counters::DEFAULT_MAX_COUNTERS;

/// Environment variable that turns on the `DEBUG:` diagnostics
pub const DEBUG_ENV_VAR: &str = "FAZI_DEBUG";

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Print hook diagnostics to stderr. Also enabled by setting FAZI_DEBUG.
    #[clap(long)]
    pub debug: bool,

    /// Run the engine on the calling thread instead of starting it in the
    /// background.
    #[clap(long)]
    pub sync: bool,

    /// Write the hook summary as JSON to this path once fuzzing ends
    #[clap(long)]
    pub hook_report: Option<PathBuf>,

    /// The maximum number of coverage counters instrumented code may allocate
    #[clap(long, default_value_t = DEFAULT_MAX_COUNTERS)]
    pub max_counters: usize,

    /// Arguments after `--` are passed to the engine as-is
    #[clap(last = true)]
    pub engine_args: Vec<String>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            debug: false,
            sync: false,
            hook_report: None,
            max_counters: DEFAULT_MAX_COUNTERS,
            engine_args: Vec::new(),
        }
    }
}

impl RuntimeOptions {
    /// Defaults, with `debug` taken from the environment
    pub fn from_env() -> Self {
        Self {
            debug: debug_from_env(),
            ..Default::default()
        }
    }

    /// Parses command-line style arguments (the first one is the program
    /// name). The environment can turn `debug` on but never off.
    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut options = Self::try_parse_from(args)?;
        options.debug |= debug_from_env();

        Ok(options)
    }
}

fn debug_from_env() -> bool {
    std::env::var_os(DEBUG_ENV_VAR)
        .map(|value| flag_enabled(&value.to_string_lossy()))
        .unwrap_or(false)
}

/// Interprets an environment flag value. Unset, empty and the usual
/// spellings of "no" are off; anything else is on.
pub(crate) fn flag_enabled(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
