use std::{fs, io::Write, path::PathBuf};

use crate::{
    counters::CounterMap,
    engine::FuzzingEngine,
    error::{EngineError, SessionError},
    feedback::{CompareFeedback, ComparisonOperandMap},
    hooks::{Hook, HookTracker},
    options::RuntimeOptions,
    report::DiagnosticReporter,
    tracer::ComparisonTracer,
};

/// State for one fuzzing session: the hooks fuzz targets asked for, what
/// the instrumentation did with them, and the channels instrumented code
/// reports into.
///
/// Instrumentation call sites and the reporting step get at the tracker and
/// the tracer through the session rather than through globals, so two
/// sessions never share state.
pub struct Session<F: CompareFeedback = ComparisonOperandMap> {
    /// Hooks registered by the fuzz targets, in registration order
    hooks: Vec<Hook>,
    tracker: HookTracker,
    feedback: F,
    counters: CounterMap,
    options: RuntimeOptions,
    diagnostics: DiagnosticReporter<Box<dyn Write + Send>>,
    /// Set while an async engine run is in flight
    running: bool,
}

impl<F: CompareFeedback> std::fmt::Debug for Session<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("hooks", &self.hooks)
            .field("tracker", &self.tracker)
            .field("counters", &self.counters.len())
            .field("options", &self.options)
            .field("running", &self.running)
            .finish()
    }
}

impl Session<ComparisonOperandMap> {
    pub fn builder() -> SessionBuilder<ComparisonOperandMap> {
        SessionBuilder::new()
    }
}

impl<F: CompareFeedback> Session<F> {
    pub fn new(feedback: F, options: RuntimeOptions) -> Self {
        Session {
            hooks: Vec::new(),
            tracker: HookTracker::new(),
            feedback,
            counters: CounterMap::with_capacity(options.max_counters),
            options,
            diagnostics: DiagnosticReporter::new(Box::new(std::io::stderr())),
            running: false,
        }
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    pub fn tracker(&self) -> &HookTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut HookTracker {
        &mut self.tracker
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    pub fn counters(&self) -> &CounterMap {
        &self.counters
    }

    pub fn counters_mut(&mut self) -> &mut CounterMap {
        &mut self.counters
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// A tracer for instrumented comparison sites, reporting into this
    /// session's feedback channel
    pub fn tracer(&mut self) -> ComparisonTracer<'_, F> {
        ComparisonTracer::new(&mut self.feedback)
    }

    /// Registers a hook a fuzz target wants installed
    pub fn register_hook(&mut self, hook: Hook) {
        self.hooks.push(hook);
    }

    pub fn hooks(&self) -> &[Hook] {
        &self.hooks
    }

    /// The instrumentation found a function it could hook
    pub fn record_available_hook(&mut self, hook: &Hook) {
        self.tracker.add_available(hook.package(), hook.target());
    }

    /// The instrumentation installed `hook`. In debug mode this is echoed to
    /// the diagnostics stream.
    pub fn record_applied_hook(&mut self, hook: &Hook) -> Result<(), SessionError> {
        self.tracker.add_applied(hook.package(), hook.target());
        tracing::debug!(
            hook_type = %hook.hook_type,
            package = hook.package(),
            target = hook.target(),
            "hook applied"
        );

        if self.options.debug {
            self.diagnostics.applied_hook(hook)?;
        }

        Ok(())
    }

    /// Files every registered hook that was neither applied nor available
    /// under not-applied. Hooks filed there by an earlier call and reported
    /// since then are taken back out.
    pub fn finish_instrumentation(&mut self) -> &HookTracker {
        self.tracker
            .prune_not_applied()
            .categorize_unknown(self.hooks.iter().map(Hook::identity));

        tracing::debug!(
            applied = self.tracker.applied_registry().len(),
            available = self.tracker.available_registry().len(),
            not_applied = self.tracker.not_applied_registry().len(),
            "categorized hooks"
        );

        &self.tracker
    }

    /// Hands control to the engine.
    ///
    /// With `sync` set this returns once the engine is done, after writing
    /// the hook report. Otherwise the engine is left running and the report
    /// is written by [`Session::stop`].
    pub fn run<E: FuzzingEngine>(&mut self, engine: &mut E) -> Result<(), SessionError> {
        if self.running {
            return Err(EngineError::AlreadyRunning.into());
        }

        if self.options.debug {
            engine.print_version();
        }

        let args = &self.options.engine_args;
        if self.options.sync {
            tracing::info!(?args, "starting fuzzing engine");
            engine.start_fuzzing(args)?;
            self.report()
        } else {
            tracing::info!(?args, "starting fuzzing engine in the background");
            engine.start_fuzzing_async(args)?;
            self.running = true;

            Ok(())
        }
    }

    /// Stops an engine started by [`Session::run`] without `sync` and
    /// writes the hook report.
    pub fn stop<E: FuzzingEngine>(
        &mut self,
        engine: &mut E,
        status: Option<i32>,
    ) -> Result<(), SessionError> {
        if !self.running {
            return Err(EngineError::NotRunning.into());
        }

        tracing::info!(?status, "stopping fuzzing engine");
        engine.stop_fuzzing_async(status)?;
        self.running = false;

        self.report()
    }

    /// Categorizes the registered hooks, prints the summary in debug mode
    /// and writes the JSON report if one was asked for.
    ///
    /// Calling this again later reflects hooks applied in between. Call
    /// [`Session::reset`] to start the next run from empty tables.
    pub fn report(&mut self) -> Result<(), SessionError> {
        self.finish_instrumentation();

        if self.options.debug {
            self.diagnostics.summary(&self.tracker)?;
        }

        if let Some(path) = &self.options.hook_report {
            fs::write(path, self.tracker.to_json()?)?;
            tracing::info!(path = %path.display(), "wrote hook report");
        }

        Ok(())
    }

    /// Forgets what the instrumentation reported and zeroes the counters.
    /// Registered hooks and the feedback channel are left alone.
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.counters.reset();
    }
}

/// Fluent setup for a [`Session`]
pub struct SessionBuilder<F: CompareFeedback = ComparisonOperandMap> {
    feedback: F,
    options: RuntimeOptions,
    diagnostics: Option<Box<dyn Write + Send>>,
    hooks: Vec<Hook>,
    init_logging: bool,
}

impl Default for SessionBuilder<ComparisonOperandMap> {
    fn default() -> Self {
        SessionBuilder {
            feedback: ComparisonOperandMap::new(),
            options: RuntimeOptions::from_env(),
            diagnostics: None,
            hooks: Vec::new(),
            init_logging: false,
        }
    }
}

impl SessionBuilder<ComparisonOperandMap> {
    /// Starts from the default options, with the debug flag read from the
    /// environment
    pub fn new() -> Self {
        Default::default()
    }
}

impl<F: CompareFeedback> SessionBuilder<F> {
    /// Sets the channel traced comparisons are reported into
    pub fn feedback<G: CompareFeedback>(self, feedback: G) -> SessionBuilder<G> {
        SessionBuilder {
            feedback,
            options: self.options,
            diagnostics: self.diagnostics,
            hooks: self.hooks,
            init_logging: self.init_logging,
        }
    }

    /// Replaces all options at once
    pub fn options(mut self, options: RuntimeOptions) -> Self {
        self.options = options;

        self
    }

    /// Enables the `DEBUG:` diagnostics
    pub fn debug(mut self) -> Self {
        self.options.debug = true;

        self
    }

    /// Runs the engine on the calling thread
    pub fn sync(mut self) -> Self {
        self.options.sync = true;

        self
    }

    /// Path the JSON hook summary is written to
    pub fn hook_report(mut self, path: PathBuf) -> Self {
        self.options.hook_report = Some(path);

        self
    }

    /// Caps the number of coverage counters
    pub fn max_counters(mut self, max: usize) -> Self {
        self.options.max_counters = max;

        self
    }

    /// Arguments forwarded to the engine untouched
    pub fn engine_args(mut self, args: Vec<String>) -> Self {
        self.options.engine_args = args;

        self
    }

    /// Sends diagnostics somewhere other than stderr
    pub fn diagnostics(mut self, out: Box<dyn Write + Send>) -> Self {
        self.diagnostics = Some(out);

        self
    }

    /// Registers a hook up front
    pub fn hook(mut self, hook: Hook) -> Self {
        self.hooks.push(hook);

        self
    }

    /// Installs the stderr `tracing` subscriber when the session is built
    pub fn with_logging(mut self) -> Self {
        self.init_logging = true;

        self
    }

    pub fn build(self) -> Session<F> {
        if self.init_logging {
            crate::logging::init(self.options.debug);
        }

        let mut session = Session::new(self.feedback, self.options);
        if let Some(out) = self.diagnostics {
            session.diagnostics = DiagnosticReporter::new(out);
        }
        session.hooks = self.hooks;

        session
    }
}
