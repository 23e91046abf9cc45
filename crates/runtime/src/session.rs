use std::future::Future;
use std::io::Write;
use std::time::Duration;
use sysmon_config::MonitorConfig;
use sysmon_core::{ExportSink, MetricSelector, Result, Snapshot};
use sysmon_export::CsvExporter;
use sysmon_renderer::render_frame;
use sysmon_system::{compute_window, HistoryBuffer, HostSource, StatsSampler, SysinfoSource, Window};
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

/// Effective (floored) settings of one monitoring session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub interval_ms:        u64,
    pub render_interval_ms: u64,
    pub history_seconds:    u64,
    pub graph:              MetricSelector,
    pub render:             bool,
}

impl SessionSettings {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            interval_ms:        config.interval_ms(),
            render_interval_ms: config.render_interval_ms(),
            history_seconds:    config.history_seconds(),
            graph:              config.display.graph,
            render:             config.display.render,
        }
    }
}

/// One monitoring session: sampler, history and export sink under a single
/// owner.
///
/// The sink is closed exactly once, by [`close`](Self::close) or, failing
/// that, when the session is dropped.
pub struct Session<S: HostSource = SysinfoSource> {
    sampler:  StatsSampler<S>,
    history:  HistoryBuffer,
    sink:     Option<Box<dyn ExportSink>>,
    latest:   Option<Snapshot>,
    settings: SessionSettings,
}

impl Session<SysinfoSource> {
    /// Open the live host source and, if configured, the CSV export.
    ///
    /// Fails if host metrics are unavailable or the export file cannot be
    /// created.
    pub fn open(config: &MonitorConfig) -> Result<Self> {
        let settings = SessionSettings::from_config(config);
        let sampler = StatsSampler::open(&config.sampling.disk_path)?;
        let sink = match &config.export.csv {
            Some(path) => Some(Box::new(CsvExporter::create(path)?) as Box<dyn ExportSink>),
            None       => None,
        };
        Ok(Self::new(sampler, settings, sink))
    }
}

impl<S: HostSource> Session<S> {
    /// Assemble a session from its parts.  Tick intervals below 1 ms are
    /// raised to 1 ms.
    pub fn new(
        sampler: StatsSampler<S>,
        mut settings: SessionSettings,
        sink: Option<Box<dyn ExportSink>>,
    ) -> Self {
        settings.interval_ms = settings.interval_ms.max(1);
        settings.render_interval_ms = settings.render_interval_ms.max(1);

        let history = HistoryBuffer::for_window(settings.history_seconds, settings.interval_ms);
        info!(
            interval_ms = settings.interval_ms,
            history_seconds = settings.history_seconds,
            capacity = history.capacity(),
            export = sink.is_some(),
            "session started"
        );

        Self {
            sampler,
            history,
            sink,
            latest: None,
            settings,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    /// Sampling tick: sample the host, record the point in the history and
    /// forward the snapshot to the export sink.
    ///
    /// An export failure is returned, but only after the history has been
    /// updated; sampling never depends on the export.
    pub fn sample_tick(&mut self) -> Result<&Snapshot> {
        let snapshot = self.sampler.sample();
        self.history.append(snapshot.elapsed_seconds, snapshot.cpu_percent, snapshot.ram_percent);

        let exported = match self.sink.as_mut() {
            Some(sink) => sink.write(&snapshot),
            None       => Ok(()),
        };

        let snapshot = self.latest.insert(snapshot);
        exported.map(|()| &*snapshot)
    }

    /// The trailing window the graph should show, `None` before the first
    /// sample.
    pub fn window(&self) -> Option<Window> {
        compute_window(
            &self.history,
            self.settings.history_seconds as f64,
            self.settings.interval_ms,
            self.settings.graph,
        )
    }

    /// Render tick: one dashboard frame, `None` before the first sample.
    pub fn render_tick(&self) -> Option<String> {
        let snapshot = self.latest.as_ref()?;
        Some(render_frame(snapshot, self.window().as_ref(), self.settings.graph))
    }

    /// Close the export sink.  Safe to call more than once.
    pub fn close(&mut self) -> Result<()> {
        match self.sink.take() {
            Some(mut sink) => sink.close(),
            None           => Ok(()),
        }
    }

    /// Drive the sampling and render ticks until `shutdown` resolves, then
    /// close the export sink.
    ///
    /// Both ticks run on the calling task; each tick finishes before the next
    /// one of either kind starts, so no tick overlaps itself.
    pub async fn run<W, F>(&mut self, out: &mut W, shutdown: F) -> Result<()>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        let mut sample_ticker = time::interval(Duration::from_millis(self.settings.interval_ms));
        sample_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut render_ticker =
            time::interval(Duration::from_millis(self.settings.render_interval_ms));
        render_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                _ = sample_ticker.tick() => {
                    if let Err(e) = self.sample_tick() {
                        error!("Export failed: {e}");
                    }
                }
                _ = render_ticker.tick(), if self.settings.render => {
                    if let Some(frame) = self.render_tick() {
                        if let Err(e) = writeln!(out, "{frame}").and_then(|()| out.flush()) {
                            warn!("Cannot write dashboard frame: {e}");
                        }
                    }
                }
            }
        }

        self.close()
    }
}

impl<S: HostSource> Drop for Session<S> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!("Failed to close export sink: {e}");
        }
    }
}
