// Generation summary
//
// Accumulated by the batch loop, printed once after everything succeeded.

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::time::{Duration, Instant};

/// Statistics of one generator run
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    /// Generated component names, in generation order
    components: Vec<String>,

    /// Total size of the generated component files in bytes
    total_bytes: u64,

    output_dir: Utf8PathBuf,

    started: Instant,
    finished: Option<Duration>,
}

impl GenerationSummary {
    pub fn new(output_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            components: Vec::new(),
            total_bytes: 0,
            output_dir: output_dir.into(),
            started: Instant::now(),
            finished: None,
        }
    }

    /// Record a generated component file
    pub fn record_component(&mut self, name: &str, bytes: u64) {
        self.components.push(name.to_string());
        self.total_bytes += bytes;
    }

    /// Mark the run complete and fix the reported output directory
    pub fn finish(&mut self, output_dir: impl Into<Utf8PathBuf>) {
        self.output_dir = output_dir.into();
        self.finished = Some(self.started.elapsed());
    }

    pub fn components_generated(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Total size in kibibytes
    pub fn total_kib(&self) -> f64 {
        self.total_bytes as f64 / 1024.0
    }

    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Wall time of the run, once finished
    pub fn elapsed(&self) -> Option<Duration> {
        self.finished
    }

    pub fn log_summary(&self) {
        tracing::info!(
            components = self.components.len(),
            total_bytes = self.total_bytes,
            elapsed_ms = self.finished.map(|d| d.as_millis() as u64),
            "Generation complete"
        );
    }
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Icon generation completed!")?;
        writeln!(f, "Components generated: {}", self.components.len())?;
        writeln!(f, "Total size: {:.2} KB", self.total_kib())?;
        writeln!(f, "Output directory: {}", self.output_dir)?;
        write!(f, "Components: {}", self.components.join(", "))
    }
}
