use std::path::{Path, PathBuf};

/// Configuration for the continuous recording sink.
#[derive(Clone, Debug)]
pub struct RecordingConfig {
    output: PathBuf,
    width: u32,
    height: u32,
    args: Vec<String>,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("recording.avi"),
            width: 640,
            height: 480,
            args: ["-aspect", "4:3", "-r", "20", "-vcodec", "msmpeg4", "-b", "30000k"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl RecordingConfig {
    /// Set the output file the encoder writes.
    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = output;
        self
    }

    /// Set the recorded frame width in pixels.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set the recorded frame height in pixels.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// Replace the encoder arguments placed between input and output.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    // Getters
    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Configuration for the watch daemon.
#[derive(Clone, Debug)]
pub struct WatchConfig {
    event_addr: String,
    command_addr: String,
    cutoff: i64,
    threshold: i64,
    snapshot_path: PathBuf,
    recording: Option<RecordingConfig>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            event_addr: "127.0.0.1:5555".to_string(),
            command_addr: "127.0.0.1:5556".to_string(),
            cutoff: 50,
            threshold: 10,
            snapshot_path: PathBuf::from("snapshot.bmp"),
            recording: None,
        }
    }
}

impl WatchConfig {
    /// Set the address the event broadcast channel binds to.
    pub fn with_event_addr(mut self, addr: String) -> Self {
        self.event_addr = addr;
        self
    }

    /// Set the address the command channel binds to.
    pub fn with_command_addr(mut self, addr: String) -> Self {
        self.command_addr = addr;
        self
    }

    /// Set the initial per-triplet noise floor.
    pub fn with_cutoff(mut self, cutoff: i64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Set the minimum movement score that emits an event.
    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the path `write_bmp` snapshots are written to.
    pub fn with_snapshot_path(mut self, path: PathBuf) -> Self {
        self.snapshot_path = path;
        self
    }

    /// Enable continuous recording.
    pub fn with_recording(mut self, recording: RecordingConfig) -> Self {
        self.recording = Some(recording);
        self
    }

    // Getters
    pub fn event_addr(&self) -> &str {
        &self.event_addr
    }

    pub fn command_addr(&self) -> &str {
        &self.command_addr
    }

    pub fn cutoff(&self) -> i64 {
        self.cutoff
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn recording(&self) -> Option<&RecordingConfig> {
        self.recording.as_ref()
    }
}
