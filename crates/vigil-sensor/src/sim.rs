use crate::{Frame, Sensor, SensorConfig, SensorError, VideoMode};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc;

type FrameResult = Result<Frame, SensorError>;

/// Synthetic sensor backend.
///
/// Renders a deterministic moving gradient at the configured geometry and
/// frame rate, delivered through the same capture-thread-plus-channel
/// handoff a hardware backend would use. The generator thread paces itself
/// and pushes frames into a bounded channel; `next_frame` pulls from the
/// channel; dropping the receiver stops the thread.
pub struct SimSensor {
    config: SensorConfig,
    mode: VideoMode,
    receiver: Option<mpsc::Receiver<FrameResult>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for SimSensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimSensor")
            .field("config", &self.config)
            .field("mode", &self.mode)
            .field("streaming", &self.receiver.is_some())
            .finish()
    }
}

impl SimSensor {
    /// Create a new synthetic sensor. The stream starts in RGB mode and is
    /// not running until `start_stream`.
    pub fn new(config: SensorConfig) -> Self {
        Self {
            config,
            mode: VideoMode::Rgb,
            receiver: None,
            thread_handle: None,
        }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Generator thread body: render, pace, push.
    fn generate_loop(
        tx: mpsc::Sender<FrameResult>,
        mode: VideoMode,
        width: u32,
        height: u32,
        fps: u32,
    ) {
        let interval = Duration::from_micros(1_000_000 / u64::from(fps.max(1)));
        let mut seq: u64 = 0;

        loop {
            thread::sleep(interval);

            let data = render_pattern(mode, width, height, seq);
            let timestamp = seq * interval.as_micros() as u64;
            let frame = Frame::new(mode, width, height, timestamp, data);

            // Receiver dropped - exit thread
            if tx.blocking_send(frame).is_err() {
                break;
            }

            seq += 1;
        }
    }
}

impl Sensor for SimSensor {
    fn start_stream(&mut self) -> Result<(), SensorError> {
        if self.receiver.is_some() {
            return Ok(());
        }

        let (tx, rx) = mpsc::channel(self.config.buffer_count() as usize);

        let mode = self.mode;
        let (width, height, fps) = (self.config.width(), self.config.height(), self.config.fps());
        let handle = thread::spawn(move || {
            Self::generate_loop(tx, mode, width, height, fps);
        });

        self.receiver = Some(rx);
        self.thread_handle = Some(handle);

        Ok(())
    }

    fn stop_stream(&mut self) -> Result<(), SensorError> {
        // Drop the receiver to signal the thread to stop
        drop(self.receiver.take());

        if let Some(handle) = self.thread_handle.take() {
            handle
                .join()
                .map_err(|_| SensorError::Stream("generator thread panicked".to_string()))?;
        }

        Ok(())
    }

    fn set_mode(&mut self, mode: VideoMode) -> Result<(), SensorError> {
        if self.receiver.is_some() {
            return Err(SensorError::Stream(
                "stream must be stopped before a mode change".to_string(),
            ));
        }

        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> VideoMode {
        self.mode
    }

    async fn next_frame(&mut self) -> Result<Frame, SensorError> {
        let receiver = self
            .receiver
            .as_mut()
            .ok_or_else(|| SensorError::Stream("stream not started".to_string()))?;

        receiver
            .recv()
            .await
            .ok_or_else(|| SensorError::Channel("channel closed".to_string()))?
    }
}

impl Drop for SimSensor {
    fn drop(&mut self) {
        drop(self.receiver.take());

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

/// Moving diagonal gradient, deterministic in (mode, geometry, seq).
fn render_pattern(mode: VideoMode, width: u32, height: u32, seq: u64) -> Vec<u8> {
    let (w, h) = (width as usize, height as usize);
    let shift = (seq as usize) * 4;
    let mut data = Vec::with_capacity(w * h * mode.bytes_per_pixel());

    for y in 0..h {
        for x in 0..w {
            let v = ((x + y + shift) & 0xff) as u8;
            match mode {
                VideoMode::Rgb => {
                    data.push(v);
                    data.push(v.wrapping_add(64));
                    data.push(v.wrapping_add(128));
                }
                VideoMode::Ir => data.push(v),
            }
        }
    }

    data
}
