use crate::{Frame, SensorError, VideoMode};

/// Async sensor trait for frame capture.
///
/// The control loop owns exactly one `Sensor` and drives it through this
/// surface: `next_frame` is the single suspension point (a blocking pull,
/// cancel-safe so it can be raced against a shutdown signal), while the
/// stream-control methods exist so a deferred mode switch can be applied as
/// stop / set_mode / start between frames.
#[allow(async_fn_in_trait)]
pub trait Sensor {
    /// Begin delivering frames. A no-op when the stream is already running.
    fn start_stream(&mut self) -> Result<(), SensorError>;

    /// Stop delivering frames and release the capture machinery.
    fn stop_stream(&mut self) -> Result<(), SensorError>;

    /// Change the pixel format for subsequent frames.
    ///
    /// The stream must be stopped first; backends reject a mode change on a
    /// live stream.
    fn set_mode(&mut self, mode: VideoMode) -> Result<(), SensorError>;

    /// The mode the device is currently configured for.
    fn mode(&self) -> VideoMode;

    /// Receive the next frame.
    ///
    /// Suspends until a frame is available. An `Err` is terminal: the device
    /// or its event pump failed and the stream will deliver nothing more.
    async fn next_frame(&mut self) -> Result<Frame, SensorError>;
}
