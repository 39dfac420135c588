use vigil_sensor::{Frame, VideoMode};

/// The single retained previous frame.
///
/// Owned exclusively by the control loop. The byte buffer is reallocated
/// whenever an incoming frame's length differs from the stored length,
/// which is how a video-mode change manifests here.
pub struct FrameStore {
    mode: VideoMode,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self {
            mode: VideoMode::Rgb,
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Match the store to the incoming frame.
    ///
    /// Returns true when the byte buffer was (re)allocated - the first frame
    /// ever, or a format change - in which case the caller must skip the
    /// comparison and take the fresh-baseline path.
    pub fn ensure_shape(&mut self, frame: &Frame) -> bool {
        let resized = self.data.len() != frame.len();
        if resized {
            self.data = vec![0; frame.len()];
        }

        self.mode = frame.mode;
        self.width = frame.width;
        self.height = frame.height;

        resized
    }

    /// Copy the frame over the stored bytes; it becomes the previous frame
    /// for the next comparison. Callers run `ensure_shape` first, so the
    /// lengths agree.
    pub fn retain(&mut self, frame: &Frame) {
        self.data.copy_from_slice(&frame.data);
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn mode(&self) -> VideoMode {
        self.mode
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True until the first frame has been retained.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new()
    }
}
