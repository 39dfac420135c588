use crate::SensorError;

/// Pixel format the sensor delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoMode {
    /// 24-bit color, three bytes per pixel.
    Rgb,
    /// 8-bit infrared intensity, one byte per pixel.
    Ir,
}

impl VideoMode {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            VideoMode::Rgb => 3,
            VideoMode::Ir => 1,
        }
    }

    /// Wire label used by the command protocol.
    pub fn label(&self) -> &'static str {
        match self {
            VideoMode::Rgb => "rgb",
            VideoMode::Ir => "ir",
        }
    }
}

/// One captured frame, owned by the receiver.
#[derive(Debug, Clone)]
pub struct Frame {
    pub mode: VideoMode,
    pub width: u32,
    pub height: u32,
    /// Capture timestamp in microseconds, driver-relative.
    pub timestamp: u64,
    pub data: Vec<u8>,
}

impl Frame {
    /// Build a frame, checking that the buffer matches the stated geometry.
    pub fn new(
        mode: VideoMode,
        width: u32,
        height: u32,
        timestamp: u64,
        data: Vec<u8>,
    ) -> Result<Self, SensorError> {
        let expected = width as usize * height as usize * mode.bytes_per_pixel();
        if data.len() != expected {
            return Err(SensorError::Stream(format!(
                "frame buffer is {} bytes, expected {} for {}x{} {}",
                data.len(),
                expected,
                width,
                height,
                mode.label()
            )));
        }

        Ok(Self {
            mode,
            width,
            height,
            timestamp,
            data,
        })
    }

    /// Byte length of the pixel buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
