use vigil_sensor::VideoMode;

/// Noise floor installed when switching to RGB.
pub const RGB_CUTOFF: i64 = 50;
/// Noise floor installed when switching to IR; infrared frames are noisier.
pub const IR_CUTOFF: i64 = 80;

/// The sensing context shared by the control loop and the command
/// interpreter.
///
/// One instance exists per daemon and only the control-loop task ever
/// mutates it. `current_mode` reflects what the sensor is actually
/// delivering; `requested_mode` is written by command handling and may lag
/// one loop tick behind until the deferred switch is applied.
#[derive(Debug, Clone)]
pub struct SensingState {
    pub current_mode: VideoMode,
    pub requested_mode: VideoMode,
    pub cutoff: i64,
    pub threshold: i64,
    pub last_brightness: i64,
}

impl SensingState {
    pub fn new(mode: VideoMode, cutoff: i64, threshold: i64) -> Self {
        Self {
            current_mode: mode,
            requested_mode: mode,
            cutoff,
            threshold,
            last_brightness: 0,
        }
    }

    /// Request infrared mode. Takes effect at the next loop tick.
    pub fn request_ir(&mut self) {
        self.requested_mode = VideoMode::Ir;
        self.cutoff = IR_CUTOFF;
    }

    /// Request RGB mode. Takes effect at the next loop tick.
    pub fn request_rgb(&mut self) {
        self.requested_mode = VideoMode::Rgb;
        self.cutoff = RGB_CUTOFF;
    }

    /// True while a requested switch has not been applied yet.
    pub fn mode_switch_pending(&self) -> bool {
        self.requested_mode != self.current_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ir_defers_and_retunes() {
        let mut state = SensingState::new(VideoMode::Rgb, RGB_CUTOFF, 10);
        assert!(!state.mode_switch_pending());

        state.request_ir();
        assert_eq!(state.requested_mode, VideoMode::Ir);
        assert_eq!(state.current_mode, VideoMode::Rgb);
        assert_eq!(state.cutoff, IR_CUTOFF);
        assert!(state.mode_switch_pending());
    }

    #[test]
    fn test_request_rgb_restores_cutoff() {
        let mut state = SensingState::new(VideoMode::Rgb, RGB_CUTOFF, 10);
        state.request_ir();
        state.request_rgb();
        assert_eq!(state.requested_mode, VideoMode::Rgb);
        assert_eq!(state.cutoff, RGB_CUTOFF);
        assert!(!state.mode_switch_pending());
    }
}
