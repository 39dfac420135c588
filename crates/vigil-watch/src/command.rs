use crate::{FrameStore, SensingState};
use std::path::PathBuf;
use vigil_com::CommandRequest;

/// The closed set of verbs the command channel understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SwitchToIr,
    SwitchToRgb,
    /// Carries the raw argument text; parsing happens at dispatch so a bad
    /// argument can fall back to the previous cutoff.
    SetCutoff(String),
    GetCutoff,
    GetVideoMode,
    WriteSnapshot,
    Unrecognized,
}

/// Classify one command line.
///
/// The verb is everything up to the first space, or the whole line when no
/// space is present; anything after the space is argument text. Unknown and
/// empty verbs classify as `Unrecognized`.
pub fn parse(line: &str) -> Command {
    let (verb, argument) = match line.split_once(' ') {
        Some((verb, rest)) => (verb, rest),
        None => (line, ""),
    };

    match verb {
        "switch_to_ir" => Command::SwitchToIr,
        "switch_to_rgb" => Command::SwitchToRgb,
        "set_cutoff" => Command::SetCutoff(argument.to_string()),
        "get_cutoff" => Command::GetCutoff,
        "get_video_mode" => Command::GetVideoMode,
        "write_bmp" => Command::WriteSnapshot,
        _ => Command::Unrecognized,
    }
}

/// Dispatches parsed commands against the sensing state.
///
/// Stateless across messages apart from the shared `SensingState` it
/// mutates; each inbound request runs one parse-dispatch-respond cycle and
/// is then discarded.
pub struct CommandInterpreter {
    snapshot_path: PathBuf,
}

impl CommandInterpreter {
    pub fn new(snapshot_path: PathBuf) -> Self {
        Self { snapshot_path }
    }

    /// Handle one inbound request.
    ///
    /// Every dispatch queues exactly one response, except `write_bmp`
    /// (side effect only) which queues none.
    pub fn handle(&self, request: &CommandRequest, state: &mut SensingState, store: &FrameStore) {
        let text = request.text();

        match parse(text) {
            Command::SwitchToIr => {
                state.request_ir();
                request.respond(text);
            }
            Command::SwitchToRgb => {
                state.request_rgb();
                request.respond(text);
            }
            Command::SetCutoff(argument) => {
                match argument.trim().parse::<i64>() {
                    Ok(cutoff) => state.cutoff = cutoff,
                    // A non-numeric argument leaves the previous cutoff in
                    // place; the echo below goes out either way.
                    Err(_) => {
                        log::debug!("set_cutoff: ignoring non-numeric argument {:?}", argument)
                    }
                }
                request.respond(text);
            }
            Command::GetCutoff => {
                request.respond(&format!("get_cutoff {}", state.cutoff));
            }
            Command::GetVideoMode => {
                // Answers with what the sensor is actually delivering, not
                // with a still-pending request.
                request.respond(&format!("get_video_mode {}", state.current_mode.label()));
            }
            Command::WriteSnapshot => {
                self.write_snapshot(store);
            }
            Command::Unrecognized => {
                request.respond("invalid_cmd");
            }
        }
    }

    /// One-shot snapshot of the retained frame. Failures are logged and
    /// swallowed; this path never answers on the command channel.
    fn write_snapshot(&self, store: &FrameStore) {
        if store.is_empty() {
            log::warn!("write_bmp: no frame retained yet");
            return;
        }

        match vigil_image::write_bmp(
            &self.snapshot_path,
            store.mode(),
            store.width(),
            store.height(),
            store.bytes(),
        ) {
            Ok(()) => log::info!("Snapshot written to {}", self.snapshot_path.display()),
            Err(e) => log::warn!("Snapshot write failed: {}", e),
        }
    }
}
