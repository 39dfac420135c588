use crate::RecordingConfig;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, Command};
use vigil_sensor::VideoMode;

/// Continuous recording sink: an ffmpeg child process fed raw frames on
/// stdin.
///
/// The child is spawned with `kill_on_drop` so an abandoned sink cannot
/// leave an encoder running; the graceful path is `finish`, which closes
/// stdin and lets ffmpeg finalize the container.
pub struct FfmpegSink {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl FfmpegSink {
    /// Spawn the encoder for the given pixel format.
    pub fn spawn(config: &RecordingConfig, mode: VideoMode) -> std::io::Result<Self> {
        let pix_fmt = match mode {
            VideoMode::Rgb => "rgb24",
            VideoMode::Ir => "gray",
        };

        let mut child = Command::new("ffmpeg")
            .arg("-pix_fmt")
            .arg(pix_fmt)
            .arg("-s")
            .arg(format!("{}x{}", config.width(), config.height()))
            .arg("-f")
            .arg("rawvideo")
            .arg("-i")
            .arg("-")
            .args(config.args())
            .arg("-y")
            .arg(config.output())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("ffmpeg stdin not piped"))?;

        Ok(Self {
            child,
            stdin: Some(stdin),
        })
    }

    /// Forward one raw frame unmodified.
    pub async fn write_frame(&mut self, data: &[u8]) -> std::io::Result<()> {
        match self.stdin.as_mut() {
            Some(stdin) => stdin.write_all(data).await,
            None => Err(std::io::Error::other("recording already finished")),
        }
    }

    /// Close the frame pipe and wait for the encoder to finalize its output.
    pub async fn finish(mut self) -> std::io::Result<()> {
        drop(self.stdin.take());
        self.child.wait().await.map(|_| ())
    }
}
