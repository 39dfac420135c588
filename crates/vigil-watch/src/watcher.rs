use crate::{
    CommandInterpreter, EventPublisher, FfmpegSink, FrameStore, SensingState, WatchConfig,
    WatchError, delta,
};
use std::net::SocketAddr;
use tokio::sync::{broadcast, watch};
use vigil_com::{CommandServer, EventServer};
use vigil_sensor::{Frame, Sensor};

/// The top-level control loop.
///
/// Owns the sensor, the sensing state, the frame store and both transports.
/// `run` drives one iteration per delivered frame: diff, publish, record,
/// retain, drain commands, apply a pending mode switch. Commands are always
/// drained before the switch check so a switch requested in the current tick
/// is applied in the same tick.
pub struct Watcher<S: Sensor> {
    sensor: S,
    state: SensingState,
    store: FrameStore,
    publisher: EventPublisher,
    commands: CommandServer,
    interpreter: CommandInterpreter,
    recorder: Option<FfmpegSink>,
}

impl<S: Sensor> Watcher<S> {
    /// Bind both transports and, when configured, spawn the recording sink.
    ///
    /// Fatal on failure: a daemon that cannot open its channels or its
    /// encoder never enters the loop.
    pub async fn bind(config: &WatchConfig, sensor: S) -> Result<Self, WatchError> {
        let events = EventServer::bind(config.event_addr()).await?;
        let commands = CommandServer::bind(config.command_addr()).await?;

        let recorder = match config.recording() {
            Some(recording) => {
                Some(FfmpegSink::spawn(recording, sensor.mode()).map_err(WatchError::Record)?)
            }
            None => None,
        };

        Ok(Self {
            state: SensingState::new(sensor.mode(), config.cutoff(), config.threshold()),
            store: FrameStore::new(),
            publisher: EventPublisher::new(events),
            interpreter: CommandInterpreter::new(config.snapshot_path().to_path_buf()),
            commands,
            recorder,
            sensor,
        })
    }

    /// Address of the event broadcast channel.
    pub fn event_addr(&self) -> SocketAddr {
        self.publisher.server().local_addr()
    }

    /// Address of the command channel.
    pub fn command_addr(&self) -> SocketAddr {
        self.commands.local_addr()
    }

    /// In-process tap on the event stream.
    pub fn subscribe_events(&self) -> broadcast::Receiver<String> {
        self.publisher.server().subscribe()
    }

    pub fn state(&self) -> &SensingState {
        &self.state
    }

    /// Run until `shutdown` flips true (or its sender is dropped), or the
    /// sensor reports a terminal error.
    ///
    /// The shutdown signal also interrupts an in-flight frame wait, so a
    /// quiet sensor cannot delay the exit. On the way out the stream is
    /// stopped and a live recording is finalized; the transports shut down
    /// when the watcher is dropped.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), WatchError> {
        self.sensor.start_stream()?;
        log::info!(
            "Watching in {} mode, cutoff {}, threshold {}",
            self.state.current_mode.label(),
            self.state.cutoff,
            self.state.threshold
        );

        let result = loop {
            if *shutdown.borrow() {
                break Ok(());
            }

            let frame = tokio::select! {
                _ = shutdown.changed() => break Ok(()),
                frame = self.sensor.next_frame() => match frame {
                    Ok(frame) => frame,
                    Err(e) => break Err(WatchError::Sensor(e)),
                },
            };

            if let Err(e) = self.tick(frame).await {
                break Err(e);
            }
        };

        if let Err(e) = self.sensor.stop_stream() {
            log::warn!("Stopping the stream failed: {}", e);
        }
        if let Some(recorder) = self.recorder.take() {
            if let Err(e) = recorder.finish().await {
                log::warn!("Finalizing the recording failed: {}", e);
            }
        }

        result
    }

    /// One loop iteration for one delivered frame.
    async fn tick(&mut self, frame: Frame) -> Result<(), WatchError> {
        let resized = self.store.ensure_shape(&frame);

        let stats = if resized {
            delta::baseline(&frame.data)
        } else {
            delta::compare(&frame.data, self.store.bytes(), self.state.cutoff)?
        };

        self.publisher
            .publish_brightness(&mut self.state, stats.average_brightness);
        self.publisher
            .publish_movement(&self.state, stats.movement_score);

        if let Some(mut recorder) = self.recorder.take() {
            match recorder.write_frame(&frame.data).await {
                Ok(()) => self.recorder = Some(recorder),
                Err(e) => log::warn!("Recording write failed, recording disabled: {}", e),
            }
        }

        self.store.retain(&frame);

        self.drain_commands();
        self.apply_mode_switch()?;

        Ok(())
    }

    /// Consume every queued command without waiting. An empty queue is the
    /// normal end of the drain, not an error.
    fn drain_commands(&mut self) {
        while let Some(request) = self.commands.try_recv() {
            self.interpreter
                .handle(&request, &mut self.state, &self.store);
        }
    }

    /// Apply a deferred mode switch: stop the stream, retarget the sensor,
    /// restart, and only then record the new mode as current.
    fn apply_mode_switch(&mut self) -> Result<(), WatchError> {
        if !self.state.mode_switch_pending() {
            return Ok(());
        }

        let target = self.state.requested_mode;
        log::info!("Switching video mode to {}", target.label());

        self.sensor.stop_stream()?;
        self.sensor.set_mode(target)?;
        self.sensor.start_stream()?;

        self.state.current_mode = target;
        Ok(())
    }
}
