use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tokio::time::{Duration, sleep, timeout};
use vigil_com::LineClient;
use vigil_sensor::{Frame, Sensor, SensorError, VideoMode};
use vigil_watch::{WatchConfig, WatchError, Watcher};

/// Test sensor fed frames by hand, with a call log for the stream-control
/// surface.
struct ScriptedSensor {
    mode: VideoMode,
    frames: mpsc::Receiver<Frame>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSensor {
    fn new(frames: mpsc::Receiver<Frame>) -> (Self, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sensor = Self {
            mode: VideoMode::Rgb,
            frames,
            calls: calls.clone(),
        };
        (sensor, calls)
    }

    fn note(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }
}

impl Sensor for ScriptedSensor {
    fn start_stream(&mut self) -> Result<(), SensorError> {
        self.note("start".to_string());
        Ok(())
    }

    fn stop_stream(&mut self) -> Result<(), SensorError> {
        self.note("stop".to_string());
        Ok(())
    }

    fn set_mode(&mut self, mode: VideoMode) -> Result<(), SensorError> {
        self.note(format!("set {}", mode.label()));
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> VideoMode {
        self.mode
    }

    async fn next_frame(&mut self) -> Result<Frame, SensorError> {
        self.frames
            .recv()
            .await
            .ok_or_else(|| SensorError::Channel("script exhausted".to_string()))
    }
}

fn rgb_frame(fill: u8) -> Frame {
    Frame::new(VideoMode::Rgb, 2, 2, 0, vec![fill; 12]).unwrap()
}

fn ir_frame(fill: u8) -> Frame {
    Frame::new(VideoMode::Ir, 2, 2, 0, vec![fill; 4]).unwrap()
}

fn test_config() -> WatchConfig {
    WatchConfig::default()
        .with_event_addr("127.0.0.1:0".to_string())
        .with_command_addr("127.0.0.1:0".to_string())
}

async fn recv_line(client: &mut LineClient) -> String {
    timeout(Duration::from_secs(5), client.recv())
        .await
        .expect("recv timed out")
        .expect("recv failed")
}

#[tokio::test]
async fn test_step_change_emits_exactly_one_movement_event() {
    let (frame_tx, frame_rx) = mpsc::channel(8);
    let (sensor, _calls) = ScriptedSensor::new(frame_rx);

    let mut watcher = Watcher::bind(&test_config(), sensor)
        .await
        .expect("bind failed");
    let event_addr = watcher.event_addr();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { watcher.run(shutdown_rx).await });

    let mut events = LineClient::connect(event_addr).await.expect("connect failed");
    sleep(Duration::from_millis(50)).await;

    // Frame 1 is the baseline; its brightness equals the zero starting
    // point so nothing is published. Frame 2 boosts every sample by
    // cutoff + 10. Frame 3 repeats frame 2.
    frame_tx.send(rgb_frame(0)).await.unwrap();
    frame_tx.send(rgb_frame(60)).await.unwrap();
    frame_tx.send(rgb_frame(60)).await.unwrap();

    assert_eq!(recv_line(&mut events).await, "brightness 60");
    // Four triplets, each 10 over the cutoff
    assert_eq!(recv_line(&mut events).await, "movement 40");

    // The identical third frame publishes nothing
    assert!(
        timeout(Duration::from_millis(200), events.recv())
            .await
            .is_err()
    );

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap().expect("run failed");
}

#[tokio::test]
async fn test_mode_switch_is_deferred_to_the_tick() {
    let (frame_tx, frame_rx) = mpsc::channel(8);
    let (sensor, calls) = ScriptedSensor::new(frame_rx);

    let mut watcher = Watcher::bind(&test_config(), sensor)
        .await
        .expect("bind failed");
    let command_addr = watcher.command_addr();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { watcher.run(shutdown_rx).await });

    let mut client = LineClient::connect(command_addr).await.expect("connect failed");

    // Both commands queue before any frame arrives, so the same drain
    // handles them: the switch is requested, but the mode readback still
    // reports what the sensor is delivering
    client.send("switch_to_ir").await.expect("send failed");
    client.send("get_video_mode").await.expect("send failed");
    sleep(Duration::from_millis(50)).await;

    frame_tx.send(rgb_frame(0)).await.unwrap();

    assert_eq!(recv_line(&mut client).await, "switch_to_ir");
    assert_eq!(recv_line(&mut client).await, "get_video_mode rgb");

    // The switch applied at the end of that tick; the next frame is IR
    // sized, which also exercises the store resize
    client.send("get_video_mode").await.expect("send failed");
    sleep(Duration::from_millis(50)).await;
    frame_tx.send(ir_frame(0)).await.unwrap();

    assert_eq!(recv_line(&mut client).await, "get_video_mode ir");

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap().expect("run failed");

    let calls = calls.lock().unwrap();
    let switch_at = calls
        .iter()
        .position(|c| c == "set ir")
        .expect("set ir never called");
    assert_eq!(calls[switch_at - 1], "stop");
    assert_eq!(calls[switch_at + 1], "start");
}

#[tokio::test]
async fn test_cutoff_round_trip_over_the_wire() {
    let (frame_tx, frame_rx) = mpsc::channel(8);
    let (sensor, _calls) = ScriptedSensor::new(frame_rx);

    let mut watcher = Watcher::bind(&test_config(), sensor)
        .await
        .expect("bind failed");
    let command_addr = watcher.command_addr();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { watcher.run(shutdown_rx).await });

    let mut client = LineClient::connect(command_addr).await.expect("connect failed");

    client.send("set_cutoff 42").await.expect("send failed");
    client.send("get_cutoff").await.expect("send failed");
    client.send("bogus").await.expect("send failed");
    sleep(Duration::from_millis(50)).await;
    frame_tx.send(rgb_frame(0)).await.unwrap();

    assert_eq!(recv_line(&mut client).await, "set_cutoff 42");
    assert_eq!(recv_line(&mut client).await, "get_cutoff 42");
    assert_eq!(recv_line(&mut client).await, "invalid_cmd");

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap().expect("run failed");
}

#[tokio::test]
async fn test_write_bmp_answers_nothing() {
    let snapshot = std::env::temp_dir().join(format!(
        "vigil-watcher-test-{}-snapshot.bmp",
        std::process::id()
    ));
    let config = test_config().with_snapshot_path(snapshot.clone());

    let (frame_tx, frame_rx) = mpsc::channel(8);
    let (sensor, _calls) = ScriptedSensor::new(frame_rx);

    let mut watcher = Watcher::bind(&config, sensor).await.expect("bind failed");
    let command_addr = watcher.command_addr();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { watcher.run(shutdown_rx).await });

    let mut client = LineClient::connect(command_addr).await.expect("connect failed");

    // A frame must have been retained before the snapshot lands
    frame_tx.send(rgb_frame(99)).await.unwrap();
    sleep(Duration::from_millis(50)).await;

    client.send("write_bmp").await.expect("send failed");
    client.send("get_cutoff").await.expect("send failed");
    sleep(Duration::from_millis(50)).await;
    frame_tx.send(rgb_frame(99)).await.unwrap();

    // The first reply belongs to get_cutoff: write_bmp stayed silent
    assert_eq!(recv_line(&mut client).await, "get_cutoff 50");
    assert!(snapshot.exists());

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap().expect("run failed");

    std::fs::remove_file(&snapshot).ok();
}

#[tokio::test]
async fn test_sensor_failure_ends_the_run() {
    let (frame_tx, frame_rx) = mpsc::channel(8);
    let (sensor, calls) = ScriptedSensor::new(frame_rx);

    let mut watcher = Watcher::bind(&test_config(), sensor)
        .await
        .expect("bind failed");

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { watcher.run(shutdown_rx).await });

    frame_tx.send(rgb_frame(0)).await.unwrap();
    // Closing the frame source is the sensor's terminal error
    drop(frame_tx);

    let result = timeout(Duration::from_secs(5), handle)
        .await
        .expect("run never ended")
        .unwrap();
    match result {
        Err(WatchError::Sensor(_)) => {}
        other => panic!("expected a sensor error, got {:?}", other),
    }

    // The stream was still released on the way out
    assert_eq!(calls.lock().unwrap().last().map(String::as_str), Some("stop"));
}

#[tokio::test]
async fn test_shutdown_interrupts_a_quiet_sensor() {
    let (_frame_tx, frame_rx) = mpsc::channel::<Frame>(8);
    let (sensor, _calls) = ScriptedSensor::new(frame_rx);

    let mut watcher = Watcher::bind(&test_config(), sensor)
        .await
        .expect("bind failed");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { watcher.run(shutdown_rx).await });

    // No frame ever arrives; the interrupt must still unwind the loop
    sleep(Duration::from_millis(50)).await;
    shutdown_tx.send(true).unwrap();

    timeout(Duration::from_secs(5), handle)
        .await
        .expect("shutdown did not interrupt the frame wait")
        .unwrap()
        .expect("run failed");
}
