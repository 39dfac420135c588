use tokio::time::{Duration, timeout};
use vigil_sensor::{Sensor, SensorConfig, SimSensor, VideoMode};

fn fast_config() -> SensorConfig {
    SensorConfig::default()
        .with_width(16)
        .with_height(8)
        .with_fps(200)
}

#[tokio::test]
async fn test_rgb_frame_geometry() {
    let mut sensor = SimSensor::new(fast_config());
    sensor.start_stream().expect("start failed");

    let frame = timeout(Duration::from_secs(5), sensor.next_frame())
        .await
        .expect("next_frame timed out")
        .expect("next_frame failed");

    assert_eq!(frame.mode, VideoMode::Rgb);
    assert_eq!(frame.width, 16);
    assert_eq!(frame.height, 8);
    assert_eq!(frame.len(), 16 * 8 * 3);

    sensor.stop_stream().expect("stop failed");
}

#[tokio::test]
async fn test_timestamps_increase() {
    let mut sensor = SimSensor::new(fast_config());
    sensor.start_stream().expect("start failed");

    let first = sensor.next_frame().await.expect("first frame failed");
    let second = sensor.next_frame().await.expect("second frame failed");
    assert!(second.timestamp > first.timestamp);

    sensor.stop_stream().expect("stop failed");
}

#[tokio::test]
async fn test_mode_switch_changes_byte_length() {
    let mut sensor = SimSensor::new(fast_config());
    sensor.start_stream().expect("start failed");

    let rgb = sensor.next_frame().await.expect("rgb frame failed");
    assert_eq!(rgb.len(), 16 * 8 * 3);

    // Mode changes are rejected on a live stream
    assert!(sensor.set_mode(VideoMode::Ir).is_err());

    sensor.stop_stream().expect("stop failed");
    sensor.set_mode(VideoMode::Ir).expect("set_mode failed");
    sensor.start_stream().expect("restart failed");
    assert_eq!(sensor.mode(), VideoMode::Ir);

    let ir = sensor.next_frame().await.expect("ir frame failed");
    assert_eq!(ir.mode, VideoMode::Ir);
    assert_eq!(ir.len(), 16 * 8);

    sensor.stop_stream().expect("stop failed");
}

#[tokio::test]
async fn test_next_frame_without_start_errors() {
    let mut sensor = SimSensor::new(fast_config());
    assert!(sensor.next_frame().await.is_err());
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    let mut sensor = SimSensor::new(fast_config());
    sensor.stop_stream().expect("stop on idle failed");

    sensor.start_stream().expect("start failed");
    sensor.stop_stream().expect("stop failed");
    sensor.stop_stream().expect("second stop failed");
}
