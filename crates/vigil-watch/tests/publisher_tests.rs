use vigil_com::EventServer;
use vigil_sensor::VideoMode;
use vigil_watch::{EventPublisher, SensingState};

#[tokio::test]
async fn test_brightness_is_edge_triggered() {
    let server = EventServer::bind("127.0.0.1:0").await.expect("bind failed");
    let mut rx = server.subscribe();
    let publisher = EventPublisher::new(server);
    let mut state = SensingState::new(VideoMode::Rgb, 50, 10);

    assert!(publisher.publish_brightness(&mut state, 42));
    // Same value again: suppressed
    assert!(!publisher.publish_brightness(&mut state, 42));
    assert!(publisher.publish_brightness(&mut state, 43));

    assert_eq!(rx.recv().await.unwrap(), "brightness 42");
    assert_eq!(rx.recv().await.unwrap(), "brightness 43");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_movement_is_gated_by_threshold() {
    let server = EventServer::bind("127.0.0.1:0").await.expect("bind failed");
    let mut rx = server.subscribe();
    let publisher = EventPublisher::new(server);
    let mut state = SensingState::new(VideoMode::Rgb, 50, 10);

    assert!(!publisher.publish_movement(&state, 9));
    assert!(publisher.publish_movement(&state, 10));
    assert!(publisher.publish_movement(&state, 10));

    // The threshold is independent of the cutoff
    state.cutoff = 0;
    assert!(!publisher.publish_movement(&state, 9));

    assert_eq!(rx.recv().await.unwrap(), "movement 10");
    assert_eq!(rx.recv().await.unwrap(), "movement 10");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_publish_without_subscribers_is_silent() {
    let server = EventServer::bind("127.0.0.1:0").await.expect("bind failed");
    let publisher = EventPublisher::new(server);
    let mut state = SensingState::new(VideoMode::Rgb, 50, 10);

    // Nobody listening: both calls still report emission and drop quietly
    assert!(publisher.publish_brightness(&mut state, 5));
    assert!(publisher.publish_movement(&state, 100));
}
