use tokio::time::{Duration, sleep, timeout};
use vigil_com::{CommandServer, LineClient};

#[tokio::test]
async fn test_request_response_round_trip() {
    let mut server = CommandServer::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = server.local_addr();

    let mut client = LineClient::connect(addr).await.expect("connect failed");
    client.send("get_cutoff").await.expect("send failed");

    let request = timeout(Duration::from_secs(5), server.recv())
        .await
        .expect("recv timed out")
        .expect("recv failed");
    assert_eq!(request.text(), "get_cutoff");

    request.respond("get_cutoff 50");

    let reply = timeout(Duration::from_secs(5), client.recv())
        .await
        .expect("reply timed out")
        .expect("reply failed");
    assert_eq!(reply, "get_cutoff 50");
}

#[tokio::test]
async fn test_try_recv_is_nonblocking() {
    let mut server = CommandServer::bind("127.0.0.1:0").await.expect("bind failed");
    assert!(server.try_recv().is_none());

    let addr = server.local_addr();
    let mut client = LineClient::connect(addr).await.expect("connect failed");
    client.send("set_cutoff 42").await.expect("send failed");

    sleep(Duration::from_millis(50)).await;

    let request = server.try_recv().expect("request should be queued");
    assert_eq!(request.text(), "set_cutoff 42");
    assert!(server.try_recv().is_none());
}

#[tokio::test]
async fn test_replies_route_to_their_client() {
    let mut server = CommandServer::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = server.local_addr();

    let mut client_a = LineClient::connect(addr).await.unwrap();
    let mut client_b = LineClient::connect(addr).await.unwrap();

    client_a.send("a").await.expect("send failed");
    sleep(Duration::from_millis(50)).await;
    client_b.send("b").await.expect("send failed");

    for _ in 0..2 {
        let request = timeout(Duration::from_secs(5), server.recv())
            .await
            .expect("recv timed out")
            .expect("recv failed");
        let reply = format!("echo {}", request.text());
        request.respond(&reply);
    }

    let reply_a = timeout(Duration::from_secs(5), client_a.recv())
        .await
        .expect("reply timed out")
        .expect("reply failed");
    assert_eq!(reply_a, "echo a");

    let reply_b = timeout(Duration::from_secs(5), client_b.recv())
        .await
        .expect("reply timed out")
        .expect("reply failed");
    assert_eq!(reply_b, "echo b");
}

#[tokio::test]
async fn test_oversized_command_is_forwarded_empty() {
    let mut server = CommandServer::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = server.local_addr();

    let mut client = LineClient::connect(addr).await.expect("connect failed");

    let oversized = "x".repeat(vigil_com::framing::MAX_LINE + 10);
    client.send(&oversized).await.expect("send failed");
    client.send("get_cutoff").await.expect("send failed");

    let first = timeout(Duration::from_secs(5), server.recv())
        .await
        .expect("recv timed out")
        .expect("recv failed");
    assert_eq!(first.text(), "");

    // The connection survives and the next command parses normally
    let second = timeout(Duration::from_secs(5), server.recv())
        .await
        .expect("recv timed out")
        .expect("recv failed");
    assert_eq!(second.text(), "get_cutoff");
}
