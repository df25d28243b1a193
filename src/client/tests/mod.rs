use super::test_helpers::{MockTransport, test_client};
use crate::client::CloudClient;
use crate::config::Config;
use crate::error::Error;
use crate::types::{Event, JobId, Operation};
use std::sync::Arc;
use std::time::Duration;

/// Spin until the mock transport has seen `n` requests, so a spawned
/// operation is known to have claimed the in-flight slot.
async fn wait_for_requests(transport: &MockTransport, n: usize) {
    while transport.requests().len() < n {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

#[tokio::test]
async fn authorize_accepts_ok_substring() {
    let (client, _transport) = test_client(MockTransport::new().respond_with(b"LOOKOK"));
    assert!(!client.authorized());
    assert!(client.authorize().await.unwrap());
    assert!(client.authorized());
}

#[tokio::test]
async fn authorize_rejection_leaves_unauthorized() {
    let (client, _transport) = test_client(
        MockTransport::new()
            .respond_with(b"bad credentials")
            .respond_with(b"OK"),
    );
    assert!(!client.authorize().await.unwrap());
    assert!(!client.authorized());
    // the next successful authorize flips the flag
    assert!(client.authorize().await.unwrap());
    assert!(client.authorized());
}

#[tokio::test]
async fn download_returns_body_verbatim() {
    let (client, transport) = test_client(MockTransport::new().respond_with(b"payload"));
    let got = client.download("dir/file.bin").await.unwrap();
    assert_eq!(got, b"payload");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(
        requests[0].url.as_str(),
        "http://cloud.test/download?login=alice&password=secret&file=dir%2Ffile.bin"
    );
}

#[tokio::test]
async fn upload_posts_the_payload() {
    let (client, transport) = test_client(MockTransport::new().respond_with(b"OK"));
    client.upload("a.txt", b"data".to_vec()).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].body.as_deref(), Some(b"data".as_slice()));
    assert_eq!(
        requests[0].url.as_str(),
        "http://cloud.test/upload?login=alice&password=secret&file=a.txt"
    );
}

#[tokio::test]
async fn list_parses_entries_in_server_order() {
    let (client, transport) =
        test_client(MockTransport::new().respond_with(b"b.txt\nh2\n200\na.txt\nh1\n100\n"));
    let files = client.list("dir/").await.unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].name, "b.txt");
    assert_eq!(files[0].modified.timestamp(), 200);
    assert_eq!(files[1].name, "a.txt");
    assert_eq!(files[1].hash, "h1");

    // a list request is a download-style GET against /list
    assert_eq!(
        transport.requests()[0].url.as_str(),
        "http://cloud.test/list?login=alice&password=secret&file=dir%2F"
    );
}

#[tokio::test]
async fn delete_is_acknowledged() {
    let (client, transport) = test_client(MockTransport::new().respond_with(b"OK"));
    client.delete("old.txt").await.unwrap();
    assert_eq!(
        transport.requests()[0].url.as_str(),
        "http://cloud.test/delete?login=alice&password=secret&file=old.txt"
    );
}

#[tokio::test]
async fn job_submission_and_polling() {
    let (client, transport) = test_client(
        MockTransport::new()
            .respond_with(b"OK:job-42")
            .respond_with(b"OK:PROGRESS")
            .respond_with(b"OK:DONE"),
    );
    let id = client.submit_job("scene.txt").await.unwrap();
    assert_eq!(id, JobId::new("job-42"));
    assert!(!client.poll_job(&id).await.unwrap());
    assert!(client.poll_job(&id).await.unwrap());

    let requests = transport.requests();
    assert_eq!(
        requests[0].url.as_str(),
        "http://cloud.test/job?login=alice&password=secret&file=scene.txt"
    );
    assert_eq!(
        requests[1].url.as_str(),
        "http://cloud.test/progress?login=alice&password=secret&id=job-42"
    );
}

#[tokio::test]
async fn wait_job_polls_until_done() {
    let (client, transport) = test_client(
        MockTransport::new()
            .respond_with(b"OK:PROGRESS")
            .respond_with(b"OK:PROGRESS")
            .respond_with(b"OK:DONE"),
    );
    let id = JobId::new("job-7");
    client
        .wait_job(&id, Duration::from_millis(1))
        .await
        .unwrap();
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn second_start_fails_fast_while_pending() {
    let (transport, gate) = MockTransport::new()
        .respond_with(b"payload")
        .respond_with(b"next")
        .gated();
    let (client, transport) = test_client(transport);

    let pending = {
        let client = client.clone();
        tokio::spawn(async move { client.download("a").await })
    };
    wait_for_requests(&transport, 1).await;

    let err = client.download("b").await.unwrap_err();
    match err {
        Error::RequestInFlight {
            requested,
            outstanding,
        } => {
            assert_eq!(requested, Operation::Download);
            assert_eq!(outstanding, Operation::Download);
        }
        other => panic!("expected RequestInFlight, got {other:?}"),
    }
    // the rejected start must not disturb the outstanding operation
    gate.notify_one();
    assert_eq!(pending.await.unwrap().unwrap(), b"payload");

    // and the engine is idle again afterwards
    gate.notify_one();
    assert_eq!(client.download("c").await.unwrap(), b"next");
}

#[tokio::test]
async fn progress_events_precede_done() {
    let script = [(4u64, Some(10u64)), (10, Some(10))];
    let (client, _transport) = test_client(
        MockTransport::new()
            .respond_with(b"0123456789")
            .with_progress(&script),
    );
    let mut events = client.subscribe();
    client.download("big.bin").await.unwrap();

    assert_eq!(
        events.recv().await.unwrap(),
        Event::TransferProgress {
            operation: Operation::Download,
            bytes: 4,
            total: Some(10)
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        Event::TransferProgress {
            operation: Operation::Download,
            bytes: 10,
            total: Some(10)
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        Event::Done {
            operation: Operation::Download,
            status: 200
        }
    );
}

#[tokio::test]
async fn quiet_operations_emit_only_done() {
    // delete is not a transfer; the progress script must not leak into events
    let (client, _transport) = test_client(
        MockTransport::new()
            .respond_with(b"OK")
            .with_progress(&[(1, None)]),
    );
    let mut events = client.subscribe();
    client.delete("a.txt").await.unwrap();
    assert_eq!(
        events.recv().await.unwrap(),
        Event::Done {
            operation: Operation::Delete,
            status: 200
        }
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn cancel_frees_the_engine_without_stale_results() {
    let (transport, gate) = MockTransport::new().respond_with(b"fresh").gated();
    let (client, transport) = test_client(transport);
    let mut events = client.subscribe();

    let pending = {
        let client = client.clone();
        tokio::spawn(async move { client.download("a").await })
    };
    wait_for_requests(&transport, 1).await;
    client.cancel();

    match pending.await.unwrap() {
        Err(Error::Cancelled) => {}
        other => panic!("expected Cancelled, got {other:?}"),
    }
    // a cancelled operation announces nothing
    assert!(events.try_recv().is_err());

    // the engine is idle again and the next operation gets its own result
    gate.notify_one();
    assert_eq!(client.download("b").await.unwrap(), b"fresh");
    assert_eq!(
        events.recv().await.unwrap(),
        Event::Done {
            operation: Operation::Download,
            status: 200
        }
    );
}

#[tokio::test]
async fn cancel_with_nothing_pending_is_a_no_op() {
    let (client, _transport) = test_client(MockTransport::new().respond_with(b"OK"));
    client.cancel();
    assert!(client.authorize().await.unwrap());
}

#[tokio::test]
async fn non_success_status_still_parses_leniently() {
    let (client, _transport) = test_client(
        MockTransport::new()
            .respond_with_status(403, b"denied")
            .respond_with_status(404, b"no such file"),
    );
    assert!(!client.authorize().await.unwrap());
    assert!(!client.authorized());

    let mut events = client.subscribe();
    let body = client.download("gone.bin").await.unwrap();
    assert_eq!(body, b"no such file");
    assert_eq!(
        events.recv().await.unwrap(),
        Event::Done {
            operation: Operation::Download,
            status: 404
        }
    );
}

#[tokio::test]
async fn invalid_location_is_a_config_error() {
    let config = Config {
        location: "not a url".to_string(),
        login: "a".to_string(),
        password: "b".to_string(),
        ..Default::default()
    };
    let err = CloudClient::with_transport(config, Arc::new(MockTransport::new())).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[tokio::test]
async fn empty_login_is_a_config_error() {
    let config = Config {
        location: "http://cloud.test".to_string(),
        ..Default::default()
    };
    let err = CloudClient::with_transport(config, Arc::new(MockTransport::new())).unwrap_err();
    match err {
        Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("login")),
        other => panic!("expected Config error, got {other:?}"),
    }
}
