mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::http::StatusCode;
use botrpc_client::{BotClient, ErrorKind, Params, Value, params};
use common::{MockServer, Reply, TOKEN};
use serde::Deserialize;
use serde_json::json;

struct TestCase {
    name: &'static str,
    method: &'static str,
    params: fn() -> Params,
    expected_body: fn() -> serde_json::Value,
}

const TEST_CASES: &[TestCase] = &[
    TestCase {
        name: "no parameters",
        method: "getMe",
        params: Params::new,
        expected_body: || json!({}),
    },
    TestCase {
        name: "nulls stripped at every level",
        method: "sendMessage",
        params: || {
            params! {
                "chat_id" => 42,
                "text" => "hello",
                "parse_mode" => Value::Null,
                "reply_markup" => params! {
                    "inline_keyboard" => vec![vec![params! {
                        "text" => "go",
                        "url" => Value::Null,
                    }]],
                    "selective" => Value::Null,
                },
            }
        },
        expected_body: || {
            json!({
                "chat_id": 42,
                "text": "hello",
                "reply_markup": {"inline_keyboard": [[{"text": "go"}]]}
            })
        },
    },
    TestCase {
        name: "unlisted method name",
        method: "setMessageReaction",
        params: || params! { "chat_id" => -100, "message_id" => 9, "is_big" => false },
        expected_body: || json!({"chat_id": -100, "message_id": 9, "is_big": false}),
    },
];

#[tokio::test]
async fn test_json_dispatch() -> anyhow::Result<()> {
    for case in TEST_CASES {
        let server = MockServer::always(Reply::ok(json!({"id": 1}))).await?;
        let client = server.client()?;

        let result = client.call(case.method, (case.params)()).await?;
        assert_eq!(result, json!({"id": 1}), "{}", case.name);

        let requests = server.requests();
        assert_eq!(requests.len(), 1, "{}", case.name);
        let request = &requests[0];
        assert_eq!(request.path, format!("/bot{TOKEN}/{}", case.method), "{}", case.name);
        assert_eq!(request.content_type, "application/json", "{}", case.name);
        assert_eq!(request.json()?, (case.expected_body)(), "{}", case.name);
    }
    Ok(())
}

#[tokio::test]
async fn test_get_me_posts_empty_object() -> anyhow::Result<()> {
    let server = MockServer::always(Reply::ok(json!({"id": 7, "is_bot": true}))).await?;
    let client = server.client()?;

    let me = client.get_me().await?;
    assert_eq!(me["id"], 7);

    let requests = server.requests();
    assert_eq!(requests[0].path, format!("/bot{TOKEN}/getMe"));
    assert_eq!(requests[0].body.as_ref(), b"{}");
    Ok(())
}

#[tokio::test]
async fn test_missing_result_is_null() -> anyhow::Result<()> {
    let server = MockServer::always(Reply::raw(StatusCode::OK, r#"{"ok":true}"#)).await?;
    let result = server.client()?.call("deleteWebhook", Params::new()).await?;
    assert!(result.is_null());
    Ok(())
}

#[tokio::test]
async fn test_call_as_typed_result() -> anyhow::Result<()> {
    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: i64,
        username: Option<String>,
    }

    let reply = Reply::ok(json!({"id": 7, "is_bot": true, "username": "echo_bot"}));
    let server = MockServer::always(reply).await?;
    let client = server.client()?;

    let user: User = client.call_as("getMe", Params::new()).await?;
    assert_eq!(
        user,
        User {
            id: 7,
            username: Some("echo_bot".to_string())
        }
    );

    let err = client
        .call_as::<Vec<User>>("getMe", Params::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    Ok(())
}

#[tokio::test]
async fn test_api_error_reported_once() -> anyhow::Result<()> {
    let server = MockServer::always(Reply::error(400, "Bad Request: chat not found")).await?;
    let hook_calls = Arc::new(AtomicUsize::new(0));
    let client = {
        let hook_calls = hook_calls.clone();
        server
            .client_builder()
            .on_error(move |err| {
                assert!(err.is_api());
                hook_calls.fetch_add(1, Ordering::SeqCst);
            })
            .build()?
    };

    let err = client
        .send_message(params! { "chat_id" => 1, "text" => "hi", "entities" => Value::Null })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.code(), Some(400));
    assert_eq!(err.message(), "Bad Request: chat not found");
    assert_eq!(err.to_string(), "sendMessage: Bad Request: chat not found");
    assert_eq!(err.request().method, "sendMessage");
    assert_eq!(err.request().params, json!({"chat_id": 1, "text": "hi"}));
    assert_eq!(err.request().attempt, 0);
    assert_eq!(hook_calls.load(Ordering::SeqCst), 1);
    assert_eq!(server.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_invalid_envelope_is_decode_error() -> anyhow::Result<()> {
    let reply = Reply::raw(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
    let server = MockServer::always(reply).await?;
    let err = server.client()?.get_me().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err.message().contains("502"), "{}", err.message());
    assert!(std::error::Error::source(&err).is_some());
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_not_retried() -> anyhow::Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let hook_calls = Arc::new(AtomicUsize::new(0));
    let client = {
        let hook_calls = hook_calls.clone();
        BotClient::builder(TOKEN)
            .endpoint(format!("http://{addr}/bot{{token}}/{{method}}"))
            .retry_budget(true)
            .on_error(move |_| {
                hook_calls.fetch_add(1, Ordering::SeqCst);
            })
            .build()?
    };

    let err = client.get_me().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.code().is_none());
    assert!(!err.message().is_empty());
    assert_eq!(hook_calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_timeout_is_transport_error() -> anyhow::Result<()> {
    let server = MockServer::always(Reply::ok(json!(true)).after(Duration::from_secs(2))).await?;
    let client = server
        .client_builder()
        .timeout(Duration::from_millis(200))
        .build()?;

    let err = client.get_me().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_timeout());
    Ok(())
}

#[tokio::test]
async fn test_clients_share_nothing_but_config() -> anyhow::Result<()> {
    let server = MockServer::always(Reply::ok(json!(true))).await?;
    let client = server.client()?;

    let calls = (0..8).map(|i| {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .send_chat_action(params! { "chat_id" => i, "action" => "typing" })
                .await
        })
    });
    for call in calls.collect::<Vec<_>>() {
        assert_eq!(call.await??, json!(true));
    }
    assert_eq!(server.requests().len(), 8);
    Ok(())
}
