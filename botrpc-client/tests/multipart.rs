mod common;

use std::io::{self, Write};

use botrpc_client::{ErrorKind, InputFile, Value, open_file, params};
use bytes::Bytes;
use common::{MockServer, Reply, TOKEN, field, parse_multipart};
use serde_json::json;

#[tokio::test]
async fn test_bytes_file_with_name_and_mime() -> anyhow::Result<()> {
    let server = MockServer::always(Reply::ok(json!({"message_id": 1}))).await?;
    let client = server.client()?;

    client
        .send_photo(params! {
            "chat_id" => 42,
            "photo" => InputFile::bytes(&b"\x89PNG\r\n"[..])
                .with_name("cat.png")
                .with_mime("image/png"),
            "caption" => "a \"cat\"",
            "reply_markup" => params! { "remove_keyboard" => true },
            "disable_notification" => Value::Null,
        })
        .await?;

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.path, format!("/bot{TOKEN}/sendPhoto"));
    assert!(
        request.content_type.starts_with("multipart/form-data; boundary="),
        "{}",
        request.content_type
    );

    let fields = parse_multipart(request).await?;
    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["chat_id", "photo", "caption", "reply_markup"]);

    let photo = field(&fields, "photo")?;
    assert_eq!(photo.file_name.as_deref(), Some("cat.png"));
    assert_eq!(photo.content_type.as_deref(), Some("image/png"));
    assert_eq!(photo.data.as_ref(), b"\x89PNG\r\n");

    let chat_id = field(&fields, "chat_id")?;
    assert_eq!(chat_id.text(), "42");
    assert!(chat_id.file_name.is_none());

    assert_eq!(field(&fields, "caption")?.text(), "a \"cat\"");
    let markup: serde_json::Value = serde_json::from_str(field(&fields, "reply_markup")?.text())?;
    assert_eq!(markup, json!({"remove_keyboard": true}));
    Ok(())
}

#[tokio::test]
async fn test_unnamed_file_defaults() -> anyhow::Result<()> {
    let server = MockServer::always(Reply::ok(json!(true))).await?;
    server
        .client()?
        .send_document(params! { "chat_id" => 1, "document" => Bytes::from_static(b"raw") })
        .await?;

    let fields = parse_multipart(&server.requests()[0]).await?;
    let document = field(&fields, "document")?;
    assert_eq!(document.file_name.as_deref(), Some("blob"));
    assert_eq!(document.content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(document.data.as_ref(), b"raw");
    Ok(())
}

#[tokio::test]
async fn test_stream_file_is_drained() -> anyhow::Result<()> {
    let server = MockServer::always(Reply::ok(json!(true))).await?;
    let chunks = futures::stream::iter(
        ["col1,col2\n", "1,2\n", "3,4\n"]
            .map(|chunk| Ok::<_, io::Error>(Bytes::from_static(chunk.as_bytes()))),
    );

    server
        .client()?
        .send_document(params! {
            "chat_id" => 1,
            "document" => InputFile::stream(chunks).with_name("table.csv").with_mime("text/csv"),
        })
        .await?;

    let fields = parse_multipart(&server.requests()[0]).await?;
    let document = field(&fields, "document")?;
    assert_eq!(document.text(), "col1,col2\n1,2\n3,4\n");
    assert_eq!(document.file_name.as_deref(), Some("table.csv"));
    assert_eq!(document.content_type.as_deref(), Some("text/csv"));
    Ok(())
}

#[tokio::test]
async fn test_opened_file_uses_basename() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("report-2024.txt");
    std::fs::File::create(&path)?.write_all(b"quarterly numbers")?;

    let server = MockServer::always(Reply::ok(json!(true))).await?;
    server
        .client()?
        .send_document(params! { "chat_id" => 1, "document" => open_file(&path).await? })
        .await?;

    let fields = parse_multipart(&server.requests()[0]).await?;
    let document = field(&fields, "document")?;
    assert_eq!(document.file_name.as_deref(), Some("report-2024.txt"));
    assert_eq!(document.content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(document.text(), "quarterly numbers");
    Ok(())
}

#[tokio::test]
async fn test_failing_stream_sends_nothing() -> anyhow::Result<()> {
    let server = MockServer::always(Reply::ok(json!(true))).await?;
    let chunks = futures::stream::iter(vec![
        Ok(Bytes::from_static(b"partial")),
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "upstream closed")),
    ]);

    let err = server
        .client()?
        .send_video(params! { "chat_id" => 1, "video" => InputFile::stream(chunks) })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Encode);
    assert!(err.message().contains("video"), "{}", err.message());
    assert!(server.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_nested_file_is_encode_error() -> anyhow::Result<()> {
    let server = MockServer::always(Reply::ok(json!(true))).await?;

    let err = server
        .client()?
        .send_media_group(params! {
            "chat_id" => 1,
            "media" => vec![params! { "type" => "photo", "media" => InputFile::bytes("x") }],
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Encode);
    assert!(server.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_mime_with_line_break_sends_nothing() -> anyhow::Result<()> {
    let server = MockServer::always(Reply::ok(json!(true))).await?;

    let err = server
        .client()?
        .send_document(params! {
            "chat_id" => 1,
            "document" => InputFile::bytes("x").with_mime("text/plain\r\nX-Injected: 1"),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Encode);
    assert!(err.message().contains("document"), "{}", err.message());
    assert!(server.requests().is_empty());
    Ok(())
}
