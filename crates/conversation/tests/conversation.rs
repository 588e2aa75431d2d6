use std::io;

use bytes::Bytes;
use http_body::Frame;
use http_body_util::{Full, StreamBody};
use indoc::indoc;
use micro_conversation::native::{NativeBody, NativeRequest};
use micro_conversation::protocol::{BodyConsumed, BodyError, MessageBody, ResponseMessage};
use micro_conversation::read::{BodyReader, FormPayload, UploadedFile, read_bytes, read_form, read_json, read_text};
use micro_conversation::translate::{translate_request, translate_response};
use serde::Deserialize;
use serde_json::json;

fn full(body: &'static str) -> Full<Bytes> {
    Full::new(Bytes::from_static(body.as_bytes()))
}

fn request(content_type: &str, body: Vec<u8>) -> NativeRequest<Full<Bytes>> {
    NativeRequest::new(
        "http://localhost:8080/submit",
        "POST",
        vec![("content-type".to_string(), content_type.to_string())],
        Full::new(Bytes::from(body)),
    )
}

fn multipart(body: &str) -> Vec<u8> {
    body.replace('\n', "\r\n").into_bytes()
}

type Chunks = futures::stream::Iter<std::vec::IntoIter<Result<Frame<Bytes>, io::Error>>>;

fn chunks(items: Vec<Result<Frame<Bytes>, io::Error>>) -> StreamBody<Chunks> {
    StreamBody::new(futures::stream::iter(items))
}

#[tokio::test]
async fn reads_text_once() {
    let native = NativeRequest::new("http://localhost/", "POST", vec![], full("hello world"));
    let message = translate_request(&native).unwrap();

    assert_eq!(read_text(message.body()).await, Ok("hello world".to_string()));
    assert_eq!(read_text(message.body()).await, Err(BodyError::AlreadyRead));
}

#[tokio::test]
async fn every_reader_reports_already_read_after_the_first() {
    let native = request("application/json", br#"{"a":1}"#.to_vec());
    let body = native.body();

    assert_eq!(read_json(body).await, Ok(json!({"a": 1})));

    assert_eq!(read_text(body).await, Err(BodyError::AlreadyRead));
    assert_eq!(read_bytes(body).await, Err(BodyError::AlreadyRead));
    assert_eq!(read_json(body).await, Err(BodyError::AlreadyRead));
    assert_eq!(read_form(body).await, Err(BodyError::AlreadyRead));
}

#[tokio::test]
async fn reading_through_the_native_request_consumes_the_message_body() {
    let native = NativeRequest::new("http://localhost/", "PUT", vec![], full("abc"));
    let message = translate_request(&native).unwrap();

    assert_eq!(read_bytes(native.body()).await, Ok(Bytes::from("abc")));
    assert_eq!(read_bytes(message.body()).await, Err(BodyError::AlreadyRead));
}

#[tokio::test]
async fn handle_consumed_by_the_transport() {
    let body = NativeBody::<Full<Bytes>>::consumed(None);

    assert_eq!(read_text(&body).await, Err(BodyError::AlreadyRead));
}

#[tokio::test]
async fn text_is_decoded_leniently() {
    let bytes = b"\xEF\xBB\xBFcaf\xC3\xA9 \xFF!".to_vec();
    let native = request("text/plain", bytes);

    assert_eq!(read_text(native.body()).await, Ok("café \u{FFFD}!".to_string()));
}

#[tokio::test]
async fn bytes_are_returned_untouched() {
    let payload = vec![0xEF, 0xBB, 0xBF, 0x00, 0xFF, 0x10];
    let native = request("application/octet-stream", payload.clone());

    assert_eq!(read_bytes(native.body()).await, Ok(Bytes::from(payload)));
}

#[tokio::test]
async fn invalid_json_is_a_parse_error_and_consumes_the_body() {
    let native = request("application/json", b"{".to_vec());

    let error = read_json(native.body()).await.unwrap_err();
    match &error {
        BodyError::ParseError(message) => assert!(!message.is_empty()),
        other => panic!("expected a parse error, got {other:?}"),
    }

    assert_eq!(read_json(native.body()).await, Err(BodyError::AlreadyRead));
}

#[tokio::test]
async fn empty_json_body_is_a_parse_error() {
    let native = request("application/json", Vec::new());

    assert!(matches!(read_json(native.body()).await, Err(BodyError::ParseError(_))));
}

#[tokio::test]
async fn typed_json() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Params {
        name: String,
        zip: String,
    }

    let reader = BodyReader::default();

    let native = request("application/json", br#"{"name":"zava","zip":"10001"}"#.to_vec());
    let params: Params = reader.read_json_as(native.body()).await.unwrap();
    assert_eq!(params, Params { name: "zava".to_string(), zip: "10001".to_string() });

    let native = request("application/json", br#"{"name":"zava"}"#.to_vec());
    let result = reader.read_json_as::<Params, _>(native.body()).await;
    assert!(matches!(result, Err(BodyError::ParseError(_))));
}

#[tokio::test]
async fn multipart_form_is_partitioned_and_sorted() {
    let body = multipart(indoc! {r#"
    --boundary42
    Content-Disposition: form-data; name="b"

    2
    --boundary42
    Content-Disposition: form-data; name="upload"; filename="report.pdf"
    Content-Type: application/pdf

    %PDF-1.4 binary content
    --boundary42
    Content-Disposition: form-data; name="a"

    1
    --boundary42--
    "#});
    let native = request("multipart/form-data; boundary=boundary42", body);

    let form = read_form(native.body()).await.unwrap();

    assert_eq!(
        form,
        FormPayload::new(
            vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())],
            vec![("upload".to_string(), UploadedFile::new("report.pdf", None))],
        )
    );
    assert_eq!(form.values()[0], ("a".to_string(), "1".to_string()));
    assert_eq!(form.files()[0].1.filename(), "report.pdf");
}

#[tokio::test]
async fn directory_uploads_keep_their_relative_path() {
    let body = multipart(indoc! {r#"
    --boundary42
    Content-Disposition: form-data; name="photos"; filename="trip/2024/beach.jpg"
    Content-Type: image/jpeg

    jpeg bytes
    --boundary42
    Content-Disposition: form-data; name="photos"; filename="trip/notes.txt"
    Content-Type: text/plain

    text
    --boundary42--
    "#});
    let native = request("multipart/form-data; boundary=boundary42", body);

    let form = read_form(native.body()).await.unwrap();

    assert!(form.values().is_empty());
    assert_eq!(
        form.files(),
        &[
            ("photos".to_string(), UploadedFile::new("beach.jpg", Some("trip/2024/beach.jpg".to_string()))),
            ("photos".to_string(), UploadedFile::new("notes.txt", Some("trip/notes.txt".to_string()))),
        ]
    );
}

#[tokio::test]
async fn windows_style_filenames_are_kept_verbatim() {
    let body = multipart(indoc! {r#"
    --boundary42
    Content-Disposition: form-data; name="doc"; filename="C:\fakepath\a.txt"
    Content-Type: text/plain

    hello
    --boundary42--
    "#});
    let native = request("multipart/form-data; boundary=boundary42", body);

    let form = read_form(native.body()).await.unwrap();

    let file = form.file("doc").unwrap();
    assert_eq!(file.filename(), r"C:\fakepath\a.txt");
    assert_eq!(file.relative_path(), None);
}

#[tokio::test]
async fn empty_multipart_form_is_not_a_failure() {
    let native = request("multipart/form-data; boundary=boundary42", b"--boundary42--\r\n".to_vec());

    let form = read_form(native.body()).await.unwrap();

    assert!(form.values().is_empty());
    assert!(form.files().is_empty());
}

#[tokio::test]
async fn malformed_multipart_is_a_parse_error() {
    let body = multipart(indoc! {r#"
    --boundary42
    Content-Disposition: form-data; name="a"

    1
    "#});
    let native = request("multipart/form-data; boundary=boundary42", body);

    assert!(matches!(read_form(native.body()).await, Err(BodyError::ParseError(_))));
    assert_eq!(read_form(native.body()).await, Err(BodyError::AlreadyRead));
}

#[tokio::test]
async fn urlencoded_form() {
    let native = request("application/x-www-form-urlencoded", b"zip=10001&name=zava".to_vec());

    let form = read_form(native.body()).await.unwrap();

    assert_eq!(form.values(), &[("name".to_string(), "zava".to_string()), ("zip".to_string(), "10001".to_string())]);
    assert!(form.files().is_empty());
}

#[tokio::test]
async fn stream_failure_is_a_read_error() {
    let body = chunks(vec![
        Ok(Frame::data(Bytes::from_static(b"partial"))),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer")),
    ]);
    let native = NativeRequest::new("http://localhost/", "POST", vec![], body);

    assert_eq!(read_text(native.body()).await, Err(BodyError::read("connection reset by peer")));
    assert_eq!(read_text(native.body()).await, Err(BodyError::AlreadyRead));
}

#[tokio::test]
async fn stream_reporting_consumption_is_already_read() {
    let body = chunks(vec![Err(io::Error::other(BodyConsumed))]);
    let native = NativeRequest::new("http://localhost/", "POST", vec![], body);

    assert_eq!(read_json(native.body()).await, Err(BodyError::AlreadyRead));
}

#[tokio::test]
async fn already_read_wins_over_parse_error() {
    let native = request("application/json", b"not json".to_vec());

    assert_eq!(read_bytes(native.body()).await, Ok(Bytes::from("not json")));
    assert_eq!(read_json(native.body()).await, Err(BodyError::AlreadyRead));
}

#[tokio::test]
async fn body_size_limit_is_a_read_error() {
    let reader = BodyReader::builder().max_body_size(4).build();

    let native = request("text/plain", b"0123456789".to_vec());
    assert!(matches!(reader.read_text(native.body()).await, Err(BodyError::ReadError(_))));

    let native = request("text/plain", b"0123".to_vec());
    assert_eq!(reader.read_text(native.body()).await, Ok("0123".to_string()));
}

#[tokio::test]
async fn form_part_limit_is_a_parse_error() {
    let reader = BodyReader::builder().max_form_parts(1).build();
    let native = request("application/x-www-form-urlencoded", b"a=1&b=2".to_vec());

    assert!(matches!(reader.read_form(native.body()).await, Err(BodyError::ParseError(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_reads_have_a_single_winner() {
    let native = NativeRequest::new("http://localhost/", "POST", vec![], full("payload"));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let body = native.body().clone();
            tokio::spawn(async move { read_text(&body).await })
        })
        .collect();

    let mut successes = 0;
    let mut already_read = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(text) => {
                assert_eq!(text, "payload");
                successes += 1;
            }
            Err(BodyError::AlreadyRead) => already_read += 1,
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(already_read, 7);
}

#[tokio::test]
async fn translated_response_body_can_be_read_back() {
    let message = ResponseMessage::new(200, vec![], MessageBody::Text(r#"{"ok":true}"#.to_string()));

    let body = translate_response(message).into_body();

    assert_eq!(body.content_type(), Some("text/plain; charset=utf-8"));
    assert_eq!(read_json(&body).await, Ok(json!({"ok": true})));
    assert_eq!(read_json(&body).await, Err(BodyError::AlreadyRead));
}

#[tokio::test]
async fn translated_binary_response_keeps_length() {
    let payload = Bytes::from(vec![7u8; 1024]);
    let headers = vec![("x-a".to_string(), "1".to_string()), ("x-a".to_string(), "2".to_string())];
    let message = ResponseMessage::new(206, headers.clone(), MessageBody::Bytes(payload.clone()));

    let native = translate_response(message);
    assert_eq!(native.status(), 206);
    assert_eq!(native.headers(), headers.as_slice());

    let bytes = read_bytes(&native.into_body()).await.unwrap();
    assert_eq!(bytes.len(), 1024);
}

#[tokio::test]
async fn url_components_round_trip() {
    let cases = [
        ("http://example.com/", "example.com", None, "/", None),
        ("https://example.com:8443/a%20b/c", "example.com", Some(8443), "/a%20b/c", None),
        ("http://127.0.0.1:3000/search?q=rust&page=2", "127.0.0.1", Some(3000), "/search", Some("q=rust&page=2")),
        ("http://example.com/search?", "example.com", None, "/search", Some("")),
    ];

    for (url, host, port, path, query) in cases {
        let message = translate_request(&NativeRequest::new(url, "GET", vec![], ())).unwrap();

        assert_eq!(message.host(), host, "{url}");
        assert_eq!(message.port(), port, "{url}");
        assert_eq!(message.path(), path, "{url}");
        assert_eq!(message.query(), query, "{url}");
    }
}
