//! Translates a hand-built multipart request, reads its form and answers with a summary.
//!
//! Run with `cargo run --example echo_form`.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use micro_conversation::native::NativeRequest;
use micro_conversation::protocol::{BodyError, MessageBody, ResponseMessage};
use micro_conversation::read::read_form;
use micro_conversation::translate::{translate_request, translate_response};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

const BODY: &str = "--demo\r\n\
Content-Disposition: form-data; name=\"title\"\r\n\
\r\n\
holiday\r\n\
--demo\r\n\
Content-Disposition: form-data; name=\"photo\"; filename=\"trip/beach.jpg\"\r\n\
Content-Type: image/jpeg\r\n\
\r\n\
not really a jpeg\r\n\
--demo\r\n\
Content-Disposition: form-data; name=\"album\"\r\n\
\r\n\
summer\r\n\
--demo--\r\n";

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let native = NativeRequest::new(
        "https://photos.example.com/upload?album=summer",
        "POST",
        vec![("content-type".to_string(), "multipart/form-data; boundary=demo".to_string())],
        Full::new(Bytes::from_static(BODY.as_bytes())),
    );

    let request = match translate_request(&native) {
        Ok(request) => request,
        Err(e) => {
            error!(cause = %e, "translate request error");
            return;
        }
    };
    info!(method = %request.method(), path = request.path(), query = request.query(), "received request");

    let response = match read_form(request.body()).await {
        Ok(form) => {
            let mut summary = String::new();
            for (key, value) in form.values() {
                summary.push_str(&format!("value {key} = {value}\n"));
            }
            for (key, file) in form.files() {
                summary.push_str(&format!("file {key} = {} ({:?})\n", file.filename(), file.relative_path()));
            }
            ResponseMessage::new(200, vec![], MessageBody::Text(summary))
        }
        Err(e @ BodyError::ParseError(_)) => ResponseMessage::new(400, vec![], MessageBody::Text(e.to_string())),
        Err(e) => ResponseMessage::new(500, vec![], MessageBody::Text(e.to_string())),
    };

    // a second read is a handler bug and is reported as such
    if let Err(e) = read_form(request.body()).await {
        info!(cause = %e, "second read rejected");
    }

    let response = match translate_response(response).into_http() {
        Ok(response) => response,
        Err(e) => {
            error!(cause = %e, "convert response error");
            return;
        }
    };

    let status = response.status();
    match response.into_body().collect().await {
        Ok(collected) => {
            let body = collected.to_bytes();
            info!(%status, "response body:\n{}", String::from_utf8_lossy(&body));
        }
        Err(e) => match e {},
    }
}
