#![allow(dead_code)]

use std::io::{self, Write};
use std::time::Duration;

use docombine::{Application, Config};
use mockito::{Mock, Server, ServerGuard};

pub const BOUNDARY: &str = "docombine-test-boundary";

pub fn test_config(converter_url: String) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        converter_url,
        ..Config::default()
    }
}

/// Converter double whose `/health` answers 200.
pub async fn healthy_converter() -> (ServerGuard, Mock) {
    let mut server = Server::new_async().await;
    let health = server
        .mock("GET", "/health")
        .with_status(200)
        .create_async()
        .await;
    (server, health)
}

/// Builds and starts the service, returning its base URL.
pub async fn spawn_app(config: Config) -> String {
    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = app.port();
    tokio::spawn(app.run_until_stopped());
    format!("http://127.0.0.1:{}", port)
}

/// Chunked response body that is written only after `delay`.
///
/// Runs on its own thread, so other requests to the same converter double
/// are answered meanwhile.
pub fn delayed_body(
    delay: Duration,
    body: Vec<u8>,
) -> impl Fn(&mut dyn Write) -> io::Result<()> + Send + Sync + 'static {
    move |writer: &mut dyn Write| {
        std::thread::sleep(delay);
        writer.write_all(&body)
    }
}

pub fn pdf(label: &str) -> Vec<u8> {
    format!("%PDF-1.7\n% {}\n%%EOF\n", label).into_bytes()
}

pub fn compound(stream_name: &str) -> Vec<u8> {
    let mut data = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
    data.resize(512, 0);
    data.extend(utf16le("Root Entry"));
    data.resize(640, 0);
    data.extend(utf16le(stream_name));
    data.resize(1024, 0);
    data
}

pub fn doc() -> Vec<u8> {
    compound("WordDocument")
}

pub fn ppt() -> Vec<u8> {
    compound("PowerPoint Document")
}

pub fn docx() -> Vec<u8> {
    zip(&["[Content_Types].xml", "_rels/.rels", "word/document.xml"])
}

pub fn pptx() -> Vec<u8> {
    zip(&["[Content_Types].xml", "_rels/.rels", "ppt/presentation.xml"])
}

pub fn zip(entries: &[&str]) -> Vec<u8> {
    let mut data = Vec::new();
    for name in entries {
        let content = b"<xml/>";
        data.extend_from_slice(b"PK\x03\x04");
        data.extend_from_slice(&[20, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        data.extend_from_slice(&[0, 0, 0, 0]);
        data.extend_from_slice(&(content.len() as u32).to_le_bytes());
        data.extend_from_slice(&(content.len() as u32).to_le_bytes());
        data.extend_from_slice(&(name.len() as u16).to_le_bytes());
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(name.as_bytes());
        data.extend_from_slice(content);
    }
    data
}

fn utf16le(value: &str) -> Vec<u8> {
    value.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Raw multipart body for driving the router without a socket.
pub fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, file_name, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
