// End-to-end request flows through the router with in-memory bodies

use std::path::Path;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Request, StatusCode};

use image_gallery::config::{AppState, Config};
use image_gallery::handler::handle_request;
use image_gallery::http::HttpResponse;

const BOUNDARY: &str = "flow-boundary";
const TEMPLATE: &str = "{% for name in images %}<img src=\"{{ images_path }}{{ name }}\">\n{% endfor %}";

const PNG: &[u8] = b"\x89PNG\r\n\x1A\n\x00\x00\x00\x0DIHDR-png-body";
const JPEG: &[u8] = b"\xFF\xD8\xFF\xE0\x00\x10JFIF-jpeg-body";

struct Fixture {
    _tmp: tempfile::TempDir,
    state: Arc<AppState>,
}

impl Fixture {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let template = tmp.path().join("index.html.tmpl");
        std::fs::write(&template, TEMPLATE).unwrap();

        let mut config = Config::default();
        config.storage.image_dir = tmp.path().join("images").to_string_lossy().into_owned();
        config.storage.template = template.to_string_lossy().into_owned();

        Self {
            state: Arc::new(AppState::new(&config)),
            _tmp: tmp,
        }
    }

    fn with_limit(limit: u64) -> Self {
        let fixture = Self::new();
        let mut config = fixture.state.config.clone();
        config.http.max_body_size = limit;
        Self {
            state: Arc::new(AppState::new(&config)),
            _tmp: fixture._tmp,
        }
    }

    fn image_dir(&self) -> &Path {
        self.state.store.dir()
    }

    fn stored_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.image_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    async fn send(&self, req: Request<Full<Bytes>>) -> HttpResponse {
        handle_request(req, Arc::clone(&self.state)).await.unwrap()
    }

    async fn get(&self, uri: &str) -> HttpResponse {
        self.send(
            Request::get(uri)
                .body(Full::new(Bytes::new()))
                .unwrap(),
        )
        .await
    }

    async fn upload(&self, data: &[u8]) -> HttpResponse {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"upload.bin\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        self.send(
            Request::post("/upload/")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Full::new(Bytes::from(body)))
                .unwrap(),
        )
        .await
    }
}

async fn body_string(resp: HttpResponse) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn upload_png_twice_stores_one_file() {
    let fx = Fixture::new();

    for _ in 0..2 {
        let resp = fx.upload(PNG).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()["location"], "..");
    }

    let files = fx.stored_files();
    assert_eq!(files.len(), 1);
    let name = &files[0];
    assert!(name.ends_with(".png"));
    assert_eq!(name.len(), 64 + ".png".len());
    assert!(name[..64].chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn text_upload_is_rejected_and_not_stored() {
    let fx = Fixture::new();

    let resp = fx.upload(b"just some text, not an image").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(resp).await.contains("invalid file type"));
    assert!(fx.stored_files().is_empty());
}

#[tokio::test]
async fn oversized_upload_is_rejected_and_not_stored() {
    let fx = Fixture::with_limit(1_024);

    let mut big = PNG.to_vec();
    big.resize(4_096, 0);
    let resp = fx.upload(&big).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(fx.stored_files().is_empty());
}

#[tokio::test]
async fn non_multipart_upload_is_rejected() {
    let fx = Fixture::new();

    let resp = fx
        .send(
            Request::post("/upload/")
                .header("content-type", "text/plain")
                .body(Full::new(Bytes::from_static(PNG)))
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(fx.stored_files().is_empty());
}

#[tokio::test]
async fn gallery_lists_every_stored_image() {
    let fx = Fixture::new();
    fx.upload(PNG).await;
    fx.upload(JPEG).await;

    let resp = fx.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = body_string(resp).await;
    for name in fx.stored_files() {
        assert!(html.contains(&format!("src=\"/images/{name}\"")), "{html}");
    }
    assert_eq!(html.matches("<img").count(), 2);
}

#[tokio::test]
async fn stored_image_is_served_byte_for_byte() {
    let fx = Fixture::new();
    fx.upload(JPEG).await;
    let name = fx.stored_files().remove(0);

    let resp = fx.get(&format!("/images/{name}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "image/jpeg");
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], JPEG);
}

#[tokio::test]
async fn non_image_extension_is_not_found() {
    let fx = Fixture::new();
    std::fs::create_dir_all(fx.image_dir()).unwrap();
    std::fs::write(fx.image_dir().join("foo.txt"), b"hello").unwrap();

    let resp = fx.get("/images/foo.txt").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_image_dir_fails_gallery() {
    let fx = Fixture::new();

    let resp = fx.get("/").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[cfg(unix)]
#[tokio::test]
async fn unreadable_image_dir_fails_gallery() {
    use std::os::unix::fs::PermissionsExt;

    let fx = Fixture::new();
    fx.upload(PNG).await;
    let dir = fx.image_dir();
    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users read through the mode bits; nothing to check then
    if std::fs::read_dir(dir).is_ok() {
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let resp = fx.get("/").await;
    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(resp).await.contains("failed to list images"));
}

#[tokio::test]
async fn range_and_conditional_requests() {
    let fx = Fixture::new();
    fx.upload(PNG).await;
    let uri = format!("/images/{}", fx.stored_files().remove(0));

    let resp = fx
        .send(
            Request::get(uri.as_str())
                .header("range", "bytes=0-3")
                .body(Full::new(Bytes::new()))
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], &PNG[..4]);

    let etag = fx.get(&uri).await.headers()["etag"].clone();
    let resp = fx
        .send(
            Request::get(uri.as_str())
                .header("if-none-match", etag)
                .body(Full::new(Bytes::new()))
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn subtree_roots_redirect_and_methods_are_checked() {
    let fx = Fixture::new();

    let resp = fx.get("/upload").await;
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(resp.headers()["location"], "/upload/");

    let resp = fx
        .send(
            Request::post("/images/x.png")
                .body(Full::new(Bytes::new()))
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(resp.headers().contains_key("server"));
}
