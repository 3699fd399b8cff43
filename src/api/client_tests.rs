//! Unit tests for the HTTP client against a one-shot local server

#[cfg(test)]
mod tests {
    use crate::api::error::{DETAILS_FAILED, UPLOAD_FAILED};
    use crate::api::{ApiError, GalleryQuery, HttpClient, ImageApi, ImageFile};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Serve exactly one canned response; the handle yields the raw request
    async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (format!("http://{addr}"), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers were complete");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok());
        let chunked = headers.contains("transfer-encoding: chunked");

        loop {
            let complete = match content_length {
                Some(len) => buf.len() >= header_end + len,
                None if chunked => buf.ends_with(b"0\r\n\r\n"),
                None => true,
            };
            if complete {
                break;
            }
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        String::from_utf8_lossy(&buf).into_owned()
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn client(base: &str) -> HttpClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpClient::with_client(http, base, "/api")
    }

    #[test]
    fn test_base_joining() {
        let http = reqwest::Client::new();
        assert_eq!(
            HttpClient::with_client(http.clone(), "http://h:1/", "/api/").base(),
            "http://h:1/api"
        );
        assert_eq!(HttpClient::with_client(http, "http://h:1", "").base(), "http://h:1");
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_file_and_conf() {
        let body = r#"{"image": {"url": "http://h/files/x.png"}, "tags": ["person"],
            "detections": [{"label": "person", "confidence": 0.9}]}"#;
        let (base, server) = serve_once(200, body).await;

        let file = ImageFile::new("x.png", b"PNGDATA".to_vec());
        let result = client(&base).upload_image(&file, 0.35).await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /api/images?conf=0.35 HTTP/1.1"));
        assert!(request.contains("name=\"file\""));
        assert!(request.contains("filename=\"x.png\""));
        assert!(request.contains("image/png"));
        assert!(request.contains("PNGDATA"));
        assert_eq!(result.tags, vec!["person"]);
        assert_eq!(result.image.url, "http://h/files/x.png");
    }

    #[tokio::test]
    async fn test_upload_error_uses_server_detail() {
        let (base, server) = serve_once(400, r#"{"detail": "Only images are allowed."}"#).await;

        let file = ImageFile::new("x.jpg", b"nope".to_vec());
        let error = client(&base).upload_image(&file, 0.5).await.unwrap_err();
        server.await.unwrap();

        assert_eq!(
            error,
            ApiError::RequestFailed {
                status: Some(400),
                detail: "Only images are allowed.".into()
            }
        );
    }

    #[tokio::test]
    async fn test_list_serializes_only_set_params() {
        let (base, server) = serve_once(200, r#"{"items": []}"#).await;

        let query = GalleryQuery::build(" person ", 0.5, 10);
        let page = client(&base).list_images(&query).await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /api/images?tag=person&min_conf=0.5&limit=10 HTTP/1.1"));
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_list_with_empty_query_sends_no_params() {
        let (base, server) = serve_once(200, "{}").await;

        let page = client(&base)
            .list_images(&GalleryQuery::build("", 0.0, 0))
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /api/images HTTP/1.1"));
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_list_validation_detail_list_is_joined() {
        let body = r#"{"detail": [{"loc": ["query", "limit"], "msg": "value is not a valid integer"}]}"#;
        let (base, server) = serve_once(422, body).await;

        let error = client(&base)
            .list_images(&GalleryQuery::default())
            .await
            .unwrap_err();
        server.await.unwrap();

        assert_eq!(error.status(), Some(422));
        assert_eq!(error.message(), "value is not a valid integer");
    }

    #[tokio::test]
    async fn test_get_image_by_id() {
        let (base, server) = serve_once(200, r#"{"tags": ["cat"], "detections": []}"#).await;

        let details = client(&base).get_image(42).await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /api/images/42 HTTP/1.1"));
        assert_eq!(details.tags, vec!["cat"]);
        assert!(details.detections.is_empty());
    }

    #[tokio::test]
    async fn test_non_json_error_falls_back_to_generic_message() {
        let (base, server) = serve_once(502, "Bad Gateway").await;

        let error = client(&base).get_image(1).await.unwrap_err();
        server.await.unwrap();

        assert_eq!(error.status(), Some(502));
        assert_eq!(error.message(), DETAILS_FAILED);
    }

    #[tokio::test]
    async fn test_invalid_success_body_is_request_failure() {
        let (base, server) = serve_once(200, r#"{"items": "not a list"}"#).await;

        let error = client(&base)
            .list_images(&GalleryQuery::default())
            .await
            .unwrap_err();
        server.await.unwrap();

        assert_eq!(error.status(), Some(200));
        assert!(error.message().starts_with("Invalid response from server"));
    }

    #[tokio::test]
    async fn test_connection_refused_has_no_status() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let file = ImageFile::new("a.jpg", vec![0]);
        let error = client(&format!("http://{addr}"))
            .upload_image(&file, 0.35)
            .await
            .unwrap_err();

        assert_eq!(error.status(), None);
        assert!(error.message().starts_with(UPLOAD_FAILED));
        assert!(!error.is_validation());
    }
}
