//! Wire-level scoring tests against a mock HTTP server.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use boxscore_client::{ClientError, Parameters, ScoreRequestItem, ScoringClient, ScoringConfig};
use boxscore_models::LabelMap;

const ORANGE_PAYLOAD: &str = r#"{"num_detections": 1, "detection_boxes": [[0.1, 0.2, 0.5, 0.6]], "detection_scores": [0.93], "detection_classes": [3]}"#;

/// Wrap a payload the way the real service does: a JSON array with one
/// string element containing the payload text.
fn envelope_for(payload: &str) -> String {
    serde_json::to_string(&[payload]).unwrap()
}

fn client_for(server: &MockServer) -> ScoringClient {
    ScoringClient::new(ScoringConfig::new(format!("{}/score", server.uri()))).unwrap()
}

#[tokio::test]
async fn score_bytes_decodes_double_encoded_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/score"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope_for(ORANGE_PAYLOAD)))
        .mount(&server)
        .await;

    let raw = client_for(&server)
        .score_bytes(b"fake-image-bytes", Parameters::new())
        .await
        .unwrap();

    assert_eq!(raw.num_detections, 1);
    assert_eq!(raw.detection_classes, vec![3]);
    assert_eq!(raw.detection_scores, vec![0.93]);
    assert_eq!(raw.detection_boxes, vec![[0.1, 0.2, 0.5, 0.6]]);

    // decode end to end against a label map
    let set = raw
        .decode(&LabelMap::from([(3, "orange")]), "fake.jpg")
        .unwrap();
    assert_eq!(set[0].label, "orange");
}

#[tokio::test]
async fn request_body_is_one_element_array_with_base64_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope_for(ORANGE_PAYLOAD)))
        .mount(&server)
        .await;

    let mut params = Parameters::new();
    params.insert("resize_width".to_string(), serde_json::json!(640));

    client_for(&server)
        .score_bytes(b"fake-image-bytes", params)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let items: Vec<ScoreRequestItem> = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].image_bytes().unwrap(), b"fake-image-bytes");
    assert_eq!(items[0].parameters["resize_width"], serde_json::json!(640));
}

#[tokio::test]
async fn auth_token_becomes_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer sekrit"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope_for(ORANGE_PAYLOAD)))
        .mount(&server)
        .await;

    let config = ScoringConfig::new(format!("{}/score", server.uri())).with_auth_token("sekrit");
    let client = ScoringClient::new(config).unwrap();

    // the mock only matches when the header is present, so success is the assertion
    client
        .score_bytes(b"img", Parameters::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn non_success_status_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("scoring backend down"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .score_bytes(b"img", Parameters::new())
        .await
        .unwrap_err();

    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "scoring backend down");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_envelope_fails_with_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not-a-json-array"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .score_bytes(b"img", Parameters::new())
        .await
        .unwrap_err();

    match err {
        ClientError::MalformedResponse { body, .. } => assert_eq!(body, "not-a-json-array"),
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn score_url_fetches_image_then_posts_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/fruit.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg-ish bytes".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/score"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope_for(ORANGE_PAYLOAD)))
        .mount(&server)
        .await;

    let raw = client_for(&server)
        .score_url(&format!("{}/images/fruit.jpg", server.uri()), Parameters::new())
        .await
        .unwrap();
    assert_eq!(raw.num_detections, 1);

    // the POSTed image must be the fetched bytes
    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.method.to_string() == "POST")
        .unwrap();
    let items: Vec<ScoreRequestItem> = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(items[0].image_bytes().unwrap(), b"jpeg-ish bytes");
}

#[tokio::test]
async fn image_fetch_fails_loudly_on_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/images/missing.jpg", server.uri());
    let err = client_for(&server)
        .score_url(&url, Parameters::new())
        .await
        .unwrap_err();

    match err {
        ClientError::ImageFetch { url: u, status } => {
            assert_eq!(u, url);
            assert_eq!(status.as_u16(), 404);
        }
        other => panic!("expected ImageFetch, got {other:?}"),
    }
}

#[tokio::test]
async fn score_file_reads_local_image() {
    use std::io::Write;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope_for(ORANGE_PAYLOAD)))
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"local image bytes").unwrap();

    client_for(&server)
        .score_file(file.path(), Parameters::new())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let items: Vec<ScoreRequestItem> = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(items[0].image_bytes().unwrap(), b"local image bytes");
}

#[tokio::test]
async fn score_file_missing_path_is_image_read_error() {
    let server = MockServer::start().await;
    let err = client_for(&server)
        .score_file("/definitely/not/here.jpg", Parameters::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ImageRead { .. }));
}
