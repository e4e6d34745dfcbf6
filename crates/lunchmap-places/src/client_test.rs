use super::*;

const OFFICE: Coordinate = Coordinate::new(37.561_786_4, 126.991_043_8);

fn test_client(base_url: &str) -> KakaoPlaceClient {
    KakaoPlaceClient::with_base_url("test-key", OFFICE, 1000, base_url)
        .expect("client construction should not fail")
}

#[test]
fn build_url_constructs_correct_query_string() {
    let client = test_client("https://dapi.kakao.com");
    let url = client.build_url("noodles").unwrap();
    assert_eq!(
        url.as_str(),
        "https://dapi.kakao.com/v2/local/search/keyword.json?query=noodles&x=126.9910438&y=37.5617864&radius=1000&sort=accuracy"
    );
}

#[test]
fn build_url_keeps_base_path_prefix() {
    let client = test_client("http://127.0.0.1:9000/mock/");
    let url = client.build_url("x").unwrap();
    assert!(
        url.as_str()
            .starts_with("http://127.0.0.1:9000/mock/v2/local/search/keyword.json?"),
        "unexpected url: {url}"
    );
}

#[test]
fn build_url_encodes_special_characters() {
    let client = test_client("https://dapi.kakao.com");
    let url = client.build_url("국수 & 만두").unwrap();
    assert!(
        !url.as_str().contains(' ') && url.as_str().contains("%26"),
        "query param should be percent-encoded: {url}"
    );
}

#[test]
fn api_error_prefers_structured_body() {
    let err = KakaoPlaceClient::api_error(
        StatusCode::UNAUTHORIZED,
        r#"{"errorType":"AccessDeniedError","message":"wrong appKey"}"#,
    );
    assert_eq!(
        err.to_string(),
        "place search API error: status 401: AccessDeniedError: wrong appKey"
    );
}

#[test]
fn api_error_with_unreadable_body() {
    let err = KakaoPlaceClient::api_error(StatusCode::BAD_GATEWAY, "<html>");
    assert_eq!(
        err.to_string(),
        "place search API error: status 502: no error detail"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = KakaoPlaceClient::with_base_url("k", OFFICE, 1000, "not a url");
    assert!(matches!(result, Err(PlacesError::ApiError(_))));
}
