use actix_web::{test, web, App};
use mockito::Matcher;
use reqwest::Client;
use serde_json::Value;

use gitgood_lib::proxy::{routes, Upstream};

fn upstream_for(url: &str, token: Option<&str>) -> web::Data<Upstream> {
    web::Data::new(Upstream::with_client(
        Client::new(),
        url,
        token.map(str::to_string),
    ))
}

fn search_body() -> &'static str {
    r#"{"total_count": 1, "incomplete_results": false,
        "items": [{"id": 1, "full_name": "o/r", "description": "d",
                   "html_url": "https://github.com/o/r", "stargazers_count": 3,
                   "language": "Rust", "topics": []}]}"#
}

#[actix_web::test]
async fn health_check() {
    let app = test::init_service(
        App::new()
            .app_data(upstream_for("http://127.0.0.1:9", None))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "GitHub API proxy is running");
}

#[actix_web::test]
async fn search_is_forwarded_with_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "test".into()),
            Matcher::UrlEncoded("per_page".into(), "10".into()),
        ]))
        .match_header("authorization", "Bearer ghp_valid")
        .match_header("accept", "application/vnd.github.v3+json")
        .with_status(200)
        .with_header("content-type", "application/json; charset=utf-8")
        .with_body(search_body())
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(upstream_for(&server.url(), Some("ghp_valid")))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/github/search/repositories?q=test&per_page=10")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total_count"], 1);
    assert!(body["items"].is_array());
    mock.assert_async().await;
}

#[actix_web::test]
async fn upstream_auth_error_is_relayed_unchanged() {
    let mut server = mockito::Server::new_async().await;
    let upstream_body = r#"{"message":"Bad credentials","documentation_url":"https://docs.github.com/rest"}"#;
    let _m = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(upstream_body)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(upstream_for(&server.url(), Some("ghp_invalid")))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/github/search/repositories?q=test")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
    let body = test::read_body(resp).await;
    assert_eq!(body, upstream_body.as_bytes());
}

#[actix_web::test]
async fn missing_token_sends_no_authorization() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rate_limit")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"resources":{"core":{"limit":60,"remaining":59,"reset":1700000000}}}"#)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(upstream_for(&server.url(), None))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/rate-limit").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["resources"]["core"]["limit"], 60);
    mock.assert_async().await;
}

#[actix_web::test]
async fn issues_route_forwards_path_and_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/rust-lang/rustlings/issues")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("state".into(), "open".into()),
            Matcher::UrlEncoded("labels".into(), "good first issue".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(upstream_for(&server.url(), Some("t")))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/github/repos/rust-lang/rustlings/issues?state=open&labels=good%20first%20issue")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(test::read_body(resp).await, "[]".as_bytes());
    mock.assert_async().await;
}

#[actix_web::test]
async fn rate_limited_upstream_keeps_status() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/o/r/issues")
        .with_status(403)
        .with_body(r#"{"message":"API rate limit exceeded for 1.2.3.4."}"#)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(upstream_for(&server.url(), Some("t")))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/github/repos/o/r/issues")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("rate limit"));
}

#[actix_web::test]
async fn unreachable_upstream_is_a_500() {
    // nothing listens on the discard port
    let app = test::init_service(
        App::new()
            .app_data(upstream_for("http://127.0.0.1:9", Some("t")))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/github/search/repositories?q=x")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}
