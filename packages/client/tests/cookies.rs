mod support;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderMap;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::routing::get;
use mgmt_client::cookie::{CookieStore, Jar};
use mgmt_client::{Client, HttpRequest};
use support::TestServer;
use url::Url;

fn session_agent() -> TestServer {
    let router = Router::new()
        .route(
            "/jolokia/login",
            get(|| async { ([(SET_COOKIE, "JSESSIONID=abc123; Path=/")], "logged in") }),
        )
        .route(
            "/jolokia/whoami",
            get(|headers: HeaderMap| async move {
                headers
                    .get(COOKIE)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("anonymous")
                    .to_owned()
            }),
        );
    TestServer::start(router)
}

#[test]
fn test_cookies_round_trip_through_the_shared_jar() {
    let server = session_agent();
    let base = format!("http://localhost:{}/jolokia", server.port());
    let jar = Jar::default();

    let client = Client::url(&base)
        .cookie_store(Arc::new(jar.clone()))
        .build()
        .expect("valid client");

    let before = client
        .execute(&HttpRequest::get("whoami"))
        .expect("agent answers");
    assert_eq!(before.text(), "anonymous");

    client
        .execute(&HttpRequest::get("login"))
        .expect("agent answers");

    let url = Url::parse(&base).expect("base url");
    assert_eq!(jar.cookies(&url).expect("cookie stored"), "JSESSIONID=abc123");

    let after = client
        .execute(&HttpRequest::get("whoami"))
        .expect("agent answers");
    assert_eq!(after.text(), "JSESSIONID=abc123");
}

#[test]
fn test_seeded_cookies_are_sent() {
    let server = session_agent();
    let base = format!("http://localhost:{}/jolokia", server.port());
    let jar = Jar::default();
    jar.add_cookie_str("token=seed; Path=/", &Url::parse(&base).expect("base url"));

    let client = Client::url(&base)
        .cookie_store(Arc::new(jar))
        .build()
        .expect("valid client");

    let response = client
        .execute(&HttpRequest::get("whoami"))
        .expect("agent answers");
    assert_eq!(response.text(), "token=seed");
}

#[test]
fn test_without_store_no_cookies_are_kept() {
    let server = session_agent();
    let client = Client::url(server.url("/jolokia")).build().expect("valid client");

    client
        .execute(&HttpRequest::get("login"))
        .expect("agent answers");
    let response = client
        .execute(&HttpRequest::get("whoami"))
        .expect("agent answers");
    assert_eq!(response.text(), "anonymous");
}
