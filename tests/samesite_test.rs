//! SameSite enforcement across redirect chains, end to end through the client.

use cookienet::client::Client;
use cookienet::cookies::monster::CookieMonster;
use cookienet::cookies::retrieval::CookieRetrieval;
use cookienet::http::response::HttpResponse;
use cookienet::http::transport::{transport_fn, HttpRequestInfo};
use http::header::{LOCATION, SET_COOKIE};
use http::{Method, StatusCode};
use std::sync::Arc;
use url::Url;

/// A tiny two-site web: `wpt.test` sets cookies and echoes them back,
/// `other.test` echoes and bounces requests back to `wpt.test`.
fn wpt_client(jar: Arc<CookieMonster>) -> Client {
    let transport = transport_fn(|req: HttpRequestInfo| async move {
        let host = req.url.host_str().unwrap_or_default().to_string();
        let path = req.url.path().to_string();
        let cookies = req.header("cookie").unwrap_or_default().to_string();

        let resp = match (host.as_str(), path.as_str()) {
            ("wpt.test", "/set") => HttpResponse::new(StatusCode::OK)
                .with_header(SET_COOKIE, "strict=1; SameSite=Strict")
                .with_header(SET_COOKIE, "lax=1; SameSite=Lax")
                .with_header(SET_COOKIE, "none=1; SameSite=None; Secure")
                .with_header(SET_COOKIE, "unspecified=1")
                .with_header(SET_COOKIE, "none_insecure=1; SameSite=None"),
            ("wpt.test", "/out") => HttpResponse::new(StatusCode::FOUND)
                .with_header(LOCATION, "https://other.test/bounce"),
            ("other.test", "/bounce") => HttpResponse::new(StatusCode::FOUND)
                .with_header(LOCATION, "https://wpt.test/echo"),
            ("other.test", "/bounce-307") => HttpResponse::new(StatusCode::TEMPORARY_REDIRECT)
                .with_header(LOCATION, "https://wpt.test/echo"),
            (_, "/echo") => HttpResponse::new(StatusCode::OK).with_body(cookies),
            _ => HttpResponse::new(StatusCode::NOT_FOUND),
        };
        Ok(resp)
    });
    Client::builder(transport).cookie_store(jar).build()
}

async fn echo(client: &Client, method: Method, url: &str) -> String {
    client
        .request(method, url)
        .send()
        .await
        .unwrap()
        .text()
        .unwrap()
}

async fn seeded() -> (Client, Arc<CookieMonster>) {
    let jar = Arc::new(CookieMonster::new());
    let client = wpt_client(Arc::clone(&jar));
    let resp = client.get("https://wpt.test/set").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    (client, jar)
}

#[tokio::test]
async fn test_insecure_none_is_never_stored() {
    let (_client, jar) = seeded().await;
    let stored: Vec<String> = jar.all().into_iter().map(|c| c.name).collect();
    assert_eq!(stored, vec!["strict", "lax", "none", "unspecified"]);
}

#[tokio::test]
async fn test_same_host_fetch_gets_everything() {
    let (client, _jar) = seeded().await;
    assert_eq!(
        echo(&client, Method::GET, "https://wpt.test/echo").await,
        "strict=1; lax=1; none=1; unspecified=1"
    );
}

#[tokio::test]
async fn test_cross_site_fetch_gets_nothing() {
    let (client, _jar) = seeded().await;
    assert_eq!(echo(&client, Method::GET, "https://other.test/echo").await, "");
}

#[tokio::test]
async fn test_cross_site_hop_drops_strict() {
    let (client, _jar) = seeded().await;
    // wpt.test -> other.test -> wpt.test: back on the origin, but tainted.
    assert_eq!(
        echo(&client, Method::GET, "https://wpt.test/out").await,
        "lax=1; none=1; unspecified=1"
    );
    // Chain that starts cross-site.
    assert_eq!(
        echo(&client, Method::GET, "https://other.test/bounce").await,
        "lax=1; none=1; unspecified=1"
    );
}

#[tokio::test]
async fn test_cross_site_unsafe_method_only_gets_none() {
    let (client, _jar) = seeded().await;
    assert_eq!(
        echo(&client, Method::POST, "https://other.test/bounce-307").await,
        "none=1"
    );
}

#[tokio::test]
async fn test_insecure_request_gets_no_secure_cookies() {
    let (client, _jar) = seeded().await;
    assert_eq!(
        echo(&client, Method::GET, "http://wpt.test/echo").await,
        "strict=1; lax=1; unspecified=1"
    );
}

#[test]
fn test_retrieval_gates() {
    let jar = CookieMonster::new();
    let url = Url::parse("https://wpt.test/").unwrap();
    for line in [
        "strict=1; SameSite=Strict",
        "lax=1; SameSite=Lax",
        "none=1; SameSite=None; Secure",
    ] {
        jar.parse_and_save_cookie(&url, line).unwrap();
    }

    let header = |same_site, secure, safe| {
        jar.cookie_header(&CookieRetrieval::for_http_request(
            url.clone(),
            same_site,
            secure,
            safe,
        ))
    };

    assert_eq!(header(true, true, false).as_deref(), Some("strict=1; lax=1; none=1"));
    assert_eq!(header(false, true, true).as_deref(), Some("lax=1; none=1"));
    assert_eq!(header(false, true, false).as_deref(), Some("none=1"));
    assert_eq!(header(false, false, false), None);
    assert_eq!(header(true, false, true).as_deref(), Some("strict=1; lax=1"));
}
