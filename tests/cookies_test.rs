use cookienet::cookies::canonical_cookie::{CanonicalCookie, SameSite};
use cookienet::cookies::error::CookieRejection;
use cookienet::cookies::monster::{CookieMonster, CookieStoreConfig};
use cookienet::cookies::persistence::{load_cookies, save_cookies};
use cookienet::cookies::retrieval::CookieRetrieval;
use time::{Duration, OffsetDateTime};
use url::Url;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn names(cookies: &[CanonicalCookie]) -> Vec<&str> {
    cookies.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn test_parse_and_save() {
    let store = CookieMonster::new();
    let url = url("https://example.com/foo");
    store.parse_and_save_cookie(&url, "foo=bar; Path=/").unwrap();

    let cookies = store.get_cookies_for_url(&url);
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies[0].name, "foo");
    assert_eq!(cookies[0].value, "bar");
    assert_eq!(cookies[0].path, "/");
}

#[test]
fn test_domain_matching() {
    let store = CookieMonster::new();
    let setter = url("https://a.example.com");

    store.parse_and_save_cookie(&setter, "host=val").unwrap();
    store
        .parse_and_save_cookie(&setter, "domain=val; Domain=example.com")
        .unwrap();

    let cookies = store.get_cookies_for_url(&setter);
    assert_eq!(names(&cookies), vec!["host", "domain"]);

    // Sibling subdomain only sees the domain cookie.
    let sibling = store.get_cookies_for_url(&url("https://b.example.com/"));
    assert_eq!(names(&sibling), vec!["domain"]);

    // The apex sees the domain cookie too.
    let apex = store.get_cookies_for_url(&url("https://example.com/"));
    assert_eq!(names(&apex), vec!["domain"]);

    // Unrelated hosts see nothing.
    assert!(store.get_cookies_for_url(&url("https://example.org/")).is_empty());
    assert!(store.get_cookies_for_url(&url("https://notexample.com/")).is_empty());
}

#[test]
fn test_cross_domain_planting_rejected() {
    let store = CookieMonster::new();
    let setter = url("https://evil.com/");
    assert_eq!(
        store.parse_and_save_cookie(&setter, "x=1; Domain=example.com"),
        Err(CookieRejection::DomainMismatch)
    );
    assert_eq!(
        store.parse_and_save_cookie(&setter, "x=1; Domain=com"),
        Err(CookieRejection::PublicSuffix)
    );
    assert_eq!(store.total_cookie_count(), 0);
}

#[test]
fn test_path_matching() {
    let store = CookieMonster::new();
    let url = url("https://example.com/foo/bar");

    store.parse_and_save_cookie(&url, "root=val; Path=/").unwrap();
    store.parse_and_save_cookie(&url, "foo=val; Path=/foo").unwrap();
    store.parse_and_save_cookie(&url, "baz=val; Path=/baz").unwrap();

    let cookies = store.get_cookies_for_url(&url);
    // Longest path first.
    assert_eq!(names(&cookies), vec!["foo", "root"]);

    let foobar = store.get_cookies_for_url(&self::url("https://example.com/foobar"));
    assert_eq!(names(&foobar), vec!["root"]);
}

#[test]
fn test_default_path() {
    let store = CookieMonster::new();
    store
        .parse_and_save_cookie(&url("https://example.com/docs/page.html"), "d=1")
        .unwrap();
    store
        .parse_and_save_cookie(&url("https://example.com/docs/page.html"), "e=1; Path=relative")
        .unwrap();

    let all = store.all();
    assert!(all.iter().all(|c| c.path == "/docs"));
}

#[test]
fn test_secure_flag() {
    let store = CookieMonster::new();
    let https = url("https://example.com/");
    store.parse_and_save_cookie(&https, "s=1; Secure").unwrap();
    store.parse_and_save_cookie(&https, "p=1").unwrap();

    assert_eq!(names(&store.get_cookies_for_url(&https)), vec!["s", "p"]);
    assert_eq!(
        names(&store.get_cookies_for_url(&url("http://example.com/"))),
        vec!["p"]
    );
}

#[test]
fn test_same_site_none_requires_secure() {
    let store = CookieMonster::new();
    let https = url("https://example.com/");
    assert_eq!(
        store.parse_and_save_cookie(&https, "n=1; SameSite=None"),
        Err(CookieRejection::NoneRequiresSecure)
    );

    // Programmatic insertion follows the same rule.
    let cookie = CanonicalCookie::new(
        "n".into(),
        "1".into(),
        "example.com".into(),
        "/".into(),
        OffsetDateTime::now_utc(),
        None,
    )
    .with_same_site(SameSite::NoRestriction);
    assert_eq!(
        store.set_canonical_cookie(cookie, true),
        Err(CookieRejection::NoneRequiresSecure)
    );
    assert_eq!(store.total_cookie_count(), 0);
}

#[test]
fn test_secure_overwrite_protection() {
    let store = CookieMonster::new();
    store
        .parse_and_save_cookie(&url("https://example.com/"), "id=secure; Secure; Path=/")
        .unwrap();

    let result = store.parse_and_save_cookie(&url("http://example.com/"), "id=plain; Path=/");
    assert_eq!(result, Err(CookieRejection::OverwriteSecure));

    let cookies = store.get_cookies_for_url(&url("https://example.com/"));
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies[0].value, "secure");

    // A secure channel may downgrade it.
    store
        .parse_and_save_cookie(&url("https://example.com/"), "id=plain; Path=/")
        .unwrap();
    assert_eq!(store.all()[0].value, "plain");
    assert!(!store.all()[0].secure);
}

#[test]
fn test_overwrite_keeps_position() {
    let store = CookieMonster::new();
    let u = url("https://example.com/");
    store.parse_and_save_cookie(&u, "a=1").unwrap();
    store.parse_and_save_cookie(&u, "b=1").unwrap();
    store.parse_and_save_cookie(&u, "a=2").unwrap();

    let retrieval = CookieRetrieval::for_http_request(u, true, true, true);
    assert_eq!(store.cookie_header(&retrieval).as_deref(), Some("a=2; b=1"));
    assert_eq!(store.total_cookie_count(), 2);
}

#[test]
fn test_store_is_idempotent() {
    let store = CookieMonster::new();
    let u = url("https://example.com/");
    store.parse_and_save_cookie(&u, "a=1; Path=/").unwrap();
    store.parse_and_save_cookie(&u, "a=1; Path=/").unwrap();
    assert_eq!(store.total_cookie_count(), 1);
}

#[test]
fn test_expiry_in_past_deletes() {
    let store = CookieMonster::new();
    let u = url("https://example.com/");
    store.parse_and_save_cookie(&u, "gone=1; Path=/").unwrap();
    store.parse_and_save_cookie(&u, "kept=1; Path=/").unwrap();

    store.parse_and_save_cookie(&u, "gone=; Max-Age=0; Path=/").unwrap();
    assert_eq!(names(&store.all()), vec!["kept"]);

    store
        .parse_and_save_cookie(&u, "kept=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/")
        .unwrap();
    assert_eq!(store.total_cookie_count(), 0);

    // Deleting something absent stores nothing.
    store.parse_and_save_cookie(&u, "never=1; Max-Age=-5").unwrap();
    assert_eq!(store.total_cookie_count(), 0);
}

#[test]
fn test_max_age_overrides_expires() {
    let store = CookieMonster::new();
    let u = url("https://example.com/");
    store
        .parse_and_save_cookie(
            &u,
            "m=1; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=3600",
        )
        .unwrap();

    let cookie = &store.all()[0];
    let expiry = cookie.expiration_time.unwrap();
    assert!(expiry > OffsetDateTime::now_utc() + Duration::minutes(59));
    assert!(cookie.is_persistent());
}

#[test]
fn test_unparseable_expires_ignored() {
    let store = CookieMonster::new();
    store
        .parse_and_save_cookie(&url("https://example.com/"), "s=1; Expires=not-a-date")
        .unwrap();
    assert!(!store.all()[0].is_persistent());
}

#[test]
fn test_size_limits() {
    let config = CookieStoreConfig {
        max_name_value_size: 16,
        max_attribute_value_size: 8,
        ..Default::default()
    };
    let store = CookieMonster::with_config(config);
    let u = url("https://example.com/");

    assert_eq!(
        store.parse_and_save_cookie(&u, "name=abcdefghijklmnop"),
        Err(CookieRejection::TooLarge)
    );
    assert_eq!(
        store.parse_and_save_cookie(&u, "a=1; Path=/aaaaaaaaaaaaaaa"),
        Err(CookieRejection::TooLarge)
    );
    assert!(store.parse_and_save_cookie(&u, "a=1; Path=/").is_ok());
}

#[test]
fn test_per_domain_limit_evicts_least_recently_used() {
    let config = CookieStoreConfig {
        max_cookies_per_domain: 3,
        ..Default::default()
    };
    let store = CookieMonster::with_config(config);
    let u = url("https://example.com/");
    for name in ["a", "b", "c"] {
        store.parse_and_save_cookie(&u, &format!("{name}=1")).unwrap();
    }
    store.parse_and_save_cookie(&u, "d=1").unwrap();

    assert_eq!(store.total_cookie_count(), 3);
    assert_eq!(names(&store.all()), vec!["b", "c", "d"]);
}

#[test]
fn test_global_limit() {
    let config = CookieStoreConfig {
        max_cookies_total: 2,
        ..Default::default()
    };
    let store = CookieMonster::with_config(config);
    store.parse_and_save_cookie(&url("https://a.test/"), "a=1").unwrap();
    store.parse_and_save_cookie(&url("https://b.test/"), "b=1").unwrap();
    store.parse_and_save_cookie(&url("https://c.test/"), "c=1").unwrap();

    assert_eq!(store.total_cookie_count(), 2);
    assert_eq!(names(&store.all()), vec!["b", "c"]);
}

#[test]
fn test_http_only_hidden_from_non_http() {
    let store = CookieMonster::new();
    let u = url("https://example.com/");
    store.parse_and_save_cookie(&u, "h=1; HttpOnly").unwrap();
    store.parse_and_save_cookie(&u, "v=1").unwrap();

    let script = store.get_cookies(&CookieRetrieval::for_non_http(u.clone()));
    assert_eq!(names(&script), vec!["v"]);

    let replacement = CanonicalCookie::new(
        "h".into(),
        "2".into(),
        "example.com".into(),
        "/".into(),
        OffsetDateTime::now_utc(),
        None,
    );
    assert_eq!(
        store.set_cookie_from_non_http(replacement),
        Err(CookieRejection::HttpOnlyFromNonHttp)
    );
}

#[test]
fn test_cookie_prefixes() {
    let store = CookieMonster::new();
    let https = url("https://example.com/");
    let http = url("http://example.com/");

    assert!(store.parse_and_save_cookie(&https, "__Secure-a=1; Secure").is_ok());
    assert_eq!(
        store.parse_and_save_cookie(&https, "__Secure-b=1"),
        Err(CookieRejection::InvalidPrefix)
    );
    assert_eq!(
        store.parse_and_save_cookie(&http, "__Secure-c=1; Secure"),
        Err(CookieRejection::InvalidPrefix)
    );
    assert!(store.parse_and_save_cookie(&https, "__Host-d=1; Secure; Path=/").is_ok());
    assert_eq!(
        store.parse_and_save_cookie(&https, "__Host-e=1; Secure; Path=/; Domain=example.com"),
        Err(CookieRejection::InvalidPrefix)
    );
}

#[test]
fn test_evict_and_clear() {
    let store = CookieMonster::new();
    let u = url("https://example.com/");
    store.parse_and_save_cookie(&u, "tmp_a=1").unwrap();
    store.parse_and_save_cookie(&u, "tmp_b=1").unwrap();
    store.parse_and_save_cookie(&u, "keep=1").unwrap();

    assert_eq!(store.evict(|c| c.name.starts_with("tmp_")), 2);
    assert_eq!(names(&store.all()), vec!["keep"]);

    store.clear();
    assert_eq!(store.total_cookie_count(), 0);
}

#[test]
fn test_netscape_roundtrip_keeps_flags() {
    let store = CookieMonster::new();
    let u = url("https://www.example.com/");
    store
        .parse_and_save_cookie(&u, "d=1; Domain=example.com; Secure; Max-Age=3600")
        .unwrap();
    store.parse_and_save_cookie(&u, "h=2; HttpOnly").unwrap();

    let exported = store.export_netscape(None);
    assert!(exported.contains(".example.com\tTRUE\t/\tTRUE\t"));
    assert!(exported.contains("#HttpOnly_www.example.com\tFALSE\t/\tFALSE\t0\th\t2"));

    let restored = CookieMonster::new();
    assert_eq!(restored.import_netscape(&exported), 2);
    let cookies = restored.get_cookies_for_url(&u);
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().any(|c| c.name == "h" && c.http_only && c.host_only));
    assert!(cookies.iter().any(|c| c.name == "d" && c.secure && !c.host_only));
}

#[test]
fn test_netscape_export_filter_with_non_ascii_domain() {
    let store = CookieMonster::new();
    store
        .parse_and_save_cookie(&url("https://b.com/"), "k=v")
        .unwrap();

    let exported = store.export_netscape(Some("a\u{e9}.com"));
    assert!(!exported.contains("b.com"));
    assert!(store.export_netscape(Some("b.com")).contains("b.com\tFALSE\t/\tFALSE\t0\tk\tv"));
}

#[test]
fn test_json_persistence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cookies.json");

    let store = CookieMonster::new();
    let u = url("https://example.com/");
    store
        .parse_and_save_cookie(&u, "a=1; Max-Age=3600; SameSite=Strict")
        .unwrap();
    store.parse_and_save_cookie(&u, "b=2").unwrap();
    save_cookies(&store, &path).unwrap();

    let loaded = load_cookies(&path).unwrap();
    assert_eq!(loaded.total_cookie_count(), 2);
    let a = loaded.all().into_iter().find(|c| c.name == "a").unwrap();
    assert_eq!(a.same_site, SameSite::Strict);
    assert!(a.is_persistent());
}
