//! Wire format of the HTTP backend, checked against a one-shot local server

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use deal_board::api::{DealsApi, HttpBackend, StagesApi};
use deal_board::config::BoardConfig;
use deal_board::error::ApiError;
use deal_board::models::Deal;

/// Accept one connection, answer with `status` and `body`, and hand back the
/// raw request.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut request = String::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
            request.push_str(&line);
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }
        let mut payload = vec![0; content_length];
        reader.read_exact(&mut payload).unwrap();
        request.push_str(&String::from_utf8(payload).unwrap());

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let mut stream = reader.into_inner();
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request
    });

    (format!("http://{addr}/api"), handle)
}

fn backend(url: &str, token: Option<&str>) -> HttpBackend {
    let config = BoardConfig {
        api_url: url.to_string(),
        owner: "agent@example.com".to_string(),
        token: token.map(str::to_string),
        ..BoardConfig::default()
    };
    HttpBackend::new(&config).unwrap()
}

#[test]
fn test_list_deals_sends_owner_and_bearer_token() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"id":"d1","title":"12 Oak St","stage":"new","price":"450000"}]"#,
    );

    let deals = backend(&url, Some("secret")).list_deals("agent@example.com").unwrap();
    let request = server.join().unwrap();

    assert!(request.starts_with("GET /api/deals?owner=agent%40example.com HTTP/1.1"));
    assert!(request
        .to_lowercase()
        .contains("authorization: bearer secret"));
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0].stage.as_deref(), Some("new"));
    assert_eq!(deals[0].price, Some(450_000.0));
}

#[test]
fn test_list_deals_skips_malformed_records() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"id":"d1","title":"12 Oak St","stage":"new"},{"title":"no id"},{"id":"d2","stage":""}]"#,
    );

    let deals = backend(&url, None).list_deals("agent@example.com").unwrap();
    let request = server.join().unwrap();

    assert!(!request.to_lowercase().contains("authorization"));
    let ids: Vec<&str> = deals.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["d1", "d2"]);
    assert_eq!(deals[1].stage, None);
}

#[test]
fn test_non_array_body_yields_empty_stage_list() {
    let (url, server) = serve_once("200 OK", r#"{"error":"not a list"}"#);

    let stages = backend(&url, None).list_stages("agent@example.com").unwrap();
    server.join().unwrap();

    assert!(stages.is_empty());
}

#[test]
fn test_update_deal_puts_full_record() {
    let (url, server) = serve_once("200 OK", "{}");
    let update = Deal::new("d1", "12 Oak St", Some("new"))
        .with_price(450_000.0)
        .to_update("contract");

    backend(&url, None).update_deal("d1", &update).unwrap();
    let request = server.join().unwrap();

    assert!(request.starts_with("PUT /api/deals/d1 HTTP/1.1"));
    let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["stage"], "contract");
    assert_eq!(json["title"], "12 Oak St");
    assert_eq!(json["price"], 450_000.0);
    assert_eq!(json["closing_date"], "");
    assert_eq!(json["commission"], 0.0);
    assert_eq!(json["property_zip"], "");
}

#[test]
fn test_update_deal_keeps_reserved_characters_inside_the_id_segment() {
    let update = Deal::new("d#1", "12 Oak St", Some("new")).to_update("contract");

    let (url, server) = serve_once("200 OK", "{}");
    backend(&url, None).update_deal("d#1", &update).unwrap();
    let request = server.join().unwrap();
    assert!(request.starts_with("PUT /api/deals/d%231 HTTP/1.1"));

    let (url, server) = serve_once("200 OK", "{}");
    backend(&url, None).update_deal("a/../../x", &update).unwrap();
    let request = server.join().unwrap();
    assert!(request.starts_with("PUT /api/deals/a%2F..%2F..%2Fx HTTP/1.1"));
}

#[test]
fn test_rejected_update_maps_to_status_error() {
    let (url, server) = serve_once("409 Conflict", r#"{"error":"stale"}"#);
    let update = Deal::new("d1", "12 Oak St", Some("new")).to_update("closed");

    let err = backend(&url, None).update_deal("d1", &update).unwrap_err();
    server.join().unwrap();

    match err {
        ApiError::Status { status, ref context } => {
            assert_eq!(status, 409);
            assert!(context.contains("d1"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(err.to_string().ends_with("HTTP 409"));
}
