//! E2E tests: explore page.

use std::sync::Arc;

use actix_web::test;
use botnest_lib::db::MemoryStore;

use super::test_helpers::*;

async fn explore_html<S>(app: &S) -> (u16, String, String)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::get().uri("/explore").to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = test::read_body(resp).await;
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[actix_rt::test]
async fn test_explore_empty() {
    let app = create_test_app(local_service(Arc::new(MemoryStore::new()))).await;

    let (status, content_type, html) = explore_html(&app).await;

    assert_eq!(status, 200);
    assert!(content_type.starts_with("text/html"));
    assert!(html.contains("<title>Explore Bots</title>"));
    assert!(html.contains("No bots found yet."));
}

/// Every bot gets a card, including ones past the list cap.
#[actix_rt::test]
async fn test_explore_lists_every_bot() {
    let app = create_test_app(local_service(Arc::new(MemoryStore::new()))).await;
    for i in 0..11 {
        create_bot(&app, &format!("Bot \"{}\"", i)).await;
    }

    let (_, _, html) = explore_html(&app).await;

    assert!(html.contains(r#"id="bot-10""#));
    assert!(html.contains(r#"data-description="Bot &quot;0&quot;""#));
    assert!(html.contains(r#"<p>Bot "0"</p>"#));
    assert!(html.contains("const API_KEY"));
    assert!(!html.contains("No bots found yet."));
}

/// Store failure renders the error heading with status 200.
#[actix_rt::test]
async fn test_explore_store_failure() {
    let app = create_test_app(local_service(Arc::new(DownStore))).await;

    let (status, _, html) = explore_html(&app).await;

    assert_eq!(status, 200);
    assert_eq!(
        html,
        r#"<h1 style="color:red;">Error fetching bots: Invalid API key</h1>"#
    );
}
