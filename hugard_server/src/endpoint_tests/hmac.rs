use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use hugard_common::Secret;

use crate::{helpers::calculate_hmac, middleware::GatewaySignature, routes::ping};

const BODY: &str = r#"{"member":{"id":"1","display_name":"alice"}}"#;

async fn signed_ping(signature: Option<&str>, enabled: bool) -> Result<StatusCode, String> {
    let hmac = GatewaySignature::new(Secret::new("test-secret".into()), enabled);
    let app = App::new().service(web::scope("/commands").wrap(hmac).service(ping));
    let service = test::init_service(app).await;
    let mut req =
        TestRequest::post().uri("/commands/ping").insert_header(("content-type", "application/json")).set_payload(BODY);
    if let Some(signature) = signature {
        req = req.insert_header(("X-Hugard-Hmac-Sha256", signature));
    }
    let res = test::try_call_service(&service, req.to_request()).await.map_err(|e| e.to_string())?;
    Ok(res.status())
}

#[actix_web::test]
async fn signed_requests_pass() {
    let signature = calculate_hmac("test-secret", BODY.as_bytes());
    assert_eq!(signature, "AjlWQmFF81ZVMTcJ8ou5kcSawC2ZswF3s7izAbuIt2A=");
    let status = signed_ping(Some(&signature), true).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn unsigned_requests_are_rejected() {
    let err = signed_ping(None, true).await.expect_err("Expected error");
    assert_eq!(err, "No HMAC signature found.");
}

#[actix_web::test]
async fn forged_requests_are_rejected() {
    let signature = calculate_hmac("wrong-secret", BODY.as_bytes());
    let err = signed_ping(Some(&signature), true).await.expect_err("Expected error");
    assert_eq!(err, "Invalid HMAC signature.");
}

#[actix_web::test]
async fn checks_can_be_disabled() {
    let status = signed_ping(None, false).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}
