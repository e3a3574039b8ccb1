use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use chrono::{TimeZone, Utc};
use hugard_engine::{
    db_types::{ChargeRecord, ChargeStatus, PayerTotal, SettledPayment},
    ChargeArtifacts,
    ChargeIssuerApi,
    Cents,
    NoArtifacts,
    ProviderError,
    ReportingApi,
};
use serde_json::json;

use super::{
    helpers::{member, post_command},
    mocks::{MockLedger, MockProvider},
};
use crate::{
    errors::{GENERIC_FAILURE, NOT_ALLOWED},
    member_directory::MemberDirectory,
    messages::NO_PAYMENTS_YET,
    qr_codes::QrCodeStore,
    routes::{about, ping, qr_code, HistoryRoute, MetricsRoute, PayRoute},
};

fn pay_config(ledger: MockLedger, provider: MockProvider) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = ChargeIssuerApi::new(ledger, provider, NoArtifacts);
        cfg.service(PayRoute::<MockLedger, MockProvider, NoArtifacts>::new())
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(MemberDirectory::new()));
    }
}

fn reporting_config(ledger: MockLedger, directory: MemberDirectory) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(HistoryRoute::<MockLedger>::new())
            .service(MetricsRoute::<MockLedger>::new())
            .app_data(web::Data::new(ReportingApi::new(ledger)))
            .app_data(web::Data::new(directory));
    }
}

fn charge_record(invoice_ref: &str, cents: i64) -> ChargeRecord {
    ChargeRecord {
        id: 1,
        payer_id: "7".into(),
        amount: Cents::from(cents),
        invoice_ref: invoice_ref.into(),
        status: ChargeStatus::New,
        created_at: Utc::now(),
    }
}

fn provider_for(invoice_ref: &'static str) -> MockProvider {
    let mut provider = MockProvider::new();
    provider.expect_create_charge().times(1).returning(move |_, _| Ok(invoice_ref.to_string()));
    provider.expect_payment_url().returning(|r| format!("https://commerce.coinbase.com/pay/{r}"));
    provider
}

#[actix_web::test]
async fn ping_pongs() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_command("/ping", json!({}), |cfg| {
        cfg.service(ping);
    })
    .await
    .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().starts_with("Pong! "));
    assert_eq!(body["ephemeral"], true);
}

#[actix_web::test]
async fn about_embed() {
    let (status, body) = post_command("/about", json!({}), |cfg| {
        cfg.service(about);
    })
    .await
    .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["embed"]["title"], "Hi there, I'm Hugard");
    assert_eq!(body["embed"]["colour"], 0x9B32CD);
}

#[actix_web::test]
async fn pay_issues_a_charge() {
    let _ = env_logger::try_init().ok();
    let mut ledger = MockLedger::new();
    ledger
        .expect_create()
        .times(1)
        .withf(|c| c.payer_id == "7" && c.amount == Cents::from(500) && c.invoice_ref == "CHG1")
        .returning(|c| Ok(charge_record(&c.invoice_ref, c.amount.value())));
    let body = json!({ "member": member("7", "alice", false), "amount": "5" });
    let (status, body) =
        post_command("/pay", body, pay_config(ledger, provider_for("CHG1"))).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ephemeral"], true);
    let embed = &body["embed"];
    assert_eq!(embed["title"], "Click me or scan the QR code below!");
    assert_eq!(embed["description"], "Amount due: $5.00!");
    assert_eq!(embed["url"], "https://commerce.coinbase.com/pay/CHG1");
    assert_eq!(embed["image_url"], "/qrcodes/CHG1");
}

#[actix_web::test]
async fn pay_rounds_and_takes_absolute_value() {
    let mut ledger = MockLedger::new();
    ledger
        .expect_create()
        .withf(|c| c.amount == Cents::from(1235))
        .returning(|c| Ok(charge_record(&c.invoice_ref, c.amount.value())));
    let body = json!({ "member": member("7", "alice", false), "amount": -12.345 });
    let (status, body) =
        post_command("/pay", body, pay_config(ledger, provider_for("CHG2"))).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["embed"]["description"], "Amount due: $12.35!");
}

#[actix_web::test]
async fn pay_below_minimum() {
    let mut ledger = MockLedger::new();
    ledger.expect_create().never();
    let mut provider = MockProvider::new();
    provider.expect_create_charge().never();
    let body = json!({ "member": member("7", "alice", false), "amount": "0.999" });
    let (status, body) = post_command("/pay", body, pay_config(ledger, provider)).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "The minimum payment is $1.00");
}

#[actix_web::test]
async fn pay_with_garbage_amount() {
    let mut provider = MockProvider::new();
    provider.expect_create_charge().never();
    let body = json!({ "member": member("7", "alice", false), "amount": "five dollars" });
    let (status, _) =
        post_command("/pay", body, pay_config(MockLedger::new(), provider)).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn pay_when_provider_is_down() {
    let mut ledger = MockLedger::new();
    ledger.expect_create().never();
    let mut provider = MockProvider::new();
    provider
        .expect_create_charge()
        .returning(|_, _| Err(ProviderError::Unavailable("401 Unauthorized: invalid api key".into())));
    let body = json!({ "member": member("7", "alice", false), "amount": "10" });
    let (status, body) = post_command("/pay", body, pay_config(ledger, provider)).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], GENERIC_FAILURE);
}

#[actix_web::test]
async fn history_without_payments() {
    let mut ledger = MockLedger::new();
    ledger.expect_history().returning(|_| Ok(vec![]));
    let body = json!({ "member": member("7", "alice", false) });
    let (status, body) =
        post_command("/history", body, reporting_config(ledger, MemberDirectory::new())).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ephemeral"], true);
    assert_eq!(body["embed"]["description"], "You haven't made any payments yet.");
}

#[actix_web::test]
async fn history_with_payments() {
    let mut ledger = MockLedger::new();
    ledger.expect_history().withf(|id| id == "7").returning(|_| {
        Ok(vec![SettledPayment {
            amount: Cents::from(500),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        }])
    });
    let body = json!({ "member": member("7", "alice", false) });
    let (status, body) =
        post_command("/history", body, reporting_config(ledger, MemberDirectory::new())).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["embed"]["title"], "My Payment History");
    assert_eq!(body["embed"]["description"], "\nPaid $5.00 on 2024-05-01 at 12:30:00\n\nTotal Paid: $5.00");
}

#[actix_web::test]
async fn metrics_requires_permission() {
    let mut ledger = MockLedger::new();
    ledger.expect_leaderboard().never();
    ledger.expect_history().never();
    let body = json!({ "member": member("7", "alice", false) });
    let (status, body) =
        post_command("/metrics", body, reporting_config(ledger, MemberDirectory::new())).await.expect("Request failed");
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], NOT_ALLOWED);
    assert_eq!(body["ephemeral"], true);
}

#[actix_web::test]
async fn metrics_for_the_community() {
    let mut ledger = MockLedger::new();
    ledger.expect_leaderboard().returning(|| {
        Ok(vec![
            PayerTotal { payer_id: "8".into(), total: Cents::from(2000) },
            PayerTotal { payer_id: "7".into(), total: Cents::from(500) },
        ])
    });
    let directory = MemberDirectory::new();
    directory
        .remember(&crate::data_objects::Member {
            id: "8".into(),
            display_name: "Big $pender".into(),
            can_view_audit_log: false,
        })
        .await;
    let body = json!({ "member": member("1", "owner", true), "community_name": "The Den" });
    let (status, body) =
        post_command("/metrics", body, reporting_config(ledger, directory)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ephemeral"], false);
    assert_eq!(body["embed"]["title"], "Hugard's Incredible Statistics For The Den");
    assert_eq!(
        body["embed"]["description"],
        "\nTotal Income: $25.00\nAverage Income: $12.50\nTotal Payers: 2\nHighest Paying Member: Big pender ($20.00)"
    );
}

#[actix_web::test]
async fn metrics_without_payments() {
    let mut ledger = MockLedger::new();
    ledger.expect_leaderboard().returning(|| Ok(vec![]));
    let body = json!({ "member": member("1", "owner", true) });
    let (status, body) =
        post_command("/metrics", body, reporting_config(ledger, MemberDirectory::new())).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["embed"]["description"], NO_PAYMENTS_YET);
}

#[actix_web::test]
async fn metrics_for_one_member() {
    let mut ledger = MockLedger::new();
    ledger.expect_leaderboard().never();
    ledger.expect_history().withf(|id| id == "9").returning(|_| Ok(vec![]));
    let body = json!({ "member": member("1", "owner", true), "target": member("9", "<script>", false) });
    let (status, body) =
        post_command("/metrics", body, reporting_config(ledger, MemberDirectory::new())).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["embed"]["title"], "Total Paid From script");
    assert_eq!(body["embed"]["description"], "script hasn't made any payments yet.");
}

#[actix_web::test]
async fn qr_codes_are_served_until_removed() {
    let dir = tempfile::tempdir().unwrap();
    let store = QrCodeStore::new(dir.path());
    store.render("CHG1", "https://commerce.coinbase.com/pay/CHG1").await.unwrap();
    let app = test::init_service(App::new().app_data(web::Data::new(store.clone())).service(qr_code)).await;

    let req = TestRequest::get().uri("/qrcodes/CHG1").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("content-type").unwrap(), "image/svg+xml");
    let body = res.into_body().try_into_bytes().unwrap();
    assert!(String::from_utf8_lossy(&body).contains("<svg"));

    store.remove("CHG1").await.unwrap();
    let req = TestRequest::get().uri("/qrcodes/CHG1").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
