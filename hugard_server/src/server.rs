use std::time::Duration;

use actix_web::{
    dev::{Server, Service},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpServer,
};
use futures::{
    future::{ok, LocalBoxFuture},
    FutureExt,
};
use hugard_engine::{
    events::{EventHandlers, EventHooks},
    ChargeIssuerApi,
    ReportingApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    helpers::is_from_community,
    integrations::coinbase::CoinbaseProvider,
    member_directory::MemberDirectory,
    middleware::GatewaySignature,
    notifier::{register_settlement_notifier, WebhookNotifier},
    qr_codes::QrCodeStore,
    reconciliation_worker::start_reconciliation_worker,
    routes::{about, health, ping, qr_code, HistoryRoute, MetricsRoute, PayRoute},
};

/// Wires everything together: ledger, provider, QR code store, settlement notifications, the reconciliation worker
/// and finally the HTTP server. Returns when the server shuts down.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let provider = CoinbaseProvider::new(config.coinbase.clone())
        .map_err(|e| ServerError::InitializeError(format!("Could not create the Coinbase client. {e}")))?;
    let qr_codes = QrCodeStore::new(&config.qr_code_dir);
    qr_codes.init().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let directory = MemberDirectory::new();
    let notifier = WebhookNotifier::new(config.notify_webhook_url.clone(), &config.owner_id, config.coinbase.timeout)
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.notify_webhook_url.is_none() {
        warn!("🪛️ HUGARD_NOTIFY_WEBHOOK_URL is not set. Settlement notifications will only be logged.");
    }

    let mut hooks = EventHooks::default();
    register_settlement_notifier(&mut hooks, notifier, directory.clone());
    let handlers = EventHandlers::new(128, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;

    let _worker = start_reconciliation_worker(
        db.clone(),
        provider.clone(),
        qr_codes.clone(),
        producers,
        config.poll_interval,
    );
    let srv = create_server_instance(config, db, provider, qr_codes, directory)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Malformed command bodies (including unparseable amounts) are reported back to the member as a `400`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().limit(16 * 1024).error_handler(|err, _req| {
        debug!("💻️ Invalid command body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    provider: CoinbaseProvider,
    qr_codes: QrCodeStore,
    directory: MemberDirectory,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let issuer_api = ChargeIssuerApi::new(db.clone(), provider.clone(), qr_codes.clone());
        let reporting_api = ReportingApi::new(db.clone());
        let community_id = config.community_id.clone();
        let commands_scope = web::scope("/commands")
            .wrap(GatewaySignature::new(config.hmac_secret.clone(), config.hmac_checks))
            .wrap_fn(move |req, srv| -> LocalBoxFuture<'static, _> {
                if is_from_community(req.headers(), &community_id) {
                    srv.call(req).boxed_local()
                } else {
                    ok(req.error_response(ServerError::UnknownCommunity)).boxed_local()
                }
            })
            .service(ping)
            .service(about)
            .service(PayRoute::<SqliteDatabase, CoinbaseProvider, QrCodeStore>::new())
            .service(HistoryRoute::<SqliteDatabase>::new())
            .service(MetricsRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("hugard::access_log"))
            .app_data(json_config())
            .app_data(web::Data::new(issuer_api))
            .app_data(web::Data::new(reporting_api))
            .app_data(web::Data::new(qr_codes.clone()))
            .app_data(web::Data::new(directory.clone()))
            .service(health)
            .service(qr_code)
            .service(commands_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
