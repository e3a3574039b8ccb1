//! Request handler definitions
//!
//! Define each route and its handler here. Reply formatting lives in [`crate::messages`]; keep this module neat and
//! tidy 🙏
//!
//! Every handler is async, and all I/O (ledger, provider, file system) is awaited so that a slow provider call never
//! blocks an actix worker thread.
use std::time::Instant;

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use hugard_engine::{ChargeArtifacts, ChargeIssuerApi, LedgerStore, PaymentProvider, ReportingApi};
use log::*;

use crate::{
    data_objects::{BasicCommand, CommandResponse, HistoryRequest, MetricsRequest, PayRequest},
    errors::ServerError,
    member_directory::MemberDirectory,
    messages,
    qr_codes::QrCodeStore,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Ping  ----------------------------------------------------
#[post("/ping")]
pub async fn ping(body: web::Json<BasicCommand>) -> impl Responder {
    let start = Instant::now();
    trace!("💻️ Received ping from {:?}", body.member.as_ref().map(|m| m.id.as_str()));
    HttpResponse::Ok().json(CommandResponse::message(messages::pong(start.elapsed().as_millis()), true))
}

//----------------------------------------------   About  ----------------------------------------------------
#[post("/about")]
pub async fn about() -> impl Responder {
    trace!("💻️ Received about request");
    HttpResponse::Ok().json(CommandResponse::embed(messages::about(), true))
}

//----------------------------------------------   Pay  ----------------------------------------------------
route!(pay => Post "/pay" impl LedgerStore, PaymentProvider, ChargeArtifacts);
/// Issues a new charge for the calling member and replies with the payment link and QR code.
///
/// Amounts below the minimum are rejected with a `400` and the minimum in the message. If the provider or the ledger
/// fails, the member gets a generic apology and the details are logged.
pub async fn pay<B, P, A>(
    req: HttpRequest,
    body: web::Json<PayRequest>,
    api: web::Data<ChargeIssuerApi<B, P, A>>,
    directory: web::Data<MemberDirectory>,
) -> Result<HttpResponse, ServerError>
where
    B: LedgerStore,
    P: PaymentProvider,
    A: ChargeArtifacts,
{
    let PayRequest { member, amount } = body.into_inner();
    debug!("💻️ Payment request for {amount} from {}", member.id);
    directory.remember(&member).await;
    let reference = api.issue_charge(&member.id, amount).await?;
    let qr_code_url = req
        .url_for("qr_code", [reference.invoice_ref.as_str()])
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("/qrcodes/{}", reference.invoice_ref));
    let embed = messages::payment_request(&reference, &qr_code_url);
    Ok(HttpResponse::Ok().json(CommandResponse::embed(embed, true)))
}

//----------------------------------------------   History  ----------------------------------------------------
route!(history => Post "/history" impl LedgerStore);
/// The calling member's own settled payments. Only the caller sees the reply.
pub async fn history<B: LedgerStore>(
    body: web::Json<HistoryRequest>,
    api: web::Data<ReportingApi<B>>,
    directory: web::Data<MemberDirectory>,
) -> Result<HttpResponse, ServerError> {
    let member = body.into_inner().member;
    trace!("💻️ History request from {}", member.id);
    directory.remember(&member).await;
    let history = api.payment_history(&member.id).await?;
    Ok(HttpResponse::Ok().json(CommandResponse::embed(messages::my_history(history.as_ref()), true)))
}

//----------------------------------------------   Metrics  ----------------------------------------------------
route!(metrics => Post "/metrics" impl LedgerStore);
/// Payment metrics for a single member, or for the whole community. Requires the audit log permission.
pub async fn metrics<B: LedgerStore>(
    body: web::Json<MetricsRequest>,
    api: web::Data<ReportingApi<B>>,
    directory: web::Data<MemberDirectory>,
) -> Result<HttpResponse, ServerError> {
    let MetricsRequest { member, target, community_name } = body.into_inner();
    if !member.can_view_audit_log {
        info!("💻️ {} tried to view payment metrics without permission", member.id);
        return Err(ServerError::InsufficientPermissions);
    }
    directory.remember(&member).await;
    let embed = match target {
        Some(target) => {
            trace!("💻️ {} requested the payment history of {}", member.id, target.id);
            directory.remember(&target).await;
            let history = api.payment_history(&target.id).await?;
            messages::member_history(&target.safe_name(), history.as_ref())
        },
        None => {
            trace!("💻️ {} requested community payment metrics", member.id);
            let stats = api.server_stats().await?;
            let top_payer_name = match &stats {
                Some(s) => directory.display_name(&s.top_payer.payer_id).await,
                None => String::default(),
            };
            let community = community_name.map(|s| hugard_common::sanitize_display_name(&s));
            messages::server_stats(stats.as_ref(), &top_payer_name, community.as_deref())
        },
    };
    Ok(HttpResponse::Ok().json(CommandResponse::embed(embed, false)))
}

//----------------------------------------------   QR codes  ----------------------------------------------------
#[get("/qrcodes/{invoice_ref}", name = "qr_code")]
pub async fn qr_code(path: web::Path<String>, store: web::Data<QrCodeStore>) -> Result<HttpResponse, ServerError> {
    let invoice_ref = path.into_inner();
    trace!("💻️ QR code requested for {invoice_ref}");
    let svg = store
        .fetch(&invoice_ref)
        .await
        .map_err(|e| ServerError::BackendError(e.to_string()))?
        .ok_or_else(|| ServerError::NoRecordFound(format!("No payment code for {invoice_ref}")))?;
    Ok(HttpResponse::Ok().content_type("image/svg+xml").body(svg))
}
