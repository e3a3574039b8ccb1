use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use log::debug;
use serde_json::Value;

use crate::server::json_config;

/// Posts `body` as JSON to `path` on an app set up by `configure`. Returns the status and the parsed JSON reply.
pub async fn post_command<F>(path: &str, body: Value, configure: F) -> Result<(StatusCode, Value), String>
where F: FnOnce(&mut ServiceConfig) {
    let req = TestRequest::post().uri(path).set_json(&body).to_request();
    let app = App::new().app_data(json_config()).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request to {path}");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let bytes = res.into_body().try_into_bytes().map_err(|_| "Could not read body".to_string())?;
    let json = serde_json::from_slice(&bytes).map_err(|e| format!("Reply was not JSON. {e}"))?;
    Ok((status, json))
}

pub fn member(id: &str, name: &str, can_view_audit_log: bool) -> Value {
    serde_json::json!({ "id": id, "display_name": name, "can_view_audit_log": can_view_audit_log })
}
