use actix_web::{
    error::JsonPayloadError, get, post, web, Error, HttpRequest, HttpResponse,
};
use tokio::sync::RwLock;
use tracing::warn;

use crate::directory::Directory;
use crate::error::{LedgerError, Result};
use crate::schemas::{Iou, NewUser, UsersFilter, UsersJson};

pub type SharedDirectory = web::Data<RwLock<Directory>>;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .content_type_required(false)
            .error_handler(json_error),
    )
    .service(list_users)
    .service(add_user)
    .service(add_iou);
}

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> Error {
    warn!(path = req.path(), %err, "rejected malformed payload");
    LedgerError::MalformedRequest(err.to_string()).into()
}

/// Every user, or only those named in an optional `{"users": [...]}` body.
#[get("/users")]
async fn list_users(directory: SharedDirectory, body: web::Bytes) -> Result<HttpResponse> {
    let filter = parse_filter(&body)?;
    let directory = directory.read().await;
    let users = match filter {
        Some(filter) => directory.select_users(&filter.users),
        None => directory.all_users(),
    };
    Ok(HttpResponse::Ok().json(UsersJson { users }))
}

fn parse_filter(body: &[u8]) -> Result<Option<UsersFilter>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map(Some).map_err(|err| {
        warn!(%err, "rejected malformed users filter");
        LedgerError::MalformedRequest(format!(
            "could not parse 'users' key of JSON payload as array: {err}"
        ))
    })
}

#[post("/add")]
async fn add_user(directory: SharedDirectory, json: web::Json<NewUser>) -> Result<HttpResponse> {
    let name = json.into_inner().user;
    let user = directory
        .write()
        .await
        .create_user(&name)
        .inspect_err(|err| warn!(%err, "rejected new user"))?;
    Ok(HttpResponse::Created().json(user))
}

#[post("/iou")]
async fn add_iou(directory: SharedDirectory, json: web::Json<Iou>) -> Result<HttpResponse> {
    let iou = json.into_inner();
    let users = directory
        .write()
        .await
        .record_transaction(&iou.lender, &iou.borrower, iou.amount)
        .inspect_err(|err| warn!(%err, "rejected IOU"))?;
    Ok(HttpResponse::Ok().json(UsersJson { users }))
}

pub async fn unknown_route(req: HttpRequest) -> Result<HttpResponse> {
    Err(LedgerError::UnknownRoute(format!(
        "{} {}",
        req.method(),
        req.path()
    )))
}
