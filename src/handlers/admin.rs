use crate::services::UserService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

// No auth guard: this listing is for internal debugging and must not be
// exposed on a public deployment.
#[utoipa::path(
    get,
    path = "/get-all-users",
    tag = "admin",
    responses(
        (status = 200, description = "All users, OTP fields omitted"),
        (status = 500, description = "Database failure")
    )
)]
pub async fn get_all_users(user_service: web::Data<UserService>) -> Result<HttpResponse> {
    match user_service.get_all_users().await {
        Ok(users) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "count": users.len(),
            "users": users
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/get-all-users", web::get().to(get_all_users));
}
