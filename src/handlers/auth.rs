use crate::models::*;
use crate::services::AuthService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/submit-user-data",
    tag = "auth",
    request_body = SubmitUserDataRequest,
    responses(
        (status = 200, description = "Login OTP sent", body = AuthFlowResponse),
        (status = 201, description = "User created and signup OTP sent", body = AuthFlowResponse),
        (status = 400, description = "Invalid phone number, name or email"),
        (status = 404, description = "Login for an unknown user"),
        (status = 409, description = "Signup for an existing user"),
        (status = 500, description = "SMS delivery or database failure")
    )
)]
pub async fn submit_user_data(
    auth_service: web::Data<AuthService>,
    request: web::Json<SubmitUserDataRequest>,
) -> Result<HttpResponse> {
    match auth_service.submit_user_data(request.into_inner()).await {
        Ok((response, created)) => {
            if created {
                Ok(HttpResponse::Created().json(response))
            } else {
                Ok(HttpResponse::Ok().json(response))
            }
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/verify-otp",
    tag = "auth",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "OTP verified", body = AuthFlowResponse),
        (status = 400, description = "Malformed, expired or mismatched OTP"),
        (status = 404, description = "Unknown user or no OTP pending"),
        (status = 500, description = "Database failure")
    )
)]
pub async fn verify_otp(
    auth_service: web::Data<AuthService>,
    request: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse> {
    match auth_service.verify_otp(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/resend-otp",
    tag = "auth",
    request_body = ResendOtpRequest,
    responses(
        (status = 200, description = "Fresh OTP sent", body = AuthFlowResponse),
        (status = 404, description = "Unknown user"),
        (status = 500, description = "SMS delivery or database failure")
    )
)]
pub async fn resend_otp(
    auth_service: web::Data<AuthService>,
    request: web::Json<ResendOtpRequest>,
) -> Result<HttpResponse> {
    match auth_service.resend_otp(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/submit-user-data", web::post().to(submit_user_data))
        // Legacy alias kept for older clients.
        .route("/send-otp", web::post().to(submit_user_data))
        .route("/verify-otp", web::post().to(verify_otp))
        .route("/resend-otp", web::post().to(resend_otp));
}
