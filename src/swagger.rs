use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::submit_user_data,
        handlers::auth::verify_otp,
        handlers::auth::resend_otp,
        handlers::admin::get_all_users,
        handlers::health::health,
    ),
    components(
        schemas(
            User,
            UserData,
            UserProfile,
            SubmitUserDataRequest,
            VerifyOtpRequest,
            ResendOtpRequest,
            AuthFlowResponse,
        )
    ),
    tags(
        (name = "auth", description = "Phone-number OTP authentication"),
        (name = "admin", description = "Internal user listing"),
        (name = "health", description = "Liveness probe")
    ),
    info(
        title = "ListNow Backend API",
        version = "1.0.0",
        description = "Phone-number authentication backend: OTP issuance over SMS and verification"
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
