/*
 * Responsibility
 * - GET /me: guarded; echoes the authenticated subject
 * - GET /greeting: public; personalized when a valid token is present
 */
use crate::{
    api::v1::{
        dto::session::{GreetingResponse, MeResponse},
        extractors::{AuthCtxExtractor, MaybeSubject},
    },
    response::ApiResponse,
};

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> ApiResponse<MeResponse> {
    ApiResponse::ok(MeResponse {
        handle: ctx.handle().map(str::to_string),
        expires_at: ctx.claims.exp,
        subject: ctx.subject,
    })
}

pub async fn greeting(MaybeSubject(subject): MaybeSubject) -> ApiResponse<GreetingResponse> {
    let response = match subject {
        Some(subject) => GreetingResponse {
            message: format!("hello, {subject}"),
            authenticated: true,
        },
        None => GreetingResponse {
            message: "hello, guest".to_string(),
            authenticated: false,
        },
    };
    ApiResponse::ok(response)
}
