use crate::error::{ApiResult, ErrorBody};
use crate::extract::{ApiJson, ApiPath};
use crate::responses::{LoginRes, MessageRes, UserRes};
use crate::AppState;
use api_shared::{LoginReq, SignupReq};
use axum::extract::State;
use axum::Json;
use lab_core::UserService;

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Login successful", body = LoginRes),
        (status = 400, description = "Missing fields, or invalid username or password", body = ErrorBody)
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginReq>,
) -> ApiResult<Json<LoginRes>> {
    let user = UserService::new(state.db).login(req).await?;
    Ok(Json(LoginRes {
        success: true,
        message: "Login successful".into(),
        user,
    }))
}

#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignupReq,
    responses(
        (status = 200, description = "Account created", body = MessageRes),
        (status = 400, description = "Missing username or password", body = ErrorBody),
        (status = 409, description = "Username already exists", body = ErrorBody)
    )
)]
pub(crate) async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupReq>,
) -> ApiResult<Json<MessageRes>> {
    UserService::new(state.db).signup(req).await?;
    Ok(Json(MessageRes::ok("Account created successfully")))
}

#[utoipa::path(
    get,
    path = "/api/users/{userId}",
    params(("userId" = i64, Path, description = "Numeric user id")),
    responses(
        (status = 200, description = "User profile", body = UserRes),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub(crate) async fn get_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Json<UserRes>> {
    let user = UserService::new(state.db).get(user_id).await?;
    Ok(Json(UserRes {
        success: true,
        user,
    }))
}
