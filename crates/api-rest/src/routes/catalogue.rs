//! Categories and components.

use crate::error::{ApiResult, ErrorBody};
use crate::extract::ApiJson;
use crate::responses::{CategoriesRes, ComponentsRes, CreateCategoryRes, CreateComponentRes};
use crate::AppState;
use api_shared::{CategoryReq, ComponentReq};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use lab_core::CatalogueService;

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories as label/value pairs", body = CategoriesRes),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub(crate) async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<CategoriesRes>> {
    let categories = CatalogueService::new(state.db).categories().await?;
    Ok(Json(CategoriesRes {
        success: true,
        categories,
    }))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryReq,
    responses(
        (status = 201, description = "Category created", body = CreateCategoryRes),
        (status = 400, description = "Missing category_name", body = ErrorBody),
        (status = 409, description = "Category already exists", body = ErrorBody)
    )
)]
pub(crate) async fn create_category(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CategoryReq>,
) -> ApiResult<(StatusCode, Json<CreateCategoryRes>)> {
    let category_id = CatalogueService::new(state.db).create_category(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateCategoryRes {
            success: true,
            message: "Category added successfully".into(),
            category_id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/components",
    responses(
        (status = 200, description = "All components", body = ComponentsRes),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub(crate) async fn list_components(
    State(state): State<AppState>,
) -> ApiResult<Json<ComponentsRes>> {
    let components = CatalogueService::new(state.db).components().await?;
    Ok(Json(ComponentsRes {
        success: true,
        components,
    }))
}

#[utoipa::path(
    post,
    path = "/api/components",
    request_body = ComponentReq,
    responses(
        (status = 201, description = "Component created", body = CreateComponentRes),
        (status = 400, description = "Missing fields or unknown test", body = ErrorBody)
    )
)]
pub(crate) async fn create_component(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ComponentReq>,
) -> ApiResult<(StatusCode, Json<CreateComponentRes>)> {
    let component_id = CatalogueService::new(state.db).create_component(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateComponentRes {
            success: true,
            message: "Component added successfully".into(),
            component_id,
        }),
    ))
}
