// region:    --- Imports
use crate::auction::model::{Bid, Product, ProductStatus};
use crate::auction::price;
use crate::bidding;
use crate::bidding::commands::PlaceBidCommand;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::image_store::{FsImageStore, ImageStore, ImageUpload};
use crate::product;
use crate::product::commands::ProductUpsertForm;
use crate::repository::{BidRepository, PostgresRepository};
use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- App State

/// 핸들러가 공유하는 애플리케이션 상태
pub struct AppState {
    pub repo: PostgresRepository,
    pub images: FsImageStore,
    pub config: AppConfig,
}

// endregion: --- App State

// region:    --- Response Models

/// 상품 응답 (현재 가격과 판매 상태는 조회 시점에 유도)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub seller_name: String,
    pub name: String,
    pub description: String,
    pub starting_price: Decimal,
    pub current_price: Decimal,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub status: ProductStatus,
    pub image_url: Option<String>,
}

/// 입찰 응답
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidResponse {
    pub id: i64,
    pub amount: Decimal,
    pub bidder_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Bid> for BidResponse {
    fn from(bid: Bid) -> Self {
        Self {
            id: bid.id,
            amount: bid.amount,
            bidder_name: bid.bidder_name,
            created_at: bid.created_at,
        }
    }
}

/// 상품 응답 생성 (최고 입찰 조회 포함)
async fn to_product_response(
    state: &AppState,
    product: Product,
    now: DateTime<Utc>,
) -> Result<ProductResponse, ApiError> {
    let highest = state.repo.find_highest_bid(product.id).await?;
    Ok(ProductResponse {
        current_price: price::current_price(&product, highest.as_ref()),
        status: price::status(&product, now),
        image_url: build_image_url(&product.image_filename, state.config.base_url.as_deref()),
        id: product.id,
        seller_name: product.seller_name,
        name: product.name,
        description: product.description,
        starting_price: product.starting_price,
        end_time: product.end_time,
        created_at: product.created_at,
    })
}

/// 저장 키로부터 이미지 URL 생성
/// 베이스 URL 이 없으면 상대 경로를 쓴다.
fn build_image_url(image_filename: &str, base_url: Option<&str>) -> Option<String> {
    if image_filename.trim().is_empty() {
        return None;
    }
    match base_url {
        Some(base) => Some(format!(
            "{}/uploads/{}",
            base.trim_end_matches('/'),
            image_filename
        )),
        None => Some(format!("/uploads/{}", image_filename)),
    }
}

// endregion: --- Response Models

// region:    --- Multipart Binding

/// multipart 필드를 상품 등록/수정 폼으로 바인딩
async fn read_upsert_form(mut multipart: Multipart) -> Result<ProductUpsertForm, ApiError> {
    let mut form = ProductUpsertForm::default();
    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "sellerName" => form.seller_name = Some(read_text(field).await?),
            "name" => form.name = Some(read_text(field).await?),
            "description" => form.description = Some(read_text(field).await?),
            "startingPrice" => {
                let text = read_text(field).await?;
                if !text.trim().is_empty() {
                    form.starting_price = Some(parse_price(&text)?);
                }
            }
            "endTime" => {
                let text = read_text(field).await?;
                if !text.trim().is_empty() {
                    form.end_time = Some(parse_end_time(&text)?);
                }
            }
            "image" => form.image = Some(read_image(field).await?),
            _ => {}
        }
    }
    Ok(form)
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(invalid_multipart)
}

async fn read_image(field: Field<'_>) -> Result<ImageUpload, ApiError> {
    let content_type = field.content_type().map(str::to_string);
    let file_name = field.file_name().map(str::to_string);
    let data = field.bytes().await.map_err(invalid_multipart)?.to_vec();
    Ok(ImageUpload {
        data,
        content_type,
        file_name,
    })
}

fn invalid_multipart(_: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::InvalidArgument("잘못된 multipart 요청입니다".to_string())
}

fn parse_price(text: &str) -> Result<Decimal, ApiError> {
    text.trim()
        .parse::<Decimal>()
        .map_err(|_| ApiError::InvalidArgument("시작 가격 형식이 올바르지 않습니다".to_string()))
}

/// 종료 시간 파싱. RFC 3339 와 타임존 없는 ISO-8601(UTC 로 해석)을 받는다.
fn parse_end_time(text: &str) -> Result<DateTime<Utc>, ApiError> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(parsed.and_utc());
    }
    Err(ApiError::InvalidArgument(
        "종료 시간 형식이 올바르지 않습니다".to_string(),
    ))
}

// endregion: --- Multipart Binding

// region:    --- Command Handlers

/// 상품 등록 요청 처리
pub async fn handle_create_product(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ProductResponse>, ApiError> {
    info!("{:<12} --> 상품 등록 요청", "Handler");
    let form = read_upsert_form(multipart).await?;
    let saved = product::commands::create_product(&state.repo, &state.images, form, Utc::now()).await?;
    Ok(Json(to_product_response(&state, saved, Utc::now()).await?))
}

/// 상품 수정 요청 처리
pub async fn handle_update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ProductResponse>, ApiError> {
    info!("{:<12} --> 상품 수정 요청 id: {}", "Handler", id);
    let form = read_upsert_form(multipart).await?;
    let saved =
        product::commands::update_product(&state.repo, &state.images, id, form, Utc::now()).await?;
    Ok(Json(to_product_response(&state, saved, Utc::now()).await?))
}

/// 상품 삭제 요청 처리
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(rename = "sellerName", default)]
    pub seller_name: String,
}

pub async fn handle_delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("{:<12} --> 상품 삭제 요청 id: {}", "Handler", id);
    product::commands::delete_product(&state.repo, &state.images, id, &params.seller_name).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// 입찰 요청 처리
pub async fn handle_place_bid(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
    Json(cmd): Json<PlaceBidCommand>,
) -> Result<Json<BidResponse>, ApiError> {
    info!("{:<12} --> 입찰 요청 id: {}", "Handler", product_id);
    let bid =
        bidding::commands::place_bid(&state.repo, &state.repo, product_id, cmd, Utc::now()).await?;
    Ok(Json(BidResponse::from(bid)))
}

/// 단건 이미지 업로드 처리
pub async fn handle_upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("{:<12} --> 이미지 업로드 요청", "Handler");
    let mut image: Option<ImageUpload> = None;
    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        if field.name() == Some("file") {
            image = Some(read_image(field).await?);
        }
    }
    let image = image
        .ok_or_else(|| ApiError::InvalidArgument("이미지 파일이 필요합니다".to_string()))?;
    let filename = state.images.save(&image).await?;
    let url = build_image_url(&filename, state.config.base_url.as_deref());
    Ok(Json(serde_json::json!({ "filename": filename, "url": url })))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 모든 상품 조회
pub async fn handle_get_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    info!("{:<12} --> 모든 상품 조회", "Handler");
    let now = Utc::now();
    let products = product::queries::get_all_products(&state.repo).await?;
    let mut responses = Vec::with_capacity(products.len());
    for product in products {
        responses.push(to_product_response(&state, product, now).await?);
    }
    Ok(Json(responses))
}

/// 상품 조회
pub async fn handle_get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, ApiError> {
    info!("{:<12} --> 상품 조회 id: {}", "Handler", id);
    let product = product::queries::get_product(&state.repo, id).await?;
    Ok(Json(to_product_response(&state, product, Utc::now()).await?))
}

/// 판매자 상품 조회
pub async fn handle_get_seller_products(
    State(state): State<Arc<AppState>>,
    Path(seller_name): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    info!("{:<12} --> 판매자 상품 조회: {}", "Handler", seller_name);
    let now = Utc::now();
    let products = product::queries::get_seller_products(&state.repo, &seller_name).await?;
    let mut responses = Vec::with_capacity(products.len());
    for product in products {
        responses.push(to_product_response(&state, product, now).await?);
    }
    Ok(Json(responses))
}

/// 상품 입찰 이력 조회
pub async fn handle_get_bids(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
) -> Result<Json<Vec<BidResponse>>, ApiError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Handler", product_id);
    let bids = bidding::queries::list_bids(&state.repo, product_id).await?;
    Ok(Json(bids.into_iter().map(BidResponse::from).collect()))
}

// endregion: --- Query Handlers

// region:    --- Tests


// endregion: --- Tests
