/// 상품 조회 처리
// region:    --- Imports
use crate::auction::model::Product;
use crate::error::ApiError;
use crate::repository::ProductRepository;
use tracing::info;

// endregion: --- Imports

// region:    --- Queries

/// 상품 단건 조회
pub async fn get_product(products: &impl ProductRepository, id: i64) -> Result<Product, ApiError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", id);
    products
        .find_product_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("상품을 찾을 수 없습니다".to_string()))
}

/// 모든 상품 조회 (최신 등록순)
pub async fn get_all_products(products: &impl ProductRepository) -> Result<Vec<Product>, ApiError> {
    info!("{:<12} --> 모든 상품 조회", "Query");
    products.find_all_products().await
}

/// 판매자별 상품 조회 (대소문자 무시, 최신 등록순)
pub async fn get_seller_products(
    products: &impl ProductRepository,
    seller_name: &str,
) -> Result<Vec<Product>, ApiError> {
    info!("{:<12} --> 판매자 상품 조회: {}", "Query", seller_name);
    let seller_name = seller_name.trim();
    if seller_name.is_empty() {
        return Err(ApiError::InvalidArgument(
            "판매자 이름은 필수입니다".to_string(),
        ));
    }
    products.find_products_by_seller(seller_name).await
}

// endregion: --- Queries
