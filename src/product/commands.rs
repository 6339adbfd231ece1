/// 상품 커맨드 처리
/// 1. 등록
/// 2. 수정 (소유자 확인, 부분 갱신)
/// 3. 삭제 (소유자 확인, 입찰/이미지까지 정리)
// region:    --- Imports
use crate::auction::model::{NewProduct, Product};
use crate::error::ApiError;
use crate::image_store::{ImageStore, ImageUpload};
use crate::repository::ProductRepository;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

// endregion: --- Imports

// region:    --- Upsert Form

/// 상품 등록/수정 폼 (multipart 바인딩 결과)
#[derive(Debug, Default, Clone)]
pub struct ProductUpsertForm {
    pub seller_name: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub starting_price: Option<Decimal>,
    pub end_time: Option<DateTime<Utc>>,
    pub image: Option<ImageUpload>,
}

/// 공백을 제거한 비어 있지 않은 텍스트 필드
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// 판매자 이름 비교 (앞뒤 공백 제거, 대소문자 무시)
fn same_seller(stored: &str, supplied: &str) -> bool {
    stored.trim().to_lowercase() == supplied.trim().to_lowercase()
}

// endregion: --- Upsert Form

// region:    --- Commands

/// 상품 등록
/// 유효성 검증은 고정된 순서로 수행해 오류 메시지를 결정적으로 만든다.
pub async fn create_product(
    products: &impl ProductRepository,
    images: &impl ImageStore,
    form: ProductUpsertForm,
    now: DateTime<Utc>,
) -> Result<Product, ApiError> {
    info!("{:<12} --> 상품 등록 요청 처리 시작", "Command");

    let seller_name = non_blank(&form.seller_name)
        .ok_or_else(|| ApiError::InvalidArgument("판매자 이름은 필수입니다".to_string()))?;
    let name = non_blank(&form.name)
        .ok_or_else(|| ApiError::InvalidArgument("상품 이름은 필수입니다".to_string()))?;
    let description = non_blank(&form.description)
        .ok_or_else(|| ApiError::InvalidArgument("상품 설명은 필수입니다".to_string()))?;
    let starting_price = form
        .starting_price
        .ok_or_else(|| ApiError::InvalidArgument("시작 가격은 필수입니다".to_string()))?;
    let end_time = form
        .end_time
        .ok_or_else(|| ApiError::InvalidArgument("종료 시간은 필수입니다".to_string()))?;
    let image = form
        .image
        .as_ref()
        .filter(|image| !image.data.is_empty())
        .ok_or_else(|| ApiError::InvalidArgument("이미지 파일이 필요합니다".to_string()))?;
    if starting_price <= Decimal::ZERO {
        return Err(ApiError::InvalidArgument(
            "시작 가격은 0보다 커야 합니다".to_string(),
        ));
    }
    if end_time <= now {
        return Err(ApiError::InvalidArgument(
            "종료 시간은 미래여야 합니다".to_string(),
        ));
    }

    // 이미지를 먼저 저장해 키를 얻은 뒤 상품 레코드를 저장한다
    let image_filename = images.save(image).await?;
    let product = products
        .insert_product(NewProduct {
            seller_name: seller_name.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            starting_price,
            end_time,
            created_at: now,
            image_filename,
        })
        .await?;

    info!("{:<12} --> 상품 등록 완료 id: {}", "Command", product.id);
    Ok(product)
}

/// 상품 수정
/// 전달된 필드만 덮어쓴다. 공백뿐인 텍스트 필드는 무시한다.
pub async fn update_product(
    products: &impl ProductRepository,
    images: &impl ImageStore,
    id: i64,
    form: ProductUpsertForm,
    now: DateTime<Utc>,
) -> Result<Product, ApiError> {
    info!("{:<12} --> 상품 수정 요청 처리 시작 id: {}", "Command", id);

    let mut product = products
        .find_product_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("상품을 찾을 수 없습니다".to_string()))?;

    // 소유자 확인
    let seller_name = non_blank(&form.seller_name)
        .ok_or_else(|| ApiError::InvalidArgument("판매자 이름은 필수입니다".to_string()))?;
    if !same_seller(&product.seller_name, seller_name) {
        return Err(ApiError::PermissionDenied(
            "자신이 등록한 상품만 수정할 수 있습니다".to_string(),
        ));
    }

    if let Some(name) = non_blank(&form.name) {
        product.name = name.to_string();
    }
    if let Some(description) = non_blank(&form.description) {
        product.description = description.to_string();
    }
    if let Some(starting_price) = form.starting_price {
        if starting_price <= Decimal::ZERO {
            return Err(ApiError::InvalidArgument(
                "시작 가격은 0보다 커야 합니다".to_string(),
            ));
        }
        product.starting_price = starting_price;
    }
    if let Some(end_time) = form.end_time {
        if end_time <= now {
            return Err(ApiError::InvalidArgument(
                "종료 시간은 미래여야 합니다".to_string(),
            ));
        }
        product.end_time = end_time;
    }

    // 새 이미지는 먼저 저장하고, 레코드 갱신이 끝난 뒤 옛 파일을 정리한다.
    // 옛 파일 삭제 실패는 수정 결과에 영향을 주지 않는다.
    let mut old_image: Option<String> = None;
    if let Some(image) = form.image.as_ref().filter(|image| !image.data.is_empty()) {
        let image_filename = images.save(image).await?;
        old_image = Some(std::mem::replace(&mut product.image_filename, image_filename));
    }

    let updated = products.update_product(&product).await?;
    if let Some(old) = old_image {
        images.delete_if_exists(&old).await;
    }

    info!("{:<12} --> 상품 수정 완료 id: {}", "Command", updated.id);
    Ok(updated)
}

/// 상품 삭제
/// 레코드 삭제가 내구성 있는 단계이고, 이미지 파일 삭제는 사후 정리다.
pub async fn delete_product(
    products: &impl ProductRepository,
    images: &impl ImageStore,
    id: i64,
    seller_name: &str,
) -> Result<(), ApiError> {
    info!("{:<12} --> 상품 삭제 요청 처리 시작 id: {}", "Command", id);

    let product = products
        .find_product_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("상품을 찾을 수 없습니다".to_string()))?;

    if seller_name.trim().is_empty() {
        return Err(ApiError::InvalidArgument(
            "판매자 이름은 필수입니다".to_string(),
        ));
    }
    if !same_seller(&product.seller_name, seller_name) {
        return Err(ApiError::PermissionDenied(
            "자신이 등록한 상품만 삭제할 수 있습니다".to_string(),
        ));
    }

    // 입찰은 저장소에서 상품과 함께 삭제된다
    products.delete_product(id).await?;
    images.delete_if_exists(&product.image_filename).await;

    info!("{:<12} --> 상품 삭제 완료 id: {}", "Command", id);
    Ok(())
}

// endregion: --- Commands
