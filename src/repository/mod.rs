/// 영속성 저장소
/// 서비스 계층은 트레이트만 사용하고, 운영 환경에서는 Postgres 구현체를 쓴다.
// region:    --- Imports
use crate::auction::model::{Bid, NewProduct, Product};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

pub mod queries;

// endregion: --- Imports

// region:    --- Repository Traits

/// 상품 저장소 트레이트
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_product_by_id(&self, id: i64) -> Result<Option<Product>, ApiError>;
    async fn find_all_products(&self) -> Result<Vec<Product>, ApiError>;
    async fn find_products_by_seller(&self, seller_name: &str) -> Result<Vec<Product>, ApiError>;
    async fn insert_product(&self, new_product: NewProduct) -> Result<Product, ApiError>;
    async fn update_product(&self, product: &Product) -> Result<Product, ApiError>;
    /// 상품 삭제. 소속 입찰도 함께 삭제된다.
    async fn delete_product(&self, id: i64) -> Result<(), ApiError>;
}

/// 입찰 저장소 트레이트
#[async_trait]
pub trait BidRepository: Send + Sync {
    async fn find_highest_bid(&self, product_id: i64) -> Result<Option<Bid>, ApiError>;
    async fn find_bids(&self, product_id: i64) -> Result<Vec<Bid>, ApiError>;
    /// 상품 단위로 직렬화된 입찰 삽입.
    /// 상품 행을 잠근 채 현재 가격을 다시 확인하고, 금액이 현재 가격 이하로
    /// 판정되면(동시 입찰에 추월당한 경우 포함) None 을 반환한다.
    async fn insert_bid(
        &self,
        product_id: i64,
        amount: Decimal,
        bidder_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<Bid>, ApiError>;
}

// endregion: --- Repository Traits

// region:    --- Postgres Repository

/// Postgres 저장소 구현체
pub struct PostgresRepository {
    db: Arc<DatabaseManager>,
}

impl PostgresRepository {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PostgresRepository {
    async fn find_product_by_id(&self, id: i64) -> Result<Option<Product>, ApiError> {
        info!("{:<12} --> 상품 조회 id: {}", "Repository", id);
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, Product>(queries::FIND_PRODUCT_BY_ID)
                        .bind(id)
                        .fetch_optional(&mut **tx)
                        .await
                        .map_err(ApiError::from)
                })
            })
            .await
    }

    async fn find_all_products(&self) -> Result<Vec<Product>, ApiError> {
        info!("{:<12} --> 모든 상품 조회", "Repository");
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, Product>(queries::FIND_ALL_PRODUCTS)
                        .fetch_all(&mut **tx)
                        .await
                        .map_err(ApiError::from)
                })
            })
            .await
    }

    async fn find_products_by_seller(&self, seller_name: &str) -> Result<Vec<Product>, ApiError> {
        info!("{:<12} --> 판매자 상품 조회: {}", "Repository", seller_name);
        let seller_name = seller_name.to_string();
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, Product>(queries::FIND_PRODUCTS_BY_SELLER)
                        .bind(seller_name)
                        .fetch_all(&mut **tx)
                        .await
                        .map_err(ApiError::from)
                })
            })
            .await
    }

    async fn insert_product(&self, new_product: NewProduct) -> Result<Product, ApiError> {
        info!("{:<12} --> 상품 삽입: {}", "Repository", new_product.name);
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, Product>(queries::INSERT_PRODUCT)
                        .bind(new_product.seller_name)
                        .bind(new_product.name)
                        .bind(new_product.description)
                        .bind(new_product.starting_price)
                        .bind(new_product.end_time)
                        .bind(new_product.created_at)
                        .bind(new_product.image_filename)
                        .fetch_one(&mut **tx)
                        .await
                        .map_err(ApiError::from)
                })
            })
            .await
    }

    async fn update_product(&self, product: &Product) -> Result<Product, ApiError> {
        info!("{:<12} --> 상품 수정 id: {}", "Repository", product.id);
        let product = product.clone();
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, Product>(queries::UPDATE_PRODUCT)
                        .bind(product.id)
                        .bind(product.seller_name)
                        .bind(product.name)
                        .bind(product.description)
                        .bind(product.starting_price)
                        .bind(product.end_time)
                        .bind(product.image_filename)
                        .fetch_one(&mut **tx)
                        .await
                        .map_err(ApiError::from)
                })
            })
            .await
    }

    async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        info!("{:<12} --> 상품 삭제 id: {}", "Repository", id);
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query(queries::DELETE_PRODUCT)
                        .bind(id)
                        .execute(&mut **tx)
                        .await
                        .map_err(ApiError::from)?;
                    Ok(())
                })
            })
            .await
    }
}

#[async_trait]
impl BidRepository for PostgresRepository {
    async fn find_highest_bid(&self, product_id: i64) -> Result<Option<Bid>, ApiError> {
        info!("{:<12} --> 최고 입찰 조회 id: {}", "Repository", product_id);
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, Bid>(queries::FIND_HIGHEST_BID)
                        .bind(product_id)
                        .fetch_optional(&mut **tx)
                        .await
                        .map_err(ApiError::from)
                })
            })
            .await
    }

    async fn find_bids(&self, product_id: i64) -> Result<Vec<Bid>, ApiError> {
        info!("{:<12} --> 입찰 이력 조회 id: {}", "Repository", product_id);
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, Bid>(queries::FIND_BIDS)
                        .bind(product_id)
                        .fetch_all(&mut **tx)
                        .await
                        .map_err(ApiError::from)
                })
            })
            .await
    }

    async fn insert_bid(
        &self,
        product_id: i64,
        amount: Decimal,
        bidder_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<Bid>, ApiError> {
        info!(
            "{:<12} --> 입찰 삽입 id: {}, 금액: {}",
            "Repository", product_id, amount
        );
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    // 상품 행 잠금. 같은 상품의 입찰 검증-삽입을 직렬화한다.
                    let starting_price =
                        sqlx::query_scalar::<_, Decimal>(queries::LOCK_PRODUCT_FOR_BID)
                            .bind(product_id)
                            .fetch_optional(&mut **tx)
                            .await
                            .map_err(ApiError::from)?;

                    let Some(starting_price) = starting_price else {
                        return Ok(None);
                    };

                    // 잠금 하에서 현재 가격 재검증
                    let highest = sqlx::query_as::<_, Bid>(queries::FIND_HIGHEST_BID)
                        .bind(product_id)
                        .fetch_optional(&mut **tx)
                        .await
                        .map_err(ApiError::from)?;

                    let current = highest.map(|b| b.amount).unwrap_or(starting_price);
                    if amount <= current {
                        return Ok(None);
                    }

                    let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(product_id)
                        .bind(amount)
                        .bind(bidder_name)
                        .bind(now)
                        .fetch_one(&mut **tx)
                        .await
                        .map_err(ApiError::from)?;

                    Ok(Some(bid))
                })
            })
            .await
    }
}

// endregion: --- Postgres Repository
