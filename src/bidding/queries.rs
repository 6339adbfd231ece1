/// 입찰 조회 처리
// region:    --- Imports
use crate::auction::model::Bid;
use crate::error::ApiError;
use crate::repository::BidRepository;
use tracing::info;

// endregion: --- Imports

// region:    --- Queries

/// 상품 입찰 이력 조회 (amount DESC, created_at DESC)
/// 존재하지 않는 상품이면 NotFound 대신 빈 목록을 반환한다.
pub async fn list_bids(bids: &impl BidRepository, product_id: i64) -> Result<Vec<Bid>, ApiError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", product_id);
    bids.find_bids(product_id).await
}

// endregion: --- Queries
