/// 입찰 커맨드 처리
// region:    --- Imports
use crate::auction::model::Bid;
use crate::auction::price;
use crate::error::ApiError;
use crate::repository::{BidRepository, ProductRepository};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Commands

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidCommand {
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub bidder_name: Option<String>,
}

/// 입찰 처리
/// 검증 순서: 상품 존재 -> 판매 시간 -> 금액 유효성 -> 현재 가격 초과
pub async fn place_bid(
    products: &impl ProductRepository,
    bids: &impl BidRepository,
    product_id: i64,
    cmd: PlaceBidCommand,
    now: DateTime<Utc>,
) -> Result<Bid, ApiError> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작 id: {}, {:?}",
        "Command", product_id, cmd
    );

    let product = products
        .find_product_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("상품을 찾을 수 없습니다".to_string()))?;

    // 종료 시각과 정확히 같은 순간까지는 입찰할 수 있다
    if now > product.end_time {
        return Err(ApiError::InvalidState(
            "판매 시간이 종료되어 입찰이 마감되었습니다".to_string(),
        ));
    }

    let amount = cmd
        .amount
        .ok_or_else(|| ApiError::InvalidArgument("입찰 금액은 필수입니다".to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(ApiError::InvalidArgument(
            "입찰 금액은 0보다 커야 합니다".to_string(),
        ));
    }

    // 현재 가격 초과 여부 사전 검증. 동률 입찰은 거절된다.
    let highest = bids.find_highest_bid(product_id).await?;
    let current = price::current_price(&product, highest.as_ref());
    if amount <= current {
        return Err(ApiError::InvalidArgument(
            "입찰 금액은 현재 가격보다 높아야 합니다".to_string(),
        ));
    }

    // 저장소가 상품 행을 잠근 채 같은 검증을 한 번 더 수행한다.
    // 동시 입찰에 추월당해 검증이 실패하면 None 이 돌아온다.
    match bids.insert_bid(product_id, amount, cmd.bidder_name, now).await? {
        Some(bid) => {
            info!(
                "{:<12} --> 입찰 성공 id: {}, 금액: {}",
                "Command", product_id, bid.amount
            );
            Ok(bid)
        }
        None => Err(ApiError::InvalidArgument(
            "입찰 금액은 현재 가격보다 높아야 합니다".to_string(),
        )),
    }
}

// endregion: --- Commands
