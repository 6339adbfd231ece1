/// 가격 및 상태 유도
/// 1. 현재 가격: (amount DESC, created_at DESC) 순서에서 첫 번째 입찰 금액, 없으면 시작 가격
/// 2. 판매 상태: 종료 시간을 지나면 SOLD, 아니면 ACTIVE
// region:    --- Imports
use crate::auction::model::{Bid, Product, ProductStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

// endregion: --- Imports

// region:    --- Price Engine

/// 낙찰 순위 1위 입찰 조회
/// (amount DESC, created_at DESC) 정렬의 첫 번째 원소와 동일
pub fn winning_bid(bids: &[Bid]) -> Option<&Bid> {
    bids.iter()
        .max_by(|a, b| (a.amount, a.created_at).cmp(&(b.amount, b.created_at)))
}

/// 현재 가격 유도
pub fn current_price(product: &Product, top_bid: Option<&Bid>) -> Decimal {
    top_bid
        .map(|bid| bid.amount)
        .unwrap_or(product.starting_price)
}

/// 판매 상태 유도
/// 종료 시간과 정확히 같은 시각은 아직 ACTIVE 다 (strict-after).
pub fn status(product: &Product, now: DateTime<Utc>) -> ProductStatus {
    if now > product.end_time {
        ProductStatus::Sold
    } else {
        ProductStatus::Active
    }
}

// endregion: --- Price Engine

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn product(starting_price: Decimal, end_time: DateTime<Utc>) -> Product {
        Product {
            id: 1,
            seller_name: "alice".to_string(),
            name: "낙관적 램프".to_string(),
            description: "시험용 상품".to_string(),
            starting_price,
            end_time,
            created_at: end_time - Duration::hours(2),
            image_filename: "test.jpg".to_string(),
        }
    }

    fn bid(id: i64, amount: Decimal, created_at: DateTime<Utc>) -> Bid {
        Bid {
            id,
            product_id: 1,
            amount,
            bidder_name: None,
            created_at,
        }
    }

    #[test]
    fn current_price_falls_back_to_starting_price() {
        let p = product(Decimal::new(1000, 2), Utc::now());
        assert_eq!(current_price(&p, None), Decimal::new(1000, 2));
    }

    #[test]
    fn winning_bid_is_highest_amount() {
        let now = Utc::now();
        let bids = vec![
            bid(1, Decimal::new(1200, 2), now),
            bid(2, Decimal::new(1500, 2), now + Duration::seconds(1)),
            bid(3, Decimal::new(1100, 2), now + Duration::seconds(2)),
        ];
        assert_eq!(winning_bid(&bids).map(|b| b.id), Some(2));
    }

    #[test]
    fn winning_bid_ties_broken_by_created_at() {
        // 금액이 같으면 더 나중에 생성된 입찰이 1위
        let now = Utc::now();
        let bids = vec![
            bid(1, Decimal::new(1500, 2), now),
            bid(2, Decimal::new(1500, 2), now + Duration::seconds(1)),
        ];
        assert_eq!(winning_bid(&bids).map(|b| b.id), Some(2));
    }

    #[test]
    fn status_is_active_until_end_time() {
        let end = Utc::now();
        let p = product(Decimal::new(1000, 2), end);
        assert_eq!(status(&p, end - Duration::seconds(1)), ProductStatus::Active);
        assert_eq!(status(&p, end), ProductStatus::Active);
        assert_eq!(status(&p, end + Duration::seconds(1)), ProductStatus::Sold);
    }
}

// endregion: --- Tests
