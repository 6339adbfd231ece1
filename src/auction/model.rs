use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 상품 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub seller_name: String,
    pub name: String,
    pub description: String,
    pub starting_price: Decimal,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub image_filename: String,
}

// 입찰 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub product_id: i64,
    pub amount: Decimal,
    pub bidder_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 상품 판매 상태 (저장하지 않고 종료 시간으로부터 유도)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    Active,
    Sold,
}

/// 신규 상품 삽입용 레코드 (id 는 저장소가 발급)
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub seller_name: String,
    pub name: String,
    pub description: String,
    pub starting_price: Decimal,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub image_filename: String,
}
