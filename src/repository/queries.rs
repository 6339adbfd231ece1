/// 상품 단건 조회
pub const FIND_PRODUCT_BY_ID: &str =
    "SELECT id, seller_name, name, description, starting_price, end_time, created_at, image_filename FROM products WHERE id = $1";

/// 모든 상품 조회 (최신 등록순)
pub const FIND_ALL_PRODUCTS: &str =
    "SELECT id, seller_name, name, description, starting_price, end_time, created_at, image_filename FROM products ORDER BY created_at DESC";

/// 판매자별 상품 조회 (대소문자 무시, 최신 등록순)
pub const FIND_PRODUCTS_BY_SELLER: &str =
    "SELECT id, seller_name, name, description, starting_price, end_time, created_at, image_filename FROM products WHERE LOWER(seller_name) = LOWER($1) ORDER BY created_at DESC";

/// 상품 삽입
pub const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (seller_name, name, description, starting_price, end_time, created_at, image_filename)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    RETURNING id, seller_name, name, description, starting_price, end_time, created_at, image_filename
"#;

/// 상품 수정
pub const UPDATE_PRODUCT: &str = r#"
    UPDATE products
    SET seller_name = $2, name = $3, description = $4, starting_price = $5, end_time = $6, image_filename = $7
    WHERE id = $1
    RETURNING id, seller_name, name, description, starting_price, end_time, created_at, image_filename
"#;

/// 상품 삭제 (입찰은 ON DELETE CASCADE 로 함께 삭제)
pub const DELETE_PRODUCT: &str = "DELETE FROM products WHERE id = $1";

/// 최고 입찰 조회
pub const FIND_HIGHEST_BID: &str = r#"
    SELECT id, product_id, amount, bidder_name, created_at
    FROM bids
    WHERE product_id = $1
    ORDER BY amount DESC, created_at DESC
    LIMIT 1
"#;

/// 상품 입찰 이력 조회
pub const FIND_BIDS: &str = r#"
    SELECT id, product_id, amount, bidder_name, created_at
    FROM bids
    WHERE product_id = $1
    ORDER BY amount DESC, created_at DESC
"#;

/// 입찰 직렬화를 위한 상품 행 잠금
pub const LOCK_PRODUCT_FOR_BID: &str = "SELECT starting_price FROM products WHERE id = $1 FOR UPDATE";

/// 입찰 삽입
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (product_id, amount, bidder_name, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, product_id, amount, bidder_name, created_at
"#;
