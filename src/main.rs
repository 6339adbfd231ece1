// region:    --- Imports
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use bid_service::config::AppConfig;
use bid_service::database::DatabaseManager;
use bid_service::handlers::{self, AppState};
use bid_service::image_store::FsImageStore;
use bid_service::repository::PostgresRepository;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = AppConfig::from_env();
    info!("{:<12} --> 설정 로드 완료: {:?}", "Main", config);

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new().await);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 저장소 및 이미지 스토어 생성
    let state = Arc::new(AppState {
        repo: PostgresRepository::new(Arc::clone(&db_manager)),
        images: FsImageStore::new(config.uploads_dir.clone()),
        config: config.clone(),
    });

    // 테스트 페이지를 위한 cors 설정
    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // 라우터 설정
    let routes_all = Router::new()
        .route(
            "/api/products",
            get(handlers::handle_get_products).post(handlers::handle_create_product),
        )
        .route(
            "/api/products/:id",
            get(handlers::handle_get_product)
                .put(handlers::handle_update_product)
                .delete(handlers::handle_delete_product),
        )
        .route(
            "/api/sellers/:seller_name/products",
            get(handlers::handle_get_seller_products),
        )
        .route(
            "/api/products/:id/bids",
            post(handlers::handle_place_bid).get(handlers::handle_get_bids),
        )
        .route("/api/uploads/image", post(handlers::handle_upload_image))
        // 업로드된 이미지 정적 서빙
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024 * 20)) // 이미지 업로드를 위한 바디 사이즈 증가(20MB)
        .with_state(state);

    // 리스너 생성
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
