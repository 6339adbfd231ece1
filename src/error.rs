// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

// endregion: --- Imports

// region:    --- Api Error

/// 도메인 오류
/// 모든 서비스 계층 오류는 다섯 가지 종류 중 하나로 표면화된다.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 대상(상품)을 찾을 수 없음
    #[error("{0}")]
    NotFound(String),

    /// 잘못된 입력 또는 비즈니스 규칙 위반
    #[error("{0}")]
    InvalidArgument(String),

    /// 시간 제한으로 허용되지 않는 작업 (예: 종료된 경매에 입찰)
    #[error("{0}")]
    InvalidState(String),

    /// 판매자 본인 확인 실패
    #[error("{0}")]
    PermissionDenied(String),

    /// 데이터베이스 오류
    #[error("데이터베이스 오류: {0}")]
    Database(#[from] sqlx::Error),

    /// 저장소 또는 파일시스템 오류
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// 안정적인 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ApiError::InvalidState(_) => "INVALID_STATE",
            ApiError::PermissionDenied(_) => "PERMISSION_DENIED",
            ApiError::Database(_) | ApiError::Internal(_) => "INTERNAL",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidArgument(_) | ApiError::InvalidState(_) => StatusCode::BAD_REQUEST,
            ApiError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("{:<12} --> 내부 오류: {:?}", "Error", self);
        }
        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
        }));
        (status, body).into_response()
    }
}

// endregion: --- Api Error
