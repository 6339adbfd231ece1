// region:    --- Imports
use std::path::PathBuf;

// endregion: --- Imports

// region:    --- App Config

/// 애플리케이션 설정
/// DATABASE_URL 은 DatabaseManager 가 직접 읽는다.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 웹 서버 바인드 주소
    pub bind_addr: String,
    /// 이미지 업로드 디렉터리
    pub uploads_dir: PathBuf,
    /// 이미지 절대 URL 생성을 위한 베이스 URL (없으면 상대 경로 사용)
    pub base_url: Option<String>,
    /// CORS 허용 오리진 목록 (비어 있으면 모든 오리진 허용)
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let uploads_dir =
            PathBuf::from(std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()));
        let base_url = std::env::var("BASE_URL").ok().filter(|s| !s.trim().is_empty());
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            bind_addr,
            uploads_dir,
            base_url,
            allowed_origins,
        }
    }
}

// endregion: --- App Config
