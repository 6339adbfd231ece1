/// 상품 이미지 저장소
/// 1. 저장: MIME 검증 후 UUID 파일명으로 원자적 쓰기
/// 2. 삭제: 실패를 무시하는 best-effort
// region:    --- Imports
use crate::error::ApiError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Image Upload

/// 허용하는 이미지 MIME 타입
const ALLOWED_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// 업로드된 이미지 페이로드
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

// endregion: --- Image Upload

// region:    --- Image Store Trait

/// 이미지 저장소 트레이트
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// 이미지 저장 후 저장 키(파일명) 반환
    async fn save(&self, image: &ImageUpload) -> Result<String, ApiError>;
    /// 저장 키에 해당하는 파일 삭제. 빈 키는 무시하고 오류는 삼킨다.
    async fn delete_if_exists(&self, filename: &str);
}

// endregion: --- Image Store Trait

// region:    --- Fs Image Store

/// 디렉터리 기반 이미지 저장소 구현체
pub struct FsImageStore {
    uploads_dir: PathBuf,
}

impl FsImageStore {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn save(&self, image: &ImageUpload) -> Result<String, ApiError> {
        if image.data.is_empty() {
            return Err(ApiError::InvalidArgument(
                "이미지 파일이 필요합니다".to_string(),
            ));
        }
        let content_type = image.content_type.as_deref().unwrap_or_default();
        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(ApiError::InvalidArgument(
                "JPG/PNG 이미지만 업로드할 수 있습니다".to_string(),
            ));
        }

        let extension = guess_extension(image.file_name.as_deref().unwrap_or(""), content_type);
        let filename = format!("{}{}", Uuid::new_v4(), extension);

        tokio::fs::create_dir_all(&self.uploads_dir)
            .await
            .map_err(|_| ApiError::Internal("이미지 저장에 실패했습니다".to_string()))?;

        // 임시 파일에 쓴 뒤 rename 으로 교체. 같은 디렉터리 안이므로 원자적이다.
        let target = self.uploads_dir.join(&filename);
        let tmp = self.uploads_dir.join(format!(".{}.tmp", filename));
        let write_result = async {
            tokio::fs::write(&tmp, &image.data).await?;
            tokio::fs::rename(&tmp, &target).await
        }
        .await;

        if let Err(e) = write_result {
            warn!("{:<12} --> 이미지 쓰기 실패: {:?}", "ImageStore", e);
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(ApiError::Internal("이미지 저장에 실패했습니다".to_string()));
        }

        info!("{:<12} --> 이미지 저장: {}", "ImageStore", filename);
        Ok(filename)
    }

    async fn delete_if_exists(&self, filename: &str) {
        if filename.trim().is_empty() {
            return;
        }
        // 저장 키는 단일 파일명이어야 한다. 경로 구분자가 섞인 키는 무시.
        if Path::new(filename).file_name() != Some(std::ffi::OsStr::new(filename)) {
            warn!(
                "{:<12} --> 잘못된 저장 키는 삭제하지 않음: {}",
                "ImageStore", filename
            );
            return;
        }
        let target = self.uploads_dir.join(filename);
        match tokio::fs::remove_file(&target).await {
            Ok(_) => info!("{:<12} --> 이미지 삭제: {}", "ImageStore", filename),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "{:<12} --> 이미지 삭제 실패(무시): {} ({:?})",
                "ImageStore", filename, e
            ),
        }
    }
}

/// 원본 파일명 확장자에서 저장 확장자 유도, 모르면 MIME 타입으로 대체
fn guess_extension(original_filename: &str, content_type: &str) -> &'static str {
    let lower = original_filename.to_lowercase();
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        return ".jpg";
    }
    if lower.ends_with(".png") {
        return ".png";
    }
    if content_type == "image/png" {
        ".png"
    } else {
        ".jpg"
    }
}

// endregion: --- Fs Image Store

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(data: &[u8], content_type: &str, file_name: &str) -> ImageUpload {
        ImageUpload {
            data: data.to_vec(),
            content_type: Some(content_type.to_string()),
            file_name: Some(file_name.to_string()),
        }
    }

    #[test]
    fn extension_from_filename_suffix() {
        assert_eq!(guess_extension("photo.JPG", "image/png"), ".jpg");
        assert_eq!(guess_extension("photo.jpeg", "image/png"), ".jpg");
        assert_eq!(guess_extension("photo.PNG", "image/jpeg"), ".png");
    }

    #[test]
    fn extension_falls_back_to_content_type() {
        assert_eq!(guess_extension("photo", "image/png"), ".png");
        assert_eq!(guess_extension("photo.gif", "image/jpeg"), ".jpg");
        assert_eq!(guess_extension("", "image/jpeg"), ".jpg");
    }

    #[tokio::test]
    async fn save_writes_file_and_returns_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsImageStore::new(dir.path());

        let key = store
            .save(&upload(b"png-bytes", "image/png", "lamp.png"))
            .await
            .unwrap();

        assert!(key.ends_with(".png"));
        let written = tokio::fs::read(dir.path().join(&key)).await.unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn save_rejects_empty_payload() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsImageStore::new(dir.path());

        let result = store.save(&upload(b"", "image/png", "lamp.png")).await;
        assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn save_rejects_unsupported_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsImageStore::new(dir.path());

        let result = store.save(&upload(b"gif-bytes", "image/gif", "lamp.gif")).await;
        assert!(matches!(result, Err(ApiError::InvalidArgument(_))));

        let missing = ImageUpload {
            data: b"bytes".to_vec(),
            content_type: None,
            file_name: None,
        };
        assert!(matches!(
            store.save(&missing).await,
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn delete_is_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsImageStore::new(dir.path());

        let key = store
            .save(&upload(b"jpg-bytes", "image/jpeg", "lamp.jpg"))
            .await
            .unwrap();
        store.delete_if_exists(&key).await;
        assert!(!dir.path().join(&key).exists());

        // 없는 파일, 빈 키, 경로가 섞인 키 모두 조용히 무시
        store.delete_if_exists(&key).await;
        store.delete_if_exists("").await;
        store.delete_if_exists("../outside.jpg").await;
    }
}

// endregion: --- Tests
