use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::{AppConfig, StorageBackend};
use shared_database::SupabaseClient;

use crate::models::{StorageError, UploadedImage};

/// Destination for profile images. Returns the URL clients should use.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    async fn store(&self, owner: Uuid, image: &UploadedImage) -> Result<String, StorageError>;
}

fn object_name(owner: Uuid, image: &UploadedImage) -> String {
    format!("{}-{}.{}", owner, Uuid::new_v4(), image.extension())
}

/// Writes images under a directory that the API serves at `/uploads`.
pub struct LocalDiskStorage {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalDiskStorage {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ImageStorage for LocalDiskStorage {
    async fn store(&self, owner: Uuid, image: &UploadedImage) -> Result<String, StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        let name = object_name(owner, image);
        let path = self.dir.join(&name);
        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        debug!("Stored {} bytes at {}", image.bytes.len(), path.display());
        Ok(format!("{}/uploads/{}", self.public_base_url, name))
    }
}

/// Forwards images to a Supabase storage bucket.
pub struct SupabaseImageStorage {
    supabase: SupabaseClient,
    bucket: String,
}

impl SupabaseImageStorage {
    pub fn new(supabase: SupabaseClient, bucket: &str) -> Self {
        Self {
            supabase,
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ImageStorage for SupabaseImageStorage {
    async fn store(&self, owner: Uuid, image: &UploadedImage) -> Result<String, StorageError> {
        let object_path = format!("profiles/{}", object_name(owner, image));
        let url = self
            .supabase
            .upload_object(&self.bucket, &object_path, image.bytes.clone(), &image.content_type)
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        info!("Uploaded profile image for {} to bucket {}", owner, self.bucket);
        Ok(url)
    }
}

pub fn storage_for(config: &AppConfig) -> Box<dyn ImageStorage> {
    match config.storage_backend {
        StorageBackend::Local => Box::new(LocalDiskStorage::new(&config.upload_dir, &config.public_base_url)),
        StorageBackend::Supabase => Box::new(SupabaseImageStorage::new(
            SupabaseClient::new(config),
            &config.storage_bucket,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> UploadedImage {
        UploadedImage {
            file_name: Some("me.png".to_string()),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[tokio::test]
    async fn local_storage_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDiskStorage::new(dir.path(), "http://localhost:3000/");
        let owner = Uuid::new_v4();

        let url = storage.store(owner, &png()).await.unwrap();
        assert!(url.starts_with(&format!("http://localhost:3000/uploads/{}-", owner)));
        assert!(url.ends_with(".png"));

        let name = url.rsplit('/').next().unwrap();
        let written = std::fs::read(dir.path().join(name)).unwrap();
        assert_eq!(written, png().bytes);
    }

    #[tokio::test]
    async fn supabase_storage_posts_to_bucket() {
        use wiremock::matchers::{header, method, path_regex};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/storage/v1/object/avatars/profiles/.+\.png$"))
            .and(header("content-type", "image/png"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "Key": "x" })))
            .expect(1)
            .mount(&server)
            .await;

        let storage = SupabaseImageStorage::new(SupabaseClient::with_base_url(&server.uri(), "key"), "avatars");
        let url = storage.store(Uuid::new_v4(), &png()).await.unwrap();
        assert!(url.starts_with(&format!("{}/storage/v1/object/public/avatars/profiles/", server.uri())));
    }
}
