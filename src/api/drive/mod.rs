// src/api/drive/mod.rs
//! Google Drive v3 client authenticated as a service account.

mod auth;
pub mod types;

pub use auth::TokenProvider;
pub use types::{DriveFile, FileList, Permission, ServiceAccountKey, ShareRole};

use super::client::{ApiResponse, HttpExecutor};
use super::parser;
use crate::config::DriveConfig;
use crate::constants::DRIVE_FOLDER_MIME_TYPE;
use crate::error::{AppError, Service};
use crate::pipeline::FileStore;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use types::{Parents, UploadMetadata};

const UPLOAD_FIELDS: &str = "id,name,size,createdTime";
const LIST_FIELDS: &str = "files(id,name,mimeType,size,createdTime,modifiedTime)";
const SEARCH_FIELDS: &str = "files(id,name,mimeType,size,createdTime)";
const METADATA_FIELDS: &str = "id,name,mimeType,size,createdTime,modifiedTime,parents,webViewLink";

#[derive(Clone)]
pub struct DriveClient {
    executor: HttpExecutor,
    config: DriveConfig,
    auth: Arc<TokenProvider>,
}

impl DriveClient {
    /// Loads the service-account key named in `config`.
    pub fn new(config: DriveConfig) -> Result<Self, AppError> {
        let auth = TokenProvider::from_key_file(
            &config.service_account_key_file,
            &config.scopes,
            *config.api.retry(),
        )?;
        Self::with_token_provider(config, Arc::new(auth))
    }

    pub fn with_token_provider(
        config: DriveConfig,
        auth: Arc<TokenProvider>,
    ) -> Result<Self, AppError> {
        let executor = HttpExecutor::new(Service::GoogleDrive, config.api.clone())?;
        Ok(Self {
            executor,
            config,
            auth,
        })
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Uploads a local file. The name defaults to the file name and the MIME
    /// type is guessed from the extension.
    pub async fn upload_file(
        &self,
        path: &Path,
        name: Option<&str>,
        folder_id: Option<&str>,
    ) -> Result<DriveFile, AppError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::file_system(path, e))?;
        let name = match name {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    AppError::InvalidInput(format!("{} has no file name", path.display()))
                })?,
        };
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        self.upload_bytes(&name, mime.essence_str(), content, folder_id)
            .await
    }

    pub async fn upload_text_file(
        &self,
        content: &str,
        name: &str,
        folder_id: Option<&str>,
    ) -> Result<DriveFile, AppError> {
        self.upload_bytes(name, "text/plain", content.as_bytes().to_vec(), folder_id)
            .await
    }

    async fn upload_bytes(
        &self,
        name: &str,
        mime_type: &str,
        content: Vec<u8>,
        folder_id: Option<&str>,
    ) -> Result<DriveFile, AppError> {
        let metadata = UploadMetadata {
            name,
            mime_type: None,
            parents: folder_id.into_iter().collect(),
        };
        let boundary = format!("content-relay-{}", uuid::Uuid::new_v4().simple());
        let body = multipart_related_body(&boundary, &metadata, mime_type, &content)?;
        let url = format!("{}/files", self.config.upload_url.as_base());
        let query = [("uploadType", "multipart"), ("fields", UPLOAD_FIELDS)];
        let token = self.auth.access_token().await?;

        log::info!("Uploading {} ({} bytes) to Google Drive", name, content.len());
        let response = self
            .executor
            .send(&format!("Google Drive upload {}", name), |client| {
                client
                    .post(&url)
                    .bearer_auth(&token)
                    .query(&query)
                    .header(
                        reqwest::header::CONTENT_TYPE,
                        format!("multipart/related; boundary={}", boundary),
                    )
                    .body(body.clone())
            })
            .await?;
        decode_response(&response)
    }

    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<DriveFile, AppError> {
        let metadata = UploadMetadata {
            name,
            mime_type: Some(DRIVE_FOLDER_MIME_TYPE),
            parents: parent_id.into_iter().collect(),
        };
        let body = serde_json::to_value(&metadata)
            .map_err(|e| AppError::InvalidInput(format!("Unserializable folder metadata: {}", e)))?;
        self.request(Method::POST, "/files", &[("fields", "id,name")], Some(&body))
            .await
    }

    /// Files directly inside `folder_id` (or anywhere, when `None`).
    pub async fn list_files(
        &self,
        folder_id: Option<&str>,
        page_size: u32,
    ) -> Result<Vec<DriveFile>, AppError> {
        let page_size = page_size.to_string();
        let mut query = vec![("pageSize", page_size.as_str()), ("fields", LIST_FIELDS)];
        let filter = folder_id.map(|id| format!("'{}' in parents", escape_query(id)));
        if let Some(filter) = filter.as_deref() {
            query.push(("q", filter));
        }
        let list: FileList = self.request(Method::GET, "/files", &query, None).await?;
        Ok(list.files)
    }

    /// Files whose name contains `name_fragment`, optionally of one MIME type.
    pub async fn search_files(
        &self,
        name_fragment: &str,
        mime_type: Option<&str>,
    ) -> Result<Vec<DriveFile>, AppError> {
        let mut filter = format!("name contains '{}'", escape_query(name_fragment));
        if let Some(mime_type) = mime_type {
            filter.push_str(&format!(" and mimeType='{}'", escape_query(mime_type)));
        }
        let query = [("q", filter.as_str()), ("fields", SEARCH_FIELDS)];
        let list: FileList = self.request(Method::GET, "/files", &query, None).await?;
        Ok(list.files)
    }

    /// Writes the file's content to `destination` and returns that path.
    pub async fn download_file(
        &self,
        file_id: &str,
        destination: &Path,
    ) -> Result<PathBuf, AppError> {
        let response = self
            .send_raw(Method::GET, &file_path(file_id), &[("alt", "media")], None)
            .await?;
        tokio::fs::write(destination, &response.data)
            .await
            .map_err(|e| AppError::file_system(destination, e))?;
        log::info!(
            "Downloaded {} ({} bytes) to {}",
            file_id,
            response.data.len(),
            destination.display()
        );
        Ok(destination.to_path_buf())
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<(), AppError> {
        self.send_raw(Method::DELETE, &file_path(file_id), &[], None)
            .await?;
        Ok(())
    }

    /// Grants `email_address` access to the file.
    pub async fn share_file(
        &self,
        file_id: &str,
        email_address: &str,
        role: ShareRole,
    ) -> Result<Permission, AppError> {
        let body = json!({
            "type": "user",
            "role": role,
            "emailAddress": email_address,
        });
        let endpoint = format!("{}/permissions", file_path(file_id));
        self.request(Method::POST, &endpoint, &[("fields", "id")], Some(&body))
            .await
    }

    pub async fn get_file_metadata(&self, file_id: &str) -> Result<DriveFile, AppError> {
        self.request(
            Method::GET,
            &file_path(file_id),
            &[("fields", METADATA_FIELDS)],
            None,
        )
        .await
    }

    /// Re-parents a file: adds `new_parent_id` and removes every current parent.
    pub async fn move_file(&self, file_id: &str, new_parent_id: &str) -> Result<DriveFile, AppError> {
        let current: Parents = self
            .request(Method::GET, &file_path(file_id), &[("fields", "parents")], None)
            .await?;
        let previous_parents = current.parents.join(",");
        let query = [
            ("addParents", new_parent_id),
            ("removeParents", previous_parents.as_str()),
            ("fields", "id,parents"),
        ];
        self.request(Method::PATCH, &file_path(file_id), &query, Some(&json!({})))
            .await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<T, AppError> {
        let response = self.send_raw(method, endpoint, query, body).await?;
        decode_response(&response)
    }

    async fn send_raw(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<ApiResponse<Vec<u8>>, AppError> {
        let url = self.executor.config().url_for(endpoint);
        let label = format!("{} {} {}", Service::GoogleDrive, method, endpoint);
        let token = self.auth.access_token().await?;

        self.executor
            .send(&label, |client| {
                let request = client
                    .request(method.clone(), &url)
                    .bearer_auth(&token)
                    .query(query);
                match body {
                    Some(body) => request.json(body),
                    None => request,
                }
            })
            .await
    }
}

fn file_path(file_id: &str) -> String {
    format!("/files/{}", file_id)
}

fn decode_response<T: DeserializeOwned>(response: &ApiResponse<Vec<u8>>) -> Result<T, AppError> {
    let value = parser::parse_json_body(Service::GoogleDrive, response)?;
    parser::decode(Service::GoogleDrive, value)
}

/// Escapes a literal for use inside a single-quoted Drive query string.
fn escape_query(literal: &str) -> String {
    literal.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Builds a `multipart/related` body: JSON metadata part, then the content part.
fn multipart_related_body(
    boundary: &str,
    metadata: &UploadMetadata<'_>,
    content_type: &str,
    content: &[u8],
) -> Result<Vec<u8>, AppError> {
    let metadata = serde_json::to_string(metadata)
        .map_err(|e| AppError::InvalidInput(format!("Unserializable upload metadata: {}", e)))?;

    let mut body = Vec::with_capacity(content.len() + metadata.len() + 256);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!("--{boundary}\r\nContent-Type: {content_type}\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    Ok(body)
}

#[async_trait::async_trait]
impl FileStore for DriveClient {
    async fn upload_file(
        &self,
        path: &Path,
        name: Option<&str>,
        folder_id: Option<&str>,
    ) -> Result<DriveFile, AppError> {
        DriveClient::upload_file(self, path, name, folder_id).await
    }

    async fn upload_text_file(
        &self,
        content: &str,
        name: &str,
        folder_id: Option<&str>,
    ) -> Result<DriveFile, AppError> {
        DriveClient::upload_text_file(self, content, name, folder_id).await
    }
}
