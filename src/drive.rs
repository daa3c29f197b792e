//! Google Drive API v3 client.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use futures::future::BoxFuture;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder};
use serde_json::json;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use crate::auth::Authenticator;
use crate::error::{error_for_status, GoogleError, Result};
use crate::mime::{default_conversion_map, ConversionMap, GoogleMimeType, FOLDER};
use crate::models::{FileListResponse, FileMetadata, Paged, Permission, PermissionListResponse};
use crate::url_parser::extract_id;

/// Base URL for Google Drive API v3.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Upload URL for Google Drive API.
const UPLOAD_API_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Threshold for resumable upload (500 MB).
const RESUMABLE_THRESHOLD: u64 = 500 * 1024 * 1024;

/// Exports at or above this size are fetched through the file's export link.
pub const DOWNLOAD_LIMIT: u64 = 4_000_000;

const DEFAULT_ORDER_BY: &str = "modifiedTime desc";

/// Quote a string literal for a Drive search query.
pub fn q_escape(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Options for [`Drive::list_with`].
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub fields: String,
    pub order_by: String,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            fields: "*".to_string(),
            order_by: DEFAULT_ORDER_BY.to_string(),
        }
    }
}

/// Options for [`Drive::upload_file`] and [`Drive::upload_data`].
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Drive MIME type of the created file. A Google-native type converts
    /// the upload (e.g. CSV into a spreadsheet).
    pub mime_type: Option<GoogleMimeType>,
    /// Parent folder IDs or URLs.
    pub parents: Vec<String>,
    /// Update an existing file with the same name (or stem) in the parents
    /// instead of creating a duplicate.
    pub update: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            mime_type: None,
            parents: Vec::new(),
            update: true,
        }
    }
}

/// Options for [`Drive::download`].
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Download folder contents, mirroring the tree locally.
    pub recursive: bool,
    /// Export formats for Google-native documents.
    pub conversion_map: ConversionMap,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            conversion_map: default_conversion_map(),
        }
    }
}

/// Options for [`Drive::permissions_create`].
#[derive(Debug, Clone)]
pub struct PermissionOptions {
    pub role: String,
    pub send_notification_email: bool,
    /// Create the permission even if the user already has one.
    pub update: bool,
}

impl Default for PermissionOptions {
    fn default() -> Self {
        Self {
            role: "reader".to_string(),
            send_notification_email: true,
            update: false,
        }
    }
}

/// Client for interacting with Google Drive.
#[derive(Clone)]
pub struct Drive {
    auth: Authenticator,
    http: Client,
    base_url: String,
    upload_url: String,
    drive_id: Option<String>,
}

impl Drive {
    /// Create a new Drive client.
    pub fn new(auth: Authenticator) -> Self {
        Self {
            auth,
            http: Client::new(),
            base_url: DRIVE_API_BASE.to_string(),
            upload_url: UPLOAD_API_BASE.to_string(),
            drive_id: None,
        }
    }

    /// Scope listings to a Shared Drive.
    pub fn with_shared_drive(mut self, drive_id: impl Into<String>) -> Self {
        self.drive_id = Some(drive_id.into());
        self
    }

    /// Override the Drive API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the Drive upload base URL.
    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = url.into();
        self
    }

    /// Get the Shared Drive ID, if any.
    pub fn drive_id(&self) -> Option<&str> {
        self.drive_id.as_deref()
    }

    /// Fetch every page of a list endpoint.
    async fn paginate<P: Paged>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<P::Item>> {
        let token = self.auth.get_access_token().await?;
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(url).bearer_auth(&token).query(params);

            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            debug!(url, page_token = ?page_token, "listing page");
            let response = error_for_status(request.send().await?).await?;
            let (page, next_page_token) = response.json::<P>().await?.into_page();
            items.extend(page);

            match next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(items)
    }

    /// Get file metadata by ID or URL.
    pub async fn get(&self, file_id: &str) -> Result<FileMetadata> {
        let file_id = extract_id(file_id)?;
        let token = self.auth.get_access_token().await?;

        debug!(%file_id, "getting file");
        let response = self
            .http
            .get(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true"), ("fields", "*")])
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// Query files using Google Drive query syntax.
    pub async fn list(&self, query: &str) -> Result<Vec<FileMetadata>> {
        self.list_with(query, &ListOptions::default()).await
    }

    /// Query files with explicit fields and ordering.
    pub async fn list_with(&self, query: &str, options: &ListOptions) -> Result<Vec<FileMetadata>> {
        let mut params = vec![
            ("q", query.to_string()),
            ("fields", options.fields.clone()),
            ("orderBy", options.order_by.clone()),
            ("includeItemsFromAllDrives", "true".to_string()),
            ("supportsAllDrives", "true".to_string()),
        ];

        if let Some(ref drive_id) = self.drive_id {
            params.push(("driveId", drive_id.clone()));
            params.push(("corpora", "drive".to_string()));
        }

        self.paginate::<FileListResponse>(&format!("{}/files", self.base_url), &params)
            .await
    }

    /// List all non-trashed files in a folder.
    pub async fn list_children(&self, parent_id: &str) -> Result<Vec<FileMetadata>> {
        let parent_id = extract_id(parent_id)?;
        let query = format!("{} in parents and trashed = false", q_escape(&parent_id));
        self.list(&query).await
    }

    /// Find a file by name in a folder.
    pub async fn find_file(&self, name: &str, parent_id: &str) -> Result<Option<FileMetadata>> {
        let parent_id = extract_id(parent_id)?;
        let query = format!(
            "name = {} and {} in parents and trashed = false",
            q_escape(name),
            q_escape(&parent_id)
        );
        let files = self.list(&query).await?;
        Ok(files.into_iter().next())
    }

    /// Delete a file by ID. A missing file is not an error.
    pub async fn delete(&self, file_id: &str) -> Result<()> {
        let file_id = extract_id(file_id)?;
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .delete(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true")])
            .send()
            .await?;

        if response.status().as_u16() == 404 {
            warn!(%file_id, "file to delete does not exist");
            return Ok(());
        }
        error_for_status(response).await?;

        Ok(())
    }

    /// Copy a file into a folder under a new name.
    pub async fn copy(
        &self,
        file_id: &str,
        to_filename: &str,
        to_folder_id: &str,
    ) -> Result<FileMetadata> {
        let file_id = extract_id(file_id)?;
        let to_folder_id = extract_id(to_folder_id)?;
        let token = self.auth.get_access_token().await?;

        info!(%file_id, to_filename, %to_folder_id, "copying file");
        let response = self
            .http
            .post(format!("{}/files/{}/copy", self.base_url, file_id))
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true"), ("fields", "*")])
            .json(&json!({ "name": to_filename, "parents": [to_folder_id] }))
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// Create a metadata-only file (a folder, or an empty Google document).
    async fn create_object(
        &self,
        name: &str,
        mime_type: &str,
        parents: &[String],
    ) -> Result<FileMetadata> {
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true"), ("fields", "*")])
            .json(&json!({ "name": name, "mimeType": mime_type, "parents": parents }))
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// Create a folder.
    pub async fn create_folder(&self, name: &str, parents: &[String]) -> Result<FileMetadata> {
        let parents = parse_ids(parents)?;
        info!(name, ?parents, "creating folder");
        self.create_object(name, FOLDER, &parents).await
    }

    /// Create a Drive object for `path`.
    ///
    /// With `create_folders`, one folder is created per directory component of
    /// `path`, each nested in the previous. With a `mime_type`, a metadata-only
    /// object named after the last component is created in the innermost
    /// folder; without one, the innermost created folder is returned. With
    /// `update`, an existing file of the same name in `parents` is returned
    /// instead.
    pub async fn create_file_object<P: AsRef<Path>>(
        &self,
        path: P,
        mime_type: Option<GoogleMimeType>,
        parents: &[String],
        create_folders: bool,
        update: bool,
    ) -> Result<Option<FileMetadata>> {
        let path = path.as_ref();
        let mut parents = parse_ids(parents)?;
        let name = file_name(path)?;

        if update {
            if let Some(existing) = self.find_existing(name, &parents).await? {
                return Ok(Some(existing));
            }
        }

        let mut created = None;
        if create_folders {
            let dirs = path.parent().into_iter().flat_map(|p| p.components());
            for dir in dirs {
                let Component::Normal(dir) = dir else {
                    continue;
                };
                let folder = self
                    .create_object(&dir.to_string_lossy(), FOLDER, &parents)
                    .await?;
                parents = vec![folder.id.clone()];
                created = Some(folder);
            }
        }

        match mime_type {
            Some(mime_type) => Ok(Some(
                self.create_object(name, mime_type.as_str(), &parents).await?,
            )),
            None => Ok(created),
        }
    }

    /// Ensure each named folder exists directly under `parent_id`.
    ///
    /// Returns every child of the parent keyed by name, including the newly
    /// created folders.
    pub async fn create_folders_if_not_exists(
        &self,
        folder_names: &[&str],
        parent_id: &str,
    ) -> Result<HashMap<String, FileMetadata>> {
        let parent_id = extract_id(parent_id)?;

        let mut folders: HashMap<String, FileMetadata> = self
            .list_children(&parent_id)
            .await?
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect();

        for name in folder_names {
            if !folders.contains_key(*name) {
                let folder = self.create_folder(name, &[parent_id.clone()]).await?;
                folders.insert(name.to_string(), folder);
            }
        }

        Ok(folders)
    }

    /// Find a non-trashed file in any of `parents` named `name` or its stem.
    async fn find_existing(&self, name: &str, parents: &[String]) -> Result<Option<FileMetadata>> {
        if parents.is_empty() {
            return Ok(None);
        }

        let stem = Path::new(name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());

        let parents_query = parents
            .iter()
            .map(|p| format!("{} in parents", q_escape(p)))
            .collect::<Vec<_>>()
            .join(" or ");
        let names_query = format!("name = {} or name = {}", q_escape(name), q_escape(&stem));
        let query = format!("({}) and ({}) and (trashed = false)", parents_query, names_query);

        Ok(self.list(&query).await?.into_iter().next())
    }

    /// Replace a file's content with a local file.
    pub async fn update<P: AsRef<Path>>(&self, file_id: &str, local_path: P) -> Result<FileMetadata> {
        let file_id = extract_id(file_id)?;
        let local_path = local_path.as_ref();
        let mime_type = guess_mime(local_path);
        let file_size = tokio::fs::metadata(local_path).await?.len();

        info!(%file_id, path = %local_path.display(), "updating file content");
        if file_size > RESUMABLE_THRESHOLD {
            let url = format!("{}/files/{}", self.upload_url, file_id);
            let token = self.auth.get_access_token().await?;
            let init = self.http.patch(&url).bearer_auth(&token);
            self.upload_resumable(init, local_path, &json!({}), &mime_type, file_size)
                .await
        } else {
            let content = tokio::fs::read(local_path).await?;
            self.update_data(&file_id, content, &mime_type).await
        }
    }

    /// Replace a file's content with in-memory bytes.
    async fn update_data(&self, file_id: &str, data: Vec<u8>, mime_type: &str) -> Result<FileMetadata> {
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .patch(format!("{}/files/{}", self.upload_url, file_id))
            .bearer_auth(&token)
            .query(&[
                ("uploadType", "media"),
                ("supportsAllDrives", "true"),
                ("fields", "*"),
            ])
            .header("Content-Type", mime_type)
            .body(data)
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// Upload a local file.
    ///
    /// When `options.update` is set and a file with the same name exists in the
    /// parents, its content is replaced instead.
    pub async fn upload_file<P: AsRef<Path>>(
        &self,
        local_path: P,
        options: &UploadOptions,
    ) -> Result<FileMetadata> {
        let local_path = local_path.as_ref();
        let filename = file_name(local_path)?;
        let parents = parse_ids(&options.parents)?;

        if options.update {
            if let Some(existing) = self.find_existing(filename, &parents).await? {
                return self.update(&existing.id, local_path).await;
            }
        }

        let file_size = tokio::fs::metadata(local_path).await?.len();
        let mime_type = guess_mime(local_path);
        let metadata = upload_metadata(filename, &parents, options.mime_type);

        info!(filename, file_size, ?parents, "uploading file");
        if file_size > RESUMABLE_THRESHOLD {
            let token = self.auth.get_access_token().await?;
            let init = self
                .http
                .post(format!("{}/files", self.upload_url))
                .bearer_auth(&token);
            self.upload_resumable(init, local_path, &metadata, &mime_type, file_size)
                .await
        } else {
            let content = tokio::fs::read(local_path).await?;
            self.upload_multipart(&metadata, filename, content, &mime_type)
                .await
        }
    }

    /// Upload in-memory bytes as a file named `name`.
    pub async fn upload_data(
        &self,
        data: Vec<u8>,
        name: &str,
        options: &UploadOptions,
    ) -> Result<FileMetadata> {
        let parents = parse_ids(&options.parents)?;
        let mime_type = guess_mime(Path::new(name));

        if options.update {
            if let Some(existing) = self.find_existing(name, &parents).await? {
                info!(name, file_id = %existing.id, "replacing existing file content");
                return self.update_data(&existing.id, data, &mime_type).await;
            }
        }

        info!(name, size = data.len(), ?parents, "uploading data");
        let metadata = upload_metadata(name, &parents, options.mime_type);
        self.upload_multipart(&metadata, name, data, &mime_type).await
    }

    /// Upload a file using multipart upload (for smaller files).
    async fn upload_multipart(
        &self,
        metadata: &serde_json::Value,
        filename: &str,
        content: Vec<u8>,
        mime_type: &str,
    ) -> Result<FileMetadata> {
        let token = self.auth.get_access_token().await?;

        let metadata_part = Part::text(metadata.to_string()).mime_str("application/json")?;

        let file_part = Part::bytes(content)
            .file_name(filename.to_string())
            .mime_str(mime_type)?;

        let form = Form::new()
            .part("metadata", metadata_part)
            .part("file", file_part);

        let response = self
            .http
            .post(format!("{}/files", self.upload_url))
            .bearer_auth(&token)
            .query(&[
                ("uploadType", "multipart"),
                ("supportsAllDrives", "true"),
                ("fields", "*"),
            ])
            .multipart(form)
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// Upload a file using a resumable session (for larger files).
    ///
    /// `init` is the authorized POST (create) or PATCH (update) request that
    /// opens the session.
    async fn upload_resumable(
        &self,
        init: RequestBuilder,
        local_path: &Path,
        metadata: &serde_json::Value,
        mime_type: &str,
        file_size: u64,
    ) -> Result<FileMetadata> {
        // Step 1: Initiate resumable upload
        let init_response = init
            .query(&[("uploadType", "resumable"), ("supportsAllDrives", "true")])
            .header("X-Upload-Content-Type", mime_type)
            .header("X-Upload-Content-Length", file_size.to_string())
            .json(metadata)
            .send()
            .await?;

        let init_response = error_for_status(init_response).await?;

        let upload_url = init_response
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| GoogleError::ApiError {
                status: 500,
                message: "No upload URL in response".to_string(),
            })?
            .to_string();

        debug!(%upload_url, "resumable session opened");

        // Step 2: Stream the file content
        let file = File::open(local_path).await?;
        let upload_response = self
            .http
            .put(&upload_url)
            .header("Content-Type", mime_type)
            .header("Content-Length", file_size.to_string())
            .query(&[("fields", "*")])
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await?;

        Ok(error_for_status(upload_response).await?.json().await?)
    }

    /// Download a file or folder.
    ///
    /// If `destination` is an existing directory, the file is saved inside it
    /// under its Drive name. Google-native documents are exported according to
    /// `options.conversion_map`, replacing the extension. Returns the local
    /// path written.
    pub async fn download<P: AsRef<Path>>(
        &self,
        file_id: &str,
        destination: P,
        options: &DownloadOptions,
    ) -> Result<PathBuf> {
        let destination = destination.as_ref();
        let metadata = self.get(file_id).await?;

        let final_path = if destination.is_dir() {
            destination.join(&metadata.name)
        } else {
            destination.to_path_buf()
        };

        self.download_entry(final_path, metadata, options).await
    }

    fn download_entry<'a>(
        &'a self,
        out_path: PathBuf,
        metadata: FileMetadata,
        options: &'a DownloadOptions,
    ) -> BoxFuture<'a, Result<PathBuf>> {
        Box::pin(async move {
            if metadata.is_folder() {
                tokio::fs::create_dir_all(&out_path).await?;
                if !options.recursive {
                    warn!(folder = %metadata.name, "skipping folder contents (not recursive)");
                    return Ok(out_path);
                }
                for child in self.list_children(&metadata.id).await? {
                    let child_path = out_path.join(&child.name);
                    self.download_entry(child_path, child, options).await?;
                }
                return Ok(out_path);
            }

            if let Some(parent) = out_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }

            let token = self.auth.get_access_token().await?;
            let mime_type = metadata.mime_type.as_deref().unwrap_or_default();

            let (out_path, request) = match options.conversion_map.get(mime_type) {
                Some(conversion) => {
                    let export_mime = conversion.mime_type.as_str();
                    let out_path = out_path.with_extension(conversion.extension);
                    let export_link = metadata
                        .export_links
                        .get(export_mime)
                        .filter(|_| metadata.size.unwrap_or(0) >= DOWNLOAD_LIMIT);

                    let request = match export_link {
                        Some(link) => self.http.get(link),
                        None => self
                            .http
                            .get(format!("{}/files/{}/export", self.base_url, metadata.id))
                            .query(&[("mimeType", export_mime)]),
                    };
                    (out_path, request)
                }
                None => {
                    let request = self
                        .http
                        .get(format!("{}/files/{}", self.base_url, metadata.id))
                        .query(&[("alt", "media"), ("supportsAllDrives", "true")]);
                    (out_path, request)
                }
            };

            info!(file_id = %metadata.id, path = %out_path.display(), "downloading file");
            self.stream_to_file(request.bearer_auth(&token), &out_path)
                .await?;

            Ok(out_path)
        })
    }

    async fn stream_to_file(&self, request: RequestBuilder, path: &Path) -> Result<()> {
        let response = error_for_status(request.send().await?).await?;

        let mut file = File::create(path).await?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        Ok(())
    }

    /// Get a single permission.
    pub async fn permissions_get(&self, file_id: &str, permission_id: &str) -> Result<Permission> {
        let file_id = extract_id(file_id)?;
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .get(format!(
                "{}/files/{}/permissions/{}",
                self.base_url, file_id, permission_id
            ))
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true"), ("fields", "*")])
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// List all permissions on a file.
    pub async fn permissions_list(&self, file_id: &str) -> Result<Vec<Permission>> {
        let file_id = extract_id(file_id)?;
        let params = [
            ("supportsAllDrives", "true".to_string()),
            ("fields", "*".to_string()),
        ];

        self.paginate::<PermissionListResponse>(
            &format!("{}/files/{}/permissions", self.base_url, file_id),
            &params,
        )
        .await
    }

    /// Grant `email_address` access to a file.
    ///
    /// Unless `options.update` is set, an existing permission for the same
    /// (case-insensitive) address is returned and nothing is created.
    pub async fn permissions_create(
        &self,
        file_id: &str,
        email_address: &str,
        options: &PermissionOptions,
    ) -> Result<Permission> {
        let file_id = extract_id(file_id)?;
        let permission = Permission::user(email_address, &options.role);

        if !options.update {
            let existing = self
                .permissions_list(&file_id)
                .await?
                .into_iter()
                .find(|p| {
                    p.email_address.as_deref().map(|e| e.trim().to_lowercase())
                        == permission.email_address
                });
            if let Some(existing) = existing {
                debug!(%file_id, email_address, "permission already exists");
                return Ok(existing);
            }
        }

        let token = self.auth.get_access_token().await?;
        info!(%file_id, email_address, role = %options.role, "granting permission");

        let response = self
            .http
            .post(format!("{}/files/{}/permissions", self.base_url, file_id))
            .bearer_auth(&token)
            .query(&[
                ("supportsAllDrives", "true"),
                ("fields", "*"),
                (
                    "sendNotificationEmail",
                    if options.send_notification_email { "true" } else { "false" },
                ),
            ])
            .json(&permission)
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// Remove a permission from a file.
    pub async fn permissions_delete(&self, file_id: &str, permission_id: &str) -> Result<()> {
        let file_id = extract_id(file_id)?;
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .delete(format!(
                "{}/files/{}/permissions/{}",
                self.base_url, file_id, permission_id
            ))
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true")])
            .send()
            .await?;

        error_for_status(response).await?;
        Ok(())
    }
}

fn parse_ids(ids: &[String]) -> Result<Vec<String>> {
    ids.iter().map(|id| extract_id(id)).collect()
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| GoogleError::FileNotFound(path.display().to_string()))
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

fn upload_metadata(
    name: &str,
    parents: &[String],
    mime_type: Option<GoogleMimeType>,
) -> serde_json::Value {
    let mut metadata = json!({ "name": name });
    if !parents.is_empty() {
        metadata["parents"] = json!(parents);
    }
    if let Some(mime_type) = mime_type {
        metadata["mimeType"] = json!(mime_type.as_str());
    }
    metadata
}
