//! File and folder operations under `/api/file/*`.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method};
use serde::de::IgnoredAny;

use super::client::{ApiClient, Endpoint, Payload};
use super::error::ApiError;
use super::types::{
    CreateFolderRequest, DeleteRequest, DownloadLink, DownloadUrlRequest, FileListPage,
    FileListRequest, FolderCreated, MessageAck, MoveRequest, RenameRequest,
};

static FILE_LIST: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/file/user/list",
    fallback: "获取文件列表失败",
    rejects_oversized: false,
};

static UPLOAD: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/file/upload",
    fallback: "上传失败",
    rejects_oversized: true,
};

static CREATE_FOLDER: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/file/user/folder/create",
    fallback: "创建文件夹失败",
    rejects_oversized: false,
};

static RENAME: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/file/user/file/name/update",
    fallback: "重命名失败",
    rejects_oversized: false,
};

static MOVE: Endpoint = Endpoint {
    method: Method::PUT,
    path: "/api/file/user/file/move",
    fallback: "移动失败",
    rejects_oversized: false,
};

static DELETE: Endpoint = Endpoint {
    method: Method::DELETE,
    path: "/api/file/user/folder/delete",
    fallback: "删除失败",
    rejects_oversized: false,
};

static DOWNLOAD_URL: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/file/url",
    fallback: "获取下载链接失败",
    rejects_oversized: false,
};

/// Check whether `token` is still accepted by the backend.
///
/// Never fails: any transport, status or envelope error is logged and
/// reported as `false`. Use [`probe_token`] to tell the causes apart.
pub async fn auth_probe(client: &ApiClient, token: &str) -> bool {
    match probe_token(client, token).await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Auth probe failed: {}", e);
            false
        }
    }
}

/// Post the smallest possible listing query with `token`.
pub async fn probe_token(client: &ApiClient, token: &str) -> Result<(), ApiError> {
    let body = FileListRequest { id: 0, page: 1, size: 1 };
    client
        .call::<IgnoredAny>(&FILE_LIST, Some(token), Payload::json(&body)?)
        .await?;
    Ok(())
}

/// List one page of the folder with id `parent_id` (0 is the root).
pub async fn get_user_file_list(
    client: &ApiClient,
    parent_id: i64,
    page: u32,
    size: u32,
    token: &str,
) -> Result<FileListPage, ApiError> {
    let body = FileListRequest {
        id: parent_id,
        page,
        size,
    };
    client.call(&FILE_LIST, Some(token), Payload::json(&body)?).await
}

/// Upload `size` bytes from `body` as `file_name` into folder `parent_id`.
///
/// POST /api/file/upload as multipart form data. The part is streamed, so
/// `body` can wrap an open file. HTTP 413 maps to
/// [`ApiError::PayloadTooLarge`] whatever the body says.
pub async fn upload_file(
    client: &ApiClient,
    file_name: &str,
    body: impl Into<Body>,
    size: u64,
    parent_id: i64,
    token: &str,
) -> Result<MessageAck, ApiError> {
    let part = Part::stream_with_length(body, size)
        .file_name(file_name.to_string())
        .mime_str("application/octet-stream")?;

    let form = Form::new()
        .part("file", part)
        .text("parent_id", parent_id.to_string())
        .text("name", file_name.to_string())
        .text("ext", extension_of(file_name))
        .text("size", size.to_string());

    client.call(&UPLOAD, Some(token), Payload::Multipart(form)).await
}

/// Upload a local file, streaming it from disk under its own file name.
pub async fn upload_path(
    client: &ApiClient,
    path: &Path,
    parent_id: i64,
    token: &str,
) -> Result<MessageAck, ApiError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a file path: {}", path.display()),
            )
        })?
        .to_string();

    let file = tokio::fs::File::open(path).await?;
    let size = file.metadata().await?.len();
    log::info!("Uploading {} ({} bytes)", file_name, size);
    upload_file(client, &file_name, file, size, parent_id, token).await
}

pub async fn create_folder(
    client: &ApiClient,
    parent_id: i64,
    name: &str,
    token: &str,
) -> Result<FolderCreated, ApiError> {
    let body = CreateFolderRequest { parent_id, name };
    client
        .call(&CREATE_FOLDER, Some(token), Payload::json(&body)?)
        .await
}

pub async fn rename_user_file(
    client: &ApiClient,
    identity: &str,
    name: &str,
    token: &str,
) -> Result<(), ApiError> {
    let body = RenameRequest { identity, name };
    client
        .call::<IgnoredAny>(&RENAME, Some(token), Payload::json(&body)?)
        .await?;
    Ok(())
}

/// Move an item under folder `parent_id`, keeping or changing its `name`.
pub async fn move_user_file(
    client: &ApiClient,
    identity: &str,
    name: &str,
    parent_id: i64,
    token: &str,
) -> Result<(), ApiError> {
    let body = MoveRequest {
        identity,
        name,
        parent_id,
    };
    client
        .call::<IgnoredAny>(&MOVE, Some(token), Payload::json(&body)?)
        .await?;
    Ok(())
}

/// Delete a file or folder by identity.
pub async fn delete_user_item(client: &ApiClient, identity: &str, token: &str) -> Result<(), ApiError> {
    let body = DeleteRequest { identity };
    client
        .call::<IgnoredAny>(&DELETE, Some(token), Payload::json(&body)?)
        .await?;
    Ok(())
}

/// Get a presigned download URL valid for `expires` seconds.
pub async fn get_download_url(
    client: &ApiClient,
    repository_identity: &str,
    expires: i64,
    token: &str,
) -> Result<DownloadLink, ApiError> {
    let body = DownloadUrlRequest {
        repository_identity,
        expires,
    };
    client
        .call(&DOWNLOAD_URL, Some(token), Payload::json(&body)?)
        .await
}

/// Extension including the leading dot, or empty.
fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[idx..].to_string(),
        _ => String::new(),
    }
}
