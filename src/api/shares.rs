//! Share-link operations under `/api/share/*`.
//!
//! Creating and saving shares needs a token; looking a share up and getting
//! its download URL are public.

use reqwest::Method;

use super::client::{ApiClient, Endpoint, Payload};
use super::error::ApiError;
use super::types::{
    CreateShareRequest, DownloadLink, SaveShareRequest, ShareCreated, ShareDetail, ShareSaved,
    ShareUrlRequest,
};

static CREATE_SHARE: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/share/create",
    fallback: "创建分享失败",
    rejects_oversized: false,
};

static GET_SHARE: Endpoint = Endpoint {
    method: Method::GET,
    path: "/api/share/get",
    fallback: "获取分享失败",
    rejects_oversized: false,
};

static SHARE_URL: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/share/url",
    fallback: "获取分享下载链接失败",
    rejects_oversized: false,
};

static SAVE_SHARE: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/share/save",
    fallback: "保存分享失败",
    rejects_oversized: false,
};

/// Share the repository object `repository_identity` for `expired_time` seconds.
pub async fn create_share(
    client: &ApiClient,
    repository_identity: &str,
    expired_time: i64,
    token: &str,
) -> Result<ShareCreated, ApiError> {
    let body = CreateShareRequest {
        identity: repository_identity,
        expired_time,
    };
    client
        .call(&CREATE_SHARE, Some(token), Payload::json(&body)?)
        .await
}

/// Look up a share by its identity (GET with a query parameter).
pub async fn get_share(client: &ApiClient, identity: &str) -> Result<ShareDetail, ApiError> {
    let query = vec![("identity", identity.to_string())];
    client.call(&GET_SHARE, None, Payload::Query(query)).await
}

pub async fn get_share_url(
    client: &ApiClient,
    share_identity: &str,
    expires: i64,
) -> Result<DownloadLink, ApiError> {
    let body = ShareUrlRequest {
        share_identity,
        expires,
    };
    client.call(&SHARE_URL, None, Payload::json(&body)?).await
}

/// Copy a shared object into the caller's tree under `parent_id` as `name`.
pub async fn save_share(
    client: &ApiClient,
    repository_identity: &str,
    parent_id: i64,
    name: &str,
    token: &str,
) -> Result<ShareSaved, ApiError> {
    let body = SaveShareRequest {
        repository_identity,
        parent_id,
        name,
    };
    client
        .call(&SAVE_SHARE, Some(token), Payload::json(&body)?)
        .await
}
