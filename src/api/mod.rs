//! API client module.
//!
//! Provides the HTTP client with bearer auth and envelope handling, plus one
//! async function per backend operation, grouped by path namespace.

pub mod client;
pub mod error;
pub mod files;
pub mod health;
pub mod shares;
pub mod types;
pub mod users;


pub use client::ApiClient;
pub use error::ApiError;
pub use files::{
    auth_probe, create_folder, delete_user_item, get_download_url, get_user_file_list,
    move_user_file, probe_token, rename_user_file, upload_file, upload_path,
};
pub use health::{health, ready};
pub use shares::{create_share, get_share, get_share_url, save_share};
pub use users::{
    change_password, encode_password, get_user_detail, login, register, reset_password,
    send_verification_code,
};
