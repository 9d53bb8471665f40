//! Account operations under `/api/users/*`.

use base64::Engine;
use reqwest::Method;

use super::client::{ApiClient, Endpoint, Payload};
use super::error::ApiError;
use super::types::{
    ChangePasswordRequest, LoginRequest, LoginResult, MessageAck, RegisterRequest,
    ResetPasswordRequest, SendVerificationCodeRequest, UserDetail, UserDetailRequest,
};

static LOGIN: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/users/login",
    fallback: "登录失败",
    rejects_oversized: false,
};

static REGISTER: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/users/register",
    fallback: "注册失败",
    rejects_oversized: false,
};

static SEND_VERIFICATION_CODE: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/users/send-verification-code",
    fallback: "发送验证码失败",
    rejects_oversized: false,
};

static CHANGE_PASSWORD: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/users/password/update",
    fallback: "修改密码失败",
    rejects_oversized: false,
};

static RESET_PASSWORD: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/users/password/reset",
    fallback: "重置密码失败",
    rejects_oversized: false,
};

static USER_DETAIL: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/users/detail",
    fallback: "获取用户信息失败",
    rejects_oversized: false,
};

/// Base64-encode a password for transport.
///
/// This is obfuscation the backend expects, NOT encryption: anyone who sees
/// the body can decode it. Confidentiality comes from TLS only.
pub fn encode_password(password: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(password.as_bytes())
}

/// Log in with a user name (or email) and password.
///
/// POST /api/users/login. Returns the bearer token and display name; storing
/// the token is the caller's job (see `Session::login`).
pub async fn login(client: &ApiClient, name: &str, password: &str) -> Result<LoginResult, ApiError> {
    let body = LoginRequest {
        name,
        password: encode_password(password),
    };
    client.call(&LOGIN, None, Payload::json(&body)?).await
}

/// Create an account. `code` is the emailed verification code.
pub async fn register(
    client: &ApiClient,
    name: &str,
    email: &str,
    password: &str,
    code: &str,
) -> Result<LoginResult, ApiError> {
    let body = RegisterRequest {
        name,
        email,
        password: encode_password(password),
        code,
    };
    client.call(&REGISTER, None, Payload::json(&body)?).await
}

pub async fn send_verification_code(client: &ApiClient, email: &str) -> Result<MessageAck, ApiError> {
    let body = SendVerificationCodeRequest { email };
    client
        .call(&SEND_VERIFICATION_CODE, None, Payload::json(&body)?)
        .await
}

/// Change the password of the user identified by `identity`.
pub async fn change_password(
    client: &ApiClient,
    identity: &str,
    old_password: &str,
    new_password: &str,
    token: &str,
) -> Result<MessageAck, ApiError> {
    let body = ChangePasswordRequest {
        identity,
        old_password: encode_password(old_password),
        new_password: encode_password(new_password),
    };
    client
        .call(&CHANGE_PASSWORD, Some(token), Payload::json(&body)?)
        .await
}

/// Reset a forgotten password using an emailed verification code.
pub async fn reset_password(
    client: &ApiClient,
    email: &str,
    code: &str,
    new_password: &str,
) -> Result<MessageAck, ApiError> {
    let body = ResetPasswordRequest {
        email,
        code,
        new_password: encode_password(new_password),
    };
    client
        .call(&RESET_PASSWORD, None, Payload::json(&body)?)
        .await
}

pub async fn get_user_detail(client: &ApiClient, identity: &str) -> Result<UserDetail, ApiError> {
    let body = UserDetailRequest { identity };
    client.call(&USER_DETAIL, None, Payload::json(&body)?).await
}
