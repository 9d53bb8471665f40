//! Subcommands of the `cloud-disk` binary.
//!
//! Each command maps onto one API operation (or a short sequence of them)
//! and prints the result as JSON on stdout.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;

use cloud_disk_client::api;
use cloud_disk_client::auth::TokenStorage;
use cloud_disk_client::Session;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and remember the token
    Login {
        name: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account (needs a code from `send-code`)
    Register {
        name: String,
        email: String,
        code: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Email a verification code
    SendCode { email: String },
    /// Change the password of the logged-in user
    Passwd {
        #[arg(long)]
        old: Option<String>,
        #[arg(long)]
        new: Option<String>,
    },
    /// Reset a forgotten password with an emailed code
    ResetPassword {
        email: String,
        code: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Show the logged-in user
    Whoami,
    /// Check whether the stored token is still accepted
    Probe,
    /// Forget the stored token
    Logout,
    /// List a folder
    Ls {
        #[arg(default_value_t = 0)]
        parent_id: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        size: u32,
    },
    /// Upload a local file
    Upload {
        path: PathBuf,
        #[arg(long, default_value_t = 0)]
        parent: i64,
    },
    /// Create a folder
    Mkdir {
        name: String,
        #[arg(long, default_value_t = 0)]
        parent: i64,
    },
    /// Rename a file or folder
    Rename { identity: String, name: String },
    /// Move a file or folder
    Mv {
        identity: String,
        parent_id: i64,
        /// Name at the destination
        name: String,
    },
    /// Delete a file or folder
    Rm { identity: String },
    /// Print a presigned download URL
    Url {
        repository_identity: String,
        #[arg(long, default_value_t = 600)]
        expires: i64,
    },
    /// Download a file to a local path
    Download {
        repository_identity: String,
        output: PathBuf,
        #[arg(long, default_value_t = 600)]
        expires: i64,
    },
    /// Share a file
    Share {
        repository_identity: String,
        #[arg(long, default_value_t = 3600)]
        expires: i64,
    },
    /// Show a share
    ShareInfo { identity: String },
    /// Print a download URL for a share
    ShareUrl {
        share_identity: String,
        #[arg(long, default_value_t = 600)]
        expires: i64,
    },
    /// Save a shared file into your own tree
    ShareSave {
        repository_identity: String,
        name: String,
        #[arg(long, default_value_t = 0)]
        parent: i64,
    },
    /// Backend liveness and readiness
    Health,
}

pub async fn run<S: TokenStorage>(session: &Session<S>, command: Command) -> Result<(), String> {
    let client = session.api();

    match command {
        Command::Login { name, password } => {
            let password = secret_or_prompt(password, "Password")?;
            let result = session
                .login(&name, &password)
                .await
                .map_err(|e| e.to_string())?;
            println!("Logged in as {}", result.name);
        }
        Command::Register {
            name,
            email,
            code,
            password,
        } => {
            let password = secret_or_prompt(password, "Password")?;
            let result = session
                .register(&name, &email, &password, &code)
                .await
                .map_err(|e| e.to_string())?;
            println!("Registered as {}", result.name);
        }
        Command::SendCode { email } => {
            let ack = api::send_verification_code(client, &email)
                .await
                .map_err(|e| e.to_string())?;
            print_message(&ack.message, "Verification code sent");
        }
        Command::Passwd { old, new } => {
            let token = require_token(session)?;
            let identity = identity_of(session)?;
            let old = secret_or_prompt(old, "Current password")?;
            let new = secret_or_prompt(new, "New password")?;
            let ack = api::change_password(client, &identity, &old, &new, &token)
                .await
                .map_err(|e| e.to_string())?;
            print_message(&ack.message, "Password changed");
        }
        Command::ResetPassword {
            email,
            code,
            password,
        } => {
            let password = secret_or_prompt(password, "New password")?;
            let ack = api::reset_password(client, &email, &code, &password)
                .await
                .map_err(|e| e.to_string())?;
            print_message(&ack.message, "Password reset");
        }
        Command::Whoami => {
            let identity = identity_of(session)?;
            let detail = api::get_user_detail(client, &identity)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&detail)?;
        }
        Command::Probe => {
            let valid = session.restore().await.map_err(|e| e.to_string())?;
            println!("{}", if valid { "valid" } else { "invalid" });
        }
        Command::Logout => {
            session.logout().map_err(|e| e.to_string())?;
            println!("Logged out");
        }
        Command::Ls {
            parent_id,
            page,
            size,
        } => {
            let token = require_token(session)?;
            let listing = api::get_user_file_list(client, parent_id, page, size, &token)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&listing)?;
        }
        Command::Upload { path, parent } => {
            let token = require_token(session)?;
            let ack = api::upload_path(client, &path, parent, &token)
                .await
                .map_err(|e| e.to_string())?;
            print_message(&ack.message, "Uploaded");
        }
        Command::Mkdir { name, parent } => {
            let token = require_token(session)?;
            let created = api::create_folder(client, parent, &name, &token)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&created)?;
        }
        Command::Rename { identity, name } => {
            let token = require_token(session)?;
            api::rename_user_file(client, &identity, &name, &token)
                .await
                .map_err(|e| e.to_string())?;
            println!("Renamed");
        }
        Command::Mv {
            identity,
            parent_id,
            name,
        } => {
            let token = require_token(session)?;
            api::move_user_file(client, &identity, &name, parent_id, &token)
                .await
                .map_err(|e| e.to_string())?;
            println!("Moved");
        }
        Command::Rm { identity } => {
            let token = require_token(session)?;
            api::delete_user_item(client, &identity, &token)
                .await
                .map_err(|e| e.to_string())?;
            println!("Deleted");
        }
        Command::Url {
            repository_identity,
            expires,
        } => {
            let token = require_token(session)?;
            let link = api::get_download_url(client, &repository_identity, expires, &token)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&link)?;
        }
        Command::Download {
            repository_identity,
            output,
            expires,
        } => {
            let token = require_token(session)?;
            let link = api::get_download_url(client, &repository_identity, expires, &token)
                .await
                .map_err(|e| e.to_string())?;
            let mut file = tokio::fs::File::create(&output)
                .await
                .map_err(|e| format!("Failed to create {}: {}", output.display(), e))?;
            match client.download_to(&link.url, &mut file).await {
                Ok(written) => println!("Saved {} bytes to {}", written, output.display()),
                Err(e) => {
                    drop(file);
                    // Leave no truncated file behind
                    let _ = tokio::fs::remove_file(&output).await;
                    return Err(format!("Download failed: {}", e));
                }
            }
        }
        Command::Share {
            repository_identity,
            expires,
        } => {
            let token = require_token(session)?;
            let share = api::create_share(client, &repository_identity, expires, &token)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&share)?;
        }
        Command::ShareInfo { identity } => {
            let detail = api::get_share(client, &identity)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&detail)?;
        }
        Command::ShareUrl {
            share_identity,
            expires,
        } => {
            let link = api::get_share_url(client, &share_identity, expires)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&link)?;
        }
        Command::ShareSave {
            repository_identity,
            name,
            parent,
        } => {
            let token = require_token(session)?;
            let saved = api::save_share(client, &repository_identity, parent, &name, &token)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&saved)?;
        }
        Command::Health => {
            let health = api::health(client).await.map_err(|e| e.to_string())?;
            let ready = api::ready(client).await.map_err(|e| e.to_string())?;
            print_json(&serde_json::json!({"health": health, "ready": ready}))?;
        }
    }

    Ok(())
}

fn require_token<S: TokenStorage>(session: &Session<S>) -> Result<String, String> {
    session
        .require_token()
        .map_err(|e| format!("{} (run `cloud-disk login` first)", e))
}

/// User identity from the stored token's claims.
fn identity_of<S: TokenStorage>(session: &Session<S>) -> Result<String, String> {
    session
        .claims()
        .map_err(|e| e.to_string())?
        .and_then(|claims| claims.identity)
        .ok_or_else(|| "Stored token carries no user identity".to_string())
}

fn secret_or_prompt(value: Option<String>, prompt: &str) -> Result<String, String> {
    if let Some(value) = value {
        return Ok(value);
    }
    eprint!("{}: ", prompt);
    io::stderr().flush().map_err(|e| e.to_string())?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| format!("Failed to read {}: {}", prompt.to_lowercase(), e))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_message(message: &str, default: &str) {
    if message.is_empty() {
        println!("{}", default);
    } else {
        println!("{}", message);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to format output: {}", e))?;
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_given_on_command_line() {
        assert_eq!(secret_or_prompt(Some("pw".to_string()), "Password").unwrap(), "pw");
    }
}
