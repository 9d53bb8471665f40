mod commands;

use std::process::ExitCode;

use clap::{Parser, ValueEnum};

#[cfg(any(target_os = "macos", target_os = "windows"))]
use cloud_disk_client::auth::KeyringStorage;
use cloud_disk_client::auth::{FileStorage, TokenStorage};
use cloud_disk_client::{ApiClient, ClientConfig, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TokenStoreKind {
    /// Plain file under the user's config directory
    File,
    /// OS keychain (macOS and Windows only)
    Keyring,
}

#[derive(Parser, Debug)]
#[command(name = "cloud-disk", version, about = "Command line client for the cloud-disk API")]
struct Cli {
    /// API base URL (overrides CLOUD_DISK_API_BASE / VITE_API_BASE)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Where the bearer token is kept between runs
    #[arg(long, global = true, value_enum, default_value_t = TokenStoreKind::File)]
    token_store: TokenStoreKind,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Shares VITE_* settings with the web front end when run from its root
    let _ = dotenvy::dotenv();

    env_logger::init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(base_url) = cli.base_url.as_deref() {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    log::debug!("Using API base {}", config.base_url);

    let storage = match open_storage(cli.token_store) {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let session = Session::new(ApiClient::from_config(&config), storage);

    match commands::run(&session, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn open_storage(kind: TokenStoreKind) -> Result<Box<dyn TokenStorage>, String> {
    match kind {
        TokenStoreKind::File => Ok(Box::new(FileStorage::default_location())),
        #[cfg(any(target_os = "macos", target_os = "windows"))]
        TokenStoreKind::Keyring => Ok(Box::new(KeyringStorage::default())),
        // keyring has no persistent backend here, a stored token would be
        // gone by the next command
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        TokenStoreKind::Keyring => {
            Err("the keyring token store needs macOS or Windows, use --token-store file".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cloud-disk",
            "ls",
            "5",
            "--page",
            "2",
            "--base-url",
            "http://disk:8888",
            "--token-store",
            "keyring",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://disk:8888"));
        assert_eq!(cli.token_store, TokenStoreKind::Keyring);
        assert!(matches!(
            cli.command,
            commands::Command::Ls {
                parent_id: 5,
                page: 2,
                size: 20
            }
        ));
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["cloud-disk", "upload", "notes.txt"]).unwrap();
        assert_eq!(cli.token_store, TokenStoreKind::File);
        assert!(matches!(cli.command, commands::Command::Upload { parent: 0, .. }));
    }

    #[test]
    fn test_token_store_choices() {
        let names: Vec<String> = TokenStoreKind::value_variants()
            .iter()
            .filter_map(|kind| kind.to_possible_value())
            .map(|value| value.get_name().to_string())
            .collect();
        assert_eq!(names, ["file", "keyring"]);
    }

    #[test]
    fn test_file_store_opens() {
        assert!(open_storage(TokenStoreKind::File).is_ok());
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    #[test]
    fn test_keyring_store_refused_without_native_keychain() {
        let err = open_storage(TokenStoreKind::Keyring).err().unwrap();
        assert!(err.contains("--token-store file"));
    }
}
