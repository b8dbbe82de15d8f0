use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use medinfo_common::{logger, AppConfig};
use medinfo_pill::{DataGoKrRegistry, PillRegistry, ServiceKey};
use std::path::PathBuf;
use std::time::Duration;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        // Fallback to default dotenv behavior
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "medinfo")]
#[command(about = "medinfo - 의약품 검색, 알약 식별, 복약 도우미 API 서버", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Medicine dataset CSV path
        #[arg(long)]
        dataset: Option<PathBuf>,
    },

    /// Query one pill registry row to verify DATA_GO_KR_KEY
    CheckPillKey,
}

async fn serve(config: AppConfig) -> Result<()> {
    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("medinfo starting...");
    tracing::info!("Configuration loaded:");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!("  Dataset: {}", config.dataset_path.display());
    tracing::info!("  Static: {}", config.static_dir.display());
    tracing::info!("  Chat model: {}", config.groq_model);

    println!("Server listening on http://{}", config.server_bind_address());

    medinfo_server::start_server(config).await?;
    Ok(())
}

async fn check_pill_key(config: AppConfig) -> Result<()> {
    logger::setup_console_logging(&config.log_level)?;

    let Some(key) = config.data_go_kr_key.as_deref().and_then(ServiceKey::new) else {
        bail!("DATA_GO_KR_KEY가 .env에 없습니다.");
    };

    println!(
        "인증키 형식: {} (길이 {})",
        if key.is_pre_encoded() { "Encoding" } else { "Decoding" },
        key.as_str().len()
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;
    let registry = DataGoKrRegistry::new(client, &config.pill_api_url, key);

    let page = registry.fetch_page(1, 1).await?;

    println!("✅ 공공데이터 API 연결 성공");
    if let Some(total) = page.total_count {
        println!("  totalCount: {}", total);
    }
    if let Some(name) = page.items.first().and_then(|item| item.get("ITEM_NAME")) {
        println!("  첫 항목: {}", name);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env at project root
    // Note: AppConfig::from_env() also loads .env, but we do it here early
    // to ensure any CLI argument overrides work correctly
    load_dotenv_from_project_root();

    match cli.command {
        Some(Commands::Serve { host, port, dataset }) => {
            // Override with CLI arguments
            if let Some(host) = &host {
                std::env::set_var("SERVER_HOST", host);
            }
            if let Some(port) = port {
                std::env::set_var("SERVER_PORT", port.to_string());
            }
            if let Some(dataset) = &dataset {
                std::env::set_var("MEDICINE_CSV_PATH", dataset);
            }

            serve(AppConfig::from_env()?).await?;
        }
        Some(Commands::CheckPillKey) => {
            check_pill_key(AppConfig::from_env()?).await?;
        }
        None => {
            // Default: start server with configuration from the environment
            serve(AppConfig::from_env()?).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_serve() {
        let cli = Cli::try_parse_from(["medinfo"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_serve_overrides() {
        let cli = Cli::try_parse_from([
            "medinfo",
            "serve",
            "--port",
            "8080",
            "--dataset",
            "data/medicine.csv",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Serve { host, port, dataset }) => {
                assert_eq!(host, None);
                assert_eq!(port, Some(8080));
                assert_eq!(dataset, Some(PathBuf::from("data/medicine.csv")));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_cli_check_pill_key() {
        let cli = Cli::try_parse_from(["medinfo", "check-pill-key"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::CheckPillKey)));
    }
}
