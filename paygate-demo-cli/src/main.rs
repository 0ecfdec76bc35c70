//! Paygate Demo CLI
//!
//! Command-line interface for signing, verifying and sending gateway requests.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod ui;

use commands::Settings;

#[derive(Parser)]
#[command(name = "paygate-demo")]
#[command(about = "Paygate Demo CLI - Sign, verify and send payment gateway requests", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use the gateway's sandbox endpoints
    #[arg(long, global = true)]
    sandbox: bool,

    /// Signature algorithm (MD5 or HMAC-SHA256), overrides PAYGATE_SIGN_TYPE
    #[arg(long, global = true)]
    sign_type: Option<String>,

    /// JSON configuration file (defaults to PAYGATE_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print responses as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Family {
    Standard,
    Transfer,
    TransferQuery,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble and print a signed request without sending it
    Sign {
        /// Request field as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Operation family that decides identity fields and algorithm
        #[arg(short, long, value_enum, default_value = "standard")]
        family: Family,
    },

    /// Verify the signature of a notification or response XML file
    Verify {
        /// File holding the XML body
        file: PathBuf,
    },

    /// Create a unified order
    UnifiedOrder {
        /// Request field as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Request a refund (needs a client certificate)
    Refund {
        /// Request field as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Transfer to a user's wallet (needs a client certificate)
    Transfer {
        /// Request field as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Query a wallet transfer (needs a client certificate)
    TransferInfo {
        /// Merchant-side transfer number
        partner_trade_no: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("paygate_demo_cli=debug,paygate_lib=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("paygate_demo_cli=info,paygate_lib=warn")
            .init();
    }

    let settings = Settings {
        config_file: cli.config,
        sandbox: cli.sandbox,
        sign_type: cli.sign_type,
        json: cli.json,
    };

    // Dispatch commands
    match cli.command {
        Commands::Sign { params, family } => {
            let family = match family {
                Family::Standard => paygate_lib::assembler::OperationFamily::Standard,
                Family::Transfer => paygate_lib::assembler::OperationFamily::Transfer,
                Family::TransferQuery => paygate_lib::assembler::OperationFamily::TransferQuery,
            };
            commands::sign::run(&settings, &params, family)?;
        }
        Commands::Verify { file } => {
            commands::verify::run(&settings, &file)?;
        }
        Commands::UnifiedOrder { params } => {
            commands::order::unified_order(&settings, &params).await?;
        }
        Commands::Refund { params } => {
            commands::order::refund(&settings, &params).await?;
        }
        Commands::Transfer { params } => {
            commands::transfer::transfer(&settings, &params).await?;
        }
        Commands::TransferInfo { partner_trade_no } => {
            commands::transfer::transfer_info(&settings, &partner_trade_no).await?;
        }
    }

    Ok(())
}
