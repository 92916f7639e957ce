use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "redactd")]
#[command(about = "Asynchronous redaction of sensitive text", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level, overriding the config file
    #[arg(long, global = true, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Force debug logging
    #[arg(
        long,
        global = true,
        env = "DEBUG",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the redaction HTTP service
    Serve {
        #[arg(long, env = "REDACTD_HOST")]
        host: Option<String>,

        #[arg(long, env = "REDACTD_PORT")]
        port: Option<u16>,

        /// Number of concurrent redaction workers
        #[arg(long)]
        workers: Option<usize>,

        /// NER service URL (pattern-only redaction when unset)
        #[arg(long, env = "REDACTD_NER_ENDPOINT")]
        ner_endpoint: Option<String>,

        #[arg(long, env = "API_TITLE")]
        api_title: Option<String>,
    },

    /// Redact a file (or stdin) once and print the result as JSON
    Redact {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,

        /// NER service URL (pattern-only redaction when unset)
        #[arg(long, env = "REDACTD_NER_ENDPOINT")]
        ner_endpoint: Option<String>,
    },

    /// Show the config file location and contents
    Config,
}
