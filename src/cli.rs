//! Command line arguments

use clap::Parser;

/// Minimal image gallery server
#[derive(Debug, Parser)]
#[command(name = "image-gallery", version, about)]
pub struct Args {
    /// Port to listen on (overrides config and environment)
    #[arg(short = 'p', long)]
    pub port: Option<String>,

    /// Config file path without extension
    #[arg(long, default_value = "config")]
    pub config: String,
}

impl Args {
    /// Parse the process arguments, accepting `-port 9000` as well as `--port 9000`
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args()))
    }
}

/// Rewrite single-dash long flags (`-port`, `-config=x`) to double-dash
///
/// Single-character flags such as `-p` pass through untouched, as does
/// everything after a bare `--`.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut passthrough = false;
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            let name = arg.split('=').next().unwrap_or_default();
            if name.len() > 2 && name.starts_with('-') && !name.starts_with("--") {
                format!("-{arg}")
            } else {
                arg
            }
        })
        .collect()
}
