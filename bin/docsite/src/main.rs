//! docsite CLI
//!
//! Build-end tooling for the documentation site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use docsite::cmd::Paths;

/// Command-line interface for docsite.
#[derive(Parser)]
#[command(
    name = "docsite",
    version,
    about = "Build-end tooling for the C Web Framework documentation site"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Directory overrides shared by commands.
#[derive(clap::Args, Debug, Default)]
struct DirArgs {
    /// Markdown source directory (defaults to site.src_dir)
    #[arg(short, long)]
    src: Option<PathBuf>,

    /// Build output directory (defaults to site.out_dir)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl From<DirArgs> for Paths {
    fn from(args: DirArgs) -> Self {
        Self {
            src: args.src,
            out: args.out,
        }
    }
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Run every build-end step (site data and sitemap)
    Build {
        #[command(flatten)]
        dirs: DirArgs,
        /// Override site hostname (e.g., https://example.com/)
        #[arg(long)]
        hostname: Option<String>,
    },
    /// Write only the sitemap
    Sitemap {
        #[command(flatten)]
        dirs: DirArgs,
    },
    /// Print the rewritten URL of every page
    Urls {
        #[command(flatten)]
        dirs: DirArgs,
    },
    /// Validate configuration, navigation and links
    Check {
        #[command(flatten)]
        dirs: DirArgs,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    docsite::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { dirs, hostname } => {
            docsite::cmd::build::run(&cli.config, &dirs.into(), hostname.as_deref()).await?;
        }
        Commands::Sitemap { dirs } => {
            docsite::cmd::sitemap::run(&cli.config, &dirs.into()).await?;
        }
        Commands::Urls { dirs } => {
            docsite::cmd::urls::run(&cli.config, &dirs.into())?;
        }
        Commands::Check { dirs, strict } => {
            docsite::cmd::check::run(&cli.config, &dirs.into(), strict)?;
        }
    }

    Ok(())
}
