use anyhow::Result;
use clap::{Parser, Subcommand};

// Use the library modules
use groundwork::commands;

#[derive(Parser)]
#[clap(name = "groundwork")]
#[clap(about = "Local environment setup utilities")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download an archive, optionally extracting it into the destination
    Fetch {
        /// URL of the archive to download
        url: String,
        /// Destination directory (created if absent)
        #[clap(default_value = ".")]
        dest: String,
        /// Download only, skip extraction
        #[clap(long)]
        no_unzip: bool,
        /// Keep the archive after extraction
        #[clap(long)]
        keep_archive: bool,
    },
    /// Check directories and files for existence and access permissions
    Check {
        /// Directory to check (repeatable)
        #[clap(long = "dir")]
        dirs: Vec<String>,
        /// File to check (repeatable)
        #[clap(long = "file")]
        files: Vec<String>,
        /// Create missing directories
        #[clap(long)]
        create_dirs: bool,
        /// Create missing files and their parent directories
        #[clap(long)]
        create_files: bool,
        /// Output format: text or json
        #[clap(long, default_value = "text")]
        format: String,
    },
    /// Resolve and install Debian packages listed in a file
    Deps {
        /// Path to the dependency list (one specifier per line)
        file: String,
        /// Skip the confirmation prompt
        #[clap(long)]
        yes: bool,
        /// Resolve and print the install set without installing
        #[clap(long)]
        dry_run: bool,
    },
    /// Apply a setup manifest (paths, archives, dependencies)
    Apply {
        /// Path to the setup manifest (TOML)
        manifest: String,
        /// Also install the dependency list named by the manifest
        #[clap(long)]
        install_deps: bool,
        /// Skip the confirmation prompt for package installation
        #[clap(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch {
            url,
            dest,
            no_unzip,
            keep_archive,
        } => commands::fetch::fetch_archive(&url, &dest, !no_unzip, !keep_archive)
            .map_err(|e| anyhow::anyhow!(e)),
        Commands::Check {
            dirs,
            files,
            create_dirs,
            create_files,
            format,
        } => commands::check::check_environment(&dirs, &files, create_dirs, create_files, &format)
            .map(|report| {
                if !report.is_clean() {
                    std::process::exit(1);
                }
            })
            .map_err(|e| anyhow::anyhow!(e)),
        Commands::Deps { file, yes, dry_run } => {
            commands::deps::install_dependencies(&file, yes, dry_run)
                .map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Apply {
            manifest,
            install_deps,
            yes,
        } => commands::apply::apply_manifest(&manifest, install_deps, yes)
            .map(|clean| {
                if !clean {
                    std::process::exit(1);
                }
            })
            .map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
