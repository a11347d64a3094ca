use clap::{Parser, Subcommand};
use mdocset::config::{self, DocsetConfig};
use mdocset::{DirectoryHost, compile, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Overrides for `docset.toml`, shared by `build` and `check`.
#[derive(clap::Args, Clone)]
struct ConfigArgs {
    /// Config file (default: docset.toml in the working directory, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Documentation root, relative to the working directory
    #[arg(long)]
    docs: Option<PathBuf>,

    /// Document type for pages directly in the documentation root
    #[arg(long = "type")]
    docs_type: Option<String>,

    /// Mount name prefixed to every entries path
    #[arg(long)]
    mount: Option<String>,

    /// Do not use docs/index.md as the index page
    #[arg(long)]
    no_docs_index: bool,
}

#[derive(Parser)]
#[command(name = "mdocset")]
#[command(about = "Compile a Markdown documentation tree into a docset")]
#[command(long_about = "\
Compile a Markdown documentation tree into a docset

Pages are rendered to HTML and listed in an entries index grouped by
document type. The first directory level decides the type.

Layout:

  README.md                     # Index page (first README spelling found)
  docset.toml                   # Optional config
  docs/
  ├── index.md                  # Index page when there is no README
  ├── install.md                # Default type (Guide) → Guide/install.html
  ├── logo.png                  # Copied as-is
  ├── assets/                   # Copied verbatim, never listed
  ├── Sample/                   # Type directory
  │   ├── hello.md              # → Sample/hello.html, entry \"hello\"
  │   └── data/                 # Nested: copied verbatim, never listed
  └── Drafts/                   # Not a type: skipped with a warning

Run 'mdocset gen-config' to generate a documented docset.toml.")]
#[command(version = env!("MDOCSET_VERSION"))]
struct Cli {
    /// Working directory: READMEs and docset.toml are looked up here
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log progress (same as RUST_LOG=info)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render pages and write the entries index
    Build {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output directory; files land under <output>/<mount name>/
        #[arg(long, default_value = "dist")]
        output: PathBuf,

        /// Entries index file (default: <output>/entries.json)
        #[arg(long)]
        entries: Option<PathBuf>,
    },
    /// Compile into a throwaway directory and report problems
    Check {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print a stock docset.toml with all options documented
    GenConfig,
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO, otherwise RUST_LOG or WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Build {
            config,
            output: output_dir,
            entries,
        } => {
            let docset_config = resolve_config(&cli.root, &config)?;
            let mut host = DirectoryHost::new(&output_dir);
            println!("==> Compiling {}", cli.root.display());
            let result = compile(&docset_config, &cli.root, &mut host)?;

            let entries_path = entries.unwrap_or_else(|| output_dir.join("entries.json"));
            let json = serde_json::to_string_pretty(&result.entries)?;
            mdocset::files::write_file(&entries_path, json.as_bytes())?;

            output::print_build_output(&result, &cli.root);
            println!("==> Entries written to {}", entries_path.display());
        }
        Command::Check { config } => {
            let docset_config = resolve_config(&cli.root, &config)?;
            let scratch = tempfile::TempDir::new()?;
            let mut host = DirectoryHost::new(scratch.path());
            let result = compile(&docset_config, &cli.root, &mut host)?;
            output::print_check_output(&result, &cli.root);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file (explicit or discovered), then apply flag overrides.
fn resolve_config(root: &Path, args: &ConfigArgs) -> Result<DocsetConfig, config::ConfigError> {
    let mut docset_config = match &args.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(root)?,
    };
    if let Some(docs) = &args.docs {
        docset_config.docs_path = docs.to_string_lossy().into_owned();
    }
    if let Some(docs_type) = &args.docs_type {
        docset_config.docs_type = docs_type.clone();
    }
    if let Some(mount) = &args.mount {
        docset_config.mount_name = mount.clone();
    }
    if args.no_docs_index {
        docset_config.docs_index = false;
    }
    docset_config.validate()?;
    Ok(docset_config)
}
