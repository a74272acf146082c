use clap::{Parser, Subcommand};
use dinomlx::config::{self, BuildConfig, BuildOptions, SiteConfig};
use dinomlx::{output, pipeline, registry};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Flags for the build command.
#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// Write generated stylesheets without minification
    #[arg(long)]
    no_minify: bool,
}

#[derive(Parser)]
#[command(name = "dinomlx")]
#[command(about = "Component-based static site compiler with critical CSS")]
#[command(long_about = "\
Component-based static site compiler with critical CSS

Pages are plain HTML. Elements named c-<name> are replaced by templates,
class names select CSS candidates, and the CSS needed above the fold is
inlined while the rest is linked as one site-wide stylesheet.

Source structure:

  src/
  ├── config.toml                  # Site settings (optional)
  ├── above-the-fold.html          # Probe: candidates used here are critical
  ├── pages/                       # Every *.html becomes an output page
  │   ├── index.html
  │   └── blog/first-post.html     # → dist/blog/first-post.html
  ├── templates/
  │   ├── navbar.html              # <c-navbar>
  │   └── atoms/button.html        # <c-atoms-button>
  └── candidates/
      ├── global/                  # Cascade layers, lowest precedence first
      ├── layout/
      ├── components/
      │   └── btn/
      │       ├── critical.css
      │       └── non-critical.css
      └── utils/

Pages place CSS with $#critical-css and $#non-critical-css inside <head>.
Without placeholders the tags are injected before </head>.

Run 'dinomlx gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Source root [default: src]
    #[arg(long, global = true)]
    src_root: Option<PathBuf>,

    /// Output directory [default: dist]
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Cache directory for the build manifest [default: .dinomlx/cache]
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// URL prefix for the site-wide stylesheet link, e.g. /my-blog
    #[arg(long, global = true)]
    base_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn build_options(&self) -> BuildOptions {
        BuildOptions {
            src_root: self.src_root.clone(),
            out_dir: self.out_dir.clone(),
            cache_dir: self.cache_dir.clone(),
            base_path: self.base_path.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Compile every page and write the site
    Build(BuildArgs),
    /// Compile every page without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Build(build_args) => {
            let (build_config, mut settings) = load_build(&cli)?;
            if build_args.no_minify {
                settings.css.minify = false;
            }
            init_thread_pool(&settings.processing);

            println!("==> Building {}", build_config.src_root.display());
            let result = pipeline::run_build_pipeline(&build_config, &settings)?;
            output::print_build_output(&result);
            println!("==> Build complete: {}", build_config.out_dir.display());
        }
        Command::Check => {
            let (build_config, settings) = load_build(&cli)?;
            init_thread_pool(&settings.processing);

            println!("==> Checking {}", build_config.src_root.display());
            let registry =
                registry::build_candidate_registry(&settings.candidates_dir(&build_config.src_root));
            let result = pipeline::compile_site_with_registry(&build_config, &settings, &registry)?;
            output::print_check_output(&registry, &result);
            println!("==> Site is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Resolve build paths against the working directory and load site settings.
fn load_build(cli: &Cli) -> Result<(BuildConfig, SiteConfig), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let build_config = BuildConfig::resolve(&cwd, cli.build_options())?;
    let settings = config::load_config(&build_config.src_root)?;
    Ok((build_config, settings))
}

/// Log to stderr, filtered by `RUST_LOG` (default `dinomlx=info`).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "dinomlx=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize the rayon thread pool based on processing config.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
