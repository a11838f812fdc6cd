use std::io::IsTerminal;
use std::io::Read;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};

use magpie_core::{MagpieConfig, OutputFormat};
use magpie_diffscan::{DiffScanner, ScanOptions};
use magpie_mine::MineReport;

#[derive(Parser)]
#[command(
    name = "magpie",
    version,
    about = "Function-level change mining for commit diffs",
    long_about = "Magpie attributes the lines changed in a commit diff to their enclosing\n\
                   source functions, filtering out comments, blank lines, and imports so\n\
                   only meaningful edits are counted.\n\n\
                   Examples:\n  \
                     git diff HEAD^..HEAD | magpie analyze   Attribute the latest commit\n  \
                     magpie analyze --file changes.patch     Attribute a saved diff\n  \
                     magpie mine commits.txt --jobs 8        Mine a list of commit URLs\n  \
                     magpie mine commits.txt --repos-dir /srv/clones --output report.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .magpie.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable tables and summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Attribute one commit diff to its enclosing functions
    #[command(long_about = "Attribute one commit diff to its enclosing functions.\n\n\
        Reads unified diff text from stdin or --file, counts meaningful hunks\n\
        in tracked non-test files, and names the functions they touch. An\n\
        empty diff is a valid input and yields a zero summary.\n\n\
        Examples:\n  git diff HEAD^..HEAD | magpie analyze\n  magpie analyze --file changes.patch --format json")]
    Analyze {
        /// Read diff from file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
        /// Repository checkout to walk for test files when the diff has none
        #[arg(long)]
        repo: Option<PathBuf>,
    },
    /// Mine a list of commit URLs into per-commit records
    #[command(long_about = "Mine a list of commit URLs into per-commit records.\n\n\
        Reads one commit URL per line ('#' comments and blank lines skipped),\n\
        obtains each commit's diff from a local clone under --repos-dir or by\n\
        fetching the URL's .diff document, and scans it. Commits are processed\n\
        concurrently; a failing commit becomes an error record and never\n\
        blocks the rest.\n\n\
        Examples:\n  magpie mine commits.txt\n  magpie mine commits.txt --repos-dir /srv/clones --no-fetch\n  magpie mine commits.txt --jobs 8 --format json --output report.json")]
    Mine {
        /// File containing one commit URL per line
        urls: PathBuf,
        /// Maximum commits processed concurrently
        #[arg(long)]
        jobs: Option<usize>,
        /// Directory containing pre-cloned repositories, one per repo name
        #[arg(long)]
        repos_dir: Option<PathBuf>,
        /// Disable the HTTP .diff fallback
        #[arg(long)]
        no_fetch: bool,
        /// Write the report to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Create a default .magpie.toml configuration file
    #[command(long_about = "Create a default .magpie.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .magpie.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        // Bold/bright header
        println!("\x1b[1m\x1b[33m⚡\x1b[0m \x1b[1mmagpie\x1b[0m v{version} — function-level change mining for commit diffs\n");

        println!("Quick start:");
        println!("  \x1b[36mmagpie init\x1b[0m                        Create a .magpie.toml config file");
        println!("  \x1b[36mgit diff HEAD^ | magpie analyze\x1b[0m    Attribute your latest commit");
        println!("  \x1b[36mmagpie mine commits.txt\x1b[0m            Mine a list of commit URLs\n");

        println!("All commands:");
        println!("  \x1b[32manalyze\x1b[0m   Attribute one diff's changed lines to functions");
        println!("  \x1b[32mmine\x1b[0m      Mine commit URLs with a bounded worker pool");
        println!("  \x1b[32minit\x1b[0m      Create default configuration\n");
    } else {
        println!("magpie v{version} — function-level change mining for commit diffs\n");

        println!("Quick start:");
        println!("  magpie init                        Create a .magpie.toml config file");
        println!("  git diff HEAD^ | magpie analyze    Attribute your latest commit");
        println!("  magpie mine commits.txt            Mine a list of commit URLs\n");

        println!("All commands:");
        println!("  analyze   Attribute one diff's changed lines to functions");
        println!("  mine      Mine commit URLs with a bounded worker pool");
        println!("  init      Create default configuration\n");
    }

    println!("Run 'magpie <command> --help' for details.");
}

fn read_diff_input(file: &Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err(format!("reading {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .into_diagnostic()
                .wrap_err("reading stdin")?;
            Ok(input)
        }
    }
}

fn read_url_list(path: &PathBuf) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err(format!("reading {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

const DEFAULT_CONFIG: &str = r#"# Magpie Configuration
# See: https://github.com/magpie-dev/magpie

[scan]
# File extensions whose diff sections are analyzed
# tracked_extensions = ["java", "jsp", "jspx", "xml"]
# Case-insensitive keywords marking a file as a test file
# test_keywords = ["test"]
# Glob patterns for paths to exclude from tracked counts
# skip_patterns = ["generated/**", "*.min.js"]

[mine]
# Maximum commits processed concurrently
# jobs = 4
# Directory containing pre-cloned repositories, one per repo name
# repos_dir = "/srv/clones"
# Fetch <url>.diff over HTTP when no local clone has the commit
# fetch_fallback = true
# Timeout for HTTP diff fetches, in seconds
# timeout_secs = 30
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");

    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MagpieConfig::from_file(path)?,
        None => {
            let default_path = std::path::Path::new(".magpie.toml");
            if default_path.exists() {
                MagpieConfig::from_file(default_path)?
            } else {
                MagpieConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    if cli.verbose {
        eprintln!("format: {}", cli.format);
        eprintln!(
            "tracked extensions: {}",
            config.scan.tracked_extensions.join(", ")
        );
    }

    match cli.command {
        None => {
            print_welcome(use_color);
            return Ok(());
        }
        Some(Command::Analyze { ref file, ref repo }) => {
            let input = read_diff_input(file)?;

            let scanner = DiffScanner::new(ScanOptions::from_config(&config.scan));
            let mut summary = scanner.scan(&input);

            // The diff touched no test-like file; ask the checkout instead.
            if !summary.test_case_present {
                if let Some(root) = repo {
                    summary.test_case_present =
                        magpie_vcs::tree_has_tests(root, &config.scan.test_keywords);
                }
            }

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&summary).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    println!("# Commit Analysis\n");
                    println!(
                        "- **Files:** {} ({} tracked)",
                        summary.file_count, summary.tracked_file_count
                    );
                    println!("- **Hunks:** {}", summary.hunk_count);
                    println!(
                        "- **Tests:** {}",
                        if summary.test_case_present {
                            "present"
                        } else {
                            "absent"
                        }
                    );
                    if !summary.function_names.is_empty() {
                        println!("\n## Functions\n");
                        for name in &summary.function_names {
                            println!("- `{name}`");
                        }
                    }
                }
                OutputFormat::Text => {
                    print!("{summary}");
                }
            }
        }
        Some(Command::Mine {
            ref urls,
            jobs,
            ref repos_dir,
            no_fetch,
            ref output,
        }) => {
            let url_list = read_url_list(urls)?;
            if url_list.is_empty() {
                miette::bail!(miette::miette!(
                    help = "List one commit URL per line, e.g. https://github.com/owner/repo/commit/hash",
                    "No commit URLs found in {}",
                    urls.display()
                ));
            }

            // Apply CLI overrides to mining config
            let mut config = config;
            if let Some(jobs) = jobs {
                config.mine.jobs = jobs;
            }
            if let Some(dir) = repos_dir {
                config.mine.repos_dir = Some(dir.clone());
            }
            if no_fetch {
                config.mine.fetch_fallback = false;
            }

            let is_tty = std::io::stderr().is_terminal();
            let spinner = if is_tty {
                let pb = indicatif::ProgressBar::new_spinner();
                pb.set_style(
                    indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                        .unwrap(),
                );
                pb.set_message(format!("Mining {} commits...", url_list.len()));
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                Some(pb)
            } else {
                None
            };

            let records = magpie_mine::mine(url_list, &config).await.inspect_err(|_e| {
                if let Some(pb) = &spinner {
                    pb.finish_with_message("Failed");
                }
            })?;

            if let Some(pb) = spinner {
                pb.finish_with_message("Done");
            }

            let report = MineReport::new(records);

            if cli.verbose {
                for record in report.records.iter().filter(|r| r.error.is_some()) {
                    eprintln!(
                        "failed: {} — {}",
                        record.url,
                        record.error.as_deref().unwrap_or("unknown error"),
                    );
                }
            }

            let rendered = match cli.format {
                OutputFormat::Json => serde_json::to_string_pretty(&report).into_diagnostic()?,
                OutputFormat::Markdown => report.to_markdown(),
                OutputFormat::Text => report.to_string(),
            };

            match output {
                Some(path) => {
                    std::fs::write(path, rendered)
                        .into_diagnostic()
                        .wrap_err(format!("writing {}", path.display()))?;
                    eprintln!("Wrote report to {}", path.display());
                }
                None => println!("{rendered}"),
            }
        }
        Some(Command::Init) => {
            let path = std::path::Path::new(".magpie.toml");
            if path.exists() {
                miette::bail!(".magpie.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .magpie.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "magpie", &mut std::io::stdout());
        }
    }

    Ok(())
}
