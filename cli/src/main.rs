//! deckgen CLI - slide deck assembly from layout templates and markup requests
//!
//! A command-line tool for building decks from presentation requests,
//! exploring layout templates, and checking how content markup is projected.

mod config;

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use deckgen::layout::{inspect_pptx, skeleton_template, LayoutMode, LayoutTemplate};
use deckgen::render::{JsonFormat, RenderOptions};
use deckgen::{
    AssemblyOptions, AssemblyReport, Error, LayoutCatalogue, LayoutRegistry, MatchPolicy,
    PresentationSpec, ProjectOptions, Theme,
};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;
use walkdir::WalkDir;

use config::Config;

/// Slide deck assembly from layout templates and markup requests
#[derive(Parser)]
#[command(
    name = "deckgen",
    version,
    about = "Build slide decks from layout templates and markup requests",
    long_about = "deckgen - layout resolution and rich-text projection for slide decks.\n\n\
                  Resolves slide and placeholder names against a layout template and\n\
                  projects HTML-like content markup onto styled text runs."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build decks from presentation request files
    Build {
        /// Request files, or directories searched for *.json requests
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Layout template (YAML or JSON)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Override the theme of every request
        #[arg(long)]
        theme: Option<ThemeArg>,

        /// Output format
        #[arg(short, long, default_value = "markdown")]
        format: OutputFormat,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reject ambiguous layout names and malformed style declarations
        #[arg(long)]
        strict: bool,

        /// Abort a request on its first error instead of skipping
        #[arg(long)]
        fail_fast: bool,

        /// Include YAML frontmatter (Markdown output)
        #[arg(long)]
        frontmatter: bool,
    },

    /// Print the catalogue of described layouts as JSON
    Layouts {
        /// Layout template (YAML or JSON)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Resolve a layout name against the template
    Resolve {
        /// Layout name, possibly inexact
        name: String,

        /// Layout template (YAML or JSON)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Only show indices for this theme
        #[arg(long)]
        theme: Option<ThemeArg>,

        /// Fail on ambiguous fuzzy matches
        #[arg(long)]
        strict: bool,
    },

    /// Project one content string onto styled runs
    Project {
        /// Content markup
        markup: String,

        /// Reject malformed style declarations
        #[arg(long)]
        strict_style: bool,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// List the slide layouts of a .pptx template
    Inspect {
        /// Input .pptx file
        input: PathBuf,

        /// Print a skeleton layout template (YAML) instead
        #[arg(long)]
        skeleton: bool,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// Theme variant
#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

/// Output format for built decks
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Deck outline as JSON
    Json,
    /// Markdown, one section per slide
    Markdown,
    /// Plain text
    Text,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match cli.command {
        Commands::Build {
            inputs,
            template,
            theme,
            format,
            output,
            strict,
            fail_fast,
            frontmatter,
        } => {
            let template = config.template_path(template.as_deref())?;
            let policy = if strict { MatchPolicy::Strict } else { MatchPolicy::FirstWins };
            let registry = LayoutRegistry::load(&template)?.with_match_policy(policy);

            let markup = if strict { ProjectOptions::new().strict() } else { ProjectOptions::new() };
            let job = BuildJob {
                registry: &registry,
                options: AssemblyOptions::new()
                    .with_fail_fast(fail_fast)
                    .with_markup(markup),
                theme: theme.map(Theme::from).or(config.theme),
                format,
                render: RenderOptions::new().with_frontmatter(frontmatter),
                output_dir: output.unwrap_or_else(|| config.output_dir.clone()),
                stamp: chrono::Local::now().format("%Y%m%d_%H%M%S").to_string(),
            };

            let requests = collect_requests(&inputs);
            if requests.is_empty() {
                return Err("no presentation requests found".into());
            }
            fs_err::create_dir_all(&job.output_dir)?;

            let pb = create_progress(requests.len() as u64);
            let results: Vec<(PathBuf, deckgen::Result<Built>)> = requests
                .par_iter()
                .map(|path| {
                    let result = job.build(path);
                    pb.inc(1);
                    (path.clone(), result)
                })
                .collect();
            pb.finish_and_clear();

            let failed = print_build_summary(&results);
            if failed > 0 {
                return Err(format!("{} of {} builds failed", failed, results.len()).into());
            }
        }

        Commands::Layouts { template, compact } => {
            let template = LayoutTemplate::load(config.template_path(template.as_deref())?)?;
            let catalogue = LayoutCatalogue::from_template(&template);
            let json = if compact {
                catalogue.to_json_compact()?
            } else {
                catalogue.to_json()?
            };
            write_output(None, &json)?;
        }

        Commands::Resolve {
            name,
            template,
            theme,
            strict,
        } => {
            let policy = if strict { MatchPolicy::Strict } else { MatchPolicy::FirstWins };
            let registry = LayoutRegistry::load(config.template_path(template.as_deref())?)?
                .with_match_policy(policy);

            let layout = match registry.resolve(&name) {
                Ok(layout) => layout,
                Err(err) => {
                    if let Error::UnknownLayout { requested, valid_names } = &err {
                        if let Some(suggestion) = suggest(requested, valid_names) {
                            eprintln!("{} Did you mean '{}'?", "?".yellow().bold(), suggestion.cyan());
                        }
                    }
                    return Err(err.into());
                }
            };

            println!("{}: {}", "Layout".bold(), layout.alias());
            println!("{}: {:?}", "Match".bold(), layout.match_kind());

            let themes: Vec<Theme> = match theme.map(Theme::from).or(config.theme) {
                Some(t) => vec![t],
                None => Theme::all().to_vec(),
            };

            for theme in themes {
                println!("\n{}", format!("Theme: {}", theme).cyan().bold());
                println!("{}", "─".repeat(40));
                match layout.layout_index(theme) {
                    Ok(index) => println!("{}: {}", "Layout index".bold(), index),
                    Err(_) => {
                        println!("{}", "no variant".dimmed());
                        continue;
                    }
                }
                for placeholder in layout.entry().placeholder_names() {
                    match layout.entry().placeholder_index(placeholder, theme) {
                        Ok(slot) => println!("  {:<24} {}", placeholder, slot),
                        Err(_) => println!("  {:<24} {}", placeholder, "-".dimmed()),
                    }
                }
            }
        }

        Commands::Project {
            markup,
            strict_style,
            compact,
        } => {
            let options = if strict_style {
                ProjectOptions::new().strict()
            } else {
                ProjectOptions::new()
            };
            let projection = deckgen::project_markup_with(&markup, &options)?;
            let json = if compact {
                serde_json::to_string(&projection)?
            } else {
                serde_json::to_string_pretty(&projection)?
            };
            write_output(None, &json)?;
        }

        Commands::Inspect {
            input,
            skeleton,
            output,
        } => {
            let pb = create_spinner("Reading template...");
            let layouts = inspect_pptx(&input)?;
            pb.finish_and_clear();

            if skeleton {
                let yaml = skeleton_template(&layouts).to_yaml()?;
                write_output(output.as_ref(), &yaml)?;
                if let Some(path) = output {
                    println!("{} Skeleton written: {}", "✓".green().bold(), path.display());
                }
                return Ok(());
            }

            println!("{}", "Slide Layouts".cyan().bold());
            println!("{}", "─".repeat(40));
            let width = layouts.iter().map(|l| l.name.width()).max().unwrap_or(0);
            for layout in &layouts {
                let mode = match layout.mode {
                    LayoutMode::Light => "light".yellow(),
                    LayoutMode::Dark => "dark".blue(),
                    LayoutMode::Normal => "normal".normal(),
                };
                println!("{:>3}  {}  {}", layout.index, pad(&layout.name, width), mode);
                for placeholder in &layout.placeholders {
                    println!(
                        "       {} {:>3}  {:<10} {}",
                        "idx".dimmed(),
                        placeholder.idx,
                        placeholder.kind,
                        placeholder.name
                    );
                }
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Settings shared by every request of one `build` run.
struct BuildJob<'r> {
    registry: &'r LayoutRegistry,
    options: AssemblyOptions,
    theme: Option<Theme>,
    format: OutputFormat,
    render: RenderOptions,
    output_dir: PathBuf,
    stamp: String,
}

struct Built {
    output: PathBuf,
    report: AssemblyReport,
}

impl BuildJob<'_> {
    fn build(&self, request: &Path) -> deckgen::Result<Built> {
        let json = fs_err::read_to_string(request)?;
        let mut spec = PresentationSpec::from_json(&json)?;
        if let Some(theme) = self.theme {
            spec.theme_mode = theme;
        }

        let (deck, report) = deckgen::assemble_outline(self.registry, &spec, self.options)?;
        let content = match self.format {
            OutputFormat::Json => deckgen::render::to_json(&deck, JsonFormat::Pretty)?,
            OutputFormat::Markdown => deckgen::render::to_markdown(&deck, &self.render)?,
            OutputFormat::Text => deckgen::render::to_text(&deck, &self.render)?,
        };

        let output = self.output_dir.join(output_name(
            &spec.filename,
            &self.stamp,
            self.format.extension(),
        ));
        fs_err::write(&output, content)?;
        Ok(Built { output, report })
    }
}

/// `<filename>_<stamp>.<ext>`, with path separators in the name replaced.
fn output_name(filename: &str, stamp: &str, extension: &str) -> String {
    let base: String = filename
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    format!("{}_{}.{}", base, stamp, extension)
}

fn collect_requests(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut requests = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().is_file())
                .filter(|e| {
                    e.path()
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
                })
                .map(walkdir::DirEntry::into_path)
                .collect();
            found.sort();
            requests.extend(found);
        } else {
            requests.push(input.clone());
        }
    }
    requests
}

fn print_build_summary(results: &[(PathBuf, deckgen::Result<Built>)]) -> usize {
    let mut failed = 0;
    for (request, result) in results {
        match result {
            Ok(built) => {
                println!(
                    "{} {} -> {} ({} slides)",
                    "✓".green().bold(),
                    request.display(),
                    built.output.display(),
                    built.report.slides_built
                );
                for item in &built.report.skipped {
                    println!("  {} skipped {}", "!".yellow().bold(), item);
                }
            }
            Err(e) => {
                failed += 1;
                println!("{} {}: {}", "✗".red().bold(), request.display(), e);
            }
        }
    }
    failed
}

/// Closest valid name by fuzzy score.
fn suggest<'a>(requested: &str, names: &'a [String]) -> Option<&'a str> {
    let matcher = SkimMatcherV2::default();
    names
        .iter()
        .filter_map(|name| matcher.fuzzy_match(name, requested).map(|score| (score, name)))
        .max_by_key(|(score, _)| *score)
        .map(|(_, name)| name.as_str())
}

/// Pad to a display width (layout names are often CJK).
fn pad(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

fn print_version() {
    println!("{} {}", "deckgen".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout resolution and rich-text projection for slide decks");
    println!();
    println!("Template formats: YAML, JSON (layouts), PPTX (inspect)");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn create_progress(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style.progress_chars("=> "));
    pb.set_message("building");
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs_err::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
