//! CLI binary for abap-scope: inspect ABAP classes and their dependencies.

use abap_core::config::ScopeConfig;
use abap_core::model::ObjectKind;
use abap_nav::ops::Navigator;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "abap-scope",
    version,
    about = "Structure and dependency extraction for ABAP unit test authoring"
)]
struct Cli {
    /// Project root directory holding .abapscope/config.toml (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the methods implemented by a class
    Methods {
        /// Class name
        class: String,
    },

    /// Print one method's source
    Method {
        /// Class name
        class: String,
        /// Method name (the short name of an interface method also works)
        method: String,
    },

    /// Print a class definition
    Definition {
        /// Class name
        class: String,

        /// Keep only sections, interfaces, events and method signatures
        #[arg(long)]
        outline: bool,
    },

    /// Print an interface definition
    Interface {
        /// Interface name
        name: String,

        /// Keep only method and event signatures
        #[arg(long)]
        outline: bool,
    },

    /// Print an object's source
    Source {
        /// Object name
        name: String,

        /// Object type: class, interface, table, program, view (or clas, intf, tabl, prog, ddls)
        #[arg(short = 't', long = "type", default_value = "class")]
        object_type: String,

        /// Keep comment blocks
        #[arg(long)]
        raw: bool,
    },

    /// Dependency report for a class (always JSON)
    Deps {
        /// Class name
        class: String,

        /// Restrict the report to one method
        #[arg(short, long)]
        method: Option<String>,
    },

    /// Tables and fields selected by one method (always JSON)
    Fields {
        /// Class name
        class: String,
        /// Method name
        method: String,
    },

    /// Strip comment blocks of 3+ lines from a local file
    Strip {
        /// Source file
        file: PathBuf,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dependency reports for every class file below a directory (always JSON)
    Scan {
        /// Directory to scan (defaults to the configured local checkout)
        dir: Option<PathBuf>,

        /// Glob patterns to include files (repeatable)
        #[arg(long)]
        include: Vec<String>,

        /// Glob patterns to exclude files (repeatable)
        #[arg(long)]
        exclude: Vec<String>,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;
    let config = ScopeConfig::load(&project_root)
        .with_context(|| format!("loading config for {}", project_root.display()))?;
    let json = cli.json;

    match cli.command {
        Commands::Methods { class } => {
            let listing = navigator(&config)?.list_methods(&class)?;
            if json {
                print_json(&listing)?;
            } else {
                for method in &listing.methods {
                    println!("{}", method);
                }
            }
        }
        Commands::Method { class, method } => {
            let code = navigator(&config)?.method_code(&class, &method)?;
            if json {
                print_json(&code)?;
            } else {
                println!("{}", code.source_code);
            }
        }
        Commands::Definition { class, outline } => {
            let def = navigator(&config)?.class_definition(&class, outline)?;
            print_text_or_json(json, &def, &def.text)?;
        }
        Commands::Interface { name, outline } => {
            let def = navigator(&config)?.interface_definition(&name, outline)?;
            print_text_or_json(json, &def, &def.text)?;
        }
        Commands::Source {
            name,
            object_type,
            raw,
        } => {
            let kind: ObjectKind = object_type.parse()?;
            let source = navigator(&config)?.source_code(&name, kind, !raw)?;
            print_text_or_json(json, &source, &source.text)?;
        }
        Commands::Deps { class, method } => {
            let report = navigator(&config)?.dependencies(&class, method.as_deref())?;
            print_json(&report)?;
        }
        Commands::Fields { class, method } => {
            let fields = navigator(&config)?.table_fields(&class, &method)?;
            print_json(&fields)?;
        }
        Commands::Strip { file, output } => cmd_strip(&file, output.as_deref())?,
        Commands::Scan {
            dir,
            include,
            exclude,
            output,
        } => {
            let dir = dir.unwrap_or_else(|| {
                config
                    .source
                    .local_root
                    .join(&config.source.path_prefix)
            });
            cmd_scan(&config, &dir, &include, &exclude, output.as_deref())?;
        }
    }

    Ok(())
}

fn navigator(config: &ScopeConfig) -> Result<Navigator> {
    let navigator = Navigator::from_config(config)?;
    tracing::debug!("source: {}", navigator.describe());
    Ok(navigator)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_text_or_json<T: Serialize>(json: bool, value: &T, text: &str) -> Result<()> {
    if json {
        print_json(value)
    } else {
        println!("{}", text);
        Ok(())
    }
}

fn cmd_strip(file: &Path, output: Option<&Path>) -> Result<()> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let stripped = abap_parser::comments::strip_comments(&source);
    match output {
        Some(out) => std::fs::write(out, &stripped)
            .with_context(|| format!("failed to write {}", out.display()))?,
        None => print!("{}", stripped),
    }
    Ok(())
}

fn build_globset(patterns: &[String], flag: &str) -> Result<Option<globset::GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = globset::GlobSetBuilder::new();
    for p in patterns {
        builder.add(globset::Glob::new(p).with_context(|| format!("invalid {} glob: {}", flag, p))?);
    }
    Ok(Some(
        builder
            .build()
            .with_context(|| format!("invalid {} glob set", flag))?,
    ))
}

/// Collect main class files (`*.clas.abap`) below `root`, honoring
/// `.gitignore` and the include/exclude globs (matched against the path
/// relative to `root`).
fn collect_class_files(
    root: &Path,
    include: &[String],
    exclude: &[String],
) -> Result<Vec<(PathBuf, String)>> {
    use indicatif::{ProgressBar, ProgressStyle};

    let include_set = build_globset(include, "--include")?;
    let exclude_set = build_globset(exclude, "--exclude")?;

    let walker = ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .build();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message("Scanning files...");

    let mut files = Vec::new();
    for entry in walker.flatten() {
        let path = entry.path();
        if !path.is_file() || abap_nav::scan::class_name_from_file(path).is_none() {
            continue;
        }
        let rel_path = path.strip_prefix(root).unwrap_or(path);
        if let Some(ref inc) = include_set
            && !inc.is_match(rel_path)
        {
            continue;
        }
        if let Some(ref exc) = exclude_set
            && exc.is_match(rel_path)
        {
            continue;
        }

        match std::fs::read_to_string(path) {
            Ok(source) => {
                files.push((rel_path.to_path_buf(), source));
                spinner.set_message(format!("{} class files collected", files.len()));
                spinner.tick();
            }
            Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
        }
    }
    spinner.finish_and_clear();
    Ok(files)
}

fn cmd_scan(
    config: &ScopeConfig,
    dir: &Path,
    include: &[String],
    exclude: &[String],
    output: Option<&Path>,
) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }
    let files = collect_class_files(dir, include, exclude)?;
    tracing::info!("analyzing {} class files in {}", files.len(), dir.display());

    let scan = abap_nav::scan::scan_sources(&files, &config.analysis);
    let document = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "root": dir.display().to_string(),
        "scan": scan,
    });
    let rendered = serde_json::to_string_pretty(&document)?;

    match output {
        Some(out) => {
            std::fs::write(out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
            eprintln!(
                "{} classes, {} methods, {} failures -> {}",
                scan.totals.classes,
                scan.totals.methods,
                scan.failures.len(),
                out.display()
            );
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
