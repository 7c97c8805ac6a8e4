//! Routegen compiler CLI.
//!
//! Compiles `*.routes` files into Rust dispatch code, checks them, lists
//! the route table, and recompiles on change.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use miette::IntoDiagnostic;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use routegen_compiler::codegen::route_name;
use routegen_compiler::config::CONFIG_FILE_NAME;
use routegen_compiler::discover::{self, ROUTES_EXTENSION};
use routegen_compiler::ir::{MethodParameter, PathParameter};
use routegen_compiler::{frontend, Compiler, CompilerConfig, CompilerError, WriteOutcome};

mod ui;

#[derive(Parser)]
#[command(name = "routegen")]
#[command(about = "Routegen compiler - compiles route files to Rust dispatch code")]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Log compiler internals to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new routegen project
    Init {
        /// Project directory (created if doesn't exist)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Compile route files to Rust
    Compile {
        /// Route source directory
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output directory for generated Rust code
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check route files without generating code
    Check {
        /// Route source directory
        #[arg(short, long)]
        source: Option<PathBuf>,
    },

    /// Print the route table
    Routes {
        /// Route source directory
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Watch for changes and recompile
    Watch {
        /// Route source directory
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output directory for generated Rust code
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => init_project(&path)?,

        Commands::Compile { source, output } => {
            let config = load_config(&cli.config, source, output)?;
            compile_project(config)?;
        }

        Commands::Check { source } => {
            let config = load_config(&cli.config, source, None)?;
            check_project(config)?;
        }

        Commands::Routes { source, json } => {
            let config = load_config(&cli.config, source, None)?;
            list_routes(config, json)?;
        }

        Commands::Watch { source, output } => {
            let config = load_config(&cli.config, source, output)?;
            run_watch_mode(config).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "routegen_compiler=debug,routegen=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Reads the config file and applies command-line overrides.
fn load_config(
    path: &Path,
    source: Option<PathBuf>,
    output: Option<PathBuf>,
) -> miette::Result<CompilerConfig> {
    let mut config = CompilerConfig::load(path)?;
    if let Some(source) = source {
        config.source_dir = source;
    }
    if let Some(output) = output {
        config.out_dir = output;
    }
    tracing::debug!(
        source_dir = %config.source_dir.display(),
        out_dir = %config.out_dir.display(),
        "configuration loaded"
    );
    Ok(config)
}

/// Initialize a new routegen project.
fn init_project(path: &Path) -> miette::Result<()> {
    ui::box_header(&format!("{} Scaffolding your route files", ui::symbols::DIAMOND));
    ui::box_line("");
    ui::box_footer();
    println!();

    let spinner = ui::spinner("Creating project structure...");

    let routes_dir = path.join("routes");
    std::fs::create_dir_all(&routes_dir)
        .map_err(|e| miette::miette!("Failed to create routes directory: {}", e))?;

    let config_toml = r#"# routegen configuration
source_dir = "routes"
out_dir = "src/generated"
controller_root = "crate"
"#;

    let app_routes = r#"# METHOD  PATH               Controller.action(name: Type, ...)

GET     /users/:id          controllers.UserController.show(id: Long)
POST    /users              controllers.UserController.create(name: String, admin: Boolean)
GET     /blog/:year/:month  controllers.BlogController.archive(year: Int, month: Int, tag: String)
"#;

    let config_path = path.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        spinner.finish_and_clear();
        return Err(miette::miette!("{} already exists", config_path.display()));
    }

    std::fs::write(&config_path, config_toml)
        .map_err(|e| miette::miette!("Failed to write {}: {}", CONFIG_FILE_NAME, e))?;
    std::fs::write(routes_dir.join("app.routes"), app_routes)
        .map_err(|e| miette::miette!("Failed to write app.routes: {}", e))?;

    spinner.finish_and_clear();

    ui::success("Done. Here's what you got:");
    println!();
    ui::dim(&format!("{}", config_path.display()));
    ui::dim(&format!("{}", routes_dir.join("app.routes").display()));
    println!();
    println!("  Now do this:");
    println!();
    println!("    cd {}", path.display());
    println!("    routegen compile");
    println!();

    Ok(())
}

/// Compile route files into the configured output directory.
fn compile_project(config: CompilerConfig) -> miette::Result<()> {
    let start = Instant::now();
    let out_dir = config.out_dir.clone();
    let spinner = ui::spinner("Compiling routes...");

    let compiler = Compiler::new(config);
    let result = match compiler.compile() {
        Ok(result) => result,
        Err(e) => {
            spinner.finish_and_clear();
            ui::nope_header();
            return Err(e.into());
        }
    };

    spinner.finish_and_clear();

    ui::box_header("ARTIFACTS");
    ui::box_line("");
    for artifact in &result.artifacts {
        let marker = match artifact.outcome {
            WriteOutcome::Written => "written",
            WriteOutcome::Unchanged => "unchanged",
        };
        ui::box_line(&format!(
            "{} {:24} {:>3} routes  {}",
            ui::symbols::TRIANGLE,
            artifact.file_name,
            artifact.routes,
            marker
        ));
    }
    ui::box_line("");
    ui::box_footer();
    println!();

    report_warnings(&result.skipped, &result.unknown_controllers);

    ui::success(&format!(
        "{} routes {} {} controllers {} {}",
        result.routes,
        ui::symbols::DOT,
        result.controllers,
        ui::symbols::DOT,
        out_dir.display()
    ));
    ui::timing("Done", start.elapsed().as_millis());
    println!();

    Ok(())
}

/// Parse and validate without writing anything.
fn check_project(config: CompilerConfig) -> miette::Result<()> {
    let spinner = ui::spinner("Checking routes...");

    // Every file is parsed so all failing files are reported, not just the first.
    let declarations = discover::discover(&config)?;
    let mut failures = Vec::new();
    for declaration in &declarations {
        let Ok(text) = std::fs::read_to_string(&declaration.source_path) else {
            continue;
        };
        if let Err(err) = frontend::parse_routes(&text) {
            failures.push((declaration.source_path.clone(), err));
        }
    }

    if !failures.is_empty() {
        spinner.finish_and_clear();
        ui::nope_header();
        for (path, err) in &failures {
            report_error(path, err);
        }
        return Err(miette::miette!("{} route file(s) failed to check", failures.len()));
    }

    let compiler = Compiler::new(config);
    match compiler.check() {
        Ok(result) => {
            spinner.finish_and_clear();
            ui::looking_good();
            println!();
            println!(
                "    {} files {} {} routes {} {} controllers",
                result.files,
                ui::symbols::DOT,
                result.routes,
                ui::symbols::DOT,
                result.controllers
            );
            println!();
            report_warnings(&result.skipped, &result.unknown_controllers);
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            ui::nope_header();
            Err(e.into())
        }
    }
}

fn report_error(path: &Path, err: &CompilerError) {
    match err.line() {
        Some(line) => ui::error(&format!("{}  {}", ui::file_link(&path.to_string_lossy(), line), err)),
        None => ui::error(&format!("{}  {}", path.display(), err)),
    }
}

fn report_warnings(
    skipped: &[routegen_compiler::SkippedSource],
    unknown: &[routegen_compiler::UnknownController],
) {
    for source in skipped {
        ui::warn(&format!("Skipped {}: file not found", source.path.display()));
    }
    for controller in unknown {
        ui::warn(&format!(
            "Unknown controller {} (line {})",
            controller.controller, controller.source_line
        ));
    }
    if !skipped.is_empty() || !unknown.is_empty() {
        println!();
    }
}

/// One row of `routegen routes --json`.
#[derive(Serialize)]
struct RouteListing<'a> {
    file: String,
    name: String,
    method: &'a str,
    path: &'a str,
    handler: String,
    line: usize,
    path_parameters: &'a [PathParameter],
    method_parameters: &'a [MethodParameter],
}

/// Print every route, grouped by file.
fn list_routes(config: CompilerConfig, json: bool) -> miette::Result<()> {
    let compiler = Compiler::new(config);
    let loaded = compiler.load()?;

    if json {
        let listings: Vec<RouteListing<'_>> = loaded
            .sources
            .iter()
            .flat_map(|source| {
                let file = source.declaration.origin.clone();
                source.routes.iter().map(move |route| RouteListing {
                    file: file.clone(),
                    name: route_name(route.method, &route.path),
                    method: route.method.as_str(),
                    path: &route.path,
                    handler: route.handler_ref(),
                    line: route.source_line,
                    path_parameters: &route.path_parameters,
                    method_parameters: &route.method_parameters,
                })
            })
            .collect();
        let out = serde_json::to_string_pretty(&listings).into_diagnostic()?;
        println!("{}", out);
        return Ok(());
    }

    for source in &loaded.sources {
        ui::box_header(&source.declaration.origin);
        ui::box_footer();
        for route in &source.routes {
            ui::route_line(
                route.source_line,
                route.method.as_str(),
                &route.path,
                &route.handler_ref(),
                &route_name(route.method, &route.path),
            );
        }
        println!();
    }
    report_warnings(&loaded.skipped, &[]);

    Ok(())
}

/// Watch the source directory and recompile on change.
async fn run_watch_mode(config: CompilerConfig) -> miette::Result<()> {
    let source_dir = config.source_dir.clone();
    ui::info(&format!("Watching for changes in {}", source_dir.display()));
    println!();

    let compiler = Compiler::new(config);
    recompile(&compiler);

    // Capacity 1: changes that arrive during a compile collapse into one rerun.
    let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(1);

    let mut debouncer = new_debouncer(Duration::from_millis(500), move |result: DebounceEventResult| {
        match result {
            Ok(events) => {
                let relevant = events
                    .iter()
                    .any(|e| e.path.extension().is_some_and(|ext| ext == ROUTES_EXTENSION));
                if relevant {
                    let _ = tx.try_send(());
                }
            }
            Err(e) => tracing::warn!(error = %e, "file watcher error"),
        }
    })
    .into_diagnostic()?;

    debouncer
        .watcher()
        .watch(&source_dir, RecursiveMode::Recursive)
        .into_diagnostic()?;

    ui::info("Ready! Waiting for changes...");

    loop {
        tokio::select! {
            Some(()) = rx.recv() => {
                println!();
                recompile(&compiler);
                println!();
                ui::info("Ready! Waiting for changes...");
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                ui::dim("Stopping watch mode.");
                break;
            }
        }
    }

    Ok(())
}

fn recompile(compiler: &Compiler) {
    let spinner = ui::spinner("Compiling routes...");
    let start = Instant::now();

    match compiler.compile() {
        Ok(result) => {
            spinner.finish_and_clear();
            let written = result
                .artifacts
                .iter()
                .filter(|a| a.outcome == WriteOutcome::Written)
                .count();
            ui::success(&format!(
                "Compiled {} route(s), {} file(s) updated in {}ms",
                result.routes,
                written,
                start.elapsed().as_millis()
            ));
            report_warnings(&result.skipped, &result.unknown_controllers);
        }
        Err(e) => {
            spinner.finish_and_clear();
            ui::error(&format!("{}", e));
        }
    }
}
