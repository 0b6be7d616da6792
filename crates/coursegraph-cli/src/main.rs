use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use coursegraph_core::{
    required_exam_score, Catalog, Category, ConfigManager, Course, GradeInput, LoggingConfig,
    Track,
};
use coursegraph_graph::{Direction, TraversalConfig};
use coursegraph_progress::{
    CourseStatus, CurriculumSession, FileSnapshotStore, LayoutFilter, RoadmapLayout,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style, Table};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "coursegraph")]
#[command(about = "CourseGraph CLI - Curriculum prerequisites and study progress", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (json, pretty, table)
    #[arg(short, long, global = true, default_value = "pretty")]
    output: OutputFormat,

    /// Configuration file (defaults to .coursegraph.toml discovery)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog document (.json or .toml) instead of the bundled one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Progress snapshot file
    #[arg(long, global = true)]
    progress: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
    Table,
}

#[derive(Subcommand)]
enum Commands {
    /// Courses grouped by rank
    Levels,

    /// Rank of a single course
    Rank {
        /// Course ID
        id: String,
    },

    /// List courses with their current status
    Courses {
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,

        #[arg(long, value_enum)]
        track: Option<TrackArg>,
    },

    /// Whether a course can be selected, and why not
    Check {
        /// Course ID
        id: String,
    },

    /// Mark a course completed, or uncompleted if it already is
    Toggle {
        /// Course ID
        id: String,
    },

    /// Complete every currently available course of a category
    SelectAll {
        #[arg(value_enum)]
        category: CategoryArg,
    },

    /// Clear all progress
    Reset {
        /// Confirm clearing every completed course
        #[arg(long)]
        yes: bool,
    },

    /// Credits, academic year and graduation progress
    Status,

    /// How one course relates to another (direct neighbours only)
    Relation {
        focus: String,
        candidate: String,
    },

    /// Direct prerequisites and unlocks of a course
    Highlight {
        /// Course ID
        id: String,
    },

    /// Transitive prerequisites, or unlocks with --unlocks
    Chain {
        /// Course ID
        id: String,

        /// Follow unlock edges instead of prerequisites
        #[arg(long)]
        unlocks: bool,

        /// Maximum number of hops
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Roadmap geometry for rendering
    Layout {
        #[arg(long, value_enum, conflicts_with = "track")]
        category: Option<CategoryArg>,

        #[arg(long, value_enum)]
        track: Option<TrackArg>,
    },

    /// Catalog integrity findings
    Diagnostics,

    /// Final mark from practical and exam scores
    Grade {
        /// Practical score (0-100)
        #[arg(long)]
        practical: f64,

        /// Exam score (0-100)
        #[arg(long)]
        exam: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    General,
    Basic,
    Specialized,
    Project,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::General => Category::General,
            CategoryArg::Basic => Category::Basic,
            CategoryArg::Specialized => Category::Specialized,
            CategoryArg::Project => Category::Project,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TrackArg {
    Se,
    Ai,
    Scn,
}

impl From<TrackArg> for Track {
    fn from(arg: TrackArg) -> Self {
        match arg {
            TrackArg::Se => Track::SoftwareEngineering,
            TrackArg::Ai => Track::ArtificialIntelligence,
            TrackArg::Scn => Track::NetworksAndSystems,
        }
    }
}

/// Loaded session plus where its progress is persisted.
struct App {
    manager: ConfigManager,
    session: CurriculumSession,
    store: FileSnapshotStore,
}

impl App {
    fn open(manager: ConfigManager) -> Result<Self> {
        let config = manager.config();
        let catalog = match &config.catalog.path {
            Some(path) => Catalog::from_path(path)
                .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
            None => Catalog::bundled().context("Failed to load bundled catalog")?,
        };
        let credits = manager.graduation_credits(catalog.graduation_credits());
        let catalog = catalog.with_graduation_credits(credits);

        let mut session = CurriculumSession::from_catalog(catalog);
        let store = FileSnapshotStore::new(config.progress.resolved_snapshot_path());
        session.load_from(&store);

        Ok(Self {
            manager,
            session,
            store,
        })
    }

    fn persist(&mut self) -> Result<()> {
        if !self.manager.config().progress.autosave {
            debug!("Autosave disabled, progress not written");
            return Ok(());
        }
        self.session.save_to(&mut self.store).with_context(|| {
            format!("Failed to save progress to {}", self.store.path().display())
        })
    }

    fn course(&self, id: &str) -> Result<&Course> {
        self.session
            .graph()
            .course(id)
            .with_context(|| format!("Unknown course: {}", id))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = load_config(&cli)?;
    init_tracing(&manager.config().logging, cli.verbose);

    let mut app = App::open(manager)?;

    match execute_command(&cli, &mut app) {
        Ok(output) => {
            print_output(&cli.output, &output)?;
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> Result<ConfigManager> {
    let mut manager = match &cli.config {
        Some(path) => ConfigManager::from_file(path),
        None => ConfigManager::load(),
    }
    .context("Failed to load configuration")?;

    let config = manager.config_mut();
    if let Some(catalog) = &cli.catalog {
        config.catalog.path = Some(catalog.clone());
    }
    if let Some(progress) = &cli.progress {
        config.progress.snapshot_path = Some(progress.clone());
    }

    Ok(manager)
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match logging.format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        "compact" => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        _ => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }
}

fn execute_command(cli: &Cli, app: &mut App) -> Result<Value> {
    match &cli.command {
        Commands::Levels => execute_levels(app),
        Commands::Rank { id } => {
            let course = app.course(id)?;
            Ok(json!({
                "id": course.id,
                "name": course.name,
                "rank": app.session.get_rank(id),
            }))
        }
        Commands::Courses { category, track } => {
            let category = category.map(Category::from);
            let track = track.map(Track::from);
            let rows: Vec<Value> = app
                .session
                .catalog()
                .iter()
                .filter(|c| category.map_or(true, |cat| c.category == cat))
                .filter(|c| track.map_or(true, |t| c.track == Some(t)))
                .map(|c| course_row(&app.session, c))
                .collect();
            Ok(Value::Array(rows))
        }
        Commands::Check { id } => {
            let course = app.course(id)?;
            let eligibility = app.session.eligibility(id)?;
            Ok(json!({
                "id": course.id,
                "name": course.name,
                "eligible": eligibility.is_eligible(),
                "completed": app.session.is_completed(id),
                "reason": eligibility.lock_reason().map(|r| r.to_string()),
            }))
        }
        Commands::Toggle { id } => {
            let outcome = app.session.toggle(id)?;
            app.persist()?;
            Ok(json!({
                "id": id,
                "outcome": outcome,
                "total_credits": app.session.total_credits(),
            }))
        }
        Commands::SelectAll { category } => {
            let category = Category::from(*category);
            let added = app.session.select_all_eligible(category);
            app.persist()?;
            Ok(json!({
                "category": category,
                "added": added,
                "total_credits": app.session.total_credits(),
            }))
        }
        Commands::Reset { yes } => {
            if !yes {
                bail!("Refusing to clear progress without --yes");
            }
            let cleared = app.session.state().len();
            app.session.reset();
            app.persist()?;
            info!("Progress reset");
            Ok(json!({ "cleared": cleared }))
        }
        Commands::Status => execute_status(app),
        Commands::Relation { focus, candidate } => {
            app.course(focus)?;
            Ok(json!({
                "focus": focus,
                "candidate": candidate,
                "relation": app.session.relation_of(focus, candidate),
            }))
        }
        Commands::Highlight { id } => {
            let highlight = app
                .session
                .highlight(id)
                .with_context(|| format!("Unknown course: {}", id))?;
            Ok(serde_json::to_value(highlight)?)
        }
        Commands::Chain { id, unlocks, depth } => {
            app.course(id)?;
            let direction = if *unlocks {
                Direction::Unlocks
            } else {
                Direction::Prerequisites
            };
            let config = TraversalConfig { max_depth: *depth };
            let graph = app.session.graph();
            let steps: Vec<Value> = graph
                .chain(id, direction, &config)
                .into_iter()
                .map(|step| {
                    json!({
                        "id": step.id,
                        "name": graph.catalog().name_of(&step.id),
                        "distance": step.distance,
                    })
                })
                .collect();
            Ok(json!({
                "id": id,
                "direction": direction,
                "chain": steps,
            }))
        }
        Commands::Layout { category, track } => {
            let filter = match (category, track) {
                (Some(category), _) => LayoutFilter::Category((*category).into()),
                (None, Some(track)) => LayoutFilter::Track((*track).into()),
                (None, None) => LayoutFilter::All,
            };
            let layout =
                RoadmapLayout::compute(&app.session, &app.manager.config().layout, filter);
            Ok(serde_json::to_value(layout)?)
        }
        Commands::Diagnostics => {
            let graph = app.session.graph();
            Ok(json!({
                "courses": graph.catalog().len(),
                "catalog_credits": graph.catalog().total_credits(),
                "edges": graph.unlock_map().edge_count(),
                "levels": graph.levels().len(),
                "has_cycles": graph.has_cycles(),
                "warnings": graph
                    .warnings()
                    .iter()
                    .map(|w| w.to_string())
                    .collect::<Vec<_>>(),
            }))
        }
        Commands::Grade { practical, exam } => {
            let input = GradeInput::new(*practical, *exam).context("Invalid scores")?;
            let result = input.evaluate();
            Ok(json!({
                "practical_part": result.practical_part,
                "exam_part": result.exam_part,
                "final_score": result.final_score,
                "outcome": result.outcome,
                "passing": result.outcome.is_passing(),
                "required_exam_score": required_exam_score(*practical)?,
            }))
        }
    }
}

fn execute_levels(app: &App) -> Result<Value> {
    let graph = app.session.graph();
    let levels: Vec<Value> = graph
        .levels()
        .iter()
        .enumerate()
        .map(|(rank, ids)| {
            json!({
                "rank": rank,
                "count": ids.len(),
                "courses": ids,
            })
        })
        .collect();
    Ok(Value::Array(levels))
}

fn execute_status(app: &App) -> Result<Value> {
    let session = &app.session;
    let year = session.year_status();
    Ok(json!({
        "total_credits": session.total_credits(),
        "completed_courses": session.state().len(),
        "year": year.label,
        "year_label_ar": year.year.arabic_label(),
        "year_progress": format!("{:.0}%", year.progress * 100.0),
        "next_threshold": year.next_threshold,
        "remaining_credits": session.remaining_credits(),
        "graduation_progress": format!("{:.0}%", session.graduation_progress() * 100.0),
        "snapshot": app.store.path().display().to_string(),
    }))
}

fn status_label(status: &CourseStatus) -> &'static str {
    if status.is_completed {
        "completed"
    } else if status.is_available() {
        "available"
    } else {
        "locked"
    }
}

fn course_row(session: &CurriculumSession, course: &Course) -> Value {
    let status = session
        .course_status(&course.id)
        .map(|s| status_label(&s))
        .unwrap_or("unknown");
    json!({
        "id": course.id,
        "name": course.name,
        "credits": course.credits,
        "category": course.category,
        "track": course.track.map(|t| t.code()),
        "rank": session.get_rank(&course.id),
        "status": status,
    })
}

fn print_output(format: &OutputFormat, value: &Value) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Pretty => {
            print_pretty(value, 0);
        }
        OutputFormat::Table => {
            print_table(value);
        }
    }
    Ok(())
}

fn print_pretty(value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let key_colored = key.cyan().bold();
                match val {
                    Value::String(s) => println!("{}{}: {}", pad, key_colored, s.green()),
                    Value::Number(n) => {
                        println!("{}{}: {}", pad, key_colored, n.to_string().yellow())
                    }
                    Value::Bool(b) => {
                        let val_colored = if *b { "true".green() } else { "false".red() };
                        println!("{}{}: {}", pad, key_colored, val_colored);
                    }
                    Value::Null => println!("{}{}: {}", pad, key_colored, "-".dimmed()),
                    Value::Array(items) if items.iter().all(is_scalar) => {
                        println!("{}{}: {}", pad, key_colored, join_scalars(items));
                    }
                    _ => {
                        println!("{}{}:", pad, key_colored);
                        print_pretty(val, indent + 1);
                    }
                }
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                println!("\n{}{}{}:", pad, "Item ".cyan(), (i + 1).to_string().yellow());
                print_pretty(item, indent + 1);
            }
        }
        other => println!("{}{}", pad, cell(other)),
    }
}

fn print_table(value: &Value) {
    match value {
        Value::Array(items) => println!("{}", build_table(items)),
        Value::Object(map) => {
            let mut builder = Builder::default();
            builder.push_record(["field", "value"]);
            let mut nested = Vec::new();
            for (key, val) in map {
                match val {
                    Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                        nested.push((key, items));
                    }
                    _ => {
                        builder.push_record([key.clone(), cell(val)]);
                    }
                }
            }
            let mut table = builder.build();
            table.with(Style::rounded());
            println!("{}", table);

            for (key, items) in nested {
                println!("\n{}", key.cyan().bold());
                println!("{}", build_table(items));
            }
        }
        other => println!("{}", cell(other)),
    }
}

/// Columns come from the first object's keys.
fn build_table(items: &[Value]) -> Table {
    let headers: Vec<String> = items
        .first()
        .and_then(Value::as_object)
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_else(|| vec!["value".to_string()]);

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in items {
        match item {
            Value::Object(obj) => {
                builder.push_record(
                    headers
                        .iter()
                        .map(|h| obj.get(h).map(cell).unwrap_or_default()),
                );
            }
            other => {
                builder.push_record([cell(other)]);
            }
        }
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn join_scalars(items: &[Value]) -> String {
    items.iter().map(cell).collect::<Vec<_>>().join(", ")
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        Value::Array(items) if items.iter().all(is_scalar) => join_scalars(items),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_arguments_parse() {
        let cli = Cli::try_parse_from([
            "coursegraph",
            "--output",
            "json",
            "layout",
            "--track",
            "ai",
        ])
        .unwrap();
        assert!(matches!(cli.output, OutputFormat::Json));
        assert!(matches!(
            cli.command,
            Commands::Layout {
                category: None,
                track: Some(TrackArg::Ai)
            }
        ));

        assert!(Cli::try_parse_from([
            "coursegraph",
            "layout",
            "--track",
            "ai",
            "--category",
            "basic"
        ])
        .is_err());
    }

    #[test]
    fn value_enums_map_to_domain() {
        assert_eq!(Category::from(CategoryArg::Project), Category::Project);
        assert_eq!(Track::from(TrackArg::Scn), Track::NetworksAndSystems);
    }

    #[test]
    fn cells_flatten_scalars() {
        assert_eq!(cell(&json!(null)), "-");
        assert_eq!(cell(&json!(["A", "B"])), "A, B");
        assert_eq!(cell(&json!(3)), "3");
        assert_eq!(cell(&json!("x")), "x");
    }

    #[test]
    fn table_uses_first_object_keys() {
        let rendered = build_table(&[
            json!({"id": "A", "rank": 0}),
            json!({"id": "B", "rank": 1}),
        ])
        .to_string();
        assert!(rendered.contains("id"));
        assert!(rendered.contains("rank"));
        assert!(rendered.contains("B"));
    }

    #[test]
    fn status_labels() {
        let status = CourseStatus {
            id: "A".into(),
            prereqs_met: true,
            credits_met: false,
            is_completed: false,
        };
        assert_eq!(status_label(&status), "locked");
    }
}
