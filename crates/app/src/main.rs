use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use catalog::{FileCatalog, HttpCatalog, HttpCatalogConfig, JsonPreferencesStore, QuestionSource};
use prep_core::model::{
    Block, Content, DifficultyFilter, OptionLabel, Question, SessionConfig, TimerPolicy, Topic,
};
use services::{
    Clock, PreferencesService, ReviewCounts, ScoreLine, SessionLoopService, SessionState,
    TickOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCount { raw: String },
    InvalidTimer { raw: String },
    InvalidDifficulty { raw: String },
    MissingSource,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
            ArgsError::InvalidTimer { raw } => write!(f, "invalid --timer-secs value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => write!(f, "invalid --difficulty value: {raw}"),
            ArgsError::MissingSource => {
                write!(f, "no question source: pass --api/--file or set PREP_API_BASE_URL")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- run    [options]   # run an assessment session");
    eprintln!("  cargo run -p app -- topics [options]   # list available topics");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --api <base_url>      remote question-pool API");
    eprintln!("  --file <path>         local JSON pool file instead of the API");
    eprintln!("  --topic <name>        topic to draw questions from (default: general)");
    eprintln!("  --count <n>           questions per session (default: 10)");
    eprintln!("  --difficulty <tag>    mixed | beginner | intermediate | advanced (default: mixed)");
    eprintln!("  --no-shuffle          keep pool order");
    eprintln!("  --timer-secs <n>      per-session countdown; omit for untimed");
    eprintln!("  --prefs <path>        preferences file (default: .prep/prefs.json)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PREP_API_BASE_URL, PREP_API_TOKEN, PREP_POOL_FILE, PREP_TOPIC, PREP_PREFS_PATH");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Topics,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "topics" => Some(Self::Topics),
            _ => None,
        }
    }
}

enum SourceChoice {
    Api(HttpCatalogConfig),
    File(PathBuf),
}

struct Args {
    source: SourceChoice,
    topic: Topic,
    count: u32,
    filter: DifficultyFilter,
    shuffle: bool,
    timer_secs: Option<u32>,
    prefs_path: PathBuf,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api = HttpCatalogConfig::from_env();
        let mut file = std::env::var("PREP_POOL_FILE").ok().map(PathBuf::from);
        let mut topic = std::env::var("PREP_TOPIC").unwrap_or_else(|_| "general".into());
        let mut count = 10_u32;
        let mut filter = DifficultyFilter::Mixed;
        let mut shuffle = true;
        let mut timer_secs = None;
        let mut prefs_path = std::env::var("PREP_PREFS_PATH")
            .map_or_else(|_| PathBuf::from(".prep/prefs.json"), PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    api = Some(HttpCatalogConfig::new(value));
                }
                "--file" => {
                    let value = require_value(args, "--file")?;
                    file = Some(PathBuf::from(value));
                }
                "--topic" => {
                    topic = require_value(args, "--topic")?;
                }
                "--count" => {
                    let value = require_value(args, "--count")?;
                    count = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCount { raw: value.clone() })?;
                }
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    filter = DifficultyFilter::parse(&value)
                        .map_err(|_| ArgsError::InvalidDifficulty { raw: value.clone() })?;
                }
                "--no-shuffle" => shuffle = false,
                "--timer-secs" => {
                    let value = require_value(args, "--timer-secs")?;
                    let parsed: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTimer { raw: value.clone() })?;
                    timer_secs = Some(parsed);
                }
                "--prefs" => {
                    prefs_path = PathBuf::from(require_value(args, "--prefs")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let source = match (file, api) {
            // An explicit pool file wins over an API from the environment.
            (Some(path), _) => SourceChoice::File(path),
            (None, Some(config)) => SourceChoice::Api(config),
            (None, None) => return Err(ArgsError::MissingSource),
        };

        let topic = Topic::new(topic).map_err(|_| ArgsError::MissingValue { flag: "--topic" })?;

        Ok(Self {
            source,
            topic,
            count,
            filter,
            shuffle,
            timer_secs,
            prefs_path,
        })
    }
}

fn build_source(args: &Args) -> Result<Arc<dyn QuestionSource>, Box<dyn std::error::Error>> {
    match &args.source {
        SourceChoice::Api(config) => Ok(Arc::new(HttpCatalog::new(config.clone())?)),
        SourceChoice::File(path) => Ok(Arc::new(FileCatalog::new(args.topic.clone(), path))),
    }
}

fn render_content(content: &Content) -> String {
    let mut out = String::new();
    for block in content.blocks() {
        if !out.is_empty() {
            out.push('\n');
        }
        match block {
            Block::Text(text) => out.push_str(text),
            Block::Formula(formula) => {
                out.push_str("    ");
                out.push_str(formula);
            }
            Block::Image(uri) => out.push_str(&format!("[image: {uri}]")),
            Block::Video(uri) => out.push_str(&format!("[video: {uri}]")),
        }
    }
    out
}

fn print_question(question: &Question, number: usize, total: usize, picked: Option<&OptionLabel>) {
    println!();
    println!("── question {number}/{total} ──");
    println!("{}", render_content(question.prompt()));
    for option in question.options() {
        let marker = if picked == Some(&option.label) { "*" } else { " " };
        println!(" {marker}{}) {}", option.label, render_content(&option.content));
    }
}

fn format_remaining(secs: i64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

async fn run_session(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let source = build_source(&args)?;
    let preferences =
        PreferencesService::new(Arc::new(JsonPreferencesStore::new(&args.prefs_path)));
    let service =
        SessionLoopService::new(Clock::default_clock(), source).with_preferences(preferences);

    let timer = match args.timer_secs {
        Some(secs) => TimerPolicy::countdown_secs(secs)?,
        None => TimerPolicy::Off,
    };
    let config = SessionConfig::new(args.count, args.filter, args.shuffle, timer)?;

    let mut session = service.start_session(&args.topic, config).await?;
    if session.state() == SessionState::Empty {
        println!(
            "no questions matched for topic '{}' with that difficulty",
            args.topic
        );
        return Ok(());
    }

    println!(
        "topic '{}', {} questions{}",
        args.topic,
        session.total_questions(),
        args.timer_secs
            .map_or_else(String::new, |s| format!(", {} on the clock", format_remaining(i64::from(s))))
    );
    println!("answer with an option letter; n = next, p = previous, s = submit, q = quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));

    let report = loop {
        let Some(question) = session.current_question() else {
            break None;
        };
        let question_id = question.id();
        print_question(
            question,
            session.current_index() + 1,
            session.total_questions(),
            session.selected_for(question_id),
        );

        // Wait for either user input or a countdown tick. Dropping the
        // unfinished branch cancels it, so no tick survives the loop.
        let line = loop {
            tokio::select! {
                line = lines.next_line() => break line?,
                _ = interval.tick() => {
                    if let TickOutcome::AutoSubmitted = service.tick(&mut session)? {
                        println!();
                        println!("time is up");
                        break None;
                    }
                }
            }
        };

        if session.state() == SessionState::Submitted {
            break session.report().cloned();
        }
        let Some(line) = line else {
            // stdin closed without a submit
            break None;
        };

        let input = line.trim();
        match input {
            "" => {}
            "n" => {
                session.next()?;
            }
            "p" => {
                session.previous()?;
            }
            "s" => break Some(service.submit(&mut session)?),
            "q" => {
                println!("session abandoned");
                return Ok(());
            }
            other => {
                match OptionLabel::new(other) {
                    Ok(label) => match service.select_answer(&mut session, question_id, label) {
                        Ok(result) => {
                            debug!(answered = result.progress.answered, "answer recorded");
                            session.next()?;
                        }
                        Err(e) => println!("({e})"),
                    },
                    Err(e) => println!("({e})"),
                }
            }
        }
    };

    let Some(report) = report else {
        println!("session abandoned");
        return Ok(());
    };

    let score = ScoreLine::from_report(&report);
    let counts = ReviewCounts::from_report(&report);
    println!();
    println!(
        "score: {}/{} ({:.0}%) — {} wrong, {} skipped",
        score.correct,
        score.total,
        score.fraction() * 100.0,
        counts.incorrect,
        counts.skipped
    );

    for (row, question) in report.rows().iter().zip(session.questions()) {
        let verdict = if row.is_correct { "✓" } else { "✗" };
        let picked = row
            .selected
            .as_ref()
            .map_or("—".to_string(), ToString::to_string);
        println!(
            " {verdict} {} (you: {picked}, correct: {})",
            render_content(question.prompt()),
            row.correct
        );
        if !row.is_correct {
            if let Some(explanation) = question.explanation() {
                println!("   {}", render_content(explanation));
            }
        }
    }

    Ok(())
}

async fn run_topics(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let source = build_source(&args)?;
    let service = SessionLoopService::new(Clock::default_clock(), source);
    for topic in service.list_topics().await? {
        println!("{topic}");
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: run a session when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Run,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Run,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Run => run_session(args).await,
        Command::Topics => run_topics(args).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
