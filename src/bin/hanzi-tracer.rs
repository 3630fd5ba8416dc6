use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Deserialize;

use hanzi_tracer::{
    DirGlyphProvider, DrawnStroke, EscalationPhase, Event, GeometricOracle, GlyphProvider,
    GridSize, JsonlGlyphProvider, Judgment, PracticeEngine, PracticeMode, PracticeOpts,
    PracticeSnapshot, Signal, SkipScope, locate_error, median_to_surface, points_from_pairs,
    render_snapshot, save_png, validate_stroke,
};

#[derive(Parser, Debug)]
#[command(name = "hanzi-tracer", version)]
struct Cli {
    /// Log to stderr (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Judge each recorded stroke of one character and print the verdicts as JSON lines.
    Check(CheckArgs),
    /// Run an event script through a practice engine and print signals and final state.
    Replay(ReplayArgs),
    /// Locate the error in an attempt and render it to PNG.
    Hint(HintArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Glyph dictionary (one JSON record per line) or a directory of `<char>.json` files.
    #[arg(long)]
    glyphs: PathBuf,

    /// Attempt JSON: `{"character": "...", "strokes": [[[x, y], ...], ...]}`.
    #[arg(long)]
    attempt: PathBuf,

    /// Surface size in pixels. Overrides the attempt's own `grid`.
    #[arg(long)]
    grid: Option<f64>,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    #[arg(long)]
    glyphs: PathBuf,

    /// Script JSON: `{"word": "...", "opts": {...}, "steps": [...]}`.
    #[arg(long)]
    script: PathBuf,
}

#[derive(Parser, Debug)]
struct HintArgs {
    #[arg(long)]
    glyphs: PathBuf,

    #[arg(long)]
    attempt: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    grid: Option<f64>,
}

#[derive(Deserialize, Debug)]
struct AttemptFile {
    character: String,
    #[serde(default)]
    grid: Option<f64>,
    strokes: Vec<Vec<[f64; 2]>>,
}

#[derive(Deserialize, Debug)]
struct ScriptFile {
    word: String,
    #[serde(default)]
    opts: Option<PracticeOpts>,
    steps: Vec<Step>,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Step {
    GestureStart { x: f64, y: f64 },
    GestureMove { x: f64, y: f64 },
    GestureEnd,
    /// Start, moves and end in one step.
    Stroke { points: Vec<[f64; 2]> },
    Submit,
    /// Submit and let the geometric oracle answer.
    Judge,
    Judgment {
        correct: bool,
        #[serde(default)]
        best_guess: Option<String>,
    },
    DismissHint,
    DismissDemonstration,
    Elapsed { ms: u64 },
    Skip { scope: SkipScope },
    Repeat,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Replay(args) => cmd_replay(args),
        Command::Hint(args) => cmd_hint(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn open_glyphs(path: &Path) -> anyhow::Result<Arc<dyn GlyphProvider>> {
    if path.is_dir() {
        return Ok(Arc::new(DirGlyphProvider::new(path)));
    }
    let provider = JsonlGlyphProvider::from_path(path)
        .with_context(|| format!("load glyph dictionary '{}'", path.display()))?;
    tracing::debug!(glyphs = provider.len(), "glyph dictionary loaded");
    Ok(Arc::new(provider))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read {what} '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {what} '{}'", path.display()))
}

fn single_char(s: &str) -> anyhow::Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => anyhow::bail!("expected exactly one character, got {s:?}"),
    }
}

fn grid_for(flag: Option<f64>, attempt: &AttemptFile) -> anyhow::Result<GridSize> {
    let px = flag.or(attempt.grid).unwrap_or(GridSize::default().px());
    Ok(GridSize::new(px)?)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let provider = open_glyphs(&args.glyphs)?;
    let attempt: AttemptFile = read_json(&args.attempt, "attempt")?;
    let character = single_char(&attempt.character)?;
    let grid = grid_for(args.grid, &attempt)?;
    let cfg = hanzi_tracer::ValidatorConfig::default();

    let glyph = provider.fetch(character).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "glyph lookup failed; judging without reference");
        None
    });
    if glyph.as_ref().is_none_or(|g| !g.has_reference()) {
        eprintln!("no reference data for '{character}'; every stroke is accepted");
    }

    for (i, stroke) in attempt.strokes.iter().enumerate() {
        let median = glyph
            .as_ref()
            .and_then(|g| g.median(i))
            .map(|m| median_to_surface(m, grid));
        let verdict = validate_stroke(&points_from_pairs(stroke), median.as_deref(), grid, &cfg);
        let line = serde_json::json!({ "stroke": i, "result": verdict });
        println!("{line}");
    }
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let provider = open_glyphs(&args.glyphs)?;
    let script: ScriptFile = read_json(&args.script, "script")?;
    let opts = script.opts.unwrap_or_default();
    let oracle = GeometricOracle::new(provider.clone(), opts.validator);
    let mut engine = PracticeEngine::new(opts).context("script options")?;
    let mut signals: Vec<Signal> = engine
        .start_word(&script.word)
        .with_context(|| format!("start word {:?}", script.word))?;
    signals.extend(engine.resolve_pending(provider.as_ref()));

    for step in script.steps {
        if matches!(step, Step::Judge) {
            signals.extend(engine.submit_to(&oracle));
            signals.extend(engine.resolve_pending(provider.as_ref()));
            continue;
        }
        for event in step_events(step) {
            signals.extend(engine.handle_with(event, provider.as_ref()));
        }
    }

    let report = serde_json::json!({
        "signals": signals,
        "snapshot": engine.snapshot(),
        "stats": engine.stats(),
    });
    serde_json::to_writer_pretty(std::io::stdout().lock(), &report).context("write report")?;
    println!();
    Ok(())
}

fn step_events(step: Step) -> Vec<Event> {
    use hanzi_tracer::Point;
    let event = match step {
        Step::GestureStart { x, y } => Event::GestureStart(Point::new(x, y)),
        Step::GestureMove { x, y } => Event::GestureMove(Point::new(x, y)),
        Step::GestureEnd => Event::GestureEnd,
        Step::Stroke { points } => {
            let points = points_from_pairs(&points);
            let Some((first, rest)) = points.split_first() else {
                return Vec::new();
            };
            return std::iter::once(Event::GestureStart(*first))
                .chain(rest.iter().map(|p| Event::GestureMove(*p)))
                .chain(std::iter::once(Event::GestureEnd))
                .collect();
        }
        Step::Submit => Event::Submit,
        // Needs the oracle; the replay loop runs it.
        Step::Judge => return Vec::new(),
        Step::Judgment {
            correct,
            best_guess,
        } => Event::JudgmentReceived(Judgment {
            correct,
            best_guess,
        }),
        Step::DismissHint => Event::DismissHint,
        Step::DismissDemonstration => Event::DismissDemonstration,
        Step::Elapsed { ms } => Event::Elapsed { ms },
        Step::Skip { scope } => Event::Skip(scope),
        Step::Repeat => Event::Repeat,
    };
    vec![event]
}

fn cmd_hint(args: HintArgs) -> anyhow::Result<()> {
    let provider = open_glyphs(&args.glyphs)?;
    let attempt: AttemptFile = read_json(&args.attempt, "attempt")?;
    let character = single_char(&attempt.character)?;
    let grid = grid_for(args.grid, &attempt)?;
    let opts = PracticeOpts {
        mode: PracticeMode::Tested,
        grid,
        ..PracticeOpts::default()
    };

    let glyph = provider.fetch(character).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "glyph lookup failed; locating without reference");
        None
    });
    let strokes: Vec<DrawnStroke> = attempt
        .strokes
        .iter()
        .map(|s| DrawnStroke::new(points_from_pairs(s)))
        .collect();
    let cloud: Vec<hanzi_tracer::Point> = strokes
        .iter()
        .flat_map(|s| s.points().iter().copied())
        .collect();
    let hint = locate_error(&cloud, glyph.as_ref(), grid, &opts.escalation.locator);

    let snapshot = PracticeSnapshot {
        mode: opts.mode,
        word: Some(character.to_string()),
        character: Some(character),
        character_index: 0,
        stroke_index: 0,
        total_strokes: glyph.as_ref().map_or(1, |g| g.stroke_count().max(1)),
        committed: Vec::new(),
        live: Vec::new(),
        last_rejected: Vec::new(),
        phase: EscalationPhase::Hint,
        attempts: opts.escalation.hint_after,
        post_demonstration: false,
        hint,
        demonstration_cursor: None,
        demonstration_total: None,
        frozen: strokes,
        completed: Vec::new(),
        glyph_pending: false,
        awaiting_judgment: false,
    };
    let image = render_snapshot(&snapshot, glyph.as_ref(), grid).context("rasterize hint")?;
    save_png(&image, &args.out).with_context(|| format!("write png '{}'", args.out.display()))?;

    println!("{}", serde_json::json!({ "hint": hint }));
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
