mod logger;
mod script;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use kakera::{render_scene, Session, SourceSvg, SvgOptions};
use kakera_core::{
    difficulty, difficulty_by_label, DragOutcome, LevelCursor, Point, PointerEvent, PuzzleEngine,
    PuzzleOptions, Viewport, DEFAULT_DIFFICULTY, DIFFICULTIES,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::script::{parse_script, ScriptCommand};

#[derive(Parser)]
#[command(name = "kakera", version, about = "Build, render and replay SVG jigsaw puzzles")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// TOML file with puzzle options.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cut an SVG image into a puzzle and write the board as SVG.
    Render {
        image: PathBuf,
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Grid size, overriding --difficulty.
        #[arg(long, requires = "rows")]
        cols: Option<usize>,
        #[arg(long, requires = "cols")]
        rows: Option<usize>,
        /// Leave the pieces in order instead of shuffling.
        #[arg(long)]
        solved: bool,
        #[arg(long)]
        no_style: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replay a pointer script against a session over one or more levels.
    Play {
        #[arg(required = true)]
        images: Vec<PathBuf>,
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Script file; stdin when omitted.
        #[arg(long)]
        script: Option<PathBuf>,
        /// Write the final board here.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the difficulty levels.
    Levels,
}

#[derive(Args)]
struct PuzzleArgs {
    /// Difficulty label (e.g. 4x4) or index.
    #[arg(long)]
    difficulty: Option<String>,
    #[arg(long, env = "KAKERA_CONNECTOR")]
    connector: Option<String>,
    #[arg(long)]
    seed: Option<String>,
    #[arg(long, default_value = "1280x720", value_parser = parse_viewport)]
    viewport: Viewport,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logger::init(cli.verbose);
    let options = load_options(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            image,
            puzzle,
            cols,
            rows,
            solved,
            no_style,
            out,
        } => {
            let options = puzzle.apply(options);
            let (cols, rows) = match (cols, rows) {
                (Some(cols), Some(rows)) => (cols, rows),
                _ => {
                    let level = &DIFFICULTIES[puzzle.difficulty_index()?];
                    (level.cols, level.rows)
                }
            };
            let source = load_source(&image)?;
            let mut rng = StdRng::seed_from_u64(puzzle.seed()?);
            let mut engine = PuzzleEngine::new(
                source.view_box,
                cols,
                rows,
                &options,
                puzzle.viewport,
                &mut rng,
            )?;
            if !solved {
                engine.shuffle(&mut rng);
            }
            let svg = render_scene(
                &engine.scene(),
                &source,
                &SvgOptions {
                    embed_style: !no_style,
                },
            );
            write_output(out.as_deref(), &svg)?;
        }
        Commands::Play {
            images,
            puzzle,
            script,
            out,
        } => {
            let text = match script {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut text = String::new();
                    io::stdin().read_to_string(&mut text)?;
                    text
                }
            };
            let commands = parse_script(&text)?;
            let levels = images
                .iter()
                .map(|path| path.to_string_lossy().into_owned())
                .collect();
            let mut session = Session::new(
                LevelCursor::new(levels),
                puzzle.apply(options),
                puzzle.viewport,
                puzzle.seed()?,
            );
            session.set_difficulty(puzzle.difficulty_index()?)?;
            let mut loader = |name: &str| load_source(Path::new(name));
            session.start(&mut loader)?;

            for command in commands {
                match command {
                    ScriptCommand::Down(p) | ScriptCommand::Move(p) | ScriptCommand::Up(p) => {
                        let outcome = dispatch_pointer(&mut session, command, p);
                        report(&session, outcome);
                    }
                    ScriptCommand::Resize(viewport) => {
                        if session.resize(viewport) {
                            log::info!("relayout at {}x{}", viewport.width, viewport.height);
                        }
                    }
                    ScriptCommand::NextLevel => {
                        session.next_level(&mut loader)?;
                        println!("level {}", session.levels().current().unwrap_or_default());
                    }
                    ScriptCommand::PrevLevel => {
                        session.prev_level(&mut loader)?;
                        println!("level {}", session.levels().current().unwrap_or_default());
                    }
                    ScriptCommand::Difficulty(index) => {
                        session.set_difficulty(index)?;
                        println!("difficulty {}", session.difficulty().label);
                    }
                }
            }
            println!("complete: {}", session.is_complete());

            if let Some(path) = out {
                if let Some(svg) = session.render(&SvgOptions::default()) {
                    fs::write(path, svg)?;
                }
            }
        }
        Commands::Levels => {
            for (index, level) in DIFFICULTIES.iter().enumerate() {
                let marker = if index == DEFAULT_DIFFICULTY { "*" } else { " " };
                println!(
                    "{marker}{index} {} ({} pieces)",
                    level.label,
                    level.piece_count()
                );
            }
        }
    }

    Ok(())
}

impl PuzzleArgs {
    fn apply(&self, mut options: PuzzleOptions) -> PuzzleOptions {
        if let Some(connector) = &self.connector {
            options.connector_shape = connector.clone();
        }
        options
    }

    fn difficulty_index(&self) -> Result<usize, Box<dyn std::error::Error>> {
        let Some(raw) = self.difficulty.as_deref() else {
            return Ok(DEFAULT_DIFFICULTY);
        };
        if let Ok(index) = raw.trim().parse::<usize>() {
            if difficulty(index).is_some() {
                return Ok(index);
            }
        }
        difficulty_by_label(raw)
            .and_then(|level| kakera_core::difficulty_index(level.cols, level.rows))
            .ok_or_else(|| {
                let labels: Vec<_> = DIFFICULTIES.iter().map(|d| d.label).collect();
                format!("unknown difficulty {raw}; expected one of {}", labels.join(", ")).into()
            })
    }

    fn seed(&self) -> Result<u64, Box<dyn std::error::Error>> {
        let seed = match self.seed.as_deref() {
            Some(raw) => parse_seed_arg(raw)?,
            None => rand::rng().random(),
        };
        log::info!("seed {seed:#x}");
        Ok(seed)
    }
}

fn dispatch_pointer(session: &mut Session, command: ScriptCommand, p: Point) -> DragOutcome {
    let event = PointerEvent::local_at(p);
    match command {
        ScriptCommand::Down(_) => session.pointer_down(&event),
        ScriptCommand::Move(_) => session.pointer_move(&event),
        _ => session.pointer_up(&event),
    }
}

fn report(session: &Session, outcome: DragOutcome) {
    let label = |id| {
        session
            .engine()
            .and_then(|engine| engine.board().piece(id))
            .map(|piece| piece.label())
            .unwrap_or_default()
    };
    match outcome {
        DragOutcome::Dropped {
            piece,
            from,
            to,
            complete,
        } => {
            println!("dropped {} {from} -> {to}", label(piece));
            if complete {
                println!("solved");
            }
        }
        DragOutcome::Returned { piece, slot } => {
            println!("returned {} to {slot}", label(piece));
        }
        other => log::debug!("{other:?}"),
    }
}

fn load_options(path: Option<&Path>) -> Result<PuzzleOptions, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Ok(toml::from_str(&text)?)
        }
        None => Ok(PuzzleOptions::default()),
    }
}

fn load_source(path: &Path) -> Result<SourceSvg, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path).map_err(|err| format!("{}: {err}", path.display()))?;
    Ok(SourceSvg::parse(&text)?)
}

fn write_output(path: Option<&Path>, svg: &str) -> io::Result<()> {
    match path {
        Some(path) => fs::write(path, svg),
        None => {
            println!("{svg}");
            Ok(())
        }
    }
}

fn parse_viewport(raw: &str) -> Result<Viewport, String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {raw}"))?;
    let width: f32 = w.trim().parse().map_err(|_| format!("bad width {w}"))?;
    let height: f32 = h.trim().parse().map_err(|_| format!("bad height {h}"))?;
    if !(width > 0.0 && height > 0.0) {
        return Err(format!("viewport must be positive, got {raw}"));
    }
    Ok(Viewport::new(width, height))
}

fn parse_seed_arg(raw: &str) -> Result<u64, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    let value = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16)?
    } else {
        trimmed.parse::<u64>()?
    };
    Ok(value)
}
