use std::fmt;

use kakera_core::{
    difficulty, Difficulty, DragOutcome, LevelCursor, PointerEvent, PuzzleEngine, PuzzleError,
    PuzzleOptions, Viewport, DEFAULT_DIFFICULTY, DIFFICULTIES,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::host::HostParams;
use crate::source::SourceSvg;
use crate::svg_view::{render_scene, SvgOptions};

/// Where level images come from. Hosts fetch them, the CLI reads files.
pub trait LevelSource {
    type Error: fmt::Display;

    fn load_level(&mut self, name: &str) -> Result<SourceSvg, Self::Error>;
}

impl<F, E> LevelSource for F
where
    F: FnMut(&str) -> Result<SourceSvg, E>,
    E: fmt::Display,
{
    type Error = E;

    fn load_level(&mut self, name: &str) -> Result<SourceSvg, E> {
        self(name)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
    #[error("no levels to play")]
    NoLevels,
    #[error("no difficulty with index {0}")]
    UnknownDifficulty(usize),
    #[error("cannot load level {name}: {message}")]
    Level { name: String, message: String },
}

/// One player's game: the level list, the chosen difficulty and the puzzle
/// currently on the board. Changing level or difficulty builds a fresh,
/// shuffled puzzle.
pub struct Session {
    levels: LevelCursor,
    difficulty: usize,
    options: PuzzleOptions,
    viewport: Viewport,
    rng: StdRng,
    source: Option<SourceSvg>,
    engine: Option<PuzzleEngine>,
}

impl Session {
    pub fn new(levels: LevelCursor, options: PuzzleOptions, viewport: Viewport, seed: u64) -> Self {
        Self {
            levels,
            difficulty: DEFAULT_DIFFICULTY,
            options,
            viewport,
            rng: StdRng::seed_from_u64(seed),
            source: None,
            engine: None,
        }
    }

    pub fn apply_params(&mut self, params: &HostParams) {
        if let Some(connector) = &params.connector {
            self.options.connector_shape = connector.clone();
        }
        if let Some(level) = params.level {
            self.levels.select(level);
        }
    }

    pub fn levels(&self) -> &LevelCursor {
        &self.levels
    }

    pub fn difficulty(&self) -> &'static Difficulty {
        &DIFFICULTIES[self.difficulty]
    }

    pub fn difficulty_index(&self) -> usize {
        self.difficulty
    }

    pub fn options(&self) -> &PuzzleOptions {
        &self.options
    }

    pub fn engine(&self) -> Option<&PuzzleEngine> {
        self.engine.as_ref()
    }

    pub fn source(&self) -> Option<&SourceSvg> {
        self.source.as_ref()
    }

    /// Loads the current level and starts a puzzle on it.
    pub fn start<L: LevelSource>(&mut self, loader: &mut L) -> Result<(), SessionError> {
        let name = self.levels.current().ok_or(SessionError::NoLevels)?.to_string();
        let source = loader
            .load_level(&name)
            .map_err(|err| SessionError::Level {
                name: name.clone(),
                message: err.to_string(),
            })?;
        log::debug!("loaded level {name}");
        self.source = Some(source);
        self.regenerate()
    }

    pub fn next_level<L: LevelSource>(&mut self, loader: &mut L) -> Result<(), SessionError> {
        self.levels.next().ok_or(SessionError::NoLevels)?;
        self.start(loader)
    }

    pub fn prev_level<L: LevelSource>(&mut self, loader: &mut L) -> Result<(), SessionError> {
        self.levels.prev().ok_or(SessionError::NoLevels)?;
        self.start(loader)
    }

    pub fn set_difficulty(&mut self, index: usize) -> Result<(), SessionError> {
        if difficulty(index).is_none() {
            return Err(SessionError::UnknownDifficulty(index));
        }
        self.difficulty = index;
        if self.source.is_some() {
            self.regenerate()?;
        }
        Ok(())
    }

    fn regenerate(&mut self) -> Result<(), SessionError> {
        let Some(source) = &self.source else {
            return Ok(());
        };
        let level = self.difficulty();
        let mut engine = PuzzleEngine::new(
            source.view_box,
            level.cols,
            level.rows,
            &self.options,
            self.viewport,
            &mut self.rng,
        )?;
        engine.shuffle(&mut self.rng);
        log::debug!("new {} puzzle", level.label);
        self.engine = Some(engine);
        Ok(())
    }

    /// Re-lays the board out only when the orientation changes.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        self.viewport = viewport;
        self.engine
            .as_mut()
            .is_some_and(|engine| engine.resize(viewport))
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) -> DragOutcome {
        match self.engine.as_mut() {
            Some(engine) => engine.on_pointer_down(event),
            None => DragOutcome::Ignored,
        }
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> DragOutcome {
        match self.engine.as_mut() {
            Some(engine) => engine.on_pointer_move(event),
            None => DragOutcome::Ignored,
        }
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) -> DragOutcome {
        match self.engine.as_mut() {
            Some(engine) => engine.on_pointer_up(event),
            None => DragOutcome::Ignored,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.engine.as_ref().is_some_and(PuzzleEngine::is_complete)
    }

    pub fn render(&self, options: &SvgOptions) -> Option<String> {
        let engine = self.engine.as_ref()?;
        let source = self.source.as_ref()?;
        Some(render_scene(&engine.scene(), source, options))
    }
}
