use kakera_core::{Point, Viewport};
use thiserror::Error;

/// One line of a replay script. Coordinates are puzzle-local.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptCommand {
    Down(Point),
    Move(Point),
    Up(Point),
    Resize(Viewport),
    NextLevel,
    PrevLevel,
    Difficulty(usize),
}

#[derive(Debug, Error, PartialEq)]
#[error("script line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let fail = |message: String| ScriptError {
            line: index + 1,
            message,
        };
        let mut words = content.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = words.collect();
        let command = match verb.as_str() {
            "down" | "move" | "up" | "resize" => {
                let [a, b] = args.as_slice() else {
                    return Err(fail(format!("{verb} takes two numbers")));
                };
                let x: f32 = a.parse().map_err(|_| fail(format!("bad number {a:?}")))?;
                let y: f32 = b.parse().map_err(|_| fail(format!("bad number {b:?}")))?;
                match verb.as_str() {
                    "down" => ScriptCommand::Down(Point::new(x, y)),
                    "move" => ScriptCommand::Move(Point::new(x, y)),
                    "up" => ScriptCommand::Up(Point::new(x, y)),
                    _ => ScriptCommand::Resize(Viewport::new(x, y)),
                }
            }
            "next" if args.is_empty() => ScriptCommand::NextLevel,
            "prev" if args.is_empty() => ScriptCommand::PrevLevel,
            "difficulty" => match args.as_slice() {
                [index] => ScriptCommand::Difficulty(
                    index
                        .parse()
                        .map_err(|_| fail(format!("bad difficulty {index:?}")))?,
                ),
                _ => return Err(fail("difficulty takes one index".to_string())),
            },
            _ => return Err(fail(format!("unknown command {content:?}"))),
        };
        commands.push(command);
    }
    Ok(commands)
}
