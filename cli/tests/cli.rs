use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

const SQUARE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"><rect width="100" height="100" fill="teal"/></svg>"#;

fn workdir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kakera-cli-{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn kakera(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kakera"))
        .args(args)
        .env_remove("KAKERA_CONNECTOR")
        .output()
        .expect("run kakera")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn render_solved_single_piece() {
    let dir = workdir("render");
    let image = dir.join("square.svg");
    fs::write(&image, SQUARE_SVG).expect("write image");

    let output = kakera(&[
        "render",
        image.to_str().expect("utf8 path"),
        "--cols",
        "1",
        "--rows",
        "1",
        "--solved",
        "--seed",
        "7",
        "--viewport",
        "100x100",
    ]);
    assert!(output.status.success(), "{output:?}");
    let svg = stdout(&output);
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"fill="teal""#));
    let (x, y) = piece_use_position(&svg, "piece0-0").expect("piece use");
    assert!((x - 134.0).abs() < 1e-3, "x = {x}");
    assert!((y - 15.0).abs() < 1e-3, "y = {y}");
}

fn attribute(element: &str, name: &str) -> Option<f32> {
    let start = element.find(&format!(" {name}=\""))? + name.len() + 3;
    let end = start + element[start..].find('"')?;
    element[start..end].parse().ok()
}

fn piece_use_position(svg: &str, id: &str) -> Option<(f32, f32)> {
    let href = format!("href=\"#{id}\"");
    let element = svg
        .split("<use ")
        .find(|element| element.starts_with("class=\"piece\"") && element.contains(&href))?;
    Some((attribute(element, "x")?, attribute(element, "y")?))
}

#[test]
fn play_script_drags_into_assembly() {
    let dir = workdir("play");
    let image = dir.join("square.svg");
    let script = dir.join("moves.txt");
    let board = dir.join("board.svg");
    fs::write(&image, SQUARE_SVG).expect("write image");
    // 3x3 on a 100 unit image: tiles start at (124, 5) with 43.67 cells,
    // assembly cells are 33.3 wide from (7.5, 15.5).
    fs::write(&script, "# first tile to first slot\ndown 146 27\nmove 24 32\nup 24 32\nresize 600 900\n")
        .expect("write script");

    let output = kakera(&[
        "play",
        image.to_str().expect("utf8 path"),
        "--script",
        script.to_str().expect("utf8 path"),
        "--seed",
        "0x2a",
        "--out",
        board.to_str().expect("utf8 path"),
    ]);
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("dropped "), "{text}");
    assert!(text.contains("tile(0, 0) -> assembly(0, 0)"), "{text}");
    assert!(text.contains("complete: false"), "{text}");
    let svg = fs::read_to_string(&board).expect("board written");
    assert!(svg.contains("<clipPath"));
}

#[test]
fn bad_script_line_fails() {
    let dir = workdir("bad");
    let image = dir.join("square.svg");
    let script = dir.join("moves.txt");
    fs::write(&image, SQUARE_SVG).expect("write image");
    fs::write(&script, "down 1 2\nfly 3 4\n").expect("write script");

    let output = kakera(&[
        "play",
        image.to_str().expect("utf8 path"),
        "--script",
        script.to_str().expect("utf8 path"),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("script line 2"));
}

#[test]
fn levels_lists_difficulties() {
    let output = kakera(&["levels"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("*0 3x3 (9 pieces)"), "{text}");
    assert!(text.contains("8x6 (48 pieces)"), "{text}");
}
