//! Headless rack elevation editor.
//!
//! Loads a project (or the built-in two-rack sample), attaches an in-memory
//! viewport and applies editor commands read line by line from stdin.

use std::io::{self, BufRead, Write};
use std::path::Path;

use rackelev::config::AppConfig;
use rackelev::editor::Editor;
use rackelev::keybindings::KeyCode;
use rackelev::library::PopulatorLibrary;
use rackelev::model::{ItemRef, Project};
use rackelev::sample::two_rack_project;
use rackelev::session::{Mode, Orientation};
use rackelev::viewport::HeadlessViewport;

const HELP: &str = "\
commands:
  click <id> [append]      select a cabinet or RU by id
  key <Code>               press a key (Numpad1, NumpadAdd, Escape, ...)
  mode cab|ru|integrate    request a mode
  zoom <amount>            change the scale by a signed delta
  place <library-id>       put a populator into the active RU
  clear                    remove the populator at the active RU
  orient front|rear        change the viewing orientation
  resize <w> <h>           resize the viewport and refit
  fit                      refit the scene to the viewport
  library                  list the populator library
  print                    print the current scene as JSON
  quit";

fn main() {
    let config = AppConfig::load_from_default_path().unwrap_or_default();
    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    if let Err(e) = run(&config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let library = PopulatorLibrary::builtin();
    let project = match std::env::args().nth(1) {
        Some(path) => Project::load(Path::new(&path))?,
        None => two_rack_project(&library)?,
    };

    let viewport = HeadlessViewport::new(
        config.preferences.viewport.width,
        config.preferences.viewport.height,
    );
    let editor = Editor::new(viewport, config, library);
    editor.load_project(project);
    editor.attach_surface();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", editor.session().summary())?;
    for line in stdin.lock().lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            continue;
        };
        if command == "quit" || command == "exit" {
            break;
        }
        match execute(&editor, command, args) {
            Ok(Some(output)) => writeln!(stdout, "{}", output)?,
            Ok(None) => writeln!(stdout, "{}", editor.session().summary())?,
            Err(message) => writeln!(stdout, "error: {}", message)?,
        }
    }
    Ok(())
}

/// Apply one command. `Ok(None)` means "print the session summary".
fn execute(
    editor: &Editor<HeadlessViewport>,
    command: &str,
    args: &[&str],
) -> Result<Option<String>, String> {
    match (command, args) {
        ("click", [id, rest @ ..]) => {
            let append = rest.first() == Some(&"append");
            let item = find_item(editor, id).ok_or_else(|| format!("no item '{}'", id))?;
            editor.click(&item, append);
        }
        ("key", [code]) => {
            let key: KeyCode = code.parse()?;
            if !editor.key(key) {
                return Ok(Some(format!("no change ({})", key)));
            }
        }
        ("mode", [name]) => {
            let mode = match *name {
                "cab" => Mode::Cab,
                "ru" => Mode::Ru,
                "integrate" => Mode::Integrate,
                other => return Err(format!("unknown mode '{}'", other)),
            };
            if !editor.change_mode(mode) {
                return Ok(Some(format!("{} request ignored", mode.name())));
            }
        }
        ("zoom", [amount]) => {
            let amount: f32 = amount.parse().map_err(|e| format!("{}", e))?;
            editor.zoom(amount);
        }
        ("place", [id]) => editor.assign_populator(id).map_err(|e| e.to_string())?,
        ("clear", []) => {
            editor.clear_active_slot().map_err(|e| e.to_string())?;
        }
        ("orient", [face]) => {
            let orientation = match *face {
                "front" => Orientation::Front,
                "rear" => Orientation::Rear,
                other => return Err(format!("unknown orientation '{}'", other)),
            };
            editor.set_orientation(orientation);
        }
        ("resize", [width, height]) => {
            let width: f32 = width.parse().map_err(|e| format!("{}", e))?;
            let height: f32 = height.parse().map_err(|e| format!("{}", e))?;
            editor
                .driver()
                .with_viewport_mut(|viewport| viewport.resize(width, height));
            editor.container_resized();
        }
        ("fit", []) => {
            editor.fit_to_view();
        }
        ("library", []) => {
            let lines: Vec<String> = editor
                .library()
                .grouped()
                .into_iter()
                .flat_map(|(group, entries)| {
                    std::iter::once(format!("{}:", group.label)).chain(entries.into_iter().map(
                        |p| format!("  {:<12} {} ({}U)", p.id(), p.name(), p.ru_span()),
                    ))
                })
                .collect();
            return Ok(Some(lines.join("\n")));
        }
        ("print", []) => {
            let scene = editor.scene().ok_or("nothing rendered yet")?;
            let json = serde_json::to_string_pretty(&scene).map_err(|e| e.to_string())?;
            return Ok(Some(json));
        }
        ("help", _) => return Ok(Some(HELP.to_string())),
        _ => return Err(format!("unrecognized command '{}', try 'help'", command)),
    }
    Ok(None)
}

/// Resolve a cabinet or RU id against the last presented scene.
fn find_item(editor: &Editor<HeadlessViewport>, id: &str) -> Option<ItemRef> {
    editor.scene().and_then(|scene| scene.item_for(id))
}
