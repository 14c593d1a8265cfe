//! Terminal viewer driven end to end from a PGN file on disk.

mod common;

use std::fs;

use pgn_viewer::app::{App, Outcome};
use pgn_viewer::config::ViewerConfig;
use pgn_viewer::source::load_catalog;

fn run(app: &mut App, line: &str) -> String {
    match app.handle_line(line).expect("command accepted") {
        Outcome::Continue(out) => out,
        Outcome::Quit => String::from("<quit>"),
    }
}

#[test]
fn test_pgn_file_session_and_download() {
    let dir = std::env::temp_dir().join(format!("pgn-viewer-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let source = dir.join("opera.pgn");
    fs::write(&source, common::OPERA_GAME).unwrap();

    let config = ViewerConfig::from_lookup(Some(source.display().to_string()), |key| {
        match key {
            "PGN_VIEWER_EXERCISE" => Some("c41".to_string()),
            "PGN_VIEWER_DOWNLOAD_DIR" => Some(dir.display().to_string()),
            _ => None,
        }
    })
    .unwrap();

    let catalog = load_catalog(&config.source).unwrap();
    assert_eq!(catalog.len(), 1);

    let mut app = App::new(catalog, &config);
    let screen = app.start(config.exercise.as_deref());
    assert!(screen.starts_with("Paul Morphy - Duke Karl / Count Isouard 1-0\n"));
    assert!(screen.contains("[ ] move 0/33 [>]"));

    let screen = run(&mut app, "end");
    assert!(screen.contains("move 33/33"));
    assert!(screen.contains("*Rd8#*"));

    let saved = run(&mut app, "download");
    assert!(saved.starts_with("Saved "));
    assert_eq!(fs::read_to_string(dir.join("opera.pgn")).unwrap(), common::OPERA_GAME);

    assert_eq!(run(&mut app, "quit"), "<quit>");
    fs::remove_dir_all(&dir).unwrap();
}
