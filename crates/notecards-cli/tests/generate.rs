//! End-to-end runs of the generator commands without rendering.

use std::fs;
use std::path::Path;

use clap::Parser;
use notecards_cli::cli_args::{Cli, Commands, CommonArgs};
use notecards_cli::commands;
use notecards_cli::report::RunReport;
use notecards_lilypond::CancelFlag;
use notecards_theory::scale::C_MAJOR;
use notecards_theory::generate_intervals_in_scale;
use pretty_assertions::assert_eq;

fn parse(dir: &Path, args: &[&str]) -> Commands {
    let dir = dir.to_str().unwrap();
    let mut argv = args.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    argv.insert(0, "notecards".to_string());
    argv.extend([
        "--tmp-dir".to_string(),
        format!("{}/tmp", dir),
        "--image-dir".to_string(),
        format!("{}/images", dir),
        "--deck-file".to_string(),
        format!("{}/deck.csv", dir),
        "--report".to_string(),
        format!("{}/report.json", dir),
    ]);
    Cli::try_parse_from(argv).unwrap().command
}

fn read_report(dir: &Path) -> RunReport {
    let json = fs::read_to_string(dir.join("report.json")).unwrap();
    serde_json::from_str(&json).unwrap()
}

fn common(command: Commands) -> CommonArgs {
    match command {
        Commands::Intervals { common, .. } | Commands::Chords { common, .. } => common,
    }
}

#[test]
fn test_intervals_deck_without_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let html = dir.path().join("listing/cards.html");
    let mut args = common(parse(
        dir.path(),
        &["intervals", "--scale", "c major", "--no-render"],
    ));
    args.html_file = Some(html.clone());

    commands::intervals::run(&args, 12, &CancelFlag::new()).unwrap();

    let expected = generate_intervals_in_scale(&C_MAJOR, 12).unwrap().len();
    let deck = fs::read_to_string(dir.path().join("deck.csv")).unwrap();
    let lines: Vec<&str> = deck.lines().collect();
    assert_eq!(lines.len(), expected);
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
    assert!(lines.iter().all(|l| l.starts_with("\"<img src=\"\"ng-")));

    let page = fs::read_to_string(&html).unwrap();
    assert!(page.starts_with("<html>\n<body>\n"));
    assert_eq!(page.matches("<hr>").count(), expected);
    assert!(page.contains(&format!("src=\"{}/images/ng-", dir.path().display())));

    let report = read_report(dir.path());
    assert_eq!(report.command, "intervals");
    assert_eq!(report.scales, vec!["c major".to_string()]);
    assert_eq!(report.cards, expected);
    assert_eq!(report.rendered, 0);
    assert!(report.success);
    assert!(!dir.path().join("images").exists());
}

#[test]
fn test_chords_by_mode_selects_scales() {
    let dir = tempfile::tempdir().unwrap();
    let args = common(parse(
        dir.path(),
        &["chords", "--scale", "major", "--accidentals", "1", "--no-render"],
    ));

    commands::chords::run(&args, true, false, &CancelFlag::new()).unwrap();

    let report = read_report(dir.path());
    assert_eq!(report.command, "chords");
    assert_eq!(report.scales, vec!["c major", "g major", "f major"]);
    let deck = fs::read_to_string(dir.path().join("deck.csv")).unwrap();
    assert_eq!(deck.lines().count(), report.cards);
    assert!(deck.contains("\";\"G maj7\""));
    assert!(deck.contains("ng-chord-"));
}

#[test]
fn test_one_pager_writes_no_deck() {
    let dir = tempfile::tempdir().unwrap();
    let args = common(parse(
        dir.path(),
        &["chords", "--one-pager", "--scale", "e major", "--no-render"],
    ));

    commands::chords::run(&args, false, true, &CancelFlag::new()).unwrap();

    let report = read_report(dir.path());
    assert_eq!(report.command, "chords-one-pager");
    assert_eq!(report.cards, 1);
    assert_eq!(report.deck_file, None);
    assert!(!dir.path().join("deck.csv").exists());
    assert!(!dir.path().join("images").exists());
}

#[test]
fn test_unknown_scale_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let args = common(parse(dir.path(), &["intervals", "--scale", "h major"]));

    let err = commands::intervals::run(&args, 12, &CancelFlag::new()).unwrap_err();
    assert!(format!("{:#}", err).contains("h major"));

    let report = read_report(dir.path());
    assert!(!report.success);
    assert_eq!(report.error_code.as_deref(), Some("THEORY_001"));
    assert!(!dir.path().join("deck.csv").exists());
}

#[test]
fn test_cancelled_run_keeps_deck_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let args = common(parse(dir.path(), &["chords", "--scale", "a minor"]));
    let cancel = CancelFlag::new();
    cancel.cancel();

    let err = commands::chords::run(&args, false, false, &cancel).unwrap_err();
    assert_eq!(notecards_cli::report::error_code(&err), Some("RENDER_006"));

    let report = read_report(dir.path());
    assert!(!report.success);
    assert_eq!(report.rendered, 0);
    assert!(dir.path().join("deck.csv").exists());
}
