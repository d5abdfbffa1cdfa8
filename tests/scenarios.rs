//! End-to-end behavior of errata and result pairs through call chains.

use errata::{Errata, Rv, Severity, bail, errata, formatting::ErrataFormatter, prelude::ResultExt};

fn noteworthy(text: &str) -> Errata {
    let mut errata = Errata::new();
    errata.info(text);
    errata
}

fn cycle(mut errata: Errata) -> Errata {
    errata.info("Note well, young one!");
    errata
}

fn cycle_shared(errata: &mut Errata) -> Errata {
    errata.info("Note well, young one!");
    errata.clone()
}

#[test]
fn test_notes_survive_round_trips() {
    let mut notes = noteworthy("Evil Dave Rulz.");
    assert_eq!(notes.count(), 1);
    assert_eq!(notes.front().text(), "Evil Dave Rulz.");

    notes = cycle(notes);
    assert_eq!(notes.count(), 2);
    assert_eq!(notes.front().text(), "Note well, young one!");
    notes.dismiss();

    let mut notes = noteworthy("Evil Dave Rulz.");
    notes = cycle_shared(&mut notes);
    assert_eq!(notes.count(), 2);
    assert_eq!(notes.strong_count(), 1);
    notes.dismiss();

    let mut erratum = Errata::new();
    erratum.clear();
    assert!(erratum.is_empty());
    assert!(erratum.is_ok());
}

#[derive(Debug, thiserror::Error)]
enum ConfigError {
    #[error("cannot read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn read_config(path: &str) -> Result<String, ConfigError> {
    Err(ConfigError::Read {
        path: path.to_owned(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
    })
}

fn parse_limit(text: &str) -> Rv<u32> {
    match text.trim().parse() {
        Ok(limit) if limit > 0 => Rv::new(limit),
        Ok(_) => {
            let mut rv = Rv::new(1);
            rv.note(Severity::Warn, "limit of 0 raised to 1");
            rv
        }
        Err(e) => errata!(Severity::Error, "invalid limit {text:?}: {e}").into(),
    }
}

fn load_limit(path: &str) -> Rv<u32> {
    let mut errata = Errata::new();
    let Some(text) = read_config(path).note_err(&mut errata, Severity::Error) else {
        errata.info(format_args!("while loading the limit from {path}"));
        return errata.into();
    };
    parse_limit(&text)
}

#[test]
fn test_error_chain_through_rv() {
    let (limit, errata) = load_limit("/etc/limits.conf").into_parts();
    assert_eq!(limit, 0);
    assert!(errata.is_err());

    let texts: Vec<&str> = errata.iter().map(|note| note.text()).collect();
    assert_eq!(
        texts,
        [
            "while loading the limit from /etc/limits.conf",
            "cannot read /etc/limits.conf",
            "no such file",
        ]
    );

    let compact = ErrataFormatter::new().glue(" <- ").show_severity(false);
    assert_eq!(
        errata.display_with(&compact).to_string(),
        "while loading the limit from /etc/limits.conf <- cannot read /etc/limits.conf <- no such file"
    );
    errata.dismiss();
}

#[test]
fn test_warnings_ride_along_with_values() {
    let rv = parse_limit("0");
    // `Warn` is the failure threshold: the result is not ok, but the
    // corrected value is still there.
    assert!(!rv.is_ok());
    assert_eq!(*rv.value(), 1);
    assert_eq!(rv.errata().severity(), Severity::Warn);
    assert!(rv.errata().is_err());
    rv.into_errata().dismiss();

    let mut rv = Rv::new(8);
    rv.note(Severity::Info, "limit taken from the defaults");
    assert!(rv.is_ok());
    assert_eq!(*rv.value(), 8);
    rv.into_errata().dismiss();
}

fn stage(depth: u32) -> Errata {
    if depth == 0 {
        bail!("bottomed out");
    }
    let mut errata = Errata::new();
    errata.diag(format_args!("stage {depth}"));
    errata.note_take(stage(depth - 1));
    errata
}

#[test]
fn test_nested_merges_indent() {
    let errata = stage(2);
    let levels: Vec<(u32, &str)> = errata
        .iter()
        .map(|note| (note.level(), note.text()))
        .collect();
    assert_eq!(
        levels,
        [(2, "bottomed out"), (1, "stage 1"), (0, "stage 2")]
    );
    assert_eq!(
        errata.to_string(),
        "    [error] bottomed out\n  [diag] stage 1\n[diag] stage 2"
    );
    errata.dismiss();
}

#[test]
fn test_rv_from_error_only_errata() {
    let rv: Rv<i32> = Errata::new().with_note(Severity::Error, "no value").into();
    assert!(!rv.is_ok());
    let (value, status): (i32, Errata) = rv.into();
    assert_eq!(value, 0);
    assert_eq!(status.count(), 1);
    status.dismiss();
}

#[test]
fn test_errata_moves_between_threads() {
    let errata = Errata::new().with_note(Severity::Info, "made here");
    let errata = std::thread::spawn(move || {
        let mut errata = errata;
        errata.info("noted there");
        errata
    })
    .join()
    .unwrap();
    assert_eq!(errata.count(), 2);
    errata.dismiss();
}

#[test]
#[should_panic(expected = "shared with another handle")]
fn test_mutating_a_shared_errata_panics() {
    let mut errata = Errata::new().with_note(Severity::Info, "shared");
    let _other = errata.clone();
    errata.warn("not allowed");
}
