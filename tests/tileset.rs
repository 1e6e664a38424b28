use lifelight::data::{DataError, ParseError, TileCoord, TilesetDefinition};

const STRUCT_TSD: &str = "\
# structure tiles for the first act
LIFELIGHT TILESET
TILESET struct

BEGIN DEFINITIONS
X  0  0  1
.  1  0  0
~  2  3
END DEFINITIONS
";

fn parse(text: &str) -> Result<TilesetDefinition, DataError> {
    TilesetDefinition::parse("struct.tsd", text)
}

fn format_line(err: &DataError) -> usize {
    match err.parse_error() {
        Some(ParseError::Format { line, .. }) => *line,
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn test_parses_name_and_definitions() {
    let ts = parse(STRUCT_TSD).unwrap();
    assert_eq!(ts.name, "struct");
    assert_eq!(ts.get('X'), Some(TileCoord::new(0, 0)));
    assert_eq!(ts.get('.'), Some(TileCoord::new(1, 0)));
    assert_eq!(ts.get('~'), Some(TileCoord::new(2, 3)));
    assert_eq!(ts.get('?'), None);
}

#[test]
fn test_space_symbol_is_always_empty() {
    let ts = parse(STRUCT_TSD).unwrap();
    assert_eq!(ts.get(' '), Some(TileCoord::EMPTY));
    assert_eq!(ts.collidable().get(&' '), Some(&false));
}

#[test]
fn test_collidable_flag_needs_fourth_field() {
    let ts = parse(STRUCT_TSD).unwrap();
    assert_eq!(ts.collidable().get(&'X'), Some(&true));
    assert_eq!(ts.collidable().get(&'.'), Some(&false));
    // Three fields: never collidable.
    assert_eq!(ts.collidable().get(&'~'), Some(&false));
    assert_eq!(ts.tiles().len(), 4);
}

#[test]
fn test_empty_definition_block() {
    let ts = parse("LIFELIGHT TILESET\nTILESET bare\nBEGIN DEFINITIONS\nEND DEFINITIONS\n").unwrap();
    assert_eq!(ts.tiles().len(), 1);
    assert_eq!(ts.get(' '), Some(TileCoord::EMPTY));
}

#[test]
fn test_surrounding_whitespace_is_ignored() {
    let text = "  LIFELIGHT TILESET  \n\tTILESET struct\nBEGIN DEFINITIONS\n  X  0  0  \nEND DEFINITIONS\n";
    let ts = parse(text).unwrap();
    assert_eq!(ts.get('X'), Some(TileCoord::new(0, 0)));
}

#[test]
fn test_bad_header_is_format_error() {
    let err = parse("LIFELIGHT TILES\nTILESET struct\n").unwrap_err();
    assert!(err.is_format());
    assert_eq!(format_line(&err), 1);
}

#[test]
fn test_header_after_comment_reports_physical_line() {
    let err = parse("# comment\n\nNOT A HEADER\n").unwrap_err();
    assert_eq!(format_line(&err), 3);
}

#[test]
fn test_missing_block_opener() {
    let err = parse("LIFELIGHT TILESET\nTILESET struct\nX  0  0\n").unwrap_err();
    assert!(err.is_format());
    assert_eq!(format_line(&err), 3);
}

#[test]
fn test_unclosed_block() {
    let err = parse("LIFELIGHT TILESET\nTILESET struct\nBEGIN DEFINITIONS\nX  0  0\n").unwrap_err();
    assert!(err.is_format());
}

#[test]
fn test_single_space_separator_rejected() {
    let err = parse("LIFELIGHT TILESET\nTILESET s\nBEGIN DEFINITIONS\nX 0 0\nEND DEFINITIONS\n").unwrap_err();
    assert!(err.is_format());
    assert_eq!(format_line(&err), 4);
}

#[test]
fn test_non_numeric_field_rejected() {
    let err = parse("LIFELIGHT TILESET\nTILESET s\nBEGIN DEFINITIONS\nX  a  0\nEND DEFINITIONS\n").unwrap_err();
    assert!(err.is_format());
    assert!(!err.is_lookup());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TilesetDefinition::load(dir.path().join("absent.tsd")).unwrap_err();
    assert!(matches!(err, DataError::Io { .. }));
    assert!(err.parse_error().is_none());
}

#[test]
fn test_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("struct.tsd");
    std::fs::write(&path, STRUCT_TSD).unwrap();
    let ts = TilesetDefinition::load(&path).unwrap();
    assert_eq!(ts.source, path);
    assert_eq!(ts.name, "struct");
}
