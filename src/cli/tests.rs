use super::*;

fn args(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn zero_args_is_repl() {
    assert!(matches!(parse_args(args(&[])), Command::Repl));
}

#[test]
fn one_path_arg_runs_file() {
    match parse_args(args(&["script.kz"])) {
        Command::RunFile(path) => assert_eq!(path, "script.kz"),
        _ => panic!("expected RunFile"),
    }
}

#[test]
fn help_flags_recognized() {
    assert!(matches!(parse_args(args(&["-h"])), Command::Help));
    assert!(matches!(parse_args(args(&["--help"])), Command::Help));
}

#[test]
fn version_flags_recognized() {
    assert!(matches!(parse_args(args(&["-v"])), Command::Version));
    assert!(matches!(parse_args(args(&["--version"])), Command::Version));
}

#[test]
fn two_or_more_args_is_usage_error() {
    assert!(matches!(parse_args(args(&["a", "b"])), Command::Usage));
}

#[test]
fn reading_a_missing_file_is_an_io_error() {
    let result = read_source("/nonexistent/path/to/kozi/source.kz");
    assert!(matches!(result, Err(SourceError::Io(_))));
    assert_eq!(result.unwrap_err().exit_code(), 74);
}

#[test]
fn invalid_utf8_bytes_are_rejected() {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("kozi-test-invalid-utf8-{}", std::process::id()));
    std::fs::write(&path, [0xFF, 0xFE, 0x00]).unwrap();
    let result = read_source(path.to_str().unwrap());
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(SourceError::InvalidUtf8)));
    assert_eq!(result.unwrap_err().exit_code(), 65);
}
