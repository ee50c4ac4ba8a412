use super::*;

fn run(
    program: &str,
    args: &[&str],
    stdin: Option<&mut (dyn Read + Send)>,
    stdout: Option<&mut dyn Write>,
) -> Result<(), ToolFailure> {
    let args: Vec<OsString> = args.iter().map(OsString::from).collect();
    let env = BTreeMap::new();
    ProcessInvoker.execute(Invocation {
        program: Path::new(program),
        args: &args,
        env: &env,
        stdin: stdin.map(|r| &mut *r as &mut (dyn Read + Send)),
        stdout: stdout.map(|w| &mut *w as &mut dyn Write),
    })
}

/// Writer that rejects every write.
struct FullDisk;

impl Write for FullDisk {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("disk full"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn failure_display_joins_message_and_stderr() {
    let failure = ToolFailure::new("exit status: 1").with_stderr(b"bad crop\n".to_vec());
    assert_eq!(failure.to_string(), "exit status: 1. bad crop");
}

#[test]
fn failure_display_with_empty_stderr_keeps_separator() {
    assert_eq!(ToolFailure::new("boom").to_string(), "boom. ");
}

#[test]
fn missing_program_is_a_spawn_failure() {
    let err = run("target/definitely-not-a-webp-tool", &[], None, None).unwrap_err();
    assert!(err.message.contains("failed to spawn"));
    assert!(err.message.contains("definitely-not-a-webp-tool"));
    assert!(err.stderr.is_empty());
}

#[cfg(unix)]
#[test]
fn stdin_is_piped_through_to_stdout() {
    let mut input: &[u8] = b"GIF89a-payload";
    let mut out: Vec<u8> = Vec::new();
    run("/bin/sh", &["-c", "cat"], Some(&mut input), Some(&mut out)).unwrap();
    assert_eq!(out, b"GIF89a-payload");
}

#[cfg(unix)]
#[test]
fn large_stdin_does_not_deadlock() {
    let payload = vec![7u8; 4 * 1024 * 1024];
    let mut input: &[u8] = &payload;
    let mut out: Vec<u8> = Vec::new();
    run("/bin/sh", &["-c", "cat"], Some(&mut input), Some(&mut out)).unwrap();
    assert_eq!(out.len(), payload.len());
}

#[cfg(unix)]
#[test]
fn non_zero_exit_carries_status_and_stderr() {
    let err = run("/bin/sh", &["-c", "echo bad crop >&2; exit 3"], None, None).unwrap_err();
    assert_eq!(err.message, "exit status: 3");
    assert_eq!(String::from_utf8_lossy(&err.stderr).trim(), "bad crop");
    assert_eq!(err.to_string(), "exit status: 3. bad crop");
}

#[cfg(unix)]
#[test]
fn early_exit_with_unread_stdin_reports_exit_status() {
    let payload = vec![0u8; 1024 * 1024];
    let mut input: &[u8] = &payload;
    let err = run("/bin/sh", &["-c", "exit 2"], Some(&mut input), None).unwrap_err();
    assert_eq!(err.message, "exit status: 2");
}

#[cfg(unix)]
#[test]
fn env_is_forwarded() {
    let args: Vec<OsString> = ["-c", "printf %s \"$WEBPBIN_PROBE\""]
        .iter()
        .map(OsString::from)
        .collect();
    let mut env = BTreeMap::new();
    env.insert("WEBPBIN_PROBE".to_string(), "42".to_string());
    let mut out: Vec<u8> = Vec::new();
    ProcessInvoker
        .execute(Invocation {
            program: Path::new("/bin/sh"),
            args: &args,
            env: &env,
            stdin: None,
            stdout: Some(&mut out),
        })
        .unwrap();
    assert_eq!(out, b"42");
}

#[cfg(unix)]
#[test]
fn stdout_writer_error_is_reported_over_kill_status() {
    let err = run(
        "/bin/sh",
        &["-c", "head -c 1000000 /dev/zero"],
        None,
        Some(&mut FullDisk),
    )
    .unwrap_err();
    assert_eq!(err.message, "failed to copy tool stdout: disk full");
}

#[cfg(unix)]
#[test]
fn small_stdout_writer_error_is_reported() {
    let err = run("/bin/sh", &["-c", "printf RIFF"], None, Some(&mut FullDisk)).unwrap_err();
    assert!(err.message.contains("disk full"), "message: {}", err.message);
}
