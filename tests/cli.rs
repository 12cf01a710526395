use std::{
    io::{BufRead, BufReader, Write},
    process::{Child, Command, Output, Stdio},
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

// stdout is a pipe here, so the binary runs in its plain dump mode.
fn spawn() -> Child {
    Command::new(env!("CARGO_BIN_EXE_ttyspark"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn ttyspark")
}

fn run_with_input(input: &[u8]) -> Output {
    let mut child = spawn();
    child
        .stdin
        .take()
        .expect("child stdin")
        .write_all(input)
        .expect("write input");
    child.wait_with_output().expect("wait for ttyspark")
}

fn dump_line(tail: &[&str]) -> String {
    let mut slots = vec!["0"; 20 - tail.len()];
    slots.extend_from_slice(tail);
    format!("[ {}  ]", slots.join(" "))
}

#[test]
fn empty_input_exits_cleanly_without_output() {
    let output = run_with_input(b"");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn malformed_token_is_skipped() {
    let output = run_with_input(b"1.5\n2.5\nabc\n3.5\n");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            dump_line(&["1.5"]),
            dump_line(&["1.5", "2.5"]),
            dump_line(&["1.5", "2.5", "3.5"]),
        ]
    );
}

#[test]
fn window_keeps_the_last_twenty_samples() {
    let input: String = (1..=25).map(|i| format!("{} ", i)).collect();
    let output = run_with_input(input.as_bytes());
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 25);
    let expected: Vec<String> = (6..=25).map(|i| i.to_string()).collect();
    let expected: Vec<&str> = expected.iter().map(String::as_str).collect();
    assert_eq!(stdout.lines().last().unwrap(), dump_line(&expected));
}

#[test]
fn samples_are_dumped_while_input_stays_open() {
    let mut child = spawn();
    let mut stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");

    // No newline: space separated values must still come through one by one
    stdin.write_all(b"1 2 3 ").unwrap();
    stdin.flush().unwrap();

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut lines = BufReader::new(stdout).lines();
        for _ in 0..3 {
            match lines.next() {
                Some(Ok(line)) => tx.send(line).unwrap(),
                _ => return,
            }
        }
    });

    let mut got = Vec::new();
    for _ in 0..3 {
        got.push(rx.recv_timeout(Duration::from_secs(10)).expect("dump line while stdin is open"));
    }
    assert_eq!(got.last().unwrap(), &dump_line(&["1", "2", "3"]));

    drop(stdin);
    assert!(child.wait().unwrap().success());
}

#[test]
fn closed_output_stops_the_process() {
    let mut child = spawn();
    let mut stdin = child.stdin.take().expect("child stdin");
    drop(child.stdout.take());

    // Keep feeding; the first dump hits the closed pipe and the process must end
    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break Some(status);
        }
        if Instant::now() >= deadline {
            break None;
        }
        // Fails with a broken pipe once the child is gone; it is about to be reaped
        let _ = stdin.write_all(b"1\n").and_then(|_| stdin.flush());
        thread::sleep(Duration::from_millis(50));
    };

    match status {
        Some(status) => assert!(status.success()),
        None => {
            let _ = child.kill();
            panic!("ttyspark kept running after its stdout was closed");
        }
    }
}
