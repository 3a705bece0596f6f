//! Orchestration scenarios against fake ssh/netcat hosts.

mod common;

use std::path::{Path, PathBuf};
use std::time::Duration;

use common::{Behavior, FakeHosts, NCAT_HELP, TRADITIONAL_HELP};
use ncsend::{CancellationToken, NcsendError, Transfer, TransferConfig, TransferRequest};
use tempfile::TempDir;

const HOST: &str = "10.0.0.7";
const PORT: u16 = 9000;

struct Setup {
    _local: TempDir,
    remote: TempDir,
    source: PathBuf,
}

impl Setup {
    fn new(contents: &[u8]) -> Self {
        let local = tempfile::tempdir().unwrap();
        let remote = tempfile::tempdir().unwrap();
        let source = local.path().join("payload.bin");
        std::fs::write(&source, contents).unwrap();
        Self {
            _local: local,
            remote,
            source,
        }
    }

    fn request(&self, verify: bool) -> TransferRequest {
        let dir = format!("{}/", self.remote.path().display());
        TransferRequest::new(&self.source, HOST, dir, PORT, "tester@fakebox")
            .unwrap()
            .with_verify(verify)
    }

    fn dest(&self) -> PathBuf {
        self.remote.path().join("payload.bin")
    }
}

fn config() -> TransferConfig {
    TransferConfig::new()
        .grace_period(Duration::from_millis(10))
        .ready_timeout(Duration::from_secs(2))
        .receiver_exit_timeout(Duration::from_secs(2))
        .show_progress(false)
}

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

async fn run(hosts: &FakeHosts, request: &TransferRequest) -> ncsend::Result<ncsend::TransferOutcome> {
    Transfer::with_config(hosts, hosts, config())
        .run(request, &CancellationToken::new())
        .await
}

fn read(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap()
}

#[tokio::test]
async fn verified_transfer_delivers_identical_bytes() {
    let data = payload(200_000);
    let setup = Setup::new(&data);
    let hosts = FakeHosts::new(Behavior::default());

    let outcome = run(&hosts, &setup.request(true)).await.unwrap();

    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(outcome.bytes_sent, 200_000);
    assert_eq!(outcome.receiver_status, Some(0));
    let checksums = outcome.checksums.expect("verification requested");
    assert!(checksums.matches());
    assert_eq!(read(&setup.dest()), data);

    let calls = hosts.calls();
    assert_eq!(calls.sender_runs, vec![vec!["nc", "-N", HOST, "9000"]]);
    assert_eq!(calls.launches.len(), 1);
    assert!(calls.launches[0].contains("exec nc -l 9000 > "));
    assert!(calls.launches[0].ends_with("/payload.bin"));
    assert_eq!(calls.kills, 0);
}

#[tokio::test]
async fn one_flipped_byte_is_an_integrity_mismatch() {
    let setup = Setup::new(&payload(4096));
    let hosts = FakeHosts::new(Behavior {
        corrupt_at: Some(1234),
        ..Behavior::default()
    });

    let err = run(&hosts, &setup.request(true)).await.unwrap_err();

    assert_eq!(err.exit_code(), 1);
    let message = err.to_string();
    match err {
        NcsendError::IntegrityMismatch { local, remote, .. } => {
            assert_ne!(local, remote);
            assert!(message.contains(&local));
            assert!(message.contains(&remote));
        }
        other => panic!("expected mismatch, got {other}"),
    }
    // left in place for inspection
    assert_eq!(read(&setup.dest()).len(), 4096);
}

#[tokio::test]
async fn unreachable_host_stops_before_probing() {
    let setup = Setup::new(b"data");
    let hosts = FakeHosts::new(Behavior {
        reachable: false,
        ..Behavior::default()
    });

    let err = run(&hosts, &setup.request(true)).await.unwrap_err();

    assert!(matches!(err, NcsendError::ConnectivityFailure { ref detail, .. } if detail.contains("No route to host")));
    assert_eq!(err.exit_code(), 1);
    let calls = hosts.calls();
    assert_eq!(calls.remote_runs, vec!["true"]);
    assert!(calls.local_runs.is_empty());
    assert!(calls.launches.is_empty());
    assert!(calls.sender_runs.is_empty());
    assert!(!setup.dest().exists());
}

#[tokio::test]
async fn unwritable_destination_issues_no_transfer_commands() {
    let setup = Setup::new(b"data");
    let hosts = FakeHosts::new(Behavior {
        writable: false,
        ..Behavior::default()
    });

    let err = run(&hosts, &setup.request(false)).await.unwrap_err();

    assert!(matches!(err, NcsendError::DestinationUnwritable { .. }));
    let calls = hosts.calls();
    assert_eq!(calls.launches.len(), 0);
    assert_eq!(calls.sender_runs.len(), 0);
    assert!(calls.local_runs.is_empty());
}

#[tokio::test]
async fn missing_source_touches_nothing_remote() {
    let setup = Setup::new(b"data");
    std::fs::remove_file(&setup.source).unwrap();
    let hosts = FakeHosts::new(Behavior::default());

    let err = run(&hosts, &setup.request(false)).await.unwrap_err();

    assert!(matches!(err, NcsendError::SourceMissing { .. }));
    assert!(hosts.calls().remote_runs.is_empty());
}

#[tokio::test]
async fn second_run_overwrites_destination() {
    let setup = Setup::new(b"first version, rather long content");
    let hosts = FakeHosts::new(Behavior::default());
    run(&hosts, &setup.request(true)).await.unwrap();

    std::fs::write(&setup.source, b"second").unwrap();
    let outcome = run(&hosts, &setup.request(true)).await.unwrap();

    assert_eq!(outcome.bytes_sent, 6);
    assert_eq!(read(&setup.dest()), b"second");
    assert_eq!(hosts.calls().launches.len(), 2);
}

#[tokio::test]
async fn legacy_dialects_use_delayed_close_and_bind_flag() {
    let setup = Setup::new(b"legacy");
    let hosts = FakeHosts::new(Behavior {
        remote_help: TRADITIONAL_HELP,
        local_help: TRADITIONAL_HELP,
        ..Behavior::default()
    });

    run(&hosts, &setup.request(false)).await.unwrap();

    let calls = hosts.calls();
    assert_eq!(calls.sender_runs, vec![vec!["nc", "-q", "0", HOST, "9000"]]);
    assert!(calls.launches[0].contains("exec nc -l -p 9000 > "));
}

#[tokio::test]
async fn unknown_dialect_falls_back_and_proceeds() {
    let setup = Setup::new(b"unknown");
    let hosts = FakeHosts::new(Behavior {
        remote_help: NCAT_HELP,
        local_help: NCAT_HELP,
        ..Behavior::default()
    });

    let outcome = run(&hosts, &setup.request(true)).await.unwrap();

    assert!(outcome.checksums.unwrap().matches());
    let calls = hosts.calls();
    assert_eq!(calls.sender_runs, vec![vec!["nc", "-q", "0", HOST, "9000"]]);
    assert!(calls.launches[0].contains("-l -p 9000"));
}

#[tokio::test]
async fn unverified_run_skips_checksums() {
    let setup = Setup::new(b"plain");
    let hosts = FakeHosts::new(Behavior::default());

    let outcome = run(&hosts, &setup.request(false)).await.unwrap();

    assert!(outcome.checksums.is_none());
    let calls = hosts.calls();
    assert!(!calls.remote_runs.iter().any(|c| c.contains("sha256sum")));
}

#[tokio::test]
async fn receiver_dying_before_ready_never_starts_sender() {
    let setup = Setup::new(b"data");
    let hosts = FakeHosts::new(Behavior {
        receiver_fails_early: Some(1),
        ..Behavior::default()
    });

    let err = run(&hosts, &setup.request(false)).await.unwrap_err();

    assert!(matches!(err, NcsendError::ListenerNotReady(ref m) if m.contains("Address already in use")));
    let calls = hosts.calls();
    assert!(calls.sender_runs.is_empty());
    assert_eq!(calls.kills, 1);
}

#[tokio::test]
async fn receiver_exit_status_is_surfaced() {
    let setup = Setup::new(b"data");
    let hosts = FakeHosts::new(Behavior {
        receiver_exit: Some(1),
        ..Behavior::default()
    });

    let err = run(&hosts, &setup.request(true)).await.unwrap_err();

    assert!(matches!(err, NcsendError::TransferFailure(ref m) if m.contains("status 1")));
    // verification never ran
    assert!(!hosts.calls().remote_runs.iter().any(|c| c.contains("sha256sum")));
}

#[tokio::test]
async fn cancellation_kills_remote_receiver() {
    let setup = Setup::new(b"data");
    let hosts = FakeHosts::new(Behavior {
        stall_sender: true,
        ..Behavior::default()
    });
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = Transfer::with_config(&hosts, &hosts, config())
        .run(&setup.request(false), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, NcsendError::Cancelled));
    let calls = hosts.calls();
    assert_eq!(calls.sender_runs.len(), 1);
    assert_eq!(calls.kills, 1);
}

#[tokio::test]
async fn interrupt_before_start_runs_nothing() {
    let setup = Setup::new(b"data");
    let hosts = FakeHosts::new(Behavior::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = Transfer::with_config(&hosts, &hosts, config())
        .run(&setup.request(true), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, NcsendError::Cancelled));
    let calls = hosts.calls();
    assert!(calls.remote_runs.is_empty());
    assert_eq!(calls.launches.len(), 0);
    assert_eq!(calls.kills, 0);
}

#[tokio::test]
async fn interrupt_during_probe_never_launches_receiver() {
    let setup = Setup::new(b"data");
    let hosts = FakeHosts::new(Behavior {
        stall_probe: true,
        ..Behavior::default()
    });
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = Transfer::with_config(&hosts, &hosts, config())
        .run(&setup.request(true), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, NcsendError::Cancelled));
    let calls = hosts.calls();
    assert!(calls.remote_runs.iter().any(|c| c.ends_with(" -h 2>&1")));
    assert_eq!(calls.launches.len(), 0);
    assert!(calls.sender_runs.is_empty());
}
