//! In-process stand-ins for ssh and netcat.
//!
//! The fake "remote" filesystem is the local temp dir the test passes as the
//! destination, so the receiver's output file can be inspected directly.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use indicatif::ProgressBar;
use ncsend::hash::sha256_file;
use ncsend::{CommandOutput, LocalShell, NcsendError, RemoteProcess, RemoteShell, Result, SenderExit};

pub const OPENBSD_HELP: &str = "OpenBSD netcat (Debian patchlevel 1.219-1)
usage: nc [-46CDdFhklNnrStUuvZz] [-I length] [-i interval] [-M ttl]
\t  [-q seconds] [-s sourceaddr] [-T keyword] [-V rtable] [-W recvlimit]
\tCommand Summary:
\t\t-N\t\tShutdown the network socket after EOF on stdin
\t\t-q secs\t\tquit after EOF on stdin and delay of secs
";

pub const TRADITIONAL_HELP: &str = "[v1.10-47]
connect to somewhere:\tnc [-options] hostname port[s] [ports] ...
listen for inbound:\tnc -l -p port [-options] [hostname] [port]
\t-q secs\t\t\tquit after EOF on stdin and delay of secs
";

pub const NCAT_HELP: &str = "Ncat 7.94 ( https://nmap.org/ncat )
Usage: ncat [options] [hostname] [port]
  -l, --listen               Bind and listen for incoming connections
";

pub const REMOTE_PID: u32 = 4242;

/// How the fake hosts behave.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub reachable: bool,
    pub writable: bool,
    pub remote_help: &'static str,
    pub local_help: &'static str,
    /// Flip the byte at this offset in flight
    pub corrupt_at: Option<usize>,
    /// Receiver dies before announcing itself with this status
    pub receiver_fails_early: Option<i32>,
    /// Receiver exit status after the sender finishes
    pub receiver_exit: Option<i32>,
    /// Sender never finishes
    pub stall_sender: bool,
    /// Remote `nc -h` never answers
    pub stall_probe: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            reachable: true,
            writable: true,
            remote_help: OPENBSD_HELP,
            local_help: OPENBSD_HELP,
            corrupt_at: None,
            receiver_fails_early: None,
            receiver_exit: Some(0),
            stall_sender: false,
            stall_probe: false,
        }
    }
}

/// Everything the fakes were asked to do.
#[derive(Debug, Default)]
pub struct Calls {
    pub remote_runs: Vec<String>,
    pub launches: Vec<String>,
    pub local_runs: Vec<Vec<String>>,
    pub sender_runs: Vec<Vec<String>>,
    pub kills: u32,
    listening_on: Option<PathBuf>,
}

/// Both ends of the transfer, sharing one call log.
#[derive(Clone)]
pub struct FakeHosts {
    pub behavior: Behavior,
    calls: Arc<Mutex<Calls>>,
}

impl FakeHosts {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Calls::default())),
        }
    }

    pub fn calls(&self) -> std::sync::MutexGuard<'_, Calls> {
        self.calls.lock().unwrap()
    }
}

/// Destination path from `... exec nc <args> > <path>`.
fn redirect_target(script: &str) -> PathBuf {
    let (_, path) = script.rsplit_once("> ").expect("receiver script redirects");
    PathBuf::from(path.trim_matches('\''))
}

#[async_trait]
impl RemoteShell for FakeHosts {
    fn target(&self) -> &str {
        "tester@fakebox"
    }

    async fn run(&self, command: &str) -> Result<CommandOutput> {
        self.calls().remote_runs.push(command.to_owned());

        if command == "true" {
            return Ok(if self.behavior.reachable {
                CommandOutput::ok("")
            } else {
                CommandOutput::failed(255, "ssh: connect to host fakebox port 22: No route to host\n")
            });
        }
        if command.starts_with("[ -d ") {
            return Ok(if self.behavior.writable {
                CommandOutput::ok("")
            } else {
                CommandOutput::failed(1, "")
            });
        }
        if command.starts_with("command -v ") {
            return Ok(CommandOutput::ok(""));
        }
        if command.ends_with(" -h 2>&1") {
            if self.behavior.stall_probe {
                std::future::pending::<()>().await;
            }
            return Ok(CommandOutput::ok(self.behavior.remote_help));
        }
        if command.starts_with("kill ") {
            self.calls().kills += 1;
            return Ok(CommandOutput::ok(""));
        }
        if let Some(path) = command.strip_prefix("sha256sum ") {
            let path = path.trim_matches('\'');
            let digest = sha256_file(Path::new(path)).await?;
            return Ok(CommandOutput::ok(format!("{digest}  {path}\n")));
        }
        Ok(CommandOutput::failed(127, format!("sh: {command}: not found")))
    }

    async fn launch(&self, command: &str) -> Result<Box<dyn RemoteProcess>> {
        let mut calls = self.calls();
        calls.launches.push(command.to_owned());

        if let Some(code) = self.behavior.receiver_fails_early {
            return Ok(Box::new(FakeReceiver {
                hosts: self.clone(),
                early_exit: Some(code),
                exit: Some(code),
            }));
        }

        calls.listening_on = Some(redirect_target(command));
        Ok(Box::new(FakeReceiver {
            hosts: self.clone(),
            early_exit: None,
            exit: self.behavior.receiver_exit,
        }))
    }
}

struct FakeReceiver {
    hosts: FakeHosts,
    early_exit: Option<i32>,
    exit: Option<i32>,
}

#[async_trait]
impl RemoteProcess for FakeReceiver {
    async fn ready(&mut self) -> Result<u32> {
        match self.early_exit {
            Some(code) => Err(NcsendError::ListenerNotReady(format!(
                "remote receiver exited with exit status: {code} before listening: nc: Address already in use"
            ))),
            None => Ok(REMOTE_PID),
        }
    }

    async fn wait(&mut self) -> Result<Option<i32>> {
        self.hosts.calls().listening_on = None;
        Ok(self.exit)
    }

    async fn kill(&mut self) -> Result<()> {
        let mut calls = self.hosts.calls();
        calls.kills += 1;
        calls.listening_on = None;
        Ok(())
    }
}

#[async_trait]
impl LocalShell for FakeHosts {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let mut call = vec![program.to_owned()];
        call.extend(args.iter().map(|a| (*a).to_owned()));
        self.calls().local_runs.push(call);
        // traditional nc prints usage on stderr and exits 1
        Ok(CommandOutput {
            status: Some(1),
            stdout: String::new(),
            stderr: self.behavior.local_help.to_owned(),
        })
    }

    async fn stream(
        &self,
        program: &str,
        args: &[String],
        source: &Path,
        progress: &ProgressBar,
    ) -> Result<SenderExit> {
        let dest = {
            let mut calls = self.calls();
            let mut call = vec![program.to_owned()];
            call.extend(args.iter().cloned());
            calls.sender_runs.push(call);
            calls.listening_on.clone()
        };

        if self.behavior.stall_sender {
            std::future::pending::<()>().await;
        }

        let Some(dest) = dest else {
            return Ok(SenderExit {
                output: CommandOutput::failed(1, "nc: connect to 10.0.0.7 port 9000 (tcp) failed: Connection refused"),
                bytes_sent: 0,
            });
        };

        let mut bytes = tokio::fs::read(source)
            .await
            .map_err(|e| NcsendError::io("fake sender read", e))?;
        let len = bytes.len() as u64;
        if let Some(at) = self.behavior.corrupt_at {
            bytes[at] ^= 0xff;
        }
        tokio::fs::write(&dest, &bytes)
            .await
            .map_err(|e| NcsendError::io("fake receiver write", e))?;
        progress.inc(len);
        progress.finish();

        Ok(SenderExit {
            output: CommandOutput::ok(""),
            bytes_sent: len,
        })
    }
}
