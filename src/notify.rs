//! Sound notifications.
//!
//! The session loop only ever sends a [`DingKind`] down a channel; a worker
//! thread owns every platform detail and reaps the player processes it spawns.

use std::io::{self, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::session::DingKind;

pub trait Notifier {
    /// Fire and forget.
    fn notify(&self, kind: DingKind);
}

/// Notifier used for `--quiet`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _kind: DingKind) {}
}

/// Rings the terminal bell in place of a sound player.
#[derive(Debug, Default, Clone, Copy)]
pub struct BellNotifier;

impl Notifier for BellNotifier {
    fn notify(&self, _kind: DingKind) {
        ring_bell(&mut io::stdout());
    }
}

/// Keeps every notification it receives; used by headless tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<DingKind>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DingKind> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: DingKind) {
        if let Ok(mut events) = self.events.lock() {
            events.push(kind);
        }
    }
}

/// How sounds are produced on this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundBackend {
    /// macOS system sounds
    Afplay,
    /// PulseAudio / PipeWire freedesktop theme
    Paplay,
    /// Console beep through PowerShell
    PowerShell,
    /// Terminal bell only
    Bell,
}

impl SoundBackend {
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            SoundBackend::Afplay
        } else if cfg!(target_os = "linux") {
            SoundBackend::Paplay
        } else if cfg!(target_os = "windows") {
            SoundBackend::PowerShell
        } else {
            SoundBackend::Bell
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SoundBackend::Afplay => "afplay",
            SoundBackend::Paplay => "paplay",
            SoundBackend::PowerShell => "powershell",
            SoundBackend::Bell => "bell",
        }
    }

    /// The player invocation for `kind`, or `None` when only the bell is available.
    pub fn command(&self, kind: DingKind) -> Option<Command> {
        let mut cmd = match self {
            SoundBackend::Afplay => {
                let sound = match kind {
                    DingKind::Regular => "Glass",
                    DingKind::Milestone(_) => "Hero",
                    DingKind::SessionComplete => "Funk",
                };
                let mut cmd = Command::new("afplay");
                cmd.arg(format!("/System/Library/Sounds/{sound}.aiff"));
                cmd
            }
            SoundBackend::Paplay => {
                let sound = match kind {
                    DingKind::Regular => "bell",
                    DingKind::Milestone(_) => "complete",
                    DingKind::SessionComplete => "alarm-clock-elapsed",
                };
                let mut cmd = Command::new("paplay");
                cmd.arg(format!("/usr/share/sounds/freedesktop/stereo/{sound}.oga"));
                cmd
            }
            SoundBackend::PowerShell => {
                let (freq, ms) = match kind {
                    DingKind::Regular => (1000, 200),
                    DingKind::Milestone(_) => (1500, 400),
                    DingKind::SessionComplete => (800, 600),
                };
                let mut cmd = Command::new("powershell");
                cmd.args(["-NoProfile", "-Command"])
                    .arg(format!("[console]::beep({freq},{ms})"));
                cmd
            }
            SoundBackend::Bell => return None,
        };
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        Some(cmd)
    }
}

fn ring_bell(out: &mut dyn Write) {
    let _ = out.write_all(b"\x07");
    let _ = out.flush();
}

/// Start `cmd`, or ring the bell when there is no player or it fails to start.
/// Returns whether a player is now running.
fn play(cmd: Option<Command>, players: &mut Vec<Child>, bell: &mut dyn Write) -> bool {
    let Some(mut cmd) = cmd else {
        ring_bell(bell);
        return false;
    };
    match cmd.spawn() {
        Ok(child) => {
            players.push(child);
            true
        }
        Err(e) => {
            tracing::debug!(program = ?cmd.get_program(), error = %e, "sound player failed, ringing bell");
            ring_bell(bell);
            false
        }
    }
}

/// Plays sounds on a dedicated worker thread.
#[derive(Debug)]
pub struct SoundNotifier {
    tx: Sender<DingKind>,
    worker: JoinHandle<()>,
}

impl SoundNotifier {
    pub fn spawn(backend: SoundBackend) -> io::Result<Self> {
        Self::spawn_with_bell(backend, io::stdout())
    }

    /// Like [`SoundNotifier::spawn`], with the bell fallback written to `bell`.
    pub fn spawn_with_bell<W: Write + Send + 'static>(
        backend: SoundBackend,
        mut bell: W,
    ) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<DingKind>();

        let worker = thread::Builder::new()
            .name("ding-sound".to_string())
            .spawn(move || {
                let mut players: Vec<Child> = Vec::new();
                for kind in rx {
                    players.retain_mut(|child| matches!(child.try_wait(), Ok(None)));
                    play(backend.command(kind), &mut players, &mut bell);
                }
                for mut child in players {
                    let _ = child.wait();
                }
            })?;

        Ok(Self { tx, worker })
    }

    /// Close the channel and wait for queued notifications and running players.
    pub fn shutdown(self) {
        drop(self.tx);
        let _ = self.worker.join();
    }
}

impl Notifier for SoundNotifier {
    fn notify(&self, kind: DingKind) {
        if self.tx.send(kind).is_err() {
            tracing::debug!(?kind, "sound worker gone, ringing bell");
            ring_bell(&mut io::stdout());
        }
    }
}
