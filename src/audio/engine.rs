use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use super::thread::spawn_engine_thread;
use super::types::{EngineCmd, EngineEvent};

/// Handle to the engine thread.
///
/// Commands go in through `send`; everything the engine does comes back as
/// `EngineEvent`s on the channel given to `spawn`, drained on the control
/// context.
pub struct AudioEngine {
    tx: Sender<EngineCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioEngine {
    pub fn spawn(events: Sender<EngineEvent>) -> Self {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let handle = spawn_engine_thread(rx, events);

        Self {
            tx,
            join: Mutex::new(Some(handle)),
        }
    }

    /// Clone of the command channel, for parts that drive the engine
    /// without owning it (the playback controller).
    pub fn command_sender(&self) -> Sender<EngineCmd> {
        self.tx.clone()
    }

    pub fn send(&self, cmd: EngineCmd) -> Result<(), mpsc::SendError<EngineCmd>> {
        self.tx.send(cmd)
    }

    /// Stop playback, exit the engine thread and wait for it.
    pub fn shutdown(&self) {
        let _ = self.send(EngineCmd::Shutdown);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
