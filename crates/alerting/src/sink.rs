//! Audio sinks the alert gate plays through

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::AlertError;

/// A stateful audio output that can report whether it is still playing
pub trait AudioSink {
    /// Whether a previously started alert is still audible
    fn is_playing(&mut self) -> bool;

    /// Start playing the alert sound
    fn play(&mut self) -> Result<(), AlertError>;
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn is_playing(&mut self) -> bool {
        (**self).is_playing()
    }

    fn play(&mut self) -> Result<(), AlertError> {
        (**self).play()
    }
}

/// Terminal bell on a writer, treated as busy for the length of one clip
pub struct BellSink<W: Write = io::Stderr> {
    writer: W,
    clip: Duration,
    playing_until: Option<Instant>,
}

impl BellSink {
    /// Ring the bell on stderr
    pub fn new(clip: Duration) -> Self {
        Self::with_writer(io::stderr(), clip)
    }
}

impl<W: Write> BellSink<W> {
    pub fn with_writer(writer: W, clip: Duration) -> Self {
        Self {
            writer,
            clip,
            playing_until: None,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> AudioSink for BellSink<W> {
    fn is_playing(&mut self) -> bool {
        self.playing_until
            .is_some_and(|until| Instant::now() < until)
    }

    fn play(&mut self) -> Result<(), AlertError> {
        self.writer.write_all(b"\x07")?;
        self.writer.flush()?;
        self.playing_until = Some(Instant::now() + self.clip);
        Ok(())
    }
}

/// Plays a sound file through an external player process
///
/// Busy for exactly as long as the player runs. The file path is appended as
/// the player's last argument, e.g. `aplay -q alert.wav`.
#[derive(Debug)]
pub struct PlayerSink {
    program: String,
    args: Vec<String>,
    sound: PathBuf,
    child: Option<Child>,
}

impl PlayerSink {
    /// Fails when the sound file does not exist
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        sound: &Path,
    ) -> Result<Self, AlertError> {
        if !sound.is_file() {
            return Err(AlertError::Unavailable(format!(
                "sound file {} not found",
                sound.display()
            )));
        }
        Ok(Self {
            program: program.into(),
            args,
            sound: sound.to_path_buf(),
            child: None,
        })
    }

    pub fn sound(&self) -> &Path {
        &self.sound
    }
}

impl AudioSink for PlayerSink {
    fn is_playing(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };

        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                if !status.success() {
                    warn!("Alert player {} exited with {}", self.program, status);
                }
                self.child = None;
                false
            }
            Err(e) => {
                warn!("Lost track of alert player: {}", e);
                self.child = None;
                false
            }
        }
    }

    fn play(&mut self) -> Result<(), AlertError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.sound)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        debug!(pid = child.id(), "Alert player started");
        self.child = Some(child);
        Ok(())
    }
}

/// Log-only sink for when sound is disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn is_playing(&mut self) -> bool {
        false
    }

    fn play(&mut self) -> Result<(), AlertError> {
        info!("Alert raised (sound disabled)");
        Ok(())
    }
}
