use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tilerun_engine::{Frame, FrameSource, InputAction, InputCollector};

#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    #[error("failed to read input script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("input script line {line}: {message}")]
    Parse { line: usize, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScriptCommand {
    FrameMs(u64),
    Press(InputAction),
    Release(InputAction),
    /// Pressed for the next frame only.
    Tap(InputAction),
    Wait(u64),
    Frames(u64),
}

/// Parses an input script, one command per line.
///
/// ```text
/// frame_ms 16
/// press right
/// wait 500
/// tap jump
/// frames 3
/// release right
/// tap exit
/// ```
///
/// Blank lines and lines starting with `#` are ignored.
pub(crate) fn parse_script(content: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line = index + 1;
        let parse_error = |message: String| ScriptError::Parse { line, message };

        let mut parts = trimmed.split_whitespace();
        let keyword = parts.next().unwrap_or_default();
        let argument = parts.next();
        if let Some(extra) = parts.next() {
            return Err(parse_error(format!("unexpected argument '{extra}'")));
        }

        let action = || {
            let token = argument.ok_or_else(|| parse_error(format!("'{keyword}' needs an action")))?;
            InputAction::from_token(token)
                .ok_or_else(|| parse_error(format!("unknown action '{token}'")))
        };
        let number = || {
            let token = argument.ok_or_else(|| parse_error(format!("'{keyword}' needs a number")))?;
            token
                .parse::<u64>()
                .map_err(|_| parse_error(format!("invalid number '{token}'")))
        };

        let command = match keyword {
            "frame_ms" => {
                let ms = number()?;
                if ms == 0 {
                    return Err(parse_error("frame_ms must be positive".to_string()));
                }
                ScriptCommand::FrameMs(ms)
            }
            "press" => ScriptCommand::Press(action()?),
            "release" => ScriptCommand::Release(action()?),
            "tap" => ScriptCommand::Tap(action()?),
            "wait" => ScriptCommand::Wait(number()?),
            "frames" => ScriptCommand::Frames(number()?),
            "exit" if argument.is_none() => ScriptCommand::Tap(InputAction::Exit),
            other => return Err(parse_error(format!("unknown command '{other}'"))),
        };
        commands.push(command);
    }
    Ok(commands)
}

pub(crate) fn read_script(path: &Path) -> Result<Vec<ScriptCommand>, ScriptError> {
    let raw = fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&raw)
}

/// Replays script commands as frames of fixed length.
///
/// A trailing tap with no frame after it still produces one frame so the
/// press is seen.
#[derive(Debug)]
pub(crate) struct ScriptedFrames {
    commands: VecDeque<ScriptCommand>,
    collector: InputCollector,
    frame_delta: Duration,
    pending_frames: u64,
    release_after_frame: Vec<InputAction>,
}

impl ScriptedFrames {
    pub(crate) fn new(commands: Vec<ScriptCommand>, frame_delta: Duration) -> Self {
        Self {
            commands: commands.into(),
            collector: InputCollector::new(),
            frame_delta,
            pending_frames: 0,
            release_after_frame: Vec::new(),
        }
    }

    /// `count` frames with no input.
    pub(crate) fn idle(count: u64, frame_delta: Duration) -> Self {
        Self::new(vec![ScriptCommand::Frames(count)], frame_delta)
    }

    fn emit(&mut self) -> Frame {
        let input = self.collector.snapshot_for_frame();
        for action in self.release_after_frame.drain(..) {
            self.collector.release(action);
        }
        Frame {
            elapsed: self.frame_delta,
            input,
        }
    }

    fn frames_for_wait(&self, ms: u64) -> u64 {
        let frame_ms = (self.frame_delta.as_millis() as u64).max(1);
        ms.div_ceil(frame_ms)
    }
}

impl FrameSource for ScriptedFrames {
    fn next_frame(&mut self) -> Option<Frame> {
        loop {
            if self.pending_frames > 0 {
                self.pending_frames -= 1;
                return Some(self.emit());
            }
            let Some(command) = self.commands.pop_front() else {
                if self.release_after_frame.is_empty() {
                    return None;
                }
                return Some(self.emit());
            };
            match command {
                ScriptCommand::FrameMs(ms) => self.frame_delta = Duration::from_millis(ms),
                ScriptCommand::Press(action) => self.collector.press(action),
                ScriptCommand::Release(action) => self.collector.release(action),
                ScriptCommand::Tap(action) => {
                    self.collector.press(action);
                    self.release_after_frame.push(action);
                }
                ScriptCommand::Wait(ms) => self.pending_frames = self.frames_for_wait(ms),
                ScriptCommand::Frames(count) => self.pending_frames = count,
            }
        }
    }
}
