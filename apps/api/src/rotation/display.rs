//! Rotating Display — drives a `Rotator` from a repeating timer.
//!
//! # Timing
//! Every `display` interval the current entry fades out for `fade`, then the
//! next entry is swapped in visible. Because `display > fade`, a fade always
//! completes before the next tick.
//!
//! # Lifecycle
//! `mount` spawns the timer task. Dropping the display (or `unmount`) aborts
//! it, so no timer outlives the page.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::debug;

use super::list::{RotationError, RotationList, RotationTiming};
use super::rotator::Rotator;

/// What the renderer should show: which entry, and whether it is faded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub index: usize,
    pub visible: bool,
}

impl From<&Rotator> for Frame {
    fn from(rotator: &Rotator) -> Self {
        Frame {
            index: rotator.current(),
            visible: rotator.is_visible(),
        }
    }
}

#[derive(Debug)]
enum Command {
    Select(usize),
}

#[derive(Debug)]
pub struct RotatingDisplay<T> {
    list: RotationList<T>,
    frames: watch::Receiver<Frame>,
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl<T> RotatingDisplay<T> {
    /// Starts rotating `list`. Must be called inside a tokio runtime.
    pub fn mount(list: RotationList<T>, timing: RotationTiming) -> Self {
        let rotator = Rotator::for_list(&list);
        let (frame_tx, frames) = watch::channel(Frame::from(&rotator));
        let (commands, command_rx) = mpsc::unbounded_channel();
        let first_tick = Instant::now() + timing.display();

        debug!(entries = list.len(), ?timing, "rotating display mounted");
        let task = tokio::spawn(run(rotator, timing, first_tick, frame_tx, command_rx));

        Self {
            list,
            frames,
            commands,
            task,
        }
    }

    pub fn frame(&self) -> Frame {
        *self.frames.borrow()
    }

    pub fn current(&self) -> &T {
        self.list.entry(self.frame().index)
    }

    pub fn list(&self) -> &RotationList<T> {
        &self.list
    }

    /// Subscribes to frame changes.
    pub fn frames(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    /// Jumps to `index` (e.g. from a dot indicator), cancelling any fade.
    pub fn select(&self, index: usize) -> Result<(), RotationError> {
        if index >= self.list.len() {
            return Err(RotationError::OutOfRange {
                index,
                len: self.list.len(),
            });
        }
        // Send only fails once the task is gone, and then there is nothing to update.
        let _ = self.commands.send(Command::Select(index));
        Ok(())
    }

    pub fn unmount(self) {}
}

impl<T> Drop for RotatingDisplay<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    mut rotator: Rotator,
    timing: RotationTiming,
    first_tick: Instant,
    frames: watch::Sender<Frame>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    let mut ticker = interval_at(first_tick, timing.display());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                rotator.begin_fade();
                frames.send_replace(Frame::from(&rotator));

                tokio::select! {
                    _ = sleep(timing.fade()) => {
                        rotator.finish_fade();
                        frames.send_replace(Frame::from(&rotator));
                    }
                    command = commands.recv() => match command {
                        Some(Command::Select(index)) => {
                            apply_select(&mut rotator, index, &frames);
                            ticker.reset();
                        }
                        None => return,
                    },
                }
            }
            command = commands.recv() => match command {
                Some(Command::Select(index)) => {
                    apply_select(&mut rotator, index, &frames);
                    ticker.reset();
                }
                None => return,
            },
        }
    }
}

fn apply_select(rotator: &mut Rotator, index: usize, frames: &watch::Sender<Frame>) {
    if rotator.select(index).is_ok() {
        frames.send_replace(Frame::from(&*rotator));
    }
}
