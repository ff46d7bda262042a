//! Rotating status text shown while a path is being generated.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const STATUS_MESSAGES: [&str; 5] = [
    "Analyzing market trends...",
    "Mapping your unique skills...",
    "Consulting with our AI mentor...",
    "Building your personalized curriculum...",
    "Calibrating your career trajectory...",
];

/// How long each message stays up.
pub const ROTATION_INTERVAL: Duration = Duration::from_millis(2500);

/// The message to display after `elapsed` time in the generating step.
pub fn status_message(elapsed: Duration) -> &'static str {
    let ticks = elapsed.as_millis() / ROTATION_INTERVAL.as_millis();
    STATUS_MESSAGES[(ticks % STATUS_MESSAGES.len() as u128) as usize]
}

/// Spawn a task that calls `emit` with each rotated message until `stop`
/// flips to true (or its sender is dropped).
pub fn spawn_status_ticker<F>(mut stop: watch::Receiver<bool>, mut emit: F) -> JoinHandle<()>
where
    F: FnMut(&'static str) + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ROTATION_INTERVAL);
        let mut index = 0usize;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    emit(STATUS_MESSAGES[index]);
                    index = (index + 1) % STATUS_MESSAGES.len();
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }
    })
}
