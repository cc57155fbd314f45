pub mod compose;
pub mod process_runner;

pub use compose::{Compose, ComposeAction};
pub use process_runner::{Invocation, ProcessRunner, RecordingRunner, RunOutcome, SystemRunner};
