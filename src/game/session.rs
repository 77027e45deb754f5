//! Shared, serialized handle over a command processor.
//!
//! Any number of tasks may hold a clone; each `process` call holds the lock
//! for the whole command, so commands never interleave.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::game::commands::{CommandProcessor, CommandResult};

#[derive(Clone)]
pub struct GameSession {
    inner: Arc<Mutex<CommandProcessor>>,
}

impl GameSession {
    pub fn new(processor: CommandProcessor) -> Self {
        Self {
            inner: Arc::new(Mutex::new(processor)),
        }
    }

    pub async fn process(&self, text: &str) -> CommandResult {
        let mut processor = self.inner.lock().await;
        processor.process(text)
    }

    pub async fn score(&self) -> i32 {
        self.inner.lock().await.state().score()
    }

    pub async fn moves(&self) -> u32 {
        self.inner.lock().await.state().moves()
    }

    pub async fn inventory(&self) -> Vec<String> {
        self.inner.lock().await.state().inventory().to_vec()
    }

    pub async fn current_scene(&self) -> String {
        self.inner.lock().await.state().current_scene_id().to_string()
    }

    /// Run a closure against the processor under the lock.
    pub async fn with_processor<R>(&self, f: impl FnOnce(&mut CommandProcessor) -> R) -> R {
        let mut processor = self.inner.lock().await;
        f(&mut processor)
    }
}
