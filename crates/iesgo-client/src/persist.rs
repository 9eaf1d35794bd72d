//! Fire-and-forget persistence.
//!
//! Session mutations enqueue [`PersistCommand`]s and return immediately. A
//! single writer task applies them to the [`KvStore`] in order; write failures
//! are logged and never reach the caller.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use iesgo_store::KvStore;

#[derive(Debug)]
pub enum PersistCommand {
    Put { key: &'static str, value: String },
    Remove { key: &'static str },
    RemoveMany { keys: Vec<&'static str> },
    Clear,
    /// Acknowledged once every earlier command has been applied.
    Flush(oneshot::Sender<()>),
}

/// Sending half of the writer queue. Cheap to clone.
#[derive(Clone)]
pub struct Persister {
    tx: mpsc::UnboundedSender<PersistCommand>,
}

impl Persister {
    /// Spawn the writer task. Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn KvStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(writer_loop(store, rx));
        Self { tx }
    }

    pub fn put(&self, key: &'static str, value: String) {
        self.send(PersistCommand::Put { key, value });
    }

    pub fn remove(&self, key: &'static str) {
        self.send(PersistCommand::Remove { key });
    }

    pub fn remove_many(&self, keys: &[&'static str]) {
        self.send(PersistCommand::RemoveMany {
            keys: keys.to_vec(),
        });
    }

    pub fn clear(&self) {
        self.send(PersistCommand::Clear);
    }

    /// Wait until everything queued so far has hit the store.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(PersistCommand::Flush(ack_tx));
        let _ = ack_rx.await;
    }

    fn send(&self, cmd: PersistCommand) {
        if self.tx.send(cmd).is_err() {
            error!("persistence writer has stopped; dropping write");
        }
    }
}

async fn writer_loop(store: Arc<dyn KvStore>, mut rx: mpsc::UnboundedReceiver<PersistCommand>) {
    debug!("persistence writer started");

    while let Some(cmd) = rx.recv().await {
        let result = match cmd {
            PersistCommand::Put { key, value } => store.set(key, &value),
            PersistCommand::Remove { key } => store.remove(key).map(|_| ()),
            PersistCommand::RemoveMany { keys } => store.remove_many(&keys),
            PersistCommand::Clear => {
                info!("clearing entire local store");
                store.clear()
            }
            PersistCommand::Flush(ack) => {
                let _ = ack.send(());
                Ok(())
            }
        };

        if let Err(e) = result {
            error!(error = %e, "persisted write failed");
        }
    }

    debug!("persistence writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use iesgo_store::MemoryStore;

    #[tokio::test]
    async fn test_commands_apply_in_order() {
        let store = Arc::new(MemoryStore::new());
        let persister = Persister::spawn(store.clone());

        persister.put("theme", "dark".into());
        persister.put("iesgo_swipes", "[]".into());
        persister.put("theme", "light".into());
        persister.remove("iesgo_swipes");
        persister.flush().await;

        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
        assert_eq!(store.get("iesgo_swipes").unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_many_vs_clear() {
        let store = Arc::new(MemoryStore::new());
        store.set("unrelated", "keep?").unwrap();
        let persister = Persister::spawn(store.clone());

        persister.put("iesgo_user", "{}".into());
        persister.remove_many(&["iesgo_user", "theme"]);
        persister.flush().await;
        assert_eq!(store.keys().unwrap(), vec!["unrelated".to_string()]);

        persister.clear();
        persister.flush().await;
        assert!(store.keys().unwrap().is_empty());
    }
}
