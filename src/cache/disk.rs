//! Persistent cache tier
//!
//! One file per cache key, named by the key's storage rendering, containing
//! the raw UTF-8 translated text with no envelope. The directory listing is
//! the source of truth; there is no manifest to fall out of sync.
//!
//! Mutations (writes, per-article removal, full clear) are fire-and-forget:
//! they enqueue a command onto a bounded queue drained by a single worker
//! task, so commands apply in submission order and writes to the same key
//! can never clobber a fresher value with a staler one. Reads and size
//! scans bypass the queue and go straight to the filesystem.

use crate::cache::key::CacheKey;
use crate::error::TranslationError;
use crate::types::ArticleId;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Capacity of the worker command queue; senders wait when it fills
const COMMAND_QUEUE_DEPTH: usize = 256;

/// Commands processed by the disk worker, strictly in submission order
#[derive(Debug)]
enum DiskCommand {
    Write {
        file_name: Arc<str>,
        contents: Arc<str>,
    },
    ClearArticle {
        article: ArticleId,
    },
    ClearAll,
    Flush {
        done: oneshot::Sender<()>,
    },
}

/// Handle to the persistent tier
///
/// Cheap to clone; all clones feed the same worker.
#[derive(Debug, Clone)]
pub(crate) struct DiskTier {
    directory: PathBuf,
    commands: mpsc::Sender<DiskCommand>,
}

impl DiskTier {
    /// Open the tier rooted at `directory`, creating it if missing
    ///
    /// An empty or previously purged directory is a normal cold start, not
    /// an error.
    pub(crate) async fn open(directory: PathBuf) -> Result<Self, TranslationError> {
        fs::create_dir_all(&directory)
            .await
            .map_err(|e| TranslationError::persistence("create directory", e))?;

        let (commands, receiver) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        tokio::spawn(worker(directory.clone(), receiver));
        debug!(directory = %directory.display(), "translation disk tier ready");

        Ok(Self {
            directory,
            commands,
        })
    }

    /// Read one entry; `None` covers both absence and unreadable entries
    pub(crate) async fn read(&self, file_name: &str) -> Option<String> {
        match fs::read_to_string(self.directory.join(file_name)).await {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                let err = TranslationError::persistence("read", e);
                warn!(file = file_name, error = %err, "treating unreadable cache entry as a miss");
                None
            }
        }
    }

    /// Enqueue a write; returns once the command is accepted, not applied
    pub(crate) async fn schedule_write(&self, file_name: Arc<str>, contents: Arc<str>) {
        self.send(DiskCommand::Write {
            file_name,
            contents,
        })
        .await;
    }

    /// Enqueue removal of every entry belonging to `article`
    pub(crate) async fn schedule_clear_article(&self, article: ArticleId) {
        self.send(DiskCommand::ClearArticle { article }).await;
    }

    /// Enqueue removal of every entry
    pub(crate) async fn schedule_clear_all(&self) {
        self.send(DiskCommand::ClearAll).await;
    }

    /// Wait until every previously enqueued command has been applied
    pub(crate) async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        self.send(DiskCommand::Flush { done }).await;
        // A closed channel means the worker is gone and nothing is pending.
        let _ = wait.await;
    }

    /// Total size of the directory's files in bytes
    ///
    /// Point-in-time estimate: the scan does not go through the worker
    /// queue, so it may race with in-flight writes.
    pub(crate) async fn size_bytes(&self) -> u64 {
        let mut entries = match fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) => {
                let err = TranslationError::persistence("scan", e);
                warn!(error = %err, "failed to scan cache directory for size");
                return 0;
            }
        };

        let mut size = 0u64;
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    if let Ok(metadata) = entry.metadata().await {
                        if metadata.is_file() {
                            size += metadata.len();
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    let err = TranslationError::persistence("scan", e);
                    warn!(error = %err, "cache size scan stopped early");
                    break;
                }
            }
        }
        size
    }

    #[cfg(test)]
    pub(crate) fn directory(&self) -> &Path {
        &self.directory
    }

    async fn send(&self, command: DiskCommand) {
        if self.commands.send(command).await.is_err() {
            warn!("disk worker stopped; dropping cache persistence command");
        }
    }
}

/// Drains the command queue until every sender is dropped
async fn worker(directory: PathBuf, mut commands: mpsc::Receiver<DiskCommand>) {
    while let Some(command) = commands.recv().await {
        match command {
            DiskCommand::Write {
                file_name,
                contents,
            } => write_entry(&directory, &file_name, &contents).await,
            DiskCommand::ClearArticle { article } => {
                clear_article_entries(&directory, &article).await;
            }
            DiskCommand::ClearAll => clear_all_entries(&directory).await,
            DiskCommand::Flush { done } => {
                let _ = done.send(());
            }
        }
    }
    debug!("translation disk worker stopped");
}

async fn write_entry(directory: &Path, file_name: &str, contents: &str) {
    if let Err(e) = fs::write(directory.join(file_name), contents).await {
        let err = TranslationError::persistence("write", e);
        warn!(file = file_name, error = %err, "failed to persist translation");
    }
}

/// Remove entries whose parsed article component equals `article`
///
/// Matching is on the decoded component, not a raw name prefix, so an
/// article id that happens to be a prefix of another never over-matches.
/// Files that do not parse as storage keys are left alone.
async fn clear_article_entries(directory: &Path, article: &ArticleId) {
    let mut entries = match fs::read_dir(directory).await {
        Ok(entries) => entries,
        Err(e) => {
            let err = TranslationError::persistence("scan", e);
            warn!(error = %err, "failed to scan cache directory for article clear");
            return;
        }
    };

    let mut removed = 0u64;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(key) = CacheKey::parse(name) else {
            continue;
        };
        if key.article() != article {
            continue;
        }
        match fs::remove_file(entry.path()).await {
            Ok(()) => removed += 1,
            Err(e) => {
                let err = TranslationError::persistence("remove", e);
                warn!(file = name, error = %err, "failed to remove cached translation");
            }
        }
    }
    debug!(article = %article, removed, "cleared persisted translations for article");
}

/// Remove every file in the cache directory
async fn clear_all_entries(directory: &Path) {
    let mut entries = match fs::read_dir(directory).await {
        Ok(entries) => entries,
        Err(e) => {
            let err = TranslationError::persistence("scan", e);
            warn!(error = %err, "failed to scan cache directory for clear");
            return;
        }
    };

    let mut removed = 0u64;
    while let Ok(Some(entry)) = entries.next_entry().await {
        match fs::remove_file(entry.path()).await {
            Ok(()) => removed += 1,
            Err(e) => {
                let err = TranslationError::persistence("remove", e);
                warn!(file = %entry.path().display(), error = %err, "failed to remove cache entry");
            }
        }
    }
    debug!(removed, "cleared persisted translations");
}
