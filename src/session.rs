//! An editing session over one storage and one draft cache
//!
//! The session ties a [`DocumentStore`] to the document it was loaded from.
//! Every change to the text refreshes the document's draft so unsaved work
//! can be offered back after a restart.

use log::{info, warn};

use crate::constants::LAST_FILE_KEY;
use crate::drafts::{draft_key, DraftCache};
use crate::editor::DocumentStore;
use crate::vfs::{ProfileStorage, VfsError};

/// Decision on a draft that differs from the stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftChoice {
    /// Continue from the draft; the document starts out dirty
    Restore,
    /// Drop the draft and use the stored text
    Discard,
}

/// A draft found while loading a document
#[derive(Debug, Clone, Copy)]
pub struct DraftConflict<'a> {
    pub name: &'a str,
    pub stored: &'a str,
    pub draft: &'a str,
}

/// How a load ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No differing draft existed
    Clean,
    RestoredDraft,
    DiscardedDraft,
}

pub struct EditorSession<S, D> {
    storage: S,
    drafts: D,
    store: DocumentStore,
    files: Vec<String>,
    current_file: Option<String>,
}

impl<S: ProfileStorage, D: DraftCache> EditorSession<S, D> {
    pub fn new(storage: S, drafts: D) -> Self {
        Self::with_store(storage, drafts, DocumentStore::default())
    }

    /// Create a session around a preconfigured store, e.g. with a custom undo depth
    pub fn with_store(storage: S, drafts: D, store: DocumentStore) -> Self {
        EditorSession {
            storage,
            drafts,
            store,
            files: Vec::new(),
            current_file: None,
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn drafts(&self) -> &D {
        &self.drafts
    }

    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    /// Document names from the last [`EditorSession::refresh_files`]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub async fn refresh_files(&mut self) -> Result<&[String], VfsError> {
        self.files = self.storage.list_documents().await?;
        Ok(&self.files)
    }

    /// Refresh the file list and open the last used document, or the first one
    ///
    /// Returns `None` when storage holds no documents.
    pub async fn open_default<F>(&mut self, resolve: F) -> Result<Option<LoadOutcome>, VfsError>
    where
        F: FnOnce(&DraftConflict<'_>) -> DraftChoice,
    {
        self.refresh_files().await?;

        let remembered = self
            .drafts
            .get(LAST_FILE_KEY)
            .filter(|name| self.files.contains(name));
        let Some(name) = remembered.or_else(|| self.files.first().cloned()) else {
            return Ok(None);
        };

        self.load_file(&name, resolve).await.map(Some)
    }

    /// Load a document, reconciling it with any stored draft
    ///
    /// `resolve` is only called when a draft exists and differs from the
    /// stored text. On failure the current document stays open.
    pub async fn load_file<F>(&mut self, name: &str, resolve: F) -> Result<LoadOutcome, VfsError>
    where
        F: FnOnce(&DraftConflict<'_>) -> DraftChoice,
    {
        let stored = self.storage.read_document(name).await?;
        let key = draft_key(name);

        let (text, outcome) = match self.drafts.get(&key) {
            Some(draft) if draft != stored => {
                let conflict = DraftConflict {
                    name,
                    stored: &stored,
                    draft: &draft,
                };
                match resolve(&conflict) {
                    DraftChoice::Restore => {
                        info!("Restored unsaved draft of {}", name);
                        (draft, LoadOutcome::RestoredDraft)
                    }
                    DraftChoice::Discard => {
                        info!("Discarded unsaved draft of {}", name);
                        self.drafts.remove(&key);
                        (stored, LoadOutcome::DiscardedDraft)
                    }
                }
            }
            _ => (stored, LoadOutcome::Clean),
        };

        self.store.reset(&text, outcome == LoadOutcome::RestoredDraft);
        self.current_file = Some(name.to_string());
        self.drafts.set(LAST_FILE_KEY, name);
        info!("Loaded {}", name);
        Ok(outcome)
    }

    /// Write the current text back to storage
    ///
    /// On success the store is marked clean and the draft dropped. On
    /// failure both stay as they were.
    pub async fn save_file(&mut self) -> Result<(), VfsError> {
        let Some(name) = self.current_file.clone() else {
            return Err(VfsError::Other("no document is open".to_string()));
        };

        if let Err(e) = self.storage.write_document(&name, self.store.text()).await {
            warn!("Saving {} failed: {}", name, e);
            return Err(e);
        }

        self.store.mark_saved();
        self.drafts.remove(&draft_key(&name));
        info!("Saved {}", name);
        Ok(())
    }

    /// Replace the text from a raw editor; returns whether it changed
    pub fn update_content(&mut self, text: &str) -> bool {
        self.edit(|store| store.set_text(text))
    }

    /// Run an operation on the store, refreshing the draft if the text changed
    pub fn edit<R, F>(&mut self, op: F) -> R
    where
        F: FnOnce(&mut DocumentStore) -> R,
    {
        let revision = self.store.revision();
        let result = op(&mut self.store);
        if self.store.revision() != revision {
            if let Some(name) = &self.current_file {
                self.drafts.set(&draft_key(name), self.store.text());
            }
        }
        result
    }

    pub fn undo(&mut self) -> bool {
        self.edit(DocumentStore::undo)
    }

    pub fn redo(&mut self) -> bool {
        self.edit(DocumentStore::redo)
    }
}
