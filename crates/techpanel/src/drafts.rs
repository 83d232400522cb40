//! Unsent form contents, one slot per editing mode.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PanelError;
use crate::form::ReplaceForm;

/// Which editor a draft belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftSlot {
    New,
    Edit,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DraftFile {
    #[serde(default)]
    new: ReplaceForm,
    #[serde(default)]
    edit: Option<ReplaceForm>,
}

/// Snapshots of the editor taken whenever the user navigates away from it.
///
/// With a path the drafts are written as JSON on every change.
#[derive(Debug, Default)]
pub struct Drafts {
    file: DraftFile,
    path: Option<PathBuf>,
}

impl Drafts {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Read drafts from `path`. A missing file starts empty; an unreadable
    /// one is logged and replaced on the next save.
    pub fn open(path: &Path) -> Self {
        let file = match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "discarding unreadable drafts");
                DraftFile::default()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => DraftFile::default(),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "cannot read drafts");
                DraftFile::default()
            }
        };
        Self {
            file,
            path: Some(path.to_path_buf()),
        }
    }

    pub fn save(&mut self, slot: DraftSlot, form: ReplaceForm) {
        match slot {
            DraftSlot::New => self.file.new = form,
            DraftSlot::Edit => self.file.edit = Some(form),
        }
        self.persist_logged();
    }

    /// The stored draft. The edit slot may be empty.
    pub fn load(&self, slot: DraftSlot) -> Option<&ReplaceForm> {
        match slot {
            DraftSlot::New => Some(&self.file.new),
            DraftSlot::Edit => self.file.edit.as_ref(),
        }
    }

    pub fn discard(&mut self, slot: DraftSlot) {
        match slot {
            DraftSlot::New => self.file.new = ReplaceForm::default(),
            DraftSlot::Edit => self.file.edit = None,
        }
        self.persist_logged();
    }

    pub fn persist(&self) -> Result<(), PanelError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.file)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn persist_logged(&self) {
        if let Err(err) = self.persist() {
            tracing::warn!(%err, "failed to write drafts");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(group: &str) -> ReplaceForm {
        ReplaceForm {
            group_number: group.into(),
            ..Default::default()
        }
    }

    #[test]
    fn slots_are_independent() {
        let mut drafts = Drafts::in_memory();
        drafts.save(DraftSlot::New, form("A-1"));
        drafts.save(DraftSlot::Edit, form("B-2"));
        assert_eq!(drafts.load(DraftSlot::New).map(|f| f.group_number.as_str()), Some("A-1"));
        assert_eq!(drafts.load(DraftSlot::Edit).map(|f| f.group_number.as_str()), Some("B-2"));

        drafts.discard(DraftSlot::Edit);
        assert!(drafts.load(DraftSlot::Edit).is_none());
        drafts.discard(DraftSlot::New);
        assert_eq!(drafts.load(DraftSlot::New), Some(&ReplaceForm::default()));
    }

    #[test]
    fn persisted_drafts_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("drafts.json");

        let mut drafts = Drafts::open(&path);
        drafts.save(DraftSlot::New, form("G-7"));

        let reopened = Drafts::open(&path);
        assert_eq!(reopened.load(DraftSlot::New).map(|f| f.group_number.as_str()), Some("G-7"));
        assert!(reopened.load(DraftSlot::Edit).is_none());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.json");
        std::fs::write(&path, "{not json").unwrap();
        let drafts = Drafts::open(&path);
        assert_eq!(drafts.load(DraftSlot::New), Some(&ReplaceForm::default()));
    }
}
