//! File-backed quest library: one JSON file per quest plus a running catalog.
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::QuestSink;
use crate::constants::QUEST_LIBRARY_CATALOG;
use crate::quest::{QuestKind, QuestRecord};

const FILE_STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
const CATALOG_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LibraryError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Summary row appended to the catalog for every saved quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub filename: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: QuestKind,
    pub objective: String,
    pub generated_at: String,
}

/// Turn a quest title into a filename stem: non-alphanumerics become `_`,
/// doubled underscores collapse once, and edge underscores are trimmed.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let collapsed = replaced.replace("__", "_");
    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        "Quest".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Filename a record is stored under.
#[must_use]
pub fn quest_filename(record: &QuestRecord) -> String {
    format!(
        "{}_{}.json",
        sanitize_title(&record.quest.title),
        record.generated_at.format(FILE_STAMP_FORMAT)
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestLibrary {
    dir: PathBuf,
}

impl QuestLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.dir.join(QUEST_LIBRARY_CATALOG)
    }

    /// Current catalog contents. A missing catalog is empty; a corrupt one is
    /// discarded with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Io`] when an existing catalog cannot be read.
    pub fn catalog(&self) -> Result<Vec<CatalogEntry>, LibraryError> {
        let path = self.catalog_path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(LibraryError::io(&path, err)),
        };
        match serde_json::from_str(&text) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                log::warn!("quest catalog {} is corrupt ({err}); starting fresh", path.display());
                Ok(Vec::new())
            }
        }
    }

    /// Write the quest file and append it to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`LibraryError`] when the directory, quest file, or catalog
    /// cannot be written.
    pub fn save(&self, record: &QuestRecord) -> Result<PathBuf, LibraryError> {
        fs::create_dir_all(&self.dir).map_err(|err| LibraryError::io(&self.dir, err))?;

        let filename = self.free_filename(record);
        let quest_path = self.dir.join(&filename);
        write_json(&quest_path, record)?;
        log::info!("saved quest {filename}");

        let mut entries = self.catalog()?;
        entries.push(CatalogEntry {
            id: record.generated_at.format(FILE_STAMP_FORMAT).to_string(),
            filename,
            title: record.quest.title.clone(),
            kind: record.quest.kind,
            objective: record.quest.objective.clone(),
            generated_at: record.generated_at.format(CATALOG_STAMP_FORMAT).to_string(),
        });
        write_json(&self.catalog_path(), &entries)?;
        Ok(quest_path)
    }

    /// [`quest_filename`], with `_2`, `_3`, ... appended when a quest saved
    /// earlier in the same second already holds that name.
    fn free_filename(&self, record: &QuestRecord) -> String {
        let base = quest_filename(record);
        if !self.dir.join(&base).exists() {
            return base;
        }
        let stem = base.trim_end_matches(".json");
        (2_u32..)
            .map(|n| format!("{stem}_{n}.json"))
            .find(|candidate| !self.dir.join(candidate).exists())
            .unwrap_or(base)
    }
}

impl QuestSink for QuestLibrary {
    type Error = LibraryError;

    fn persist(&self, record: &QuestRecord) -> Result<(), Self::Error> {
        self.save(record).map(|_| ())
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), LibraryError> {
    let file = fs::File::create(path).map_err(|err| LibraryError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| LibraryError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|err| LibraryError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_titles_like_filenames() {
        assert_eq!(sanitize_title("The Great Coin Melt"), "The_Great_Coin_Melt");
        assert_eq!(sanitize_title("  Gold: Rush!  "), "Gold_Rush");
        // single collapse pass: a run of three leaves two behind
        assert_eq!(sanitize_title("A - B"), "A__B");
        assert_eq!(sanitize_title("?!"), "Quest");
    }
}
