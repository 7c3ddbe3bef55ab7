use std::fs;
use std::path::{Path, PathBuf};

use crate::desktop::filesystem::FileSystemItem;
use crate::error::{LetterError, StoreError};

/// Folder generated letters are listed under.
pub const LETTERS_DIR: &str = "/desktop/letters";
pub const LETTER_ICON: &str = "💌";

/// Stored letters share the file-tree shape so the desktop can list them as-is.
pub type LetterRecord = FileSystemItem;

/// The four form fields, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterForm {
    pub title: String,
    pub to: String,
    pub content: String,
    pub from: String,
}

impl LetterForm {
    /// Title and content are required.
    pub fn validate(&self) -> Result<(), LetterError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(LetterError::MissingFields);
        }
        Ok(())
    }

    /// Greeting and signature are only added when the names are filled in.
    pub fn compose(&self) -> String {
        let mut out = String::new();
        if !self.to.is_empty() {
            out.push_str(&format!("Dragă {},\n\n", self.to));
        }
        out.push_str(&self.content);
        if !self.from.is_empty() {
            out.push_str(&format!("\n\nCu dragoste,\n{} 💕", self.from));
        }
        out
    }

    /// Validate and build the record stamped with `now_ms` (Unix millis).
    pub fn to_record(&self, now_ms: u128) -> Result<LetterRecord, LetterError> {
        self.validate()?;
        Ok(FileSystemItem::file(
            format!("letter-{now_ms}"),
            format!("{}.txt", self.title),
            LETTER_ICON.to_string(),
            format!("{LETTERS_DIR}/{}.txt", self.title),
            self.compose(),
        ))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Unix time in milliseconds, for letter ids.
pub fn unix_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// JSON array of letters on disk.
#[derive(Debug, Clone)]
pub struct LetterStore {
    path: PathBuf,
}

impl LetterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored letter. A missing or unreadable file reads as empty.
    pub fn load(&self) -> Vec<LetterRecord> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::warn!("letter store {}: {e}", self.path.display());
                return Vec::new();
            }
        };
        match serde_json::from_str(&text) {
            Ok(letters) => letters,
            Err(e) => {
                log::warn!("letter store {} is corrupt, starting empty: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    pub fn append(&self, letter: &LetterRecord) -> Result<(), StoreError> {
        let mut letters = self.load();
        letters.push(letter.clone());
        self.save_atomic(&letters)
    }

    fn save_atomic(&self, letters: &[LetterRecord]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(io_err)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(letters)?;
        fs::write(&tmp, data).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}
