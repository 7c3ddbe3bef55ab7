//! The static file tree and desktop icons, embedded at build time.

use serde::{Deserialize, Serialize};

const DESKTOP_JSON: &str = include_str!("../../assets/desktop.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSystemItem {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub path: String,
    #[serde(flatten)]
    pub kind: ItemKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    File { content: String },
    Folder { children: Vec<FileSystemItem> },
}

impl FileSystemItem {
    pub fn file(id: String, name: String, icon: String, path: String, content: String) -> Self {
        Self {
            id,
            name,
            icon,
            path,
            kind: ItemKind::File { content },
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, ItemKind::Folder { .. })
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::File { content } => Some(content),
            ItemKind::Folder { .. } => None,
        }
    }

    pub fn children(&self) -> &[FileSystemItem] {
        match &self.kind {
            ItemKind::Folder { children } => children,
            ItemKind::File { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPos {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum IconAction {
    Popup {
        message: String,
    },
    OpenFile {
        #[serde(rename = "fileId")]
        file_id: String,
    },
    OpenFolder {
        #[serde(rename = "folderId")]
        folder_id: String,
    },
    OpenLetterForm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopIcon {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub position: GridPos,
    #[serde(flatten)]
    pub action: IconAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesktopLayout {
    #[serde(rename = "fileSystem")]
    pub file_system: Vec<FileSystemItem>,
    pub icons: Vec<DesktopIcon>,
}

impl DesktopLayout {
    /// The layout compiled into the binary.
    pub fn embedded() -> Result<Self, serde_json::Error> {
        serde_json::from_str(DESKTOP_JSON)
    }
}

/// Depth-first search by id.
pub fn find_item<'a>(items: &'a [FileSystemItem], id: &str) -> Option<&'a FileSystemItem> {
    for item in items {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find_item(item.children(), id) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_layout_parses() {
        let layout = DesktopLayout::embedded().unwrap();
        assert_eq!(layout.file_system.len(), 5);
        assert_eq!(layout.icons.len(), 8);

        let note = find_item(&layout.file_system, "iuli-love-note").unwrap();
        assert!(note.content().unwrap().starts_with("Dragă Iuli,"));
        assert!(!note.is_folder());

        let socials = find_item(&layout.file_system, "bogdan-socials").unwrap();
        assert_eq!(socials.children().len(), 5);
    }

    #[test]
    fn every_icon_resolves() {
        let layout = DesktopLayout::embedded().unwrap();
        for icon in &layout.icons {
            match &icon.action {
                IconAction::OpenFile { file_id } => {
                    let item = find_item(&layout.file_system, file_id)
                        .unwrap_or_else(|| panic!("{} -> missing {file_id}", icon.id));
                    assert!(!item.is_folder());
                }
                IconAction::OpenFolder { folder_id } => {
                    let item = find_item(&layout.file_system, folder_id)
                        .unwrap_or_else(|| panic!("{} -> missing {folder_id}", icon.id));
                    assert!(item.is_folder());
                }
                IconAction::Popup { message } => assert!(!message.is_empty()),
                IconAction::OpenLetterForm => {}
            }
        }
    }

    #[test]
    fn icon_ids_are_unique() {
        let layout = DesktopLayout::embedded().unwrap();
        let mut ids: Vec<_> = layout.icons.iter().map(|i| i.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), layout.icons.len());
    }

    #[test]
    fn missing_id_is_none() {
        let layout = DesktopLayout::embedded().unwrap();
        assert!(find_item(&layout.file_system, "nope").is_none());
    }
}
