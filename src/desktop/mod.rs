//! Desktop chrome state: icons, open windows, popups and the letter form.
//!
//! Drawing lives in `ui`; this module only decides what is open and routes
//! icon clicks.

pub mod background;
pub mod filesystem;
pub mod letters;
pub mod photos;
pub mod wallpaper;

use self::filesystem::{
    find_item, DesktopIcon, DesktopLayout, FileSystemItem, GridPos, IconAction, ItemKind,
};
use self::letters::{LetterForm, LetterRecord, LetterStore};
use crate::error::LetterError;

pub const LETTERS_FOLDER_ID: &str = "custom-letters";
const LETTERS_FOLDER_NAME: &str = "Scrisorile mele";
const LETTERS_ICON_POS: GridPos = GridPos { x: 250.0, y: 250.0 };
/// Seconds the "letter saved" banner stays up.
pub const SUCCESS_BANNER_SECS: f32 = 3.0;

/// A file or folder window, by item id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenView {
    File(String),
    Folder(String),
}

impl OpenView {
    pub fn id(&self) -> &str {
        match self {
            OpenView::File(id) | OpenView::Folder(id) => id,
        }
    }
}

pub struct DesktopShell {
    layout: DesktopLayout,
    letters_folder: FileSystemItem,
    store: LetterStore,
    open: Vec<OpenView>,
    pub popup: Option<String>,
    pub alert: Option<String>,
    pub letter_form_open: bool,
    pub form: LetterForm,
    pub stats_open: bool,
    success_left: f32,
}

fn letters_folder(letters: Vec<LetterRecord>) -> FileSystemItem {
    FileSystemItem {
        id: LETTERS_FOLDER_ID.to_string(),
        name: LETTERS_FOLDER_NAME.to_string(),
        icon: "📁".to_string(),
        path: letters::LETTERS_DIR.to_string(),
        kind: ItemKind::Folder { children: letters },
    }
}

impl DesktopShell {
    pub fn new(layout: DesktopLayout, store: LetterStore) -> Self {
        let saved = store.load();
        log::info!(
            "desktop: {} icon(s), {} saved letter(s) from {}",
            layout.icons.len(),
            saved.len(),
            store.path().display()
        );
        Self {
            layout,
            letters_folder: letters_folder(saved),
            store,
            open: Vec::new(),
            popup: None,
            alert: None,
            letter_form_open: false,
            form: LetterForm::default(),
            stats_open: false,
            success_left: 0.0,
        }
    }

    /// Static icons, plus the letters folder once it has something in it.
    pub fn icons(&self) -> Vec<DesktopIcon> {
        let mut icons = self.layout.icons.clone();
        if !self.letters().is_empty() {
            icons.push(DesktopIcon {
                id: format!("{LETTERS_FOLDER_ID}-icon"),
                name: LETTERS_FOLDER_NAME.to_string(),
                icon: "💌".to_string(),
                position: LETTERS_ICON_POS,
                action: IconAction::OpenFolder {
                    folder_id: LETTERS_FOLDER_ID.to_string(),
                },
            });
        }
        icons
    }

    pub fn letters(&self) -> &[LetterRecord] {
        self.letters_folder.children()
    }

    pub fn item(&self, id: &str) -> Option<&FileSystemItem> {
        if id == LETTERS_FOLDER_ID {
            return Some(&self.letters_folder);
        }
        find_item(&self.layout.file_system, id)
            .or_else(|| find_item(self.letters_folder.children(), id))
    }

    pub fn open_views(&self) -> &[OpenView] {
        &self.open
    }

    pub fn activate(&mut self, action: &IconAction) {
        match action {
            IconAction::Popup { message } => self.popup = Some(message.clone()),
            IconAction::OpenFile { file_id } => self.open_item(file_id),
            IconAction::OpenFolder { folder_id } => self.open_item(folder_id),
            IconAction::OpenLetterForm => self.letter_form_open = true,
        }
    }

    /// Open a viewer for `id`. Already-open items are not duplicated.
    pub fn open_item(&mut self, id: &str) {
        let Some(item) = self.item(id) else {
            log::warn!("desktop: no item {id}");
            return;
        };
        let view = if item.is_folder() {
            OpenView::Folder(id.to_string())
        } else {
            OpenView::File(id.to_string())
        };
        if !self.open.contains(&view) {
            log::debug!("open {id}");
            self.open.push(view);
        }
    }

    pub fn close(&mut self, id: &str) {
        self.open.retain(|v| v.id() != id);
    }

    /// Validate the form, store the letter and list it.
    ///
    /// Validation failures raise the alert. A failed disk write is logged;
    /// the letter still shows for this session.
    pub fn submit_letter(&mut self, now_ms: u128) -> Result<LetterRecord, LetterError> {
        let record = match self.form.to_record(now_ms) {
            Ok(record) => record,
            Err(e) => {
                self.alert = Some(e.to_string());
                return Err(e);
            }
        };
        if let Err(e) = self.store.append(&record) {
            log::error!("saving letter {}: {e}", record.id);
        }
        if let ItemKind::Folder { children } = &mut self.letters_folder.kind {
            children.push(record.clone());
        }
        log::info!("letter created: {}", record.name);
        self.form.clear();
        self.success_left = SUCCESS_BANNER_SECS;
        Ok(record)
    }

    pub fn success_visible(&self) -> bool {
        self.success_left > 0.0
    }

    pub fn tick(&mut self, dt: f32) {
        self.success_left = (self.success_left - dt).max(0.0);
    }
}
