//! Command-line surface and the actions behind each command.

use crate::clipboard::{self, ClipboardCapture};
use crate::config::{AppConfig, ConfigError};
use crate::imaging::{self, ImagingError};
use crate::shortcuts::{ShortcutAction, ShortcutError};
use clap::{Parser, Subcommand};
use documenta_core::storage::{FileStorage, Storage, StorageError};
use documenta_core::{
    BlockKind, CaptureError, ContentStore, DragGesture, DragOutcome, ExportError, ImageData,
    ScreenCapture, export_html_document, to_clipboard_payload, to_plain_text,
};
use kurbo::Point;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project opened when `--project` is not given.
pub const DEFAULT_PROJECT: &str = "default";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Shortcut(#[from] ShortcutError),
    #[error(transparent)]
    Imaging(#[from] ImagingError),
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unsupported image format: {}", .0.display())]
    UnsupportedImage(PathBuf),
    #[error("Canvas has {0} blocks; pass --force to discard them")]
    NotEmpty(usize),
    #[error("No block at index {0}")]
    NoBlock(usize),
    #[error("Block {0} is an image and has no text")]
    NotText(usize),
    #[error("Expected ACTION=COMBO, got {0:?}")]
    BadBinding(String),
}

#[derive(Parser, Debug)]
#[command(name = "documenta")]
#[command(about = "Compose screenshots, text and code into one document", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Project to operate on
    #[arg(short, long, global = true, default_value = DEFAULT_PROJECT)]
    pub project: String,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start over with an empty canvas
    New {
        /// Discard existing blocks without asking
        #[arg(long)]
        force: bool,
    },
    /// List blocks in order
    #[command(alias = "ls")]
    List,
    /// Append a text block
    AddText { text: String },
    /// Append a code block from a file
    AddCode { path: PathBuf },
    /// Append a PNG, JPEG or WebP image from a file
    AddImage { path: PathBuf },
    /// Append the screenshot currently on the clipboard
    Screenshot,
    /// Replace the text of a text or code block
    Edit { index: usize, text: String },
    /// Delete the block at an index
    #[command(alias = "rm")]
    Remove { index: usize },
    /// Delete the block rendered under a vertical offset
    RemoveAt { y: f64 },
    /// Move a block so it ends up at TARGET
    #[command(alias = "mv")]
    Move { index: usize, target: usize },
    /// Replay a drag gesture from one vertical offset to another
    Drag {
        from_y: f64,
        to_y: f64,
        /// Release the pointer outside the canvas
        #[arg(long)]
        outside: bool,
    },
    /// Print the plain-text export
    Text,
    /// Copy the canvas to the clipboard
    Copy,
    /// Export the canvas as an HTML document
    Export { path: PathBuf },
    /// List saved projects
    Projects {
        /// Delete a project first
        #[arg(long, value_name = "ID")]
        delete: Option<String>,
    },
    /// Show or change keyboard shortcuts
    Shortcuts {
        /// Rebind an action, e.g. screenshot=Ctrl+Shift+S
        #[arg(long, value_name = "ACTION=COMBO")]
        set: Vec<String>,
    },
}

/// An open project plus everything needed to act on it.
pub struct Session<S: Storage> {
    pub config: AppConfig,
    /// Where shortcut changes are written back. `None` means the default path.
    pub config_path: Option<PathBuf>,
    storage: S,
    project_id: String,
    pub store: ContentStore,
}

impl Session<FileStorage> {
    /// Open the project in the configured (or default) storage directory.
    pub fn open(config: AppConfig, project_id: &str) -> Result<Self, AppError> {
        let storage = match &config.storage_dir {
            Some(dir) => FileStorage::new(dir.clone())?,
            None => FileStorage::default_location()?,
        };
        Session::with_storage(config, storage, project_id)
    }
}

impl<S: Storage> Session<S> {
    /// Open `project_id` in `storage`, starting a new project if it does not exist.
    pub fn with_storage(config: AppConfig, storage: S, project_id: &str) -> Result<Self, AppError> {
        let store = match pollster::block_on(storage.load(project_id)) {
            Ok(store) => store,
            Err(StorageError::NotFound(_)) => {
                log::info!("Starting new project {}", project_id);
                let mut store = ContentStore::new();
                store.name = project_id.to_string();
                store
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            config,
            config_path: None,
            storage,
            project_id: project_id.to_string(),
            store,
        })
    }

    pub fn save(&self) -> Result<(), AppError> {
        pollster::block_on(self.storage.save(&self.project_id, &self.store))?;
        Ok(())
    }

    fn block_id(&self, index: usize) -> Result<documenta_core::BlockId, AppError> {
        self.store.id_at(index).ok_or(AppError::NoBlock(index))
    }

    /// Run one command. Returns the lines to print.
    pub fn execute(&mut self, command: Command) -> Result<Vec<String>, AppError> {
        let mut out = Vec::new();
        let mut dirty = true;

        match command {
            Command::New { force } => {
                if !force && !self.store.is_empty() {
                    return Err(AppError::NotEmpty(self.store.len()));
                }
                self.store.clear();
                out.push("New project created".to_string());
            }
            Command::List => {
                dirty = false;
                out.extend(self.describe_blocks());
            }
            Command::AddText { text } => {
                self.store.add_text(text);
                out.push(format!("Added text block {}", self.store.len() - 1));
            }
            Command::AddCode { path } => {
                let code = fs::read_to_string(&path).map_err(|source| AppError::Read {
                    path: path.clone(),
                    source,
                })?;
                self.store.add_code(code);
                out.push(format!("Added code block {}", self.store.len() - 1));
            }
            Command::AddImage { path } => {
                let image = read_image(&path)?;
                out.push(format!(
                    "Added image block {} ({}x{})",
                    self.store.len(),
                    image.width,
                    image.height
                ));
                self.store.add_image(image);
            }
            Command::Screenshot => {
                self.take_screenshot(&mut ClipboardCapture)?;
                out.push(format!("Added screenshot block {}", self.store.len() - 1));
            }
            Command::Edit { index, text } => {
                let id = self.block_id(index)?;
                let edited = self
                    .store
                    .get_mut(id)
                    .is_some_and(|block| block.set_text(text));
                if !edited {
                    return Err(AppError::NotText(index));
                }
                out.push(format!("Updated block {}", index));
            }
            Command::Remove { index } => {
                let id = self.block_id(index)?;
                self.store.remove(id);
                out.push(format!("Removed block {}", index));
            }
            Command::RemoveAt { y } => match self.store.block_at_position(y) {
                Some(id) => {
                    let index = self.store.index_of(id).unwrap_or_default();
                    self.store.remove(id);
                    out.push(format!("Removed block {}", index));
                }
                None => {
                    dirty = false;
                    out.push(format!("No block at y = {}", y));
                }
            },
            Command::Move { index, target } => {
                let id = self.block_id(index)?;
                self.store.move_block(id, target);
                let now = self.store.index_of(id).unwrap_or(target);
                out.push(format!("Moved block {} to {}", index, now));
            }
            Command::Drag {
                from_y,
                to_y,
                outside,
            } => {
                let outcome = self.replay_drag(from_y, to_y, !outside);
                match outcome {
                    DragOutcome::Dropped { new_index, .. } => {
                        out.push(format!("Dropped block at {}", new_index));
                    }
                    DragOutcome::Cancelled | DragOutcome::Click => {
                        dirty = false;
                        out.push("Drag cancelled".to_string());
                    }
                }
            }
            Command::Text => {
                dirty = false;
                out.push(to_plain_text(&self.store.snapshot()));
            }
            Command::Copy => {
                dirty = false;
                let snapshot = self.store.snapshot();
                let images_only = !snapshot.is_empty()
                    && snapshot.blocks().iter().all(|b| b.kind() == BlockKind::Image);
                let payload = to_clipboard_payload(&snapshot);
                match clipboard::copy_payload(&payload, images_only) {
                    Ok(()) => out.push("Content copied to clipboard".to_string()),
                    Err(e) => {
                        log::warn!("Copy failed: {}", e);
                        out.push(format!("Warning: failed to copy to clipboard: {}", e));
                    }
                }
            }
            Command::Export { path } => {
                dirty = false;
                export_html_document(&self.store.snapshot(), &path)?;
                out.push(format!("Document exported to {}", path.display()));
            }
            Command::Projects { delete } => {
                dirty = false;
                if let Some(id) = delete {
                    pollster::block_on(self.storage.delete(&id))?;
                    if id == self.project_id {
                        self.store.clear();
                    }
                    out.push(format!("Deleted project {}", id));
                }
                out.extend(pollster::block_on(self.storage.list())?);
            }
            Command::Shortcuts { set } => {
                dirty = false;
                for binding in &set {
                    let (action, combo) = binding
                        .split_once('=')
                        .ok_or_else(|| AppError::BadBinding(binding.clone()))?;
                    let action: ShortcutAction = action.parse()?;
                    self.config.shortcuts.rebind(action, combo)?;
                }
                if !set.is_empty() {
                    let path = match &self.config_path {
                        Some(path) => path.clone(),
                        None => AppConfig::default_path()?,
                    };
                    self.config.save(&path)?;
                }
                for (action, combo) in self.config.shortcuts.iter() {
                    out.push(format!(
                        "{:12} {:16} {}",
                        action.name(),
                        combo.format(),
                        action.description()
                    ));
                }
            }
        }

        if dirty {
            self.save()?;
        }
        Ok(out)
    }

    /// Grab a screenshot after the configured delay and append it.
    pub fn take_screenshot<C: ScreenCapture>(&mut self, capture: &mut C) -> Result<(), AppError> {
        let delay = self.config.capture_delay();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        let image = capture.capture_full_screen()?;
        self.store.append(image.into());
        Ok(())
    }

    /// Press on the block under `from_y`, drag to `to_y` and release.
    pub fn replay_drag(&mut self, from_y: f64, to_y: f64, inside_canvas: bool) -> DragOutcome {
        let Some(source) = self.store.block_at_position(from_y) else {
            return DragOutcome::Cancelled;
        };
        let mut gesture = DragGesture::new();
        gesture.press(source, Point::new(0.0, from_y));
        gesture.pointer_moved(Point::new(0.0, to_y));
        gesture.release(&mut self.store, Point::new(0.0, to_y), inside_canvas)
    }

    fn describe_blocks(&self) -> Vec<String> {
        let layout = self.store.layout();
        self.store
            .blocks_ordered()
            .zip(layout.spans())
            .enumerate()
            .map(|(i, (block, span))| {
                let summary = match block.image() {
                    Some(img) => format!(
                        "{}x{} {} ({} bytes)",
                        img.width,
                        img.height,
                        img.format.mime_type(),
                        img.data_size()
                    ),
                    None => block
                        .text()
                        .unwrap_or_default()
                        .lines()
                        .next()
                        .unwrap_or_default()
                        .chars()
                        .take(40)
                        .collect(),
                };
                format!(
                    "{:>3}  {:<5} y={:<7} {}",
                    i,
                    block.kind().as_str(),
                    span.top,
                    summary
                )
            })
            .collect()
    }
}

/// Read an image file into a block payload.
fn read_image(path: &Path) -> Result<ImageData, AppError> {
    let data = fs::read(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    match imaging::image_data(&data, Some(path)) {
        Ok(image) => Ok(image),
        Err(ImagingError::UnknownFormat) => Err(AppError::UnsupportedImage(path.to_path_buf())),
        Err(e) => Err(e.into()),
    }
}

/// Parse arguments, open the project and run the command.
pub fn run(cli: Cli) -> Result<(), AppError> {
    let config_path = match cli.config {
        Some(path) => path,
        None => AppConfig::default_path()?,
    };
    let config = AppConfig::load(&config_path)?;
    let mut session = Session::open(config, &cli.project)?;
    session.config_path = Some(config_path);
    for line in session.execute(cli.command)? {
        println!("{}", line);
    }
    Ok(())
}
