//! Interactive session state
//!
//! Holds everything a front end needs between user actions: the uploaded
//! person photos and their previews, both background inputs, the busy flag
//! guarding the single in-flight generation, the last notice shown to the
//! user and the last generated portrait.

use crate::app::App;
use crate::models::{BackgroundInput, BackgroundMode, GenerationResult, ImageFile};
use crate::preview::{PreviewHandle, PreviewRegistry};
use crate::{Error, Result};
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const DEFAULT_BACKGROUND_PROMPT: &str = "An outdoor park setting with warm, sunny lighting.";
pub const MISSING_INPUT_MESSAGE: &str =
    "Please upload at least one person photo and provide a background.";
pub const NO_IMAGE_MESSAGE: &str =
    "The AI did not return an image. Please try adjusting your prompt or using different photos.";
pub const DOWNLOAD_FILE_NAME: &str = "family-portrait.png";

/// A file the user picked, with the preview shown for it.
#[derive(Debug)]
pub struct UploadedFile {
    pub file: ImageFile,
    preview: PreviewHandle,
}

impl UploadedFile {
    pub fn preview_url(&self) -> String {
        self.preview.url()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Warning,
}

/// Message surfaced to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// A portrait is available.
    Generated,
    /// The call succeeded but returned no image.
    NoImage,
    /// The call failed; an error notice was stored.
    Failed,
    /// Inputs were incomplete; nothing was sent.
    Rejected,
    /// Another generation is already running.
    Busy,
}

/// Idle/busy flag shared with whoever needs to observe it.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Move to busy. `None` when already busy.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard(self.0.clone()))
    }
}

/// Returns the flag to idle when dropped.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Session {
    previews: PreviewRegistry,
    files: Vec<UploadedFile>,
    background_prompt: String,
    background_image: Option<UploadedFile>,
    background_mode: BackgroundMode,
    busy: BusyFlag,
    notice: Option<Notice>,
    result: Option<GenerationResult>,
}

impl Session {
    pub fn new(previews: PreviewRegistry) -> Self {
        Self {
            previews,
            files: Vec::new(),
            background_prompt: DEFAULT_BACKGROUND_PROMPT.to_string(),
            background_image: None,
            background_mode: BackgroundMode::Text,
            busy: BusyFlag::default(),
            notice: None,
            result: None,
        }
    }

    fn upload(&self, file: ImageFile) -> UploadedFile {
        let preview = self.previews.create(&file);
        UploadedFile { file, preview }
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    /// Add person photos, skipping names already in the list.
    /// Returns how many were added.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = ImageFile>) -> usize {
        let mut added = 0;
        for file in files {
            if self.files.iter().any(|u| u.file.name == file.name) {
                info!("Skipping duplicate upload {}", file.name);
                continue;
            }
            let uploaded = self.upload(file);
            self.files.push(uploaded);
            added += 1;
        }
        added
    }

    pub fn remove_file(&mut self, name: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|u| u.file.name != name);
        before != self.files.len()
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    pub fn background_prompt(&self) -> &str {
        &self.background_prompt
    }

    pub fn set_background_prompt(&mut self, prompt: impl Into<String>) {
        self.background_prompt = prompt.into();
    }

    pub fn background_image(&self) -> Option<&UploadedFile> {
        self.background_image.as_ref()
    }

    /// Replace (or clear) the background image. The old preview is released.
    pub fn set_background_image(&mut self, file: Option<ImageFile>) {
        self.background_image = None;
        self.background_image = file.map(|f| self.upload(f));
    }

    pub fn background_mode(&self) -> BackgroundMode {
        self.background_mode
    }

    /// Switching modes keeps the inactive input.
    pub fn set_background_mode(&mut self, mode: BackgroundMode) {
        self.background_mode = mode;
    }

    /// The background that would be submitted now, if one is usable.
    pub fn background_input(&self) -> Option<BackgroundInput> {
        match self.background_mode {
            BackgroundMode::Image => self
                .background_image
                .as_ref()
                .map(|u| BackgroundInput::Image(u.file.clone())),
            BackgroundMode::Text if !self.background_prompt.trim().is_empty() => {
                Some(BackgroundInput::Text(self.background_prompt.clone()))
            }
            BackgroundMode::Text => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn generated_image(&self) -> Option<&str> {
        self.result.as_ref().and_then(|r| r.image.as_deref())
    }

    pub fn generated_text(&self) -> Option<&str> {
        self.result.as_ref().and_then(|r| r.text.as_deref())
    }

    pub fn generated_data_url(&self) -> Option<String> {
        self.result.as_ref().and_then(|r| r.data_url())
    }

    /// Run one generation with the current inputs.
    pub async fn generate(&mut self, app: &App) -> GenerateOutcome {
        let background = match self.background_input() {
            Some(background) if !self.files.is_empty() => background,
            _ => {
                self.notice = Some(Notice::error(MISSING_INPUT_MESSAGE));
                return GenerateOutcome::Rejected;
            }
        };

        let Some(_guard) = self.busy.try_acquire() else {
            warn!("Generation already in progress");
            return GenerateOutcome::Busy;
        };

        self.notice = None;
        self.result = None;

        let files: Vec<ImageFile> = self.files.iter().map(|u| u.file.clone()).collect();

        match app.generate_portrait(&files, &background).await {
            Ok(result) if result.has_image() => {
                self.result = Some(result);
                GenerateOutcome::Generated
            }
            Ok(result) => {
                if let Some(text) = &result.text {
                    info!("Model replied without an image: {}", text);
                }
                self.result = Some(result);
                self.notice = Some(Notice::warning(NO_IMAGE_MESSAGE));
                GenerateOutcome::NoImage
            }
            Err(e) => {
                // Client failures were already logged by the app.
                if !matches!(e, Error::Generation) {
                    error!("Generation failed: {}", e);
                }
                self.notice = Some(Notice::error(e.to_string()));
                GenerateOutcome::Failed
            }
        }
    }

    /// Write the generated portrait to `dir` as `family-portrait.png`.
    pub async fn download(&self, dir: &Path) -> Result<PathBuf> {
        let bytes = self
            .result
            .as_ref()
            .map(|r| r.image_bytes())
            .transpose()?
            .flatten()
            .ok_or_else(|| Error::Precondition("No generated portrait to download.".to_string()))?;

        let png = tokio::task::spawn_blocking(move || ensure_png(bytes))
            .await
            .map_err(|e| Error::Invariant(format!("PNG conversion task join error: {}", e)))??;

        let path = dir.join(DOWNLOAD_FILE_NAME);
        tokio::fs::write(&path, &png).await?;
        info!("Saved portrait ({} bytes) to {}", png.len(), path.display());

        Ok(path)
    }
}

fn ensure_png(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if matches!(image::guess_format(&bytes), Ok(ImageFormat::Png)) {
        return Ok(bytes);
    }

    let decoded = image::load_from_memory(&bytes)?;
    info!(
        "Converting {}x{} portrait to PNG",
        decoded.width(),
        decoded.height()
    );

    let mut png = Vec::new();
    decoded.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
