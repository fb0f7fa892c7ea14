//! Entry point tying the loader, renderer and sink together.

use std::io;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use log::{error, info};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

#[cfg(feature = "bookmarks")]
use crate::bookmarks::{self, BookmarkError, ChapterMark};
use crate::canvas::{PdfCapability, RecordingCanvas};
use crate::content::{self, Document, FILE_SLUG};
use crate::layout::LayoutConfig;
use crate::loader::{LoadError, Loader};
use crate::render::{self, RenderError, RenderSummary};
use crate::sink::ArtifactSink;

/// Message reported while the capability is being acquired.
pub const LOADING_MESSAGE: &str = "Carregando biblioteca...";
/// Message reported while the document is being drawn.
pub const GENERATING_MESSAGE: &str = "Gerando PDF...";

/// Milestones reported while generating.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    Loading { message: String },
    Generating { message: String },
}

impl Progress {
    fn loading() -> Self {
        Self::Loading {
            message: LOADING_MESSAGE.to_owned(),
        }
    }

    fn generating() -> Self {
        Self::Generating {
            message: GENERATING_MESSAGE.to_owned(),
        }
    }

    /// Short machine-readable status: `loading` or `generating`.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Loading { .. } => "loading",
            Self::Generating { .. } => "generating",
        }
    }

    /// Human readable description of the milestone.
    pub fn message(&self) -> &str {
        match self {
            Self::Loading { message } | Self::Generating { message } => message,
        }
    }
}

/// Channel receiving [`Progress`] events.
pub type ProgressSender = UnboundedSender<Progress>;

/// Everything that can abort a generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Failed to load the PDF library: {0}")]
    Load(#[from] LoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[cfg(feature = "bookmarks")]
    #[error("Failed to add chapter bookmarks: {0}")]
    Bookmarks(#[from] BookmarkError),
    #[error("Failed to save {filename}: {source}")]
    Save {
        filename: String,
        #[source]
        source: io::Error,
    },
}

/// Per-run settings.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerateOptions {
    /// Date stamped into the output file name.
    pub date: NaiveDate,
    pub layout: LayoutConfig,
    /// Embed a chapter outline (requires the `bookmarks` feature).
    pub bookmarks: bool,
}

impl GenerateOptions {
    /// Options for the given date with the default layout.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            layout: LayoutConfig::default(),
            bookmarks: false,
        }
    }

    /// Options stamped with the current UTC date.
    pub fn today() -> Self {
        Self::for_date(Utc::now().date_naive())
    }

    /// Replaces the layout and returns the updated options.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Enables or disables the chapter outline and returns the updated options.
    pub fn with_bookmarks(mut self, bookmarks: bool) -> Self {
        self.bookmarks = bookmarks;
        self
    }
}

/// Result of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generated {
    pub filename: String,
    /// Location reported by the sink.
    pub path: PathBuf,
    pub pages: usize,
    pub bytes_len: usize,
}

/// File name for a document generated on `date`: `3-ancoras-guia-YYYY-MM-DD.pdf`.
pub fn output_filename(date: NaiveDate) -> String {
    format!("{}-{}.pdf", FILE_SLUG, date.format("%Y-%m-%d"))
}

/// Opens a canvas from `capability`, renders `document` and returns the finished bytes.
pub fn render_document(
    capability: &dyn PdfCapability,
    document: &Document<'_>,
    layout: &LayoutConfig,
) -> Result<(Vec<u8>, RenderSummary), RenderError> {
    let mut canvas = capability.open_canvas(document.title)?;
    let summary = render::render(document, canvas.as_mut(), layout)?;
    let bytes = canvas.finish()?;
    Ok((bytes, summary))
}

/// Renders the guide onto a [`RecordingCanvas`] to inspect the page assignment.
pub fn plan(layout: &LayoutConfig) -> Result<(RecordingCanvas, RenderSummary), RenderError> {
    let mut canvas = RecordingCanvas::new();
    let summary = render::render(content::guide(), &mut canvas, layout)?;
    Ok((canvas, summary))
}

fn report(progress: Option<&ProgressSender>, event: Progress) {
    info!("{}", event.message());
    if let Some(sender) = progress {
        // A dropped receiver only means nobody is listening any more.
        let _ = sender.send(event);
    }
}

#[cfg(feature = "bookmarks")]
fn with_bookmarks(
    bytes: Vec<u8>,
    document: &Document<'_>,
    summary: &RenderSummary,
) -> Result<Vec<u8>, GenerateError> {
    let marks: Vec<ChapterMark> = (0..document.chapters.len())
        .zip(&summary.chapter_pages)
        .filter_map(|(index, page)| {
            document.chapter_heading(index).map(|title| ChapterMark {
                title,
                page: *page,
            })
        })
        .collect();
    Ok(bookmarks::apply_chapter_bookmarks(&bytes, &marks)?)
}

#[cfg(not(feature = "bookmarks"))]
fn with_bookmarks(
    bytes: Vec<u8>,
    _document: &Document<'_>,
    _summary: &RenderSummary,
) -> Result<Vec<u8>, GenerateError> {
    log::warn!("Chapter bookmarks requested but the `bookmarks` feature is disabled");
    Ok(bytes)
}

async fn run(
    loader: &Loader,
    options: &GenerateOptions,
    sink: &dyn ArtifactSink,
    progress: Option<&ProgressSender>,
) -> Result<Generated, GenerateError> {
    report(progress, Progress::loading());
    let capability = loader.acquire().await?;

    report(progress, Progress::generating());
    let document = content::guide();
    let (mut bytes, summary) = render_document(capability.as_ref(), document, &options.layout)?;
    if options.bookmarks {
        bytes = with_bookmarks(bytes, document, &summary)?;
    }

    let filename = output_filename(options.date);
    let path = sink
        .save(&filename, &bytes)
        .map_err(|source| GenerateError::Save {
            filename: filename.clone(),
            source,
        })?;

    Ok(Generated {
        filename,
        path,
        pages: summary.pages,
        bytes_len: bytes.len(),
    })
}

/// Generates the prayer guide and hands it to `sink`.
///
/// Progress milestones are sent to `progress` when provided.  Any failure aborts the run before the
/// sink is called, so no partial artifact is ever stored.
pub async fn generate(
    loader: &Loader,
    options: &GenerateOptions,
    sink: &dyn ArtifactSink,
    progress: Option<&ProgressSender>,
) -> Result<Generated, GenerateError> {
    let outcome = run(loader, options, sink, progress).await;
    if let Err(err) = &outcome {
        error!("PDF generation failed: {}", err);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    #[test]
    fn filename_is_stamped_with_the_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).expect("valid date");
        assert_eq!(output_filename(date), "3-ancoras-guia-2024-03-07.pdf");
    }

    #[test]
    fn progress_exposes_status_and_message() {
        let loading = Progress::loading();
        assert_eq!(loading.status(), "loading");
        assert_eq!(loading.message(), LOADING_MESSAGE);
        assert_eq!(Progress::generating().status(), "generating");
    }

    #[test]
    fn plan_matches_the_summary() {
        let (canvas, summary) = plan(&LayoutConfig::default()).expect("plan");
        assert_eq!(canvas.page_count(), summary.pages);
    }
}
