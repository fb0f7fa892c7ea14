//! Renders the "A Regra das 3 Ancoras" daily prayer guide to PDF.
//!
//! The crate is split the same way a generation run flows:
//!
//! * [`loader`] acquires a PDF drawing capability once and shares it between callers.
//! * [`content`] holds the compiled-in guide.
//! * [`render`] paginates the guide onto a [`canvas::Canvas`] using a [`layout::LayoutConfig`].
//! * [`sink`] stores the finished artifact.
//! * [`generate`] ties the steps together and reports progress.
//!
//! ```no_run
//! use ancoras_pdf::generate::{generate, GenerateOptions};
//! use ancoras_pdf::loader::{BuiltinSource, Loader};
//! use ancoras_pdf::sink::DirectorySink;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = Loader::new(BuiltinSource);
//! let sink = DirectorySink::new("out");
//! let generated = generate(&loader, &GenerateOptions::today(), &sink, None).await?;
//! println!("{} ({} pages)", generated.path.display(), generated.pages);
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod content;
pub mod fonts;
pub mod generate;
pub mod layout;
pub mod loader;
pub mod render;
pub mod sink;
pub mod wrap;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;
