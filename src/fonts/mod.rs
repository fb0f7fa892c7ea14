//! Locating and loading the TrueType family used by the embedded-font canvas.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{self, FontData, FontFamily};

/// Name of the font family expected on disk (`<name>-Regular.ttf`, ...).
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable that points at a directory holding the font family.
pub const FONTS_DIR_ENV: &str = "ANCORAS_FONTS_DIR";

/// File suffixes of the four faces, in regular/bold/italic/bold-italic order.
pub const FACE_SUFFIXES: [&str; 4] = ["Regular", "Bold", "Italic", "BoldItalic"];

/// Returns the expected file names of `family`.
pub fn face_files(family: &str) -> Vec<String> {
    FACE_SUFFIXES
        .iter()
        .map(|suffix| format!("{family}-{suffix}.ttf"))
        .collect()
}

/// Directories searched for the font family, in priority order.
///
/// An explicit directory always comes first, followed by [`FONTS_DIR_ENV`], `assets/fonts` next to
/// the running executable and finally `assets/fonts` in the crate checkout.
pub fn font_directory_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    let mut push = |candidate: PathBuf| {
        if !candidates.iter().any(|existing| existing == &candidate) {
            candidates.push(candidate);
        }
    };

    if let Some(path) = explicit {
        push(path.to_path_buf());
    }

    if let Some(path) = env::var_os(FONTS_DIR_ENV) {
        if !path.is_empty() {
            push(PathBuf::from(path));
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push(bin_dir.join("assets/fonts"));
        }
    }

    push(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"));

    candidates
}

fn missing_font_files(path: &Path, family: &str) -> Vec<String> {
    face_files(family)
        .into_iter()
        .filter(|name| !path.join(name).is_file())
        .collect()
}

/// Picks the first candidate directory that contains every face of `family`.
pub fn resolve_font_directory(candidates: &[PathBuf], family: &str) -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in candidates {
        let exists = candidate.is_dir();
        let missing = missing_font_files(candidate, family);

        if exists && missing.is_empty() {
            return Ok(candidate.clone());
        }

        let reason = if !exists {
            "directory missing".to_owned()
        } else {
            format!("missing files [{}]", missing.join(", "))
        };
        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    let summary = if attempts.is_empty() {
        "no search paths were available".to_owned()
    } else {
        attempts.join(", ")
    };

    Err(Error::new(
        format!(
            "Unable to locate the '{}' font family. Checked: {}. Set {} to a directory with the fonts.",
            family, summary, FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

/// Loads `family` from the first matching directory in `candidates`.
pub fn load_font_family(
    candidates: &[PathBuf],
    family: &str,
) -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory(candidates, family)?;
    log::info!("Loading font family '{}' from {}", family, directory.display());

    fonts::from_files(&directory, family, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                family,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
        )
    })
}

/// Builds a family from raw TrueType bytes ordered regular, bold, italic, bold italic.
pub fn family_from_bytes(faces: [Vec<u8>; 4]) -> Result<FontFamily<FontData>, Error> {
    let [regular, bold, italic, bold_italic] = faces;
    Ok(FontFamily {
        regular: FontData::new(regular, None)?,
        bold: FontData::new(bold, None)?,
        italic: FontData::new(italic, None)?,
        bold_italic: FontData::new(bold_italic, None)?,
    })
}

/// Indicates whether the default family can be found in any default search directory.
pub fn default_fonts_available() -> bool {
    resolve_font_directory(&font_directory_candidates(None), DEFAULT_FONT_FAMILY_NAME).is_ok()
}
