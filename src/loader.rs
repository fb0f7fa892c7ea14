//! Lazy, shared acquisition of the PDF drawing capability.
//!
//! A [`Loader`] owns one [`CapabilitySource`] and loads from it at most once at a time.  Callers
//! arriving while a load is in flight await the same shared future, so every concurrent caller
//! observes the same handle (or the same error).  A successful load is kept for the lifetime of the
//! loader; a failed one resets the loader so the next call starts over.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, info, warn};
use thiserror::Error;

use crate::canvas::{BuiltinCapability, EmbeddedCapability, PdfCapability};
use crate::fonts;

/// Shared handle to a loaded capability.
pub type CapabilityHandle = Arc<dyn PdfCapability>;

type SharedLoad = Shared<BoxFuture<'static, Result<CapabilityHandle, LoadError>>>;

/// Failures raised while acquiring a capability.
///
/// The error is cloneable because every caller waiting on the same load receives it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The font files could not be found.
    #[error("Font files are unavailable: {0}")]
    MissingFonts(String),
    /// A remote resource could not be downloaded.
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    /// The resource was retrieved but could not be used.
    #[error("Font data is malformed: {0}")]
    Malformed(String),
    /// The background task performing the load did not complete.
    #[error("Capability load was interrupted: {0}")]
    Interrupted(String),
}

/// Something able to produce a [`PdfCapability`].
pub trait CapabilitySource: Send + Sync {
    /// Human readable description used in logs.
    fn describe(&self) -> String;

    /// Returns the capability right away when it needs no loading.
    fn present(&self) -> Option<CapabilityHandle> {
        None
    }

    /// Starts loading the capability.
    fn load(&self) -> BoxFuture<'static, Result<CapabilityHandle, LoadError>>;
}

/// Snapshot of the loader's progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoaderState {
    pub is_loading: bool,
    pub is_loaded: bool,
}

enum Slot {
    Idle,
    Loading { attempt: u64, load: SharedLoad },
    Loaded(CapabilityHandle),
}

struct Inner {
    slot: Slot,
    attempts: u64,
}

/// Acquires a capability on first use and hands out the same handle afterwards.
///
/// Construct one loader per process (or per test) and pass it by reference to every caller.
pub struct Loader {
    source: Box<dyn CapabilitySource>,
    inner: Mutex<Inner>,
}

impl Loader {
    /// Creates an idle loader for `source`.
    pub fn new(source: impl CapabilitySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            inner: Mutex::new(Inner {
                slot: Slot::Idle,
                attempts: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns whether a load is in flight and whether a capability is available.
    pub fn state(&self) -> LoaderState {
        match self.lock().slot {
            Slot::Idle => LoaderState::default(),
            Slot::Loading { .. } => LoaderState {
                is_loading: true,
                is_loaded: false,
            },
            Slot::Loaded(_) => LoaderState {
                is_loading: false,
                is_loaded: true,
            },
        }
    }

    /// Number of loads started so far, successful or not.
    pub fn attempts(&self) -> u64 {
        self.lock().attempts
    }

    /// Returns the capability, loading it first when necessary.
    pub async fn acquire(&self) -> Result<CapabilityHandle, LoadError> {
        let (attempt, load) = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            match &inner.slot {
                Slot::Loaded(handle) => return Ok(Arc::clone(handle)),
                Slot::Loading { attempt, load } => {
                    debug!(
                        "Joining in-flight load #{} of {}",
                        attempt,
                        self.source.describe()
                    );
                    (*attempt, load.clone())
                }
                Slot::Idle => {
                    if let Some(handle) = self.source.present() {
                        info!("Using available capability '{}'", handle.name());
                        inner.slot = Slot::Loaded(Arc::clone(&handle));
                        return Ok(handle);
                    }

                    inner.attempts += 1;
                    let attempt = inner.attempts;
                    info!("Loading {} (attempt {})", self.source.describe(), attempt);
                    let load = self.source.load().shared();
                    inner.slot = Slot::Loading {
                        attempt,
                        load: load.clone(),
                    };
                    (attempt, load)
                }
            }
        };

        let outcome = load.await;

        let mut inner = self.lock();
        if matches!(&inner.slot, Slot::Loading { attempt: current, .. } if *current == attempt) {
            inner.slot = match &outcome {
                Ok(handle) => {
                    info!("Capability '{}' is ready", handle.name());
                    Slot::Loaded(Arc::clone(handle))
                }
                Err(err) => {
                    warn!("Loading {} failed: {}", self.source.describe(), err);
                    Slot::Idle
                }
            };
        }

        outcome
    }
}

/// The PDF standard Helvetica family; always available.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinSource;

impl CapabilitySource for BuiltinSource {
    fn describe(&self) -> String {
        "built-in standard fonts".to_owned()
    }

    fn present(&self) -> Option<CapabilityHandle> {
        Some(Arc::new(BuiltinCapability))
    }

    fn load(&self) -> BoxFuture<'static, Result<CapabilityHandle, LoadError>> {
        let handle: CapabilityHandle = Arc::new(BuiltinCapability);
        futures::future::ready(Ok(handle)).boxed()
    }
}

/// A TrueType family read from the first directory that contains all four faces.
#[derive(Clone, Debug)]
pub struct FontDirSource {
    candidates: Vec<PathBuf>,
    family: String,
}

impl FontDirSource {
    /// Searches exactly `candidates`, in order, for `family`.
    pub fn new(candidates: Vec<PathBuf>, family: impl Into<String>) -> Self {
        Self {
            candidates,
            family: family.into(),
        }
    }

    /// Searches `explicit` (if any) followed by the default font directories.
    pub fn discover(explicit: Option<PathBuf>) -> Self {
        Self::new(
            fonts::font_directory_candidates(explicit.as_deref()),
            fonts::DEFAULT_FONT_FAMILY_NAME,
        )
    }
}

fn classify_font_error(err: &genpdf::error::Error) -> LoadError {
    use genpdf::error::ErrorKind;
    use std::io;

    match err.kind() {
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied =>
        {
            LoadError::MissingFonts(err.to_string())
        }
        _ => LoadError::Malformed(err.to_string()),
    }
}

impl CapabilitySource for FontDirSource {
    fn describe(&self) -> String {
        format!("font family '{}' from disk", self.family)
    }

    fn load(&self) -> BoxFuture<'static, Result<CapabilityHandle, LoadError>> {
        let candidates = self.candidates.clone();
        let family = self.family.clone();

        async move {
            let name = family.clone();
            let loaded = tokio::task::spawn_blocking(move || {
                fonts::load_font_family(&candidates, &family)
                    .map_err(|err| classify_font_error(&err))
            })
            .await
            .map_err(|err| LoadError::Interrupted(err.to_string()))??;

            let handle: CapabilityHandle = Arc::new(EmbeddedCapability::new(name, loaded));
            Ok(handle)
        }
        .boxed()
    }
}

/// A TrueType family downloaded from `<base_url>/<Family>-<Style>.ttf`.
#[cfg(feature = "remote")]
#[derive(Clone, Debug)]
pub struct RemoteFontSource {
    base_url: String,
    family: String,
}

#[cfg(feature = "remote")]
impl RemoteFontSource {
    /// Fetches `family` from `base_url` on first use.
    pub fn new(base_url: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            family: family.into(),
        }
    }

    fn urls(&self) -> Vec<String> {
        let base = self.base_url.trim_end_matches('/');
        fonts::face_files(&self.family)
            .into_iter()
            .map(|file| format!("{base}/{file}"))
            .collect()
    }
}

#[cfg(feature = "remote")]
async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, LoadError> {
    let fetch_error = |err: reqwest::Error| LoadError::Fetch {
        url: url.to_owned(),
        reason: err.to_string(),
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(fetch_error)?
        .error_for_status()
        .map_err(fetch_error)?;
    let bytes = response.bytes().await.map_err(fetch_error)?;
    debug!("Fetched {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}

#[cfg(feature = "remote")]
impl CapabilitySource for RemoteFontSource {
    fn describe(&self) -> String {
        format!("font family '{}' from {}", self.family, self.base_url)
    }

    fn load(&self) -> BoxFuture<'static, Result<CapabilityHandle, LoadError>> {
        let urls = self.urls();
        let family = self.family.clone();

        async move {
            let client = reqwest::Client::new();
            let mut faces: [Vec<u8>; 4] = Default::default();
            for (face, url) in faces.iter_mut().zip(&urls) {
                *face = fetch_bytes(&client, url).await?;
            }

            let loaded = fonts::family_from_bytes(faces)
                .map_err(|err| LoadError::Malformed(err.to_string()))?;
            let handle: CapabilityHandle = Arc::new(EmbeddedCapability::new(family, loaded));
            Ok(handle)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use tokio::sync::Notify;

    use crate::canvas::RecordingCapability;

    struct GatedSource {
        gate: Arc<Notify>,
        loads: Arc<AtomicUsize>,
        fail_first: Arc<AtomicBool>,
    }

    impl GatedSource {
        fn new() -> Self {
            Self {
                gate: Arc::new(Notify::new()),
                loads: Arc::new(AtomicUsize::new(0)),
                fail_first: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    impl CapabilitySource for GatedSource {
        fn describe(&self) -> String {
            "gated test source".to_owned()
        }

        fn load(&self) -> BoxFuture<'static, Result<CapabilityHandle, LoadError>> {
            let gate = Arc::clone(&self.gate);
            let loads = Arc::clone(&self.loads);
            let fail = self.fail_first.swap(false, Ordering::SeqCst);
            async move {
                loads.fetch_add(1, Ordering::SeqCst);
                gate.notified().await;
                if fail {
                    return Err(LoadError::Fetch {
                        url: "https://fonts.invalid/Roboto-Regular.ttf".to_owned(),
                        reason: "connection refused".to_owned(),
                    });
                }
                let handle: CapabilityHandle = Arc::new(RecordingCapability);
                Ok(handle)
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_load() {
        let source = GatedSource::new();
        let gate = Arc::clone(&source.gate);
        let loads = Arc::clone(&source.loads);
        let loader = Loader::new(source);

        let (first, second, ()) = tokio::join!(loader.acquire(), loader.acquire(), async {
            tokio::task::yield_now().await;
            assert_eq!(
                loader.state(),
                LoaderState {
                    is_loading: true,
                    is_loaded: false
                }
            );
            gate.notify_one();
        });

        let first = first.expect("first caller");
        let second = second.expect("second caller");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(loader.attempts(), 1);
        assert_eq!(
            loader.state(),
            LoaderState {
                is_loading: false,
                is_loaded: true
            }
        );
    }

    #[tokio::test]
    async fn loaded_capability_is_reused() {
        let source = GatedSource::new();
        source.gate.notify_one();
        let loader = Loader::new(source);

        let first = loader.acquire().await.expect("first load");
        let second = loader.acquire().await.expect("cached");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.attempts(), 1);
    }

    #[tokio::test]
    async fn failure_resets_state_and_allows_retry() {
        let source = GatedSource::new();
        source.fail_first.store(true, Ordering::SeqCst);
        let gate = Arc::clone(&source.gate);
        let loader = Loader::new(source);

        gate.notify_one();
        let err = loader.acquire().await.err().expect("first load fails");
        assert!(matches!(err, LoadError::Fetch { .. }));
        assert_eq!(loader.state(), LoaderState::default());

        gate.notify_one();
        let handle = loader.acquire().await.expect("retry succeeds");
        assert_eq!(handle.name(), "recording");
        assert_eq!(loader.attempts(), 2);
        assert!(loader.state().is_loaded);
    }

    #[tokio::test]
    async fn concurrent_waiters_see_the_same_failure() {
        let source = GatedSource::new();
        source.fail_first.store(true, Ordering::SeqCst);
        let gate = Arc::clone(&source.gate);
        let loader = Loader::new(source);

        let (first, second, ()) = tokio::join!(loader.acquire(), loader.acquire(), async {
            tokio::task::yield_now().await;
            gate.notify_one();
        });

        assert_eq!(first.err(), second.err());
        assert_eq!(loader.attempts(), 1);
        assert_eq!(loader.state(), LoaderState::default());
    }

    #[tokio::test]
    async fn present_capability_skips_loading() {
        let loader = Loader::new(BuiltinSource);
        let handle = loader.acquire().await.expect("builtin");
        assert_eq!(handle.name(), "builtin-helvetica");
        assert_eq!(loader.attempts(), 0);
        assert!(loader.state().is_loaded);
    }

    #[tokio::test]
    async fn missing_font_directory_is_a_load_failure() {
        let loader = Loader::new(FontDirSource::new(
            vec![PathBuf::from("/__ancoras_missing_fonts__")],
            "Roboto",
        ));
        let err = loader.acquire().await.err().expect("no fonts");
        assert!(matches!(err, LoadError::MissingFonts(_)), "{err:?}");
        assert_eq!(loader.state(), LoaderState::default());
    }
}
