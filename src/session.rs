use crate::backend::{SampleError, SourceImage};
use crate::point::ClickPoint;
use crate::spectrum::{ClickToSpectrum, ResolutionError, Spectrum};
use crate::wavelengths::{SchemaError, WavelengthExtractor, WavelengthList};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// The plot widget seam. The session never panics into the UI: every failure
/// arrives here as a message.
pub trait PlotSink: Send + Sync {
    fn render(&self, spectrum: &Spectrum);
    fn render_error(&self, message: &str);
}

/// Guards against out-of-order replies when clicks overlap: a reply only
/// renders if it is fresher than everything rendered so far
/// (last-response-wins).
pub struct RenderGate {
    last_rendered: AtomicU64,
}

impl Default for RenderGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderGate {
    pub fn new() -> Self {
        Self {
            last_rendered: AtomicU64::new(0),
        }
    }

    pub fn try_claim(&self, sequence: u64) -> bool {
        let mut seen = self.last_rendered.load(Ordering::Acquire);
        loop {
            if sequence <= seen {
                return false;
            }
            match self.last_rendered.compare_exchange(
                seen,
                sequence,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(current) => seen = current,
            }
        }
    }
}

/// Per-page-session state: one fetched image, its wavelength list derived
/// once, and the click plumbing around `ClickToSpectrum`.
///
/// Construction is the explicit setup step; dropping the session tears it
/// down. The image and wavelength list are read-only afterwards, so click
/// handlers may run concurrently without locking.
pub struct ClickSession {
    image: Arc<dyn SourceImage>,
    wavelengths: WavelengthList,
    resolver: ClickToSpectrum,
    max_sample_retries: u32,
    next_click: AtomicU64,
    gate: RenderGate,
}

impl ClickSession {
    pub fn new(image: Arc<dyn SourceImage>, max_sample_retries: u32) -> Result<Self, SchemaError> {
        let wavelengths = WavelengthExtractor::new().extract(image.metadata())?;

        Ok(Self {
            image,
            wavelengths,
            resolver: ClickToSpectrum::new(),
            max_sample_retries,
            next_click: AtomicU64::new(0),
            gate: RenderGate::new(),
        })
    }

    pub fn wavelengths(&self) -> &WavelengthList {
        &self.wavelengths
    }

    /// Resolves one click and hands the result to the plot. Stale successes
    /// are dropped; failures always reach the user as a message.
    pub fn handle_click(&self, point: ClickPoint, plot: &dyn PlotSink) {
        let sequence = self.next_click.fetch_add(1, Ordering::Relaxed) + 1;

        match self.resolve_with_retry(point) {
            Ok(spectrum) => {
                if self.gate.try_claim(sequence) {
                    plot.render(&spectrum);
                }
            }
            Err(e) => plot.render_error(&e.to_string()),
        }
    }

    // Only transient backend failures are retried. Out-of-bounds points,
    // schema errors and length mismatches are deterministic and fail
    // immediately.
    fn resolve_with_retry(&self, point: ClickPoint) -> Result<Spectrum, ResolutionError> {
        let mut attempt = 0;
        loop {
            match self
                .resolver
                .resolve(self.image.as_ref(), &self.wavelengths, point)
            {
                Err(ResolutionError::Sample(SampleError::Backend(cause)))
                    if attempt < self.max_sample_retries =>
                {
                    attempt += 1;
                    eprintln!("Backend failure, retrying ({}): {}", attempt, cause);
                }
                result => return result,
            }
        }
    }
}
