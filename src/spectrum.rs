#![allow(dead_code)]
use crate::backend::{SampleError, SourceImage};
use crate::point::ClickPoint;
use crate::sampler::SpectrumSampler;
use crate::wavelengths::WavelengthList;
use std::fmt;

/// One reflectance spectrum: (wavelength nm, reflectance) pairs in band
/// order, ready for the plot collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pairs: Vec<(f64, f64)>,
}

impl Spectrum {
    pub fn pairs(&self) -> &[(f64, f64)] {
        &self.pairs
    }

    pub fn wavelengths(&self) -> impl Iterator<Item = f64> + '_ {
        self.pairs.iter().map(|(wl, _)| *wl)
    }

    pub fn reflectances(&self) -> impl Iterator<Item = f64> + '_ {
        self.pairs.iter().map(|(_, r)| *r)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for Spectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = self
            .reflectances()
            .fold(f64::INFINITY, |a, b| a.min(b));
        let max = self
            .reflectances()
            .fold(f64::NEG_INFINITY, |a, b| a.max(b));

        write!(
            f,
            "Spectrum: {} bands, reflectance range [{:.4}, {:.4}]",
            self.len(),
            min,
            max
        )
    }
}

#[derive(Debug)]
pub enum ResolutionError {
    Sample(SampleError),
    LengthMismatch { wavelengths: usize, samples: usize },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::Sample(e) => write!(f, "{}", e),
            ResolutionError::LengthMismatch {
                wavelengths,
                samples,
            } => write!(
                f,
                "Schema mismatch: {} wavelengths but {} sampled bands",
                wavelengths, samples
            ),
        }
    }
}

impl std::error::Error for ResolutionError {}

impl From<SampleError> for ResolutionError {
    fn from(err: SampleError) -> ResolutionError {
        ResolutionError::Sample(err)
    }
}

/// The one piece of orchestration: turn a map click into a plottable
/// spectrum. Stateless; safe to invoke concurrently against a shared image.
pub struct ClickToSpectrum {
    sampler: SpectrumSampler,
}

impl Default for ClickToSpectrum {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickToSpectrum {
    pub fn new() -> Self {
        Self {
            sampler: SpectrumSampler::new(),
        }
    }

    /// Samples the image at the point and pairs each value positionally with
    /// its wavelength. A length mismatch is a schema error, never a
    /// truncation: a shorter zip would silently misalign bands.
    pub fn resolve(
        &self,
        image: &dyn SourceImage,
        wavelengths: &WavelengthList,
        point: ClickPoint,
    ) -> Result<Spectrum, ResolutionError> {
        let samples = self.sampler.sample(image, point)?;

        if samples.len() != wavelengths.len() {
            return Err(ResolutionError::LengthMismatch {
                wavelengths: wavelengths.len(),
                samples: samples.len(),
            });
        }

        let pairs = wavelengths.iter().zip(samples).collect();
        Ok(Spectrum { pairs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Extent, MemoryImage};

    fn test_image() -> MemoryImage {
        let mut image = MemoryImage::new(
            2,
            2,
            Extent {
                xmin: -120.0,
                xmax: -118.0,
                ymin: 36.0,
                ymax: 38.0,
            },
        );
        image.push_flat_band("B001", 0.12);
        image.push_flat_band("B002", 0.15);
        image
    }

    #[test]
    fn test_resolve_pairs_wavelengths_with_samples() {
        let image = test_image();
        let wavelengths = WavelengthList::new(vec![450.5, 460.1]);
        let point = ClickPoint::new(37.0, -119.0).unwrap();

        let spectrum = ClickToSpectrum::new()
            .resolve(&image, &wavelengths, point)
            .unwrap();

        assert_eq!(spectrum.pairs(), &[(450.5, 0.12), (460.1, 0.15)]);
    }

    #[test]
    fn test_resolve_fails_on_length_mismatch() {
        let image = test_image();
        let wavelengths = WavelengthList::new(vec![450.5, 460.1, 470.3]);
        let point = ClickPoint::new(37.0, -119.0).unwrap();

        let err = ClickToSpectrum::new()
            .resolve(&image, &wavelengths, point)
            .unwrap_err();

        assert!(matches!(
            err,
            ResolutionError::LengthMismatch {
                wavelengths: 3,
                samples: 2
            }
        ));
    }

    #[test]
    fn test_resolve_propagates_sample_errors() {
        let image = test_image();
        let wavelengths = WavelengthList::new(vec![450.5, 460.1]);
        let point = ClickPoint::new(0.0, 0.0).unwrap();

        let err = ClickToSpectrum::new()
            .resolve(&image, &wavelengths, point)
            .unwrap_err();

        assert!(matches!(err, ResolutionError::Sample(_)));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let image = test_image();
        let wavelengths = WavelengthList::new(vec![450.5, 460.1]);
        let point = ClickPoint::new(37.0, -119.0).unwrap();

        let resolver = ClickToSpectrum::new();
        let first = resolver.resolve(&image, &wavelengths, point).unwrap();
        let second = resolver.resolve(&image, &wavelengths, point).unwrap();

        assert_eq!(first, second);
    }
}
