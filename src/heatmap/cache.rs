use crate::config::HeatmapConfig;
use crate::coord::Viewport;
use crate::error::HeatmapError;
use crate::heatmap::{HeatmapFrame, compose};
use crate::sample::SampleSet;
use tracing::trace;

#[derive(Debug, Clone)]
struct CachedFrame {
    version: u64,
    viewport: Viewport,
    frame: HeatmapFrame,
}

/// Memoizes [`compose`] on `(sample-set version, viewport)`.
///
/// Redraws that see the same samples and the same viewport reuse the last frame.
/// Adding samples to the set gives it a new version, which invalidates the entry.
///
/// # Example
/// ```
/// use geoheat::{CachedComposer, HeatmapConfig, HeatmapError, LocationSample, SampleSet, Viewport};
///
/// let mut samples = SampleSet::new();
/// samples.push(LocationSample::now(40.0, -73.0));
///
/// let viewport = Viewport::new(&(40.0, -73.0), 0.1, 0.1, 200.0, 200.0);
/// let mut composer = CachedComposer::new(HeatmapConfig::default())?;
///
/// assert_eq!(composer.compose(&samples, &viewport).len(), 1);
/// samples.push(LocationSample::now(41.0, -73.0));
/// assert_eq!(composer.compose(&samples, &viewport).len(), 2);
/// # Ok::<(), HeatmapError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CachedComposer {
    config: HeatmapConfig,
    cached: Option<CachedFrame>,
}

impl CachedComposer {
    /// Fails with [`HeatmapError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: HeatmapConfig) -> Result<Self, HeatmapError> {
        config.validate()?;
        Ok(Self {
            config,
            cached: None,
        })
    }

    pub fn config(&self) -> &HeatmapConfig {
        &self.config
    }

    /// Returns the frame for `samples` in `viewport`, recomputing only when either changed.
    pub fn compose(&mut self, samples: &SampleSet, viewport: &Viewport) -> &HeatmapFrame {
        let entry = match self.cached.take() {
            Some(cached) if cached.version == samples.version() && cached.viewport == *viewport => {
                trace!(version = samples.version(), "heatmap cache hit");
                cached
            }
            _ => CachedFrame {
                version: samples.version(),
                viewport: *viewport,
                frame: compose(samples.samples(), viewport, &self.config),
            },
        };

        &self.cached.insert(entry).frame
    }

    /// Whether the next `compose` with these inputs would be served from cache.
    pub fn is_cached(&self, samples: &SampleSet, viewport: &Viewport) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|c| c.version == samples.version() && c.viewport == *viewport)
    }

    /// Drops the cached frame.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::FrameStatus;
    use crate::sample::LocationSample;
    use claims::assert_matches;

    fn viewport() -> Viewport {
        Viewport::new(&(40.0, -73.0), 0.2, 0.2, 200.0, 200.0)
    }

    fn composer() -> CachedComposer {
        CachedComposer::new(HeatmapConfig::default()).unwrap()
    }

    fn samples() -> SampleSet {
        vec![
            LocationSample::now(40.001, -73.001),
            LocationSample::now(40.002, -73.002),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_matches_uncached_compose() {
        let set = samples();
        let mut composer = composer();

        let expected = compose(set.samples(), &viewport(), &HeatmapConfig::default());
        assert_eq!(composer.compose(&set, &viewport()), &expected);
    }

    #[test]
    fn test_hit_on_same_inputs() {
        let set = samples();
        let mut composer = composer();

        assert!(!composer.is_cached(&set, &viewport()));
        composer.compose(&set, &viewport());
        assert!(composer.is_cached(&set, &viewport()));
    }

    #[test]
    fn test_insertion_invalidates() {
        let mut set = samples();
        let mut composer = composer();
        composer.compose(&set, &viewport());

        set.push(LocationSample::now(40.003, -73.003));
        assert!(!composer.is_cached(&set, &viewport()));

        let frame = composer.compose(&set, &viewport());
        assert_eq!(frame.circles[0].count, 3);
    }

    #[test]
    fn test_viewport_change_recomputes() {
        let set = samples();
        let mut composer = composer();
        let before = composer.compose(&set, &viewport()).clone();

        let panned = Viewport::new(&(40.05, -73.0), 0.2, 0.2, 200.0, 200.0);
        let after = composer.compose(&set, &panned).clone();

        assert_ne!(before.circles[0].y, after.circles[0].y);
        assert_eq!(before.circles[0].x, after.circles[0].x);
    }

    #[test]
    fn test_invalid_viewport_is_cached_too() {
        let set = samples();
        let mut composer = composer();
        let degenerate = Viewport::new(&(40.0, -73.0), 0.0, 0.0, 200.0, 200.0);

        assert_eq!(
            composer.compose(&set, &degenerate).status,
            FrameStatus::InvalidViewport
        );
        assert!(composer.is_cached(&set, &degenerate));

        composer.invalidate();
        assert!(!composer.is_cached(&set, &degenerate));
    }

    #[test]
    fn test_separate_sets_do_not_share_an_entry() {
        let a: SampleSet = vec![LocationSample::now(40.0, -73.0)].into_iter().collect();
        let b: SampleSet = vec![LocationSample::now(40.05, -73.05); 3]
            .into_iter()
            .collect();
        let mut composer = composer();

        assert_eq!(composer.compose(&a, &viewport()).circles[0].count, 1);
        assert!(!composer.is_cached(&b, &viewport()));

        let frame = composer.compose(&b, &viewport());
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.circles[0].count, 3);
    }

    #[test]
    fn test_clone_then_diverge_recomputes() {
        let original = samples();
        let mut copy = original.clone();
        let mut composer = composer();

        composer.compose(&original, &viewport());
        assert!(composer.is_cached(&copy, &viewport()));

        copy.push(LocationSample::now(40.1, -73.1));
        assert!(!composer.is_cached(&copy, &viewport()));
        assert_eq!(composer.compose(&copy, &viewport()).len(), 2);
        assert_eq!(composer.compose(&original, &viewport()).len(), 1);
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert_matches!(
            CachedComposer::new(HeatmapConfig::default().grid_resolution(f64::NAN)),
            Err(HeatmapError::InvalidConfig(_))
        );
        assert_matches!(
            CachedComposer::new(HeatmapConfig::default().saturation(-2.0)),
            Err(HeatmapError::InvalidConfig(_))
        );
    }
}
