use ripple_graph::FilterPolicy;
use ripple_project::RippleConfig;

/// Combines the configured package selection with the one given on the
/// command line.
///
/// Non-empty command line pattern lists replace the configured ones. Private
/// packages are selected only if both allow it.
#[must_use]
pub fn effective_filter(config: &RippleConfig, requested: &FilterPolicy) -> FilterPolicy {
    let pick = |requested: &[String], configured: &[String]| {
        if requested.is_empty() {
            configured.to_vec()
        } else {
            requested.to_vec()
        }
    };

    FilterPolicy {
        include: pick(&requested.include, config.include()),
        exclude: pick(&requested.exclude, config.exclude()),
        include_private: requested.include_private && config.include_private(),
    }
}
