pub mod accessibility;
pub mod coverage;
pub mod infrastructure;
pub mod redundancy;
pub mod risk_mitigation;
pub mod vulnerability;

pub use accessibility::AccessibilityLayer;
pub use coverage::CoverageLayer;
pub use infrastructure::InfrastructureLayer;
pub use redundancy::RedundancyLayer;
pub use risk_mitigation::RiskMitigationLayer;
pub use vulnerability::VulnerabilityLayer;

use crate::layer::ScoreLayer;

/// Build the default six-factor layer stack.
///
/// 1. CoverageLayer -- population covered
/// 2. RiskMitigationLayer -- population-weighted risk covered
/// 3. VulnerabilityLayer -- vulnerable population covered
/// 4. AccessibilityLayer -- average drive time against the limit
/// 5. InfrastructureLayer -- site access quality
/// 6. RedundancyLayer -- backup coverage of already served points
pub fn default_layers() -> Vec<Box<dyn ScoreLayer>> {
    vec![
        Box::new(CoverageLayer),
        Box::new(RiskMitigationLayer),
        Box::new(VulnerabilityLayer),
        Box::new(AccessibilityLayer),
        Box::new(InfrastructureLayer),
        Box::new(RedundancyLayer),
    ]
}
