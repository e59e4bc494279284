/// Mean Earth radius used by the great-circle distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average road speed assumed by the closed-form drive-time estimate.
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 60.0;

pub const MIN_COVERAGE_RADIUS_KM: f64 = 20.0;
pub const MAX_COVERAGE_RADIUS_KM: f64 = 80.0;

/// Radius assumed for a manually placed site that does not specify one.
pub const DEFAULT_SITE_RADIUS_KM: f64 = 50.0;

pub const MAX_FACILITIES: usize = 20;
pub const MIN_DRIVE_TIME_MINUTES: f64 = 10.0;
pub const MAX_DRIVE_TIME_MINUTES: f64 = 120.0;

pub const MIN_SEVERITY: f64 = 0.5;
pub const MAX_SEVERITY: f64 = 3.0;

/// Number of critical gaps reported by the gap analysis.
pub const CRITICAL_GAP_LIMIT: usize = 10;

/// Share of the covered population assumed to need service on a given day.
pub const DAILY_DEMAND_SHARE: f64 = 0.1;

/// Preferred band for `required / capacity`; candidates inside it get a bonus.
pub const PREFERRED_UTILIZATION: (f64, f64) = (0.7, 0.9);
pub const UTILIZATION_BONUS: f64 = 1.1;

/// Upper bound for any daily throughput estimate.
pub const MAX_DAILY_CAPACITY: u32 = 6000;

/// Acres taken by one parked vehicle (about 200 sq ft).
pub const ACRES_PER_VEHICLE: f64 = 0.0046;
/// Two-hour processing over a twelve-hour operating day.
pub const VEHICLE_CYCLES_PER_DAY: f64 = 6.0;
pub const PEOPLE_PER_VEHICLE: u32 = 2;
pub const SQ_FT_PER_ACRE: f64 = 43560.0;
pub const SQ_FT_PER_PERSON: f64 = 100.0;

/// Scale that turns a normalized 0-1 score into people-equivalents so it is
/// commensurable with population counts in the composite score.
pub const NORMALIZED_TERM_SCALE: f64 = 1000.0;
pub const REDUNDANCY_TERM_SCALE: f64 = 500.0;

/// Factor applied to the redundancy credit when redundancy planning is off.
pub const REDUNDANCY_DISABLED_SCALE: f64 = 0.2;

/// Bounds on how many remaining candidates the selector scores per iteration.
pub const MIN_CANDIDATE_POOL: usize = 30;
pub const MAX_CANDIDATE_POOL: usize = 50;

/// Upper bound on refinement passes.
pub const MAX_REFINEMENT_PASSES: usize = 3;
