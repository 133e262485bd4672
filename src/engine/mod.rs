// ==========================================
// Offshore Logistics - Resolution Engines
// ==========================================
// Scope: text matching, location / vessel resolution, LC classification
// Rule: engines are pure over a ReferenceCatalog; no file I/O,
// every negative outcome carries a reason
// ==========================================

pub mod lc_classifier;
pub mod location_resolver;
pub mod text_match;
pub mod vessel_resolver;

pub use lc_classifier::{department_fallback, ClassificationOutcome, LcClassifier};
pub use location_resolver::{LocationResolution, LocationResolver, UnresolvedReason};
pub use vessel_resolver::{VesselResolution, VesselResolver};
