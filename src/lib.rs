pub mod constants;
pub mod cross_section;
pub mod density;
pub mod hcnm_errors;
pub mod horizon_crossing;
pub mod optical_depth;
pub mod orbit_geometry;
pub mod planet;
