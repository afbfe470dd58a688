// Floating point comparisons
pub const FEQ_EPSILON: f32 = 0.0001;

// Geometric tolerance. One value for every call site: the parallel-ray
// guard, the degenerate-basis guard, self-intersection rejection and the
// shadow distance comparison.
pub const GEOM_EPSILON: f32 = 0.0001;

// Ray horizon; hits beyond this parameter are discarded
pub const MAX_DISTANCE: f32 = f32::MAX;

// Default recursion depth for the reflective/refractive drivers
pub const RECURSION_DEPTH: u32 = 5;

// Visible spectrum bounds in nanometers, and the number of monochromatic
// sub-rays a dispersive refraction event fans into
pub const VISIBLE_SPECTRUM_START: f32 = 380.0;
pub const VISIBLE_SPECTRUM_END: f32 = 780.0;
pub const SPECTRUM_SAMPLES: usize = 10;

// Common refraction indices
pub const VACUUM_RI: f32 = 1.0;
pub const AIR_RI: f32 = 1.00029;
pub const WATER_RI: f32 = 1.333;
pub const GLASS_RI: f32 = 1.52;
pub const DIAMOND_RI: f32 = 2.417;

// Cauchy pair for BK7 borosilicate glass. B is in nanometers squared and
// far larger than the physical value, so the spectrum separates visibly
// at screen resolution.
pub const BK7_CAUCHY_A: f32 = 1.5046;
pub const BK7_CAUCHY_B: f32 = 420_000.0;
