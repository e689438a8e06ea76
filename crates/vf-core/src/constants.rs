//! Standards constants for valve sizing.
//!
//! Numerical constants tie the engineering units of [`UnitSystem`] to the
//! flow coefficient Cv. Values follow the sizing tables of ISA 75.01 /
//! IEC 60534-2-1 as used throughout valveflow.

use crate::units::UnitSystem;

/// Numerical constants N1, N2, N4, N6 and N9 for one unit system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingConstants {
    /// Liquid sizing.
    pub n1: f64,
    /// Reynolds number (diameter term).
    pub n2: f64,
    /// Reynolds number (flow term).
    pub n4: f64,
    /// Gas sizing, choked.
    pub n6: f64,
    /// Gas sizing, unchoked.
    pub n9: f64,
}

impl SizingConstants {
    /// m³/h, bar, kg/m³, mm
    pub const METRIC: Self = Self {
        n1: 0.0865,
        n2: 0.00214,
        n4: 7600.0,
        n6: 0.0373,
        n9: 0.0948,
    };

    /// gpm, psi, lb/ft³, in
    pub const IMPERIAL: Self = Self {
        n1: 1.0,
        n2: 0.00214,
        n4: 7600.0,
        n6: 63.3,
        n9: 1360.0,
    };

    pub fn for_units(units: UnitSystem) -> &'static Self {
        match units {
            UnitSystem::Metric => &Self::METRIC,
            UnitSystem::Imperial => &Self::IMPERIAL,
        }
    }
}

/// Universal gas constant, J/(kmol·K).
pub const R_GAS: f64 = 8314.0;

/// Water density used for specific gravity, kg/m³.
pub const WATER_DENSITY_KG_M3: f64 = 1000.0;

/// Water density used for specific gravity, lb/ft³.
pub const WATER_DENSITY_LB_FT3: f64 = 62.4;

/// Air density at reference conditions, kg/m³.
pub const AIR_DENSITY_REF_KG_M3: f64 = 1.225;

/// Reference sound power (1 pW).
pub const REFERENCE_SOUND_POWER_W: f64 = 1e-12;

pub const STEEL_DENSITY_KG_M3: f64 = 7850.0;

/// Empirical Cv per square inch of valve flow area.
///
/// Not taken from a standard; results derived from it are estimates only.
pub const CV_PER_SQUARE_INCH: f64 = 29.9;

pub const SQUARE_INCH_M2: f64 = 0.000_645_16;

/// Specific gravity reference density for `units`.
pub fn water_density(units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => WATER_DENSITY_KG_M3,
        UnitSystem::Imperial => WATER_DENSITY_LB_FT3,
    }
}

/// Valve flow area in m² estimated from Cv.
pub fn valve_area_from_cv(cv: f64) -> f64 {
    cv / CV_PER_SQUARE_INCH * SQUARE_INCH_M2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_follow_unit_system() {
        assert_eq!(SizingConstants::for_units(UnitSystem::Metric).n1, 0.0865);
        assert_eq!(SizingConstants::for_units(UnitSystem::Imperial).n9, 1360.0);
        assert_eq!(
            SizingConstants::for_units(UnitSystem::Metric).n4,
            SizingConstants::for_units(UnitSystem::Imperial).n4
        );
    }

    #[test]
    fn valve_area_scales_linearly() {
        let a1 = valve_area_from_cv(29.9);
        assert!((a1 - SQUARE_INCH_M2).abs() < 1e-15);
        assert!((valve_area_from_cv(59.8) - 2.0 * a1).abs() < 1e-15);
    }
}
