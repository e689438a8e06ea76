// vf-core/src/units.rs

use serde::{Deserialize, Serialize};
use uom::si::f64::{
    Length as UomLength, MassDensity as UomMassDensity, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Density = UomMassDensity;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

/// Engineering unit system of a calculation request.
///
/// Raw numbers handed to the engines are interpreted in the units listed
/// below. Temperatures are always absolute.
///
/// | quantity        | metric  | imperial |
/// |-----------------|---------|----------|
/// | pressure        | bar(a)  | psia     |
/// | temperature     | K       | °R       |
/// | liquid flow     | m³/h    | US gpm   |
/// | gas flow        | m³/h    | ft³/h    |
/// | density         | kg/m³   | lb/ft³   |
/// | pipe diameter   | mm      | in       |
/// | viscosity       | cSt     | cSt      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn pressure(self, v: f64) -> Pressure {
        use uom::si::pressure::{bar, psi};
        match self {
            UnitSystem::Metric => Pressure::new::<bar>(v),
            UnitSystem::Imperial => Pressure::new::<psi>(v),
        }
    }

    /// Express `p` back in this system's pressure unit.
    pub fn pressure_value(self, p: Pressure) -> f64 {
        use uom::si::pressure::{bar, psi};
        match self {
            UnitSystem::Metric => p.get::<bar>(),
            UnitSystem::Imperial => p.get::<psi>(),
        }
    }

    pub fn temperature(self, v: f64) -> Temperature {
        use uom::si::thermodynamic_temperature::{degree_rankine, kelvin};
        match self {
            UnitSystem::Metric => Temperature::new::<kelvin>(v),
            UnitSystem::Imperial => Temperature::new::<degree_rankine>(v),
        }
    }

    pub fn diameter(self, v: f64) -> Length {
        use uom::si::length::{inch, millimeter};
        match self {
            UnitSystem::Metric => Length::new::<millimeter>(v),
            UnitSystem::Imperial => Length::new::<inch>(v),
        }
    }

    pub fn liquid_flow(self, v: f64) -> VolumeRate {
        use uom::si::volume_rate::{cubic_meter_per_hour, gallon_per_minute};
        match self {
            UnitSystem::Metric => VolumeRate::new::<cubic_meter_per_hour>(v),
            UnitSystem::Imperial => VolumeRate::new::<gallon_per_minute>(v),
        }
    }

    /// Imperial gas flow is in ft³/h.
    pub fn gas_flow(self, v: f64) -> VolumeRate {
        use uom::si::volume_rate::{cubic_foot_per_second, cubic_meter_per_hour};
        match self {
            UnitSystem::Metric => VolumeRate::new::<cubic_meter_per_hour>(v),
            UnitSystem::Imperial => VolumeRate::new::<cubic_foot_per_second>(v / 3600.0),
        }
    }

    pub fn density(self, v: f64) -> Density {
        use uom::si::mass_density::{kilogram_per_cubic_meter, pound_per_cubic_foot};
        match self {
            UnitSystem::Metric => Density::new::<kilogram_per_cubic_meter>(v),
            UnitSystem::Imperial => Density::new::<pound_per_cubic_foot>(v),
        }
    }

    pub fn pressure_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "bar",
            UnitSystem::Imperial => "psi",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::{
        length::meter, mass_density::kilogram_per_cubic_meter, pressure::pascal,
        thermodynamic_temperature::kelvin, volume_rate::cubic_meter_per_second,
    };

    #[test]
    fn constructors_smoke() {
        assert!((pa(100_000.0).get::<pascal>() - bar(1.0).get::<pascal>()).abs() < 1e-9);
        assert!((mm(25.4).get::<meter>() - 0.0254).abs() < 1e-12);
    }

    #[test]
    fn metric_and_imperial_agree_in_si() {
        let p_metric = UnitSystem::Metric.pressure(1.0).get::<pascal>();
        let p_imperial = UnitSystem::Imperial.pressure(14.503_773_8).get::<pascal>();
        assert!((p_metric - p_imperial).abs() < 1e-6 * p_metric);

        let t = UnitSystem::Imperial.temperature(540.0).get::<kelvin>();
        assert!((t - 300.0).abs() < 1e-9);

        let d = UnitSystem::Imperial.diameter(1.0).get::<meter>();
        assert!((d - 0.0254).abs() < 1e-12);

        let rho = UnitSystem::Imperial
            .density(62.4)
            .get::<kilogram_per_cubic_meter>();
        assert!((rho - 999.55).abs() < 0.1);

        let q = UnitSystem::Metric
            .liquid_flow(3600.0)
            .get::<cubic_meter_per_second>();
        assert!((q - 1.0).abs() < 1e-12);
    }

    #[test]
    fn values_round_trip_through_si() {
        for units in [UnitSystem::Metric, UnitSystem::Imperial] {
            let p = units.pressure_value(units.pressure(7.5));
            assert!((p - 7.5).abs() < 1e-9);
        }
    }

    #[test]
    fn imperial_gas_flow_is_per_hour() {
        let q = UnitSystem::Imperial
            .gas_flow(3600.0)
            .get::<cubic_meter_per_second>();
        assert!((q - 0.028_316_846_592).abs() < 1e-12);

        let q = UnitSystem::Metric.gas_flow(3600.0).get::<cubic_meter_per_second>();
        assert!((q - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unit_system_defaults_to_metric() {
        assert_eq!(UnitSystem::default(), UnitSystem::Metric);
        assert_eq!(UnitSystem::Imperial.pressure_label(), "psi");
    }
}
