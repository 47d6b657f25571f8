//! Unit types and physical constants.

use uom::si::f64::ThermodynamicTemperature as UomThermodynamicTemperature;

/// Absolute temperature (SI, f64)
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

pub mod constants {
    /// Molar gas constant [J/(mol·K)]
    pub const R_J_PER_MOL_K: f64 = 8.314;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kelvin_is_the_base_unit() {
        assert_eq!(k(1873.0).value, 1873.0);
    }
}
