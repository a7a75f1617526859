//! Pressure Unit Conversion
//!
//! The transducer is specified in pascals per volt, the history is kept in
//! PSI and the status page also shows kPa.

/// PSI per pascal
pub const PSI_PER_PASCAL: f64 = 0.00014503773773020923;

/// Convert pascals to PSI
pub fn pascal_to_psi(pa: f64) -> f64 {
    pa * PSI_PER_PASCAL
}

/// Convert PSI to pascals
pub fn psi_to_pascal(psi: f64) -> f64 {
    psi / PSI_PER_PASCAL
}

/// Convert PSI to kPa
pub fn psi_to_kpa(psi: f64) -> f64 {
    psi_to_pascal(psi) / 1000.0
}
