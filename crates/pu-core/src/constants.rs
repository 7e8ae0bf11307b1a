//! Physical constants (CODATA 2018, SI) built from the public constructors.

use crate::quantity::Quantity;
use crate::units::Units;

const U: Units = Units::new();

pub const SPEED_OF_LIGHT_MPS: f64 = 299_792_458.0;
pub const STANDARD_GRAVITY_MPS2: f64 = 9.806_65;
pub const ELEMENTARY_CHARGE_C: f64 = 1.602_176_634e-19;

const VELOCITY: Units = U.length(1).time(-1);
const ENERGY: Units = U.mass(1).length(2).time(-2);
const ACTION: Units = U.mass(1).length(2).time(-1);
const CHARGE: Units = U.time(1).current(1);
const ENTROPY: Units = ENERGY.temperature(-1);

pub fn speed_of_light() -> Quantity {
    Quantity::base(SPEED_OF_LIGHT_MPS, VELOCITY)
}

pub fn planck_constant() -> Quantity {
    Quantity::base(6.626_070_15e-34, ACTION)
}

pub fn reduced_planck_constant() -> Quantity {
    Quantity::base(1.054_571_817e-34, ACTION)
}

pub fn gravitational_constant() -> Quantity {
    Quantity::base(6.674_30e-11, U.length(3).mass(-1).time(-2))
}

pub fn standard_gravity() -> Quantity {
    Quantity::base(STANDARD_GRAVITY_MPS2, U.length(1).time(-2))
}

pub fn elementary_charge() -> Quantity {
    Quantity::base(ELEMENTARY_CHARGE_C, CHARGE)
}

pub fn electron_mass() -> Quantity {
    Quantity::base(9.109_383_701_5e-31, U.mass(1))
}

pub fn proton_mass() -> Quantity {
    Quantity::base(1.672_621_923_69e-27, U.mass(1))
}

pub fn neutron_mass() -> Quantity {
    Quantity::base(1.674_927_498_04e-27, U.mass(1))
}

pub fn rydberg_constant() -> Quantity {
    Quantity::base(10_973_731.568_160, U.length(-1))
}

pub fn rydberg_frequency() -> Quantity {
    Quantity::base(3.289_841_960_250_8e15, U.time(-1))
}

pub fn hartree_energy() -> Quantity {
    Quantity::base(4.359_744_722_207_1e-18, ENERGY)
}

/// One electron volt, in joules.
pub fn electron_volt() -> Quantity {
    Quantity::base(ELEMENTARY_CHARGE_C, ENERGY)
}

pub fn vacuum_permittivity() -> Quantity {
    Quantity::base(8.854_187_812_8e-12, U.length(-3).mass(-1).time(4).current(2))
}

pub fn vacuum_permeability() -> Quantity {
    Quantity::base(1.256_637_062_12e-6, U.length(1).mass(1).time(-2).current(-2))
}

pub fn coulomb_constant() -> Quantity {
    Quantity::base(8.987_551_792_3e9, U.length(3).mass(1).time(-4).current(-2))
}

pub fn faraday_constant() -> Quantity {
    Quantity::base(96_485.332_12, CHARGE.amount(-1))
}

pub fn boltzmann_constant() -> Quantity {
    Quantity::base(1.380_649e-23, ENTROPY)
}

pub fn gas_constant() -> Quantity {
    Quantity::base(8.314_462_618, ENTROPY.amount(-1))
}

pub fn stefan_boltzmann_constant() -> Quantity {
    Quantity::base(5.670_374_419e-8, U.mass(1).time(-3).temperature(-4))
}

pub fn avogadro_constant() -> Quantity {
    Quantity::base(6.022_140_76e23, U.amount(-1))
}

/// Every constant with its conventional name, for listing.
pub fn catalogue() -> Vec<(&'static str, Quantity)> {
    vec![
        ("speed_of_light", speed_of_light()),
        ("planck_constant", planck_constant()),
        ("reduced_planck_constant", reduced_planck_constant()),
        ("gravitational_constant", gravitational_constant()),
        ("standard_gravity", standard_gravity()),
        ("elementary_charge", elementary_charge()),
        ("electron_mass", electron_mass()),
        ("proton_mass", proton_mass()),
        ("neutron_mass", neutron_mass()),
        ("rydberg_constant", rydberg_constant()),
        ("rydberg_frequency", rydberg_frequency()),
        ("hartree_energy", hartree_energy()),
        ("electron_volt", electron_volt()),
        ("vacuum_permittivity", vacuum_permittivity()),
        ("vacuum_permeability", vacuum_permeability()),
        ("coulomb_constant", coulomb_constant()),
        ("faraday_constant", faraday_constant()),
        ("boltzmann_constant", boltzmann_constant()),
        ("gas_constant", gas_constant()),
        ("stefan_boltzmann_constant", stefan_boltzmann_constant()),
        ("avogadro_constant", avogadro_constant()),
    ]
}
