//! World attribute generation from Classic-Traveller style 2D6 tables.
//!
//! Every roll goes through the shared `RandomSource`, in a fixed order:
//! starport, size, atmosphere, hydrographics, population, government, law,
//! tech level, naval base, scout base, gas giant.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;

/// Starport class, best to worst
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Starport {
    A,
    B,
    C,
    D,
    E,
    X,
}

impl Starport {
    /// Starport table: 2-4 A, 5-6 B, 7-8 C, 9 D, 10-11 E, 12 X
    pub fn from_roll(roll: i32) -> Self {
        match roll {
            i32::MIN..=4 => Starport::A,
            5..=6 => Starport::B,
            7..=8 => Starport::C,
            9 => Starport::D,
            10..=11 => Starport::E,
            _ => Starport::X,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Starport::A => 'A',
            Starport::B => 'B',
            Starport::C => 'C',
            Starport::D => 'D',
            Starport::E => 'E',
            Starport::X => 'X',
        }
    }
}

impl fmt::Display for Starport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Two-letter trade classifications
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeCode {
    Ag,
    As,
    Ba,
    De,
    Fl,
    Hi,
    Ic,
    In,
    Lo,
    Na,
    Ni,
    Po,
    Ri,
    Va,
    Wa,
}

impl TradeCode {
    pub fn code(&self) -> &'static str {
        match self {
            TradeCode::Ag => "Ag",
            TradeCode::As => "As",
            TradeCode::Ba => "Ba",
            TradeCode::De => "De",
            TradeCode::Fl => "Fl",
            TradeCode::Hi => "Hi",
            TradeCode::Ic => "Ic",
            TradeCode::In => "In",
            TradeCode::Lo => "Lo",
            TradeCode::Na => "Na",
            TradeCode::Ni => "Ni",
            TradeCode::Po => "Po",
            TradeCode::Ri => "Ri",
            TradeCode::Va => "Va",
            TradeCode::Wa => "Wa",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Base {
    Naval,
    Scout,
}

impl Base {
    pub fn code(&self) -> &'static str {
        match self {
            Base::Naval => "N",
            Base::Scout => "S",
        }
    }
}

/// One generated world
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldRecord {
    pub starport: Starport,
    pub size: u8,
    pub atmosphere: u8,
    pub hydrographics: u8,
    pub population: u8,
    pub government: u8,
    pub law: u8,
    pub tech_level: u8,
    pub trade_codes: BTreeSet<TradeCode>,
    pub bases: BTreeSet<Base>,
    pub gas_giant: bool,
}

/// Extended hex digit (0-9, A-H, J-N, P-Z; I and O are skipped)
pub fn ehex(value: u8) -> char {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHJKLMNPQRSTUVWXYZ";
    DIGITS
        .get(value as usize)
        .map(|&b| b as char)
        .unwrap_or('?')
}

impl WorldRecord {
    /// Universal World Profile, e.g. `A788899-C`.
    pub fn uwp(&self) -> String {
        format!(
            "{}{}{}{}{}{}{}-{}",
            self.starport,
            ehex(self.size),
            ehex(self.atmosphere),
            ehex(self.hydrographics),
            ehex(self.population),
            ehex(self.government),
            ehex(self.law),
            ehex(self.tech_level),
        )
    }

    pub fn trade_code_string(&self) -> String {
        self.trade_codes
            .iter()
            .map(|c| c.code())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn base_string(&self) -> String {
        self.bases.iter().map(|b| b.code()).collect()
    }
}

fn clamp(v: i32, lo: i32, hi: i32) -> u8 {
    v.clamp(lo, hi) as u8
}

/// Tech level dice modifiers from the world's other characteristics.
fn tech_modifier(
    starport: Starport,
    size: u8,
    atmosphere: u8,
    hydrographics: u8,
    population: u8,
    government: u8,
) -> i32 {
    let mut dm = match starport {
        Starport::A => 6,
        Starport::B => 4,
        Starport::C => 2,
        Starport::X => -4,
        _ => 0,
    };
    dm += match size {
        0..=1 => 2,
        2..=4 => 1,
        _ => 0,
    };
    dm += match atmosphere {
        0..=3 | 10..=14 => 1,
        _ => 0,
    };
    dm += match hydrographics {
        9 => 1,
        10 => 2,
        _ => 0,
    };
    dm += match population {
        1..=5 => 1,
        9 => 2,
        10 => 4,
        _ => 0,
    };
    dm += match government {
        0 | 5 => 1,
        13 => -2,
        _ => 0,
    };
    dm
}

/// Trade codes implied by a finished profile.
pub fn trade_codes(
    size: u8,
    atmosphere: u8,
    hydrographics: u8,
    population: u8,
    government: u8,
    law: u8,
) -> BTreeSet<TradeCode> {
    let (siz, atm, hyd, pop, gov) = (size, atmosphere, hydrographics, population, government);
    let mut codes = BTreeSet::new();
    if (4..=9).contains(&atm) && (4..=8).contains(&hyd) && (5..=7).contains(&pop) {
        codes.insert(TradeCode::Ag);
    }
    if siz == 0 && atm == 0 && hyd == 0 {
        codes.insert(TradeCode::As);
    }
    if pop == 0 && gov == 0 && law == 0 {
        codes.insert(TradeCode::Ba);
    }
    if atm >= 2 && hyd == 0 {
        codes.insert(TradeCode::De);
    }
    if atm >= 10 && hyd >= 1 {
        codes.insert(TradeCode::Fl);
    }
    if pop >= 9 {
        codes.insert(TradeCode::Hi);
    }
    if atm <= 1 && hyd >= 1 {
        codes.insert(TradeCode::Ic);
    }
    if matches!(atm, 0 | 1 | 2 | 4 | 7 | 9) && pop >= 9 {
        codes.insert(TradeCode::In);
    }
    if (1..=3).contains(&pop) {
        codes.insert(TradeCode::Lo);
    }
    if atm <= 3 && hyd <= 3 && pop >= 6 {
        codes.insert(TradeCode::Na);
    }
    if (4..=6).contains(&pop) {
        codes.insert(TradeCode::Ni);
    }
    if (2..=5).contains(&atm) && hyd <= 3 {
        codes.insert(TradeCode::Po);
    }
    if matches!(atm, 6 | 8) && (6..=8).contains(&pop) && (4..=9).contains(&gov) {
        codes.insert(TradeCode::Ri);
    }
    if atm == 0 && siz > 0 {
        codes.insert(TradeCode::Va);
    }
    if hyd == 10 {
        codes.insert(TradeCode::Wa);
    }
    codes
}

/// Roll a complete world.
pub fn generate_world(rng: &mut impl RandomSource) -> WorldRecord {
    let starport = Starport::from_roll(rng.roll(2));

    let size = clamp(rng.roll(2) - 2, 0, 10);

    let atm_roll = rng.roll(2) - 7 + size as i32;
    let atmosphere = if size == 0 { 0 } else { clamp(atm_roll, 0, 15) };

    let mut hyd_roll = rng.roll(2) - 7 + atmosphere as i32;
    if atmosphere <= 1 || atmosphere >= 10 {
        hyd_roll -= 4;
    }
    let hydrographics = if size <= 1 { 0 } else { clamp(hyd_roll, 0, 10) };

    let population = clamp(rng.roll(2) - 2, 0, 10);

    let gov_roll = rng.roll(2) - 7 + population as i32;
    let government = if population == 0 { 0 } else { clamp(gov_roll, 0, 15) };

    let law_roll = rng.roll(2) - 7 + government as i32;
    let law = if population == 0 { 0 } else { clamp(law_roll, 0, 15) };

    let dm = tech_modifier(starport, size, atmosphere, hydrographics, population, government);
    let tech_roll = rng.d6() + dm;
    let tech_level = if population == 0 { 0 } else { clamp(tech_roll, 0, 20) };

    let mut bases = BTreeSet::new();
    let naval_roll = rng.roll(2);
    if matches!(starport, Starport::A | Starport::B) && naval_roll >= 8 {
        bases.insert(Base::Naval);
    }
    let scout_dm = match starport {
        Starport::A => -3,
        Starport::B => -2,
        Starport::C => -1,
        _ => 0,
    };
    let scout_roll = rng.roll(2) + scout_dm;
    if starport != Starport::X && scout_roll >= 7 {
        bases.insert(Base::Scout);
    }

    let gas_giant = rng.roll(2) <= 9;

    WorldRecord {
        starport,
        size,
        atmosphere,
        hydrographics,
        population,
        government,
        law,
        tech_level,
        trade_codes: trade_codes(size, atmosphere, hydrographics, population, government, law),
        bases,
        gas_giant,
    }
}
