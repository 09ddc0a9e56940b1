//! Architecture registry.
//!
//! Maps generation names, gfx identifiers, codenames, and chip marketing
//! names onto the five supported [`Architecture`] generations, and
//! enumerates each generation's instruction set. All name matching is
//! case-insensitive.

use crate::catalog::Catalog;
use crate::error::{CalcError, Result};
use crate::types::Architecture;

/// Accepted aliases for CDNA generation 1.
pub const CDNA1_ALIASES: &[&str] = &["cdna", "cdna1", "gfx908", "arcturus", "mi100"];

/// Accepted aliases for CDNA generation 2.
pub const CDNA2_ALIASES: &[&str] = &[
    "cdna2",
    "gfx90a",
    "aldebaran",
    "mi200",
    "mi210",
    "mi250",
    "mi250x",
];

/// Accepted aliases for CDNA generation 3.
pub const CDNA3_ALIASES: &[&str] = &[
    "cdna3",
    "gfx940",
    "gfx941",
    "gfx942",
    "aqua_vanjaram",
    "mi300",
    "mi300a",
    "mi300x",
    "mi325x",
];

/// Accepted aliases for RDNA generation 3.
pub const RDNA3_ALIASES: &[&str] = &[
    "rdna3", "gfx1100", "gfx1101", "gfx1102", "gfx1103", "gfx1150", "gfx1151", "gfx1152",
    "gfx1153",
];

/// Accepted aliases for RDNA generation 4.
pub const RDNA4_ALIASES: &[&str] = &["rdna4", "gfx1200", "gfx1201"];

/// All generations in catalog order.
pub const ALL: &[Architecture] = &[
    Architecture::Cdna1,
    Architecture::Cdna2,
    Architecture::Cdna3,
    Architecture::Rdna3,
    Architecture::Rdna4,
];

/// Aliases accepted for a generation.
pub fn aliases(arch: Architecture) -> &'static [&'static str] {
    match arch {
        Architecture::Cdna1 => CDNA1_ALIASES,
        Architecture::Cdna2 => CDNA2_ALIASES,
        Architecture::Cdna3 => CDNA3_ALIASES,
        Architecture::Rdna3 => RDNA3_ALIASES,
        Architecture::Rdna4 => RDNA4_ALIASES,
    }
}

/// Resolve a user-supplied architecture name to a generation.
pub fn resolve(name: &str) -> Result<Architecture> {
    let lower = name.trim().to_ascii_lowercase();
    for &arch in ALL {
        if aliases(arch).contains(&lower.as_str()) {
            return Ok(arch);
        }
    }
    Err(CalcError::InvalidArch {
        name: name.to_string(),
    })
}

/// Ordered instruction mnemonics of a generation.
pub fn instructions_of(arch: Architecture) -> Vec<&'static str> {
    Catalog::global()
        .instructions(arch)
        .map(|d| d.mnemonic)
        .collect()
}
