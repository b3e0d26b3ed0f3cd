use phf::{Map, phf_map};

/// Static properties of one chemical element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementData {
    /// Atomic number (Z).
    pub atomic_number: u8,
    /// Default display color as `#RRGGBB` (Jmol CPK palette).
    pub color: &'static str,
    /// Single-bond covalent radius in Ångström (Cordero et al., 2008).
    pub covalent_radius: f64,
}

pub(super) static ELEMENTS: Map<&'static str, ElementData> = phf_map! {
    "H" => ElementData { atomic_number: 1, color: "#FFFFFF", covalent_radius: 0.31 },
    "He" => ElementData { atomic_number: 2, color: "#D9FFFF", covalent_radius: 0.28 },
    "Li" => ElementData { atomic_number: 3, color: "#CC80FF", covalent_radius: 1.28 },
    "Be" => ElementData { atomic_number: 4, color: "#C2FF00", covalent_radius: 0.96 },
    "B" => ElementData { atomic_number: 5, color: "#FFB5B5", covalent_radius: 0.84 },
    "C" => ElementData { atomic_number: 6, color: "#909090", covalent_radius: 0.76 },
    "N" => ElementData { atomic_number: 7, color: "#3050F8", covalent_radius: 0.71 },
    "O" => ElementData { atomic_number: 8, color: "#FF0D0D", covalent_radius: 0.66 },
    "F" => ElementData { atomic_number: 9, color: "#90E050", covalent_radius: 0.57 },
    "Ne" => ElementData { atomic_number: 10, color: "#B3E3F5", covalent_radius: 0.58 },
    "Na" => ElementData { atomic_number: 11, color: "#AB5CF2", covalent_radius: 1.66 },
    "Mg" => ElementData { atomic_number: 12, color: "#8AFF00", covalent_radius: 1.41 },
    "Al" => ElementData { atomic_number: 13, color: "#BFA6A6", covalent_radius: 1.21 },
    "Si" => ElementData { atomic_number: 14, color: "#F0C8A0", covalent_radius: 1.11 },
    "P" => ElementData { atomic_number: 15, color: "#FF8000", covalent_radius: 1.07 },
    "S" => ElementData { atomic_number: 16, color: "#FFFF30", covalent_radius: 1.05 },
    "Cl" => ElementData { atomic_number: 17, color: "#1FF01F", covalent_radius: 1.02 },
    "Ar" => ElementData { atomic_number: 18, color: "#80D1E3", covalent_radius: 1.06 },
    "K" => ElementData { atomic_number: 19, color: "#8F40D4", covalent_radius: 2.03 },
    "Ca" => ElementData { atomic_number: 20, color: "#3DFF00", covalent_radius: 1.76 },
    "Sc" => ElementData { atomic_number: 21, color: "#E6E6E6", covalent_radius: 1.70 },
    "Ti" => ElementData { atomic_number: 22, color: "#BFC2C7", covalent_radius: 1.60 },
    "V" => ElementData { atomic_number: 23, color: "#A6A6AB", covalent_radius: 1.53 },
    "Cr" => ElementData { atomic_number: 24, color: "#8A99C7", covalent_radius: 1.39 },
    "Mn" => ElementData { atomic_number: 25, color: "#9C7AC7", covalent_radius: 1.39 },
    "Fe" => ElementData { atomic_number: 26, color: "#E06633", covalent_radius: 1.32 },
    "Co" => ElementData { atomic_number: 27, color: "#F090A0", covalent_radius: 1.26 },
    "Ni" => ElementData { atomic_number: 28, color: "#50D050", covalent_radius: 1.24 },
    "Cu" => ElementData { atomic_number: 29, color: "#C88033", covalent_radius: 1.32 },
    "Zn" => ElementData { atomic_number: 30, color: "#7D80B0", covalent_radius: 1.22 },
    "Ga" => ElementData { atomic_number: 31, color: "#C28F8F", covalent_radius: 1.22 },
    "Ge" => ElementData { atomic_number: 32, color: "#668F8F", covalent_radius: 1.20 },
    "As" => ElementData { atomic_number: 33, color: "#BD80E3", covalent_radius: 1.19 },
    "Se" => ElementData { atomic_number: 34, color: "#FFA100", covalent_radius: 1.20 },
    "Br" => ElementData { atomic_number: 35, color: "#A62929", covalent_radius: 1.20 },
    "Kr" => ElementData { atomic_number: 36, color: "#5CB8D1", covalent_radius: 1.16 },
    "Rb" => ElementData { atomic_number: 37, color: "#702EB0", covalent_radius: 2.20 },
    "Sr" => ElementData { atomic_number: 38, color: "#00FF00", covalent_radius: 1.95 },
    "Y" => ElementData { atomic_number: 39, color: "#94FFFF", covalent_radius: 1.90 },
    "Zr" => ElementData { atomic_number: 40, color: "#94E0E0", covalent_radius: 1.75 },
    "Nb" => ElementData { atomic_number: 41, color: "#73C2C9", covalent_radius: 1.64 },
    "Mo" => ElementData { atomic_number: 42, color: "#54B5B5", covalent_radius: 1.54 },
    "Tc" => ElementData { atomic_number: 43, color: "#3B9E9E", covalent_radius: 1.47 },
    "Ru" => ElementData { atomic_number: 44, color: "#248F8F", covalent_radius: 1.46 },
    "Rh" => ElementData { atomic_number: 45, color: "#0A7D8C", covalent_radius: 1.42 },
    "Pd" => ElementData { atomic_number: 46, color: "#006985", covalent_radius: 1.39 },
    "Ag" => ElementData { atomic_number: 47, color: "#C0C0C0", covalent_radius: 1.45 },
    "Cd" => ElementData { atomic_number: 48, color: "#FFD98F", covalent_radius: 1.44 },
    "In" => ElementData { atomic_number: 49, color: "#A67573", covalent_radius: 1.42 },
    "Sn" => ElementData { atomic_number: 50, color: "#668080", covalent_radius: 1.39 },
    "Sb" => ElementData { atomic_number: 51, color: "#9E63B5", covalent_radius: 1.39 },
    "Te" => ElementData { atomic_number: 52, color: "#D47A00", covalent_radius: 1.38 },
    "I" => ElementData { atomic_number: 53, color: "#940094", covalent_radius: 1.39 },
    "Xe" => ElementData { atomic_number: 54, color: "#429EB0", covalent_radius: 1.40 },
    "Cs" => ElementData { atomic_number: 55, color: "#57178F", covalent_radius: 2.44 },
    "Ba" => ElementData { atomic_number: 56, color: "#00C900", covalent_radius: 2.15 },
    "La" => ElementData { atomic_number: 57, color: "#70D4FF", covalent_radius: 2.07 },
    "Ce" => ElementData { atomic_number: 58, color: "#FFFFC7", covalent_radius: 2.04 },
    "Nd" => ElementData { atomic_number: 60, color: "#C7FFC7", covalent_radius: 2.01 },
    "Gd" => ElementData { atomic_number: 64, color: "#45FFC7", covalent_radius: 1.96 },
    "Hf" => ElementData { atomic_number: 72, color: "#4DC2FF", covalent_radius: 1.75 },
    "Ta" => ElementData { atomic_number: 73, color: "#4DA6FF", covalent_radius: 1.70 },
    "W" => ElementData { atomic_number: 74, color: "#2194D6", covalent_radius: 1.62 },
    "Re" => ElementData { atomic_number: 75, color: "#267DAB", covalent_radius: 1.51 },
    "Os" => ElementData { atomic_number: 76, color: "#266696", covalent_radius: 1.44 },
    "Ir" => ElementData { atomic_number: 77, color: "#175487", covalent_radius: 1.41 },
    "Pt" => ElementData { atomic_number: 78, color: "#D0D0E0", covalent_radius: 1.36 },
    "Au" => ElementData { atomic_number: 79, color: "#FFD123", covalent_radius: 1.36 },
    "Hg" => ElementData { atomic_number: 80, color: "#B8B8D0", covalent_radius: 1.32 },
    "Tl" => ElementData { atomic_number: 81, color: "#A6544D", covalent_radius: 1.45 },
    "Pb" => ElementData { atomic_number: 82, color: "#575961", covalent_radius: 1.46 },
    "Bi" => ElementData { atomic_number: 83, color: "#9E4FB5", covalent_radius: 1.48 },
    "Po" => ElementData { atomic_number: 84, color: "#AB5C00", covalent_radius: 1.40 },
    "At" => ElementData { atomic_number: 85, color: "#754F45", covalent_radius: 1.50 },
    "Rn" => ElementData { atomic_number: 86, color: "#428296", covalent_radius: 1.50 },
    "U" => ElementData { atomic_number: 92, color: "#008FFF", covalent_radius: 1.96 },
};
