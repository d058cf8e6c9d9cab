/// Value DSSP reports for a dihedral angle that cannot be computed.
pub const UNDEFINED_ANGLE: f64 = 360.0;

pub const UNKNOWN_CODE: char = 'X';

/// One amino acid of a polypeptide chain together with its backbone dihedrals.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub number: isize,
    pub code: char,
    /// Degrees; `None` at the N-terminus or after a chain break.
    pub phi: Option<f64>,
    /// Degrees; `None` at the C-terminus or before a chain break.
    pub psi: Option<f64>,
}

impl Residue {
    pub fn new(number: isize, code: char, phi: Option<f64>, psi: Option<f64>) -> Self {
        Self {
            number,
            code,
            phi,
            psi,
        }
    }

    #[inline]
    pub fn phi_or_undefined(&self) -> f64 {
        self.phi.unwrap_or(UNDEFINED_ANGLE)
    }

    #[inline]
    pub fn psi_or_undefined(&self) -> f64 {
        self.psi.unwrap_or(UNDEFINED_ANGLE)
    }
}

/// Maps a three-letter residue name to its one-letter code.
///
/// Modified residues commonly found in deposited structures are mapped to their parent
/// amino acid. Anything unrecognized becomes [`UNKNOWN_CODE`].
pub fn one_letter_code(name: &str) -> char {
    match name.trim().to_ascii_uppercase().as_str() {
        "ALA" => 'A',
        "ARG" => 'R',
        "ASN" => 'N',
        "ASP" => 'D',
        "CYS" => 'C',
        "GLN" => 'Q',
        "GLU" => 'E',
        "GLY" => 'G',
        "HIS" | "HSD" | "HSE" | "HSP" | "HID" | "HIE" | "HIP" => 'H',
        "ILE" => 'I',
        "LEU" => 'L',
        "LYS" => 'K',
        "MET" | "MSE" => 'M',
        "PHE" => 'F',
        "PRO" => 'P',
        "SER" => 'S',
        "THR" => 'T',
        "TRP" => 'W',
        "TYR" => 'Y',
        "VAL" => 'V',
        "SEC" => 'U',
        "PYL" => 'O',
        _ => UNKNOWN_CODE,
    }
}
