use crate::core::io::traits::{ChainExtraction, ChainSelection, StructureError, StructureReader};
use crate::core::models::residue::{Residue, UNKNOWN_CODE, one_letter_code};
use crate::core::utils::geometry::{dihedral_angle, distance};
use nalgebra::Point3;
use pdbtbx::{PDB, ReadOptions, StrictnessLevel};
use std::path::Path;
use tracing::trace;

/// Longest C(i)-N(i+1) distance, in angstroms, still treated as a peptide bond.
const PEPTIDE_BOND_CUTOFF: f64 = 2.5;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BackboneResidue {
    pub number: isize,
    pub code: char,
    pub n: Point3<f64>,
    pub ca: Point3<f64>,
    pub c: Point3<f64>,
}

/// Reads mmCIF and PDB files through `pdbtbx` and derives phi/psi from backbone atoms.
#[derive(Debug, Clone)]
pub struct CifReader {
    level: StrictnessLevel,
}

impl CifReader {
    pub fn new() -> Self {
        Self {
            level: StrictnessLevel::Loose,
        }
    }

    pub fn with_strictness(level: StrictnessLevel) -> Self {
        Self { level }
    }
}

impl Default for CifReader {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureReader for CifReader {
    fn read_chain(&self, path: &Path) -> Result<ChainExtraction, StructureError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| StructureError::NonUtf8Path(path.to_path_buf()))?;

        let (pdb, warnings) = ReadOptions::default()
            .set_level(self.level)
            .read(path_str)
            .map_err(|errors| StructureError::Parse {
                messages: errors.iter().map(|e| e.to_string()).collect(),
            })?;
        for warning in &warnings {
            trace!("pdbtbx: {}", warning);
        }

        extract_first_chain(&pdb)
    }
}

/// Picks the first chain with a usable backbone from the first model only.
fn extract_first_chain(pdb: &PDB) -> Result<ChainExtraction, StructureError> {
    let model = pdb.models().next().ok_or(StructureError::NoResidues)?;
    let chains: Vec<(String, Vec<BackboneResidue>)> = model
        .chains()
        .map(|chain| (chain.id().to_string(), collect_backbone(chain)))
        .filter(|(_, backbone)| !backbone.is_empty())
        .collect();

    let chain_count = chains.len();
    let (chain_id, backbone) = chains
        .into_iter()
        .next()
        .ok_or(StructureError::NoResidues)?;

    let selection = if chain_count > 1 {
        ChainSelection::FirstOfMany { chain_count }
    } else {
        ChainSelection::Single
    };

    Ok(ChainExtraction {
        chain_id,
        residues: backbone_to_residues(&backbone),
        selection,
    })
}

fn collect_backbone(chain: &pdbtbx::Chain) -> Vec<BackboneResidue> {
    chain
        .residues()
        .filter_map(|residue| {
            let name = residue.name().unwrap_or_default();
            let code = one_letter_code(name);

            let mut n = None;
            let mut ca = None;
            let mut c = None;
            let mut hetero = false;
            for atom in residue.atoms() {
                hetero |= atom.hetero();
                let (x, y, z) = atom.pos();
                let slot = match atom.name().trim() {
                    "N" => &mut n,
                    "CA" => &mut ca,
                    "C" => &mut c,
                    _ => continue,
                };
                // First conformer wins.
                slot.get_or_insert(Point3::new(x, y, z));
            }

            // HETATM groups only count when they are recognizable amino acids (e.g. MSE).
            if hetero && code == UNKNOWN_CODE {
                return None;
            }

            Some(BackboneResidue {
                number: residue.serial_number(),
                code,
                n: n?,
                ca: ca?,
                c: c?,
            })
        })
        .collect()
}

/// Computes phi/psi for each residue of an ordered backbone.
///
/// phi(i) uses C(i-1), N(i), CA(i), C(i); psi(i) uses N(i), CA(i), C(i), N(i+1).
/// An angle is undefined when the neighbor is missing or not peptide-bonded.
pub(crate) fn backbone_to_residues(backbone: &[BackboneResidue]) -> Vec<Residue> {
    let bonded = |prev: &BackboneResidue, next: &BackboneResidue| {
        distance(&prev.c, &next.n) <= PEPTIDE_BOND_CUTOFF
    };

    backbone
        .iter()
        .enumerate()
        .map(|(i, current)| {
            let phi = i
                .checked_sub(1)
                .map(|p| &backbone[p])
                .filter(|prev| bonded(prev, current))
                .and_then(|prev| dihedral_angle(&prev.c, &current.n, &current.ca, &current.c));
            let psi = backbone
                .get(i + 1)
                .filter(|next| bonded(current, next))
                .and_then(|next| dihedral_angle(&current.n, &current.ca, &current.c, &next.n));

            Residue::new(current.number, current.code, phi, psi)
        })
        .collect()
}
