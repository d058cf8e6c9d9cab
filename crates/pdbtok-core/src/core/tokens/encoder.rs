use crate::core::cipher::Cipher;
use crate::core::models::residue::Residue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separates the amino-acid field from the angle field of an encoded line.
pub const FIELD_DELIMITER: char = ',';

/// Added to rounded angles so that every value in [-180, 180] becomes non-negative.
pub const ANGLE_OFFSET: i64 = 180;

const ANGLE_WIDTH: usize = 3;

/// One training example: amino-acid bigrams and the matching angle words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedLine {
    pub aa_pairs: String,
    pub angle_pairs: String,
}

impl EncodedLine {
    /// Splits `"<aa_pairs>,<angle_pairs>"` back into its two fields.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (aa_pairs, angle_pairs) = line.split_once(FIELD_DELIMITER)?;
        if angle_pairs.contains(FIELD_DELIMITER) {
            return None;
        }
        Some(Self {
            aa_pairs: aa_pairs.to_string(),
            angle_pairs: angle_pairs.to_string(),
        })
    }

    /// The newline-terminated record as written to token shards.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for EncodedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.aa_pairs, FIELD_DELIMITER, self.angle_pairs)
    }
}

/// Rounds to the nearest degree (ties to even) and shifts into the non-negative range.
///
/// Dihedrals lie in `[-180, 180]`; values far outside saturate at the `i64` bounds and
/// NaN maps to the offset.
pub fn shift_angle(degrees: f64) -> i64 {
    (degrees.round_ties_even() as i64).saturating_add(ANGLE_OFFSET)
}

/// Turns residue fragments into encoded lines.
#[derive(Debug, Clone, Default)]
pub struct FragmentEncoder {
    cipher: Cipher,
}

impl FragmentEncoder {
    pub fn new(cipher: Cipher) -> Self {
        Self { cipher }
    }

    pub fn cipher(&self) -> &Cipher {
        &self.cipher
    }

    /// Encodes a fragment; fragments shorter than two residues have no pairs and yield `None`.
    pub fn encode(&self, fragment: &[Residue]) -> Option<EncodedLine> {
        if fragment.len() < 2 {
            return None;
        }

        let pairs = fragment.windows(2);
        let aa_pairs = pairs
            .clone()
            .map(|pair| format!("{}{}", pair[0].code, pair[1].code))
            .collect::<Vec<_>>()
            .join(" ");

        // psi of the earlier residue, phi of the later one.
        let angle_pairs = pairs
            .map(|pair| {
                format!(
                    "{} {}",
                    self.encode_angle(pair[0].psi_or_undefined()),
                    self.encode_angle(pair[1].phi_or_undefined())
                )
            })
            .collect::<Vec<_>>()
            .join(" ");

        Some(EncodedLine {
            aa_pairs,
            angle_pairs,
        })
    }

    /// Encodes every fragment in emission order.
    pub fn encode_all<'a, I>(&self, fragments: I) -> Vec<EncodedLine>
    where
        I: IntoIterator<Item = &'a [Residue]>,
    {
        fragments
            .into_iter()
            .filter_map(|fragment| self.encode(fragment))
            .collect()
    }

    /// One angle word: shifted value, right-aligned to width 3, passed through the cipher.
    pub fn encode_angle(&self, degrees: f64) -> String {
        let shifted = shift_angle(degrees);
        self.cipher
            .encrypt(format!("{:>width$}", shifted, width = ANGLE_WIDTH).chars())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment() -> Vec<Residue> {
        vec![
            Residue::new(1, 'M', None, Some(135.4)),
            Residue::new(2, 'K', Some(-60.2), Some(-45.0)),
            Residue::new(3, 'T', Some(-170.6), Some(10.0)),
        ]
    }

    #[test]
    fn encode_produces_exact_line() {
        let encoder = FragmentEncoder::default();
        let line = encoder.encode(&fragment()).unwrap();
        assert_eq!(line.aa_pairs, "MK KT");
        assert_eq!(line.angle_pairs, "DBF BCA BDF KKJ");
        assert_eq!(line.to_line(), "MK KT,DBF BCA BDF KKJ\n");
    }

    #[test]
    fn encode_shape_follows_fragment_length() {
        let encoder = FragmentEncoder::default();
        for len in 2..=12 {
            let fragment: Vec<_> = (0..len)
                .map(|i| Residue::new(i as isize, 'G', Some(-63.0), Some(-41.0)))
                .collect();
            let line = encoder.encode(&fragment).unwrap();

            let aa: Vec<_> = line.aa_pairs.split(' ').collect();
            assert_eq!(aa.len(), len - 1);
            assert!(aa.iter().all(|token| token.chars().count() == 2));

            let angles: Vec<_> = line.angle_pairs.split(' ').collect();
            assert_eq!(angles.len(), 2 * (len - 1));
            assert!(angles.iter().all(|token| token.chars().count() == 3));

            assert!(!line.to_string().trim_end().contains('\n'));
            assert_eq!(line.to_string().matches(FIELD_DELIMITER).count(), 1);
        }
    }

    #[test]
    fn encode_rejects_fragments_without_pairs() {
        let encoder = FragmentEncoder::default();
        assert!(encoder.encode(&[]).is_none());
        assert!(encoder.encode(&fragment()[..1]).is_none());
    }

    #[test]
    fn shift_angle_stays_in_range() {
        let mut degrees = -180.0;
        while degrees < 180.0 {
            let shifted = shift_angle(degrees);
            assert!((0..=360).contains(&shifted), "{degrees} -> {shifted}");
            degrees += 0.25;
        }
        assert_eq!(shift_angle(-180.0), 0);
        assert_eq!(shift_angle(179.9), 360);
    }

    #[test]
    fn shift_angle_rounds_half_to_even() {
        assert_eq!(shift_angle(2.5), 182);
        assert_eq!(shift_angle(3.5), 184);
        assert_eq!(shift_angle(-0.5), 180);
        assert_eq!(shift_angle(-1.5), 178);
    }

    #[test]
    fn shift_angle_saturates_out_of_domain_input() {
        assert_eq!(shift_angle(f64::INFINITY), i64::MAX);
        assert_eq!(shift_angle(1e30), i64::MAX);
        assert_eq!(shift_angle(f64::NEG_INFINITY), i64::MIN + ANGLE_OFFSET);
        assert_eq!(shift_angle(f64::NAN), ANGLE_OFFSET);
    }

    #[test]
    fn encode_angle_pads_to_three_symbols() {
        let encoder = FragmentEncoder::default();
        assert_eq!(encoder.encode_angle(-180.0), "KKA");
        assert_eq!(encoder.encode_angle(-90.0), "KJA");
        assert_eq!(encoder.encode_angle(0.0), "BIA");
        assert_eq!(encoder.encode_angle(180.0), "DGA");
    }

    #[test]
    fn undefined_angles_use_dssp_sentinel() {
        let encoder = FragmentEncoder::default();
        let fragment = vec![
            Residue::new(1, 'A', None, None),
            Residue::new(2, 'C', None, None),
        ];
        let line = encoder.encode(&fragment).unwrap();
        // 360 + 180 = 540
        assert_eq!(line.angle_pairs, "FEA FEA");
    }

    #[test]
    fn encode_all_keeps_fragment_order() {
        let encoder = FragmentEncoder::default();
        let residues = fragment();
        let lines = encoder.encode_all([&residues[..2], &residues[1..], &residues[..1]]);
        let aa: Vec<_> = lines.iter().map(|l| l.aa_pairs.as_str()).collect();
        assert_eq!(aa, vec!["MK", "KT"]);
    }

    #[test]
    fn parse_splits_on_delimiter() {
        let line = EncodedLine::parse("MK KT,DBF BCA BDF KKJ\n").unwrap();
        assert_eq!(line.aa_pairs, "MK KT");
        assert_eq!(line.angle_pairs, "DBF BCA BDF KKJ");
        assert!(EncodedLine::parse("no delimiter").is_none());
        assert!(EncodedLine::parse("a,b,c").is_none());
    }

    #[test]
    fn custom_cipher_changes_angle_alphabet() {
        let encoder = FragmentEncoder::new(Cipher::new("0123456789 ", "abcdefghij_").unwrap());
        assert_eq!(encoder.encode_angle(-100.0), "_ia");
    }
}
