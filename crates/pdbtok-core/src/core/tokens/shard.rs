use super::encoder::EncodedLine;
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use std::path::Path;

/// Writes encoded lines as a headerless two-column CSV, one `\n`-terminated record per line.
pub fn write_shard(path: &Path, lines: &[EncodedLine]) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_path(path)?;
    for line in lines {
        writer.serialize(line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads every record of a shard written by [`write_shard`], in file order.
pub fn read_shard(path: &Path) -> Result<Vec<EncodedLine>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .from_path(path)?;
    reader.deserialize::<EncodedLine>().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn line(aa: &str, angles: &str) -> EncodedLine {
        EncodedLine {
            aa_pairs: aa.to_string(),
            angle_pairs: angles.to_string(),
        }
    }

    #[test]
    fn write_shard_produces_plain_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("3_4_1abc.csv");
        let lines = vec![
            line("MK KT", "DBF BCA BDF KKJ"),
            line("KT TA", "BDF KKJ BJA KJA"),
        ];

        write_shard(&path, &lines).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "MK KT,DBF BCA BDF KKJ\nKT TA,BDF KKJ BJA KJA\n"
        );
        assert_eq!(read_shard(&path).unwrap(), lines);
    }

    #[test]
    fn write_shard_with_no_lines_creates_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_shard(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        assert!(read_shard(&path).unwrap().is_empty());
    }

    #[test]
    fn read_shard_rejects_records_without_angle_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, "MK KT\n").unwrap();
        assert!(read_shard(&path).is_err());
    }

    #[test]
    fn read_shard_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        assert!(read_shard(&dir.path().join("nope.csv")).is_err());
    }
}
