//! Mapping from the letter prefix of an Illumina instrument ID to the
//! sequencing platform that produced the run.

/// Instrument ID prefix → platform name. New platforms go here.
static MACHINE_TYPES: &[(&str, &str)] = &[
    ("M", "Illumina-MiSeq"),
    ("D", "Illumina-HiSeq"),
    ("J", "Illumina-HiSeq"),
    ("K", "Illumina-HiSeq"),
    ("E", "Illumina-HiSeq"),
    ("SN", "Illumina-HiSeq"),
    ("NB", "Illumina-NextSeq"),
    ("NS", "Illumina-NextSeq"),
    ("VH", "Illumina-NextSeq"),
    ("MN", "Illumina-MiniSeq"),
    ("A", "Illumina-NovaSeq"),
    ("LH", "Illumina-NovaSeq"),
    ("FS", "Illumina-iSeq"),
];

/// Split an instrument ID such as `M03543` into its letter prefix (`M`)
/// and serial (`03543`).
pub fn split_instrument_id(instrument: &str) -> (&str, &str) {
    let split = instrument
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(instrument.len());
    instrument.split_at(split)
}

/// Look up the platform for an instrument ID, e.g. `M03543` → `Illumina-MiSeq`.
pub fn machine_type(instrument: &str) -> Option<&'static str> {
    let (prefix, _) = split_instrument_id(instrument);
    MACHINE_TYPES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|&(_, name)| name)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_machine_type() {
        assert_eq!(machine_type("M03543"), Some("Illumina-MiSeq"));
        assert_eq!(machine_type("D04734"), Some("Illumina-HiSeq"));
        assert_eq!(machine_type("A00419"), Some("Illumina-NovaSeq"));
        assert_eq!(machine_type("NB501234"), Some("Illumina-NextSeq"));
        assert_eq!(machine_type("MN00157"), Some("Illumina-MiniSeq"));
        assert_eq!(machine_type("VH00123"), Some("Illumina-NextSeq"));
        assert_eq!(machine_type("X12345"), None);
        assert_eq!(machine_type("03543"), None);
    }

    #[test]
    fn test_split_instrument_id() {
        assert_eq!(split_instrument_id("M03543"), ("M", "03543"));
        assert_eq!(split_instrument_id("NB501234"), ("NB", "501234"));
        assert_eq!(split_instrument_id("ABC"), ("ABC", ""));
    }

    #[test]
    fn test_prefixes_unique() {
        for (i, (p, _)) in MACHINE_TYPES.iter().enumerate() {
            assert!(
                MACHINE_TYPES[i + 1..].iter().all(|(q, _)| q != p),
                "duplicate prefix {p}"
            );
        }
    }
}
