use crate::errors::ParseError;
use crate::machine_type::{machine_type, split_instrument_id};

/// Number of colon-separated fields before the space:
/// `<instrument>:<run>:<flowcell>:<lane>:<tile>:<x>:<y>`
const READ_NAME_FIELDS: usize = 7;
/// `<read>:<filtered>:<control>` are required after the space, `:<index>` is optional.
const MIN_COMMENT_FIELDS: usize = 3;

/// Fields of the first header line of an Illumina (Casava 1.8+) FASTQ file:
/// `@M03543:47:C8LJ2ANXX:1:2209:1084:2044 1:N:0:NNNNNNNN+NNNNNNNN`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderMetadata {
    /// Full instrument ID including its letter prefix, e.g. `M03543`.
    pub instrument_id: String,
    /// `None` for an instrument prefix missing from the platform table.
    pub machine_type: Option<&'static str>,
    pub run_number: String,
    /// Flowcell ID with any `000000000-` style prefix removed.
    pub flowcell_id: String,
    pub lane: String,
    pub tile: String,
    pub x: String,
    pub y: String,
    pub read_number: String,
    pub is_filtered: String,
    pub control_number: String,
    pub index_sequence: Option<String>,
}

impl HeaderMetadata {
    /// Parse a header line. Trailing line terminators are ignored.
    pub fn parse(line: &str) -> Result<HeaderMetadata, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let header = line
            .strip_prefix('@')
            .ok_or_else(|| ParseError::NotAHeader {
                header: line.to_string(),
            })?;

        let (read_name, comment) = match header.split_once([' ', '\t']) {
            Some((name, comment)) => (name, Some(comment.trim())),
            None => (header, None),
        };

        let name_parts: Vec<&str> = read_name.split(':').collect();
        if name_parts.len() < READ_NAME_FIELDS {
            return Err(ParseError::TooFewReadNameFields {
                header: line.to_string(),
                found: name_parts.len(),
                expected: READ_NAME_FIELDS,
            });
        }

        let comment_parts: Vec<&str> = comment.map(|c| c.split(':').collect()).unwrap_or_default();
        if comment_parts.len() < MIN_COMMENT_FIELDS {
            return Err(ParseError::MissingComment {
                header: line.to_string(),
            });
        }

        let instrument_id = name_parts[0];
        let flowcell = name_parts[2];

        Ok(HeaderMetadata {
            instrument_id: instrument_id.to_string(),
            machine_type: machine_type(instrument_id),
            run_number: name_parts[1].to_string(),
            flowcell_id: flowcell.rsplit('-').next().unwrap_or(flowcell).to_string(),
            lane: name_parts[3].to_string(),
            tile: name_parts[4].to_string(),
            x: name_parts[5].to_string(),
            y: name_parts[6].to_string(),
            read_number: comment_parts[0].to_string(),
            is_filtered: comment_parts[1].to_string(),
            control_number: comment_parts[2].to_string(),
            index_sequence: comment_parts
                .get(3..)
                .and_then(|rest| rest.last())
                .map(|s| (*s).to_string()),
        })
    }

    /// Instrument serial with the platform prefix removed, `M03543` → `03543`.
    pub fn instrument_serial(&self) -> &str {
        split_instrument_id(&self.instrument_id).1
    }

    /// True if the header carries a real index sequence rather than a
    /// placeholder (`0`, or only `N`s) written when no index read was sequenced.
    pub fn has_index_read(&self) -> bool {
        match self.index_sequence.as_deref() {
            None | Some("") | Some("0") => false,
            Some(seq) => !seq.chars().filter(|&c| c != '+').all(|c| c == 'N'),
        }
    }
}
