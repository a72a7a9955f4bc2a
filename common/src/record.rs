use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::UNKNOWN_VERSION;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v(\d+\.\d+)").expect("version pattern is valid"));

/// Numeric sort key of a dotted version, compared element by element
pub type VersionKey = Vec<Segment>;

/// Unsigned integer of any width.
///
/// Leading zeros are stripped, so ordering by digit count and then by the
/// digits themselves is numeric ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Segment {
    width: usize,
    digits: String,
}

impl Segment {
    fn parse(part: &str) -> Option<Self> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = match part.trim_start_matches('0') {
            "" => "0",
            digits => digits,
        };
        Some(Self {
            width: digits.len(),
            digits: digits.to_owned(),
        })
    }

    fn zero() -> Self {
        Self {
            width: 1,
            digits: "0".to_owned(),
        }
    }
}

/// One decoded results file together with the metadata derived from its name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub filename: String,
    pub version: String,
    pub data: Value,
}

impl ResultRecord {
    /// Builds a record from the decoded top-level object of a results file.
    ///
    /// `filename` and `version` are also inserted into the object, replacing
    /// any same-named keys the file carried.
    pub fn new(filename: impl Into<String>, mut fields: Map<String, Value>) -> Self {
        let filename = filename.into();
        let version = extract_version(&filename);
        fields.insert("filename".to_owned(), Value::String(filename.clone()));
        fields.insert("version".to_owned(), Value::String(version.clone()));
        Self {
            filename,
            version,
            data: Value::Object(fields),
        }
    }

    pub fn version_key(&self) -> VersionKey {
        version_sort_key(&self.version)
    }

    /// Axis label for this record, ie. `v2.13`
    pub fn label(&self) -> String {
        format!("v{}", self.version)
    }
}

/// Pulls `MAJOR.MINOR` out of the first `vMAJOR.MINOR` occurrence in `filename`.
pub fn extract_version(filename: &str) -> String {
    VERSION_RE
        .captures(filename)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_owned())
        .unwrap_or_else(|| UNKNOWN_VERSION.to_owned())
}

/// Any segment that is not an unsigned integer collapses the whole key to `[0, 0]`.
pub fn version_sort_key(version: &str) -> VersionKey {
    version
        .split('.')
        .map(Segment::parse)
        .collect::<Option<Vec<_>>>()
        .unwrap_or_else(|| vec![Segment::zero(), Segment::zero()])
}

/// Stable ascending sort on [`VersionKey`].
pub fn sort_by_version(records: &mut [ResultRecord]) {
    records.sort_by_cached_key(ResultRecord::version_key);
}
