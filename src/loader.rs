//! CSV loader for member preference sheets.
//!
//! Expected layout, one row per member:
//!
//! ```text
//! name,first_choice,second_choice,...,sixth_choice,Website,Social,...
//! ana,Website,Social,,,,,1,,...
//! ```
//!
//! - `name` identifies the member.
//! - `first_choice` through `sixth_choice` list committees, most preferred
//!   first. The list ends at the first blank cell or the first name that is
//!   not a known committee. Missing choice columns are skipped.
//! - One column per committee holds that committee's rank for the member.
//!   Blank, `nan`, `NA`, `N/A` and `inf` mean unranked; otherwise the cell
//!   must hold a non-negative whole number (`2` or `2.0`). Members sharing a
//!   rank are ordered by row.
//! - Rows may be shorter than the header; missing trailing cells read as
//!   blank.

use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;
use tracing::debug;

use crate::error::MatchError;
use crate::instance::{CommitteeId, CommitteeSpec, Instance, InstanceBuilder, Rank};

/// Preference columns, most preferred first.
pub const CHOICE_COLUMNS: [&str; 6] = [
    "first_choice",
    "second_choice",
    "third_choice",
    "fourth_choice",
    "fifth_choice",
    "sixth_choice",
];

/// Column holding the member name.
pub const NAME_COLUMN: &str = "name";

/// Errors raised while reading a preference sheet.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("row {row}: member name is blank")]
    MissingName { row: usize },

    #[error("member {member}: invalid rank {value:?} for committee {committee}")]
    InvalidRank {
        member: String,
        committee: String,
        value: String,
    },

    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Parses a committee rank cell.
///
/// Returns `None` if the text is neither a non-negative whole number nor an
/// unranked marker.
///
/// # Examples
///
/// ```
/// use u_matching::instance::Rank;
/// use u_matching::loader::parse_rank;
///
/// assert_eq!(parse_rank("3"), Some(Rank::Ranked(3)));
/// assert_eq!(parse_rank("2.0"), Some(Rank::Ranked(2)));
/// assert_eq!(parse_rank(""), Some(Rank::Unranked));
/// assert_eq!(parse_rank("NaN"), Some(Rank::Unranked));
/// assert_eq!(parse_rank("-1"), None);
/// assert_eq!(parse_rank("1.5"), None);
/// ```
pub fn parse_rank(text: &str) -> Option<Rank> {
    let text = text.trim();
    if text.is_empty()
        || ["nan", "na", "n/a", "none"]
            .iter()
            .any(|marker| text.eq_ignore_ascii_case(marker))
    {
        return Some(Rank::Unranked);
    }
    let value: f64 = text.parse().ok()?;
    if value.is_nan() || value == f64::INFINITY {
        return Some(Rank::Unranked);
    }
    if value < 0.0 || value > f64::from(u32::MAX) || value.fract() != 0.0 {
        return None;
    }
    Some(Rank::Ranked(value as u32))
}

struct Columns {
    name: usize,
    choices: Vec<usize>,
    committees: Vec<(CommitteeId, usize)>,
}

impl Columns {
    fn resolve(headers: &StringRecord, builder: &InstanceBuilder) -> Result<Self, LoadError> {
        let find = |label: &str| headers.iter().position(|h| h == label);

        let name =
            find(NAME_COLUMN).ok_or_else(|| LoadError::MissingColumn(NAME_COLUMN.into()))?;
        let choices = CHOICE_COLUMNS.iter().filter_map(|c| find(*c)).collect();
        let committees = builder
            .committee_specs()
            .map(|(id, spec)| {
                find(spec.name.as_str())
                    .map(|idx| (id, idx))
                    .ok_or_else(|| LoadError::MissingColumn(spec.name.clone()))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            name,
            choices,
            committees,
        })
    }
}

/// Reads a preference sheet and builds an instance over `committees`.
pub fn load_csv<R: io::Read>(
    reader: R,
    committees: &[CommitteeSpec],
) -> Result<Instance, LoadError> {
    let mut builder = InstanceBuilder::with_committees(committees)?;
    let mut csv = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let columns = Columns::resolve(csv.headers()?, &builder)?;

    for (i, record) in csv.records().enumerate() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let name = cell(columns.name);
        if name.is_empty() {
            return Err(LoadError::MissingName { row: i + 1 });
        }
        debug!(member = name, "processing");
        let member = builder.add_member(name)?;

        for &idx in &columns.choices {
            let choice = cell(idx);
            match builder.committee_id(choice) {
                Some(committee) => builder.prefer(member, committee)?,
                None => {
                    if !choice.is_empty() {
                        debug!(member = name, choice, "unknown committee ends preference list");
                    }
                    break;
                }
            }
        }

        for &(committee, idx) in &columns.committees {
            let value = cell(idx);
            let rank = parse_rank(value).ok_or_else(|| LoadError::InvalidRank {
                member: name.to_string(),
                committee: committees[committee.0].name.clone(),
                value: value.to_string(),
            })?;
            builder.score(committee, member, rank)?;
        }
    }

    Ok(builder.build())
}

/// Opens `path` and reads it with [`load_csv`].
pub fn load_csv_path<P: AsRef<Path>>(
    path: P,
    committees: &[CommitteeSpec],
) -> Result<Instance, LoadError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_csv(io::BufReader::new(file), committees)
}
