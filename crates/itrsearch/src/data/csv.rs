//! CSV ingestion.
//!
//! # Format
//!
//! The first line is a header. The first column holds a subject id and is
//! ignored. Every other column is classified by the prefix of its name:
//!
//! | Prefix | Meaning |
//! |--------|---------|
//! | `cont_` | continuous covariate (decile cuts) |
//! | `ord_` | ordinal covariate |
//! | `nom_` | nominal covariate |
//! | `act_` | action code (0 or 1) |
//! | `resp_` | response value |
//!
//! Covariate names have their prefix stripped and keep their file order. A
//! file may carry several action and response columns; [`CsvOptions`]
//! selects one of each by position.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use ndarray::Array2;

use super::binning::VariableKind;
use super::dataset::{DatasetError, ItrDataset};

/// Errors that can occur when loading a CSV dataset.
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("input has no header line")]
    MissingHeader,

    #[error("header column {index} ({name:?}) has no recognized prefix")]
    UnknownColumn { index: usize, name: String },

    #[error("no {kind} column at position {position} ({available} available)")]
    MissingColumn {
        kind: &'static str,
        position: usize,
        available: usize,
    },

    #[error("line {line}: expected {expected} fields, got {got}")]
    FieldCount {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("line {line}, column {column:?}: cannot parse {value:?}")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Options for [`read_csv`] and [`load_csv`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter. Default: `,`.
    pub delimiter: char,
    /// Which `act_` column to use, by position among action columns.
    pub action_column: usize,
    /// Which `resp_` column to use, by position among response columns.
    pub response_column: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            action_column: 0,
            response_column: 0,
        }
    }
}

/// Role of one CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Id,
    Covariate(VariableKind),
    Action,
    Response,
}

/// Parsed header: role and name of every column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvHeader {
    roles: Vec<ColumnRole>,
    names: Vec<String>,
}

impl CsvHeader {
    /// Classify the columns of a header line.
    pub fn parse(line: &str, delimiter: char) -> Result<Self, CsvError> {
        let mut roles = Vec::new();
        let mut names = Vec::new();

        for (index, raw) in line.split(delimiter).enumerate() {
            let name = raw.trim();
            let (role, stripped) = if index == 0 {
                (ColumnRole::Id, name)
            } else if let Some(rest) = name.strip_prefix(VariableKind::Continuous.prefix()) {
                (ColumnRole::Covariate(VariableKind::Continuous), rest)
            } else if let Some(rest) = name.strip_prefix(VariableKind::Ordinal.prefix()) {
                (ColumnRole::Covariate(VariableKind::Ordinal), rest)
            } else if let Some(rest) = name.strip_prefix(VariableKind::Nominal.prefix()) {
                (ColumnRole::Covariate(VariableKind::Nominal), rest)
            } else if let Some(rest) = name.strip_prefix("act_") {
                (ColumnRole::Action, rest)
            } else if let Some(rest) = name.strip_prefix("resp_") {
                (ColumnRole::Response, rest)
            } else {
                return Err(CsvError::UnknownColumn {
                    index,
                    name: name.to_string(),
                });
            };
            roles.push(role);
            names.push(stripped.to_string());
        }

        Ok(Self { roles, names })
    }

    #[inline]
    pub fn n_columns(&self) -> usize {
        self.roles.len()
    }

    #[inline]
    pub fn roles(&self) -> &[ColumnRole] {
        &self.roles
    }

    /// Number of columns with a given role.
    pub fn count(&self, role: ColumnRole) -> usize {
        self.roles.iter().filter(|&&r| r == role).count()
    }

    /// Column indices of all covariates, in file order.
    pub fn covariate_columns(&self) -> Vec<usize> {
        self.columns_where(|r| matches!(r, ColumnRole::Covariate(_)))
    }

    fn columns_where(&self, pred: impl Fn(ColumnRole) -> bool) -> Vec<usize> {
        (0..self.roles.len()).filter(|&i| pred(self.roles[i])).collect()
    }

    fn select(&self, role: ColumnRole, kind: &'static str, position: usize) -> Result<usize, CsvError> {
        let columns = self.columns_where(|r| r == role);
        columns.get(position).copied().ok_or(CsvError::MissingColumn {
            kind,
            position,
            available: columns.len(),
        })
    }
}

/// Load a dataset from a CSV file.
pub fn load_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<ItrDataset, CsvError> {
    let file = File::open(path)?;
    read_csv(BufReader::new(file), options)
}

/// Read a dataset from any buffered CSV source.
///
/// # Example
///
/// ```
/// use itrsearch::data::{CsvOptions, read_csv};
/// use itrsearch::DatasetProvider;
///
/// let text = "id,cont_age,nom_site,act_treat,resp_y\n\
///             1,30,0,1,2.5\n\
///             2,45,1,0,1.0\n\
///             3,52,1,1,3.0\n";
/// let ds = read_csv(text.as_bytes(), &CsvOptions::default()).unwrap();
/// assert_eq!(ds.n_samples(), 3);
/// assert_eq!(ds.names(), &["age".to_string(), "site".to_string()]);
/// ```
pub fn read_csv<R: BufRead>(reader: R, options: &CsvOptions) -> Result<ItrDataset, CsvError> {
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break CsvHeader::parse(&line, options.delimiter)?;
                }
            }
            None => return Err(CsvError::MissingHeader),
        }
    };

    let covariate_columns = header.covariate_columns();
    let action_column = header.select(ColumnRole::Action, "action", options.action_column)?;
    let response_column = header.select(ColumnRole::Response, "response", options.response_column)?;

    let n_vars = covariate_columns.len();
    // Sample-major while reading, transposed at the end
    let mut values: Vec<f64> = Vec::new();
    let mut actions: Vec<u8> = Vec::new();
    let mut responses: Vec<f64> = Vec::new();

    for (index, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;

        let fields: Vec<&str> = line.split(options.delimiter).map(str::trim).collect();
        if fields.len() != header.n_columns() {
            return Err(CsvError::FieldCount {
                line: line_no,
                expected: header.n_columns(),
                got: fields.len(),
            });
        }

        for &column in &covariate_columns {
            values.push(parse_field(&header, &fields, column, line_no)?);
        }
        actions.push(parse_field(&header, &fields, action_column, line_no)?);
        responses.push(parse_field(&header, &fields, response_column, line_no)?);
    }

    let n_samples = responses.len();
    let n_values = values.len();
    let covariates = Array2::from_shape_vec((n_samples, n_vars), values)
        .map_err(|_| DatasetError::ShapeMismatch {
            what: "covariates",
            expected: n_samples * n_vars,
            got: n_values,
        })?
        .reversed_axes()
        .as_standard_layout()
        .into_owned();

    let kinds: Vec<VariableKind> = covariate_columns
        .iter()
        .map(|&c| match header.roles[c] {
            ColumnRole::Covariate(kind) => kind,
            _ => unreachable!("covariate column {c} has a non-covariate role"),
        })
        .collect();
    let names: Vec<String> = covariate_columns
        .iter()
        .map(|&c| header.names[c].clone())
        .collect();

    Ok(ItrDataset::builder()
        .covariates(covariates)
        .kinds(kinds)
        .names(names)
        .actions(actions)
        .responses(responses)
        .build()?)
}

fn parse_field<T: std::str::FromStr>(
    header: &CsvHeader,
    fields: &[&str],
    column: usize,
    line: usize,
) -> Result<T, CsvError> {
    fields[column].parse().map_err(|_| CsvError::InvalidNumber {
        line,
        column: header.names[column].clone(),
        value: fields[column].to_string(),
    })
}
