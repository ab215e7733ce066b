use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};

use crate::config::ReferenceDataConfig;

use super::companies::CompanyTable;
use super::titles::PatternTable;

const BUNDLED_COMPANIES: &str = include_str!("../../../data/companies.json");
const BUNDLED_TITLES: &str = include_str!("../../../data/job_titles.json");

/// Read-only lookup tables shared by every enrichment request.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub companies: CompanyTable,
    pub patterns: PatternTable,
}

impl ReferenceData {
    pub fn new(companies: CompanyTable, patterns: PatternTable) -> Self {
        Self {
            companies,
            patterns,
        }
    }

    /// Tables compiled into the binary.
    pub fn bundled() -> Result<Self, ReferenceDataError> {
        let companies = CompanyTable::from_json_reader(Cursor::new(BUNDLED_COMPANIES))
            .map_err(|source| ReferenceDataError::Json {
                path: None,
                source,
            })?;
        let patterns = PatternTable::from_json_reader(Cursor::new(BUNDLED_TITLES)).map_err(
            |source| ReferenceDataError::Json {
                path: None,
                source,
            },
        )?;
        Ok(Self::new(companies, patterns))
    }

    /// Loads configured table files, falling back to the bundled tables for
    /// any path that is not set.
    pub fn load(config: &ReferenceDataConfig) -> Result<Self, ReferenceDataError> {
        let bundled = Self::bundled()?;

        let companies = match config.companies_path.as_deref() {
            Some(path) => load_companies(path)?,
            None => bundled.companies,
        };
        let patterns = match config.titles_path.as_deref() {
            Some(path) => load_patterns(path)?,
            None => bundled.patterns,
        };

        Ok(Self::new(companies, patterns))
    }
}

fn load_companies(path: &Path) -> Result<CompanyTable, ReferenceDataError> {
    let reader = open(path)?;
    match extension(path).as_deref() {
        Some("json") => {
            CompanyTable::from_json_reader(reader).map_err(|source| ReferenceDataError::Json {
                path: Some(path.to_path_buf()),
                source,
            })
        }
        Some("csv") => {
            CompanyTable::from_csv_reader(reader).map_err(|source| ReferenceDataError::Csv {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(ReferenceDataError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn load_patterns(path: &Path) -> Result<PatternTable, ReferenceDataError> {
    if extension(path).as_deref() != Some("json") {
        return Err(ReferenceDataError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let reader = open(path)?;
    PatternTable::from_json_reader(reader).map_err(|source| ReferenceDataError::Json {
        path: Some(path.to_path_buf()),
        source,
    })
}

fn open(path: &Path) -> Result<BufReader<File>, ReferenceDataError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ReferenceDataError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

#[derive(Debug)]
pub enum ReferenceDataError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    Csv {
        path: PathBuf,
        source: csv::Error,
    },
    UnsupportedFormat {
        path: PathBuf,
    },
}

impl fmt::Display for ReferenceDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceDataError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ReferenceDataError::Json {
                path: Some(path),
                source,
            } => write!(f, "invalid JSON in {}: {}", path.display(), source),
            ReferenceDataError::Json { path: None, source } => {
                write!(f, "invalid bundled reference data: {}", source)
            }
            ReferenceDataError::Csv { path, source } => {
                write!(f, "invalid CSV in {}: {}", path.display(), source)
            }
            ReferenceDataError::UnsupportedFormat { path } => write!(
                f,
                "unsupported reference data format for {} (expected .json or .csv)",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ReferenceDataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReferenceDataError::Io { source, .. } => Some(source),
            ReferenceDataError::Json { source, .. } => Some(source),
            ReferenceDataError::Csv { source, .. } => Some(source),
            ReferenceDataError::UnsupportedFormat { .. } => None,
        }
    }
}
