use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::workflows::appraisal::{
    DepartmentId, DepartmentMembership, InMemoryDirectory, StaffId, StaffLevel, StaffRecord,
};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownLevel { staff_id: String, value: String },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read staff roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::UnknownLevel { staff_id, value } => write!(
                f,
                "staff member '{}' carries unrecognized level '{}'",
                staff_id, value
            ),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::UnknownLevel { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One roster row; a staff member appearing in several departments spans
/// several rows, one per membership.
#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Staff ID")]
    staff_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Primary", default)]
    primary: Option<String>,
    #[serde(rename = "Level")]
    level: String,
}

impl RosterRow {
    fn is_primary(&self) -> bool {
        matches!(
            self.primary.as_deref().map(str::trim),
            Some("yes") | Some("Yes") | Some("YES") | Some("true") | Some("1")
        )
    }
}

/// Builds an in-memory staff directory from a roster CSV export with the
/// header `Staff ID,Name,Department,Primary,Level`.
pub struct StaffRosterImporter;

impl StaffRosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<InMemoryDirectory, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<InMemoryDirectory, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut staged: BTreeMap<StaffId, StaffRecord> = BTreeMap::new();

        for record in csv_reader.deserialize::<RosterRow>() {
            let row = record?;
            let level = StaffLevel::parse(&row.level).ok_or_else(|| {
                RosterImportError::UnknownLevel {
                    staff_id: row.staff_id.clone(),
                    value: row.level.clone(),
                }
            })?;

            let membership = DepartmentMembership {
                department: DepartmentId(row.department.clone()),
                primary: row.is_primary(),
            };

            let entry = staged
                .entry(StaffId(row.staff_id.clone()))
                .or_insert_with(|| StaffRecord {
                    id: StaffId(row.staff_id.clone()),
                    name: row.name.clone(),
                    level,
                    memberships: Vec::new(),
                });

            entry.name = row.name;
            entry.level = level;
            if !entry
                .memberships
                .iter()
                .any(|existing| existing.department == membership.department)
            {
                entry.memberships.push(membership);
            }
        }

        let directory = InMemoryDirectory::default();
        for record in staged.into_values() {
            directory.upsert_staff(record);
        }

        Ok(directory)
    }
}
