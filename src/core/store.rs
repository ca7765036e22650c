//! Record persistence
//!
//! A snapshot is a flat TOML document. Derived relations (student and
//! offering enrollment lists, faculty teaching sets, department membership)
//! are not stored; loading rebuilds them, and replays prerequisite edges and
//! meeting times through the validating operations so a hand-edited snapshot
//! cannot smuggle in a cycle or an overlap.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::capacity::OfferingCapacity;
use crate::core::catalog::Catalog;
use crate::core::errors::{CatalogError, RecordError};
use crate::core::models::{Course, CourseId, CourseOffering, Department, Enrollment, User};
use crate::{debug, info};

/// Failures reading or writing a snapshot
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("cannot access snapshot {path}: {source}")]
    Io {
        /// Snapshot path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Snapshot is not valid TOML for the record schema
    #[error("cannot parse snapshot: {0}")]
    Decode(#[from] toml::de::Error),

    /// Catalog could not be serialized
    #[error("cannot serialize snapshot: {0}")]
    Encode(#[from] toml::ser::Error),

    /// Snapshot parsed but violates a record invariant
    #[error("invalid snapshot: {0}")]
    Invalid(#[from] RecordError),
}

/// Persistence collaborator for a catalog
pub trait RecordStore {
    /// Read and validate a catalog
    ///
    /// # Errors
    /// Returns [`StoreError`] if the backing data cannot be read or is inconsistent
    fn load(&self) -> Result<Catalog, StoreError>;

    /// Persist a catalog
    ///
    /// # Errors
    /// Returns [`StoreError`] if the catalog cannot be written
    fn save(&self, catalog: &Catalog) -> Result<(), StoreError>;
}

/// One prerequisite edge: `prerequisite` must be completed before `course`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteEdge {
    /// Dependent course
    pub course: CourseId,
    /// Required course
    pub prerequisite: CourseId,
}

/// Serialized form of a [`Catalog`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Institution name
    #[serde(default)]
    pub name: String,
    /// Departments
    #[serde(default)]
    pub departments: Vec<Department>,
    /// Courses
    #[serde(default)]
    pub courses: Vec<Course>,
    /// Direct prerequisite edges
    #[serde(default)]
    pub prerequisites: Vec<PrerequisiteEdge>,
    /// Users of every role
    #[serde(default)]
    pub users: Vec<User>,
    /// Offerings with their meetings and instructor
    #[serde(default)]
    pub offerings: Vec<CourseOffering>,
    /// Enrollment records, withdrawn ones included
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
}

impl CatalogSnapshot {
    /// Capture the state of a catalog
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            name: catalog.name.clone(),
            departments: catalog.departments(),
            courses: catalog.courses(),
            prerequisites: catalog
                .graph()
                .edges()
                .map(|(course, prerequisite)| PrerequisiteEdge {
                    course: course.to_string(),
                    prerequisite: prerequisite.to_string(),
                })
                .collect(),
            users: catalog.users(),
            offerings: catalog.offerings(),
            enrollments: catalog.enrollments(),
        }
    }

    /// Rebuild a catalog, re-checking every invariant
    ///
    /// # Errors
    /// Returns the first [`RecordError`] raised while replaying the snapshot:
    /// duplicate or dangling ids, a prerequisite cycle, an overlapping meeting,
    /// an offering assigned to a non-faculty user, or an offering holding more
    /// active enrollments than its course has seats.
    pub fn into_catalog(self) -> Result<Catalog, RecordError> {
        let mut catalog = Catalog::new(self.name);

        for department in self.departments {
            catalog.add_department(department)?;
        }
        for course in self.courses {
            catalog.add_course(course, None)?;
        }
        for edge in &self.prerequisites {
            catalog.add_prerequisite(&edge.course, &edge.prerequisite)?;
        }
        for user in self.users {
            catalog.add_user(user)?;
        }

        for mut offering in self.offerings {
            let id = offering.id();
            let schedules = offering.take_schedules();
            let faculty = offering.faculty().map(str::to_string);
            offering.set_faculty(None);
            catalog.restore_offering(offering)?;

            let mut engine = catalog.registration();
            for schedule in schedules {
                engine.add_schedule(id, schedule)?;
            }
            if let Some(faculty) = faculty {
                engine.assign_faculty(&faculty, id)?;
            }
        }

        for enrollment in self.enrollments {
            catalog.link_enrollment(enrollment)?;
        }

        for offering in catalog.offerings() {
            if let Some(seats) = catalog.capacity(offering.id()).filter(OfferingCapacity::is_overfilled) {
                return Err(CatalogError::CapacityExceeded {
                    offering: offering.id(),
                    active: seats.active_count(),
                    capacity: seats.max_capacity,
                }
                .into());
            }
        }

        debug!(
            "Snapshot replayed: {} courses, {} offerings, {} enrollments",
            catalog.courses().len(),
            catalog.offerings().len(),
            catalog.enrollments().len()
        );
        Ok(catalog)
    }
}

/// TOML file-backed [`RecordStore`]
#[derive(Debug, Clone)]
pub struct TomlRecordStore {
    path: PathBuf,
}

impl TomlRecordStore {
    /// Store backed by the file at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot file location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a snapshot from TOML text
    ///
    /// # Errors
    /// Returns [`StoreError::Decode`] or [`StoreError::Invalid`]
    pub fn parse(content: &str) -> Result<Catalog, StoreError> {
        let snapshot: CatalogSnapshot = toml::from_str(content)?;
        Ok(snapshot.into_catalog()?)
    }

    /// Render a catalog as TOML text
    ///
    /// # Errors
    /// Returns [`StoreError::Encode`] if serialization fails
    pub fn render(catalog: &Catalog) -> Result<String, StoreError> {
        Ok(toml::to_string_pretty(&CatalogSnapshot::from_catalog(catalog))?)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RecordStore for TomlRecordStore {
    fn load(&self) -> Result<Catalog, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let catalog = Self::parse(&content)?;
        info!("Loaded records from {}", self.path.display());
        Ok(catalog)
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let rendered = Self::render(catalog)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, rendered).map_err(|e| self.io_error(e))?;
        info!("Saved records to {}", self.path.display());
        Ok(())
    }
}
