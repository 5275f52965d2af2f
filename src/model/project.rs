//! The project: an ordered list of elevations.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProjectError;
use crate::model::{Cabinet, ItemRef, ItemType, RuData};

/// A cabinet shown as a front-view elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Elevation {
    pub cabinet: Cabinet,
}

impl Elevation {
    pub fn new(cabinet: Cabinet) -> Self {
        Self { cabinet }
    }
}

/// Complete project data. Replaced wholesale on every write.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Project {
    pub elevations: Vec<Elevation>,
}

impl Project {
    /// Create a new empty project.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a project from cabinets, validating every invariant.
    pub fn from_cabinets(cabinets: Vec<Cabinet>) -> Result<Self, ProjectError> {
        let project = Self {
            elevations: cabinets.into_iter().map(Elevation::new).collect(),
        };
        project.validate()?;
        Ok(project)
    }

    /// Parse a project from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ProjectLoadError> {
        let project: Self = serde_json::from_str(json)?;
        project.validate()?;
        Ok(project)
    }

    /// Read and validate a project file.
    pub fn load(path: &Path) -> Result<Self, ProjectLoadError> {
        let json = std::fs::read_to_string(path)?;
        let project = Self::from_json(&json)?;
        log::info!(
            "Loaded {} elevations from {}",
            project.elevation_count(),
            path.display()
        );
        Ok(project)
    }

    /// Append an elevation, rejecting duplicate cabinet ids.
    pub fn push_cabinet(&mut self, cabinet: Cabinet) -> Result<(), ProjectError> {
        if self.cabinet(&cabinet.id).is_some() {
            return Err(ProjectError::DuplicateCabinetId { id: cabinet.id });
        }
        cabinet.validate()?;
        self.elevations.push(Elevation::new(cabinet));
        Ok(())
    }

    /// Check cabinet id uniqueness and every cabinet's own invariants.
    pub fn validate(&self) -> Result<(), ProjectError> {
        let mut seen = HashSet::new();
        for cabinet in self.cabinets() {
            if !seen.insert(cabinet.id.as_str()) {
                return Err(ProjectError::DuplicateCabinetId {
                    id: cabinet.id.clone(),
                });
            }
            cabinet.validate()?;
        }
        Ok(())
    }

    pub fn elevation_count(&self) -> usize {
        self.elevations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevations.is_empty()
    }

    /// Cabinets in project order.
    pub fn cabinets(&self) -> impl Iterator<Item = &Cabinet> {
        self.elevations.iter().map(|e| &e.cabinet)
    }

    pub fn cabinet(&self, id: &str) -> Option<&Cabinet> {
        self.cabinets().find(|c| c.id == id)
    }

    pub fn cabinet_mut(&mut self, id: &str) -> Option<&mut Cabinet> {
        self.elevations
            .iter_mut()
            .map(|e| &mut e.cabinet)
            .find(|c| c.id == id)
    }

    /// Look up an RU by its owning cabinet and id.
    pub fn ru(&self, cabinet_id: &str, ru_id: &str) -> Option<(&Cabinet, &RuData)> {
        let cabinet = self.cabinet(cabinet_id)?;
        let ru = cabinet.ru(ru_id)?;
        Some((cabinet, ru))
    }

    /// Whether the referenced item currently exists.
    pub fn contains(&self, item: &ItemRef) -> bool {
        match item.item_type {
            ItemType::Cabinet => self.cabinet(&item.item_id).is_some(),
            ItemType::Ru => self.ru(&item.parent_id, &item.item_id).is_some(),
        }
    }
}

/// Errors from reading a project file.
#[derive(Debug, thiserror::Error)]
pub enum ProjectLoadError {
    /// JSON parsing error
    #[error("Failed to parse project: {0}")]
    Parse(#[from] serde_json::Error),

    /// Parsed project violates an invariant
    #[error("Invalid project: {0}")]
    Invalid(#[from] ProjectError),

    /// I/O error when reading the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RackDimensions;

    fn cabinet(id: &str) -> Cabinet {
        Cabinet::new(id, 4, RackDimensions::new(24.0, 20.0, 30.0)).with_id(id)
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Project::from_cabinets(vec![cabinet("a"), cabinet("a")]);
        assert_eq!(
            result,
            Err(ProjectError::DuplicateCabinetId {
                id: "a".to_string()
            })
        );

        let mut project = Project::from_cabinets(vec![cabinet("a")]).unwrap();
        assert!(project.push_cabinet(cabinet("a")).is_err());
        assert!(project.push_cabinet(cabinet("b")).is_ok());
        assert_eq!(project.elevation_count(), 2);
    }

    #[test]
    fn test_contains() {
        let project = Project::from_cabinets(vec![cabinet("a"), cabinet("b")]).unwrap();

        assert!(project.contains(&ItemRef::cabinet("a")));
        assert!(project.contains(&ItemRef::ru("b", "b-ru-4")));
        assert!(!project.contains(&ItemRef::ru("a", "b-ru-4")));
        assert!(!project.contains(&ItemRef::ru("b", "b-ru-5")));
        assert!(!project.contains(&ItemRef::cabinet("c")));
    }

    #[test]
    fn test_json_load_validates() {
        let project = Project::from_cabinets(vec![cabinet("a")]).unwrap();
        let json = serde_json::to_string(&project).unwrap();
        let loaded = Project::from_json(&json).unwrap();
        assert_eq!(loaded, project);

        let mut broken = project.clone();
        broken.elevations[0].cabinet.ru_count = 5;
        let json = serde_json::to_string(&broken).unwrap();
        assert!(matches!(
            Project::from_json(&json),
            Err(ProjectLoadError::Invalid(ProjectError::RuCountMismatch { .. }))
        ));

        assert!(matches!(
            Project::from_json("{ not json"),
            Err(ProjectLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("rackelev-project-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("project.json");

        let project = Project::from_cabinets(vec![cabinet("a"), cabinet("b")]).unwrap();
        std::fs::write(&path, serde_json::to_string(&project).unwrap()).unwrap();
        assert_eq!(Project::load(&path).unwrap(), project);

        let missing = dir.join("missing.json");
        assert!(matches!(
            Project::load(&missing),
            Err(ProjectLoadError::Io(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
