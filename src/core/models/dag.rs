//! Directed acyclic graph of course prerequisites

use super::CourseId;
use crate::core::errors::PrerequisiteError;
use std::collections::{HashMap, HashSet};

/// Directed graph of course prerequisites, kept acyclic on insertion
///
/// The graph uses two association lists:
/// - `dependencies`: maps each course to its direct prerequisites
/// - `dependents`: maps each course to the courses that directly require it (reverse graph)
///
/// An edge `course -> prerequisite` means the prerequisite must be completed
/// before `course` may be taken.
#[derive(Debug, Clone, Default)]
pub struct PrerequisiteGraph {
    dependencies: HashMap<CourseId, Vec<CourseId>>,
    dependents: HashMap<CourseId, Vec<CourseId>>,
    courses: Vec<CourseId>,
}

impl PrerequisiteGraph {
    /// Create a new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a course as a vertex (no-op if present)
    pub fn add_course(&mut self, course_key: &str) {
        if !self.contains_course(course_key) {
            self.courses.push(course_key.to_string());
            self.dependencies.entry(course_key.to_string()).or_default();
            self.dependents.entry(course_key.to_string()).or_default();
        }
    }

    /// Add a prerequisite edge
    ///
    /// # Arguments
    /// * `course` - Course that requires the prerequisite
    /// * `prerequisite` - Course that must be completed first
    ///
    /// # Returns
    /// `Ok(true)` if the edge was inserted, `Ok(false)` if it already existed
    ///
    /// # Errors
    /// - [`PrerequisiteError::SelfDependency`] when `course == prerequisite`
    /// - [`PrerequisiteError::CycleDetected`] when `prerequisite` already depends on `course`
    ///
    /// The graph is unchanged on error.
    pub fn add_edge(&mut self, course: &str, prerequisite: &str) -> Result<bool, PrerequisiteError> {
        if course == prerequisite {
            return Err(PrerequisiteError::SelfDependency(course.to_string()));
        }
        if self.is_prerequisite_of(course, prerequisite) {
            return Err(PrerequisiteError::CycleDetected {
                course: course.to_string(),
                prerequisite: prerequisite.to_string(),
            });
        }
        if self.has_edge(course, prerequisite) {
            return Ok(false);
        }

        self.add_course(course);
        self.add_course(prerequisite);

        if let Some(deps) = self.dependencies.get_mut(course) {
            deps.push(prerequisite.to_string());
        }
        if let Some(deps) = self.dependents.get_mut(prerequisite) {
            deps.push(course.to_string());
        }
        Ok(true)
    }

    /// Remove a direct prerequisite edge
    ///
    /// # Returns
    /// `true` if the edge existed and was removed
    pub fn remove_edge(&mut self, course: &str, prerequisite: &str) -> bool {
        let removed = self
            .dependencies
            .get_mut(course)
            .is_some_and(|deps| remove_value(deps, prerequisite));
        if removed {
            if let Some(deps) = self.dependents.get_mut(prerequisite) {
                remove_value(deps, course);
            }
        }
        removed
    }

    /// Whether `candidate` appears anywhere in the transitive prerequisites of `course`
    ///
    /// Depth-first over the prerequisite edges of `course`. The visited set
    /// keeps the walk finite even if the edge lists were corrupted outside this API.
    #[must_use]
    pub fn is_prerequisite_of(&self, candidate: &str, course: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![course];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(prereqs) = self.dependencies.get(current) else {
                continue;
            };
            for prereq in prereqs {
                if prereq == candidate {
                    return true;
                }
                stack.push(prereq);
            }
        }
        false
    }

    /// Whether the direct edge `course -> prerequisite` exists
    #[must_use]
    pub fn has_edge(&self, course: &str, prerequisite: &str) -> bool {
        self.dependencies
            .get(course)
            .is_some_and(|deps| deps.iter().any(|d| d == prerequisite))
    }

    /// Direct prerequisites of a course (a copy; empty if unknown)
    #[must_use]
    pub fn prerequisites(&self, course_key: &str) -> Vec<CourseId> {
        self.dependencies.get(course_key).cloned().unwrap_or_default()
    }

    /// Courses that directly require the given course (a copy; empty if unknown)
    #[must_use]
    pub fn dependents(&self, course_key: &str) -> Vec<CourseId> {
        self.dependents.get(course_key).cloned().unwrap_or_default()
    }

    /// All direct edges as `(course, prerequisite)` pairs
    ///
    /// Grouped by course in vertex registration order; within a course the
    /// prerequisites keep the order their edges were added in.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.courses.iter().flat_map(move |course| {
            self.dependencies
                .get(course)
                .into_iter()
                .flatten()
                .map(move |prereq| (course.as_str(), prereq.as_str()))
        })
    }

    /// Drop a course and every edge touching it
    pub fn remove_course(&mut self, course_key: &str) {
        for prereq in self.prerequisites(course_key) {
            self.remove_edge(course_key, &prereq);
        }
        for dependent in self.dependents(course_key) {
            self.remove_edge(&dependent, course_key);
        }
        self.dependencies.remove(course_key);
        self.dependents.remove(course_key);
        self.courses.retain(|c| c != course_key);
    }

    /// Get the number of courses in the graph
    #[must_use]
    pub const fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Check if a course exists in the graph
    #[must_use]
    pub fn contains_course(&self, course_key: &str) -> bool {
        self.dependencies.contains_key(course_key)
    }
}

fn remove_value(values: &mut Vec<CourseId>, target: &str) -> bool {
    let before = values.len();
    values.retain(|v| v != target);
    values.len() != before
}

impl std::fmt::Display for PrerequisiteGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Prerequisite graph ({} courses):", self.courses.len())?;
        writeln!(f)?;

        // Sort courses for consistent output
        let mut sorted_courses = self.courses.clone();
        sorted_courses.sort();

        for course_key in sorted_courses {
            if let Some(deps) = self.dependencies.get(&course_key) {
                if deps.is_empty() {
                    writeln!(f, "  {course_key} → (no prerequisites)")?;
                } else {
                    let deps_str = deps.join(", ");
                    writeln!(f, "  {course_key} → {deps_str}")?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_creation() {
        let graph = PrerequisiteGraph::new();
        assert_eq!(graph.course_count(), 0);
    }

    #[test]
    fn test_add_edge_registers_both_courses() {
        let mut graph = PrerequisiteGraph::new();
        assert_eq!(graph.add_edge("CS220", "CS165"), Ok(true));

        assert_eq!(graph.course_count(), 2);
        assert!(graph.contains_course("CS220"));
        assert!(graph.contains_course("CS165"));
        assert_eq!(graph.prerequisites("CS220"), vec!["CS165".to_string()]);
        assert_eq!(graph.dependents("CS165"), vec!["CS220".to_string()]);
    }

    #[test]
    fn test_duplicate_edge_is_not_added() {
        let mut graph = PrerequisiteGraph::new();
        assert_eq!(graph.add_edge("CS220", "CS165"), Ok(true));
        assert_eq!(graph.add_edge("CS220", "CS165"), Ok(false));
        assert_eq!(graph.prerequisites("CS220").len(), 1);
    }

    #[test]
    fn test_self_dependency_rejected() {
        let mut graph = PrerequisiteGraph::new();
        assert_eq!(
            graph.add_edge("CS165", "CS165"),
            Err(PrerequisiteError::SelfDependency("CS165".to_string()))
        );
        assert_eq!(graph.course_count(), 0);
    }

    #[test]
    fn test_transitive_reachability_and_cycle_rejection() {
        let mut graph = PrerequisiteGraph::new();
        graph.add_edge("A", "B").unwrap();
        graph.add_edge("B", "C").unwrap();

        assert!(graph.is_prerequisite_of("C", "A"));
        assert!(graph.is_prerequisite_of("B", "A"));
        assert!(!graph.is_prerequisite_of("A", "C"));

        let err = graph.add_edge("C", "A").unwrap_err();
        assert!(matches!(err, PrerequisiteError::CycleDetected { .. }));
        assert!(!graph.has_edge("C", "A"));
        assert!(graph.prerequisites("C").is_empty());
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut graph = PrerequisiteGraph::new();
        graph.add_edge("D", "B").unwrap();
        graph.add_edge("D", "C").unwrap();
        graph.add_edge("B", "A").unwrap();
        assert_eq!(graph.add_edge("C", "A"), Ok(true));
        assert!(graph.is_prerequisite_of("A", "D"));
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = PrerequisiteGraph::new();
        graph.add_edge("B", "A").unwrap();
        assert!(graph.remove_edge("B", "A"));
        assert!(!graph.remove_edge("B", "A"));
        assert!(graph.dependents("A").is_empty());
        // Once removed, the reverse edge is legal
        assert_eq!(graph.add_edge("A", "B"), Ok(true));
    }

    #[test]
    fn test_remove_course_drops_incident_edges() {
        let mut graph = PrerequisiteGraph::new();
        graph.add_edge("C", "B").unwrap();
        graph.add_edge("B", "A").unwrap();
        graph.remove_course("B");
        assert!(!graph.contains_course("B"));
        assert!(graph.prerequisites("C").is_empty());
        assert!(graph.dependents("A").is_empty());
    }

    #[test]
    fn test_edges_grouped_by_vertex_order() {
        let mut graph = PrerequisiteGraph::new();
        graph.add_course("CS220");
        graph.add_edge("CS320", "CS220").unwrap();
        graph.add_edge("CS320", "CS165").unwrap();
        graph.add_edge("CS220", "CS165").unwrap();
        let edges: Vec<_> = graph.edges().collect();
        // CS220 was registered first, so its edge leads even though it was added last
        assert_eq!(
            edges,
            vec![("CS220", "CS165"), ("CS320", "CS220"), ("CS320", "CS165")]
        );
    }

    #[test]
    fn test_graph_display() {
        let mut graph = PrerequisiteGraph::new();
        graph.add_edge("CS220", "CS165").unwrap();
        graph.add_edge("CS220", "MATH156").unwrap();
        graph.add_course("CS1800");

        let display = format!("{graph}");
        assert!(display.contains("Prerequisite graph"));
        assert!(display.contains("CS220 → CS165, MATH156"));
        assert!(display.contains("CS1800 → (no prerequisites)"));
    }
}
