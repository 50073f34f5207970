//! Tree Utilities
//!
//! Builds the project hierarchy from flat parent references and flattens it
//! for rendering. Everything here is iterative, so malformed input cannot
//! blow the stack.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;

use crate::error::TreeError;
use crate::models::{Project, RecordId};

/// A project together with its nested children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeProject {
    #[serde(flatten)]
    pub project: Project,
    pub children: Vec<TreeProject>,
}

/// One display row produced by [`flatten_tree`]
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub project: Project,
    pub depth: usize,
    pub has_children: bool,
}

/// Group project indices by parent id, preserving input order
fn children_by_parent(projects: &[Project]) -> HashMap<Option<&RecordId>, Vec<usize>> {
    let mut children_map: HashMap<Option<&RecordId>, Vec<usize>> = HashMap::new();
    for (idx, project) in projects.iter().enumerate() {
        children_map
            .entry(project.parent_id.as_ref())
            .or_default()
            .push(idx);
    }
    children_map
}

fn index_by_id(projects: &[Project]) -> Result<HashMap<&RecordId, usize>, TreeError> {
    let mut index = HashMap::with_capacity(projects.len());
    for (idx, project) in projects.iter().enumerate() {
        if index.insert(&project.id, idx).is_some() {
            return Err(TreeError::DuplicateId {
                id: project.id.clone(),
            });
        }
    }
    Ok(index)
}

/// Walk every parent chain once; any chain that revisits a node on the
/// current walk is a cycle.
fn check_cycles(projects: &[Project], index: &HashMap<&RecordId, usize>) -> Result<(), TreeError> {
    const UNSEEN: u8 = 0;
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNSEEN; projects.len()];
    for start in 0..projects.len() {
        if state[start] != UNSEEN {
            continue;
        }
        let mut path = Vec::new();
        let mut current = Some(start);
        while let Some(idx) = current {
            match state[idx] {
                DONE => break,
                ON_PATH => {
                    return Err(TreeError::Cycle {
                        id: projects[idx].id.clone(),
                    })
                }
                _ => {}
            }
            state[idx] = ON_PATH;
            path.push(idx);
            current = projects[idx]
                .parent_id
                .as_ref()
                .and_then(|parent| index.get(parent).copied());
        }
        for idx in path {
            state[idx] = DONE;
        }
    }
    Ok(())
}

/// Build the forest rooted at `root` (`None` = top-level projects).
///
/// Each node's children are exactly the projects whose `parent_id` equals
/// its id, in input order. Projects whose parent is missing from the list
/// never appear.
pub fn build_project_tree(
    projects: &[Project],
    root: Option<&RecordId>,
) -> Result<Vec<TreeProject>, TreeError> {
    let index = index_by_id(projects)?;
    check_cycles(projects, &index)?;
    let children_map = children_by_parent(projects);

    // Breadth-first discovery order; parents always precede their children
    let mut order = Vec::new();
    let mut visited = HashSet::new();
    let mut queue: VecDeque<usize> = children_map
        .get(&root)
        .map(|roots| roots.iter().copied().collect())
        .unwrap_or_default();
    while let Some(idx) = queue.pop_front() {
        if !visited.insert(idx) {
            return Err(TreeError::Cycle {
                id: projects[idx].id.clone(),
            });
        }
        order.push(idx);
        if let Some(children) = children_map.get(&Some(&projects[idx].id)) {
            queue.extend(children.iter().copied());
        }
    }

    // Assemble bottom-up
    let mut built: HashMap<usize, TreeProject> = HashMap::with_capacity(order.len());
    for &idx in order.iter().rev() {
        let children = children_map
            .get(&Some(&projects[idx].id))
            .map(|kids| kids.iter().filter_map(|kid| built.remove(kid)).collect())
            .unwrap_or_default();
        built.insert(
            idx,
            TreeProject {
                project: projects[idx].clone(),
                children,
            },
        );
    }

    let roots = children_map.get(&root).map(Vec::as_slice).unwrap_or(&[]);
    Ok(roots.iter().filter_map(|idx| built.remove(idx)).collect())
}

/// Projects whose parent id does not exist in the list
pub fn orphaned_projects(projects: &[Project]) -> Vec<&Project> {
    let ids: HashSet<&RecordId> = projects.iter().map(|p| &p.id).collect();
    projects
        .iter()
        .filter(|p| p.parent_id.as_ref().is_some_and(|parent| !ids.contains(parent)))
        .collect()
}

/// `id` plus every project below it
pub fn descendant_ids(projects: &[Project], id: &RecordId) -> HashSet<RecordId> {
    let children_map = children_by_parent(projects);
    let mut found = HashSet::new();
    let mut queue = VecDeque::from([id.clone()]);
    while let Some(current) = queue.pop_front() {
        if !found.insert(current.clone()) {
            continue;
        }
        if let Some(children) = children_map.get(&Some(&current)) {
            queue.extend(children.iter().map(|&idx| projects[idx].id.clone()));
        }
    }
    found
}

/// Render the forest as indented rows using pre-order DFS.
/// Descendants of collapsed projects are skipped.
pub fn flatten_tree(forest: &[TreeProject], collapsed: &HashSet<RecordId>) -> Vec<TreeRow> {
    let mut result = Vec::new();
    let mut stack: Vec<(&TreeProject, usize)> = forest.iter().rev().map(|node| (node, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        result.push(TreeRow {
            project: node.project.clone(),
            depth,
            has_children: !node.children.is_empty(),
        });
        if !collapsed.contains(&node.project.id) {
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
    }
    result
}
