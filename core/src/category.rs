//! Category navigation types and tree assembly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL slug (unique).
    pub slug: String,
    /// Description.
    pub description: Option<String>,
    /// Parent category.
    pub parent_id: Option<i64>,
    /// Image URL.
    pub image_url: Option<String>,
    /// Position among siblings.
    pub sort_order: i32,
    /// Hidden categories are excluded from navigation.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A category with its children, as served by the tree endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    /// The category.
    #[serde(flatten)]
    pub category: Category,
    /// Name of the parent category, if any.
    pub parent_name: Option<String>,
    /// Child categories, in input order.
    pub children: Vec<CategoryNode>,
}

/// Assemble a forest from categories paired with their parent names.
///
/// Input order (sort order, then name) is kept among siblings. Categories
/// whose parent is absent from the input become roots. Each category
/// appears exactly once; if the input contains a parent cycle, the first
/// unvisited member of the cycle is promoted to a root.
#[must_use]
pub fn build_tree(entries: Vec<(Category, Option<String>)>) -> Vec<CategoryNode> {
    let ids: HashSet<i64> = entries.iter().map(|(category, _)| category.id).collect();

    let mut children: HashMap<i64, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();
    for (idx, (category, _)) in entries.iter().enumerate() {
        match category.parent_id {
            Some(parent) if parent != category.id && ids.contains(&parent) => {
                children.entry(parent).or_default().push(idx);
            }
            _ => roots.push(idx),
        }
    }

    let mut visited = vec![false; entries.len()];
    let mut forest: Vec<CategoryNode> = roots
        .into_iter()
        .filter_map(|idx| assemble(idx, &entries, &children, &mut visited))
        .collect();

    for idx in 0..entries.len() {
        if let Some(node) = assemble(idx, &entries, &children, &mut visited) {
            forest.push(node);
        }
    }

    forest
}

fn assemble(
    idx: usize,
    entries: &[(Category, Option<String>)],
    children: &HashMap<i64, Vec<usize>>,
    visited: &mut [bool],
) -> Option<CategoryNode> {
    if visited.get(idx).copied().unwrap_or(true) {
        return None;
    }
    visited[idx] = true;

    let (category, parent_name) = entries.get(idx)?;
    let kids = children
        .get(&category.id)
        .map(|kids| {
            kids.iter()
                .filter_map(|&kid| assemble(kid, entries, children, visited))
                .collect()
        })
        .unwrap_or_default();

    Some(CategoryNode {
        category: category.clone(),
        parent_name: parent_name.clone(),
        children: kids,
    })
}
