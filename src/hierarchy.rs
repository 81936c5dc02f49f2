//! Area hierarchy helpers: cycle detection over parent links and display paths.

use std::collections::HashMap;

use crate::error::HubtasksError;

/// Detect cycles in a parent graph using DFS 3-colouring.
/// edges: `(child, parent)` pairs.
pub fn detect_cycle(nodes: &[String], edges: &[(String, String)]) -> Result<(), HubtasksError> {
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for node in nodes {
        adj.entry(node.as_str()).or_default();
    }
    for (child, parent) in edges {
        adj.entry(child.as_str()).or_default().push(parent.as_str());
    }

    // 0=white, 1=gray, 2=black
    let mut color: HashMap<&str, u8> = adj.keys().map(|node| (*node, 0)).collect();

    for node in adj.keys() {
        if color[node] == 0 && has_cycle_dfs(node, &adj, &mut color) {
            return Err(HubtasksError::validation(format!(
                "Area hierarchy contains a cycle through '{node}'"
            )));
        }
    }
    Ok(())
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    color: &mut HashMap<&'a str, u8>,
) -> bool {
    color.insert(node, 1);
    if let Some(parents) = adj.get(node) {
        for &parent in parents {
            match color.get(parent) {
                Some(1) => return true,
                Some(0) | None => {
                    if has_cycle_dfs(parent, adj, color) {
                        return true;
                    }
                }
                _ => {}
            }
        }
    }
    color.insert(node, 2);
    false
}

/// Walk parent links from `name` to the root. Returns `(level, "Root / … / name")`.
/// Must only be called on an acyclic map (see [`detect_cycle`]).
pub fn path_of(name: &str, parents: &HashMap<String, Option<String>>) -> (u32, String) {
    let mut chain = vec![name.to_string()];
    let mut current = name;
    while let Some(Some(parent)) = parents.get(current) {
        chain.push(parent.clone());
        current = parent;
    }
    chain.reverse();
    ((chain.len() - 1) as u32, chain.join(" / "))
}
