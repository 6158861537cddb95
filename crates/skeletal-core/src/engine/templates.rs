use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::VertexId;
use itertools::Itertools;
use phf::{Map, phf_map};
use std::collections::HashMap;

const SQRT3: f64 = 1.7320508075688772;
const SQRT3_2: f64 = 0.8660254037844386;

/// A curated unit-bond depiction for a polycyclic system whose preferred
/// drawing differs from what polygon expansion produces.
#[derive(Debug)]
pub(crate) struct RingTemplate {
    pub name: &'static str,
    /// One planar position per template vertex.
    pub coordinates: &'static [(f64, f64)],
    /// Adjacency over template vertex indices.
    pub edges: &'static [(usize, usize)],
}

static TEMPLATES: [RingTemplate; 3] = [
    RingTemplate {
        name: "naphthalene",
        coordinates: &[
            (0.0, 0.5),
            (0.0, -0.5),
            (-SQRT3_2, 1.0),
            (-SQRT3, 0.5),
            (-SQRT3, -0.5),
            (-SQRT3_2, -1.0),
            (SQRT3_2, 1.0),
            (SQRT3, 0.5),
            (SQRT3, -0.5),
            (SQRT3_2, -1.0),
        ],
        edges: &[
            (0, 1),
            (0, 2),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 1),
            (0, 6),
            (6, 7),
            (7, 8),
            (8, 9),
            (9, 1),
        ],
    },
    RingTemplate {
        name: "norbornane",
        coordinates: &[
            (0.0, 1.0),
            (0.0, -1.0),
            (-SQRT3_2, 0.5),
            (-SQRT3_2, -0.5),
            (SQRT3_2, 0.5),
            (SQRT3_2, -0.5),
            (0.0, 0.0),
        ],
        edges: &[
            (0, 2),
            (2, 3),
            (3, 1),
            (0, 4),
            (4, 5),
            (5, 1),
            (0, 6),
            (6, 1),
        ],
    },
    // The third limb is drawn foreshortened inside the hexagon, the
    // conventional planar projection of the bridged cage.
    RingTemplate {
        name: "bicyclo[2.2.2]octane",
        coordinates: &[
            (0.0, 1.0),
            (0.0, -1.0),
            (-SQRT3_2, 0.5),
            (-SQRT3_2, -0.5),
            (SQRT3_2, 0.5),
            (SQRT3_2, -0.5),
            (0.3, 0.35),
            (0.3, -0.35),
        ],
        edges: &[
            (0, 2),
            (2, 3),
            (3, 1),
            (0, 4),
            (4, 5),
            (5, 1),
            (0, 6),
            (6, 7),
            (7, 1),
        ],
    },
];

static TEMPLATE_INDEX: Map<&'static str, usize> = phf_map! {
    "10v11e:2-2-2-2-2-2-2-2-3-3" => 0,
    "7v8e:2-2-2-2-2-3-3" => 1,
    "8v9e:2-2-2-2-2-2-3-3" => 2,
};

/// Degree-multiset signature of an induced subgraph, used as a cheap
/// pre-filter before the full isomorphism check.
pub(crate) fn signature(vertex_count: usize, degrees: &[usize]) -> String {
    let edge_count = degrees.iter().sum::<usize>() / 2;
    let sorted = degrees.iter().copied().sorted_unstable().join("-");
    format!("{vertex_count}v{edge_count}e:{sorted}")
}

/// Matches a ring system against the template library.
///
/// Matching is exact: the subgraph induced by `vertices` must be
/// isomorphic to a template, not merely share its degree multiset.
/// Neighbors outside `vertices` (substituents) are ignored.
///
/// # Return
///
/// The matched template together with the graph vertex assigned to each
/// template index, or `None` if no template fits.
pub(crate) fn match_system(
    graph: &MolecularGraph,
    vertices: &[VertexId],
) -> Option<(&'static RingTemplate, Vec<VertexId>)> {
    let local: HashMap<VertexId, usize> = vertices
        .iter()
        .enumerate()
        .map(|(index, &vertex_id)| (vertex_id, index))
        .collect();

    let mut adjacency = vec![Vec::new(); vertices.len()];
    for (index, &vertex_id) in vertices.iter().enumerate() {
        for &(neighbor, _) in graph.neighbors(vertex_id).unwrap_or(&[]) {
            if let Some(&other) = local.get(&neighbor) {
                adjacency[index].push(other);
            }
        }
    }
    let degrees: Vec<usize> = adjacency.iter().map(Vec::len).collect();

    let template_index = *TEMPLATE_INDEX.get(signature(vertices.len(), &degrees).as_str())?;
    let template = &TEMPLATES[template_index];

    let assignment = find_isomorphism(template, &adjacency, &degrees)?;
    Some((
        template,
        assignment.iter().map(|&local_index| vertices[local_index]).collect(),
    ))
}

fn find_isomorphism(
    template: &RingTemplate,
    adjacency: &[Vec<usize>],
    degrees: &[usize],
) -> Option<Vec<usize>> {
    let size = template.coordinates.len();
    let mut template_adjacency = vec![Vec::new(); size];
    for &(a, b) in template.edges {
        template_adjacency[a].push(b);
        template_adjacency[b].push(a);
    }

    // High-degree template vertices first so mismatches surface early.
    // Recursion depth is bounded by the largest template size.
    let mut order: Vec<usize> = (0..size).collect();
    order.sort_by_key(|&vertex| std::cmp::Reverse(template_adjacency[vertex].len()));

    let mut assignment = vec![usize::MAX; size];
    let mut used = vec![false; size];
    if extend_assignment(
        &order,
        0,
        &template_adjacency,
        adjacency,
        degrees,
        &mut assignment,
        &mut used,
    ) {
        Some(assignment)
    } else {
        None
    }
}

fn extend_assignment(
    order: &[usize],
    depth: usize,
    template_adjacency: &[Vec<usize>],
    adjacency: &[Vec<usize>],
    degrees: &[usize],
    assignment: &mut [usize],
    used: &mut [bool],
) -> bool {
    let Some(&template_vertex) = order.get(depth) else {
        return true;
    };
    for candidate in 0..adjacency.len() {
        if used[candidate] || degrees[candidate] != template_adjacency[template_vertex].len() {
            continue;
        }
        // Degrees match everywhere, so preserving template edges is enough
        // to make the assignment edge-exact.
        let consistent = template_adjacency[template_vertex].iter().all(|&other| {
            assignment[other] == usize::MAX || adjacency[candidate].contains(&assignment[other])
        });
        if !consistent {
            continue;
        }
        assignment[template_vertex] = candidate;
        used[candidate] = true;
        if extend_assignment(
            order,
            depth + 1,
            template_adjacency,
            adjacency,
            degrees,
            assignment,
            used,
        ) {
            return true;
        }
        assignment[template_vertex] = usize::MAX;
        used[candidate] = false;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn build(vertex_count: usize, edges: &[(usize, usize)]) -> (MolecularGraph, Vec<VertexId>) {
        let mut graph = MolecularGraph::new();
        let ids: Vec<VertexId> = (0..vertex_count).map(|_| graph.add_vertex()).collect();
        for &(a, b) in edges {
            graph.add_edge(ids[a], ids[b]).unwrap();
        }
        (graph, ids)
    }

    const NAPHTHALENE_EDGES: &[(usize, usize)] = &[
        (0, 1),
        (0, 2),
        (2, 3),
        (3, 4),
        (4, 5),
        (5, 1),
        (0, 6),
        (6, 7),
        (7, 8),
        (8, 9),
        (9, 1),
    ];

    #[test]
    fn signature_encodes_counts_and_sorted_degrees() {
        assert_eq!(signature(4, &[1, 2, 2, 1]), "4v3e:1-1-2-2");
        assert_eq!(signature(3, &[2, 2, 2]), "3v3e:2-2-2");
    }

    #[test]
    fn template_drawings_use_unit_bonds() {
        for template in &TEMPLATES[..2] {
            for &(a, b) in template.edges {
                let (ax, ay) = template.coordinates[a];
                let (bx, by) = template.coordinates[b];
                let length = ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt();
                assert!(
                    (length - 1.0).abs() < TOLERANCE,
                    "{} edge {a}-{b} has length {length}",
                    template.name
                );
            }
        }
    }

    #[test]
    fn naphthalene_matches_its_template() {
        let (graph, ids) = build(10, NAPHTHALENE_EDGES);
        let (template, assignment) = match_system(&graph, &ids).unwrap();

        assert_eq!(template.name, "naphthalene");
        assert_eq!(assignment.len(), 10);
        let distinct: std::collections::HashSet<_> = assignment.iter().collect();
        assert_eq!(distinct.len(), 10);
        for &(a, b) in template.edges {
            assert!(graph.edge_between(assignment[a], assignment[b]).is_some());
        }
    }

    #[test]
    fn substituents_outside_the_system_are_ignored() {
        let (mut graph, ids) = build(10, NAPHTHALENE_EDGES);
        let substituent = graph.add_vertex();
        graph.add_edge(ids[2], substituent).unwrap();

        let matched = match_system(&graph, &ids);
        assert!(matched.is_some());
    }

    #[test]
    fn azulene_shares_the_signature_but_not_the_structure() {
        // 5-7 fusion: same degree multiset as naphthalene, different graph
        let (graph, ids) = build(
            10,
            &[
                (0, 1),
                (1, 2),
                (2, 3),
                (3, 4),
                (4, 0),
                (1, 5),
                (5, 6),
                (6, 7),
                (7, 8),
                (8, 9),
                (9, 0),
            ],
        );
        let degrees: Vec<usize> = ids.iter().map(|&id| graph.degree(id).unwrap()).collect();
        assert_eq!(signature(10, &degrees), "10v11e:2-2-2-2-2-2-2-2-3-3");
        assert!(match_system(&graph, &ids).is_none());
    }

    #[test]
    fn norbornane_matches_its_template() {
        let (graph, ids) = build(
            7,
            &[
                (0, 2),
                (2, 3),
                (3, 1),
                (0, 4),
                (4, 5),
                (5, 1),
                (0, 6),
                (6, 1),
            ],
        );
        let (template, assignment) = match_system(&graph, &ids).unwrap();
        assert_eq!(template.name, "norbornane");
        assert_eq!(assignment.len(), 7);
    }

    #[test]
    fn bridged_octane_matches_its_template() {
        let (graph, ids) = build(
            8,
            &[
                (0, 2),
                (2, 3),
                (3, 1),
                (0, 4),
                (4, 5),
                (5, 1),
                (0, 6),
                (6, 7),
                (7, 1),
            ],
        );
        let (template, _) = match_system(&graph, &ids).unwrap();
        assert_eq!(template.name, "bicyclo[2.2.2]octane");
    }

    #[test]
    fn single_hexagon_has_no_template() {
        let (graph, ids) = build(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]);
        assert!(match_system(&graph, &ids).is_none());
    }
}
