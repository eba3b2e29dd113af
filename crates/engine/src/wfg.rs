//! Wait-for graph deadlock detection.
//!
//! Nodes are processes; a directed edge `Pi -> Pk` means Pi is blocked
//! waiting for a resource instance currently held by Pk. A cycle in
//! this graph is a deadlock, but only when every resource type has
//! exactly one instance. For multi-instance states the detector still
//! runs and reports cycles as a *possible* deadlock, with an explicit
//! warning in the trace; the matrix detector is the authority there.
//!
//! Cycle search is a three-color depth-first traversal, written with an
//! explicit stack and path list so large process counts cannot hit a
//! recursion limit. Neighbors are visited in ascending id order, which
//! keeps cycle discovery and the trace deterministic.

use gridlock_types::{ProcessId, ResourceId, SystemState};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

/// A directed edge in the wait-for graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitForEdge {
    /// The waiting process.
    pub from: ProcessId,
    /// The process holding what `from` wants.
    pub to: ProcessId,
    /// The resource `to` holds and `from` requested.
    pub resource: ResourceId,
}

impl fmt::Display for WaitForEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.resource)
    }
}

/// A cycle discovered in the wait-for graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// The processes along the cycle, in cycle order, not closed
    /// (the last entry waits for the first).
    pub processes: Vec<ProcessId>,
    /// The edges along the cycle, including the closing edge.
    pub edges: Vec<WaitForEdge>,
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chain: Vec<String> = self.processes.iter().map(ProcessId::to_string).collect();
        if let Some(first) = self.processes.first() {
            chain.push(first.to_string());
        }
        write!(f, "Cycle: {}", chain.join(" -> "))
    }
}

/// Result of a wait-for graph detection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WfgOutcome {
    /// Whether any cycle was found. On multi-instance states this is a
    /// possible-deadlock signal, not a verdict.
    pub deadlocked: bool,
    /// Union of all cycle node sets.
    pub deadlocked_processes: BTreeSet<ProcessId>,
    /// All cycles, in discovery order. Overlapping cycles are reported
    /// separately, never merged.
    pub cycles: Vec<Cycle>,
    /// Every edge of the graph, in construction order.
    pub edges: Vec<WaitForEdge>,
    /// Step-by-step account of the run.
    pub trace: Vec<String>,
}

/// Build just the wait-for edges, for graph-rendering collaborators.
///
/// Same construction as [`detect`], without the cycle search.
pub fn edges(state: &SystemState) -> Vec<WaitForEdge> {
    build_graph(state).1
}

/// Build the adjacency structure (deduplicated, ascending neighbors)
/// and the full edge list (one edge per shared resource).
fn build_graph(state: &SystemState) -> (Vec<BTreeSet<usize>>, Vec<WaitForEdge>) {
    let n = state.n();
    let m = state.m();
    let mut adjacency: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    let mut edges = Vec::new();

    for i in 0..n {
        for j in 0..m {
            if state.request_row(i)[j] == 0 {
                continue;
            }
            // Every process currently holding an instance of Rj blocks Pi.
            for k in 0..n {
                if k != i && state.allocation_row(k)[j] > 0 {
                    adjacency[i].insert(k);
                    edges.push(WaitForEdge {
                        from: state.process_id(i),
                        to: state.process_id(k),
                        resource: state.resource_types()[j].id,
                    });
                }
            }
        }
    }

    (adjacency, edges)
}

/// Lowest resource id justifying the edge `from -> to`.
///
/// Multiple resources may justify the same process pair; attribution is
/// deterministic by taking the smallest id.
fn shared_resource(state: &SystemState, from: usize, to: usize) -> ResourceId {
    (0..state.m())
        .find(|&j| state.request_row(from)[j] > 0 && state.allocation_row(to)[j] > 0)
        .map(|j| state.resource_types()[j].id)
        .expect("adjacency edge implies a shared resource")
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Three-color DFS over every node, collecting one [`Cycle`] per back
/// edge encountered. Iterative: the stack holds `(row, next neighbor
/// offset)` frames and `path` mirrors the gray chain.
fn find_cycles(state: &SystemState, adjacency: &[BTreeSet<usize>]) -> Vec<Cycle> {
    let n = adjacency.len();
    let neighbors: Vec<Vec<usize>> = adjacency
        .iter()
        .map(|set| set.iter().copied().collect())
        .collect();

    let mut color = vec![Color::White; n];
    let mut cycles = Vec::new();

    for start in 0..n {
        if color[start] != Color::White {
            continue;
        }

        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        let mut path: Vec<usize> = vec![start];
        color[start] = Color::Gray;

        while let Some(&mut (node, ref mut next)) = stack.last_mut() {
            if let Some(&neighbor) = neighbors[node].get(*next) {
                *next += 1;
                match color[neighbor] {
                    Color::Gray => {
                        // Back edge: the cycle is the path suffix from
                        // the gray neighbor through the current node.
                        let pos = path
                            .iter()
                            .position(|&p| p == neighbor)
                            .expect("gray node is on the current path");
                        let mut ring: Vec<usize> = path[pos..].to_vec();
                        ring.push(neighbor);

                        let edges = ring
                            .windows(2)
                            .map(|pair| WaitForEdge {
                                from: state.process_id(pair[0]),
                                to: state.process_id(pair[1]),
                                resource: shared_resource(state, pair[0], pair[1]),
                            })
                            .collect();

                        cycles.push(Cycle {
                            processes: path[pos..].iter().map(|&p| state.process_id(p)).collect(),
                            edges,
                        });
                    }
                    Color::White => {
                        color[neighbor] = Color::Gray;
                        path.push(neighbor);
                        stack.push((neighbor, 0));
                    }
                    Color::Black => {}
                }
            } else {
                color[node] = Color::Black;
                path.pop();
                stack.pop();
            }
        }
    }

    cycles
}

/// Run wait-for graph detection over a validated state.
///
/// Total over any valid state. If the graph has no edges the search is
/// skipped entirely and the state is reported safe.
pub fn detect(state: &SystemState) -> WfgOutcome {
    let mut trace = Vec::new();
    trace.push("=== Wait-For Graph Deadlock Detection ===".to_string());
    trace.push(format!(
        "System: {} processes, {} resource types",
        state.n(),
        state.m()
    ));
    trace.push(String::new());

    if !state.is_single_instance() {
        warn!("wait-for graph run on a multi-instance state; result is a possible-deadlock signal only");
        trace.push("WARNING: not every resource type has a single instance.".to_string());
        trace.push("A cycle indicates POSSIBLE deadlock only; use matrix detection for a verdict.".to_string());
        trace.push(String::new());
    }

    trace.push("Step 1: Building wait-for graph".to_string());
    let (adjacency, edges) = build_graph(state);

    if edges.is_empty() {
        trace.push("  No wait-for edges (no process is waiting on a held resource).".to_string());
        trace.push(String::new());
        trace.push("Result: NO DEADLOCK".to_string());
        return WfgOutcome {
            deadlocked: false,
            deadlocked_processes: BTreeSet::new(),
            cycles: Vec::new(),
            edges,
            trace,
        };
    }

    trace.push("  Wait-for edges:".to_string());
    for edge in &edges {
        trace.push(format!("    {edge}"));
    }
    trace.push(String::new());

    trace.push("Step 2: Detecting cycles (three-color DFS)".to_string());
    let cycles = find_cycles(state, &adjacency);

    if cycles.is_empty() {
        trace.push("  No cycles found in wait-for graph.".to_string());
        trace.push(String::new());
        trace.push("Result: NO DEADLOCK".to_string());
        return WfgOutcome {
            deadlocked: false,
            deadlocked_processes: BTreeSet::new(),
            cycles,
            edges,
            trace,
        };
    }

    let mut deadlocked_processes = BTreeSet::new();
    for cycle in &cycles {
        deadlocked_processes.extend(cycle.processes.iter().copied());
        trace.push(format!("  {cycle}"));
    }
    trace.push(String::new());

    trace.push("Step 3: Deadlocked processes".to_string());
    let names: Vec<String> = deadlocked_processes
        .iter()
        .map(ProcessId::to_string)
        .collect();
    trace.push(format!("  Processes in cycles: {{{}}}", names.join(", ")));
    trace.push(String::new());
    trace.push("Result: DEADLOCK DETECTED".to_string());

    debug!(
        edges = edges.len(),
        cycles = cycles.len(),
        deadlocked = deadlocked_processes.len(),
        "wait-for graph detection finished"
    );

    WfgOutcome {
        deadlocked: true,
        deadlocked_processes,
        cycles,
        edges,
        trace,
    }
}
