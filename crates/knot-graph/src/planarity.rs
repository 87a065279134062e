//! Planarity oracle used by the diagram validator.
//!
//! The default oracle is the left-right planarity test. A first DFS orients
//! every edge and records low points; a second DFS, visiting out-edges in
//! nesting order, keeps each return edge on one of two sides of its tree path
//! and fails on the first pair of constraints that cannot be satisfied. Both
//! passes are iterative and linear in the size of the graph.
//!
//! - H. de Fraysseix and P. Rosenstiehl, "A characterization of planar graphs
//!   by Trémaux orders", 1985.
//! - U. Brandes, "The Left-Right Planarity Test", 2009.

use crate::flatten::SimpleGraph;

/// Decides whether a simple graph admits a planar embedding.
pub trait PlanarityOracle {
    /// Returns `true` when `graph` is planar.
    fn is_planar(&self, graph: &SimpleGraph) -> bool;
}

/// Left-right (de Fraysseix–Rosenstiehl) planarity test.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeftRight;

impl PlanarityOracle for LeftRight {
    fn is_planar(&self, graph: &SimpleGraph) -> bool {
        let n = graph.node_count();
        let m = graph.edge_count();
        if n >= 3 && m > 3 * n - 6 {
            return false;
        }
        let edges: Vec<(usize, usize)> = graph.edges().collect();
        LeftRightTest::new(n, &edges).run()
    }
}

const UNVISITED: usize = usize::MAX;

/// Adjacency in compressed form: the `(neighbour, edge)` slots of `v` are
/// `slots[head[v]..head[v + 1]]`.
struct Adjacency {
    head: Vec<usize>,
    slots: Vec<(usize, usize)>,
}

impl Adjacency {
    fn new(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut head = vec![0usize; n + 1];
        for &(a, b) in edges {
            head[a + 1] += 1;
            head[b + 1] += 1;
        }
        for idx in 0..n {
            head[idx + 1] += head[idx];
        }
        let mut cursor = head.clone();
        let mut slots = vec![(0, 0); 2 * edges.len()];
        for (edge, &(a, b)) in edges.iter().enumerate() {
            slots[cursor[a]] = (b, edge);
            cursor[a] += 1;
            slots[cursor[b]] = (a, edge);
            cursor[b] += 1;
        }
        Self { head, slots }
    }
}

/// Run of return edges on one side, from `high` down to `low` along the
/// `reference` chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Interval {
    low: Option<usize>,
    high: Option<usize>,
}

impl Interval {
    fn single(edge: usize) -> Self {
        Self {
            low: Some(edge),
            high: Some(edge),
        }
    }

    fn is_empty(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }
}

/// Two intervals that must end up on opposite sides.
#[derive(Debug, Clone, Copy, Default)]
struct ConflictPair {
    left: Interval,
    right: Interval,
}

impl ConflictPair {
    fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }
}

struct LeftRightTest {
    adjacency: Adjacency,
    roots: Vec<usize>,
    height: Vec<usize>,
    parent_edge: Vec<Option<usize>>,
    // Per edge, indexed by its position in the input list.
    oriented: Vec<bool>,
    source: Vec<usize>,
    target: Vec<usize>,
    lowpt: Vec<usize>,
    lowpt2: Vec<usize>,
    nesting_depth: Vec<usize>,
    lowpt_edge: Vec<usize>,
    reference: Vec<Option<usize>>,
    stack_bottom: Vec<usize>,
    // Out-edges of every vertex sorted by nesting depth.
    ordered: Vec<Vec<usize>>,
    conflicts: Vec<ConflictPair>,
}

impl LeftRightTest {
    fn new(n: usize, edges: &[(usize, usize)]) -> Self {
        let m = edges.len();
        Self {
            adjacency: Adjacency::new(n, edges),
            roots: Vec::new(),
            height: vec![UNVISITED; n],
            parent_edge: vec![None; n],
            oriented: vec![false; m],
            source: vec![0; m],
            target: vec![0; m],
            lowpt: vec![0; m],
            lowpt2: vec![0; m],
            nesting_depth: vec![0; m],
            lowpt_edge: vec![0; m],
            reference: vec![None; m],
            stack_bottom: vec![0; m],
            ordered: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    fn run(mut self) -> bool {
        self.orient();

        let mut ordered = vec![Vec::new(); self.height.len()];
        for edge in 0..self.source.len() {
            ordered[self.source[edge]].push(edge);
        }
        for out in &mut ordered {
            out.sort_by_key(|&edge| self.nesting_depth[edge]);
        }
        self.ordered = ordered;

        self.test()
    }

    fn orient(&mut self) {
        let mut frames: Vec<(usize, usize)> = Vec::new();
        for root in 0..self.height.len() {
            if self.height[root] != UNVISITED {
                continue;
            }
            self.height[root] = 0;
            self.roots.push(root);
            frames.push((root, self.adjacency.head[root]));

            while let Some(frame) = frames.last_mut() {
                let (v, slot) = *frame;
                if slot == self.adjacency.head[v + 1] {
                    frames.pop();
                    if let Some(edge) = self.parent_edge[v] {
                        self.close_edge(edge);
                    }
                    continue;
                }
                frame.1 += 1;

                let (w, edge) = self.adjacency.slots[slot];
                if self.oriented[edge] {
                    continue;
                }
                self.oriented[edge] = true;
                self.source[edge] = v;
                self.target[edge] = w;
                self.lowpt[edge] = self.height[v];
                self.lowpt2[edge] = self.height[v];

                if self.height[w] == UNVISITED {
                    // tree edge, closed once `w` is finished
                    self.parent_edge[w] = Some(edge);
                    self.height[w] = self.height[v] + 1;
                    frames.push((w, self.adjacency.head[w]));
                } else {
                    self.lowpt[edge] = self.height[w];
                    self.close_edge(edge);
                }
            }
        }
    }

    /// Fixes the nesting depth of a finished edge and folds its low points
    /// into the tree edge above it.
    fn close_edge(&mut self, edge: usize) {
        let v = self.source[edge];
        let chordal = self.lowpt2[edge] < self.height[v];
        self.nesting_depth[edge] = 2 * self.lowpt[edge] + usize::from(chordal);

        let Some(parent) = self.parent_edge[v] else {
            return;
        };
        if self.lowpt[edge] < self.lowpt[parent] {
            self.lowpt2[parent] = self.lowpt[parent].min(self.lowpt2[edge]);
            self.lowpt[parent] = self.lowpt[edge];
        } else if self.lowpt[edge] > self.lowpt[parent] {
            self.lowpt2[parent] = self.lowpt2[parent].min(self.lowpt[edge]);
        } else {
            self.lowpt2[parent] = self.lowpt2[parent].min(self.lowpt2[edge]);
        }
    }

    fn test(&mut self) -> bool {
        let roots = std::mem::take(&mut self.roots);
        let mut frames: Vec<(usize, usize)> = Vec::new();
        for root in roots {
            frames.push((root, 0));
            while let Some(frame) = frames.last_mut() {
                let (v, index) = *frame;
                if index == self.ordered[v].len() {
                    frames.pop();
                    if let Some(edge) = self.parent_edge[v] {
                        self.remove_back_edges(edge);
                        if !self.integrate(edge) {
                            return false;
                        }
                    }
                    continue;
                }
                frame.1 += 1;

                let edge = self.ordered[v][index];
                self.stack_bottom[edge] = self.conflicts.len();
                let w = self.target[edge];
                if self.parent_edge[w] == Some(edge) {
                    frames.push((w, 0));
                    continue;
                }
                self.lowpt_edge[edge] = edge;
                self.conflicts.push(ConflictPair {
                    left: Interval::default(),
                    right: Interval::single(edge),
                });
                if !self.integrate(edge) {
                    return false;
                }
            }
        }
        true
    }

    /// Adds the return edges of a finished out-edge to the constraints of
    /// the tree edge entering its source.
    fn integrate(&mut self, edge: usize) -> bool {
        let v = self.source[edge];
        if self.lowpt[edge] >= self.height[v] {
            return true;
        }
        let Some(parent) = self.parent_edge[v] else {
            return true;
        };
        if self.ordered[v].first() == Some(&edge) {
            self.lowpt_edge[parent] = self.lowpt_edge[edge];
            true
        } else {
            self.add_constraints(edge, parent)
        }
    }

    fn add_constraints(&mut self, edge: usize, parent: usize) -> bool {
        let mut merged = ConflictPair::default();

        // Return edges of `edge` all go to the right.
        while self.conflicts.len() > self.stack_bottom[edge] {
            let Some(mut pair) = self.conflicts.pop() else {
                break;
            };
            if !pair.left.is_empty() {
                pair.swap();
            }
            if !pair.left.is_empty() {
                return false;
            }
            let Some(low) = pair.right.low else {
                continue;
            };
            if self.lowpt[low] > self.lowpt[parent] {
                if merged.right.is_empty() {
                    merged.right = pair.right;
                } else if let Some(top) = merged.right.low {
                    self.reference[top] = pair.right.high;
                }
                merged.right.low = pair.right.low;
            } else {
                self.reference[low] = Some(self.lowpt_edge[parent]);
            }
        }

        // Earlier siblings returning above lowpt(edge) go to the left.
        while let Some(&top) = self.conflicts.last() {
            if !(self.conflicting(&top.left, edge) || self.conflicting(&top.right, edge)) {
                break;
            }
            self.conflicts.pop();
            let mut pair = top;
            if self.conflicting(&pair.right, edge) {
                pair.swap();
            }
            if self.conflicting(&pair.right, edge) {
                return false;
            }
            if let Some(low) = merged.right.low {
                self.reference[low] = pair.right.high;
            }
            if pair.right.low.is_some() {
                merged.right.low = pair.right.low;
            }
            if merged.left.is_empty() {
                merged.left = pair.left;
            } else if let Some(low) = merged.left.low {
                self.reference[low] = pair.left.high;
            }
            merged.left.low = pair.left.low;
        }

        if !(merged.left.is_empty() && merged.right.is_empty()) {
            self.conflicts.push(merged);
        }
        true
    }

    /// Drops return edges ending at the source of `edge`.
    fn remove_back_edges(&mut self, edge: usize) {
        let u = self.source[edge];
        while let Some(top) = self.conflicts.last() {
            if self.lowest(top) != Some(self.height[u]) {
                break;
            }
            self.conflicts.pop();
        }

        let Some(mut pair) = self.conflicts.pop() else {
            return;
        };
        while let Some(high) = pair.left.high {
            if self.target[high] != u {
                break;
            }
            pair.left.high = self.reference[high];
        }
        if pair.left.high.is_none() {
            if let Some(low) = pair.left.low.take() {
                self.reference[low] = pair.right.low;
            }
        }
        while let Some(high) = pair.right.high {
            if self.target[high] != u {
                break;
            }
            pair.right.high = self.reference[high];
        }
        if pair.right.high.is_none() {
            if let Some(low) = pair.right.low.take() {
                self.reference[low] = pair.left.low;
            }
        }
        self.conflicts.push(pair);
    }

    fn conflicting(&self, interval: &Interval, edge: usize) -> bool {
        interval
            .high
            .is_some_and(|high| self.lowpt[high] > self.lowpt[edge])
    }

    fn lowest(&self, pair: &ConflictPair) -> Option<usize> {
        match (pair.left.low, pair.right.low) {
            (Some(left), Some(right)) => Some(self.lowpt[left].min(self.lowpt[right])),
            (Some(low), None) | (None, Some(low)) => Some(self.lowpt[low]),
            (None, None) => None,
        }
    }
}
