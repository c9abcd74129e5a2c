//! Accessor trait describing a graph to the search.

use std::hash::Hash;
use std::marker::PhantomData;

/// A graph the search can walk.
///
/// Nodes are opaque to the search: it only ever clones them, asks for their
/// key, their successors and the cost of a hop.
pub trait SearchGraph {
    /// The node type handed back to the caller.
    type Node: Clone;

    /// Comparable identity of a node.  Two nodes with equal keys are the
    /// same node.
    type Key: Eq + Hash + Clone;

    fn identify(&self, node: &Self::Node) -> Self::Key;

    /// Successors of `node`, in the order they should be discovered.
    fn neighbors(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Cost of the hop `from → to`.  Must be finite and non-negative.
    fn weight(&self, from: &Self::Node, to: &Self::Node) -> f64;
}

/// Adapts three closures into a [`SearchGraph`].
///
/// Handy for one-off searches where declaring a type would be noise.
pub struct FnGraph<N, K, I, Nb, W> {
    identify:  I,
    neighbors: Nb,
    weight:    W,
    _marker:   PhantomData<fn(&N) -> K>,
}

impl<N, K, I, Nb, W> FnGraph<N, K, I, Nb, W>
where
    I:  Fn(&N) -> K,
    Nb: Fn(&N) -> Vec<N>,
    W:  Fn(&N, &N) -> f64,
{
    pub fn new(identify: I, neighbors: Nb, weight: W) -> Self {
        Self { identify, neighbors, weight, _marker: PhantomData }
    }
}

impl<N, K, I, Nb, W> SearchGraph for FnGraph<N, K, I, Nb, W>
where
    N:  Clone,
    K:  Eq + Hash + Clone,
    I:  Fn(&N) -> K,
    Nb: Fn(&N) -> Vec<N>,
    W:  Fn(&N, &N) -> f64,
{
    type Node = N;
    type Key = K;

    #[inline]
    fn identify(&self, node: &N) -> K {
        (self.identify)(node)
    }

    #[inline]
    fn neighbors(&self, node: &N) -> Vec<N> {
        (self.neighbors)(node)
    }

    #[inline]
    fn weight(&self, from: &N, to: &N) -> f64 {
        (self.weight)(from, to)
    }
}
