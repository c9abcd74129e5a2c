//! `rail-search` — a single generalized shortest-path primitive.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`graph`]    | `SearchGraph` trait, `FnGraph` closure adapter           |
//! | [`dijkstra`] | `dijkstra`, `SearchOutcome`, `GoalPath`, `Reached`       |
//! | [`error`]    | `SearchError`, `SearchResult<T>`                         |
//!
//! The search knows nothing about tracks or stations.  Callers describe their
//! graph through four accessors (identify, neighbors, weight, goal test) and
//! get back the first goal reached plus every settled node's distance.  The
//! track network uses it both to route a train toward its next stop and to
//! measure the distance left to that stop.
//!
//! ```
//! use rail_search::{dijkstra, FnGraph};
//!
//! // 0 → 1 → 2 on a line, each hop costs 5.
//! let graph = FnGraph::new(
//!     |n: &u32| *n,
//!     |n: &u32| if *n < 2 { vec![*n + 1] } else { vec![] },
//!     |_: &u32, _: &u32| 5.0,
//! );
//! let out = dijkstra(&graph, 0, |n| *n == 2).unwrap();
//! assert_eq!(out.goal.unwrap().distance, 10.0);
//! ```

pub mod dijkstra;
pub mod error;
pub mod graph;


pub use dijkstra::{GoalPath, Reached, SearchOutcome, dijkstra};
pub use error::{SearchError, SearchResult};
pub use graph::{FnGraph, SearchGraph};
