mod csr;
pub mod dimacs;
pub mod edmonds_karp;
pub mod graph;
pub mod pseudo_flow;
pub mod status;
