//! Scenario-based tests for monorepo-convert

mod helpers;

mod edge_cases;
mod monorepo_expansion;
mod path_gating;
