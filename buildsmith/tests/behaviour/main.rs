//! Behavioural tests for builder generation using `rstest-bdd`.
//!
//! [`fixtures`] holds the scenario state, [`steps`] the step registry and
//! [`scenarios`] binds the `.feature` files under `tests/features`.

mod fixtures;
mod scenarios;
mod steps;
