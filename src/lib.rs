//! Fleet Simulation Library
//!
//! Simulates a fleet of vehicles travelling concurrently, each on its own
//! thread, all reporting distance into one shared counter.

pub mod simulation;
