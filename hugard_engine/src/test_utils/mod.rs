//! Helpers for setting up throwaway ledgers and scripted collaborators in tests.
pub mod fakes;
pub mod prepare_env;
