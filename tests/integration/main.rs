//! Integration test driver for `tests/integration/` submodules.
//!
//! Compiled as a single test binary so the mock adapters are shared.

mod connectivity_tests;
mod mock_net;
mod orchestrator_tests;
