//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against simulated hardware.  All tests run on the host with no real
//! GPIO required.

mod alert_loop_tests;
mod startup_tests;
