//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific part of the
//! panel against the recording mock adapters.  Timings are shortened to
//! milliseconds so timer behaviour can be observed directly.

mod lockout_tests;
mod mode_request_tests;
mod runtime_tests;
