//! Store conformance suite
//!
//! Every test here runs against both backends through `dyn RecordStore`, so
//! the in-memory and CSV stores are held to the same contract.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test store_conformance
//! ```

mod test_utils;

mod delete_semantics;
mod file_durability;
mod schema_enforcement;
mod time_ordering;
