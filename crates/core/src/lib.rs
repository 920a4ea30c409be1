//! Core library for coopjobs
//!
//! This crate is the **Functional Core** of the coopjobs application, following
//! the Functional Core - Imperative Shell pattern:
//!
//! - **`coopjobs_core`** (this crate): the job list view as pure functions and
//!   plain data, no I/O
//! - **`coopjobs`**: the HTTP fetch, the terminal and web front-ends
//!
//! # Module Organization
//!
//! - [`jobs`]: the `JobRecord` wire model, response decoding, search, sort and
//!   base URL resolution
//! - [`view`]: the `ListView` controller owning one page load, and its render
//!   model
//! - [`html`]: the server-rendered page
//!
//! # Example Usage
//!
//! ```rust
//! use coopjobs_core::jobs::{decode_jobs, SortKey};
//! use coopjobs_core::view::{ListView, ViewOutcome};
//!
//! let body = br#"[{"id": 1, "role": "Developer", "company": "Shopify", "salary": 60000}]"#;
//! let mut view = ListView::from_fetch(decode_jobs(body));
//! view.set_search("shop");
//! view.select_sort(SortKey::Salary);
//!
//! match view.render() {
//!     ViewOutcome::Rows { rows } => assert_eq!(rows[0].notes, "N/A"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

pub mod html;
pub mod jobs;
pub mod view;
