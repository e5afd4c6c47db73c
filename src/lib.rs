//! Mentorship lineage forests.
//!
//! Turns flat member records (each with an optional mentor and a tree name)
//! into one rooted tree per tree name, and decorates those trees with
//! search and graduation-year highlights for display.
//!
//! ```
//! use lineage::domain::{build_forests, MemberRecord};
//!
//! let members = vec![
//!     MemberRecord::new("a", "Alice").with_tree("Lambda"),
//!     MemberRecord::new("b", "Bob").with_tree("Lambda").with_mentor("a"),
//! ];
//! let trees = build_forests(&members).unwrap();
//! assert_eq!(trees[0].root.name, "Alice");
//! assert_eq!(trees[0].root.children[0].name, "Bob");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
