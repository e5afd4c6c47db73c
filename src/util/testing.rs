//! Test support: one-time tracing setup and sample member data.

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::MemberRecord;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Member of `tree` with an optional mentor.
pub fn member(id: &str, name: &str, tree: &str, mentor: Option<&str>) -> MemberRecord {
    let record = MemberRecord::new(id, name).with_tree(tree);
    match mentor {
        Some(mentor) => record.with_mentor(mentor),
        None => record,
    }
}

/// The club's two seeded lineages, ordered by name like the member store.
///
/// ```text
/// Lambda Tree: Alice -> Bob, David; Bob -> Carol
/// Sigma Tree:  Eve -> Frank; Frank -> Grace, Henry
/// ```
pub fn seeded_members() -> Vec<MemberRecord> {
    let mut members = vec![
        member("alice", "Alice Nguyen", "Lambda Tree", None)
            .with_graduation_year(2019)
            .with_role("President"),
        member("bob", "Bob Martinez", "Lambda Tree", Some("alice"))
            .with_graduation_year(2021)
            .with_role("Vice President"),
        member("carol", "Carol Thompson", "Lambda Tree", Some("bob")).with_graduation_year(2023),
        member("david", "David Park", "Lambda Tree", Some("alice")).with_graduation_year(2022),
        member("eve", "Eve Johnson", "Sigma Tree", None)
            .with_graduation_year(2020)
            .with_role("President"),
        member("frank", "Frank Liu", "Sigma Tree", Some("eve"))
            .with_graduation_year(2022)
            .with_role("Events Chair"),
        member("grace", "Grace Williams", "Sigma Tree", Some("frank")).with_graduation_year(2024),
        member("henry", "Henry Okafor", "Sigma Tree", Some("frank")).with_graduation_year(2025),
    ];
    members.sort_by(|a, b| a.name.cmp(&b.name));
    members
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
        init_test_setup();
    }

    #[test]
    fn given_seeded_members_when_listing_then_sorted_by_name() {
        let members = seeded_members();
        assert_eq!(members.len(), 8);
        assert!(members.windows(2).all(|w| w[0].name <= w[1].name));
    }
}
