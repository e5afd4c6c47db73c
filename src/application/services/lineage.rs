//! Lineage service
//!
//! Fetches member records, builds the forest and prepares what the lineages
//! page shows: tree choices, year-filter choices and the decorated tree.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    annotate, graduation_years, select_tree, tree_names, BuildOptions, DecoratedTreeNode,
    ForestBuilder, LineageTree,
};
use crate::infrastructure::traits::MemberSource;

/// Everything the lineages page needs for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineagePage {
    pub trees: Vec<LineageTree>,
    pub tree_names: Vec<String>,
    pub graduation_years: Vec<i32>,
}

impl LineagePage {
    pub fn from_trees(trees: Vec<LineageTree>) -> Self {
        let tree_names = tree_names(&trees).into_iter().map(String::from).collect();
        let graduation_years = graduation_years(&trees);
        Self {
            trees,
            tree_names,
            graduation_years,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

/// Service for building lineage forests from a member source.
pub struct LineageService {
    source: Arc<dyn MemberSource>,
    options: BuildOptions,
}

impl LineageService {
    /// Create a new lineage service.
    pub fn new(source: Arc<dyn MemberSource>, options: BuildOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Fetch members and build the forest; every failure is returned.
    #[instrument(level = "debug", skip(self))]
    pub fn load_forest(&self) -> ApplicationResult<Vec<LineageTree>> {
        let members = self.source.fetch_members().with_context("fetch lineage members")?;
        debug!("load_forest: {} members", members.len());

        let trees = ForestBuilder::with_options(self.options.clone()).build(&members)?;
        debug!("load_forest: built {} trees", trees.len());
        Ok(trees)
    }

    /// Page data, falling back to an empty page when fetching or building fails.
    #[instrument(level = "debug", skip(self))]
    pub fn page(&self) -> LineagePage {
        match self.load_forest() {
            Ok(trees) => LineagePage::from_trees(trees),
            Err(e) => {
                error!("Failed to fetch lineage data: {}", e);
                LineagePage::default()
            }
        }
    }

    /// Selected tree decorated for the given search.
    ///
    /// `tree` defaults to the first tree. Returns `Ok(None)` for an empty
    /// forest and `TreeNotFound` for an unknown name.
    #[instrument(level = "debug", skip(self))]
    pub fn view(
        &self,
        tree: Option<&str>,
        search_query: &str,
        selected_year: Option<i32>,
    ) -> ApplicationResult<Option<(String, DecoratedTreeNode)>> {
        let trees = self.load_forest()?;
        if trees.is_empty() {
            return Ok(None);
        }

        let selected = select_tree(&trees, tree)
            .ok_or_else(|| ApplicationError::TreeNotFound(tree.unwrap_or_default().to_string()))?;

        Ok(Some((
            selected.name.clone(),
            annotate(&selected.root, search_query, selected_year),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, MemberRecord};
    use crate::infrastructure::traits::InMemoryMemberSource;
    use std::io;

    struct FailingSource;

    impl MemberSource for FailingSource {
        fn fetch_members(&self) -> io::Result<Vec<MemberRecord>> {
            Err(io::Error::new(io::ErrorKind::ConnectionRefused, "db down"))
        }
    }

    fn service(members: Vec<MemberRecord>) -> LineageService {
        LineageService::new(
            Arc::new(InMemoryMemberSource::new(members)),
            BuildOptions::default(),
        )
    }

    #[test]
    fn given_failing_source_when_loading_page_then_empty() {
        let svc = LineageService::new(Arc::new(FailingSource), BuildOptions::default());

        assert!(svc.load_forest().is_err());
        assert!(svc.page().is_empty());
    }

    #[test]
    fn given_cycle_when_loading_then_domain_error_and_empty_page() {
        let svc = service(vec![
            MemberRecord::new("a", "A").with_mentor("b"),
            MemberRecord::new("b", "B").with_mentor("a"),
        ]);

        let err = svc.load_forest().unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::CycleDetected { .. })
        ));
        assert_eq!(svc.page(), LineagePage::default());
    }

    #[test]
    fn given_empty_source_when_viewing_then_none() {
        let svc = service(vec![]);
        assert!(svc.view(None, "", None).unwrap().is_none());
    }
}
