//! Probability tree service
//!
//! Runs the pipeline: build the tree, resolve depths, lay it out, render it.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::diagram::TreeDiagram;
use crate::application::render::OutputFormat;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{DepthResolver, LayoutEngine, OutcomeSet, TreeBuilder};
use crate::infrastructure::traits::FileSystem;

/// Everything needed to build one tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRequest {
    /// Root label
    pub event: String,
    pub outcomes: OutcomeSet,
    /// Number of trials, i.e. tree depth
    pub trials: u32,
}

/// Service for building and rendering probability trees.
pub struct TreeService {
    settings: Arc<Settings>,
    fs: Arc<dyn FileSystem>,
}

impl TreeService {
    pub fn new(settings: Arc<Settings>, fs: Arc<dyn FileSystem>) -> Self {
        Self { settings, fs }
    }

    /// Reject requests that would produce a degenerate tree.
    ///
    /// The outcome probability sum is not enforced here: it is the input
    /// boundary's job. A sum outside tolerance is only logged.
    pub fn validate(&self, request: &TreeRequest) -> ApplicationResult<()> {
        if request.event.trim().is_empty() {
            return Err(ApplicationError::configuration("event name must not be empty"));
        }
        if request.trials == 0 {
            return Err(ApplicationError::configuration(
                "the event must occur at least once (trials >= 1)",
            ));
        }
        if request.outcomes.is_empty() {
            return Err(ApplicationError::configuration("at least one outcome is required"));
        }
        if !request
            .outcomes
            .sums_to_one(self.settings.probability_tolerance)
        {
            warn!(
                "outcome probabilities sum to {}, not 1; band totals will be off",
                request.outcomes.total_probability()
            );
        }
        Ok(())
    }

    /// Build, resolve depths and lay out the tree for `request`.
    #[instrument(level = "debug", skip(self))]
    pub fn generate(&self, request: &TreeRequest) -> ApplicationResult<TreeDiagram> {
        self.validate(request)?;

        let builder = TreeBuilder::new()
            .with_separator(self.settings.separator.clone())
            .with_max_nodes(self.settings.max_nodes);
        let tree = builder.build(&request.event, &request.outcomes, request.trials)?;
        info!("built tree with {} nodes", tree.len());

        let depths = DepthResolver::resolve(&tree)?;
        let engine = LayoutEngine::new(
            self.settings.layout.horizontal_spacing,
            self.settings.layout.vertical_spacing,
        );
        let layout = engine.layout(&tree, &depths);
        debug!("layout has {} bands", layout.bands().len());

        Ok(TreeDiagram {
            event: request.event.clone(),
            tree,
            depths,
            layout,
        })
    }

    pub fn render(&self, diagram: &TreeDiagram, format: OutputFormat) -> String {
        format.renderer(&self.settings.render).render(diagram)
    }

    /// Render `diagram` and write it to `path`, creating parent directories.
    #[instrument(level = "debug", skip(self, diagram))]
    pub fn export(
        &self,
        diagram: &TreeDiagram,
        format: OutputFormat,
        path: &Path,
    ) -> ApplicationResult<()> {
        let content = self.render(diagram, format);
        self.fs
            .ensure_parent(path)
            .with_path_context("create output directory", path)?;
        self.fs
            .write(path, &content)
            .with_path_context("write diagram", path)?;
        info!("wrote {} bytes of {} to {}", content.len(), format, path.display());
        Ok(())
    }
}
