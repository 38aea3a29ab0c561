//! Search targets: a reference image, a matcher and an acceptance threshold.

use crate::config::{default_threshold, validate_threshold};
use crate::search::{CcoeffNormed, Match, Matcher};
use crate::template::Template;
use crate::util::ScreenMatchResult;
use crate::ImageView;
use std::sync::Arc;

/// A named search target.
///
/// Cloning is cheap: the template and the matcher are shared.
#[derive(Clone, Debug)]
pub struct Pattern {
    template: Arc<Template>,
    threshold: f32,
    matcher: Arc<dyn Matcher>,
    name: Option<String>,
}

impl Pattern {
    /// Creates a pattern with the process-wide default threshold and the
    /// shared `CcoeffNormed` matcher.
    pub fn new(template: impl Into<Arc<Template>>) -> Self {
        Self {
            template: template.into(),
            threshold: default_threshold(),
            matcher: CcoeffNormed::shared(),
            name: None,
        }
    }

    /// Replaces the acceptance threshold; it must lie in `[-1, 1]`.
    pub fn with_threshold(mut self, threshold: f32) -> ScreenMatchResult<Self> {
        validate_threshold(threshold)?;
        self.threshold = threshold;
        Ok(self)
    }

    /// Replaces the matching strategy.
    pub fn with_matcher(mut self, matcher: Arc<dyn Matcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Attaches a name used in logs and reports.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn matcher(&self) -> &dyn Matcher {
        self.matcher.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Best placement in `context` regardless of the threshold.
    pub fn best_in(&self, context: ImageView<'_, u8>) -> ScreenMatchResult<Match> {
        self.matcher.find_best(context, self.template.view())
    }

    /// Best placement in `context` if it clears the threshold.
    pub fn find_in(&self, context: ImageView<'_, u8>) -> ScreenMatchResult<Option<Match>> {
        self.matcher
            .find_best_above(context, self.template.view(), self.threshold)
    }

    /// Every well-separated placement in `context` that clears the threshold.
    pub fn find_all_in(&self, context: ImageView<'_, u8>) -> ScreenMatchResult<Vec<Match>> {
        self.matcher
            .find_all(context, self.template.view(), self.threshold)
    }
}

impl From<Template> for Pattern {
    fn from(template: Template) -> Self {
        Self::new(template)
    }
}
