use std::collections::HashMap;
use std::sync::Arc;

use super::{
    preprocess_name, umlauts_to_english, AbbreviationStandardizer, CommonWordRemover, Identity, NameTransform,
    SuffixStripper, TransformChain,
};
use crate::config::{NormalizerConfig, StepConfig};
use crate::constants::{
    TRANSFORM_ABBREVIATIONS, TRANSFORM_COMMON_WORDS, TRANSFORM_IDENTITY, TRANSFORM_PREPROCESS, TRANSFORM_SUFFIXES,
    TRANSFORM_UMLAUTS,
};
use crate::error::{LinkageError, Result};
use crate::pipeline::processing::sequence::MatchStep;

/// Named name transforms that match steps are assembled from
pub struct TransformRegistry {
    transforms: HashMap<String, Arc<dyn NameTransform>>,
}

impl TransformRegistry {
    /// Create a registry with every built-in transform. `common_words` backs
    /// the `remove_common_words` transform.
    pub fn new(config: &NormalizerConfig, common_words: impl IntoIterator<Item = String>) -> Self {
        let mut transforms: HashMap<String, Arc<dyn NameTransform>> = HashMap::new();

        transforms.insert(TRANSFORM_IDENTITY.to_string(), Arc::new(Identity));
        transforms.insert(TRANSFORM_PREPROCESS.to_string(), Arc::new(preprocess_name));
        transforms.insert(
            TRANSFORM_ABBREVIATIONS.to_string(),
            Arc::new(AbbreviationStandardizer::new(config.abbreviations.clone())),
        );
        transforms.insert(TRANSFORM_UMLAUTS.to_string(), Arc::new(umlauts_to_english));
        transforms.insert(
            TRANSFORM_SUFFIXES.to_string(),
            Arc::new(SuffixStripper::new(config.suffixes.clone())),
        );
        transforms.insert(
            TRANSFORM_COMMON_WORDS.to_string(),
            Arc::new(CommonWordRemover::new(common_words)),
        );

        Self { transforms }
    }

    /// Register a transform under a name, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, transform: Arc<dyn NameTransform>) {
        self.transforms.insert(name.into(), transform);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn NameTransform>> {
        self.transforms.get(name).cloned()
    }

    /// Compose the named transforms left to right
    pub fn chain(&self, names: &[String]) -> Result<TransformChain> {
        let transforms = names
            .iter()
            .map(|name| self.get(name).ok_or_else(|| LinkageError::UnknownTransform(name.clone())))
            .collect::<Result<Vec<_>>>()?;
        Ok(TransformChain::new(transforms))
    }

    /// Build the ordered match steps described by the configuration
    pub fn build_steps(&self, steps: &[StepConfig]) -> Result<Vec<MatchStep>> {
        steps
            .iter()
            .map(|step| -> Result<MatchStep> {
                Ok(MatchStep::new(step.label.clone(), self.chain(&step.transforms)?))
            })
            .collect()
    }

    /// List all registered transform names, sorted
    pub fn list_transforms(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transforms.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}
