//! Post-extraction plugins.
//!
//! A plugin is a named transformation over a finished [`ExtractionResult`],
//! typically annotating block metadata. Plugins are looked up by name in a
//! [`PluginRegistry`] and run in the order requested.
//!
//! # Example
//!
//! ```
//! use pdfstruct::plugins::PluginRegistry;
//! use pdfstruct::ExtractionResult;
//!
//! let registry = PluginRegistry::with_defaults();
//! let mut result = ExtractionResult::new();
//! registry.run(&mut result, &["wordcount"]);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::model::ExtractionResult;

/// A named transformation over an extraction result.
pub trait Plugin: Send + Sync {
    /// Name used to enable the plugin.
    fn name(&self) -> &str;

    /// Transform the result in place.
    fn process(&self, result: &mut ExtractionResult);
}

/// Adds `word_count` to the metadata of every paragraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCountPlugin;

impl WordCountPlugin {
    /// Registry name of this plugin.
    pub const NAME: &'static str = "wordcount";
}

impl Plugin for WordCountPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, result: &mut ExtractionResult) {
        for block in result.blocks_mut().filter(|b| b.is_paragraph()) {
            let count = block.text().map_or(0, |t| t.split_whitespace().count());
            block
                .info
                .metadata
                .insert("word_count".to_string(), Value::from(count));
        }
    }
}

/// Registry of plugins by name.
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    /// Create a registry with the built-in plugins.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(WordCountPlugin));
        registry
    }

    /// Register a plugin, replacing any plugin of the same name.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.insert(plugin.name().to_string(), plugin);
    }

    /// Get a plugin by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.get(name).cloned()
    }

    /// Names of all registered plugins, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the named plugins in order. Unknown names are skipped.
    pub fn run<S: AsRef<str>>(&self, result: &mut ExtractionResult, names: &[S]) {
        for name in names {
            let name = name.as_ref();
            match self.plugins.get(name) {
                Some(plugin) => {
                    log::debug!("Running plugin {}", name);
                    plugin.process(result);
                }
                None => log::warn!("Unknown plugin: {}", name),
            }
        }
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Split a comma-separated plugin list, dropping blank entries.
pub fn parse_plugin_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockInfo, ContentBlock, PageResult};

    fn sample() -> ExtractionResult {
        let mut page = PageResult::new(1);
        page.push(ContentBlock::paragraph(BlockInfo::new(1), "  three  short\twords "));
        page.push(ContentBlock::footnote(BlockInfo::new(1), "not counted"));
        page.push(ContentBlock::paragraph(BlockInfo::new(1), ""));
        let mut result = ExtractionResult::new();
        result.add_page(page);
        result
    }

    struct Tagger;

    impl Plugin for Tagger {
        fn name(&self) -> &str {
            "tagger"
        }

        fn process(&self, result: &mut ExtractionResult) {
            for block in result.blocks_mut() {
                block.info.metadata.insert("tagged".into(), Value::Bool(true));
            }
        }
    }

    #[test]
    fn test_word_count() {
        let mut result = sample();
        PluginRegistry::with_defaults().run(&mut result, &["wordcount"]);

        let content = &result.pages[0].content;
        assert_eq!(content[0].info.metadata["word_count"], 3);
        assert!(content[1].info.metadata.is_empty());
        assert_eq!(content[2].info.metadata["word_count"], 0);
    }

    #[test]
    fn test_unknown_plugins_are_skipped() {
        let mut result = sample();
        PluginRegistry::with_defaults().run(&mut result, &["nope", "wordcount"]);
        assert_eq!(result.pages[0].content[0].info.metadata.len(), 1);
    }

    #[test]
    fn test_custom_plugin_and_order() {
        let mut registry = PluginRegistry::new();
        assert!(registry.names().is_empty());
        registry.register(Arc::new(Tagger));
        registry.register(Arc::new(WordCountPlugin));
        assert_eq!(registry.names(), vec!["tagger", "wordcount"]);
        assert!(registry.get("tagger").is_some());

        let mut result = sample();
        registry.run(&mut result, &[String::from("tagger")]);
        assert!(result.blocks().all(|b| b.info.metadata.contains_key("tagged")));
        assert!(result.blocks().all(|b| !b.info.metadata.contains_key("word_count")));
    }

    #[test]
    fn test_parse_plugin_list() {
        assert_eq!(parse_plugin_list("wordcount, tagger,,"), vec!["wordcount", "tagger"]);
        assert!(parse_plugin_list(" ").is_empty());
    }
}
