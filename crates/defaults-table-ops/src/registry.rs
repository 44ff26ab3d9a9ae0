use defaults_table_config::LinkSettings;
use tracing::trace;

/// Ordered, deduplicated set of link targets collected while rendering.
///
/// Indices are assigned in first-registration order and never change for the
/// lifetime of the registry.
#[derive(Clone, Debug)]
pub struct LinkRegistry {
    settings: LinkSettings,
    links: Vec<String>,
}

impl LinkRegistry {
    pub fn new(settings: &LinkSettings) -> Self {
        Self {
            settings: settings.clone(),
            links: Vec::new(),
        }
    }

    /// Return the index of the link target for `name`, registering it on first use.
    pub fn resolve(&mut self, name: &str) -> usize {
        let target = self.settings.target_for(name);
        if let Some(index) = self.links.iter().position(|link| *link == target) {
            return index;
        }
        self.links.push(target);
        let index = self.links.len() - 1;
        trace!(name, index, "registered link");
        index
    }

    /// Reference label for a registered index, e.g. `d3`.
    pub fn label(&self, index: usize) -> String {
        format!("{}{}", self.settings.label_prefix, index)
    }

    /// Render `name` as inline code linked to its numbered reference.
    pub fn linkify(&mut self, name: &str) -> String {
        let index = self.resolve(name);
        format!("[`{name}`]({})", self.label(index))
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub fn into_links(self) -> Vec<String> {
        self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use defaults_table_config::Config;

    fn registry() -> LinkRegistry {
        LinkRegistry::new(&Config::builtin().links)
    }

    #[test]
    fn repeated_names_share_an_index() {
        let mut registry = registry();
        assert_eq!(registry.resolve("strict"), 0);
        assert_eq!(registry.resolve("module"), 1);
        assert_eq!(registry.resolve("strict"), 0);
        assert_eq!(registry.links().len(), 2);
    }

    #[test]
    fn linkify_uses_label_prefix() {
        let mut registry = registry();
        registry.resolve("target");
        assert_eq!(registry.linkify("strict"), "[`strict`](d1)");
        assert_eq!(registry.linkify("target"), "[`target`](d0)");
    }

    #[test]
    fn links_point_at_anchor_on_base_url() {
        let mut registry = registry();
        registry.resolve("composite");
        assert_eq!(
            registry.into_links(),
            vec!["https://www.typescriptlang.org/tsconfig/#composite".to_string()]
        );
    }
}
