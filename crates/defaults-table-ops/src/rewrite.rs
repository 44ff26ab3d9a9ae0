use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::registry::LinkRegistry;

/// Matches ``[`name`](#anchor)``. The anchor may differ from the name, e.g.
/// `#module-resolution` for `moduleResolution`.
fn cross_reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[`([A-Za-z0-9_]+)`\]\(#[A-Za-z0-9_-]+\)")
            .expect("cross-reference pattern compiles")
    })
}

/// Replace every local cross-reference in `value` with a numbered link.
///
/// Text that does not match the marker shape exactly is passed through.
pub fn rewrite_cross_references(value: &str, registry: &mut LinkRegistry) -> String {
    cross_reference_pattern()
        .replace_all(value, |caps: &Captures<'_>| registry.linkify(&caps[1]))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use defaults_table_config::Config;

    fn registry() -> LinkRegistry {
        LinkRegistry::new(&Config::builtin().links)
    }

    #[test]
    fn rewrites_every_marker_in_order() {
        let mut registry = registry();
        let rewritten = rewrite_cross_references(
            "`true` if [`esModuleInterop`](#esModuleInterop) is enabled, [`module`](#module) is `system`",
            &mut registry,
        );
        assert_eq!(
            rewritten,
            "`true` if [`esModuleInterop`](d0) is enabled, [`module`](d1) is `system`"
        );
    }

    #[test]
    fn anchor_spelling_does_not_affect_target() {
        let mut registry = registry();
        registry.resolve("moduleResolution");
        let rewritten =
            rewrite_cross_references("[`moduleResolution`](#module-resolution)", &mut registry);
        assert_eq!(rewritten, "[`moduleResolution`](d0)");
        assert_eq!(registry.links().len(), 1);
    }

    #[test]
    fn leaves_malformed_markers_untouched() {
        let mut registry = registry();
        let input = "[strict](#strict) [`strict`](strict) [`a b`](#a) `[]` otherwise";
        assert_eq!(rewrite_cross_references(input, &mut registry), input);
        assert!(registry.links().is_empty());
    }
}
