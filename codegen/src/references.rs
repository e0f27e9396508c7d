//! Dependency extraction from generated KM text.
//!
//! A frame depends on every entity whose name appears in it as a bare
//! symbol. Extraction treats the frame like object code: drop string
//! literals, split the rest into symbols, skip built-ins, and resolve what
//! is left through the reverse name tables.

use std::collections::HashSet;

use km_ontology::iris::OWL_CLASS;
use km_ontology::{EntityRef, OntologySource, Resource};
use tracing::trace;

use crate::mapping::is_keyword;
use crate::names::Names;

/// Removes every double-quoted span, honouring backslash escapes.
///
/// An unterminated quote swallows the rest of the text.
#[must_use]
pub fn strip_quoted(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in expression.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
                out.push(' ');
            }
        } else if c == '"' {
            in_string = true;
        } else {
            out.push(c);
        }
    }
    out
}

/// Splits `text` into maximal runs of word characters and `-`.
pub fn symbols(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .filter(|token| !token.is_empty())
}

/// Resolves the entities a frame refers to.
#[derive(Debug)]
pub struct ReferenceExtractor<'a, S: ?Sized> {
    source: &'a S,
    names: &'a Names,
}

impl<'a, S: OntologySource + ?Sized> ReferenceExtractor<'a, S> {
    /// Creates an extractor over `source` using the run's name tables.
    #[must_use]
    pub fn new(source: &'a S, names: &'a Names) -> Self {
        Self { source, names }
    }

    /// Every entity referenced by `expression`, deduplicated, in first-mention order.
    #[must_use]
    pub fn extract(&self, expression: &str) -> Vec<EntityRef> {
        let cleaned = strip_quoted(expression);
        let mut seen_symbols = HashSet::new();
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for symbol in symbols(&cleaned) {
            if is_keyword(symbol) || !seen_symbols.insert(symbol) {
                continue;
            }
            let resources = [
                self.names.resources().resolve(symbol),
                self.names.predicates().resolve(symbol),
            ];
            if resources.iter().all(Option::is_none) {
                trace!(symbol, "Unresolved symbol dropped");
                continue;
            }
            for resource in resources.into_iter().flatten() {
                for entity in self.classify(resource) {
                    if seen.insert(entity.clone()) {
                        out.push(entity);
                    }
                }
            }
        }
        out
    }

    /// The dependencies of `entity` given its generated `expression`.
    ///
    /// References to the entity's own resource are dropped.
    #[must_use]
    pub fn dependencies(&self, entity: &EntityRef, expression: &str) -> Vec<EntityRef> {
        let own = entity.resource();
        self.extract(expression)
            .into_iter()
            .filter(|dep| dep.resource() != own)
            .collect()
    }

    /// Classes first, then object properties, then one individual per declared class.
    fn classify(&self, resource: &Resource) -> Vec<EntityRef> {
        if self.source.is_class(resource) {
            return vec![EntityRef::Class(resource.clone())];
        }
        if self.source.is_object_property(resource) {
            return vec![EntityRef::Property(resource.clone())];
        }
        self.source
            .types_of(resource)
            .into_iter()
            .filter(|t| t.as_str() != OWL_CLASS && self.source.is_class(t))
            .map(|t| EntityRef::individual(resource.clone(), t.clone()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::generator::ExpressionGenerator;
    use crate::names::NamingOptions;
    use km_ontology::{loader, LabelMap, OntologyGraph, RdfFormat};
    use km_test_helpers::fixtures;

    fn zoo(local: &str) -> Resource {
        Resource::new(format!("{}{local}", fixtures::ZOO))
    }

    fn setup(ttl: &str) -> (OntologyGraph, Names) {
        let graph = loader::parse_str(ttl, RdfFormat::Turtle).unwrap();
        let names = Names::build(&graph, &LabelMap::extract(&graph), &NamingOptions::default());
        (graph, names)
    }

    #[test]
    fn quoted_spans_are_removed() {
        assert_eq!(strip_quoted(r#"(a ("Dog" b))"#), "(a (  b))");
        assert_eq!(strip_quoted(r#"("x \" Dog" y)"#), "(  y)");
        assert_eq!(strip_quoted(r#"(a "open"#), "(a ");
    }

    #[test]
    fn symbols_include_hyphens() {
        let found: Vec<&str> = symbols("(Dog has (instance-of (Golden-Retriever a_b)))").collect();
        assert_eq!(found, vec!["Dog", "has", "instance-of", "Golden-Retriever", "a_b"]);
    }

    #[test]
    fn dog_depends_on_animal_only() {
        let (graph, names) = setup(fixtures::SCENARIO);
        let dog = EntityRef::Class(zoo("Dog"));
        let expression = ExpressionGenerator::new(&graph, &names).generate(&dog);
        let deps = ReferenceExtractor::new(&graph, &names).dependencies(&dog, &expression);
        assert_eq!(deps, vec![EntityRef::Class(zoo("Animal"))]);
    }

    #[test]
    fn individuals_resolve_once_per_declaring_class() {
        let ttl = format!(
            "{}:Pet a owl:Class .\n:Dog a owl:Class .\n:Rex a :Dog, :Pet .\n:Owner a owl:Class ; :likes :Rex .\n",
            fixtures::PREFIXES
        );
        let (graph, names) = setup(&ttl);
        let extractor = ReferenceExtractor::new(&graph, &names);
        let deps = extractor.extract("(Owner has (likes (Rex)))");
        assert_eq!(
            deps,
            vec![
                EntityRef::Class(zoo("Owner")),
                EntityRef::individual(zoo("Rex"), zoo("Dog")),
                EntityRef::individual(zoo("Rex"), zoo("Pet")),
            ]
        );

        let rex = EntityRef::individual(zoo("Rex"), zoo("Dog"));
        let own = extractor.dependencies(&rex, "(Rex has (instance-of (Dog Pet)))");
        assert_eq!(
            own,
            vec![EntityRef::Class(zoo("Dog")), EntityRef::Class(zoo("Pet"))]
        );
    }

    #[test]
    fn properties_and_literals() {
        let (graph, names) = setup(fixtures::PROPERTIES);
        let extractor = ReferenceExtractor::new(&graph, &names);
        let deps = extractor.extract(
            "(Person has (owns (Animal)) (label (\"Animal ownedBy\")) (Unknown-thing (x)))",
        );
        assert_eq!(
            deps,
            vec![
                EntityRef::Class(zoo("Person")),
                EntityRef::Property(zoo("owns")),
                EntityRef::Class(zoo("Animal")),
            ]
        );
    }
}
