//! Core ontology model types.
//!
//! These types represent the pieces of an OWL ontology that the KM translator
//! consumes: resources (IRIs), literal and blank-node values, and the
//! [`EntityRef`] translation unit. Resources are reference-counted so the
//! graph, the name tables and the publish registry can share them freely.

use std::fmt;
use std::sync::Arc;

/// An ontology resource identified by its full IRI.
///
/// Cloning is cheap; equality, ordering and hashing follow the IRI text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Resource(Arc<str>);

impl Resource {
    /// Creates a resource from its full IRI.
    #[must_use]
    pub fn new(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    /// Returns the full IRI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the local name: the text after the last `/`, then after the last `#`.
    ///
    /// E.g. `"http://www.w3.org/2002/07/owl#Class"` → `"Class"`.
    #[must_use]
    pub fn local_name(&self) -> &str {
        let iri = self.as_str();
        let after_slash = iri.rsplit('/').next().unwrap_or(iri);
        after_slash.rsplit('#').next().unwrap_or(after_slash)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Resource {
    fn from(iri: &str) -> Self {
        Self::new(iri)
    }
}

impl From<String> for Resource {
    fn from(iri: String) -> Self {
        Self(Arc::from(iri))
    }
}

/// An RDF literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    /// The lexical form, exactly as it appeared in the source.
    pub lexical: String,
    /// Language tag (e.g. `"en"`), if any.
    pub language: Option<String>,
    /// Datatype IRI, if the source carried one.
    pub datatype: Option<String>,
}

impl Literal {
    /// Creates a plain literal with no language tag or datatype.
    #[must_use]
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            language: None,
            datatype: None,
        }
    }

    /// Creates a language-tagged literal.
    #[must_use]
    pub fn tagged(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }
}

/// The object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// An IRI reference to another resource.
    Resource(Resource),
    /// A literal value.
    Literal(Literal),
    /// A blank node, carried by its local identifier.
    Blank(String),
}

impl Value {
    /// Returns the referenced resource if this value is an IRI.
    #[must_use]
    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Value::Resource(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the literal if this value is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Value::Literal(l) => Some(l),
            _ => None,
        }
    }
}

impl From<Resource> for Value {
    fn from(resource: Resource) -> Self {
        Value::Resource(resource)
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        Value::Literal(literal)
    }
}

/// The kind tag of an [`EntityRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    /// An `owl:Class`.
    Class,
    /// An `owl:ObjectProperty`.
    Property,
    /// An instance of a class.
    Individual,
}

impl EntityKind {
    /// Returns the lowercase name used in logs and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Class => "class",
            EntityKind::Property => "property",
            EntityKind::Individual => "individual",
        }
    }
}

/// The unit of translation and of publishing.
///
/// An individual is paired with one of its declaring classes; a multiply
/// typed individual yields one `EntityRef` per class.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityRef {
    /// A class frame.
    Class(Resource),
    /// A slot (object property) frame.
    Property(Resource),
    /// An instance frame.
    Individual {
        /// The individual itself.
        resource: Resource,
        /// The class this typing comes from.
        class: Resource,
    },
}

impl EntityRef {
    /// Returns the resource this entity describes.
    #[must_use]
    pub fn resource(&self) -> &Resource {
        match self {
            EntityRef::Class(r) | EntityRef::Property(r) => r,
            EntityRef::Individual { resource, .. } => resource,
        }
    }

    /// Returns the kind tag.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Class(_) => EntityKind::Class,
            EntityRef::Property(_) => EntityKind::Property,
            EntityRef::Individual { .. } => EntityKind::Individual,
        }
    }

    /// Convenience constructor for [`EntityRef::Individual`].
    #[must_use]
    pub fn individual(resource: Resource, class: Resource) -> Self {
        EntityRef::Individual { resource, class }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Class(r) => write!(f, "class <{r}>"),
            EntityRef::Property(r) => write!(f, "property <{r}>"),
            EntityRef::Individual { resource, class } => {
                write!(f, "individual <{resource}> of <{class}>")
            }
        }
    }
}

/// Standard IRI constants used by the translator.
pub mod iris {
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdfs:subClassOf`.
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    /// `rdfs:subPropertyOf`.
    pub const RDFS_SUBPROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
    /// `rdfs:label`.
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `rdfs:comment`.
    pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    /// `rdfs:domain`.
    pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    /// `rdfs:range`.
    pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
    /// `owl:Class`.
    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    /// `owl:Thing`.
    pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
    /// `owl:ObjectProperty`.
    pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    /// `owl:sameAs`.
    pub const OWL_SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";
    /// `owl:inverseOf`.
    pub const OWL_INVERSE_OF: &str = "http://www.w3.org/2002/07/owl#inverseOf";
    /// `owl:disjointWith`.
    pub const OWL_DISJOINT_WITH: &str = "http://www.w3.org/2002/07/owl#disjointWith";

    /// OpenCyc `cycAnnot:label` (2006 namespace).
    pub const CYC_ANNOT_LABEL: &str = "http://sw.opencyc.org/2006/07/15/cycAnnot#label";
    /// OpenCyc `CycAnnotations_v1#label`.
    pub const CYC_ANNOTATIONS_LABEL: &str = "http://sw.cyc.com/CycAnnotations_v1#label";
}
