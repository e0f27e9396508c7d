//! Small Turtle ontologies shared by tests across the workspace.

/// Namespace of every fixture resource.
pub const ZOO: &str = "http://example.org/zoo#";

/// Prefix block every fixture starts with.
pub const PREFIXES: &str = "@prefix : <http://example.org/zoo#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
";

/// `Animal`, `Dog ⊑ Animal` labelled "Dog", and the individual `Fido`.
pub const SCENARIO: &str = "@prefix : <http://example.org/zoo#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

:Animal a owl:Class .
:Dog a owl:Class ;
    rdfs:subClassOf :Animal ;
    rdfs:label \"Dog\" .
:Fido a :Dog .
";

/// Four classes in a linear subclass chain `D ⊑ C ⊑ B ⊑ A`.
pub const CHAIN: &str = "@prefix : <http://example.org/zoo#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

:D a owl:Class ; rdfs:subClassOf :C .
:C a owl:Class ; rdfs:subClassOf :B .
:B a owl:Class ; rdfs:subClassOf :A .
:A a owl:Class .
";

/// Two classes that are each other's superclass.
pub const CYCLE: &str = "@prefix : <http://example.org/zoo#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

:Chicken a owl:Class ; rdfs:subClassOf :Egg .
:Egg a owl:Class ; rdfs:subClassOf :Chicken .
";

/// An inverse pair of object properties with domain, range and labels.
pub const PROPERTIES: &str = "@prefix : <http://example.org/zoo#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

:Person a owl:Class .
:Animal a owl:Class .
:owns a owl:ObjectProperty ;
    rdfs:label \"owns\" ;
    rdfs:domain :Person ;
    rdfs:range :Animal ;
    owl:inverseOf :ownedBy .
:ownedBy a owl:ObjectProperty ;
    rdfs:domain :Animal ;
    rdfs:range :Person .
";

/// Three distinct predicates that all carry the label `related`.
pub const COLLIDING_PREDICATES: &str = "@prefix : <http://example.org/zoo#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

:r1 rdfs:label \"related\" .
:r2 rdfs:label \"related\" .
:r3 rdfs:label \"related\" .
:Cat a owl:Class ; :r1 :Dog ; :r2 :Dog ; :r3 :Dog .
:Dog a owl:Class .
";
