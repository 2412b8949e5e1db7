//! Well-known vocabulary identifiers.
//!
//! The RDF, RDFS, OWL 2 and XSD terms the engine reads and writes, plus the
//! builtin sets: names that are treated as a given entity without any
//! declaration triple (e.g. `owl:Thing` is always a class).

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

// ---------------------------------------------------------------------------
// rdf:
// ---------------------------------------------------------------------------

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub const RDF_LIST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#List";
pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
pub const RDF_PLAIN_LITERAL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#PlainLiteral";
pub const RDF_XML_LITERAL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral";

// ---------------------------------------------------------------------------
// rdfs:
// ---------------------------------------------------------------------------

pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
pub const RDFS_DATATYPE: &str = "http://www.w3.org/2000/01/rdf-schema#Datatype";
pub const RDFS_LITERAL: &str = "http://www.w3.org/2000/01/rdf-schema#Literal";
pub const RDFS_SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
pub const RDFS_SUB_PROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
pub const RDFS_SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";
pub const RDFS_IS_DEFINED_BY: &str = "http://www.w3.org/2000/01/rdf-schema#isDefinedBy";

// ---------------------------------------------------------------------------
// owl:
// ---------------------------------------------------------------------------

pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
pub const OWL_NOTHING: &str = "http://www.w3.org/2002/07/owl#Nothing";
pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
pub const OWL_ANNOTATION_PROPERTY: &str = "http://www.w3.org/2002/07/owl#AnnotationProperty";
pub const OWL_NAMED_INDIVIDUAL: &str = "http://www.w3.org/2002/07/owl#NamedIndividual";
pub const OWL_ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
pub const OWL_IMPORTS: &str = "http://www.w3.org/2002/07/owl#imports";
pub const OWL_RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
pub const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
pub const OWL_SOME_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#someValuesFrom";
pub const OWL_ALL_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#allValuesFrom";
pub const OWL_HAS_VALUE: &str = "http://www.w3.org/2002/07/owl#hasValue";
pub const OWL_UNION_OF: &str = "http://www.w3.org/2002/07/owl#unionOf";
pub const OWL_INTERSECTION_OF: &str = "http://www.w3.org/2002/07/owl#intersectionOf";
pub const OWL_COMPLEMENT_OF: &str = "http://www.w3.org/2002/07/owl#complementOf";
pub const OWL_ONE_OF: &str = "http://www.w3.org/2002/07/owl#oneOf";
pub const OWL_INVERSE_OF: &str = "http://www.w3.org/2002/07/owl#inverseOf";
pub const OWL_PROPERTY_CHAIN_AXIOM: &str = "http://www.w3.org/2002/07/owl#propertyChainAxiom";
pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
pub const OWL_EQUIVALENT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#equivalentProperty";
pub const OWL_DISJOINT_WITH: &str = "http://www.w3.org/2002/07/owl#disjointWith";
pub const OWL_PROPERTY_DISJOINT_WITH: &str = "http://www.w3.org/2002/07/owl#propertyDisjointWith";
pub const OWL_SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";
pub const OWL_DIFFERENT_FROM: &str = "http://www.w3.org/2002/07/owl#differentFrom";
pub const OWL_ALL_DISJOINT_CLASSES: &str = "http://www.w3.org/2002/07/owl#AllDisjointClasses";
pub const OWL_ALL_DISJOINT_PROPERTIES: &str = "http://www.w3.org/2002/07/owl#AllDisjointProperties";
pub const OWL_ALL_DIFFERENT: &str = "http://www.w3.org/2002/07/owl#AllDifferent";
pub const OWL_MEMBERS: &str = "http://www.w3.org/2002/07/owl#members";
pub const OWL_DISTINCT_MEMBERS: &str = "http://www.w3.org/2002/07/owl#distinctMembers";
pub const OWL_AXIOM: &str = "http://www.w3.org/2002/07/owl#Axiom";
pub const OWL_ANNOTATION: &str = "http://www.w3.org/2002/07/owl#Annotation";
pub const OWL_ANNOTATED_SOURCE: &str = "http://www.w3.org/2002/07/owl#annotatedSource";
pub const OWL_ANNOTATED_PROPERTY: &str = "http://www.w3.org/2002/07/owl#annotatedProperty";
pub const OWL_ANNOTATED_TARGET: &str = "http://www.w3.org/2002/07/owl#annotatedTarget";
pub const OWL_TOP_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#topObjectProperty";
pub const OWL_BOTTOM_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#bottomObjectProperty";
pub const OWL_TOP_DATA_PROPERTY: &str = "http://www.w3.org/2002/07/owl#topDataProperty";
pub const OWL_BOTTOM_DATA_PROPERTY: &str = "http://www.w3.org/2002/07/owl#bottomDataProperty";
pub const OWL_VERSION_INFO: &str = "http://www.w3.org/2002/07/owl#versionInfo";
pub const OWL_DEPRECATED: &str = "http://www.w3.org/2002/07/owl#deprecated";
pub const OWL_PRIOR_VERSION: &str = "http://www.w3.org/2002/07/owl#priorVersion";
pub const OWL_BACKWARD_COMPATIBLE_WITH: &str =
    "http://www.w3.org/2002/07/owl#backwardCompatibleWith";
pub const OWL_INCOMPATIBLE_WITH: &str = "http://www.w3.org/2002/07/owl#incompatibleWith";

// ---------------------------------------------------------------------------
// xsd:
// ---------------------------------------------------------------------------

pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_INT: &str = "http://www.w3.org/2001/XMLSchema#int";
pub const XSD_LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
pub const XSD_SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";
pub const XSD_BYTE: &str = "http://www.w3.org/2001/XMLSchema#byte";
pub const XSD_NON_NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
pub const XSD_POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#positiveInteger";
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
pub const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
pub const XSD_ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

// ---------------------------------------------------------------------------
// Builtin sets
// ---------------------------------------------------------------------------

/// Classes every ontology carries implicitly.
pub const BUILTIN_CLASSES: &[&str] = &[OWL_THING, OWL_NOTHING];

/// The OWL 2 datatype map (the subset the engine recognizes without declaration).
pub const BUILTIN_DATATYPES: &[&str] = &[
    RDFS_LITERAL,
    RDF_PLAIN_LITERAL,
    RDF_LANG_STRING,
    RDF_XML_LITERAL,
    XSD_STRING,
    XSD_BOOLEAN,
    XSD_DECIMAL,
    XSD_INTEGER,
    XSD_INT,
    XSD_LONG,
    XSD_SHORT,
    XSD_BYTE,
    XSD_NON_NEGATIVE_INTEGER,
    XSD_POSITIVE_INTEGER,
    XSD_DOUBLE,
    XSD_FLOAT,
    XSD_DATE_TIME,
    XSD_ANY_URI,
];

pub const BUILTIN_OBJECT_PROPERTIES: &[&str] = &[OWL_TOP_OBJECT_PROPERTY, OWL_BOTTOM_OBJECT_PROPERTY];

pub const BUILTIN_DATA_PROPERTIES: &[&str] = &[OWL_TOP_DATA_PROPERTY, OWL_BOTTOM_DATA_PROPERTY];

pub const BUILTIN_ANNOTATION_PROPERTIES: &[&str] = &[
    RDFS_LABEL,
    RDFS_COMMENT,
    RDFS_SEE_ALSO,
    RDFS_IS_DEFINED_BY,
    OWL_VERSION_INFO,
    OWL_DEPRECATED,
    OWL_PRIOR_VERSION,
    OWL_BACKWARD_COMPATIBLE_WITH,
    OWL_INCOMPATIBLE_WITH,
];

/// Structural and declaration types: an `rdf:type` pointing at one of these
/// says what kind of node the subject is, never which class it instantiates.
pub const RESERVED_TYPES: &[&str] = &[
    OWL_CLASS,
    RDFS_CLASS,
    RDFS_DATATYPE,
    OWL_OBJECT_PROPERTY,
    OWL_DATATYPE_PROPERTY,
    OWL_ANNOTATION_PROPERTY,
    OWL_NAMED_INDIVIDUAL,
    OWL_ONTOLOGY,
    OWL_RESTRICTION,
    OWL_ALL_DISJOINT_CLASSES,
    OWL_ALL_DISJOINT_PROPERTIES,
    OWL_ALL_DIFFERENT,
    OWL_AXIOM,
    OWL_ANNOTATION,
    RDF_LIST,
    RDF_PROPERTY,
];

/// Whether `iri` is a structural/declaration type (see [`RESERVED_TYPES`]).
pub fn is_reserved_type(iri: &str) -> bool {
    RESERVED_TYPES.contains(&iri)
}

/// Shorten a reserved IRI to its conventional prefix form for display.
pub fn short(iri: &str) -> String {
    for (ns, prefix) in [(RDF, "rdf:"), (RDFS, "rdfs:"), (OWL, "owl:"), (XSD, "xsd:")] {
        if let Some(local) = iri.strip_prefix(ns) {
            return format!("{prefix}{local}");
        }
    }
    format!("<{iri}>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_types() {
        assert!(is_reserved_type(OWL_CLASS));
        assert!(is_reserved_type(OWL_AXIOM));
        assert!(!is_reserved_type(OWL_THING));
    }

    #[test]
    fn short_forms() {
        assert_eq!(short(OWL_THING), "owl:Thing");
        assert_eq!(short(XSD_INTEGER), "xsd:integer");
        assert_eq!(short("urn:x"), "<urn:x>");
    }

    #[test]
    fn builtin_sets_are_disjoint() {
        for c in BUILTIN_CLASSES {
            assert!(!BUILTIN_DATATYPES.contains(c));
        }
        for p in BUILTIN_OBJECT_PROPERTIES {
            assert!(!BUILTIN_DATA_PROPERTIES.contains(p));
            assert!(!BUILTIN_ANNOTATION_PROPERTIES.contains(p));
        }
    }
}
