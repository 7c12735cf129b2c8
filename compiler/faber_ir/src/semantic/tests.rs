use super::*;

#[test]
fn test_generic_name() {
    let ty = SemanticType::tabula(SemanticType::primitive("textus"), SemanticType::primitive("numerus"));
    assert_eq!(ty.generic_name(), Some("tabula"));
    assert_eq!(ty.type_params().len(), 2);
    assert_eq!(SemanticType::primitive("numerus").generic_name(), None);
    assert!(SemanticType::primitive("numerus").type_params().is_empty());
}

#[test]
fn test_nullable() {
    let ty = SemanticType::primitive("textus");
    assert!(!ty.is_nullable());
    assert!(ty.into_nullable().is_nullable());

    let union = SemanticType::Union(vec![
        SemanticType::primitive("numerus"),
        SemanticType::primitive("nihil"),
    ]);
    assert!(union.is_nullable());
    assert!(!SemanticType::unknown().is_nullable());
}

#[test]
fn test_display() {
    let ty = SemanticType::lista(SemanticType::primitive("numerus"));
    assert_eq!(ty.to_string(), "lista<numerus>");

    let f = SemanticType::Function {
        params: vec![SemanticType::primitive("textus")],
        ret: Box::new(SemanticType::primitive("bivalens")),
    };
    assert_eq!(f.to_string(), "(textus) -> bivalens");

    assert_eq!(SemanticType::user("Persona").into_nullable().to_string(), "Persona?");
    assert_eq!(SemanticType::unknown().to_string(), "ignotum");
}
