//! Integration tests for manifest loading.

use protogen::{Classification, Manifest, TypeRegistry, classify_decl, generate};
use std::collections::HashSet;

fn load_fixture(name: &str) -> TypeRegistry {
    let path = format!("tests/fixtures/{}.toml", name);
    let content =
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("fixture {} not found", name));
    Manifest::from_toml(&content)
        .and_then(|m| m.into_registry())
        .expect("invalid manifest")
}

#[test]
fn fixture_classifications() {
    let registry = load_fixture("demo");
    let class_of = |name: &str| classify_decl(&registry, registry.lookup(name).unwrap());

    assert_eq!(class_of("User"), Classification::RichRecord);
    assert_eq!(class_of("Company"), Classification::AnnotatedAttributeClass);
    assert_eq!(class_of("TreeNode"), Classification::PlainFieldTuple);
    assert_eq!(class_of("LabeledNode"), Classification::PlainFieldTuple);
    assert_eq!(class_of("RegularClass"), Classification::PlainClass);
}

#[test]
fn company_with_seeded_user() {
    let registry = load_fixture("demo");
    let company = registry.lookup("Company").unwrap();
    let seed: HashSet<_> = [registry.lookup("User").unwrap()].into_iter().collect();

    assert_eq!(
        generate(&registry, &[company], Some(&seed)),
        "message Company {\n    string name = 1;\n    repeated User employees = 2;\n}\n"
    );
}

#[test]
fn inherited_field_tuple() {
    let registry = load_fixture("demo");
    let labeled = registry.lookup("LabeledNode").unwrap();

    // Class variables are not fields of a field tuple; inherited fields come first.
    assert_eq!(
        generate(&registry, &[labeled], None),
        "message LabeledNode {\n    int32 value = 1;\n    repeated TreeNode children = 2;\n    string label = 3;\n}\n\n\
         message TreeNode {\n    int32 value = 1;\n    repeated TreeNode children = 2;\n}\n"
    );
}

#[test]
fn plain_class_from_attributes() {
    let registry = load_fixture("demo");
    let regular = registry.lookup("RegularClass").unwrap();

    assert_eq!(
        generate(&registry, &[regular], None),
        "message RegularClass {\n    string class_var = 1;\n    int32 count = 2;\n}\n"
    );
}

#[test]
fn bare_builtin_containers_use_fallback() {
    let manifest = Manifest::from_json(
        r#"{
            "types": [{
                "name": "Loose",
                "conventions": ["shape-dict"],
                "fields": [
                    { "name": "items", "type": "list" },
                    { "name": "extra", "type": "dict" },
                    { "name": "tags", "type": "List" },
                    { "name": "meta", "type": "Dict" }
                ]
            }]
        }"#,
    )
    .unwrap();
    let registry = manifest.into_registry().unwrap();
    let loose = registry.lookup("Loose").unwrap();

    assert_eq!(
        generate(&registry, &[loose], None),
        "message Loose {\n    string items = 1;\n    string extra = 2;\n    \
         repeated string tags = 3;\n    map<string, string> meta = 4;\n}\n"
    );
}
