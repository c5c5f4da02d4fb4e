//! Integration tests: run declaration fixtures through the schema pass.
//!
//! Each fixture in tests/fixtures/ has:
//! - case.json: a declaration set
//! - expect.json: expected result, failure classes, offending elements, and
//!   (optionally) the flattened StrongDictionary keys per interface

use bindmeta_schema::{
    Attribute, AttributeKind, BindingDeclaration, BorrowedByDefault, DeclarationSet,
    DictionaryProjection, ElementKind, MemberDeclaration, MemberKind, ParameterDeclaration,
    ReturnDeclaration, TypeRef, Visibility, attribute_spec, failure_class, resolve_set,
    validate_set,
};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn flatten_keys(projection: &DictionaryProjection, out: &mut Vec<Value>) {
    for key in &projection.keys {
        out.push(Value::String(key.key.clone()));
        if let Some(nested) = &key.nested {
            flatten_keys(nested, out);
        }
    }
}

fn run_fixture(name: &str) {
    let dir = fixtures_dir().join(name);

    let case_path = dir.join("case.json");
    let expect_path = dir.join("expect.json");

    let set = DeclarationSet::from_path(&case_path)
        .unwrap_or_else(|e| panic!("failed to load {}: {e}", case_path.display()));
    let expect_str = std::fs::read_to_string(&expect_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", expect_path.display()));
    let expected: Value = serde_json::from_str(&expect_str)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", expect_path.display()));

    let resolution = resolve_set(&set, &BorrowedByDefault);
    let report = &resolution.report;

    let mut actual = json!({
        "result": report.result,
        "failureClasses": report.failure_classes,
        "elements": report.issues.iter().map(|issue| issue.element.clone()).collect::<Vec<_>>(),
    });

    if expected.get("dictionaryKeys").is_some() {
        let mut keys = Map::new();
        for declaration in &resolution.declarations {
            if let Some(projection) = &declaration.dictionary {
                let mut flat = Vec::new();
                flatten_keys(projection, &mut flat);
                keys.insert(declaration.name.clone(), Value::Array(flat));
            }
        }
        actual["dictionaryKeys"] = Value::Object(keys);
    }

    assert_eq!(
        actual,
        expected,
        "\n\nFixture: {name}\n\nGot:\n{}\n\nExpected:\n{}\n\nIssues:\n{:#?}\n",
        serde_json::to_string_pretty(&actual).unwrap(),
        serde_json::to_string_pretty(&expected).unwrap(),
        report.issues,
    );
}

#[test]
fn golden_strong_dictionary() {
    run_fixture("golden_strong_dictionary");
}

#[test]
fn golden_async_bind_as() {
    run_fixture("golden_async_bind_as");
}

#[test]
fn adversarial_attachment_batch() {
    run_fixture("adversarial_attachment_batch");
}

#[test]
fn adversarial_async_ambiguous() {
    run_fixture("adversarial_async_ambiguous");
}

fn sample_attribute(kind: AttributeKind) -> Attribute {
    let text = |value: &str| value.to_string();
    match kind {
        AttributeKind::BaseType => Attribute::BaseType {
            base: text("NSObject"),
            name: None,
            events: Vec::new(),
            delegates: Vec::new(),
            singleton: false,
        },
        AttributeKind::Category => Attribute::Category { all_static: false },
        AttributeKind::Protocolize => Attribute::Protocolize { version: 2 },
        AttributeKind::Protocol => Attribute::Protocol {
            name: None,
            is_informal: false,
        },
        AttributeKind::Model => Attribute::Model,
        AttributeKind::Abstract => Attribute::Abstract,
        AttributeKind::Static => Attribute::Static,
        AttributeKind::Export => Attribute::Export {
            selector: text("thing"),
        },
        AttributeKind::Retain => Attribute::Retain { wrap_name: None },
        AttributeKind::Release => Attribute::Release,
        AttributeKind::Factory => Attribute::Factory,
        AttributeKind::ForcedType => Attribute::ForcedType { owns: true },
        AttributeKind::PlainString => Attribute::PlainString,
        AttributeKind::DisableZeroCopy => Attribute::DisableZeroCopy,
        AttributeKind::BindAs => Attribute::BindAs {
            target: text("double?"),
            origin: None,
        },
        AttributeKind::Internal => Attribute::Internal,
        AttributeKind::Protected => Attribute::Protected,
        AttributeKind::DefaultCtorVisibility => Attribute::DefaultCtorVisibility {
            visibility: Visibility::Protected,
        },
        AttributeKind::PrivateDefaultCtor => Attribute::PrivateDefaultCtor,
        AttributeKind::DisableDefaultCtor => Attribute::DisableDefaultCtor,
        AttributeKind::Prologue => Attribute::Prologue { code: text("A ();") },
        AttributeKind::Pre => Attribute::Pre { code: text("B ();") },
        AttributeKind::Post => Attribute::Post { code: text("C ();") },
        AttributeKind::Dispose => Attribute::Dispose { code: text("D ();") },
        AttributeKind::Async => Attribute::Async {
            result_type: None,
            method_name: None,
            result_type_name: None,
        },
        AttributeKind::Notification => Attribute::Notification {
            event_args: None,
            notification_center: None,
        },
        AttributeKind::EventArgs => Attribute::EventArgs {
            name: text("ThingEventArgs"),
            skip_generation: false,
        },
        AttributeKind::DelegateName => Attribute::DelegateName {
            name: text("ThingHandler"),
        },
        AttributeKind::StrongDictionary => Attribute::StrongDictionary {
            key_container: text("ThingKeys"),
            suffix: None,
        },
    }
}

fn member(name: &str, kind: MemberKind, attributes: Vec<Attribute>) -> MemberDeclaration {
    MemberDeclaration {
        name: name.to_string(),
        kind,
        attributes,
        type_ref: (kind != MemberKind::Method).then(|| TypeRef::named("NSNumber")),
        parameters: Vec::new(),
        return_value: None,
    }
}

/// A one-interface set with `attribute` placed on an element of kind `at`.
fn set_with_attribute_at(attribute: Attribute, at: ElementKind) -> DeclarationSet {
    let mut interface_attributes = Vec::new();
    let mut members = Vec::new();
    match at {
        ElementKind::Interface => interface_attributes.push(attribute),
        ElementKind::Method => members.push(member("Frob", MemberKind::Method, vec![attribute])),
        ElementKind::Property => {
            members.push(member("Count", MemberKind::Property, vec![attribute]))
        }
        ElementKind::Field => members.push(member("Limit", MemberKind::Field, vec![attribute])),
        ElementKind::Parameter => {
            let mut frob = member("Frob", MemberKind::Method, Vec::new());
            frob.parameters.push(ParameterDeclaration {
                name: "value".to_string(),
                type_ref: TypeRef::named("NSNumber"),
                attributes: vec![attribute],
            });
            members.push(frob);
        }
        ElementKind::ReturnValue => {
            let mut frob = member("Frob", MemberKind::Method, Vec::new());
            frob.return_value = Some(ReturnDeclaration {
                type_ref: TypeRef::named("NSNumber"),
                attributes: vec![attribute],
            });
            members.push(frob);
        }
    }
    DeclarationSet {
        value_types: Vec::new(),
        declarations: vec![BindingDeclaration {
            name: "NSThing".to_string(),
            attributes: interface_attributes,
            members,
        }],
    }
}

#[test]
fn every_disallowed_attachment_is_rejected() {
    let elements = [
        ElementKind::Interface,
        ElementKind::Method,
        ElementKind::Property,
        ElementKind::Field,
        ElementKind::Parameter,
        ElementKind::ReturnValue,
    ];
    let mut checked = 0;
    for &kind in AttributeKind::ALL {
        let row = attribute_spec(kind);
        for at in elements {
            if row.allows(at) {
                continue;
            }
            let report = validate_set(&set_with_attribute_at(sample_attribute(kind), at));
            assert!(
                report.issues.iter().any(|issue| {
                    issue.failure_class == failure_class::ATTACHMENT_DISALLOWED
                        && issue.attribute == Some(kind)
                        && issue.element_kind == at
                }),
                "{kind} on a {at} should be rejected: {:?}",
                report.issues
            );
            checked += 1;
        }
    }
    assert!(checked > AttributeKind::ALL.len());
}

#[test]
fn every_allowed_attachment_passes_the_attachment_check() {
    let elements = [
        ElementKind::Interface,
        ElementKind::Method,
        ElementKind::Property,
        ElementKind::Field,
        ElementKind::Parameter,
        ElementKind::ReturnValue,
    ];
    for &kind in AttributeKind::ALL {
        let row = attribute_spec(kind);
        for at in elements.into_iter().filter(|at| row.allows(*at)) {
            let report = validate_set(&set_with_attribute_at(sample_attribute(kind), at));
            assert!(
                !report
                    .issues
                    .iter()
                    .any(|issue| issue.failure_class == failure_class::ATTACHMENT_DISALLOWED),
                "{kind} on a {at} should attach: {:?}",
                report.issues
            );
        }
    }
}
