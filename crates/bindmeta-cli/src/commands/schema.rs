use crate::support::print_json_or_exit;
use bindmeta_schema::registry::SCHEMA_REGISTRY_KIND;
use bindmeta_schema::{attribute_schema, attribute_schema_json, schema_digest};

pub fn run(json_output: bool) {
    if json_output {
        print_json_or_exit(&attribute_schema_json(), "schema");
        return;
    }

    let rows = attribute_schema();
    println!("bindmeta schema");
    println!("  Registry kind: {SCHEMA_REGISTRY_KIND}");
    println!("  Digest: {}", schema_digest());
    println!("  Attributes: {}", rows.len());
    for row in rows {
        let targets: Vec<String> = row.targets.iter().map(ToString::to_string).collect();
        let repeat = if row.repeatable { " (repeatable)" } else { "" };
        println!("    - {}: {}{repeat}", row.kind, targets.join(", "));
    }
}
