use crate::support::{EXIT_FATAL, load_constants_or_exit, print_json_or_exit};
use bindmeta_platform::placeholder_names;
use serde_json::json;

pub fn run(descriptor: String, json_output: bool) {
    let constants = load_constants_or_exit(&descriptor);
    let errors: Vec<String> = constants.validate().iter().map(ToString::to_string).collect();

    if json_output {
        let values: serde_json::Map<String, serde_json::Value> = placeholder_names()
            .into_iter()
            .map(|name| (name.to_string(), json!(constants.get(name))))
            .collect();
        let payload = json!({
            "descriptor": descriptor,
            "result": if errors.is_empty() { "accepted" } else { "rejected" },
            "constants": values,
            "errors": errors,
        });
        print_json_or_exit(&payload, "constants");
    } else {
        println!("bindmeta constants");
        println!("  Descriptor: {descriptor}");
        for name in placeholder_names() {
            println!("  {name} = {}", constants.get(name).unwrap_or("<unset>"));
        }
        for error in &errors {
            eprintln!("error: {error}");
        }
    }

    if !errors.is_empty() {
        std::process::exit(EXIT_FATAL);
    }
}
