use crate::support::{exit_with, load_constants_or_exit, platform_exit_code, print_json_or_exit};
use bindmeta_platform::{Platform, VersionResolver};
use serde_json::json;

pub fn run(platform: String, min: bool, descriptor: String, json_output: bool) {
    // Unsupported identifiers are fatal before the descriptor is touched.
    let platform = platform
        .parse::<Platform>()
        .unwrap_or_else(|e| exit_with(platform_exit_code(&e), e));
    let resolver = VersionResolver::new(load_constants_or_exit(&descriptor));
    let resolved = if min {
        resolver.min_version(platform)
    } else {
        resolver.sdk_version(platform)
    };
    let version = resolved.unwrap_or_else(|e| exit_with(platform_exit_code(&e), e));
    let constant = if min {
        platform.min_placeholder()
    } else {
        platform.sdk_placeholder()
    };

    if json_output {
        let payload = json!({
            "platform": platform.as_str(),
            "constant": constant,
            "version": version,
            "components": version.components(),
        });
        print_json_or_exit(&payload, "version");
    } else {
        println!("{version}");
    }
}
