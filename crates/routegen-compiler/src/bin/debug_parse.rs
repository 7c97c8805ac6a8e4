//! Debug script to see what the parser and emitter produce.
//!
//! Usage: `debug_parse [file.routes]`. Without an argument a built-in
//! sample is used.

use routegen_compiler::{compile_source, frontend, EmitOptions};

const SAMPLE: &str = r#"
# Blog
GET  /blog/:year/:month  app.BlogController.archive(year: Int, month: Int, tag: String)
POST /users              app.UserController.create(name: String, admin: Boolean)
"#;

fn main() {
    let source = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SAMPLE.to_string(),
    };

    match frontend::parse_routes(&source) {
        Ok(routes) => {
            println!("Routes:");
            for route in &routes {
                println!("  line {}: {} {} -> {}", route.source_line, route.method, route.path, route.handler_ref());
                println!("    path params: {:?}", route.path_parameters);
                println!("    method params: {:?}", route.method_parameters);
            }
        }
        Err(e) => {
            println!("Error: {:?}", e);
            return;
        }
    }

    let options = EmitOptions {
        namespace: "debug".to_string(),
        ..EmitOptions::default()
    };
    match compile_source(&source, &options, "debug_routes.rs") {
        Ok(artifact) => println!("\n{}", artifact.code),
        Err(e) => println!("Error: {:?}", e),
    }
}
