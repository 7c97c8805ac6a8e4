use std::fs;
use std::path::{Path, PathBuf};

use routegen_compiler::config::DeclarationConfig;
use routegen_compiler::{
    compile_source, ArtifactSink, CompilerConfig, CompilerError, Compiler, Dependencies, EmitOptions,
    GeneratedArtifact, WriteOutcome,
};

const USERS: &str = "\
# users
GET    /users/:id   controllers.UserController.show(id: Long)
POST   /users       controllers.UserController.create(name: String, admin: Boolean)
DELETE /users/:id   controllers.UserController.remove(id: Long)
";

const BLOG: &str = "\
GET /blog/:year/:month  controllers.BlogController.archive(year: Int, month: Int, tag: String)
";

fn project(files: &[(&str, &str)]) -> (tempfile::TempDir, CompilerConfig) {
    let dir = tempfile::TempDir::new().unwrap();
    let routes = dir.path().join("routes");
    fs::create_dir_all(&routes).unwrap();
    for (name, text) in files {
        fs::write(routes.join(name), text).unwrap();
    }
    let config = CompilerConfig {
        source_dir: routes,
        out_dir: dir.path().join("generated"),
        ..CompilerConfig::default()
    };
    (dir, config)
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn compiles_every_route_file_and_the_index() {
    let (_dir, config) = project(&[("users.routes", USERS), ("blog.routes", BLOG)]);
    let out_dir = config.out_dir.clone();

    let result = Compiler::new(config).compile().unwrap();

    assert_eq!(result.routes, 4);
    assert_eq!(result.controllers, 2);
    let files: Vec<_> = result.artifacts.iter().map(|a| a.file_name.as_str()).collect();
    assert_eq!(files, vec!["blog_routes.rs", "users_routes.rs", "routes.rs"]);

    let users = read(&out_dir, "users_routes.rs");
    assert!(users.contains("pub mod users {"));
    assert!(users.contains("static userController: ::std::sync::LazyLock<crate::controllers::UserController>"));
    assert!(users.contains("\"get_users_id\""));
    assert!(users.contains("let __arg_id: i64 = __call.path_param(\"id\", \"Long\")?;"));
    assert!(users.contains("let __arg_admin: bool = __call.query_param(\"admin\", \"Boolean\")?;"));

    let index = read(&out_dir, "routes.rs");
    assert!(index.contains("include!(\"blog_routes.rs\");"));
    assert!(index.contains("include!(\"users_routes.rs\");"));
    assert!(index.contains("blog::register_routes(__dispatcher);"));
    assert!(index.contains("users::register_routes(__dispatcher);"));
}

#[test]
fn second_compile_leaves_files_untouched() {
    let (_dir, config) = project(&[("users.routes", USERS)]);
    let compiler = Compiler::new(config);

    let first = compiler.compile().unwrap();
    assert!(first.artifacts.iter().all(|a| a.outcome == WriteOutcome::Written));

    let second = compiler.compile().unwrap();
    assert!(second.artifacts.iter().all(|a| a.outcome == WriteOutcome::Unchanged));
}

#[test]
fn missing_declared_source_is_skipped() {
    let (_dir, mut config) = project(&[("users.routes", USERS)]);
    config.declarations = vec![
        DeclarationConfig {
            source: PathBuf::from("users.routes"),
            namespace: None,
        },
        DeclarationConfig {
            source: PathBuf::from("gone.routes"),
            namespace: Some("gone".to_string()),
        },
    ];
    let out_dir = config.out_dir.clone();

    let result = Compiler::new(config).compile().unwrap();

    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].origin, "gone.routes");
    assert_eq!(result.routes, 3);
    assert!(!out_dir.join("gone_routes.rs").exists());
    assert!(!read(&out_dir, "routes.rs").contains("gone"));
}

#[test]
fn parse_error_aborts_without_writing() {
    let bad = "GET /users/:id controllers.UserController.show()\n";
    let (_dir, config) = project(&[("users.routes", USERS), ("zz_bad.routes", bad)]);
    let out_dir = config.out_dir.clone();

    let err = Compiler::new(config).compile().unwrap_err();

    match err {
        CompilerError::ParameterMismatch { line, missing, .. } => {
            assert_eq!(line, 1);
            assert_eq!(missing, vec!["id".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!out_dir.exists());
}

#[test]
fn unknown_controllers_are_reported_not_fatal() {
    let (_dir, mut config) = project(&[("users.routes", USERS), ("blog.routes", BLOG)]);
    config.known_controllers = vec!["controllers.UserController".to_string()];

    let result = Compiler::new(config).check().unwrap();

    assert_eq!(result.files, 2);
    assert_eq!(result.routes, 4);
    assert_eq!(result.unknown_controllers.len(), 1);
    assert_eq!(result.unknown_controllers[0].controller, "controllers.BlogController");
}

#[test]
fn config_file_drives_compilation() {
    let (dir, _) = project(&[("users.routes", USERS)]);
    let config_path = dir.path().join("routegen.toml");
    fs::write(
        &config_path,
        format!(
            "source_dir = {:?}\nout_dir = {:?}\ncontroller_root = \"crate::web\"\n",
            dir.path().join("routes").display().to_string(),
            dir.path().join("out").display().to_string(),
        ),
    )
    .unwrap();

    let config = CompilerConfig::load(&config_path).unwrap();
    Compiler::new(config).compile().unwrap();

    let users = read(&dir.path().join("out"), "users_routes.rs");
    assert!(users.contains("crate::web::controllers::UserController"));
}

#[derive(Default)]
struct MemorySink {
    written: Vec<(GeneratedArtifact, bool)>,
}

impl ArtifactSink for MemorySink {
    fn write(
        &mut self,
        artifact: &GeneratedArtifact,
        dependencies: &Dependencies,
    ) -> Result<WriteOutcome, CompilerError> {
        self.written.push((artifact.clone(), dependencies.is_aggregating()));
        Ok(WriteOutcome::Written)
    }
}

#[test]
fn index_is_written_last_as_aggregating() {
    let (_dir, config) = project(&[("users.routes", USERS), ("blog.routes", BLOG)]);
    let mut sink = MemorySink::default();

    Compiler::new(config).compile_into(&mut sink).unwrap();

    let kinds: Vec<_> = sink
        .written
        .iter()
        .map(|(a, aggregating)| (a.file_name.as_str(), *aggregating))
        .collect();
    assert_eq!(
        kinds,
        vec![("blog_routes.rs", false), ("users_routes.rs", false), ("routes.rs", true)]
    );
}

#[test]
fn compile_source_is_deterministic() {
    let options = EmitOptions {
        namespace: "users".to_string(),
        ..EmitOptions::default()
    };
    let first = compile_source(USERS, &options, "users_routes.rs").unwrap();
    let second = compile_source(USERS, &options, "users_routes.rs").unwrap();
    assert_eq!(first.code, second.code);
    assert_eq!(first.route_count, 3);
    assert_eq!(first.controller_count, 1);
}
