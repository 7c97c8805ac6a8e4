fn main() {
    if let Err(err) = routegen_compiler::build::compile_dir("routes") {
        panic!("route compilation failed: {err}");
    }
}
