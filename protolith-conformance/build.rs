fn main() {
    env_logger::init();
    println!("cargo:rerun-if-changed=proto/scenarios.proto");
    protolith_build::Codegen::new()
        .input("proto/scenarios.proto")
        .out_dir(std::env::var("OUT_DIR").unwrap())
        .print_output(true)
        .run()
        .expect("scenarios.proto failed to compile");
}
