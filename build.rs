// build.rs

fn main() {
    // Generate build info (VERGEN_BUILD_TIMESTAMP etc.) for `procsnap check`
    vergen::EmitBuilder::builder()
        .all_build()
        .emit()
        .expect("Unable to generate build info");
}
