use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let crate_dir = PathBuf::from(crate_dir);
    let include_dir = crate_dir.join("include");
    let header = include_dir.join("operadoras.h");

    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml")).unwrap_or_default();
    let bindings = match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => bindings,
        Err(err) => {
            println!("cargo:warning=skipping C header generation: {err}");
            return;
        }
    };

    if let Err(err) = std::fs::create_dir_all(&include_dir) {
        println!(
            "cargo:warning=skipping C header generation: cannot create {}: {err}",
            include_dir.display()
        );
        return;
    }
    bindings.write_to_file(&header);
}
