use std::error::Error;
use std::path::{Path, PathBuf};
use std::{env, fs};

use spirv_builder::{Capability, MetadataPrintout, SpirvBuilder};

/// Compiles `penumbra-shaders` and copies every entry point into the output
/// directory (first argument, `PENUMBRA_SHADERS_DIR` or `target/shaders`) as
/// `<module>_<entry point>.spv`, which is where the renderer looks for them.
fn main() -> Result<(), Box<dyn Error>> {
    let workspace_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .ok_or("couldn't find workspace directory")?;

    let crate_path = workspace_path.join("penumbra-shaders");

    let out_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::var_os("PENUMBRA_SHADERS_DIR").map(PathBuf::from))
        .unwrap_or_else(|| workspace_path.join("target").join("shaders"));

    fs::create_dir_all(&out_dir)?;

    let result = SpirvBuilder::new(crate_path, "spirv-unknown-spv1.3")
        .multimodule(true)
        .print_metadata(MetadataPrintout::None)
        .capability(Capability::Int8)
        .extra_arg("--spirt-passes=reduce,fuse_selects")
        .build()?;

    for (shader_name, shader_path) in result.module.unwrap_multi() {
        let shader_id = shader_name.replace("::", "_");
        let target = out_dir.join(format!("{shader_id}.spv"));

        fs::copy(shader_path, &target)?;

        println!("{shader_name} -> {}", target.display());
    }

    Ok(())
}
