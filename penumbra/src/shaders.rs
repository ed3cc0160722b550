use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::{Error, Result};

/// Compiled shader module plus the name of its entry point.
#[derive(Debug)]
pub struct Shader {
    pub module: wgpu::ShaderModule,
    pub entry_point: &'static str,
}

macro_rules! shaders {
    ([ $( $name:ident => $entry_point:literal, )* ]) => {
        #[derive(Debug)]
        pub struct Shaders {
            $( pub $name: Shader, )*
        }

        impl Shaders {
            /// Loads all shaders from given directory, as produced by
            /// `penumbra-shader-builder`.
            pub fn new(device: &wgpu::Device, dir: &Path) -> Result<Self> {
                debug!("Loading shaders from `{}`", dir.display());

                Ok(Self {
                    $( $name: load(device, dir, $entry_point)?, )*
                })
            }
        }
    };
}

shaders!([
    shadow_vs => "shadow::vs",
    gbuffer_vs => "gbuffer::vs",
    gbuffer_fs => "gbuffer::fs",
    indirect => "indirect::main",
    denoise => "denoise::main",
    compose_vs => "compose::vs",
    compose_fs => "compose::fs",
]);

/// Returns path of the file containing given entry point.
pub fn shader_path(dir: &Path, entry_point: &str) -> PathBuf {
    dir.join(format!("{}.spv", entry_point.replace("::", "_")))
}

fn load(
    device: &wgpu::Device,
    dir: &Path,
    entry_point: &'static str,
) -> Result<Shader> {
    let path = shader_path(dir, entry_point);

    let bytes = fs::read(&path).map_err(|source| Error::ShaderNotFound {
        id: entry_point.into(),
        path: path.clone(),
        source,
    })?;

    if bytes.len() % 4 != 0 || !bytes.starts_with(&SPIRV_MAGIC) {
        return Err(Error::ShaderInvalid {
            id: entry_point.into(),
            message: format!("`{}` is not a SPIR-V module", path.display()),
        });
    }

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("penumbra_{}", entry_point.replace("::", "_"))),
        source: wgpu::util::make_spirv(&bytes),
    });

    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(Error::ShaderInvalid {
            id: entry_point.into(),
            message: err.to_string(),
        });
    }

    Ok(Shader {
        module,
        entry_point,
    })
}

/// SPIR-V's magic number, little-endian.
const SPIRV_MAGIC: [u8; 4] = [0x03, 0x02, 0x23, 0x07];
