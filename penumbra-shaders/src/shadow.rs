use penumbra_gpu::prelude::*;

#[spirv(vertex)]
pub fn vs(
    #[spirv(push_constant)] params: &ShadowPassParams,
    vertex_d0: Vec4,
    #[spirv(position)] out_vertex: &mut Vec4,
) {
    *out_vertex = params.mvp * vertex_d0.xyz().extend(1.0);
}
