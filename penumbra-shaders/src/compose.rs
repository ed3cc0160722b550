use penumbra_gpu::prelude::*;

#[spirv(vertex)]
pub fn vs(
    #[spirv(vertex_index)] vert_idx: i32,
    #[spirv(position)] output: &mut Vec4,
) {
    fn full_screen_triangle(vert_idx: i32) -> Vec4 {
        let uv = vec2(((vert_idx << 1) & 2) as f32, (vert_idx & 2) as f32);
        let pos = 2.0 * uv - Vec2::ONE;

        pos.extend(0.0).extend(1.0)
    }

    *output = full_screen_triangle(vert_idx);
}

#[spirv(fragment)]
pub fn fs(
    #[spirv(frag_coord)] pos: Vec4,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] settings: &Settings,
    #[spirv(descriptor_set = 0, binding = 1)] gbuffer_color: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 2)] denoised: TexRgba32,
    frag_color: &mut Vec4,
) {
    let screen_pos = pos.xy().as_uvec2();

    let color = Composition::compose(
        gbuffer_color.read(screen_pos).xyz(),
        denoised.read(screen_pos).xyz(),
        settings.indirect_gain(),
        settings.gamma(),
    );

    *frag_color = color.extend(1.0);
}
