use penumbra_gpu::prelude::*;

#[spirv(compute(threads(8, 8)))]
#[allow(clippy::too_many_arguments)]
pub fn main(
    #[spirv(global_invocation_id)] global_id: UVec3,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 1, uniform)] settings: &Settings,
    #[spirv(descriptor_set = 0, binding = 2)] gbuffer_color: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 3)] gbuffer_surface: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 4)] gbuffer_material: TexRgba32,
    #[spirv(descriptor_set = 0, binding = 5)] output: TexRgba32,
) {
    let screen_pos = global_id.xy();

    if !camera.contains(screen_pos) {
        return;
    }

    let gbuffer =
        GBuffer::new(gbuffer_color, gbuffer_surface, gbuffer_material);

    let entry = gbuffer.get(screen_pos);

    let color = if entry.is_some() {
        let receiver = entry.surface(camera, camera.pixel_to_uv(screen_pos));

        ScreenSpaceIndirect { camera, settings }.estimate(
            screen_pos,
            &receiver,
            |pos| gbuffer.get(pos),
        )
    } else {
        Vec3::ZERO
    };

    unsafe {
        output.write(screen_pos, color.extend(1.0));
    }
}
