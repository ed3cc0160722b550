use penumbra_gpu::prelude::*;

#[spirv(compute(threads(8, 8)))]
pub fn main(
    #[spirv(global_invocation_id)] global_id: UVec3,
    #[spirv(push_constant)] params: &DenoisePassParams,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 1)] indirect: TexRgba32,
    #[spirv(descriptor_set = 1, binding = 0)] prev_denoised: TexRgba32,
    #[spirv(descriptor_set = 1, binding = 1)] denoised: TexRgba32,
) {
    let screen_pos = global_id.xy();

    if !camera.contains(screen_pos) {
        return;
    }

    let current = indirect.read(screen_pos).xyz();
    let previous = prev_denoised.read(screen_pos).xyz();
    let color = TemporalDenoiser::blend(current, previous, params.alpha());

    unsafe {
        denoised.write(screen_pos, color.extend(1.0));
    }
}
