use penumbra_gpu::prelude::*;

#[allow(clippy::too_many_arguments)]
#[spirv(vertex)]
pub fn vs(
    // Params
    #[spirv(push_constant)] params: &GBufferPassParams,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] camera: &Camera,

    // Inputs
    vertex_d0: Vec4,
    vertex_d1: Vec4,

    // Outputs
    #[spirv(position)] out_vertex: &mut Vec4,
    out_point: &mut Vec3,
    out_normal: &mut Vec3,
    out_uv: &mut Vec2,
) {
    let point = params.xform.transform_point3(vertex_d0.xyz());
    let normal = params.transform_normal(vertex_d1.xyz());

    *out_vertex = camera.world_to_clip(point);
    *out_point = point;
    *out_normal = normal;
    *out_uv = vec2(vertex_d0.w, vertex_d1.w);
}

#[allow(clippy::too_many_arguments)]
#[spirv(fragment)]
pub fn fs(
    // Params
    #[spirv(frag_coord)] frag_coord: Vec4,
    #[spirv(front_facing)] front_facing: bool,
    #[spirv(push_constant)] params: &GBufferPassParams,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] camera: &Camera,
    #[spirv(descriptor_set = 0, binding = 1, uniform)] settings: &Settings,
    #[spirv(descriptor_set = 0, binding = 2, storage_buffer)] lights: &[Light],
    #[spirv(descriptor_set = 0, binding = 3, storage_buffer)]
    materials: &[Material],
    #[spirv(descriptor_set = 0, binding = 4)] shadow_maps: TexShadowMaps,
    #[spirv(descriptor_set = 1, binding = 0)] base_color_tex: Tex,
    #[spirv(descriptor_set = 1, binding = 1)] normal_tex: Tex,
    #[spirv(descriptor_set = 1, binding = 2)] sampler: &Sampler,

    // Inputs
    point: Vec3,
    normal: Vec3,
    uv: Vec2,

    // Outputs
    out_color: &mut Vec4,
    out_surface: &mut Vec4,
    out_material: &mut Vec4,
) {
    let material = materials[params.material_id() as usize];

    let normal = {
        let normal = material.normal(uv, normal.normalize(), |uv| {
            normal_tex.sample(*sampler, uv)
        });

        if front_facing {
            normal
        } else {
            -normal
        }
    };

    let surface = Surface {
        point,
        normal,
        albedo: material.albedo(uv, |uv| base_color_tex.sample(*sampler, uv)),
        metallic: material.metallic(),
        roughness: material.roughness(),
        ao: material.ao(),
    };

    let shadow_map_size = settings.shadow_map_size() as f32;

    let radiance = DirectLighting::new(settings, camera.origin()).eval(
        &surface,
        lights,
        params.light_count(),
        |shadow_map, uv| {
            let texel = (uv * shadow_map_size)
                .as_ivec2()
                .clamp(IVec2::ZERO, IVec2::splat(shadow_map_size as i32 - 1));

            let depth: Vec4 = shadow_maps.fetch(texel.extend(shadow_map as i32));

            depth.x
        },
    );

    let gbuffer = GBufferEntry {
        radiance,
        normal,
        depth: frag_coord.z,
        albedo: surface.albedo,
        metallic: surface.metallic,
        roughness: surface.roughness,
        ao: surface.ao,
    };

    let [gbuffer_d0, gbuffer_d1, gbuffer_d2] = gbuffer.pack();

    *out_color = gbuffer_d0;
    *out_surface = gbuffer_d1;
    *out_material = gbuffer_d2;
}
