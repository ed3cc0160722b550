use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3, Vec4};

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct ShadowPassParams {
    /// Light's view-projection multiplied by the instance's transform
    pub mvp: Mat4,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct GBufferPassParams {
    pub xform: Mat4,

    /// xyz - columns of the matrix transforming normals (inverse-transpose
    ///       of `xform`)
    ///
    /// d0.w - (as u32) material id
    /// d1.w - (as u32) number of lights
    pub d0: Vec4,
    pub d1: Vec4,
    pub d2: Vec4,
}

impl GBufferPassParams {
    pub fn new(xform: Mat4, material_id: u32, light_count: u32) -> Self {
        let normal_xform = {
            let xform = Mat3::from_mat4(xform);

            // Flattened instances have no meaningful normals anyway
            if xform.determinant().abs() > crate::PENUMBRA_EPSILON {
                xform.inverse().transpose()
            } else {
                xform
            }
        };

        Self {
            xform,
            d0: normal_xform
                .x_axis
                .extend(f32::from_bits(material_id)),
            d1: normal_xform.y_axis.extend(f32::from_bits(light_count)),
            d2: normal_xform.z_axis.extend(0.0),
        }
    }

    pub fn normal_xform(&self) -> Mat3 {
        Mat3::from_cols(
            self.d0.truncate(),
            self.d1.truncate(),
            self.d2.truncate(),
        )
    }

    pub fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.normal_xform() * normal
    }

    pub fn material_id(&self) -> u32 {
        self.d0.w.to_bits()
    }

    pub fn light_count(&self) -> u32 {
        self.d1.w.to_bits()
    }
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct DenoisePassParams {
    /// x - blending factor of the current frame
    pub payload: Vec4,
}

impl DenoisePassParams {
    pub fn new(alpha: f32) -> Self {
        Self {
            payload: Vec4::new(alpha, 0.0, 0.0, 0.0),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.payload.x
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    #[test]
    fn gbuffer_params() {
        let xform = Mat4::from_translation(vec3(1.0, 2.0, 3.0));
        let target = GBufferPassParams::new(xform, 7, 3);

        assert_eq!(xform, target.xform);
        assert_eq!(Mat3::IDENTITY, target.normal_xform());
        assert_eq!(7, target.material_id());
        assert_eq!(3, target.light_count());
        assert_eq!(112, core::mem::size_of::<GBufferPassParams>());
    }

    #[test]
    fn normals_under_non_uniform_scale() {
        let xform = Mat4::from_scale(vec3(2.0, 1.0, 1.0))
            * Mat4::from_rotation_z(0.3);

        let target = GBufferPassParams::new(xform, 0, 0);

        // Plane `x + y = 0`
        let normal = vec3(1.0, 1.0, 0.0).normalize();
        let tangent = vec3(1.0, -1.0, 0.0).normalize();

        let normal = target.transform_normal(normal);
        let tangent = xform.transform_vector3(tangent);

        assert_relative_eq!(0.0, normal.dot(tangent), epsilon = 1e-5);

        // Naive transform skews the normal off the surface
        let naive = xform.transform_vector3(vec3(1.0, 1.0, 0.0));

        assert!(naive.normalize().dot(tangent.normalize()).abs() > 0.1);
    }

    #[test]
    fn flattened_instance() {
        let xform = Mat4::from_scale(vec3(1.0, 0.0, 1.0));
        let target = GBufferPassParams::new(xform, 0, 0);

        assert!(target.normal_xform().is_finite());
    }
}
