use glam::{Mat4, Vec3};

/// Fixed viewpoint looking back through the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(1.0, 0.8, 2.0),
            up: Vec3::Y,
            fov_y: std::f32::consts::FRAC_PI_4,
            near: 0.01,
            far: 10.0,
        }
    }
}

impl Camera {
    /// Combined projection * view matrix for a `width` x `height` viewport.
    ///
    /// Targets wgpu clip space (depth in `0..=1`). A zero height yields a
    /// square aspect.
    pub fn view_projection(&self, width: u32, height: u32) -> Mat4 {
        let aspect = if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };

        let view = Mat4::look_at_rh(self.eye, -self.eye, self.up);
        let proj = Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far);
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    fn project(m: Mat4, p: Vec3) -> Vec3 {
        let clip = m * Vec4::new(p.x, p.y, p.z, 1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn origin_lands_at_viewport_center() {
        let m = Camera::default().view_projection(800, 600);
        let ndc = project(m, Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn aspect_follows_viewport() {
        let cam = Camera::default();
        let wide = cam.view_projection(1600, 800);
        let square = cam.view_projection(800, 800);
        // Wider viewport compresses x in clip space.
        assert!((wide.x_axis.x * 2.0 - square.x_axis.x).abs() < 1e-5);
        assert!((wide.y_axis.y - square.y_axis.y).abs() < 1e-5);
    }

    #[test]
    fn zero_height_is_square() {
        let cam = Camera::default();
        assert_eq!(cam.view_projection(640, 0), cam.view_projection(1, 1));
    }

    #[test]
    fn point_behind_eye_is_clipped() {
        let m = Camera::default().view_projection(800, 600);
        let clip = m * Vec4::new(2.0, 1.6, 4.0, 1.0);
        assert!(clip.w < 0.0);
    }
}
