use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Screen-space camera: world units are logical pixels with the origin at
/// the top-left corner and +y pointing down, matching the canvas the game
/// logic is written against.
pub struct ScreenCamera {
    pub viewport: (f32, f32),
}

impl ScreenCamera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: (width, height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let (w, h) = self.viewport;
        let proj = Mat4::orthographic_rh(0.0, w.max(1.0), h.max(1.0), 0.0, -1.0, 1.0);
        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn project(cam: &ScreenCamera, x: f32, y: f32) -> Vec4 {
        let m = Mat4::from_cols_array_2d(&cam.build_uniform().view_proj);
        m * Vec4::new(x, y, 0.0, 1.0)
    }

    #[test]
    fn top_left_maps_to_clip_top_left() {
        let cam = ScreenCamera::new(1200.0, 700.0);
        let p = project(&cam, 0.0, 0.0);
        assert!((p.x + 1.0).abs() < 1e-5);
        assert!((p.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn bottom_right_maps_to_clip_bottom_right() {
        let cam = ScreenCamera::new(1200.0, 700.0);
        let p = project(&cam, 1200.0, 700.0);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y + 1.0).abs() < 1e-5);
    }
}
