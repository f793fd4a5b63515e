use crate::mesh::{GpuMesh, MeshData};
use crate::shader::{Shader, ShaderError, ShaderSources};
use crate::texture::{self, DEPTH_FORMAT, GpuTexture};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use sceneview_assets::{ObjMesh, TextureData};
use sceneview_common::{AssetId, Color, ScreenRect, Shape};
use sceneview_render::{DrawTarget, plan_frame};
use sceneview_scene::{Grid, Scene, ShadingPath, ViewerState};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    eye: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ModelUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
    color: [f32; 4],
    /// x: sample the texture when non-zero.
    flags: [u32; 4],
}

impl ModelUniform {
    fn new(model: Mat4, color: Color, textured: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: normal_matrix(model).to_cols_array_2d(),
            color: color.to_array(),
            flags: [u32::from(textured), 0, 0, 0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LightUniform {
    position: [f32; 4],
    color: [f32; 4],
}

/// Inverse-transpose of the model matrix; identity for degenerate scales.
fn normal_matrix(model: Mat4) -> Mat4 {
    if model.determinant().abs() <= f32::EPSILON {
        Mat4::IDENTITY
    } else {
        model.inverse().transpose()
    }
}

/// Camera viewport clipped to the render target. `None` when nothing is left.
fn clamp_viewport(rect: ScreenRect, width: u32, height: u32) -> Option<(f32, f32, f32, f32)> {
    let x = rect.x.max(0);
    let y = rect.y.max(0);
    let right = rect.right().min(width as i32);
    let bottom = rect.bottom().min(height as i32);
    if right <= x || bottom <= y {
        return None;
    }
    Some((x as f32, y as f32, (right - x) as f32, (bottom - y) as f32))
}

/// Uniform buffer and bind group for one draw.
struct ModelSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ModelSlot {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&ModelUniform::new(Mat4::IDENTITY, Color::WHITE, false)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = uniform_bind_group(device, layout, &buffer, label);
        Self { buffer, bind_group }
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

/// wgpu scene renderer: grid lines, the light gizmo, and textured objects
/// through either the default or the lit program.
pub struct WgpuRenderer {
    unlit_triangles: wgpu::RenderPipeline,
    unlit_lines: wgpu::RenderPipeline,
    lit_triangles: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
    model_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    grid_slot: ModelSlot,
    light_slot: ModelSlot,
    object_slots: Vec<ModelSlot>,
    cube: GpuMesh,
    quad: GpuMesh,
    grid_lines: GpuMesh,
    models: BTreeMap<String, GpuMesh>,
    white: GpuTexture,
    textures: BTreeMap<AssetId, GpuTexture>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sources: &ShaderSources,
        grid: &Grid,
    ) -> Result<Self, ShaderError> {
        let camera_layout = uniform_layout(
            device,
            "camera_bind_group_layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let model_layout = uniform_layout(
            device,
            "model_bind_group_layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let light_layout =
            uniform_layout(device, "light_bind_group_layout", wgpu::ShaderStages::FRAGMENT);
        let texture_layout = texture::texture_bind_group_layout(device);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera_buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group =
            uniform_bind_group(device, &camera_layout, &camera_buffer, "camera_bind_group");
        let light_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("light_buffer"),
            size: std::mem::size_of::<LightUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let light_bind_group =
            uniform_bind_group(device, &light_layout, &light_buffer, "light_bind_group");

        let unlit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("unlit_pipeline_layout"),
            bind_group_layouts: &[&camera_layout, &model_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let lit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lit_pipeline_layout"),
            bind_group_layouts: &[&camera_layout, &model_layout, &texture_layout, &light_layout],
            push_constant_ranges: &[],
        });

        let default_shader = Shader::create(device, "default_shader", &sources.default)?;
        let lit_shader = Shader::create(device, "lit_shader", &sources.lit)?;
        let unlit_triangles = default_shader.pipeline(
            device,
            &unlit_layout,
            surface_format,
            DEPTH_FORMAT,
            wgpu::PrimitiveTopology::TriangleList,
        )?;
        let unlit_lines = default_shader.pipeline(
            device,
            &unlit_layout,
            surface_format,
            DEPTH_FORMAT,
            wgpu::PrimitiveTopology::LineList,
        )?;
        let lit_triangles = lit_shader.pipeline(
            device,
            &lit_layout,
            surface_format,
            DEPTH_FORMAT,
            wgpu::PrimitiveTopology::TriangleList,
        )?;

        let sampler = texture::create_sampler(device);
        let white = GpuTexture::upload(
            device,
            queue,
            &texture_layout,
            &sampler,
            &TextureData::white(),
            "white_texture",
        );

        Ok(Self {
            unlit_triangles,
            unlit_lines,
            lit_triangles,
            camera_buffer,
            camera_bind_group,
            light_buffer,
            light_bind_group,
            grid_slot: ModelSlot::new(device, &model_layout, "grid_model"),
            light_slot: ModelSlot::new(device, &model_layout, "light_model"),
            object_slots: Vec::new(),
            model_layout,
            texture_layout,
            sampler,
            cube: GpuMesh::upload(device, "cube", &MeshData::cube()),
            quad: GpuMesh::upload(device, "quad", &MeshData::quad()),
            grid_lines: GpuMesh::upload(device, "grid", &MeshData::lines(&grid.line_endpoints())),
            models: BTreeMap::new(),
            white,
            textures: BTreeMap::new(),
            depth_texture: texture::create_depth_texture(device, width, height),
            surface_format,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn upload_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        id: AssetId,
        data: &TextureData,
    ) {
        let label = format!("texture_{:016x}", id.0);
        let gpu = GpuTexture::upload(device, queue, &self.texture_layout, &self.sampler, data, &label);
        self.textures.insert(id, gpu);
    }

    /// Register mesh data for `Shape::Model { path }` objects with this path.
    pub fn upload_model(&mut self, device: &wgpu::Device, path: &str, mesh: &ObjMesh) {
        let gpu = GpuMesh::upload(device, path, &MeshData::from_obj(mesh));
        self.models.insert(path.to_owned(), gpu);
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = texture::create_depth_texture(device, width, height);
    }

    fn mesh_for(&self, shape: &Shape) -> &GpuMesh {
        match shape {
            Shape::Cube => &self.cube,
            Shape::Quad => &self.quad,
            // Models that failed to load draw as cubes.
            Shape::Model { path } => self.models.get(path).unwrap_or(&self.cube),
        }
    }

    /// Render one frame into `view`: clear, then grid, light gizmo and
    /// objects inside the camera viewport.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        target_size: (u32, u32),
        scene: &Scene,
        state: &ViewerState,
    ) {
        let camera = scene.camera.uniform();
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform {
                view: camera.view.to_cols_array_2d(),
                projection: camera.projection.to_cols_array_2d(),
                eye: camera.eye.extend(1.0).to_array(),
            }),
        );
        queue.write_buffer(
            &self.light_buffer,
            0,
            bytemuck::bytes_of(&LightUniform {
                position: scene.light.position().extend(1.0).to_array(),
                color: scene.light.color().to_array(),
            }),
        );
        queue.write_buffer(
            &self.grid_slot.buffer,
            0,
            bytemuck::bytes_of(&ModelUniform::new(
                scene.grid.transform().matrix(),
                scene.grid.color,
                false,
            )),
        );
        queue.write_buffer(
            &self.light_slot.buffer,
            0,
            bytemuck::bytes_of(&ModelUniform::new(
                scene.light.transform().matrix(),
                scene.light.color(),
                false,
            )),
        );

        while self.object_slots.len() < scene.objects().len() {
            let label = format!("object_model_{}", self.object_slots.len());
            self.object_slots
                .push(ModelSlot::new(device, &self.model_layout, &label));
        }
        for (i, object) in scene.objects().iter().enumerate() {
            let model = scene.object_world_matrix(i).unwrap_or(Mat4::IDENTITY);
            queue.write_buffer(
                &self.object_slots[i].buffer,
                0,
                bytemuck::bytes_of(&ModelUniform::new(
                    model,
                    object.color(),
                    object.is_textured(),
                )),
            );
        }

        let viewport = clamp_viewport(scene.camera.viewport(), target_size.0, target_size.1);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });
        self.encode_scene(&mut encoder, view, viewport, scene, state);
        queue.submit(std::iter::once(encoder.finish()));
    }

    fn encode_scene(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        viewport: Option<(f32, f32, f32, f32)>,
        scene: &Scene,
        state: &ViewerState,
    ) {
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.15,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let Some((x, y, w, h)) = viewport else {
                tracing::trace!("camera viewport outside render target, nothing drawn");
                return;
            };
            pass.set_viewport(x, y, w, h, 0.0, 1.0);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            for call in plan_frame(scene, state) {
                let (slot, mesh, texture, pipeline) = match call.target {
                    DrawTarget::Grid => (
                        &self.grid_slot,
                        &self.grid_lines,
                        &self.white,
                        &self.unlit_lines,
                    ),
                    DrawTarget::Light => (
                        &self.light_slot,
                        &self.cube,
                        &self.white,
                        &self.unlit_triangles,
                    ),
                    DrawTarget::Object(i) => {
                        let object = &scene.objects()[i];
                        let pipeline = match call.shading {
                            ShadingPath::Unlit => &self.unlit_triangles,
                            ShadingPath::Lit => &self.lit_triangles,
                        };
                        (
                            &self.object_slots[i],
                            self.mesh_for(object.shape()),
                            self.textures.get(&object.texture()).unwrap_or(&self.white),
                            pipeline,
                        )
                    }
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(1, &slot.bind_group, &[]);
                pass.set_bind_group(2, &texture.bind_group, &[]);
                if call.shading == ShadingPath::Lit {
                    pass.set_bind_group(3, &self.light_bind_group, &[]);
                }
                mesh.draw(&mut pass);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 144);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 160);
        assert_eq!(std::mem::size_of::<LightUniform>(), 32);
        assert_eq!(std::mem::size_of::<ModelUniform>() % 16, 0);
    }

    #[test]
    fn normal_matrix_of_rotation_is_the_rotation() {
        let rot = Mat4::from_rotation_y(0.7);
        assert!(normal_matrix(rot).abs_diff_eq(rot, 1e-5));
    }

    #[test]
    fn normal_matrix_undoes_nonuniform_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let n = normal_matrix(model);
        assert!((n.x_axis.x - 0.5).abs() < 1e-6);
        assert!((n.y_axis.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_scale_falls_back_to_identity() {
        let model = Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(normal_matrix(model), Mat4::IDENTITY);
    }

    #[test]
    fn textured_flag_lands_in_flags_x() {
        let on = ModelUniform::new(Mat4::IDENTITY, Color::WHITE, true);
        let off = ModelUniform::new(Mat4::IDENTITY, Color::GRAY, false);
        assert_eq!(on.flags[0], 1);
        assert_eq!(off.flags[0], 0);
        assert_eq!(off.color, Color::GRAY.to_array());
    }

    #[test]
    fn viewport_is_clamped_to_target() {
        let rect = ScreenRect::new(0, 0, 1520, 830);
        assert_eq!(clamp_viewport(rect, 1920, 1080), Some((0.0, 0.0, 1520.0, 830.0)));
        assert_eq!(clamp_viewport(rect, 800, 600), Some((0.0, 0.0, 800.0, 600.0)));
        let off = ScreenRect::new(-100, 50, 300, 100);
        assert_eq!(clamp_viewport(off, 1920, 1080), Some((0.0, 50.0, 200.0, 100.0)));
        assert_eq!(clamp_viewport(ScreenRect::new(2000, 0, 10, 10), 1920, 1080), None);
    }
}
