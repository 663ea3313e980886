//! WebGPU render pipeline setup
//!
//! One pipeline draws every instance: unit cubes first, then the ground plane,
//! both from a shared per-frame instance buffer.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use super::shapes;
use super::vertex::{InstanceRaw, Vertex};
use crate::error::HostError;
use crate::scene::{DrawList, Lighting, Mesh, color};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
/// Initial instance buffer capacity (grows on demand)
const INITIAL_INSTANCES: usize = 32;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4], // offset 0
    ambient: [f32; 4],        // offset 64
    spot_position: [f32; 4],  // offset 80, w = cos(cone half-angle)
    spot_color: [f32; 4],     // offset 96
    spot_direction: [f32; 4], // offset 112
}

impl Globals {
    fn new(view_proj: &Mat4, lighting: &Lighting) -> Self {
        let [ar, ag, ab] = lighting.ambient;
        let [sr, sg, sb] = lighting.spot_color;
        let pos = lighting.spot_position;
        let dir = (lighting.spot_target - lighting.spot_position).normalize_or_zero();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            ambient: [ar, ag, ab, 0.0],
            spot_position: [pos.x, pos.y, pos.z, lighting.spot_angle.cos()],
            spot_color: [sr, sg, sb, 0.0],
            spot_direction: [dir.x, dir.y, dir.z, 0.0],
        }
    }
}

/// Flatten a draw list into cube instances followed by plane instances
fn pack_instances(list: &DrawList) -> (Vec<InstanceRaw>, u32) {
    let mut raw: Vec<InstanceRaw> = list.with_mesh(Mesh::Cube).map(InstanceRaw::from).collect();
    let cube_count = raw.len() as u32;
    raw.extend(list.with_mesh(Mesh::Plane).map(InstanceRaw::from));
    (raw, cube_count)
}

/// Prefer an sRGB format; an adapter reporting nothing cannot present
fn pick_surface_format(
    formats: &[wgpu::TextureFormat],
    alpha_modes: &[wgpu::CompositeAlphaMode],
) -> Result<(wgpu::TextureFormat, wgpu::CompositeAlphaMode), HostError> {
    let format = formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first())
        .copied()
        .ok_or(HostError::NoSurfaceFormat("texture format"))?;
    let alpha_mode = alpha_modes
        .first()
        .copied()
        .ok_or(HostError::NoSurfaceFormat("alpha mode"))?;
    Ok((format, alpha_mode))
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

// ============================================================================
// SCENE RENDER STATE
// ============================================================================

pub struct SceneRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,

    cube_buffer: wgpu::Buffer,
    cube_vertex_count: u32,
    plane_buffer: wgpu::Buffer,
    plane_vertex_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,

    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl SceneRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, HostError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("box-walker-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let (surface_format, alpha_mode) =
            pick_surface_format(&surface_caps.formats, &surface_caps.alpha_modes)?;

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc(), InstanceRaw::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Ground plane is double-sided
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let cube = shapes::unit_cube();
        let cube_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertices"),
            contents: bytemuck::cast_slice(&cube),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let plane = shapes::ground_quad();
        let plane_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plane_vertices"),
            contents: bytemuck::cast_slice(&plane),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_buffer = Self::create_instance_buffer(&device, INITIAL_INSTANCES);
        let depth_view = create_depth_view(&device, width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            bind_group,
            depth_view,
            cube_buffer,
            cube_vertex_count: cube.len() as u32,
            plane_buffer,
            plane_vertex_count: plane.len() as u32,
            instance_buffer,
            instance_capacity: INITIAL_INSTANCES,
            size: (width, height),
        })
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instances"),
            size: (std::mem::size_of::<InstanceRaw>() * capacity) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, new_width, new_height);
        }
    }

    /// Upload this frame's instances and draw them
    pub fn render(
        &mut self,
        list: &DrawList,
        view_proj: &Mat4,
        lighting: &Lighting,
    ) -> Result<(), wgpu::SurfaceError> {
        let (instances, cube_count) = pack_instances(list);
        let total = instances.len() as u32;

        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(&self.device, self.instance_capacity);
            log::debug!("Instance buffer grown to {}", self.instance_capacity);
        }
        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let globals = Globals::new(view_proj, lighting);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });

        {
            let [r, g, b, a] = color::hex(color::BACKGROUND);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            render_pass.set_vertex_buffer(0, self.cube_buffer.slice(..));
            render_pass.draw(0..self.cube_vertex_count, 0..cube_count);

            render_pass.set_vertex_buffer(0, self.plane_buffer.slice(..));
            render_pass.draw(0..self.plane_vertex_count, cube_count..total);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use crate::sim::{CreaturePose, LimbOffsets};
    use glam::Vec3;

    #[test]
    fn test_globals_size_matches_shader() {
        assert_eq!(std::mem::size_of::<Globals>(), 128);
    }

    #[test]
    fn test_pack_puts_cubes_first() {
        let scene = Scene::new(1360, 700);
        let list = scene.draw_list(&CreaturePose::default(), &LimbOffsets::rest());
        let (raw, cube_count) = pack_instances(&list);

        assert_eq!(raw.len(), list.len());
        assert_eq!(cube_count as usize, list.with_mesh(Mesh::Cube).count());
        // The single plane instance sits after every cube
        let ground = raw[cube_count as usize];
        assert_eq!(ground.model[0][0], crate::scene::GROUND_WIDTH);
    }

    #[test]
    fn test_surface_format_prefers_srgb() {
        use wgpu::{CompositeAlphaMode, TextureFormat};

        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        let picked = pick_surface_format(&formats, &[CompositeAlphaMode::Opaque]);
        assert!(matches!(
            picked,
            Ok((TextureFormat::Bgra8UnormSrgb, CompositeAlphaMode::Opaque))
        ));

        let picked = pick_surface_format(&[TextureFormat::Rgba8Unorm], &[CompositeAlphaMode::Opaque]);
        assert!(matches!(picked, Ok((TextureFormat::Rgba8Unorm, _))));
    }

    #[test]
    fn test_empty_surface_capabilities_are_an_error() {
        use wgpu::{CompositeAlphaMode, TextureFormat};

        let no_formats = pick_surface_format(&[], &[CompositeAlphaMode::Opaque]);
        assert!(matches!(no_formats, Err(HostError::NoSurfaceFormat(_))));

        let no_alpha = pick_surface_format(&[TextureFormat::Bgra8UnormSrgb], &[]);
        assert!(matches!(no_alpha, Err(HostError::NoSurfaceFormat(_))));
    }

    #[test]
    fn test_spot_globals() {
        let lighting = Lighting {
            ambient: [0.1, 0.2, 0.3],
            spot_position: Vec3::new(0.0, 10.0, 0.0),
            spot_color: [1.0, 1.0, 1.0],
            spot_target: Vec3::ZERO,
            spot_angle: std::f32::consts::FRAC_PI_3,
        };
        let globals = Globals::new(&Mat4::IDENTITY, &lighting);
        assert_eq!(globals.spot_direction, [0.0, -1.0, 0.0, 0.0]);
        assert!((globals.spot_position[3] - 0.5).abs() < 1e-6);
        assert_eq!(globals.ambient, [0.1, 0.2, 0.3, 0.0]);
    }
}
