use crate::mesh::Vertex;
use crate::shaders;

/// Errors from compiling a shader program or building its pipelines.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("shader `{label}` failed to compile: {message}")]
    Compile { label: String, message: String },
    #[error("pipeline `{label}` failed validation: {message}")]
    Pipeline { label: String, message: String },
}

/// WGSL sources for the two programs.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub default: String,
    pub lit: String,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            default: shaders::DEFAULT_SHADER.to_owned(),
            lit: shaders::LIT_SHADER.to_owned(),
        }
    }
}

/// A compiled WGSL module with `vs_main`/`fs_main` entry points.
pub struct Shader {
    label: String,
    module: wgpu::ShaderModule,
}

impl Shader {
    /// Compile `source` inside a validation error scope.
    pub fn create(device: &wgpu::Device, label: &str, source: &str) -> Result<Self, ShaderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Compile {
                label: label.to_owned(),
                message: err.to_string(),
            });
        }
        tracing::debug!("compiled shader {label}");
        Ok(Self {
            label: label.to_owned(),
            module,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Build a depth-tested pipeline drawing [`Vertex`] data with this program.
    pub fn pipeline(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        topology: wgpu::PrimitiveTopology,
    ) -> Result<wgpu::RenderPipeline, ShaderError> {
        let label = format!("{}_{topology:?}", self.label);
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &self.module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Pipeline {
                label,
                message: err.to_string(),
            });
        }
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sources_expose_entry_points() {
        let sources = ShaderSources::default();
        for src in [&sources.default, &sources.lit] {
            assert!(src.contains("fn vs_main"));
            assert!(src.contains("fn fs_main"));
        }
        assert!(sources.lit.contains("@group(3)"));
        assert!(!sources.default.contains("@group(3)"));
    }
}
