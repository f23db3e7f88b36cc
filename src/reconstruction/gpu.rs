use std::borrow::Cow;

use bytemuck::NoUninit;
use indicatif::ProgressBar;
use wgpu::{Buffer, util::DeviceExt};

use super::{Contribution, KernelInput};
use crate::ReconstructionError;

const WORKGROUP_SIZE: usize = 64;
const MAX_WORKGROUPS: usize = 65535;

// GRCOV_EXCL_START
#[derive(NoUninit, Clone, Copy)]
#[repr(C)]
struct Vec4 {
    x: f32,
    y: f32,
    z: f32,
    _pad: f32,
}

#[derive(NoUninit, Clone, Copy)]
#[repr(C)]
struct Params {
    xdim: u32,
    ydim: u32,
    zdim: u32,
    n_sensors: u32,
    n_samples: u32,
    offset: u32,
    num_pixels: u32,
    _pad0: u32,
    spacing: f32,
    sos_dt: f32,
    _pad1: [f32; 2],
}
// GRCOV_EXCL_STOP

#[derive(Debug)]
pub(crate) struct Gpu {
    params: Params,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,
    buf_uniform_params: Buffer,
    buf_storage_dst: Buffer,
    buf_staging_dst: Buffer,
}

impl std::fmt::Debug for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Params {{ dims: ({}, {}, {}), n_sensors: {}, n_samples: {} }}",
            self.xdim, self.ydim, self.zdim, self.n_sensors, self.n_samples
        )
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl Gpu {
    pub(crate) fn is_available() -> bool {
        pollster::block_on(
            wgpu::Instance::default().request_adapter(&wgpu::RequestAdapterOptions::default()),
        )
        .is_ok()
    }

    pub(crate) fn new(input: &KernelInput<'_>) -> Result<Self, ReconstructionError> {
        let grid = input.grid;
        let signal = input.signal.as_standard_layout();
        let sensors = input
            .sensors
            .iter()
            .map(|p| Vec4 {
                x: p.x,
                y: p.y,
                z: p.z,
                _pad: 0.,
            })
            .collect::<Vec<_>>();
        let params = Params {
            xdim: grid.xdim() as _,
            ydim: grid.ydim() as _,
            zdim: grid.zdim() as _,
            n_sensors: sensors.len() as _,
            n_samples: input.signal.ncols() as _,
            offset: 0,
            num_pixels: grid.num_pixels() as _,
            _pad0: 0,
            spacing: grid.spacing_mm(),
            sos_dt: input.sos_dt,
            _pad1: [0.; 2],
        };
        let buf_dst_size = (grid.num_pixels() * size_of::<[f32; 2]>()) as wgpu::BufferAddress;

        let instance = wgpu::Instance::default();
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .map_err(|_| ReconstructionError::NoSuitableAdapterFound)?;
        tracing::debug!("Using GPU adapter: {:?}", adapter.get_info());

        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: adapter.limits(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            }))?;

        let cs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: None,
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shader.wgsl"))),
        });

        let buf_uniform_params = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: None,
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let buf_storage_signal = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: None,
            contents: bytemuck::cast_slice(signal.as_slice().unwrap_or_default()),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let buf_storage_sensors = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: None,
            contents: bytemuck::cast_slice(&sensors),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let buf_storage_apodization =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: None,
                contents: bytemuck::cast_slice(input.weights),
                usage: wgpu::BufferUsages::STORAGE,
            });
        let buf_storage_dst = device.create_buffer(&wgpu::BufferDescriptor {
            label: None,
            size: buf_dst_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let buf_staging_dst = device.create_buffer(&wgpu::BufferDescriptor {
            label: None,
            size: buf_dst_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                storage_entry(1, true),
                storage_entry(2, true),
                storage_entry(3, true),
                storage_entry(4, false),
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buf_uniform_params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buf_storage_signal.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buf_storage_sensors.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: buf_storage_apodization.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: buf_storage_dst.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: None,
            layout: Some(&pipeline_layout),
            module: &cs_module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Ok(Self {
            params,
            device,
            queue,
            pipeline,
            bind_group,
            buf_uniform_params,
            buf_storage_dst,
            buf_staging_dst,
        })
    }

    pub(crate) fn num_batches(&self) -> usize {
        (self.params.num_pixels as usize).div_ceil(WORKGROUP_SIZE * MAX_WORKGROUPS)
    }

    pub(crate) fn compute(&self, pb: &ProgressBar) -> Result<Vec<Contribution>, ReconstructionError> {
        let num_pixels = self.params.num_pixels as usize;
        for offset in (0..num_pixels).step_by(WORKGROUP_SIZE * MAX_WORKGROUPS) {
            let batch = (num_pixels - offset).min(WORKGROUP_SIZE * MAX_WORKGROUPS);
            tracing::debug!("Dispatching pixels {}..{} of {}", offset, offset + batch, num_pixels);
            let params = Params {
                offset: offset as _,
                ..self.params
            };
            self.queue
                .write_buffer(&self.buf_uniform_params, 0, bytemuck::bytes_of(&params));

            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
            {
                let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: None,
                    timestamp_writes: None,
                });
                cpass.set_pipeline(&self.pipeline);
                cpass.set_bind_group(0, &self.bind_group, &[]);
                cpass.dispatch_workgroups(batch.div_ceil(WORKGROUP_SIZE) as _, 1, 1);
            }
            self.queue.submit(Some(encoder.finish()));
            self.device.poll(wgpu::PollType::Wait)?;
            pb.inc(1);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        encoder.copy_buffer_to_buffer(
            &self.buf_storage_dst,
            0,
            &self.buf_staging_dst,
            0,
            self.buf_staging_dst.size(),
        );
        self.queue.submit(Some(encoder.finish()));

        let buffer_slice = self.buf_staging_dst.slice(..);
        let (sender, receiver) = flume::bounded(1);
        buffer_slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = sender.send(r);
        });
        self.device.poll(wgpu::PollType::Wait)?;
        receiver.recv()??;
        let dst = {
            let data = buffer_slice.get_mapped_range();
            bytemuck::cast_slice::<u8, [f32; 2]>(&data)
                .iter()
                .map(|&[sum, count]| Contribution {
                    sum,
                    count: count as u32,
                })
                .collect()
        };
        self.buf_staging_dst.unmap();
        Ok(dst)
    }
}
