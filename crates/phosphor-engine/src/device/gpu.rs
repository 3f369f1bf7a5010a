use crate::error::EngineError;

/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when
/// a concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Adapter power class. Low power is fine for a 2D post-process load.
    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly
    /// necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Accept a software rasterizer when no hardware adapter exists.
    ///
    /// Lets the render tests run on headless CI hosts.
    pub force_fallback_adapter: bool,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::LowPower,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            force_fallback_adapter: false,
        }
    }
}

/// Owns the wgpu core objects.
///
/// This type is the low-level rendering context: it creates and stores the
/// Instance/Adapter/Device/Queue that every pipeline shares.
pub struct Gpu {
    instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Gpu {
    /// Creates a headless GPU context.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; callers without
    /// an executor can use [`Gpu::new_blocking`].
    pub async fn new(init: GpuInit) -> Result<Self, EngineError> {
        // Use all backends to allow wgpu to select the optimal platform backend.
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .map_err(|err| EngineError::ContextUnavailable(err.to_string()))?;

        log::info!("adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("phosphor-engine device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|err| EngineError::ContextUnavailable(err.to_string()))?;

        Ok(Gpu {
            instance,
            adapter,
            device,
            queue,
        })
    }

    /// Blocking wrapper over [`Gpu::new`].
    pub fn new_blocking(init: GpuInit) -> Result<Self, EngineError> {
        pollster::block_on(Self::new(init))
    }

    /// Instance handle, for hosts that need to create a window surface.
    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
