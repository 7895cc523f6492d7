use candle_core::Device;
use tracing::{debug, info, warn};

/// Compute backends, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Metal,
    Cuda,
    Cpu,
}

impl Backend {
    /// Backends compiled into this binary, most preferred first. Always ends with [`Backend::Cpu`].
    pub fn candidates() -> Vec<Backend> {
        let mut backends = Vec::with_capacity(3);
        if cfg!(feature = "metal") {
            backends.push(Backend::Metal);
        }
        if cfg!(feature = "cuda") {
            backends.push(Backend::Cuda);
        }
        backends.push(Backend::Cpu);
        backends
    }

    pub fn label(self) -> &'static str {
        match self {
            Backend::Metal => "metal",
            Backend::Cuda => "cuda",
            Backend::Cpu => "cpu",
        }
    }

    fn open(self) -> candle_core::Result<Device> {
        match self {
            Backend::Metal => Device::new_metal(0),
            Backend::Cuda => Device::new_cuda(0),
            Backend::Cpu => Ok(Device::Cpu),
        }
    }
}

/// Picks the first backend that opens; GPU failures are logged, CPU always succeeds.
pub fn select_device() -> Device {
    let mut failures: Vec<String> = Vec::new();

    for backend in Backend::candidates() {
        match backend.open() {
            Ok(device) if backend == Backend::Cpu => {
                if failures.is_empty() {
                    debug!("No GPU backend compiled, using CPU");
                } else {
                    warn!(reason = %failures.join("; "), "Falling back to CPU device");
                }
                return device;
            }
            Ok(device) => {
                info!(backend = backend.label(), "Using GPU for inference");
                return device;
            }
            Err(e) => {
                warn!(backend = backend.label(), error = %e, "Device unavailable");
                failures.push(format!("{} failed: {e}", backend.label()));
            }
        }
    }

    Device::Cpu
}

/// Short name of a device for logs and the readiness probe.
pub fn device_label(device: &Device) -> &'static str {
    if device.is_cuda() {
        Backend::Cuda.label()
    } else if device.is_metal() {
        Backend::Metal.label()
    } else {
        Backend::Cpu.label()
    }
}
