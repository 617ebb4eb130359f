//! Headless compute diagnostic.
//!
//! Bootstraps a device without a surface, runs one compute dispatch over a
//! storage buffer and reads the result back with a blocking wait.

mod context;
mod scan;

pub use context::HeadlessGpu;
pub use scan::{scan_reference, ScanProbe, PREFIX_SCAN_WGSL, WORKGROUP_SIZE};

use thiserror::Error;

use crate::device::GpuError;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error("failed to read shader {}: {source}", path.display())]
    ShaderIo {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shader rejected: {0}")]
    Shader(String),

    #[error("compute dispatch rejected: {0}")]
    Dispatch(String),

    #[error("input is empty")]
    EmptyInput,

    #[error("buffer length {len} is not a multiple of the workgroup size {workgroup}")]
    UnalignedLength { len: usize, workgroup: u32 },

    #[error("staging buffer map failed: {0}")]
    Map(String),

    #[error("device poll failed: {0}")]
    Poll(String),
}
