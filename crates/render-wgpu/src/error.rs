/// Failures setting up or reading back from the GPU.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("invalid render target size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("failed to map readback buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    #[error("readback callback dropped before completing")]
    ReadbackLost,
}
