//! Fatal startup failures
//!
//! Each one is reported with a single line on stdout and ends the process
//! with a non-zero status. Nothing after the first frame is treated as an
//! error here.

use std::fmt;

/// Exit status used for every startup failure
pub const STARTUP_FAILURE_STATUS: i32 = -1;

#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for the window.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No adapter can present to the surface.
    NoAdapter,
    /// Failed to create the logical device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The adapter cannot render to this surface.
    UnsupportedSurface,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "failed to create surface: {}", e),
            GpuError::NoAdapter => write!(f, "no compatible adapter found"),
            GpuError::DeviceCreation(e) => write!(f, "failed to create device: {}", e),
            GpuError::UnsupportedSurface => write!(f, "surface not supported by adapter"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

#[derive(Debug)]
pub enum StartupError {
    /// The windowing system could not be initialized.
    EventLoop(winit::error::EventLoopError),
    /// The window could not be opened.
    Window(winit::error::OsError),
    /// The graphics API could not be loaded.
    Gpu(GpuError),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::EventLoop(e) => write!(f, "Failed to initialize the window system: {}", e),
            StartupError::Window(e) => write!(f, "Failed to open a window: {}", e),
            StartupError::Gpu(e) => write!(f, "Failed to initialize the graphics device: {}", e),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::EventLoop(e) => Some(e),
            StartupError::Window(e) => Some(e),
            StartupError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for StartupError {
    fn from(e: winit::error::EventLoopError) -> Self {
        StartupError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for StartupError {
    fn from(e: winit::error::OsError) -> Self {
        StartupError::Window(e)
    }
}

impl From<GpuError> for StartupError {
    fn from(e: GpuError) -> Self {
        StartupError::Gpu(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_failures_name_the_graphics_device() {
        let err = StartupError::from(GpuError::NoAdapter);
        assert_eq!(
            err.to_string(),
            "Failed to initialize the graphics device: no compatible adapter found"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn startup_messages_are_distinct() {
        let gpu = StartupError::from(GpuError::UnsupportedSurface).to_string();
        assert!(gpu.starts_with("Failed to initialize the graphics device"));
        assert!(!gpu.contains("window"));
    }
}
