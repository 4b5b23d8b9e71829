use clap::{Parser, ValueEnum};

use crate::types::Dimension;

/// Bouncing particle demos drawn as points
#[derive(Parser, Debug)]
#[command()]
pub struct Args {
    /// Which demo to run
    #[arg(value_enum, default_value_t = Dimension::Two)]
    pub dimension: Dimension,

    /// The framerate the simulation will run at
    ///
    /// if not set the simulation runs at the display refresh rate
    #[arg(short, long)]
    pub framerate: Option<u32>,

    /// Seed for particle generation, defaults to the current time
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Graphics backend to request
    #[arg(short, long, value_enum, default_value_t = Backend::Auto)]
    pub backend: Backend,

    /// Side length of a drawn particle, in pixels
    #[arg(short, long, default_value_t = 10.0)]
    pub point_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Auto,
    Gl,
    Vulkan,
    Metal,
    Dx12,
}

impl Backend {
    pub fn backends(self) -> wgpu::Backends {
        match self {
            Backend::Auto => wgpu::Backends::all(),
            Backend::Gl => wgpu::Backends::GL,
            Backend::Vulkan => wgpu::Backends::VULKAN,
            Backend::Metal => wgpu::Backends::METAL,
            Backend::Dx12 => wgpu::Backends::DX12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_2d_demo() {
        let args = Args::try_parse_from(["particles"]).unwrap();
        assert_eq!(args.dimension, Dimension::Two);
        assert_eq!(args.framerate, None);
        assert_eq!(args.seed, None);
        assert_eq!(args.backend, Backend::Auto);
        assert_eq!(args.point_size, 10.0);
    }

    #[test]
    fn parses_the_3d_demo_with_options() {
        let args =
            Args::try_parse_from(["particles", "3d", "--seed", "12", "-f", "60", "-b", "gl"])
                .unwrap();
        assert_eq!(args.dimension, Dimension::Three);
        assert_eq!(args.seed, Some(12));
        assert_eq!(args.framerate, Some(60));
        assert_eq!(args.backend.backends(), wgpu::Backends::GL);
    }

    #[test]
    fn rejects_unknown_demos() {
        assert!(Args::try_parse_from(["particles", "4d"]).is_err());
    }
}
